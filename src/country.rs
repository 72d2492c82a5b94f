use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// A single country record as shipped in the data file.
///
/// Missing fields fall back to their empty value instead of failing the whole
/// load, so a sparse record still shows up (and sorts/filters as empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Country {
    pub code: String,
    pub name: String,
    pub name_un: String,
    pub continent: String,
    pub has_states: bool,
}

#[derive(Debug, Deserialize)]
pub struct CountryData {
    pub countries: Vec<Country>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Africa,
        Continent::Antarctica,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "AF" => Some(Continent::Africa),
            "AN" => Some(Continent::Antarctica),
            "AS" => Some(Continent::Asia),
            "EU" => Some(Continent::Europe),
            "NA" => Some(Continent::NorthAmerica),
            "OC" => Some(Continent::Oceania),
            "SA" => Some(Continent::SouthAmerica),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Continent::Africa => "AF",
            Continent::Antarctica => "AN",
            Continent::Asia => "AS",
            Continent::Europe => "EU",
            Continent::NorthAmerica => "NA",
            Continent::Oceania => "OC",
            Continent::SouthAmerica => "SA",
        }
    }

    fn default_name(&self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Antarctica => "Antarctica",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display labels for the continent codes.
///
/// Codes outside the known set have no label. They are still shown in the
/// table and can still be filtered on, only their label stays blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinentNames {
    names: HashMap<Continent, String>,
}

impl Default for ContinentNames {
    fn default() -> Self {
        let names = Continent::ALL
            .iter()
            .map(|c| (*c, c.default_name().to_string()))
            .collect();
        Self { names }
    }
}

impl ContinentNames {
    pub fn with_name(mut self, continent: Continent, name: impl Into<String>) -> Self {
        self.names.insert(continent, name.into());
        self
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        Continent::from_code(code)
            .and_then(|c| self.names.get(&c))
            .map(|s| s.as_str())
    }

    /// Parses a `CODE=Name` override as given on the command line.
    pub fn parse_override(raw: &str) -> Result<(Continent, String), String> {
        let (code, name) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected CODE=NAME, got \"{raw}\""))?;
        let continent = Continent::from_code(code.trim())
            .ok_or_else(|| format!("unknown continent code \"{}\"", code.trim()))?;
        Ok((continent, name.trim().to_string()))
    }
}

/// Distinct continent codes in order of first appearance.
pub fn unique_continents(countries: &[Country]) -> Vec<String> {
    let mut seen = Vec::new();
    for country in countries {
        if !seen.contains(&country.continent) {
            seen.push(country.continent.clone());
        }
    }
    seen
}

#[cfg(test)]
pub(crate) fn country(code: &str, name_un: &str, continent: &str, has_states: bool) -> Country {
    Country {
        code: code.to_string(),
        name: format!("{name_un} (short)"),
        name_un: name_un.to_string(),
        continent: continent.to_string(),
        has_states,
    }
}
