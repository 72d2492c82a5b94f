use rayon::prelude::*;

use crate::country::Country;

/// Tri-state filter on the `has_states` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatesFilter {
    #[default]
    Any,
    With,
    Without,
}

impl StatesFilter {
    pub fn matches(&self, has_states: bool) -> bool {
        match self {
            StatesFilter::Any => true,
            StatesFilter::With => has_states,
            StatesFilter::Without => !has_states,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatesFilter::Any => "All",
            StatesFilter::With => "Has State",
            StatesFilter::Without => "Does Not Have State",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatesFilter::Any => StatesFilter::With,
            StatesFilter::With => StatesFilter::Without,
            StatesFilter::Without => StatesFilter::Any,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            StatesFilter::Any => StatesFilter::Without,
            StatesFilter::With => StatesFilter::Any,
            StatesFilter::Without => StatesFilter::With,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub states: StatesFilter,
    pub continent: String,
}

impl FilterCriteria {
    pub fn is_neutral(&self) -> bool {
        self.states == StatesFilter::Any && self.continent.is_empty()
    }

    pub fn matches(&self, country: &Country) -> bool {
        self.states.matches(country.has_states)
            && country
                .continent
                .to_lowercase()
                .contains(&self.continent.to_lowercase())
    }

    pub fn describe(&self) -> String {
        if self.is_neutral() {
            return "none".to_string();
        }
        let mut parts = Vec::new();
        if self.states != StatesFilter::Any {
            parts.push(self.states.label().to_string());
        }
        if !self.continent.is_empty() {
            parts.push(format!("continent ~ \"{}\"", self.continent));
        }
        parts.join(", ")
    }
}

/// Returns the indices of all records matching `criteria`, in input order.
pub fn apply(records: &[Country], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .par_iter()
        .enumerate()
        .filter(|(_, country)| criteria.matches(country))
        .map(|(idx, _)| idx)
        .collect()
}
