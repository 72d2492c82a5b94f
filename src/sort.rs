use std::cmp::Ordering;

use rayon::prelude::*;

use crate::country::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Code,
    NameUn,
    Continent,
    HasStates,
}

impl SortKey {
    /// Column order of the table.
    pub const COLUMNS: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Code,
        SortKey::NameUn,
        SortKey::Continent,
        SortKey::HasStates,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Name => "Country Name",
            SortKey::Code => "Code",
            SortKey::NameUn => "Country NameUn",
            SortKey::Continent => "Continent",
            SortKey::HasStates => "Has States",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Code => "code",
            SortKey::NameUn => "nameUn",
            SortKey::Continent => "continent",
            SortKey::HasStates => "hasStates",
        }
    }

    pub fn compare(&self, a: &Country, b: &Country) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Code => a.code.cmp(&b.code),
            SortKey::NameUn => a.name_un.cmp(&b.name_un),
            SortKey::Continent => a.continent.cmp(&b.continent),
            SortKey::HasStates => a.has_states.cmp(&b.has_states),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriteria {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortCriteria {
    fn default() -> Self {
        Self {
            key: SortKey::NameUn,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortCriteria {
    /// Selecting the active key flips the direction, any other key starts ascending.
    pub fn request(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggle();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Stable sort of `rows` (indices into `records`).
///
/// Descending only flips the comparison, rows that compare equal keep their
/// relative order in both directions.
pub fn sort(records: &[Country], rows: &[usize], criteria: SortCriteria) -> Vec<usize> {
    let mut ordered = rows.to_vec();
    ordered.par_sort_by(|&a, &b| {
        let order = criteria.key.compare(&records[a], &records[b]);
        match criteria.direction {
            SortDirection::Ascending => order,
            SortDirection::Descending => order.reverse(),
        }
    });
    ordered
}
