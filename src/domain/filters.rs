// src/domain/filters.rs
use crate::data::{Listing, ListingsTable};
use std::collections::BTreeSet;

/// Label of the "every state" option.
pub const ALL_STATES_LABEL: &str = "Todos";

/// Query keys used by the filter form.
pub const STATE_KEY: &str = "state";
pub const CATEGORY_KEY: &str = "cat";
/// Present whenever the category selector was submitted, so that an empty
/// selection can be told apart from "no category filter".
pub const CATEGORY_FORM_KEY: &str = "cf";
pub const QUERY_KEY: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateChoice {
    #[default]
    All,
    Only(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryChoice {
    /// No category filter at all.
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl CategoryChoice {
    /// Unknown categories are dropped; a selection covering every known
    /// category is no filter.
    pub fn resolve(mut selected: BTreeSet<String>, all: &[String]) -> Self {
        selected.retain(|c| all.contains(c));
        let everything = selected.len() == all.len() && all.iter().all(|c| selected.contains(c));
        if everything {
            CategoryChoice::All
        } else {
            CategoryChoice::Only(selected)
        }
    }

    pub fn is_selected(&self, category: &str) -> bool {
        match self {
            CategoryChoice::All => true,
            CategoryChoice::Only(set) => set.contains(category),
        }
    }

    pub fn selected_count(&self, all: &[String]) -> usize {
        match self {
            CategoryChoice::All => all.len(),
            CategoryChoice::Only(set) => set.len(),
        }
    }
}

/// What the visitor picked. Rebuilt from the query string on every request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub state: StateChoice,
    pub categories: CategoryChoice,
    /// Raw search text as typed.
    pub query: String,
}

impl FilterSelection {
    /// Build from decoded query pairs, normalised against the known options.
    pub fn from_pairs<I, K, V>(pairs: I, options: &FilterOptions) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = StateChoice::All;
        let mut picked = BTreeSet::new();
        let mut category_form = false;
        let mut query = String::new();

        for (k, v) in pairs {
            let v = v.as_ref();
            match k.as_ref() {
                STATE_KEY if !v.is_empty() => state = StateChoice::Only(v.to_string()),
                CATEGORY_KEY => {
                    category_form = true;
                    picked.insert(v.to_string());
                }
                CATEGORY_FORM_KEY => category_form = true,
                QUERY_KEY => query = v.to_string(),
                _ => {}
            }
        }

        let categories = if category_form {
            CategoryChoice::resolve(picked, &options.categories)
        } else {
            CategoryChoice::All
        };

        Self {
            state,
            categories,
            query,
        }
    }

    /// Query string reproducing this selection (used by export links).
    pub fn to_query_string(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let StateChoice::Only(s) = &self.state {
            out.append_pair(STATE_KEY, s);
        }
        if let CategoryChoice::Only(set) = &self.categories {
            out.append_pair(CATEGORY_FORM_KEY, "1");
            for c in set {
                out.append_pair(CATEGORY_KEY, c);
            }
        }
        if !self.query.trim().is_empty() {
            out.append_pair(QUERY_KEY, &self.query);
        }
        out.finish()
    }

    pub fn matches(&self, listing: &Listing<'_>) -> bool {
        self.matches_state(listing) && self.matches_categories(listing)
    }

    fn matches_state(&self, listing: &Listing<'_>) -> bool {
        match &self.state {
            StateChoice::All => true,
            StateChoice::Only(s) => listing.state() == s,
        }
    }

    fn matches_categories(&self, listing: &Listing<'_>) -> bool {
        match &self.categories {
            CategoryChoice::All => true,
            CategoryChoice::Only(set) => listing.category_tokens().any(|t| set.contains(t)),
        }
    }
}

/// Choices offered by the filter form, derived from the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    /// Distinct non-empty states, ascending. The "all" option is implicit.
    pub states: Vec<String>,
    /// Distinct category tokens, ascending.
    pub categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &ListingsTable) -> Self {
        Self {
            states: distinct_states(table),
            categories: distinct_categories(table),
        }
    }
}

pub fn distinct_states(table: &ListingsTable) -> Vec<String> {
    table
        .listings()
        .map(|l| l.state())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn distinct_categories(table: &ListingsTable) -> Vec<String> {
    table
        .listings()
        .flat_map(|l| l.category_tokens())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows passing both the state and the category filter, in table order.
pub fn apply<'a>(table: &'a ListingsTable, selection: &FilterSelection) -> Vec<Listing<'a>> {
    table.listings().filter(|l| selection.matches(l)).collect()
}
