// src/domain/aggregate.rs
use crate::data::Listing;
use serde::Serialize;
use std::collections::HashMap;

/// (label, rows) pairs, largest first, ties by label.
pub type Counts = Vec<(String, usize)>;

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Counts {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *map.entry(v).or_default() += 1;
    }
    let mut counts: Counts = map.into_iter().map(|(k, n)| (k.to_string(), n)).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// One row adds one to every category it lists.
pub fn count_by_category(rows: &[Listing<'_>]) -> Counts {
    tally(rows.iter().flat_map(|l| l.category_tokens()))
}

pub fn count_by_state(rows: &[Listing<'_>]) -> Counts {
    tally(rows.iter().map(|l| l.state()))
}

pub fn count_by_city(rows: &[Listing<'_>]) -> Counts {
    tally(rows.iter().map(|l| l.city()))
}

/// Everything the charts and metrics show for one filtered view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    /// `None` when every state is shown.
    pub states_shown: Option<usize>,
    pub categories_selected: usize,
    pub by_category: Counts,
    pub by_state: Counts,
    pub by_city: Counts,
}

impl Summary {
    pub fn new(
        rows: &[Listing<'_>],
        single_state: bool,
        categories_selected: usize,
    ) -> Self {
        Self {
            records: rows.len(),
            states_shown: single_state.then_some(1),
            categories_selected,
            by_category: count_by_category(rows),
            by_state: count_by_state(rows),
            by_city: count_by_city(rows),
        }
    }
}
