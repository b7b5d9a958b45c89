pub mod aggregate;
pub mod filters;
pub mod search;

pub use aggregate::{Counts, Summary};
pub use filters::{FilterOptions, FilterSelection, StateChoice};
