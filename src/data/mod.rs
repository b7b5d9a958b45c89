mod loader;
mod memo;
mod table;

pub use loader::{load_table, LoadError};
pub use memo::TableCache;
pub use table::{Listing, ListingsTable};
