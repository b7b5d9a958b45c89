pub mod export_xlsx;

pub use export_xlsx::export_stores_xlsx;
