mod client;
mod fetch_error;

pub use client::{ExportFetcher, WpExportFetcher};
pub use fetch_error::FetchError;
