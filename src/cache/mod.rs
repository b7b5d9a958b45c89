//! The on-disk copy of the export and the policy deciding when to refetch it.

mod atomic;
mod manager;

pub use atomic::write_atomic;
pub use manager::CacheManager;
