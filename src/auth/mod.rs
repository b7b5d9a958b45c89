pub mod access;
pub mod sessions;
pub mod token;

pub use access::AccessCodes;
pub use sessions::SessionStore;
