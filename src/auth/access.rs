// src/auth/access.rs
use crate::auth::token::{digest, digests_equal, Digest32};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Deliberately says nothing about which codes exist.
    #[error("invalid access code")]
    InvalidCode,
}

/// The set of shared access codes, held only as digests.
/// Loaded once at startup and never mutated afterwards.
#[derive(Clone, Default)]
pub struct AccessCodes {
    digests: Vec<Digest32>,
}

impl AccessCodes {
    /// Parse a comma separated list; entries are trimmed, blanks and duplicates dropped.
    pub fn parse(raw: &str) -> Self {
        let mut digests: Vec<Digest32> = Vec::new();
        for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let d = digest(code);
            if !digests.contains(&d) {
                digests.push(d);
            }
        }
        Self { digests }
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Exact match after trimming. Every configured code is compared so the
    /// time taken does not depend on which one matched.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = digest(candidate.trim());
        self.digests
            .iter()
            .fold(false, |found, d| digests_equal(d, &candidate) | found)
    }
}

impl std::fmt::Debug for AccessCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCodes")
            .field("count", &self.digests.len())
            .finish()
    }
}
