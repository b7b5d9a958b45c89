// src/domain/search.rs
use crate::data::Listing;

/// Lowercased "title city state". Only case is folded: accents must match
/// as typed.
pub fn search_key(listing: &Listing<'_>) -> String {
    format!(
        "{} {} {}",
        listing.title().to_lowercase(),
        listing.city().to_lowercase(),
        listing.state().to_lowercase()
    )
}

/// Substring search over `search_key`. A blank query keeps every row.
pub fn search<'a>(rows: &[Listing<'a>], query: &str) -> Vec<Listing<'a>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|l| search_key(l).contains(&needle))
        .copied()
        .collect()
}
