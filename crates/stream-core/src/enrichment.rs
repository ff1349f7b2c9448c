//! Reference identifiers used when enriching activities.
//!
//! Activities may point at collection entries and users instead of embedding
//! them. The API resolves these references when enrichment is requested.

/// Reference to an entry of a collection: `SO:<collection>:<id>`.
///
/// No validation is performed; empty inputs still yield a well-formed string.
#[must_use]
pub fn format_collection_reference(collection: &str, id: &str) -> String {
    format!("SO:{collection}:{id}")
}

/// Reference to a user: `SU:<id>`.
#[must_use]
pub fn format_user_reference(id: &str) -> String {
    format!("SU:{id}")
}
