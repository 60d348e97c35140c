//! Link entity representing a short-code to URL mapping.

/// A short-code / original-URL pair, optionally owned by a user.
///
/// Links are immutable once created and are never deleted. The short code is
/// unique within a backend's live dataset; the file backend appends without
/// enforcing uniqueness and relies on last-write-wins during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
}

impl Link {
    /// Creates a new link mapping.
    pub fn new(
        code: impl Into<String>,
        original_url: impl Into<String>,
        owner_id: Option<&str>,
    ) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            owner_id: owner_id.map(str::to_string),
        }
    }
}
