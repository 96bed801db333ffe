//! Regeneration decisions for generated story artifacts.

/// Rule deciding whether an artifact must be (re)generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerationPolicy {
    /// Generate only when the destination does not exist yet
    ExistenceGated,
    /// Generate when the destination is older than its source
    StalenessGated,
}

impl RegenerationPolicy {
    /// Decide whether to generate. `force` always wins.
    pub fn should_generate(self, destination_exists: bool, destination_is_stale: bool, force: bool) -> bool {
        force
            || match self {
                Self::ExistenceGated => !destination_exists,
                Self::StalenessGated => destination_is_stale,
            }
    }
}

/// A destination is stale when it is missing or strictly older than its source.
pub fn is_stale<T: PartialOrd>(source_modified: T, destination_modified: Option<T>) -> bool {
    destination_modified.map_or(true, |destination| destination < source_modified)
}
