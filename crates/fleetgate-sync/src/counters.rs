//! Summary counters for a reconciliation run.

/// Per-run counts, emitted at job completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Records patched this run.
    pub updated: u32,
    /// Records with no counterpart in the other system.
    pub not_found: u32,
    /// Records inspected but left untouched.
    pub skipped: u32,
}

impl RunCounters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for RunCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Updated: {}, Not Found: {}, Skipped: {}",
            self.updated, self.not_found, self.skipped
        )
    }
}
