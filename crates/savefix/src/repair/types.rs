use std::fmt;

use thiserror::Error;

use crate::document::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Delete matches whose movement target no longer exists.
    FixDangling,
    /// Delete every match.
    RemoveAll,
}

impl Policy {
    pub fn label(self) -> &'static str {
        match self {
            Policy::FixDangling => "fix_dangling",
            Policy::RemoveAll => "remove_all",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the caller asked for. Requesting both policies at once is rejected
/// before a request is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyRequest {
    #[default]
    None,
    FixOnly,
    RemoveOnly,
}

impl PolicyRequest {
    pub fn policies(self) -> &'static [Policy] {
        match self {
            PolicyRequest::None => &[],
            PolicyRequest::FixOnly => &[Policy::FixDangling],
            PolicyRequest::RemoveOnly => &[Policy::RemoveAll],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Unchanged,
    Changed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
    pub changed: bool,
    pub scanned: usize,
    pub matched: usize,
    pub deleted: usize,
    /// Marked keys that were gone by the time the apply pass reached them.
    pub skipped: usize,
}

impl RunResult {
    pub fn outcome(&self) -> RunOutcome {
        if self.changed {
            RunOutcome::Changed
        } else {
            RunOutcome::Unchanged
        }
    }
}

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("cannot locate entity collection: {0}")]
    Document(#[from] DocumentError),
}
