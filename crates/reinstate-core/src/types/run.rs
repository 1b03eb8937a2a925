//! The three runs every subject contributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Run role within a subject's session. Order matches the order volumes
/// are distributed to the searchlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Memory,
    RestPre,
    RestPost,
}

impl RunKind {
    pub const ALL: [RunKind; 3] = [RunKind::Memory, RunKind::RestPre, RunKind::RestPost];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::RestPre => "rest_pre",
            Self::RestPost => "rest_post",
        }
    }

    /// Position in the distributed run list.
    pub fn index(&self) -> usize {
        match self {
            Self::Memory => 0,
            Self::RestPre => 1,
            Self::RestPost => 2,
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
