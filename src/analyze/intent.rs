//! Intent taxonomy.
//!
//! Declaration order is the tie-break priority: when two labels score the same
//! number of trigger hits, the one declared first wins.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BugReport,
    Complaint,
    FeatureRequest,
    Question,
    Praise,
    Other,
    /// No trigger matched (or empty text). Never dropped from summaries.
    Unclassified,
}

impl Intent {
    /// Labels that own trigger phrases, highest priority first.
    pub const PRIORITY: [Intent; 6] = [
        Intent::BugReport,
        Intent::Complaint,
        Intent::FeatureRequest,
        Intent::Question,
        Intent::Praise,
        Intent::Other,
    ];

    /// Every label a summary reports on, `Unclassified` last.
    pub const ALL: [Intent; 7] = [
        Intent::BugReport,
        Intent::Complaint,
        Intent::FeatureRequest,
        Intent::Question,
        Intent::Praise,
        Intent::Other,
        Intent::Unclassified,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Intent::BugReport => "Bug report",
            Intent::Complaint => "Complaint",
            Intent::FeatureRequest => "Feature request",
            Intent::Question => "Question",
            Intent::Praise => "Praise",
            Intent::Other => "Other",
            Intent::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
