//! What to do when a single document in the set cannot be read

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log a warning, leave the document out, keep going
    #[default]
    Skip,
    /// Stop the run and discard the partial output
    Abort,
}
