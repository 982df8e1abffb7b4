use serde::{Deserialize, Serialize};

/// Classification of one forwarding attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The callee ran and reported success
    Succeeded,

    /// The callee ran and reported failure; its diagnostic is preserved
    /// in the return data
    Failed,

    /// The forwarding mechanism could not reach the callee at all
    Unavailable,
}

/// Result of forwarding an approved action to its target.
///
/// A failed or unreachable callee is reported here as data, never as an
/// error of the quorum process: the decision was reached and the attempt
/// was made, which is all the engine guarantees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchResult {
    pub status: DispatchStatus,

    /// Whatever the callee (or the forwarding layer) returned
    #[serde(with = "serde_bytes")]
    pub return_data: Vec<u8>,
}

impl DispatchResult {
    pub fn succeeded(return_data: impl Into<Vec<u8>>) -> Self {
        DispatchResult {
            status: DispatchStatus::Succeeded,
            return_data: return_data.into(),
        }
    }

    pub fn failed(return_data: impl Into<Vec<u8>>) -> Self {
        DispatchResult {
            status: DispatchStatus::Failed,
            return_data: return_data.into(),
        }
    }

    pub fn unavailable(diagnostic: impl Into<Vec<u8>>) -> Self {
        DispatchResult {
            status: DispatchStatus::Unavailable,
            return_data: diagnostic.into(),
        }
    }

    /// True when the callee reported success
    pub fn success(&self) -> bool {
        matches!(self.status, DispatchStatus::Succeeded)
    }
}
