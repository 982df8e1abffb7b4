use serde::{Deserialize, Serialize};

/// How the engine reads the required confirmation count for an operation
/// that is already pending
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Snapshot the required count when the operation is created. Later
    /// governance changes apply to the next proposal, never to in-flight
    /// operations.
    #[default]
    FrozenAtCreation,

    /// Re-read the live required count on every confirmation attempt
    Live,
}

/// Tunable behavior of the multisig engine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Threshold snapshotting behavior for in-flight operations
    pub threshold_policy: ThresholdPolicy,

    /// When set, revocation re-checks that the signer is still authorized.
    /// Off by default: a de-authorized signer may withdraw a confirmation
    /// it made while authorized.
    pub strict_revoke_auth: bool,
}
