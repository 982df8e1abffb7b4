use crate::dispatch::DispatchResult;
use crate::identity::SignerId;
use crate::operation::OperationKey;
use serde::{Deserialize, Serialize};

/// Kinds of audit notifications emitted by the engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value")]
pub enum AuditEventKind {
    /// A new pending operation was created by its first confirmation
    Proposed { signer: SignerId },

    /// An additional signer confirmed an existing pending operation
    Confirmed { signer: SignerId },

    /// A signer withdrew a confirmation
    Revoked { signer: SignerId },

    /// Quorum was reached and the action was forwarded
    Resolved { result: DispatchResult },
}

/// Timestamped audit history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    /// Operation the notification concerns
    pub key: OperationKey,

    /// What happened
    pub kind: AuditEventKind,

    /// Unix timestamp when the record was captured
    pub recorded_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::ActionDescriptor;

    #[test]
    fn test_audit_record_serde_round_trip() {
        let key = ActionDescriptor::new("registry", b"add-member:zBob".to_vec()).key();
        let record = AuditRecord {
            key,
            kind: AuditEventKind::Resolved {
                result: DispatchResult::succeeded(b"ok".to_vec()),
            },
            recorded_at: 1_720_000_000,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
