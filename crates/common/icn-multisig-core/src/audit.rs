use chrono::Utc;
use icn_multisig_types::{AuditEventKind, AuditRecord, DispatchResult, OperationKey, SignerId};
use std::sync::RwLock;

/// Receives proposal, confirmation, revocation, and resolution notifications
/// from the engine.
///
/// Sinks are called synchronously inside the caller's atomic step; they must
/// not block. Interior mutability is the implementation's concern.
pub trait AuditSink: Send + Sync {
    fn on_proposed(&self, key: &OperationKey, signer: &SignerId);

    fn on_confirmed(&self, key: &OperationKey, signer: &SignerId);

    fn on_revoked(&self, key: &OperationKey, signer: &SignerId);

    fn on_resolved(&self, key: &OperationKey, result: &DispatchResult);
}

/// No-op sink for hosts that do not record history
impl AuditSink for () {
    fn on_proposed(&self, _key: &OperationKey, _signer: &SignerId) {}

    fn on_confirmed(&self, _key: &OperationKey, _signer: &SignerId) {}

    fn on_revoked(&self, _key: &OperationKey, _signer: &SignerId) {}

    fn on_resolved(&self, _key: &OperationKey, _result: &DispatchResult) {}
}

/// Retains every notification as a timestamped record
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        InMemoryAuditLog::default()
    }

    /// Snapshot of all records captured so far, in arrival order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, key: &OperationKey, kind: AuditEventKind) {
        let record = AuditRecord {
            key: key.clone(),
            kind,
            recorded_at: Utc::now().timestamp() as u64,
        };
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }
}

impl AuditSink for InMemoryAuditLog {
    fn on_proposed(&self, key: &OperationKey, signer: &SignerId) {
        self.push(
            key,
            AuditEventKind::Proposed {
                signer: signer.clone(),
            },
        );
    }

    fn on_confirmed(&self, key: &OperationKey, signer: &SignerId) {
        self.push(
            key,
            AuditEventKind::Confirmed {
                signer: signer.clone(),
            },
        );
    }

    fn on_revoked(&self, key: &OperationKey, signer: &SignerId) {
        self.push(
            key,
            AuditEventKind::Revoked {
                signer: signer.clone(),
            },
        );
    }

    fn on_resolved(&self, key: &OperationKey, result: &DispatchResult) {
        self.push(
            key,
            AuditEventKind::Resolved {
                result: result.clone(),
            },
        );
    }
}
