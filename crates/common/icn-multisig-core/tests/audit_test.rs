use icn_multisig_core::{
    ActionOutcome, ActionTarget, Dispatcher, InMemoryAuditLog, MultisigEngine,
    InMemorySignerRegistry, TargetError,
};
use icn_multisig_types::{ActionDescriptor, AuditEventKind, SignerId, TargetId};
use std::sync::Arc;

fn signer(id: &str) -> SignerId {
    SignerId::new(id).unwrap()
}

struct AcceptingTarget;

impl ActionTarget for AcceptingTarget {
    fn invoke(&mut self, _payload: &[u8]) -> Result<ActionOutcome, TargetError> {
        Ok(ActionOutcome::ok(b"done".to_vec()))
    }
}

struct RejectingTarget;

impl ActionTarget for RejectingTarget {
    fn invoke(&mut self, _payload: &[u8]) -> Result<ActionOutcome, TargetError> {
        Ok(ActionOutcome::rejected(b"status transition refused".to_vec()))
    }
}

fn engine(required: usize, accept: bool) -> (MultisigEngine, Arc<InMemoryAuditLog>) {
    let registry = Arc::new(
        InMemorySignerRegistry::with_members(
            vec![signer("zAlice"), signer("zBob"), signer("zCarol")],
            required,
        )
        .unwrap(),
    );
    let mut dispatcher = Dispatcher::new();
    let callee: Box<dyn ActionTarget> = if accept {
        Box::new(AcceptingTarget)
    } else {
        Box::new(RejectingTarget)
    };
    dispatcher.register(TargetId::from("status"), callee);
    let audit = Arc::new(InMemoryAuditLog::new());
    let engine = MultisigEngine::new(registry, dispatcher).with_audit(audit.clone());
    (engine, audit)
}

fn set_status_action() -> ActionDescriptor {
    ActionDescriptor::new("status", b"set-status:active".to_vec())
}

#[test]
fn test_full_lifecycle_is_audited_in_order() {
    let (mut engine, audit) = engine(2, true);

    let receipt = engine.propose(&signer("zAlice"), set_status_action()).unwrap();
    engine.confirm(&signer("zBob"), &receipt.key).unwrap();

    let records = audit.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.key == receipt.key));

    assert_eq!(
        records[0].kind,
        AuditEventKind::Proposed {
            signer: signer("zAlice")
        }
    );
    assert_eq!(
        records[1].kind,
        AuditEventKind::Confirmed {
            signer: signer("zBob")
        }
    );
    match &records[2].kind {
        AuditEventKind::Resolved { result } => assert!(result.success()),
        other => panic!("expected resolution record, got {:?}", other),
    }
}

#[test]
fn test_revocation_is_audited() {
    let (mut engine, audit) = engine(3, true);

    let receipt = engine.propose(&signer("zAlice"), set_status_action()).unwrap();
    engine.revoke(&signer("zAlice"), &receipt.key).unwrap();

    let records = audit.records();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[1].kind,
        AuditEventKind::Revoked {
            signer: signer("zAlice")
        }
    );

    // a no-op revoke leaves no trace
    let next = engine.propose(&signer("zBob"), set_status_action()).unwrap();
    engine.revoke(&signer("zCarol"), &next.key).unwrap();
    assert_eq!(audit.len(), 3);
}

#[test]
fn test_callee_failure_recorded_with_diagnostic() {
    let (mut engine, audit) = engine(2, false);

    let receipt = engine.propose(&signer("zAlice"), set_status_action()).unwrap();
    engine.confirm(&signer("zBob"), &receipt.key).unwrap();

    let records = audit.records();
    match &records[2].kind {
        AuditEventKind::Resolved { result } => {
            assert!(!result.success());
            assert_eq!(result.return_data, b"status transition refused".to_vec());
        }
        other => panic!("expected resolution record, got {:?}", other),
    }
    // the store never retains a resolved entry, whatever the callee said
    assert_eq!(engine.pendings_count(), 0);
}

#[test]
fn test_audit_records_serialize() {
    let (mut engine, audit) = engine(2, true);

    let receipt = engine.propose(&signer("zAlice"), set_status_action()).unwrap();
    engine.confirm(&signer("zBob"), &receipt.key).unwrap();

    let json = serde_json::to_string(&audit.records()).unwrap();
    let back: Vec<icn_multisig_types::AuditRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, audit.records());
}
