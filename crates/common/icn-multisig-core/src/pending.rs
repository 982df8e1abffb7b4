use chrono::Utc;
use icn_multisig_types::{ActionDescriptor, OperationKey, SignerId, TargetId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A not-yet-resolved proposal and its confirmation bookkeeping.
///
/// The required count is snapshotted when the operation is created; whether
/// the engine honors that snapshot or re-reads the live value is a policy
/// decision made above this type.
#[derive(Debug, Clone)]
pub struct PendingOperation {
    key: OperationKey,
    descriptor: ActionDescriptor,
    required: usize,
    confirmed_by: HashSet<SignerId>,
    created_at: u64,
}

impl PendingOperation {
    /// Create a pending operation with its first confirmer already recorded.
    pub(crate) fn new(
        key: OperationKey,
        descriptor: ActionDescriptor,
        required: usize,
        first_confirmer: SignerId,
    ) -> Self {
        let mut confirmed_by = HashSet::new();
        confirmed_by.insert(first_confirmer);
        PendingOperation {
            key,
            descriptor,
            required,
            confirmed_by,
            created_at: Utc::now().timestamp() as u64,
        }
    }

    pub fn key(&self) -> &OperationKey {
        &self.key
    }

    pub fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    /// Confirmation count required when this operation was created
    pub fn required(&self) -> usize {
        self.required
    }

    /// Number of distinct signers that currently confirm this operation
    pub fn confirmations(&self) -> usize {
        self.confirmed_by.len()
    }

    pub fn has_confirmed(&self, signer: &SignerId) -> bool {
        self.confirmed_by.contains(signer)
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Record a confirmation. Returns false if the signer already confirmed.
    pub(crate) fn insert_confirmation(&mut self, signer: SignerId) -> bool {
        self.confirmed_by.insert(signer)
    }

    /// Withdraw a confirmation. Returns false if the signer never confirmed.
    pub(crate) fn remove_confirmation(&mut self, signer: &SignerId) -> bool {
        self.confirmed_by.remove(signer)
    }

    /// Read-only snapshot for callers and audit tooling
    pub fn summary(&self) -> PendingSummary {
        let mut confirmed_by: Vec<SignerId> = self.confirmed_by.iter().cloned().collect();
        confirmed_by.sort();
        PendingSummary {
            key: self.key.clone(),
            target: self.descriptor.target.clone(),
            confirmations: self.confirmed_by.len(),
            required_at_creation: self.required,
            confirmed_by,
            created_at: self.created_at,
        }
    }
}

/// Read-only snapshot of a pending operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingSummary {
    pub key: OperationKey,

    /// Target the payload will be forwarded to on resolution
    pub target: TargetId,

    pub confirmations: usize,

    /// Required count snapshotted when the operation was created
    pub required_at_creation: usize,

    /// Confirming signers, sorted for deterministic output
    pub confirmed_by: Vec<SignerId>,

    /// Unix timestamp of creation
    pub created_at: u64,
}

/// Authoritative mapping from operation key to confirmation state.
///
/// Pure data: the engine is the sole mutator, and an entry only exists
/// while `0 < confirmations < required` holds under the engine's policy.
#[derive(Debug, Default)]
pub struct PendingStore {
    operations: HashMap<OperationKey, PendingOperation>,
}

impl PendingStore {
    pub fn new() -> Self {
        PendingStore::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn contains(&self, key: &OperationKey) -> bool {
        self.operations.contains_key(key)
    }

    pub fn get(&self, key: &OperationKey) -> Option<&PendingOperation> {
        self.operations.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &OperationKey) -> Option<&mut PendingOperation> {
        self.operations.get_mut(key)
    }

    pub(crate) fn insert(&mut self, operation: PendingOperation) {
        self.operations.insert(operation.key().clone(), operation);
    }

    pub(crate) fn remove(&mut self, key: &OperationKey) -> Option<PendingOperation> {
        self.operations.remove(key)
    }

    /// Keys of every pending operation, in no particular order
    pub fn keys(&self) -> Vec<OperationKey> {
        self.operations.keys().cloned().collect()
    }
}
