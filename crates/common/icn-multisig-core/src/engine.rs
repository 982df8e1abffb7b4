use crate::audit::AuditSink;
use crate::config::{EngineConfig, ThresholdPolicy};
use crate::dispatch::Dispatcher;
use crate::pending::{PendingOperation, PendingStore, PendingSummary};
use crate::registry::SignerRegistry;
use icn_multisig_types::{ActionDescriptor, DispatchResult, OperationKey, SignerId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to callers of the engine
#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("signer {0} is not an authorized member")]
    Unauthorized(SignerId),

    #[error("no pending operation for key {0}")]
    UnknownOperation(OperationKey),

    #[error("signer {signer} already confirmed operation {key}")]
    AlreadyConfirmed {
        signer: SignerId,
        key: OperationKey,
    },
}

/// Outcome of a proposal or confirmation call
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The operation is still awaiting further confirmations
    Pending {
        confirmations: usize,
        required: usize,
    },

    /// Quorum was reached: the action was forwarded and the pending entry
    /// removed, all within this call
    Resolved(DispatchResult),
}

impl ConfirmOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ConfirmOutcome::Resolved(_))
    }
}

/// Operation key plus outcome returned by `propose`
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalReceipt {
    pub key: OperationKey,
    pub outcome: ConfirmOutcome,
}

/// The quorum engine: creates, merges, confirms, revokes, and resolves
/// pending operations.
///
/// Every call runs to completion inside the caller's atomic step; there is
/// no suspension point between a quorum being reached and the pending entry
/// being removed, so an operation is never observable as "confirmed but
/// awaiting execution".
pub struct MultisigEngine {
    registry: Arc<dyn SignerRegistry>,
    dispatcher: Dispatcher,
    audit: Arc<dyn AuditSink>,
    store: PendingStore,
    config: EngineConfig,
}

impl MultisigEngine {
    pub fn new(registry: Arc<dyn SignerRegistry>, dispatcher: Dispatcher) -> Self {
        MultisigEngine {
            registry,
            dispatcher,
            audit: Arc::new(()),
            store: PendingStore::new(),
            config: EngineConfig::default(),
        }
    }

    /// Attach an audit sink
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Override the default configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Access the dispatcher, e.g. to register targets after construction
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Submit an action for collective approval.
    ///
    /// Creates a pending operation if the descriptor's key is new, otherwise
    /// merges into the existing one. Re-proposing a key the signer already
    /// confirmed is a no-op. If the confirmation satisfies the required
    /// count, the action is dispatched and the entry removed before this
    /// call returns; with a required count of one (or zero) no pending state
    /// is ever observable.
    pub fn propose(
        &mut self,
        signer: &SignerId,
        descriptor: ActionDescriptor,
    ) -> Result<ProposalReceipt, MultisigError> {
        self.ensure_authorized(signer)?;
        let key = descriptor.key();

        let outcome = match self.store.get(&key) {
            Some(op) if op.has_confirmed(signer) => {
                debug!(key = %key, signer = %signer, "duplicate proposal ignored");
                ConfirmOutcome::Pending {
                    confirmations: op.confirmations(),
                    required: self.required_for(op),
                }
            }
            Some(_) => self.record_confirmation(&key, signer)?,
            None => {
                let required = self.registry.required_signatures().max(1);
                let op =
                    PendingOperation::new(key.clone(), descriptor, required, signer.clone());
                self.store.insert(op);
                debug!(key = %key, signer = %signer, required, "pending operation created");
                self.audit.on_proposed(&key, signer);
                self.resolve_if_ready(&key, 1, required)
            }
        };

        Ok(ProposalReceipt { key, outcome })
    }

    /// Add a confirmation to an existing pending operation.
    ///
    /// Unlike `propose`, confirming a key the signer already confirmed is
    /// an error rather than a no-op.
    pub fn confirm(
        &mut self,
        signer: &SignerId,
        key: &OperationKey,
    ) -> Result<ConfirmOutcome, MultisigError> {
        let op = self
            .store
            .get(key)
            .ok_or_else(|| MultisigError::UnknownOperation(key.clone()))?;
        self.ensure_authorized(signer)?;
        if op.has_confirmed(signer) {
            return Err(MultisigError::AlreadyConfirmed {
                signer: signer.clone(),
                key: key.clone(),
            });
        }
        self.record_confirmation(key, signer)
    }

    /// Withdraw a confirmation.
    ///
    /// Safe to retry: revoking a key the signer never confirmed is a no-op.
    /// Revoking the last confirmation deletes the entry entirely. Unless
    /// `strict_revoke_auth` is set, revocation is permitted regardless of
    /// the signer's current authorization, so a de-authorized signer can
    /// still withdraw a confirmation made while authorized.
    pub fn revoke(
        &mut self,
        signer: &SignerId,
        key: &OperationKey,
    ) -> Result<(), MultisigError> {
        if self.config.strict_revoke_auth && self.store.contains(key) {
            self.ensure_authorized(signer)?;
        }
        let Some(op) = self.store.get_mut(key) else {
            return Err(MultisigError::UnknownOperation(key.clone()));
        };
        if !op.remove_confirmation(signer) {
            return Ok(());
        }
        let emptied = op.confirmations() == 0;
        debug!(key = %key, signer = %signer, "confirmation withdrawn");
        self.audit.on_revoked(key, signer);
        if emptied {
            self.store.remove(key);
            debug!(key = %key, "pending operation removed after last revocation");
        }
        Ok(())
    }

    /// Number of operations currently pending
    pub fn pendings_count(&self) -> usize {
        self.store.len()
    }

    /// Confirmations still needed before the operation resolves
    pub fn pending_yet_needed(&self, key: &OperationKey) -> Result<usize, MultisigError> {
        let op = self
            .store
            .get(key)
            .ok_or_else(|| MultisigError::UnknownOperation(key.clone()))?;
        Ok(self.required_for(op).saturating_sub(op.confirmations()))
    }

    /// Whether the signer is currently in the operation's confirmation set
    pub fn has_confirmed(
        &self,
        key: &OperationKey,
        signer: &SignerId,
    ) -> Result<bool, MultisigError> {
        let op = self
            .store
            .get(key)
            .ok_or_else(|| MultisigError::UnknownOperation(key.clone()))?;
        Ok(op.has_confirmed(signer))
    }

    /// Keys of every pending operation
    pub fn pending_keys(&self) -> Vec<OperationKey> {
        self.store.keys()
    }

    /// Snapshot of a pending operation, including the required count
    /// frozen at its creation
    pub fn pending_operation(&self, key: &OperationKey) -> Result<PendingSummary, MultisigError> {
        self.store
            .get(key)
            .map(PendingOperation::summary)
            .ok_or_else(|| MultisigError::UnknownOperation(key.clone()))
    }

    fn ensure_authorized(&self, signer: &SignerId) -> Result<(), MultisigError> {
        if self.registry.is_authorized(signer) {
            Ok(())
        } else {
            Err(MultisigError::Unauthorized(signer.clone()))
        }
    }

    /// Required count for a pending operation under the configured policy
    fn required_for(&self, op: &PendingOperation) -> usize {
        match self.config.threshold_policy {
            ThresholdPolicy::FrozenAtCreation => op.required(),
            ThresholdPolicy::Live => self.registry.required_signatures().max(1),
        }
    }

    fn record_confirmation(
        &mut self,
        key: &OperationKey,
        signer: &SignerId,
    ) -> Result<ConfirmOutcome, MultisigError> {
        let live_required = self.registry.required_signatures().max(1);
        let op = self
            .store
            .get_mut(key)
            .ok_or_else(|| MultisigError::UnknownOperation(key.clone()))?;
        if !op.insert_confirmation(signer.clone()) {
            return Err(MultisigError::AlreadyConfirmed {
                signer: signer.clone(),
                key: key.clone(),
            });
        }
        let confirmations = op.confirmations();
        let required = match self.config.threshold_policy {
            ThresholdPolicy::FrozenAtCreation => op.required(),
            ThresholdPolicy::Live => live_required,
        };
        debug!(key = %key, signer = %signer, confirmations, required, "confirmation recorded");
        self.audit.on_confirmed(key, signer);
        Ok(self.resolve_if_ready(key, confirmations, required))
    }

    fn resolve_if_ready(
        &mut self,
        key: &OperationKey,
        confirmations: usize,
        required: usize,
    ) -> ConfirmOutcome {
        if confirmations < required {
            return ConfirmOutcome::Pending {
                confirmations,
                required,
            };
        }
        let op = self
            .store
            .remove(key)
            .expect("pending entry present when quorum is met");
        ConfirmOutcome::Resolved(self.finalize(op))
    }

    /// Forward the approved action. The entry is already gone: a callee
    /// failure does not restore it, and re-proposing the same descriptor
    /// afterwards starts a brand-new operation.
    fn finalize(&mut self, op: PendingOperation) -> DispatchResult {
        let result = self.dispatcher.execute(op.descriptor());
        info!(
            key = %op.key(),
            confirmations = op.confirmations(),
            success = result.success(),
            "operation resolved"
        );
        self.audit.on_resolved(op.key(), &result);
        result
    }
}
