use icn_multisig_types::{ActionDescriptor, DispatchResult, TargetId};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Forwarding-mechanism failures, distinct from a callee reporting a
/// business-level failure
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("target unavailable: {0}")]
    Unavailable(String),
}

/// Business-level verdict reported by a callee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl ActionOutcome {
    pub fn ok(return_data: impl Into<Vec<u8>>) -> Self {
        ActionOutcome {
            success: true,
            return_data: return_data.into(),
        }
    }

    pub fn rejected(return_data: impl Into<Vec<u8>>) -> Self {
        ActionOutcome {
            success: false,
            return_data: return_data.into(),
        }
    }
}

/// Capability interface implemented by every callee the dispatcher can
/// forward approved actions to.
///
/// `Err(TargetError)` means the forwarding mechanism itself broke down;
/// a callee rejecting the action returns `Ok` with `success == false`.
pub trait ActionTarget: Send {
    fn invoke(&mut self, payload: &[u8]) -> Result<ActionOutcome, TargetError>;
}

/// Forwards approved actions to registered targets.
///
/// Invoked only by the engine at the instant quorum is reached. `execute`
/// is infallible: a callee failure or an unreachable target is reported in
/// the result, and the quorum process is considered done either way.
#[derive(Default)]
pub struct Dispatcher {
    targets: HashMap<TargetId, Box<dyn ActionTarget>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher::default()
    }

    /// Register the callee handling a target identity, replacing any
    /// previous registration
    pub fn register(&mut self, target: TargetId, callee: Box<dyn ActionTarget>) {
        self.targets.insert(target, callee);
    }

    pub fn is_registered(&self, target: &TargetId) -> bool {
        self.targets.contains_key(target)
    }

    /// Forward an approved descriptor to its target
    pub fn execute(&mut self, descriptor: &ActionDescriptor) -> DispatchResult {
        let Some(callee) = self.targets.get_mut(&descriptor.target) else {
            warn!(callee = %descriptor.target, "dispatch target not registered");
            return DispatchResult::unavailable(b"target not registered".to_vec());
        };
        match callee.invoke(&descriptor.payload) {
            Ok(outcome) if outcome.success => DispatchResult::succeeded(outcome.return_data),
            Ok(outcome) => {
                warn!(callee = %descriptor.target, "callee reported failure");
                DispatchResult::failed(outcome.return_data)
            }
            Err(TargetError::Unavailable(reason)) => {
                warn!(callee = %descriptor.target, %reason, "forwarding failed");
                DispatchResult::unavailable(reason.into_bytes())
            }
        }
    }
}
