//! Data model for the quorum-gated operation dispatcher.
//! Defines signer and target identities, action descriptors, operation keys,
//! dispatch outcomes, and audit record types shared across the workspace.

pub mod dispatch;
pub mod events;
pub mod identity;
pub mod operation;

// Re-export core types for easier access
pub use dispatch::{DispatchResult, DispatchStatus};
pub use events::{AuditEventKind, AuditRecord};
pub use identity::{IdentityError, SignerId, TargetId};
pub use operation::{ActionDescriptor, OperationKey};
