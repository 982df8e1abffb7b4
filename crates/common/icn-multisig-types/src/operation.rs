use crate::identity::TargetId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Describes an action to be forwarded to a target once enough signers
/// have confirmed it. The engine never interprets the payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Target the approved payload is forwarded to
    pub target: TargetId,

    /// Opaque call data handed to the target verbatim
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,

    /// Optional salt forcing otherwise-identical actions to be tracked as
    /// independent proposals
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Vec<u8>>,
}

impl ActionDescriptor {
    pub fn new(target: impl Into<TargetId>, payload: impl Into<Vec<u8>>) -> Self {
        ActionDescriptor {
            target: target.into(),
            payload: payload.into(),
            salt: None,
        }
    }

    /// Attach a salt to this descriptor
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Compute the key identifying this descriptor's operation
    pub fn key(&self) -> OperationKey {
        OperationKey::derive(self)
    }
}

/// Deterministic identity of a pending operation: the SHA-256 digest of
/// `(target, payload, salt)`. Two proposals with the same key are the same
/// operation regardless of who submitted them or when.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationKey(pub [u8; 32]);

impl OperationKey {
    /// Derive the key for a descriptor.
    ///
    /// Every field is length-framed and the salt carries a presence marker,
    /// so distinct `(target, payload, salt)` tuples cannot produce the same
    /// digest input (an absent salt stays distinct from an empty one).
    pub fn derive(descriptor: &ActionDescriptor) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((descriptor.target.as_bytes().len() as u64).to_be_bytes());
        hasher.update(descriptor.target.as_bytes());
        hasher.update((descriptor.payload.len() as u64).to_be_bytes());
        hasher.update(&descriptor.payload);
        match &descriptor.salt {
            Some(salt) => {
                hasher.update([1u8]);
                hasher.update((salt.len() as u64).to_be_bytes());
                hasher.update(salt);
            }
            None => {
                hasher.update([0u8]);
            }
        }
        let mut array = [0u8; 32];
        array.copy_from_slice(&hasher.finalize());
        OperationKey(array)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationKey({})", self.to_hex())
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for OperationKey {
    fn from(bytes: [u8; 32]) -> Self {
        OperationKey(bytes)
    }
}
