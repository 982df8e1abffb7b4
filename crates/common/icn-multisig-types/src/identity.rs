use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors related to identity construction
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("signer identity must not be empty")]
    EmptySignerId,
}

/// Opaque identity of a signer, as recognized by the membership registry.
///
/// The engine never interprets the identity beyond equality; authentication
/// of whoever presents it is the host's concern.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignerId(String);

impl SignerId {
    /// Create a signer identity. Empty identities are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityError::EmptySignerId);
        }
        Ok(SignerId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a dispatch target. Opaque bytes with no structure imposed
/// by this crate; rendered as hex.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(#[serde(with = "serde_bytes")] Vec<u8>);

impl TargetId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        TargetId(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to a hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        TargetId(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for TargetId {
    fn from(bytes: Vec<u8>) -> Self {
        TargetId(bytes)
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", self.to_hex())
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_id_rejects_empty() {
        assert_eq!(SignerId::new(""), Err(IdentityError::EmptySignerId));
        assert!(SignerId::new("did:key:zAlice").is_ok());
    }

    #[test]
    fn test_target_id_hex_rendering() {
        let target = TargetId::from("mint");
        assert_eq!(target.to_hex(), "6d696e74");
        assert_eq!(format!("{}", target), "6d696e74");
    }

    #[test]
    fn test_signer_id_serde_round_trip() {
        let signer = SignerId::new("did:key:zAlice").unwrap();
        let json = serde_json::to_string(&signer).unwrap();
        let back: SignerId = serde_json::from_str(&json).unwrap();
        assert_eq!(signer, back);
    }
}
