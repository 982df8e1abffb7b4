use icn_multisig_types::SignerId;
use std::collections::HashSet;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from mutating the in-memory signer registry
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("required signatures {required} exceeds member count {members}")]
    RequiredExceedsMembers { required: usize, members: usize },

    #[error("signer {0} is already a member")]
    AlreadyMember(SignerId),

    #[error("signer {0} is not a member")]
    NotMember(SignerId),
}

/// Membership queries consumed by the quorum engine.
///
/// Implementations must answer with live values on every call: authorization
/// is checked per-call and the required count is read whenever a new
/// operation is created, so governance changes take effect for the next
/// proposal without touching in-flight ones.
pub trait SignerRegistry: Send + Sync {
    /// Whether the candidate is currently an authorized signer
    fn is_authorized(&self, signer: &SignerId) -> bool;

    /// Number of distinct confirmations currently required to resolve a
    /// newly created operation
    fn required_signatures(&self) -> usize;
}

/// In-memory membership registry.
///
/// Interior mutability lets external governance add and remove members while
/// the engine holds a shared handle. Mutations keep the required count
/// consistent with the member count, mirroring how membership governance
/// lowers the requirement when a member is removed.
#[derive(Debug, Default)]
pub struct InMemorySignerRegistry {
    inner: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    members: HashSet<SignerId>,
    required: usize,
}

impl InMemorySignerRegistry {
    pub fn new() -> Self {
        InMemorySignerRegistry::default()
    }

    /// Create a registry with the given members and required count
    pub fn with_members(
        members: impl IntoIterator<Item = SignerId>,
        required: usize,
    ) -> Result<Self, RegistryError> {
        let members: HashSet<SignerId> = members.into_iter().collect();
        if required > members.len() {
            return Err(RegistryError::RequiredExceedsMembers {
                required,
                members: members.len(),
            });
        }
        Ok(InMemorySignerRegistry {
            inner: RwLock::new(RegistryState { members, required }),
        })
    }

    pub fn add_signer(&self, signer: SignerId) -> Result<(), RegistryError> {
        let mut state = self.write();
        if !state.members.insert(signer.clone()) {
            return Err(RegistryError::AlreadyMember(signer));
        }
        Ok(())
    }

    /// Remove a member. The required count is clamped to the remaining
    /// member count so the registry can never demand more confirmations
    /// than there are signers.
    pub fn remove_signer(&self, signer: &SignerId) -> Result<(), RegistryError> {
        let mut state = self.write();
        if !state.members.remove(signer) {
            return Err(RegistryError::NotMember(signer.clone()));
        }
        if state.required > state.members.len() {
            state.required = state.members.len();
        }
        Ok(())
    }

    /// Set the required confirmation count. Rejected if it exceeds the
    /// current member count.
    pub fn set_required(&self, required: usize) -> Result<(), RegistryError> {
        let mut state = self.write();
        if required > state.members.len() {
            return Err(RegistryError::RequiredExceedsMembers {
                required,
                members: state.members.len(),
            });
        }
        state.required = required;
        Ok(())
    }

    /// Current members, sorted for deterministic output
    pub fn members(&self) -> Vec<SignerId> {
        let state = self.read();
        let mut members: Vec<SignerId> = state.members.iter().cloned().collect();
        members.sort();
        members
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SignerRegistry for InMemorySignerRegistry {
    fn is_authorized(&self, signer: &SignerId) -> bool {
        self.read().members.contains(signer)
    }

    fn required_signatures(&self) -> usize {
        self.read().required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(id: &str) -> SignerId {
        SignerId::new(id).unwrap()
    }

    #[test]
    fn test_required_cannot_exceed_members() {
        let registry = InMemorySignerRegistry::new();
        registry.add_signer(signer("zAlice")).unwrap();
        assert_eq!(
            registry.set_required(2),
            Err(RegistryError::RequiredExceedsMembers {
                required: 2,
                members: 1
            })
        );
        registry.add_signer(signer("zBob")).unwrap();
        assert!(registry.set_required(2).is_ok());
        assert_eq!(registry.required_signatures(), 2);
    }

    #[test]
    fn test_removing_member_clamps_required() {
        let registry = InMemorySignerRegistry::with_members(
            vec![signer("zAlice"), signer("zBob"), signer("zCarol")],
            3,
        )
        .unwrap();
        registry.remove_signer(&signer("zCarol")).unwrap();
        assert_eq!(registry.required_signatures(), 2);
        assert!(!registry.is_authorized(&signer("zCarol")));
    }

    #[test]
    fn test_duplicate_and_missing_members_rejected() {
        let registry = InMemorySignerRegistry::new();
        registry.add_signer(signer("zAlice")).unwrap();
        assert_eq!(
            registry.add_signer(signer("zAlice")),
            Err(RegistryError::AlreadyMember(signer("zAlice")))
        );
        assert_eq!(
            registry.remove_signer(&signer("zBob")),
            Err(RegistryError::NotMember(signer("zBob")))
        );
    }

    #[test]
    fn test_members_sorted() {
        let registry = InMemorySignerRegistry::with_members(
            vec![signer("zCarol"), signer("zAlice"), signer("zBob")],
            2,
        )
        .unwrap();
        assert_eq!(
            registry.members(),
            vec![signer("zAlice"), signer("zBob"), signer("zCarol")]
        );
    }
}
