use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

define_id_type!(NodeId, u64);

/// Globally unique token naming one resource node independently of the numeric id
/// of a particular materialization. Used as the subject of emitted triples.
#[derive(Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    /// Generates a fresh random (v4) token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Identity {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for Identity {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.hyphenated(), f)
    }
}

impl Debug for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::{Identity, NodeId};
    use std::str::FromStr;

    #[test]
    fn test_node_id_unassigned() {
        assert!(!NodeId::default().is_assigned());
        assert_eq!(NodeId::default(), NodeId::UNASSIGNED);
        assert!(NodeId::new(3).is_assigned());
        assert_eq!(NodeId::from_str("42").unwrap().as_num(), 42);
        assert_eq!(NodeId::new(42).to_string(), "42");
        assert_eq!(format!("{:>4}", NodeId::new(7)), "   7");
    }

    #[test]
    fn test_identity_roundtrip_text() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let identity = Identity::from_str(text).unwrap();
        assert_eq!(identity.to_string(), text);
        assert!(Identity::from_str("not-a-token").is_err());
    }

    #[test]
    fn test_identity_generate_unique() {
        assert_ne!(Identity::generate(), Identity::generate());
    }
}
