//! Node and message identifiers
//!
//! Message identifiers are 128-bit random values rendered in the familiar
//! 8-4-4-4-12 hex grouping, with the version nibble fixed to `4` and the
//! variant bits fixed to `10`. Uniqueness rests on statistical improbability
//! of collision across the small population of concurrently flooding nodes,
//! not on cryptographic guarantees - callers supply a plain (non-CSPRNG)
//! random source seeded at node start.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier of the node that originated a message's content.
///
/// Free-form operator-assigned string (e.g. `"field-7"`); it travels in the
/// message itself and is never used for routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Get the node ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Globally unique message identifier, generated once at message origin.
///
/// Immutable after generation; relays carry it verbatim. Equality and
/// hashing are over the textual form, which is what the dedup cache keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a fresh identifier from the given random source.
    ///
    /// 16 random bytes with the version nibble forced to `4` and the
    /// variant bits to `10`, formatted as 8-4-4-4-12 lowercase hex.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        Self(format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3],
            bytes[4], bytes[5],
            bytes[6], bytes[7],
            bytes[8], bytes[9],
            bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
        ))
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_id_layout() {
        let mut rng = SmallRng::seed_from_u64(7);
        let id = MessageId::generate(&mut rng);
        let s = id.as_str();

        assert_eq!(s.len(), 36);
        for (i, c) in s.char_indices() {
            match i {
                8 | 13 | 18 | 23 => assert_eq!(c, '-', "hyphen expected at {}", i),
                _ => assert!(c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            }
        }

        // Version nibble and variant bits are fixed
        assert_eq!(&s[14..15], "4");
        let variant = s.as_bytes()[19];
        assert!(matches!(variant, b'8' | b'9' | b'a' | b'b'));
    }

    #[test]
    fn test_no_collisions_over_ten_thousand_ids() {
        let mut rng = SmallRng::from_entropy();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(
                seen.insert(MessageId::generate(&mut rng)),
                "generated id collided"
            );
        }
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId::from("field-7");
        assert_eq!(id.to_string(), "field-7");
        assert_eq!(id.as_str(), "field-7");
    }
}
