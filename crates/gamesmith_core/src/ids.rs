//! Artifact identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Length of the canonical hyphenated UUID form.
const CANONICAL_LEN: usize = 36;

/// Byte offsets of the hyphens in the canonical form.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Opaque handle for a stored artifact.
///
/// Backed by a random (v4) UUID, so concurrent generations never collide and
/// identifiers cannot be enumerated. The only accepted textual form is the
/// lowercase hyphenated one; anything else (braces, URNs, uppercase, path
/// separators) fails to parse and therefore can never address storage.
///
/// # Examples
///
/// ```
/// use gamesmith_core::ArtifactId;
///
/// let id = ArtifactId::generate();
/// let parsed: ArtifactId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(ArtifactId::parse("../../etc/passwd").is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Strictly parse the canonical textual form.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != CANONICAL_LEN {
            return None;
        }

        let well_formed = s.bytes().enumerate().all(|(i, b)| {
            if HYPHEN_POSITIONS.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
            }
        });
        if !well_formed {
            return None;
        }

        Uuid::parse_str(s).ok().map(Self)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ArtifactId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid artifact identifier: {}", s))
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}
