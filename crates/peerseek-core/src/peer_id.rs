//! Peer identifier parsing.
//!
//! Structural check only: the node remains the authority and rejects ids it
//! cannot decode. Accepted forms:
//!   - base58btc multihash: `Qm…` (sha2-256, 46 chars) or `1…` (identity, e.g. `12D3KooW…`)
//!   - CIDv1 in base32 multibase: `b…`, lower case

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const SHA256_B58_LEN: usize = 46;
const IDENTITY_B58_LEN: std::ops::RangeInclusive<usize> = 40..=60;
const CID_MIN_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeerIdError {
    #[error("Invalid PeerId")]
    Empty,
    #[error("Invalid PeerId: {0}")]
    Malformed(String),
}

/// A validated peer identifier in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerId(String);

impl PeerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PeerId {
    type Err = PeerIdError;

    /// Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PeerIdError::Empty);
        }

        if s.starts_with("Qm") {
            check_base58(s)?;
            if s.len() != SHA256_B58_LEN {
                return Err(PeerIdError::Malformed(format!(
                    "expected {SHA256_B58_LEN} characters, got {}",
                    s.len()
                )));
            }
        } else if s.starts_with('1') {
            check_base58(s)?;
            if !IDENTITY_B58_LEN.contains(&s.len()) {
                return Err(PeerIdError::Malformed(format!(
                    "unexpected length {} for an identity multihash",
                    s.len()
                )));
            }
        } else if let Some(body) = s.strip_prefix('b') {
            if let Some(c) = body
                .chars()
                .find(|c| !(c.is_ascii_lowercase() || ('2'..='7').contains(c)))
            {
                return Err(PeerIdError::Malformed(format!(
                    "'{c}' is not a base32 character"
                )));
            }
            if s.len() < CID_MIN_LEN {
                return Err(PeerIdError::Malformed("CID is too short".into()));
            }
        } else {
            return Err(PeerIdError::Malformed(
                "expected a base58btc multihash or a base32 CID".into(),
            ));
        }

        Ok(PeerId(s.to_string()))
    }
}

fn check_base58(s: &str) -> Result<(), PeerIdError> {
    match s.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
        Some(c) => Err(PeerIdError::Malformed(format!(
            "'{c}' is not a base58btc character"
        ))),
        None => Ok(()),
    }
}

impl TryFrom<String> for PeerId {
    type Error = PeerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeerId> for String {
    fn from(id: PeerId) -> Self {
        id.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
