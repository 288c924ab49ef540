//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers and validated
//! strings that flow through the intake service. Each type checks its format
//! at construction so malformed values are rejected before they reach the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Client identifier newtype wrapper
///
/// Opaque identifier chosen by the front-end for a client. It keys the
/// engagement ledger.
///
/// # Examples
///
/// ```
/// use nova_intake::domain::ids::ClientId;
/// use std::str::FromStr;
///
/// let client_id = ClientId::from_str("client-42").unwrap();
/// assert_eq!(client_id.as_str(), "client-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new ClientId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Client ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the client ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Store-generated document identifier
///
/// Returned by every create operation and carried forward by callers that
/// need to address the exact record they created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid document ID '{s}': {e}"))
    }
}

/// SHA-256 digest in lowercase hexadecimal form
///
/// Always exactly 64 characters from `[0-9a-f]`.
///
/// # Examples
///
/// ```
/// use nova_intake::domain::ids::Sha256Digest;
///
/// let empty = Sha256Digest::new(
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// ).unwrap();
/// assert_eq!(empty.as_str().len(), 64);
/// assert!(Sha256Digest::new("E3B0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Length of a hex-encoded SHA-256 digest
    pub const HEX_LEN: usize = 64;

    /// Creates a digest from its hex form, rejecting anything but 64 lowercase hex chars
    pub fn new(hex: impl Into<String>) -> Result<Self, String> {
        let hex = hex.into();
        if hex.len() != Self::HEX_LEN {
            return Err(format!(
                "SHA-256 digest must be {} hex characters, got {}",
                Self::HEX_LEN,
                hex.len()
            ));
        }
        if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err("SHA-256 digest must be lowercase hexadecimal".to_string());
        }
        Ok(Self(hex))
    }

    /// Hex-encodes a raw 32-byte digest
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Returns the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Sha256Digest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Syntactically valid email address
///
/// Parsing is delegated to the mail transport's address parser so that any
/// address accepted here can also be used as a message header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates an email address, rejecting malformed input
    pub fn new(address: impl Into<String>) -> Result<Self, String> {
        let address = address.into();
        let trimmed = address.trim();
        trimmed
            .parse::<lettre::Address>()
            .map_err(|e| format!("Invalid email address '{trimmed}': {e}"))?;
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(address: EmailAddress) -> Self {
        address.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
