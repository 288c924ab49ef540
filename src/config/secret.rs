//! Secret configuration values
//!
//! Database connection strings and SMTP passwords are held in
//! `secrecy::Secret` so they are zeroed on drop and redacted from `Debug`
//! output. Call `expose_secret()` only at the point of use.
//!
//! ```rust
//! use nova_intake::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("hunter2".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "hunter2");
//! assert!(!format!("{password:?}").contains("hunter2"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<SecretValue> for String {
    fn from(mut s: SecretValue) -> Self {
        std::mem::take(&mut s.0)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Split the secret value by a delimiter
    pub fn split(&self, delimiter: char) -> std::str::Split<'_, char> {
        self.0.split(delimiter)
    }

    /// Parse the secret value into another type
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Zeroizing, Debug-redacted string used for credentials
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional plain string as an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(|s| Secret::new(SecretValue::from(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("postgresql://nova:pw@db/nova".to_string());
        assert!(secret.expose_secret().starts_with("postgresql://"));
        assert_eq!(secret.expose_secret().split('@').last(), Some("db/nova"));
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(None).is_none());
        let secret = secret_string_opt(Some("pw".to_string())).unwrap();
        assert!(secret.expose_secret() == "pw");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("smtp-password".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("smtp-password"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(serde::Deserialize)]
        struct Section {
            smtp_password: SecretString,
        }

        let section: Section = toml::from_str("smtp_password = \"hunter2\"").unwrap();
        assert_eq!(section.smtp_password.expose_secret().as_ref(), "hunter2");
    }

    #[test]
    fn test_secret_value_into_string() {
        let value = SecretValue::from("pw".to_string());
        assert_eq!(String::from(value), "pw");
    }
}
