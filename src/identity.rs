//! The identity carried by a token

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{self, InvalidArgument};

/// An authenticated identity: a required identifier plus arbitrary
/// extra claims
///
/// Instances are immutable once constructed. The extra claim map never
/// contains the key `"id"`; it is held separately and merged back in by
/// [`to_claims()`][Self::to_claims()].
#[derive(Clone, PartialEq, Eq)]
#[must_use]
pub struct Identity {
    id: String,
    extra: Map<String, Value>,
}

impl Identity {
    /// Constructs an identity from its identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidArgument> {
        let id = id.into();
        if id.is_empty() {
            return Err(error::invalid_argument("identity id must not be empty"));
        }

        Ok(Self {
            id,
            extra: Map::new(),
        })
    }

    /// Adds an extra claim, returning the updated identity
    ///
    /// The key `"id"` is reserved for the identifier and is ignored here.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "id" {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Reconstructs an identity from a flat claim map
    ///
    /// The `"id"` entry is removed from the map and becomes the
    /// identifier; everything else is retained as extra claims. Numeric
    /// identifiers are accepted and stringified.
    ///
    /// # Errors
    ///
    /// Returns an error if the map has no usable `"id"` entry.
    pub fn from_claims(mut claims: Map<String, Value>) -> Result<Self, InvalidArgument> {
        let id = match claims.remove("id") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(error::invalid_argument("claim map must contain an 'id'")),
        };

        if id.is_empty() {
            return Err(error::invalid_argument("identity id must not be empty"));
        }

        Ok(Self { id, extra: claims })
    }

    /// The identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up an extra claim by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// The extra claims, excluding the identifier
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Flattens the identity into a claim map, identifier first
    #[must_use]
    pub fn to_claims(&self) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("id".to_owned(), Value::from(self.id.clone()));
        for (key, value) in &self.extra {
            claims.insert(key.clone(), value.clone());
        }
        claims
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_empty_id() {
        assert!(Identity::new("").is_err());
    }

    #[test]
    fn with_claim_ignores_id_key() {
        let identity = Identity::new("user123")
            .unwrap()
            .with_claim("id", "intruder")
            .with_claim("name", "John");

        assert_eq!(identity.id(), "user123");
        assert_eq!(identity.get("id"), None);
        assert_eq!(identity.get("name"), Some(&json!("John")));
    }

    #[test]
    fn from_claims_strips_id() {
        let mut claims = Map::new();
        claims.insert("id".into(), json!("user123"));
        claims.insert("name".into(), json!("John"));

        let identity = Identity::from_claims(claims).unwrap();
        assert_eq!(identity.id(), "user123");
        assert!(!identity.extra().contains_key("id"));
    }

    #[test]
    fn from_claims_accepts_numeric_id() {
        let mut claims = Map::new();
        claims.insert("id".into(), json!(42));

        let identity = Identity::from_claims(claims).unwrap();
        assert_eq!(identity.id(), "42");
    }

    #[test]
    fn from_claims_requires_id() {
        let mut claims = Map::new();
        claims.insert("name".into(), json!("John"));
        assert!(Identity::from_claims(claims).is_err());

        let mut claims = Map::new();
        claims.insert("id".into(), json!(""));
        assert!(Identity::from_claims(claims).is_err());
    }

    #[test]
    fn to_claims_puts_id_first() {
        let identity = Identity::new("user123").unwrap().with_claim("name", "John");
        let claims = identity.to_claims();
        let keys: Vec<_> = claims.keys().cloned().collect();
        assert_eq!(keys, ["id", "name"]);
    }
}
