//! Token segment encoding
//!
//! Every segment of a token is unpadded URL-safe base64; the header and
//! claims segments additionally carry JSON. The underlying base64
//! mechanism is provided by the [`base64`] crate's `URL_SAFE_NO_PAD`
//! engine, which enforces the alphabet and rejects impossible lengths
//! (an encoded length of `4n + 1` can never occur).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::Engine;
use serde_json::{Map, Value};

use crate::error::{self, InvalidBase64, MalformedClaims};

/// Encodes bytes as unpadded URL-safe base64
#[must_use]
pub fn base64url_encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes unpadded URL-safe base64 into bytes
///
/// # Errors
///
/// Returns an error if the input contains bytes outside the URL-safe
/// alphabet or has an impossible length.
pub fn base64url_decode(data: impl AsRef<[u8]>) -> Result<Vec<u8>, InvalidBase64> {
    Ok(URL_SAFE_NO_PAD.decode(data)?)
}

/// Serializes a claim set as JSON
///
/// # Errors
///
/// Returns an error if the claim set cannot be represented as JSON.
pub fn serialize_claims(claims: &Map<String, Value>) -> Result<Vec<u8>, MalformedClaims> {
    serde_json::to_vec(claims).map_err(error::malformed_claims)
}

/// Parses a JSON claim set, requiring an object at the top level
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or the top-level value
/// is not an object.
pub fn parse_claims(data: &[u8]) -> Result<Map<String, Value>, MalformedClaims> {
    let value: Value = serde_json::from_slice(data).map_err(error::malformed_claims)?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(error::malformed_claims("claim set must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_padding() {
        assert_eq!(base64url_encode(b"f"), "Zg");
        assert_eq!(base64url_encode(b"fo"), "Zm8");
        assert_eq!(base64url_encode(b"foo"), "Zm9v");
    }

    #[test]
    fn uses_url_safe_alphabet() {
        let encoded = base64url_encode([0xfb, 0xff, 0xbf]);
        assert_eq!(encoded, "-_-_");
    }

    #[test]
    fn decode_round_trips() {
        let data = b"any carnal pleasure.";
        let decoded = base64url_decode(base64url_encode(data)).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(base64url_decode("+/==").is_err());
    }

    #[test]
    fn decode_rejects_padding() {
        assert!(base64url_decode("Zm8=").is_err());
    }

    #[test]
    fn decode_rejects_impossible_length() {
        // 4n + 1 characters can never be produced by an encoder
        assert!(base64url_decode("Zm9vY").is_err());
    }

    #[test]
    fn parse_claims_requires_top_level_object() {
        assert!(parse_claims(b"[1, 2, 3]").is_err());
        assert!(parse_claims(b"\"scalar\"").is_err());
        assert!(parse_claims(b"not json").is_err());
        assert!(parse_claims(br#"{"id":"x"}"#).is_ok());
    }

    #[test]
    fn claims_round_trip_preserves_order() {
        let mut claims = Map::new();
        claims.insert("zeta".into(), Value::from("z"));
        claims.insert("alpha".into(), Value::from(1));

        let bytes = serialize_claims(&claims).unwrap();
        let parsed = parse_claims(&bytes).unwrap();
        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
