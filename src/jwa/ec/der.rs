//! ECDSA signature format conversion
//!
//! The crypto primitive emits and consumes ASN.1 DER sequences of the
//! two signature integers `(r, s)`, while tokens embed the fixed-width
//! IEEE P1363 form: both integers as unsigned big-endian values, each
//! left-padded to the curve's component width, concatenated. The
//! decoder works on attacker-controlled bytes, so every read is bounds
//! checked.

use crate::error::{self, InvalidSignatureEncoding};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, InvalidSignatureEncoding> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or(error::invalid_signature_encoding("truncated DER input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], InvalidSignatureEncoding> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(error::invalid_signature_encoding("truncated DER input"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Reads a DER length octet, or the one- or two-byte long form
    /// (signatures never exceed a two-byte length).
    fn length(&mut self) -> Result<usize, InvalidSignatureEncoding> {
        match self.byte()? {
            n if n < 0x80 => Ok(usize::from(n)),
            0x81 => Ok(usize::from(self.byte()?)),
            0x82 => {
                let high = self.byte()?;
                let low = self.byte()?;
                Ok(usize::from(high) << 8 | usize::from(low))
            }
            _ => Err(error::invalid_signature_encoding(
                "unsupported DER length form",
            )),
        }
    }

    /// Reads one INTEGER field and normalizes it to `component_len`
    /// unsigned big-endian bytes.
    fn integer(&mut self, component_len: usize) -> Result<Vec<u8>, InvalidSignatureEncoding> {
        if self.byte()? != INTEGER_TAG {
            return Err(error::invalid_signature_encoding("expected DER integer"));
        }

        let len = self.length()?;
        if len == 0 {
            return Err(error::invalid_signature_encoding("empty DER integer"));
        }

        let mut bytes = self.take(len)?;

        // A leading zero is only sign padding for a value with the high
        // bit set; drop it before width normalization.
        if bytes.len() > 1 && bytes[0] == 0x00 {
            bytes = &bytes[1..];
        }

        if bytes.len() > component_len {
            return Err(error::invalid_signature_encoding(
                "integer wider than the signature component",
            ));
        }

        let mut fixed = vec![0; component_len - bytes.len()];
        fixed.extend_from_slice(bytes);
        Ok(fixed)
    }
}

/// Converts a DER-encoded ECDSA signature into the fixed-width form
///
/// `component_len` is half the fixed signature width: 32, 48, or 66
/// bytes for the P-256, P-384, and P-521 curves respectively.
///
/// # Errors
///
/// Returns an error if the input is not a DER SEQUENCE of exactly two
/// INTEGERs, or if either integer is wider than `component_len`.
pub fn der_to_fixed(
    der: &[u8],
    component_len: usize,
) -> Result<Vec<u8>, InvalidSignatureEncoding> {
    let mut reader = Reader::new(der);

    if reader.byte()? != SEQUENCE_TAG {
        return Err(error::invalid_signature_encoding("expected DER sequence"));
    }

    let content_len = reader.length()?;
    if content_len != reader.remaining() {
        return Err(error::invalid_signature_encoding(
            "DER sequence length mismatch",
        ));
    }

    let r = reader.integer(component_len)?;
    let s = reader.integer(component_len)?;

    if reader.remaining() != 0 {
        return Err(error::invalid_signature_encoding(
            "trailing bytes after DER sequence",
        ));
    }

    let mut fixed = r;
    fixed.extend_from_slice(&s);
    Ok(fixed)
}

/// Converts a fixed-width ECDSA signature into its DER encoding
///
/// # Errors
///
/// Returns an error if the input is not exactly `2 * component_len`
/// bytes long.
pub fn fixed_to_der(
    fixed: &[u8],
    component_len: usize,
) -> Result<Vec<u8>, InvalidSignatureEncoding> {
    if fixed.len() != component_len * 2 {
        return Err(error::invalid_signature_encoding(
            "invalid fixed-width signature length",
        ));
    }

    let (r, s) = fixed.split_at(component_len);
    let r = encode_integer(r);
    let s = encode_integer(s);

    let content_len = r.len() + s.len();
    let mut der = Vec::with_capacity(content_len + 3);
    der.push(SEQUENCE_TAG);
    if content_len < 0x80 {
        der.push(content_len as u8);
    } else {
        // P-521 signatures exceed the short length form.
        der.push(0x81);
        der.push(content_len as u8);
    }
    der.extend_from_slice(&r);
    der.extend_from_slice(&s);
    Ok(der)
}

fn encode_integer(component: &[u8]) -> Vec<u8> {
    let mut bytes = component;
    while bytes.len() > 1 && bytes[0] == 0x00 {
        bytes = &bytes[1..];
    }

    // An unsigned value with the high bit set needs a zero prefix to
    // keep DER's two's-complement reading positive.
    let prefix = usize::from(bytes[0] & 0x80 != 0);

    let mut out = Vec::with_capacity(2 + prefix + bytes.len());
    out.push(INTEGER_TAG);
    out.push((bytes.len() + prefix) as u8);
    if prefix == 1 {
        out.push(0x00);
    }
    out.extend_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn converts_a_known_signature() {
        // r = 0x01, s has its high bit set and needs sign padding
        let der = [
            0x30, 0x08, // SEQUENCE, 8 bytes
            0x02, 0x01, 0x01, // INTEGER r = 1
            0x02, 0x03, 0x00, 0x80, 0x01, // INTEGER s = 0x8001, sign-padded
        ];

        let fixed = der_to_fixed(&der, 4).unwrap();
        assert_eq!(fixed, [0, 0, 0, 1, 0, 0, 0x80, 0x01]);

        let round_tripped = fixed_to_der(&fixed, 4).unwrap();
        assert_eq!(round_tripped, der);
    }

    #[test]
    fn zero_components_survive() {
        let fixed = [0u8; 8];
        let der = fixed_to_der(&fixed, 4).unwrap();
        assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]);
        assert_eq!(der_to_fixed(&der, 4).unwrap(), fixed);
    }

    #[test]
    fn rejects_wrong_fixed_length() {
        assert!(fixed_to_der(&[0u8; 63], 32).is_err());
        assert!(fixed_to_der(&[0u8; 65], 32).is_err());
        assert!(fixed_to_der(&[], 32).is_err());
    }

    #[test]
    fn rejects_bad_der_framing() {
        // not a sequence
        assert!(der_to_fixed(&[0x02, 0x01, 0x01], 32).is_err());
        // sequence length overruns the buffer
        assert!(der_to_fixed(&[0x30, 0x10, 0x02, 0x01, 0x01], 32).is_err());
        // first field is not an integer
        assert!(der_to_fixed(&[0x30, 0x03, 0x04, 0x01, 0x01], 32).is_err());
        // only one integer
        assert!(der_to_fixed(&[0x30, 0x03, 0x02, 0x01, 0x01], 32).is_err());
        // empty input
        assert!(der_to_fixed(&[], 32).is_err());
    }

    #[test]
    fn rejects_oversized_components() {
        let mut der = vec![0x30, 0x0a, 0x02, 0x05];
        der.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        // r is five bytes, the component width is four
        assert!(der_to_fixed(&der, 4).is_err());
    }

    #[test]
    fn long_form_sequence_lengths_round_trip() {
        // P-521-sized components force the sequence into the 0x81 length
        // form.
        let mut fixed = vec![0xff; 132];
        fixed[0] = 0x7f;
        let der = fixed_to_der(&fixed, 66).unwrap();
        assert_eq!(der[1], 0x81);
        assert_eq!(der_to_fixed(&der, 66).unwrap(), fixed);
    }

    proptest! {
        #[test]
        fn round_trips_at_every_component_width(
            r in proptest::collection::vec(any::<u8>(), 1..=66),
            s in proptest::collection::vec(any::<u8>(), 1..=66),
            component_len in prop_oneof![Just(32usize), Just(48), Just(66)],
        ) {
            let mut fixed = vec![0u8; component_len * 2];
            let r_len = r.len().min(component_len);
            let s_len = s.len().min(component_len);
            fixed[component_len - r_len..component_len].copy_from_slice(&r[..r_len]);
            fixed[component_len * 2 - s_len..].copy_from_slice(&s[..s_len]);

            let der = fixed_to_der(&fixed, component_len).unwrap();
            prop_assert_eq!(der_to_fixed(&der, component_len).unwrap(), fixed);
        }
    }
}
