use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::{Error, Result};
use crate::signature::Signature;
use crate::value::Variant;

/// Codec for the variant type `v`
///
/// A variant stores the serialized inner value, a zero separator byte, and
/// the ASCII signature of the inner type, with no length prefix anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantCodec;

/// Split variant data into its payload and signature parts.
///
/// The payload may itself contain zero bytes, so the separator has to be
/// found by scanning backwards from the end of the slice: the signature
/// grammar never contains a zero byte, which makes the *last* zero byte the
/// separator. This is a requirement of the format, not an optimization.
pub(crate) fn split_variant(data: &[u8]) -> Result<(&[u8], &[u8])> {
    for index in (0..data.len()).rev() {
        if data[index] == 0 {
            return Ok((&data[..index], &data[index + 1..]));
        }
    }

    Err(Error::Malformed(
        "variant data contains no signature separator".to_string(),
    ))
}

impl Codec for VariantCodec {
    type Value = Variant;

    fn alignment(&self) -> usize {
        8
    }

    fn fixed_size(&self) -> Option<usize> {
        None
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Variant> {
        let (payload, signature_bytes) = split_variant(data)?;
        let signature = Signature::parse_bytes(signature_bytes)?;
        let value = signature.codec().decode(payload, endian)?;
        Ok(Variant::new(signature, value))
    }

    fn encode_to(&self, value: &Variant, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        value.signature().codec().encode_to(value.value(), out, endian)?;
        out.push(0);
        out.extend_from_slice(value.signature().as_str().as_bytes());
        Ok(())
    }
}
