use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::{Error, Result};

/// Require exactly `N` bytes of fixed-size data.
fn fixed_bytes<const N: usize>(data: &[u8]) -> Result<&[u8; N]> {
    data.try_into().map_err(|_| {
        if data.len() < N {
            Error::Underflow {
                demanded: N,
                available: data.len(),
            }
        } else {
            Error::Malformed(format!(
                "expected {N} bytes of fixed-size data, got {}",
                data.len()
            ))
        }
    })
}

/// Codec for the boolean type `b`
///
/// Decoding maps any non-zero byte to `true`; encoding writes 0 or 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn alignment(&self) -> usize {
        1
    }

    fn fixed_size(&self) -> Option<usize> {
        Some(1)
    }

    fn decode(&self, data: &[u8], _endian: Endian) -> Result<bool> {
        Ok(fixed_bytes::<1>(data)?[0] != 0)
    }

    fn encode_to(&self, value: &bool, out: &mut Vec<u8>, _endian: Endian) -> Result<()> {
        out.push(*value as u8);
        Ok(())
    }
}

/// Codec for the unsigned byte type `y`
#[derive(Debug, Clone, Copy, Default)]
pub struct U8Codec;

impl Codec for U8Codec {
    type Value = u8;

    fn alignment(&self) -> usize {
        1
    }

    fn fixed_size(&self) -> Option<usize> {
        Some(1)
    }

    fn decode(&self, data: &[u8], _endian: Endian) -> Result<u8> {
        Ok(fixed_bytes::<1>(data)?[0])
    }

    fn encode_to(&self, value: &u8, out: &mut Vec<u8>, _endian: Endian) -> Result<()> {
        out.push(*value);
        Ok(())
    }
}

macro_rules! number_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $size:literal) => {
        $(#[$meta])*
        ///
        /// Multi-byte values are read and written in the ambient byte order;
        /// wrap the codec with
        /// [`with_byte_order`](crate::codec::Codec::with_byte_order) to pin
        /// one.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Codec for $name {
            type Value = $ty;

            fn alignment(&self) -> usize {
                $size
            }

            fn fixed_size(&self) -> Option<usize> {
                Some($size)
            }

            fn decode(&self, data: &[u8], endian: Endian) -> Result<$ty> {
                let bytes = fixed_bytes::<$size>(data)?;
                Ok(match endian {
                    Endian::Little => <$ty>::from_le_bytes(*bytes),
                    Endian::Big => <$ty>::from_be_bytes(*bytes),
                })
            }

            fn encode_to(&self, value: &$ty, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
                let bytes = match endian {
                    Endian::Little => value.to_le_bytes(),
                    Endian::Big => value.to_be_bytes(),
                };
                out.extend_from_slice(&bytes);
                Ok(())
            }
        }
    };
}

number_codec!(
    /// Codec for the signed 16-bit integer type `n`
    I16Codec,
    i16,
    2
);
number_codec!(
    /// Codec for the unsigned 16-bit integer type `q`
    U16Codec,
    u16,
    2
);
number_codec!(
    /// Codec for the signed 32-bit integer type `i`
    I32Codec,
    i32,
    4
);
number_codec!(
    /// Codec for the unsigned 32-bit integer type `u`
    U32Codec,
    u32,
    4
);
number_codec!(
    /// Codec for the signed 64-bit integer type `x`
    I64Codec,
    i64,
    8
);
number_codec!(
    /// Codec for the unsigned 64-bit integer type `t`
    U64Codec,
    u64,
    8
);
number_codec!(
    /// Codec for the IEEE-754 double type `d`
    F64Codec,
    f64,
    8
);

/// Codec for the string types `s`, `o` and `g`
///
/// The wire form is the UTF-8 bytes of the string followed by a single zero
/// byte. The three signature codes share this layout; the distinction only
/// exists in the signature string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrCodec;

impl Codec for StrCodec {
    type Value = String;

    fn alignment(&self) -> usize {
        1
    }

    fn fixed_size(&self) -> Option<usize> {
        None
    }

    fn decode(&self, data: &[u8], _endian: Endian) -> Result<String> {
        let Some((terminator, bytes)) = data.split_last() else {
            return Err(Error::Malformed(
                "string data is missing its zero terminator".to_string(),
            ));
        };

        if *terminator != 0 {
            return Err(Error::Malformed(
                "string data does not end in a zero byte".to_string(),
            ));
        }

        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn encode_to(&self, value: &String, out: &mut Vec<u8>, _endian: Endian) -> Result<()> {
        out.extend_from_slice(value.as_bytes());
        out.push(0);
        Ok(())
    }
}
