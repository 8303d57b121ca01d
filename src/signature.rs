use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::codec::ValueCodec;
use crate::error::{Error, Result};

// GLib refuses to construct type strings nested deeper than this; staying
// within the same limit keeps the recursive parser off unbounded stacks.
const MAX_DEPTH: usize = 128;

/// A GVariant type signature
///
/// Describes a type in the GVariant type system with a compact ASCII string:
///
/// | string | type |
/// |--------|------|
/// | `"i"` | a single 32-bit integer |
/// | `"ai"` | an array of 32-bit integers |
/// | `"(bbb(sai))"` | a structure of three booleans and a nested structure of a string and an array of 32-bit integers |
///
/// Parsing compiles the string into a [`ValueCodec`] tree that can decode
/// and encode values of the described type; the original string is kept so
/// that `to_string` reproduces it exactly. Two signatures are equal iff
/// their strings are equal.
///
/// # Examples
///
/// ```
/// use gvariant_codec::codec::Codec;
/// use gvariant_codec::{Endian, Signature, Value};
///
/// let signature = Signature::parse("mi").unwrap();
/// assert_eq!(signature.to_string(), "mi");
///
/// let value = signature.codec().decode(&[9, 0, 0, 0], Endian::Little).unwrap();
/// assert_eq!(value, Value::Maybe(Some(Box::new(Value::I32(9)))));
/// ```
#[derive(Clone)]
pub struct Signature {
    text: String,
    codec: ValueCodec,
}

impl Signature {
    /// Parse a signature string
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        let mut parser = Parser { bytes, position: 0 };
        let codec = parser.parse_type(0)?;

        if parser.position != bytes.len() {
            return Err(Error::Signature(
                "trailing characters after the type".to_string(),
                parser.position,
            ));
        }

        Ok(Self {
            text: text.to_string(),
            codec,
        })
    }

    /// Parse a signature from raw bytes, e.g. the tail of variant data
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            Error::Signature(
                "signature is not valid UTF-8".to_string(),
                err.valid_up_to(),
            )
        })?;

        Self::parse(text)
    }

    /// The codec for values of the described type
    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    /// The signature string
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signature").field(&self.text).finish()
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn next(&mut self) -> Result<u8> {
        let byte = self.peek().ok_or_else(|| {
            Error::Signature("unexpected end of signature".to_string(), self.position)
        })?;
        self.position += 1;
        Ok(byte)
    }

    fn parse_type(&mut self, depth: usize) -> Result<ValueCodec> {
        if depth > MAX_DEPTH {
            return Err(Error::Signature(
                "signature is nested too deeply".to_string(),
                self.position,
            ));
        }

        let start = self.position;
        let byte = self.next()?;
        Ok(match byte {
            b'b' => ValueCodec::Bool,
            b'y' => ValueCodec::U8,
            b'n' => ValueCodec::I16,
            b'q' => ValueCodec::U16,
            b'i' => ValueCodec::I32,
            b'u' => ValueCodec::U32,
            b'x' => ValueCodec::I64,
            b't' => ValueCodec::U64,
            b'd' => ValueCodec::F64,
            b's' | b'o' | b'g' => ValueCodec::Str,
            b'v' => ValueCodec::Variant,
            b'm' => ValueCodec::Maybe(Box::new(self.parse_type(depth + 1)?)),
            b'a' => {
                if self.peek() == Some(b'{') {
                    self.position += 1;
                    let (key, value) = self.parse_entry_types(depth + 1)?;
                    ValueCodec::Dict(key, value)
                } else {
                    ValueCodec::Array(Box::new(self.parse_type(depth + 1)?))
                }
            }
            b'(' => ValueCodec::Tuple(self.parse_group_types(depth + 1)?),
            b'{' => {
                let (key, value) = self.parse_entry_types(depth + 1)?;
                ValueCodec::DictEntry(key, value)
            }
            other => {
                return Err(Error::Signature(
                    format!("unknown signature byte {:?}", other as char),
                    start,
                ));
            }
        })
    }

    fn parse_group_types(&mut self, depth: usize) -> Result<Vec<ValueCodec>> {
        let mut components = Vec::new();
        loop {
            match self.peek() {
                Some(b')') => {
                    self.position += 1;
                    return Ok(components);
                }
                Some(_) => components.push(self.parse_type(depth)?),
                None => {
                    return Err(Error::Signature(
                        "unterminated structure type".to_string(),
                        self.position,
                    ));
                }
            }
        }
    }

    fn parse_entry_types(&mut self, depth: usize) -> Result<(Box<ValueCodec>, Box<ValueCodec>)> {
        let start = self.position;
        let mut components = Vec::new();
        loop {
            match self.peek() {
                Some(b'}') => {
                    self.position += 1;
                    break;
                }
                Some(_) => components.push(self.parse_type(depth)?),
                None => {
                    return Err(Error::Signature(
                        "unterminated dictionary entry type".to_string(),
                        self.position,
                    ));
                }
            }
        }

        match <[ValueCodec; 2]>::try_from(components) {
            Ok([key, value]) => Ok((Box::new(key), Box::new(value))),
            Err(components) => Err(Error::Signature(
                format!(
                    "dictionary entry type with {} components, expected 2",
                    components.len()
                ),
                start,
            )),
        }
    }
}
