//! The codec family implementing the GVariant wire format
//!
//! Every GVariant type is handled by a *codec*: a stateless value that knows
//! the type's alignment, its fixed size (if the wire layout has one), and
//! how to decode from and encode to the serialized form. Codecs compose:
//! [`ArrayCodec`], [`MaybeCodec`], [`TupleCodec`], [`DictEntryCodec`] and
//! [`DictCodec`] wrap element codecs, and the combinators
//! ([`Codec::with_byte_order`], [`Codec::map`], [`Codec::contramap`],
//! [`PredicateCodec`]) decorate existing ones.
//!
//! [`ValueCodec`] is the untyped counterpart a [`Signature`](crate::Signature)
//! compiles to; it decodes into the dynamic [`Value`](crate::Value) type.
//!
//! # Examples
//!
//! Binding a structure type to a Rust struct with [`Codec::map`]:
//!
//! ```
//! use gvariant_codec::codec::{Codec, I32Codec, StrCodec, TupleCodec};
//! use gvariant_codec::Endian;
//!
//! #[derive(Debug, PartialEq)]
//! struct Entry {
//!     name: String,
//!     count: i32,
//! }
//!
//! // "(si)"
//! let codec = TupleCodec::new((StrCodec, I32Codec)).map(
//!     |(name, count)| Entry { name, count },
//!     |entry: &Entry| (entry.name.clone(), entry.count),
//! );
//!
//! let data = [0x66, 0x6F, 0x6F, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x04];
//! let entry = codec.decode(&data, Endian::Little).unwrap();
//! assert_eq!(
//!     entry,
//!     Entry {
//!         name: "foo".to_string(),
//!         count: -1
//!     }
//! );
//! assert_eq!(codec.encode(&entry, Endian::Little).unwrap(), data);
//! ```

use crate::error::Result;

mod array;
mod combinator;
mod dict;
mod dynamic;
mod maybe;
mod primitive;
mod tuple;
mod variant;

pub use array::ArrayCodec;
pub use combinator::{ByteOrdered, Contramapped, EncodeBranch, Mapped, PredicateCodec};
pub use dict::DictCodec;
pub use dynamic::ValueCodec;
pub use maybe::MaybeCodec;
pub use primitive::{
    BoolCodec, F64Codec, I16Codec, I32Codec, I64Codec, StrCodec, U16Codec, U32Codec, U64Codec,
    U8Codec,
};
pub use tuple::{DictEntryCodec, TupleCodec};
pub use variant::VariantCodec;

/// The byte order data is decoded from or encoded to
///
/// GVariant does not mandate an order for multi-byte integers; the order is
/// chosen by whoever serialized the data, so the caller has to know it.
/// Every [`Codec::decode`] and [`Codec::encode_to`] call takes an `Endian`
/// argument naming that ambient order, and individual nodes of a codec tree
/// may override it with [`Codec::with_byte_order`]. The primitive codecs
/// dispatch on it; framing offsets are always little-endian and unaffected
/// by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Values encoded in little endian representation
    Little,
    /// Values encoded in big endian representation
    Big,
}

/// A codec for one GVariant type
///
/// Decoding borrows a read-only byte slice whose start and end must
/// correspond to the actual boundaries of the serialized value; the format
/// generally does not allow discovering the end of a value from within.
/// Encoding appends to a byte buffer and never reads caller state.
///
/// The `endian` argument is the ambient byte order of the data. GVariant
/// does not fix one, so the caller has to know how the data was produced;
/// individual nodes of a codec tree may override the ambient order with
/// [`with_byte_order`](Codec::with_byte_order). Framing offsets are always
/// little-endian and unaffected by this choice.
pub trait Codec {
    /// The Rust type this codec decodes to and encodes from
    type Value;

    /// The alignment of the type: 1, 2, 4 or 8
    fn alignment(&self) -> usize;

    /// The fixed wire size of the type, or `None` if the size depends on
    /// the content
    ///
    /// When present, the size is a multiple of [`alignment`](Codec::alignment)
    /// and every encoded value occupies exactly this many bytes.
    fn fixed_size(&self) -> Option<usize>;

    /// Decode the value serialized in `data`
    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value>;

    /// Encode `value` by appending its serialized form to `out`
    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()>;

    /// Encode `value` into a freshly allocated buffer
    fn encode(&self, value: &Self::Value, endian: Endian) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_to(value, &mut out, endian)?;
        Ok(out)
    }

    /// Fix the byte order this codec reads and writes with, ignoring the
    /// ambient order of the surrounding codec tree
    fn with_byte_order(self, endian: Endian) -> ByteOrdered<Self>
    where
        Self: Sized,
    {
        ByteOrdered::new(self, endian)
    }

    /// Derive a codec for `U` by converting decoded values with
    /// `decode_map` and values to encode with `encode_map`
    ///
    /// Alignment and fixed size are inherited. This is the intended way to
    /// bind tuple codecs to domain structs, single bytes to enums, and so
    /// on.
    fn map<U, D, E>(self, decode_map: D, encode_map: E) -> Mapped<Self, D, E>
    where
        Self: Sized,
        D: Fn(Self::Value) -> U,
        E: Fn(&U) -> Self::Value,
    {
        Mapped::new(self, decode_map, encode_map)
    }

    /// Derive a codec that transforms the raw input slice before decoding
    /// and the serialized bytes after encoding
    ///
    /// Alignment and fixed size are inherited. Useful for slicing windows
    /// out of a larger buffer or applying reversible byte transforms; both
    /// transforms return an owned buffer.
    fn contramap<D, E>(self, decode_transform: D, encode_transform: E) -> Contramapped<Self, D, E>
    where
        Self: Sized,
        D: Fn(&[u8]) -> Vec<u8>,
        E: Fn(Vec<u8>) -> Vec<u8>,
    {
        Contramapped::new(self, decode_transform, encode_transform)
    }
}
