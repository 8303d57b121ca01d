//! # Encode and decode GVariant data
//!
//! This crate implements the GVariant binary serialization format: the
//! alignment, padding and framing-offset rules that give every value of a
//! given type a canonical byte layout.
//!
//! Codecs come in two flavors. Statically typed codecs are composed in code
//! from the constructors in [`codec`] and decode straight into Rust types.
//! Dynamically typed data is handled by parsing a type [`Signature`], whose
//! compiled codec decodes into the [`Value`] sum type; this is also how the
//! GVariant `v` type discovers the type of its payload at runtime.
//!
//! ## Examples
//!
//! Decode an array of structures of type `a(si)` with statically typed
//! codecs:
//!
//! ```
//! use gvariant_codec::codec::{ArrayCodec, Codec, I32Codec, StrCodec, TupleCodec};
//! use gvariant_codec::Endian;
//!
//! let codec = ArrayCodec::new(TupleCodec::new((StrCodec, I32Codec)));
//! let data = [
//!     0x68, 0x69, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff, 0x03, 0x00, 0x00, 0x00,
//!     0x62, 0x79, 0x65, 0x00, 0xff, 0xff, 0xff, 0xff, 0x04, 0x09, 0x15,
//! ];
//!
//! let values = codec.decode(&data, Endian::Little).unwrap();
//! assert_eq!(values, vec![("hi".to_string(), -2), ("bye".to_string(), -1)]);
//! assert_eq!(codec.encode(&values, Endian::Little).unwrap(), data);
//! ```
//!
//! Decode dynamically typed data through a signature:
//!
//! ```
//! use gvariant_codec::codec::Codec;
//! use gvariant_codec::{Endian, Signature, Value};
//!
//! let signature = Signature::parse("ai").unwrap();
//! let value = signature
//!     .codec()
//!     .decode(&[9, 0, 0, 0, 255, 0, 0, 0], Endian::Little)
//!     .unwrap();
//! assert_eq!(value, Value::Array(vec![Value::I32(9), Value::I32(255)]));
//! ```

#![warn(missing_docs)]

pub mod codec;

mod error;
mod framing;
mod signature;
mod value;

pub use codec::Endian;
pub use error::{Error, Result};
pub use signature::Signature;
pub use value::{Value, Variant};
