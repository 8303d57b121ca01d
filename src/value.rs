use crate::signature::Signature;

/// A dynamically typed GVariant value
///
/// This is the value representation produced and consumed by the codec a
/// [`Signature`] compiles to ([`ValueCodec`](crate::codec::ValueCodec)).
/// Statically typed codecs built from the constructors in [`crate::codec`]
/// decode into plain Rust types instead.
///
/// Dictionaries are kept as insertion-ordered key/value pair sequences so
/// that re-encoding a decoded dictionary reproduces the original byte order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean, signature `b`
    Bool(bool),
    /// An unsigned byte, signature `y`
    U8(u8),
    /// A signed 16-bit integer, signature `n`
    I16(i16),
    /// An unsigned 16-bit integer, signature `q`
    U16(u16),
    /// A signed 32-bit integer, signature `i`
    I32(i32),
    /// An unsigned 32-bit integer, signature `u`
    U32(u32),
    /// A signed 64-bit integer, signature `x`
    I64(i64),
    /// An unsigned 64-bit integer, signature `t`
    U64(u64),
    /// An IEEE-754 double, signature `d`
    F64(f64),
    /// A string, signature `s`, `o` or `g`
    Str(String),
    /// An optional value, signature `m?`
    Maybe(Option<Box<Value>>),
    /// An ordered sequence of values of one type, signature `a?`
    Array(Vec<Value>),
    /// A positional heterogeneous record, signature `(…)`
    Tuple(Vec<Value>),
    /// A single key/value pair, signature `{??}`
    DictEntry(Box<Value>, Box<Value>),
    /// A mapping with unique keys and preserved insertion order,
    /// signature `a{??}`
    Dict(Vec<(Value, Value)>),
    /// A nested dynamically typed value, signature `v`
    Variant(Box<Variant>),
}

/// A dynamically typed GVariant value paired with the [`Signature`]
/// describing its type
///
/// This is what the `v` codec decodes to: the wire form carries the
/// signature of the contained value, so decoding can reconstruct the full
/// type at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    signature: Signature,
    value: Value,
}

impl Variant {
    /// Pair a value with the signature describing its type.
    ///
    /// The pairing is not checked here; encoding through the
    /// [`VariantCodec`](crate::codec::VariantCodec) fails with
    /// [`Error::Usage`](crate::Error::Usage) if the shapes disagree.
    pub fn new(signature: Signature, value: Value) -> Self {
        Self { signature, value }
    }

    /// The signature describing the type of the contained value
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The contained value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Split the variant into its signature and value
    pub fn into_parts(self) -> (Signature, Value) {
        (self.signature, self.value)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

value_from! {
    bool => Bool,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f64 => F64,
    String => Str,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Variant> for Value {
    fn from(value: Variant) -> Self {
        Self::Variant(Box::new(value))
    }
}

#[cfg(test)]
mod test {
    use super::{Value, Variant};
    use crate::signature::Signature;

    #[test]
    fn from() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(2u8), Value::U8(2));
        assert_eq!(Value::from(-3i16), Value::I16(-3));
        assert_eq!(Value::from(4u16), Value::U16(4));
        assert_eq!(Value::from(-5i32), Value::I32(-5));
        assert_eq!(Value::from(6u32), Value::U32(6));
        assert_eq!(Value::from(-7i64), Value::I64(-7));
        assert_eq!(Value::from(8u64), Value::U64(8));
        assert_eq!(Value::from(3.25f64), Value::F64(3.25));
        assert_eq!(Value::from("hi"), Value::Str("hi".to_string()));
        assert_eq!(
            Value::from("hi".to_string()),
            Value::Str("hi".to_string())
        );
    }

    #[test]
    fn variant_parts() {
        let signature = Signature::parse("i").unwrap();
        let variant = Variant::new(signature.clone(), Value::I32(9));
        assert_eq!(variant.signature(), &signature);
        assert_eq!(variant.value(), &Value::I32(9));

        let value = Value::from(variant.clone());
        let Value::Variant(inner) = value else {
            panic!("expected a variant");
        };
        assert_eq!(*inner, variant);

        let (signature, value) = variant.into_parts();
        assert_eq!(signature.as_str(), "i");
        assert_eq!(value, Value::I32(9));
    }
}
