use crate::codec::array::{decode_elements, encode_elements};
use crate::codec::tuple::{
    decode_ranges, expect_length, fixed_size_of, max_alignment, Field, TupleEncoder,
};
use crate::codec::{
    BoolCodec, Codec, F64Codec, I16Codec, I32Codec, I64Codec, StrCodec, U16Codec, U32Codec,
    U64Codec, U8Codec, VariantCodec,
};
use crate::codec::Endian;
use crate::error::{Error, Result};
use crate::value::Value;

/// The untyped codec tree a [`Signature`](crate::Signature) compiles to
///
/// Decodes to and encodes from the dynamic [`Value`] type. The tree mirrors
/// the structure of the signature string; it is what the variant codec uses
/// to decode data whose type is only known at runtime.
///
/// Encoding fails with [`Error::Usage`] when the value's shape does not
/// match the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueCodec {
    /// `b`
    Bool,
    /// `y`
    U8,
    /// `n`
    I16,
    /// `q`
    U16,
    /// `i`
    I32,
    /// `u`
    U32,
    /// `x`
    I64,
    /// `t`
    U64,
    /// `d`
    F64,
    /// `s`, `o` or `g`
    Str,
    /// `m?`
    Maybe(Box<ValueCodec>),
    /// `a?`
    Array(Box<ValueCodec>),
    /// `(…)`
    Tuple(Vec<ValueCodec>),
    /// `{??}`
    DictEntry(Box<ValueCodec>, Box<ValueCodec>),
    /// `a{??}`
    Dict(Box<ValueCodec>, Box<ValueCodec>),
    /// `v`
    Variant,
}

impl ValueCodec {
    fn field(&self) -> Field {
        Field {
            alignment: self.alignment(),
            fixed_size: self.fixed_size(),
        }
    }

    fn fields(components: &[ValueCodec]) -> Vec<Field> {
        components.iter().map(ValueCodec::field).collect()
    }

    fn entry_field(key: &ValueCodec, value: &ValueCodec) -> Field {
        let fields = [key.field(), value.field()];
        Field {
            alignment: max_alignment(&fields),
            fixed_size: fixed_size_of(&fields),
        }
    }

    /// A short name for error messages.
    fn kind(&self) -> &'static str {
        match self {
            ValueCodec::Bool => "boolean",
            ValueCodec::U8 => "byte",
            ValueCodec::I16 => "int16",
            ValueCodec::U16 => "uint16",
            ValueCodec::I32 => "int32",
            ValueCodec::U32 => "uint32",
            ValueCodec::I64 => "int64",
            ValueCodec::U64 => "uint64",
            ValueCodec::F64 => "double",
            ValueCodec::Str => "string",
            ValueCodec::Maybe(_) => "maybe",
            ValueCodec::Array(_) => "array",
            ValueCodec::Tuple(_) => "structure",
            ValueCodec::DictEntry(..) => "dictionary entry",
            ValueCodec::Dict(..) => "dictionary",
            ValueCodec::Variant => "variant",
        }
    }

    fn decode_tuple(components: &[ValueCodec], data: &[u8], endian: Endian) -> Result<Vec<Value>> {
        let fields = Self::fields(components);
        if let Some(size) = fixed_size_of(&fields) {
            expect_length(size, data)?;
        }

        let ranges = decode_ranges(data, &fields)?;
        components
            .iter()
            .zip(ranges)
            .map(|(component, range)| component.decode(&data[range], endian))
            .collect()
    }

    fn encode_tuple(
        components: &[ValueCodec],
        values: &[Value],
        out: &mut Vec<u8>,
        endian: Endian,
    ) -> Result<()> {
        if components.len() != values.len() {
            return Err(Error::Usage(format!(
                "structure value has {} fields, its signature has {}",
                values.len(),
                components.len()
            )));
        }

        if components.is_empty() {
            out.push(0);
            return Ok(());
        }

        let fields = Self::fields(components);
        let last = components.len() - 1;
        let mut encoder = TupleEncoder::new(out.len());
        for (index, (component, value)) in components.iter().zip(values).enumerate() {
            encoder.pad_to(out, component.alignment());
            component.encode_to(value, out, endian)?;
            if component.fixed_size().is_none() && index != last {
                encoder.note_end(out.len());
            }
        }

        encoder.finish(out, fixed_size_of(&fields), max_alignment(&fields))
    }

    fn decode_entry(
        key_codec: &ValueCodec,
        value_codec: &ValueCodec,
        data: &[u8],
        endian: Endian,
    ) -> Result<(Value, Value)> {
        let fields = [key_codec.field(), value_codec.field()];
        if let Some(size) = fixed_size_of(&fields) {
            expect_length(size, data)?;
        }

        let ranges = decode_ranges(data, &fields)?;
        Ok((
            key_codec.decode(&data[ranges[0].clone()], endian)?,
            value_codec.decode(&data[ranges[1].clone()], endian)?,
        ))
    }

    fn encode_entry(
        key_codec: &ValueCodec,
        value_codec: &ValueCodec,
        key: &Value,
        value: &Value,
        out: &mut Vec<u8>,
        endian: Endian,
    ) -> Result<()> {
        let fields = [key_codec.field(), value_codec.field()];
        let mut encoder = TupleEncoder::new(out.len());

        encoder.pad_to(out, key_codec.alignment());
        key_codec.encode_to(key, out, endian)?;
        if key_codec.fixed_size().is_none() {
            encoder.note_end(out.len());
        }

        encoder.pad_to(out, value_codec.alignment());
        value_codec.encode_to(value, out, endian)?;

        encoder.finish(out, fixed_size_of(&fields), max_alignment(&fields))
    }
}

impl Codec for ValueCodec {
    type Value = Value;

    fn alignment(&self) -> usize {
        match self {
            ValueCodec::Bool | ValueCodec::U8 | ValueCodec::Str => 1,
            ValueCodec::I16 | ValueCodec::U16 => 2,
            ValueCodec::I32 | ValueCodec::U32 => 4,
            ValueCodec::I64 | ValueCodec::U64 | ValueCodec::F64 | ValueCodec::Variant => 8,
            ValueCodec::Maybe(element) | ValueCodec::Array(element) => element.alignment(),
            ValueCodec::Tuple(components) => max_alignment(&Self::fields(components)),
            ValueCodec::DictEntry(key, value) | ValueCodec::Dict(key, value) => {
                key.alignment().max(value.alignment())
            }
        }
    }

    fn fixed_size(&self) -> Option<usize> {
        match self {
            ValueCodec::Bool | ValueCodec::U8 => Some(1),
            ValueCodec::I16 | ValueCodec::U16 => Some(2),
            ValueCodec::I32 | ValueCodec::U32 => Some(4),
            ValueCodec::I64 | ValueCodec::U64 | ValueCodec::F64 => Some(8),
            ValueCodec::Str
            | ValueCodec::Maybe(_)
            | ValueCodec::Array(_)
            | ValueCodec::Dict(..)
            | ValueCodec::Variant => None,
            ValueCodec::Tuple(components) => fixed_size_of(&Self::fields(components)),
            ValueCodec::DictEntry(key, value) => {
                fixed_size_of(&[key.field(), value.field()])
            }
        }
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Value> {
        match self {
            ValueCodec::Bool => BoolCodec.decode(data, endian).map(Value::Bool),
            ValueCodec::U8 => U8Codec.decode(data, endian).map(Value::U8),
            ValueCodec::I16 => I16Codec.decode(data, endian).map(Value::I16),
            ValueCodec::U16 => U16Codec.decode(data, endian).map(Value::U16),
            ValueCodec::I32 => I32Codec.decode(data, endian).map(Value::I32),
            ValueCodec::U32 => U32Codec.decode(data, endian).map(Value::U32),
            ValueCodec::I64 => I64Codec.decode(data, endian).map(Value::I64),
            ValueCodec::U64 => U64Codec.decode(data, endian).map(Value::U64),
            ValueCodec::F64 => F64Codec.decode(data, endian).map(Value::F64),
            ValueCodec::Str => StrCodec.decode(data, endian).map(Value::Str),
            ValueCodec::Maybe(element) => {
                if data.is_empty() {
                    return Ok(Value::Maybe(None));
                }

                let data = if element.fixed_size().is_none() {
                    &data[..data.len() - 1]
                } else {
                    data
                };
                Ok(Value::Maybe(Some(Box::new(element.decode(data, endian)?))))
            }
            ValueCodec::Array(element) => decode_elements(
                data,
                element.alignment(),
                element.fixed_size(),
                |slice| element.decode(slice, endian),
            )
            .map(Value::Array),
            ValueCodec::Tuple(components) => {
                Self::decode_tuple(components, data, endian).map(Value::Tuple)
            }
            ValueCodec::DictEntry(key, value) => {
                let (key, value) = Self::decode_entry(key, value, data, endian)?;
                Ok(Value::DictEntry(Box::new(key), Box::new(value)))
            }
            ValueCodec::Dict(key, value) => {
                let entry = Self::entry_field(key, value);
                let entries = decode_elements(
                    data,
                    entry.alignment,
                    entry.fixed_size,
                    |slice| Self::decode_entry(key, value, slice, endian),
                )?;

                for index in 1..entries.len() {
                    if entries[..index].iter().any(|(key, _)| key == &entries[index].0) {
                        return Err(Error::Malformed(
                            "duplicate dictionary key".to_string(),
                        ));
                    }
                }

                Ok(Value::Dict(entries))
            }
            ValueCodec::Variant => VariantCodec
                .decode(data, endian)
                .map(|variant| Value::Variant(Box::new(variant))),
        }
    }

    fn encode_to(&self, value: &Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        match (self, value) {
            (ValueCodec::Bool, Value::Bool(v)) => BoolCodec.encode_to(v, out, endian),
            (ValueCodec::U8, Value::U8(v)) => U8Codec.encode_to(v, out, endian),
            (ValueCodec::I16, Value::I16(v)) => I16Codec.encode_to(v, out, endian),
            (ValueCodec::U16, Value::U16(v)) => U16Codec.encode_to(v, out, endian),
            (ValueCodec::I32, Value::I32(v)) => I32Codec.encode_to(v, out, endian),
            (ValueCodec::U32, Value::U32(v)) => U32Codec.encode_to(v, out, endian),
            (ValueCodec::I64, Value::I64(v)) => I64Codec.encode_to(v, out, endian),
            (ValueCodec::U64, Value::U64(v)) => U64Codec.encode_to(v, out, endian),
            (ValueCodec::F64, Value::F64(v)) => F64Codec.encode_to(v, out, endian),
            (ValueCodec::Str, Value::Str(v)) => StrCodec.encode_to(v, out, endian),
            (ValueCodec::Maybe(element), Value::Maybe(maybe)) => {
                let Some(inner) = maybe else {
                    return Ok(());
                };

                element.encode_to(inner, out, endian)?;
                if element.fixed_size().is_none() {
                    out.push(0);
                }
                Ok(())
            }
            (ValueCodec::Array(element), Value::Array(values)) => encode_elements(
                out,
                element.alignment(),
                element.fixed_size(),
                values.len(),
                |index, out| element.encode_to(&values[index], out, endian),
            ),
            (ValueCodec::Tuple(components), Value::Tuple(values)) => {
                Self::encode_tuple(components, values, out, endian)
            }
            (ValueCodec::DictEntry(key_codec, value_codec), Value::DictEntry(key, value)) => {
                Self::encode_entry(key_codec, value_codec, key, value, out, endian)
            }
            (ValueCodec::Dict(key_codec, value_codec), Value::Dict(entries)) => {
                let entry = Self::entry_field(key_codec, value_codec);
                encode_elements(
                    out,
                    entry.alignment,
                    entry.fixed_size,
                    entries.len(),
                    |index, out| {
                        let (key, value) = &entries[index];
                        Self::encode_entry(key_codec, value_codec, key, value, out, endian)
                    },
                )
            }
            (ValueCodec::Variant, Value::Variant(variant)) => {
                VariantCodec.encode_to(variant, out, endian)
            }
            (codec, value) => Err(Error::Usage(format!(
                "cannot encode {value:?} as {}",
                codec.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::signature::Signature;
    use crate::test::assert_bytes_eq;
    use matches::assert_matches;
    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    fn codec_for(signature: &str) -> ValueCodec {
        Signature::parse(signature).unwrap().codec().clone()
    }

    #[test]
    fn layout_properties() {
        assert_eq!(codec_for("b").fixed_size(), Some(1));
        assert_eq!(codec_for("(iy)").fixed_size(), Some(8));
        assert_eq!(codec_for("(iy)").alignment(), 4);
        assert_eq!(codec_for("()").fixed_size(), Some(1));
        assert_eq!(codec_for("as").fixed_size(), None);
        assert_eq!(codec_for("{yy}").fixed_size(), Some(2));
        assert_eq!(codec_for("a{sv}").alignment(), 8);
        assert_eq!(codec_for("mt").alignment(), 8);
    }

    #[test]
    fn dynamic_structure() {
        let codec = codec_for("(si)");
        let data = [0x66, 0x6F, 0x6F, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x04];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(
            decoded,
            Value::Tuple(vec![Value::Str("foo".to_string()), Value::I32(-1)])
        );
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "dynamic (si)",
        );
    }

    #[test]
    fn dynamic_dictionary() {
        let codec = codec_for("a{si}");
        let data = [
            0x68, 0x69, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff, 0x03, 0x00, 0x00, 0x00, 0x62, 0x79,
            0x65, 0x00, 0xff, 0xff, 0xff, 0xff, 0x04, 0x09, 0x15,
        ];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(
            decoded,
            Value::Dict(vec![
                (Value::Str("hi".to_string()), Value::I32(-2)),
                (Value::Str("bye".to_string()), Value::I32(-1)),
            ])
        );
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "dynamic a{si}",
        );
    }

    #[test]
    fn dynamic_unit() {
        let codec = codec_for("()");
        assert_eq!(
            codec.decode(&[0x00], Endian::Little).unwrap(),
            Value::Tuple(Vec::new())
        );
        assert_eq!(
            codec
                .encode(&Value::Tuple(Vec::new()), Endian::Little)
                .unwrap(),
            [0x00]
        );
    }

    #[test]
    fn shape_mismatch() {
        let codec = codec_for("i");
        let err = codec
            .encode(&Value::Str("nope".to_string()), Endian::Little)
            .unwrap_err();
        assert_matches!(err, Error::Usage(_));
        assert!(format!("{err}").contains("int32"));

        let codec = codec_for("(ii)");
        let err = codec
            .encode(&Value::Tuple(vec![Value::I32(1)]), Endian::Little)
            .unwrap_err();
        assert_matches!(err, Error::Usage(_));
    }

    #[test]
    fn duplicate_keys() {
        let codec = codec_for("a{yy}");
        // Two entries with the key 1
        let err = codec.decode(&[1, 2, 1, 3], Endian::Little).unwrap_err();
        assert_matches!(err, Error::Malformed(_));
    }
}
