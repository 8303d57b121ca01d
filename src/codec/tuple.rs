use std::ops::Range;

use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::{Error, Result};
use crate::framing::{align_offset, choose_offset_size, offset_size, pad_to, read_offset, write_offset};

/// The layout-relevant properties of one structure component.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    pub alignment: usize,
    pub fixed_size: Option<usize>,
}

pub(crate) fn max_alignment(fields: &[Field]) -> usize {
    fields.iter().map(|field| field.alignment).max().unwrap_or(1)
}

/// The fixed size of a structure over `fields`, if all components are fixed.
///
/// The empty structure is the unit type and occupies a single byte.
pub(crate) fn fixed_size_of(fields: &[Field]) -> Option<usize> {
    let mut position = 0;
    for field in fields {
        position = align_offset(position, field.alignment) + field.fixed_size?;
    }

    if position == 0 {
        Some(1)
    } else {
        Some(align_offset(position, max_alignment(fields)))
    }
}

/// Require `data` to be exactly `size` bytes long.
pub(crate) fn expect_length(size: usize, data: &[u8]) -> Result<()> {
    if data.len() < size {
        Err(Error::Underflow {
            demanded: size,
            available: data.len(),
        })
    } else if data.len() > size {
        Err(Error::Malformed(format!(
            "expected {size} bytes of fixed-size data, got {}",
            data.len()
        )))
    } else {
        Ok(())
    }
}

/// Locate each component of a serialized structure.
///
/// Fixed-size components follow the running cursor; variable-width ones end
/// at a framing offset read from the back of the slice, except for the last
/// component, which extends to the start of the framing trailer.
pub(crate) fn decode_ranges(data: &[u8], fields: &[Field]) -> Result<Vec<Range<usize>>> {
    let width = offset_size(data.len());
    let mut ranges = Vec::with_capacity(fields.len());
    let mut position = 0;
    let mut offsets_used = 0;

    for (index, field) in fields.iter().enumerate() {
        position = align_offset(position, field.alignment);

        let end = if let Some(size) = field.fixed_size {
            position + size
        } else if index == fields.len() - 1 {
            // The last component never has a framing offset.
            data.len()
                .checked_sub(offsets_used * width)
                .ok_or_else(malformed_trailer)?
        } else {
            let offset_position = data
                .len()
                .checked_sub((1 + offsets_used) * width)
                .ok_or_else(malformed_trailer)?;
            offsets_used += 1;
            read_offset(data, offset_position, width)?
        };

        if end < position || end > data.len() {
            return Err(Error::Malformed(
                "structure component ends outside of its data".to_string(),
            ));
        }

        ranges.push(position..end);
        position = end;
    }

    Ok(ranges)
}

fn malformed_trailer() -> Error {
    Error::Malformed("structure framing offsets inconsistent with data length".to_string())
}

/// Incremental encoder for structure-shaped data.
///
/// Tracks the start of the structure within the output buffer and the
/// framing offsets to be appended, reversed, after the last component.
pub(crate) struct TupleEncoder {
    start: usize,
    ends: Vec<usize>,
}

impl TupleEncoder {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            ends: Vec::new(),
        }
    }

    /// Zero-pad to the component's alignment, relative to the structure start.
    pub fn pad_to(&self, out: &mut Vec<u8>, alignment: usize) {
        pad_to(out, self.start, alignment);
    }

    /// Record the framing offset of a variable-width, non-final component.
    pub fn note_end(&mut self, position: usize) {
        self.ends.push(position - self.start);
    }

    /// Append the framing offsets in reverse order and, for fixed-size
    /// structures, the trailing alignment padding.
    pub fn finish(
        self,
        out: &mut Vec<u8>,
        fixed_size: Option<usize>,
        alignment: usize,
    ) -> Result<()> {
        let width = choose_offset_size(out.len() - self.start, self.ends.len())?;
        for end in self.ends.iter().rev() {
            write_offset(out, *end, width);
        }

        if fixed_size.is_some() {
            pad_to(out, self.start, alignment);
        }

        Ok(())
    }
}

/// Codec for structure types `(…)` over a tuple of component codecs
///
/// The component codecs are given as a tuple, and values decode to a tuple
/// of the component value types; use [`map`](Codec::map) to bind the result
/// to a domain struct. Tuples of up to twelve components are supported; the
/// empty tuple is the unit type, which occupies a single zero byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleCodec<T> {
    components: T,
}

impl<T> TupleCodec<T> {
    /// Create a structure codec from a tuple of component codecs
    pub fn new(components: T) -> Self {
        Self { components }
    }
}

impl Codec for TupleCodec<()> {
    type Value = ();

    fn alignment(&self) -> usize {
        1
    }

    fn fixed_size(&self) -> Option<usize> {
        Some(1)
    }

    fn decode(&self, data: &[u8], _endian: Endian) -> Result<()> {
        expect_length(1, data)
    }

    fn encode_to(&self, _value: &(), out: &mut Vec<u8>, _endian: Endian) -> Result<()> {
        out.push(0);
        Ok(())
    }
}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! tuple_codec {
    ($($component:ident $index:tt),+) => {
        impl<$($component: Codec),+> TupleCodec<($($component,)+)> {
            fn fields(&self) -> [Field; count!($($component)+)] {
                [$(Field {
                    alignment: self.components.$index.alignment(),
                    fixed_size: self.components.$index.fixed_size(),
                }),+]
            }
        }

        impl<$($component: Codec),+> Codec for TupleCodec<($($component,)+)> {
            type Value = ($($component::Value,)+);

            fn alignment(&self) -> usize {
                max_alignment(&self.fields())
            }

            fn fixed_size(&self) -> Option<usize> {
                fixed_size_of(&self.fields())
            }

            fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
                if let Some(size) = self.fixed_size() {
                    expect_length(size, data)?;
                }

                let ranges = decode_ranges(data, &self.fields())?;
                Ok(($(
                    self.components.$index.decode(&data[ranges[$index].clone()], endian)?,
                )+))
            }

            fn encode_to(
                &self,
                value: &Self::Value,
                out: &mut Vec<u8>,
                endian: Endian,
            ) -> Result<()> {
                let last = count!($($component)+) - 1;
                let mut encoder = TupleEncoder::new(out.len());
                $(
                    encoder.pad_to(out, self.components.$index.alignment());
                    self.components.$index.encode_to(&value.$index, out, endian)?;
                    if self.components.$index.fixed_size().is_none() && $index != last {
                        encoder.note_end(out.len());
                    }
                )+
                encoder.finish(out, self.fixed_size(), self.alignment())
            }
        }
    };
}

tuple_codec!(A 0);
tuple_codec!(A 0, B 1);
tuple_codec!(A 0, B 1, C 2);
tuple_codec!(A 0, B 1, C 2, D 3);
tuple_codec!(A 0, B 1, C 2, D 3, E 4);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
tuple_codec!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

/// Codec for dictionary entries `{??}`
///
/// A dictionary entry is laid out exactly like a two-component structure
/// over its key and value; it decodes to a pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictEntryCodec<K, V> {
    tuple: TupleCodec<(K, V)>,
}

impl<K, V> DictEntryCodec<K, V> {
    /// Create a dictionary-entry codec from the key and value codecs
    pub fn new(key: K, value: V) -> Self {
        Self {
            tuple: TupleCodec::new((key, value)),
        }
    }
}

impl<K: Codec, V: Codec> Codec for DictEntryCodec<K, V> {
    type Value = (K::Value, V::Value);

    fn alignment(&self) -> usize {
        self.tuple.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        self.tuple.fixed_size()
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        self.tuple.decode(data, endian)
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        self.tuple.encode_to(value, out, endian)
    }
}
