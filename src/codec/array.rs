use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::{Error, Result};
use crate::framing::{align_offset, choose_offset_size, offset_size, pad_to, read_offset, write_offset};

/// Codec for arrays `a?` over a homogeneous element type
///
/// Arrays of fixed-size elements are stored back to back with no framing.
/// Arrays of variable-width elements carry a trailer of framing offsets,
/// one per element, from which the element count and boundaries are
/// recovered at decode time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayCodec<C> {
    element: C,
}

impl<C> ArrayCodec<C> {
    /// Create an array codec from the element codec
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<C: Codec> Codec for ArrayCodec<C> {
    type Value = Vec<C::Value>;

    fn alignment(&self) -> usize {
        self.element.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        None
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        decode_elements(
            data,
            self.element.alignment(),
            self.element.fixed_size(),
            |slice| self.element.decode(slice, endian),
        )
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        encode_elements(
            out,
            self.element.alignment(),
            self.element.fixed_size(),
            value.len(),
            |index, out| self.element.encode_to(&value[index], out, endian),
        )
    }
}

/// Walk the elements of a serialized array.
///
/// Shared by [`ArrayCodec`], [`DictCodec`](crate::codec::DictCodec) and the
/// dynamic codec tree.
pub(crate) fn decode_elements<T>(
    data: &[u8],
    alignment: usize,
    element_size: Option<usize>,
    mut decode_element: impl FnMut(&[u8]) -> Result<T>,
) -> Result<Vec<T>> {
    if let Some(size) = element_size {
        // Fixed-size elements are stored back to back.
        if data.len() % size != 0 {
            return Err(Error::Malformed(format!(
                "array length {} is not a multiple of the element size {size}",
                data.len()
            )));
        }

        let mut elements = Vec::with_capacity(data.len() / size);
        for chunk in data.chunks_exact(size) {
            elements.push(decode_element(chunk)?);
        }
        return Ok(elements);
    }

    if data.is_empty() {
        return Ok(Vec::new());
    }

    // Variable-width elements end in a vector of framing offsets. The last
    // offset doubles as the end of the element payload, which determines the
    // element count.
    let width = offset_size(data.len());
    let last_offset = read_offset(data, data.len() - width, width)?;
    if last_offset > data.len() {
        return Err(Error::Malformed(
            "array framing offsets inconsistent with data length".to_string(),
        ));
    }

    let count = (data.len() - last_offset) / width;
    let mut elements = Vec::with_capacity(count);
    let mut position = 0;
    for index in 0..count {
        let end = read_offset(data, last_offset + index * width, width)?;
        let slice = data.get(position..end).ok_or_else(|| {
            Error::Malformed("array framing offsets out of order".to_string())
        })?;
        elements.push(decode_element(slice)?);
        position = align_offset(end, alignment);
    }

    Ok(elements)
}

/// Append `count` array elements, framing them if they are variable-width.
pub(crate) fn encode_elements(
    out: &mut Vec<u8>,
    alignment: usize,
    element_size: Option<usize>,
    count: usize,
    mut encode_element: impl FnMut(usize, &mut Vec<u8>) -> Result<()>,
) -> Result<()> {
    if element_size.is_some() {
        for index in 0..count {
            encode_element(index, out)?;
        }
        return Ok(());
    }

    let start = out.len();
    let mut ends = Vec::with_capacity(count);
    for index in 0..count {
        pad_to(out, start, alignment);
        encode_element(index, out)?;
        ends.push(out.len() - start);
    }

    let width = choose_offset_size(out.len() - start, ends.len())?;
    for end in ends {
        write_offset(out, end, width);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{BoolCodec, I32Codec, StrCodec, U8Codec};
    use crate::test::assert_bytes_eq;
    use matches::assert_matches;
    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn booleans() {
        let codec = ArrayCodec::new(BoolCodec);
        let data = [0x01, 0x00, 0x00, 0x01, 0x01];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(decoded, vec![true, false, false, true, true]);
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "boolean array",
        );
    }

    #[test]
    fn bytes() {
        let codec = ArrayCodec::new(U8Codec);
        let data = [0x04, 0x05, 0x06, 0x07];
        assert_eq!(
            codec.decode(&data, Endian::Big).unwrap(),
            vec![4, 5, 6, 7]
        );
    }

    #[test]
    fn integers() {
        let codec = ArrayCodec::new(I32Codec);
        let data = [0x04, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(decoded, vec![4, 258]);
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "integer array",
        );
    }

    #[test]
    fn strings() {
        let codec = ArrayCodec::new(StrCodec);
        let data = [
            0x69, 0x00, 0x63, 0x61, 0x6E, 0x00, 0x68, 0x61, 0x73, 0x00, 0x73, 0x74, 0x72, 0x69,
            0x6E, 0x67, 0x73, 0x3F, 0x00, 0x02, 0x06, 0x0a, 0x13,
        ];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(decoded, vec!["i", "can", "has", "strings?"]);
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "string array",
        );
    }

    #[test]
    fn empty() {
        let fixed = ArrayCodec::new(I32Codec);
        assert_eq!(fixed.decode(&[], Endian::Little).unwrap(), Vec::<i32>::new());
        assert!(fixed.encode(&Vec::new(), Endian::Little).unwrap().is_empty());

        let variable = ArrayCodec::new(StrCodec);
        assert_eq!(
            variable.decode(&[], Endian::Little).unwrap(),
            Vec::<String>::new()
        );
        assert!(variable
            .encode(&Vec::new(), Endian::Little)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn length_mismatch() {
        let codec = ArrayCodec::new(I32Codec);
        assert_matches!(
            codec.decode(&[0, 0, 0, 0, 0], Endian::Little),
            Err(Error::Malformed(_))
        );
    }

    #[test]
    fn inconsistent_offsets() {
        let codec = ArrayCodec::new(StrCodec);
        // Last framing offset points past the end of the data
        assert_matches!(
            codec.decode(&[0x61, 0x00, 0x09], Endian::Little),
            Err(Error::Malformed(_))
        );
        // Offsets going backwards
        assert_matches!(
            codec.decode(&[0x61, 0x00, 0x62, 0x00, 0x04, 0x02], Endian::Little),
            Err(Error::Malformed(_))
        );
    }
}
