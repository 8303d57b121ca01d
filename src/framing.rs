//! Alignment and framing-offset arithmetic shared by the composite codecs.
//!
//! Variable-width composites end in a trailer of *framing offsets*: unsigned
//! integers that record where each variable-width component ends. Framing
//! offsets are always stored little-endian, no matter which byte order the
//! component codecs use, and their width is derived from the length of the
//! enclosing byte slice.

use crate::error::{Error, Result};
use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{FromBytes, IntoBytes};

/// Round `offset` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two (it is always 1, 2, 4 or 8 here).
pub(crate) fn align_offset(offset: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (offset + alignment - 1) & !(alignment - 1)
}

/// The framing-offset width used when *decoding* a slice of length `len`.
pub(crate) fn offset_size(len: usize) -> usize {
    if len < 1 << 8 {
        1
    } else if len < 1 << 16 {
        2
    } else {
        4
    }
}

/// The framing-offset width used when *encoding* `offset_count` offsets
/// after a payload of `payload_len` bytes.
///
/// The width is found by trial: the offsets become part of the slice, so a
/// wider offset can push the slice length over the next threshold. A width
/// of 0 is only ever returned when there are no offsets to write.
pub(crate) fn choose_offset_size(payload_len: usize, offset_count: usize) -> Result<usize> {
    if offset_count == 0 {
        return Ok(0);
    }

    for width in [1usize, 2, 4] {
        let total = payload_len as u128 + (width * offset_count) as u128;
        if total < 1u128 << (8 * width) {
            return Ok(width);
        }
    }

    Err(Error::Usage(
        "too many framing offsets for the gvariant format".to_string(),
    ))
}

/// Read the little-endian framing offset of the given width at `pos`.
pub(crate) fn read_offset(data: &[u8], pos: usize, width: usize) -> Result<usize> {
    let bytes = data
        .get(pos..pos + width)
        .ok_or_else(|| Error::Malformed("framing offset outside of data".to_string()))?;

    Ok(match width {
        1 => bytes[0] as usize,
        2 => U16::<LittleEndian>::read_from_bytes(bytes)
            .map_err(|_| Error::Malformed("framing offset outside of data".to_string()))?
            .get() as usize,
        4 => U32::<LittleEndian>::read_from_bytes(bytes)
            .map_err(|_| Error::Malformed("framing offset outside of data".to_string()))?
            .get() as usize,
        _ => unreachable!("framing offsets are 1, 2 or 4 bytes wide"),
    })
}

/// Append a little-endian framing offset of the given width.
pub(crate) fn write_offset(out: &mut Vec<u8>, value: usize, width: usize) {
    match width {
        0 => {}
        1 => out.push(value as u8),
        2 => out.extend_from_slice(U16::<LittleEndian>::new(value as u16).as_bytes()),
        4 => out.extend_from_slice(U32::<LittleEndian>::new(value as u32).as_bytes()),
        _ => unreachable!("framing offsets are 1, 2 or 4 bytes wide"),
    }
}

/// Append zero bytes until the position relative to `start` is aligned.
pub(crate) fn pad_to(out: &mut Vec<u8>, start: usize, alignment: usize) {
    let aligned = align_offset(out.len() - start, alignment);
    out.resize(start + aligned, 0);
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn align() {
        assert_eq!(align_offset(0, 8), 0);
        assert_eq!(align_offset(1, 1), 1);
        assert_eq!(align_offset(1, 8), 8);
        assert_eq!(align_offset(8, 8), 8);
        assert_eq!(align_offset(9, 4), 12);
    }

    #[test]
    fn offset_sizes() {
        assert_eq!(offset_size(0), 1);
        assert_eq!(offset_size(255), 1);
        assert_eq!(offset_size(256), 2);
        assert_eq!(offset_size(65535), 2);
        assert_eq!(offset_size(65536), 4);
    }

    #[test]
    fn choose() {
        assert_eq!(choose_offset_size(0, 0).unwrap(), 0);
        assert_eq!(choose_offset_size(1000, 0).unwrap(), 0);
        assert_eq!(choose_offset_size(10, 3).unwrap(), 1);
        // 253 bytes of payload plus two 1-byte offsets stays under 256
        assert_eq!(choose_offset_size(253, 2).unwrap(), 1);
        // 254 bytes no longer does
        assert_eq!(choose_offset_size(254, 2).unwrap(), 2);
        assert_eq!(choose_offset_size(65000, 100).unwrap(), 2);
        let err = choose_offset_size(u32::MAX as usize, 16).unwrap_err();
        assert_matches!(err, crate::Error::Usage(_));
    }

    #[test]
    fn offsets_round_trip() {
        let mut out = Vec::new();
        write_offset(&mut out, 0x12, 1);
        write_offset(&mut out, 0x3456, 2);
        write_offset(&mut out, 0x789abcde, 4);
        assert_eq!(out, [0x12, 0x56, 0x34, 0xde, 0xbc, 0x9a, 0x78]);

        assert_eq!(read_offset(&out, 0, 1).unwrap(), 0x12);
        assert_eq!(read_offset(&out, 1, 2).unwrap(), 0x3456);
        assert_eq!(read_offset(&out, 3, 4).unwrap(), 0x789abcde);

        let err = read_offset(&out, 6, 2).unwrap_err();
        assert_matches!(err, crate::Error::Malformed(_));
    }

    #[test]
    fn padding() {
        let mut out = vec![0xff, 0xff];
        pad_to(&mut out, 2, 8);
        assert_eq!(out.len(), 2);
        out.push(1);
        pad_to(&mut out, 2, 4);
        assert_eq!(out, [0xff, 0xff, 1, 0, 0, 0]);
    }
}
