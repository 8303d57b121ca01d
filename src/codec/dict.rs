use crate::codec::array::{decode_elements, encode_elements};
use crate::codec::{Codec, DictEntryCodec};
use crate::codec::Endian;
use crate::error::{Error, Result};

/// Codec for dictionaries `a{??}`
///
/// A dictionary is serialized as an array of dictionary entries. Decoding
/// yields the entries as key/value pairs in wire order, which encoding
/// preserves, so canonical input re-encodes byte-identically. Duplicate
/// keys are rejected at decode time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictCodec<K, V> {
    entry: DictEntryCodec<K, V>,
}

impl<K, V> DictCodec<K, V> {
    /// Create a dictionary codec from the key and value codecs
    pub fn new(key: K, value: V) -> Self {
        Self {
            entry: DictEntryCodec::new(key, value),
        }
    }
}

impl<K: Codec, V: Codec> Codec for DictCodec<K, V>
where
    K::Value: PartialEq,
{
    type Value = Vec<(K::Value, V::Value)>;

    fn alignment(&self) -> usize {
        self.entry.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        None
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        let entries = decode_elements(
            data,
            self.entry.alignment(),
            self.entry.fixed_size(),
            |slice| self.entry.decode(slice, endian),
        )?;

        for index in 1..entries.len() {
            if entries[..index]
                .iter()
                .any(|(key, _)| key == &entries[index].0)
            {
                return Err(Error::Malformed(
                    "duplicate dictionary key".to_string(),
                ));
            }
        }

        Ok(entries)
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        encode_elements(
            out,
            self.entry.alignment(),
            self.entry.fixed_size(),
            value.len(),
            |index, out| self.entry.encode_to(&value[index], out, endian),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{I32Codec, StrCodec};
    use crate::test::assert_bytes_eq;
    use matches::assert_matches;
    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn string_to_int() {
        let codec = DictCodec::new(StrCodec, I32Codec);
        let data = [
            0x68, 0x69, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff, 0x03, 0x00, 0x00, 0x00, 0x62, 0x79,
            0x65, 0x00, 0xff, 0xff, 0xff, 0xff, 0x04, 0x09, 0x15,
        ];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(
            decoded,
            vec![("hi".to_string(), -2), ("bye".to_string(), -1)]
        );
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "a{si} dictionary",
        );
    }

    #[test]
    fn empty() {
        let codec = DictCodec::new(StrCodec, I32Codec);
        assert_eq!(codec.decode(&[], Endian::Little).unwrap(), vec![]);
        assert!(codec.encode(&Vec::new(), Endian::Little).unwrap().is_empty());
    }

    #[test]
    fn duplicate_keys() {
        let codec = DictCodec::new(StrCodec, I32Codec);
        let duplicated = vec![("hi".to_string(), -2), ("hi".to_string(), -1)];
        let data = codec.encode(&duplicated, Endian::Little).unwrap();
        assert_matches!(
            codec.decode(&data, Endian::Little),
            Err(Error::Malformed(_))
        );
    }
}
