use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::Result;

/// Codec for the maybe type `m?`
///
/// An absent value occupies zero bytes. A present value is the element's
/// serialized form, followed by a single zero marker byte when the element
/// is variable-width (so that a present empty element stays distinguishable
/// from absence).
#[derive(Debug, Clone, Copy, Default)]
pub struct MaybeCodec<C> {
    element: C,
}

impl<C> MaybeCodec<C> {
    /// Create a maybe codec from the element codec
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<C: Codec> Codec for MaybeCodec<C> {
    type Value = Option<C::Value>;

    fn alignment(&self) -> usize {
        self.element.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        None
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        if data.is_empty() {
            return Ok(None);
        }

        let data = if self.element.fixed_size().is_none() {
            &data[..data.len() - 1]
        } else {
            data
        };

        Ok(Some(self.element.decode(data, endian)?))
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        let Some(element) = value else {
            return Ok(());
        };

        self.element.encode_to(element, out, endian)?;
        if self.element.fixed_size().is_none() {
            out.push(0);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{I32Codec, StrCodec};
    use crate::test::assert_bytes_eq;
    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn of_string() {
        let codec = MaybeCodec::new(StrCodec);
        let data = [
            0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x20, 0x77, 0x6F, 0x72, 0x6C, 0x64, 0x00, 0x00,
        ];
        let decoded = codec.decode(&data, Endian::Little).unwrap();
        assert_eq!(decoded, Some("hello world".to_string()));
        assert_bytes_eq(
            &codec.encode(&decoded, Endian::Little).unwrap(),
            &data,
            "maybe string",
        );
    }

    #[test]
    fn of_int() {
        let codec = MaybeCodec::new(I32Codec);
        // Fixed-size elements carry no marker byte
        let decoded = codec.decode(&[10, 0, 0, 0], Endian::Little).unwrap();
        assert_eq!(decoded, Some(10));
        assert_eq!(
            codec.encode(&decoded, Endian::Little).unwrap(),
            [10, 0, 0, 0]
        );
    }

    #[test]
    fn absent() {
        let codec = MaybeCodec::new(StrCodec);
        assert_eq!(codec.decode(&[], Endian::Little).unwrap(), None);
        assert!(codec.encode(&None, Endian::Little).unwrap().is_empty());
    }

    #[test]
    fn nested() {
        // "mms": Some(None) is one marker byte, Some(Some("")) is the empty
        // string, its marker, and the outer marker
        let codec = MaybeCodec::new(MaybeCodec::new(StrCodec));

        assert_eq!(codec.decode(&[], Endian::Little).unwrap(), None);
        assert_eq!(codec.decode(&[0x00], Endian::Little).unwrap(), Some(None));
        assert_eq!(
            codec.decode(&[0x00, 0x00, 0x00], Endian::Little).unwrap(),
            Some(Some(String::new()))
        );

        assert_bytes_eq(
            &codec.encode(&Some(None), Endian::Little).unwrap(),
            &[0x00],
            "maybe maybe absent",
        );
        assert_bytes_eq(
            &codec
                .encode(&Some(Some(String::new())), Endian::Little)
                .unwrap(),
            &[0x00, 0x00, 0x00],
            "maybe maybe empty string",
        );
    }
}
