use crate::codec::Codec;
use crate::codec::Endian;
use crate::error::{Error, Result};

/// A codec pinned to one byte order, created with
/// [`Codec::with_byte_order`]
///
/// The wrapped codec reads and writes with the pinned order no matter which
/// ambient order the surrounding tree was invoked with. Framing offsets are
/// unaffected; they are always little-endian.
#[derive(Debug, Clone, Copy)]
pub struct ByteOrdered<C> {
    inner: C,
    endian: Endian,
}

impl<C> ByteOrdered<C> {
    pub(crate) fn new(inner: C, endian: Endian) -> Self {
        Self { inner, endian }
    }
}

impl<C: Codec> Codec for ByteOrdered<C> {
    type Value = C::Value;

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        self.inner.fixed_size()
    }

    fn decode(&self, data: &[u8], _endian: Endian) -> Result<Self::Value> {
        self.inner.decode(data, self.endian)
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, _endian: Endian) -> Result<()> {
        self.inner.encode_to(value, out, self.endian)
    }
}

/// A codec with its value type converted, created with [`Codec::map`]
#[derive(Clone, Copy)]
pub struct Mapped<C, D, E> {
    inner: C,
    decode_map: D,
    encode_map: E,
}

impl<C, D, E> Mapped<C, D, E> {
    pub(crate) fn new(inner: C, decode_map: D, encode_map: E) -> Self {
        Self {
            inner,
            decode_map,
            encode_map,
        }
    }
}

impl<C, U, D, E> Codec for Mapped<C, D, E>
where
    C: Codec,
    D: Fn(C::Value) -> U,
    E: Fn(&U) -> C::Value,
{
    type Value = U;

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        self.inner.fixed_size()
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<U> {
        Ok((self.decode_map)(self.inner.decode(data, endian)?))
    }

    fn encode_to(&self, value: &U, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        self.inner.encode_to(&(self.encode_map)(value), out, endian)
    }
}

/// A codec with its serialized bytes transformed, created with
/// [`Codec::contramap`]
#[derive(Clone, Copy)]
pub struct Contramapped<C, D, E> {
    inner: C,
    decode_transform: D,
    encode_transform: E,
}

impl<C, D, E> Contramapped<C, D, E> {
    pub(crate) fn new(inner: C, decode_transform: D, encode_transform: E) -> Self {
        Self {
            inner,
            decode_transform,
            encode_transform,
        }
    }
}

impl<C, D, E> Codec for Contramapped<C, D, E>
where
    C: Codec,
    D: Fn(&[u8]) -> Vec<u8>,
    E: Fn(Vec<u8>) -> Vec<u8>,
{
    type Value = C::Value;

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        self.inner.fixed_size()
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        let transformed = (self.decode_transform)(data);
        self.inner.decode(&transformed, endian)
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        let mut buffer = Vec::new();
        self.inner.encode_to(value, &mut buffer, endian)?;
        out.extend_from_slice(&(self.encode_transform)(buffer));
        Ok(())
    }
}

/// The branch a [`PredicateCodec`] uses on the encode side
///
/// Decoding selects a branch by inspecting the input bytes, but there is no
/// input to inspect when encoding, so the construction site has to name the
/// branch explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeBranch {
    /// Encode with the codec used when the predicate holds
    Then,
    /// Encode with the codec used when the predicate does not hold
    Else,
}

/// A codec that picks one of two branches based on the raw input bytes
///
/// Both branches must decode to the same value type and agree on alignment
/// and fixed size; the constructor rejects mismatches.
#[derive(Clone, Copy)]
pub struct PredicateCodec<S, T, E> {
    selector: S,
    then_codec: T,
    else_codec: E,
    encode_branch: EncodeBranch,
}

impl<S, T, E> std::fmt::Debug for PredicateCodec<S, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateCodec")
            .field("encode_branch", &self.encode_branch)
            .finish_non_exhaustive()
    }
}

impl<S, T, E> PredicateCodec<S, T, E> {
    /// Create a predicate codec.
    ///
    /// `selector` inspects the input slice at decode time; `encode_branch`
    /// names the branch used for encoding. Returns
    /// [`Error::Usage`] if the branch codecs disagree on alignment or fixed
    /// size.
    pub fn new(
        selector: S,
        then_codec: T,
        else_codec: E,
        encode_branch: EncodeBranch,
    ) -> Result<Self>
    where
        S: Fn(&[u8]) -> bool,
        T: Codec,
        E: Codec<Value = T::Value>,
    {
        if then_codec.alignment() != else_codec.alignment() {
            return Err(Error::Usage(format!(
                "incompatible alignments in predicate branches: then={}, else={}",
                then_codec.alignment(),
                else_codec.alignment()
            )));
        }

        if then_codec.fixed_size() != else_codec.fixed_size() {
            return Err(Error::Usage(format!(
                "incompatible sizes in predicate branches: then={:?}, else={:?}",
                then_codec.fixed_size(),
                else_codec.fixed_size()
            )));
        }

        Ok(Self {
            selector,
            then_codec,
            else_codec,
            encode_branch,
        })
    }
}

impl<S, T, E> Codec for PredicateCodec<S, T, E>
where
    S: Fn(&[u8]) -> bool,
    T: Codec,
    E: Codec<Value = T::Value>,
{
    type Value = T::Value;

    fn alignment(&self) -> usize {
        self.then_codec.alignment()
    }

    fn fixed_size(&self) -> Option<usize> {
        self.then_codec.fixed_size()
    }

    fn decode(&self, data: &[u8], endian: Endian) -> Result<Self::Value> {
        if (self.selector)(data) {
            self.then_codec.decode(data, endian)
        } else {
            self.else_codec.decode(data, endian)
        }
    }

    fn encode_to(&self, value: &Self::Value, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        match self.encode_branch {
            EncodeBranch::Then => self.then_codec.encode_to(value, out, endian),
            EncodeBranch::Else => self.else_codec.encode_to(value, out, endian),
        }
    }
}
