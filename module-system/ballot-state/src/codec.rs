//! Serialization and deserialization of state keys and values.

use borsh::{BorshDeserialize, BorshSerialize};

/// A trait for types that can serialize and deserialize values for storage access.
pub trait StateValueCodec<V> {
    /// Error type that can arise during deserialization.
    type Error: std::fmt::Display;

    /// Serializes a value into a bytes vector.
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Tries to deserialize a value from a bytes slice.
    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::Error>;
}

/// A trait for types that can serialize keys for storage access.
///
/// Equal keys **must** encode to the same bytes on every target, otherwise two
/// nodes would disagree on where a value lives.
pub trait StateKeyCodec<K> {
    /// Serializes a key into a bytes vector.
    fn encode_key(&self, key: &K) -> Vec<u8>;
}

/// A trait for codecs which know how to serialize a type `Ref` as if it were
/// some other type `Target`, so that a `StateMap<String, _>` can be queried
/// with a `&str`.
pub trait EncodeKeyLike<Ref: ?Sized, Target> {
    /// Encodes a reference to `Ref` as if it were a reference to `Target`.
    fn encode_key_like(&self, borrowed: &Ref) -> Vec<u8>;
}

impl<C, T> EncodeKeyLike<T, T> for C
where
    C: StateKeyCodec<T>,
{
    fn encode_key_like(&self, borrowed: &T) -> Vec<u8> {
        self.encode_key(borrowed)
    }
}

/// A codec that uses [`borsh`] for keys and values.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct BorshCodec;

fn borsh_encode<T: BorshSerialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writing into a `Vec` cannot fail.
    value
        .serialize(&mut buf)
        .expect("borsh serialization into a Vec is infallible");
    buf
}

impl<V> StateValueCodec<V> for BorshCodec
where
    V: BorshSerialize + BorshDeserialize,
{
    type Error = std::io::Error;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        borsh_encode(value)
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::Error> {
        V::try_from_slice(bytes)
    }
}

impl<K> StateKeyCodec<K> for BorshCodec
where
    K: BorshSerialize,
{
    fn encode_key(&self, key: &K) -> Vec<u8> {
        borsh_encode(key)
    }
}

// Borsh encodes `str` exactly like `String`.
impl EncodeKeyLike<str, String> for BorshCodec {
    fn encode_key_like(&self, borrowed: &str) -> Vec<u8> {
        borsh_encode(borrowed)
    }
}

// Same for slices and vectors of a non zero-sized `T`.
impl<T> EncodeKeyLike<[T], Vec<T>> for BorshCodec
where
    T: BorshSerialize,
{
    fn encode_key_like(&self, borrowed: &[T]) -> Vec<u8> {
        borsh_encode(borrowed)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn test_borsh_str_encodes_like_string(s in ".*") {
            let codec = BorshCodec;
            prop_assert_eq!(
                <BorshCodec as EncodeKeyLike<str, String>>::encode_key_like(&codec, s.as_str()),
                <BorshCodec as StateKeyCodec<String>>::encode_key(&codec, &s)
            );
        }
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let codec = BorshCodec;
        let bytes = StateValueCodec::<u64>::encode_value(&codec, &7);
        let decoded: Result<u32, _> = codec.try_decode_value(&bytes);
        assert!(decoded.is_err());
    }
}
