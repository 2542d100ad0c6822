//! Codec implementations for standard library types.

use super::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use crate::error::AptosResult;
use std::collections::BTreeMap;

macro_rules! impl_primitive {
    ($ty:ty, $ser:ident, $de:ident) => {
        impl Serializable for $ty {
            fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
                serializer.$ser(*self);
                Ok(())
            }
        }

        impl Deserializable for $ty {
            fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
                Ok(deserializer.$de()?)
            }
        }
    };
}

impl_primitive!(bool, serialize_bool, read_bool);
impl_primitive!(u8, serialize_u8, read_u8);
impl_primitive!(u16, serialize_u16, read_u16);
impl_primitive!(u32, serialize_u32, read_u32);
impl_primitive!(u64, serialize_u64, read_u64);
impl_primitive!(u128, serialize_u128, read_u128);

impl Serializable for str {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_str(self)?)
    }
}

impl Serializable for String {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        Ok(serializer.serialize_str(self)?)
    }
}

impl Deserializable for String {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(deserializer.read_str()?)
    }
}

impl<T: Serializable> Serializable for [T] {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_seq(self)
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_seq(self)
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.read_seq()
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_option(self.as_ref())
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.read_option()
    }
}

// Fixed-size arrays carry no length prefix.
impl<T: Serializable, const N: usize> Serializable for [T; N] {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        for item in self {
            item.serialize(serializer)?;
        }
        Ok(())
    }
}

impl<T: Deserializable, const N: usize> Deserializable for [T; N] {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::deserialize(deserializer)?);
        }
        let actual = items.len();
        items.try_into().map_err(|_| {
            BcsError::LengthMismatch {
                expected: N,
                actual,
            }
            .into()
        })
    }
}

impl<K: Serializable, V: Serializable> Serializable for BTreeMap<K, V> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_map(self.iter())
    }
}

impl<K: Deserializable + Ord, V: Deserializable> Deserializable for BTreeMap<K, V> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.read_map()
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        (**self).serialize(serializer)
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        (**self).serialize(serializer)
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Box::new(T::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::bcs::{from_bytes, to_bytes};

    #[test]
    fn test_vec_u8_matches_bytes() {
        let bytes = to_bytes(&vec![0xaau8, 0xbb]).unwrap();
        assert_eq!(bytes, vec![2, 0xaa, 0xbb]);
    }

    #[test]
    fn test_fixed_array_has_no_prefix() {
        let bytes = to_bytes(&[1u8, 2, 3]).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        let decoded: [u8; 3] = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, [1, 2, 3]);
    }

    #[test]
    fn test_nested_vectors() {
        let value = vec![vec![1u8], vec![], vec![2, 3]];
        let bytes = to_bytes(&value).unwrap();
        assert_eq!(bytes, vec![3, 1, 1, 0, 2, 2, 3]);
        let decoded: Vec<Vec<u8>> = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        assert!(from_bytes::<bool>(&[1]).unwrap());
        assert!(from_bytes::<bool>(&[2]).is_err());
    }
}
