use super::{BcsError, BcsResult, Deserializable, MAX_CONTAINER_DEPTH, MAX_SEQUENCE_LENGTH};
use crate::error::AptosResult;
use std::collections::BTreeMap;

/// Strict BCS decoder over a borrowed buffer.
///
/// Every read advances the cursor. The decoder never checks for trailing
/// input on its own; call [`Deserializer::end`] (or use
/// [`crate::bcs::from_bytes`]) once the top-level value is read.
#[derive(Debug)]
pub struct Deserializer<'a> {
    input: &'a [u8],
    position: usize,
    depth: usize,
}

impl<'a> Deserializer<'a> {
    /// Creates a decoder positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// Returns true if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails with [`BcsError::RemainingInput`] if any bytes are left.
    pub fn end(&self) -> BcsResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(BcsError::RemainingInput(n)),
        }
    }

    fn take(&mut self, len: usize) -> BcsResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(BcsError::UnexpectedEndOfInput {
                needed: len,
                remaining,
            });
        }
        let input = self.input;
        let slice = &input[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Reads exactly `N` raw bytes.
    pub fn read_fixed_array<const N: usize>(&mut self) -> BcsResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads `len` raw bytes with no length prefix.
    pub fn read_fixed_bytes(&mut self, len: usize) -> BcsResult<Vec<u8>> {
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a boolean, rejecting any byte other than 0 or 1.
    pub fn read_bool(&mut self) -> BcsResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::InvalidBoolean(other)),
        }
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> BcsResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> BcsResult<u16> {
        Ok(u16::from_le_bytes(self.read_fixed_array()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> BcsResult<u32> {
        Ok(u32::from_le_bytes(self.read_fixed_array()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> BcsResult<u64> {
        Ok(u64::from_le_bytes(self.read_fixed_array()?))
    }

    /// Reads a little-endian `u128`.
    pub fn read_u128(&mut self) -> BcsResult<u128> {
        Ok(u128::from_le_bytes(self.read_fixed_array()?))
    }

    /// Reads a 256-bit integer as 32 little-endian bytes.
    pub fn read_u256(&mut self) -> BcsResult<[u8; 32]> {
        self.read_fixed_array()
    }

    /// Reads a ULEB128 value.
    ///
    /// Fails with [`BcsError::Uleb128Overflow`] if the value needs more than
    /// 32 bits and with [`BcsError::NonCanonicalUleb128`] if the last group
    /// is a redundant zero.
    pub fn read_uleb128(&mut self) -> BcsResult<u32> {
        let mut value: u64 = 0;
        for shift in (0..32).step_by(7) {
            let byte = self.read_u8()?;
            let digit = byte & 0x7f;
            value |= u64::from(digit) << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(BcsError::NonCanonicalUleb128);
                }
                return u32::try_from(value).map_err(|_| BcsError::Uleb128Overflow);
            }
        }
        Err(BcsError::Uleb128Overflow)
    }

    /// Reads a sequence or byte-string length.
    pub fn read_len(&mut self) -> BcsResult<usize> {
        let len = self.read_uleb128()? as usize;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(BcsError::SequenceTooLong(len));
        }
        Ok(len)
    }

    /// Reads the tag of an enum variant.
    pub fn read_variant_index(&mut self) -> BcsResult<u32> {
        self.read_uleb128()
    }

    /// Reads a length-prefixed byte string.
    pub fn read_bytes(&mut self) -> BcsResult<Vec<u8>> {
        let len = self.read_len()?;
        self.read_fixed_bytes(len)
    }

    /// Reads a length-prefixed byte string that must be `expected` bytes long.
    pub fn read_bytes_exact(&mut self, expected: usize) -> BcsResult<Vec<u8>> {
        let len = self.read_len()?;
        if len != expected {
            return Err(BcsError::LengthMismatch {
                expected,
                actual: len,
            });
        }
        self.read_fixed_bytes(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> BcsResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| BcsError::InvalidUtf8)
    }

    /// Reads an option, decoding the present value with `decode`.
    pub fn read_option_with<T, F>(&mut self, decode: F) -> AptosResult<Option<T>>
    where
        F: FnOnce(&mut Self) -> AptosResult<T>,
    {
        if self.read_bool()? {
            Ok(Some(decode(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads an option of a [`Deserializable`] value.
    pub fn read_option<T: Deserializable>(&mut self) -> AptosResult<Option<T>> {
        self.read_option_with(T::deserialize)
    }

    /// Reads a count followed by that many items decoded with `decode`.
    pub fn read_seq_with<T, F>(&mut self, mut decode: F) -> AptosResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> AptosResult<T>,
    {
        let len = self.read_len()?;
        // Each element takes at least one byte.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(decode(self)?);
        }
        Ok(items)
    }

    /// Reads a sequence of [`Deserializable`] values.
    pub fn read_seq<T: Deserializable>(&mut self) -> AptosResult<Vec<T>> {
        self.read_seq_with(T::deserialize)
    }

    /// Reads a map whose keys must be strictly ascending by encoded bytes.
    pub fn read_map_with<K, V, FK, FV>(
        &mut self,
        mut decode_key: FK,
        mut decode_value: FV,
    ) -> AptosResult<BTreeMap<K, V>>
    where
        K: Ord,
        FK: FnMut(&mut Self) -> AptosResult<K>,
        FV: FnMut(&mut Self) -> AptosResult<V>,
    {
        let len = self.read_len()?;
        let mut map = BTreeMap::new();
        let mut previous_key: Option<&'a [u8]> = None;
        for _ in 0..len {
            let start = self.position;
            let key = decode_key(self)?;
            let input = self.input;
            let key_bytes = &input[start..self.position];
            if let Some(previous) = previous_key {
                if key_bytes <= previous {
                    return Err(BcsError::NonCanonicalMap.into());
                }
            }
            previous_key = Some(key_bytes);
            let value = decode_value(self)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Reads a map of [`Deserializable`] keys and values.
    pub fn read_map<K, V>(&mut self) -> AptosResult<BTreeMap<K, V>>
    where
        K: Deserializable + Ord,
        V: Deserializable,
    {
        self.read_map_with(K::deserialize, V::deserialize)
    }

    /// Enters one level of a recursive value.
    pub fn enter_container(&mut self) -> BcsResult<()> {
        if self.depth >= MAX_CONTAINER_DEPTH {
            return Err(BcsError::ExceededMaxDepth(MAX_CONTAINER_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves a level entered with [`Deserializer::enter_container`].
    pub fn leave_container(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
