use super::{BcsError, BcsResult, Serializable, MAX_SEQUENCE_LENGTH};
use crate::error::AptosResult;

/// Append-only BCS encoder.
///
/// The buffer is only readable once the serializer is consumed by
/// [`Serializer::into_bytes`].
#[derive(Debug, Default)]
pub struct Serializer {
    output: Vec<u8>,
}

impl Serializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Finishes encoding and returns the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    /// Writes `0x01` for true, `0x00` for false.
    pub fn serialize_bool(&mut self, value: bool) {
        self.output.push(u8::from(value));
    }

    /// Writes a single byte.
    pub fn serialize_u8(&mut self, value: u8) {
        self.output.push(value);
    }

    /// Writes a little-endian `u16`.
    pub fn serialize_u16(&mut self, value: u16) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u32`.
    pub fn serialize_u32(&mut self, value: u32) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u64`.
    pub fn serialize_u64(&mut self, value: u64) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u128`.
    pub fn serialize_u128(&mut self, value: u128) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 256-bit integer given as 32 little-endian bytes.
    pub fn serialize_u256(&mut self, le_bytes: &[u8; 32]) {
        self.output.extend_from_slice(le_bytes);
    }

    /// Writes `value` as ULEB128 in its shortest form.
    pub fn serialize_uleb128(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.output.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }
        self.output.push(value as u8);
    }

    /// Writes a sequence or byte-string length.
    pub fn serialize_len(&mut self, len: usize) -> BcsResult<()> {
        if len > MAX_SEQUENCE_LENGTH {
            return Err(BcsError::SequenceTooLong(len));
        }
        let len = u32::try_from(len).map_err(|_| BcsError::SequenceTooLong(len))?;
        self.serialize_uleb128(len);
        Ok(())
    }

    /// Writes the tag of an enum variant.
    pub fn serialize_variant_index(&mut self, index: u32) {
        self.serialize_uleb128(index);
    }

    /// Writes a length-prefixed byte string.
    pub fn serialize_bytes(&mut self, bytes: &[u8]) -> BcsResult<()> {
        self.serialize_len(bytes.len())?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes raw bytes with no length prefix.
    pub fn serialize_fixed_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Writes a string as length-prefixed UTF-8.
    pub fn serialize_str(&mut self, value: &str) -> BcsResult<()> {
        self.serialize_bytes(value.as_bytes())
    }

    /// Writes an option, encoding the present value with `encode`.
    pub fn serialize_option_with<T, F>(&mut self, value: Option<&T>, encode: F) -> AptosResult<()>
    where
        T: ?Sized,
        F: FnOnce(&mut Serializer, &T) -> AptosResult<()>,
    {
        match value {
            Some(inner) => {
                self.serialize_bool(true);
                encode(self, inner)
            }
            None => {
                self.serialize_bool(false);
                Ok(())
            }
        }
    }

    /// Writes an option of a [`Serializable`] value.
    pub fn serialize_option<T: Serializable>(&mut self, value: Option<&T>) -> AptosResult<()> {
        self.serialize_option_with(value, |s, v| v.serialize(s))
    }

    /// Writes a count followed by every item, each encoded with `encode`.
    pub fn serialize_seq_with<T, F>(&mut self, items: &[T], mut encode: F) -> AptosResult<()>
    where
        F: FnMut(&mut Serializer, &T) -> AptosResult<()>,
    {
        self.serialize_len(items.len())?;
        for item in items {
            encode(self, item)?;
        }
        Ok(())
    }

    /// Writes a sequence of [`Serializable`] values.
    pub fn serialize_seq<T: Serializable>(&mut self, items: &[T]) -> AptosResult<()> {
        self.serialize_seq_with(items, |s, item| item.serialize(s))
    }

    /// Writes a map.
    ///
    /// Entries are encoded first, then emitted in ascending order of their
    /// encoded key bytes. Two keys with the same encoding are rejected.
    pub fn serialize_map_with<K, V, I, FK, FV>(
        &mut self,
        entries: I,
        mut encode_key: FK,
        mut encode_value: FV,
    ) -> AptosResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        FK: FnMut(&mut Serializer, K) -> AptosResult<()>,
        FV: FnMut(&mut Serializer, V) -> AptosResult<()>,
    {
        let mut encoded = Vec::new();
        for (key, value) in entries {
            let mut key_ser = Serializer::new();
            encode_key(&mut key_ser, key)?;
            let mut value_ser = Serializer::new();
            encode_value(&mut value_ser, value)?;
            encoded.push((key_ser.into_bytes(), value_ser.into_bytes()));
        }
        encoded.sort_by(|a, b| a.0.cmp(&b.0));
        if encoded.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            return Err(BcsError::DuplicateMapKey.into());
        }

        self.serialize_len(encoded.len())?;
        for (key, value) in encoded {
            self.output.extend_from_slice(&key);
            self.output.extend_from_slice(&value);
        }
        Ok(())
    }

    /// Writes a map of [`Serializable`] keys and values.
    pub fn serialize_map<'a, K, V, I>(&mut self, entries: I) -> AptosResult<()>
    where
        K: Serializable + 'a,
        V: Serializable + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        self.serialize_map_with(entries, |s, k| k.serialize(s), |s, v| v.serialize(s))
    }
}
