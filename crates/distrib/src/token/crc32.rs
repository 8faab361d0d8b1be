//! CRC-32 token implementation (IEEE 802.3 / zlib polynomial).

/// CRC-32 token.
///
/// Stored as the unsigned checksum. Slice placement and the lookup walk
/// compare tokens through their signed 32-bit reinterpretation
/// ([`Crc32Token::signed`]); both views must be preserved bit for bit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Crc32Token(pub u32);

impl Crc32Token {
    /// Creates a token from a byte slice.
    #[inline]
    pub fn from_bytes(data: &[u8]) -> Self {
        Crc32Token(crc32fast::hash(data))
    }

    /// Creates a token from a string key.
    #[inline]
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }

    /// Token for replica `index` of backend `id`, hashed as `"<id>:<index>"`.
    pub fn for_replica(id: &str, index: u32) -> Self {
        Self::from_key(&format!("{}:{}", id, index))
    }

    /// The checksum reinterpreted as a signed 32-bit integer.
    #[inline]
    pub fn signed(self) -> i32 {
        self.0 as i32
    }

    /// Absolute value of the signed checksum, widened so `i32::MIN` is
    /// representable.
    #[inline]
    pub fn magnitude(self) -> u64 {
        i64::from(self.signed()).unsigned_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_values() {
        assert_eq!(Crc32Token::from_key("").0, 0);
        assert_eq!(Crc32Token::from_key("123456789").0, 0xCBF4_3926);
        assert_eq!(
            Crc32Token::from_key("The quick brown fox jumps over the lazy dog").0,
            0x414F_A339
        );
    }

    #[test]
    fn test_replica_label_format() {
        assert_eq!(
            Crc32Token::for_replica("cache-1", 7),
            Crc32Token::from_key("cache-1:7")
        );
    }

    #[test]
    fn test_signed_view() {
        assert_eq!(Crc32Token(0).signed(), 0);
        assert_eq!(Crc32Token(0x7FFF_FFFF).signed(), i32::MAX);
        assert_eq!(Crc32Token(0x8000_0000).signed(), i32::MIN);
        assert_eq!(Crc32Token(0xFFFF_FFFF).signed(), -1);
        // 0xCBF43926 is negative when reinterpreted.
        assert_eq!(Crc32Token(0xCBF4_3926).signed(), -873_187_034);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(Crc32Token(5).magnitude(), 5);
        assert_eq!(Crc32Token(0xFFFF_FFFF).magnitude(), 1);
        assert_eq!(Crc32Token(0x8000_0000).magnitude(), 1 << 31);
    }
}
