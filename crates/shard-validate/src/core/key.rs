//! Key types and values used for range partitioning.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, ValidateError};

/// Semantic type of a table's range key.
///
/// Determines how bound literals are parsed, how the key space is divided
/// and how values are rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    /// Signed 64-bit integer key.
    Integer,
    /// 128-bit UUID key, ordered as an unsigned big-endian integer.
    Uuid,
}

impl KeyType {
    /// Parse a string literal under this key type.
    ///
    /// `table` and `field` only feed the error message.
    pub fn parse_literal(&self, table: &str, field: &str, literal: &str) -> Result<KeyValue> {
        let trimmed = literal.trim();
        match self {
            KeyType::Integer => trimmed
                .parse::<i64>()
                .map(KeyValue::Int)
                .map_err(|_| ValidateError::type_mismatch(table, field, literal, self.to_string())),
            KeyType::Uuid => Uuid::parse_str(trimmed)
                .map(KeyValue::Uuid)
                .map_err(|_| ValidateError::type_mismatch(table, field, literal, self.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Integer => write!(f, "INTEGER"),
            KeyType::Uuid => write!(f, "UUID"),
        }
    }
}

/// A concrete key value.
///
/// Values of different variants are never compared with each other in
/// practice: a table's bounds and boundaries always share its key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Uuid(Uuid),
}

impl KeyValue {
    /// The key type this value belongs to.
    pub fn key_type(&self) -> KeyType {
        match self {
            KeyValue::Int(_) => KeyType::Integer,
            KeyValue::Uuid(_) => KeyType::Uuid,
        }
    }

    /// The value immediately below this one; `None` at the type minimum
    /// (`i64::MIN`, the nil UUID).
    pub fn predecessor(&self) -> Option<KeyValue> {
        match self {
            KeyValue::Int(v) => v.checked_sub(1).map(KeyValue::Int),
            KeyValue::Uuid(v) => v
                .as_u128()
                .checked_sub(1)
                .map(|p| KeyValue::Uuid(Uuid::from_u128(p))),
        }
    }

    /// Distance from `self` up to `other` as an unsigned offset.
    ///
    /// Returns `None` when the variants differ or `other` is below `self`.
    pub(crate) fn offset_to(&self, other: &KeyValue) -> Option<u128> {
        match (self, other) {
            (KeyValue::Int(lo), KeyValue::Int(hi)) if hi >= lo => {
                Some((*hi as i128 - *lo as i128) as u128)
            }
            (KeyValue::Uuid(lo), KeyValue::Uuid(hi)) if hi >= lo => {
                Some(hi.as_u128() - lo.as_u128())
            }
            _ => None,
        }
    }

    /// `self + offset`. The caller guarantees the result stays within the
    /// range the offset was derived from.
    pub(crate) fn add_offset(&self, offset: u128) -> KeyValue {
        match self {
            KeyValue::Int(v) => KeyValue::Int((*v as i128 + offset as i128) as i64),
            KeyValue::Uuid(v) => KeyValue::Uuid(Uuid::from_u128(v.as_u128() + offset)),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{}", v),
            // Hyphenated lowercase is the canonical text form.
            KeyValue::Uuid(v) => write!(f, "{}", v.hyphenated()),
        }
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Int(v)
    }
}

impl From<Uuid> for KeyValue {
    fn from(v: Uuid) -> Self {
        KeyValue::Uuid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_literal() {
        let v = KeyType::Integer.parse_literal("t", "min_key", " 42 ").unwrap();
        assert_eq!(v, KeyValue::Int(42));

        let v = KeyType::Integer
            .parse_literal("t", "min_key", "-9223372036854775808")
            .unwrap();
        assert_eq!(v, KeyValue::Int(i64::MIN));
    }

    #[test]
    fn test_parse_integer_rejects_uuid_text() {
        let err = KeyType::Integer
            .parse_literal("t", "max_key", "00000000-0000-0000-0000-000000000000")
            .unwrap_err();
        assert!(matches!(err, ValidateError::TypeMismatch { .. }));
    }

    #[test]
    fn test_parse_uuid_literal_normalizes_case() {
        let v = KeyType::Uuid
            .parse_literal("t", "max_key", "FFFFFFFF-FFFF-FFFF-FFFF-FFFFFFFFFFFF")
            .unwrap();
        assert_eq!(v, KeyValue::Uuid(Uuid::max()));
        assert_eq!(v.to_string(), "ffffffff-ffff-ffff-ffff-ffffffffffff");
    }

    #[test]
    fn test_parse_uuid_rejects_integer_text() {
        let err = KeyType::Uuid.parse_literal("t", "min_key", "12").unwrap_err();
        match err {
            ValidateError::TypeMismatch { field, expected, .. } => {
                assert_eq!(field, "min_key");
                assert_eq!(expected, "UUID");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_predecessor() {
        assert_eq!(KeyValue::Int(0).predecessor(), Some(KeyValue::Int(-1)));
        assert_eq!(KeyValue::Int(i64::MIN).predecessor(), None);
        assert_eq!(KeyValue::Uuid(Uuid::nil()).predecessor(), None);
        assert_eq!(
            KeyValue::Uuid(Uuid::from_u128(1)).predecessor(),
            Some(KeyValue::Uuid(Uuid::nil()))
        );
        assert_eq!(
            KeyValue::Uuid(Uuid::from_u128(0x100)).predecessor(),
            Some(KeyValue::Uuid(Uuid::from_u128(0xff)))
        );
    }

    #[test]
    fn test_offset_spans_full_i64_range() {
        let lo = KeyValue::Int(i64::MIN);
        let hi = KeyValue::Int(i64::MAX);
        assert_eq!(lo.offset_to(&hi), Some(u64::MAX as u128));
        assert_eq!(lo.add_offset(u64::MAX as u128), hi);
        assert_eq!(hi.offset_to(&lo), None);
        assert_eq!(lo.offset_to(&KeyValue::Uuid(Uuid::nil())), None);
    }

    #[test]
    fn test_uuid_ordering_is_unsigned() {
        let low = KeyValue::Uuid(Uuid::from_u128(1));
        let high = KeyValue::Uuid(Uuid::from_u128(u128::MAX - 1));
        assert!(low < high);
    }
}
