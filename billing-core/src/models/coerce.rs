//! Untrusted-input coercion.
//!
//! Numeric fields arriving from the HTTP boundary may be JSON numbers,
//! numeric strings, null, or absent. They are modeled here as explicit raw
//! types and coerced into strongly typed values exactly once, at the
//! repository boundary.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// A loosely typed numeric field: number, numeric string, null or absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNumber(Option<Decimal>);

impl RawNumber {
    pub fn new(value: Option<Decimal>) -> Self {
        Self(value)
    }

    pub fn get(&self) -> Option<Decimal> {
        self.0
    }

    /// Coerce to a decimal, falling back when missing or non-numeric.
    pub fn decimal_or(&self, default: Decimal) -> Decimal {
        self.0.unwrap_or(default)
    }

    /// Coerce to a whole number (fractions truncated), falling back when
    /// missing or non-numeric.
    pub fn int_or(&self, default: Decimal) -> Decimal {
        self.0.map(|d| d.trunc()).unwrap_or(default)
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RawNumber(decimal_from_value(&value)))
    }
}

/// A loosely typed identifier field: positive integer, numeric string, or
/// anything else (which coerces to nothing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawId(Option<u64>);

impl RawId {
    pub fn new(value: Option<u64>) -> Self {
        Self(value)
    }

    pub fn get(&self) -> Option<u64> {
        self.0
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let id = decimal_from_value(&value).and_then(|d| d.trunc().to_u64());
        Ok(RawId(id))
    }
}

/// Lenient deserializer for stored decimal fields. Old snapshot records may
/// hold numeric strings or nulls; neither should poison the whole snapshot.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Lenient deserializer for stored identifier fields; unparseable values
/// degrade to 0, which no record ever owns.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value)
        .and_then(|d| d.trunc().to_u64())
        .unwrap_or(0))
}

/// Lenient deserializer for stored ISO date fields. Accepts a plain date or
/// the date prefix of a full timestamp; anything else degrades to absent.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::String(s) = value else {
        return Ok(None);
    };
    let prefix = s.trim();
    let prefix = prefix.get(..10).unwrap_or(prefix);
    Ok(chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn raw_number(json: &str) -> RawNumber {
        serde_json::from_str(json).unwrap()
    }

    fn raw_id(json: &str) -> RawId {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn number_coerces_from_json_number() {
        assert_eq!(raw_number("21.5").get(), Some(dec("21.5")));
        assert_eq!(raw_number("100").get(), Some(dec("100")));
    }

    #[test]
    fn number_coerces_from_numeric_string() {
        assert_eq!(raw_number("\"19.99\"").get(), Some(dec("19.99")));
        assert_eq!(raw_number("\" 7 \"").get(), Some(dec("7")));
    }

    #[test]
    fn number_degrades_on_null_and_garbage() {
        assert_eq!(raw_number("null").get(), None);
        assert_eq!(raw_number("\"abc\"").get(), None);
        assert_eq!(raw_number("[1]").get(), None);
    }

    #[test]
    fn int_coercion_truncates_fractions() {
        assert_eq!(raw_number("2.9").int_or(dec("1")), dec("2"));
        assert_eq!(raw_number("null").int_or(dec("1")), dec("1"));
    }

    #[test]
    fn zero_is_kept_not_defaulted() {
        assert_eq!(raw_number("0").decimal_or(dec("21")), dec("0"));
        assert_eq!(raw_number("0").int_or(dec("1")), dec("0"));
    }

    #[test]
    fn id_coerces_from_string_and_number() {
        assert_eq!(raw_id("\"3\"").get(), Some(3));
        assert_eq!(raw_id("3").get(), Some(3));
        assert_eq!(raw_id("3.7").get(), Some(3));
    }

    #[test]
    fn id_degrades_on_garbage() {
        assert_eq!(raw_id("null").get(), None);
        assert_eq!(raw_id("\"x\"").get(), None);
        assert_eq!(raw_id("-2").get(), None);
    }
}
