//! Orderable field values.
//!
//! Field accessors project a record onto a [`FieldValue`], and sorting compares
//! those values. Every pair of values has a defined total order, so a sort can
//! never fail part way through.

use std::cmp::Ordering;
use std::fmt;

/// A value read from a record field, used as a sort key.
///
/// The ordering between variants is fixed:
///
/// `None` < `Bool` < numbers (`Int`, `UInt`, `Float`) < `String`
///
/// Numbers compare by numeric value regardless of variant, so `Int(1)`,
/// `UInt(1)` and `Float(1.0)` are equal. Floats are totally ordered: `-0.0`
/// equals `0.0` and NaN sorts after positive infinity. Strings compare
/// lexically by their UTF-8 bytes.
///
/// `None` stands for an absent or unreadable value and is the minimum.
#[derive(Debug, Clone, Default)]
pub enum FieldValue {
    /// No value.
    #[default]
    None,
    /// Boolean value; `false < true`.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
}

impl FieldValue {
    /// Returns `true` if this is `FieldValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, FieldValue::None)
    }

    /// Returns the string contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if it is an integer that fits.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            FieldValue::Int(n) => Some(n),
            FieldValue::UInt(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::None => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Int(_) | FieldValue::UInt(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
        }
    }
}

/// Compares an integer with a float exactly, without rounding the integer.
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    // Every i64/u64 lies strictly inside +/-2^127.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }

    let truncated = float.trunc();
    match int.cmp(&(truncated as i128)) {
        Ordering::Equal => {
            if float > truncated {
                Ordering::Less
            } else if float < truncated {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        other => other,
    }
}

fn cmp_float(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (None, None) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (UInt(a), UInt(b)) => a.cmp(b),
            (Int(a), UInt(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (UInt(a), Int(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (Float(a), Float(b)) => cmp_float(*a, *b),
            (Int(a), Float(b)) => cmp_int_float(i128::from(*a), *b),
            (UInt(a), Float(b)) => cmp_int_float(i128::from(*a), *b),
            (Float(a), Int(b)) => cmp_int_float(i128::from(*b), *a).reverse(),
            (Float(a), UInt(b)) => cmp_int_float(i128::from(*b), *a).reverse(),
            (String(a), String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::None => write!(f, "<none>"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::UInt(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for FieldValue {
                fn from(n: $source) -> Self {
                    FieldValue::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt as u64: u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(n: f32) -> Self {
        FieldValue::Float(f64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_ranks() {
        assert!(FieldValue::None < FieldValue::Bool(false));
        assert!(FieldValue::Bool(true) < FieldValue::Int(i64::MIN));
        assert!(FieldValue::Float(f64::INFINITY) < FieldValue::from(""));
    }

    #[test]
    fn test_mixed_numbers() {
        assert_eq!(FieldValue::Int(1), FieldValue::UInt(1));
        assert_eq!(FieldValue::Int(1), FieldValue::Float(1.0));
        assert!(FieldValue::Int(-1) < FieldValue::UInt(0));
        assert!(FieldValue::UInt(u64::MAX) > FieldValue::Int(i64::MAX));
        assert!(FieldValue::Int(2) > FieldValue::Float(1.5));
        assert!(FieldValue::Float(-2.5) < FieldValue::Int(-2));
        assert!(FieldValue::Float(f64::NAN) > FieldValue::UInt(u64::MAX));
        assert!(FieldValue::Float(f64::NEG_INFINITY) < FieldValue::Int(i64::MIN));
    }

    #[test]
    fn test_large_integers_do_not_round() {
        let exact = 9_007_199_254_740_992_i64; // 2^53
        assert_eq!(FieldValue::Int(exact), FieldValue::Float(exact as f64));
        assert!(FieldValue::Int(exact + 1) > FieldValue::Float(exact as f64));
    }

    #[test]
    fn test_float_zero_and_nan() {
        assert_eq!(FieldValue::Float(-0.0), FieldValue::Float(0.0));
        assert!(FieldValue::Float(f64::NAN) > FieldValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_strings_are_lexical() {
        assert!(FieldValue::from("a/b.txt") < FieldValue::from("c.dat"));
        assert!(FieldValue::from("Z") < FieldValue::from("a"));
    }

    #[test]
    fn test_option_conversion() {
        assert!(FieldValue::from(None::<u32>).is_none());
        assert_eq!(FieldValue::from(Some(7u32)).as_int(), Some(7));
        assert_eq!(FieldValue::from(String::from("x")).as_str(), Some("x"));
    }
}
