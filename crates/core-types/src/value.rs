use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A possibly-undefined numeric observation.
///
/// Every indicator and statistic in the workspace is expressed in terms of `Value`
/// instead of raw `f64` so that "not enough data" and "denominator was zero" are
/// explicit states rather than `NaN` accidents:
///
/// - any arithmetic with an undefined operand is undefined;
/// - dividing by exactly zero is undefined;
/// - a non-finite result (overflow, `sqrt` of a negative) is undefined.
///
/// Serializes as `Option<f64>` (`null` when undefined).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(Option<f64>);

/// A sequence of values aligned 1:1 with the bars of a `PriceSeries`.
pub type Series = Vec<Value>;

impl Value {
    /// The undefined value.
    pub const NA: Value = Value(None);
    pub const ZERO: Value = Value(Some(0.0));

    /// Wraps a float, mapping `NaN` and infinities to undefined.
    pub fn new(x: f64) -> Self {
        if x.is_finite() { Value(Some(x)) } else { Value::NA }
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    pub fn is_na(self) -> bool {
        self.0.is_none()
    }

    pub fn is_defined(self) -> bool {
        self.0.is_some()
    }

    pub fn unwrap_or(self, default: f64) -> f64 {
        self.0.unwrap_or(default)
    }

    /// Applies `f` to a defined value; the result is re-checked for finiteness.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Value {
        match self.0 {
            Some(x) => Value::new(f(x)),
            None => Value::NA,
        }
    }

    /// Combines two values; undefined if either side is.
    pub fn zip_with(self, other: Value, f: impl FnOnce(f64, f64) -> f64) -> Value {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Value::new(f(a, b)),
            _ => Value::NA,
        }
    }

    /// Returns `other` when this value is undefined.
    pub fn or(self, other: Value) -> Value {
        if self.is_defined() { self } else { other }
    }

    pub fn abs(self) -> Value {
        self.map(f64::abs)
    }

    pub fn sqrt(self) -> Value {
        self.map(f64::sqrt)
    }

    pub fn powf(self, exponent: f64) -> Value {
        self.map(|x| x.powf(exponent))
    }

    /// The larger of two values. Undefined if either is.
    pub fn max(self, other: Value) -> Value {
        self.zip_with(other, f64::max)
    }

    /// The smaller of two values. Undefined if either is.
    pub fn min(self, other: Value) -> Value {
        self.zip_with(other, f64::min)
    }

    pub fn is_positive(self) -> bool {
        matches!(self.0, Some(x) if x > 0.0)
    }

    pub fn is_negative(self) -> bool {
        matches!(self.0, Some(x) if x < 0.0)
    }

    pub fn is_zero(self) -> bool {
        matches!(self.0, Some(x) if x == 0.0)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::new(x)
    }
}

impl From<Option<f64>> for Value {
    fn from(x: Option<f64>) -> Self {
        x.map_or(Value::NA, Value::new)
    }
}

impl From<Value> for Option<f64> {
    fn from(v: Value) -> Self {
        v.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(x) => match f.precision() {
                Some(p) => write!(f, "{x:.p$}"),
                None => write!(f, "{x}"),
            },
            None => f.write_str("-"),
        }
    }
}

impl Neg for Value {
    type Output = Value;
    fn neg(self) -> Value {
        self.map(|x| -x)
    }
}

macro_rules! impl_value_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Value {
            type Output = Value;
            fn $method(self, rhs: Value) -> Value {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl $trait<f64> for Value {
            type Output = Value;
            fn $method(self, rhs: f64) -> Value {
                self $op Value::new(rhs)
            }
        }

        impl $trait<Value> for f64 {
            type Output = Value;
            fn $method(self, rhs: Value) -> Value {
                Value::new(self) $op rhs
            }
        }
    };
}

impl_value_op!(Add, add, +);
impl_value_op!(Sub, sub, -);
impl_value_op!(Mul, mul, *);

impl Div for Value {
    type Output = Value;
    fn div(self, rhs: Value) -> Value {
        match (self.0, rhs.0) {
            (Some(_), Some(d)) if d == 0.0 => Value::NA,
            (Some(n), Some(d)) => Value::new(n / d),
            _ => Value::NA,
        }
    }
}

impl Div<f64> for Value {
    type Output = Value;
    fn div(self, rhs: f64) -> Value {
        self / Value::new(rhs)
    }
}

impl Div<Value> for f64 {
    type Output = Value;
    fn div(self, rhs: Value) -> Value {
        Value::new(self) / rhs
    }
}

/// Creates a series of `len` undefined values.
pub fn na_series(len: usize) -> Series {
    vec![Value::NA; len]
}

/// Wraps raw floats into a series, mapping non-finite entries to undefined.
pub fn series_from(values: &[f64]) -> Series {
    values.iter().copied().map(Value::new).collect()
}

/// The defined entries of a series, in order.
pub fn defined(series: &[Value]) -> Vec<f64> {
    series.iter().filter_map(|v| v.get()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_propagates_through_arithmetic() {
        let a = Value::new(2.0);
        assert_eq!(a + Value::NA, Value::NA);
        assert_eq!(Value::NA * 3.0, Value::NA);
        assert_eq!(1.0 - Value::NA, Value::NA);
        assert_eq!(a * 3.0, Value::new(6.0));
    }

    #[test]
    fn division_by_zero_is_undefined() {
        assert_eq!(Value::new(1.0) / 0.0, Value::NA);
        assert_eq!(Value::new(0.0) / Value::ZERO, Value::NA);
        assert_eq!(Value::new(1.0) / 4.0, Value::new(0.25));
    }

    #[test]
    fn non_finite_inputs_are_undefined() {
        assert!(Value::new(f64::NAN).is_na());
        assert!(Value::new(f64::INFINITY).is_na());
        assert!(Value::new(-1.0).sqrt().is_na());
    }

    #[test]
    fn serializes_as_optional_float() {
        let json = serde_json::to_string(&vec![Value::new(1.5), Value::NA]).unwrap();
        assert_eq!(json, "[1.5,null]");
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Value::new(1.5), Value::NA]);
    }
}
