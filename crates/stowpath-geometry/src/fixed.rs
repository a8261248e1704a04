//! Exact decimal arithmetic with six fractional digits.
//!
//! Every length, angle and path cost in the planner is a [`Fixed`]. Keeping
//! geometry out of binary floating point means an obstacle edge lands in the
//! same grid cell on every request and on every platform, and the open set of
//! the search orders equal costs identically from run to run.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use core::str::FromStr;

use crate::error::GeometryError;

/// Signed fixed-point decimal with six fractional digits.
///
/// The raw value is an `i64` count of millionths; for lengths one unit is one
/// micrometre. Addition and subtraction saturate at [`Fixed::MAX`] and
/// [`Fixed::MIN`], so `Fixed::MAX` can stand in for an infinite cost.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    /// Number of raw units per whole number.
    pub const SCALE: i64 = 1_000_000;
    /// Number of decimal digits after the point.
    pub const FRACTION_DIGITS: usize = 6;

    /// `0`
    pub const ZERO: Fixed = Fixed(0);
    /// `1`
    pub const ONE: Fixed = Fixed(Self::SCALE);
    /// Largest representable value, used as "unreached" cost.
    pub const MAX: Fixed = Fixed(i64::MAX);
    /// Smallest representable value.
    pub const MIN: Fixed = Fixed(i64::MIN);
    /// √2 rounded to six digits. Shared by every diagonal step and heuristic.
    pub const SQRT_2: Fixed = Fixed(1_414_214);
    /// π rounded to six digits.
    pub const PI: Fixed = Fixed(3_141_593);
    /// π/2 rounded to six digits.
    pub const FRAC_PI_2: Fixed = Fixed(1_570_796);

    /// Creates a value from a raw count of millionths.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Fixed(micros)
    }

    /// Creates a value from a count of thousandths, e.g. `from_millis(250)` is `0.25`.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Fixed(millis.saturating_mul(1_000))
    }

    /// Creates a value from a whole number.
    #[must_use]
    pub const fn from_int(value: i64) -> Self {
        Fixed(value.saturating_mul(Self::SCALE))
    }

    /// Rounds a float to the nearest millionth.
    ///
    /// Out-of-range values saturate and NaN becomes zero.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Fixed(libm::round(value * Self::SCALE as f64) as i64)
    }

    /// The raw count of millionths.
    #[must_use]
    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Converts to the nearest float. Only meant for display and trigonometry input.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Absolute value, saturating at [`Fixed::MAX`].
    #[must_use]
    pub const fn abs(self) -> Self {
        Fixed(self.0.saturating_abs())
    }

    /// `-1`, `0` or `1` according to the sign.
    #[must_use]
    pub const fn signum(self) -> i64 {
        self.0.signum()
    }

    /// Returns `true` for values strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` for values strictly less than zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies by an integer, saturating on overflow.
    #[must_use]
    pub const fn mul_int(self, factor: i64) -> Self {
        Fixed(self.0.saturating_mul(factor))
    }

    /// Divides by an integer, rounding half away from zero.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero, like integer division.
    #[must_use]
    pub fn div_int(self, divisor: i64) -> Self {
        Fixed(saturate(round_div(self.0 as i128, divisor as i128)))
    }

    /// Divides by another value, returning `None` for a zero divisor.
    #[must_use]
    pub fn checked_div(self, rhs: Fixed) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Fixed(saturate(round_div(
            self.0 as i128 * Self::SCALE as i128,
            rhs.0 as i128,
        ))))
    }

    /// `floor(self / unit)` as an integer count. `unit` must be positive.
    #[must_use]
    pub const fn floor_div(self, unit: Fixed) -> i64 {
        self.0.div_euclid(unit.0)
    }

    /// `ceil(self / unit)` as an integer count. `unit` must be positive.
    #[must_use]
    pub const fn ceil_div(self, unit: Fixed) -> i64 {
        -((-self.0).div_euclid(unit.0))
    }

    /// Square root, truncated to six digits. Negative inputs yield zero.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        let scaled = self.0 as u128 * Self::SCALE as u128;
        Fixed(saturate(scaled.isqrt() as i128))
    }

    /// `sqrt(a² + b²)` without intermediate rounding, truncated to six digits.
    #[must_use]
    pub fn hypot(a: Fixed, b: Fixed) -> Self {
        let a = a.0.unsigned_abs() as u128;
        let b = b.0.unsigned_abs() as u128;
        let sum = a * a + b * b;
        Fixed(saturate(sum.isqrt() as i128))
    }

    /// Sine and cosine of an angle in radians, each rounded to six digits.
    ///
    /// `libm` is a software implementation, so the result does not depend on
    /// the host's floating point unit.
    #[must_use]
    pub fn sin_cos(self) -> (Fixed, Fixed) {
        let radians = self.to_f64();
        (
            Fixed::from_f64(libm::sin(radians)),
            Fixed::from_f64(libm::cos(radians)),
        )
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if 2 * remainder.abs() >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(saturate(round_div(
            self.0 as i128 * rhs.0 as i128,
            Self::SCALE as i128,
        )))
    }
}

impl Div for Fixed {
    type Output = Fixed;

    /// # Panics
    ///
    /// Panics if `rhs` is zero. Use [`Fixed::checked_div`] when the divisor is untrusted.
    fn div(self, rhs: Fixed) -> Fixed {
        match self.checked_div(rhs) {
            Some(value) => value,
            None => panic!("attempt to divide a Fixed by zero"),
        }
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, Add::add)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            return write!(f, "{:.*}", precision, self.to_f64());
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let int_part = abs / Self::SCALE as u64;
        let mut frac_part = abs % Self::SCALE as u64;
        if frac_part == 0 {
            return write!(f, "{}{}", sign, int_part);
        }
        let mut digits = Self::FRACTION_DIGITS;
        while frac_part % 10 == 0 {
            frac_part /= 10;
            digits -= 1;
        }
        write!(f, "{}{}.{:0width$}", sign, int_part, frac_part, width = digits)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self)
    }
}

impl FromStr for Fixed {
    type Err = GeometryError;

    /// Parses `[-+]digits[.digits]` exactly. At most six fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(GeometryError::InvalidDecimal("no digits"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(GeometryError::InvalidDecimal("unexpected character"));
        }
        if frac_part.len() > Self::FRACTION_DIGITS {
            return Err(GeometryError::TooManyFractionDigits(
                "at most six digits after the point",
            ));
        }

        let mut whole: i64 = 0;
        for b in int_part.bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|w| w.checked_add(i64::from(b - b'0')))
                .ok_or(GeometryError::Overflow("integer part too large"))?;
        }
        let mut fraction: i64 = 0;
        for b in frac_part.bytes() {
            fraction = fraction * 10 + i64::from(b - b'0');
        }
        for _ in frac_part.len()..Self::FRACTION_DIGITS {
            fraction *= 10;
        }

        let micros = whole
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(fraction))
            .ok_or(GeometryError::Overflow("integer part too large"))?;
        Ok(Fixed(if negative { -micros } else { micros }))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fixed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Fixed {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FixedVisitor;

        impl serde::de::Visitor<'_> for FixedVisitor {
            type Value = Fixed;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number or a decimal string")
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Fixed, E> {
                if !v.is_finite() {
                    return Err(E::custom("decimal must be finite"));
                }
                Ok(Fixed::from_f64(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Fixed, E> {
                v.checked_mul(Fixed::SCALE)
                    .map(Fixed)
                    .ok_or_else(|| E::custom("decimal out of range"))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Fixed, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom("decimal out of range"))
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Fixed, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FixedVisitor)
    }
}
