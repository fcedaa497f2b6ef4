//! Numeric kernel used while canonicalizing.
//!
//! Exact rationals (`BigRational`) and machine floats. Floats are compared and
//! hashed by bit pattern so that they can live in the hash-consed node table.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// `f64` with bitwise equality.
#[derive(Debug, Copy, Clone)]
pub struct Float(f64);

impl Float {
    pub fn new(value: f64) -> Self {
        // One representation for zero and for NaN.
        if value == 0.0 {
            Float(0.0)
        } else if value.is_nan() {
            Float(f64::NAN)
        } else {
            Float(value)
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float {}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Number {
    Rational(BigRational),
    Float(Float),
}

impl Number {
    pub fn zero() -> Self {
        Number::Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Number::Rational(BigRational::one())
    }

    pub fn from_i64(value: i64) -> Self {
        Number::Rational(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Number::Rational(BigRational::from_integer(value))
    }

    /// `p/q` in lowest terms, or `None` when `q == 0`.
    pub fn rational(p: impl Into<BigInt>, q: impl Into<BigInt>) -> Option<Self> {
        let q = q.into();
        if q.is_zero() {
            return None;
        }
        Some(Number::Rational(BigRational::new(p.into(), q)))
    }

    pub fn float(value: f64) -> Self {
        Number::Float(Float::new(value))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn is_fraction(&self) -> bool {
        matches!(self, Number::Rational(r) if !r.is_integer())
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Numeric zero (`0` or `0.0`).
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => f.get() == 0.0,
        }
    }

    /// Exactly the integer one.
    pub fn is_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_one())
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_positive(),
            Number::Float(f) => f.get() > 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => f.get() < 0.0,
        }
    }

    pub fn as_integer(&self) -> Option<BigInt> {
        match self {
            Number::Rational(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => {
                let n = r.numer().to_f64().unwrap_or(f64::NAN);
                let d = r.denom().to_f64().unwrap_or(f64::NAN);
                n / d
            }
            Number::Float(f) => f.get(),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a + b),
            _ => Number::float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a * b),
            _ => Number::float(self.to_f64() * other.to_f64()),
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::float(-f.get()),
        }
    }

    pub fn abs(&self) -> Number {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// `self ** exp` when the result is again a number, `None` otherwise.
    ///
    /// Exact results are produced for integer exponents and for rational
    /// exponents whose root is exact. Zero to a negative power, negative bases
    /// with fractional exponents and exponents too large to evaluate are left
    /// for the caller.
    pub fn pow(&self, exp: &Number) -> Option<Number> {
        match (self, exp) {
            (Number::Rational(b), Number::Rational(e)) if e.is_integer() => {
                let k = e.to_integer().to_i32()?;
                rational_powi(b, k).map(Number::Rational)
            }
            (Number::Rational(b), Number::Rational(e)) => {
                if b.is_negative() {
                    return None;
                }
                let q = e.denom().to_u32()?;
                let p = e.numer().to_i32()?;
                let numer = exact_root(b.numer(), q)?;
                let denom = exact_root(b.denom(), q)?;
                rational_powi(&BigRational::new(numer, denom), p).map(Number::Rational)
            }
            _ => {
                let (b, e) = (self.to_f64(), exp.to_f64());
                if b < 0.0 && e.fract() != 0.0 {
                    return None;
                }
                if b == 0.0 && e < 0.0 {
                    return None;
                }
                Some(Number::float(b.powf(e)))
            }
        }
    }

    /// Order within a single numeric kind; rationals sort before floats.
    pub fn cmp_total(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.get().total_cmp(&b.get()),
            (Number::Rational(_), Number::Float(_)) => Ordering::Less,
            (Number::Float(_), Number::Rational(_)) => Ordering::Greater,
        }
    }

    /// Numeric comparison across kinds; `None` when a NaN is involved.
    pub fn partial_cmp_value(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Some(a.cmp(b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

/// Largest result, in bits of numerator or denominator, that `pow` evaluates.
const MAX_POW_BITS: u64 = 1 << 20;

fn rational_powi(base: &BigRational, k: i32) -> Option<BigRational> {
    if base.abs().is_one() {
        return Some(if k % 2 == 0 { BigRational::one() } else { base.clone() });
    }
    let bits = base.numer().bits().max(base.denom().bits());
    if bits.saturating_mul(k.unsigned_abs() as u64) > MAX_POW_BITS {
        return None;
    }
    if k >= 0 {
        let k = k as u32;
        Some(BigRational::new(base.numer().pow(k), base.denom().pow(k)))
    } else {
        if base.is_zero() {
            return None;
        }
        let k = k.unsigned_abs();
        Some(BigRational::new(base.denom().pow(k), base.numer().pow(k)))
    }
}

fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if n == 0 || value.is_negative() {
        return None;
    }
    let root = value.nth_root(n);
    if &root.pow(n) == value {
        Some(root)
    } else {
        None
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Rational(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Number::Float(x) => write!(f, "{:?}", x.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn q(p: i64, d: i64) -> Number {
        Number::rational(p, d).unwrap()
    }

    #[test]
    fn test_rational_lowest_terms() {
        assert_eq!(q(5, 15), q(1, 3));
        assert_eq!(q(4, 2), Number::from_i64(2));
        assert!(q(4, 2).is_integer());
        assert!(q(1, 3).is_fraction());
        assert_eq!(Number::rational(1, 0), None);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(q(1, 2).add(&q(1, 3)), q(5, 6));
        assert_eq!(q(2, 3).mul(&q(3, 4)), q(1, 2));
        assert_eq!(Number::from_i64(3).neg(), Number::from_i64(-3));
        assert_eq!(Number::from_i64(1).add(&Number::float(0.5)), Number::float(1.5));
    }

    #[test]
    fn test_integer_powers() {
        let two = Number::from_i64(2);
        assert_eq!(two.pow(&Number::from_i64(10)), Some(Number::from_i64(1024)));
        assert_eq!(two.pow(&Number::from_i64(-2)), Some(q(1, 4)));
        assert_eq!(Number::zero().pow(&Number::from_i64(-1)), None);
        assert_eq!(Number::zero().pow(&Number::from_i64(0)), Some(Number::one()));
    }

    #[test]
    fn test_huge_powers_are_left_alone() {
        let huge = Number::from_i64(2_000_000_000);
        assert_eq!(Number::from_i64(10).pow(&huge), None);
        assert_eq!(q(1, 3).pow(&huge.neg()), None);
        assert_eq!(Number::one().pow(&huge), Some(Number::one()));
        assert_eq!(Number::from_i64(-1).pow(&huge), Some(Number::one()));
        assert_eq!(
            Number::from_i64(-1).pow(&Number::from_i64(2_000_000_001)),
            Some(Number::from_i64(-1))
        );
        assert_eq!(Number::zero().pow(&huge), Some(Number::zero()));
    }

    #[test]
    fn test_exact_roots() {
        assert_eq!(Number::from_i64(4).pow(&q(1, 2)), Some(Number::from_i64(2)));
        assert_eq!(q(8, 27).pow(&q(2, 3)), Some(q(4, 9)));
        assert_eq!(Number::from_i64(2).pow(&q(1, 2)), None);
        assert_eq!(Number::from_i64(-4).pow(&q(1, 2)), None);
    }

    #[test]
    fn test_float_powers() {
        assert_eq!(Number::float(4.0).pow(&q(1, 2)), Some(Number::float(2.0)));
        assert_eq!(Number::float(-4.0).pow(&q(1, 2)), None);
    }

    #[test]
    fn test_float_zero_and_nan_are_unique() {
        assert_eq!(Number::float(-0.0), Number::float(0.0));
        assert_eq!(Number::float(f64::NAN), Number::float(-f64::NAN));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(q(1, 2).cmp_total(&q(1, 3)), Ordering::Greater);
        assert_eq!(q(1, 2).cmp_total(&Number::float(0.1)), Ordering::Less);
        assert_eq!(
            q(1, 2).partial_cmp_value(&Number::float(0.75)),
            Some(Ordering::Less)
        );
        assert_eq!(Number::float(f64::NAN).partial_cmp_value(&Number::one()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::from_i64(-7).to_string(), "-7");
        assert_eq!(q(3, 4).to_string(), "3/4");
        assert_eq!(Number::float(2.0).to_string(), "2.0");
    }
}
