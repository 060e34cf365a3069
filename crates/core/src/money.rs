use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// Signed statement amount. Negative values are debits, positive values are credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2)).normalized()
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_debit(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_credit(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Parse a bare magnitude: every character other than ASCII digits and `.` is
    /// discarded first, so `"R 1,234.50"` and `"1 234.50Cr"` both yield `1234.50`.
    pub fn parse_magnitude(raw: &str) -> Option<Self> {
        let digits: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if digits.is_empty() {
            return None;
        }
        Decimal::from_str(&digits).ok().map(Self::from_decimal)
    }

    /// Magnitude as a debit (always `<= 0`).
    pub fn debit(self) -> Self {
        Money(-self.0.abs()).normalized()
    }

    /// Magnitude as a credit (always `>= 0`).
    pub fn credit(self) -> Self {
        Money(self.0.abs())
    }

    // Keeps a negated zero from printing as "-0.00".
    fn normalized(self) -> Self {
        if self.0.is_zero() {
            Money(Decimal::ZERO)
        } else {
            self
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Plain two-place decimal with a leading `-` for debits, as written to CSV.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money::from_decimal)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0).normalized()
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0).normalized()
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_two_place_decimal() {
        assert_eq!(Money::from_cents(-10000).to_string(), "-100.00");
        assert_eq!(Money::from_cents(15).to_string(), "0.15");
        assert_eq!("1500".parse::<Money>().unwrap().to_string(), "1500.00");
    }

    #[test]
    fn negated_zero_prints_without_sign() {
        assert_eq!((-Money::zero()).to_string(), "0.00");
        assert_eq!(Money::zero().debit().to_string(), "0.00");
        assert!(!Money::zero().is_debit());
        assert!(!Money::zero().is_credit());
    }

    #[test]
    fn parse_magnitude_strips_noise() {
        assert_eq!(Money::parse_magnitude("1,234.56"), Some(Money::from_cents(123456)));
        assert_eq!(Money::parse_magnitude("1 500.00Cr"), Some(Money::from_cents(150000)));
        assert_eq!(Money::parse_magnitude("150.00-"), Some(Money::from_cents(15000)));
        assert_eq!(Money::parse_magnitude("Dr"), None);
        assert_eq!(Money::parse_magnitude("1.2.3"), None);
    }

    #[test]
    fn debit_and_credit_fix_the_sign() {
        let m = Money::from_cents(2500);
        assert_eq!(m.debit(), Money::from_cents(-2500));
        assert_eq!(m.debit().credit(), m);
        assert!(m.debit().is_debit());
        assert!(m.is_credit());
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(10000);
        let b = Money::from_cents(2550);
        assert_eq!(a - b, Money::from_cents(7450));
        assert_eq!(b - a, Money::from_cents(-7450));
        assert_eq!(a + b, Money::from_cents(12550));
    }

    #[test]
    fn equality_ignores_scale() {
        assert_eq!("100".parse::<Money>().unwrap(), Money::from_cents(10000));
    }
}
