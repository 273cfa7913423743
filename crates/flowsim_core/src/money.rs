//! Fixed-point US dollar amounts
//!
//! Amounts are stored as a signed count of cents. Arithmetic stays in integers;
//! floating point only appears in amortization math, which rounds back through
//! [`Usd::round_from_dollars`].

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A signed amount of US dollars, in hundredths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Usd(i64);

impl Usd {
    pub const ZERO: Usd = Usd(0);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Usd(cents)
    }

    #[inline]
    pub const fn dollars(dollars: i64) -> Self {
        Usd(dollars * 100)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Value in dollars as a float, for amortization math and reporting.
    #[inline]
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Round a dollar amount to the nearest cent, halves away from zero.
    #[inline]
    pub fn round_from_dollars(dollars: f64) -> Self {
        Usd((dollars * 100.0).round() as i64)
    }

    /// Truncate a dollar amount toward zero at cent precision.
    #[inline]
    pub fn truncate_from_dollars(dollars: f64) -> Self {
        Usd((dollars * 100.0) as i64)
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for Usd {
    type Output = Usd;

    fn add(self, rhs: Usd) -> Usd {
        Usd(self.0 + rhs.0)
    }
}

impl AddAssign for Usd {
    fn add_assign(&mut self, rhs: Usd) {
        self.0 += rhs.0;
    }
}

impl Sub for Usd {
    type Output = Usd;

    fn sub(self, rhs: Usd) -> Usd {
        Usd(self.0 - rhs.0)
    }
}

impl SubAssign for Usd {
    fn sub_assign(&mut self, rhs: Usd) {
        self.0 -= rhs.0;
    }
}

impl Neg for Usd {
    type Output = Usd;

    fn neg(self) -> Usd {
        Usd(-self.0)
    }
}

impl Mul<i64> for Usd {
    type Output = Usd;

    fn mul(self, rhs: i64) -> Usd {
        Usd(self.0 * rhs)
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Usd>>(iter: I) -> Usd {
        iter.fold(Usd::ZERO, Add::add)
    }
}

/// Group the integer part with commas: 1234567 -> "1,234,567"
fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let whole = group_thousands(abs / 100);
        let frac = abs % 100;
        if self.0 < 0 {
            write!(f, "(${whole}.{frac:02})")
        } else {
            write!(f, "${whole}.{frac:02}")
        }
    }
}

// Configuration files carry plain dollar amounts (e.g. `7000.0`).
impl Serialize for Usd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Usd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Ok(Usd::round_from_dollars(dollars))
    }
}
