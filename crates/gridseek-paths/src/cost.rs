use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// A path cost, stored in tenths of a step.
///
/// Diagonal steps cost `1.4`, which is exact in tenths, so costs compare and
/// tie exactly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(i32);

impl Cost {
    pub const ZERO: Self = Self(0);
    /// Cost of an axis-aligned step.
    pub const STRAIGHT: Self = Self(10);
    /// Cost of a diagonal step under the octile metric.
    pub const DIAGONAL: Self = Self(14);

    /// Build a cost from a number of tenths.
    #[inline]
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    #[inline]
    pub const fn tenths(self) -> i32 {
        self.0
    }

    /// The cost as a floating-point number of steps.
    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Add for Cost {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i32> for Cost {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0 * rhs)
    }
}

impl std::iter::Sum for Cost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_steps_are_exact() {
        let four = Cost::DIAGONAL * 4;
        assert_eq!(four.tenths(), 56);
        assert_eq!(four.as_f64(), 5.6);
        assert_eq!(four.to_string(), "5.6");
    }

    #[test]
    fn sums_mix_step_kinds() {
        let total: Cost = [Cost::STRAIGHT, Cost::DIAGONAL, Cost::DIAGONAL, Cost::STRAIGHT]
            .into_iter()
            .sum();
        assert_eq!(total, Cost::from_tenths(48));
        assert_eq!(Cost::STRAIGHT * 8, Cost::from_tenths(80));
        assert_eq!((Cost::STRAIGHT * 8).to_string(), "8.0");
    }
}
