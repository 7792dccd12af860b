//! Inclusive integer intervals and the rounding helpers used by bound transfer.

use serde::Serialize;
use std::fmt;

/// An inclusive integer interval `[lo, hi]`.
///
/// `lo > hi` is the empty interval. Bound transfer returns it when no operand
/// value can keep a result inside the requested target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    pub lo: i64,
    pub hi: i64,
}

impl Interval {
    /// The canonical empty interval.
    pub const EMPTY: Interval = Interval { lo: 1, hi: 0 };

    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    /// The symmetric range `[-bound, bound]`.
    pub const fn symmetric(bound: i64) -> Self {
        Self {
            lo: -bound,
            hi: bound,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// `hi - lo`; negative for empty intervals.
    pub fn width(&self) -> i64 {
        self.hi.saturating_sub(self.lo)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Whether every value of `other` lies in `self`.
    pub fn covers(&self, other: &Interval) -> bool {
        other.is_empty() || (self.lo <= other.lo && other.hi <= self.hi)
    }

    /// Elementwise max of lowers, min of uppers.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval {
            lo: self.lo.max(other.lo),
            hi: self.hi.min(other.hi),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(f, "({}, {})", self.lo, self.hi)
        }
    }
}

/// `⌊a / k⌋` for a positive divisor.
pub fn floor_div(a: i64, k: i64) -> i64 {
    debug_assert!(k > 0);
    a.div_euclid(k)
}

/// Largest `r` with `r * r <= n`. Zero for non-positive `n`.
pub fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as i64;
    while r > 0 && r.saturating_mul(r) > n {
        r -= 1;
    }
    while (r + 1).saturating_mul(r + 1) <= n {
        r += 1;
    }
    r
}

/// Smallest `r >= 0` with `r * r >= n`.
pub fn ceil_sqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let r = isqrt(n);
    if r * r == n {
        r
    } else {
        r + 1
    }
}

/// Largest `r >= 0` with `r^k <= n`. Zero for non-positive `n`.
pub fn iroot(n: i64, k: u32) -> i64 {
    if n <= 0 {
        return 0;
    }
    if k <= 1 {
        return n;
    }
    let mut r = (n as f64).powf(1.0 / k as f64) as i64;
    while r > 0 && r.checked_pow(k).map_or(true, |p| p > n) {
        r -= 1;
    }
    while (r + 1).checked_pow(k).is_some_and(|p| p <= n) {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn intersect_narrows_both_ends() {
        let a = Interval::new(-512, 512);
        let b = Interval::new(-100, 1000);
        assert_eq!(a.intersect(&b), Interval::new(-100, 512));
        assert!(Interval::new(5, 10).intersect(&Interval::new(11, 20)).is_empty());
    }

    #[test]
    fn floor_division_rounds_down() {
        assert_eq!(floor_div(-3, 2), -2);
        assert_eq!(floor_div(3, 2), 1);
        assert_eq!(floor_div(-512, 10), -52);
    }

    #[test]
    fn integer_roots() {
        assert_eq!(isqrt(511), 22);
        assert_eq!(isqrt(512), 22);
        assert_eq!(isqrt(529), 23);
        assert_eq!(ceil_sqrt(512), 23);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(iroot(512, 10), 1);
        assert_eq!(iroot(1024, 10), 2);
        assert_eq!(iroot(1023, 10), 1);
        assert_eq!(iroot(0, 3), 0);
    }

    proptest! {
        #[test]
        fn roots_bracket_their_argument(n in 0i64..4_000_000, k in 2u32..=12) {
            let r = isqrt(n);
            prop_assert!(r * r <= n && (r + 1) * (r + 1) > n);
            let c = ceil_sqrt(n);
            prop_assert!(c * c >= n && (c == 0 || (c - 1) * (c - 1) < n));
            let q = iroot(n, k);
            prop_assert!(q.pow(k) <= n);
            prop_assert!((q + 1).checked_pow(k).map_or(true, |p| p > n));
        }

        #[test]
        fn intersection_is_contained_in_both(a in -600i64..600, b in -600i64..600, c in -600i64..600, d in -600i64..600) {
            let x = Interval::new(a.min(b), a.max(b));
            let y = Interval::new(c.min(d), c.max(d));
            let z = x.intersect(&y);
            prop_assert!(x.covers(&z) && y.covers(&z));
        }
    }

    #[test]
    fn display_marks_empty() {
        assert_eq!(Interval::new(-512, 512).to_string(), "(-512, 512)");
        assert_eq!(Interval::EMPTY.to_string(), "(empty)");
    }
}
