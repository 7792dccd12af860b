//! Scalar operators: the lambdas that combinators are built from.
//!
//! Each operator pairs its evaluation rule with a bound transfer: given the
//! interval its result must land in, return the interval(s) its operands must
//! be drawn from. Transfers are sufficient, not exact.

use crate::interval::{ceil_sqrt, floor_div, iroot, isqrt, Interval};
use std::fmt;

/// `int -> int` operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Idt,
    Inc,
    Dec,
    Shl,
    Shr,
    Neg,
    Mul3,
    Div3,
    Mul4,
    Div4,
    Sqr,
}

/// `int -> bool` operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    IsPos,
    IsNeg,
    IsOdd,
    IsEven,
}

/// `int -> int -> int` operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Min,
    Max,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 11] = [
        UnaryOp::Idt,
        UnaryOp::Inc,
        UnaryOp::Dec,
        UnaryOp::Shl,
        UnaryOp::Shr,
        UnaryOp::Neg,
        UnaryOp::Mul3,
        UnaryOp::Div3,
        UnaryOp::Mul4,
        UnaryOp::Div4,
        UnaryOp::Sqr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Idt => "IDT",
            UnaryOp::Inc => "INC",
            UnaryOp::Dec => "DEC",
            UnaryOp::Shl => "SHL",
            UnaryOp::Shr => "SHR",
            UnaryOp::Neg => "doNEG",
            UnaryOp::Mul3 => "MUL3",
            UnaryOp::Div3 => "DIV3",
            UnaryOp::Mul4 => "MUL4",
            UnaryOp::Div4 => "DIV4",
            UnaryOp::Sqr => "SQR",
        }
    }

    pub fn apply(&self, x: i64) -> i64 {
        match self {
            UnaryOp::Idt => x,
            UnaryOp::Inc => x.saturating_add(1),
            UnaryOp::Dec => x.saturating_sub(1),
            UnaryOp::Shl => x.saturating_mul(2),
            UnaryOp::Shr => x / 2,
            UnaryOp::Neg => x.saturating_neg(),
            UnaryOp::Mul3 => x.saturating_mul(3),
            UnaryOp::Div3 => x / 3,
            UnaryOp::Mul4 => x.saturating_mul(4),
            UnaryOp::Div4 => x / 4,
            UnaryOp::Sqr => x.saturating_mul(x),
        }
    }

    /// Operand interval guaranteeing `apply(x)` lies in `target`.
    pub fn transfer(&self, target: Interval) -> Interval {
        let Interval { lo: a, hi: b } = target;
        match self {
            UnaryOp::Idt => target,
            UnaryOp::Inc => Interval::new(a.saturating_sub(1), b.saturating_sub(1)),
            UnaryOp::Dec => Interval::new(a.saturating_add(1), b.saturating_add(1)),
            UnaryOp::Shl => scale_down(target, 2),
            UnaryOp::Mul3 => scale_down(target, 3),
            UnaryOp::Mul4 => scale_down(target, 4),
            UnaryOp::Shr => Interval::new(a.saturating_mul(2), b.saturating_mul(2)),
            UnaryOp::Div3 => scale_up(target, 3),
            UnaryOp::Div4 => scale_up(target, 4),
            UnaryOp::Neg => Interval::new(b.saturating_neg(), a.saturating_neg()),
            UnaryOp::Sqr => sqr_bounds(target),
        }
    }
}

impl Predicate {
    pub const ALL: [Predicate; 4] = [
        Predicate::IsPos,
        Predicate::IsNeg,
        Predicate::IsOdd,
        Predicate::IsEven,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::IsPos => "isPOS",
            Predicate::IsNeg => "isNEG",
            Predicate::IsOdd => "isODD",
            Predicate::IsEven => "isEVEN",
        }
    }

    pub fn test(&self, x: i64) -> bool {
        match self {
            Predicate::IsPos => x > 0,
            Predicate::IsNeg => x < 0,
            Predicate::IsOdd => x.rem_euclid(2) == 1,
            Predicate::IsEven => x.rem_euclid(2) == 0,
        }
    }

    /// A predicate never changes the values it selects.
    pub fn transfer(&self, target: Interval) -> Interval {
        target
    }
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 5] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Min,
        BinaryOp::Max,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Min => "MIN",
            BinaryOp::Max => "MAX",
        }
    }

    pub fn apply(&self, x: i64, y: i64) -> i64 {
        match self {
            BinaryOp::Add => x.saturating_add(y),
            BinaryOp::Sub => x.saturating_sub(y),
            BinaryOp::Mul => x.saturating_mul(y),
            BinaryOp::Min => x.min(y),
            BinaryOp::Max => x.max(y),
        }
    }

    /// Interval for both operands guaranteeing `apply(x, y)` lies in `target`.
    pub fn transfer(&self, target: Interval) -> Interval {
        match self {
            BinaryOp::Add => halve(target),
            BinaryOp::Sub => sub_bounds(target),
            BinaryOp::Mul => mul_bounds(target),
            BinaryOp::Min | BinaryOp::Max => target,
        }
    }
}

/// Any scalar operator, used when resolving operator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarOp {
    Unary(UnaryOp),
    Predicate(Predicate),
    Binary(BinaryOp),
}

impl ScalarOp {
    pub fn all() -> impl Iterator<Item = ScalarOp> {
        UnaryOp::ALL
            .into_iter()
            .map(ScalarOp::Unary)
            .chain(Predicate::ALL.into_iter().map(ScalarOp::Predicate))
            .chain(BinaryOp::ALL.into_iter().map(ScalarOp::Binary))
    }

    pub fn from_name(name: &str) -> Option<ScalarOp> {
        Self::all().find(|op| op.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarOp::Unary(op) => op.name(),
            ScalarOp::Predicate(p) => p.name(),
            ScalarOp::Binary(op) => op.name(),
        }
    }
}

impl fmt::Display for ScalarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operand range for `x * k`.
fn scale_down(target: Interval, k: i64) -> Interval {
    Interval::new(target.lo.saturating_add(k - 1) / k, floor_div(target.hi, k))
}

/// Operand range for `x / k` truncated. Identity when the target spans zero,
/// since truncating division moves values toward zero.
fn scale_up(target: Interval, k: i64) -> Interval {
    let lo = if target.lo > 0 {
        target.lo.saturating_mul(k)
    } else {
        target.lo
    };
    let hi = if target.hi < 0 {
        target.hi.saturating_mul(k)
    } else {
        target.hi
    };
    Interval::new(lo, hi)
}

fn sqr_bounds(target: Interval) -> Interval {
    let Interval { lo: a, hi: b } = target;
    if b < 0 {
        return Interval::EMPTY;
    }
    let r = isqrt(b);
    if a <= 0 {
        Interval::new(-r, r)
    } else {
        Interval::new(ceil_sqrt(a), r)
    }
}

/// Symmetric operand range for products: `|x|, |y| <= sqrt(min(-A, B))`.
/// Targets above zero get a positive-only range instead.
fn mul_bounds(target: Interval) -> Interval {
    let Interval { lo: a, hi: b } = target;
    if b < 0 {
        return Interval::EMPTY;
    }
    if a > 0 {
        return Interval::new(ceil_sqrt(a), isqrt(b));
    }
    let r = isqrt(b.min(a.saturating_neg()));
    Interval::new(-r, r)
}

/// Two operands from this range sum into `target`.
fn halve(target: Interval) -> Interval {
    Interval::new(target.lo / 2 + 1, floor_div(target.hi, 2))
}

/// Differences span the operand width in both directions, so the width is
/// capped by the smaller side of the target.
fn sub_bounds(target: Interval) -> Interval {
    let m = target.hi.min(target.lo.saturating_neg());
    if m < 0 {
        return Interval::EMPTY;
    }
    let window = Interval::new(-(m - m / 2), m / 2);
    halve(target).intersect(&window)
}

/// Elements for `n` terms (`1 <= n <= len`) summing into `target`.
pub fn sum_bounds(target: Interval, len: usize) -> Interval {
    let l = len.max(1) as i64;
    let Interval { lo: a, hi: b } = target;
    let lo = if a >= 0 { a } else { a / l + 1 };
    let hi = if b >= 0 { floor_div(b, l) } else { b };
    Interval::new(lo, hi)
}

/// Elements for running differences `x0 - x1 - ... - xn` over `len` terms.
pub fn alternating_bounds(target: Interval, len: usize) -> Interval {
    let l = len.max(1) as i64;
    let m = target.hi.min(target.lo.saturating_neg());
    if m < 0 {
        return Interval::EMPTY;
    }
    let r = m / l;
    sum_bounds(target, len).intersect(&Interval::new(-r, r))
}

/// Elements for running products over `len` terms.
pub fn product_bounds(target: Interval, len: usize) -> Interval {
    let k = len.max(1) as u32;
    let Interval { lo: a, hi: b } = target;
    if b < 0 {
        return Interval::EMPTY;
    }
    if a > 0 {
        return Interval::new(a, iroot(b, k));
    }
    let r = iroot(b.min(a.saturating_neg()), k);
    Interval::new(-r, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: Interval = Interval::symmetric(512);

    #[test]
    fn names_resolve_to_operators() {
        assert_eq!(ScalarOp::from_name("doNEG"), Some(ScalarOp::Unary(UnaryOp::Neg)));
        assert_eq!(ScalarOp::from_name("isEVEN"), Some(ScalarOp::Predicate(Predicate::IsEven)));
        assert_eq!(ScalarOp::from_name("*"), Some(ScalarOp::Binary(BinaryOp::Mul)));
        assert_eq!(ScalarOp::from_name("NEG"), None);
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(UnaryOp::Shr.apply(-3), -1);
        assert_eq!(UnaryOp::Div3.apply(-5), -1);
        assert_eq!(UnaryOp::Div4.apply(7), 1);
    }

    #[test]
    fn odd_handles_negative_numbers() {
        assert!(Predicate::IsOdd.test(-3));
        assert!(!Predicate::IsEven.test(-3));
        assert!(Predicate::IsEven.test(0));
    }

    #[test]
    fn transfer_on_default_range() {
        assert_eq!(UnaryOp::Inc.transfer(FULL), Interval::new(-513, 511));
        assert_eq!(UnaryOp::Shl.transfer(FULL), Interval::new(-255, 256));
        assert_eq!(UnaryOp::Shr.transfer(FULL), Interval::new(-1024, 1024));
        assert_eq!(UnaryOp::Mul3.transfer(FULL), Interval::new(-170, 170));
        assert_eq!(UnaryOp::Mul4.transfer(FULL), Interval::new(-127, 128));
        assert_eq!(UnaryOp::Div3.transfer(FULL), FULL);
        assert_eq!(UnaryOp::Sqr.transfer(FULL), Interval::new(-22, 22));
        assert_eq!(BinaryOp::Add.transfer(FULL), Interval::new(-255, 256));
        assert_eq!(BinaryOp::Sub.transfer(FULL), Interval::new(-255, 256));
        assert_eq!(BinaryOp::Mul.transfer(FULL), Interval::new(-22, 22));
    }

    #[test]
    fn square_of_zero_only_target() {
        assert_eq!(UnaryOp::Sqr.transfer(Interval::new(-5, 0)), Interval::new(0, 0));
        assert!(UnaryOp::Sqr.transfer(Interval::new(-5, -1)).is_empty());
        assert_eq!(UnaryOp::Sqr.transfer(Interval::new(4, 10)), Interval::new(2, 3));
    }

    #[test]
    fn difference_needs_room_on_both_sides() {
        assert!(BinaryOp::Sub.transfer(Interval::new(1, 10)).is_empty());
        let t = BinaryOp::Sub.transfer(Interval::new(-512, 100));
        assert!(t.width() <= 100);
    }

    #[test]
    fn list_scaled_bounds() {
        assert_eq!(sum_bounds(FULL, 10), Interval::new(-50, 51));
        assert_eq!(alternating_bounds(FULL, 10), Interval::new(-50, 51));
        assert_eq!(product_bounds(FULL, 10), Interval::new(-1, 1));
        assert_eq!(product_bounds(FULL, 3), Interval::new(-8, 8));
    }
}
