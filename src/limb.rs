//! Single-limb arithmetic: the widening multiply every wider product is built
//! from, plus carrying addition and borrowing subtraction.
//!
//! Two limb widths are supported. `u64` widens natively through `u128`.
//! `u128` has no wider native type, so its product is assembled from four
//! `u64 x u64` half products with the carries of the middle terms added by
//! hand.

use core::{
    fmt::{Debug, LowerHex},
    hash::Hash,
};
use num_traits::{ConstOne, ConstZero};

/// Unsigned machine word usable as a limb of a multi-precision integer.
pub trait Limb:
    Copy + Debug + LowerHex + Eq + Ord + Hash + Default + Send + Sync + ConstZero + ConstOne
{
    /// Width of the limb in bits.
    const BITS: u32;

    /// All bits set.
    const MAX: Self;

    /// Exact product of two limbs as `(lo, hi)`.
    fn widening_mul(self, rhs: Self) -> (Self, Self);

    /// Low limb of the product.
    #[inline(always)]
    fn mul_lo(self, rhs: Self) -> Self {
        self.widening_mul(rhs).0
    }

    /// High limb of the product.
    #[inline(always)]
    fn mul_hi(self, rhs: Self) -> Self {
        self.widening_mul(rhs).1
    }

    /// `self * rhs + addend` as `(lo, hi)`. Cannot overflow the double limb.
    #[inline(always)]
    fn mul_add(self, rhs: Self, addend: Self) -> (Self, Self) {
        self.mul_add2(rhs, addend, Self::ZERO)
    }

    /// `self * rhs + a + b` as `(lo, hi)`. Cannot overflow the double limb
    /// since `(2^W - 1)^2 + 2 * (2^W - 1) = 2^2W - 1`.
    fn mul_add2(self, rhs: Self, a: Self, b: Self) -> (Self, Self);

    /// `self + rhs + carry` as `(sum, carry_out)`.
    fn carrying_add(self, rhs: Self, carry: bool) -> (Self, bool);

    /// `self - rhs - borrow` as `(difference, borrow_out)`.
    fn borrowing_sub(self, rhs: Self, borrow: bool) -> (Self, bool);

    /// Zero-extends a carry flag into a limb.
    #[inline(always)]
    fn from_carry(carry: bool) -> Self {
        if carry { Self::ONE } else { Self::ZERO }
    }
}

macro_rules! impl_limb_add_sub {
    () => {
        #[inline(always)]
        fn carrying_add(self, rhs: Self, carry: bool) -> (Self, bool) {
            let (sum, c1) = self.overflowing_add(rhs);
            let (sum, c2) = sum.overflowing_add(Self::from(carry));
            (sum, c1 | c2)
        }

        #[inline(always)]
        fn borrowing_sub(self, rhs: Self, borrow: bool) -> (Self, bool) {
            let (diff, b1) = self.overflowing_sub(rhs);
            let (diff, b2) = diff.overflowing_sub(Self::from(borrow));
            (diff, b1 | b2)
        }
    };
}

impl Limb for u64 {
    const BITS: u32 = u64::BITS;
    const MAX: Self = u64::MAX;

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    fn widening_mul(self, rhs: Self) -> (Self, Self) {
        let wide = u128::from(self) * u128::from(rhs);
        (wide as u64, (wide >> u64::BITS) as u64)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn mul_add2(self, rhs: Self, a: Self, b: Self) -> (Self, Self) {
        let wide = u128::from(self) * u128::from(rhs) + u128::from(a) + u128::from(b);
        (wide as u64, (wide >> u64::BITS) as u64)
    }

    impl_limb_add_sub!();
}

const HALF_BITS: u32 = u64::BITS;
const HALF_MASK: u128 = u64::MAX as u128;

impl Limb for u128 {
    const BITS: u32 = u128::BITS;
    const MAX: Self = u128::MAX;

    #[inline(always)]
    #[allow(clippy::arithmetic_side_effects)]
    fn widening_mul(self, rhs: Self) -> (Self, Self) {
        let (a_lo, a_hi) = (self & HALF_MASK, self >> HALF_BITS);
        let (b_lo, b_hi) = (rhs & HALF_MASK, rhs >> HALF_BITS);

        // Each half product fits in 128 bits.
        let ll = a_lo * b_lo;
        let lh = a_lo * b_hi;
        let hl = a_hi * b_lo;
        let hh = a_hi * b_hi;

        // The middle column collects the upper half of ll plus the lower
        // halves of both cross products; at most 3 * (2^64 - 1), so it cannot
        // overflow.
        let mid = (ll >> HALF_BITS) + (lh & HALF_MASK) + (hl & HALF_MASK);

        let lo = (ll & HALF_MASK) | (mid << HALF_BITS);
        let hi = hh + (lh >> HALF_BITS) + (hl >> HALF_BITS) + (mid >> HALF_BITS);
        (lo, hi)
    }

    #[inline(always)]
    #[allow(clippy::arithmetic_side_effects)]
    fn mul_add2(self, rhs: Self, a: Self, b: Self) -> (Self, Self) {
        let (lo, hi) = Limb::widening_mul(self, rhs);
        let (lo, c1) = lo.overflowing_add(a);
        let (lo, c2) = lo.overflowing_add(b);
        // hi <= 2^128 - 2, so adding two carry bits stays in range.
        (lo, hi + u128::from(c1) + u128::from(c2))
    }

    impl_limb_add_sub!();
}
