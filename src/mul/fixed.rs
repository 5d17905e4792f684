//! Fixed-width schoolbook multiplication.
//!
//! Square products are built by halving: each operand is split into a low and
//! a high half, the four half products come from the level below, and they are
//! summed into a double-width accumulator. The recursion bottoms out at the
//! 128-bit limb widening multiply. The `madd*` variants differ from `mul*` only
//! in pre-loading the accumulator with their addends; the result always fits,
//! since `(2^n - 1)^2 + 2 * (2^n - 1) = 2^2n - 1`.

use crate::{
    carry::{add_at, propagate_carry},
    limb::Limb,
    mul::mn::mac_row,
    uint::{U128, U256, U512, U640, U1024, U2048, U4096, WideUint},
};

/// `acc + a * b` for `L`-limb operands, from four `H`-limb half products.
#[inline(always)]
fn madd_square<const H: usize, const L: usize, const P: usize>(
    a: &WideUint<L>,
    b: &WideUint<L>,
    mut acc: WideUint<P>,
    half_mul: impl Fn(&WideUint<H>, &WideUint<H>) -> WideUint<L>,
) -> WideUint<P> {
    const {
        assert!(
            2 * H == L && 2 * L == P,
            "operands split in halves into a double-width product"
        )
    };

    let (a_lo, a_hi) = a.split_halves::<H>();
    let (b_lo, b_hi) = b.split_halves::<H>();

    let ll = half_mul(&a_lo, &b_lo);
    let lh = half_mul(&a_lo, &b_hi);
    let hl = half_mul(&a_hi, &b_lo);
    let hh = half_mul(&a_hi, &b_hi);

    // The two cross products share a column; their sum may spill one bit,
    // which belongs at offset H + L.
    let (mid, mid_carry) = lh.overflowing_add(&hl);

    let limbs = &mut acc.as_limbs_mut()[..];
    let mut overflow = add_at(limbs, 0, ll.as_limbs());
    overflow |= add_at(limbs, H, mid.as_limbs());
    overflow |= add_at(limbs, L, hh.as_limbs());
    overflow |= propagate_carry(&mut limbs[H + L..], u128::from_carry(mid_carry));
    debug_assert!(!overflow, "multiply-add exceeded {P} limbs");

    acc
}

/// `a2 + m1 * m2 + a1` as a single row of multiply-adds over the limbs of
/// `m1`, seeded with `a1` as the initial carry.
#[inline(always)]
fn madd_row512x128(m1: &U512, m2: u128, a1: u128, a2: [u128; 4]) -> U640 {
    let mut limbs = [0; 5];
    limbs[..4].copy_from_slice(&a2);
    limbs[4] = mac_row(&mut limbs[..4], m1.as_limbs(), m2, a1);
    U640::new(limbs)
}

//
// 128 x 128
//

/// `a * b`: the limb widening multiply.
#[inline]
pub fn mul128x128(a: &U128, b: &U128) -> U256 {
    let (lo, hi) = Limb::widening_mul(a.limb(0), b.limb(0));
    U256::new([lo, hi])
}

/// `a * b + c`.
#[inline]
pub fn madd128x128a128(a: &U128, b: &U128, c: &U128) -> U256 {
    let (lo, hi) = Limb::mul_add(a.limb(0), b.limb(0), c.limb(0));
    U256::new([lo, hi])
}

/// `a * b + c + d`.
#[inline]
pub fn madd128x128a128a128(a: &U128, b: &U128, c: &U128, d: &U128) -> U256 {
    let (lo, hi) = Limb::mul_add2(a.limb(0), b.limb(0), c.limb(0), d.limb(0));
    U256::new([lo, hi])
}

//
// 256 x 256
//

/// `a * b`.
#[inline]
pub fn mul256x256(a: &U256, b: &U256) -> U512 {
    madd_square::<1, 2, 4>(a, b, U512::ZERO, mul128x128)
}

/// `a * b + c`.
#[inline]
pub fn madd256x256a256(a: &U256, b: &U256, c: &U256) -> U512 {
    madd_square::<1, 2, 4>(a, b, c.resize(), mul128x128)
}

//
// 512 x 128
//

/// `m1 * m2`.
#[inline]
pub fn mul512x128(m1: &U512, m2: &U128) -> U640 {
    madd_row512x128(m1, m2.limb(0), 0, [0; 4])
}

/// `m1 * m2 + a1`.
#[inline]
pub fn madd512x128a128(m1: &U512, m2: &U128, a1: &U128) -> U640 {
    madd_row512x128(m1, m2.limb(0), a1.limb(0), [0; 4])
}

/// `m1 * m2 + a2`.
#[inline]
pub fn madd512x128a512(m1: &U512, m2: &U128, a2: &U512) -> U640 {
    madd_row512x128(m1, m2.limb(0), 0, a2.to_limbs())
}

/// `m1 * m2 + a1 + a2`.
#[inline]
pub fn madd512x128a128a512(m1: &U512, m2: &U128, a1: &U128, a2: &U512) -> U640 {
    madd_row512x128(m1, m2.limb(0), a1.limb(0), a2.to_limbs())
}

//
// 512 x 512
//

/// `m1 * m2`.
#[inline]
pub fn mul512x512(m1: &U512, m2: &U512) -> U1024 {
    madd_square::<2, 4, 8>(m1, m2, U1024::ZERO, mul256x256)
}

/// `m1 * m2 + a1`.
#[inline]
pub fn madd512x512a512(m1: &U512, m2: &U512, a1: &U512) -> U1024 {
    madd_square::<2, 4, 8>(m1, m2, a1.resize(), mul256x256)
}

/// `m1 * m2 + a1 + a2`.
#[inline]
pub fn madd512x512a512a512(m1: &U512, m2: &U512, a1: &U512, a2: &U512) -> U1024 {
    let (sum, carry) = a1.overflowing_add(a2);
    let mut acc: U1024 = sum.resize();
    acc.as_limbs_mut()[4] = u128::from_carry(carry);
    madd_square::<2, 4, 8>(m1, m2, acc, mul256x256)
}

//
// 1024 x 1024 and 2048 x 2048
//

/// `m1 * m2`.
#[inline]
pub fn mul1024x1024(m1: &U1024, m2: &U1024) -> U2048 {
    madd_square::<4, 8, 16>(m1, m2, U2048::ZERO, mul512x512)
}

/// `m1 * m2`.
#[inline]
pub fn mul2048x2048(m1: &U2048, m2: &U2048) -> U4096 {
    madd_square::<8, 16, 32>(m1, m2, U4096::ZERO, mul1024x1024)
}
