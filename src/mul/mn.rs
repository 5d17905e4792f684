//! General M x N schoolbook multiplication over limb slices.
//!
//! Each row multiplies one limb of the left operand by the whole right operand
//! and accumulates into the output at the row's offset. `mul_add2` absorbs the
//! previous partial product and the running carry without overflow, so a row
//! ends with a single carry limb.

use crate::{
    carry::propagate_carry,
    limb::Limb,
    mul::fixed::{madd512x512a512, madd512x512a512a512, mul512x512},
    uint::U512,
};

#[inline(always)]
fn assert_output_len(out: usize, m: usize, n: usize) {
    assert!(
        out == m + n,
        "output must hold {} limbs for a {m} x {n} product, got {out}",
        m + n
    );
}

/// `acc += a * m + carry`, one schoolbook row. Returns the limb carried out
/// of the top of `acc`.
///
/// Panics if `acc` and `a` differ in length.
#[inline(always)]
pub fn mac_row<L: Limb>(acc: &mut [L], a: &[L], m: L, carry: L) -> L {
    assert_eq!(
        acc.len(),
        a.len(),
        "operand length mismatch: acc = {}, a = {}",
        acc.len(),
        a.len()
    );
    let mut carry = carry;
    for (acc, &a) in acc.iter_mut().zip(a) {
        (*acc, carry) = a.mul_add2(m, *acc, carry);
    }
    carry
}

/// `out = a * b`, with `out.len() == a.len() + b.len()`.
///
/// Every limb of `out` is written. Panics on a length mismatch before
/// touching `out`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mul_mn"))]
pub fn mul_mn<L: Limb>(out: &mut [L], a: &[L], b: &[L]) {
    assert_output_len(out.len(), a.len(), b.len());
    out.fill(L::ZERO);

    let n = b.len();
    for (i, &m) in a.iter().enumerate() {
        out[i + n] = mac_row(&mut out[i..i + n], b, m, L::ZERO);
    }
}

/// `out = a * b + addend`, with `addend` zero-extended to `out.len()`.
///
/// Returns `true` if the sum did not fit. That cannot happen while
/// `addend.len() <= max(a.len(), b.len())`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "madd_mn"))]
pub fn madd_mn<L: Limb>(out: &mut [L], a: &[L], b: &[L], addend: &[L]) -> bool {
    assert_output_len(out.len(), a.len(), b.len());
    assert!(
        addend.len() <= out.len(),
        "addend of {} limbs does not fit an output of {} limbs",
        addend.len(),
        out.len()
    );
    let (low, high) = out.split_at_mut(addend.len());
    low.copy_from_slice(addend);
    high.fill(L::ZERO);

    let n = b.len();
    let mut overflow = false;
    for (i, &m) in a.iter().enumerate() {
        let carry = mac_row(&mut out[i..i + n], b, m, L::ZERO);
        overflow |= propagate_carry(&mut out[i + n..], carry);
    }
    overflow
}

/// Low `out.len()` limbs of `a * b`. Returns `true` if any part of the
/// product was cut off.
pub fn mul_mn_truncated<L: Limb>(out: &mut [L], a: &[L], b: &[L]) -> bool {
    out.fill(L::ZERO);

    let width = out.len();
    let b_is_zero = b.iter().all(|&l| l == L::ZERO);
    let mut overflow = false;

    for (i, &m) in a.iter().enumerate() {
        if m == L::ZERO {
            continue;
        }
        if i >= width {
            overflow |= !b_is_zero;
            continue;
        }

        let k = b.len().min(width - i);
        let carry = mac_row(&mut out[i..i + k], &b[..k], m, L::ZERO);
        overflow |= b[k..].iter().any(|&l| l != L::ZERO);
        overflow |= if i + k < width {
            propagate_carry(&mut out[i + k..], carry)
        } else {
            carry != L::ZERO
        };
    }
    overflow
}

/// `out = m1 * m2` over 128-bit limbs.
#[inline]
pub fn mul128_mn(out: &mut [u128], m1: &[u128], m2: &[u128]) {
    mul_mn(out, m1, m2);
}

/// `out = m1 * m2` over 512-bit limbs, with `out.len() == m1.len() + m2.len()`.
///
/// Rows are built from the fixed-width 512 x 512 multiply-adds, so each step
/// absorbs the partial product below it and the running carry.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mul512_mn"))]
pub fn mul512_mn(out: &mut [U512], m1: &[U512], m2: &[U512]) {
    assert_output_len(out.len(), m1.len(), m2.len());
    out.fill(U512::ZERO);

    let n = m2.len();
    for (i, a) in m1.iter().enumerate() {
        let mut carry = U512::ZERO;
        for (j, b) in m2.iter().enumerate() {
            let product = match (i, j) {
                (0, 0) => mul512x512(a, b),
                (0, _) => madd512x512a512(a, b, &carry),
                (_, 0) => madd512x512a512(a, b, &out[i]),
                _ => madd512x512a512a512(a, b, &carry, &out[i + j]),
            };
            (out[i + j], carry) = product.split_halves::<4>();
        }
        out[i + n] = carry;
    }
}


#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod prop_tests {
    use super::*;
    use crate::mul::fixed::{madd512x512a512a512, mul512x128, mul1024x1024};
    use crate::uint::{U128, U1024, WideUint};
    use alloc::{vec, vec::Vec};
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn to_big<L: Limb + Into<u128>>(limbs: &[L]) -> BigUint {
        limbs.iter().rev().fold(BigUint::default(), |acc, &l| {
            let l: u128 = l.into();
            (acc << L::BITS) + BigUint::from(l)
        })
    }

    fn any_limb() -> impl Strategy<Value = u128> {
        prop_oneof![
            2 => Just(u128::MAX),
            1 => Just(0_u128),
            4 => any::<u128>(),
        ]
    }

    fn limbs(max_len: usize) -> impl Strategy<Value = Vec<u128>> {
        proptest::collection::vec(any_limb(), 0..=max_len)
    }

    fn any_u512() -> impl Strategy<Value = U512> {
        proptest::collection::vec(any_limb(), 4)
            .prop_map(|l| WideUint::try_from(&l[..]).expect("length is 4"))
    }

    proptest! {
        #[test]
        fn prop_mul_mn_matches_bigint(a in limbs(6), b in limbs(6)) {
            let mut out = vec![0_u128; a.len() + b.len()];
            mul_mn(&mut out, &a, &b);
            prop_assert_eq!(to_big(&out), to_big(&a) * to_big(&b));
        }

        #[test]
        fn prop_mul_mn_commutes(a in limbs(5), b in limbs(5)) {
            let mut ab = vec![0_u128; a.len() + b.len()];
            let mut ba = vec![0_u128; a.len() + b.len()];
            mul_mn(&mut ab, &a, &b);
            mul_mn(&mut ba, &b, &a);
            prop_assert_eq!(ab, ba);
        }

        #[test]
        fn prop_mul_mn_u64_matches_bigint(a in proptest::collection::vec(any::<u64>(), 0..8), b in proptest::collection::vec(any::<u64>(), 0..8)) {
            let mut out = vec![0_u64; a.len() + b.len()];
            mul_mn(&mut out, &a, &b);
            prop_assert_eq!(to_big(&out), to_big(&a) * to_big(&b));
        }

        #[test]
        fn prop_madd_mn_matches_bigint(a in limbs(5), b in limbs(5), addend_len in 0usize..=5) {
            let out_len = a.len() + b.len();
            let addend_len = addend_len.min(a.len().max(b.len()));
            let addend = vec![u128::MAX; addend_len];
            let mut out = vec![0_u128; out_len];
            let overflow = madd_mn(&mut out, &a, &b, &addend);
            prop_assert!(!overflow);
            prop_assert_eq!(to_big(&out), to_big(&a) * to_big(&b) + to_big(&addend));
        }

        #[test]
        fn prop_mul_mn_truncated_matches_bigint(a in limbs(5), b in limbs(5), width in 0usize..8) {
            let mut out = vec![0_u128; width];
            let overflow = mul_mn_truncated(&mut out, &a, &b);
            let full = to_big(&a) * to_big(&b);
            let modulus = BigUint::from(1_u8) << (128 * width);
            prop_assert_eq!(to_big(&out), &full % &modulus);
            prop_assert_eq!(overflow, full >= modulus);
        }

        #[test]
        fn prop_mul512_mn_agrees_with_mul_mn(m1 in proptest::collection::vec(any_u512(), 0..4), m2 in proptest::collection::vec(any_u512(), 0..4)) {
            let mut out = vec![U512::ZERO; m1.len() + m2.len()];
            mul512_mn(&mut out, &m1, &m2);

            let flatten = |xs: &[U512]| -> Vec<u128> { xs.iter().flat_map(|x| x.to_limbs()).collect() };
            let mut expected = vec![0_u128; 4 * (m1.len() + m2.len())];
            mul_mn(&mut expected, &flatten(&m1), &flatten(&m2));
            prop_assert_eq!(flatten(&out), expected);
        }

        #[test]
        fn prop_mul512_mn_agrees_with_fixed_width(a in any_u512(), b in any_u512(), c in any_u512(), d in any_u512()) {
            let mut out = [U512::ZERO; 4];
            mul512_mn(&mut out, &[a, b], &[c, d]);
            let expected = mul1024x1024(&U1024::from_halves(&a, &b), &U1024::from_halves(&c, &d));
            let (lo, hi) = expected.split_halves::<8>();
            prop_assert_eq!(U1024::from_halves(&out[0], &out[1]), lo);
            prop_assert_eq!(U1024::from_halves(&out[2], &out[3]), hi);

            let mut with_d = [0_u128; 8];
            with_d[..4].copy_from_slice(d.as_limbs());
            let two_addends = madd512x512a512a512(&a, &b, &c, &d);
            let mut flat = [0_u128; 8];
            prop_assert!(!madd_mn(&mut flat, a.as_limbs(), b.as_limbs(), c.as_limbs()));
            let carry = crate::carry::add_assign_with_carry(&mut flat, &with_d, false);
            prop_assert!(!carry);
            prop_assert_eq!(flat, two_addends.to_limbs());

            let mut row = [0_u128; 5];
            mul128_mn(&mut row, a.as_limbs(), &[c.limb(0)]);
            prop_assert_eq!(row, mul512x128(&a, &U128::new([c.limb(0)])).to_limbs());
        }
    }
}
