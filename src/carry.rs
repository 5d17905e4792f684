//! Carry-propagating addition over limb slices.
//!
//! Limb slices are least significant limb first. Every routine returns the
//! carry (or borrow) out of the most significant limb so that the caller can
//! thread it into the next position.

use crate::limb::Limb;

/// `out = a + b + carry`, returning the carry out of the top limb.
///
/// Panics if the three slices differ in length.
#[inline]
pub fn add_with_carry<L: Limb>(out: &mut [L], a: &[L], b: &[L], carry: bool) -> bool {
    assert!(
        out.len() == a.len() && a.len() == b.len(),
        "operand length mismatch: out = {}, a = {}, b = {}",
        out.len(),
        a.len(),
        b.len()
    );
    let mut carry = carry;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        (*o, carry) = x.carrying_add(y, carry);
    }
    carry
}

/// `acc += rhs + carry`, returning the carry out of the top limb.
///
/// Panics if the slices differ in length.
#[inline]
pub fn add_assign_with_carry<L: Limb>(acc: &mut [L], rhs: &[L], carry: bool) -> bool {
    assert_eq!(acc.len(), rhs.len(), "operand length mismatch");
    let mut carry = carry;
    for (a, &r) in acc.iter_mut().zip(rhs) {
        (*a, carry) = a.carrying_add(r, carry);
    }
    carry
}

/// Ripples a single-limb `carry` through `acc` starting at limb 0.
///
/// Stops as soon as the carry is absorbed. Returns `true` if it ran off the
/// top of `acc`.
#[inline]
pub fn propagate_carry<L: Limb>(acc: &mut [L], carry: L) -> bool {
    let Some((first, rest)) = acc.split_first_mut() else {
        return carry != L::ZERO;
    };
    let (sum, mut overflow) = first.carrying_add(carry, false);
    *first = sum;
    for limb in rest {
        if !overflow {
            break;
        }
        (*limb, overflow) = limb.carrying_add(L::ZERO, true);
    }
    overflow
}

/// Adds `value` into `acc[offset..]` and ripples the carry to the top of
/// `acc`. Returns `true` if the sum does not fit in `acc`.
///
/// Panics if `value` does not fit at `offset`.
#[inline]
pub fn add_at<L: Limb>(acc: &mut [L], offset: usize, value: &[L]) -> bool {
    let end = offset
        .checked_add(value.len())
        .filter(|&end| end <= acc.len())
        .unwrap_or_else(|| {
            panic!(
                "{} limbs at offset {offset} exceed accumulator of {} limbs",
                value.len(),
                acc.len()
            )
        });
    let (window, above) = acc[offset..].split_at_mut(end - offset);
    let carry = add_assign_with_carry(window, value, false);
    if carry {
        propagate_carry(above, L::ONE)
    } else {
        false
    }
}

/// `acc -= rhs + borrow`, returning the borrow out of the top limb.
///
/// Panics if the slices differ in length.
#[inline]
pub fn sub_assign_with_borrow<L: Limb>(acc: &mut [L], rhs: &[L], borrow: bool) -> bool {
    assert_eq!(acc.len(), rhs.len(), "operand length mismatch");
    let mut borrow = borrow;
    for (a, &r) in acc.iter_mut().zip(rhs) {
        (*a, borrow) = a.borrowing_sub(r, borrow);
    }
    borrow
}

#[allow(clippy::arithmetic_side_effects)]
#[cfg(test)]
mod tests {
    use super::*;

    const M: u128 = u128::MAX;

    #[test]
    fn add_with_carry_basic() {
        let mut out = [0_u128; 2];
        let carry = add_with_carry(&mut out, &[M, 0], &[1, 0], false);
        assert_eq!(out, [0, 1]);
        assert!(!carry);

        let carry = add_with_carry(&mut out, &[M, M], &[0, 0], true);
        assert_eq!(out, [0, 0]);
        assert!(carry);

        let carry = add_with_carry(&mut out, &[M, M], &[M, M], true);
        assert_eq!(out, [M, M]);
        assert!(carry);
    }

    #[test]
    #[should_panic(expected = "operand length mismatch")]
    fn add_with_carry_rejects_mismatched_lengths() {
        let mut out = [0_u128; 2];
        add_with_carry(&mut out, &[1, 2, 3], &[1, 2], false);
    }

    #[test]
    fn propagate_carry_cascades_through_all_ones() {
        let mut acc = [M, M, M, M, 7];
        assert!(!propagate_carry(&mut acc, 1));
        assert_eq!(acc, [0, 0, 0, 0, 8]);

        let mut acc = [M; 4];
        assert!(propagate_carry(&mut acc, 1));
        assert_eq!(acc, [0; 4]);
    }

    #[test]
    fn propagate_carry_stops_once_absorbed() {
        let mut acc = [5_u128, M, M];
        assert!(!propagate_carry(&mut acc, 10));
        assert_eq!(acc, [15, M, M]);
    }

    #[test]
    fn propagate_carry_into_empty_slice() {
        let mut acc: [u64; 0] = [];
        assert!(!propagate_carry(&mut acc, 0));
        assert!(propagate_carry(&mut acc, 1));
    }

    #[test]
    fn add_at_offset_ripples_to_top() {
        let mut acc = [1_u128, M, M, M, M, 0];
        assert!(!add_at(&mut acc, 1, &[1, 0]));
        assert_eq!(acc, [1, 0, 0, 0, 0, 1]);

        let mut acc = [0_u128, M, M];
        assert!(add_at(&mut acc, 1, &[1]));
        assert_eq!(acc, [0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "exceed accumulator")]
    fn add_at_rejects_out_of_range() {
        let mut acc = [0_u64; 3];
        add_at(&mut acc, 2, &[1, 1]);
    }

    #[test]
    fn sub_assign_with_borrow_basic() {
        let mut acc = [0_u128, 1];
        assert!(!sub_assign_with_borrow(&mut acc, &[1, 0], false));
        assert_eq!(acc, [M, 0]);

        let mut acc = [0_u128, 0];
        assert!(sub_assign_with_borrow(&mut acc, &[0, 0], true));
        assert_eq!(acc, [M, M]);
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod prop_tests {
    use super::*;
    use alloc::vec::Vec;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn to_big(limbs: &[u128]) -> BigUint {
        limbs
            .iter()
            .rev()
            .fold(BigUint::default(), |acc, &l| (acc << 128) + BigUint::from(l))
    }

    /// Limbs biased towards all-ones so that carries cascade far.
    fn carry_heavy_limb() -> impl Strategy<Value = u128> {
        prop_oneof![
            3 => Just(u128::MAX),
            1 => Just(u128::MAX - 1),
            1 => Just(0_u128),
            2 => any::<u128>(),
        ]
    }

    fn limbs(len: usize) -> impl Strategy<Value = Vec<u128>> {
        proptest::collection::vec(carry_heavy_limb(), len)
    }

    proptest! {
        #[test]
        fn prop_add_with_carry_matches_bigint((a, b) in (1usize..8).prop_flat_map(|n| (limbs(n), limbs(n))), carry in any::<bool>()) {
            let mut out = alloc::vec![0_u128; a.len()];
            let carry_out = add_with_carry(&mut out, &a, &b, carry);
            let mut result = out.clone();
            result.push(u128::from(carry_out));
            prop_assert_eq!(to_big(&result), to_big(&a) + to_big(&b) + BigUint::from(u8::from(carry)));
        }

        #[test]
        fn prop_add_at_matches_bigint(acc in limbs(8), value in (1usize..5).prop_flat_map(limbs), offset in 0usize..4) {
            let mut sum = acc.clone();
            let carry_out = add_at(&mut sum, offset, &value);
            let mut result = sum.clone();
            result.push(u128::from(carry_out));
            prop_assert_eq!(to_big(&result), to_big(&acc) + (to_big(&value) << (128 * offset)));
        }

        #[test]
        fn prop_add_then_sub_restores(a in limbs(4), b in limbs(4)) {
            let mut acc = a.clone();
            let carry = add_assign_with_carry(&mut acc, &b, false);
            let borrow = sub_assign_with_borrow(&mut acc, &b, false);
            prop_assert_eq!(carry, borrow);
            prop_assert_eq!(acc, a);
        }
    }
}
