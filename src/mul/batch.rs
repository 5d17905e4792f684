//! Multiplication of many independent operand pairs.
//!
//! With the `parallel` feature the pairs are spread over the rayon thread
//! pool; the results are identical to the sequential path and keep the input
//! order.

use crate::{
    mul::fixed::mul512x512,
    uint::{U512, U1024, WideUint},
};
use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn map_pairs<A, B, T, F>(pairs: &[(A, B)], f: F) -> Vec<T>
where
    A: Sync,
    B: Sync,
    T: Send,
    F: Fn(&A, &B) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        pairs.par_iter().map(|(a, b)| f(a, b)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        pairs.iter().map(|(a, b)| f(a, b)).collect()
    }
}

/// Full 1024-bit products of 512-bit operand pairs.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mul_batch"))]
pub fn mul_batch(pairs: &[(U512, U512)]) -> Vec<U1024> {
    map_pairs(pairs, mul512x512)
}

/// Full products of operand pairs of any width, `OUT = A + B` limbs.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "widening_mul_batch")
)]
pub fn widening_mul_batch<const A: usize, const B: usize, const OUT: usize>(
    pairs: &[(WideUint<A>, WideUint<B>)],
) -> Vec<WideUint<OUT>> {
    map_pairs(pairs, |a, b| a.widening_mul::<B, OUT>(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uint::{U128, U640};
    use alloc::vec;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_u512(rng: &mut StdRng) -> U512 {
        U512::new(core::array::from_fn(|_| rng.random()))
    }

    #[test]
    fn mul_batch_matches_single_products() {
        let mut rng = StdRng::seed_from_u64(0);
        let pairs: Vec<(U512, U512)> = (0..64)
            .map(|_| (random_u512(&mut rng), random_u512(&mut rng)))
            .chain([(U512::MAX, U512::MAX), (U512::ZERO, U512::MAX)])
            .collect();

        // Sequential reference, independent of the `parallel` feature
        let expected: Vec<U1024> = pairs.iter().map(|(a, b)| mul512x512(a, b)).collect();
        assert_eq!(mul_batch(&pairs), expected);
    }

    #[test]
    fn widening_mul_batch_rectangular() {
        let pairs = vec![
            (U512::MAX, U128::MAX),
            (U512::ONE, U128::from(42_u8)),
            (U512::ZERO, U128::MAX),
        ];
        let products: Vec<U640> = widening_mul_batch(&pairs[..]);
        assert_eq!(
            products,
            vec![
                crate::mul::fixed::mul512x128(&U512::MAX, &U128::MAX),
                U640::from(42_u8),
                U640::ZERO,
            ]
        );
    }

    #[test]
    fn empty_batch() {
        assert!(mul_batch(&[]).is_empty());
    }
}
