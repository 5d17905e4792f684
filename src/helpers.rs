//! Contains helper utility macros not visible to the outside world.

/// Forwards an operator taking `Self` by value to its `&Self` form, and
/// implements the `&Self` form by unwrapping the named `checked_*` method
/// with an overflow panic, matching primitive integer behaviour.
#[macro_export]
macro_rules! impl_panicking_op {
    ($trait_name:ident, $trait_op:ident, $assign_trait:ident, $assign_op:ident, $checked:ident, $what:literal) => {
        impl<const LIMBS: usize> $trait_name for WideUint<LIMBS> {
            type Output = Self;

            #[inline(always)]
            fn $trait_op(self, rhs: Self) -> Self::Output {
                self.$trait_op(&rhs)
            }
        }

        impl<'a, const LIMBS: usize> $trait_name<&'a Self> for WideUint<LIMBS> {
            type Output = Self;

            #[inline]
            fn $trait_op(self, rhs: &'a Self) -> Self::Output {
                self.$checked(rhs)
                    .expect(concat!("attempt to ", $what, " with overflow"))
            }
        }

        impl<const LIMBS: usize> $assign_trait for WideUint<LIMBS> {
            #[inline(always)]
            fn $assign_op(&mut self, rhs: Self) {
                *self = self.$trait_op(&rhs);
            }
        }

        impl<'a, const LIMBS: usize> $assign_trait<&'a Self> for WideUint<LIMBS> {
            #[inline(always)]
            fn $assign_op(&mut self, rhs: &'a Self) {
                *self = self.$trait_op(rhs);
            }
        }
    };
}

/// Body of `Pow<u32>::pow` by square-and-multiply over `checked_mul`.
#[macro_export]
macro_rules! impl_pow_by_squaring {
    () => {
        fn pow(self, exp: u32) -> Self::Output {
            let mut base = self;
            let mut result = Self::ONE;
            let mut exp = exp;

            while exp > 0 {
                if exp & 1 == 1 {
                    result = result
                        .checked_mul(&base)
                        .expect("attempt to exponentiate with overflow");
                }
                exp >>= 1;
                if exp > 0 {
                    base = base
                        .checked_mul(&base)
                        .expect("attempt to exponentiate with overflow");
                }
            }

            result
        }
    };
}

/// Will fail compilation if trait is not implemented for the type.
#[cfg(test)]
#[macro_export]
macro_rules! assert_impl {
    ($type_name:ty: $($trait_name:path),+) => {{
        $({
            fn _assert_impl<T: $trait_name>() {}
            _assert_impl::<$type_name>();
        })+
    }};
}
