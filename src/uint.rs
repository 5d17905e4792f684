use crate::{
    carry::{add_with_carry, propagate_carry, sub_assign_with_borrow},
    error::WideUintError,
    impl_panicking_op, impl_pow_by_squaring,
    mul::mn::{mac_row, mul_mn, mul_mn_truncated},
};
use core::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, LowerHex, Result as FmtResult, UpperHex},
    iter::{Product, Sum},
    ops::{Add, AddAssign, Mul, MulAssign, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign},
    str::FromStr,
};
use num_traits::{
    CheckedAdd, CheckedMul, CheckedSub, ConstOne, ConstZero, One, Pow, WrappingAdd, WrappingMul,
    WrappingSub, Zero,
};
use pastey::paste;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "rand")]
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};

/// Fixed-width unsigned integer made of `LIMBS` 128-bit limbs, least
/// significant limb first.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WideUint<const LIMBS: usize>([u128; LIMBS]);

pub type U128 = WideUint<1>;
pub type U256 = WideUint<2>;
pub type U512 = WideUint<4>;
pub type U640 = WideUint<5>;
pub type U1024 = WideUint<8>;
pub type U2048 = WideUint<16>;
pub type U4096 = WideUint<32>;

impl<const LIMBS: usize> WideUint<LIMBS> {
    /// Total size of the represented integer in bits.
    #[allow(clippy::cast_possible_truncation)]
    pub const BITS: u32 = (LIMBS as u32) * u128::BITS;
    /// Total size of the represented integer in bytes.
    pub const BYTES: usize = LIMBS * 16;
    /// The number of 128-bit limbs.
    pub const LIMBS: usize = LIMBS;

    pub const ZERO: Self = Self([0; LIMBS]);
    pub const ONE: Self = Self::from_u128(1);
    pub const MAX: Self = Self([u128::MAX; LIMBS]);

    /// Wraps the given limbs, least significant first.
    #[inline(always)]
    pub const fn new(limbs: [u128; LIMBS]) -> Self {
        Self(limbs)
    }

    /// Same as [`Self::new`].
    #[inline(always)]
    pub const fn from_limbs(limbs: [u128; LIMBS]) -> Self {
        Self(limbs)
    }

    #[inline(always)]
    pub const fn as_limbs(&self) -> &[u128; LIMBS] {
        &self.0
    }

    #[inline(always)]
    pub const fn as_limbs_mut(&mut self) -> &mut [u128; LIMBS] {
        &mut self.0
    }

    #[inline(always)]
    pub const fn to_limbs(self) -> [u128; LIMBS] {
        self.0
    }

    /// Limb `i`, counting from the least significant.
    #[inline(always)]
    pub const fn limb(&self, i: usize) -> u128 {
        self.0[i]
    }

    /// Create a value from a 128-bit primitive.
    pub const fn from_u128(n: u128) -> Self {
        assert!(LIMBS > 0, "`u128` does not fit into a zero-limb integer");
        let mut limbs = [0; LIMBS];
        limbs[0] = n;
        Self(limbs)
    }

    /// Parses a big-endian hex string of at most `32 * LIMBS` digits.
    ///
    /// Panics on an empty string, a non-hex character or an over-long input,
    /// which makes it suitable for constants.
    pub const fn from_be_hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        assert!(!bytes.is_empty(), "hex string is empty");
        assert!(
            bytes.len() <= LIMBS * 32,
            "hex string is too long for the integer size"
        );

        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < bytes.len() {
            let nibble = match bytes[bytes.len() - 1 - i] {
                b @ b'0'..=b'9' => b - b'0',
                b @ b'a'..=b'f' => b - b'a' + 10,
                b @ b'A'..=b'F' => b - b'A' + 10,
                _ => panic!("invalid hex digit"),
            };
            limbs[i / 32] |= (nibble as u128) << ((i % 32) * 4);
            i += 1;
        }
        Self(limbs)
    }

    /// Zero-extends or truncates to `T` limbs.
    pub const fn resize<const T: usize>(&self) -> WideUint<T> {
        let mut limbs = [0; T];
        let mut i = 0;
        while i < LIMBS && i < T {
            limbs[i] = self.0[i];
            i += 1;
        }
        WideUint(limbs)
    }

    /// Like [`Self::resize`], but returns `None` instead of dropping non-zero
    /// limbs.
    pub const fn checked_resize<const T: usize>(&self) -> Option<WideUint<T>> {
        let mut i = T;
        while i < LIMBS {
            if self.0[i] != 0 {
                return None;
            }
            i += 1;
        }
        Some(self.resize())
    }

    /// Splits into `(low, high)` halves of `H` limbs each.
    pub fn split_halves<const H: usize>(&self) -> (WideUint<H>, WideUint<H>) {
        const { assert!(2 * H == LIMBS, "halves must be exactly half as wide") };
        let mut lo = [0; H];
        let mut hi = [0; H];
        lo.copy_from_slice(&self.0[..H]);
        hi.copy_from_slice(&self.0[H..]);
        (WideUint(lo), WideUint(hi))
    }

    /// Concatenates `low` and `high` halves of `H` limbs each.
    pub fn from_halves<const H: usize>(lo: &WideUint<H>, hi: &WideUint<H>) -> Self {
        const { assert!(2 * H == LIMBS, "halves must be exactly half as wide") };
        let mut limbs = [0; LIMBS];
        limbs[..H].copy_from_slice(&lo.0);
        limbs[H..].copy_from_slice(&hi.0);
        Self(limbs)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    #[inline]
    pub const fn is_odd(&self) -> bool {
        LIMBS > 0 && self.0[0] & 1 == 1
    }

    #[inline]
    pub const fn is_even(&self) -> bool {
        !self.is_odd()
    }

    pub fn leading_zeros(&self) -> u32 {
        let mut count = 0;
        for &limb in self.0.iter().rev() {
            count += limb.leading_zeros();
            if limb != 0 {
                break;
            }
        }
        count
    }

    pub fn trailing_zeros(&self) -> u32 {
        let mut count = 0;
        for &limb in &self.0 {
            count += limb.trailing_zeros();
            if limb != 0 {
                break;
            }
        }
        count
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u32 {
        Self::BITS - self.leading_zeros()
    }

    //
    // Addition and subtraction
    //

    /// `self + rhs + carry` with the carry out of the top limb.
    #[inline]
    pub fn carrying_add(&self, rhs: &Self, carry: bool) -> (Self, bool) {
        let mut out = [0; LIMBS];
        let carry = add_with_carry(&mut out, &self.0, &rhs.0, carry);
        (Self(out), carry)
    }

    #[inline]
    pub fn overflowing_add(&self, rhs: &Self) -> (Self, bool) {
        self.carrying_add(rhs, false)
    }

    /// `self + a` for a zero-extended 128-bit `a`, with carry out.
    #[inline]
    pub fn add_limb(&self, a: u128) -> (Self, bool) {
        let mut out = *self;
        let carry = propagate_carry(&mut out.0, a);
        (out, carry)
    }

    /// `self + a + b` for zero-extended 128-bit `a` and `b`, returning the
    /// number of times the sum wrapped past `Self::MAX` (at most 2, reached
    /// only by a single-limb `self`).
    #[inline]
    pub fn add_limbs2(&self, a: u128, b: u128) -> (Self, u128) {
        const { assert!(LIMBS > 0, "cannot add limbs into a zero-limb integer") };
        let mut out = *self;
        let c1 = propagate_carry(&mut out.0, a);
        let c2 = propagate_carry(&mut out.0, b);
        (out, u128::from(c1) + u128::from(c2))
    }

    /// `self - rhs - borrow` with the borrow out of the top limb.
    #[inline]
    pub fn borrowing_sub(&self, rhs: &Self, borrow: bool) -> (Self, bool) {
        let mut out = *self;
        let borrow = sub_assign_with_borrow(&mut out.0, &rhs.0, borrow);
        (out, borrow)
    }

    #[inline]
    pub fn overflowing_sub(&self, rhs: &Self) -> (Self, bool) {
        self.borrowing_sub(rhs, false)
    }

    //
    // Multiplication
    //

    /// `self * m + a` for 128-bit `m` and `a`, returning the limb that did not
    /// fit as the second element.
    #[inline]
    pub fn mul_limb_add(&self, m: u128, a: u128) -> (Self, u128) {
        let mut out = [0; LIMBS];
        let carry = mac_row(&mut out, &self.0, m, a);
        (Self(out), carry)
    }

    /// Full product into `OUT = LIMBS + RHS` limbs; never overflows.
    pub fn widening_mul<const RHS: usize, const OUT: usize>(
        &self,
        rhs: &WideUint<RHS>,
    ) -> WideUint<OUT> {
        const {
            assert!(
                OUT == LIMBS + RHS,
                "product width must be the sum of the operand widths"
            )
        };
        let mut out = [0; OUT];
        mul_mn(&mut out, &self.0, &rhs.0);
        WideUint(out)
    }

    /// Low `LIMBS` limbs of the product and whether any higher limb was
    /// non-zero.
    #[inline]
    pub fn overflowing_mul(&self, rhs: &Self) -> (Self, bool) {
        let mut out = [0; LIMBS];
        let overflow = mul_mn_truncated(&mut out, &self.0, &rhs.0);
        (Self(out), overflow)
    }

    //
    // Parsing
    //

    /// Parses digits in the given radix (2 to 36). No sign or prefix is
    /// accepted.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, WideUintError> {
        if !(2..=36).contains(&radix) {
            return Err(WideUintError::UnsupportedRadix(radix));
        }
        if s.is_empty() {
            return Err(WideUintError::Empty);
        }

        let mut acc = Self::ZERO;
        for (position, character) in s.char_indices() {
            let digit = character
                .to_digit(radix)
                .ok_or(WideUintError::InvalidDigit {
                    position,
                    character,
                })?;
            let (next, carry) = acc.mul_limb_add(u128::from(radix), u128::from(digit));
            if carry != 0 {
                return Err(WideUintError::Overflow { bits: Self::BITS });
            }
            acc = next;
        }
        Ok(acc)
    }

    //
    // Shifts
    //

    fn shl_bits(&self, shift: u32) -> Self {
        assert!(
            shift < Self::BITS,
            "`shift` within the bit size of the integer"
        );
        let limb_shift = (shift / u128::BITS) as usize;
        let bit_shift = shift % u128::BITS;

        let mut out = [0; LIMBS];
        for i in limb_shift..LIMBS {
            let src = i - limb_shift;
            out[i] = self.0[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                out[i] |= self.0[src - 1] >> (u128::BITS - bit_shift);
            }
        }
        Self(out)
    }

    fn shr_bits(&self, shift: u32) -> Self {
        assert!(
            shift < Self::BITS,
            "`shift` within the bit size of the integer"
        );
        let limb_shift = (shift / u128::BITS) as usize;
        let bit_shift = shift % u128::BITS;

        let mut out = [0; LIMBS];
        for i in 0..LIMBS - limb_shift {
            let src = i + limb_shift;
            out[i] = self.0[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < LIMBS {
                out[i] |= self.0[src + 1] << (u128::BITS - bit_shift);
            }
        }
        Self(out)
    }
}

//
// Core traits
//

impl<const LIMBS: usize> Debug for WideUint<LIMBS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "WideUint(0x{self:X})")
    }
}

impl<const LIMBS: usize> Display for WideUint<LIMBS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        UpperHex::fmt(self, f)
    }
}

impl<const LIMBS: usize> LowerHex for WideUint<LIMBS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for limb in self.0.iter().rev() {
            write!(f, "{limb:032x}")?;
        }
        Ok(())
    }
}

impl<const LIMBS: usize> UpperHex for WideUint<LIMBS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for limb in self.0.iter().rev() {
            write!(f, "{limb:032X}")?;
        }
        Ok(())
    }
}

impl<const LIMBS: usize> Default for WideUint<LIMBS> {
    #[inline(always)]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const LIMBS: usize> Ord for WideUint<LIMBS> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl<const LIMBS: usize> PartialOrd for WideUint<LIMBS> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const LIMBS: usize> FromStr for WideUint<LIMBS> {
    type Err = WideUintError;

    /// Parses a decimal string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 10)
    }
}

//
// Zero and One traits
//

impl<const LIMBS: usize> Zero for WideUint<LIMBS> {
    #[inline(always)]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline(always)]
    fn is_zero(&self) -> bool {
        WideUint::is_zero(self)
    }
}

impl<const LIMBS: usize> One for WideUint<LIMBS> {
    #[inline(always)]
    fn one() -> Self {
        Self::ONE
    }
}

impl<const LIMBS: usize> ConstZero for WideUint<LIMBS> {
    const ZERO: Self = Self([0; LIMBS]);
}

impl<const LIMBS: usize> ConstOne for WideUint<LIMBS> {
    const ONE: Self = Self::from_u128(1);
}

//
// Checked and wrapping arithmetic
//

impl<const LIMBS: usize> CheckedAdd for WideUint<LIMBS> {
    fn checked_add(&self, other: &Self) -> Option<Self> {
        let (sum, carry) = self.overflowing_add(other);
        if carry { None } else { Some(sum) }
    }
}

impl<const LIMBS: usize> CheckedSub for WideUint<LIMBS> {
    fn checked_sub(&self, other: &Self) -> Option<Self> {
        let (diff, borrow) = self.overflowing_sub(other);
        if borrow { None } else { Some(diff) }
    }
}

impl<const LIMBS: usize> CheckedMul for WideUint<LIMBS> {
    fn checked_mul(&self, other: &Self) -> Option<Self> {
        let (product, overflow) = self.overflowing_mul(other);
        if overflow { None } else { Some(product) }
    }
}

impl<const LIMBS: usize> WrappingAdd for WideUint<LIMBS> {
    fn wrapping_add(&self, other: &Self) -> Self {
        self.overflowing_add(other).0
    }
}

impl<const LIMBS: usize> WrappingSub for WideUint<LIMBS> {
    fn wrapping_sub(&self, other: &Self) -> Self {
        self.overflowing_sub(other).0
    }
}

impl<const LIMBS: usize> WrappingMul for WideUint<LIMBS> {
    fn wrapping_mul(&self, other: &Self) -> Self {
        self.overflowing_mul(other).0
    }
}

//
// Operators, panicking on overflow like primitive integers
//

impl_panicking_op!(Add, add, AddAssign, add_assign, checked_add, "add");
impl_panicking_op!(Sub, sub, SubAssign, sub_assign, checked_sub, "subtract");
impl_panicking_op!(Mul, mul, MulAssign, mul_assign, checked_mul, "multiply");

impl<const LIMBS: usize> Shl<u32> for WideUint<LIMBS> {
    type Output = Self;

    #[inline(always)]
    fn shl(self, rhs: u32) -> Self::Output {
        self.shl_bits(rhs)
    }
}

impl<const LIMBS: usize> Shr<u32> for WideUint<LIMBS> {
    type Output = Self;

    #[inline(always)]
    fn shr(self, rhs: u32) -> Self::Output {
        self.shr_bits(rhs)
    }
}

impl<const LIMBS: usize> ShlAssign<u32> for WideUint<LIMBS> {
    #[inline(always)]
    fn shl_assign(&mut self, rhs: u32) {
        *self = self.shl_bits(rhs);
    }
}

impl<const LIMBS: usize> ShrAssign<u32> for WideUint<LIMBS> {
    #[inline(always)]
    fn shr_assign(&mut self, rhs: u32) {
        *self = self.shr_bits(rhs);
    }
}

impl<const LIMBS: usize> Pow<u32> for WideUint<LIMBS> {
    type Output = Self;

    impl_pow_by_squaring!();
}

//
// Aggregate operations
//

impl<const LIMBS: usize> Sum for WideUint<LIMBS> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| {
            acc.checked_add(&x).expect("overflow in sum")
        })
    }
}

impl<'a, const LIMBS: usize> Sum<&'a Self> for WideUint<LIMBS> {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| {
            acc.checked_add(x).expect("overflow in sum")
        })
    }
}

impl<const LIMBS: usize> Product for WideUint<LIMBS> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| {
            acc.checked_mul(&x).expect("overflow in product")
        })
    }
}

impl<'a, const LIMBS: usize> Product<&'a Self> for WideUint<LIMBS> {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| {
            acc.checked_mul(x).expect("overflow in product")
        })
    }
}

//
// Conversions
//

impl<const LIMBS: usize> From<[u128; LIMBS]> for WideUint<LIMBS> {
    #[inline(always)]
    fn from(limbs: [u128; LIMBS]) -> Self {
        Self(limbs)
    }
}

impl<const LIMBS: usize> From<WideUint<LIMBS>> for [u128; LIMBS] {
    #[inline(always)]
    fn from(value: WideUint<LIMBS>) -> Self {
        value.0
    }
}

impl<const LIMBS: usize> TryFrom<&[u128]> for WideUint<LIMBS> {
    type Error = WideUintError;

    fn try_from(limbs: &[u128]) -> Result<Self, Self::Error> {
        <[u128; LIMBS]>::try_from(limbs)
            .map(Self)
            .map_err(|_| WideUintError::LengthMismatch {
                expected: LIMBS,
                actual: limbs.len(),
            })
    }
}

impl<const LIMBS: usize> From<bool> for WideUint<LIMBS> {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self::from_u128(u128::from(value))
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),+) => {
        $(
            impl<const LIMBS: usize> From<$t> for WideUint<LIMBS> {
                #[inline(always)]
                fn from(value: $t) -> Self {
                    Self::from_u128(value as u128)
                }
            }

            impl<'a, const LIMBS: usize> From<&'a $t> for WideUint<LIMBS> {
                #[inline(always)]
                fn from(value: &'a $t) -> Self {
                    Self::from(*value)
                }
            }

            paste! {
                impl<const LIMBS: usize> WideUint<LIMBS> {
                    /// Create a value from a primitive type.
                    pub const fn [<from_ $t>](n: $t) -> Self {
                        Self::from_u128(n as u128)
                    }
                }
            }
        )+
    };
}

impl_from_primitive!(u8, u16, u32, u64);

impl<const LIMBS: usize> From<u128> for WideUint<LIMBS> {
    #[inline(always)]
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl<'a, const LIMBS: usize> From<&'a u128> for WideUint<LIMBS> {
    #[inline(always)]
    fn from(value: &'a u128) -> Self {
        Self::from_u128(*value)
    }
}

//
// Constant-time traits
//

impl<const LIMBS: usize> ConstantTimeEq for WideUint<LIMBS> {
    #[inline]
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl<const LIMBS: usize> ConditionallySelectable for WideUint<LIMBS> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(core::array::from_fn(|i| {
            u128::conditional_select(&a.0[i], &b.0[i], choice)
        }))
    }
}

//
// Interop with crypto-bigint
//

#[cfg(feature = "crypto_bigint")]
impl<const LIMBS: usize> WideUint<LIMBS> {
    const WORDS_PER_LIMB: usize = (u128::BITS / crypto_bigint::Word::BITS) as usize;

    /// Converts into a `crypto_bigint::Uint` of exactly the same bit width.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_crypto_bigint<const WORDS: usize>(&self) -> crypto_bigint::Uint<WORDS> {
        const {
            assert!(
                WORDS == LIMBS * Self::WORDS_PER_LIMB,
                "crypto-bigint integer must have the same bit width"
            )
        };
        let words = core::array::from_fn(|i| {
            let limb = self.0[i / Self::WORDS_PER_LIMB];
            let shift = (i % Self::WORDS_PER_LIMB) as u32 * crypto_bigint::Word::BITS;
            (limb >> shift) as crypto_bigint::Word
        });
        crypto_bigint::Uint::from_words(words)
    }

    /// Converts from a `crypto_bigint::Uint` of exactly the same bit width.
    pub fn from_crypto_bigint<const WORDS: usize>(value: &crypto_bigint::Uint<WORDS>) -> Self {
        const {
            assert!(
                WORDS == LIMBS * Self::WORDS_PER_LIMB,
                "crypto-bigint integer must have the same bit width"
            )
        };
        let mut limbs = [0; LIMBS];
        for (i, &word) in value.as_words().iter().enumerate() {
            let shift = (i % Self::WORDS_PER_LIMB) as u32 * crypto_bigint::Word::BITS;
            limbs[i / Self::WORDS_PER_LIMB] |= u128::from(word) << shift;
        }
        Self(limbs)
    }
}

//
// RNG
//

#[cfg(feature = "rand")]
impl<const LIMBS: usize> Distribution<WideUint<LIMBS>> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WideUint<LIMBS> {
        WideUint(core::array::from_fn(|_| {
            Distribution::<u128>::sample(self, rng)
        }))
    }
}

//
// Serialization and Deserialization
//

#[cfg(feature = "serde")]
impl<const LIMBS: usize> serde::Serialize for WideUint<LIMBS> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&format_args!("{self:x}"))
    }
}

#[cfg(feature = "serde")]
impl<'de, const LIMBS: usize> serde::Deserialize<'de> for WideUint<LIMBS> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HexVisitor<const LIMBS: usize>;

        impl<const LIMBS: usize> serde::de::Visitor<'_> for HexVisitor<LIMBS> {
            type Value = WideUint<LIMBS>;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, "a hex string of at most {} digits", LIMBS * 32)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                WideUint::from_str_radix(v, 16).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}
