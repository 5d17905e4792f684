//! Unsigned multiplication, from single limbs up to arbitrary lengths.
//!
//! [`fixed`] covers the square widths 128 to 2048 bits and the 512 x 128 row,
//! [`mn`] arbitrary limb counts over 128-bit and 512-bit limbs, and [`batch`]
//! many independent products at once.

pub mod batch;
pub mod fixed;
pub mod mn;

pub use batch::*;
pub use fixed::*;
pub use mn::*;
