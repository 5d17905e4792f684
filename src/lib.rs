#![no_std]
extern crate alloc;

pub mod carry;
pub mod error;
pub(crate) mod helpers;
pub mod limb;
pub mod mul;
pub mod uint;

pub use error::*;
pub use limb::*;
pub use mul::*;
pub use uint::*;
