//! Common types shared by every layer: values, conversion and small utilities.

mod constants;
mod convertible;
mod util;
mod value;

pub use constants::*;
pub use convertible::*;
pub use util::*;
pub use value::*;
