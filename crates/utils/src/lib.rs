//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, counting the elements of a box shape or using prettier
//! formatting for scientific numbers are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod range_ext;
mod shape_ext;
mod value_ext;

// Flatten
pub use range_ext::RangeExt;
pub use shape_ext::ShapeExt;
pub use value_ext::ValueExt;
