//! AMReX plotfile decoding
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod decoder;
mod error;
mod fab;
mod field;
mod header;
mod layout;
mod parsers;
mod plotfile;

// inline important the plotfile-related modules for a nice public API
#[doc(inline)]
pub use plotfile::{read_metadata, read_variable, Plotfile};

#[doc(inline)]
pub use header::{parse_header, PlotfileMetadata};

#[doc(inline)]
pub use layout::{parse_box_layout, synthetic_fab_name, BoxLayout, GridBox};

#[doc(inline)]
pub use field::{storage_axes, DecodedField, STORAGE_AXES_2D, STORAGE_AXES_3D};

#[doc(inline)]
pub use parsers::{parse_int_tuple_list, Corners};

#[doc(inline)]
pub use error::{Error, InconsistentLayout, Result};
