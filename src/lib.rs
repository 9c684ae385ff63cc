//! `pltools` is a small toolkit of fast and reliable libraries for reading
//! AMReX plotfile snapshots
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use pltools_utils as utils;

#[cfg(feature = "plotfile")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotfile")))]
#[doc(inline)]
pub use pltools_plotfile as plotfile;
