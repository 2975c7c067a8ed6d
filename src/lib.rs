//! `lettools` is a small toolkit for scoring dose-averaged LET on voxel grids
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use lettools_grid as grid;

#[doc(inline)]
pub use lettools_utils as utils;

#[cfg(feature = "accumulator")]
#[cfg_attr(docsrs, doc(cfg(feature = "accumulator")))]
#[doc(inline)]
pub use lettools_accumulator as accumulator;

#[cfg(feature = "physics")]
#[cfg_attr(docsrs, doc(cfg(feature = "physics")))]
#[doc(inline)]
pub use lettools_physics as physics;
