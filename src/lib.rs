//! `nucdiff` is a small modular toolkit for converting and comparing nuclear
//! reaction network abundance time series
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use nucdiff_utils as utils;

#[cfg(feature = "series")]
#[cfg_attr(docsrs, doc(cfg(feature = "series")))]
#[doc(inline)]
pub use nucdiff_series as series;

#[cfg(feature = "compare")]
#[cfg_attr(docsrs, doc(cfg(feature = "compare")))]
#[doc(inline)]
pub use nucdiff_compare as compare;

#[cfg(feature = "isotopes")]
#[cfg_attr(docsrs, doc(cfg(feature = "isotopes")))]
#[doc(inline)]
pub use nucdiff_isotopes as isotopes;
