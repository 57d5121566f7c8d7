//! `vrtools` is a small toolkit of population control libraries for Monte
//! Carlo particle transport
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use vrtools_params as params;

#[cfg(feature = "importance")]
#[cfg_attr(docsrs, doc(cfg(feature = "importance")))]
#[doc(inline)]
pub use vrtools_importance as importance;

#[cfg(feature = "biasing")]
#[cfg_attr(docsrs, doc(cfg(feature = "biasing")))]
#[doc(inline)]
pub use vrtools_biasing as biasing;
