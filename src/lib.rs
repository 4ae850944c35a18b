//! `ecltools` is a semi-modular toolkit of fast and reliable libraries for
//! reading Eclipse reservoir simulator output
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use ecltools_io as io;

#[cfg(feature = "egrid")]
#[cfg_attr(docsrs, doc(cfg(feature = "egrid")))]
#[doc(inline)]
pub use ecltools_egrid as egrid;

#[cfg(feature = "esmry")]
#[cfg_attr(docsrs, doc(cfg(feature = "esmry")))]
#[doc(inline)]
pub use ecltools_esmry as esmry;
