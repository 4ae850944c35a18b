//! Module for reading Eclipse summary output (SMSPEC/UNSMRY)
//!
//! A reservoir simulation emits named scalar "summary vectors" at every
//! solver time step. Their definitions live in the `SMSPEC` spec file and
//! their samples in a unified `UNSMRY` file or numbered `.Snnnn` files;
//! restarted runs chain back to their base run's spec file.
//!
//! - [ESmry] - Primary reader resolving one flat time series per vector
//! - [ExtEsmry] - Reader for the compact derived `ESMRY` container
//!
//! | Concern            | Surface                                         |
//! | ------------------ | ----------------------------------------------- |
//! | Vector access      | `get`, `load`, `load_all`, `get_at_rstep`       |
//! | Key synthesis      | [key::make_key_string], [SummaryNode]           |
//! | Time axis          | `dates`, `ministeps`, `all_steps_available`     |
//! | Repacking          | `make_esmry_file`, [ExtEsmry]                   |
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use ecltools_esmry::ESmry;
//! // Resolve the run and its base runs into one series per vector
//! let mut smry = ESmry::from_file_with_base_runs("CASE.SMSPEC").unwrap();
//!
//! let rates = smry.get("WOPR:OP_1").unwrap().to_vec();
//! let dates = smry.dates().unwrap();
//! ```

mod error;
#[allow(clippy::module_inception)]
mod esmry;
mod ext;
mod node;

pub mod key;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use esmry::ESmry;

#[doc(inline)]
pub use ext::ExtEsmry;

#[doc(inline)]
pub use node::{
    category_from_keyword, is_connection_completion, is_well_completion, miscellaneous_exception,
    normalise_keyword, Category, LgrInfo, SummaryNode,
};
