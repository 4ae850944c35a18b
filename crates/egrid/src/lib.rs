//! Module for reading Eclipse EGRID corner-point grid files
//!
//! The EGRID file describes the geometry of a structured reservoir grid:
//! pillars (`COORD`), corner depths (`ZCORN`), the active cell mask
//! (`ACTNUM`), optional local grid refinements, and non-neighbor
//! connections.
//!
//! - [EGrid] - Primary reader exposing cell geometry and index maps
//!
//! | Concern          | Surface                                              |
//! | ---------------- | ---------------------------------------------------- |
//! | Index maps       | `global_index`, `active_index`, `ijk_from_*`         |
//! | Cell geometry    | `cell_corners`, `xyz_layer`, `xyz_layer_box`         |
//! | Map projection   | [MapAxes], `mapaxes_transform`                       |
//! | Connections      | `nnc_connections` (cross-checked against `.INIT`)    |
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use ecltools_egrid::EGrid;
//! // Build the record directory and grid metadata
//! let mut grid = EGrid::open("/path/to/CASE.EGRID").unwrap();
//!
//! // Index bookkeeping is free, geometry loads lazily
//! let active = grid.active_index(4, 2, 0).unwrap();
//! let corners = grid.cell_corners(4, 2, 0).unwrap();
//! ```

mod error;
mod grid;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use grid::{CellCorners, EGrid, MapAxes, Nnc};
