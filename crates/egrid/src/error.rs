//! Result and Error types for ecltools-egrid

/// Type alias for Result<T, egrid::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ecltools-egrid` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("record file error")]
    EclFile(#[from] ecltools_io::Error),

    #[error("i, j or/and k out of range")]
    IjkOutOfRange,

    #[error("global index out of range")]
    GlobalIndexOutOfRange,

    #[error("active index out of range")]
    ActiveIndexOutOfRange,

    #[error("invalid layer index {layer}. Valid range [0,{max}]")]
    InvalidLayer { layer: usize, max: usize },

    #[error("invalid box input, i1, i2, j1 or j2 out of valid range")]
    InvalidBox,

    #[error("partial loading of zcorn arrays not possible when using formatted input")]
    FormattedPartialRead,

    #[error("unit system {0} not supported for MAPUNITS")]
    UnsupportedMapUnits(String),

    #[error("missing {0} array in EGRID file")]
    MissingRecord(&'static str),

    #[error("NNCHEAD refers to undefined LGR number {0}")]
    UnknownLgr(i32),

    #[error("arrays NNC1 and NNC2 have different lengths ({nnc1} vs {nnc2})")]
    NncLengths { nnc1: usize, nnc2: usize },

    #[error(
        "dimensions of EGRID differ from dimensions found in INIT file. \
         EGRID: {egrid:?}. INIT file: {init:?}"
    )]
    GridDimensionsMismatch { egrid: [usize; 3], init: [usize; 3] },

    #[error(
        "number of active cells are different in EGRID and INIT file. \
         EGRID: {egrid}. INIT file: {init}"
    )]
    ActiveCellsMismatch { egrid: usize, init: usize },

    #[error(
        "inconsistent size of array TRANNNC in INIT file. \
         Size of NNC1 and NNC2: {nnc}. Size of TRANNNC: {trannnc}"
    )]
    TranNncLength { nnc: usize, trannnc: usize },

    #[error("unexpected content in INIT file: {0}")]
    BadInit(&'static str),

    #[error("unexpected content in EGRID file: {0}")]
    BadGrid(String),

    #[error("ZCORN block framing at byte {offset} is inconsistent")]
    ZcornFraming { offset: u64 },
}
