//! Reading and writing of record-structured Eclipse output files
#![doc = include_str!("../readme.md")]

// Internals split by concern, everything important re-exported below
mod codec;
mod datatype;
mod error;
mod file;
mod parsers;
mod writer;

#[doc(inline)]
pub use file::{EclFile, RecordInfo};

#[doc(inline)]
pub use writer::EclWriter;

#[doc(inline)]
pub use datatype::{ArrayData, ArrayType, EclValue};

#[doc(inline)]
pub use error::{Error, Result};

pub use codec::{
    flip_endian_f32, flip_endian_u32, size_on_disk_binary, size_on_disk_formatted,
    COLUMNS_CHAR, COLUMNS_DOUB, COLUMNS_INTE, COLUMNS_LOGI, COLUMNS_REAL, LOGI_FALSE, LOGI_TRUE,
    MAX_BLOCK_CHAR, MAX_BLOCK_DOUB, MAX_BLOCK_INTE, MAX_BLOCK_LOGI, MAX_BLOCK_REAL, SIZE_OF_CHAR,
    SIZE_OF_DOUB, SIZE_OF_INTE, SIZE_OF_LOGI, SIZE_OF_REAL, WIDTH_CHAR, WIDTH_DOUB, WIDTH_INTE,
    WIDTH_LOGI, WIDTH_REAL,
};
