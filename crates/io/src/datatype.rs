//! Array element types and their typed data buffers

// crate modules
use crate::codec::{
    COLUMNS_CHAR, COLUMNS_DOUB, COLUMNS_INTE, COLUMNS_LOGI, COLUMNS_REAL, MAX_BLOCK_CHAR,
    MAX_BLOCK_DOUB, MAX_BLOCK_INTE, MAX_BLOCK_LOGI, MAX_BLOCK_REAL, WIDTH_CHAR, WIDTH_DOUB,
    WIDTH_INTE, WIDTH_LOGI, WIDTH_REAL,
};
use crate::error::{Error, Result};

/// Element type of an array record, e.g. `INTE`, `REAL`, `CHAR`...
///
/// The on-disk type code is four ASCII characters. `C0nn` is a string type
/// with an element width of `nn` bytes rather than the usual eight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    /// 4-byte signed integer
    Inte,
    /// 4-byte IEEE float
    Real,
    /// 8-byte IEEE float
    Doub,
    /// 4-byte logical, `0xFFFFFFFF` true / `0x00000000` false
    Logi,
    /// 8-character space-padded string
    Char,
    /// Message record, no payload
    Mess,
    /// String with a custom element width
    C0nn(usize),
}

impl ArrayType {
    /// Parse the 4-character ASCII type code found in a record header
    pub fn from_code(code: &[u8; 4]) -> Result<Self> {
        match code {
            b"INTE" => Ok(Self::Inte),
            b"REAL" => Ok(Self::Real),
            b"DOUB" => Ok(Self::Doub),
            b"LOGI" => Ok(Self::Logi),
            b"CHAR" => Ok(Self::Char),
            b"MESS" => Ok(Self::Mess),
            [b'C', b'0', a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
                Ok(Self::C0nn(((a - b'0') as usize) * 10 + (b - b'0') as usize))
            }
            _ => Err(Error::UnknownType(
                String::from_utf8_lossy(code).into_owned(),
            )),
        }
    }

    /// The 4-character ASCII type code written to record headers
    pub fn code(&self) -> String {
        match self {
            Self::Inte => "INTE".to_string(),
            Self::Real => "REAL".to_string(),
            Self::Doub => "DOUB".to_string(),
            Self::Logi => "LOGI".to_string(),
            Self::Char => "CHAR".to_string(),
            Self::Mess => "MESS".to_string(),
            Self::C0nn(n) => format!("C0{:02}", n),
        }
    }

    /// Size of a single element in bytes
    pub fn element_size(&self) -> usize {
        match self {
            Self::Inte | Self::Real | Self::Logi => 4,
            Self::Doub => 8,
            Self::Char => 8,
            Self::Mess => 0,
            Self::C0nn(n) => *n,
        }
    }

    /// Maximum number of elements held by a single data block
    pub fn max_block(&self) -> usize {
        match self {
            Self::Inte => MAX_BLOCK_INTE,
            Self::Real => MAX_BLOCK_REAL,
            Self::Doub => MAX_BLOCK_DOUB,
            Self::Logi => MAX_BLOCK_LOGI,
            Self::Char | Self::C0nn(_) => MAX_BLOCK_CHAR,
            Self::Mess => 1,
        }
    }

    /// Number of elements per line in the formatted variant
    pub fn columns(&self) -> usize {
        match self {
            Self::Inte => COLUMNS_INTE,
            Self::Real => COLUMNS_REAL,
            Self::Doub => COLUMNS_DOUB,
            Self::Logi => COLUMNS_LOGI,
            Self::Char | Self::C0nn(_) => COLUMNS_CHAR,
            Self::Mess => 1,
        }
    }

    /// Fixed width of one element in the formatted variant
    pub fn column_width(&self) -> usize {
        match self {
            Self::Inte => WIDTH_INTE,
            Self::Real => WIDTH_REAL,
            Self::Doub => WIDTH_DOUB,
            Self::Logi => WIDTH_LOGI,
            Self::Char => WIDTH_CHAR,
            // quotes and a leading space around the custom width
            Self::C0nn(n) => *n + 3,
            Self::Mess => 0,
        }
    }
}

impl std::fmt::Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Materialised payload of a single array record
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// `INTE` payload
    Inte(Vec<i32>),
    /// `REAL` payload
    Real(Vec<f32>),
    /// `DOUB` payload
    Doub(Vec<f64>),
    /// `LOGI` payload
    Logi(Vec<bool>),
    /// `CHAR` or `C0nn` payload, trailing padding stripped
    Char(Vec<String>),
    /// `MESS` record, nothing to hold
    Mess,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl Sealed for String {}
}

/// Element types that can be pulled out of an [`ArrayData`] buffer
///
/// Implemented for `i32`, `f32`, `f64`, `bool` and `String`, matching the
/// `INTE`, `REAL`, `DOUB`, `LOGI` and `CHAR`/`C0nn` record types.
pub trait EclValue: sealed::Sealed + Sized {
    /// Human readable type name used in `WrongType` errors
    const TYPE_NAME: &'static str;

    /// Borrow the typed slice, or `None` when the buffer holds another type
    fn slice(data: &ArrayData) -> Option<&[Self]>;
}

impl EclValue for i32 {
    const TYPE_NAME: &'static str = "INTE";
    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Inte(v) => Some(v),
            _ => None,
        }
    }
}

impl EclValue for f32 {
    const TYPE_NAME: &'static str = "REAL";
    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Real(v) => Some(v),
            _ => None,
        }
    }
}

impl EclValue for f64 {
    const TYPE_NAME: &'static str = "DOUB";
    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Doub(v) => Some(v),
            _ => None,
        }
    }
}

impl EclValue for bool {
    const TYPE_NAME: &'static str = "LOGI";
    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Logi(v) => Some(v),
            _ => None,
        }
    }
}

impl EclValue for String {
    const TYPE_NAME: &'static str = "CHAR";
    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Char(v) => Some(v),
            _ => None,
        }
    }
}
