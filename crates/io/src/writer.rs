//! Unformatted record writing
//!
//! Only the binary big-endian variant is produced; the one consumer in the
//! toolkit is the compact ESMRY container, which is always written
//! unformatted.

// crate modules
use crate::codec::{LOGI_FALSE, LOGI_TRUE, SIZE_OF_CHAR};
use crate::datatype::ArrayType;
use crate::error::{Error, Result};

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use byteorder::{BigEndian, WriteBytesExt};

/// Writer producing the standard record layout
///
/// Each call appends one complete record: a 24-byte header followed by data
/// blocks of at most the type-dependent element count, every block framed by
/// its payload byte count.
///
/// ```rust, no_run
/// # use ecltools_io::EclWriter;
/// let mut out = EclWriter::create("CASE.ESMRY").unwrap();
/// out.write_inte("TSTEP", &[1, 2, 3]).unwrap();
/// ```
#[derive(Debug)]
pub struct EclWriter {
    out: BufWriter<File>,
}

impl EclWriter {
    /// Create (or truncate) the target file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Append an `INTE` record
    pub fn write_inte(&mut self, name: &str, data: &[i32]) -> Result<()> {
        self.write_header(name, ArrayType::Inte, data.len())?;
        self.write_blocks(ArrayType::Inte, data.len(), |out, range| {
            for value in &data[range] {
                out.write_i32::<BigEndian>(*value)?;
            }
            Ok(())
        })
    }

    /// Append a `REAL` record
    pub fn write_real(&mut self, name: &str, data: &[f32]) -> Result<()> {
        self.write_header(name, ArrayType::Real, data.len())?;
        self.write_blocks(ArrayType::Real, data.len(), |out, range| {
            for value in &data[range] {
                out.write_f32::<BigEndian>(*value)?;
            }
            Ok(())
        })
    }

    /// Append a `DOUB` record
    pub fn write_doub(&mut self, name: &str, data: &[f64]) -> Result<()> {
        self.write_header(name, ArrayType::Doub, data.len())?;
        self.write_blocks(ArrayType::Doub, data.len(), |out, range| {
            for value in &data[range] {
                out.write_f64::<BigEndian>(*value)?;
            }
            Ok(())
        })
    }

    /// Append a `LOGI` record
    pub fn write_logi(&mut self, name: &str, data: &[bool]) -> Result<()> {
        self.write_header(name, ArrayType::Logi, data.len())?;
        self.write_blocks(ArrayType::Logi, data.len(), |out, range| {
            for value in &data[range] {
                out.write_u32::<BigEndian>(if *value { LOGI_TRUE } else { LOGI_FALSE })?;
            }
            Ok(())
        })
    }

    /// Append a string record
    ///
    /// Strings of at most eight characters produce a `CHAR` record; anything
    /// longer promotes the whole record to `C0nn` with `nn` the widest
    /// element, matching what simulators emit for path-like content.
    pub fn write_char<S: AsRef<str>>(&mut self, name: &str, data: &[S]) -> Result<()> {
        let widest = data.iter().map(|s| s.as_ref().len()).max().unwrap_or(0);

        let array_type = if widest <= SIZE_OF_CHAR {
            ArrayType::Char
        } else if widest <= 99 {
            ArrayType::C0nn(widest)
        } else {
            return Err(Error::NameTooLong(format!(
                "string element of {widest} bytes does not fit a C0nn record"
            )));
        };

        let width = array_type.element_size();

        self.write_header(name, array_type, data.len())?;
        self.write_blocks(array_type, data.len(), |out, range| {
            for value in &data[range] {
                let mut padded = value.as_ref().as_bytes().to_vec();
                padded.resize(width, b' ');
                out.write_all(&padded)?;
            }
            Ok(())
        })
    }

    /// Append a payload-free `MESS` record
    pub fn write_mess(&mut self, name: &str) -> Result<()> {
        self.write_header(name, ArrayType::Mess, 0)
    }

    fn write_header(&mut self, name: &str, array_type: ArrayType, count: usize) -> Result<()> {
        if name.len() > 8 {
            return Err(Error::NameTooLong(name.to_string()));
        }

        self.out.write_i32::<BigEndian>(16)?;
        self.out.write_all(format!("{:<8}", name).as_bytes())?;
        self.out.write_i32::<BigEndian>(count as i32)?;
        self.out.write_all(array_type.code().as_bytes())?;
        self.out.write_i32::<BigEndian>(16)?;

        Ok(())
    }

    fn write_blocks<F>(&mut self, array_type: ArrayType, count: usize, mut fill: F) -> Result<()>
    where
        F: FnMut(&mut BufWriter<File>, std::ops::Range<usize>) -> Result<()>,
    {
        let element_size = array_type.element_size();
        let max_block = array_type.max_block();

        let mut start = 0;
        while start < count {
            let n = (count - start).min(max_block);
            let bytes = (n * element_size) as i32;

            self.out.write_i32::<BigEndian>(bytes)?;
            fill(&mut self.out, start..start + n)?;
            self.out.write_i32::<BigEndian>(bytes)?;

            start += n;
        }

        Ok(())
    }

    /// Flush buffered output to disk
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
