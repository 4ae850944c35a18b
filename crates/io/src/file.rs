//! Record directory construction and lazy array loading

// crate modules
use crate::codec::{size_on_disk_binary, size_on_disk_formatted, LOGI_FALSE};
use crate::datatype::{ArrayData, ArrayType, EclValue};
use crate::error::{Error, Result};
use crate::parsers;

// standard library
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

// external crates
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, info};

/// Directory entry for a single array record
///
/// The `offset` is the absolute file position of the first payload byte,
/// which for the binary variant is the framing integer of the first data
/// block.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInfo {
    /// Record name with trailing padding stripped
    pub name: String,
    /// Element type
    pub array_type: ArrayType,
    /// Number of elements
    pub count: usize,
    /// Absolute position of the first payload byte
    pub offset: u64,
}

/// Reader for a record-structured Eclipse file
///
/// Opening a file streams the record headers once and builds a directory of
/// `(name, type, count, offset)` entries. No payload is read until a record
/// is requested, after which the typed data is cached for the lifetime of
/// the reader.
///
/// Record names are not unique; [`get`](EclFile::get) follows the simulator
/// convention of returning the *last* record carrying the requested name,
/// while [`get_at`](EclFile::get_at) addresses an occurrence unambiguously.
///
/// ```rust, no_run
/// # use ecltools_io::EclFile;
/// let mut file = EclFile::open("CASE.INIT").unwrap();
///
/// let porv: &[f32] = file.get("PORV").unwrap();
/// ```
#[derive(Debug)]
pub struct EclFile {
    path: PathBuf,
    formatted: bool,
    records: Vec<RecordInfo>,
    data: Vec<Option<ArrayData>>,
}

/// Formatted files are recognised by their extension, e.g. `.FEGRID` or the
/// numbered `.Annnn` summary family
fn is_formatted_path(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    matches!(
        ext,
        "FEGRID" | "FGRID" | "FINIT" | "FRFT" | "FSMSPEC" | "FUNSMRY" | "FUNRST"
    ) || (ext.len() > 1
        && ext.starts_with('A')
        && ext[1..].bytes().all(|b| b.is_ascii_digit()))
}

/// Keep the io error kind honest when mapping into record context
fn read_err(name: &str, offset: u64) -> impl FnOnce(std::io::Error) -> Error {
    let name = name.to_string();
    move |e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof { name, offset },
        _ => Error::IOError(e),
    }
}

impl EclFile {
    /// Open a file and build its record directory
    ///
    /// The format variant is inferred from the extension. Payloads are not
    /// read here; each header is visited once and the stream skips to the
    /// next record.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let formatted = is_formatted_path(&path);

        info!("Reading {:?}", path.file_name().unwrap_or(path.as_os_str()));

        let file = File::open(&path)?;
        let file_size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let records = if formatted {
            Self::scan_formatted(&mut reader, file_size)?
        } else {
            Self::scan_binary(&mut reader, file_size)?
        };

        debug!("indexed {} arrays", records.len());

        let data = vec![None; records.len()];

        Ok(Self {
            path,
            formatted,
            records,
            data,
        })
    }

    fn scan_binary(
        reader: &mut (impl Read + Seek),
        file_size: u64,
    ) -> Result<Vec<RecordInfo>> {
        let mut records = Vec::new();
        let mut pos = 0u64;

        while pos < file_size {
            let head = reader
                .read_i32::<BigEndian>()
                .map_err(read_err("<header>", pos))?;

            if head != 16 {
                return Err(Error::Malformed {
                    name: "<header>".to_string(),
                    offset: pos,
                    reason: format!("record header framed as {head} bytes, expected 16"),
                });
            }

            let mut name_buf = [0u8; 8];
            reader
                .read_exact(&mut name_buf)
                .map_err(read_err("<header>", pos))?;
            let name = String::from_utf8_lossy(&name_buf).trim_end().to_string();

            let count = reader
                .read_i32::<BigEndian>()
                .map_err(read_err(&name, pos))?;

            let mut code = [0u8; 4];
            reader
                .read_exact(&mut code)
                .map_err(read_err(&name, pos))?;

            let tail = reader
                .read_i32::<BigEndian>()
                .map_err(read_err(&name, pos))?;

            if tail != head {
                return Err(Error::TailMismatch {
                    name,
                    offset: pos,
                    head,
                    tail,
                });
            }

            if count < 0 {
                return Err(Error::Malformed {
                    name,
                    offset: pos,
                    reason: format!("negative element count {count}"),
                });
            }

            let array_type = ArrayType::from_code(&code)?;
            let offset = pos + 24;
            let payload = size_on_disk_binary(count as usize, array_type);

            pos = offset + payload;

            if pos > file_size {
                return Err(Error::UnexpectedEof { name, offset });
            }

            records.push(RecordInfo {
                name,
                array_type,
                count: count as usize,
                offset,
            });

            reader.seek(SeekFrom::Start(pos))?;
        }

        Ok(records)
    }

    fn scan_formatted(
        reader: &mut (impl Read + Seek),
        file_size: u64,
    ) -> Result<Vec<RecordInfo>> {
        let mut records = Vec::new();
        let mut pos = 0u64;

        while pos < file_size {
            let mut header = [0u8; 31];
            reader
                .read_exact(&mut header)
                .map_err(read_err("<header>", pos))?;

            let (name, count, array_type) = Self::parse_formatted_header(&header, pos)?;
            let offset = pos + 31;
            let payload = size_on_disk_formatted(count, array_type);

            pos = offset + payload;

            if pos > file_size {
                return Err(Error::UnexpectedEof { name, offset });
            }

            records.push(RecordInfo {
                name,
                array_type,
                count,
                offset,
            });

            reader.seek(SeekFrom::Start(pos))?;
        }

        Ok(records)
    }

    /// Header line layout: ` 'NAME    '        COUNT 'TYPE'` plus a newline
    fn parse_formatted_header(buf: &[u8; 31], offset: u64) -> Result<(String, usize, ArrayType)> {
        if buf[1] != b'\'' || buf[10] != b'\'' || buf[24] != b'\'' || buf[29] != b'\'' {
            return Err(Error::Malformed {
                name: "<header>".to_string(),
                offset,
                reason: "malformed formatted record header".to_string(),
            });
        }

        let name = String::from_utf8_lossy(&buf[2..10]).trim_end().to_string();

        let count: usize = std::str::from_utf8(&buf[11..23])
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Error::Malformed {
                name: name.clone(),
                offset,
                reason: "unreadable element count".to_string(),
            })?;

        let code = [buf[25], buf[26], buf[27], buf[28]];
        let array_type = ArrayType::from_code(&code)?;

        Ok((name, count, array_type))
    }

    /// Path the directory was built from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the formatted ASCII variant
    pub fn formatted(&self) -> bool {
        self.formatted
    }

    /// All records in file order
    pub fn list(&self) -> &[RecordInfo] {
        &self.records
    }

    /// Number of records in the file
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the file holds no records at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether any record carries the given name
    pub fn has_key(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// Index of the last record with the given name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.records.iter().rposition(|r| r.name == name)
    }

    /// Whether the payload for a record index has been materialised
    pub fn is_loaded(&self, index: usize) -> bool {
        self.data.get(index).is_some_and(|d| d.is_some())
    }

    /// Materialise and cache the payloads of the selected record indices
    pub fn load_data_by_index(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            if index >= self.records.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    count: self.records.len(),
                });
            }
        }

        let todo: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| self.data[i].is_none())
            .collect();

        if todo.is_empty() {
            return Ok(());
        }

        let mut reader = BufReader::new(File::open(&self.path)?);

        for index in todo {
            let record = self.records[index].clone();

            let data = if self.formatted {
                Self::read_formatted_array(&mut reader, &record)?
            } else {
                Self::read_binary_array(&mut reader, &record)?
            };

            self.data[index] = Some(data);
        }

        Ok(())
    }

    /// Materialise every occurrence of each named record
    pub fn load_data_by_name(&mut self, names: &[&str]) -> Result<()> {
        let mut indices = Vec::new();

        for name in names {
            let found = self
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.name == *name)
                .map(|(i, _)| i)
                .collect::<Vec<usize>>();

            if found.is_empty() {
                return Err(Error::NotFound(name.to_string()));
            }

            indices.extend(found);
        }

        self.load_data_by_index(&indices)
    }

    /// Materialise every record in the file
    pub fn load_all(&mut self) -> Result<()> {
        let all = (0..self.records.len()).collect::<Vec<usize>>();
        self.load_data_by_index(&all)
    }

    /// Typed data of the last record with the given name, loading on demand
    pub fn get<T: EclValue>(&mut self, name: &str) -> Result<&[T]> {
        let index = self
            .find(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.get_at(index)
    }

    /// Typed data of the record at an index, loading on demand
    pub fn get_at<T: EclValue>(&mut self, index: usize) -> Result<&[T]> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.records.len(),
            });
        }

        if self.data[index].is_none() {
            self.load_data_by_index(&[index])?;
        }

        let record = &self.records[index];

        match self.data[index].as_ref().and_then(T::slice) {
            Some(slice) => Ok(slice),
            None => Err(Error::WrongType {
                name: record.name.clone(),
                found: record.array_type.to_string(),
                requested: T::TYPE_NAME,
            }),
        }
    }

    fn read_binary_array(reader: &mut (impl Read + Seek), record: &RecordInfo) -> Result<ArrayData> {
        if matches!(record.array_type, ArrayType::Mess) {
            return Ok(ArrayData::Mess);
        }

        reader.seek(SeekFrom::Start(record.offset))?;

        let element_size = record.array_type.element_size();
        let max_block = record.array_type.max_block();

        let mut raw: Vec<u8> = Vec::with_capacity(record.count * element_size);
        let mut remaining = record.count;
        let mut block_pos = record.offset;

        while remaining > 0 {
            let expect = remaining.min(max_block);

            let head = reader
                .read_i32::<BigEndian>()
                .map_err(read_err(&record.name, block_pos))?;

            if head < 0 || head as usize != expect * element_size {
                return Err(Error::Malformed {
                    name: record.name.clone(),
                    offset: block_pos,
                    reason: format!("block of {head} bytes, expected {}", expect * element_size),
                });
            }

            let start = raw.len();
            raw.resize(start + expect * element_size, 0);
            reader
                .read_exact(&mut raw[start..])
                .map_err(read_err(&record.name, block_pos))?;

            let tail = reader
                .read_i32::<BigEndian>()
                .map_err(read_err(&record.name, block_pos))?;

            if tail != head {
                return Err(Error::TailMismatch {
                    name: record.name.clone(),
                    offset: block_pos,
                    head,
                    tail,
                });
            }

            remaining -= expect;
            block_pos += (expect * element_size + 8) as u64;
        }

        Ok(Self::convert_binary(&raw, record.array_type))
    }

    fn convert_binary(raw: &[u8], array_type: ArrayType) -> ArrayData {
        match array_type {
            ArrayType::Inte => ArrayData::Inte(
                raw.chunks_exact(4)
                    .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ArrayType::Real => ArrayData::Real(
                raw.chunks_exact(4)
                    .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ArrayType::Doub => ArrayData::Doub(
                raw.chunks_exact(8)
                    .map(|c| {
                        f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                    })
                    .collect(),
            ),
            ArrayType::Logi => ArrayData::Logi(
                raw.chunks_exact(4)
                    .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) != LOGI_FALSE)
                    .collect(),
            ),
            ArrayType::Char | ArrayType::C0nn(_) => {
                let width = array_type.element_size();
                ArrayData::Char(
                    raw.chunks_exact(width)
                        .map(|c| String::from_utf8_lossy(c).trim_end().to_string())
                        .collect(),
                )
            }
            ArrayType::Mess => ArrayData::Mess,
        }
    }

    fn read_formatted_array(
        reader: &mut (impl Read + Seek),
        record: &RecordInfo,
    ) -> Result<ArrayData> {
        if matches!(record.array_type, ArrayType::Mess) {
            return Ok(ArrayData::Mess);
        }

        reader.seek(SeekFrom::Start(record.offset))?;

        let size = size_on_disk_formatted(record.count, record.array_type) as usize;
        let mut buf = vec![0u8; size];
        reader
            .read_exact(&mut buf)
            .map_err(read_err(&record.name, record.offset))?;

        let text = String::from_utf8_lossy(&buf);
        Self::parse_formatted_payload(&text, record)
    }

    fn parse_formatted_payload(text: &str, record: &RecordInfo) -> Result<ArrayData> {
        let mut rest: &str = text;

        macro_rules! take_all {
            ($parser:expr) => {{
                let mut values = Vec::with_capacity(record.count);
                for _ in 0..record.count {
                    let (r, value) = $parser(rest).map_err(|_| Error::Parse {
                        name: record.name.clone(),
                    })?;
                    rest = r;
                    values.push(value);
                }
                values
            }};
        }

        Ok(match record.array_type {
            ArrayType::Inte => ArrayData::Inte(take_all!(parsers::inte)),
            ArrayType::Real => ArrayData::Real(take_all!(parsers::real)),
            ArrayType::Doub => ArrayData::Doub(take_all!(parsers::doub)),
            ArrayType::Logi => ArrayData::Logi(take_all!(parsers::logi)),
            ArrayType::Char | ArrayType::C0nn(_) => {
                let width = record.array_type.element_size();
                ArrayData::Char(take_all!(parsers::quoted(width)))
            }
            ArrayType::Mess => ArrayData::Mess,
        })
    }
}
