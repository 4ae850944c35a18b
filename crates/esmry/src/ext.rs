//! Reader for the compact ESMRY container
//!
//! The ESMRY file is a repack of a single run written by
//! [make_esmry_file](crate::ESmry::make_esmry_file): the resolved key list
//! (`KEYCHECK`), units, report-step markers (`RSTEP`), ministeps (`TSTEP`)
//! and one `V{n}` record per vector, always unformatted.

// crate modules
use crate::error::{Error, Result};

// standard library
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// external crates
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ecltools_io::EclFile;

/// Reader for a compact ESMRY file
///
/// ```rust, no_run
/// # use ecltools_esmry::ExtEsmry;
/// let mut smry = ExtEsmry::open("CASE.ESMRY").unwrap();
/// let fopt = smry.get("FOPT").unwrap();
/// ```
#[derive(Debug)]
pub struct ExtEsmry {
    file: EclFile,
    start_date: NaiveDateTime,
    keywords: Vec<String>,
    keyword_index: HashMap<String, usize>,
    units: Vec<String>,
    rstep: Vec<i32>,
    tstep: Vec<i32>,
    restart_root: String,
    restart_step: i32,
}

impl ExtEsmry {
    /// Open an ESMRY file and read its index records
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = EclFile::open(path)?;

        for name in ["START", "KEYCHECK", "UNITS", "RSTEP", "TSTEP"] {
            if !file.has_key(name) {
                return Err(Error::MissingRecord {
                    file: path.to_path_buf(),
                    name,
                });
            }
        }

        let start = file.get::<i32>("START")?.to_vec();
        let start_date = decode_start(&start)?;

        let keywords = file.get::<String>("KEYCHECK")?.to_vec();
        let units = file.get::<String>("UNITS")?.to_vec();
        let rstep = file.get::<i32>("RSTEP")?.to_vec();
        let tstep = file.get::<i32>("TSTEP")?.to_vec();

        let restart_root = if file.has_key("RESTART") {
            file.get::<String>("RESTART")?.concat().trim().to_string()
        } else {
            String::new()
        };
        let restart_step = if file.has_key("RSTNUM") {
            file.get::<i32>("RSTNUM")?.first().copied().unwrap_or(0)
        } else {
            0
        };

        let keyword_index = keywords
            .iter()
            .enumerate()
            .map(|(index, key)| (key.clone(), index))
            .collect();

        Ok(Self {
            file,
            start_date,
            keywords,
            keyword_index,
            units,
            rstep,
            tstep,
            restart_root,
            restart_step,
        })
    }

    /// All vector keys in container order
    pub fn keyword_list(&self) -> &[String] {
        &self.keywords
    }

    /// Check whether a vector key exists
    pub fn has_key(&self, key: &str) -> bool {
        self.keyword_index.contains_key(key)
    }

    /// Samples of one vector, loading on demand
    pub fn get(&mut self, key: &str) -> Result<&[f32]> {
        let index = *self
            .keyword_index
            .get(key)
            .ok_or_else(|| Error::KeywordNotFound(key.to_string()))?;

        Ok(self.file.get::<f32>(&format!("V{index}"))?)
    }

    /// Physical unit of a vector
    pub fn get_unit(&self, key: &str) -> Result<&str> {
        let index = *self
            .keyword_index
            .get(key)
            .ok_or_else(|| Error::KeywordNotFound(key.to_string()))?;

        Ok(&self.units[index])
    }

    /// Ministep counter per time step
    pub fn ministeps(&self) -> &[i32] {
        &self.tstep
    }

    /// 0/1 report-step flag per time step
    pub fn report_step_flags(&self) -> &[i32] {
        &self.rstep
    }

    /// Simulation start
    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    /// Restart root and step when the run was itself restarted
    pub fn restart_info(&self) -> Option<(&str, i32)> {
        if self.restart_root.is_empty() {
            None
        } else {
            Some((&self.restart_root, self.restart_step))
        }
    }

    /// Date of every time step, via the TIME vector
    pub fn dates(&mut self) -> Result<Vec<NaiveDateTime>> {
        let start = self.start_date;
        let time = self.get("TIME")?;

        Ok(time
            .iter()
            .map(|days| {
                start + Duration::microseconds((*days as f64 * 86400.0 * 1.0e6).round() as i64)
            })
            .collect())
    }
}

/// START holds day, month, year, hour, minute, second, millisecond
fn decode_start(start: &[i32]) -> Result<NaiveDateTime> {
    if start.len() < 7 {
        return Err(Error::InvalidStartDate);
    }

    let date = NaiveDate::from_ymd_opt(start[2], start[1] as u32, start[0] as u32)
        .ok_or(Error::InvalidStartDate)?;
    let time = NaiveTime::from_hms_milli_opt(
        start[3] as u32,
        start[4] as u32,
        start[5] as u32,
        start[6] as u32,
    )
    .ok_or(Error::InvalidStartDate)?;

    Ok(date.and_time(time))
}
