//! Summary time-series resolution across restarted runs

// crate modules
use crate::error::{Error, Result};
use crate::key::{make_key_string, NO_WGNAME};
use crate::node::{category_from_keyword, normalise_keyword, LgrInfo, SummaryNode};

// standard library
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

// external crates
use byteorder::{BigEndian, ReadBytesExt};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ecltools_io::{
    size_on_disk_formatted, ArrayType, EclFile, EclWriter, COLUMNS_REAL, MAX_BLOCK_REAL,
    SIZE_OF_INTE, SIZE_OF_REAL, WIDTH_INTE, WIDTH_REAL,
};
use itertools::Itertools;
use log::{debug, info};
use regex::Regex;

/// Location of one MINISTEP or PARAMS record
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepEntry {
    /// Index into the spec-file chain
    spec: usize,
    /// Index into the data-file list
    file: usize,
    /// First payload byte of the record
    offset: u64,
}

/// Everything read from one spec file of the restart chain
#[derive(Debug)]
struct SpecFile {
    path: PathBuf,
    formatted: bool,
    nijk: [usize; 3],
    n_params: usize,
    restart_step: i32,
    restart: String,
    startdat: Vec<i32>,
    keys: Vec<String>,
    units: Vec<String>,
    nodes: Vec<Option<SummaryNode>>,
}

/// Reader resolving summary vectors across a chain of restarted runs
///
/// A run's vector definitions live in its `SMSPEC` file and its samples in
/// either a unified `UNSMRY` file or numbered `.Snnnn` files. A restarted
/// run additionally points at the spec file of its base run. Opening with
/// [`from_file_with_base_runs`](ESmry::from_file_with_base_runs) walks that
/// chain, unions the keyword sets and exposes every vector as one flat time
/// series over all runs.
///
/// Samples are materialised on demand: requesting a single vector seeks
/// directly to one float per time step, while [`load_all`](ESmry::load_all)
/// streams each PARAMS record once and is preferred when most vectors will
/// be needed.
///
/// ```rust, no_run
/// # use ecltools_esmry::ESmry;
/// let mut smry = ESmry::from_file("CASE.SMSPEC").unwrap();
///
/// let wopr = smry.get("WOPR:OP_1").unwrap().to_vec();
/// let unit = smry.get_unit("WOPR:OP_1").unwrap();
/// ```
#[derive(Debug)]
pub struct ESmry {
    smspec_path: PathBuf,
    from_single_run: bool,
    nijk: [usize; 3],
    startdat: Vec<i32>,
    start_date: NaiveDateTime,
    restart_root: String,
    restart_step: i32,
    keywords: Vec<String>,
    keyword_index: HashMap<String, usize>,
    units: HashMap<String, String>,
    summary_nodes: Vec<SummaryNode>,
    spec_formatted: Vec<bool>,
    n_params: Vec<usize>,
    array_pos: Vec<HashMap<usize, usize>>,
    data_files: Vec<PathBuf>,
    time_steps: Vec<StepEntry>,
    mini_step_entries: Vec<StepEntry>,
    seq_index: Vec<usize>,
    mini_steps: Vec<i32>,
    vector_data: Vec<Vec<f32>>,
    vector_loaded: Vec<bool>,
}

impl ESmry {
    /// Open a single run, ignoring any restart ancestry
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(path.as_ref(), false)
    }

    /// Open a run together with the full chain of base runs it restarts from
    pub fn from_file_with_base_runs<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(path.as_ref(), true)
    }

    fn new(path: &Path, load_base_run_data: bool) -> Result<Self> {
        // a bare root name implies the unformatted spec file
        let mut smspec_path = path.to_path_buf();
        if smspec_path.extension().is_none() {
            smspec_path.set_extension("SMSPEC");
        }

        let extension = smspec_path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if extension != "SMSPEC" && extension != "FSMSPEC" {
            return Err(Error::WrongExtension);
        }

        info!("Reading {:?}", smspec_path.file_name());

        let mut specs: Vec<SpecFile> = Vec::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(smspec_path.canonicalize()?);

        let mut current_path = smspec_path.clone();
        let mut current_dir = smspec_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        loop {
            let spec = Self::read_spec_file(&current_path)?;
            let restart = spec.restart.clone();
            specs.push(spec);

            if !load_base_run_data || restart.is_empty() {
                break;
            }

            // restart roots are recorded relative to the spec that names them
            let restart_path = PathBuf::from(&restart);
            let restart_parent = restart_path.parent().unwrap_or(Path::new(""));

            current_dir = if restart_parent.is_absolute() {
                restart_parent.to_path_buf()
            } else {
                current_dir.join(restart_parent)
            };

            let base = match restart_path.file_stem() {
                Some(stem) => current_dir.join(stem),
                None => return Err(Error::RestartPathNotFound(restart_path)),
            };

            let mut candidate = base.with_extension("SMSPEC");
            if !candidate.exists() {
                candidate = base.with_extension("FSMSPEC");
            }
            if !candidate.exists() {
                return Err(Error::RestartPathNotFound(base));
            }

            if !visited.insert(candidate.canonicalize()?) {
                return Err(Error::RestartLoop(candidate));
            }

            debug!("following restart chain to {:?}", candidate.file_name());
            current_path = candidate;
        }

        let primary = &specs[0];
        let nijk = primary.nijk;
        let startdat = primary.startdat.clone();
        let start_date = decode_start_date(&startdat)?;
        let restart_root = primary.restart.clone();
        let restart_step = primary.restart_step;

        // union of all non-empty keys, first-seen order with base runs first
        let mut keywords: Vec<String> = Vec::new();
        let mut keyword_index: HashMap<String, usize> = HashMap::new();
        let mut units: HashMap<String, String> = HashMap::new();
        let mut summary_nodes: Vec<SummaryNode> = Vec::new();

        for spec in specs.iter().rev() {
            for (column, key) in spec.keys.iter().enumerate() {
                if key.is_empty() || keyword_index.contains_key(key) {
                    continue;
                }

                keyword_index.insert(key.clone(), keywords.len());
                keywords.push(key.clone());
                units.insert(key.clone(), spec.units[column].clone());

                if let Some(node) = &spec.nodes[column] {
                    summary_nodes.push(node.clone());
                }
            }
        }

        let array_pos: Vec<HashMap<usize, usize>> = specs
            .iter()
            .map(|spec| {
                let mut map = HashMap::new();
                for (column, key) in spec.keys.iter().enumerate() {
                    if let Some(&ordinal) = keyword_index.get(key) {
                        map.insert(ordinal, column);
                    }
                }
                map
            })
            .collect();

        // enumerate time steps, base runs first so the series is
        // chronological; a child run's restart step caps its parent
        let mut data_files: Vec<PathBuf> = Vec::new();
        let mut time_steps: Vec<StepEntry> = Vec::new();
        let mut mini_step_entries: Vec<StepEntry> = Vec::new();
        let mut seq_index: Vec<usize> = Vec::new();

        let mut from_report = 0i32;
        let mut step = 0usize;

        for spec_ind in (0..specs.len()).rev() {
            let to_report = if spec_ind > 0 {
                specs[spec_ind - 1].restart_step
            } else {
                i32::MAX
            };

            let spec = &specs[spec_ind];
            let root = spec.path.with_extension("");
            let result_files = Self::result_files_for(&root, spec.formatted)?;

            let mut sources: Vec<(String, usize, u64)> = Vec::new();
            for path in result_files {
                let file_index = match data_files.iter().position(|p| *p == path) {
                    Some(index) => index,
                    None => {
                        data_files.push(path.clone());
                        data_files.len() - 1
                    }
                };

                for (name, offset) in Self::list_step_arrays(&path)? {
                    sources.push((name, file_index, offset));
                }
            }

            let mut report = from_report;
            let mut i = usize::from(sources.first().is_some_and(|s| s.0 == "SEQHDR"));

            while i < sources.len() {
                if sources[i].0 != "MINISTEP" {
                    return Err(Error::UnexpectedRecord {
                        file: data_files[sources[i].1].clone(),
                        expected: "MINISTEP",
                        found: sources[i].0.clone(),
                    });
                }

                let Some(params) = sources.get(i + 1) else {
                    return Err(Error::UnexpectedRecord {
                        file: data_files[sources[i].1].clone(),
                        expected: "PARAMS",
                        found: "end of file".to_string(),
                    });
                };

                if params.0 != "PARAMS" {
                    return Err(Error::UnexpectedRecord {
                        file: data_files[params.1].clone(),
                        expected: "PARAMS",
                        found: params.0.clone(),
                    });
                }

                mini_step_entries.push(StepEntry {
                    spec: spec_ind,
                    file: sources[i].1,
                    offset: sources[i].2,
                });
                time_steps.push(StepEntry {
                    spec: spec_ind,
                    file: params.1,
                    offset: params.2,
                });

                i += 2;

                // a SEQHDR after PARAMS, or the end of the run, marks the
                // step just emitted as a report step
                if i < sources.len() {
                    if sources[i].0 == "SEQHDR" {
                        i += 1;
                        report += 1;
                        seq_index.push(step);
                    }
                } else {
                    report += 1;
                    seq_index.push(step);
                }

                step += 1;

                if report >= to_report {
                    break;
                }
            }

            from_report = to_report;
        }

        debug!(
            "{} vectors over {} time steps in {} result files",
            keywords.len(),
            time_steps.len(),
            data_files.len()
        );

        let vector_data = vec![Vec::new(); keywords.len()];
        let vector_loaded = vec![false; keywords.len()];

        Ok(Self {
            smspec_path,
            from_single_run: !load_base_run_data,
            nijk,
            startdat,
            start_date,
            restart_root,
            restart_step,
            keywords,
            keyword_index,
            units,
            summary_nodes,
            spec_formatted: specs.iter().map(|s| s.formatted).collect(),
            n_params: specs.iter().map(|s| s.n_params).collect(),
            array_pos,
            data_files,
            time_steps,
            mini_step_entries,
            seq_index,
            mini_steps: Vec::new(),
            vector_data,
            vector_loaded,
        })
    }

    fn read_spec_file(path: &Path) -> Result<SpecFile> {
        let mut file = EclFile::open(path)?;

        for name in ["DIMENS", "KEYWORDS", "NUMS", "UNITS"] {
            if !file.has_key(name) {
                return Err(Error::MissingRecord {
                    file: path.to_path_buf(),
                    name,
                });
            }
        }

        let dimens = file.get::<i32>("DIMENS")?.to_vec();
        if dimens.len() < 6 {
            return Err(Error::MalformedRecord {
                file: path.to_path_buf(),
                name: "DIMENS",
            });
        }

        let n_params = dimens[0] as usize;
        let nijk = [dimens[1] as usize, dimens[2] as usize, dimens[3] as usize];
        let restart_step = dimens[5];

        let keywords = file.get::<String>("KEYWORDS")?.to_vec();

        let wgnames = if file.has_key("WGNAMES") {
            file.get::<String>("WGNAMES")?.to_vec()
        } else if file.has_key("NAMES") {
            file.get::<String>("NAMES")?.to_vec()
        } else {
            return Err(Error::MissingRecord {
                file: path.to_path_buf(),
                name: "WGNAMES",
            });
        };

        let nums = file.get::<i32>("NUMS")?.to_vec();
        let unit_list = file.get::<String>("UNITS")?.to_vec();

        let restart = if file.has_key("RESTART") {
            file.get::<String>("RESTART")?.concat().trim().to_string()
        } else {
            String::new()
        };

        let startdat = if file.has_key("STARTDAT") {
            file.get::<i32>("STARTDAT")?.to_vec()
        } else {
            Vec::new()
        };

        let lgrs = if file.has_key("LGRS") {
            Some((
                file.get::<String>("LGRS")?.to_vec(),
                file.get::<i32>("NUMLX")?.to_vec(),
                file.get::<i32>("NUMLY")?.to_vec(),
                file.get::<i32>("NUMLZ")?.to_vec(),
            ))
        } else {
            None
        };

        let mut keys = Vec::with_capacity(keywords.len());
        let mut units = Vec::with_capacity(keywords.len());
        let mut nodes = Vec::with_capacity(keywords.len());

        for (column, raw_keyword) in keywords.iter().enumerate() {
            let wgname = wgnames
                .get(column)
                .cloned()
                .unwrap_or_else(|| NO_WGNAME.to_string());
            let number = nums.get(column).copied().unwrap_or(0);
            let unit = unit_list.get(column).cloned().unwrap_or_default();

            let lgr = lgrs.as_ref().map(|(names, lx, ly, lz)| LgrInfo {
                name: names.get(column).cloned().unwrap_or_default(),
                ijk: [
                    lx.get(column).copied().unwrap_or(0),
                    ly.get(column).copied().unwrap_or(0),
                    lz.get(column).copied().unwrap_or(0),
                ],
            });

            let category = category_from_keyword(raw_keyword);
            let keyword = normalise_keyword(raw_keyword);
            let key = make_key_string(&keyword, &wgname, number, lgr.as_ref(), nijk[0], nijk[1])?;

            let node = (!key.is_empty()).then(|| SummaryNode {
                keyword,
                category,
                wgname,
                number,
                unit: unit.clone(),
                lgr,
            });

            keys.push(key);
            units.push(unit);
            nodes.push(node);
        }

        Ok(SpecFile {
            path: path.to_path_buf(),
            formatted: file.formatted(),
            nijk,
            n_params,
            restart_step,
            restart,
            startdat,
            keys,
            units,
            nodes,
        })
    }

    /// Pick the result files of one run: a unified UNSMRY when it is the
    /// most recent output, otherwise the numbered multi-file set
    fn result_files_for(root: &Path, formatted: bool) -> Result<Vec<PathBuf>> {
        let unified = root.with_extension(if formatted { "FUNSMRY" } else { "UNSMRY" });

        let dir = match root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = root.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let marker = if formatted { 'A' } else { 'S' };

        let mut numbered: Vec<PathBuf> = Vec::new();
        if dir.exists() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();

                let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                    continue;
                };
                let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                if file_stem == stem
                    && ext.len() > 1
                    && ext.starts_with(marker)
                    && ext[1..].bytes().all(|b| b.is_ascii_digit())
                {
                    numbered.push(path);
                }
            }
        }

        let numbered: Vec<PathBuf> = numbered.into_iter().sorted().collect();
        let use_unified = unified.exists();

        match (use_unified, numbered.last()) {
            (false, None) => Err(Error::NoResultFiles(root.to_path_buf())),
            (true, None) => Ok(vec![unified]),
            (false, Some(_)) => Ok(numbered),
            (true, Some(last)) => {
                let newest_numbered = std::fs::metadata(last)?.modified()?;
                let unified_time = std::fs::metadata(&unified)?.modified()?;

                if newest_numbered > unified_time {
                    Ok(numbered)
                } else {
                    Ok(vec![unified])
                }
            }
        }
    }

    /// Record names and payload offsets of one result file
    ///
    /// Only the MINISTEP/PARAMS/SEQHDR stream is legal; the TNAV vendor
    /// records are tolerated (and dropped) in binary files, anything else
    /// is a structural error.
    fn list_step_arrays(path: &Path) -> Result<Vec<(String, u64)>> {
        let file = EclFile::open(path)?;
        let formatted = file.formatted();

        let mut list = Vec::with_capacity(file.len());

        for record in file.list() {
            match record.name.as_str() {
                "SEQHDR" | "MINISTEP" | "PARAMS" => {
                    list.push((record.name.clone(), record.offset));
                }
                "TNAVHEAD" | "TNAVTIME" if !formatted => {
                    debug!("skipping vendor array {} in {:?}", record.name, path.file_name());
                }
                other => {
                    log::error!("unknown array \"{other}\" in summary data file {path:?}");
                    return Err(Error::UnknownStepRecord {
                        file: path.to_path_buf(),
                        name: other.to_string(),
                    });
                }
            }
        }

        Ok(list)
    }

    /// All resolved vector keys, base runs first in first-seen order
    pub fn keyword_list(&self) -> &[String] {
        &self.keywords
    }

    /// Vector keys matching a shell-style pattern with `*` and `?`
    pub fn keyword_list_matching(&self, pattern: &str) -> Vec<String> {
        let mut expression = String::with_capacity(pattern.len() + 2);
        expression.push('^');
        for c in pattern.chars() {
            match c {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(&other.to_string())),
            }
        }
        expression.push('$');

        match Regex::new(&expression) {
            Ok(re) => self
                .keywords
                .iter()
                .filter(|key| re.is_match(key))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Check whether a vector key exists
    pub fn has_key(&self, key: &str) -> bool {
        self.keyword_index.contains_key(key)
    }

    /// Definitions of every addressable vector
    pub fn summary_node_list(&self) -> &[SummaryNode] {
        &self.summary_nodes
    }

    /// Physical unit of a vector
    pub fn get_unit(&self, key: &str) -> Result<&str> {
        self.units
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::KeywordNotFound(key.to_string()))
    }

    /// Simulation start from STARTDAT
    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    /// Grid dimensions from DIMENS
    pub fn dimensions(&self) -> [usize; 3] {
        self.nijk
    }

    /// Number of resolved time steps across the chain
    pub fn num_timesteps(&self) -> usize {
        self.time_steps.len()
    }

    /// Restart root and step recorded in the primary spec file
    pub fn restart_info(&self) -> Option<(&str, i32)> {
        if self.restart_root.is_empty() {
            None
        } else {
            Some((&self.restart_root, self.restart_step))
        }
    }

    /// Time-step index where a 1-based report step starts
    pub fn timestep_idx_at_reportstep_start(&self, report_step: usize) -> Result<usize> {
        if report_step < 1 || report_step > self.seq_index.len() {
            return Err(Error::ReportStepOutOfRange {
                step: report_step,
                count: self.seq_index.len(),
            });
        }

        Ok(self.seq_index[report_step - 1])
    }

    /// Materialise the selected vectors by seeking to one float per step
    ///
    /// Steps of a run that does not define a vector contribute NaN samples,
    /// which happens when a vector was added in a restarted run or dropped
    /// from one.
    pub fn load(&mut self, keys: &[&str]) -> Result<()> {
        let mut want = Vec::with_capacity(keys.len());
        for key in keys {
            let index = *self
                .keyword_index
                .get(*key)
                .ok_or_else(|| Error::KeywordNotFound(key.to_string()))?;

            if !self.vector_loaded[index] {
                want.push(index);
            }
        }
        want.sort_unstable();
        want.dedup();

        if want.is_empty() {
            return Ok(());
        }

        if self.time_steps.is_empty() {
            for index in want {
                self.vector_loaded[index] = true;
            }
            return Ok(());
        }

        for &index in &want {
            self.vector_data[index] = Vec::with_capacity(self.time_steps.len());
        }

        let block_formatted = size_on_disk_formatted(MAX_BLOCK_REAL, ArrayType::Real);

        let mut current_file = self.time_steps[0].file;
        let mut reader = BufReader::new(File::open(&self.data_files[current_file])?);

        for step in &self.time_steps {
            if step.file != current_file {
                reader = BufReader::new(File::open(&self.data_files[step.file])?);
                current_file = step.file;
            }

            let formatted = self.spec_formatted[step.spec];

            for &index in &want {
                match self.array_pos[step.spec].get(&index) {
                    None => self.vector_data[index].push(f32::NAN),
                    Some(&column) => {
                        let value = if formatted {
                            let blocks = column / MAX_BLOCK_REAL;
                            let within = column % MAX_BLOCK_REAL;
                            let lines = within / COLUMNS_REAL;
                            let position = step.offset
                                + blocks as u64 * block_formatted
                                + (within * WIDTH_REAL + lines) as u64;

                            reader.seek(SeekFrom::Start(position))?;
                            let mut buf = [0u8; WIDTH_REAL];
                            reader.read_exact(&mut buf)?;

                            String::from_utf8_lossy(&buf)
                                .trim()
                                .parse::<f32>()
                                .unwrap_or(-1.0e20)
                        } else {
                            let full_blocks = column / MAX_BLOCK_REAL;
                            let position = step.offset
                                + ((2 * full_blocks + 1) * SIZE_OF_INTE) as u64
                                + (column * SIZE_OF_REAL) as u64;

                            reader.seek(SeekFrom::Start(position))?;
                            reader.read_f32::<BigEndian>()?
                        };

                        self.vector_data[index].push(value);
                    }
                }
            }
        }

        for index in want {
            self.vector_loaded[index] = true;
        }

        Ok(())
    }

    /// Column-to-ordinal map of a spec file, and the ordinals it lacks
    fn column_maps(&self, spec: usize) -> (Vec<i32>, Vec<usize>) {
        let mut keywpos = vec![-1i32; self.n_params[spec]];
        for (&ordinal, &column) in &self.array_pos[spec] {
            if column < keywpos.len() {
                keywpos[column] = ordinal as i32;
            }
        }

        let missing = (0..self.keywords.len())
            .filter(|ordinal| !self.array_pos[spec].contains_key(ordinal))
            .collect();

        (keywpos, missing)
    }

    /// Materialise every vector by streaming each PARAMS record once
    pub fn load_all(&mut self) -> Result<()> {
        if self.time_steps.is_empty() {
            self.vector_loaded.iter_mut().for_each(|flag| *flag = true);
            return Ok(());
        }

        let already = self.vector_loaded.clone();

        for (index, loaded) in already.iter().enumerate() {
            if !loaded {
                self.vector_data[index] = Vec::with_capacity(self.time_steps.len());
            }
        }

        let first = self.time_steps[0];
        let mut current_spec = first.spec;
        let (mut keywpos, mut missing) = self.column_maps(current_spec);
        let mut current_file = first.file;
        let mut reader = BufReader::new(File::open(&self.data_files[current_file])?);

        for step in &self.time_steps {
            if step.spec != current_spec {
                current_spec = step.spec;
                let maps = self.column_maps(current_spec);
                keywpos = maps.0;
                missing = maps.1;
            }

            if step.file != current_file {
                reader = BufReader::new(File::open(&self.data_files[step.file])?);
                current_file = step.file;
            }

            let file_path = &self.data_files[step.file];
            let count = self.n_params[step.spec];

            let values = if self.spec_formatted[step.spec] {
                read_params_formatted(&mut reader, step.offset, count)?
            } else {
                read_params_binary(&mut reader, file_path, step.offset, count)?
            };

            for (column, value) in values.iter().enumerate() {
                let ordinal = keywpos.get(column).copied().unwrap_or(-1);
                if ordinal >= 0 && !already[ordinal as usize] {
                    self.vector_data[ordinal as usize].push(*value);
                }
            }

            for &ordinal in &missing {
                if !already[ordinal] {
                    self.vector_data[ordinal].push(f32::NAN);
                }
            }
        }

        self.vector_loaded.iter_mut().for_each(|flag| *flag = true);

        Ok(())
    }

    /// Samples of one vector, loading on demand
    pub fn get(&mut self, key: &str) -> Result<&[f32]> {
        let index = *self
            .keyword_index
            .get(key)
            .ok_or_else(|| Error::KeywordNotFound(key.to_string()))?;

        if !self.vector_loaded[index] {
            self.load(&[key])?;
        }

        Ok(&self.vector_data[index])
    }

    /// Samples of an already materialised vector, never touching disk
    pub fn get_loaded(&self, key: &str) -> Result<&[f32]> {
        let index = *self
            .keyword_index
            .get(key)
            .ok_or_else(|| Error::KeywordNotFound(key.to_string()))?;

        if !self.vector_loaded[index] {
            return Err(Error::NotLoaded(key.to_string()));
        }

        Ok(&self.vector_data[index])
    }

    /// Samples of one vector at report steps only
    pub fn get_at_rstep(&mut self, key: &str) -> Result<Vec<f32>> {
        let seq = self.seq_index.clone();
        let values = self.get(key)?;

        Ok(seq.iter().map(|&i| values[i]).collect())
    }

    /// The MINISTEP counter of every time step
    pub fn ministeps(&mut self) -> Result<&[i32]> {
        if self.mini_steps.is_empty() && !self.mini_step_entries.is_empty() {
            let entries = self.mini_step_entries.clone();

            let mut current_file = entries[0].file;
            let mut reader = BufReader::new(File::open(&self.data_files[current_file])?);
            let mut values = Vec::with_capacity(entries.len());

            for entry in entries {
                if entry.file != current_file {
                    reader = BufReader::new(File::open(&self.data_files[entry.file])?);
                    current_file = entry.file;
                }

                reader.seek(SeekFrom::Start(entry.offset))?;

                let value = if self.spec_formatted[entry.spec] {
                    let mut buf = [0u8; WIDTH_INTE];
                    reader.read_exact(&mut buf)?;
                    String::from_utf8_lossy(&buf)
                        .trim()
                        .parse::<i32>()
                        .map_err(|_| Error::BadMiniStep {
                            file: self.data_files[entry.file].clone(),
                        })?
                } else {
                    reader.read_i32::<BigEndian>()?
                };

                values.push(value);
            }

            self.mini_steps = values;
        }

        Ok(&self.mini_steps)
    }

    /// True when the ministep counters have no gaps
    pub fn all_steps_available(&mut self) -> Result<bool> {
        let steps = self.ministeps()?;
        Ok(steps.windows(2).all(|pair| pair[1] - pair[0] <= 1))
    }

    /// Date of every time step, `start_date + TIME * 86400 s`
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

    /// Dates at report steps only
    pub fn dates_at_rstep(&mut self) -> Result<Vec<NaiveDateTime>> {
        let seq = self.seq_index.clone();
        let dates = self.dates()?;

        Ok(seq.iter().map(|&i| dates[i]).collect())
    }

    /// Repack this run into the compact ESMRY container
    ///
    /// Only meaningful for a single run. Returns `Ok(false)` without
    /// touching anything when the target file already exists.
    pub fn make_esmry_file(&mut self) -> Result<bool> {
        if !self.from_single_run {
            return Err(Error::EsmryRequiresSingleRun);
        }

        self.ministeps()?;

        let target = self.smspec_path.with_extension("ESMRY");
        if target.exists() {
            return Ok(false);
        }

        let is_rstep: Vec<i32> = (0..self.time_steps.len())
            .map(|i| i32::from(self.seq_index.contains(&i)))
            .collect();

        self.load_all()?;

        let mut start = self.startdat.clone();
        start.resize(6, 0);
        let micro = start[5];
        start[5] = micro / 1_000_000;
        start.push((micro % 1_000_000) / 1_000);

        let units: Vec<&str> = self
            .keywords
            .iter()
            .map(|key| self.units.get(key).map(String::as_str).unwrap_or(""))
            .collect();

        info!("writing {:?}", target.file_name());

        let mut out = EclWriter::create(&target)?;
        out.write_inte("START", &start)?;

        if !self.restart_root.is_empty() {
            out.write_char("RESTART", &[self.restart_root.as_str()])?;
            out.write_inte("RSTNUM", &[self.restart_step])?;
        }

        out.write_char("KEYCHECK", &self.keywords)?;
        out.write_char("UNITS", &units)?;
        out.write_inte("RSTEP", &is_rstep)?;
        out.write_inte("TSTEP", &self.mini_steps)?;

        for (n, vector) in self.vector_data.iter().enumerate() {
            out.write_real(&format!("V{n}"), vector)?;
        }

        out.flush()?;

        Ok(true)
    }
}

/// Decode STARTDAT: day, month, year and optionally hour, minute and
/// microseconds
fn decode_start_date(startdat: &[i32]) -> Result<NaiveDateTime> {
    if startdat.len() < 3 {
        return Err(Error::InvalidStartDate);
    }

    let (hour, minute, micro_total) = if startdat.len() >= 6 {
        (startdat[3], startdat[4], startdat[5])
    } else {
        (0, 0, 0)
    };

    let date = NaiveDate::from_ymd_opt(startdat[2], startdat[1] as u32, startdat[0] as u32)
        .ok_or(Error::InvalidStartDate)?;
    let time = NaiveTime::from_hms_micro_opt(
        hour as u32,
        minute as u32,
        (micro_total / 1_000_000) as u32,
        (micro_total % 1_000_000) as u32,
    )
    .ok_or(Error::InvalidStartDate)?;

    Ok(date.and_time(time))
}

/// One whole PARAMS record from a binary result file, block framing checked
fn read_params_binary(
    reader: &mut (impl Read + Seek),
    file: &Path,
    offset: u64,
    count: usize,
) -> Result<Vec<f32>> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut values = Vec::with_capacity(count);
    let mut rest = count as i64;

    while rest > 0 {
        let head = reader.read_i32::<BigEndian>()?;
        let num = head / SIZE_OF_REAL as i32;

        if num < 0 || num as usize > MAX_BLOCK_REAL {
            return Err(Error::BadParamsBlock {
                file: file.to_path_buf(),
            });
        }

        for _ in 0..num {
            values.push(reader.read_f32::<BigEndian>()?);
        }

        rest -= num as i64;

        if ((num as usize) < MAX_BLOCK_REAL && rest != 0)
            || (num as usize == MAX_BLOCK_REAL && rest < 0)
        {
            return Err(Error::BadParamsBlock {
                file: file.to_path_buf(),
            });
        }

        let tail = reader.read_i32::<BigEndian>()?;
        if tail != head {
            return Err(Error::BadParamsBlock {
                file: file.to_path_buf(),
            });
        }
    }

    Ok(values)
}

/// One whole PARAMS record from a formatted result file
fn read_params_formatted(
    reader: &mut (impl Read + Seek),
    offset: u64,
    count: usize,
) -> Result<Vec<f32>> {
    reader.seek(SeekFrom::Start(offset))?;

    let size = size_on_disk_formatted(count, ArrayType::Real) as usize;
    let mut buf = vec![0u8; size];
    reader.read_exact(&mut buf)?;

    let text = String::from_utf8_lossy(&buf);
    let mut tokens = text.split_whitespace();
    let mut values = Vec::with_capacity(count);

    for _ in 0..count {
        match tokens.next() {
            Some(token) => values.push(token.parse::<f32>().unwrap_or(-1.0e20)),
            // file possibly truncated, add an obviously invalid value
            None => values.push(-1.0e20),
        }
    }

    Ok(values)
}
