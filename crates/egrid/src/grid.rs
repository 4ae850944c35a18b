//! Corner-point grid reading and cell geometry reconstruction

// crate modules
use crate::error::{Error, Result};

// standard library
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

// external crates
use byteorder::{BigEndian, ReadBytesExt};
use ecltools_io::{EclFile, MAX_BLOCK_REAL, SIZE_OF_INTE, SIZE_OF_REAL};
use itertools::iproduct;
use log::{debug, info};

/// Map-projection transform defined by the `MAPAXES` record
///
/// The six record values are the tip of the Y axis, the origin and the tip
/// of the X axis in world coordinates, already scaled by the `MAPUNITS`
/// length factor. The axis vectors are normalised to unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapAxes {
    origin: [f64; 2],
    unit_x: [f64; 2],
    unit_y: [f64; 2],
}

impl MapAxes {
    fn from_record(values: &[f64; 6]) -> Self {
        let origin = [values[2], values[3]];
        let mut unit_x = [values[4] - values[2], values[5] - values[3]];
        let mut unit_y = [values[0] - values[2], values[1] - values[3]];

        let norm_x = unit_x[0].hypot(unit_x[1]);
        let norm_y = unit_y[0].hypot(unit_y[1]);

        unit_x[0] /= norm_x;
        unit_x[1] /= norm_x;
        unit_y[0] /= norm_y;
        unit_y[1] /= norm_y;

        Self {
            origin,
            unit_x,
            unit_y,
        }
    }

    /// Map grid-local xy into world coordinates
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.origin[0] + x * self.unit_x[0] + y * self.unit_y[0],
            self.origin[1] + x * self.unit_x[1] + y * self.unit_y[1],
        )
    }
}

/// The eight reconstructed corners of one cell
///
/// Corners 0..4 are the top face, 4..8 the bottom face, both in the order
/// (i,j), (i+1,j), (i,j+1), (i+1,j+1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellCorners {
    /// x coordinate per corner
    pub x: [f64; 8],
    /// y coordinate per corner
    pub y: [f64; 8],
    /// depth per corner
    pub z: [f64; 8],
}

/// One non-neighbor connection with 0-based cell coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nnc {
    /// First cell of the connection
    pub ijk1: [usize; 3],
    /// Second cell of the connection
    pub ijk2: [usize; 3],
    /// Transmissibility from the INIT file, -1.0 when not available
    pub trans: f32,
}

/// Interpolate a pillar at depth `z`, holding xy fixed for degenerate
/// pillars where the two samples coincide in depth
fn interpolate_pillar(xt: f64, yt: f64, zt: f64, xb: f64, yb: f64, zb: f64, z: f64) -> (f64, f64) {
    if zt == zb {
        (xt, yt)
    } else {
        let w = (zt - z) / (zt - zb);
        (xt + (xb - xt) * w, yt + (yb - yt) * w)
    }
}

/// Reader for corner-point grid geometry from an EGRID file
///
/// Construction walks the record directory once, picking up grid metadata
/// and the directory indices of the heavyweight arrays. `COORD` and `ZCORN`
/// stay on disk until cell geometry is first requested.
///
/// ```rust, no_run
/// # use ecltools_egrid::EGrid;
/// let mut grid = EGrid::open("CASE.EGRID").unwrap();
///
/// let [nx, ny, nz] = grid.dimensions();
/// let corners = grid.cell_corners(0, 0, nz - 1).unwrap();
/// ```
#[derive(Debug)]
pub struct EGrid {
    file: EclFile,
    init_path: PathBuf,
    grid_name: String,
    nijk: [usize; 3],
    host_nijk: [usize; 3],
    numres: usize,
    radial: bool,
    map_units: Option<String>,
    mapaxes: Option<MapAxes>,
    res: Vec<usize>,
    act_index: Vec<i32>,
    glob_index: Vec<usize>,
    lgr_names: Vec<String>,
    host_cells: Vec<usize>,
    coord_index: Option<usize>,
    zcorn_index: Option<usize>,
    nnc1_index: Option<usize>,
    nnc2_index: Option<usize>,
    coord: Vec<f32>,
    zcorn: Vec<f32>,
    nncs: Option<Vec<Nnc>>,
}

impl EGrid {
    /// Open the global grid of an EGRID file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_grid(path, "global")
    }

    /// Open a named grid, either `"global"` or one of the LGRs
    pub fn open_grid<P: AsRef<Path>>(path: P, grid_name: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut file = EclFile::open(path)?;

        info!("reading grid \"{grid_name}\" from {:?}", path.file_name());

        let stem = path.with_extension("");
        let init_path = if file.formatted() {
            stem.with_extension("FINIT")
        } else {
            stem.with_extension("INIT")
        };

        let names: Vec<(usize, String)> = file
            .list()
            .iter()
            .enumerate()
            .map(|(n, r)| (n, r.name.clone()))
            .collect();

        let mut context = "global".to_string();
        let mut length_factor = 1.0f64;
        let mut map_units = None;
        let mut mapaxes = None;
        let mut lgr_names: Vec<String> = Vec::new();
        let mut nijk = [0usize; 3];
        let mut host_nijk = [0usize; 3];
        let mut numres = 1usize;
        let mut radial = false;

        let mut coord_index = None;
        let mut coordsys_index = None;
        let mut zcorn_index = None;
        let mut actnum_index = None;
        let mut nnc1_index = None;
        let mut nnc2_index = None;
        let mut hostnum_index = None;

        for (n, name) in &names {
            match name.as_str() {
                "ENDLGR" => context = "global".to_string(),
                "LGR" => {
                    let lgr = file.get_at::<String>(*n)?;
                    context = lgr[0].clone();
                    lgr_names.push(lgr[0].clone());
                }
                "NNCHEAD" => {
                    let nnchead = file.get_at::<i32>(*n)?;
                    let grid_no = *nnchead.get(1).ok_or_else(|| {
                        Error::BadGrid("NNCHEAD array is too short".to_string())
                    })?;

                    context = if grid_no == 0 {
                        "global".to_string()
                    } else {
                        lgr_names
                            .get(grid_no as usize - 1)
                            .cloned()
                            .ok_or(Error::UnknownLgr(grid_no))?
                    };
                }
                "MAPUNITS" => {
                    let units = file.get_at::<String>(*n)?;
                    length_factor = match units[0].as_str() {
                        "METRES" => 1.0,
                        "FEET" => 0.3048,
                        "CM" => 0.01,
                        other => return Err(Error::UnsupportedMapUnits(other.to_string())),
                    };
                    map_units = Some(units[0].clone());
                }
                "MAPAXES" => {
                    let values = file.get_at::<f32>(*n)?;
                    if values.len() < 6 {
                        return Err(Error::BadGrid("MAPAXES array is too short".to_string()));
                    }
                    let mut scaled = [0f64; 6];
                    for (slot, value) in scaled.iter_mut().zip(values) {
                        *slot = *value as f64 * length_factor;
                    }
                    mapaxes = Some(MapAxes::from_record(&scaled));
                }
                _ => {}
            }

            if context == grid_name {
                match name.as_str() {
                    "GRIDHEAD" => {
                        let gridhead = file.get_at::<i32>(*n)?;
                        if gridhead.len() < 4 {
                            return Err(Error::BadGrid(
                                "GRIDHEAD array is too short".to_string(),
                            ));
                        }
                        nijk = [
                            gridhead[1] as usize,
                            gridhead[2] as usize,
                            gridhead[3] as usize,
                        ];
                        numres = if gridhead.len() > 24 {
                            gridhead[24].max(1) as usize
                        } else {
                            1
                        };
                        radial = gridhead.len() > 26 && gridhead[26] > 0;
                    }
                    "COORD" => coord_index = Some(*n),
                    "COORDSYS" => coordsys_index = Some(*n),
                    "ZCORN" => zcorn_index = Some(*n),
                    "ACTNUM" => actnum_index = Some(*n),
                    "NNC1" => nnc1_index = Some(*n),
                    "NNC2" => nnc2_index = Some(*n),
                    "HOSTNUM" => hostnum_index = Some(*n),
                    _ => {}
                }
            }

            if context == "global" && name == "GRIDHEAD" {
                let gridhead = file.get_at::<i32>(*n)?;
                host_nijk = [
                    gridhead[1] as usize,
                    gridhead[2] as usize,
                    gridhead[3] as usize,
                ];
            }
        }

        if nijk.contains(&0) {
            return Err(Error::BadGrid(format!(
                "no GRIDHEAD found for grid \"{grid_name}\""
            )));
        }

        // reservoir index per layer, everything in reservoir 0 without COORDSYS
        let mut res = vec![0usize; nijk[2]];
        if let Some(index) = coordsys_index {
            let coordsys = file.get_at::<i32>(index)?;
            if coordsys.len() < numres * 6 {
                return Err(Error::BadGrid("COORDSYS array is too short".to_string()));
            }
            for r in 0..numres {
                let l1 = coordsys[r * 6] as usize;
                let l2 = (coordsys[r * 6 + 1] as usize).min(nijk[2]);
                for layer in l1.saturating_sub(1)..l2 {
                    res[layer] = r;
                }
            }
        }

        let (act_index, glob_index) = if let Some(index) = actnum_index {
            let actnum = file.get_at::<i32>(index)?;
            let mut act = Vec::with_capacity(actnum.len());
            let mut glob = Vec::new();
            for (cell, flag) in actnum.iter().enumerate() {
                if *flag > 0 {
                    act.push(glob.len() as i32);
                    glob.push(cell);
                } else {
                    act.push(-1);
                }
            }
            (act, glob)
        } else {
            let cells = nijk[0] * nijk[1] * nijk[2];
            ((0..cells as i32).collect(), (0..cells).collect())
        };

        let host_cells: Vec<usize> = match hostnum_index {
            Some(index) => file
                .get_at::<i32>(index)?
                .iter()
                .map(|cell| cell.saturating_sub(1) as usize)
                .collect(),
            None => Vec::new(),
        };

        debug!(
            "grid {}x{}x{}, {} active cells",
            nijk[0],
            nijk[1],
            nijk[2],
            glob_index.len()
        );

        Ok(Self {
            file,
            init_path,
            grid_name: grid_name.to_string(),
            nijk,
            host_nijk,
            numres,
            radial,
            map_units,
            mapaxes,
            res,
            act_index,
            glob_index,
            lgr_names,
            host_cells,
            coord_index,
            zcorn_index,
            nnc1_index,
            nnc2_index,
            coord: Vec::new(),
            zcorn: Vec::new(),
            nncs: None,
        })
    }

    /// Grid dimensions (nx, ny, nz)
    pub fn dimensions(&self) -> [usize; 3] {
        self.nijk
    }

    /// Dimensions of the host (global) grid
    pub fn host_dimensions(&self) -> [usize; 3] {
        self.host_nijk
    }

    /// Number of reservoir regions
    pub fn reservoirs(&self) -> usize {
        self.numres
    }

    /// Whether the grid uses radial (r, theta) pillar coordinates
    pub fn is_radial(&self) -> bool {
        self.radial
    }

    /// Number of active cells
    pub fn active_cells(&self) -> usize {
        self.glob_index.len()
    }

    /// Total number of cells, active or not
    pub fn total_cells(&self) -> usize {
        self.nijk[0] * self.nijk[1] * self.nijk[2]
    }

    /// Names of local grid refinements present in the file
    pub fn lgr_names(&self) -> &[String] {
        &self.lgr_names
    }

    /// The MAPUNITS string when present
    pub fn map_units(&self) -> Option<&str> {
        self.map_units.as_deref()
    }

    /// The map-projection transform when MAPAXES is present
    pub fn mapaxes(&self) -> Option<&MapAxes> {
        self.mapaxes.as_ref()
    }

    /// Global to active index map, -1 marking inactive cells
    pub fn act_index(&self) -> &[i32] {
        &self.act_index
    }

    /// Active to global index map
    pub fn glob_index(&self) -> &[usize] {
        &self.glob_index
    }

    /// Global cell index of (i, j, k)
    pub fn global_index(&self, i: usize, j: usize, k: usize) -> Result<usize> {
        if i >= self.nijk[0] || j >= self.nijk[1] || k >= self.nijk[2] {
            return Err(Error::IjkOutOfRange);
        }

        Ok(i + j * self.nijk[0] + k * self.nijk[0] * self.nijk[1])
    }

    /// Active cell index of (i, j, k), `None` for inactive cells
    pub fn active_index(&self, i: usize, j: usize, k: usize) -> Result<Option<usize>> {
        let global = self.global_index(i, j, k)?;

        Ok(match self.act_index[global] {
            -1 => None,
            active => Some(active as usize),
        })
    }

    /// (i, j, k) of a global cell index
    pub fn ijk_from_global_index(&self, global: usize) -> Result<[usize; 3]> {
        if global >= self.total_cells() {
            return Err(Error::GlobalIndexOutOfRange);
        }

        let plane = self.nijk[0] * self.nijk[1];
        let rest = global % plane;

        Ok([rest % self.nijk[0], rest / self.nijk[0], global / plane])
    }

    /// (i, j, k) of an active cell index
    pub fn ijk_from_active_index(&self, active: usize) -> Result<[usize; 3]> {
        let global = *self
            .glob_index
            .get(active)
            .ok_or(Error::ActiveIndexOutOfRange)?;

        self.ijk_from_global_index(global)
    }

    /// Host-grid (i, j, k) of each LGR cell, from the HOSTNUM record
    pub fn host_cells_ijk(&self) -> Vec<[usize; 3]> {
        let plane = self.host_nijk[0] * self.host_nijk[1];

        self.host_cells
            .iter()
            .map(|cell| {
                let rest = cell % plane;
                [
                    rest % self.host_nijk[0],
                    rest / self.host_nijk[0],
                    cell / plane,
                ]
            })
            .collect()
    }

    /// Apply the MAPAXES transform, identity when the record is absent
    pub fn mapaxes_transform(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.mapaxes {
            Some(axes) => axes.transform(x, y),
            None => (x, y),
        }
    }

    fn load_coord(&mut self) -> Result<()> {
        if self.coord.is_empty() {
            let index = self.coord_index.ok_or(Error::MissingRecord("COORD"))?;
            let coord = self.file.get_at::<f32>(index)?;

            let expected = (self.nijk[0] + 1) * (self.nijk[1] + 1) * 6 * self.numres;
            if coord.len() < expected {
                return Err(Error::BadGrid(format!(
                    "COORD holds {} values, expected {expected}",
                    coord.len()
                )));
            }

            self.coord = coord.to_vec();
        }
        Ok(())
    }

    fn load_grid_data(&mut self) -> Result<()> {
        self.load_coord()?;
        if self.zcorn.is_empty() {
            let index = self.zcorn_index.ok_or(Error::MissingRecord("ZCORN"))?;
            let zcorn = self.file.get_at::<f32>(index)?;

            let expected = 8 * self.nijk[0] * self.nijk[1] * self.nijk[2];
            if zcorn.len() != expected {
                return Err(Error::BadGrid(format!(
                    "ZCORN holds {} values, expected {expected}",
                    zcorn.len()
                )));
            }

            self.zcorn = zcorn.to_vec();
        }
        Ok(())
    }

    /// COORD offsets of the four pillars framing column (i, j)
    fn pillar_indices(&self, i: usize, j: usize, res_shift: usize) -> [usize; 4] {
        let pillar_row = (self.nijk[0] + 1) * 6;
        let first = res_shift + j * pillar_row + i * 6;

        [first, first + 6, first + pillar_row, first + pillar_row + 6]
    }

    /// ZCORN offsets of the four top-face corners of cell (i, j, k)
    fn zcorn_indices(&self, i: usize, j: usize, k: usize) -> [usize; 4] {
        let nx = self.nijk[0];
        let first = k * nx * self.nijk[1] * 8 + j * nx * 4 + i * 2;

        [first, first + 1, first + nx * 2, first + nx * 2 + 1]
    }

    /// Pillar endpoints in xyz, converting radial (r, theta) samples
    fn pillar_endpoints(&self, pillar: usize) -> (f64, f64, f64, f64, f64, f64) {
        let coord = &self.coord;
        let zt = coord[pillar + 2] as f64;
        let zb = coord[pillar + 5] as f64;

        if self.radial {
            let theta_t = (coord[pillar + 1] as f64).to_radians();
            let theta_b = (coord[pillar + 4] as f64).to_radians();
            let rt = coord[pillar] as f64;
            let rb = coord[pillar + 3] as f64;

            (
                rt * theta_t.cos(),
                rt * theta_t.sin(),
                zt,
                rb * theta_b.cos(),
                rb * theta_b.sin(),
                zb,
            )
        } else {
            (
                coord[pillar] as f64,
                coord[pillar + 1] as f64,
                zt,
                coord[pillar + 3] as f64,
                coord[pillar + 4] as f64,
                zb,
            )
        }
    }

    /// Reconstruct the eight corners of cell (i, j, k)
    ///
    /// Depths come straight from ZCORN; xy positions are interpolated along
    /// the four cell pillars at each corner depth. Coordinates are
    /// grid-local; apply [`mapaxes_transform`](EGrid::mapaxes_transform) for
    /// world coordinates.
    pub fn cell_corners(&mut self, i: usize, j: usize, k: usize) -> Result<CellCorners> {
        self.global_index(i, j, k)?;
        self.load_grid_data()?;

        let res_shift = self.res[k] * (self.nijk[0] + 1) * (self.nijk[1] + 1) * 6;
        let pillars = self.pillar_indices(i, j, res_shift);
        let top = self.zcorn_indices(i, j, k);
        let surface = self.nijk[0] * self.nijk[1] * 4;

        let mut corners = CellCorners::default();

        for n in 0..4 {
            corners.z[n] = self.zcorn[top[n]] as f64;
            corners.z[n + 4] = self.zcorn[top[n] + surface] as f64;
        }

        for n in 0..4 {
            let (xt, yt, zt, xb, yb, zb) = self.pillar_endpoints(pillars[n]);

            let (x, y) = interpolate_pillar(xt, yt, zt, xb, yb, zb, corners.z[n]);
            corners.x[n] = x;
            corners.y[n] = y;

            let (x, y) = interpolate_pillar(xt, yt, zt, xb, yb, zb, corners.z[n + 4]);
            corners.x[n + 4] = x;
            corners.y[n + 4] = y;
        }

        Ok(corners)
    }

    /// Reconstruct cell corners addressed by global index
    pub fn cell_corners_global(&mut self, global: usize) -> Result<CellCorners> {
        let [i, j, k] = self.ijk_from_global_index(global)?;
        self.cell_corners(i, j, k)
    }

    /// Corner coordinates of one horizontal surface of a layer
    ///
    /// Returns the four top (or bottom) corners of every cell in the layer,
    /// cells in row-major (i fastest) order. Reads the single ZCORN surface
    /// straight from disk when the full array has not been cached yet.
    pub fn xyz_layer(&mut self, layer: usize, bottom: bool) -> Result<Vec<[f32; 3]>> {
        let ibox = [0, self.nijk[0] - 1, 0, self.nijk[1] - 1];
        self.xyz_layer_box(layer, ibox, bottom)
    }

    /// Same as [`xyz_layer`](EGrid::xyz_layer) restricted to an (i1, i2, j1, j2) box
    pub fn xyz_layer_box(
        &mut self,
        layer: usize,
        ibox: [usize; 4],
        bottom: bool,
    ) -> Result<Vec<[f32; 3]>> {
        if layer >= self.nijk[2] {
            return Err(Error::InvalidLayer {
                layer,
                max: self.nijk[2] - 1,
            });
        }

        let [i1, i2, j1, j2] = ibox;
        if i2 >= self.nijk[0] || j2 >= self.nijk[1] || i1 > i2 || j1 > j2 {
            return Err(Error::InvalidBox);
        }

        let nodes_per_surface = self.nijk[0] * self.nijk[1] * 4;
        let mut zcorn_offset = nodes_per_surface * layer * 2;
        if bottom {
            zcorn_offset += nodes_per_surface;
        }

        self.load_coord()?;

        let surface: Vec<f32> = if !self.zcorn.is_empty() {
            self.zcorn[zcorn_offset..zcorn_offset + nodes_per_surface].to_vec()
        } else {
            self.zcorn_surface_from_disk(zcorn_offset, nodes_per_surface)?
        };

        let res_shift = self.res[layer] * (self.nijk[0] + 1) * (self.nijk[1] + 1) * 6;
        let mut xyz = Vec::with_capacity((i2 - i1 + 1) * (j2 - j1 + 1) * 4);

        for (j, i) in iproduct!(j1..=j2, i1..=i2) {
            let pillars = self.pillar_indices(i, j, res_shift);
            let depths = self.zcorn_indices(i, j, 0);

            for n in 0..4 {
                let z = surface[depths[n]] as f64;
                let (xt, yt, zt, xb, yb, zb) = self.pillar_endpoints(pillars[n]);
                let (x, y) = interpolate_pillar(xt, yt, zt, xb, yb, zb, z);

                xyz.push([x as f32, y as f32, z as f32]);
            }
        }

        Ok(xyz)
    }

    /// Read one ZCORN surface without materialising the whole array
    ///
    /// Seeks into the middle of the record and re-synchronises on the block
    /// framing integers at every 1000-element boundary.
    fn zcorn_surface_from_disk(&self, skip: usize, count: usize) -> Result<Vec<f32>> {
        if self.file.formatted() {
            return Err(Error::FormattedPartialRead);
        }

        let index = self.zcorn_index.ok_or(Error::MissingRecord("ZCORN"))?;
        let record = &self.file.list()[index];

        let blocks_before = skip / MAX_BLOCK_REAL;
        let start = record.offset
            + (skip * SIZE_OF_REAL) as u64
            + ((1 + 2 * blocks_before) * SIZE_OF_INTE) as u64;

        let mut reader = BufReader::new(File::open(self.file.path())?);
        reader.seek(SeekFrom::Start(start))?;

        let end = skip + count;
        let mut next = ((blocks_before + 1) * MAX_BLOCK_REAL - skip).min(count);
        let mut position = skip;
        let mut surface = Vec::with_capacity(count);

        loop {
            let mut chunk = vec![0f32; next];
            reader.read_f32_into::<BigEndian>(&mut chunk)?;
            surface.extend_from_slice(&chunk);
            position += next;

            if position >= end {
                break;
            }

            // tail of the finished block, then the next block's header
            let _tail = reader.read_i32::<BigEndian>()?;
            let head = reader.read_i32::<BigEndian>()?;

            if head <= 0 || head as usize / SIZE_OF_REAL > MAX_BLOCK_REAL {
                return Err(Error::ZcornFraming {
                    offset: reader.stream_position()?,
                });
            }

            next = (head as usize / SIZE_OF_REAL).min(end - position);
        }

        Ok(surface)
    }

    /// Non-neighbor connections, loaded (and cross-checked against the
    /// companion INIT file) on first request
    ///
    /// When the INIT file exists its grid dimensions and active cell count
    /// must agree with this grid, and its `TRANNNC` array supplies the
    /// transmissibilities. Without an INIT file the transmissibility slot
    /// holds -1.0.
    pub fn nnc_connections(&mut self) -> Result<&[Nnc]> {
        if self.nncs.is_none() {
            self.load_nnc_data()?;
        }

        match &self.nncs {
            Some(list) => Ok(list),
            None => Ok(&[]),
        }
    }

    fn load_nnc_data(&mut self) -> Result<()> {
        let (Some(index1), Some(index2)) = (self.nnc1_index, self.nnc2_index) else {
            self.nncs = Some(Vec::new());
            return Ok(());
        };

        let nnc1 = self.file.get_at::<i32>(index1)?.to_vec();
        let nnc2 = self.file.get_at::<i32>(index2)?.to_vec();

        if nnc1.len() != nnc2.len() {
            return Err(Error::NncLengths {
                nnc1: nnc1.len(),
                nnc2: nnc2.len(),
            });
        }

        let mut trans: Vec<f32> = Vec::new();

        if self.init_path.exists() && !nnc1.is_empty() && self.grid_name == "global" {
            let mut init = EclFile::open(&self.init_path)?;
            let intehead = init.get::<i32>("INTEHEAD")?;

            if intehead.len() < 12 {
                return Err(Error::BadInit("INTEHEAD array is too short"));
            }

            let dims = [
                intehead[8] as usize,
                intehead[9] as usize,
                intehead[10] as usize,
            ];
            let active = intehead[11] as usize;

            if dims != self.nijk {
                return Err(Error::GridDimensionsMismatch {
                    egrid: self.nijk,
                    init: dims,
                });
            }

            if active != self.active_cells() {
                return Err(Error::ActiveCellsMismatch {
                    egrid: self.active_cells(),
                    init: active,
                });
            }

            let trannnc = init.get::<f32>("TRANNNC")?;

            if trannnc.len() != nnc1.len() {
                return Err(Error::TranNncLength {
                    nnc: nnc1.len(),
                    trannnc: trannnc.len(),
                });
            }

            trans = trannnc.to_vec();
        }

        let mut list = Vec::with_capacity(nnc1.len());

        for (n, (cell1, cell2)) in nnc1.iter().zip(nnc2.iter()).enumerate() {
            if *cell1 <= 0 || *cell2 <= 0 {
                return Err(Error::GlobalIndexOutOfRange);
            }

            list.push(Nnc {
                ijk1: self.ijk_from_global_index(*cell1 as usize - 1)?,
                ijk2: self.ijk_from_global_index(*cell2 as usize - 1)?,
                trans: trans.get(n).copied().unwrap_or(-1.0),
            });
        }

        self.nncs = Some(list);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_interpolation() {
        // leaning pillar from (0,0,0) to (10,0,100); depth 50 sits halfway
        let (x, y) = interpolate_pillar(0.0, 0.0, 0.0, 10.0, 0.0, 100.0, 50.0);
        assert_eq!((x, y), (5.0, 0.0));
    }

    #[test]
    fn degenerate_pillar_keeps_top_xy() {
        let (x, y) = interpolate_pillar(0.0, 2.0, 0.0, 10.0, 7.0, 0.0, 50.0);
        assert_eq!((x, y), (0.0, 2.0));
    }

    #[test]
    fn mapaxes_identity() {
        let axes = MapAxes::from_record(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(axes.transform(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn mapaxes_translation_and_flip() {
        // origin at (100, 200), y axis pointing in negative world y
        let axes = MapAxes::from_record(&[100.0, 190.0, 100.0, 200.0, 110.0, 200.0]);
        let (x, y) = axes.transform(3.0, 4.0);
        assert_eq!((x, y), (103.0, 196.0));
    }
}
