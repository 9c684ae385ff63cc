//! Parsing of the top level plotfile `Header`

// crate modules
use crate::error::{Error, Result};
use crate::layout::GridBox;
use crate::parsers;

// pltools modules
use pltools_utils::{f, ValueExt};

// standard library
use std::collections::HashSet;
use std::path::Path;

// external crates
use log::{debug, info};
use serde::Serialize;

/// Metadata from the top level `Header` of a plotfile
///
/// The header is a strictly positional text file:
///
/// ```text
/// HyperCLaw-V1.1                  <- version marker
/// 2                               <- number of variables
/// density                         <- one name per line
/// pressure
/// 3                               <- dimensionality
/// 0.125                           <- simulation time
/// 0                               <- finest level (level count - 1)
/// 0 0 0                           <- physical low corner (skipped)
/// 1 1 1                           <- physical high corner (skipped)
///                                 <- refinement ratios (skipped)
/// ((0,0,0) (63,31,15) (0,0,0))    <- domain box of every level
/// 120                             <- timestep index
/// ```
///
/// Anything after the timestep line is not needed and never read.
///
/// Note that `grid_extent` is in the natural (X, Y, Z) axis order. Decoded
/// fields are stored with the axes reversed, see
/// [DecodedField](crate::DecodedField).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotfileMetadata {
    /// Opaque version marker from the first line
    pub version: String,
    /// Variable names in declaration order, which is also the on-disk order
    pub variable_names: Vec<String>,
    /// Number of spatial dimensions, 2 or 3
    pub dimensionality: usize,
    /// Simulation time of the snapshot
    pub simulation_time: f64,
    /// Number of refinement levels
    pub level_count: usize,
    /// Cells along each axis of the level 0 domain, natural axis order
    pub grid_extent: Vec<usize>,
    /// Index space domain of each level listed on the domain line
    pub level_domains: Vec<GridBox>,
    /// Timestep index of the snapshot
    pub timestep_index: i64,
}

impl PlotfileMetadata {
    /// Position of a variable in the declaration order
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variable_names.iter().position(|v| v == name)
    }

    /// Total number of cells in the level 0 domain
    pub fn number_of_cells(&self) -> usize {
        self.grid_extent.iter().product()
    }
}

impl std::fmt::Display for PlotfileMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let extent = self
            .grid_extent
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<String>>()
            .join(" x ");

        let mut s = "PlotfileMetadata {\n".to_string();
        s += &f!("    version: {}\n", self.version);
        s += &f!(
            "    variables: {} ({})\n",
            self.variable_names.len(),
            self.variable_names.join(", ")
        );
        s += &f!("    grid: {extent} ({}D)\n", self.dimensionality);
        s += &f!("    time: {}\n", self.simulation_time.sci(5, 2));
        s += &f!("    timestep: {}\n", self.timestep_index);
        s += &f!("    levels: {}\n}}", self.level_count);

        write!(f, "{}", s)
    }
}

/// Read and parse the `Header` file in a plotfile directory
pub(crate) fn read_header(root: &Path) -> Result<PlotfileMetadata> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let path = root.join("Header");
    let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            Error::MalformedHeader(f!("{} is not valid UTF-8 text", path.display()))
        }
        _ => Error::from_io(e, &path),
    })?;
    let metadata = parse_header(&text)?;

    info!("Loaded plotfile: {}", root.display());
    debug!("Variables   = {:?}", metadata.variable_names);
    debug!("Grid extent = {:?}", metadata.grid_extent);
    debug!("Time        = {}", metadata.simulation_time);
    debug!("Levels      = {}", metadata.level_count);
    Ok(metadata)
}

/// Parse the text content of a plotfile `Header`
///
/// Nothing is returned unless every positional line parses.
///
/// ```rust
/// # use pltools_plotfile::parse_header;
/// let text = "HyperCLaw-V1.1\n1\nphi\n2\n0.5\n0\n0 0\n1 1\n\n((0,0) (7,3) (0,0))\n10\n";
/// let metadata = parse_header(text).unwrap();
/// assert_eq!(metadata.variable_names, vec!["phi"]);
/// assert_eq!(metadata.grid_extent, vec![8, 4]);
/// ```
pub fn parse_header(text: &str) -> Result<PlotfileMetadata> {
    let mut lines = HeaderLines::new(text);

    let version = lines.next("version marker")?.trim().to_string();

    let n_vars = lines.integer("number of variables")?;
    if n_vars < 1 {
        return Err(lines.malformed(f!("expected at least one variable, found {n_vars}")));
    }

    // the count is untrusted, names are only collected as lines are found
    let mut variable_names = Vec::new();
    let mut seen = HashSet::new();
    for _ in 0..n_vars {
        let name = lines.next("variable name")?.trim().to_string();
        if name.is_empty() {
            return Err(lines.malformed("empty variable name".to_string()));
        }
        if !seen.insert(name.clone()) {
            return Err(lines.malformed(f!("duplicate variable name \"{name}\"")));
        }
        variable_names.push(name);
    }

    let dimensionality = match lines.integer("dimensionality")? {
        d @ (2 | 3) => d as usize,
        d => return Err(lines.malformed(f!("unsupported dimensionality {d}"))),
    };

    let simulation_time = lines.double("simulation time")?;

    // the header stores the finest level index rather than the count
    let finest_level = lines.integer("finest level")?;
    if finest_level < 0 {
        return Err(lines.malformed(f!("negative finest level {finest_level}")));
    }
    let level_count = finest_level as usize + 1;

    lines.next("physical low corner")?;
    lines.next("physical high corner")?;
    lines.next("refinement ratios")?;

    let domain_line = lines.next("domain box")?;
    let level_domains: Vec<GridBox> = parsers::parse_int_tuple_list(domain_line, dimensionality)
        .ok_or_else(|| lines.malformed(f!("unable to read domain box from \"{domain_line}\"")))?
        .into_iter()
        .map(GridBox::from)
        .collect();

    for (level, domain) in level_domains.iter().enumerate() {
        if domain.checked_shape().is_none() {
            return Err(lines.malformed(f!("level {level} domain box {domain} is too large")));
        }
    }

    let grid_extent = level_domains[0].shape();
    if grid_extent.iter().any(|&n| n == 0) {
        return Err(lines.malformed(f!("empty domain box \"{}\"", domain_line.trim())));
    }

    let timestep_index = lines.leading_integer("timestep index")?;

    Ok(PlotfileMetadata {
        version,
        variable_names,
        dimensionality,
        simulation_time,
        level_count,
        grid_extent,
        level_domains,
        timestep_index,
    })
}

/// Positional line cursor that turns anything unexpected into an error
struct HeaderLines<'a> {
    lines: std::str::Lines<'a>,
    index: usize,
}

impl<'a> HeaderLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            index: 0,
        }
    }

    fn malformed(&self, message: String) -> Error {
        Error::MalformedHeader(f!("line {}: {message}", self.index))
    }

    fn next(&mut self, expected: &str) -> Result<&'a str> {
        self.index += 1;
        self.lines
            .next()
            .ok_or_else(|| self.malformed(f!("missing {expected}")))
    }

    fn integer(&mut self, expected: &str) -> Result<i64> {
        let line = self.next(expected)?;
        parsers::whole_integer(line)
            .map(|(_, v)| v)
            .map_err(|_| self.malformed(f!("expected {expected}, found \"{}\"", line.trim())))
    }

    fn leading_integer(&mut self, expected: &str) -> Result<i64> {
        let line = self.next(expected)?;
        parsers::leading_integer(line)
            .map(|(_, v)| v)
            .map_err(|_| self.malformed(f!("expected {expected}, found \"{}\"", line.trim())))
    }

    fn double(&mut self, expected: &str) -> Result<f64> {
        let line = self.next(expected)?;
        parsers::whole_double(line)
            .map(|(_, v)| v)
            .map_err(|_| self.malformed(f!("expected {expected}, found \"{}\"", line.trim())))
    }
}
