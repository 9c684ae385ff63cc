//! Box layout of a single level from its `Cell_H` index file

// crate modules
use crate::error::{Error, InconsistentLayout, Result};
use crate::parsers::{self, Corners};

// pltools modules
use pltools_utils::{f, ShapeExt};

// standard library
use std::path::Path;

// external crates
use log::{debug, warn};
use serde::Serialize;

/// Lines before the box list that must exist (version, how, ncomp, ngrow)
const MIN_CELL_H_LINES: usize = 4;

/// Zero-based line of the `Cell_H` holding the component count
const COMPONENT_LINE: usize = 2;

/// An axis-aligned region of index space
///
/// Corners are inclusive and in natural (X, Y, Z) axis order, so a box from
/// `(0,0,0)` to `(3,1,0)` covers 4x2x1 cells.
///
/// Boxes are trusted as written. Overlap and coverage of the domain are never
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridBox {
    /// Inclusive low corner
    pub low: Vec<i64>,
    /// Inclusive high corner
    pub high: Vec<i64>,
}

impl GridBox {
    /// Create a box from its inclusive corners
    pub fn new(low: Vec<i64>, high: Vec<i64>) -> Self {
        Self { low, high }
    }

    /// Number of cells along each axis, natural order
    ///
    /// ```rust
    /// # use pltools_plotfile::GridBox;
    /// let grid_box = GridBox::new(vec![2, 0, 0], vec![3, 3, 0]);
    /// assert_eq!(grid_box.shape(), vec![2, 4, 1]);
    /// ```
    pub fn shape(&self) -> Vec<usize> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(lo, hi)| {
                let n = i128::from(*hi) - i128::from(*lo) + 1;
                usize::try_from(n.max(0)).unwrap_or(usize::MAX)
            })
            .collect()
    }

    /// Number of cells along each axis, if the box can be held in memory
    ///
    /// `None` when an extent or the total cell count can not be represented,
    /// as for corners near the limits of `i64`.
    ///
    /// ```rust
    /// # use pltools_plotfile::GridBox;
    /// let grid_box = GridBox::new(vec![0, 0], vec![7, 3]);
    /// assert_eq!(grid_box.checked_shape(), Some(vec![8, 4]));
    ///
    /// let grid_box = GridBox::new(vec![i64::MIN, 0], vec![i64::MAX, 3]);
    /// assert_eq!(grid_box.checked_shape(), None);
    /// ```
    pub fn checked_shape(&self) -> Option<Vec<usize>> {
        let shape = self
            .low
            .iter()
            .zip(&self.high)
            .map(|(lo, hi)| {
                let n = hi.checked_sub(*lo)?.checked_add(1)?;
                usize::try_from(n.max(0)).ok()
            })
            .collect::<Option<Vec<usize>>>()?;

        // dense arrays are limited to isize::MAX elements
        shape
            .iter()
            .try_fold(1_usize, |acc, &n| acc.checked_mul(n))
            .filter(|&total| total <= isize::MAX as usize)?;

        Some(shape)
    }

    /// Total number of cells in the box
    pub fn number_of_cells(&self) -> usize {
        self.shape().element_count()
    }

    /// Smallest box containing every box in the list
    pub fn hull(boxes: &[GridBox]) -> Option<GridBox> {
        let (first, rest) = boxes.split_first()?;
        let mut hull = first.clone();
        for b in rest {
            for (axis, (lo, hi)) in b.low.iter().zip(&b.high).enumerate() {
                hull.low[axis] = hull.low[axis].min(*lo);
                hull.high[axis] = hull.high[axis].max(*hi);
            }
        }
        Some(hull)
    }

    /// Check the box lies entirely within `domain`
    pub fn is_within(&self, domain: &GridBox) -> bool {
        self.low.len() == domain.low.len()
            && self.low.iter().zip(&domain.low).all(|(a, b)| a >= b)
            && self.high.iter().zip(&domain.high).all(|(a, b)| a <= b)
    }
}

impl From<Corners> for GridBox {
    fn from(corners: Corners) -> Self {
        Self::new(corners.0, corners.1)
    }
}

impl std::fmt::Display for GridBox {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.low, self.high)
    }
}

/// Partition of a level into boxes, and the blob holding each box
///
/// The `Cell_H` index file is laid out as:
///
/// ```text
/// 1                               <- version
/// 0                               <- how
/// 2                               <- number of components
/// 0                               <- number of ghost cells
/// (2 0                            <- opens the box list
/// ((0,0,0) (1,3,0) (0,0,0))       <- one box record per line
/// ((2,0,0) (3,3,0) (0,0,0))
/// )
/// 2
/// FabOnDisk: Cell_D_00000 0       <- one blob mapping per box
/// FabOnDisk: Cell_D_00001 0
/// ```
///
/// Min/max tables may follow, and are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    /// Component count declared by the layout
    pub components: usize,
    /// Boxes in declaration order
    pub boxes: Vec<GridBox>,
    /// Blob filename for each box, same order as `boxes`
    pub fab_files: Vec<String>,
    /// Recoverable problems found while reading the layout
    pub diagnostics: Vec<InconsistentLayout>,
}

/// Synthetic blob name used when `FabOnDisk` mappings can not be trusted
pub fn synthetic_fab_name(box_index: usize) -> String {
    f!("Cell_D_{box_index:05}")
}

/// Read and parse the `Cell_H` of a level directory
pub(crate) fn read_box_layout(level_dir: &Path, dim: usize) -> Result<BoxLayout> {
    if !level_dir.is_dir() {
        return Err(Error::NotFound(level_dir.to_path_buf()));
    }

    let path = level_dir.join("Cell_H");
    let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            Error::MalformedBoxLayout(f!("{} is not valid UTF-8 text", path.display()))
        }
        _ => Error::from_io(e, &path),
    })?;
    let layout = parse_box_layout(&text, dim)?;

    debug!(
        "{}: {} boxes, {} components",
        path.display(),
        layout.boxes.len(),
        layout.components
    );
    Ok(layout)
}

/// Parse the text content of a `Cell_H` box layout
///
/// The box list starts at the first line beginning with `(`, and runs for as
/// long as lines begin with `((`. Every later `FabOnDisk:` line maps the next
/// box to its blob file.
///
/// A mapping count that does not match the box count is recoverable. All
/// boxes then fall back to [synthetic_fab_name] and the mismatch is recorded
/// in `diagnostics`.
pub fn parse_box_layout(text: &str, dim: usize) -> Result<BoxLayout> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    if lines.len() < MIN_CELL_H_LINES {
        return Err(Error::MalformedBoxLayout(f!(
            "expected at least {MIN_CELL_H_LINES} header lines, found {}",
            lines.len()
        )));
    }

    let components = parsers::whole_integer(lines[COMPONENT_LINE])
        .ok()
        .and_then(|(_, n)| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::MalformedBoxLayout(f!(
                "expected component count on line {COMPONENT_LINE}, found \"{}\"",
                lines[COMPONENT_LINE]
            ))
        })?;

    let section = lines
        .iter()
        .position(|l| parsers::is_box_section(l))
        .ok_or_else(|| Error::MalformedBoxLayout("no box list found".to_string()))?;

    // the opening line is usually `(<count> 0`, but skip it only if it is not
    // itself a box
    let first = match parsers::is_box_record(lines[section]) {
        true => section,
        false => section + 1,
    };

    let mut boxes = Vec::new();
    for line in lines[first..]
        .iter()
        .take_while(|l| parsers::is_box_record(l))
    {
        let corners = parsers::parse_int_tuple_list(line, dim)
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| Error::MalformedBoxLayout(f!("unable to read box from \"{line}\"")))?;

        let grid_box = GridBox::from(corners);
        if grid_box.checked_shape().is_none() {
            return Err(Error::MalformedBoxLayout(f!("box too large in \"{line}\"")));
        }
        boxes.push(grid_box);
    }

    let mut fab_files = Vec::with_capacity(boxes.len());
    for line in lines[(first + boxes.len()).min(lines.len())..]
        .iter()
        .filter(|l| parsers::is_fab_on_disk(l))
    {
        let (_, name) = parsers::fab_on_disk(line).map_err(|_| {
            Error::MalformedBoxLayout(f!("unable to read blob filename from \"{line}\""))
        })?;
        fab_files.push(name.to_string());
    }

    let mut diagnostics = Vec::new();
    if fab_files.len() != boxes.len() {
        let problem = InconsistentLayout::FabCountMismatch {
            boxes: boxes.len(),
            mappings: fab_files.len(),
        };
        warn!("{problem}");
        diagnostics.push(problem);
        fab_files = (0..boxes.len()).map(synthetic_fab_name).collect();
    }

    Ok(BoxLayout {
        components,
        boxes,
        fab_files,
        diagnostics,
    })
}
