//! Dense decoded fields and the placement of box samples within them

// crate modules
use crate::error::{Error, InconsistentLayout, Result};
use crate::layout::GridBox;

// pltools modules
use pltools_utils::{f, RangeExt, ShapeExt};

// external crates
use ndarray::{ArrayD, ArrayViewD, IxDyn, ShapeBuilder, Slice};

/// Storage axis order of a 2D field: natural (X, Y) is stored as (Y, X)
pub const STORAGE_AXES_2D: [usize; 2] = [1, 0];

/// Storage axis order of a 3D field: natural (X, Y, Z) is stored as (Z, Y, X)
pub const STORAGE_AXES_3D: [usize; 3] = [2, 1, 0];

/// Permutation from natural axis order to storage axis order
///
/// Entry `i` is the natural axis stored as axis `i`.
pub fn storage_axes(dim: usize) -> Vec<usize> {
    match dim {
        2 => STORAGE_AXES_2D.to_vec(),
        3 => STORAGE_AXES_3D.to_vec(),
        _ => (0..dim).rev().collect(),
    }
}

/// One variable of one level, assembled into a single dense array
///
/// The array covers the whole level domain with its axes **reversed** relative
/// to the natural order of [PlotfileMetadata::grid_extent](crate::PlotfileMetadata).
/// A 3D field is indexed `[z][y][x]` and a 2D field `[y][x]`.
///
/// Cells not covered by any box are zero.
///
/// ```rust, no_run
/// # use pltools_plotfile::Plotfile;
/// let mut plotfile = Plotfile::open("/path/to/plt00120").unwrap();
/// let field = plotfile.decode("density").unwrap();
///
/// // grid_extent is (nx, ny, nz), the field is (nz, ny, nx)
/// println!("{:?}", field.shape());
/// let value = field.get(&[0, 1, 2]); // z=0, y=1, x=2
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    name: String,
    level: usize,
    values: ArrayD<f64>,
    diagnostics: Vec<InconsistentLayout>,
}

impl DecodedField {
    /// Zero-filled field covering `domain`, in storage axis order
    pub(crate) fn zeros(name: &str, level: usize, domain: &GridBox) -> Self {
        Self {
            name: name.to_string(),
            level,
            values: ArrayD::zeros(IxDyn(&domain.shape().reversed())),
            diagnostics: Vec::new(),
        }
    }

    /// Variable name the field was decoded for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Refinement level the field was decoded from
    pub fn level(&self) -> usize {
        self.level
    }

    /// Dense values in storage axis order
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Read-only view of the values
    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.values.view()
    }

    /// Length of each storage axis, i.e. the reversed grid extent
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Value at a storage order index, `None` when out of range
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Minimum and maximum of the finite values
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values.iter().finite_range()
    }

    /// Recoverable problems met while decoding
    pub fn diagnostics(&self) -> &[InconsistentLayout] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, problem: InconsistentLayout) {
        self.diagnostics.push(problem);
    }

    /// Place one box of samples into the field
    ///
    /// `samples` are in the on-disk column-major order of the box's natural
    /// shape. Missing trailing samples from a truncated blob are left as zero.
    /// `origin` is the low corner of the level domain.
    pub(crate) fn scatter(
        &mut self,
        origin: &[i64],
        grid_box: &GridBox,
        samples: Vec<f64>,
    ) -> Result<()> {
        let block = fab_to_storage_order(samples, &grid_box.shape())?;

        // storage order start of the box within the field
        let start: Vec<usize> = grid_box
            .low
            .iter()
            .zip(origin)
            .map(|(lo, o)| (lo - o) as usize)
            .rev()
            .collect();

        self.values
            .slice_each_axis_mut(|axis| {
                let i = axis.axis.index();
                Slice::from(start[i]..start[i] + block.len_of(axis.axis))
            })
            .assign(&block);

        Ok(())
    }
}

/// Reinterpret column-major box samples as a storage order array
///
/// The flat samples become an array of the natural box shape with the first
/// axis fastest, which is then permuted by [storage_axes].
pub(crate) fn fab_to_storage_order(mut samples: Vec<f64>, shape: &[usize]) -> Result<ArrayD<f64>> {
    samples.resize(shape.element_count(), 0.0);

    let natural = ArrayD::from_shape_vec(IxDyn(shape).f(), samples).map_err(|e| {
        Error::MalformedBoxLayout(f!("unable to shape box samples to {shape:?}: {e}"))
    })?;

    Ok(natural.permuted_axes(storage_axes(shape.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_axes() {
        assert_eq!(storage_axes(2), vec![1, 0]);
        assert_eq!(storage_axes(3), vec![2, 1, 0]);
    }

    #[test]
    fn test_column_major_2d() {
        // natural shape (3, 2), x fastest on disk
        let block = fab_to_storage_order(vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0], &[3, 2]).unwrap();
        assert_eq!(block.shape(), &[2, 3]);
        assert_eq!(block[[0, 2]], 2.0);
        assert_eq!(block[[1, 0]], 10.0);
        assert_eq!(block[[1, 2]], 12.0);
    }

    #[test]
    fn test_short_samples_zero_filled() {
        let block = fab_to_storage_order(vec![5.0, 6.0], &[2, 2, 1]).unwrap();
        assert_eq!(block.shape(), &[1, 2, 2]);
        assert_eq!(block[[0, 0, 0]], 5.0);
        assert_eq!(block[[0, 0, 1]], 6.0);
        assert_eq!(block[[0, 1, 0]], 0.0);
        assert_eq!(block[[0, 1, 1]], 0.0);
    }

    #[test]
    fn test_scatter_offset_box() {
        let domain = GridBox::new(vec![0, 0], vec![3, 2]);
        let mut field = DecodedField::zeros("phi", 0, &domain);
        assert_eq!(field.shape(), &[3, 4]);

        let grid_box = GridBox::new(vec![2, 1], vec![3, 2]);
        field.scatter(&domain.low, &grid_box, vec![1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(field.get(&[1, 2]), Some(1.0));
        assert_eq!(field.get(&[1, 3]), Some(2.0));
        assert_eq!(field.get(&[2, 2]), Some(3.0));
        assert_eq!(field.get(&[2, 3]), Some(4.0));
        assert_eq!(field.get(&[0, 0]), Some(0.0));
        assert_eq!(field.get(&[3, 0]), None);
        assert_eq!(field.min_max(), Some((0.0, 4.0)));
    }

    #[test]
    fn test_scatter_shifted_origin() {
        let domain = GridBox::new(vec![-2, 4], vec![1, 5]);
        let mut field = DecodedField::zeros("phi", 1, &domain);
        assert_eq!(field.shape(), &[2, 4]);

        let grid_box = GridBox::new(vec![-2, 5], vec![-1, 5]);
        field.scatter(&domain.low, &grid_box, vec![7.0, 8.0]).unwrap();
        assert_eq!(field.get(&[1, 0]), Some(7.0));
        assert_eq!(field.get(&[1, 1]), Some(8.0));
    }
}
