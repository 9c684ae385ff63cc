//! Result and Error types for pltools-plotfile

// standard library
use std::path::{Path, PathBuf};

/// Type alias for `Result<T, plotfile::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `pltools-plotfile` crate
///
/// Every variant is fatal for the call that returned it. Recoverable layout
/// problems are never errors, see [InconsistentLayout](crate::InconsistentLayout).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    /// A directory or file the layout requires does not exist
    #[error("no such file or directory {0:?}")]
    NotFound(PathBuf),

    /// The top level `Header` is structurally invalid
    #[error("malformed plotfile header: {0}")]
    MalformedHeader(String),

    /// A level `Cell_H` box layout is structurally invalid
    #[error("malformed box layout: {0}")]
    MalformedBoxLayout(String),

    /// Requested variable is not declared in the header
    #[error("variable \"{0}\" not found in plotfile")]
    UnknownVariable(String),
}

impl Error {
    /// Attach the path to missing files, anything else stays an I/O error
    pub(crate) fn from_io(error: std::io::Error, path: &Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::IOError(error),
        }
    }
}

/// Recoverable inconsistencies found while decoding a level
///
/// None of these abort a decode. Each one is logged as a warning when found,
/// the documented fallback applied, and the condition recorded on the
/// resulting [DecodedField](crate::DecodedField) so callers can inspect it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InconsistentLayout {
    /// Number of `FabOnDisk:` mappings differs from the number of boxes
    ///
    /// Fallback: every box uses the synthetic `Cell_D_<index>` filename.
    #[error("found {mappings} FabOnDisk entries for {boxes} boxes, using Cell_D_<index> names")]
    FabCountMismatch { boxes: usize, mappings: usize },

    /// A blob held fewer samples than its box needs
    ///
    /// Fallback: samples that were read are used, the remainder left as zero.
    #[error("box {box_index} expected {expected} values but found {found}")]
    ShortRead {
        box_index: usize,
        expected: usize,
        found: usize,
    },

    /// `Cell_H` component count differs from the number of header variables
    #[error("box layout has {found} components but the header declares {expected} variables")]
    ComponentCount { expected: usize, found: usize },
}
