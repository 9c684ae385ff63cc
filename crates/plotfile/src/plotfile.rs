// crate modules
use crate::decoder::{level_directory, LevelDecoder};
use crate::error::Result;
use crate::field::DecodedField;
use crate::header::{read_header, PlotfileMetadata};

// standard library
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// external crates
use log::debug;

/// Upper limit when scanning for `Level_<n>` directories
const MAX_LEVEL_SCAN: usize = 100;

/// An open plotfile directory
///
/// Opening a plotfile reads only the top level `Header`. Variables are decoded
/// lazily on first request and kept for the lifetime of the handle, so asking
/// for the same variable again never touches the disk.
///
/// ```rust, no_run
/// # use pltools_plotfile::Plotfile;
/// let mut plotfile = Plotfile::open("/path/to/plt00120").unwrap();
/// println!("{}", plotfile.metadata());
///
/// // Decoded from disk the first time, cached from then on
/// let density = plotfile.decode("density").unwrap();
/// println!("{:?}", density.min_max());
/// ```
///
/// The cache is owned by the handle and is not shared between handles or
/// threads. Decoding needs `&mut self`, which serialises any inserts.
#[derive(Debug)]
pub struct Plotfile {
    /// Root of the plotfile directory
    root: PathBuf,
    /// Parsed top level header
    metadata: PlotfileMetadata,
    /// Decoded fields keyed on (level, variable name)
    cache: HashMap<(usize, String), DecodedField>,
    /// Count of every file opened while decoding
    files_opened: usize,
    /// Disable progress bar?
    disable_progress: bool,
}

impl Plotfile {
    /// Open a plotfile directory and parse its `Header`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let metadata = read_header(&root)?;
        Ok(Self {
            root,
            metadata,
            cache: HashMap::new(),
            files_opened: 0,
            disable_progress: true,
        })
    }

    /// Metadata parsed from the `Header`
    pub fn metadata(&self) -> &PlotfileMetadata {
        &self.metadata
    }

    /// Path to the plotfile directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Decode a variable on the coarsest level
    ///
    /// Shorthand for [Plotfile::decode_level] with level 0.
    pub fn decode(&mut self, variable: &str) -> Result<&DecodedField> {
        self.decode_level(variable, 0)
    }

    /// Decode a variable on a specific refinement level
    ///
    /// The field is cached on success. Failures leave the cache untouched.
    pub fn decode_level(&mut self, variable: &str, level: usize) -> Result<&DecodedField> {
        match self.cache.entry((level, variable.to_string())) {
            Entry::Occupied(entry) => {
                debug!("Using cached {variable} (level {level})");
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let mut decoder =
                    LevelDecoder::new(&self.root, &self.metadata, self.disable_progress);
                let decoded = decoder.decode(variable, level);
                self.files_opened += decoder.files_opened();
                Ok(&*entry.insert(decoded?))
            }
        }
    }

    /// Previously decoded field, if there is one
    pub fn cached(&self, variable: &str, level: usize) -> Option<&DecodedField> {
        self.cache.get(&(level, variable.to_string()))
    }

    /// Number of decoded fields held by the handle
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of files opened by all decodes so far
    ///
    /// Only the level index and blob files count, the `Header` read on open
    /// does not.
    pub fn files_opened(&self) -> usize {
        self.files_opened
    }

    /// Number of consecutive `Level_<n>` directories present on disk
    ///
    /// This can differ from the header's level count for incomplete copies of
    /// a plotfile. Always at least 1.
    pub fn detected_levels(&self) -> usize {
        let found = (0..MAX_LEVEL_SCAN)
            .take_while(|&level| level_directory(&self.root, level).is_dir())
            .count();
        found.max(1)
    }

    /// Show a progress bar over the boxes of each decode
    pub fn enable_progress(&mut self) {
        self.disable_progress = false;
    }

    /// Do not show progress bars, the default
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }
}

/// Read only the header metadata of a plotfile
///
/// - `path` - Path to the plotfile directory, can be [&str], [String], [Path], etc...
///
/// Example
/// ```rust, no_run
/// # use pltools_plotfile::read_metadata;
/// let metadata = read_metadata("path/to/plt00120").unwrap();
/// println!("{:?}", metadata.variable_names);
/// ```
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<PlotfileMetadata> {
    Ok(Plotfile::open(path)?.metadata)
}

/// Read a single variable from level 0 of a plotfile
///
/// - `path` - Path to the plotfile directory, can be [&str], [String], [Path], etc...
/// - `variable` - Name of the variable as declared in the header
///
/// Example
/// ```rust, no_run
/// # use pltools_plotfile::read_variable;
/// let field = read_variable("path/to/plt00120", "density").unwrap();
/// println!("{:?}", field.shape());
/// ```
pub fn read_variable<P: AsRef<Path>>(path: P, variable: &str) -> Result<DecodedField> {
    // one-off read, so skip the cache entirely
    let plotfile = Plotfile::open(path)?;
    LevelDecoder::new(&plotfile.root, &plotfile.metadata, true).decode(variable, 0)
}
