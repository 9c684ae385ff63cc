//! Decoding of one variable from a level directory

// crate modules
use crate::error::{Error, InconsistentLayout, Result};
use crate::fab::read_fab_samples;
use crate::field::DecodedField;
use crate::header::PlotfileMetadata;
use crate::layout::{read_box_layout, BoxLayout, GridBox};

// pltools modules
use pltools_utils::f;

// standard library
use std::path::{Path, PathBuf};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, warn};

/// Path to the directory of a refinement level
pub(crate) fn level_directory(root: &Path, level: usize) -> PathBuf {
    root.join(f!("Level_{level}"))
}

/// Reads a variable out of every box of a level and assembles the field
///
/// The box layout is read fresh for every decode, nothing is shared between
/// variables.
#[derive(Debug)]
pub(crate) struct LevelDecoder<'a> {
    root: &'a Path,
    metadata: &'a PlotfileMetadata,
    disable_progress: bool,
    files_opened: usize,
}

impl<'a> LevelDecoder<'a> {
    pub(crate) fn new(
        root: &'a Path,
        metadata: &'a PlotfileMetadata,
        disable_progress: bool,
    ) -> Self {
        Self {
            root,
            metadata,
            disable_progress,
            files_opened: 0,
        }
    }

    /// Number of files opened so far, successfully or not
    pub(crate) fn files_opened(&self) -> usize {
        self.files_opened
    }

    /// Decode `variable` on `level` into a dense field
    ///
    /// Fails without a partial result on any missing file or malformed layout.
    pub(crate) fn decode(&mut self, variable: &str, level: usize) -> Result<DecodedField> {
        let variable_index = self
            .metadata
            .variable_index(variable)
            .ok_or_else(|| Error::UnknownVariable(variable.to_string()))?;

        let level_dir = level_directory(self.root, level);
        self.files_opened += 1;
        let layout = read_box_layout(&level_dir, self.metadata.dimensionality)?;

        let domain = self.level_domain(level, &layout);
        debug!("Level {level} domain {domain}");
        if domain.checked_shape().is_none() {
            return Err(Error::MalformedBoxLayout(f!(
                "level {level} domain ({domain}) is too large"
            )));
        }

        let mut field = DecodedField::zeros(variable, level, &domain);
        for problem in self.check_layout(&layout) {
            field.push_diagnostic(problem);
        }

        let mut progress_bar = self.init_progress_bar(layout.boxes.len())?;
        for (box_index, (grid_box, fab_file)) in
            layout.boxes.iter().zip(&layout.fab_files).enumerate()
        {
            progress_bar.update(1)?;

            if !grid_box.is_within(&domain) {
                return Err(Error::MalformedBoxLayout(f!(
                    "box {box_index} ({grid_box}) lies outside of level {level} domain ({domain})"
                )));
            }

            let expected = grid_box.number_of_cells();
            self.files_opened += 1;
            let samples = read_fab_samples(&level_dir.join(fab_file), variable_index, expected)?;

            if samples.len() < expected {
                let problem = InconsistentLayout::ShortRead {
                    box_index,
                    expected,
                    found: samples.len(),
                };
                warn!("{problem}");
                field.push_diagnostic(problem);
            }

            field.scatter(&domain.low, grid_box, samples)?;
        }

        info!("Loaded variable: {variable} (level {level})");
        Ok(field)
    }

    /// Index space covered by the decoded field
    ///
    /// Level 0 is always the header domain. Finer levels use their own header
    /// domain if listed, otherwise whatever the boxes cover.
    fn level_domain(&self, level: usize, layout: &BoxLayout) -> GridBox {
        let coarse = &self.metadata.level_domains[0];
        if level == 0 {
            return coarse.clone();
        }

        self.metadata
            .level_domains
            .get(level)
            .cloned()
            .or_else(|| GridBox::hull(&layout.boxes))
            .unwrap_or_else(|| coarse.clone())
    }

    /// Sanity checks that are worth a warning but not an error
    fn check_layout(&self, layout: &BoxLayout) -> Vec<InconsistentLayout> {
        let mut problems = layout.diagnostics.clone();

        let expected = self.metadata.variable_names.len();
        if layout.components != expected {
            let problem = InconsistentLayout::ComponentCount {
                expected,
                found: layout.components,
            };
            warn!("{problem}");
            problems.push(problem);
        }

        problems
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self, total: usize) -> Result<Bar> {
        let mut bar = BarBuilder::default()
            .total(total)
            .unit(" boxes")
            .disable(self.disable_progress)
            .build()
            .map_err(|e| Error::IOError(std::io::Error::other(e)))?;

        if !self.disable_progress {
            bar.refresh()?;
        }
        Ok(bar)
    }
}
