//! Simple read operations for FAB binary blobs
//!
//! Each blob starts with a single ASCII line describing the real format and
//! the box it holds, for example:
//!
//! ```text
//! FAB ((8, (64 11 52 0 1 12 0 1023)),(8, (8 7 6 5 4 3 2 1)))((0,0,0) (1,3,0) (0,0,0)) 2
//! ```
//!
//! Only the terminating newline matters here. The binary payload that follows
//! is every variable of the box one after another, each one a block of
//! native-endian `f64` values in column-major box order.

// crate modules
use crate::error::{Error, Result};

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

// external crates
use log::trace;

/// Bytes per sample, every value is an IEEE-754 double
const SAMPLE_BYTES: usize = std::mem::size_of::<f64>();

/// Read the samples of one variable for one box
///
/// The returned vector holds at most `count` values. Truncated blobs give a
/// short vector rather than an error, and it is left to the caller to decide
/// what to do about it.
pub(crate) fn read_fab_samples(
    path: &Path,
    variable_index: usize,
    count: usize,
) -> Result<Vec<f64>> {
    let mut reader = init_reader(path)?;
    skip_fab_header(&mut reader)?;

    // variables are stored as consecutive full blocks
    let block_bytes = (count as u64).saturating_mul(SAMPLE_BYTES as u64);
    let offset = (variable_index as u64).saturating_mul(block_bytes);
    match i64::try_from(offset) {
        Ok(offset) => reader.seek_relative(offset)?,
        Err(_) => return Ok(Vec::new()),
    }

    // sized by what is actually in the file, not by the box
    let mut bytes = Vec::new();
    reader.take(block_bytes).read_to_end(&mut bytes)?;

    Ok(bytes.chunks_exact(SAMPLE_BYTES).map(sample_from_bytes).collect())
}

/// Initialise a reader, keeping the path for files that do not exist
fn init_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| Error::from_io(e, path))?;
    Ok(BufReader::new(file))
}

/// Consume everything up to and including the first newline
fn skip_fab_header(reader: &mut BufReader<File>) -> Result<()> {
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)?;
    trace!("FAB header: {}", String::from_utf8_lossy(&header).trim_end());
    Ok(())
}

fn sample_from_bytes(chunk: &[u8]) -> f64 {
    let mut buffer = [0u8; SAMPLE_BYTES];
    buffer.copy_from_slice(chunk);
    f64::from_ne_bytes(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_blob(dir: &Path, header: &str, values: &[f64]) -> std::path::PathBuf {
        let path = dir.join("Cell_D_00000");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{header}").unwrap();
        for v in values {
            file.write_all(&v.to_ne_bytes()).unwrap();
        }
        path
    }

    #[test]
    fn test_variable_offsets() {
        let dir = tempfile::tempdir().unwrap();
        // two variables of a 3 cell box
        let values = [1.0, 2.0, 3.0, 10.0, 20.0, 30.0];
        let path = write_blob(dir.path(), "FAB ((8, (64 11 52 0 1 12 0 1023)))", &values);
        assert_eq!(read_fab_samples(&path, 0, 3).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(read_fab_samples(&path, 1, 3).unwrap(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_short_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_blob(dir.path(), "FAB", &[1.0, 2.0, 3.0, 10.0]);

        // partially present, and entirely past the end
        assert_eq!(read_fab_samples(&path, 1, 3).unwrap(), vec![10.0]);
        assert!(read_fab_samples(&path, 2, 3).unwrap().is_empty());

        // offsets past anything addressable are simply empty
        assert!(read_fab_samples(&path, usize::MAX, usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_missing_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cell_D_00009");
        assert!(matches!(
            read_fab_samples(&path, 0, 1),
            Err(Error::NotFound(p)) if p == path
        ));
    }
}
