//! Writers for small synthetic plotfiles
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Inclusive box corners in natural axis order
pub type Corners = (Vec<i64>, Vec<i64>);

/// Header line written at the top of every blob
pub const FAB_HEADER: &str =
    "FAB ((8, (64 11 52 0 1 12 0 1023)),(8, (8 7 6 5 4 3 2 1)))((0,0,0) (0,0,0) (0,0,0)) 1";

/// `((lo) (hi) (0,..))` tuple text
pub fn box_text(lo: &[i64], hi: &[i64]) -> String {
    let join = |v: &[i64]| {
        v.iter()
            .map(|i| i.to_string())
            .collect::<Vec<String>>()
            .join(",")
    };
    let zeros = vec![0; lo.len()];
    format!("(({}) ({}) ({}))", join(lo), join(hi), join(&zeros))
}

/// Write a `Header` with one domain box per entry in `domains`
pub fn write_header(root: &Path, variables: &[&str], domains: &[Corners], time: f64, step: i64) {
    let dim = domains[0].0.len();
    let mut text = String::from("HyperCLaw-V1.1\n");
    text += &format!("{}\n", variables.len());
    for v in variables {
        text += &format!("{v}\n");
    }
    text += &format!("{dim}\n");
    text += &format!("{time}\n");
    text += &format!("{}\n", domains.len() - 1);
    text += &format!("{}\n", vec!["0.0"; dim].join(" "));
    text += &format!("{}\n", vec!["1.0"; dim].join(" "));
    text += &format!("{}\n", vec!["2"; domains.len() - 1].join(" "));
    text += &format!(
        "{}\n",
        domains
            .iter()
            .map(|(lo, hi)| box_text(lo, hi))
            .collect::<Vec<String>>()
            .join(" ")
    );
    text += &format!("{step}\n");
    text += "0.125 0.125 0.125\n0\n0\n";
    fs::create_dir_all(root).unwrap();
    fs::write(root.join("Header"), text).unwrap();
}

/// Write a `Cell_H` listing `boxes`, mapped to `fab_files` (any length)
pub fn write_cell_h(level_dir: &Path, components: usize, boxes: &[Corners], fab_files: &[&str]) {
    let mut text = format!("1\n0\n{components}\n0\n({} 0\n", boxes.len());
    for (lo, hi) in boxes {
        text += &format!("{}\n", box_text(lo, hi));
    }
    text += ")\n";
    text += &format!("{}\n", fab_files.len());
    for name in fab_files {
        text += &format!("FabOnDisk: {name} 0\n");
    }
    text += "\n1,1\n0.0,\n";
    fs::create_dir_all(level_dir).unwrap();
    fs::write(level_dir.join("Cell_H"), text).unwrap();
}

/// Write a blob holding each variable's block one after another
pub fn write_fab(level_dir: &Path, name: &str, blocks: &[Vec<f64>]) -> PathBuf {
    let path = level_dir.join(name);
    let mut file = File::create(&path).unwrap();
    writeln!(file, "{FAB_HEADER}").unwrap();
    for block in blocks {
        for v in block {
            file.write_all(&v.to_ne_bytes()).unwrap();
        }
    }
    path
}

/// Sample `f` over a box in column-major order, first axis fastest
pub fn column_major(lo: &[i64], hi: &[i64], f: impl Fn(&[i64]) -> f64) -> Vec<f64> {
    let mut samples = Vec::new();
    let mut index = lo.to_vec();
    loop {
        samples.push(f(&index));
        let mut axis = 0;
        loop {
            if axis == index.len() {
                return samples;
            }
            index[axis] += 1;
            if index[axis] <= hi[axis] {
                break;
            }
            index[axis] = lo[axis];
            axis += 1;
        }
    }
}

/// Values that pin down both the column-major order and the axis reversal
pub fn coordinate_code(index: &[i64]) -> f64 {
    index
        .iter()
        .zip([1.0, 10.0, 100.0])
        .map(|(i, scale)| *i as f64 * scale)
        .sum()
}

/// Single level plotfile with one blob per box, all variables in each blob
///
/// Variable `v` is filled with `coordinate_code + 1000 * v`.
pub fn plotfile_with_boxes(variables: &[&str], domain: Corners, boxes: &[Corners]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let level_dir = dir.path().join("Level_0");
    write_header(dir.path(), variables, &[domain], 0.5, 42);

    let names: Vec<String> = (0..boxes.len()).map(|i| format!("Cell_D_{i:05}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    write_cell_h(&level_dir, variables.len(), boxes, &name_refs);

    for ((lo, hi), name) in boxes.iter().zip(&names) {
        let blocks: Vec<Vec<f64>> = (0..variables.len())
            .map(|v| column_major(lo, hi, |i| coordinate_code(i) + 1000.0 * v as f64))
            .collect();
        write_fab(&level_dir, name, &blocks);
    }
    dir
}
