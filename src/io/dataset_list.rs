use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::errors::{Result, TspError};

/// One benchmark case: an instance name together with its size and known optimal tour cost.
/// Cases discovered from a directory listing know neither.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetEntry {
    pub name: String,
    pub dimension: Option<usize>,
    pub optimal: Option<f64>,
}

impl DatasetEntry {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: None,
            optimal: None,
        }
    }

    /// `<dir>/<name>.tsp`
    pub fn instance_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.tsp", self.name))
    }
}

/// Reads a list of benchmark cases. The first line is a header and skipped; every further
/// non-blank line reads `<name> <dimension> <optimal cost>`.
pub fn read_dataset_list<R: BufRead>(reader: R) -> Result<Vec<DatasetEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_number = idx + 1;
        let malformed =
            |what: &str| TspError::MalformedInput(format!("line {line_number}: {what}"));

        let parts: Vec<_> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => continue,
            [name, dimension, optimal] => entries.push(DatasetEntry {
                name: name.to_string(),
                dimension: Some(
                    dimension
                        .parse()
                        .map_err(|_| malformed(&format!("invalid dimension '{dimension}'")))?,
                ),
                optimal: Some(
                    optimal
                        .parse()
                        .map_err(|_| malformed(&format!("invalid optimal cost '{optimal}'")))?,
                ),
            }),
            _ => {
                return Err(malformed(&format!(
                    "expected '<name> <dimension> <optimal cost>', got '{}'",
                    line.trim()
                )));
            }
        }
    }

    Ok(entries)
}

pub fn read_dataset_list_file<P: AsRef<Path>>(path: P) -> Result<Vec<DatasetEntry>> {
    read_dataset_list(BufReader::new(File::open(path)?))
}
