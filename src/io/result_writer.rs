use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use serde::Serialize;

use crate::{algorithm::Phase, errors::Result, graph::Weight, tour::TourAlgorithm};

pub const CSV_HEADER: &str = "File;Algorithm;Time;Cost;Approximation;Memory";

/// How a single benchmark run ended
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Solved {
        cost: Weight,
        approximation: Option<f64>,
    },
    Timeout {
        phase: Phase,
    },
    Error {
        message: String,
    },
}

/// One row of the benchmark output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub file: String,
    pub algorithm: TourAlgorithm,
    pub time_seconds: f64,
    pub memory_mib: Option<f64>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl BenchmarkRecord {
    /// `;`-separated line without trailing newline. Time has five decimals; cost, ratio and
    /// memory have two. Missing values stay empty.
    pub fn to_csv_row(&self) -> String {
        let (cost, approximation) = match &self.outcome {
            Outcome::Solved {
                cost,
                approximation,
            } => (
                format!("{cost:.2}"),
                approximation
                    .map(|a| format!("{a:.2}"))
                    .unwrap_or_default(),
            ),
            Outcome::Timeout { .. } => ("timeout".to_string(), String::new()),
            Outcome::Error { .. } => ("error".to_string(), String::new()),
        };

        let memory = self
            .memory_mib
            .map(|m| format!("{m:.2}"))
            .unwrap_or_default();

        format!(
            "{};{};{:.5};{cost};{approximation};{memory}",
            self.file, self.algorithm, self.time_seconds
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format '{s}'")),
        }
    }
}

pub struct ResultWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    /// Writes the CSV header; JSON lines have none
    pub fn write_header(&mut self) -> Result<()> {
        if self.format == OutputFormat::Csv {
            writeln!(self.writer, "{CSV_HEADER}")?;
        }
        Ok(())
    }

    /// Appends a record and flushes, so completed runs survive an aborted benchmark
    pub fn write_record(&mut self, record: &BenchmarkRecord) -> Result<()> {
        match self.format {
            OutputFormat::Csv => writeln!(self.writer, "{}", record.to_csv_row())?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, record).map_err(std::io::Error::from)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ResultWriter<BufWriter<File>> {
    /// Opens `path` for writing. With `append` set, existing content is kept and the header is
    /// only written if the file is new or empty; otherwise the file is truncated.
    pub fn create_file<P: AsRef<Path>>(path: P, format: OutputFormat, append: bool) -> Result<Self> {
        let path = path.as_ref();
        let is_empty = std::fs::metadata(path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        let mut writer = Self::new(BufWriter::new(file), format);
        if !append || is_empty {
            writer.write_header()?;
        }
        Ok(writer)
    }
}
