//! Benchmark harness: runs every algorithm on a list of TSPLIB instances and records time,
//! cost, approximation ratio and peak memory of each run.
//!
//! Each run gets its own wall-clock budget; on expiry the run is abandoned at the next phase
//! boundary and recorded as `timeout`, and the harness moves on. A failed instance load is
//! logged and the case skipped.

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{error, info, warn};
use rayon::prelude::*;

use crate::{
    algorithm::Interrupt,
    errors::{Result, TspError},
    graph::{CompleteGraph, GraphNodeOrder},
    io::*,
    tour::{SolverConfig, TourAlgorithm, approximation_ratio},
    tree::MstAlgorithm,
    utils::memory,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Directory containing `<name>.tsp` for every case
    pub datasets_dir: PathBuf,
    /// Only run the first cases of the list
    pub limit: Option<usize>,
    pub timeout: Option<Duration>,
    pub mst: MstAlgorithm,
    pub algorithms: Vec<TourAlgorithm>,
    /// Process cases concurrently; memory figures then cover all concurrent runs
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("datasets"),
            limit: None,
            timeout: Some(DEFAULT_TIMEOUT),
            mst: MstAlgorithm::default(),
            algorithms: TourAlgorithm::ALL.to_vec(),
            parallel: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BenchmarkSummary {
    pub cases: usize,
    pub skipped: usize,
    pub solved: usize,
    pub timeouts: usize,
    pub errors: usize,
}

impl BenchmarkSummary {
    fn add(&mut self, records: Option<&[BenchmarkRecord]>) {
        self.cases += 1;
        let Some(records) = records else {
            self.skipped += 1;
            return;
        };

        for record in records {
            match record.outcome {
                Outcome::Solved { .. } => self.solved += 1,
                Outcome::Timeout { .. } => self.timeouts += 1,
                Outcome::Error { .. } => self.errors += 1,
            }
        }
    }
}

/// Lists all `*.tsp` files of `dir` (sorted by name) as cases without known optimum
pub fn discover_instances(dir: &Path) -> Result<Vec<DatasetEntry>> {
    let pattern = dir.join("*.tsp");
    let pattern = pattern.to_str().ok_or_else(|| {
        TspError::MalformedInput(format!("non-UTF8 directory {}", dir.display()))
    })?;

    let paths = glob::glob(pattern)
        .map_err(|e| TspError::MalformedInput(format!("invalid pattern {pattern}: {e}")))?;

    let mut entries = Vec::new();
    for path in paths {
        let path = path.map_err(|e| TspError::Io(e.into()))?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            entries.push(DatasetEntry::unknown(stem));
        }
    }
    Ok(entries)
}

/// Runs a single algorithm on a loaded instance and records the outcome
pub fn run_algorithm(
    entry: &DatasetEntry,
    graph: &CompleteGraph,
    algorithm: TourAlgorithm,
    config: &BenchmarkConfig,
    interrupt: &impl Interrupt,
) -> BenchmarkRecord {
    let solver = SolverConfig::new(algorithm)
        .with_mst(config.mst)
        .with_timeout(config.timeout);

    memory::reset_peak_resident_set();
    let start = Instant::now();
    let result = solver.run(graph, interrupt);
    let time_seconds = start.elapsed().as_secs_f64();
    let memory_mib = memory::peak_resident_set_bytes().map(memory::bytes_to_mib);

    let outcome = match result {
        Ok(result) => {
            let approximation = entry
                .optimal
                .and_then(|opt| approximation_ratio(result.cost, opt));
            info!(
                "{} / {algorithm}: cost {:.2} in {time_seconds:.3}s",
                entry.name, result.cost
            );
            Outcome::Solved {
                cost: result.cost,
                approximation,
            }
        }
        Err(TspError::Timeout { phase }) => {
            warn!(
                "{} / {algorithm}: time limit exceeded during {phase}",
                entry.name
            );
            Outcome::Timeout { phase }
        }
        Err(err) => {
            error!("{} / {algorithm}: {err}", entry.name);
            Outcome::Error {
                message: err.to_string(),
            }
        }
    };

    BenchmarkRecord {
        file: entry.name.clone(),
        algorithm,
        time_seconds,
        memory_mib,
        outcome,
    }
}

/// Loads the instance of `entry` and runs all configured algorithms on it. Returns `None` if
/// the instance cannot be loaded.
pub fn run_case(
    entry: &DatasetEntry,
    config: &BenchmarkConfig,
    interrupt: &impl Interrupt,
) -> Option<Vec<BenchmarkRecord>> {
    let path = entry.instance_path(&config.datasets_dir);
    let graph = match CompleteGraph::try_read_tsplib_file(&path) {
        Ok(graph) => graph,
        Err(err) => {
            error!("cannot load {}: {err}; skipping", path.display());
            return None;
        }
    };

    if let Some(dimension) = entry.dimension {
        if dimension != graph.len() {
            warn!(
                "{}: list says {dimension} cities, file has {}",
                entry.name,
                graph.len()
            );
        }
    }

    Some(
        config
            .algorithms
            .iter()
            .map(|&algorithm| run_algorithm(entry, &graph, algorithm, config, interrupt))
            .collect(),
    )
}

/// Runs all cases (up to `config.limit`) and writes one record per run. Stops before the next
/// case once `interrupt` fired.
pub fn run_benchmark<W: Write>(
    entries: &[DatasetEntry],
    config: &BenchmarkConfig,
    writer: &mut ResultWriter<W>,
    interrupt: &(impl Interrupt + Sync),
) -> Result<BenchmarkSummary> {
    let cases = &entries[..config.limit.unwrap_or(entries.len()).min(entries.len())];
    let mut summary = BenchmarkSummary::default();

    info!(
        "running {} cases from {}",
        cases.len(),
        config.datasets_dir.display()
    );

    if config.parallel {
        let results: Vec<_> = cases
            .par_iter()
            .map(|entry| run_case(entry, config, interrupt))
            .collect();

        for records in results {
            summary.add(records.as_deref());
            for record in records.iter().flatten() {
                writer.write_record(record)?;
            }
        }
    } else {
        for entry in cases {
            if interrupt.is_interrupted() {
                warn!("interrupted; {} cases left unprocessed", cases.len() - summary.cases);
                break;
            }

            let records = run_case(entry, config, interrupt);
            summary.add(records.as_deref());
            for record in records.iter().flatten() {
                writer.write_record(record)?;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{algorithm::Never, graph::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::sync::atomic::AtomicBool;

    fn prepare(dir: &Path) -> Vec<DatasetEntry> {
        let square = CompleteGraph::try_from_points([
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap();
        square
            .try_write_tsplib_file(dir.join("square.tsp"), "square")
            .unwrap();

        let random = CompleteGraph::random_uniform(&mut Pcg64::seed_from_u64(4), 25, 50.0).unwrap();
        random
            .try_write_tsplib_file(dir.join("random25.tsp"), "random25")
            .unwrap();

        let list = "Name Dimension Optimal\nsquare 4 4\nmissing 10 100\nrandom25 25 1\n";
        read_dataset_list(list.as_bytes()).unwrap()
    }

    fn config(dir: &Path) -> BenchmarkConfig {
        BenchmarkConfig {
            datasets_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn runs_all_cases_and_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let entries = prepare(dir.path());

        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Csv);
        writer.write_header().unwrap();
        let summary = run_benchmark(&entries, &config(dir.path()), &mut writer, &Never).unwrap();

        assert_eq!(
            summary,
            BenchmarkSummary {
                cases: 3,
                skipped: 1,
                solved: 4,
                timeouts: 0,
                errors: 0
            }
        );

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("square;Christofides;"));
        assert!(lines[1].contains(";4.00;1.00;"));
        assert!(lines[2].starts_with("square;Twice around the tree;"));
        assert!(lines[3].starts_with("random25;Christofides;"));
    }

    #[test]
    fn parallel_matches_sequential_order() {
        let dir = tempfile::tempdir().unwrap();
        let entries = prepare(dir.path());
        let config = BenchmarkConfig {
            parallel: true,
            limit: Some(2),
            ..config(dir.path())
        };

        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Csv);
        let summary = run_benchmark(&entries, &config, &mut writer, &Never).unwrap();
        assert_eq!(summary.cases, 2);
        assert_eq!(summary.skipped, 1);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let files: Vec<_> = output
            .lines()
            .map(|l| l.split(';').next().unwrap())
            .collect();
        assert_eq!(files, vec!["square", "square"]);
    }

    #[test]
    fn exhausted_budget_records_timeouts() {
        let dir = tempfile::tempdir().unwrap();
        let entries = prepare(dir.path());
        let config = BenchmarkConfig {
            timeout: Some(Duration::ZERO),
            ..config(dir.path())
        };

        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Csv);
        let summary = run_benchmark(&entries, &config, &mut writer, &Never).unwrap();
        assert_eq!(summary.timeouts, 4);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.lines().all(|l| l.contains(";timeout;")));
    }

    #[test]
    fn interrupt_stops_before_next_case() {
        let dir = tempfile::tempdir().unwrap();
        let entries = prepare(dir.path());
        let fired = AtomicBool::new(true);

        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Csv);
        let summary = run_benchmark(&entries, &config(dir.path()), &mut writer, &fired).unwrap();
        assert_eq!(summary, BenchmarkSummary::default());
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn tiny_list_within_guarantees() {
        let entries = read_dataset_list_file("instances/tiny.txt").unwrap();
        let config = config(Path::new("instances/tiny"));

        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Json);
        let summary = run_benchmark(&entries, &config, &mut writer, &Never).unwrap();
        assert_eq!(summary.solved, 2 * entries.len());

        for entry in &entries {
            for record in run_case(entry, &config, &Never).unwrap() {
                let Outcome::Solved {
                    approximation: Some(ratio),
                    ..
                } = record.outcome
                else {
                    panic!("{}: unexpected outcome {:?}", entry.name, record.outcome);
                };
                let bound = match record.algorithm {
                    TourAlgorithm::Christofides => 1.5,
                    TourAlgorithm::TwiceAroundTheTree => 2.0,
                };
                assert!(ratio > 0.999 && ratio <= bound + 1e-6, "{record:?}");
            }
        }
    }

    #[test]
    fn discover_tiny_instances() {
        let entries = discover_instances(Path::new("instances/tiny")).unwrap();
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.optimal.is_none()));

        let config = config(Path::new("instances/tiny"));
        for entry in &entries {
            let records = run_case(entry, &config, &Never).unwrap();
            assert!(
                records
                    .iter()
                    .all(|r| matches!(r.outcome, Outcome::Solved { approximation: None, .. }))
            );
        }
    }
}
