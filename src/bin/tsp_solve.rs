use std::{
    io::{BufWriter, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

use ::log::{LevelFilter, info};
use itertools::Itertools;
use metric_tsp::{log::build_logger_for_verbosity, prelude::*, utils::signal_handling};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(about = "Approximates a metric TSP instance given in TSPLIB format")]
struct Opts {
    /// TSPLIB instance; reads stdin if omitted
    #[structopt(short = "i", long)]
    input: Option<PathBuf>,

    /// christofides, twice-around or both
    #[structopt(short, long, default_value = "both")]
    algorithm: AlgorithmChoice,

    /// Spanning tree algorithm: prim or kruskal
    #[structopt(long, default_value = "prim")]
    mst: MstAlgorithm,

    /// Time limit per algorithm in seconds
    #[structopt(short = "T", long)]
    timeout: Option<f64>,

    /// Print the tour (as city ids) after the cost
    #[structopt(short, long)]
    print_tour: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn load_graph(path: &Option<PathBuf>) -> anyhow::Result<CompleteGraph> {
    if let Some(path) = path {
        Ok(CompleteGraph::try_read_tsplib_file(path)?)
    } else {
        let stdin = std::io::stdin().lock();
        Ok(CompleteGraph::try_read_tsplib(stdin)?)
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);
    signal_handling::initialize();

    let timeout = opts
        .timeout
        .map(Duration::try_from_secs_f64)
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid timeout: {e}"))?;

    let graph = load_graph(&opts.input)?;
    info!("loaded instance with {} cities", graph.number_of_nodes());

    let mut out = BufWriter::new(std::io::stdout().lock());
    for algorithm in opts.algorithm.algorithms() {
        let config = SolverConfig::new(algorithm)
            .with_mst(opts.mst)
            .with_timeout(timeout);

        let start = Instant::now();
        match config.run(&graph, &CtrlC) {
            Ok(result) => {
                writeln!(
                    out,
                    "{algorithm}: cost {:.2} ({:.5}s)",
                    result.cost,
                    start.elapsed().as_secs_f64()
                )?;
                if opts.print_tour {
                    writeln!(out, "{}", result.tour.labels(&graph).iter().join(" "))?;
                }
            }
            Err(TspError::Timeout { phase }) => {
                writeln!(out, "{algorithm}: timeout during {phase}")?;
            }
            Err(err) => return Err(err.into()),
        }
        out.flush()?;
    }

    Ok(())
}
