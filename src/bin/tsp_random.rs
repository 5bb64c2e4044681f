use std::{io::BufWriter, path::PathBuf};

use ::log::{LevelFilter, info};
use metric_tsp::{log::build_logger_for_verbosity, prelude::*};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(about = "Generates a random Euclidean TSPLIB instance")]
struct Opts {
    /// Number of cities
    #[structopt(short, long, default_value = "100")]
    nodes: NumNodes,

    /// Cities are placed in [0, side)²
    #[structopt(long, default_value = "1000")]
    side: f64,

    #[structopt(short, long, default_value = "1")]
    seed: u64,

    /// Scatter the cities around this many random centers instead of placing them uniformly
    #[structopt(short, long)]
    clustered: Option<NumNodes>,

    /// Instance file; stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);

    let mut rng = Pcg64::seed_from_u64(opts.seed);
    let graph = match opts.clustered {
        Some(clusters) => CompleteGraph::random_clustered(
            &mut rng,
            opts.nodes,
            clusters,
            opts.side,
            opts.side / 50.0,
        )?,
        None => CompleteGraph::random_uniform(&mut rng, opts.nodes, opts.side)?,
    };

    let name = match &opts.output {
        Some(path) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("random")
            .to_string(),
        None => format!("random{}_s{}", opts.nodes, opts.seed),
    };

    if let Some(path) = &opts.output {
        graph.try_write_tsplib_file(path, &name)?;
        info!("wrote {} cities to {}", graph.number_of_nodes(), path.display());
    } else {
        graph.try_write_tsplib(BufWriter::new(std::io::stdout().lock()), &name)?;
    }

    Ok(())
}
