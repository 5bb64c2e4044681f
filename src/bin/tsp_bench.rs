use std::{io::BufWriter, path::PathBuf, time::Duration};

use ::log::{LevelFilter, info, warn};
use metric_tsp::{
    algorithm::CtrlC,
    bench::*,
    io::{OutputFormat, ResultWriter, read_dataset_list_file},
    log::build_logger_for_verbosity,
    tour::TourAlgorithm,
    tree::MstAlgorithm,
    utils::signal_handling,
};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(about = "Runs both approximation algorithms on a list of TSPLIB instances")]
struct Opts {
    /// Whitespace separated list `<name> <dimension> <optimal cost>` with a header line.
    /// Without it, every *.tsp file of the dataset directory is run.
    #[structopt(short = "l", long, default_value = "datasets.txt")]
    list: PathBuf,

    #[structopt(short = "d", long, default_value = "datasets")]
    datasets: PathBuf,

    /// Result file; stdout if omitted
    #[structopt(short = "o", long)]
    output: Option<PathBuf>,

    /// Keep existing results and only write the header into new files
    #[structopt(long)]
    append: bool,

    /// Only run the first n cases
    #[structopt(short = "n", long)]
    limit: Option<usize>,

    /// Time limit per run in seconds
    #[structopt(short = "T", long, default_value = "1800")]
    timeout: f64,

    /// Only run this algorithm
    #[structopt(short, long)]
    algorithm: Option<TourAlgorithm>,

    #[structopt(long, default_value = "prim")]
    mst: MstAlgorithm,

    /// csv or json
    #[structopt(long, default_value = "csv")]
    format: OutputFormat,

    /// Run cases concurrently
    #[structopt(long)]
    parallel: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);
    signal_handling::initialize();

    let entries = if opts.list.is_file() {
        read_dataset_list_file(&opts.list)?
    } else {
        warn!(
            "{} not found; running all instances in {}",
            opts.list.display(),
            opts.datasets.display()
        );
        discover_instances(&opts.datasets)?
    };

    let config = BenchmarkConfig {
        datasets_dir: opts.datasets,
        limit: opts.limit,
        timeout: Some(
            Duration::try_from_secs_f64(opts.timeout)
                .map_err(|e| anyhow::anyhow!("invalid timeout: {e}"))?,
        ),
        mst: opts.mst,
        algorithms: opts
            .algorithm
            .map_or_else(|| TourAlgorithm::ALL.to_vec(), |a| vec![a]),
        parallel: opts.parallel,
    };

    let summary = if let Some(path) = &opts.output {
        let mut writer = ResultWriter::create_file(path, opts.format, opts.append)?;
        run_benchmark(&entries, &config, &mut writer, &CtrlC)?
    } else {
        let mut writer = ResultWriter::new(BufWriter::new(std::io::stdout().lock()), opts.format);
        writer.write_header()?;
        run_benchmark(&entries, &config, &mut writer, &CtrlC)?
    };

    info!(
        "{} cases ({} skipped): {} solved, {} timeouts, {} errors",
        summary.cases, summary.skipped, summary.solved, summary.timeouts, summary.errors
    );

    Ok(())
}
