use std::path::PathBuf;
use std::process::ExitCode;

use bigram_core::report::FrequencyReport;
use bigram_core::{BigramError, BigramModel, GenerationInput, ModelConfig, ZeroRowPolicy};
use clap::{Parser, ValueEnum};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate names from a bigram model learned on a list of names.
///
/// With no arguments, reads `./names.txt` and prints one generated name.
#[derive(Debug, Parser)]
#[command(name = "bigram", version)]
struct Args {
    /// Corpus file, one name per line
    #[arg(default_value = "./names.txt")]
    corpus: PathBuf,

    /// Number of names to generate
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Seed of the random stream (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum name length before giving up, 0 disables the cutoff
    #[arg(long, default_value_t = bigram_core::model::sampler::DEFAULT_MAX_LEN)]
    max_len: usize,

    /// Handling of symbols never observed as a predecessor
    #[arg(long, value_enum, default_value_t = ZeroRow::Fail)]
    zero_row: ZeroRow,

    /// Retries when the generated name already exists in the corpus
    #[arg(long, default_value_t = 0)]
    nb_try: usize,

    /// Threads used to count transitions (defaults to the CPU count)
    #[arg(long)]
    workers: Option<usize>,

    /// Print the frequency table instead of generating names
    #[arg(long, value_enum)]
    heatmap: Option<HeatmapFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZeroRow {
    Fail,
    Uniform,
}

impl From<ZeroRow> for ZeroRowPolicy {
    fn from(value: ZeroRow) -> Self {
        match value {
            ZeroRow::Fail => ZeroRowPolicy::Fail,
            ZeroRow::Uniform => ZeroRowPolicy::Uniform,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeatmapFormat {
    Text,
    Json,
}

fn run(args: Args) -> Result<(), BigramError> {
    let mut config = ModelConfig { zero_row_policy: args.zero_row.into(), ..ModelConfig::default() };
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    // Build the whole model before printing anything
    let model = BigramModel::from_file(&args.corpus, &config)?;

    if let Some(format) = args.heatmap {
        let report = FrequencyReport::new(model.vocabulary(), model.frequencies())?;
        match format {
            HeatmapFormat::Text => print!("{}", report.render_text()),
            HeatmapFormat::Json => println!("{}", report.to_json()?),
        }
        return Ok(());
    }

    let mut input = GenerationInput::default();
    input.nb_try = args.nb_try;
    input.set_max_len(if args.max_len == 0 { None } else { Some(args.max_len) })?;

    // Log the seed so any run can be replayed with --seed
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!("seed: {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let names = (0..args.count)
        .map(|_| model.generate(&input, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;
    for name in names {
        println!("{name}");
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
