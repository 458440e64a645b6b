// Recommend elective courses from the Pearson correlation of student ratings.

mod config;
mod output;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use courserec_core::{
    load_catalog_path,
    presets::{preset, Domain, Interest},
    CorrelationTable, LoadOptions, RankOptions, Recommender, SelfComparison,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use output::{write_recommendations, OutputFormat};

const DEFAULT_TOP_N: usize = 5;

#[derive(Parser)]
#[command(name = "courserec")]
#[command(about = "Recommend elective courses by correlating student ratings")]
#[command(version)]
struct Cli {
    /// Number of worker threads (default: all available cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Field delimiter of the input tables (overrides COURSEREC_DELIMITER)
    #[arg(long, global = true)]
    delimiter: Option<char>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank courses against an anchor course
    Recommend {
        /// Ratings table with studentID, course and rating columns (.gz accepted)
        #[arg(short, long)]
        ratings: PathBuf,

        /// Course the student already likes
        #[arg(short, long)]
        anchor: String,

        /// Maximum number of recommendations
        #[arg(short, long)]
        top: Option<usize>,

        /// Leave the anchor course out of its own ranking
        #[arg(long)]
        exclude_anchor: bool,

        /// Course catalog to cross-check against the ratings
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Recommend from a built-in domain and interest
    Preset {
        /// humanistic or specialization
        domain: Domain,

        /// Interest within the domain, e.g. finance or social-sciences
        interest: Interest,

        /// Directory holding the domain tables (overrides COURSEREC_DATA_DIR)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Maximum number of recommendations (default: the domain's preset count)
        #[arg(short, long)]
        top: Option<usize>,

        #[arg(long)]
        exclude_anchor: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the full course-by-course correlation table as TSV
    Table {
        #[arg(short, long)]
        ratings: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List rated courses with their number of raters
    Courses {
        #[arg(short, long)]
        ratings: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_options(flag: Option<char>, config: &Config) -> anyhow::Result<LoadOptions> {
    let delimiter = flag.unwrap_or(config.delimiter);
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
    }
    Ok(LoadOptions {
        delimiter: delimiter as u8,
    })
}

fn self_comparison(exclude_anchor: bool, config: &Config) -> SelfComparison {
    if exclude_anchor {
        SelfComparison::Exclude
    } else {
        config.self_comparison
    }
}

fn load_recommender(ratings: &Path, options: &LoadOptions) -> anyhow::Result<Recommender> {
    let start = Instant::now();
    let recommender = Recommender::from_ratings_path(ratings, options)
        .with_context(|| format!("Failed to load ratings from {}", ratings.display()))?;
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        course_count = recommender.matrix().course_count(),
        student_count = recommender.matrix().student_count(),
        "Ratings ready"
    );
    Ok(recommender)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_logging(&config.log_level);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread pool")?;
        tracing::debug!(threads, "Thread pool configured");
    }

    let options = load_options(cli.delimiter, &config)?;
    let stdout = io::stdout();

    match cli.command {
        Commands::Recommend {
            ratings,
            anchor,
            top,
            exclude_anchor,
            catalog,
            format,
        } => {
            let mut recommender = load_recommender(&ratings, &options)?;
            if let Some(path) = catalog {
                let catalog = load_catalog_path(&path, &options)
                    .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
                recommender = recommender.with_catalog(catalog);
            }

            let rank_options = RankOptions {
                top_n: top.or(config.top_n).unwrap_or(DEFAULT_TOP_N),
                self_comparison: self_comparison(exclude_anchor, &config),
            };
            let ranked = recommender.recommend(&anchor, &rank_options)?;
            write_recommendations(stdout.lock(), &anchor, &ranked, format)?;
        }
        Commands::Preset {
            domain,
            interest,
            data_dir,
            top,
            exclude_anchor,
            format,
        } => {
            let Some(chosen) = preset(domain, interest) else {
                let offered: Vec<String> = domain.interests().iter().map(|i| i.to_string()).collect();
                bail!(
                    "'{}' is not an interest in the {} domain (choose one of: {})",
                    interest,
                    domain,
                    offered.join(", ")
                );
            };

            tracing::info!(
                domain = %chosen.domain,
                interest = %chosen.interest,
                anchor = chosen.anchor,
                count = chosen.count,
                "Preset selected"
            );

            let dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            let mut recommender = load_recommender(&dir.join(domain.ratings_file()), &options)?;
            let catalog_path = dir.join(domain.catalog_file());
            if catalog_path.exists() {
                let catalog = load_catalog_path(&catalog_path, &options).with_context(|| {
                    format!("Failed to load catalog from {}", catalog_path.display())
                })?;
                recommender = recommender.with_catalog(catalog);
            }

            let rank_options = RankOptions {
                top_n: top.unwrap_or(chosen.count),
                self_comparison: self_comparison(exclude_anchor, &config),
            };
            let ranked = recommender.recommend(chosen.anchor, &rank_options)?;
            write_recommendations(stdout.lock(), chosen.anchor, &ranked, format)?;
        }
        Commands::Table { ratings, output } => {
            let recommender = load_recommender(&ratings, &options)?;
            let start = Instant::now();
            let table = CorrelationTable::compute(recommender.matrix());
            tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                course_count = table.courses().len(),
                "Correlation table computed"
            );
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    table.write_tsv(BufWriter::new(file))?;
                    tracing::info!(path = %path.display(), "Table written");
                }
                None => table.write_tsv(stdout.lock())?,
            }
        }
        Commands::Courses { ratings } => {
            let recommender = load_recommender(&ratings, &options)?;
            let mut out = stdout.lock();
            for (course, vector) in recommender.matrix().columns() {
                writeln!(out, "{}\t{}", course, vector.len())?;
            }
        }
    }

    Ok(())
}
