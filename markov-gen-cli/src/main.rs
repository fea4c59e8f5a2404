use std::path::PathBuf;

use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{info, warn, LevelFilter};

use markov_gen_core::io::document_name;
use markov_gen_core::model::settings::{DEFAULT_COUNT, DEFAULT_ORDER};
use markov_gen_core::{ChainBuilder, ChainModel, Granularity, MarkovError, SeedPolicy, Settings};

/// Generate gibberish from one or more text files with a Markov chain.
#[derive(Parser, Debug)]
#[command(name = "markov-gen", version, about, long_about = None)]
struct Cli {
	/// Text files to learn from, one document each
	#[arg(value_name = "FILES", required = true)]
	files: Vec<PathBuf>,

	/// Tokens per window (1-20)
	#[arg(short, long, default_value_t = DEFAULT_ORDER)]
	order: usize,

	/// Number of tokens to generate (1-9999)
	#[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
	count: usize,

	/// Token granularity: words or characters
	#[arg(short, long, default_value = "words")]
	granularity: Granularity,

	/// Seed: "clock" or an unsigned integer
	#[arg(short, long, default_value = "clock")]
	seed: SeedPolicy,

	/// Print every window and its successors after the generated text
	#[arg(long)]
	dump: bool,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	fn settings(&self) -> Result<Settings, MarkovError> {
		let mut settings = Settings::default();
		settings.set_order(self.order)?;
		settings.set_count(self.count)?;
		settings.granularity = self.granularity;
		settings.seed = self.seed;
		Ok(settings)
	}
}

/// Level forced by `-v`; without it `RUST_LOG` (default `warn`) decides.
fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
	match verbose {
		0 => None,
		1 => Some(LevelFilter::Info),
		2 => Some(LevelFilter::Debug),
		_ => Some(LevelFilter::Trace),
	}
}

fn init_logging(verbose: u8) {
	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	if let Some(level) = verbosity_level(verbose) {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

/// Ingests every readable file. Unreadable files are skipped with a warning.
///
/// # Errors
/// Returns an error if no file could be read.
fn build_model(files: &[PathBuf], settings: &Settings) -> Result<ChainModel, Box<dyn std::error::Error>> {
	let mut builder = ChainBuilder::new(settings.order())?;
	for path in files {
		match builder.ingest_file(path, settings.granularity) {
			Ok(()) => info!("ingested {}", document_name(path).unwrap_or_else(|_| path.display().to_string())),
			Err(e) => warn!("skipping {}: {e}", path.display()),
		}
	}
	if builder.documents() == 0 {
		return Err("no readable input file".into());
	}
	Ok(builder.build()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let settings = cli.settings()?;
	let model = build_model(&cli.files, &settings)?;

	let mut random = settings.seed.random();
	info!(
		"order {}, {} windows from {} document(s), seed {}",
		model.order(),
		model.len(),
		model.documents(),
		random.seed_value()
	);

	let output = model.generate(settings.count(), settings.granularity, &mut random)?;
	println!("{output}");

	if cli.dump {
		println!("{}", model.dump());
	}

	Ok(())
}
