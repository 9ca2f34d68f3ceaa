use std::io::Write;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dovecot_logins::cli::{self, Args};
use dovecot_logins::settings::{OutputFormat, Settings};
use dovecot_logins::{analyze, read_log, report, ExclusionSet, Report, Result};

fn setup_logging(level: &str) {
	let filter: EnvFilter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level))
		.unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_target(false).with_writer(std::io::stderr))
		.init();
}

fn run(args: Args) -> Result<()> {
	let settings: Settings = Settings::load(args.config.as_deref())?;
	setup_logging(&settings.log_level);

	// Both failure modes here are fatal before any log line is looked at.
	let excluded: ExclusionSet = ExclusionSet::resolve(&args.exclude_ips)?;
	let content: String = read_log(&args.log_file)?;
	info!("analyzing {}", args.log_file.display());

	let report: Report = analyze(content.lines(), &excluded);

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	match args.output.unwrap_or(settings.output) {
		OutputFormat::Text => report::write_text(&mut out, &args.log_file, &excluded, &report)?,
		OutputFormat::Json => {
			report::write_json(&mut out, &args.log_file, &excluded, &report, settings.year)?
		}
	}
	out.flush()?;

	Ok(())
}

fn main() {
	let matches = cli::app().get_matches();

	let result: Result<()> = Args::from_matches(&matches).and_then(run);

	if let Err(e) = result {
		eprintln!("error: {}", e);
		std::process::exit(1);
	}
}
