use std::path::PathBuf;

use clap::{crate_version, App, Arg, ArgMatches};

use crate::error::Result;
use crate::settings::OutputFormat;

const EXAMPLES: &'static str = "EXAMPLES:
    # Exclude a single IP
    dovecot-logins mail.log --exclude-ips 95.88.75.176

    # Exclude several IPs
    dovecot-logins mail.log --exclude-ips \"95.88.75.176,202.61.252.100\"

    # Exclude IPs listed in a file
    dovecot-logins mail.log --exclude-ips exclude_ips.txt";

#[derive(Clone, Debug, PartialEq)]
pub struct Args {
	pub log_file: PathBuf,
	pub exclude_ips: String,
	pub config: Option<PathBuf>,
	pub output: Option<OutputFormat>,
}

pub fn app<'a, 'b>() -> App<'a, 'b> {
	App::new("dovecot-logins")
		.version(crate_version!())
		.about("Lists Dovecot login attempts, leaving out the given IP addresses")
		.after_help(EXAMPLES)
		.arg(
			Arg::with_name("logfile")
				.help("Path to the Dovecot log file")
				.required(true)
				.index(1),
		)
		.arg(
			Arg::with_name("exclude-ips")
				.help("IP addresses to exclude (single, comma-separated, or path to a file)")
				.long("exclude-ips")
				.short("e")
				.value_name("IPS")
				.takes_value(true)
				.required(true),
		)
		.arg(
			Arg::with_name("config")
				.help("Settings file to read instead of ./dovecot-logins.*")
				.long("config")
				.short("c")
				.value_name("FILE")
				.takes_value(true),
		)
		.arg(
			Arg::with_name("output")
				.help("Report format")
				.long("output")
				.short("o")
				.takes_value(true)
				.possible_values(&["text", "json"]),
		)
}

impl Args {
	pub fn from_matches(matches: &ArgMatches) -> Result<Args> {
		let output: Option<OutputFormat> = match matches.value_of("output") {
			Some(output) => Some(output.parse()?),
			None => None,
		};

		Ok(Args {
			log_file: PathBuf::from(matches.value_of_os("logfile").unwrap_or_default()),
			exclude_ips: matches.value_of("exclude-ips").unwrap_or_default().to_string(),
			config: matches.value_of_os("config").map(PathBuf::from),
			output,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(argv: &[&str]) -> clap::Result<ArgMatches<'static>> {
		app().get_matches_from_safe(argv.iter().copied())
	}

	#[test]
	fn positional_and_short_exclude() {
		let matches = parse(&["dovecot-logins", "mail.log", "-e", "1.2.3.4"]).unwrap();
		let args = Args::from_matches(&matches).unwrap();

		assert_eq!(
			args,
			Args {
				log_file: PathBuf::from("mail.log"),
				exclude_ips: "1.2.3.4".to_string(),
				config: None,
				output: None,
			}
		);
	}

	#[test]
	fn long_options() {
		let matches = parse(&[
			"dovecot-logins",
			"--exclude-ips",
			"1.2.3.4,5.6.7.8",
			"--output",
			"json",
			"--config",
			"/etc/dovecot-logins.toml",
			"/var/log/mail.log",
		])
		.unwrap();
		let args = Args::from_matches(&matches).unwrap();

		assert_eq!(args.exclude_ips, "1.2.3.4,5.6.7.8");
		assert_eq!(args.output, Some(OutputFormat::Json));
		assert_eq!(args.config, Some(PathBuf::from("/etc/dovecot-logins.toml")));
		assert_eq!(args.log_file, PathBuf::from("/var/log/mail.log"));
	}

	#[test]
	fn exclude_ips_is_required() {
		let err = parse(&["dovecot-logins", "mail.log"]).unwrap_err();

		assert_eq!(err.kind, clap::ErrorKind::MissingRequiredArgument);
	}

	#[test]
	fn unknown_output_is_rejected() {
		let err = parse(&["dovecot-logins", "mail.log", "-e", "1.2.3.4", "-o", "xml"]).unwrap_err();

		assert_eq!(err.kind, clap::ErrorKind::InvalidValue);
	}
}
