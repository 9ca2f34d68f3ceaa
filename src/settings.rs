use core::str::FromStr;
use std::path::Path;

use config::{Config, ConfigError};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG: &'static str = "dovecot-logins";
pub const ENV_PREFIX: &'static str = "DOVECOT_LOGINS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
	Text,
	Json,
}

impl FromStr for OutputFormat {
	type Err = Error;

	fn from_str(s: &str) -> Result<OutputFormat> {
		match s.trim().to_ascii_lowercase().as_str() {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			other => Err(ConfigError::Message(format!("unknown output format {:?}", other)).into()),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
	pub output: OutputFormat,
	pub log_level: String,
	/// Reference year for turning syslog timestamps into dates.
	pub year: Option<i32>,
}

impl Default for Settings {
	fn default() -> Settings {
		Settings {
			output: OutputFormat::Text,
			log_level: "warn".to_string(),
			year: None,
		}
	}
}

impl Settings {
	/// Merges the settings file (the given one, or an optional
	/// `dovecot-logins.*` next to the process) with `DOVECOT_LOGINS_*`
	/// environment variables. The file may be toml, json, yaml or ini, and
	/// hjson when built with the `config-hjson` feature.
	pub fn load(path: Option<&Path>) -> Result<Settings> {
		let mut settings: Config = Config::default();

		match path {
			Some(path) => settings.merge(config::File::from(path))?,
			None => settings.merge(config::File::with_name(DEFAULT_CONFIG).required(false))?,
		};
		settings.merge(config::Environment::with_prefix(ENV_PREFIX))?;

		Settings::from_config(&settings)
	}

	pub fn from_config(settings: &Config) -> Result<Settings> {
		let defaults: Settings = Settings::default();

		let output: OutputFormat = match optional(settings.get_str("output"))? {
			Some(output) => output.parse()?,
			None => defaults.output,
		};
		let log_level: String = optional(settings.get_str("log_level"))?.unwrap_or(defaults.log_level);
		let year: Option<i32> = match optional(settings.get_int("year"))? {
			Some(year) if year < 1 || year > 9999 => {
				return Err(ConfigError::Message(format!("year {} out of range", year)).into())
			}
			Some(year) => Some(year as i32),
			None => None,
		};

		Ok(Settings {
			output,
			log_level,
			year,
		})
	}
}

fn optional<T>(value: core::result::Result<T, ConfigError>) -> Result<Option<T>> {
	match value {
		Ok(v) => Ok(Some(v)),
		Err(ConfigError::NotFound(_)) => Ok(None),
		Err(e) => Err(e.into()),
	}
}
