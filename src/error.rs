use core::{fmt, result};
use std::path::PathBuf;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
	EmptyExclusionSet(String),
	InvalidConfig(config::ConfigError),
	InvalidNetAddr(String),
	Io(std::io::Error),
	Json(serde_json::error::Error),
	Read(PathBuf, std::io::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
		write!(
			f,
			"{}",
			match self {
				Self::EmptyExclusionSet(e) => format!("no IP addresses to exclude found in {:?}", e),
				Self::InvalidConfig(e) => format!("invalid config: {}", e),
				Self::InvalidNetAddr(e) => format!("invalid netaddr: {}", e),
				Self::Io(e) => format!("input/output error: {}", e),
				Self::Json(e) => format!("json error: {}", e),
				Self::Read(path, e) => format!("could not read {}: {}", path.display(), e),
			}
		)
	}
}

impl From<config::ConfigError> for Error {
	fn from(e: config::ConfigError) -> Error {
		Error::InvalidConfig(e)
	}
}

impl From<netaddr2::Error> for Error {
	fn from(e: netaddr2::Error) -> Error {
		match e {
			netaddr2::Error::ParseError(e) => Error::InvalidNetAddr(e),
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Error {
		Error::Json(e)
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Error {
		Error::Io(e)
	}
}

pub type Result<T> = result::Result<T, Error>;
