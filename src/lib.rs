//! Login attempts from Dovecot authentication logs, minus excluded sources.

use std::path::Path;

pub mod analysis;
pub mod cli;
pub mod error;
pub mod event;
pub mod exclusion;
pub mod report;
pub mod settings;

pub use analysis::{analyze, Report, Summary};
pub use error::{Error, Result};
pub use event::{LoginEvent, Service, Status};
pub use exclusion::ExclusionSet;

/// Reads a whole log file. Invalid UTF-8 is replaced rather than rejected so a
/// single mangled line cannot abort the run.
pub fn read_log(path: &Path) -> Result<String> {
	let bytes: Vec<u8> = std::fs::read(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;

	Ok(String::from_utf8_lossy(&bytes).into_owned())
}
