//! Resolution of the `--exclude-ips` argument into a set of addresses.
//!
//! The argument is either a path to a list file (one address per line, `#`
//! comments and blank lines ignored), a comma-separated list, or a single
//! address. Membership is exact string comparison.

use core::fmt;
use core::iter::FromIterator;
use std::collections::HashSet;
use std::net::IpAddr;
use std::path::Path;

use netaddr2::NetAddr;
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
	entries: Vec<String>,
	lookup: HashSet<String>,
}

impl ExclusionSet {
	/// Resolves the argument and refuses an empty result.
	pub fn resolve(input: &str) -> Result<ExclusionSet> {
		let set: ExclusionSet = ExclusionSet::load(input)?;

		if set.is_empty() {
			return Err(Error::EmptyExclusionSet(input.to_string()));
		}

		Ok(set)
	}

	/// Reads `input` as a list file if it names one, otherwise as literal
	/// addresses.
	pub fn load(input: &str) -> Result<ExclusionSet> {
		let path: &Path = Path::new(input);

		if path.is_file() {
			let content: String =
				std::fs::read_to_string(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;
			let set: ExclusionSet = ExclusionSet::parse_list(&content);
			info!("loaded {} excluded addresses from {}", set.len(), path.display());
			Ok(set)
		} else {
			Ok(ExclusionSet::parse_literal(input))
		}
	}

	pub fn parse_list(content: &str) -> ExclusionSet {
		content
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty() && !line.starts_with('#'))
			.map(String::from)
			.collect()
	}

	pub fn parse_literal(input: &str) -> ExclusionSet {
		if input.contains(',') {
			input
				.split(',')
				.map(str::trim)
				// Blank pieces are dropped, also from the displayed list, so
				// an argument made only of commas resolves to nothing.
				.filter(|ip| !ip.is_empty())
				.map(String::from)
				.collect()
		} else {
			let ip: &str = input.trim();
			if ip.is_empty() {
				ExclusionSet::default()
			} else {
				core::iter::once(ip.to_string()).collect()
			}
		}
	}

	pub fn contains(&self, ip: &str) -> bool {
		self.lookup.contains(ip)
	}

	/// Number of distinct addresses.
	pub fn len(&self) -> usize {
		self.lookup.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lookup.is_empty()
	}

	/// Entries in the order they were given, duplicates included.
	pub fn entries(&self) -> &[String] {
		&self.entries
	}
}

impl FromIterator<String> for ExclusionSet {
	fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> ExclusionSet {
		let mut set: ExclusionSet = ExclusionSet::default();

		for entry in iter {
			if let Err(e) = check_entry(&entry) {
				warn!("{}; it will only match identical text", e);
			}
			set.lookup.insert(entry.clone());
			set.entries.push(entry);
		}

		set
	}
}

impl fmt::Display for ExclusionSet {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.entries.join(", "))
	}
}

/// Entries are matched as plain text; this only flags ones that will never
/// match a captured address.
fn check_entry(entry: &str) -> Result<()> {
	if entry.contains('/') {
		let net: NetAddr = entry.parse::<NetAddr>()?;
		return Err(Error::InvalidNetAddr(format!(
			"{} is a network ({:?}), ranges are not expanded",
			entry, net
		)));
	}

	entry
		.parse::<IpAddr>()
		.map(|_| ())
		.map_err(|e| Error::InvalidNetAddr(format!("{}: {}", entry, e)))
}
