use core::convert::TryFrom;
use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::event::{Candidate, LoginEvent, Skip, Status};
use crate::exclusion::ExclusionSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
	pub successful: usize,
	pub failed: usize,
	pub unique_ips: usize,
	pub unique_users: usize,
}

impl Summary {
	pub fn of(events: &[LoginEvent]) -> Summary {
		let mut summary: Summary = Summary::default();
		let mut ips: HashSet<&str> = HashSet::new();
		let mut users: HashSet<&str> = HashSet::new();

		for event in events {
			match event.status() {
				Status::Successful => summary.successful += 1,
				Status::Failed => summary.failed += 1,
			}
			ips.insert(event.ip());
			users.insert(event.user());
		}

		summary.unique_ips = ips.len();
		summary.unique_users = users.len();
		summary
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
	pub events: Vec<LoginEvent>,
	pub summary: Summary,
}

impl Report {
	pub fn new(events: Vec<LoginEvent>) -> Report {
		let summary: Summary = Summary::of(&events);
		Report { events, summary }
	}
}

/// Runs every line through classification, extraction and the exclusion
/// check. Lines are independent; nothing carries over from one to the next.
pub fn analyze<'a, I>(lines: I, excluded: &ExclusionSet) -> Report
where
	I: IntoIterator<Item = &'a str>,
{
	let mut events: Vec<LoginEvent> = Vec::new();
	let mut skipped: HashMap<Skip, usize> = HashMap::new();
	let mut excluded_hits: usize = 0;

	for (n, line) in lines.into_iter().enumerate() {
		match Candidate::try_from(line) {
			Ok(candidate) if excluded.contains(candidate.ip) => {
				trace!("line {}: {} excluded", n + 1, candidate.ip);
				excluded_hits += 1;
			}
			Ok(candidate) => events.push(candidate.into_event()),
			Err(skip) => {
				if let Skip::MissingFields(_) = skip {
					trace!("line {}: {}", n + 1, skip);
				}
				*skipped.entry(skip).or_insert(0) += 1;
			}
		}
	}

	debug!(
		"{} events kept, {} excluded, skipped: {:?}",
		events.len(),
		excluded_hits,
		skipped
	);

	Report::new(events)
}
