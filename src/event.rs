use core::convert::TryFrom;
use core::fmt;

use chrono::NaiveDateTime;

use regex::{Captures, Regex};

/// Marker every line emitted by the authentication subsystem carries.
const DOVECOT: &'static str = "dovecot";

const POP3_LOGIN: &'static str = "pop3-login";
const IMAP_LOGIN: &'static str = "imap-login";
const LOGIN: &'static str = "Login:";
const PASSWORD_MISMATCH: &'static str = "Password mismatch";
const AUTH_FAILED: &'static str = "Connection closed (auth failed";

// Syslog pads single-digit days with a second space ("Jan  5").
const TIMESTAMP: &'static str = "^(?P<timestamp>\\w+\\s+\\d+\\s+\\d+:\\d+:\\d+)";
const USER: &'static str = "user=<(?P<user>[^>]+)>";
const RIP: &'static str = "rip=(?P<ip>[0-9.]+)";
const SQL_USER_IP: &'static str = "sql\\((?P<user>[^,]+),(?P<ip>[0-9.]+)";

lazy_static::lazy_static! {
	static ref TIMESTAMP_RE: Regex = Regex::new(TIMESTAMP).unwrap();
	static ref USER_RE: Regex = Regex::new(USER).unwrap();
	static ref RIP_RE: Regex = Regex::new(RIP).unwrap();
	static ref SQL_USER_IP_RE: Regex = Regex::new(SQL_USER_IP).unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
	Successful,
	Failed,
}

impl Status {
	pub fn label(self) -> &'static str {
		match self {
			Self::Successful => "SUCCESSFUL",
			Self::Failed => "FAILED",
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.pad(self.label())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
	Pop3,
	Imap,
	/// Failure reported by the SQL password check, before any frontend is
	/// known.
	Auth,
}

impl Service {
	pub fn label(self) -> &'static str {
		match self {
			Self::Pop3 => "POP3",
			Self::Imap => "IMAP",
			Self::Auth => "AUTH",
		}
	}
}

impl fmt::Display for Service {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.pad(self.label())
	}
}

/// The recognized kinds of authentication log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
	Login(Service),
	PasswordMismatch,
	AuthAborted(Service),
}

impl Shape {
	/// Picks the shape of a relevant line. The first matching rule wins, so a
	/// line is never considered for a later shape once an earlier one matched.
	pub fn classify(line: &str) -> Option<Shape> {
		if line.contains(LOGIN) && (line.contains(POP3_LOGIN) || line.contains(IMAP_LOGIN)) {
			let service: Service = if line.contains(POP3_LOGIN) {
				Service::Pop3
			} else {
				Service::Imap
			};
			Some(Shape::Login(service))
		} else if line.contains(PASSWORD_MISMATCH) {
			Some(Shape::PasswordMismatch)
		} else if line.contains(AUTH_FAILED) {
			// POP3 is the fallback here, even without a pop3-login marker.
			let service: Service = if line.contains(IMAP_LOGIN) {
				Service::Imap
			} else {
				Service::Pop3
			};
			Some(Shape::AuthAborted(service))
		} else {
			None
		}
	}

	/// Pulls `(user, ip)` out of a line of this shape.
	pub fn extract<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
		match self {
			Shape::Login(_) | Shape::AuthAborted(_) => {
				let user: &str = USER_RE.captures(line)?.name("user")?.as_str();
				let ip: &str = RIP_RE.captures(line)?.name("ip")?.as_str();
				Some((user, ip))
			}
			Shape::PasswordMismatch => {
				let captures: Captures = SQL_USER_IP_RE.captures(line)?;
				Some((captures.name("user")?.as_str(), captures.name("ip")?.as_str()))
			}
		}
	}

	pub fn status(self) -> Status {
		match self {
			Shape::Login(_) => Status::Successful,
			Shape::PasswordMismatch | Shape::AuthAborted(_) => Status::Failed,
		}
	}

	pub fn service(self) -> Service {
		match self {
			Shape::Login(service) | Shape::AuthAborted(service) => service,
			Shape::PasswordMismatch => Service::Auth,
		}
	}
}

/// Why a line produced no candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Skip {
	NotDovecot,
	NoTimestamp,
	UnknownShape,
	MissingFields(Shape),
}

impl fmt::Display for Skip {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::NotDovecot => write!(f, "not a dovecot line"),
			Self::NoTimestamp => write!(f, "no leading timestamp"),
			Self::UnknownShape => write!(f, "not a login or failure"),
			Self::MissingFields(shape) => write!(f, "{:?} line without user/ip", shape),
		}
	}
}

/// A classified line whose fields were extracted but which has not yet been
/// checked against the exclusion set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<'a> {
	pub timestamp: &'a str,
	pub user: &'a str,
	pub ip: &'a str,
	pub shape: Shape,
}

impl<'a> TryFrom<&'a str> for Candidate<'a> {
	type Error = Skip;

	fn try_from(line: &'a str) -> Result<Candidate<'a>, Skip> {
		if !line.contains(DOVECOT) {
			return Err(Skip::NotDovecot);
		}

		let timestamp: &str = TIMESTAMP_RE
			.captures(line)
			.and_then(|c| c.name("timestamp"))
			.ok_or(Skip::NoTimestamp)?
			.as_str();

		let shape: Shape = Shape::classify(line).ok_or(Skip::UnknownShape)?;
		let (user, ip) = shape.extract(line).ok_or(Skip::MissingFields(shape))?;

		Ok(Candidate {
			timestamp,
			user,
			ip,
			shape,
		})
	}
}

impl Candidate<'_> {
	pub fn into_event(self) -> LoginEvent {
		LoginEvent {
			timestamp: self.timestamp.to_string(),
			user: self.user.to_string(),
			ip: self.ip.to_string(),
			status: self.shape.status(),
			service: self.shape.service(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginEvent {
	timestamp: String,
	user: String,
	ip: String,
	status: Status,
	service: Service,
}

impl LoginEvent {
	pub fn new(timestamp: &str, user: &str, ip: &str, status: Status, service: Service) -> LoginEvent {
		LoginEvent {
			timestamp: timestamp.to_string(),
			user: user.to_string(),
			ip: ip.to_string(),
			status,
			service,
		}
	}

	pub fn timestamp(&self) -> &str {
		&self.timestamp
	}

	pub fn user(&self) -> &str {
		&self.user
	}

	pub fn ip(&self) -> &str {
		&self.ip
	}

	pub fn status(&self) -> Status {
		self.status
	}

	pub fn service(&self) -> Service {
		self.service
	}

	/// Syslog timestamps carry no year; resolve against the given one.
	pub fn datetime(&self, year: i32) -> Option<NaiveDateTime> {
		let normalized: String = self.timestamp.split_whitespace().collect::<Vec<&str>>().join(" ");

		NaiveDateTime::parse_from_str(&format!("{} {}", year, normalized), "%Y %b %d %H:%M:%S").ok()
	}
}
