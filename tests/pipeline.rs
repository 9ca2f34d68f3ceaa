use std::io::Write;
use std::path::Path;

use dovecot_logins::{analyze, read_log, report, Error, ExclusionSet, Service, Status};

const MAIL_LOG: &str = "\
Jan  5 09:59:58 mx postfix/smtpd[311]: connect from unknown[203.0.113.9]
Jan  5 10:00:01 mx dovecot: imap-login: Login: user=<alice>, method=PLAIN, rip=1.2.3.4, lip=10.0.0.1, mpid=101, TLS
Jan  5 10:00:02 mx dovecot: auth-worker(55): sql(bob,5.6.7.8,<aBcD>): Password mismatch
Jan  5 10:00:03 mx dovecot: pop3-login: Disconnected: Connection closed (auth failed, 1 attempts in 2 secs): user=<bob>, method=PLAIN, rip=5.6.7.8, lip=10.0.0.1
Jan  5 10:00:04 mx dovecot: imap-login: Login: user=<monitor>, method=PLAIN, rip=10.0.0.250, lip=10.0.0.1
Jan  5 10:00:05 mx dovecot: imap(alice): Logged out in=100 out=200
Jan 15 11:30:00 mx dovecot: pop3-login: Login: user=<carol>, method=PLAIN, rip=198.51.100.7, lip=10.0.0.1
";

fn write_temp(content: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(content.as_bytes()).unwrap();
	file
}

#[test]
fn excludes_addresses_listed_in_a_file() {
	let log = write_temp(MAIL_LOG);
	let list = write_temp("# internal monitoring\n10.0.0.250\n\n");

	let excluded = ExclusionSet::resolve(list.path().to_str().unwrap()).unwrap();
	let content = read_log(log.path()).unwrap();
	let report = analyze(content.lines(), &excluded);

	let users: Vec<&str> = report.events.iter().map(|e| e.user()).collect();
	assert_eq!(users, ["alice", "bob", "bob", "carol"]);
	assert_eq!(report.events[1].service(), Service::Auth);
	assert_eq!(report.events[2].service(), Service::Pop3);
	assert_eq!(report.events[3].timestamp(), "Jan 15 11:30:00");
	assert_eq!(report.summary.successful, 2);
	assert_eq!(report.summary.failed, 2);
	assert_eq!(report.summary.unique_ips, 3);
	assert_eq!(report.summary.unique_users, 3);
}

#[test]
fn output_is_a_subsequence_of_the_log() {
	let excluded = ExclusionSet::parse_literal("5.6.7.8");
	let report = analyze(MAIL_LOG.lines(), &excluded);

	let mut lines = MAIL_LOG.lines();
	for event in &report.events {
		assert!(
			lines.any(|line| line.starts_with(event.timestamp()) && line.contains(event.ip())),
			"{:?} out of order",
			event
		);
	}
	assert!(report.events.iter().all(|e| e.ip() != "5.6.7.8"));
	assert!(report.events.iter().all(|e| e.status() == Status::Successful));
}

#[test]
fn text_report_for_a_file() {
	let log = write_temp(MAIL_LOG);
	let excluded = ExclusionSet::resolve("10.0.0.250, 198.51.100.7").unwrap();
	let report = analyze(read_log(log.path()).unwrap().lines(), &excluded);

	let mut out: Vec<u8> = Vec::new();
	report::write_text(&mut out, Path::new("mail.log"), &excluded, &report).unwrap();
	let text = String::from_utf8(out).unwrap();

	assert!(text.contains("Login attempts found: 3\n"));
	assert!(text.contains("Excluded IPs: 10.0.0.250, 198.51.100.7\n"));
	assert!(text.contains("- Failed logins: 2\n"));
	assert!(!text.contains("monitor"));
}

#[test]
fn missing_log_file_is_a_read_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.log");

	match read_log(&path) {
		Err(Error::Read(p, _)) => assert_eq!(p, path),
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn invalid_utf8_does_not_hide_other_lines() {
	let mut bytes: Vec<u8> = b"Jan  5 10:00:00 mx dovecot: \xff\xfe junk\n".to_vec();
	bytes.extend_from_slice(
		b"Jan  5 10:00:01 mx dovecot: imap-login: Login: user=<alice>, method=PLAIN, rip=1.2.3.4\n",
	);
	let mut log = tempfile::NamedTempFile::new().unwrap();
	log.write_all(&bytes).unwrap();

	let excluded = ExclusionSet::parse_literal("9.9.9.9");
	let report = analyze(read_log(log.path()).unwrap().lines(), &excluded);

	assert_eq!(report.events.len(), 1);
	assert_eq!(report.events[0].user(), "alice");
}
