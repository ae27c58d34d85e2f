//! Output formatting
//!
//! Human mode prints progress to stderr and a one-line summary to stdout.
//! JSON mode prints a single object to stdout and nothing else.

use docanchor_core::{Digest, Outcome};
use docanchor_engine::{NoopProgress, ProgressEvent, ProgressSink};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct OutcomeReport<'a> {
    code: &'static str,
    summary: String,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

#[derive(Debug, Serialize)]
struct DigestReport<'a> {
    digest: &'a Digest,
}

fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

pub fn print_outcome(outcome: &Outcome, json: bool) {
    if json {
        print_json(&OutcomeReport {
            code: outcome.code(),
            summary: outcome.summary(),
            outcome,
        });
    } else {
        println!("{}", outcome.summary());
    }
}

pub fn print_digest(digest: &Digest, json: bool) {
    if json {
        print_json(&DigestReport { digest });
    } else {
        println!("{}", digest);
    }
}

fn print_progress(event: ProgressEvent) {
    if !event.state.is_terminal() {
        eprintln!("{}", event.message());
    }
}

/// Progress sink for the chosen output mode
pub fn progress_sink(json: bool) -> Box<dyn ProgressSink> {
    if json {
        Box::new(NoopProgress)
    } else {
        Box::new(print_progress)
    }
}

/// Process exit code for a workflow outcome
pub fn exit_code(outcome: &Outcome) -> i32 {
    if outcome.is_success() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanchor_core::compute_digest_bytes;

    #[test]
    fn test_report_flattens_outcome() {
        let outcome = Outcome::NotFound {
            digest: compute_digest_bytes(b"hello!"),
        };
        let report = OutcomeReport {
            code: outcome.code(),
            summary: outcome.summary(),
            outcome: &outcome,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "ERR_NOT_FOUND");
        assert_eq!(json["outcome"], "not_found");
        assert!(json["digest"].is_string());
    }

    #[test]
    fn test_only_success_exits_zero() {
        assert_eq!(exit_code(&Outcome::UserCancelled), 1);
        let ok = Outcome::Success {
            digest: compute_digest_bytes(b"x"),
            owner: None,
            commitment: None,
        };
        assert_eq!(exit_code(&ok), 0);
    }
}
