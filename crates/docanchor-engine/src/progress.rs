//! Workflow progress reporting.
//!
//! Each workflow reports every state it enters to a `ProgressSink`, ending
//! with exactly one terminal `Succeeded` or `Failed` event.

use docanchor_core::{Digest, Outcome};
use serde::Serialize;
use tokio::sync::mpsc;

/// Digest prefix length shown in progress messages
const SHORT_DIGEST_LEN: usize = 10;

/// States of the Issuance and Verification state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    DigestComputing,
    AwaitingAuthorization,
    AwaitingConfirmation,
    Querying,
    Succeeded,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Succeeded | WorkflowState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub state: WorkflowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

impl ProgressEvent {
    pub fn new(state: WorkflowState) -> Self {
        Self {
            state,
            digest: None,
            tx_id: None,
        }
    }

    pub fn with_digest(mut self, digest: &Digest) -> Self {
        self.digest = Some(digest.clone());
        self
    }

    pub fn with_tx_id(mut self, tx_id: &str) -> Self {
        self.tx_id = Some(tx_id.to_string());
        self
    }

    /// Terminal event for `outcome`
    pub fn terminal(outcome: &Outcome, digest: Option<&Digest>) -> Self {
        let state = if outcome.is_success() {
            WorkflowState::Succeeded
        } else {
            WorkflowState::Failed
        };
        Self {
            state,
            digest: digest.cloned(),
            tx_id: match outcome {
                Outcome::Success {
                    commitment: Some(c),
                    ..
                } => Some(c.tx_id.clone()),
                _ => None,
            },
        }
    }

    /// Status line for interactive displays
    pub fn message(&self) -> String {
        let short = self
            .digest
            .as_ref()
            .map(|d| format!("{}...", d.short(SHORT_DIGEST_LEN)))
            .unwrap_or_default();
        match self.state {
            WorkflowState::DigestComputing => "Calculating document hash...".to_string(),
            WorkflowState::AwaitingAuthorization => {
                format!("Hash calculated ({}). Awaiting authorization...", short)
            }
            WorkflowState::AwaitingConfirmation => format!(
                "Transaction sent! Waiting for confirmation (Tx: {})",
                self.tx_id.as_deref().unwrap_or("unknown")
            ),
            WorkflowState::Querying => format!("Hash calculated ({}). Querying ledger...", short),
            WorkflowState::Succeeded => "Done.".to_string(),
            WorkflowState::Failed => "Failed.".to_string(),
        }
    }
}

/// Receiver of workflow progress
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Forwards progress into an unbounded channel
///
/// A dropped receiver is not an error; the workflow keeps running.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanchor_core::compute_digest_bytes;

    #[test]
    fn test_authorization_message_shows_short_digest() {
        let event = ProgressEvent::new(WorkflowState::AwaitingAuthorization)
            .with_digest(&compute_digest_bytes(b"hello"));
        assert_eq!(
            event.message(),
            "Hash calculated (2cf24dba5f...). Awaiting authorization..."
        );
    }

    #[test]
    fn test_confirmation_message_names_tx() {
        let event = ProgressEvent::new(WorkflowState::AwaitingConfirmation).with_tx_id("0xabc");
        assert!(event.message().contains("(Tx: 0xabc)"));
    }

    #[test]
    fn test_terminal_state_follows_outcome() {
        let event = ProgressEvent::terminal(&Outcome::UserCancelled, None);
        assert_eq!(event.state, WorkflowState::Failed);
        assert!(event.state.is_terminal());
    }

    #[test]
    fn test_channel_survives_dropped_receiver() {
        let (sink, rx) = ChannelProgress::new();
        drop(rx);
        sink.report(ProgressEvent::new(WorkflowState::DigestComputing));
    }

    #[test]
    fn test_closure_sink() {
        let seen = std::sync::Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| seen.lock().unwrap().push(event.state);
        sink.report(ProgressEvent::new(WorkflowState::Querying));
        assert_eq!(*seen.lock().unwrap(), vec![WorkflowState::Querying]);
    }
}
