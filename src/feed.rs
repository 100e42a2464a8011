use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::http_client::http_client;
use crate::snapshot::GameStateSnapshot;
use crate::validate::{self, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A local source could not serialize the snapshot it serves.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Where raw snapshot bodies come from.
pub trait SnapshotSource {
    fn fetch(&mut self) -> Result<String, FeedError>;

    fn describe(&self) -> String;
}

#[derive(Debug)]
pub enum PollOutcome {
    /// The endpoint has nothing published yet.
    Pending,
    Ready(Box<GameStateSnapshot>),
    Failed(FeedError),
}

#[derive(Debug)]
pub enum FeedEvent {
    Snapshot(Box<GameStateSnapshot>),
    Pending,
    /// A skipped cycle. `details` lists every validation violation, if any.
    Failed {
        summary: String,
        details: Vec<String>,
    },
    Log(String),
}

pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl SnapshotSource for HttpSource {
    fn fetch(&mut self) -> Result<String, FeedError> {
        let client =
            http_client(self.timeout).map_err(|err| FeedError::Network(format!("{err:#}")))?;
        let resp = client
            .get(&self.url)
            .send()
            .map_err(|err| FeedError::Network(format!("request failed: {err}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| FeedError::Network(format!("failed reading body: {err}")))?;
        if !status.is_success() {
            return Err(FeedError::Network(format!(
                "http {}: {}",
                status,
                clip(&body, 120)
            )));
        }
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// One fetch → decode → validate cycle. Never panics and never stops on error.
pub fn poll_once(source: &mut dyn SnapshotSource) -> PollOutcome {
    let body = match source.fetch() {
        Ok(body) => body,
        Err(err) => return PollOutcome::Failed(err),
    };
    if validate::is_pending_body(&body) {
        return PollOutcome::Pending;
    }
    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => return PollOutcome::Failed(FeedError::Decode(err)),
    };
    if validate::is_pending_snapshot(&value) {
        return PollOutcome::Pending;
    }
    match validate::validate_snapshot(&value) {
        Ok(snapshot) => PollOutcome::Ready(Box::new(snapshot)),
        Err(err) => PollOutcome::Failed(FeedError::Validation(err)),
    }
}

pub fn outcome_event(outcome: PollOutcome) -> FeedEvent {
    match outcome {
        PollOutcome::Pending => FeedEvent::Pending,
        PollOutcome::Ready(snapshot) => FeedEvent::Snapshot(snapshot),
        PollOutcome::Failed(FeedError::Validation(err)) => FeedEvent::Failed {
            summary: err.to_string(),
            details: err.violations.iter().map(|v| v.to_string()).collect(),
        },
        PollOutcome::Failed(err) => FeedEvent::Failed {
            summary: err.to_string(),
            details: Vec::new(),
        },
    }
}

/// Polls `source` at a fixed rate until the receiving side hangs up.
pub fn spawn_poller(
    mut source: Box<dyn SnapshotSource + Send>,
    interval: Duration,
    tx: Sender<FeedEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let _ = tx.send(FeedEvent::Log(format!(
            "[INFO] Polling {} every {}ms",
            source.describe(),
            interval.as_millis()
        )));

        loop {
            let started = Instant::now();
            let event = outcome_event(poll_once(source.as_mut()));
            if tx.send(event).is_err() {
                return;
            }
            let wait = interval
                .checked_sub(started.elapsed())
                .unwrap_or(Duration::ZERO);
            thread::sleep(wait);
        }
    })
}

fn clip(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push('…');
    out
}
