use std::collections::VecDeque;

use chrono::Local;

use crate::feed::FeedEvent;
use crate::view::Renderer;

pub const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Waiting,
    Pending,
    Live,
}

pub struct AppState {
    pub renderer: Renderer,
    pub source_label: String,
    pub feed_status: FeedStatus,
    pub snapshots_applied: u64,
    pub failures: u64,
    pub logs: VecDeque<String>,
    pub show_console: bool,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(renderer: Renderer, source_label: impl Into<String>) -> Self {
        Self {
            renderer,
            source_label: source_label.into(),
            feed_status: FeedStatus::Waiting,
            snapshots_applied: 0,
            failures: 0,
            logs: VecDeque::new(),
            show_console: true,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_event(state: &mut AppState, event: FeedEvent) {
    match event {
        FeedEvent::Snapshot(snapshot) => {
            state.renderer.render(&snapshot);
            state.snapshots_applied += 1;
            if state.feed_status != FeedStatus::Live {
                state.push_log(format!(
                    "[INFO] Live snapshot received (iteration {})",
                    snapshot.iteration
                ));
            }
            state.feed_status = FeedStatus::Live;
        }
        FeedEvent::Pending => {
            // Keep whatever is on screen; only note that the agent has nothing yet.
            if state.feed_status == FeedStatus::Waiting {
                state.feed_status = FeedStatus::Pending;
                state.push_log("[INFO] Endpoint has no snapshot yet");
            }
        }
        FeedEvent::Failed { summary, details } => {
            state.failures += 1;
            state.push_log(format!("[WARN] {summary}"));
            for detail in details {
                state.push_log(format!("[WARN]   {detail}"));
            }
        }
        FeedEvent::Log(line) => state.push_log(line),
    }
}
