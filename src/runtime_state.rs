use std::collections::VecDeque;

use super::*;

/// A form submission the page let through. It is recorded instead
/// of navigating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub method: String,
    pub entries: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn values_of(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedWindow {
    pub url: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: String,
    pub behavior: String,
    pub block: String,
}

impl ScrollRequest {
    pub(crate) fn smooth_to_start(target: String) -> Self {
        Self {
            target,
            behavior: "smooth".into(),
            block: "start".into(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PlatformState {
    pub(crate) submissions: Vec<FormSubmission>,
    pub(crate) opened_windows: Vec<OpenedWindow>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl TraceState {
    /// Every line goes to the `log` facade; the in-memory buffer only fills
    /// while tracing is enabled.
    pub(crate) fn push(&mut self, line: String) {
        log::debug!("{line}");
        if !self.enabled {
            return;
        }
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn push_event(&mut self, line: String) {
        if self.events {
            self.push(line);
        }
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }
}
