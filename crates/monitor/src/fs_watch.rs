use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileChange {
    Changed,
    Removed,
}

/// Watches the directory holding the rule file and reports settled changes
/// to that one file.
pub struct RulesWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    rules_file: PathBuf,
    file_name: OsString,
    debounce: Duration,
}

impl RulesWatcher {
    pub fn new(rules_file: &Path, debounce: Duration) -> Result<Self> {
        let file_name = rules_file
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| anyhow::anyhow!("{} is not a file path", rules_file.display()))?;
        let directory = match rules_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (sender, receiver) = channel();
        let mut watcher = RecommendedWatcher::new(sender, notify::Config::default())
            .context("create rule file watcher")?;
        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("watch {}", directory.display()))?;

        Ok(Self {
            _watcher: watcher,
            receiver,
            rules_file: rules_file.to_path_buf(),
            file_name,
            debounce,
        })
    }

    pub fn rules_file(&self) -> &Path {
        &self.rules_file
    }

    /// Waits up to `timeout` for the rule file to change. Bursts of events
    /// (editors often write, rename and chmod in quick succession) are folded
    /// into one change once `debounce` passes without further events.
    pub fn next_change(&mut self, timeout: Duration) -> Option<RuleFileChange> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(Ok(event)) if self.concerns_rules_file(&event) => break,
                Ok(Ok(_)) => continue,
                Ok(Err(error)) => warn!(%error, "rule file watch error"),
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }

        self.settle();
        let change = if self.rules_file.exists() {
            RuleFileChange::Changed
        } else {
            RuleFileChange::Removed
        };
        debug!(path = %self.rules_file.display(), ?change, "rule file changed");
        Some(change)
    }

    fn settle(&mut self) {
        while let Ok(event) = self.receiver.recv_timeout(self.debounce) {
            if let Err(error) = event {
                warn!(%error, "rule file watch error");
            }
        }
    }

    fn concerns_rules_file(&self, event: &Event) -> bool {
        is_relevant_kind(&event.kind)
            && event
                .paths
                .iter()
                .any(|path| path.file_name() == Some(self.file_name.as_os_str()))
    }
}

fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}
