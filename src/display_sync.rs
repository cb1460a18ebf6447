//! Best-effort synchronization with an external ambient display.
//!
//! Commands are queued to a single background worker that POSTs them as small JSON
//! bodies in the order they were sent. Nothing on the timer path ever waits for the
//! response, and failures only reach the log.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Commands waiting for delivery before new ones are dropped
const QUEUE_DEPTH: usize = 32;

/// Highest reminder index the display knows how to play
pub const MAX_DISPLAY_INDEX: u8 = 5;

/// Named commands understood by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Idle, nothing running
    Default,
    /// A task started or resumed with no reminders fired yet
    TaskInitial,
    /// 1-based reminder index, capped at `MAX_DISPLAY_INDEX`
    PlayReminder(u8),
    Overdue,
    Pause,
    MindfulBreak,
}

#[derive(Debug, Serialize)]
struct DisplayPayload {
    command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u8>,
}

impl DisplayCommand {
    /// Build a reminder command, clamping the index into the display's range
    pub fn reminder(fired: usize) -> Self {
        let index = fired.clamp(1, MAX_DISPLAY_INDEX as usize) as u8;
        Self::PlayReminder(index)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::TaskInitial => "task_initial",
            Self::PlayReminder(_) => "play_reminder",
            Self::Overdue => "overdue",
            Self::Pause => "pause",
            Self::MindfulBreak => "mindful_break",
        }
    }

    fn payload(&self) -> DisplayPayload {
        let index = match self {
            Self::PlayReminder(index) => Some(*index),
            _ => None,
        };
        DisplayPayload {
            command: self.name(),
            index,
        }
    }
}

/// Port the engine notifies on state transitions
pub trait DisplaySync {
    /// Hand a command off for delivery. Must not block on the network.
    fn send(&self, command: DisplayCommand) -> Result<()>;
}

/// Used when no endpoint is configured
pub struct NoopDisplay;

impl DisplaySync for NoopDisplay {
    fn send(&self, _command: DisplayCommand) -> Result<()> {
        Ok(())
    }
}

/// Delivers queued commands one at a time on a dedicated thread
///
/// Dropping the worker closes the queue and waits for what is already queued,
/// each delivery bounded by the HTTP client's timeout.
struct DisplayWorker {
    sender: Option<SyncSender<DisplayCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl DisplayWorker {
    fn spawn<F>(mut deliver: F) -> Result<Self>
    where
        F: FnMut(DisplayCommand) + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel::<DisplayCommand>(QUEUE_DEPTH);
        let handle = thread::Builder::new()
            .name("display-sync".to_string())
            .spawn(move || {
                for command in receiver {
                    deliver(command);
                }
            })
            .context("Failed to spawn display sync thread")?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    fn push(&self, command: DisplayCommand) -> Result<()> {
        let Some(sender) = &self.sender else {
            anyhow::bail!("display sync worker is closed");
        };
        match sender.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(command)) => {
                warn!("display sync queue full, dropping {}", command.name());
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => anyhow::bail!("display sync worker stopped"),
        }
    }
}

impl Drop for DisplayWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("display sync worker panicked");
            }
        }
    }
}

/// POSTs each command to a configured endpoint, in order, without blocking the caller
pub struct HttpDisplay {
    worker: DisplayWorker,
}

impl HttpDisplay {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(endpoint)
            .with_context(|| format!("Invalid display endpoint: {}", endpoint))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Display endpoint must be http(s): {}", endpoint);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build display sync client")?;

        let worker = DisplayWorker::spawn(move |command| post_command(&client, &parsed, command))?;
        Ok(Self { worker })
    }
}

fn post_command(client: &reqwest::blocking::Client, endpoint: &reqwest::Url, command: DisplayCommand) {
    let payload = command.payload();
    match client.post(endpoint.clone()).json(&payload).send() {
        Ok(resp) if resp.status().is_success() => {
            debug!("display sync delivered {}", payload.command);
        }
        Ok(resp) => {
            warn!("display sync rejected {}: {}", payload.command, resp.status());
        }
        Err(err) => {
            warn!("display sync unreachable for {}: {}", payload.command, err);
        }
    }
}

impl DisplaySync for HttpDisplay {
    fn send(&self, command: DisplayCommand) -> Result<()> {
        self.worker.push(command)
    }
}

/// Pick the display port for the configured endpoint, falling back to no-op
pub fn display_for_endpoint(endpoint: Option<&str>, timeout: Duration) -> Box<dyn DisplaySync> {
    match endpoint {
        Some(url) => match HttpDisplay::new(url, timeout) {
            Ok(display) => Box::new(display),
            Err(err) => {
                warn!("display sync disabled: {:#}", err);
                Box::new(NoopDisplay)
            }
        },
        None => Box::new(NoopDisplay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(DisplayCommand::Default.name(), "default");
        assert_eq!(DisplayCommand::TaskInitial.name(), "task_initial");
        assert_eq!(DisplayCommand::PlayReminder(2).name(), "play_reminder");
        assert_eq!(DisplayCommand::Overdue.name(), "overdue");
        assert_eq!(DisplayCommand::Pause.name(), "pause");
        assert_eq!(DisplayCommand::MindfulBreak.name(), "mindful_break");
    }

    #[test]
    fn test_reminder_index_is_capped() {
        assert_eq!(DisplayCommand::reminder(1), DisplayCommand::PlayReminder(1));
        assert_eq!(DisplayCommand::reminder(5), DisplayCommand::PlayReminder(5));
        assert_eq!(DisplayCommand::reminder(9), DisplayCommand::PlayReminder(5));
    }

    #[test]
    fn test_payload_json() {
        let json = serde_json::to_string(&DisplayCommand::PlayReminder(3).payload()).unwrap();
        assert_eq!(json, r#"{"command":"play_reminder","index":3}"#);

        let json = serde_json::to_string(&DisplayCommand::Overdue.payload()).unwrap();
        assert_eq!(json, r#"{"command":"overdue"}"#);
    }

    #[test]
    fn test_http_display_rejects_bad_endpoints() {
        assert!(HttpDisplay::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpDisplay::new("ftp://pi.local/display", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_unreachable_endpoint_does_not_fail_send() {
        // Port 9 (discard) on localhost is almost never listening; the error stays on the worker
        let display = HttpDisplay::new("http://127.0.0.1:9/display", Duration::from_millis(200))
            .unwrap();
        assert!(display.send(DisplayCommand::TaskInitial).is_ok());
    }

    fn recording_worker(
        delay: Duration,
    ) -> (DisplayWorker, std::sync::Arc<std::sync::Mutex<Vec<DisplayCommand>>>) {
        let delivered = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = delivered.clone();
        let worker = DisplayWorker::spawn(move |command| {
            thread::sleep(delay);
            sink.lock().unwrap().push(command);
        })
        .unwrap();
        (worker, delivered)
    }

    #[test]
    fn test_worker_delivers_in_send_order() {
        let (worker, delivered) = recording_worker(Duration::from_millis(5));
        let sent = [
            DisplayCommand::TaskInitial,
            DisplayCommand::Overdue,
            DisplayCommand::PlayReminder(1),
            DisplayCommand::Pause,
            DisplayCommand::Default,
        ];
        for command in sent {
            worker.push(command).unwrap();
        }
        drop(worker);

        assert_eq!(*delivered.lock().unwrap(), sent.to_vec());
    }

    #[test]
    fn test_worker_drains_queue_on_drop() {
        let (worker, delivered) = recording_worker(Duration::from_millis(20));
        worker.push(DisplayCommand::TaskInitial).unwrap();
        worker.push(DisplayCommand::Pause).unwrap();
        drop(worker);

        assert_eq!(
            *delivered.lock().unwrap(),
            vec![DisplayCommand::TaskInitial, DisplayCommand::Pause]
        );
    }

    #[test]
    fn test_full_queue_drops_newest_without_failing() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let delivered = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = delivered.clone();
        let worker = DisplayWorker::spawn(move |command| {
            // Blocks until the gate closes
            let _ = gate_rx.recv();
            sink.lock().unwrap().push(command);
        })
        .unwrap();

        let total = QUEUE_DEPTH + 8;
        for index in 0..total {
            assert!(worker.push(DisplayCommand::reminder(index + 1)).is_ok());
        }
        drop(gate_tx);
        drop(worker);

        let delivered = delivered.lock().unwrap();
        assert!(delivered.len() >= QUEUE_DEPTH);
        assert!(delivered.len() < total);
        assert_eq!(delivered[0], DisplayCommand::PlayReminder(1));
    }

    #[test]
    fn test_display_for_endpoint_falls_back_to_noop() {
        let display = display_for_endpoint(Some("::nope::"), Duration::from_secs(1));
        assert!(display.send(DisplayCommand::Default).is_ok());
    }
}
