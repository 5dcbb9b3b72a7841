//! Minimal logging.
//!
//! Library code reports progress through `info`/`warn`/`error` instead of
//! printing. Without subscribers, warnings and errors go to stderr and info
//! messages only when verbose output is on. Subscribers (tests, embedding
//! applications) receive every message.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub text: String,
}

impl std::fmt::Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            Level::Info => write!(f, "{}", self.text),
            Level::Warn => write!(f, "warning: {}", self.text),
            Level::Error => write!(f, "error: {}", self.text),
        }
    }
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static SUBSCRIBERS: Lazy<Mutex<Vec<(usize, Sender<LogMessage>)>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

fn subscribers() -> MutexGuard<'static, Vec<(usize, Sender<LogMessage>)>> {
    // A panic while holding the lock cannot leave the list inconsistent.
    SUBSCRIBERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A subscription to console log messages.
///
/// Dropping this value unsubscribes it.
pub struct Subscription {
    id: usize,
    rx: Receiver<LogMessage>,
}

impl Subscription {
    pub fn drain(&self) -> Vec<LogMessage> {
        self.rx.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        subscribers().retain(|(id, _)| *id != self.id);
    }
}

pub fn subscribe() -> Subscription {
    let (tx, rx) = mpsc::channel();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    subscribers().push((id, tx));
    Subscription { id, rx }
}

pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn info(msg: impl Into<String>) {
    publish(Level::Info, msg.into());
}

pub fn warn(msg: impl Into<String>) {
    publish(Level::Warn, msg.into());
}

pub fn error(msg: impl Into<String>) {
    publish(Level::Error, msg.into());
}

fn publish(level: Level, text: String) {
    let message = LogMessage { level, text };

    let mut subs = subscribers();
    if subs.is_empty() {
        if message.level != Level::Info || verbose() {
            eprintln!("{}", message);
        }
        return;
    }

    // Broadcast to all subscribers; drop any that have gone away.
    subs.retain(|(_, tx)| tx.send(message.clone()).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_receives_warn_messages() {
        let sub = subscribe();
        warn("hello");

        let msgs = sub.drain();
        assert!(msgs.iter().any(|m| m.level == Level::Warn && m.text == "hello"));
    }

    #[test]
    fn stderr_lines_are_prefixed_by_level() {
        let warning = LogMessage {
            level: Level::Warn,
            text: "no .env".into(),
        };
        assert_eq!(warning.to_string(), "warning: no .env");
        let note = LogMessage {
            level: Level::Info,
            text: "wrote out.yaml".into(),
        };
        assert_eq!(note.to_string(), "wrote out.yaml");
    }

    #[test]
    fn subscribers_see_info_regardless_of_verbosity() {
        let sub = subscribe();
        info("estimated key: C major");

        let msgs = sub.drain();
        assert!(msgs
            .iter()
            .any(|m| m.level == Level::Info && m.text == "estimated key: C major"));
    }
}
