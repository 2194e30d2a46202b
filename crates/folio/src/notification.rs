//! User-facing notifications.
//!
//! Operations driven through a [`Catalog`](crate::session::Catalog) report their outcome as a
//! [`Notification`] instead of an error, so a front end can show a short message and carry on.
//! Where notifications go is up to the [`Notifier`]:
//!
//! - [`TracingNotifier`] writes them to the log
//! - [`RecordingNotifier`] keeps them in memory
//! - front ends implement the trait to render them

use std::sync::Mutex;

use super::*;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  /// An operation completed
  Success,
  /// Neutral information, such as an empty result
  Info,
  /// An operation failed
  Error,
}

/// A short, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  /// Severity
  pub level:       Level,
  /// Headline, e.g. "Success"
  pub title:       String,
  /// Detail line
  pub description: String,
}

impl Notification {
  /// A success notification.
  pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self { level: Level::Success, title: title.into(), description: description.into() }
  }

  /// An informational notification.
  pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self { level: Level::Info, title: title.into(), description: description.into() }
  }

  /// An error notification.
  pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self { level: Level::Error, title: title.into(), description: description.into() }
  }

  /// The error notification shown for `err`.
  pub fn from_error(err: &FolioError) -> Self {
    match err {
      FolioError::AuthenticationRequired => {
        Self::error("Authentication required", "Please log in first")
      },
      other => Self::error("Error", other.to_string()),
    }
  }
}

/// Receives notifications.
pub trait Notifier {
  /// Delivers one notification.
  fn notify(&self, notification: Notification);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, notification: Notification) {
    let Notification { level, title, description } = notification;
    match level {
      Level::Success | Level::Info => info!("{title}: {description}"),
      Level::Error => warn!("{title}: {description}"),
    }
  }
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  /// Received notifications, oldest first
  received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
  /// Creates an empty recorder.
  pub fn new() -> Self { Self::default() }

  /// Everything received so far.
  pub fn received(&self) -> Vec<Notification> {
    self.received.lock().map(|received| received.clone()).unwrap_or_default()
  }

  /// Removes and returns everything received so far.
  pub fn take(&self) -> Vec<Notification> {
    self.received.lock().map(|mut received| std::mem::take(&mut *received)).unwrap_or_default()
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, notification: Notification) {
    if let Ok(mut received) = self.received.lock() {
      received.push(notification);
    }
  }
}

impl<N: Notifier + ?Sized> Notifier for &N {
  fn notify(&self, notification: Notification) { (**self).notify(notification) }
}
