//! Reading-mode session control.
//!
//! A [`ReadingSession`] owns the reading state of one page. Hosts feed it
//! key events and external commands; it extracts content on entry and hands
//! the result to a [`Presenter`].
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Document, ExtractionResult, KeyEvent, Presenter, ReadingSession};
//!
//! #[derive(Default)]
//! struct Overlay {
//!     title: Option<String>,
//! }
//!
//! impl Presenter for Overlay {
//!     fn show(&mut self, result: &ExtractionResult) {
//!         self.title = Some(result.title.clone());
//!     }
//!
//!     fn dismiss(&mut self) {
//!         self.title = None;
//!     }
//! }
//!
//! let words = "text ".repeat(80);
//! let html = format!("<html><body><article><h1>Headline Here</h1><p>{}</p></article></body></html>", words);
//! let page = Document::parse_with_url(&html, "https://example.com/story").unwrap();
//!
//! let mut session = ReadingSession::new(Overlay::default());
//! session.handle_key(KeyEvent::new("a"), &page);
//! session.handle_key(KeyEvent::new("a"), &page);
//!
//! assert!(session.is_active());
//! assert_eq!(session.presenter().title.as_deref(), Some("Headline Here"));
//! ```

use std::time::{Duration, Instant};

use crate::parse::Document;
use crate::readmode::ReadMode;
use crate::result::ExtractionResult;

/// Key sequence that toggles reading mode.
pub const TRIGGER_SEQUENCE: &str = "aa";

/// Inactivity after which a partial key sequence is discarded.
pub const SEQUENCE_RESET: Duration = Duration::from_secs(1);

/// External command that toggles reading mode.
pub const TOGGLE_COMMAND: &str = "toggle-reading-mode";

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key value, e.g. `"a"` or `"Shift"`.
    pub key: String,
    /// Whether focus was in an input, textarea or contenteditable element.
    pub editable_target: bool,
    /// When the key was pressed.
    pub at: Instant,
}

impl KeyEvent {
    /// A key pressed now, outside any editable element.
    pub fn new(key: impl Into<String>) -> Self {
        Self::at(key, Instant::now())
    }

    /// A key pressed at `at`, outside any editable element.
    pub fn at(key: impl Into<String>, at: Instant) -> Self {
        Self { key: key.into(), editable_target: false, at }
    }

    /// Marks the event as typed into an editable element.
    pub fn in_editable(mut self) -> Self {
        self.editable_target = true;
        self
    }
}

/// Detects the reading-mode key sequence.
#[derive(Debug, Clone)]
pub struct KeySequence {
    buffer: String,
    last_key: Option<Instant>,
    trigger: String,
    reset_after: Duration,
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::new(TRIGGER_SEQUENCE, SEQUENCE_RESET)
    }
}

impl KeySequence {
    pub fn new(trigger: &str, reset_after: Duration) -> Self {
        Self { buffer: String::new(), last_key: None, trigger: trigger.to_lowercase(), reset_after }
    }

    /// Keys typed so far that could still start the trigger.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Feeds one key event. Returns `true` when it completes the trigger.
    ///
    /// The buffer is compared before it is trimmed, so a trigger can only
    /// complete on a buffer that holds nothing else.
    pub fn feed(&mut self, event: &KeyEvent) -> bool {
        if event.editable_target {
            return false;
        }

        if let Some(last) = self.last_key
            && event.at.saturating_duration_since(last) >= self.reset_after
        {
            self.buffer.clear();
        }

        self.buffer.push_str(&event.key.to_lowercase());

        if self.buffer == self.trigger {
            self.reset();
            return true;
        }

        let keep = self.trigger.chars().count();
        let len = self.buffer.chars().count();
        if len > keep {
            self.buffer = self.buffer.chars().skip(len - keep).collect();
        }
        self.last_key = Some(event.at);

        false
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_key = None;
    }
}

/// Displays and removes the reading view.
pub trait Presenter {
    /// Shows the reading view for `result`.
    fn show(&mut self, result: &ExtractionResult);

    /// Removes the reading view.
    fn dismiss(&mut self);
}

/// Reading state of a page.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Active(Box<ExtractionResult>),
}

/// Reading-mode state machine for one page.
pub struct ReadingSession<P: Presenter> {
    presenter: P,
    reader: ReadMode,
    keys: KeySequence,
    state: SessionState,
}

impl<P: Presenter> ReadingSession<P> {
    /// Creates an inactive session with the built-in site table.
    pub fn new(presenter: P) -> Self {
        Self::with_reader(presenter, ReadMode::new())
    }

    /// Creates an inactive session that extracts with `reader`.
    pub fn with_reader(presenter: P, reader: ReadMode) -> Self {
        Self { presenter, reader, keys: KeySequence::default(), state: SessionState::Inactive }
    }

    /// Replaces the key-sequence detector.
    pub fn with_keys(mut self, keys: KeySequence) -> Self {
        self.keys = keys;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The content currently shown, if active.
    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.state {
            SessionState::Active(result) => Some(result.as_ref()),
            SessionState::Inactive => None,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn reader(&self) -> &ReadMode {
        &self.reader
    }

    /// Enters reading mode when inactive, exits when active.
    pub fn toggle(&mut self, page: &Document) {
        if self.is_active() {
            self.exit();
        } else {
            self.enter(page);
        }
    }

    /// Extracts `page` and shows the reading view.
    ///
    /// Does nothing when already active. When no content can be found the
    /// page is left as it is and the session stays inactive.
    pub fn enter(&mut self, page: &Document) {
        if self.is_active() {
            return;
        }

        match self.reader.extract(page) {
            Ok(result) => {
                tracing::info!(title = %result.title, strategy = %result.strategy, "entering reading mode");
                self.presenter.show(&result);
                self.state = SessionState::Active(Box::new(result));
            }
            Err(e) => {
                tracing::info!(url = ?page.url().map(|u| u.as_str()), error = %e, "could not extract main content");
            }
        }
    }

    /// Removes the reading view. Safe to call when inactive.
    pub fn exit(&mut self) {
        if let SessionState::Active(_) = std::mem::take(&mut self.state) {
            tracing::info!("exiting reading mode");
            self.presenter.dismiss();
        }
    }

    /// Feeds a key press. Returns `true` if it toggled reading mode.
    pub fn handle_key(&mut self, key: KeyEvent, page: &Document) -> bool {
        if self.keys.feed(&key) {
            self.toggle(page);
            true
        } else {
            false
        }
    }

    /// Handles an external command. Returns `true` if it was recognized.
    pub fn handle_command(&mut self, action: &str, page: &Document) -> bool {
        if action == TOGGLE_COMMAND {
            self.toggle(page);
            true
        } else {
            tracing::debug!(action, "ignoring unknown command");
            false
        }
    }
}
