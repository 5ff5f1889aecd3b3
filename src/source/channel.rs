//! In-memory data source fed through a tokio watch channel.
//!
//! Whoever holds the sender pushes complete datasets; the UI only ever sees
//! the latest one.

use tokio::sync::watch;

use super::{DataSource, Dataset};

/// ```
/// use centre_admin::source::{ChannelSource, Dataset};
///
/// let (tx, source) = ChannelSource::create("tests");
/// tx.send(Dataset::default()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Dataset>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<Dataset>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("canal : {}", source_description),
            initial_returned: false,
        }
    }

    /// Create a `(sender, source)` pair starting from an empty dataset.
    pub fn create(source_description: &str) -> (watch::Sender<Dataset>, Self) {
        let (tx, rx) = watch::channel(Dataset::default());
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Dataset> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }

    fn refresh(&mut self) {
        self.receiver.mark_changed();
    }
}
