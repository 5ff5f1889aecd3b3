//! Data sources feeding the dashboard.
//!
//! Every source hands out complete [`Dataset`]s: the application never sees
//! a half-fetched collection.
//!
//! - [`FileSource`]: a JSON fixture file, re-read when it changes
//! - [`ChannelSource`]: datasets pushed through a tokio watch channel
//! - [`HttpSource`]: the live backends, fetched by a background task

mod channel;
mod dataset;
mod file;
mod http;

pub use channel::ChannelSource;
pub use dataset::Dataset;
pub use file::FileSource;
pub use http::{fetch_dataset, HttpSource};

use std::fmt::{self, Debug};

use anyhow::Result;

/// A mutation requested from the UI, identified by backend id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DeleteMember(i64),
    DeleteActivity(i64),
    DeleteBooking(i64),
    CancelBooking(i64),
}

impl Action {
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::DeleteMember(_) => "Membre supprimé",
            Action::DeleteActivity(_) => "Activité supprimée",
            Action::DeleteBooking(_) => "Réservation supprimée",
            Action::CancelBooking(_) => "Réservation annulée",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::DeleteMember(_) => "Échec de la suppression du membre",
            Action::DeleteActivity(_) => "Échec de la suppression de l'activité",
            Action::DeleteBooking(_) => "Échec de la suppression de la réservation",
            Action::CancelBooking(_) => "Échec de l'annulation de la réservation",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeleteMember(id) => write!(f, "supprimer le membre #{}", id),
            Action::DeleteActivity(id) => write!(f, "supprimer l'activité #{}", id),
            Action::DeleteBooking(id) => write!(f, "supprimer la réservation #{}", id),
            Action::CancelBooking(id) => write!(f, "annuler la réservation #{}", id),
        }
    }
}

/// Trait for receiving datasets from various sources.
///
/// # Example
///
/// ```
/// use centre_admin::source::{DataSource, FileSource};
///
/// let mut source = FileSource::new("centre.json");
/// if let Some(dataset) = source.poll() {
///     println!("{} members", dataset.members.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Latest dataset, if a new one arrived since the last call.
    ///
    /// Must not block.
    fn poll(&mut self) -> Option<Dataset>;

    /// Human-readable description for the status bar.
    fn description(&self) -> &str;

    /// Error from the last load attempt, if it failed.
    fn error(&self) -> Option<&str>;

    /// Whether a fetch is in flight.
    fn is_loading(&self) -> bool {
        false
    }

    /// Ask for fresh data; it arrives through a later [`poll`](Self::poll).
    fn refresh(&mut self) {}

    /// Submit a mutation. Read-only sources refuse.
    fn perform(&mut self, action: Action) -> Result<()> {
        anyhow::bail!("Impossible de {} : source en lecture seule", action)
    }

    /// Next outcome message from a previously submitted action.
    fn take_notice(&mut self) -> Option<String> {
        None
    }
}
