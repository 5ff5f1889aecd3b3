//! Live data source backed by the REST services.
//!
//! A background tokio task owns the [`Session`] and does all network I/O:
//! it fetches the four collections on start, on every refresh interval and
//! on demand, runs mutations, and refetches after each one. The UI side only
//! drains a channel, so it never blocks and never sees partial data.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::{Action, DataSource, Dataset};
use crate::api::{ApiError, Session};

#[derive(Debug)]
enum Command {
    Refresh,
    Perform(Action),
}

#[derive(Debug)]
enum Update {
    Started,
    Loaded(Dataset),
    Failed(String),
    Notice(String),
}

#[derive(Debug)]
pub struct HttpSource {
    commands: mpsc::UnboundedSender<Command>,
    updates: mpsc::UnboundedReceiver<Update>,
    description: String,
    last_error: Option<String>,
    loading: bool,
    notices: VecDeque<String>,
}

impl HttpSource {
    /// Start the background task. Must be called within a tokio runtime.
    pub fn spawn(session: Session, refresh_interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let description = session.description();

        tokio::spawn(run(session, command_rx, update_tx, refresh_interval));

        Self {
            commands: command_tx,
            updates: update_rx,
            description,
            last_error: None,
            // The first fetch starts immediately
            loading: true,
            notices: VecDeque::new(),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow::anyhow!("La tâche de synchronisation est arrêtée"))
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<Dataset> {
        let mut latest = None;
        while let Ok(update) = self.updates.try_recv() {
            match update {
                Update::Started => self.loading = true,
                Update::Loaded(dataset) => {
                    self.loading = false;
                    self.last_error = None;
                    latest = Some(dataset);
                }
                Update::Failed(error) => {
                    self.loading = false;
                    self.last_error = Some(error);
                }
                Update::Notice(notice) => self.notices.push_back(notice),
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn refresh(&mut self) {
        if self.send(Command::Refresh).is_ok() {
            self.loading = true;
        }
    }

    fn perform(&mut self, action: Action) -> Result<()> {
        self.send(Command::Perform(action))
    }

    fn take_notice(&mut self) -> Option<String> {
        self.notices.pop_front()
    }
}

async fn run(
    session: Session,
    mut commands: mpsc::UnboundedReceiver<Command>,
    updates: mpsc::UnboundedSender<Update>,
    refresh_interval: Duration,
) {
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            command = commands.recv() => match command {
                // Source dropped
                None => break,
                Some(Command::Refresh) => tracing::debug!("refresh requested"),
                Some(Command::Perform(action)) => {
                    let notice = match execute(&session, action).await {
                        Ok(()) => {
                            tracing::info!(%action, "action completed");
                            action.success_message().to_string()
                        }
                        Err(e) => {
                            tracing::warn!(%action, error = %e, "action failed");
                            format!("{} : {}", action.failure_message(), e)
                        }
                    };
                    if updates.send(Update::Notice(notice)).is_err() {
                        break;
                    }
                }
            }
        }

        if updates.send(Update::Started).is_err() {
            break;
        }
        let update = match fetch_dataset(&session).await {
            Ok(dataset) => {
                tracing::info!(records = dataset.len(), "dataset refreshed");
                Update::Loaded(dataset)
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                Update::Failed(e.to_string())
            }
        };
        if updates.send(update).is_err() {
            break;
        }
        // Count the next periodic refresh from now
        ticker.reset();
    }

    tracing::debug!("sync task stopped");
}

async fn execute(session: &Session, action: Action) -> Result<(), ApiError> {
    let gateway = session.gateway();
    match action {
        Action::DeleteMember(id) => gateway.delete_member(id).await,
        Action::DeleteActivity(id) => gateway.delete_activity(id).await,
        Action::DeleteBooking(id) => gateway.delete_booking(id).await,
        Action::CancelBooking(id) => gateway.cancel_booking(id).await.map(|_| ()),
    }
}

/// Fetch all four collections.
///
/// Gateway failures fail the whole fetch. Payments are fetched only when the
/// session holds a token, and a payment failure leaves that list empty.
pub async fn fetch_dataset(session: &Session) -> Result<Dataset, ApiError> {
    let gateway = session.gateway();
    let (members, activities, bookings) = tokio::try_join!(
        gateway.list_members(),
        gateway.list_activities(),
        gateway.list_bookings(),
    )?;

    let payments = if session.payments_available() {
        session.payments().list().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "payments unavailable");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    Ok(Dataset {
        members,
        activities,
        bookings,
        payments,
    })
}
