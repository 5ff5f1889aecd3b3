//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::DashboardData;
use crate::source::{Action, DataSource};
use crate::table::{Record, RecordId, TableView};
use crate::ui::columns::{sortable_keys, Columns, Tables};
use crate::ui::Theme;

/// How long a status message stays visible.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Where `e` writes the export.
pub const DEFAULT_EXPORT_PATH: &str = "centre_export.json";

/// The current view/tab in the TUI.
///
/// Record detail is an overlay (`App::show_detail_overlay`), not a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Headline statistics and the latest bookings.
    Dashboard,
    Membres,
    Activites,
    Reservations,
    Paiements,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Membres,
        View::Activites,
        View::Reservations,
        View::Paiements,
    ];

    pub fn index(self) -> usize {
        match self {
            View::Dashboard => 0,
            View::Membres => 1,
            View::Activites => 2,
            View::Reservations => 3,
            View::Paiements => 4,
        }
    }

    pub fn next(self) -> Self {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> Self {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Tableau de bord",
            View::Membres => "Membres",
            View::Activites => "Activités",
            View::Reservations => "Réservations",
            View::Paiements => "Paiements",
        }
    }

    /// Whether this view shows an entity table.
    pub fn is_table(self) -> bool {
        self != View::Dashboard
    }
}

/// Where the current page stands, detached from the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub len: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub selected_id: Option<RecordId>,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    source: Box<dyn DataSource>,
    pub data: Option<DashboardData>,
    pub load_error: Option<String>,

    // One engine per entity table
    pub tables: Tables,
    pub columns: Columns,
    pub page_size: usize,

    /// Selected row within the current page.
    pub selected: usize,
    /// Typing into the search box of the current table.
    pub search_active: bool,
    /// Mutation awaiting a y/n answer.
    pub pending_action: Option<Action>,

    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: Box<dyn DataSource>, page_size: usize) -> Self {
        Self::with_theme(source, page_size, Theme::auto_detect())
    }

    pub fn with_theme(source: Box<dyn DataSource>, page_size: usize, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            load_error: None,
            tables: Tables::default(),
            columns: Columns::default(),
            page_size: page_size.max(1),
            selected: 0,
            search_active: false,
            pending_action: None,
            theme,
            status_message: None,
        }
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Whether the source is fetching right now (periodic refreshes included).
    pub fn is_syncing(&self) -> bool {
        self.source.is_loading()
    }

    /// Nothing to show yet and no error to explain why.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.load_error.is_none()
    }

    /// Error to show in place of the table body.
    ///
    /// Once data has been loaded, later failures go to the status bar and
    /// the last good data stays visible.
    pub fn body_error(&self) -> Option<&str> {
        match self.data {
            Some(_) => None,
            None => self.load_error.as_deref(),
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Drain the source: action outcomes, errors, and a new dataset if any.
    ///
    /// Returns true when new data was received.
    pub fn reload_data(&mut self) -> bool {
        while let Some(notice) = self.source.take_notice() {
            self.set_status_message(notice);
        }

        let dataset = self.source.poll();
        self.load_error = self.source.error().map(str::to_string);

        let Some(dataset) = dataset else {
            return false;
        };
        self.data = Some(DashboardData::from_dataset(&dataset));
        self.clamp_pages();
        true
    }

    /// Ask the source for fresh data.
    pub fn refresh(&mut self) {
        self.source.refresh();
        self.set_status_message("Actualisation...");
        self.reload_data();
    }

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected = 0;
        self.search_active = false;
        self.show_detail_overlay = false;
    }

    /// Engine state of the current table view.
    pub fn table(&self) -> Option<&TableView> {
        match self.current_view {
            View::Dashboard => None,
            View::Membres => Some(&self.tables.membres),
            View::Activites => Some(&self.tables.activites),
            View::Reservations => Some(&self.tables.reservations),
            View::Paiements => Some(&self.tables.paiements),
        }
    }

    fn table_mut(&mut self) -> Option<&mut TableView> {
        match self.current_view {
            View::Dashboard => None,
            View::Membres => Some(&mut self.tables.membres),
            View::Activites => Some(&mut self.tables.activites),
            View::Reservations => Some(&mut self.tables.reservations),
            View::Paiements => Some(&mut self.tables.paiements),
        }
    }

    /// Position of the current table's page, if a table view has data.
    pub fn page_info(&self) -> Option<PageInfo> {
        let data = self.data.as_ref()?;
        let (size, selected) = (self.page_size, self.selected);
        match self.current_view {
            View::Dashboard => None,
            View::Membres => Some(page_info(&self.tables.membres, &data.membres, size, selected)),
            View::Activites => Some(page_info(&self.tables.activites, &data.activites, size, selected)),
            View::Reservations => {
                Some(page_info(&self.tables.reservations, &data.reservations, size, selected))
            }
            View::Paiements => Some(page_info(&self.tables.paiements, &data.paiements, size, selected)),
        }
    }

    /// Backend id of the selected row.
    pub fn selected_id(&self) -> Option<i64> {
        match self.page_info()?.selected_id? {
            RecordId::Num(id) => Some(id),
            RecordId::Text(_) => None,
        }
    }

    // Keep every table on an existing page after the data shrank
    fn clamp_pages(&mut self) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let size = self.page_size;
        clamp_page(&mut self.tables.membres, &data.membres, size);
        clamp_page(&mut self.tables.activites, &data.activites, size);
        clamp_page(&mut self.tables.reservations, &data.reservations, size);
        clamp_page(&mut self.tables.paiements, &data.paiements, size);

        if let Some(info) = self.page_info() {
            self.selected = self.selected.min(info.len.saturating_sub(1));
        }
    }

    pub fn select_next(&mut self) {
        if let Some(info) = self.page_info() {
            self.selected = (self.selected + 1).min(info.len.saturating_sub(1));
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        if let Some(info) = self.page_info() {
            self.selected = info.len.saturating_sub(1);
        }
    }

    /// Go to the next page; no-op on the last page.
    pub fn next_page(&mut self) {
        let Some(info) = self.page_info() else {
            return;
        };
        if info.current_page < info.total_pages {
            if let Some(table) = self.table_mut() {
                table.set_page(info.current_page + 1);
            }
            self.selected = 0;
        }
    }

    /// Go to the previous page; no-op on the first page.
    pub fn prev_page(&mut self) {
        let Some(info) = self.page_info() else {
            return;
        };
        if info.current_page > 1 {
            if let Some(table) = self.table_mut() {
                table.set_page(info.current_page - 1);
            }
            self.selected = 0;
        }
    }

    pub fn start_search(&mut self) {
        if self.current_view.is_table() {
            self.search_active = true;
        }
    }

    /// Leave input mode, keeping the search text.
    pub fn confirm_search(&mut self) {
        self.search_active = false;
    }

    pub fn clear_search(&mut self) {
        self.update_search(|text| text.clear());
        self.search_active = false;
    }

    pub fn search_push(&mut self, c: char) {
        self.update_search(|text| text.push(c));
    }

    pub fn search_pop(&mut self) {
        self.update_search(|text| {
            text.pop();
        });
    }

    fn update_search(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(table) = self.table_mut() else {
            return;
        };
        let mut text = table.search_text().to_string();
        edit(&mut text);
        // Resets the page to 1
        table.set_search_text(text);
        self.selected = 0;
    }

    pub fn search_text(&self) -> &str {
        self.table().map(TableView::search_text).unwrap_or_default()
    }

    fn sortable_keys(&self) -> Vec<String> {
        match self.current_view {
            View::Dashboard => Vec::new(),
            View::Membres => owned(sortable_keys(&self.columns.membres)),
            View::Activites => owned(sortable_keys(&self.columns.activites)),
            View::Reservations => owned(sortable_keys(&self.columns.reservations)),
            View::Paiements => owned(sortable_keys(&self.columns.paiements)),
        }
    }

    /// Toggle sorting on column `key`, as a header click does. Columns that
    /// are not sortable are ignored.
    pub fn sort_by(&mut self, key: &str) {
        if !self.sortable_keys().iter().any(|k| k == key) {
            return;
        }
        if let Some(table) = self.table_mut() {
            table.set_sort(key);
        }
    }

    /// Sort by the next sortable column of the current table.
    pub fn cycle_sort(&mut self) {
        let keys = self.sortable_keys();
        let Some(table) = self.table_mut() else {
            return;
        };
        let next = match table.sort_key() {
            Some(current) => keys
                .iter()
                .position(|k| k == current)
                .map(|i| &keys[(i + 1) % keys.len()]),
            None => keys.first(),
        };
        if let Some(key) = next {
            table.set_sort(key);
        }
    }

    /// Flip the direction of the active sort, if any.
    pub fn toggle_sort_direction(&mut self) {
        if let Some(table) = self.table_mut() {
            if let Some(key) = table.sort_key().map(str::to_string) {
                table.set_sort(&key);
            }
        }
    }

    pub fn enter_detail(&mut self) {
        if self.selected_id().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the topmost overlay, or return to the dashboard.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.current_view != View::Dashboard {
            self.set_view(View::Dashboard);
        }
    }

    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Ask for confirmation before deleting the selected record.
    pub fn request_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let action = match self.current_view {
            View::Dashboard => return,
            View::Membres => Action::DeleteMember(id),
            View::Activites => Action::DeleteActivity(id),
            View::Reservations => Action::DeleteBooking(id),
            View::Paiements => {
                self.set_status_message("Les paiements ne peuvent pas être supprimés");
                return;
            }
        };
        self.pending_action = Some(action);
    }

    /// Ask for confirmation before cancelling the selected booking.
    pub fn request_cancel(&mut self) {
        if self.current_view != View::Reservations {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let cancelled = self
            .data
            .as_ref()
            .and_then(|d| d.reservations.iter().find(|r| r.id == id))
            .is_some_and(|r| r.is_cancelled());
        if cancelled {
            self.set_status_message("Réservation déjà annulée");
        } else {
            self.pending_action = Some(Action::CancelBooking(id));
        }
    }

    /// Submit the pending action to the source.
    pub fn confirm_action(&mut self) {
        let Some(action) = self.pending_action.take() else {
            return;
        };
        match self.source.perform(action) {
            Ok(()) => {
                tracing::info!(%action, "action submitted");
                self.show_detail_overlay = false;
                self.set_status_message(format!("Demande envoyée : {}", action));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn dismiss_action(&mut self) {
        if self.pending_action.take().is_some() {
            self.set_status_message("Action annulée");
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the adapted records and statistics as pretty JSON.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("Aucune donnée à exporter");
        };
        let json = serde_json::to_string_pretty(&data.to_export())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn page_info<T: Record>(
    table: &TableView,
    records: &[T],
    page_size: usize,
    selected: usize,
) -> PageInfo {
    // Cells are not needed here
    let page = table.compute_view(records, &[], page_size);
    PageInfo {
        len: page.len(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        selected_id: page.page_records.get(selected).map(|r| r.id()),
    }
}

fn clamp_page<T: Record>(table: &mut TableView, records: &[T], page_size: usize) {
    let total_pages = table.compute_view(records, &[], page_size).total_pages;
    if table.current_page() > total_pages {
        table.set_page(total_pages);
    }
}

fn owned(keys: Vec<&str>) -> Vec<String> {
    keys.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Booking, BookingStatus, Member};
    use crate::source::{ChannelSource, Dataset};
    use crate::table::SortDirection;
    use tokio::sync::watch;

    fn member(id: i64, last_name: &str) -> Member {
        Member {
            id,
            first_name: "Jean".into(),
            last_name: last_name.into(),
            email: format!("{}@example.com", last_name.to_lowercase()),
            phone: None,
            active: id % 2 == 0,
        }
    }

    fn dataset(count: i64) -> Dataset {
        Dataset {
            members: (1..=count).map(|i| member(i, &format!("Nom{:02}", i))).collect(),
            bookings: vec![
                Booking {
                    id: 1,
                    member_id: 1,
                    activity_id: 9,
                    status: BookingStatus::Confirmed,
                    booking_date: None,
                    cancellation_date: None,
                },
                Booking {
                    id: 2,
                    member_id: 2,
                    activity_id: 9,
                    status: BookingStatus::Cancelled,
                    booking_date: None,
                    cancellation_date: None,
                },
            ],
            ..Dataset::default()
        }
    }

    fn app_with(dataset: Dataset) -> (watch::Sender<Dataset>, App) {
        let (tx, source) = ChannelSource::create("test");
        tx.send(dataset).unwrap();
        let mut app = App::with_theme(Box::new(source), 10, Theme::dark());
        assert!(app.reload_data());
        (tx, app)
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Dashboard.next(), View::Membres);
        assert_eq!(View::Paiements.next(), View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Paiements);
        assert!(!View::Dashboard.is_table());
    }

    #[test]
    fn test_loading_until_first_dataset() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::with_theme(Box::new(source), 10, Theme::dark());
        assert!(app.is_loading());
        assert!(app.page_info().is_none());
    }

    #[test]
    fn test_page_navigation_is_gated() {
        let (_tx, mut app) = app_with(dataset(25));
        app.set_view(View::Membres);

        app.prev_page();
        assert_eq!(app.tables.membres.current_page(), 1);

        app.next_page();
        app.next_page();
        app.next_page();
        let info = app.page_info().unwrap();
        assert_eq!(info.current_page, 3);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.len, 5);
    }

    #[test]
    fn test_selection_stays_on_page() {
        let (_tx, mut app) = app_with(dataset(12));
        app.set_view(View::Membres);
        app.next_page();
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_id(), Some(12));
        app.select_first();
        assert_eq!(app.selected_id(), Some(11));
    }

    #[test]
    fn test_search_resets_page_and_filters() {
        let (_tx, mut app) = app_with(dataset(25));
        app.set_view(View::Membres);
        app.next_page();
        app.start_search();
        for c in "nom2".chars() {
            app.search_push(c);
        }
        assert_eq!(app.search_text(), "nom2");
        let info = app.page_info().unwrap();
        assert_eq!(info.current_page, 1);
        // Nom20..Nom25
        assert_eq!(info.len, 6);

        app.clear_search();
        assert!(!app.search_active);
        assert_eq!(app.page_info().unwrap().len, 10);
    }

    #[test]
    fn test_cycle_sort_and_direction() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Membres);

        app.cycle_sort();
        assert_eq!(app.tables.membres.sort_key(), Some("id"));
        app.cycle_sort();
        assert_eq!(app.tables.membres.sort_key(), Some("nom"));
        assert_eq!(app.tables.membres.sort_direction(), SortDirection::Ascending);

        app.toggle_sort_direction();
        assert_eq!(app.tables.membres.sort_direction(), SortDirection::Descending);
        assert_eq!(app.selected_id(), Some(3));
    }

    #[test]
    fn test_sort_by_header_respects_sortable() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Membres);

        app.sort_by("telephone");
        assert_eq!(app.tables.membres.sort_key(), None);

        app.sort_by("nom");
        assert_eq!(app.tables.membres.sort_key(), Some("nom"));
        app.sort_by("nom");
        assert_eq!(app.tables.membres.sort_direction(), SortDirection::Descending);

        app.set_view(View::Dashboard);
        app.sort_by("nom");
        assert_eq!(app.tables.membres.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_page_clamped_when_data_shrinks() {
        let (tx, mut app) = app_with(dataset(25));
        app.set_view(View::Membres);
        app.next_page();
        app.next_page();

        tx.send(dataset(8)).unwrap();
        assert!(app.reload_data());
        assert_eq!(app.tables.membres.current_page(), 1);
        assert_eq!(app.page_info().unwrap().len, 8);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Membres);
        app.request_delete();
        assert_eq!(app.pending_action, Some(Action::DeleteMember(1)));

        app.dismiss_action();
        assert!(app.pending_action.is_none());
        assert_eq!(app.get_status_message(), Some("Action annulée"));
    }

    #[test]
    fn test_confirmed_action_on_read_only_source() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Membres);
        app.request_delete();
        app.confirm_action();
        assert!(app.pending_action.is_none());
        assert!(app.get_status_message().unwrap().contains("lecture seule"));
    }

    #[test]
    fn test_cancel_only_for_open_bookings() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Reservations);
        app.request_cancel();
        assert_eq!(app.pending_action, Some(Action::CancelBooking(1)));
        app.pending_action = None;

        app.select_next();
        app.request_cancel();
        assert!(app.pending_action.is_none());
        assert_eq!(app.get_status_message(), Some("Réservation déjà annulée"));
    }

    #[test]
    fn test_payments_cannot_be_deleted() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Paiements);
        app.request_delete();
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_go_back() {
        let (_tx, mut app) = app_with(dataset(3));
        app.set_view(View::Membres);
        app.enter_detail();
        assert!(app.show_detail_overlay);
        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Membres);
        app.go_back();
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn test_export_state() {
        let (_tx, app) = app_with(dataset(3));
        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["membres"].as_array().unwrap().len(), 3);
        assert_eq!(json["reservations"][1]["membre"], "Jean Nom02");
    }

    #[test]
    fn test_export_without_data_fails() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::with_theme(Box::new(source), 10, Theme::dark());
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(app.export_state(file.path()).is_err());
    }
}
