use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, View, DEFAULT_EXPORT_PATH};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Pending confirmation swallows the next key
    if app.pending_action.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('o') | KeyCode::Enter => app.confirm_action(),
            _ => app.dismiss_action(),
        }
        return;
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Browse records with the overlay open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('d') => app.request_delete(),
            KeyCode::Char('x') => app.request_cancel(),
            _ => {}
        }
        return;
    }

    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.set_view(View::ALL[index]);
        }

        // Rows
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Pages
        KeyCode::PageUp | KeyCode::Char('[') => app.prev_page(),
        KeyCode::PageDown | KeyCode::Char(']') => app.next_page(),

        // Tabs
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.toggle_sort_direction(),

        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('c') => {
            if !app.search_text().is_empty() {
                app.clear_search();
            }
        }

        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('x') => app.request_cancel(),

        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(DEFAULT_EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exporté vers {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Échec de l'export : {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the search box is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.confirm_search(),

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.search_text().is_empty() {
                app.confirm_search();
            }
        }

        KeyCode::Char(c) => app.search_push(c),

        _ => {}
    }
}

/// Handle mouse events.
///
/// `content` is where the dashboard or table block was drawn, as given by
/// [`crate::ui::content_area`].
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content: Rect) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let row = mouse.row;

            // Tab bar sits right above the content
            if row + 1 == content.y {
                if let Some(view) = tab_at(mouse.column) {
                    app.set_view(view);
                }
                return;
            }

            if !app.current_view.is_table() || app.show_help || app.show_detail_overlay {
                return;
            }

            // Top border, then the header row
            let header_row = content.y + 1;
            if row == header_row {
                if let Some(key) = crate::ui::table::sortable_key_at(app, content, mouse.column) {
                    app.sort_by(&key);
                }
                return;
            }

            let first_record_row = header_row + 1;
            if row >= first_record_row {
                let index = (row - first_record_row) as usize;
                if let Some(info) = app.page_info() {
                    if index < info.len {
                        // A second click on the selected row opens it
                        if index == app.selected {
                            app.enter_detail();
                        } else {
                            app.selected = index;
                        }
                    }
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

/// Tab under column `col`, following the layout of `ui::common::render_tabs`.
pub fn tab_at(col: u16) -> Option<View> {
    let mut start = 0u16;
    for view in View::ALL {
        // " n:Label " plus Tabs padding on both sides and the divider
        let width = crate::ui::common::tab_title(view).chars().count() as u16 + 3;
        if col < start + width {
            return Some(view);
        }
        start += width;
    }
    None
}
