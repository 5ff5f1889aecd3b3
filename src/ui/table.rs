//! Entity table rendering.
//!
//! One generic renderer drives all four table views: the engine computes the
//! page, this module only lays it out.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, View};
use crate::table::{BodyState, Column, Record, TableView};

/// Marker in front of the selected row.
const HIGHLIGHT_SYMBOL: &str = "▶ ";

/// Gap between columns, as the `Table` widget lays them out by default.
const COLUMN_SPACING: u16 = 1;

/// Render the table of the current view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let data = app.data.as_ref();
    match app.current_view {
        View::Dashboard => {}
        View::Membres => render_records(
            frame,
            app,
            area,
            &app.tables.membres,
            data.map(|d| d.membres.as_slice()).unwrap_or(&[]),
            &app.columns.membres,
        ),
        View::Activites => render_records(
            frame,
            app,
            area,
            &app.tables.activites,
            data.map(|d| d.activites.as_slice()).unwrap_or(&[]),
            &app.columns.activites,
        ),
        View::Reservations => render_records(
            frame,
            app,
            area,
            &app.tables.reservations,
            data.map(|d| d.reservations.as_slice()).unwrap_or(&[]),
            &app.columns.reservations,
        ),
        View::Paiements => render_records(
            frame,
            app,
            area,
            &app.tables.paiements,
            data.map(|d| d.paiements.as_slice()).unwrap_or(&[]),
            &app.columns.paiements,
        ),
    }
}

fn render_records<T: Record>(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    table: &TableView,
    records: &[T],
    columns: &[Column<T>],
) {
    let page = table.compute_view(records, columns, app.page_size);
    let body = BodyState::resolve(app.is_loading(), app.body_error(), &page);

    let footer = if page.is_empty() {
        format!(" Page {}/{} ", page.current_page, page.total_pages)
    } else {
        format!(
            " {} │ Page {}/{} ",
            page.summary(),
            page.current_page,
            page.total_pages
        )
    };

    let block = Block::default()
        .title(title(app, table, page.total_count, records.len()))
        .title_bottom(Line::from(footer).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if let Some(text) = body.placeholder() {
        let style = match body {
            BodyState::Error(_) => Style::default().fg(app.theme.critical),
            _ => Style::default().add_modifier(Modifier::DIM),
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text)])
            .alignment(Alignment::Center)
            .style(style)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(header_label(c, table)))
            .collect::<Vec<_>>(),
    )
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = page
        .cells
        .iter()
        .map(|cells| {
            Row::new(
                columns
                    .iter()
                    .zip(cells)
                    .map(|(column, text)| {
                        let cell = Cell::from(text.clone());
                        if column.key == "statut" {
                            cell.style(app.theme.label_style(text))
                        } else {
                            cell
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(|c| column_width(&c.key)).collect();

    let table_widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .column_spacing(COLUMN_SPACING)
        .highlight_symbol(HIGHLIGHT_SYMBOL);

    let mut state = TableState::default();
    state.select(Some(app.selected.min(page.len().saturating_sub(1))));

    frame.render_stateful_widget(table_widget, area, &mut state);
}

/// Key of the sortable column whose header covers screen column `x`, when
/// the current table is drawn in `area`.
pub fn sortable_key_at(app: &App, area: Rect, x: u16) -> Option<String> {
    match app.current_view {
        View::Dashboard => None,
        View::Membres => key_at(&app.columns.membres, area, x),
        View::Activites => key_at(&app.columns.activites, area, x),
        View::Reservations => key_at(&app.columns.reservations, area, x),
        View::Paiements => key_at(&app.columns.paiements, area, x),
    }
}

fn key_at<T>(columns: &[Column<T>], area: Rect, x: u16) -> Option<String> {
    let inner = area.inner(Margin::new(1, 1));
    let [_, cells_area] = Layout::horizontal([
        Constraint::Length(HIGHLIGHT_SYMBOL.chars().count() as u16),
        Constraint::Min(0),
    ])
    .areas(inner);
    let cells = Layout::horizontal(columns.iter().map(|c| column_width(&c.key)))
        .spacing(COLUMN_SPACING)
        .split(cells_area);

    columns
        .iter()
        .zip(cells.iter())
        .find(|(_, cell)| x >= cell.x && x < cell.right())
        .filter(|(column, _)| column.sortable)
        .map(|(column, _)| column.key.clone())
}

fn title(app: &App, table: &TableView, shown: usize, total: usize) -> String {
    let sort_info = match table.sort_key() {
        Some(key) => format!(" [tri: {}{}]", key, table.sort_direction().arrow()),
        None => String::new(),
    };

    let search_info = if app.search_active {
        format!(" /{}_", table.search_text())
    } else if !table.search_text().is_empty() {
        format!(" /{}/ [c:effacer]", table.search_text())
    } else {
        String::new()
    };

    format!(
        " {} ({}/{}){}{} ",
        app.current_view.label(),
        shown,
        total,
        sort_info,
        search_info
    )
}

fn header_label<T>(column: &Column<T>, table: &TableView) -> Span<'static> {
    match table.sort_key() {
        Some(key) if key == column.key => Span::raw(format!(
            "{}{}",
            column.header,
            table.sort_direction().arrow()
        )),
        _ => Span::raw(column.header.clone()),
    }
}

fn column_width(key: &str) -> Constraint {
    match key {
        "id" => Constraint::Length(6),
        "email" | "description" | "membre" | "membre_nom" => Constraint::Fill(2),
        _ => Constraint::Fill(1),
    }
}
