//! Dashboard view: headline figures and the latest bookings.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::model::{booking_status_label, format_euros, UNKNOWN};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let text = match app.body_error() {
            Some(err) => format!("Erreur : {}", err),
            None => "Chargement...".to_string(),
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(bordered(app, " Tableau de bord "));
        frame.render_widget(paragraph, area);
        return;
    };

    let stats = data.stats();

    let chunks = Layout::vertical([
        Constraint::Length(5), // Cards
        Constraint::Min(4),    // Recent bookings
    ])
    .split(area);

    let cards = Layout::horizontal([Constraint::Fill(1); 4]).split(chunks[0]);

    let figures = [
        (
            " Membres ",
            stats.total_membres.to_string(),
            format!("{} actifs", stats.membres_actifs),
        ),
        (
            " Activités ",
            stats.total_activites.to_string(),
            String::new(),
        ),
        (
            " Réservations ",
            stats.total_reservations.to_string(),
            format!("{} annulées", stats.reservations_annulees),
        ),
        (
            " Revenus ",
            format_euros(stats.revenus),
            format!("{} paiements en attente", stats.paiements_en_attente),
        ),
    ];

    for ((title, value, detail), card) in figures.into_iter().zip(cards.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(detail, Style::default().add_modifier(Modifier::DIM))),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(bordered(app, title));
        frame.render_widget(paragraph, *card);
    }

    let recent = data.recent_reservations();
    let block = bordered(app, " Dernières réservations ");

    if recent.is_empty() {
        let paragraph = Paragraph::new("Aucune réservation")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let header = Row::new(vec!["Membre", "Activité", "Date", "Statut"]).style(app.theme.header);
    let rows: Vec<Row> = recent
        .iter()
        .map(|r| {
            let status = booking_status_label(r.statut);
            Row::new(vec![
                Cell::from(r.membre.clone()),
                Cell::from(r.activite.clone()),
                Cell::from(r.date.clone().unwrap_or_else(|| UNKNOWN.to_string())),
                Cell::from(status).style(app.theme.label_style(status)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, chunks[1]);
}

fn bordered<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}
