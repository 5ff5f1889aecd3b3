//! Common UI components shared across views.
//!
//! Header bar, tab bar, status bar, confirmation prompt and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::model::format_euros;

/// Render the header bar with headline counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" CENTRE SPORTIF ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref data) = app.data else {
        let line = Line::from(vec![title, Span::raw("│ Chargement...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let stats = data.stats();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut spans = vec![
        title,
        Span::raw("│ "),
        Span::styled(stats.total_membres.to_string(), bold),
        Span::raw(" membres ("),
        Span::styled(
            stats.membres_actifs.to_string(),
            Style::default().fg(app.theme.healthy),
        ),
        Span::raw(" actifs) │ "),
        Span::styled(stats.total_activites.to_string(), bold),
        Span::raw(" activités │ "),
        Span::styled(stats.total_reservations.to_string(), bold),
        Span::raw(" réservations │ "),
        Span::styled(format_euros(stats.revenus), bold),
    ];

    if app.is_syncing() {
        spans.push(Span::styled(
            " │ ⟳",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Title of a view in the tab bar.
pub fn tab_title(view: View) -> String {
    format!(" {}:{} ", view.index() + 1, view.label())
}

/// Render the tab bar, highlighting the active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(tab_title(*v))).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// A pending confirmation wins over temporary messages, which win over the
/// regular source/controls line.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(action) = app.pending_action {
        let line = Line::from(vec![
            Span::styled(
                format!(" Confirmer : {} ? ", action),
                Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
            ),
            Span::raw("y:oui  autre touche:non"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // A refresh failed but older data is still on screen
    if let (Some(_), Some(err)) = (&app.data, &app.load_error) {
        let paragraph = Paragraph::new(format!(" Erreur : {} | r:réessayer", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let controls = if app.search_active {
            "Tapez pour rechercher | Entrée:valider Échap:fermer"
        } else {
            match app.current_view {
                View::Dashboard => "1-5:vues Tab:suivante r:actualiser ?:aide q:quitter",
                View::Reservations => {
                    "/:chercher s:trier [ ]:pages Entrée:détail d:suppr x:annuler ?:aide"
                }
                _ => "/:chercher s:trier S:inverser [ ]:pages Entrée:détail d:suppr ?:aide",
            }
        };
        format!(
            " {} | {} | il y a {:.0}s | {}",
            app.current_view.label(),
            app.source_description(),
            data.last_updated.elapsed().as_secs_f64(),
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Erreur : {} | q:quitter r:réessayer", err)
    } else {
        " Chargement... | q:quitter".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay as a centered modal.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Raccourcis clavier", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  1-5 Tab ←/→   Changer de vue"),
        Line::from("  ↑/↓ j/k       Sélectionner une ligne"),
        Line::from("  PgUp/PgDn [ ] Page précédente/suivante"),
        Line::from("  Entrée        Détail"),
        Line::from("  Échap         Retour"),
        Line::from(""),
        section(" Tableaux"),
        Line::from("  /             Rechercher"),
        Line::from("  c             Effacer la recherche"),
        Line::from("  s             Colonne de tri suivante"),
        Line::from("  S             Inverser le tri"),
        Line::from("  d             Supprimer (confirmer par y)"),
        Line::from("  x             Annuler une réservation"),
        Line::from(""),
        section(" Général"),
        Line::from("  r             Actualiser"),
        Line::from("  e             Exporter en JSON"),
        Line::from("  q             Quitter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Appuyez sur une touche pour fermer",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Aide ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 48u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let help_area = centered(area, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// A `width` x `height` rectangle centered in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
