//! Detail overlay rendering.
//!
//! Shows every field of the selected record as a modal on top of the table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::DashboardData;
use crate::model::{booking_status_label, format_euros, UNKNOWN};
use crate::ui::common::centered;

/// Minimum terminal size for the overlay to render.
const MIN_OVERLAY_WIDTH: u16 = 50;
const MIN_OVERLAY_HEIGHT: u16 = 14;

pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let (Some(data), Some(id)) = (app.data.as_ref(), app.selected_id()) else {
        return;
    };
    let Some((title, fields)) = detail_fields(data, app.current_view, id) else {
        return;
    };

    let overlay_width = (area.width * 70 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (fields.len() as u16 + 5).clamp(MIN_OVERLAY_HEIGHT, area.height);
    let overlay_area = centered(area, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let label_width = fields.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = fields
        .into_iter()
        .map(|(label, value)| {
            let value_style = app.theme.label_style(&value);
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$} ", label, width = label_width),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let footer = match app.current_view {
        View::Reservations => " Échap:fermer ↑/↓:précédent/suivant d:supprimer x:annuler",
        View::Paiements => " Échap:fermer ↑/↓:précédent/suivant",
        _ => " Échap:fermer ↑/↓:précédent/suivant d:supprimer",
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[1],
    );
}

/// Overlay title and `(label, value)` rows for the record `id` of `view`.
pub fn detail_fields(
    data: &DashboardData,
    view: View,
    id: i64,
) -> Option<(String, Vec<(&'static str, String)>)> {
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());

    match view {
        View::Dashboard => None,
        View::Membres => {
            let m = data.membres.iter().find(|m| m.id == id)?;
            Some((
                format!(" Membre #{} ", m.id),
                vec![
                    ("Nom", m.nom.clone()),
                    ("Prénom", m.prenom.clone()),
                    ("Email", m.email.clone()),
                    ("Téléphone", or_unknown(&m.telephone)),
                    ("Statut", m.statut.label().to_string()),
                ],
            ))
        }
        View::Activites => {
            let a = data.activites.iter().find(|a| a.id == id)?;
            Some((
                format!(" Activité #{} ", a.id),
                vec![
                    ("Nom", a.nom.clone()),
                    ("Description", or_unknown(&a.description)),
                    ("Coach", or_unknown(&a.coach)),
                    ("Inscrits", a.occupation()),
                    (
                        "Places restantes",
                        a.places_restantes()
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| UNKNOWN.to_string()),
                    ),
                    ("Début", or_unknown(&a.debut)),
                    ("Fin", or_unknown(&a.fin)),
                ],
            ))
        }
        View::Reservations => {
            let r = data.reservations.iter().find(|r| r.id == id)?;
            Some((
                format!(" Réservation #{} ", r.id),
                vec![
                    ("Membre", format!("{} (#{})", r.membre, r.membre_id)),
                    ("Activité", format!("{} (#{})", r.activite, r.activite_id)),
                    ("Date", or_unknown(&r.date)),
                    ("Statut", booking_status_label(r.statut).to_string()),
                ],
            ))
        }
        View::Paiements => {
            let p = data.paiements.iter().find(|p| p.id == id)?;
            let membre = if p.membre_nom.is_empty() {
                format!("#{}", p.membre_id)
            } else {
                format!("{} (#{})", p.membre_nom, p.membre_id)
            };
            Some((
                format!(" Paiement #{} ", p.id),
                vec![
                    ("Membre", membre),
                    ("Montant", format_euros(p.montant)),
                    ("Méthode", p.methode.label().to_string()),
                    ("Description", p.description.clone()),
                    ("Statut", p.statut.label().to_string()),
                    ("Date", or_unknown(&p.date)),
                ],
            ))
        }
    }
}
