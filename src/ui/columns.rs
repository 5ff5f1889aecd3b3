//! Column and search configuration for each table view.

use crate::model::{format_euros, Activite, Membre, Paiement, Reservation, UNKNOWN};
use crate::table::{Column, TableView};

/// Column layouts for the four entity tables.
#[derive(Debug, Clone)]
pub struct Columns {
    pub membres: Vec<Column<Membre>>,
    pub activites: Vec<Column<Activite>>,
    pub reservations: Vec<Column<Reservation>>,
    pub paiements: Vec<Column<Paiement>>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            membres: membre_columns(),
            activites: activite_columns(),
            reservations: reservation_columns(),
            paiements: paiement_columns(),
        }
    }
}

/// One engine instance per entity table, each with its own search keys.
#[derive(Debug, Clone)]
pub struct Tables {
    pub membres: TableView,
    pub activites: TableView,
    pub reservations: TableView,
    pub paiements: TableView,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            membres: TableView::new().with_search_keys(["nom", "prenom", "email", "telephone"]),
            activites: TableView::new().with_search_keys(["nom", "coach", "description"]),
            reservations: TableView::new().with_search_keys(["membre", "activite", "statut"]),
            paiements: TableView::new().with_search_keys([
                "membre_nom",
                "description",
                "methode",
                "statut",
            ]),
        }
    }
}

pub fn membre_columns() -> Vec<Column<Membre>> {
    vec![
        Column::new("id", "ID").sortable(),
        Column::new("nom", "Nom").sortable(),
        Column::new("prenom", "Prénom").sortable(),
        Column::new("email", "Email").sortable(),
        Column::new("telephone", "Téléphone")
            .render_with(|m: &Membre| m.telephone.clone().unwrap_or_else(|| UNKNOWN.into())),
        Column::new("statut", "Statut").sortable(),
    ]
}

pub fn activite_columns() -> Vec<Column<Activite>> {
    vec![
        Column::new("id", "ID").sortable(),
        Column::new("nom", "Nom").sortable(),
        Column::new("coach", "Coach").sortable(),
        Column::new("participants", "Inscrits")
            .sortable()
            .render_with(Activite::occupation),
        Column::new("places_restantes", "Places").sortable(),
        Column::new("debut", "Début").sortable(),
    ]
}

pub fn reservation_columns() -> Vec<Column<Reservation>> {
    vec![
        Column::new("id", "ID").sortable(),
        Column::new("membre", "Membre").sortable(),
        Column::new("activite", "Activité").sortable(),
        Column::new("date", "Date").sortable(),
        Column::new("statut", "Statut").sortable(),
    ]
}

pub fn paiement_columns() -> Vec<Column<Paiement>> {
    vec![
        Column::new("id", "ID").sortable(),
        Column::new("membre_nom", "Membre").sortable(),
        Column::new("montant", "Montant")
            .sortable()
            .render_with(|p: &Paiement| format_euros(p.montant)),
        Column::new("methode", "Méthode").sortable(),
        Column::new("description", "Description"),
        Column::new("statut", "Statut").sortable(),
    ]
}

/// Keys of the sortable columns, in display order.
pub fn sortable_keys<T>(columns: &[Column<T>]) -> Vec<&str> {
    columns
        .iter()
        .filter(|c| c.sortable)
        .map(|c| c.key.as_str())
        .collect()
}
