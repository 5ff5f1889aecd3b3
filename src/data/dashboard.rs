//! Display-ready data derived from a [`Dataset`].

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::model::{Activite, Membre, Paiement, Reservation, StatutMembre, StatutPaiement};
use crate::source::Dataset;

/// Number of bookings listed on the dashboard.
pub const RECENT_BOOKINGS: usize = 5;

/// Headline figures for the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_membres: usize,
    pub membres_actifs: usize,
    pub total_activites: usize,
    pub total_reservations: usize,
    pub reservations_annulees: usize,
    /// Sum of completed payments, in euros.
    pub revenus: f64,
    pub paiements_en_attente: usize,
}

/// All four collections in front shape, joined and ready to render.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub membres: Vec<Membre>,
    pub activites: Vec<Activite>,
    pub reservations: Vec<Reservation>,
    pub paiements: Vec<Paiement>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Load a dataset fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(content)?;
        Ok(Self::from_dataset(&dataset))
    }

    /// Run every backend record through its adapter.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let membres = dataset.members.iter().map(Membre::from).collect();
        let activites = dataset.activities.iter().map(Activite::from).collect();
        let reservations = dataset
            .bookings
            .iter()
            .map(|b| Reservation::join(b, &dataset.members, &dataset.activities))
            .collect();
        let paiements = dataset
            .payments
            .iter()
            .map(|p| Paiement::from_payment(p, &dataset.members))
            .collect();

        Self {
            membres,
            activites,
            reservations,
            paiements,
            last_updated: Instant::now(),
        }
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_membres: self.membres.len(),
            membres_actifs: self
                .membres
                .iter()
                .filter(|m| m.statut == StatutMembre::Actif)
                .count(),
            total_activites: self.activites.len(),
            total_reservations: self.reservations.len(),
            reservations_annulees: self.reservations.iter().filter(|r| r.is_cancelled()).count(),
            revenus: self
                .paiements
                .iter()
                .filter(|p| p.statut == StatutPaiement::Complete)
                .map(|p| p.montant)
                .sum(),
            paiements_en_attente: self
                .paiements
                .iter()
                .filter(|p| p.statut == StatutPaiement::EnAttente)
                .count(),
        }
    }

    /// The most recent bookings, newest first.
    ///
    /// Ordered by booking date; undated bookings come last, and ties fall
    /// back to the higher id.
    pub fn recent_reservations(&self) -> Vec<&Reservation> {
        let mut recent: Vec<&Reservation> = self.reservations.iter().collect();
        recent.sort_by(|a, b| match (&a.date, &b.date) {
            (Some(da), Some(db)) => db.cmp(da).then(b.id.cmp(&a.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.id.cmp(&a.id),
        });
        recent.truncate(RECENT_BOOKINGS);
        recent
    }

    /// Adapted records as one JSON document.
    pub fn to_export(&self) -> serde_json::Value {
        serde_json::json!({
            "statistiques": self.stats(),
            "membres": self.membres,
            "activites": self.activites,
            "reservations": self.reservations,
            "paiements": self.paiements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Activity, Booking, BookingStatus, Member, Payment, PaymentMethod, PaymentStatus,
    };

    fn member(id: i64, active: bool) -> Member {
        Member {
            id,
            first_name: format!("Prenom{}", id),
            last_name: format!("Nom{}", id),
            email: format!("m{}@example.com", id),
            phone: None,
            active,
        }
    }

    fn booking(id: i64, date: Option<&str>, status: BookingStatus) -> Booking {
        Booking {
            id,
            member_id: 1,
            activity_id: 1,
            status,
            booking_date: date.map(str::to_string),
            cancellation_date: None,
        }
    }

    fn payment(id: i64, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id,
            member_id: 1,
            amount,
            payment_method: PaymentMethod::Card,
            status,
            description: "Abonnement".into(),
            created_at: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            members: vec![member(1, true), member(2, false), member(3, true)],
            activities: vec![Activity {
                id: 1,
                name: "Yoga".into(),
                description: None,
                coach: None,
                max_capacity: Some(20),
                current_participants: Some(5),
                start_time: None,
                end_time: None,
            }],
            bookings: vec![
                booking(1, Some("2024-01-10"), BookingStatus::Confirmed),
                booking(2, Some("2024-03-01"), BookingStatus::Cancelled),
                booking(3, None, BookingStatus::Pending),
                booking(4, Some("2024-02-15"), BookingStatus::Confirmed),
                booking(5, Some("2024-02-15"), BookingStatus::Confirmed),
                booking(6, Some("2023-12-31"), BookingStatus::Confirmed),
            ],
            payments: vec![
                payment(1, 2990, PaymentStatus::Completed),
                payment(2, 1510, PaymentStatus::Completed),
                payment(3, 5000, PaymentStatus::Pending),
                payment(4, 700, PaymentStatus::Failed),
            ],
        }
    }

    #[test]
    fn test_from_dataset_adapts_every_record() {
        let data = DashboardData::from_dataset(&dataset());
        assert_eq!(data.membres.len(), 3);
        assert_eq!(data.reservations[0].membre, "Prenom1 Nom1");
        assert_eq!(data.reservations[0].activite, "Yoga");
        assert_eq!(data.paiements[0].montant, 29.9);
    }

    #[test]
    fn test_stats() {
        let stats = DashboardData::from_dataset(&dataset()).stats();
        assert_eq!(stats.total_membres, 3);
        assert_eq!(stats.membres_actifs, 2);
        assert_eq!(stats.total_activites, 1);
        assert_eq!(stats.total_reservations, 6);
        assert_eq!(stats.reservations_annulees, 1);
        assert!((stats.revenus - 45.0).abs() < 1e-9);
        assert_eq!(stats.paiements_en_attente, 1);
    }

    #[test]
    fn test_recent_reservations_newest_first() {
        let data = DashboardData::from_dataset(&dataset());
        let ids: Vec<i64> = data.recent_reservations().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 4, 1, 6]);
    }

    #[test]
    fn test_empty_dataset() {
        let data = DashboardData::parse("{}").unwrap();
        let stats = data.stats();
        assert_eq!(stats.total_membres, 0);
        assert_eq!(stats.revenus, 0.0);
        assert!(data.recent_reservations().is_empty());
    }

    #[test]
    fn test_export_document() {
        let export = DashboardData::from_dataset(&dataset()).to_export();
        assert_eq!(export["statistiques"]["total_membres"], 3);
        assert_eq!(export["membres"].as_array().unwrap().len(), 3);
        assert_eq!(export["paiements"][0]["membre_nom"], "Prenom1 Nom1");
    }

    #[test]
    fn test_demo_fixture() {
        let data = DashboardData::parse(include_str!("../../demos/centre.json")).unwrap();
        let stats = data.stats();
        assert_eq!(stats.total_membres, 4);
        assert_eq!(stats.membres_actifs, 3);
        assert_eq!(stats.total_activites, 3);
        assert_eq!(stats.total_reservations, 5);
        assert_eq!(stats.reservations_annulees, 1);
        assert_eq!(stats.revenus, 45.0);
        assert_eq!(stats.paiements_en_attente, 1);
    }
}
