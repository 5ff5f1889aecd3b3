//! Display-side records (French field names) and the adapters that build
//! them from backend records.
//!
//! The table engine only ever sees these types. Translation happens here, at
//! the boundary between the data source and the views.

use serde::{Deserialize, Serialize};

use super::backend::{
    Activity, Booking, BookingStatus, CreatePaymentDto, Member, Payment, PaymentMethod,
    PaymentStatus,
};
use crate::table::{CellValue, Record, RecordId};

/// Shown for joined references that cannot be resolved.
pub const UNKNOWN: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatutMembre {
    Actif,
    Inactif,
}

impl StatutMembre {
    pub fn label(&self) -> &'static str {
        match self {
            StatutMembre::Actif => "Actif",
            StatutMembre::Inactif => "Inactif",
        }
    }
}

/// Member as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membre {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub statut: StatutMembre,
}

impl Membre {
    pub fn nom_complet(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

impl From<&Member> for Membre {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id,
            nom: m.last_name.clone(),
            prenom: m.first_name.clone(),
            email: m.email.clone(),
            telephone: m.phone.clone(),
            statut: if m.active {
                StatutMembre::Actif
            } else {
                StatutMembre::Inactif
            },
        }
    }
}

impl Record for Membre {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "nom" => (&self.nom).into(),
            "prenom" => (&self.prenom).into(),
            "nom_complet" => self.nom_complet().into(),
            "email" => (&self.email).into(),
            "telephone" => self.telephone.clone().into(),
            "statut" => self.statut.label().into(),
            _ => CellValue::Null,
        }
    }
}

/// Activity as displayed, with remaining places computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activite {
    pub id: i64,
    pub nom: String,
    pub description: Option<String>,
    pub coach: Option<String>,
    pub capacite: Option<u32>,
    pub participants: Option<u32>,
    pub debut: Option<String>,
    pub fin: Option<String>,
}

impl Activite {
    /// Free places, when both capacity and participants are known.
    pub fn places_restantes(&self) -> Option<u32> {
        Some(self.capacite?.saturating_sub(self.participants?))
    }

    /// "12/20" occupancy, or "-" when capacity is unknown.
    pub fn occupation(&self) -> String {
        match self.capacite {
            Some(cap) => format!("{}/{}", self.participants.unwrap_or(0), cap),
            None => "-".to_string(),
        }
    }
}

impl From<&Activity> for Activite {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            nom: a.name.clone(),
            description: a.description.clone(),
            coach: a.coach.clone(),
            capacite: a.max_capacity,
            participants: a.current_participants,
            debut: a.start_time.clone(),
            fin: a.end_time.clone(),
        }
    }
}

impl Record for Activite {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "nom" => (&self.nom).into(),
            "description" => self.description.clone().into(),
            "coach" => self.coach.clone().into(),
            "capacite" => self.capacite.into(),
            "participants" => self.participants.into(),
            "places_restantes" => self.places_restantes().into(),
            "debut" => self.debut.clone().into(),
            "fin" => self.fin.clone().into(),
            _ => CellValue::Null,
        }
    }
}

pub fn booking_status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => "Confirmée",
        BookingStatus::Pending => "En attente",
        BookingStatus::Cancelled => "Annulée",
    }
}

/// Booking joined with the member and activity it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub membre_id: i64,
    pub membre: String,
    pub activite_id: i64,
    pub activite: String,
    pub statut: BookingStatus,
    pub date: Option<String>,
}

impl Reservation {
    /// Resolve names from the member and activity lists.
    ///
    /// Unknown references show as [`UNKNOWN`].
    pub fn join(booking: &Booking, members: &[Member], activities: &[Activity]) -> Self {
        let membre = members
            .iter()
            .find(|m| m.id == booking.member_id)
            .map(Member::full_name)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let activite = activities
            .iter()
            .find(|a| a.id == booking.activity_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            id: booking.id,
            membre_id: booking.member_id,
            membre,
            activite_id: booking.activity_id,
            activite,
            statut: booking.status,
            date: booking.booking_date.clone(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.statut == BookingStatus::Cancelled
    }
}

impl Record for Reservation {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "membre_id" => self.membre_id.into(),
            "membre" => (&self.membre).into(),
            "activite_id" => self.activite_id.into(),
            "activite" => (&self.activite).into(),
            "statut" => booking_status_label(self.statut).into(),
            "date" => self.date.clone().into(),
            _ => CellValue::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodePaiement {
    Carte,
    Especes,
    Virement,
}

impl MethodePaiement {
    pub fn label(&self) -> &'static str {
        match self {
            MethodePaiement::Carte => "carte",
            MethodePaiement::Especes => "especes",
            MethodePaiement::Virement => "virement",
        }
    }
}

impl From<PaymentMethod> for MethodePaiement {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => MethodePaiement::Carte,
            PaymentMethod::Cash => MethodePaiement::Especes,
            PaymentMethod::Transfer => MethodePaiement::Virement,
        }
    }
}

impl From<MethodePaiement> for PaymentMethod {
    fn from(methode: MethodePaiement) -> Self {
        match methode {
            MethodePaiement::Carte => PaymentMethod::Card,
            MethodePaiement::Especes => PaymentMethod::Cash,
            MethodePaiement::Virement => PaymentMethod::Transfer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutPaiement {
    Complete,
    EnAttente,
    Echoue,
}

impl StatutPaiement {
    pub fn label(&self) -> &'static str {
        match self {
            StatutPaiement::Complete => "Complété",
            StatutPaiement::EnAttente => "En attente",
            StatutPaiement::Echoue => "Échoué",
        }
    }
}

impl From<PaymentStatus> for StatutPaiement {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => StatutPaiement::Complete,
            PaymentStatus::Failed => StatutPaiement::Echoue,
            PaymentStatus::Pending => StatutPaiement::EnAttente,
        }
    }
}

/// Payment as displayed. `montant` is in euros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paiement {
    pub id: i64,
    pub membre_id: i64,
    pub membre_nom: String,
    pub montant: f64,
    pub methode: MethodePaiement,
    pub description: String,
    pub statut: StatutPaiement,
    #[serde(default)]
    pub date: Option<String>,
}

impl Paiement {
    /// Convert a backend payment, resolving the member name from `members`.
    ///
    /// The name is left empty when the member is not in the list.
    pub fn from_payment(p: &Payment, members: &[Member]) -> Self {
        let membre_nom = members
            .iter()
            .find(|m| m.id == p.member_id)
            .map(Member::full_name)
            .unwrap_or_default();
        Self {
            id: p.id,
            membre_id: p.member_id,
            membre_nom,
            montant: p.amount as f64 / 100.0,
            methode: p.payment_method.into(),
            description: p.description.clone(),
            statut: p.status.into(),
            date: p.created_at.clone(),
        }
    }
}

impl Record for Paiement {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "membre_id" => self.membre_id.into(),
            "membre_nom" => (&self.membre_nom).into(),
            "montant" => self.montant.into(),
            "methode" => self.methode.label().into(),
            "description" => (&self.description).into(),
            "statut" => self.statut.label().into(),
            "date" => self.date.clone().into(),
            _ => CellValue::Null,
        }
    }
}

/// A payment to record, entered in euros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NouveauPaiement {
    pub membre_id: i64,
    pub montant: f64,
    pub methode: MethodePaiement,
    pub description: String,
}

impl From<&NouveauPaiement> for CreatePaymentDto {
    fn from(p: &NouveauPaiement) -> Self {
        Self {
            member_id: p.membre_id,
            amount: (p.montant * 100.0).round() as i64,
            payment_method: p.methode.into(),
            description: p.description.clone(),
        }
    }
}

/// Format an amount in euros the French way: `1 234,50 €`.
pub fn format_euros(montant: f64) -> String {
    let cents = (montant * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let units = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    format!("{}{},{:02} €", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, first: &str, last: &str, active: bool) -> Member {
        Member {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            active,
        }
    }

    fn activity(id: i64, name: &str) -> Activity {
        Activity {
            id,
            name: name.to_string(),
            description: None,
            coach: Some("Karim".to_string()),
            max_capacity: Some(20),
            current_participants: Some(12),
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn test_membre_from_member() {
        let m = Membre::from(&member(1, "Jean", "Dupont", false));
        assert_eq!(m.nom, "Dupont");
        assert_eq!(m.prenom, "Jean");
        assert_eq!(m.statut, StatutMembre::Inactif);
        assert_eq!(m.field("nom_complet"), CellValue::from("Jean Dupont"));
        assert_eq!(m.field("telephone"), CellValue::Null);
    }

    #[test]
    fn test_paiement_from_payment() {
        let members = vec![member(7, "Amy", "Martin", true)];
        let payment = Payment {
            id: 1,
            member_id: 7,
            amount: 4990,
            payment_method: PaymentMethod::Cash,
            status: PaymentStatus::Failed,
            description: "Abonnement".to_string(),
            created_at: Some("2024-05-01 10:00:00".to_string()),
        };
        let p = Paiement::from_payment(&payment, &members);
        assert_eq!(p.membre_nom, "Amy Martin");
        assert_eq!(p.date.as_deref(), Some("2024-05-01 10:00:00"));
        assert_eq!(p.field("date"), CellValue::from("2024-05-01 10:00:00"));
        assert_eq!(p.montant, 49.9);
        assert_eq!(p.methode, MethodePaiement::Especes);
        assert_eq!(p.statut, StatutPaiement::Echoue);

        let orphan = Paiement::from_payment(&payment, &[]);
        assert_eq!(orphan.membre_nom, "");

        let undated = Payment {
            created_at: None,
            ..payment
        };
        assert_eq!(Paiement::from_payment(&undated, &members).field("date"), CellValue::Null);
    }

    #[test]
    fn test_pending_and_completed_status() {
        assert_eq!(StatutPaiement::from(PaymentStatus::Pending), StatutPaiement::EnAttente);
        assert_eq!(StatutPaiement::from(PaymentStatus::Completed).label(), "Complété");
    }

    #[test]
    fn test_nouveau_paiement_rounds_to_cents() {
        let p = NouveauPaiement {
            membre_id: 2,
            montant: 19.999,
            methode: MethodePaiement::Virement,
            description: "Cours".to_string(),
        };
        let dto = CreatePaymentDto::from(&p);
        assert_eq!(dto.amount, 2000);
        assert_eq!(dto.payment_method, PaymentMethod::Transfer);
    }

    #[test]
    fn test_reservation_join() {
        let members = vec![member(1, "Jean", "Dupont", true)];
        let activities = vec![activity(5, "Yoga")];
        let booking = Booking {
            id: 9,
            member_id: 1,
            activity_id: 5,
            status: BookingStatus::Confirmed,
            booking_date: None,
            cancellation_date: None,
        };
        let r = Reservation::join(&booking, &members, &activities);
        assert_eq!(r.membre, "Jean Dupont");
        assert_eq!(r.activite, "Yoga");
        assert_eq!(r.field("statut"), CellValue::from("Confirmée"));

        let dangling = Booking {
            member_id: 99,
            activity_id: 99,
            status: BookingStatus::Cancelled,
            ..booking
        };
        let r = Reservation::join(&dangling, &members, &activities);
        assert_eq!(r.membre, UNKNOWN);
        assert_eq!(r.activite, UNKNOWN);
        assert!(r.is_cancelled());
    }

    #[test]
    fn test_activite_places() {
        let a = Activite::from(&activity(1, "Boxe"));
        assert_eq!(a.places_restantes(), Some(8));
        assert_eq!(a.occupation(), "12/20");

        let open = Activite {
            capacite: None,
            ..a
        };
        assert_eq!(open.places_restantes(), None);
        assert_eq!(open.occupation(), "-");
    }

    #[test]
    fn test_format_euros() {
        assert_eq!(format_euros(49.9), "49,90 €");
        assert_eq!(format_euros(0.0), "0,00 €");
        assert_eq!(format_euros(1234.5), "1 234,50 €");
        assert_eq!(format_euros(1_000_000.0), "1 000 000,00 €");
        assert_eq!(format_euros(-5.25), "-5,25 €");
    }
}
