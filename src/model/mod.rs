//! The two record shapes of the system.
//!
//! - [`backend`]: English records exactly as the REST services exchange them
//! - [`front`]: French display records, with the adapters that translate
//!   backend records into them (and new payments back)
//!
//! ```text
//! Member ──▶ Membre          Payment + [Member] ──▶ Paiement
//! Activity ──▶ Activite      Booking + [Member] + [Activity] ──▶ Reservation
//!                            NouveauPaiement ──▶ CreatePaymentDto
//! ```

pub mod backend;
pub mod front;

pub use backend::{
    Activity, Booking, BookingStatus, CreatePaymentDto, Member, MemberUpdate, NewActivity,
    NewBooking, NewMember, Payment, PaymentIntent, PaymentIntentRequest, PaymentMethod,
    PaymentStatus,
};
pub use front::{
    booking_status_label, format_euros, Activite, Membre, MethodePaiement, NouveauPaiement,
    Paiement, Reservation, StatutMembre, StatutPaiement, UNKNOWN,
};
