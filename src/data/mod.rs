//! Display data derived from datasets.
//!
//! ```text
//! Dataset (backend shape)
//!        │
//!        ▼
//! DashboardData::from_dataset()
//!        │
//!        ├──▶ Membre / Activite / Reservation / Paiement
//!        │
//!        └──▶ DashboardStats
//! ```

pub mod dashboard;

pub use dashboard::{DashboardData, DashboardStats, RECENT_BOOKINGS};
