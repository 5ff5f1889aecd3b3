// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # centre-admin
//!
//! A terminal administration dashboard for a sports-center management
//! system, and the library behind it.
//!
//! Members, activities, bookings and payments are fetched from three backend
//! services and shown as searchable, sortable, paginated tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (adapt)  │    │ (table) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐     ┌─────────┐                                │
//! │  │ source  │────▶│   api   │──▶ gateway / payments / intents│
//! │  │ (input) │     └─────────┘                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`table`]**: the generic tabular view engine (search, stable sort,
//!   pagination) over any [`Record`]
//! - **[`model`]**: backend records and the French display records, with the
//!   adapters between them
//! - **[`api`]**: HTTP clients; Basic auth on the gateway, a JWT on the
//!   payment service
//! - **[`source`]**: the [`DataSource`] trait with file, channel and HTTP
//!   implementations
//! - **[`data`]**: dashboard data and statistics built from a [`Dataset`]
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal front-end
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Browse a dataset fixture
//! centre-admin --file centre.json
//!
//! # Live backends
//! centre-admin --gateway http://localhost:8080 --user admin --password admin
//! ```
//!
//! ### The table engine on its own
//!
//! ```
//! use centre_admin::table::{Column, TableView};
//! use serde_json::json;
//!
//! let records: Vec<_> = (1..=25).map(|i| json!({ "id": i, "nom": format!("Membre {}", i) })).collect();
//! let columns = vec![Column::new("nom", "Nom").sortable()];
//!
//! let mut view = TableView::new().with_search_keys(["nom"]);
//! view.set_page(3);
//! let page = view.compute_view(&records, &columns, 10);
//! assert_eq!(page.summary(), "Affichage de 21 à 25 sur 25 résultats");
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use centre_admin::{App, ChannelSource, Dataset};
//!
//! let (tx, source) = ChannelSource::create("tests");
//! tx.send(Dataset::default()).unwrap();
//! let app = App::new(Box::new(source), 10);
//! ```
//!
//! ### Fetching from the backends
//!
//! ```no_run
//! use centre_admin::{source::fetch_dataset, Session, Settings};
//!
//! # tokio_test::block_on(async {
//! let mut session = Session::from_settings(&Settings::default())?;
//! session.login("admin", "admin").await?;
//!
//! let dataset = fetch_dataset(&session).await?;
//! println!("{} membres", dataset.members.len());
//! # Ok::<(), centre_admin::ApiError>(())
//! # });
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod model;
pub mod source;
pub mod table;
pub mod ui;

pub use api::{ApiError, GatewayClient, IntentClient, PaymentClient, Session};
pub use app::{App, View};
pub use config::Settings;
pub use data::{DashboardData, DashboardStats};
pub use source::{Action, ChannelSource, DataSource, Dataset, FileSource, HttpSource};
pub use table::{BodyState, CellValue, Column, PageView, Record, RecordId, TableView};
