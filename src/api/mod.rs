//! Clients for the three backend services.
//!
//! | Service  | Default origin          | Authentication                  |
//! |----------|-------------------------|---------------------------------|
//! | Gateway  | `http://localhost:8080` | HTTP Basic on every request     |
//! | Payments | `http://localhost:8084` | Bearer JWT from the token route |
//! | Intents  | `http://localhost:3001` | none                            |
//!
//! [`Session`] ties the first two together behind a single login.

mod error;
mod gateway;
mod http;
mod intent;
mod payment;
mod session;

pub use error::{error_message, ApiError, GENERIC_ERROR};
pub use gateway::{GatewayClient, GatewayClientBuilder, DEFAULT_GATEWAY_URL};
pub use http::{Auth, HttpService, DEFAULT_TIMEOUT};
pub use intent::{IntentClient, DEFAULT_INTENT_URL};
pub use payment::{PaymentClient, DEFAULT_PAYMENT_URL};
pub use session::Session;
