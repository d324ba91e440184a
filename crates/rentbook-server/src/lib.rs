//! # rentbook-server
//!
//! The REST API over [`rentbook`]. Routes are mounted under a prefix
//! (`/rent` by default):
//!
//! | Method | Path | Input |
//! |---|---|---|
//! | GET | `/all-flats` | `demoLogin` |
//! | GET | `/tenants/formData` | `demoLogin` |
//! | GET | `/tenants/financial-total` | `from`, `to`, `tenant`, `demoLogin` |
//! | POST | `/add-rent-entry` | body: `sheet`, `values`, `isElectricBill`, `demoLogin` |
//! | GET | `/recent-entries` | `sheet`, `page`, `pageSize`, `demoLogin` |
//! | GET | `/amount` | `sheet`, `monthYear`, `isElectricBill`, `demoLogin` |
//! | PUT | `/amount` | body: `sheet`, `monthYear`, `values`, `isElectricBill`, `demoLogin` |
//! | DELETE | `/amount` | `sheet`, `monthYear`, `isElectricBill`, `demoLogin` |
//! | PUT | `/update-summary` | body: `flat`, `values`, `demoLogin` |
//!
//! `GET /health` sits outside the prefix and needs no token.

pub mod auth;
pub mod config;
pub mod cors;
pub mod params;
pub mod response;
pub mod router;
pub mod server;

pub use auth::TokenGate;
pub use config::{Backend, Config, ConfigError};
pub use cors::CorsPolicy;
pub use response::{ApiError, Reply};
pub use router::{route, AppState};
pub use server::serve;
