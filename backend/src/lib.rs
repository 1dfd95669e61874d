//! # Ticketdock Backend
//!
//! HTTP client for the hosted backend-as-a-service that stores Ticketdock's
//! data: a REST table API, a password auth service and a public object store.
//!
//! The client knows nothing about listings or events. Callers describe
//! selects with [`TableQuery`] and decode rows into their own types.
//!
//! ## Example
//!
//! ```no_run
//! use ticketdock_backend::{BackendClient, Direction, TableQuery};
//!
//! # async fn example() -> Result<(), ticketdock_backend::BackendError> {
//! let client = BackendClient::from_env()?;
//! let query = TableQuery::new("events")
//!     .gte("date", "2025-01-01T00:00:00Z")
//!     .order("date", Direction::Ascending)
//!     .limit(20);
//! let events = client.select::<serde_json::Value>(&query).await?;
//! println!("{} upcoming events", events.rows.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod storage;

pub use auth::{AuthUser, Session};
pub use client::BackendClient;
pub use config::BackendConfig;
pub use error::{BackendError, Result};
pub use query::{Direction, QueryResult, TableQuery};
