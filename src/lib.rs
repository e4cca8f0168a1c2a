//! Inventory Client - session handling and product stock management
//!
//! Talks to the inventory REST service: signs users in, lists, creates,
//! updates and deletes products, exports them as CSV and seeds sample data
//! from public APIs. Stock updates are deltas guarded by the product version
//! the client last saw; a stale version is refreshed, never retried.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod notice;
pub mod render;
pub mod samples;
pub mod session;
pub mod store;

pub use api::InventoryApi;
pub use commands::{dispatch, Command};
pub use config::Config;
pub use error::{ClientError, Result};
pub use models::{NewProduct, Product};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use samples::{SampleFetcher, SampleSource};
pub use session::{FileSessionStore, MemorySessionStore, Route, SessionManager, SessionStore};
pub use store::{ActionOutcome, ActionPhase, ProductStore};
