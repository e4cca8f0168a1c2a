//! Product view state and the user-facing actions that mutate it.
//!
//! Every mutating action follows the same shape:
//!
//! ```text
//! idle -> in-flight -> success      -> refresh -> idle
//!                   -> conflict     -> refresh -> idle
//!                   -> unauthorized -> logout  -> terminal
//!                   -> other error  -> idle (with notice)
//! ```
//!
//! After a mutation the full list is always re-fetched; local state is never
//! patched from the mutation response.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::api::InventoryApi;
use crate::error::ClientError;
use crate::export::export_products_to_file;
use crate::models::{Credentials, NewProduct, Product, Registration};
use crate::notice::NoticeBoard;
use crate::render::{product_rows, render_view, ProductRow, ViewState};
use crate::samples::{SampleFetcher, SampleSource};
use crate::session::{Route, SessionManager};

/// Where the current action is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    InFlight,
    /// The session was cleared by a 401; this view is done until re-login
    Terminal,
}

/// How a user action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Server rejected a stale version; the list was re-fetched
    Conflict,
    /// A 401 cleared the session and routed to login
    SessionExpired,
    /// Rejected locally or by the server; the message was shown as a notice
    Failed(String),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

pub struct ProductStore {
    api: InventoryApi,
    products: Vec<Product>,
    details_open: HashMap<i64, bool>,
    notices: NoticeBoard,
    phase: ActionPhase,
    view: ViewState,
}

impl ProductStore {
    pub fn new(api: InventoryApi, notice_duration: Duration) -> Self {
        Self {
            api,
            products: Vec::new(),
            details_open: HashMap::new(),
            notices: NoticeBoard::new(notice_duration),
            phase: ActionPhase::Idle,
            view: ViewState::Loading,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn session(&self) -> &SessionManager {
        self.api.session()
    }

    pub fn take_pending_route(&mut self) -> Option<Route> {
        self.api.session_mut().take_pending_route()
    }

    pub fn rows(&self) -> Vec<ProductRow> {
        product_rows(&self.products, &self.details_open)
    }

    pub fn render(&self) -> String {
        render_view(self.view, &self.rows())
    }

    // ── session ──────────────────────────────────────────────────────

    pub async fn login(&mut self, email: &str, password: &str) -> ActionOutcome {
        let credentials = Credentials {
            username: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(()) => {
                self.phase = ActionPhase::Idle;
                self.notices.success("Signed in");
                ActionOutcome::Completed
            }
            Err(e) => self.fail(e, "Login failed"),
        }
    }

    pub async fn register(&mut self, email: &str, password: &str) -> ActionOutcome {
        let registration = Registration {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.register(&registration).await {
            Ok(()) => {
                self.phase = ActionPhase::Idle;
                self.notices.success("Registered. Signed in");
                ActionOutcome::Completed
            }
            Err(e) => self.fail(e, "Registration failed"),
        }
    }

    pub fn logout(&mut self) -> ActionOutcome {
        self.api.session_mut().logout();
        self.clear_view();
        self.notices.success("Logged out");
        ActionOutcome::Completed
    }

    // ── reads ────────────────────────────────────────────────────────

    /// Replaces local state with the server's current list.
    pub async fn refresh(&mut self) -> ActionOutcome {
        if let Err(e) = self.api.require_credential() {
            return self.fail(e, "Failed to fetch products");
        }
        self.view = ViewState::Loading;
        match self.api.list_products().await {
            Ok(products) => {
                debug!("Rendering {} products", products.len());
                self.view = if products.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::List
                };
                self.products = products;
                if self.phase != ActionPhase::Terminal {
                    self.phase = ActionPhase::Idle;
                }
                ActionOutcome::Completed
            }
            Err(e) => {
                self.view = if self.products.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::List
                };
                self.fail(e, "Failed to fetch products")
            }
        }
    }

    // ── mutations ────────────────────────────────────────────────────

    /// Validates raw form input, then creates the product.
    pub async fn create_from_input(&mut self, name: &str, stock: &str) -> ActionOutcome {
        match validate_new_product(name, stock) {
            Ok(product) => self.create(product).await,
            Err(e) => self.fail(e, "Failed to add product"),
        }
    }

    pub async fn create(&mut self, product: NewProduct) -> ActionOutcome {
        if product.name.trim().is_empty() {
            return self.fail(
                ClientError::Validation("Product name required".to_string()),
                "Failed to add product",
            );
        }
        if let Err(e) = self.begin_action() {
            return self.fail(e, "Failed to add product");
        }
        match self.api.create_product(&product).await {
            Ok(_) => {
                self.notices.success("Product added");
                self.refresh_after_mutation().await
            }
            Err(e) => self.fail(e, "Failed to add product"),
        }
    }

    pub async fn add_sample_product(&mut self) -> ActionOutcome {
        self.create_from_input("Sample Item", "5").await
    }

    /// Sends `delta` guarded by `known_version`. On conflict, re-fetches and
    /// leaves it to the user to try again against the new version.
    pub async fn apply_stock_delta(
        &mut self,
        id: i64,
        known_version: i64,
        delta: i64,
    ) -> ActionOutcome {
        if delta == 0 {
            return self.fail(
                ClientError::Validation("Stock change must not be zero".to_string()),
                "Failed to update stock",
            );
        }
        if let Err(e) = self.begin_action() {
            return self.fail(e, "Failed to update stock");
        }
        match self.api.patch_stock(id, known_version, delta).await {
            Ok(_) => {
                self.notices.success(if delta > 0 {
                    "Stock increased"
                } else {
                    "Stock decreased"
                });
                self.refresh_after_mutation().await
            }
            Err(ClientError::VersionConflict { .. }) => {
                self.notices.error("Version conflict. Refreshing…");
                match self.refresh().await {
                    ActionOutcome::SessionExpired => ActionOutcome::SessionExpired,
                    _ => ActionOutcome::Conflict,
                }
            }
            Err(e) => self.fail(e, "Failed to update stock"),
        }
    }

    /// `+1` against the version currently rendered for `id`.
    pub async fn increment(&mut self, id: i64) -> ActionOutcome {
        self.step(id, 1).await
    }

    /// `-1` against the version currently rendered for `id`.
    pub async fn decrement(&mut self, id: i64) -> ActionOutcome {
        self.step(id, -1).await
    }

    async fn step(&mut self, id: i64, delta: i64) -> ActionOutcome {
        match self.product(id).map(|p| p.version) {
            Some(version) => self.apply_stock_delta(id, version, delta).await,
            None => self.fail(
                ClientError::Validation(format!("Unknown product #{id}. Refresh and try again.")),
                "Failed to update stock",
            ),
        }
    }

    pub async fn delete(&mut self, id: i64) -> ActionOutcome {
        if let Err(e) = self.begin_action() {
            return self.fail(e, "Failed to delete product");
        }
        match self.api.delete_product(id).await {
            Ok(()) => {
                self.details_open.remove(&id);
                self.notices.success("Product deleted");
                self.refresh_after_mutation().await
            }
            Err(e) => self.fail(e, "Failed to delete product"),
        }
    }

    /// Confirmation text for deleting `id`. Names the product when it is in
    /// the current list, otherwise falls back to the id.
    pub fn delete_prompt(&self, id: i64) -> String {
        match self.product(id) {
            Some(p) => format!("Delete \"{}\"? This cannot be undone.", p.name),
            None => format!("Delete product #{id}? This cannot be undone."),
        }
    }

    // ── local view state ─────────────────────────────────────────────

    /// Flips the details disclosure for `id`, returning the new state.
    pub fn toggle_details(&mut self, id: i64) -> bool {
        let open = !self.details_open.get(&id).copied().unwrap_or(false);
        self.details_open.insert(id, open);
        open
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.details_open.get(&id).copied().unwrap_or(false)
    }

    // ── convenience features ─────────────────────────────────────────

    /// Fetches a fresh list and writes it as CSV to `path`.
    pub async fn export_csv(&mut self, path: &Path) -> ActionOutcome {
        if let Err(e) = self.api.require_credential() {
            return self.fail(e, "Failed to export CSV");
        }
        let products = match self.api.list_products().await {
            Ok(products) => products,
            Err(e) => return self.fail(e, "Failed to fetch products for export"),
        };
        match export_products_to_file(&products, path) {
            Ok(()) => {
                self.notices.success("CSV exported successfully");
                ActionOutcome::Completed
            }
            Err(e) => self.fail(e, "Failed to export CSV"),
        }
    }

    /// Pulls sample records from `source` and creates each one. The first
    /// failing create aborts the rest.
    pub async fn seed_samples(
        &mut self,
        fetcher: &SampleFetcher,
        source: SampleSource,
        count: usize,
    ) -> ActionOutcome {
        if let Err(e) = self.begin_action() {
            return self.fail(e, "Failed to seed sample data");
        }
        let items = match fetcher.fetch(source, count).await {
            Ok(items) => items,
            Err(e) => return self.fail(e, "Failed to seed sample data"),
        };

        for item in &items {
            match self.api.create_product(item).await {
                Ok(_) => {}
                Err(ClientError::Server { status, message }) => {
                    let message = format!("Failed to add: {} — {}", item.name, message);
                    return self.fail(
                        ClientError::Server { status, message },
                        "Failed to seed sample data",
                    );
                }
                Err(e) => return self.fail(e, "Failed to seed sample data"),
            }
        }

        info!("Seeded {} items from {}", items.len(), source.label());
        self.notices.success(format!("Seeded {} items", items.len()));
        self.refresh_after_mutation().await
    }

    // ── helpers ──────────────────────────────────────────────────────

    fn begin_action(&mut self) -> Result<(), ClientError> {
        self.api.require_credential()?;
        self.phase = ActionPhase::InFlight;
        Ok(())
    }

    /// Re-fetches after a successful mutation. A failed fetch leaves its own
    /// notice but does not undo the mutation's success.
    async fn refresh_after_mutation(&mut self) -> ActionOutcome {
        match self.refresh().await {
            ActionOutcome::SessionExpired => ActionOutcome::SessionExpired,
            _ => ActionOutcome::Completed,
        }
    }

    fn clear_view(&mut self) {
        self.products.clear();
        self.details_open.clear();
        self.view = ViewState::Loading;
    }

    fn fail(&mut self, err: ClientError, fallback: &str) -> ActionOutcome {
        match err {
            ClientError::SessionExpired => {
                self.phase = ActionPhase::Terminal;
                self.clear_view();
                self.notices.error(ClientError::SessionExpired.to_string());
                ActionOutcome::SessionExpired
            }
            other => {
                if self.phase != ActionPhase::Terminal {
                    self.phase = ActionPhase::Idle;
                }
                let message = match &other {
                    ClientError::Network(_) | ClientError::Parse(_) => {
                        format!("{fallback}: {other}")
                    }
                    _ => {
                        let text = other.to_string();
                        if text.is_empty() {
                            fallback.to_string()
                        } else {
                            text
                        }
                    }
                };
                self.notices.error(message.clone());
                ActionOutcome::Failed(message)
            }
        }
    }
}

/// Trims the name and parses the stock field, rejecting bad input before
/// anything is sent.
pub fn validate_new_product(name: &str, stock: &str) -> Result<NewProduct, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("Product name required".to_string()));
    }
    let stock = stock
        .trim()
        .parse::<i64>()
        .map_err(|_| ClientError::Validation("Stock must be a number".to_string()))?;
    Ok(NewProduct {
        name: name.to_string(),
        stock,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
