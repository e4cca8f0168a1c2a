//! In-memory inventory service used by the integration tests.
//!
//! Mounted on a wiremock server as a single catch-all responder, it keeps real
//! state between requests so version checks and read-after-write behave the
//! way the live service does.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use inventory_client::{InventoryApi, ProductStore, SessionManager};
use serde_json::{json, Value};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "integration-token";
const TIMESTAMP: &str = "2024-05-01T10:00:00Z";

#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub id: i64,
    pub name: String,
    pub stock: i64,
    pub version: i64,
}

impl StoredProduct {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "stock": self.stock,
            "version": self.version,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })
    }
}

#[derive(Debug, Default)]
struct State {
    products: Vec<StoredProduct>,
    next_id: i64,
    sessions_revoked: bool,
    patch_requests: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeInventory {
    state: Arc<Mutex<State>>,
}

impl FakeInventory {
    /// Starts a mock server answering every request from this fake.
    pub async fn start() -> (MockServer, FakeInventory) {
        let server = MockServer::start().await;
        let fake = FakeInventory::default();
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    /// Inserts a product directly, bypassing the HTTP surface.
    pub fn insert(&self, name: &str, stock: i64, version: i64) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.products.push(StoredProduct {
            id,
            name: name.to_string(),
            stock,
            version,
        });
        id
    }

    pub fn product(&self, id: i64) -> Option<StoredProduct> {
        let state = self.state.lock().unwrap();
        state.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn patch_requests(&self) -> usize {
        self.state.lock().unwrap().patch_requests
    }

    /// Every token stops working, as if the server rotated its signing key.
    pub fn revoke_sessions(&self) {
        self.state.lock().unwrap().sessions_revoked = true;
    }

    fn authorized(&self, request: &Request) -> bool {
        let state = self.state.lock().unwrap();
        let expected = format!("Bearer {TOKEN}");
        !state.sessions_revoked
            && request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected)
    }

    fn handle_products(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        match request.method.as_str() {
            "GET" => {
                let list: Vec<Value> = state.products.iter().map(StoredProduct::to_json).collect();
                ResponseTemplate::new(200).set_body_json(list)
            }
            "POST" => {
                let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
                    return detail(422, "Invalid body");
                };
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if name.is_empty() {
                    return detail(422, "Name required");
                }
                state.next_id += 1;
                let product = StoredProduct {
                    id: state.next_id,
                    name,
                    stock: body["stock"].as_i64().unwrap_or(0),
                    version: 1,
                };
                let created = product.to_json();
                state.products.push(product);
                ResponseTemplate::new(201).set_body_json(created)
            }
            _ => ResponseTemplate::new(405),
        }
    }

    fn handle_product(&self, id: i64, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        match request.method.as_str() {
            "PATCH" => {
                state.patch_requests += 1;
                let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
                    return detail(422, "Invalid body");
                };
                let (Some(delta), Some(version)) = (body["stock"].as_i64(), body["version"].as_i64())
                else {
                    return detail(422, "stock and version required");
                };
                let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
                    return detail(404, "Product not found");
                };
                if product.version != version {
                    return detail(409, "Version conflict");
                }
                product.stock += delta;
                product.version += 1;
                ResponseTemplate::new(200).set_body_json(product.to_json())
            }
            "DELETE" => {
                let before = state.products.len();
                state.products.retain(|p| p.id != id);
                if state.products.len() == before {
                    detail(404, "Product not found")
                } else {
                    ResponseTemplate::new(204)
                }
            }
            _ => ResponseTemplate::new(405),
        }
    }
}

impl Respond for FakeInventory {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().to_string();

        if path == "/auth/login" {
            return ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": TOKEN, "token_type": "bearer"}));
        }
        if path == "/auth/register" {
            return ResponseTemplate::new(201).set_body_json(json!({"id": 1}));
        }

        if !self.authorized(request) {
            return detail(401, "Not authenticated");
        }

        if path == "/products" {
            return self.handle_products(request);
        }
        match path
            .strip_prefix("/products/")
            .and_then(|id| id.parse::<i64>().ok())
        {
            Some(id) => self.handle_product(id, request),
            None => detail(404, "Not Found"),
        }
    }
}

fn detail(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "detail": message }))
}

/// A store signed in against `server` with an in-memory session.
pub async fn signed_in_store(server: &MockServer) -> ProductStore {
    let api = InventoryApi::new(&server.uri(), SessionManager::in_memory());
    let mut store = ProductStore::new(api, Duration::from_secs(5));
    let outcome = store.login("alice@example.com", "secret").await;
    assert!(outcome.is_completed(), "login failed: {outcome:?}");
    store
}
