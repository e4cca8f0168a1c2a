//! Unit tests for the inventory API module.

mod construction_tests;

use crate::api::InventoryApi;
use crate::session::SessionManager;

/// Client pointed at a mock server, already holding `test_token`.
pub(super) fn signed_in_api(mock_uri: &str) -> InventoryApi {
    let mut session = SessionManager::in_memory();
    session.begin("test_token".to_string());
    session.take_pending_route();
    InventoryApi::new(mock_uri, session)
}

pub(super) fn signed_out_api(mock_uri: &str) -> InventoryApi {
    InventoryApi::new(mock_uri, SessionManager::in_memory())
}
