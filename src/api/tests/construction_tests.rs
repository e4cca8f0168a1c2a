//! Tests for InventoryApi construction.

use super::signed_out_api;

#[test]
fn trims_trailing_slash_from_base_url() {
    let api = signed_out_api("http://localhost:8000/");
    assert_eq!(api.base_url(), "http://localhost:8000");
}

#[test]
fn builds_product_urls() {
    let api = signed_out_api("http://localhost:8000");
    assert_eq!(api.products_url(), "http://localhost:8000/products");
    assert_eq!(api.product_url(7), "http://localhost:8000/products/7");
}

#[test]
fn new_client_is_signed_out() {
    let api = signed_out_api("http://localhost:8000");
    assert!(!api.session().is_signed_in());
}
