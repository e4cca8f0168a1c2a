//! Plain-text rendering of the product view.

use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};

use crate::models::Product;

/// What the product area currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Fetch in flight; front ends draw placeholders
    Loading,
    /// Server returned no products
    Empty,
    List,
}

/// One rendered list entry, keyed by product id
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: i64,
    pub summary: String,
    /// Present only when the disclosure for this id is open
    pub details: Option<Vec<String>>,
}

impl ProductRow {
    pub fn is_expanded(&self) -> bool {
        self.details.is_some()
    }
}

/// Builds exactly one row per product, in server order.
pub fn product_rows(products: &[Product], open_details: &HashMap<i64, bool>) -> Vec<ProductRow> {
    products
        .iter()
        .map(|product| {
            let is_open = open_details.get(&product.id).copied().unwrap_or(false);
            ProductRow {
                id: product.id,
                summary: summary_line(product, is_open),
                details: is_open.then(|| detail_lines(product)),
            }
        })
        .collect()
}

fn summary_line(product: &Product, is_open: bool) -> String {
    let marker = if is_open { "▾" } else { "▸" };
    let low = if product.is_low_stock() { " (low)" } else { "" };
    format!(
        "{marker} #{} {}  Stock: {}{low}",
        product.id, product.name, product.stock
    )
}

fn detail_lines(product: &Product) -> Vec<String> {
    vec![
        format!("Created  {}", format_local(product.created_at)),
        format!("Updated  {}", format_local(product.updated_at)),
        format!("Version  {}", product.version),
    ]
}

/// Local-time display of a server timestamp, or an em dash when absent.
pub fn format_local(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "—".to_string(),
    }
}

/// Renders the whole product area as text.
pub fn render_view(state: ViewState, rows: &[ProductRow]) -> String {
    match state {
        ViewState::Loading => "Loading products...\n".to_string(),
        ViewState::Empty => {
            "No products yet. Add one, or seed sample data.\n".to_string()
        }
        ViewState::List => {
            let mut output = String::new();
            for row in rows {
                output.push_str(&row.summary);
                output.push('\n');
                if let Some(details) = &row.details {
                    for line in details {
                        output.push_str(&format!("      {line}\n"));
                    }
                }
            }
            output
        }
    }
}
