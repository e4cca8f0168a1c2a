//! Product collection endpoints.

use log::{debug, info};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

use crate::error::{ClientError, Result};
use crate::models::{NewProduct, Product, StockUpdate};

use super::response::parse_json;
use super::InventoryApi;

impl InventoryApi {
    /// `GET /products`: the authoritative list, in server order.
    pub async fn list_products(&mut self) -> Result<Vec<Product>> {
        let auth = self.require_credential()?;
        let url = self.products_url();
        debug!("Fetching products from {url}");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        debug!("List products response status: {}", response.status());

        let response = self
            .ensure_success(response, "Failed to fetch products")
            .await?;
        let products: Vec<Product> = parse_json(response).await?;
        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    /// `POST /products`
    pub async fn create_product(&mut self, product: &NewProduct) -> Result<Product> {
        let auth = self.require_credential()?;
        let url = self.products_url();
        debug!("Creating product '{}' (stock {})", product.name, product.stock);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .json(product)
            .send()
            .await?;

        let response = self
            .ensure_success(response, "Failed to add product")
            .await?;
        let created: Product = parse_json(response).await?;
        info!("Created product #{} '{}'", created.id, created.name);
        Ok(created)
    }

    /// `PATCH /products/{id}` with a stock delta guarded by `known_version`.
    ///
    /// A 409 means the server holds a newer version and applied nothing; it is
    /// returned as `VersionConflict` and never retried here.
    pub async fn patch_stock(&mut self, id: i64, known_version: i64, delta: i64) -> Result<Product> {
        let auth = self.require_credential()?;
        let url = self.product_url(id);
        let body = StockUpdate {
            stock: delta,
            version: known_version,
        };
        debug!("Patching product #{id}: delta {delta:+} at version {known_version}");

        let response = self
            .client
            .patch(&url)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            info!("Version conflict on product #{id} (sent version {known_version})");
            return Err(ClientError::VersionConflict { id });
        }

        let response = self
            .ensure_success(response, "Failed to update stock")
            .await?;
        let updated: Product = parse_json(response).await?;
        info!(
            "Product #{} stock now {} (version {})",
            updated.id, updated.stock, updated.version
        );
        Ok(updated)
    }

    /// `DELETE /products/{id}`. A 409 here is an ordinary failure.
    pub async fn delete_product(&mut self, id: i64) -> Result<()> {
        let auth = self.require_credential()?;
        let url = self.product_url(id);
        debug!("Deleting product #{id}");

        let response = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        self.ensure_success(response, "Failed to delete product")
            .await?;
        info!("Deleted product #{id}");
        Ok(())
    }
}
