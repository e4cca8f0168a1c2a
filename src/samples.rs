//! Sample product data pulled from public third-party APIs.

use std::fmt;
use std::str::FromStr;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::models::NewProduct;

const POKEAPI_BASE: &str = "https://pokeapi.co/api/v2";
const RICK_AND_MORTY_BASE: &str = "https://rickandmortyapi.com/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    Pokemon,
    RickAndMorty,
}

impl SampleSource {
    pub fn label(&self) -> &'static str {
        match self {
            SampleSource::Pokemon => "PokéAPI",
            SampleSource::RickAndMorty => "Rick and Morty",
        }
    }
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleSource::Pokemon => "pokemon",
            SampleSource::RickAndMorty => "rick-and-morty",
        })
    }
}

impl FromStr for SampleSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pokemon" | "pokeapi" => Ok(SampleSource::Pokemon),
            "rick-and-morty" | "rickandmorty" | "rick" => Ok(SampleSource::RickAndMorty),
            other => Err(format!("Unknown sample source: {other}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedList {
    #[serde(default)]
    results: Vec<NamedEntry>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    #[serde(default)]
    name: Option<String>,
}

/// Fetches sample records and maps them to products to create.
#[derive(Debug, Clone)]
pub struct SampleFetcher {
    client: Client,
    pokeapi_base: String,
    rick_and_morty_base: String,
}

impl Default for SampleFetcher {
    fn default() -> Self {
        Self::with_bases(POKEAPI_BASE, RICK_AND_MORTY_BASE)
    }
}

impl SampleFetcher {
    pub fn with_bases(pokeapi_base: &str, rick_and_morty_base: &str) -> Self {
        Self {
            client: Client::new(),
            pokeapi_base: pokeapi_base.trim_end_matches('/').to_string(),
            rick_and_morty_base: rick_and_morty_base.trim_end_matches('/').to_string(),
        }
    }

    /// Up to `count` products from `source`. An empty result is an error.
    pub async fn fetch(&self, source: SampleSource, count: usize) -> Result<Vec<NewProduct>> {
        let items = match source {
            SampleSource::Pokemon => self.fetch_pokemon(count).await?,
            SampleSource::RickAndMorty => self.fetch_rick_and_morty(count).await?,
        };
        if items.is_empty() {
            return Err(ClientError::ExternalSource(
                "No items found to import".to_string(),
            ));
        }
        log::info!("Fetched {} sample items from {}", items.len(), source.label());
        Ok(items)
    }

    async fn fetch_pokemon(&self, count: usize) -> Result<Vec<NewProduct>> {
        let url = format!("{}/pokemon", self.pokeapi_base);
        let list = self
            .get_list(&url, &[("limit", count.to_string())], SampleSource::Pokemon)
            .await?;
        Ok(pokemon_products(list, count))
    }

    async fn fetch_rick_and_morty(&self, count: usize) -> Result<Vec<NewProduct>> {
        let url = format!("{}/character", self.rick_and_morty_base);
        let list = self.get_list(&url, &[], SampleSource::RickAndMorty).await?;
        Ok(character_products(list, count))
    }

    async fn get_list(
        &self,
        url: &str,
        query: &[(&str, String)],
        source: SampleSource,
    ) -> Result<NamedList> {
        let external_error =
            || ClientError::ExternalSource(format!("External API error ({})", source.label()));

        log::debug!("Fetching sample data from {url}");
        let response = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", "inventory_client/0.1")
            .send()
            .await
            .map_err(|e| {
                log::error!("{} request failed: {}", source.label(), e);
                external_error()
            })?;

        if !response.status().is_success() {
            log::error!("{} returned {}", source.label(), response.status());
            return Err(external_error());
        }

        let text = response.text().await.map_err(|_| external_error())?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!("Unexpected {} payload: {}", source.label(), e);
            external_error()
        })
    }
}

fn pokemon_products(list: NamedList, count: usize) -> Vec<NewProduct> {
    list.results
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, entry)| NewProduct {
            name: format!("Pkmn: {}", entry.name.unwrap_or_default()),
            stock: 5 + i as i64,
        })
        .collect()
}

fn character_products(list: NamedList, count: usize) -> Vec<NewProduct> {
    list.results
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, entry)| NewProduct {
            name: format!(
                "Char: {}",
                entry
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string())
            ),
            stock: 3 + (i as i64 % 7),
        })
        .collect()
}

#[cfg(test)]
#[path = "samples_tests.rs"]
mod tests;
