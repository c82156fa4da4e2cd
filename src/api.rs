use std::sync::OnceLock;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Deserialize;

use crate::state::{EntityBatch, ListingPage, NameEntry, Pokemon, PokemonAbility, PokemonStat};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";

/// Upper bound for the one-shot name index request. Upstream lists ~1300 entries.
pub const ALL_NAMES_LIMIT: u32 = 2000;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("response parse error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Catalogue: Send + Sync {
    async fn fetch_entity(&self, id: u32) -> Result<Pokemon, UpstreamError>;

    async fn fetch_listing_page(&self, offset: u32, limit: u32)
        -> Result<ListingPage, UpstreamError>;

    async fn fetch_all_names(&self) -> Result<Vec<NameEntry>, UpstreamError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
    next: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

impl From<PokemonResponse> for Pokemon {
    fn from(response: PokemonResponse) -> Self {
        Pokemon {
            id: response.id,
            name: response.name,
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| PokemonStat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| PokemonAbility {
                    name: slot.ability.name,
                    is_hidden: slot.is_hidden,
                })
                .collect(),
            sprite: pointer_string(&response.sprites, "/front_default"),
        }
    }
}

impl From<ListResponse> for ListingPage {
    fn from(response: ListResponse) -> Self {
        ListingPage {
            entries: name_entries(response.results),
            has_more: response.next.is_some(),
        }
    }
}

/// reqwest-backed catalogue talking to a PokeAPI-compatible base URL.
#[derive(Clone, Debug)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: String,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl PokeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install the process-wide client. The first call wins.
    pub fn install(base_url: impl Into<String>) -> &'static PokeApi {
        let base_url = base_url.into();
        SHARED.get_or_init(|| PokeApi::new(base_url))
    }

    /// Raw body of an absolute url, e.g. a sprite image.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        tracing::debug!(%url, "upstream request");
        let response = self.client.get(url).send().await.map_err(|err| {
            tracing::warn!(%url, error = %err, "upstream request failed");
            UpstreamError::Request(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::Request(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let bytes = self.fetch_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            tracing::warn!(%url, error = %err, "upstream body did not decode");
            UpstreamError::Decode(err.to_string())
        })
    }
}

#[async_trait]
impl Catalogue for PokeApi {
    async fn fetch_entity(&self, id: u32) -> Result<Pokemon, UpstreamError> {
        let url = format!("{}/pokemon/{id}/", self.base_url);
        let response: PokemonResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn fetch_listing_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<ListingPage, UpstreamError> {
        let url = format!("{}/pokemon?offset={offset}&limit={limit}", self.base_url);
        let response: ListResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn fetch_all_names(&self) -> Result<Vec<NameEntry>, UpstreamError> {
        let page = self.fetch_listing_page(0, ALL_NAMES_LIMIT).await?;
        Ok(page.entries)
    }
}

static SHARED: OnceLock<PokeApi> = OnceLock::new();

/// Process-wide client, defaulting to [`API_BASE`] when nothing was installed.
pub fn shared() -> &'static PokeApi {
    SHARED.get_or_init(PokeApi::default)
}

/// Fetch every id concurrently and keep the successes in input order.
pub async fn fetch_entities<C: Catalogue + ?Sized>(catalogue: &C, ids: &[u32]) -> EntityBatch {
    let results = join_all(ids.iter().map(|&id| catalogue.fetch_entity(id))).await;

    let mut batch = EntityBatch::default();
    for (&id, result) in ids.iter().zip(results) {
        match result {
            Ok(pokemon) => batch.entities.push(pokemon),
            Err(err) => {
                tracing::warn!(id, error = %err, "entity fetch failed");
                batch.failed.push(id);
            }
        }
    }
    batch
}

/// Trailing numeric path segment of a resource url, e.g. `.../pokemon/25/` -> 25.
pub fn parse_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn name_entries(results: Vec<NamedResource>) -> Vec<NameEntry> {
    results
        .into_iter()
        .filter_map(|resource| {
            let id = parse_id(&resource.url)?;
            Some(NameEntry {
                name: resource.name,
                id,
            })
        })
        .collect()
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}
