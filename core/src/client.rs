//! Stateless HTTP request builder and response parser for the BattleMetrics
//! player API.
//!
//! # Design
//! `BattleMetricsClient` holds only the base URL and the bearer token and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Something else executes the round-trip:
//! [`BattleMetrics`](crate::BattleMetrics) with a [`Transport`](crate::Transport),
//! or any caller-supplied HTTP stack.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, ClientError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::identifier::IdentifierQuery;
use crate::include::{include_param, PlayerInclude, RelationInclude};
use crate::player::{PlayerCollection, PlayerDocument, PlayerSearch, RelatedIdentifierCollection};
use crate::quick_match::{QuickMatchRequest, QuickMatchResponse};

/// Synchronous, stateless client for the BattleMetrics player API.
#[derive(Debug, Clone)]
pub struct BattleMetricsClient {
    base_url: String,
    token: SecretString,
}

impl BattleMetricsClient {
    /// Fails with `MissingToken` for an empty or blank token and with
    /// `InvalidBaseUrl` when `base_url` is not an absolute URL.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        Self::with_secret(base_url, SecretString::from(token))
    }

    pub fn with_secret(base_url: &str, token: SecretString) -> Result<Self, ClientError> {
        if token.expose_secret().trim().is_empty() {
            return Err(ClientError::MissingToken);
        }
        Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_players(&self, search: &PlayerSearch) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(text) = search.search_text() {
            query.push(("filter[search]".to_string(), text.to_string()));
        }
        if let Some(include) = include_param(&search.include) {
            query.push(("include".to_string(), include));
        }
        if let Some(size) = search.page_size {
            query.push(("page[size]".to_string(), size.to_string()));
        }
        self.get(format!("{}/players", self.base_url), query)
    }

    pub fn build_get_player(&self, id: &str, include: &[PlayerInclude]) -> HttpRequest {
        let path = format!("{}/players/{}", self.base_url, encode_segment(id));
        self.get(path, include_query(include_param(include)))
    }

    pub fn build_quick_match(&self, query: &IdentifierQuery) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&QuickMatchRequest { data: [query] })
            .map_err(ApiError::SerializationError)?;
        let mut headers = self.default_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/players/match", self.base_url),
            query: Vec::new(),
            headers,
            body: Some(body),
        })
    }

    pub fn build_related_identifiers(&self, id: &str, include: &[RelationInclude]) -> HttpRequest {
        let path = format!(
            "{}/players/{}/relationships/related-identifiers",
            self.base_url,
            encode_segment(id)
        );
        self.get(path, include_query(include_param(include)))
    }

    /// Build a GET for a pagination link taken from `links.next`/`links.prev`.
    /// Links outside the base URL are refused so the token stays with the
    /// configured host.
    pub fn build_follow_link(&self, link: &str) -> Result<HttpRequest, ApiError> {
        let foreign = || ApiError::ForeignLink(link.to_string());
        let url = Url::parse(link).map_err(|_| foreign())?;
        let base = Url::parse(&self.base_url).map_err(|_| foreign())?;
        let under_base = url
            .path()
            .strip_prefix(base.path().trim_end_matches('/'))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if url.origin() != base.origin() || !under_base {
            return Err(foreign());
        }
        let mut path = url.clone();
        path.set_query(None);
        path.set_fragment(None);
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(self.get(path.to_string(), query))
    }

    pub fn parse_list_players(&self, response: HttpResponse) -> Result<PlayerCollection, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_player(&self, response: HttpResponse) -> Result<PlayerDocument, ApiError> {
        parse_json(response)
    }

    pub fn parse_quick_match(&self, response: HttpResponse) -> Result<QuickMatchResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_related_identifiers(
        &self,
        response: HttpResponse,
    ) -> Result<RelatedIdentifierCollection, ApiError> {
        parse_json(response)
    }

    fn get(&self, path: String, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            query,
            headers: self.default_headers(),
            body: None,
        }
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.token.expose_secret()),
        )]
    }
}

fn include_query(include: Option<String>) -> Vec<(String, String)> {
    include
        .map(|value| vec![("include".to_string(), value)])
        .unwrap_or_default()
}

/// Percent-encode a player id for use as a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::DeserializationError)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        401 | 403 => Err(ApiError::Unauthorized {
            status: response.status,
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
