//! Async client: build → one transport call → parse.
//!
//! Every failure is logged with the operation and its target, then returned
//! as [`ClientError::Request`]. There are no retries and no partial results.

use tracing::{debug, error};

use crate::client::BattleMetricsClient;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{ApiError, ClientError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::identifier::IdentifierQuery;
use crate::include::{PlayerInclude, RelationInclude};
use crate::player::{PlayerCollection, PlayerDocument, PlayerSearch, RelatedIdentifierCollection};
use crate::quick_match::QuickMatchResponse;
use crate::transport::{ReqwestTransport, Transport};

/// BattleMetrics player API client.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// calls and independent instances never share state.
#[derive(Debug, Clone)]
pub struct BattleMetrics<T = ReqwestTransport> {
    client: BattleMetricsClient,
    transport: T,
}

impl BattleMetrics<ReqwestTransport> {
    /// Client for the public API endpoint. Fails on an empty token; performs
    /// no network access.
    pub fn new(token: &str) -> Result<Self, ClientError> {
        let client = BattleMetricsClient::new(DEFAULT_BASE_URL, token)?;
        let transport = ReqwestTransport::new(None).map_err(ClientError::Transport)?;
        Ok(Self::with_transport(client, transport))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = BattleMetricsClient::with_secret(&config.base_url, config.token.clone())?;
        let transport = ReqwestTransport::new(config.timeout).map_err(ClientError::Transport)?;
        Ok(Self::with_transport(client, transport))
    }
}

impl<T: Transport> BattleMetrics<T> {
    pub fn with_transport(client: BattleMetricsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BattleMetricsClient {
        &self.client
    }

    /// `GET /players` with the search, include and page-size parameters that
    /// are actually set.
    pub async fn list_players(&self, search: &PlayerSearch) -> Result<PlayerCollection, ClientError> {
        let target = search.search_text().unwrap_or("*").to_string();
        let request = self.client.build_list_players(search);
        self.run(Operation::ListPlayers, target, Ok(request), |c, r| {
            c.parse_list_players(r)
        })
        .await
    }

    /// `GET /players/{id}`.
    pub async fn get_player_by_id(
        &self,
        id: &str,
        include: &[PlayerInclude],
    ) -> Result<PlayerDocument, ClientError> {
        let request = self.client.build_get_player(id, include);
        self.run(Operation::GetPlayer, id.to_string(), Ok(request), |c, r| {
            c.parse_get_player(r)
        })
        .await
    }

    /// `POST /players/match` for a single identifier.
    pub async fn quick_match(&self, query: &IdentifierQuery) -> Result<QuickMatchResponse, ClientError> {
        let request = self.client.build_quick_match(query);
        self.run(Operation::QuickMatch, query.to_string(), request, |c, r| {
            c.parse_quick_match(r)
        })
        .await
    }

    /// `GET /players/{id}/relationships/related-identifiers`.
    pub async fn get_related_identifiers(
        &self,
        id: &str,
        include: &[RelationInclude],
    ) -> Result<RelatedIdentifierCollection, ClientError> {
        let request = self.client.build_related_identifiers(id, include);
        self.run(Operation::RelatedIdentifiers, id.to_string(), Ok(request), |c, r| {
            c.parse_related_identifiers(r)
        })
        .await
    }

    /// Fetch `links.next` or `links.prev` of a player listing.
    pub async fn follow_link(&self, link: &str) -> Result<PlayerCollection, ClientError> {
        let request = self.client.build_follow_link(link);
        self.run(Operation::FollowLink, link.to_string(), request, |c, r| {
            c.parse_list_players(r)
        })
        .await
    }

    async fn run<R>(
        &self,
        operation: Operation,
        target: String,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&BattleMetricsClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ClientError> {
        let response = match request {
            Ok(request) => {
                debug!(%operation, %target, method = request.method.as_str(), url = %request.url(), "sending request");
                self.transport.execute(request).await
            }
            Err(err) => Err(err),
        };

        response.and_then(|response| parse(&self.client, response)).map_err(|source| {
            error!(%operation, %target, error = %source, "BattleMetrics request failed");
            ClientError::Request {
                operation,
                target,
                source,
            }
        })
    }
}
