//! Typed client for the BattleMetrics player API.
//!
//! # Overview
//! Four operations: player search, player lookup by id, quick match of a
//! single identifier, and the related-identifiers listing of a player. JSON
//! responses are mapped onto typed JSON:API envelopes whose `included`
//! side-table is a tagged union.
//!
//! # Design
//! - `BattleMetricsClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. It holds only the base URL and
//!   the bearer token.
//! - `BattleMetrics` is the async surface. It pairs the sans-IO client with a
//!   `Transport` (reqwest by default), issues exactly one request per call,
//!   and wraps failures with the operation and target they belong to.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod identifier;
pub mod include;
pub mod included;
pub mod player;
pub mod quick_match;
pub mod transport;
pub mod types;

pub use api::BattleMetrics;
pub use client::BattleMetricsClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{ApiError, ClientError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use identifier::{
    Identifier, IdentifierAttributes, IdentifierKind, IdentifierQuery, IdentifierType,
    RelatedIdentifier,
};
pub use include::{IncludeKind, PlayerInclude, RelationInclude};
pub use included::{Flag, FlagAssignment, Included, Server, UnknownResource};
pub use player::{
    Player, PlayerAttributes, PlayerCollection, PlayerDocument, PlayerRelationships, PlayerSearch,
    RelatedIdentifierCollection,
};
pub use quick_match::{QuickMatchResponse, QuickMatches};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Links, ParseKindError, Relation, RelationData, RelationMeta, Relationship};
