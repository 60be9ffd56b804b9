//! Player records and the envelopes the player endpoints return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{Identifier, RelatedIdentifier};
use crate::include::PlayerInclude;
use crate::included::{deserialize_included, Flag, Included, Server};
use crate::types::{Links, Relationship};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub positive_match: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_flag: Option<Relationship>,
}

/// A player resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: PlayerRelationships,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl Player {
    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    /// Ids of the servers this player has a relationship with.
    pub fn server_ids(&self) -> impl Iterator<Item = &str> {
        self.relationships.server.iter().flat_map(Relationship::ids)
    }
}

/// Response of `GET /players/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDocument {
    pub data: Player,
    #[serde(default, deserialize_with = "deserialize_included")]
    pub included: Vec<Included>,
}

impl PlayerDocument {
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.included.iter().filter_map(Included::as_server)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.included.iter().filter_map(Included::as_identifier)
    }

    /// Flags currently assigned to the player, resolved through the
    /// side-table. Requires both `playerFlag` and `flagPlayer` includes.
    pub fn active_flags(&self) -> impl Iterator<Item = &Flag> {
        self.included
            .iter()
            .filter_map(Included::as_flag_assignment)
            .filter(|assignment| assignment.is_active())
            .filter_map(move |assignment| {
                let flag_id = assignment.flag_id()?;
                self.included
                    .iter()
                    .filter_map(Included::as_flag)
                    .find(|flag| flag.id == flag_id)
            })
    }
}

/// Response of `GET /players`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCollection {
    pub data: Vec<Player>,
    #[serde(default, deserialize_with = "deserialize_included")]
    pub included: Vec<Included>,
    #[serde(default)]
    pub links: Links,
}

/// Response of `GET /players/{id}/relationships/related-identifiers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedIdentifierCollection {
    pub data: Vec<RelatedIdentifier>,
    #[serde(default, deserialize_with = "deserialize_included")]
    pub included: Vec<Included>,
    #[serde(default)]
    pub links: Links,
}

/// Parameters for `GET /players`. The default sends no query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSearch {
    pub search: Option<String>,
    pub include: Vec<PlayerInclude>,
    pub page_size: Option<u32>,
}

impl PlayerSearch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub fn include(mut self, kinds: impl IntoIterator<Item = PlayerInclude>) -> Self {
        self.include.extend(kinds);
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Search text if it is non-empty.
    pub(crate) fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}
