//! Identifier kinds, identifier queries and identifier resources.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ParseKindError, Relationship};

/// Identifier namespaces accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    #[serde(rename = "steamID")]
    SteamId,
    #[serde(rename = "BEGUID")]
    BeGuid,
    #[serde(rename = "legacyBEGUID")]
    LegacyBeGuid,
    #[serde(rename = "ip")]
    Ip,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "survivorName")]
    SurvivorName,
    #[serde(rename = "steamFamilyShareOwner")]
    SteamFamilyShareOwner,
    #[serde(rename = "conanCharName")]
    ConanCharName,
    #[serde(rename = "egsID")]
    EgsId,
    #[serde(rename = "eosID")]
    EosId,
    #[serde(rename = "funcomID")]
    FuncomId,
    #[serde(rename = "playFabID")]
    PlayFabId,
    #[serde(rename = "mcUUID")]
    McUuid,
    #[serde(rename = "7dtdEOS")]
    SevenDaysToDieEos,
    #[serde(rename = "battlebitHWID")]
    BattlebitHwid,
    #[serde(rename = "hllWindowsID")]
    HllWindowsId,
    #[serde(rename = "palworldUID")]
    PalworldUid,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 17] = [
        IdentifierKind::SteamId,
        IdentifierKind::BeGuid,
        IdentifierKind::LegacyBeGuid,
        IdentifierKind::Ip,
        IdentifierKind::Name,
        IdentifierKind::SurvivorName,
        IdentifierKind::SteamFamilyShareOwner,
        IdentifierKind::ConanCharName,
        IdentifierKind::EgsId,
        IdentifierKind::EosId,
        IdentifierKind::FuncomId,
        IdentifierKind::PlayFabId,
        IdentifierKind::McUuid,
        IdentifierKind::SevenDaysToDieEos,
        IdentifierKind::BattlebitHwid,
        IdentifierKind::HllWindowsId,
        IdentifierKind::PalworldUid,
    ];

    /// Wire name, exactly as the service spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::SteamId => "steamID",
            IdentifierKind::BeGuid => "BEGUID",
            IdentifierKind::LegacyBeGuid => "legacyBEGUID",
            IdentifierKind::Ip => "ip",
            IdentifierKind::Name => "name",
            IdentifierKind::SurvivorName => "survivorName",
            IdentifierKind::SteamFamilyShareOwner => "steamFamilyShareOwner",
            IdentifierKind::ConanCharName => "conanCharName",
            IdentifierKind::EgsId => "egsID",
            IdentifierKind::EosId => "eosID",
            IdentifierKind::FuncomId => "funcomID",
            IdentifierKind::PlayFabId => "playFabID",
            IdentifierKind::McUuid => "mcUUID",
            IdentifierKind::SevenDaysToDieEos => "7dtdEOS",
            IdentifierKind::BattlebitHwid => "battlebitHWID",
            IdentifierKind::HllWindowsId => "hllWindowsID",
            IdentifierKind::PalworldUid => "palworldUID",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentifierKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError {
                what: "identifier kind",
                value: s.to_string(),
            })
    }
}

/// Identifier kind as reported in responses. The service may report kinds
/// this crate does not know yet; those are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentifierType {
    Known(IdentifierKind),
    Other(String),
}

impl IdentifierType {
    pub fn as_str(&self) -> &str {
        match self {
            IdentifierType::Known(kind) => kind.as_str(),
            IdentifierType::Other(raw) => raw,
        }
    }
}

/// A single identifier lookup, serialized as the JSON:API resource the
/// match endpoint expects:
/// `{"type":"identifier","attributes":{"type":"steamID","identifier":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "identifier")]
pub struct IdentifierQuery {
    pub attributes: IdentifierQueryAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierQueryAttributes {
    #[serde(rename = "type")]
    pub kind: IdentifierKind,
    pub identifier: String,
}

impl IdentifierQuery {
    pub fn new(kind: IdentifierKind, identifier: impl Into<String>) -> Self {
        Self {
            attributes: IdentifierQueryAttributes {
                kind,
                identifier: identifier.into(),
            },
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        self.attributes.kind
    }

    pub fn identifier(&self) -> &str {
        &self.attributes.identifier
    }
}

impl fmt::Display for IdentifierQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.attributes.kind, self.attributes.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierAttributes {
    #[serde(rename = "type")]
    pub kind: IdentifierType,
    pub identifier: String,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_players: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_identifiers: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Relationship>,
}

/// An identifier resource, as embedded in `included` or returned by the
/// match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: String,
    pub attributes: IdentifierAttributes,
    #[serde(default)]
    pub relationships: IdentifierRelationships,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl Identifier {
    /// Id of the player this identifier belongs to.
    pub fn player_id(&self) -> Option<&str> {
        self.relationships
            .player
            .as_ref()
            .and_then(Relationship::first)
            .map(|r| r.id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedIdentifierMeta {
    #[serde(default)]
    pub common_identifier: bool,
}

/// An entry of the related-identifiers listing. `meta.common_identifier`
/// marks identifiers shared with other players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedIdentifier {
    pub id: String,
    pub attributes: IdentifierAttributes,
    #[serde(default)]
    pub meta: RelatedIdentifierMeta,
    #[serde(default)]
    pub relationships: IdentifierRelationships,
}

impl RelatedIdentifier {
    pub fn is_common(&self) -> bool {
        self.meta.common_identifier
    }
}
