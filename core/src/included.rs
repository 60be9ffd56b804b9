//! The `included` side-table: related resources embedded on request.
//!
//! # Design
//! Entries are discriminated by their JSON `type` field. Resource types
//! this crate does not model (for example `playerCounter`) parse as
//! [`Included::Unknown`] with their payload intact instead of failing the
//! whole response, and `null`
//! entries are dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::identifier::Identifier;
use crate::player::Player;
use crate::types::{Relation, RelationMeta, Relationship};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub port_query: Option<u16>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub players: u32,
    #[serde(default)]
    pub max_players: u32,
    /// `[longitude, latitude]`.
    #[serde(default)]
    pub location: Option<[f64; 2]>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub query_status: Option<String>,
}

/// A server the player has been seen on. `meta` holds the player's
/// presence on that server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub attributes: ServerAttributes,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RelationMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagAttributes {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub icon: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Relationship>,
}

/// An organization-defined player flag (`playerFlag`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub id: String,
    pub attributes: FlagAttributes,
    #[serde(default)]
    pub relationships: FlagRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagAssignmentAttributes {
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagAssignmentRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_flag: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Relationship>,
}

/// The assignment of a flag to a player (`flagPlayer`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagAssignment {
    pub id: String,
    pub attributes: FlagAssignmentAttributes,
    #[serde(default)]
    pub relationships: FlagAssignmentRelationships,
}

impl FlagAssignment {
    pub fn is_active(&self) -> bool {
        self.attributes.removed_at.is_none()
    }

    pub fn flag_id(&self) -> Option<&str> {
        self.relationships
            .player_flag
            .as_ref()
            .and_then(Relationship::first)
            .map(|r| r.id.as_str())
    }
}

/// A side-table entry of a type this crate does not model, such as
/// `playerCounter`. The payload is kept as sent.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownResource {
    pub kind: String,
    pub id: Option<String>,
    pub raw: Value,
}

/// One entry of an `included` side-table, discriminated by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Included {
    Server(Server),
    Identifier(Identifier),
    Flag(Flag),
    FlagAssignment(FlagAssignment),
    Player(Player),
    Unknown(UnknownResource),
}

/// Wire form of the modeled variants.
#[derive(Serialize)]
#[serde(tag = "type")]
enum TaggedRef<'a> {
    #[serde(rename = "server")]
    Server(&'a Server),
    #[serde(rename = "identifier")]
    Identifier(&'a Identifier),
    #[serde(rename = "playerFlag")]
    Flag(&'a Flag),
    #[serde(rename = "flagPlayer")]
    FlagAssignment(&'a FlagAssignment),
    #[serde(rename = "player")]
    Player(&'a Player),
}

impl Serialize for Included {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Included::Server(s) => TaggedRef::Server(s).serialize(serializer),
            Included::Identifier(i) => TaggedRef::Identifier(i).serialize(serializer),
            Included::Flag(f) => TaggedRef::Flag(f).serialize(serializer),
            Included::FlagAssignment(a) => TaggedRef::FlagAssignment(a).serialize(serializer),
            Included::Player(p) => TaggedRef::Player(p).serialize(serializer),
            Included::Unknown(other) => other.raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Included {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();
        let parsed = match kind.as_str() {
            "server" => serde_json::from_value(raw).map(Included::Server),
            "identifier" => serde_json::from_value(raw).map(Included::Identifier),
            "playerFlag" => serde_json::from_value(raw).map(Included::Flag),
            "flagPlayer" => serde_json::from_value(raw).map(Included::FlagAssignment),
            "player" => serde_json::from_value(raw).map(Included::Player),
            _ => {
                let id = raw.get("id").and_then(Value::as_str).map(str::to_string);
                return Ok(Included::Unknown(UnknownResource { kind, id, raw }));
            }
        };
        parsed.map_err(de::Error::custom)
    }
}

impl Included {
    /// JSON:API `type` of this entry.
    pub fn kind(&self) -> &str {
        match self {
            Included::Server(_) => "server",
            Included::Identifier(_) => "identifier",
            Included::Flag(_) => "playerFlag",
            Included::FlagAssignment(_) => "flagPlayer",
            Included::Player(_) => "player",
            Included::Unknown(other) => &other.kind,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Included::Server(s) => Some(&s.id),
            Included::Identifier(i) => Some(&i.id),
            Included::Flag(f) => Some(&f.id),
            Included::FlagAssignment(a) => Some(&a.id),
            Included::Player(p) => Some(&p.id),
            Included::Unknown(other) => other.id.as_deref(),
        }
    }

    /// Look up the side-table entry a reference points at.
    pub fn resolve<'a>(included: &'a [Included], relation: &Relation) -> Option<&'a Included> {
        included
            .iter()
            .find(|entry| entry.kind() == relation.kind && entry.id() == Some(relation.id.as_str()))
    }

    pub fn as_server(&self) -> Option<&Server> {
        match self {
            Included::Server(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Included::Identifier(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<&Flag> {
        match self {
            Included::Flag(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_flag_assignment(&self) -> Option<&FlagAssignment> {
        match self {
            Included::FlagAssignment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Included::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_unknown(&self) -> Option<&UnknownResource> {
        match self {
            Included::Unknown(other) => Some(other),
            _ => None,
        }
    }
}

/// `included` may be absent, `null`, or contain `null` entries.
pub(crate) fn deserialize_included<'de, D>(deserializer: D) -> Result<Vec<Included>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<Included>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().flatten().collect())
}
