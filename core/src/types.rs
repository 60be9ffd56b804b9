//! Shared JSON:API building blocks: references, relationships and links.
//!
//! # Design
//! A relationship never embeds the related record. It carries `(type, id)`
//! references only; full records come from the `included` side-table of the
//! enclosing envelope (see [`Included::resolve`](crate::Included::resolve)).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `(type, id)` reference to another resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RelationMeta>,
}

/// Presence information the service attaches to player/server links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    /// Seconds played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_played: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

/// Relationship payload: the service sends an object for to-one links and
/// an array for to-many links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationData {
    Many(Vec<Relation>),
    One(Relation),
}

/// A named relationship. `data` is `None` when the service sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationData>,
}

impl Relationship {
    pub fn relations(&self) -> &[Relation] {
        match &self.data {
            Some(RelationData::Many(items)) => items,
            Some(RelationData::One(item)) => std::slice::from_ref(item),
            None => &[],
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.relations().iter().map(|r| r.id.as_str())
    }

    pub fn first(&self) -> Option<&Relation> {
        self.relations().first()
    }
}

/// Pagination cursors. `None` at either end of the result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// Returned when a string does not name a known identifier or include kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} `{value}`")]
pub struct ParseKindError {
    pub what: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_accepts_single_object() {
        let rel: Relationship =
            serde_json::from_str(r#"{"data":{"type":"user","id":"42"}}"#).unwrap();
        assert_eq!(rel.ids().collect::<Vec<_>>(), vec!["42"]);
        assert_eq!(rel.first().map(|r| r.kind.as_str()), Some("user"));
    }

    #[test]
    fn relationship_accepts_array_with_meta() {
        let rel: Relationship = serde_json::from_str(
            r#"{"data":[
                {"type":"server","id":"1","meta":{"timePlayed":3600,"online":true,
                 "firstSeen":"2023-01-01T00:00:00Z","lastSeen":"2023-01-02T12:30:00.500Z"}},
                {"type":"server","id":"2"}
            ]}"#,
        )
        .unwrap();
        let relations = rel.relations();
        assert_eq!(relations.len(), 2);
        let meta = relations[0].meta.as_ref().unwrap();
        assert_eq!(meta.time_played, Some(3600));
        assert_eq!(meta.online, Some(true));
        assert!(meta.last_seen > meta.first_seen);
        assert!(relations[1].meta.is_none());
    }

    #[test]
    fn relationship_null_and_missing_data_are_empty() {
        let null: Relationship = serde_json::from_str(r#"{"data":null}"#).unwrap();
        let missing: Relationship = serde_json::from_str("{}").unwrap();
        assert!(null.relations().is_empty());
        assert!(missing.first().is_none());
    }

    #[test]
    fn links_default_to_none() {
        let links: Links = serde_json::from_str(r#"{"next":"https://x/players?page[key]=a"}"#).unwrap();
        assert!(links.next.is_some());
        assert!(links.prev.is_none());
    }
}
