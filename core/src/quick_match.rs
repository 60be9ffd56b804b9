//! Quick match: resolve one identifier to the identifier records (and thus
//! players) the service knows about.
//!
//! The service answers with `data` as an array, a single object or `null`
//! depending on how many records matched. [`QuickMatches`] makes that
//! cardinality explicit.

use serde::{Deserialize, Serialize};

use crate::identifier::{Identifier, IdentifierQuery};
use crate::included::{deserialize_included, Included};
use crate::types::Links;

/// Body of `POST /players/match`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuickMatchRequest<'a> {
    pub data: [&'a IdentifierQuery; 1],
}

/// Matched identifier records, by cardinality.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "cardinality", content = "matches", rename_all = "lowercase")]
pub enum QuickMatches {
    #[default]
    None,
    One(Identifier),
    Many(Vec<Identifier>),
}

impl QuickMatches {
    pub fn as_slice(&self) -> &[Identifier] {
        match self {
            QuickMatches::None => &[],
            QuickMatches::One(item) => std::slice::from_ref(item),
            QuickMatches::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Distinct ids of the matched players, in response order.
    pub fn player_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.as_slice().iter().filter_map(Identifier::player_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMatchData {
    Many(Vec<Identifier>),
    One(Box<Identifier>),
}

#[derive(Serialize, Deserialize)]
struct RawQuickMatch {
    #[serde(default)]
    data: Option<RawMatchData>,
    #[serde(default, deserialize_with = "deserialize_included")]
    included: Vec<Included>,
    #[serde(default)]
    links: Links,
}

/// Response of `POST /players/match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuickMatch", into = "RawQuickMatch")]
pub struct QuickMatchResponse {
    pub matches: QuickMatches,
    pub included: Vec<Included>,
    pub links: Links,
}

impl From<RawQuickMatch> for QuickMatchResponse {
    fn from(raw: RawQuickMatch) -> Self {
        let matches = match raw.data {
            None => QuickMatches::None,
            Some(RawMatchData::One(item)) => QuickMatches::One(*item),
            Some(RawMatchData::Many(mut items)) => match items.len() {
                0 => QuickMatches::None,
                1 => QuickMatches::One(items.remove(0)),
                _ => QuickMatches::Many(items),
            },
        };
        Self {
            matches,
            included: raw.included,
            links: raw.links,
        }
    }
}

/// Matches are written back as a `data` array, which reads back with the
/// same cardinality.
impl From<QuickMatchResponse> for RawQuickMatch {
    fn from(response: QuickMatchResponse) -> Self {
        let items = match response.matches {
            QuickMatches::None => Vec::new(),
            QuickMatches::One(item) => vec![item],
            QuickMatches::Many(items) => items,
        };
        Self {
            data: Some(RawMatchData::Many(items)),
            included: response.included,
            links: response.links,
        }
    }
}
