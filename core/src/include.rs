//! Include lists: which related resources the service should embed.

use std::fmt;
use std::str::FromStr;

use crate::types::ParseKindError;

/// A closed set of include values with fixed wire names.
pub trait IncludeKind: Copy + PartialEq {
    fn as_str(self) -> &'static str;
}

/// Includes accepted by the player endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerInclude {
    Server,
    Identifier,
    PlayerCounter,
    PlayerFlag,
    FlagPlayer,
}

impl PlayerInclude {
    pub const ALL: [PlayerInclude; 5] = [
        PlayerInclude::Server,
        PlayerInclude::Identifier,
        PlayerInclude::PlayerCounter,
        PlayerInclude::PlayerFlag,
        PlayerInclude::FlagPlayer,
    ];
}

impl IncludeKind for PlayerInclude {
    fn as_str(self) -> &'static str {
        match self {
            PlayerInclude::Server => "server",
            PlayerInclude::Identifier => "identifier",
            PlayerInclude::PlayerCounter => "playerCounter",
            PlayerInclude::PlayerFlag => "playerFlag",
            PlayerInclude::FlagPlayer => "flagPlayer",
        }
    }
}

/// Includes accepted by the related-identifiers endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationInclude {
    Player,
    Identifier,
}

impl RelationInclude {
    pub const ALL: [RelationInclude; 2] = [RelationInclude::Player, RelationInclude::Identifier];
}

impl IncludeKind for RelationInclude {
    fn as_str(self) -> &'static str {
        match self {
            RelationInclude::Player => "player",
            RelationInclude::Identifier => "identifier",
        }
    }
}

macro_rules! include_text_impls {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseKindError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|kind| kind.as_str() == s)
                    .ok_or_else(|| ParseKindError {
                        what: $what,
                        value: s.to_string(),
                    })
            }
        }
    };
}

include_text_impls!(PlayerInclude, "player include");
include_text_impls!(RelationInclude, "relation include");

/// Comma-joined `include` value, or `None` for an empty list. Repeated
/// kinds are sent once, in first-seen order.
pub(crate) fn include_param<K: IncludeKind>(kinds: &[K]) -> Option<String> {
    let mut seen: Vec<K> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    if seen.is_empty() {
        return None;
    }
    let names: Vec<&str> = seen.into_iter().map(IncludeKind::as_str).collect();
    Some(names.join(","))
}
