//! In-memory records served by the mock API and their JSON:API renderings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const CREATED_AT: &str = "2020-01-01T00:00:00.000Z";
const UPDATED_AT: &str = "2024-01-01T00:00:00.000Z";
const LAST_SEEN: &str = "2024-05-01T12:00:00.000Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifierRecord {
    pub id: String,
    pub kind: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub private: bool,
    pub identifiers: Vec<IdentifierRecord>,
    pub servers: Vec<String>,
    /// Ids of flags assigned to this player.
    pub flags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagRecord {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub players: Vec<PlayerRecord>,
    pub servers: Vec<ServerRecord>,
    pub flags: Vec<FlagRecord>,
}

fn ident(id: &str, kind: &str, value: &str) -> IdentifierRecord {
    IdentifierRecord {
        id: id.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
    }
}

impl Dataset {
    /// Three players: `alice` (123) and `Alice Cooper` (456) share an IP,
    /// `bob` (789) shares nothing.
    pub fn seeded() -> Self {
        Self {
            players: vec![
                PlayerRecord {
                    id: "123".to_string(),
                    name: "alice".to_string(),
                    private: false,
                    identifiers: vec![
                        ident("1001", "steamID", "76561197960287930"),
                        ident("1002", "ip", "203.0.113.5"),
                    ],
                    servers: vec!["77".to_string()],
                    flags: vec!["f-1".to_string()],
                },
                PlayerRecord {
                    id: "456".to_string(),
                    name: "Alice Cooper".to_string(),
                    private: false,
                    identifiers: vec![
                        ident("2001", "name", "Alice Cooper"),
                        ident("2002", "ip", "203.0.113.5"),
                    ],
                    servers: vec!["77".to_string(), "78".to_string()],
                    flags: Vec::new(),
                },
                PlayerRecord {
                    id: "789".to_string(),
                    name: "bob".to_string(),
                    private: true,
                    identifiers: vec![ident("3001", "steamID", "76561197960287931")],
                    servers: vec!["78".to_string()],
                    flags: Vec::new(),
                },
            ],
            servers: vec![
                ServerRecord {
                    id: "77".to_string(),
                    name: "Main #1".to_string(),
                    ip: "192.0.2.10".to_string(),
                    port: 28015,
                },
                ServerRecord {
                    id: "78".to_string(),
                    name: "Arena".to_string(),
                    ip: "192.0.2.11".to_string(),
                    port: 28017,
                },
            ],
            flags: vec![FlagRecord {
                id: "f-1".to_string(),
                name: "Cheater".to_string(),
                color: "#ff0000".to_string(),
            }],
        }
    }

    pub fn player(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn server(&self, id: &str) -> Option<&ServerRecord> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn flag(&self, id: &str) -> Option<&FlagRecord> {
        self.flags.iter().find(|f| f.id == id)
    }

    /// Players matching `text` by case-insensitive name substring or exact
    /// identifier value.
    pub fn search(&self, text: Option<&str>) -> Vec<&PlayerRecord> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return self.players.iter().collect();
        };
        let needle = text.to_lowercase();
        self.players
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.identifiers.iter().any(|i| i.value == text)
            })
            .collect()
    }

    /// All identifiers with the given kind and value, with their owner.
    pub fn matching_identifiers(&self, kind: &str, value: &str) -> Vec<(&PlayerRecord, &IdentifierRecord)> {
        self.players
            .iter()
            .flat_map(|p| p.identifiers.iter().map(move |i| (p, i)))
            .filter(|(_, i)| i.kind == kind && i.value == value)
            .collect()
    }

    /// Other players holding an identifier with the same kind and value.
    pub fn sharing_players(&self, owner: &PlayerRecord, identifier: &IdentifierRecord) -> Vec<&PlayerRecord> {
        self.matching_identifiers(&identifier.kind, &identifier.value)
            .into_iter()
            .map(|(p, _)| p)
            .filter(|p| p.id != owner.id)
            .collect()
    }
}

pub fn player_json(player: &PlayerRecord) -> Value {
    let servers: Vec<Value> = player
        .servers
        .iter()
        .map(|id| {
            json!({
                "type": "server",
                "id": id,
                "meta": {"timePlayed": 3600, "online": false, "firstSeen": CREATED_AT, "lastSeen": LAST_SEEN}
            })
        })
        .collect();
    json!({
        "type": "player",
        "id": player.id,
        "attributes": {
            "id": player.id,
            "name": player.name,
            "private": player.private,
            "positiveMatch": false,
            "createdAt": CREATED_AT,
            "updatedAt": UPDATED_AT
        },
        "relationships": {
            "server": {"data": servers},
            "organizations": {"data": []},
            "user": {"data": null}
        },
        "meta": {"metadata": []}
    })
}

pub fn identifier_json(owner: &PlayerRecord, identifier: &IdentifierRecord) -> Value {
    json!({
        "type": "identifier",
        "id": identifier.id,
        "attributes": {
            "type": identifier.kind,
            "identifier": identifier.value,
            "lastSeen": LAST_SEEN,
            "private": owner.private,
            "metadata": null
        },
        "relationships": {
            "player": {"data": {"type": "player", "id": owner.id}}
        }
    })
}

pub fn server_json(server: &ServerRecord) -> Value {
    json!({
        "type": "server",
        "id": server.id,
        "attributes": {
            "id": server.id,
            "name": server.name,
            "address": null,
            "ip": server.ip,
            "port": server.port,
            "portQuery": server.port + 1,
            "rank": 1,
            "players": 10,
            "maxPlayers": 100,
            "location": [-97.8, 30.2],
            "status": "online",
            "details": {"map": "Procedural Map"},
            "private": false,
            "createdAt": CREATED_AT,
            "updatedAt": UPDATED_AT,
            "country": "US",
            "queryStatus": "valid"
        },
        "relationships": {"game": {"data": {"type": "game", "id": "rust"}}}
    })
}

pub fn flag_json(flag: &FlagRecord) -> Value {
    json!({
        "type": "playerFlag",
        "id": flag.id,
        "attributes": {
            "createdAt": CREATED_AT,
            "updatedAt": UPDATED_AT,
            "icon": "warning",
            "name": flag.name,
            "color": flag.color,
            "description": null
        },
        "relationships": {"organization": {"data": {"type": "organization", "id": "1"}}}
    })
}

pub fn flag_assignment_json(player: &PlayerRecord, flag: &FlagRecord) -> Value {
    json!({
        "type": "flagPlayer",
        "id": format!("{}-{}", flag.id, player.id),
        "attributes": {"addedAt": UPDATED_AT, "removedAt": null},
        "relationships": {
            "player": {"data": {"type": "player", "id": player.id}},
            "playerFlag": {"data": {"type": "playerFlag", "id": flag.id}}
        }
    })
}

pub fn player_counter_json(player: &PlayerRecord) -> Value {
    json!({
        "type": "playerCounter",
        "id": format!("pc-{}", player.id),
        "attributes": {"servers": player.servers.len()}
    })
}
