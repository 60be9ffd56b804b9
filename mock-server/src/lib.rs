//! Mock of the BattleMetrics player endpoints over a fixed dataset.

pub mod dataset;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use dataset::{Dataset, FlagRecord, IdentifierRecord, PlayerRecord, ServerRecord};

const PLAYER_INCLUDES: [&str; 5] = ["server", "identifier", "playerCounter", "playerFlag", "flagPlayer"];
const RELATION_INCLUDES: [&str; 2] = ["player", "identifier"];
const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

pub type Db = Arc<Dataset>;

type Params = HashMap<String, String>;
type ApiResult = Result<Json<Value>, StatusCode>;

#[derive(Deserialize)]
pub struct MatchBody {
    pub data: Vec<MatchQuery>,
}

#[derive(Deserialize)]
pub struct MatchQuery {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: MatchAttributes,
}

#[derive(Deserialize)]
pub struct MatchAttributes {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

pub fn app() -> Router {
    app_with(Dataset::seeded())
}

pub fn app_with(dataset: Dataset) -> Router {
    let db: Db = Arc::new(dataset);
    Router::new()
        .route("/players", get(list_players))
        .route("/players/match", post(quick_match))
        .route("/players/{id}", get(get_player))
        .route(
            "/players/{id}/relationships/related-identifiers",
            get(related_identifiers),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Any non-empty bearer token is accepted.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

/// Parse `include` against the allowed values; unknown values are a 400.
fn includes(params: &Params, allowed: &[&str]) -> Result<Vec<String>, StatusCode> {
    let Some(raw) = params.get("include").filter(|v| !v.is_empty()) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|kind| {
            if allowed.contains(&kind) {
                Ok(kind.to_string())
            } else {
                Err(StatusCode::BAD_REQUEST)
            }
        })
        .collect()
}

fn page_param(params: &Params, key: &str, default: usize) -> Result<usize, StatusCode> {
    match params.get(key) {
        Some(raw) => raw.parse().map_err(|_| StatusCode::BAD_REQUEST),
        None => Ok(default),
    }
}

/// Side-table entries for `players`, deduplicated by (type, id).
fn player_side_table(db: &Dataset, players: &[&PlayerRecord], include: &[String]) -> Vec<Value> {
    let mut included: Vec<Value> = Vec::new();
    let mut push = |value: Value| {
        let duplicate = included
            .iter()
            .any(|v| v["type"] == value["type"] && v["id"] == value["id"]);
        if !duplicate {
            included.push(value);
        }
    };
    for kind in include {
        for player in players {
            match kind.as_str() {
                "server" => player
                    .servers
                    .iter()
                    .filter_map(|id| db.server(id))
                    .for_each(|s| push(dataset::server_json(s))),
                "identifier" => player
                    .identifiers
                    .iter()
                    .for_each(|i| push(dataset::identifier_json(player, i))),
                "playerFlag" => player
                    .flags
                    .iter()
                    .filter_map(|id| db.flag(id))
                    .for_each(|f| push(dataset::flag_json(f))),
                "flagPlayer" => player
                    .flags
                    .iter()
                    .filter_map(|id| db.flag(id))
                    .for_each(|f| push(dataset::flag_assignment_json(player, f))),
                "playerCounter" => push(dataset::player_counter_json(player)),
                _ => {}
            }
        }
    }
    included
}

fn page_link(host: &str, params: &Params, offset: usize, size: usize) -> Option<String> {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if let Some(search) = params.get("filter[search]") {
        pairs.push(("filter[search]", search.clone()));
    }
    if let Some(include) = params.get("include") {
        pairs.push(("include", include.clone()));
    }
    pairs.push(("page[size]", size.to_string()));
    pairs.push(("page[offset]", offset.to_string()));
    let query = serde_urlencoded::to_string(&pairs).ok()?;
    Some(format!("http://{host}/players?{query}"))
}

async fn list_players(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&headers)?;
    let include = includes(&params, &PLAYER_INCLUDES)?;
    let size = page_param(&params, "page[size]", DEFAULT_PAGE_SIZE)?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(StatusCode::BAD_REQUEST);
    }
    let offset = page_param(&params, "page[offset]", 0)?;

    let matches = db.search(params.get("filter[search]").map(String::as_str));
    let total = matches.len();
    let page: Vec<&PlayerRecord> = matches.into_iter().skip(offset).take(size).collect();

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let next_offset = offset.saturating_add(size);
    let next = (next_offset < total)
        .then(|| page_link(host, &params, next_offset, size))
        .flatten();
    let prev = (offset > 0)
        .then(|| page_link(host, &params, offset.saturating_sub(size), size))
        .flatten();

    Ok(Json(json!({
        "data": page.iter().map(|p| dataset::player_json(p)).collect::<Vec<_>>(),
        "included": player_side_table(&db, &page, &include),
        "links": {"next": next, "prev": prev}
    })))
}

async fn get_player(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&headers)?;
    let include = includes(&params, &PLAYER_INCLUDES)?;
    let player = db.player(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "data": dataset::player_json(player),
        "included": player_side_table(&db, &[player], &include)
    })))
}

async fn quick_match(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<MatchBody>,
) -> ApiResult {
    authorize(&headers)?;
    let [query] = body.data.as_slice() else {
        return Err(StatusCode::BAD_REQUEST);
    };
    if query.kind != "identifier" {
        return Err(StatusCode::BAD_REQUEST);
    }
    let data: Vec<Value> = db
        .matching_identifiers(&query.attributes.kind, &query.attributes.identifier)
        .into_iter()
        .map(|(owner, identifier)| dataset::identifier_json(owner, identifier))
        .collect();
    Ok(Json(json!({
        "data": data,
        "included": [],
        "links": {"next": null, "prev": null}
    })))
}

async fn related_identifiers(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&headers)?;
    let include = includes(&params, &RELATION_INCLUDES)?;
    let owner = db.player(&id).ok_or(StatusCode::NOT_FOUND)?;

    let mut related_players: Vec<&PlayerRecord> = Vec::new();
    let data: Vec<Value> = owner
        .identifiers
        .iter()
        .map(|identifier| {
            let sharing = db.sharing_players(owner, identifier);
            let refs: Vec<Value> = sharing
                .iter()
                .map(|p| json!({"type": "player", "id": p.id}))
                .collect();
            for player in &sharing {
                if !related_players.iter().any(|p| p.id == player.id) {
                    related_players.push(*player);
                }
            }
            let mut value = dataset::identifier_json(owner, identifier);
            value["meta"] = json!({"commonIdentifier": !sharing.is_empty()});
            value["relationships"]["relatedPlayers"] = json!({"data": refs});
            value["relationships"]["organizations"] = json!({"data": []});
            value
        })
        .collect();

    let mut included: Vec<Value> = Vec::new();
    if include.iter().any(|k| k == "player") {
        included.push(dataset::player_json(owner));
        included.extend(related_players.iter().map(|p| dataset::player_json(p)));
    }
    if include.iter().any(|k| k == "identifier") {
        for player in &related_players {
            included.extend(
                player
                    .identifiers
                    .iter()
                    .map(|i| dataset::identifier_json(player, i)),
            );
        }
    }

    Ok(Json(json!({
        "data": data,
        "included": included,
        "links": {"next": null, "prev": null}
    })))
}
