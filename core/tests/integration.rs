//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP: once with the sans-IO client driven by ureq,
//! and once through `BattleMetrics` with the reqwest transport. Validates
//! that request building and response parsing agree with the server's
//! wire format.

use battlemetrics_core::{
    ApiError, BattleMetrics, BattleMetricsClient, ClientError, HttpMethod, HttpRequest,
    HttpResponse, IdentifierKind, IdentifierQuery, Operation, PlayerInclude, PlayerSearch,
    QuickMatches, RelationInclude, ReqwestTransport,
};

const TOKEN: &str = "integration-token";

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let url = req.url();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut builder = agent.get(&url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        (HttpMethod::Post, body) => {
            let mut builder = agent.post(&url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.send(body.unwrap_or_default().as_bytes())
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the mock server on its own runtime thread; returns its base URL.
fn spawn_blocking_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

async fn api() -> BattleMetrics {
    let base_url = spawn_server().await;
    let client = BattleMetricsClient::new(&base_url, TOKEN).unwrap();
    BattleMetrics::with_transport(client, ReqwestTransport::new(None).unwrap())
}

#[test]
fn sans_io_lifecycle() {
    // Step 1: start mock server on a random port.
    let base_url = spawn_blocking_server();
    let client = BattleMetricsClient::new(&base_url, TOKEN).unwrap();

    // Step 2: search by name.
    let req = client.build_list_players(&PlayerSearch::new().search("alice"));
    let players = client.parse_list_players(execute(req)).unwrap();
    let ids: Vec<&str> = players.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["123", "456"]);

    // Step 3: fetch one of them with its servers.
    let req = client.build_get_player("123", &[PlayerInclude::Server]);
    let player = client.parse_get_player(execute(req)).unwrap();
    assert_eq!(player.data.name(), "alice");
    let servers: Vec<&str> = player.servers().map(|s| s.attributes.name.as_str()).collect();
    assert_eq!(servers, vec!["Main #1"]);

    // Step 4: match the shared IP.
    let req = client
        .build_quick_match(&IdentifierQuery::new(IdentifierKind::Ip, "203.0.113.5"))
        .unwrap();
    let matched = client.parse_quick_match(execute(req)).unwrap();
    assert_eq!(matched.matches.player_ids(), vec!["123", "456"]);

    // Step 5: related identifiers of the first player.
    let req = client.build_related_identifiers("123", &[]);
    let related = client.parse_related_identifiers(execute(req)).unwrap();
    let common: Vec<&str> = related
        .data
        .iter()
        .filter(|i| i.is_common())
        .map(|i| i.attributes.identifier.as_str())
        .collect();
    assert_eq!(common, vec!["203.0.113.5"]);

    // Step 6: unknown player is a 404.
    let req = client.build_get_player("999", &[]);
    let err = client.parse_get_player(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn list_players_with_includes() {
    let api = api().await;
    let search = PlayerSearch::new()
        .search("alice")
        .include([PlayerInclude::Server, PlayerInclude::Identifier]);

    let players = api.list_players(&search).await.unwrap();

    assert_eq!(players.data.len(), 2);
    assert_eq!(players.included.iter().filter(|e| e.as_server().is_some()).count(), 2);
    assert_eq!(players.included.iter().filter(|e| e.as_identifier().is_some()).count(), 4);
    assert!(players.links.next.is_none());
}

#[tokio::test]
async fn list_players_follows_pagination_links() {
    let api = api().await;
    let search = PlayerSearch::new().search("alice").page_size(1);

    let first = api.list_players(&search).await.unwrap();
    assert_eq!(first.data[0].id, "123");
    let next = first.links.next.expect("first page links to the second");

    let second = api.follow_link(&next).await.unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].id, "456");
    assert!(second.links.next.is_none());
    assert!(second.links.prev.is_some());
}

#[tokio::test]
async fn follow_link_refuses_other_hosts() {
    let api = api().await;

    let err = api
        .follow_link("https://elsewhere.example/players?page%5Boffset%5D=1")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Request { operation: Operation::FollowLink, source: ApiError::ForeignLink(_), .. }
    ));
}

#[tokio::test]
async fn get_player_resolves_active_flags() {
    let api = api().await;

    let player = api
        .get_player_by_id("123", &[PlayerInclude::PlayerFlag, PlayerInclude::FlagPlayer])
        .await
        .unwrap();

    let flags: Vec<&str> = player.active_flags().map(|f| f.attributes.name.as_str()).collect();
    assert_eq!(flags, vec!["Cheater"]);
}

#[tokio::test]
async fn get_player_not_found_is_wrapped() {
    let api = api().await;

    let err = api.get_player_by_id("999", &[]).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        ClientError::Request { operation, target, .. } => {
            assert_eq!(operation, Operation::GetPlayer);
            assert_eq!(target, "999");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn quick_match_cardinality() {
    let api = api().await;

    let one = api
        .quick_match(&IdentifierQuery::new(IdentifierKind::SteamId, "76561197960287931"))
        .await
        .unwrap();
    assert!(matches!(one.matches, QuickMatches::One(_)));
    assert_eq!(one.matches.player_ids(), vec!["789"]);

    let many = api
        .quick_match(&IdentifierQuery::new(IdentifierKind::Ip, "203.0.113.5"))
        .await
        .unwrap();
    assert!(matches!(many.matches, QuickMatches::Many(_)));

    let none = api
        .quick_match(&IdentifierQuery::new(IdentifierKind::Name, "nobody"))
        .await
        .unwrap();
    assert!(none.matches.is_empty());
}

#[tokio::test]
async fn related_identifiers_include_related_players() {
    let api = api().await;

    let related = api
        .get_related_identifiers("123", &[RelationInclude::Player])
        .await
        .unwrap();

    assert_eq!(related.data.len(), 2);
    let players: Vec<&str> = related
        .included
        .iter()
        .filter_map(|e| e.as_player())
        .map(|p| p.name())
        .collect();
    assert_eq!(players, vec!["alice", "Alice Cooper"]);
}

#[tokio::test]
async fn player_counter_include_keeps_payload() {
    let api = api().await;

    let player = api
        .get_player_by_id("456", &[PlayerInclude::PlayerCounter])
        .await
        .unwrap();

    let counter = player.included[0].as_unknown().expect("unmodeled entry");
    assert_eq!(counter.kind, "playerCounter");
    assert_eq!(counter.id.as_deref(), Some("pc-456"));
    assert_eq!(counter.raw["attributes"]["servers"], 2);
}
