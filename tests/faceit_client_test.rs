// tests/faceit_client_test.rs
use serde_json::json;

mod common;
use common::faceit_stub::{spawn_faceit_stub, StubState};

fn feed_match(id: usize) -> serde_json::Value {
    json!({
        "match_id": format!("m{}", id),
        "status": "FINISHED",
        "finished_at": 1000 + id,
        "teams": {
            "faction1": { "faction_id": "t1", "name": "Alpha" },
            "faction2": { "faction_id": "t2", "name": "Bravo" }
        }
    })
}

#[tokio::test]
async fn pagination_walks_full_pages_and_stops_at_the_first_partial_one() {
    let stub = spawn_faceit_stub(StubState {
        page_size: 2,
        feed: (0..5).map(feed_match).collect(),
        ..Default::default()
    })
    .await;
    let client = stub.client();

    let matches = client
        .championship_matches("champ-1")
        .await
        .expect("pagination should succeed");

    assert_eq!(matches.len(), 5);
    // pages at offsets 0 and 2 were full, the one at 4 was partial
    assert_eq!(stub.feed_requests(), vec![0, 2, 4]);
}

#[tokio::test]
async fn an_exactly_full_last_page_terminates_on_the_following_empty_page() {
    let stub = spawn_faceit_stub(StubState {
        page_size: 2,
        feed: (0..4).map(feed_match).collect(),
        ..Default::default()
    })
    .await;
    let client = stub.client();

    let matches = client.championship_matches("champ-1").await.unwrap();

    assert_eq!(matches.len(), 4);
    assert_eq!(stub.feed_requests(), vec![0, 2, 4]);
}

#[tokio::test]
async fn a_400_past_the_last_page_ends_pagination_with_what_was_collected() {
    let stub = spawn_faceit_stub(StubState {
        page_size: 2,
        feed: (0..4).map(feed_match).collect(),
        feed_error_at_offset: Some((4, 400)),
        ..Default::default()
    })
    .await;
    let client = stub.client();

    let matches = client
        .championship_matches("champ-1")
        .await
        .expect("400 past the last page is not an error");

    assert_eq!(matches.len(), 4);
}

#[tokio::test]
async fn a_400_on_the_first_page_is_fatal() {
    let stub = spawn_faceit_stub(StubState {
        page_size: 2,
        feed: (0..4).map(feed_match).collect(),
        feed_error_at_offset: Some((0, 400)),
        ..Default::default()
    })
    .await;
    let client = stub.client();

    let result = client.championship_matches("champ-1").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn a_server_error_mid_pagination_is_fatal() {
    let stub = spawn_faceit_stub(StubState {
        page_size: 2,
        feed: (0..6).map(feed_match).collect(),
        feed_error_at_offset: Some((2, 500)),
        ..Default::default()
    })
    .await;
    let client = stub.client();

    let result = client.championship_matches("champ-1").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn match_stats_not_found_is_absent_data() {
    let stub = spawn_faceit_stub(StubState::default()).await;
    let client = stub.client();

    let stats = client.match_stats("missing").await.unwrap();
    assert!(stats.is_none());
}

#[tokio::test]
async fn veto_history_not_found_and_unparseable_bodies_are_no_data() {
    let mut state = StubState::default();
    // a body that is valid JSON but not a veto record
    state
        .veto_histories
        .insert("garbled".to_string(), json!("free-form text"));
    let stub = spawn_faceit_stub(state).await;
    let client = stub.client();

    assert!(client.match_veto_history("missing").await.is_none());
    assert!(client.match_veto_history("garbled").await.is_none());
}

#[tokio::test]
async fn veto_history_with_content_is_returned() {
    let mut state = StubState::default();
    state.veto_histories.insert(
        "m1".to_string(),
        json!({
            "map": {
                "entities": [{ "name": "Mirage" }, { "name": "Nuke" }],
                "picks": ["Mirage"]
            }
        }),
    );
    let stub = spawn_faceit_stub(state).await;
    let client = stub.client();

    let history = client.match_veto_history("m1").await.expect("history");
    assert!(history.map_category().is_some());
}

#[tokio::test]
async fn empty_search_nicknames_short_circuit_to_no_results() {
    let stub = spawn_faceit_stub(StubState::default()).await;
    let client = stub.client();

    let results = client.search_teams("   ").await.unwrap();
    assert!(results.is_empty());
}
