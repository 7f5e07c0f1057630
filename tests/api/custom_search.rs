use firmfacts::{
    domain::{NOT_FOUND, NO_PUBLIC_RECORD, POSSIBLE_INCIDENT_MARKER},
    services::{INCIDENT_QUALIFIER, PROFILE_QUALIFIER, REVENUE_QUALIFIER},
};
use serde_json::{json, Value};

use crate::helpers::{
    custom_search_provider, dead_address, spawn_app, spawn_search_stub, SearchStub, StubAnswer,
};

#[tokio::test]
async fn missing_credentials_fail_before_any_search() {
    let stub = spawn_search_stub(SearchStub::one_hit_each());

    for (key, cx) in [(None, None), (Some("key"), None), (None, Some("cx"))] {
        let app = spawn_app(custom_search_provider(&stub.base_url, key, cx)).await;

        let response = app.search(&[("name", "Apple")]).await;

        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Provider is not configured");
        assert_ne!(body["error"], "Provider call failed");
    }

    assert!(stub.received().is_empty());
}

#[tokio::test]
async fn apple_with_one_hit_per_lookup() {
    let stub = spawn_search_stub(SearchStub::one_hit_each());
    let app = spawn_app(custom_search_provider(&stub.base_url, Some("key"), Some("cx"))).await;

    let response = app.search(&[("name", "Apple")]).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "company_name": "Apple",
            "website": "www.apple.com",
            "revenue": "Apple annual revenue for 2023 was $383.285B.",
            "business": "Apple designs iPhone, iPad, Mac and wearables.",
            "security_incident": format!(
                "{}Researchers reported a zero-day exploited in the wild.",
                POSSIBLE_INCIDENT_MARKER
            ),
        })
    );

    let mut queries: Vec<String> = stub
        .received()
        .iter()
        .map(|params| {
            assert_eq!(params["key"], "key");
            assert_eq!(params["cx"], "cx");
            params["q"].as_str().unwrap().to_string()
        })
        .collect();
    queries.sort();
    let mut expected = vec![
        format!("Apple {}", PROFILE_QUALIFIER),
        format!("Apple {}", REVENUE_QUALIFIER),
        format!("Apple {}", INCIDENT_QUALIFIER),
    ];
    expected.sort();
    assert_eq!(queries, expected);
}

#[tokio::test]
async fn failed_revenue_lookup_keeps_other_fields() {
    let stub = spawn_search_stub(SearchStub {
        revenue: StubAnswer::Status(500),
        ..SearchStub::one_hit_each()
    });
    let app = spawn_app(custom_search_provider(&stub.base_url, Some("key"), Some("cx"))).await;

    let response = app.search(&[("name", "Apple")]).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("error").is_none());
    assert_eq!(body["revenue"], NOT_FOUND);
    assert_eq!(body["website"], "www.apple.com");
    assert_eq!(body["business"], "Apple designs iPhone, iPad, Mac and wearables.");
    assert!(body["security_incident"]
        .as_str()
        .unwrap()
        .starts_with(POSSIBLE_INCIDENT_MARKER));
}

#[tokio::test]
async fn no_incident_hits_keep_exact_sentinel() {
    let stub = spawn_search_stub(SearchStub {
        incident: StubAnswer::NoItems,
        ..SearchStub::one_hit_each()
    });
    let app = spawn_app(custom_search_provider(&stub.base_url, Some("key"), Some("cx"))).await;

    let body: Value = app.search(&[("name", "Apple")]).await.json().await.unwrap();

    assert_eq!(body["security_incident"], NO_PUBLIC_RECORD);
    assert_eq!(body["website"], "www.apple.com");
}

#[tokio::test]
async fn long_snippets_are_capped() {
    let long_snippet = format!("{} tail that must not survive", "x".repeat(150));
    let stub = spawn_search_stub(SearchStub {
        profile: StubAnswer::Hits(vec![json!({
            "link": "https://www.apple.com/",
            "displayLink": "www.apple.com",
            "snippet": long_snippet,
        })]),
        incident: StubAnswer::Hits(vec![json!({
            "link": "https://news.example.com/",
            "snippet": long_snippet,
        })]),
        ..SearchStub::one_hit_each()
    });
    let app = spawn_app(custom_search_provider(&stub.base_url, Some("key"), Some("cx"))).await;

    let body: Value = app.search(&[("name", "Apple")]).await.json().await.unwrap();

    let capped = format!("{}...", "x".repeat(150));
    assert_eq!(body["business"], capped);
    assert_eq!(
        body["security_incident"],
        format!("{}{}", POSSIBLE_INCIDENT_MARKER, capped)
    );
}

#[tokio::test]
async fn unreachable_backend_still_answers_with_sentinels() {
    let app = spawn_app(custom_search_provider(
        &format!("{}/customsearch/v1", dead_address()),
        Some("key"),
        Some("cx"),
    ))
    .await;

    let response = app.search(&[("name", "Initech")]).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "company_name": "Initech",
            "website": NOT_FOUND,
            "revenue": NOT_FOUND,
            "business": NOT_FOUND,
            "security_incident": NO_PUBLIC_RECORD,
        })
    );
}
