mod support;

use serde_json::json;
use std::time::Duration;

use shoplist::access::{ApiRequest, HttpMethod, HttpResponse, TransportError};
use shoplist::domain::error::SERVER_ERROR_MESSAGE;
use shoplist::ShoplistError;
use support::{list_json, Harness, Reply, AUTH};

#[tokio::test]
async fn test_unauthorized_request_refreshes_once_and_replays() {
    let h = Harness::new();
    h.backend
        .raw(HttpMethod::Get, "/lists", 401, "")
        .json(HttpMethod::Get, "/lists", 200, json!([list_json("l1", "Courses")]));
    h.backend
        .json(HttpMethod::Post, "/auth/refresh", 200, json!({ "success": true }));

    let lists = h.client.api.get_lists().await.expect("replayed request should succeed");

    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Courses");
    assert_eq!(h.backend.count(HttpMethod::Get, "/lists"), 2);
    assert_eq!(h.backend.refreshes(), 1);
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn test_second_unauthorized_redirects_without_another_refresh() {
    let h = Harness::new();
    h.backend.signed_in();
    h.client.require_session().await.expect("signed in");
    h.backend.raw(HttpMethod::Get, "/lists", 401, "");
    h.backend
        .json(HttpMethod::Post, "/auth/refresh", 200, json!({ "success": true }));

    let result = h.client.api.get_lists().await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert_eq!(h.backend.count(HttpMethod::Get, "/lists"), 2);
    assert_eq!(h.backend.refreshes(), 1);
    assert_eq!(h.navigator.visited(), vec![Harness::login_url()]);
    assert!(!h.client.session.is_authenticated());
}

#[tokio::test]
async fn test_failed_refresh_redirects_without_replay() {
    let h = Harness::new();
    h.backend.raw(HttpMethod::Delete, "/lists/l1", 401, "");
    h.backend
        .json(HttpMethod::Post, "/auth/refresh", 401, json!({ "error": "expired" }));

    let result = h.client.api.delete_list("l1").await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert_eq!(h.backend.count(HttpMethod::Delete, "/lists/l1"), 1);
    assert_eq!(h.backend.refreshes(), 1);
    assert_eq!(h.navigator.visited(), vec![Harness::login_url()]);
}

#[tokio::test]
async fn test_refresh_reporting_failure_counts_as_failed() {
    let h = Harness::new();
    h.backend.raw(HttpMethod::Get, "/lists", 401, "");
    h.backend
        .json(HttpMethod::Post, "/auth/refresh", 200, json!({ "success": false }));

    let result = h.client.api.get_lists().await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert_eq!(h.backend.count(HttpMethod::Get, "/lists"), 1);
}

#[tokio::test]
async fn test_unreachable_refresh_redirects_without_replay() {
    let h = Harness::new();
    h.backend.raw(HttpMethod::Get, "/lists", 401, "");
    h.backend.reply(
        HttpMethod::Post,
        "/auth/refresh",
        Reply::Fail(TransportError::Network("connection reset".into())),
    );

    let result = h.client.api.get_lists().await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert_eq!(h.backend.count(HttpMethod::Get, "/lists"), 1);
    assert_eq!(h.backend.refreshes(), 1);
    assert_eq!(h.navigator.visited(), vec![Harness::login_url()]);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_that_times_out_redirects_without_replay() {
    let h = Harness::new();
    h.backend.raw(HttpMethod::Post, "/lists", 401, "");
    h.backend.reply(
        HttpMethod::Post,
        "/auth/refresh",
        Reply::After(
            Duration::from_secs(30),
            HttpResponse::json(200, &json!({ "success": true })),
        ),
    );

    let started = tokio::time::Instant::now();
    let body = shoplist::domain::CreateListRequest {
        name: "Courses".into(),
    };
    let result = h.client.api.create_list(&body).await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(h.backend.count(HttpMethod::Post, "/lists"), 1);
    assert_eq!(h.navigator.visited(), vec![Harness::login_url()]);
}

#[tokio::test]
async fn test_replay_carries_cookies_set_by_refresh() {
    let h = Harness::new();
    h.backend.with_cookie("access_token", "stale");
    h.backend
        .raw(HttpMethod::Get, "/lists", 401, "")
        .json(HttpMethod::Get, "/lists", 200, json!([]));
    h.backend.reply(
        HttpMethod::Post,
        "/auth/refresh",
        Reply::Respond(HttpResponse {
            set_cookies: vec!["access_token=fresh; Path=/; HttpOnly; Secure".to_string()],
            ..HttpResponse::json(200, &json!({ "success": true }))
        }),
    );

    h.client.api.get_lists().await.unwrap();

    let cookies: Vec<Option<String>> = h
        .backend
        .requests()
        .iter()
        .map(|r| r.header("Cookie").map(String::from))
        .collect();
    assert_eq!(
        cookies,
        vec![
            Some("access_token=stale".to_string()),
            Some("access_token=stale".to_string()),
            Some("access_token=fresh".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_times_out_after_ten_seconds() {
    let h = Harness::new();
    h.backend.reply(
        HttpMethod::Get,
        "/lists",
        Reply::After(
            Duration::from_secs(30),
            HttpResponse::json(200, &json!([])),
        ),
    );

    let started = tokio::time::Instant::now();
    let result = h.client.api.get_lists().await;

    assert!(matches!(result, Err(ShoplistError::Timeout)));
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(h.backend.refreshes(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_a_network_error() {
    let h = Harness::new();
    h.backend.reply(
        HttpMethod::Get,
        "/lists",
        Reply::Fail(TransportError::Network("connection refused".into())),
    );

    let err = h.client.api.get_lists().await.unwrap_err();

    assert!(matches!(err, ShoplistError::Network(_)));
    assert_eq!(err.to_string(), "Network error. Please check your connection.");
    assert_eq!(h.backend.refreshes(), 0);
}

#[tokio::test]
async fn test_unauthenticated_check_clears_session_and_redirects_without_refresh() {
    let h = Harness::new();
    h.backend
        .signed_in()
        .json(HttpMethod::Get, "/auth/me", 200, json!({ "authenticated": false }));

    let profile = h.client.require_session().await.expect("first check signs in");
    assert_eq!(profile.email, "ada@example.com");
    assert!(h.client.session.is_authenticated());

    let result = h.client.require_session().await;

    assert!(matches!(result, Err(ShoplistError::Unauthenticated)));
    assert!(!h.client.session.is_authenticated());
    assert_eq!(h.backend.refreshes(), 0);
    assert_eq!(h.navigator.visited(), vec![Harness::login_url()]);
}

#[tokio::test]
async fn test_unreachable_auth_service_fails_closed() {
    let h = Harness::new();
    h.backend.reply(
        HttpMethod::Get,
        "/auth/me",
        Reply::Fail(TransportError::Network("dns".into())),
    );

    let response = h.client.auth.check_session().await;

    assert!(!response.authenticated);
    assert!(response.profile.is_none());
}

#[tokio::test]
async fn test_failure_messages_follow_body_then_status() {
    let h = Harness::new();
    h.backend
        .raw(HttpMethod::Get, "/lists/broken", 500, "<html>oops</html>")
        .json(HttpMethod::Post, "/lists", 400, json!({ "error": "Name already used" }));

    let err = h.client.api.get_list("broken").await.unwrap_err();
    assert!(matches!(
        &err,
        ShoplistError::Http { status: 500, message } if message == SERVER_ERROR_MESSAGE
    ));

    let body = shoplist::domain::CreateListRequest {
        name: "Courses".into(),
    };
    let err = h.client.api.create_list(&body).await.unwrap_err();
    assert_eq!(err.to_string(), "Name already used");
}

#[tokio::test]
async fn test_success_with_wrong_shape_is_a_decode_error() {
    let h = Harness::new();
    h.backend
        .json(HttpMethod::Get, "/lists", 200, json!({ "lists": [] }));

    let err = h.client.api.get_lists().await.unwrap_err();

    assert!(matches!(err, ShoplistError::Decode(_)));
}

#[tokio::test]
async fn test_requests_carry_json_content_type_and_caller_headers_win() {
    let h = Harness::new();
    h.backend.json(HttpMethod::Get, "/lists", 200, json!([]));

    h.client.api.get_lists().await.unwrap();
    let request = ApiRequest::get("/lists").with_header("content-type", "text/plain");
    h.client.api.execute(&request).await.unwrap();

    let sent = h.backend.requests();
    assert_eq!(sent[0].url, "https://api.test/lists");
    assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
    assert!(sent[0].with_credentials);
    assert_eq!(sent[1].header("Content-Type"), Some("text/plain"));
    assert_eq!(
        sent[1]
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .count(),
        1
    );
    // No active OpenTelemetry context, so nothing to propagate.
    assert_eq!(sent[0].header("traceparent"), None);
}

#[tokio::test]
async fn test_search_query_is_url_encoded() {
    let h = Harness::new();
    h.backend.json(
        HttpMethod::Get,
        "/articles/search",
        200,
        support::search_json("crème fraîche", &[]),
    );

    h.client
        .api
        .search_articles("crème fraîche & co", 5)
        .await
        .unwrap();

    let sent = h.backend.requests();
    let url = reqwest::Url::parse(&sent[0].url).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("q".to_string(), "crème fraîche & co".to_string()),
            ("limit".to_string(), "5".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_logout_clears_session_and_credentials() {
    let h = Harness::new();
    h.backend.signed_in().with_cookie("access_token", "abc");
    h.client.require_session().await.unwrap();

    h.client.auth.logout(&h.client.session).unwrap();

    assert!(!h.client.session.is_authenticated());
    assert_eq!(h.backend.credential_clears(), 1);
    assert_eq!(h.backend.cookie_header(), None);
    assert_eq!(h.navigator.visited(), vec![format!("{AUTH}/auth/logout")]);
}
