mod common;

use axum::http::StatusCode;
use common::{get, ids, test_app};
use serde_json::json;

#[tokio::test]
async fn empty_ledger_lists_nothing() {
    let app = test_app();

    let (status, body) = app.send(get("/v1/events")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn events_are_listed_newest_first() {
    let app = test_app();
    app.seed(5).await;

    let (status, body) = app.send(get("/v1/events")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![5, 4, 3, 2, 1]);
    assert_eq!(body[0]["source"], "source-4");
    assert_eq!(body[0]["payload"]["exnum"], "EX004");
}

#[tokio::test]
async fn limit_caps_the_page() {
    let app = test_app();
    app.seed(10).await;

    let (_, body) = app.send(get("/v1/events?limit=5")).await;

    assert_eq!(ids(&body), vec![10, 9, 8, 7, 6]);
}

#[tokio::test]
async fn offset_skips_the_newest() {
    let app = test_app();
    app.seed(10).await;

    let (_, body) = app.send(get("/v1/events?offset=5")).await;

    assert_eq!(ids(&body), vec![5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn limit_and_offset_combine() {
    let app = test_app();
    app.seed(10).await;

    let (_, body) = app.send(get("/v1/events?limit=3&offset=2")).await;

    assert_eq!(ids(&body), vec![8, 7, 6]);
}

#[tokio::test]
async fn offset_past_the_end_is_empty() {
    let app = test_app();
    app.seed(3).await;

    let (status, body) = app.send(get("/v1/events?offset=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn oversized_limit_is_clamped_not_rejected() {
    let app = test_app();
    app.seed(10).await;

    let (status, body) = app.send(get("/v1/events?limit=1000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 10);
}

#[tokio::test]
async fn non_positive_limit_is_raised_to_one() {
    let app = test_app();
    app.seed(3).await;

    for uri in ["/v1/events?limit=0", "/v1/events?limit=-7"] {
        let (status, body) = app.send(get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(ids(&body), vec![3], "{uri}");
    }
}

#[tokio::test]
async fn negative_offset_is_treated_as_zero() {
    let app = test_app();
    app.seed(3).await;

    let (status, body) = app.send(get("/v1/events?offset=-4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 2, 1]);
}

#[tokio::test]
async fn default_page_holds_fifty_events() {
    let app = test_app();
    app.seed(60).await;

    let (_, body) = app.send(get("/v1/events")).await;
    let listed = ids(&body);

    assert_eq!(listed.len(), 50);
    assert_eq!(listed.first(), Some(&60));
    assert_eq!(listed.last(), Some(&11));
}

#[tokio::test]
async fn non_integer_paging_values_are_rejected() {
    let app = test_app();
    app.seed(1).await;

    for uri in [
        "/v1/events?limit=abc",
        "/v1/events?offset=1.5",
        "/v1/events?limit=",
    ] {
        let (status, body) = app.send(get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn unknown_query_parameters_are_ignored() {
    let app = test_app();
    app.seed(2).await;

    let (status, body) = app.send(get("/v1/events?page=3&limit=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn limit_beyond_i64_is_clamped_to_the_maximum_page() {
    let app = test_app();
    app.seed(3).await;

    let (status, body) = app.send(get("/v1/events?limit=99999999999999999999")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 2, 1]);
}

#[tokio::test]
async fn oversized_limit_still_caps_at_two_hundred() {
    let app = test_app();
    app.seed(205).await;

    let (status, body) = app.send(get("/v1/events?limit=99999999999999999999")).await;

    assert_eq!(status, StatusCode::OK);
    let listed = ids(&body);
    assert_eq!(listed.len(), 200);
    assert_eq!(listed.first(), Some(&205));
}

#[tokio::test]
async fn negative_limit_beyond_i64_is_raised_to_one() {
    let app = test_app();
    app.seed(3).await;

    let (status, body) = app.send(get("/v1/events?limit=-99999999999999999999")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn offset_beyond_i64_is_an_empty_page() {
    let app = test_app();
    app.seed(3).await;

    let (status, body) = app.send(get("/v1/events?offset=99999999999999999999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.send(get("/v1/events?offset=-99999999999999999999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 2, 1]);
}

#[tokio::test]
async fn repeated_paging_parameter_uses_the_last_value() {
    let app = test_app();
    app.seed(5).await;

    let (status, body) = app.send(get("/v1/events?limit=1&limit=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![5, 4, 3]);
}
