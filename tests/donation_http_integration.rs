//! Integration tests for the donation endpoints.
//!
//! Exercises the full router: authentication middleware, extractors, JSend
//! error mapping and the handlers over in-memory storage.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{donation_body, get, json, TestApp, MERCHANT};
use donation_service::adapters::tappay::FAILING_TEST_PRIME;

async fn create_periodic(app: &TestApp, user: &str, to_feedback: bool) -> String {
    let token = app.bearer_for(user);
    let mut body = donation_body(user);
    body["frequency"] = json!("monthly");
    body["to_feedback"] = json!(to_feedback);
    let response = app
        .send(json("POST", "/v1/periodic-donations", Some(&token), &body))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_prime(app: &TestApp, user: &str) -> String {
    let token = app.bearer_for(user);
    let response = app
        .send(json(
            "POST",
            "/v1/donations/prime",
            Some(&token),
            &donation_body(user),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Create
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn create_prime_donation_charges_and_returns_record() {
    let app = TestApp::new();
    let token = app.bearer_for("1");

    let response = app
        .send(json(
            "POST",
            "/v1/donations/prime",
            Some(&token),
            &donation_body("1"),
        ))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "success");
    let data = &response.body["data"];
    assert_eq!(data["amount"], 500);
    assert_eq!(data["currency"], "TWD");
    assert_eq!(data["status"], "paid");
    assert_eq!(data["frequency"], "one_time");
    assert_eq!(data["user_id"], "1");
    assert!(data["order_number"].as_str().unwrap().starts_with("donation-"));

    let calls = app.gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].merchant_id, MERCHANT);
    assert!(!calls[0].remember);
    assert_eq!(app.receipts(), 1);
}

#[tokio::test]
async fn create_periodic_donation_remembers_card() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let mut body = donation_body("1");
    body["frequency"] = json!("monthly");

    let response = app
        .send(json("POST", "/v1/periodic-donations", Some(&token), &body))
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["frequency"], "monthly");
    assert_eq!(response.body["data"]["periodic_status"], "active");
    assert!(app.gateway.calls()[0].remember);
}

#[tokio::test]
async fn create_accepts_numeric_user_id_and_donor_alias() {
    let app = TestApp::new();
    let token = app.bearer_for("42");
    let mut body = donation_body("42");
    body["user_id"] = json!(42);
    let cardholder = body["cardholder"].take();
    body.as_object_mut().unwrap().remove("cardholder");
    body["donor"] = cardholder;

    let response = app
        .send(json("POST", "/v1/donations/prime", Some(&token), &body))
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["cardholder"]["email"], "developer@example.org");
}

#[tokio::test]
async fn create_without_credentials_is_401() {
    let app = TestApp::new();
    let response = app
        .send(json("POST", "/v1/donations/prime", None, &donation_body("1")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], "fail");
    assert_eq!(response.body["code"], "UNAUTHORIZED");
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn create_with_garbage_token_is_401() {
    let app = TestApp::new();
    let response = app
        .send(json(
            "POST",
            "/v1/donations/prime",
            Some("not-a-jwt"),
            &donation_body("1"),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_with_cookie_token_in_bearer_header_is_401() {
    let app = TestApp::new();
    let cookie_token = app.id_token_for("1");
    let response = app
        .send(json(
            "POST",
            "/v1/donations/prime",
            Some(&cookie_token),
            &donation_body("1"),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_for_other_user_is_403() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let response = app
        .send(json(
            "POST",
            "/v1/donations/prime",
            Some(&token),
            &donation_body("2"),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "FORBIDDEN");
    assert!(response.body["data"]["user_id"].is_string());
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn create_with_invalid_amount_is_400_naming_field() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let mut body = donation_body("1");
    body["amount"] = json!(0);

    let response = app
        .send(json("POST", "/v1/donations/prime", Some(&token), &body))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "fail");
    assert_eq!(response.body["code"], "VALIDATION_FAILED");
    assert!(response.body["data"]["amount"].is_string());
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn create_with_malformed_json_is_400() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let request = axum::http::Request::post("/v1/donations/prime")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"amount\": "))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["data"]["body"].is_string());
}

#[tokio::test]
async fn declined_charge_is_500_payment_failed() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let mut body = donation_body("1");
    body["prime"] = json!(FAILING_TEST_PRIME);

    let response = app
        .send(json("POST", "/v1/donations/prime", Some(&token), &body))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["status"], "error");
    assert_eq!(response.body["code"], "PAYMENT_FAILED");
    assert_eq!(app.receipts(), 0);

    let listing = app.send(get("/v1/users/1/donations", Some(&token))).await;
    assert_eq!(listing.body["data"]["meta"]["total"], 0);
}

// ════════════════════════════════════════════════════════════════════════════════
// Get / Patch
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn owner_can_read_donation() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("1");

    let response = app
        .send(get(&format!("/v1/donations/prime/{}", id), Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn owner_can_read_with_id_token_cookie() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let cookie = format!("id_token={}", app.id_token_for("1"));

    let request = axum::http::Request::get(format!("/v1/donations/prime/{}", id))
        .header("cookie", cookie)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn conflicting_bearer_and_cookie_is_401() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;

    let request = axum::http::Request::get(format!("/v1/donations/prime/{}", id))
        .header("authorization", format!("Bearer {}", app.bearer_for("1")))
        .header("cookie", format!("id_token={}", app.id_token_for("2")))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_user_cannot_read_donation() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("2");

    let response = app
        .send(get(&format!("/v1/donations/prime/{}", id), Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mismatched_user_id_claim_is_403() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("1");

    let response = app
        .send(get(
            &format!("/v1/donations/prime/{}?user_id=2", id),
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn prime_id_under_periodic_path_is_404() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("1");

    let response = app
        .send(get(&format!("/v1/periodic-donations/{}", id), Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "DONATION_NOT_FOUND");
    assert!(response.body["data"]["id"].is_string());
}

#[tokio::test]
async fn malformed_id_is_404() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let response = app
        .send(get("/v1/donations/prime/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_only_named_fields() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("1");
    let uri = format!("/v1/donations/prime/{}", id);

    let response = app
        .send(json(
            "PATCH",
            &uri,
            Some(&token),
            &json!({
                "donor": { "name": null, "address": "Taipei" },
                "send_receipt": "yearly",
                "notes": "thanks"
            }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let read = app.send(get(&uri, Some(&token))).await;
    let data = &read.body["data"];
    assert_eq!(data["cardholder"]["address"], "Taipei");
    assert!(data["cardholder"]["name"].is_null());
    assert_eq!(data["cardholder"]["email"], "developer@example.org");
    assert_eq!(data["send_receipt"], "yearly");
    assert_eq!(data["notes"], "thanks");
}

#[tokio::test]
async fn patch_with_unknown_key_is_400() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("1");

    let response = app
        .send(json(
            "PATCH",
            &format!("/v1/donations/prime/{}", id),
            Some(&token),
            &json!({ "amount": 1 }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_by_other_user_is_403() {
    let app = TestApp::new();
    let id = create_prime(&app, "1").await;
    let token = app.bearer_for("2");

    let response = app
        .send(json(
            "PATCH",
            &format!("/v1/donations/prime/{}", id),
            Some(&token),
            &json!({ "notes": "mine now" }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn periodic_patch_changes_exactly_the_named_fields() {
    let app = TestApp::new();
    let id = create_periodic(&app, "1", true).await;
    let token = app.bearer_for("1");
    let uri = format!("/v1/periodic-donations/{}", id);
    let before = app.send(get(&uri, Some(&token))).await.body["data"].clone();

    let response = app
        .send(json(
            "PATCH",
            &uri,
            Some(&token),
            &json!({ "to_feedback": false, "donor": { "name": "X" } }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let mut after = app.send(get(&uri, Some(&token))).await.body["data"].clone();
    let mut expected = before.clone();
    expected["to_feedback"] = json!(false);
    expected["cardholder"]["name"] = json!("X");
    // The audit stamp moves with any real change.
    assert_ne!(after["updated_at"], before["updated_at"]);
    expected.as_object_mut().unwrap().remove("updated_at");
    after.as_object_mut().unwrap().remove("updated_at");
    assert_eq!(after, expected);
}

#[tokio::test]
async fn repeating_a_patch_leaves_the_record_unchanged() {
    let app = TestApp::new();
    let id = create_periodic(&app, "1", true).await;
    let token = app.bearer_for("1");
    let uri = format!("/v1/periodic-donations/{}", id);
    let patch = json!({ "to_feedback": false, "donor": { "name": "X" } });

    let first = app.send(json("PATCH", &uri, Some(&token), &patch)).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    let once = app.send(get(&uri, Some(&token))).await.body["data"].clone();

    let second = app.send(json("PATCH", &uri, Some(&token), &patch)).await;
    assert_eq!(second.status, StatusCode::NO_CONTENT);
    let twice = app.send(get(&uri, Some(&token))).await.body["data"].clone();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn malformed_patch_on_unknown_id_is_400_before_404() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let uri = format!("/v1/donations/prime/{}", uuid::Uuid::new_v4());

    let request = axum::http::Request::patch(&uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"notes\": "))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_patch_on_unknown_id_with_matching_claim_is_404() {
    let app = TestApp::new();
    let token = app.bearer_for("1");

    for uri in [
        format!("/v1/donations/prime/{}", uuid::Uuid::new_v4()),
        format!("/v1/periodic-donations/{}", uuid::Uuid::new_v4()),
    ] {
        let response = app
            .send(json(
                "PATCH",
                &uri,
                Some(&token),
                &json!({ "user_id": 1, "notes": "hello" }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn fetch_of_unknown_id_with_matching_claim_is_404() {
    let app = TestApp::new();
    let token = app.bearer_for("1");

    let response = app
        .send(get(
            &format!("/v1/donations/prime/{}?user_id=1", uuid::Uuid::new_v4()),
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ════════════════════════════════════════════════════════════════════════════════
// List
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn list_merges_both_kinds_newest_first() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    create_prime(&app, "1").await;
    let mut periodic = donation_body("1");
    periodic["frequency"] = json!("yearly");
    let created = app
        .send(json("POST", "/v1/periodic-donations", Some(&token), &periodic))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let response = app
        .send(get("/v1/users/1/donations?limit=10", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let records = response.body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["is_periodic"], true);
    assert_eq!(records[1]["is_periodic"], false);
    assert_eq!(response.body["data"]["meta"]["total"], 2);
}

#[tokio::test]
async fn list_honours_offset_and_limit() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    for _ in 0..3 {
        create_prime(&app, "1").await;
    }

    let response = app
        .send(get("/v1/users/1/donations?offset=1&limit=1", Some(&token)))
        .await;

    let data = &response.body["data"];
    assert_eq!(data["records"].as_array().unwrap().len(), 1);
    assert_eq!(data["meta"]["total"], 3);
    assert_eq!(data["meta"]["offset"], 1);
    assert_eq!(data["meta"]["limit"], 1);
}

#[tokio::test]
async fn list_with_excessive_offset_is_400() {
    let app = TestApp::new();
    let token = app.bearer_for("1");

    let response = app
        .send(get("/v1/users/1/donations?offset=5000", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["data"]["offset"].is_string());
}

#[tokio::test]
async fn list_of_other_user_is_403() {
    let app = TestApp::new();
    let token = app.bearer_for("1");
    let response = app
        .send(get("/v1/users/2/donations", Some(&token)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn unknown_route_is_jsend_404() {
    let app = TestApp::new();
    let response = app.send(get("/v1/nothing-here", None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], "fail");
    assert_eq!(response.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();
    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}
