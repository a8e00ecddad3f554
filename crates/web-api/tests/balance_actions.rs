//! Integration tests for the admin balance-action flow.
//!
//! A rejected request must leave no ledger entry and no portfolio
//! mutation; an accepted one must leave exactly one ledger entry and the
//! recomputed balance.

mod common;

use axum::http::StatusCode;
use coinharbor_data::Store;
use common::{admin_token, register_user, request, test_app, APPROVAL_CODE};
use serde_json::{json, Value};

fn action_body(user_id: i64, action: &str, amount: &str, codes: [&str; 3]) -> Value {
    json!({
        "userId": user_id,
        "adminId": 1,
        "action": action,
        "amount": amount,
        "currency": "USD",
        "reason": "bonus",
        "code1": codes[0],
        "code2": codes[1],
        "code3": codes[2],
    })
}

async fn post_action(
    app: &axum::Router,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    request(app, "POST", "/api/admin/balance-action", Some(token), Some(body)).await
}

#[tokio::test]
async fn credit_from_zero_records_the_ledger_and_balance() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();

    let codes = [APPROVAL_CODE; 3];
    let (status, action) =
        post_action(&app, &token, action_body(user_id, "credit", "1000.00", codes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(action["action"], "credit");
    assert_eq!(action["amount"], "1000.00");
    assert_eq!(action["currency"], "USD");
    assert_eq!(action["reason"], "bonus");
    assert_eq!(action["adminId"], 1);

    let (status, portfolio) =
        request(&app, "GET", &format!("/api/portfolio/{user_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(portfolio["portfolio"]["totalBalance"], "1000.00");
    assert_eq!(portfolio["portfolio"]["totalValue"], "1000.00");

    let ledger = store.get_user_balance_actions(user_id).await.unwrap();
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn debit_clamps_at_zero() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();
    let codes = [APPROVAL_CODE; 3];

    let (status, _) =
        post_action(&app, &token, action_body(user_id, "credit", "100.00", codes)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        post_action(&app, &token, action_body(user_id, "debit", "2500.00", codes)).await;
    assert_eq!(status, StatusCode::OK);

    let portfolio = store.get_portfolio(user_id).await.unwrap().unwrap();
    assert_eq!(portfolio.total_balance.to_string(), "0.00");
    assert_eq!(store.get_user_balance_actions(user_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn missing_or_short_codes_reject_with_no_effect() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();

    // Missing third code.
    let mut body = action_body(user_id, "credit", "1000.00", [APPROVAL_CODE; 3]);
    body.as_object_mut().unwrap().remove("code3");
    let (status, response) = post_action(&app, &token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["message"],
        "All three 6-digit authorization codes are required"
    );

    // Short code.
    let (status, _) = post_action(
        &app,
        &token,
        action_body(user_id, "credit", "1000.00", [APPROVAL_CODE, "66666", APPROVAL_CODE]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Atomic rejection: nothing was written.
    assert!(store.get_user_balance_actions(user_id).await.unwrap().is_empty());
    let portfolio = store.get_portfolio(user_id).await.unwrap().unwrap();
    assert_eq!(portfolio.total_balance.to_string(), "0.00");
}

#[tokio::test]
async fn wrong_codes_reject_with_401_and_no_effect() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();

    let (status, response) = post_action(
        &app,
        &token,
        action_body(user_id, "credit", "1000.00", [APPROVAL_CODE, "123456", APPROVAL_CODE]),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Invalid authorization codes");

    assert!(store.get_user_balance_actions(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_payloads_reject_after_code_checks() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();
    let codes = [APPROVAL_CODE; 3];

    // Unknown action kind.
    let (status, _) =
        post_action(&app, &token, action_body(user_id, "refund", "1000.00", codes)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // system_init cannot be issued over the API.
    let (status, _) =
        post_action(&app, &token, action_body(user_id, "system_init", "1000.00", codes)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-positive amount.
    let (status, _) =
        post_action(&app, &token, action_body(user_id, "credit", "-10", codes)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing reason.
    let mut body = action_body(user_id, "credit", "1000.00", codes);
    body.as_object_mut().unwrap().remove("reason");
    let (status, response) = post_action(&app, &token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Invalid balance action payload");

    assert!(store.get_user_balance_actions(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_target_user_is_not_found() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let ledger_before = store.list_balance_actions().await.unwrap().len();

    let (status, response) = post_action(
        &app,
        &token,
        action_body(9999, "credit", "1000.00", [APPROVAL_CODE; 3]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "User not found");
    assert_eq!(
        store.list_balance_actions().await.unwrap().len(),
        ledger_before
    );
}

#[tokio::test]
async fn balance_action_requires_a_bearer_token() {
    let (app, store) = test_app().await;
    let user = register_user(&app, "target").await;
    let user_id = user["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/balance-action",
        None,
        Some(action_body(user_id, "credit", "1000.00", [APPROVAL_CODE; 3])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(store.get_user_balance_actions(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn ledger_reads_filter_by_user_and_order_by_recency() {
    let (app, store) = test_app().await;
    let token = admin_token(&app).await;
    let ledger_before = store.list_balance_actions().await.unwrap().len();
    let alice = register_user(&app, "alice").await["id"].as_i64().unwrap();
    let bob = register_user(&app, "bob").await["id"].as_i64().unwrap();
    let codes = [APPROVAL_CODE; 3];

    for (user_id, amount) in [(alice, "10.00"), (bob, "20.00"), (alice, "30.00")] {
        let (status, _) =
            post_action(&app, &token, action_body(user_id, "credit", amount, codes)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, actions) = request(
        &app,
        "GET",
        &format!("/api/admin/user-balance-actions/{alice}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let actions = actions.as_array().unwrap().clone();
    assert_eq!(actions.len(), 2);
    assert!(actions.iter().all(|a| a["userId"].as_i64() == Some(alice)));
    // Most recent first.
    assert_eq!(actions[0]["amount"], "30.00");
    assert_eq!(actions[1]["amount"], "10.00");

    // The public per-user endpoint returns the same rows without a token.
    let (status, public) = request(
        &app,
        "GET",
        &format!("/api/user/{alice}/balance-actions"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public.as_array().unwrap().len(), 2);

    // The global audit read sees all three new entries.
    let (status, all) =
        request(&app, "GET", "/api/admin/balance-actions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), ledger_before + 3);
}
