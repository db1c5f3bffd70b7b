use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use marketplace_backoffice::api::rest::router;
use marketplace_backoffice::state::AppState;
use marketplace_backoffice::store::Store;
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory(1024));
    (router(state.clone()), state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn create_user(app: &axum::Router, name: &str, role: &str) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            json!({
                "display_name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "role": role
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["id"].as_str().unwrap().to_string()
}

async fn create_order(app: &axum::Router, buyer_id: &str) -> Value {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "buyer_id": buyer_id,
                "items": [
                    { "product_id": "11111111-1111-1111-1111-111111111111", "name": "Desk Lamp", "quantity": 2, "price": 12.5 },
                    { "product_id": "22222222-2222-2222-2222-222222222222", "name": "Bulb", "quantity": 1, "price": 3.0 }
                ],
                "shipping_address": { "street": "1 Market St", "city": "Accra" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["orders"], 0);
    assert_eq!(body["profiles"], 0);
    assert_eq!(body["vendor_applications"], 0);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("ws_clients"));
}

#[tokio::test]
async fn create_order_computes_total_and_starts_pending() {
    let (app, _state) = setup();
    let buyer = create_user(&app, "Ama", "buyer").await;
    let order = create_order(&app, &buyer).await;

    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], 28.0);
    assert!(order["driver_id"].is_null());
}

#[tokio::test]
async fn create_order_without_items_returns_400() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({ "buyer_id": "00000000-0000-0000-0000-000000000001", "items": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_nonexistent_order_returns_404() {
    let (app, _state) = setup();
    let fake_id = "00000000-0000-0000-0000-000000000000";
    let response = app
        .oneshot(get_request(&format!("/orders/{fake_id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_update_changes_only_status() {
    let (app, _state) = setup();
    let buyer = create_user(&app, "Kofi", "buyer").await;
    let order = create_order(&app, &buyer).await;
    let order_id = order["id"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/status"),
            json!({ "status": "delivered" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;

    assert_eq!(updated["status"], "delivered");
    assert_eq!(updated["id"], order["id"]);
    assert_eq!(updated["items"], order["items"]);
    assert_eq!(updated["total"], order["total"]);
    assert_eq!(updated["shipping_address"], order["shipping_address"]);

    // Moving back out of a terminal status is allowed.
    let res = app
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/status"),
            json!({ "status": "pending" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "pending");
}

#[tokio::test]
async fn status_update_notifies_buyer_in_background() {
    let (app, state) = setup();
    let buyer = create_user(&app, "Esi", "buyer").await;
    let order = create_order(&app, &buyer).await;
    let order_id = order["id"].as_str().unwrap();

    let mut events = state.notifier.subscribe();

    let res = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/status"),
            json!({ "status": "shipped" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let notification = tokio::time::timeout(std::time::Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notification.user_id.to_string(), buyer);
    assert!(notification.title.contains("shipped"));

    let res = app
        .oneshot(get_request(&format!("/notifications?user_id={buyer}")))
        .await
        .unwrap();
    let list = body_json(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let (app, _state) = setup();
    let buyer = create_user(&app, "Yaw", "buyer").await;
    let order = create_order(&app, &buyer).await;
    let order_id = order["id"].as_str().unwrap();

    let res = app
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/status"),
            json!({ "status": "teleported" }),
        ))
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn list_orders_filters_by_status() {
    let (app, _state) = setup();
    let buyer = create_user(&app, "Abena", "buyer").await;
    let first = create_order(&app, &buyer).await;
    create_order(&app, &buyer).await;

    let first_id = first["id"].as_str().unwrap();
    app.clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{first_id}/status"),
            json!({ "status": "cancelled" }),
        ))
        .await
        .unwrap();

    let res = app
        .oneshot(get_request("/orders?status=cancelled"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list = body_json(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], first["id"]);
}

#[tokio::test]
async fn driver_assignment_requires_driver_role() {
    let (app, _state) = setup();
    let buyer = create_user(&app, "Kwame", "buyer").await;
    let driver = create_user(&app, "Dede", "driver").await;
    let order = create_order(&app, &buyer).await;
    let order_id = order["id"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/driver"),
            json!({ "driver_id": buyer }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request(
            "PATCH",
            &format!("/orders/{order_id}/driver"),
            json!({ "driver_id": driver }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["driver_id"], driver);
}

#[tokio::test]
async fn vendor_application_approval_flow() {
    let (app, _state) = setup();
    let user = create_user(&app, "Nana", "buyer").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/vendor-applications",
            json!({
                "user_id": user,
                "business_name": "Nana's Kente",
                "business_email": "shop@kente.test"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let application = body_json(res).await;
    assert_eq!(application["status"], "pending");
    let application_id = application["id"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/vendor-applications/{application_id}/approve"),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let report = body_json(res).await;
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["step"], "application_status");
    assert!(steps.iter().all(|step| step["ok"] == true));

    let res = app
        .clone()
        .oneshot(get_request(&format!("/users/{user}")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["role"], "vendor");

    let res = app.clone().oneshot(get_request("/vendors")).await.unwrap();
    let vendors = body_json(res).await;
    assert_eq!(vendors[0]["status"], "approved");

    let res = app
        .oneshot(get_request("/vendor-applications?status=approved"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn approving_for_missing_profile_reports_failed_role_step() {
    let (app, _state) = setup();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/vendor-applications",
            json!({
                "user_id": "00000000-0000-0000-0000-0000000000aa",
                "business_name": "Ghost Goods",
                "business_email": "ghost@goods.test"
            }),
        ))
        .await
        .unwrap();
    let application_id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(empty_request(
            "POST",
            &format!("/vendor-applications/{application_id}/approve"),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let report = body_json(res).await;
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[2]["step"], "user_role");
    assert_eq!(steps[2]["ok"], false);
    assert_eq!(steps[3]["ok"], true);
}

#[tokio::test]
async fn reject_application_requires_reason() {
    let (app, _state) = setup();
    let user = create_user(&app, "Akua", "buyer").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/vendor-applications",
            json!({
                "user_id": user,
                "business_name": "Akua Beads",
                "business_email": "akua@beads.test"
            }),
        ))
        .await
        .unwrap();
    let application_id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/vendor-applications/{application_id}/reject"),
            json!({ "reason": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/vendor-applications/{application_id}/reject"),
            json!({ "reason": "incomplete documents" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "incomplete documents");
}

#[tokio::test]
async fn wallet_credit_and_debit() {
    let (app, _state) = setup();
    let user = create_user(&app, "Kojo", "buyer").await;

    let res = app
        .clone()
        .oneshot(get_request(&format!("/wallets/{user}")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["balance"], 0.0);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/wallets/{user}/adjustments"),
            json!({ "direction": "credit", "amount": 50, "reason": "goodwill" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["balance"], 50.0);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/wallets/{user}/adjustments"),
            json!({ "direction": "debit", "amount": 80 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["balance"], -30.0);

    let res = app
        .oneshot(get_request(&format!("/wallets/{user}/logs")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn notification_without_user_id_writes_nothing() {
    let (app, state) = setup();

    let res = app
        .oneshot(json_request(
            "POST",
            "/notifications",
            json!({ "title": "Hello", "message": "World", "email": "x@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let outcome = body_json(res).await;
    assert_eq!(outcome["db"], false);
    assert_eq!(outcome["email"], false);
    assert_eq!(outcome["error"], "missing user id");

    let counts = state.store.table_counts().await.unwrap();
    assert_eq!(counts.notifications, 0);
}

#[tokio::test]
async fn notification_reports_partial_success_when_email_disabled() {
    let (app, _state) = setup();
    let user = create_user(&app, "Efua", "buyer").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/notifications",
            json!({
                "user_id": user,
                "title": "Welcome",
                "message": "Thanks for joining",
                "type": "system",
                "email": "efua@example.com"
            }),
        ))
        .await
        .unwrap();
    let outcome = body_json(res).await;
    assert_eq!(outcome["db"], true);
    assert_eq!(outcome["email"], false);
    assert!(outcome["error"].as_str().unwrap().contains("disabled"));

    let res = app
        .clone()
        .oneshot(get_request(&format!("/notifications?user_id={user}")))
        .await
        .unwrap();
    let list = body_json(res).await;
    let id = list[0]["id"].as_str().unwrap().to_string();
    assert_eq!(list[0]["read"], false);

    let res = app
        .oneshot(empty_request("PATCH", &format!("/notifications/{id}/read")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["read"], true);
}

#[tokio::test]
async fn coupon_and_cart_quote() {
    let (app, _state) = setup();

    let res = app
        .clone()
        .oneshot(get_request("/coupons/code"))
        .await
        .unwrap();
    let code = body_json(res).await["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/coupons",
            json!({ "code": "half50", "discount_type": "percentage", "value": 50 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["code"], "HALF50");

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cart/quote",
            json!({
                "items": [
                    { "product_id": "11111111-1111-1111-1111-111111111111", "name": "Rug", "quantity": 1, "price": 80 }
                ],
                "coupon_code": "HALF50"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let quote = body_json(res).await;
    assert_eq!(quote["subtotal"], 80.0);
    assert_eq!(quote["discount"], 40.0);
    assert_eq!(quote["total"], 40.0);

    let res = app
        .oneshot(json_request(
            "POST",
            "/cart/quote",
            json!({ "items": [], "coupon_code": "NOPE0000" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_moderation_and_rating() {
    let (app, _state) = setup();
    let product = "33333333-3333-3333-3333-333333333333";

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/reviews",
            json!({
                "product_id": product,
                "user_id": "44444444-4444-4444-4444-444444444444",
                "rating": 4,
                "comment": "Sturdy"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let review_id = body_json(res).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/reviews/{review_id}/status"),
            json!({ "status": "approved" }),
        ))
        .await
        .unwrap();

    let res = app
        .clone()
        .oneshot(get_request(&format!("/products/{product}/rating")))
        .await
        .unwrap();
    let rating = body_json(res).await;
    assert_eq!(rating["count"], 1);
    assert_eq!(rating["average"], 4.0);

    let res = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/reviews/{review_id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .oneshot(empty_request("DELETE", &format!("/reviews/{review_id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payout_approval_flow() {
    let (app, _state) = setup();
    let vendor = create_user(&app, "Adjoa", "vendor").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payouts",
            json!({ "vendor_id": vendor, "amount": 120.5, "method": "mobile_money" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let payout_id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(empty_request("POST", &format!("/payouts/{payout_id}/approve")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["status"], "approved");

    let res = app
        .clone()
        .oneshot(empty_request("POST", &format!("/payouts/{payout_id}/paid")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["status"], "paid");

    let res = app
        .oneshot(get_request("/payouts?status=paid"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn banning_a_user() {
    let (app, _state) = setup();
    let user = create_user(&app, "Mensah", "buyer").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{user}/restrictions"),
            json!({ "banned": true }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["banned"], true);
    assert_eq!(body["restricted"], false);

    let res = app
        .oneshot(get_request("/users?banned=true"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}
