//! Tests for the purchase handler.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{
    Error, PurchaseAmount, Transaction, TransactionDraft, TransactionId, UserId,
};
use crate::inbound::http::test_utils::MockPorts;
use crate::inbound::http::validation::json_config;

fn receipt(grams: f64, price: f64, source: PriceSource) -> PurchaseReceipt {
    let transaction = Transaction::try_new(TransactionDraft {
        id: TransactionId::random(),
        user_id: UserId::random(),
        grams_purchased: grams,
        price_per_gram: price,
        price_source: source,
        created_at: Utc
            .with_ymd_and_hms(2025, 8, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    })
    .expect("valid transaction");
    PurchaseReceipt {
        transaction,
        total_grams_owned: grams + 1.0,
    }
}

async fn post_purchase(ports: MockPorts, body: Value) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .app_data(json_config())
            .service(buy_gold),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/buy-gold")
        .set_json(body)
        .to_request();
    actix_test::call_service(&app, request).await
}

#[rstest]
#[actix_web::test]
async fn records_purchase_by_grams() {
    let mut ports = MockPorts::default();
    ports
        .purchases
        .expect_buy()
        .withf(|order: &PurchaseOrder| {
            order.amount == PurchaseAmount::Grams(1.5)
                && order.buyer.email.as_ref() == "asha@example.com"
                && order.quoted_price_per_gram.is_none()
        })
        .times(1)
        .return_once(|_| Ok(receipt(1.5, 6_500.0, PriceSource::Live)));

    let response = post_purchase(
        ports,
        json!({"userName": "Asha Rao", "userEmail": "Asha@Example.com", "grams": 1.5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Purchase of 1.5g gold successful.");
    assert_eq!(body["gramsPurchased"], 1.5);
    assert_eq!(body["pricePerGram"], 6_500.0);
    assert_eq!(body["amountInr"], 9_750.0);
    assert_eq!(body["priceSource"], "live");
    assert_eq!(body["totalGramsOwned"], 2.5);
    assert!(body["transactionId"].as_str().is_some());
}

#[rstest]
#[actix_web::test]
async fn forwards_rupee_amount_and_quoted_price() {
    let mut ports = MockPorts::default();
    ports
        .purchases
        .expect_buy()
        .withf(|order: &PurchaseOrder| {
            order.amount == PurchaseAmount::Rupees(1_000.0)
                && order.quoted_price_per_gram == Some(6_000.0)
        })
        .times(1)
        .return_once(|_| Ok(receipt(0.1667, 6_000.0, PriceSource::Quoted)));

    let response = post_purchase(
        ports,
        json!({
            "userName": "Asha Rao",
            "userEmail": "asha@example.com",
            "amountInr": 1000.0,
            "quotedPriceInrPerGram": 6000.0,
            "nudgeToInvest": true
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["priceSource"], "quoted");
}

#[rstest]
#[case::zero_grams(json!({"userName": "A", "userEmail": "a@b.co", "grams": 0}), "grams", "invalid_amount")]
#[case::negative_grams(json!({"userName": "A", "userEmail": "a@b.co", "grams": -1.0}), "grams", "invalid_amount")]
#[case::small_amount(json!({"userName": "A", "userEmail": "a@b.co", "amountInr": 5}), "amountInr", "invalid_amount")]
#[case::no_amount(json!({"userName": "A", "userEmail": "a@b.co"}), "grams", "missing_field")]
#[case::no_name(json!({"userEmail": "a@b.co", "grams": 1}), "userName", "missing_field")]
#[case::bad_email(json!({"userName": "A", "userEmail": "nope", "grams": 1}), "userEmail", "invalid_email")]
#[case::declined(
    json!({"userName": "A", "userEmail": "a@b.co", "grams": 1, "nudgeToInvest": false}),
    "nudgeToInvest",
    "consent_required"
)]
#[actix_web::test]
async fn rejects_invalid_orders_before_calling_the_service(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports.purchases.expect_buy().never();

    let response = post_purchase(ports, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn declined_consent_reports_the_consent_message() {
    let response = post_purchase(
        MockPorts::default(),
        json!({"userName": "A", "userEmail": "a@b.co", "grams": 1, "nudgeToInvest": false}),
    )
    .await;

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "purchase not allowed without investment consent");
}

#[rstest]
#[actix_web::test]
async fn service_unavailable_passes_through() {
    let mut ports = MockPorts::default();
    ports.purchases.expect_buy().return_once(|_| {
        Err(Error::service_unavailable(
            "failed to fetch live gold price and backup is unavailable",
        ))
    });

    let response = post_purchase(
        ports,
        json!({"userName": "A", "userEmail": "a@b.co", "grams": 1}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
