//! End-to-end behaviour of `POST /ask-kuber` over degraded upstreams.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use kuber::domain::ports::LanguageModel;
use support::{
    BACKUP_LATEST_PRICE, ExhaustedModel, ScriptedModel, StubPriceSource, app, http_state,
};

async fn ask(
    feed: StubPriceSource,
    model: Arc<dyn LanguageModel>,
    body: Value,
) -> (StatusCode, Value) {
    let (state, _) = http_state(feed, model);
    let service = test::init_service(app(state)).await;
    let request = test::TestRequest::post()
        .uri("/ask-kuber")
        .set_json(body)
        .to_request();
    let response = test::call_service(&service, request).await;
    let status = response.status();
    (status, test::read_body_json(response).await)
}

#[rstest]
#[actix_web::test]
async fn price_question_falls_back_to_backup_when_feed_is_down() {
    let model = Arc::new(ScriptedModel::default());
    let (status, body) = ask(
        StubPriceSource::Down,
        model.clone(),
        json!({ "question": "What is the gold price today?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isGoldQuery"], true);
    assert_eq!(body["intent"], "current_price");
    assert_eq!(body["price"]["source"], "backup");
    assert_eq!(body["price"]["pricePerGram"], BACKUP_LATEST_PRICE);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["answer"], "Gold is steady today.");
    assert_eq!(body["trend"]["thirtyDayPct"], 5.0);
    assert!(body["trend"]["sevenDayPct"].as_f64().expect("seven day trend") > 0.0);
    assert_eq!(model.calls(), 3);
}

#[rstest]
#[actix_web::test]
async fn live_price_answers_without_fallback() {
    let (status, body) = ask(
        StubPriceSource::Live(6_512.347),
        Arc::new(ScriptedModel::default()),
        json!({ "question": "What is the gold price today?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"]["source"], "live");
    assert_eq!(body["price"]["pricePerGram"], 6_512.35);
    assert_eq!(body["fallback"], false);
}

#[rstest]
#[actix_web::test]
async fn exhausted_language_model_still_answers() {
    let (status, body) = ask(
        StubPriceSource::Live(6_500.0),
        Arc::new(ExhaustedModel),
        json!({ "question": "What is the gold price today?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isGoldQuery"], true);
    assert_eq!(body["intent"], "current_price");
    assert_eq!(body["fallback"], true);
    assert!(
        body["answer"]
            .as_str()
            .expect("answer text")
            .contains("unable to fetch live AI insights")
    );
    assert!(body["nudgeText"].as_str().is_some_and(|text| !text.is_empty()));
}

#[rstest]
#[actix_web::test]
async fn off_topic_question_is_politely_declined() {
    let (status, body) = ask(
        StubPriceSource::Live(6_500.0),
        Arc::new(ExhaustedModel),
        json!({ "question": "Which football team won yesterday?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isGoldQuery"], false);
    assert_eq!(
        body["answer"],
        "I can only help you with gold investment queries."
    );
    assert!(body["price"].is_null());
}

#[rstest]
#[case::missing(json!({}), "missing_field")]
#[case::blank(json!({ "question": "  " }), "invalid_question")]
#[actix_web::test]
async fn invalid_questions_are_rejected(#[case] payload: Value, #[case] code: &str) {
    let (status, body) = ask(
        StubPriceSource::Live(6_500.0),
        Arc::new(ScriptedModel::default()),
        payload,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "question");
    assert_eq!(body["details"]["code"], code);
}
