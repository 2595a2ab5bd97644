use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bitman_core::Settings;

use crate::integration::common::{
    BAD_GEMINI_KEY, MISSING_MODEL, ProviderStub, TEST_API_KEY, setup_test_app,
    setup_test_app_with_env,
};

const SELECTION: &str = "Capital of France?\nA) Paris\nB) London\nC) Berlin";

fn ask_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/v1/ask")
        .header("authorization", format!("Bearer {TEST_API_KEY}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(&Settings::default());

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = setup_test_app(&Settings::default());

    let response = app
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/v1/ask"]["post"].is_object());
}

#[tokio::test]
async fn unauthenticated_request_returns_401() {
    let app = setup_test_app(&Settings::default());

    let response = app
        .router
        .oneshot(
            Request::post("/v1/ask")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"rawSelection":"A) x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_api_key_returns_401() {
    let app = setup_test_app(&Settings::default());

    let response = app
        .router
        .oneshot(
            Request::post("/v1/ask")
                .header("authorization", "Bearer wrong-key")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"rawSelection":"A) x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn no_keys_returns_not_configured_without_provider_calls() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app(&stub.settings());

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({
            "question": "Capital of France?",
            "rawSelection": SELECTION
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "not_configured");
    assert_eq!(json["message"], "Add at least one API key in Options.");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn both_providers_answer_with_normalized_options() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app(&Settings {
        openai_key: "sk-test".into(),
        gemini_key: "AIza-test".into(),
        ..stub.settings()
    });

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({
            "question": "Capital of France?",
            "rawSelection": SELECTION
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["options"],
        serde_json::json!(["Paris", "London", "Berlin"])
    );
    assert_eq!(json["openaiAnswer"]["status"], "answered");
    assert_eq!(json["openaiAnswer"]["answer"], "London");
    assert_eq!(json["geminiAnswer"]["answer"], "Paris");
    assert_eq!(json["geminiAnswer"]["text"], "Paris");

    let mut calls = stub.calls();
    calls.sort();
    assert_eq!(calls, vec!["gemini:gemini-1.5-flash", "openai:gpt-4o-mini"]);
}

#[tokio::test]
async fn openai_falls_back_after_missing_model() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app(&Settings {
        openai_key: "sk-test".into(),
        model_openai: MISSING_MODEL.into(),
        ..stub.settings()
    });

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({ "rawSelection": SELECTION })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["openaiAnswer"]["answer"], "London");
    assert!(json["geminiAnswer"].is_null());
    assert_eq!(
        stub.calls(),
        vec![format!("openai:{MISSING_MODEL}"), "openai:gpt-4o-mini".to_string()]
    );
}

#[tokio::test]
async fn gemini_error_is_reported_in_its_field() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app(&Settings {
        openai_key: "sk-test".into(),
        gemini_key: BAD_GEMINI_KEY.into(),
        ..stub.settings()
    });

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({
            "question": "Capital of France?",
            "rawSelection": SELECTION
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["openaiAnswer"]["answer"], "London");
    assert_eq!(json["geminiAnswer"]["status"], "failed");
    assert_eq!(json["geminiAnswer"]["kind"], "provider");
    assert_eq!(json["geminiAnswer"]["text"], "Error: Gemini API error");
}

#[tokio::test]
async fn settings_file_is_reread_per_request() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app(&stub.settings());

    let response = app
        .router
        .clone()
        .oneshot(ask_request(serde_json::json!({ "rawSelection": SELECTION })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Settings {
        gemini_key: "AIza-test".into(),
        ..stub.settings()
    }
    .save(&app.settings_path)
    .unwrap();

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({ "rawSelection": SELECTION })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["geminiAnswer"]["answer"], "Paris");
}

fn gemini_key_env(key: &str) -> Option<String> {
    (key == "BITMAN_GEMINI_KEY").then(|| "AIza-env".to_string())
}

#[tokio::test]
async fn environment_overrides_come_from_the_state_lookup() {
    let stub = ProviderStub::spawn().await;
    let app = setup_test_app_with_env(&stub.settings(), gemini_key_env);

    let response = app
        .router
        .clone()
        .oneshot(ask_request(serde_json::json!({ "rawSelection": SELECTION })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["openaiAnswer"].is_null());
    assert_eq!(json["geminiAnswer"]["answer"], "Paris");

    // The shared transport serves later asks too.
    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({ "rawSelection": SELECTION })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stub.calls().len(), 2);
}

#[tokio::test]
async fn empty_question_is_rejected() {
    let app = setup_test_app(&Settings::default());

    let response = app
        .router
        .oneshot(ask_request(serde_json::json!({
            "question": "   ",
            "rawSelection": "  \n "
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "validation_error");
}
