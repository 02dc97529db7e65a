use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use thyroid::features::FeatureVector;
use thyroid::model::{Classifier, SharedClassifier};
use thyroid::predict::Predictor;
use thyroid::web::{router, AppState};
use thyroid::{Result, ThyroidError};

struct Fixed(u8);

impl Classifier for Fixed {
    fn predict(&self, _features: &FeatureVector) -> Result<u8> {
        Ok(self.0)
    }
}

/// Remembers the last vector it was asked about
#[derive(Default)]
struct Recording {
    seen: Mutex<Option<Vec<i64>>>,
}

impl Classifier for Recording {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        *self.seen.lock().unwrap() = Some(features.as_slice().to_vec());
        Ok(0)
    }
}

struct Failing;

impl Classifier for Failing {
    fn predict(&self, _features: &FeatureVector) -> Result<u8> {
        Err(ThyroidError::Prediction("input has 38 features, expected 40".to_string()))
    }
}

fn app(classifier: SharedClassifier) -> Router {
    app_with_static(classifier, "static")
}

fn app_with_static(classifier: SharedClassifier, static_dir: &str) -> Router {
    router(
        AppState {
            predictor: Predictor::new(classifier),
        },
        static_dir,
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn landing_page_accepts_get_and_post() {
    let (status, body) = send(app(None), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/predict"));

    let (status, _) = send(app(None), post_form("/", "")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_check() {
    let (status, body) = send(app(None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn form_lists_every_field() {
    let (status, body) = send(app(None), get("/predict")).await;
    assert_eq!(status, StatusCode::OK);
    for name in [
        "age",
        "gender",
        "smoking",
        "hx_smoking",
        "hx_radiotherapy",
        "thyroid_function",
        "physical_examination",
        "Adenopathy",
        "Pathology",
        "Focality",
        "risk",
        "T",
        "N",
        "M",
        "Stage",
        "Response",
    ] {
        assert!(body.contains(&format!("name=\"{}\"", name)), "missing {}", name);
    }
}

#[tokio::test]
async fn model_not_loaded_degrades_and_keeps_serving() {
    let app = app(None);

    let (status, body) = send(app.clone(), post_form("/predict", "age=50&risk=High")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Model not loaded"));

    let (status, body) = send(app.clone(), post_form("/predict", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Model not loaded"));

    let (status, _) = send(app, get("/predict")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn classifier_output_maps_to_label() {
    let (_, body) = send(app(Some(Arc::new(Fixed(1)))), post_form("/predict", "age=61")).await;
    assert!(body.contains("<strong>Yes</strong>"));

    let (_, body) = send(app(Some(Arc::new(Fixed(0)))), post_form("/predict", "age=61")).await;
    assert!(body.contains("<strong>No</strong>"));
}

#[tokio::test]
async fn classifier_error_is_shown_on_result_page() {
    let (status, body) = send(app(Some(Arc::new(Failing))), post_form("/predict", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Prediction error: input has 38 features, expected 40"));
}

#[tokio::test]
async fn bad_age_is_a_server_error() {
    let (status, body) = send(app(None), post_form("/predict", "age=abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error processing form:"));
    assert!(body.contains("age"));

    let (status, _) = send(app(None), post_form("/predict", "age=")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

const MULTIPART_BOUNDARY: &str = "thyroid-form-boundary";

fn post_multipart(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{MULTIPART_BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn post_without_content_type_uses_defaults() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Model not loaded"));

    let recording = Arc::new(Recording::default());
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"age": 80}"#))
        .unwrap();
    let (status, _) = send(app(Some(recording.clone())), request).await;
    assert_eq!(status, StatusCode::OK);

    let seen = recording.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen[37], 34);
}

#[tokio::test]
async fn multipart_form_is_accepted() {
    let request = post_multipart("/predict", &[("age", "50")]);
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Model not loaded"));

    let recording = Arc::new(Recording::default());
    let request = post_multipart("/predict", &[("age", "50"), ("M", "M1"), ("M", "M0")]);
    let (status, _) = send(app(Some(recording.clone())), request).await;
    assert_eq!(status, StatusCode::OK);

    let seen = recording.seen.lock().unwrap().clone().unwrap();
    assert_eq!(&seen[36..], &[1, 50]);
}

#[tokio::test]
async fn multipart_bad_age_is_a_server_error() {
    let request = post_multipart("/predict", &[("age", "fifty")]);
    let (status, body) = send(app(None), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error processing form:"));
}

#[tokio::test]
async fn empty_form_encodes_defaults() {
    let recording = Arc::new(Recording::default());
    let (status, _) = send(app(Some(recording.clone())), post_form("/predict", "")).await;
    assert_eq!(status, StatusCode::OK);

    let seen = recording.seen.lock().unwrap().clone().unwrap();
    assert_eq!(
        seen,
        vec![
            1, 0, 1, 0, 1, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0, 0,
            0, 0, 0, 1, 3, 1, 0, 0, 0, 34
        ]
    );
}

#[tokio::test]
async fn posted_fields_reach_the_classifier() {
    let recording = Arc::new(Recording::default());
    let body = "age=72&gender=M&hx_radiothreapy=Yes&thyroid_function=Clinical+Hypothyroidism\
                &Stage=4a&Adenopathy=Bilateral&T=T4a&N=N1a&M=M1";
    send(app(Some(recording.clone())), post_form("/predict", body)).await;

    let seen = recording.seen.lock().unwrap().clone().unwrap();
    assert_eq!(&seen[0..2], &[0, 1]); // gender
    assert_eq!(&seen[6..8], &[0, 1]); // hx_radiotherapy via legacy key
    assert_eq!(&seen[8..12], &[1, 0, 0, 0]); // thyroid_function
    assert_eq!(&seen[24..28], &[0, 0, 0, 1]); // Stage 4a
    assert_eq!(&seen[32..], &[0, 1, 5, 1, 1, 72]);
}

#[tokio::test]
async fn static_assets_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), "body { margin: 0; }").unwrap();

    let app = app_with_static(None, dir.path().to_str().unwrap());
    let (status, body) = send(app.clone(), get("/static/style.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("margin"));

    let (status, _) = send(app, get("/static/missing.css")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
