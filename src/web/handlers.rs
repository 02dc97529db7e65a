//! Request handlers

use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use super::{pages, AppState};
use crate::features::PatientRecord;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index() -> Html<String> {
    Html(pages::landing())
}

pub async fn prediction_form() -> Html<String> {
    Html(pages::input_form(&PatientRecord::default()))
}

pub async fn predict(State(state): State<AppState>, request: Request) -> Response {
    let pairs = match form_pairs(request).await {
        Ok(pairs) => pairs,
        Err(message) => return form_error(&message),
    };

    let record = match PatientRecord::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    {
        Ok(record) => record,
        Err(e) => return form_error(&e.to_string()),
    };

    let outcome = state.predictor.predict(&record);
    log::info!("POST /predict -> {}", outcome);
    Html(pages::result(&outcome)).into_response()
}

/// Key/value pairs of a posted form, in body order.
///
/// Urlencoded and multipart bodies are parsed. Any other body, including one
/// without a content type, reads as an empty form.
async fn form_pairs(request: Request) -> Result<Vec<(String, String)>, String> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with(URLENCODED) {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|rejection| rejection.body_text())?;
        Ok(pairs)
    } else if content_type.starts_with(MULTIPART) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| rejection.body_text())?;

        let mut pairs = Vec::new();
        while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
            // uploads are not form values
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(|e| e.body_text())?;
            pairs.push((name, value));
        }
        Ok(pairs)
    } else {
        log::debug!("POST /predict with content type {:?}, using defaults", content_type);
        Ok(Vec::new())
    }
}

fn form_error(message: &str) -> Response {
    log::warn!("Rejected prediction form: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error processing form: {}", message),
    )
        .into_response()
}
