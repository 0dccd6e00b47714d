use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::api::{state::AppState, types::PredictionResponse, views};
use crate::error::{HealError, Result};
use crate::features::{parse_form_pairs, FeatureVector};
use crate::ml::PredictionSet;

/// POST /predict
///
/// Form measurements in (url-encoded or multipart), per-model labels out.
/// Responds with the results page, or JSON when the client accepts
/// `application/json`.
pub async fn predict(State(state): State<AppState>, request: Request) -> Response {
    let wants_json = accepts_json(request.headers());

    match run_prediction(&state, request).await {
        Ok(predictions) => {
            debug!(models = predictions.len(), "prediction served");
            if wants_json {
                Json(PredictionResponse { predictions }).into_response()
            } else {
                Html(views::render_results(&predictions)).into_response()
            }
        }
        Err(e) => {
            warn!(kind = e.kind(), status = %e.status_code(), "predict failed: {e}");
            e.into_response()
        }
    }
}

async fn run_prediction(state: &AppState, request: Request) -> Result<PredictionSet> {
    let form = read_form(request).await?;
    let features = FeatureVector::from_form(&form)?;
    state.registry.predict(&features)
}

/// Collect the submitted form fields. Bodies of any other type carry none.
async fn read_form(request: Request) -> Result<HashMap<String, String>> {
    let form_encoded = is_form_encoded(request.headers());
    let multipart_body = is_multipart(request.headers());

    if form_encoded {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| HealError::Validation(format!("unreadable form body: {e}")))?;
        return Ok(parse_form_pairs(&body));
    }

    if multipart_body {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| HealError::Validation(format!("bad multipart request: {e}")))?;
        return multipart_fields(multipart).await;
    }

    Ok(HashMap::new())
}

/// Text parts of a multipart body. File uploads are skipped and the first
/// part with a given name wins.
async fn multipart_fields(mut multipart: Multipart) -> Result<HashMap<String, String>> {
    let mut form = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HealError::Validation(format!("bad multipart body: {e}")))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| HealError::Validation(format!("bad multipart field `{name}`: {e}")))?;
        form.entry(name).or_insert(value);
    }
    Ok(form)
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
    header_str(headers, header::CONTENT_TYPE)
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(expected))
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    content_type_is(headers, "application/x-www-form-urlencoded")
}

fn is_multipart(headers: &HeaderMap) -> bool {
    content_type_is(headers, "multipart/form-data")
}

fn accepts_json(headers: &HeaderMap) -> bool {
    header_str(headers, header::ACCEPT)
        .split(',')
        .any(|item| {
            item.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        })
}
