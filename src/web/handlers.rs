//! HTTP request handlers.

use super::pages::{index_page, records_page, Notice};
use super::AppState;
use crate::error::{FaultKind, PredictError, Result};
use crate::health;
use crate::service::{PredictionService, RecordListing, SubmitOutcome};
use crate::types::{Label, RecordId};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Submission payload shared by the HTML form and the JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub features: String,
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Runs a blocking service call off the async executor.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&PredictionService) -> T + Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || f(service.as_ref()))
        .await
        .map_err(|e| PredictError::Internal(format!("worker task failed: {}", e)))
}

// HTML pages

pub async fn show_form() -> Html<String> {
    Html(index_page(None, "", ""))
}

/// A saved submission redirects to the history page, so refreshing it
/// does not post the form again. An unsaved one renders the history with a
/// warning since there is no row to point at.
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Response {
    debug!(user = %form.username.trim(), "Form submission");

    let SubmitForm { username, features } = form.clone();
    let submitted = blocking(&state, move |service| {
        service.submit(&username, &features).map(|outcome| {
            let listing = (!outcome.is_saved()).then(|| service.history());
            (outcome, listing)
        })
    })
    .await
    .and_then(|result| result);

    match submitted {
        Ok((SubmitOutcome::Saved { id, .. }, _)) => {
            Redirect::to(&format!("/records?saved={}", id)).into_response()
        }
        Ok((SubmitOutcome::Unsaved { label, reason }, listing)) => {
            let notice = Notice::Warning(format!(
                "Prediction for {}: {}. The result was NOT saved to the history ({}).",
                form.username.trim(),
                label,
                reason
            ));
            Html(records_page(Some(&notice), &listing.unwrap_or_default())).into_response()
        }
        Err(e) => {
            if e.kind() != FaultKind::Validation {
                error!(error = %e, "Submission failed");
            }
            let notice = Notice::Error(e.to_string());
            (
                status(e.status_code()),
                Html(index_page(Some(&notice), &form.username, &form.features)),
            )
                .into_response()
        }
    }
}

/// `?saved=<id>` names the row a form submission just wrote.
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub saved: Option<RecordId>,
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Response {
    let listing = blocking(&state, |service| service.history())
        .await
        .unwrap_or_else(|e| RecordListing {
            records: Vec::new(),
            error: Some(e.to_string()),
        });

    let notice = query.saved.and_then(|id| {
        listing.records.iter().find(|r| r.id == id).map(|record| {
            Notice::Success(format!(
                "Prediction for {}: {}",
                record.username,
                record.label_name()
            ))
        })
    });
    Html(records_page(notice.as_ref(), &listing)).into_response()
}

// JSON API

#[derive(Debug, Serialize)]
struct PredictionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    label: Label,
    label_name: &'static str,
    saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: FaultKind,
}

fn json_error(e: &PredictError) -> Response {
    (
        status(e.status_code()),
        Json(ErrorBody {
            error: e.to_string(),
            kind: e.kind(),
        }),
    )
        .into_response()
}

pub async fn api_submit(State(state): State<AppState>, Json(form): Json<SubmitForm>) -> Response {
    let submitted = blocking(&state, move |service| {
        service.submit(&form.username, &form.features)
    })
    .await;

    match submitted {
        Ok(Ok(SubmitOutcome::Saved { id, label })) => (
            StatusCode::CREATED,
            Json(PredictionBody {
                id: Some(id),
                label,
                label_name: label.name(),
                saved: true,
                warning: None,
            }),
        )
            .into_response(),
        Ok(Ok(SubmitOutcome::Unsaved { label, reason })) => (
            StatusCode::ACCEPTED,
            Json(PredictionBody {
                id: None,
                label,
                label_name: label.name(),
                saved: false,
                warning: Some(format!("prediction was not saved: {}", reason)),
            }),
        )
            .into_response(),
        Ok(Err(e)) | Err(e) => json_error(&e),
    }
}

pub async fn api_list(State(state): State<AppState>) -> Response {
    let listing = blocking(&state, |service| service.history())
        .await
        .unwrap_or_else(|e| RecordListing {
            records: Vec::new(),
            error: Some(e.to_string()),
        });
    Json(listing).into_response()
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    let start_time = state.start_time;
    match blocking(&state, move |service| health::check_health(service, start_time)).await {
        Ok(report) => (status(report.status.to_status_code()), Json(report)).into_response(),
        Err(e) => json_error(&e),
    }
}
