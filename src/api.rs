//! HTTP surface for the student service.
//!
//! - `POST /students` – Validate and store a new student; returns the record with its `id`.
//! - `GET /students` – List every stored student (order is unspecified).
//! - `GET /students/{id}` – Fetch one student.
//! - `PUT /students/{id}` – Overwrite `name`, `age` and `email` of an existing student.
//! - `DELETE /students/{id}` – Remove a student.
//! - `GET /students/{id}/summary` – Ask the model runner for a profile summary.
//! - `GET /metrics` – Request counters and the current record count.
//! - `GET /commands` – Machine-readable catalog of the endpoints above.
//!
//! Failures are reported by status code with a short plain-text body.

use crate::metrics::{MetricsSnapshot, ServiceMetrics};
use crate::students::{
    StoreError, Student, StudentInput, StudentStore, ValidationError, types::StudentId, validate,
};
use crate::summary::{SummaryError, SummaryGenerator, sanitize};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Shared handler state: the record store, the summary backend, and counters.
pub struct AppState<G> {
    store: Arc<StudentStore>,
    generator: Arc<G>,
    metrics: ServiceMetrics,
}

impl<G> AppState<G> {
    /// Bundle a store and summary generator for the router.
    pub fn new(store: Arc<StudentStore>, generator: Arc<G>) -> Self {
        Self {
            store,
            generator,
            metrics: ServiceMetrics::new(),
        }
    }
}

/// Build the HTTP router exposing the student API surface.
pub fn create_router<G>(store: Arc<StudentStore>, generator: Arc<G>) -> Router
where
    G: SummaryGenerator + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<G>).post(create_student::<G>),
        )
        .route(
            "/students/:id",
            get(get_student::<G>)
                .put(update_student::<G>)
                .delete(delete_student::<G>),
        )
        .route("/students/:id/summary", get(get_summary::<G>))
        .route("/metrics", get(get_metrics::<G>))
        .route("/commands", get(get_commands))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState::new(store, generator)))
}

type SharedState<G> = State<Arc<AppState<G>>>;

/// Create a student from a JSON body.
async fn create_student<G>(
    State(state): SharedState<G>,
    body: Bytes,
) -> Result<Json<Student>, ApiError>
where
    G: SummaryGenerator,
{
    let input = parse_input(&body)?;
    let student = state.store.create(input);
    state.metrics.record_created();
    tracing::info!(student_id = student.id, "Student created");
    Ok(Json(student))
}

async fn list_students<G>(State(state): SharedState<G>) -> Json<Vec<Student>>
where
    G: SummaryGenerator,
{
    Json(state.store.get_all())
}

async fn get_student<G>(
    State(state): SharedState<G>,
    Path(raw_id): Path<String>,
) -> Result<Json<Student>, ApiError>
where
    G: SummaryGenerator,
{
    let id = parse_id(&raw_id)?;
    Ok(Json(state.store.get_by_id(id)?))
}

/// Overwrite a student's mutable fields.
///
/// The body is decoded and validated before the id is looked up, so an invalid body is a 400
/// even for an unknown id.
async fn update_student<G>(
    State(state): SharedState<G>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Student>, ApiError>
where
    G: SummaryGenerator,
{
    let id = parse_id(&raw_id)?;
    let input = parse_input(&body)?;
    let student = state.store.update(id, input)?;
    state.metrics.record_updated();
    tracing::info!(student_id = id, "Student updated");
    Ok(Json(student))
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn delete_student<G>(
    State(state): SharedState<G>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError>
where
    G: SummaryGenerator,
{
    let id = parse_id(&raw_id)?;
    state.store.delete(id)?;
    state.metrics.record_deleted();
    tracing::info!(student_id = id, "Student deleted");
    Ok(Json(MessageResponse {
        message: "Student deleted successfully",
    }))
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Generate a profile summary for an existing student.
///
/// The runner call blocks only this request; its output is sanitized before it is returned.
async fn get_summary<G>(
    State(state): SharedState<G>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    G: SummaryGenerator,
{
    let id = parse_id(&raw_id)?;
    let student = state.store.get_by_id(id)?;
    let outcome = state.generator.generate(&student).await;
    state.metrics.record_summary(outcome.is_ok());
    let summary = outcome.map_err(|error| {
        match &error {
            SummaryError::Failed { output, .. } => {
                tracing::error!(student_id = id, %error, output = %output, "Model runner failed");
            }
            _ if error.is_external_process_failure() => {
                tracing::error!(student_id = id, %error, "Model runner failed");
            }
            _ => tracing::warn!(student_id = id, %error, "Model runner returned no summary"),
        }
        ApiError::Summary(error)
    })?;
    Ok(Json(SummaryResponse {
        summary: sanitize(&summary),
    }))
}

async fn get_metrics<G>(State(state): SharedState<G>) -> Json<MetricsSnapshot>
where
    G: SummaryGenerator,
{
    Json(state.metrics.snapshot(state.store.len()))
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by clients and tools.
async fn get_commands() -> Json<CommandsResponse> {
    let student_example = json!({
        "name": "Ana",
        "age": 20,
        "email": "ana@x.com"
    });
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "create_student",
                method: "POST",
                path: "/students",
                description: "Validate and store a student. Returns the stored record including its assigned id.",
                request_example: Some(student_example.clone()),
            },
            CommandDescriptor {
                name: "list_students",
                method: "GET",
                path: "/students",
                description: "Return every stored student in no particular order.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_student",
                method: "GET",
                path: "/students/{id}",
                description: "Return a single student by id.",
                request_example: None,
            },
            CommandDescriptor {
                name: "update_student",
                method: "PUT",
                path: "/students/{id}",
                description: "Overwrite name, age and email of an existing student. Any id in the body is ignored.",
                request_example: Some(student_example),
            },
            CommandDescriptor {
                name: "delete_student",
                method: "DELETE",
                path: "/students/{id}",
                description: "Remove a student. Ids are never reused.",
                request_example: None,
            },
            CommandDescriptor {
                name: "student_summary",
                method: "GET",
                path: "/students/{id}/summary",
                description: "Generate a free-text profile summary with the local model runner. Response returns { \"summary\": string }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters and the number of stored students.",
                request_example: None,
            },
        ],
    })
}

fn parse_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

fn parse_input(body: &[u8]) -> Result<StudentInput, ApiError> {
    let input: StudentInput = serde_json::from_slice(body).map_err(ApiError::Decode)?;
    validate(&input).map_err(|error| {
        tracing::debug!(%error, "Rejected student payload");
        ApiError::Validation(error)
    })?;
    Ok(input)
}

/// Handler-boundary failures, each mapped to a status code and plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path identifier was not an integer.
    #[error("Invalid ID format")]
    InvalidId,
    /// Request body was not a decodable student object.
    #[error("Invalid input")]
    Decode(#[source] serde_json::Error),
    /// Request body failed field validation.
    #[error("Invalid input")]
    Validation(#[source] ValidationError),
    /// No student with the requested id.
    #[error("Student not found")]
    NotFound(#[from] StoreError),
    /// Summary generation failed.
    #[error("Failed to generate summary")]
    Summary(#[source] SummaryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::Decode(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Summary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
