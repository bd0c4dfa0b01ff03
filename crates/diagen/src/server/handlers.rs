//! HTTP handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::core::{DiagramError, DiagramRequest, DiagramResponse, ErrorKind, ErrorResponse};
use crate::orchestrator::DiagramService;

/// Map an error kind onto its HTTP status
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidType | ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::GenerationFailed | ErrorKind::RenderFailed | ErrorKind::Io => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn detail(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { detail })).into_response()
}

impl IntoResponse for DiagramError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        if status.is_server_error() {
            error!(error = %self, "Diagram request failed");
        }
        detail(status, self.to_string())
    }
}

/// POST /generate-diagram
pub async fn generate_diagram(
    State(service): State<DiagramService>,
    payload: Result<Json<DiagramRequest>, JsonRejection>,
) -> Result<Json<DiagramResponse>, Response> {
    let Json(request) = payload.map_err(|rejection| detail(rejection.status(), rejection.body_text()))?;

    let result = service
        .generate(&request)
        .await
        .map_err(IntoResponse::into_response)?;

    info!(
        diagram_type = %result.diagram_type(),
        image_path = ?result.image_path(),
        "Diagram generated"
    );
    Ok(Json(DiagramResponse::from(result)))
}

/// GET /diagram-types
pub async fn diagram_types(State(service): State<DiagramService>) -> Json<Vec<&'static str>> {
    Json(service.supported_types().iter().map(|t| t.id()).collect())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
