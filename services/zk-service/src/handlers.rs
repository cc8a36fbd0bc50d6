//! HTTP handlers for the proof service.
//!
//! Proof generation is CPU-heavy and runs on the blocking thread pool;
//! verification is cheap and runs inline on the request path. Protocol
//! outcomes (invalid sessions, rejected proofs) are 200s with data;
//! only malformed material and configuration faults map to error codes.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use vibestream_zk::{GenerationError, VerifyError};

use crate::messages::{GenerateRequest, ProofArtifactJson, StatsResponse, VerifyResponse};
use crate::state::AppState;

type HandlerError = (StatusCode, Json<Value>);

fn error_body(code: &str, detail: impl ToString) -> Json<Value> {
    Json(json!({ "error": code, "detail": detail.to_string() }))
}

fn generation_error(err: &GenerationError) -> HandlerError {
    let (status, code) = match err {
        GenerationError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "malformed-input"),
        GenerationError::UnsatisfiedConstraints => {
            (StatusCode::UNPROCESSABLE_ENTITY, "unsatisfied-constraints")
        }
        GenerationError::ParameterMismatch { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "parameter-mismatch")
        }
        GenerationError::Proving(_) => (StatusCode::INTERNAL_SERVER_ERROR, "proving-failure"),
    };
    (status, error_body(code, err))
}

pub async fn prove(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ProofArtifactJson>, HandlerError> {
    let claim = request.into_claim().map_err(|err| {
        state.stats.record_failure();
        warn!(%err, "prove request rejected");
        generation_error(&err)
    })?;

    let prover = state.prover.clone();
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || prover.generate(&claim))
        .await
        .map_err(|err| {
            state.stats.record_failure();
            error!(%err, "prover worker panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("proving-failure", "prover worker failed"),
            )
        })?;

    match result {
        Ok(artifact) => {
            state.stats.record_generation(started.elapsed());
            Ok(Json(artifact.to_json()))
        }
        Err(err) => {
            state.stats.record_failure();
            warn!(%err, "proof generation failed");
            Err(generation_error(&err))
        }
    }
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProofArtifactJson>,
) -> Result<Json<VerifyResponse>, HandlerError> {
    let started = Instant::now();
    match state.verifier.verify_json(&request) {
        Ok(verdict) => {
            state.stats.record_verification(started.elapsed());
            Ok(Json(VerifyResponse {
                valid: verdict.is_accepted(),
                diagnostic: verdict.diagnostic_code().map(str::to_string),
            }))
        }
        Err(err @ VerifyError::MalformedProof(_)) => {
            state.stats.record_failure();
            warn!(%err, "verify request rejected");
            Err((StatusCode::BAD_REQUEST, error_body("malformed-proof", err)))
        }
        Err(err @ VerifyError::ParameterMismatch { .. }) => {
            state.stats.record_failure();
            error!(%err, "verifier misconfigured");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("parameter-mismatch", err),
            ))
        }
    }
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(state.stats.snapshot())
}
