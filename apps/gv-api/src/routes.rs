use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use gv_domain::curated_genes;
use gv_service::{Error, QueryRequest, QueryResult};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	pub version: String,
	pub phenotypes_indexed: u64,
	pub curated_genes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneSummary {
	pub gene_symbol: String,
	pub gene_name: String,
	pub description: String,
	pub traits: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenesResponse {
	pub genes: Vec<GeneSummary>,
	pub total: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => {
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message, None)
			},
			Error::Search { message } => {
				ApiError::new(StatusCode::BAD_GATEWAY, "search_failed", message, None)
			},
			Error::Storage { message } => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message, None)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/genes", get(genes))
		.route("/v1/query", post(query))
		.with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
	let phenotypes_indexed = state.service.phenotypes_indexed().await.map_err(|err| {
		tracing::warn!(error = %err, "Phenotype index is unavailable.");

		ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "index_unavailable", err.to_string(), None)
	})?;

	Ok(Json(HealthResponse {
		status: "healthy".to_string(),
		version: gv_cli::VERSION.to_string(),
		phenotypes_indexed,
		curated_genes: curated_genes().len(),
	}))
}

async fn genes() -> Json<GenesResponse> {
	let genes: Vec<GeneSummary> = curated_genes()
		.iter()
		.map(|gene| GeneSummary {
			gene_symbol: gene.symbol.to_string(),
			gene_name: gene.name.to_string(),
			description: gene.description.to_string(),
			traits: gene.traits.iter().map(|t| t.to_string()).collect(),
		})
		.collect();

	Json(GenesResponse { total: genes.len(), genes })
}

async fn query(
	State(state): State<AppState>,
	payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResult>, ApiError> {
	let Json(payload) = payload?;
	let fields = invalid_fields(&payload, &state.service.cfg.query);
	let response = state.service.query(payload).await.map_err(|err| {
		let mut api_err = ApiError::from(err);

		if api_err.status == StatusCode::BAD_REQUEST && !fields.is_empty() {
			api_err.fields = Some(fields);
		}

		api_err
	})?;

	Ok(Json(response))
}

fn invalid_fields(payload: &QueryRequest, query: &gv_config::Query) -> Vec<String> {
	let mut fields = Vec::new();

	if payload.prompt.trim().is_empty() {
		fields.push("prompt".to_string());
	}
	if payload.top_k.is_some_and(|top_k| top_k == 0 || top_k > query.max_top_k) {
		fields.push("top_k".to_string());
	}

	fields
}
