use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::service::{ClientSubmission, DeskError, DeskService, QuoteInput};
use crate::lending::{
    CapacityAssessment, DeductionRegion, ExcludedLender, Lender, LenderOffer, LoanRequest,
    QuoteSheet,
};
use crate::pricing::{PriceEstimate, PriceLookup};
use crate::registry::{RegistrySummarizer, RegistrySummary};

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub input: QuoteInput,
    /// Also return lenders whose new cash did not clear zero.
    #[serde(default)]
    pub include_excluded: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub request: LoanRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_estimate: Option<PriceEstimate>,
    pub offers: Vec<LenderOffer>,
    pub sheet: QuoteSheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<ExcludedLender>>,
}

#[derive(Debug, Deserialize)]
pub struct RegistrySummaryRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrySummaryResponse {
    #[serde(flatten)]
    pub summary: RegistrySummary,
    pub total_lien_exposure: u128,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub address: String,
}

/// Router for quoting and the admin tables.
pub fn desk_router<P, S>(service: Arc<DeskService<P, S>>) -> Router
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    Router::new()
        .route("/api/v1/quotes", post(quote_handler::<P, S>))
        .route("/api/v1/registry/summary", post(registry_handler::<P, S>))
        .route(
            "/api/v1/registry/document",
            post(registry_document_handler::<P, S>),
        )
        .route("/api/v1/kb-price", get(price_handler::<P, S>))
        .route(
            "/api/v1/admin/lenders",
            get(list_lenders_handler::<P, S>).put(replace_lenders_handler::<P, S>),
        )
        .route(
            "/api/v1/admin/regions",
            get(list_regions_handler::<P, S>).put(replace_regions_handler::<P, S>),
        )
        .route(
            "/api/v1/admin/clients",
            get(list_clients_handler::<P, S>).post(register_client_handler::<P, S>),
        )
        .with_state(service)
}

pub(crate) async fn quote_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Json(payload): Json<QuoteRequest>,
) -> Response
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    let QuoteRequest {
        input,
        include_excluded,
    } = payload;

    match service.quote(input) {
        Ok(quote) => {
            let CapacityAssessment { offers, excluded } = quote.assessment.clone();
            let sheet = QuoteSheet::new(&quote.request, &quote.assessment);
            let response = QuoteResponse {
                request: quote.request,
                price_estimate: quote.price_estimate,
                offers,
                sheet,
                excluded: include_excluded.then_some(excluded),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn registry_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Json(payload): Json<RegistrySummaryRequest>,
) -> Json<RegistrySummaryResponse>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    let summary = service.summarize_text(&payload.text);
    let total_lien_exposure = summary.total_lien_exposure();
    Json(RegistrySummaryResponse {
        summary,
        total_lien_exposure,
    })
}

/// Accepts the raw document body; pages are split on form feeds.
pub(crate) async fn registry_document_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    body: Bytes,
) -> Json<RegistrySummaryResponse>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    let summary = service.summarize_document(&body);
    let total_lien_exposure = summary.total_lien_exposure();
    Json(RegistrySummaryResponse {
        summary,
        total_lien_exposure,
    })
}

pub(crate) async fn price_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Query(query): Query<PriceQuery>,
) -> Json<PriceEstimate>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    Json(service.lookup_price(&query.address))
}

pub(crate) async fn list_lenders_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
) -> Json<Vec<Lender>>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    Json(service.lenders())
}

pub(crate) async fn replace_lenders_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Json(lenders): Json<Vec<Lender>>,
) -> Response
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    match service.replace_lenders(lenders) {
        Ok(table) => (StatusCode::OK, Json(table.lenders().to_vec())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_regions_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
) -> Json<Vec<DeductionRegion>>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    Json(service.regions())
}

pub(crate) async fn replace_regions_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Json(regions): Json<Vec<DeductionRegion>>,
) -> Response
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    match service.replace_regions(regions) {
        Ok(table) => (StatusCode::OK, Json(table.regions().to_vec())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_clients_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
) -> Response
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    match service.clients() {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_client_handler<P, S>(
    State(service): State<Arc<DeskService<P, S>>>,
    Json(submission): Json<ClientSubmission>,
) -> Response
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    let today = Local::now().date_naive();
    match service.register_client(submission, today) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DeskError) -> Response {
    let status = if err.is_invalid_input() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        tracing::error!(error = %err, "admin table operation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
