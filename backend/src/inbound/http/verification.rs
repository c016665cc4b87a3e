//! Licence verification and audit log handlers.
//!
//! ```text
//! POST /api/v1/verification/verify {"licenseId":"DL-100","scannedQrData":"..."}
//! GET /api/v1/verification/status/DL-100
//! GET /api/v1/verification/logs?startDate=2025-01-01&endDate=2025-01-31
//! GET /api/v1/verification/export?licenseId=DL-100
//! ```
//!
//! The status route is public and records an anonymous check. The other
//! routes require a staff session.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Checker, Error, VerificationLogFilter, VerificationLogView, VerificationRequest,
    VerificationResult,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::verification_csv::{export_file_name, render_logs};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Body for `POST /api/v1/verification/verify`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyRequest {
    #[schema(example = "DL-100")]
    pub license_id: String,
    /// Decoded QR payload, when one was scanned.
    pub scanned_qr_data: Option<String>,
}

impl From<VerifyRequest> for VerificationRequest {
    fn from(value: VerifyRequest) -> Self {
        Self {
            license_id: value.license_id,
            scanned_qr_data: value.scanned_qr_data,
        }
    }
}

/// Query string accepted by the log listing and export routes.
///
/// Dates are `YYYY-MM-DD`. The range applies only when both are present.
/// `userId=0` selects anonymous checks.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<i32>,
    pub license_id: Option<String>,
}

impl TryFrom<LogQuery> for VerificationLogFilter {
    type Error = Error;

    fn try_from(value: LogQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            start: parse_date("startDate", value.start_date.as_deref())?,
            end: parse_date("endDate", value.end_date.as_deref())?,
            checker: value.user_id.map(Checker::from_i32),
            license_id: value
                .license_id
                .map(|id| id.trim().to_owned())
                .filter(|id| !id.is_empty()),
        })
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            Error::invalid_request(format!("{field} must be a date in YYYY-MM-DD format"))
                .with_details(json!({ "field": field, "value": raw }))
        })
}

/// Verify a licence on behalf of the signed-in officer.
#[utoipa::path(
    post,
    path = "/api/v1/verification/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerificationResult),
        (status = 400, description = "Malformed body", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["verification"],
    operation_id = "verifyLicense"
)]
#[post("/verification/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<web::Json<VerificationResult>> {
    let checker = Checker::User(session.require_user_id()?);
    let result = state
        .verification
        .verify(payload.into_inner().into(), checker)
        .await?;
    Ok(web::Json(result))
}

/// Public licence status check.
#[utoipa::path(
    get,
    path = "/api/v1/verification/status/{licenseId}",
    params(("licenseId" = String, Path, description = "Licence identifier")),
    responses(
        (status = 200, description = "Registered licence", body = VerificationResult),
        (status = 404, description = "Licence not in the registry", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["verification"],
    operation_id = "licenseStatus",
    security([])
)]
#[get("/verification/status/{license_id}")]
pub async fn license_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VerificationResult>> {
    let result = state.verification.check_status(path.as_str()).await?;
    Ok(web::Json(result))
}

/// Verification audit log, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/verification/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Log entries", body = [VerificationLogView]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["verification"],
    operation_id = "listVerificationLogs"
)]
#[get("/verification/logs")]
pub async fn list_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LogQuery>,
) -> ApiResult<web::Json<Vec<VerificationLogView>>> {
    session.require_user_id()?;
    let filter = VerificationLogFilter::try_from(query.into_inner())?;
    let logs = state.verification_logs.list_logs(filter).await?;
    Ok(web::Json(logs))
}

/// Export the filtered audit log as a CSV attachment.
#[utoipa::path(
    get,
    path = "/api/v1/verification/export",
    params(LogQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["verification"],
    operation_id = "exportVerificationLogs"
)]
#[get("/verification/export")]
pub async fn export_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LogQuery>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let filter = VerificationLogFilter::try_from(query.into_inner())?;
    let export = state.verification_logs.export_logs(filter).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export_file_name(
            export.generated_on,
        ))],
    };
    Ok(HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header(disposition)
        .body(render_logs(&export.logs)))
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
