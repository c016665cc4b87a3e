//! Driver registry handlers.
//!
//! ```text
//! GET /api/v1/drivers
//! GET /api/v1/drivers/statistics
//! GET /api/v1/drivers/DL-100
//! POST /api/v1/drivers/register {"licenseId":"DL-100","fullName":"Abebe Kebede",...}
//! ```
//!
//! Every route requires a staff session.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DriverStatistics, DriverView, Error, RegistrationDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/drivers/register`.
///
/// Dates travel as `YYYY-MM-DD` strings; missing fields deserialize as
/// blanks and are reported by the registration rules.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterDriverRequest {
    #[schema(example = "DL-100")]
    pub license_id: String,
    #[schema(example = "Abebe Kebede")]
    pub full_name: String,
    #[schema(example = "1990-05-17")]
    pub date_of_birth: String,
    #[schema(example = "B")]
    pub license_type: String,
    #[schema(example = "2030-05-17")]
    pub expiry_date: String,
    pub qr_raw_data: Option<String>,
    pub ocr_raw_text: Option<String>,
}

impl From<RegisterDriverRequest> for RegistrationDraft {
    fn from(value: RegisterDriverRequest) -> Self {
        Self {
            license_id: value.license_id,
            full_name: value.full_name,
            date_of_birth: value.date_of_birth,
            license_type: value.license_type,
            expiry_date: value.expiry_date,
            qr_raw_data: value.qr_raw_data,
            ocr_raw_text: value.ocr_raw_text,
        }
    }
}

/// List registered drivers, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    responses(
        (status = 200, description = "Registered drivers", body = [DriverView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "listDrivers"
)]
#[get("/drivers")]
pub async fn list_drivers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DriverView>>> {
    session.require_user_id()?;
    let drivers = state.drivers_query.list_drivers().await?;
    Ok(web::Json(drivers))
}

/// Counts of registered, active and expired licences.
#[utoipa::path(
    get,
    path = "/api/v1/drivers/statistics",
    responses(
        (status = 200, description = "Registry counts", body = DriverStatistics),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "driverStatistics"
)]
#[get("/drivers/statistics")]
pub async fn driver_statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DriverStatistics>> {
    session.require_user_id()?;
    let stats = state.drivers_query.statistics().await?;
    Ok(web::Json(stats))
}

/// Fetch one driver by licence id.
#[utoipa::path(
    get,
    path = "/api/v1/drivers/{licenseId}",
    params(("licenseId" = String, Path, description = "Licence identifier")),
    responses(
        (status = 200, description = "Driver", body = DriverView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such driver", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "getDriver"
)]
#[get("/drivers/{license_id}")]
pub async fn get_driver(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DriverView>> {
    session.require_user_id()?;
    let driver = state.drivers_query.get_driver(path.as_str()).await?;
    Ok(web::Json(driver))
}

/// Register a new driver on behalf of the signed-in officer.
#[utoipa::path(
    post,
    path = "/api/v1/drivers/register",
    request_body = RegisterDriverRequest,
    responses(
        (status = 201, description = "Driver registered", body = DriverView),
        (status = 400, description = "Invalid registration", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Licence already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["drivers"],
    operation_id = "registerDriver"
)]
#[post("/drivers/register")]
pub async fn register_driver(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterDriverRequest>,
) -> ApiResult<HttpResponse> {
    let registrant = session.require_user_id()?;
    let view = state
        .drivers
        .register(payload.into_inner().into(), registrant)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[cfg(test)]
#[path = "drivers_tests.rs"]
mod tests;
