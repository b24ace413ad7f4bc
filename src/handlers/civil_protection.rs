// src/handlers/civil_protection.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::compliance::{
        CertificateInput, EmergencyPlan, EmergencyPlanInput, ExtinguisherInput,
        ExtinguisherRecord, InspectionCertificate, SiteCompliance,
    },
};

// =============================================================================
//  EXTINTORES
// =============================================================================

// GET /api/proteccion-civil/extintores
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/extintores",
    tag = "Proteção Civil",
    responses(
        (status = 200, description = "Registros de extintores de todos os CEDIS", body = Vec<ExtinguisherRecord>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_extinguishers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let records = app_state
        .compliance_service
        .list_extinguishers()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(records)))
}

// GET /api/proteccion-civil/extintores/{site_id}
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/extintores/{site_id}",
    tag = "Proteção Civil",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "Registro de extintores", body = ExtinguisherRecord),
        (status = 404, description = "Sem registro para o CEDIS")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_extinguisher(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .compliance_service
        .get_extinguisher(site_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

// POST /api/proteccion-civil/extintores
#[utoipa::path(
    post,
    path = "/api/proteccion-civil/extintores",
    tag = "Proteção Civil",
    request_body = ExtinguisherInput,
    responses(
        (status = 200, description = "Registro criado ou substituído", body = ExtinguisherRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn upsert_extinguisher(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ExtinguisherInput>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .compliance_service
        .upsert_extinguisher(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

// =============================================================================
//  PIPC
// =============================================================================

// GET /api/proteccion-civil/pipc
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/pipc",
    tag = "Proteção Civil",
    responses(
        (status = 200, description = "Planos internos de proteção civil", body = Vec<EmergencyPlan>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .compliance_service
        .list_plans()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plans)))
}

// GET /api/proteccion-civil/pipc/{site_id}
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/pipc/{site_id}",
    tag = "Proteção Civil",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "PIPC do CEDIS", body = EmergencyPlan),
        (status = 404, description = "Sem PIPC para o CEDIS")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .compliance_service
        .get_plan(site_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plan)))
}

// POST /api/proteccion-civil/pipc
#[utoipa::path(
    post,
    path = "/api/proteccion-civil/pipc",
    tag = "Proteção Civil",
    request_body = EmergencyPlanInput,
    responses(
        (status = 200, description = "PIPC criado ou substituído", body = EmergencyPlan),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn upsert_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<EmergencyPlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .compliance_service
        .upsert_plan(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plan)))
}

// =============================================================================
//  DICTÁMENES
// =============================================================================

// GET /api/proteccion-civil/dictamenes/{site_id}
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/dictamenes/{site_id}",
    tag = "Proteção Civil",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "Dictámenes do CEDIS (vazio se não houver)", body = Vec<InspectionCertificate>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn certificates_for_site(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let certificates = app_state
        .compliance_service
        .certificates_for_site(site_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(certificates)))
}

// POST /api/proteccion-civil/dictamenes
#[utoipa::path(
    post,
    path = "/api/proteccion-civil/dictamenes",
    tag = "Proteção Civil",
    request_body = CertificateInput,
    responses(
        (status = 200, description = "Dictamen criado ou com status atualizado", body = InspectionCertificate),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn upsert_certificate(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CertificateInput>,
) -> Result<impl IntoResponse, ApiError> {
    let certificate = app_state
        .compliance_service
        .upsert_certificate(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(certificate)))
}

// =============================================================================
//  COMPLIANCE
// =============================================================================

// GET /api/proteccion-civil/compliance
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/compliance",
    tag = "Proteção Civil",
    responses(
        (status = 200, description = "Score de compliance de todos os CEDIS", body = Vec<SiteCompliance>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn fleet_compliance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let summary = app_state
        .compliance_service
        .fleet_summary(&user.identity(), today)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/proteccion-civil/compliance/{site_id}
#[utoipa::path(
    get,
    path = "/api/proteccion-civil/compliance/{site_id}",
    tag = "Proteção Civil",
    params(
        ("site_id" = Uuid, Path, description = "ID do CEDIS")
    ),
    responses(
        (status = 200, description = "Score de compliance do CEDIS", body = SiteCompliance),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn site_compliance(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let compliance = app_state
        .compliance_service
        .site_compliance(site_id, today)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(compliance)))
}
