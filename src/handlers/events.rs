// src/handlers/events.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        event::{EventStats, NewSecurityEvent, SecurityEvent},
        query::{EventFilter, Pagination},
    },
};

// GET /api/eventos
#[utoipa::path(
    get,
    path = "/api/eventos",
    tag = "Eventos",
    params(EventFilter, Pagination),
    responses(
        (status = 200, description = "Eventos de segurança (mais recentes primeiro)", body = Vec<SecurityEvent>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filter): Query<EventFilter>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let events = app_state
        .event_service
        .list_events(&user.identity(), &filter, page)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(events)))
}

// POST /api/eventos
#[utoipa::path(
    post,
    path = "/api/eventos",
    tag = "Eventos",
    request_body = NewSecurityEvent,
    responses(
        (status = 201, description = "Evento registrado", body = SecurityEvent),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<NewSecurityEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let event = app_state
        .event_service
        .create_event(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/eventos/stats
#[utoipa::path(
    get,
    path = "/api/eventos/stats",
    tag = "Eventos",
    responses(
        (status = 200, description = "Totais por tipo e por mês do calendário", body = EventStats)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn event_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .event_service
        .stats(&user.identity())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}
