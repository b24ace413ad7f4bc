// src/handlers/expenses.rs

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
        expense::{Expense, ExpenseCategory, ExpenseStats, NewExpense},
        query::{ExpenseFilter, Pagination},
    },
};

// GET /api/gastos
#[utoipa::path(
    get,
    path = "/api/gastos",
    tag = "Gastos",
    params(ExpenseFilter, Pagination),
    responses(
        (status = 200, description = "Gastos (mais recentes primeiro)", body = Vec<Expense>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filter): Query<ExpenseFilter>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let expenses = app_state
        .expense_service
        .list_expenses(&user.identity(), &filter, page)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(expenses)))
}

// POST /api/gastos
#[utoipa::path(
    post,
    path = "/api/gastos",
    tag = "Gastos",
    request_body = NewExpense,
    responses(
        (status = 201, description = "Gasto registrado", body = Expense),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "CEDIS fora do escopo"),
        (status = 404, description = "CEDIS não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<NewExpense>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = app_state
        .expense_service
        .create_expense(&user.identity(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// GET /api/gastos/stats
#[utoipa::path(
    get,
    path = "/api/gastos/stats",
    tag = "Gastos",
    responses(
        (status = 200, description = "Total, por categoria, top 10 CEDIS e por mês", body = ExpenseStats)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn expense_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .expense_service
        .stats(&user.identity())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/gastos/categorias
#[utoipa::path(
    get,
    path = "/api/gastos/categorias",
    tag = "Gastos",
    responses(
        (status = 200, description = "Categorias ativas", body = Vec<ExpenseCategory>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .expense_service
        .list_categories()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}
