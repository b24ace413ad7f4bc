// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro interno. Repositórios e serviços propagam com `?`
// e só na borda HTTP ele vira um `ApiError` traduzido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Código de CEDIS já existe")]
    SiteCodeAlreadyExists,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    InactiveUser,

    // Escopo do chamador (organização / lista de CEDIS) exclui o alvo,
    // ou o papel não permite a operação.
    #[error("Acesso negado")]
    Forbidden,

    #[error("CEDIS não encontrado")]
    SiteNotFound,

    #[error("Registro de extintores não encontrado")]
    ExtinguisherRecordNotFound,

    #[error("PIPC não encontrado")]
    EmergencyPlanNotFound,

    #[error("Referência inexistente: {0}")]
    ReferenceNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Erro pronto para a resposta HTTP (já traduzido)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists
            | AppError::SiteCodeAlreadyExists
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InactiveUser | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::SiteNotFound
            | AppError::ExtinguisherRecordNotFound
            | AppError::EmergencyPlanNotFound
            | AppError::ReferenceNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave usada para buscar a mensagem no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_FAILED",
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::SiteCodeAlreadyExists => "SITE_CODE_ALREADY_EXISTS",
            AppError::UniqueConstraintViolation(_) => "UNIQUE_VIOLATION",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::Forbidden => "FORBIDDEN",
            AppError::SiteNotFound => "SITE_NOT_FOUND",
            AppError::ExtinguisherRecordNotFound => "EXTINGUISHER_NOT_FOUND",
            AppError::EmergencyPlanNotFound => "EMERGENCY_PLAN_NOT_FOUND",
            AppError::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn to_api_error(self, locale: &Locale, i18n_store: &I18nStore) -> ApiError {
        let status = self.status_code();
        let error = i18n_store.translate(&locale.0, self.message_key()).to_string();

        let details = match &self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            AppError::UniqueConstraintViolation(constraint) => Some(json!({ "constraint": constraint })),
            AppError::ReferenceNotFound(constraint) => Some(json!({ "constraint": constraint })),
            _ => None,
        };

        // O `tracing` registra o erro real; o cliente só vê a mensagem genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError { status, error, details }
    }
}

// Retorna todos os detalhes da validação, campo a campo.
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), json!(messages));
    }
    Value::Object(details)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelos middlewares, onde ainda não temos o idioma do chamador.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}
