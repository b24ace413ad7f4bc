// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    Supervisor,
    SiteManager, // Gerente de CEDIS
    #[default]
    ReadOnly,    // Consulta
}

impl Role {
    /// Só Administrador e Supervisor criam CEDIS.
    pub fn can_manage_sites(self) -> bool {
        matches!(self, Role::Administrator | Role::Supervisor)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Victor Manuel")]
    pub name: String,
    #[schema(example = "seguridad@example.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub site_ids: Option<Vec<Uuid>>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role: self.role,
            organization_id: self.organization_id,
            site_ids: self.site_ids.clone(),
            active: self.is_active,
        }
    }
}

/// Identidade resolvida do chamador. É passada explicitamente a todo
/// serviço que aplica escopo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub site_ids: Option<Vec<Uuid>>,
    pub active: bool,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    #[schema(example = "Victor Manuel")]
    pub name: String,

    #[validate(email(message = "El email proporcionado es inválido."))]
    #[schema(example = "seguridad@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    #[serde(default)]
    pub role: Role,

    pub organization_id: Option<Uuid>,
    pub site_ids: Option<Vec<Uuid>>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El email proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
