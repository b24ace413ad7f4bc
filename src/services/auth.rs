// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{store::UserInsert, UserStore},
    models::auth::{AuthResponse, Claims, RegisterUserPayload, User},
};

pub const TOKEN_TYPE: &str = "bearer";

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserStore>, jwt_secret: String, token_ttl_minutes: i64) -> Self {
        Self { user_repo, jwt_secret, token_ttl_minutes }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<User, AppError> {
        // 1. Hashing em thread separada (bcrypt é CPU-bound)
        let password = payload.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Cria o usuário (e-mail duplicado => 409)
        let user = self
            .user_repo
            .create_user(UserInsert {
                name: payload.name,
                email: payload.email,
                password_hash,
                role: payload.role,
                organization_id: payload.organization_id,
                site_ids: payload.site_ids,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "👤 Usuário registrado");
        Ok(user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::warn!("🔒 Login com e-mail desconhecido");
            return Err(AppError::InvalidCredentials);
        };

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!(user_id = %user.id, "🔒 Senha incorreta");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        self.user_repo.touch_last_login(user.id).await?;

        Ok(AuthResponse {
            access_token: self.create_token(user.id)?,
            token_type: TOKEN_TYPE.to_string(),
            user,
        })
    }

    /// Token inválido/expirado ou usuário inexistente => 401; inativo => 403.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }
        Ok(user)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.token_ttl_minutes);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
