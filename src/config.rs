// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        ComplianceRepository, DashboardRepository, EventRepository, ExpenseRepository,
        SiteRepository, UserRepository,
    },
    services::{
        AuthService, ComplianceService, DashboardService, EventService, ExpenseService,
        SiteService,
    },
};

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let token_ttl_minutes = match env::var("TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("TOKEN_TTL_MINUTES inválido: {raw}"))?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl_minutes,
            bind_addr,
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub site_service: SiteService,
    pub event_service: EventService,
    pub expense_service: ExpenseService,
    pub compliance_service: ComplianceService,
    pub dashboard_service: DashboardService,
    pub i18n_store: I18nStore,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let site_repo = Arc::new(SiteRepository::new(db_pool.clone()));
        let event_repo = Arc::new(EventRepository::new(db_pool.clone()));
        let expense_repo = Arc::new(ExpenseRepository::new(db_pool.clone()));
        let compliance_repo = Arc::new(ComplianceRepository::new(db_pool.clone()));
        let dashboard_repo = Arc::new(DashboardRepository::new(db_pool));

        Self {
            auth_service: AuthService::new(
                user_repo,
                config.jwt_secret.clone(),
                config.token_ttl_minutes,
            ),
            site_service: SiteService::new(site_repo.clone()),
            event_service: EventService::new(event_repo, site_repo.clone()),
            expense_service: ExpenseService::new(expense_repo, site_repo.clone()),
            compliance_service: ComplianceService::new(compliance_repo.clone(), site_repo.clone()),
            dashboard_service: DashboardService::new(dashboard_repo, site_repo, compliance_repo),
            i18n_store: I18nStore::new(),
        }
    }
}
