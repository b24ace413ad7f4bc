// src/db/dashboard_repo.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{error::AppError, scope::Scope},
    db::{
        event_repo::event_facts_query, expense_repo::expense_facts_query, store::DashboardStore,
    },
    models::{
        dashboard::{Activity, FleetSnapshot, KpiWindow},
        event::EventFact,
        expense::ExpenseFact,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn scoped_count(table: &str, scope: &Scope, site_column: &str) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    qb.push(" WHERE TRUE");
    scope.push_sql(&mut qb, "organization_id", Some(site_column));
    qb
}

// As somas e janelas são calculadas em `models::dashboard`; aqui só
// buscamos as linhas do escopo.
#[async_trait]
impl DashboardStore for DashboardRepository {
    // 1. Cards do topo
    async fn fleet_snapshot(&self, scope: &Scope, window: KpiWindow) -> Result<FleetSnapshot, AppError> {
        // Iniciamos uma transação (Snapshot consistente dos dados)
        let mut tx = self.pool.begin().await?;

        // A. CEDIS visíveis
        let (site_count,): (i64,) = scoped_count("sites", scope, "id")
            .build_query_as()
            .fetch_one(&mut *tx)
            .await?;

        // B. Eventos (todo o histórico)
        let (event_count,): (i64,) = scoped_count("security_events", scope, "site_id")
            .build_query_as()
            .fetch_one(&mut *tx)
            .await?;

        // C. Gastos a partir do dia 1 do mês
        let expenses = expense_facts_query(scope, Some(window.month_start))
            .build_query_as::<ExpenseFact>()
            .fetch_all(&mut *tx)
            .await?;

        // D. Vencimentos de PIPC (frota inteira)
        let plan_expirations: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT expires_on FROM emergency_plans WHERE expires_on IS NOT NULL AND expires_on >= $1",
        )
        .bind(window.today)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(FleetSnapshot {
            site_count,
            event_count,
            expenses,
            plan_expirations,
        })
    }

    // 2. Linhas para tendências e resumo de CEDIS
    async fn activity(
        &self,
        scope: &Scope,
        events_since: Option<NaiveDateTime>,
        expenses_since: Option<NaiveDate>,
    ) -> Result<Activity, AppError> {
        let mut tx = self.pool.begin().await?;

        let events = event_facts_query(scope, events_since)
            .build_query_as::<EventFact>()
            .fetch_all(&mut *tx)
            .await?;

        let expenses = expense_facts_query(scope, expenses_since)
            .build_query_as::<ExpenseFact>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Activity { events, expenses })
    }
}
