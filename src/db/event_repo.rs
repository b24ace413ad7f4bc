// src/db/event_repo.rs

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::map_write_error, error::AppError, scope::Scope},
    db::store::{EventInsert, EventStore},
    models::{
        event::{EventFact, SecurityEvent},
        query::{EventFilter, Pagination},
    },
};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn scoped(select: &str, scope: &Scope) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" WHERE TRUE");
    scope.push_sql(&mut qb, "organization_id", Some("site_id"));
    qb
}

// Linhas mínimas para as agregações; também usada pelo dashboard.
pub(crate) fn event_facts_query(scope: &Scope, since: Option<NaiveDateTime>) -> QueryBuilder<'static, Postgres> {
    let mut qb = scoped("SELECT site_id, event_type, occurred_at FROM security_events", scope);
    if let Some(since) = since {
        qb.push(" AND occurred_at >= ").push_bind(since);
    }
    qb
}

#[async_trait]
impl EventStore for EventRepository {
    async fn list_events(
        &self,
        scope: &Scope,
        filter: &EventFilter,
        page: Pagination,
    ) -> Result<Vec<SecurityEvent>, AppError> {
        let page = page.normalized();
        let mut qb = scoped("SELECT * FROM security_events", scope);

        if let Some(site_id) = filter.site_id {
            qb.push(" AND site_id = ").push_bind(site_id);
        }
        if let Some(event_type) = &filter.event_type {
            qb.push(" AND event_type = ").push_bind(event_type.clone());
        }
        if let Some(from) = filter.from {
            qb.push(" AND occurred_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND occurred_at <= ").push_bind(to);
        }

        // Mais recentes primeiro
        qb.push(" ORDER BY occurred_at DESC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        let events = qb
            .build_query_as::<SecurityEvent>()
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn create_event(&self, insert: EventInsert) -> Result<SecurityEvent, AppError> {
        let EventInsert { event, organization_id, derived, registered_by } = insert;

        let created = sqlx::query_as::<_, SecurityEvent>(
            r#"
            INSERT INTO security_events (
                occurred_at, site_id, organization_id, event_type, state_label,
                description, observations, responsible, status,
                month_name, weekday_name, hour_of_day, registered_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(event.occurred_at)
        .bind(event.site_id)
        .bind(organization_id)
        .bind(&event.event_type)
        .bind(&event.state_label)
        .bind(&event.description)
        .bind(&event.observations)
        .bind(&event.responsible)
        .bind(&event.status)
        .bind(&derived.month_name)
        .bind(&derived.weekday_name)
        .bind(&derived.hour_of_day)
        .bind(registered_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn event_facts(&self, scope: &Scope) -> Result<Vec<EventFact>, AppError> {
        let facts = event_facts_query(scope, None)
            .build_query_as::<EventFact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(facts)
    }
}
