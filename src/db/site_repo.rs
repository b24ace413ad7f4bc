// src/db/site_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_write_error, error::AppError, scope::Scope},
    db::store::SiteStore,
    models::{
        query::Pagination,
        site::{NewSite, Site, SiteWithState, State},
    },
};

#[derive(Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteStore for SiteRepository {
    async fn list_sites(&self, scope: &Scope, page: Pagination) -> Result<Vec<Site>, AppError> {
        let page = page.normalized();

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM sites WHERE TRUE");
        scope.push_sql(&mut qb, "organization_id", Some("id"));
        qb.push(" ORDER BY name ASC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        let sites = qb.build_query_as::<Site>().fetch_all(&self.pool).await?;
        Ok(sites)
    }

    async fn list_sites_with_state(&self, scope: &Scope) -> Result<Vec<SiteWithState>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT s.*, st.name AS state_name
            FROM sites s
            JOIN states st ON st.id = s.state_id
            WHERE TRUE
            "#,
        );
        scope.push_sql(&mut qb, "s.organization_id", Some("s.id"));
        qb.push(" ORDER BY s.name ASC");

        let sites = qb
            .build_query_as::<SiteWithState>()
            .fetch_all(&self.pool)
            .await?;
        Ok(sites)
    }

    async fn find_site(&self, id: Uuid) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(site)
    }

    async fn create_site(&self, site: &NewSite) -> Result<Site, AppError> {
        let created = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO sites (
                code, name, state_id, municipality, address, postal_code,
                surface_m2, headcount, manager, email, phone,
                latitude, longitude, organization_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&site.code)
        .bind(&site.name)
        .bind(site.state_id)
        .bind(&site.municipality)
        .bind(&site.address)
        .bind(&site.postal_code)
        .bind(site.surface_m2)
        .bind(site.headcount)
        .bind(&site.manager)
        .bind(&site.email)
        .bind(&site.phone)
        .bind(site.latitude)
        .bind(site.longitude)
        .bind(site.organization_id)
        .bind(&site.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn list_states(&self) -> Result<Vec<State>, AppError> {
        let states = sqlx::query_as::<_, State>("SELECT * FROM states ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(states)
    }
}
