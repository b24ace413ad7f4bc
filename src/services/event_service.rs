// src/services/event_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{error::AppError, scope::Scope},
    db::{store::EventInsert, EventStore, SiteStore},
    models::{
        auth::Identity,
        event::{DerivedEventFields, EventStats, NewSecurityEvent, SecurityEvent},
        query::{EventFilter, Pagination},
    },
};

#[derive(Clone)]
pub struct EventService {
    event_repo: Arc<dyn EventStore>,
    site_repo: Arc<dyn SiteStore>,
}

impl EventService {
    pub fn new(event_repo: Arc<dyn EventStore>, site_repo: Arc<dyn SiteStore>) -> Self {
        Self { event_repo, site_repo }
    }

    pub async fn list_events(
        &self,
        identity: &Identity,
        filter: &EventFilter,
        page: Pagination,
    ) -> Result<Vec<SecurityEvent>, AppError> {
        let scope = Scope::for_identity(identity);
        self.event_repo.list_events(&scope, filter, page).await
    }

    /// Mês, dia da semana e hora são derivados aqui, uma única vez.
    pub async fn create_event(
        &self,
        identity: &Identity,
        payload: NewSecurityEvent,
    ) -> Result<SecurityEvent, AppError> {
        payload.validate()?;

        let site = self
            .site_repo
            .find_site(payload.site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;
        Scope::for_identity(identity).ensure_site(&site)?;

        let derived = DerivedEventFields::from_timestamp(payload.occurred_at);
        let event = self
            .event_repo
            .create_event(EventInsert {
                event: payload,
                organization_id: site.organization_id,
                derived,
                registered_by: identity.user_id,
            })
            .await?;

        tracing::info!(event_id = %event.id, site_id = %event.site_id, "🚨 Evento registrado");
        Ok(event)
    }

    pub async fn stats(&self, identity: &Identity) -> Result<EventStats, AppError> {
        let scope = Scope::for_identity(identity);
        let facts = self.event_repo.event_facts(&scope).await?;
        Ok(EventStats::from_facts(&facts))
    }
}
