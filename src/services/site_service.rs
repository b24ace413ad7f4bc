// src/services/site_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, scope::Scope},
    db::SiteStore,
    models::{
        auth::Identity,
        query::Pagination,
        site::{NewSite, Site, State},
    },
};

#[derive(Clone)]
pub struct SiteService {
    site_repo: Arc<dyn SiteStore>,
}

impl SiteService {
    pub fn new(site_repo: Arc<dyn SiteStore>) -> Self {
        Self { site_repo }
    }

    pub async fn list_sites(&self, identity: &Identity, page: Pagination) -> Result<Vec<Site>, AppError> {
        let scope = Scope::for_identity(identity);
        self.site_repo.list_sites(&scope, page).await
    }

    /// Busca pontual: inexistente => 404, fora do escopo => 403.
    pub async fn get_site(&self, identity: &Identity, site_id: Uuid) -> Result<Site, AppError> {
        let site = self
            .site_repo
            .find_site(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;

        Scope::for_identity(identity).ensure_site(&site)?;
        Ok(site)
    }

    pub async fn create_site(&self, identity: &Identity, payload: NewSite) -> Result<Site, AppError> {
        if !identity.role.can_manage_sites() {
            tracing::warn!(user_id = %identity.user_id, "⛔ Criação de CEDIS sem permissão");
            return Err(AppError::Forbidden);
        }
        payload.validate()?;

        let site = self.site_repo.create_site(&payload).await?;
        tracing::info!(site_id = %site.id, code = %site.code, "🏭 CEDIS criado");
        Ok(site)
    }

    pub async fn list_states(&self) -> Result<Vec<State>, AppError> {
        self.site_repo.list_states().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::{
        fixtures::{identity, site},
        MemoryStore,
    };
    use crate::models::auth::Role;

    fn new_site(state_id: Uuid, organization_id: Uuid) -> NewSite {
        NewSite {
            code: "CEDIS-MID-01".into(),
            name: "CEDIS Mérida".into(),
            state_id,
            municipality: "Mérida".into(),
            address: None,
            postal_code: None,
            surface_m2: None,
            headcount: 10,
            manager: None,
            email: None,
            phone: None,
            latitude: None,
            longitude: None,
            organization_id,
            notes: None,
        }
    }

    #[tokio::test]
    async fn out_of_scope_site_is_forbidden_and_missing_site_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let state = store.seed_state("Yucatán");
        let (org_a, org_b) = (Uuid::new_v4(), Uuid::new_v4());
        let foreign = store.seed_site(site(state.id, org_b, "Ajeno"));
        let service = SiteService::new(store);

        let caller = identity(Role::Supervisor, Some(org_a), None);

        let err = service.get_site(&caller, foreign.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = service.get_site(&caller, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::SiteNotFound));
    }

    #[tokio::test]
    async fn list_is_narrowed_to_the_permitted_sites() {
        let store = Arc::new(MemoryStore::new());
        let state = store.seed_state("Yucatán");
        let org = Uuid::new_v4();
        let mine = store.seed_site(site(state.id, org, "Mío"));
        store.seed_site(site(state.id, org, "Otro"));
        let service = SiteService::new(store);

        let caller = identity(Role::SiteManager, Some(org), Some(vec![mine.id]));
        let sites = service.list_sites(&caller, Pagination::default()).await.unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].id, mine.id);
    }

    #[tokio::test]
    async fn only_managers_create_sites() {
        let store = Arc::new(MemoryStore::new());
        let state = store.seed_state("Yucatán");
        let org = Uuid::new_v4();
        let service = SiteService::new(store);

        let reader = identity(Role::ReadOnly, Some(org), None);
        let err = service.create_site(&reader, new_site(state.id, org)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let admin = identity(Role::Administrator, None, None);
        let created = service.create_site(&admin, new_site(state.id, org)).await.unwrap();
        assert_eq!(created.code, "CEDIS-MID-01");

        let err = service.create_site(&admin, new_site(state.id, org)).await.unwrap_err();
        assert!(matches!(err, AppError::SiteCodeAlreadyExists));
    }
}
