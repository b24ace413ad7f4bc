// src/common/scope.rs

// ---
// Filtro de Escopo: a única regra de visibilidade da aplicação.
// Todo serviço monta um `Scope` a partir da identidade do chamador e o
// repassa aos repositórios, que o traduzem em SQL (ou em `permits`).
// ---

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Identity, Role},
        site::Site,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    organization_id: Option<Uuid>,
    site_ids: Option<Vec<Uuid>>,
}

impl Scope {
    /// Sem restrição (Administrador, ou chamador sem organização nem lista de CEDIS).
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Apenas um CEDIS, sem filtro de organização (leituras por CEDIS já autorizadas).
    pub fn for_site(site_id: Uuid) -> Self {
        Self {
            organization_id: None,
            site_ids: Some(vec![site_id]),
        }
    }

    pub fn for_identity(identity: &Identity) -> Self {
        if identity.role == Role::Administrator {
            return Self::unrestricted();
        }

        // Lista vazia equivale a "sem lista".
        let site_ids = identity
            .site_ids
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .cloned();

        Self {
            organization_id: identity.organization_id,
            site_ids,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.organization_id.is_none() && self.site_ids.is_none()
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    pub fn site_ids(&self) -> Option<&[Uuid]> {
        self.site_ids.as_deref()
    }

    /// As duas restrições são conjuntivas. `site_id = None` indica um tipo de
    /// registro sem CEDIS direto: a lista de CEDIS não se aplica.
    pub fn permits(&self, organization_id: Uuid, site_id: Option<Uuid>) -> bool {
        let organization_ok = self
            .organization_id
            .is_none_or(|scoped| scoped == organization_id);

        let site_ok = match (&self.site_ids, site_id) {
            (Some(allowed), Some(site_id)) => allowed.contains(&site_id),
            _ => true,
        };

        organization_ok && site_ok
    }

    pub fn permits_site(&self, site: &Site) -> bool {
        self.permits(site.organization_id, Some(site.id))
    }

    pub fn ensure_site(&self, site: &Site) -> Result<(), AppError> {
        if self.permits_site(site) {
            return Ok(());
        }

        tracing::warn!(site_id = %site.id, "⛔ Acesso negado ao CEDIS fora do escopo");
        Err(AppError::Forbidden)
    }

    /// Filtra uma coleção já carregada.
    pub fn retain<T, F>(&self, records: Vec<T>, keys: F) -> Vec<T>
    where
        F: Fn(&T) -> (Uuid, Option<Uuid>),
    {
        if self.is_unrestricted() {
            return records;
        }

        records
            .into_iter()
            .filter(|record| {
                let (organization_id, site_id) = keys(record);
                self.permits(organization_id, site_id)
            })
            .collect()
    }

    /// Acrescenta os predicados do escopo a uma consulta que já tem `WHERE`.
    pub fn push_sql(
        &self,
        qb: &mut QueryBuilder<'_, Postgres>,
        organization_column: &str,
        site_column: Option<&str>,
    ) {
        if let Some(organization_id) = self.organization_id {
            qb.push(" AND ")
                .push(organization_column)
                .push(" = ")
                .push_bind(organization_id);
        }

        if let (Some(site_ids), Some(site_column)) = (&self.site_ids, site_column) {
            qb.push(" AND ")
                .push(site_column)
                .push(" = ANY(")
                .push_bind(site_ids.clone())
                .push(")");
        }
    }
}
