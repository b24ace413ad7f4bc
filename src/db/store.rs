// src/db/store.rs

// ---
// Contratos de persistência. Os serviços dependem destes traits
// (`Arc<dyn ...Store>`); os repositórios sqlx são a implementação real.
// ---

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::Scope},
    models::{
        auth::{Role, User},
        compliance::{
            CertificateInput, EmergencyPlan, EmergencyPlanInput, ExtinguisherRecord,
            ExtinguisherUpsert, InspectionCertificate,
        },
        dashboard::{Activity, FleetSnapshot, KpiWindow},
        event::{DerivedEventFields, EventFact, NewSecurityEvent, SecurityEvent},
        expense::{Expense, ExpenseCategory, ExpenseFact, NewExpense},
        query::{EventFilter, ExpenseFilter, Pagination},
        site::{NewSite, Site, SiteWithState, State},
    },
};

// --- Linhas prontas para INSERT (entrada + campos resolvidos pelo serviço) ---

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub site_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone)]
pub struct EventInsert {
    pub event: NewSecurityEvent,
    pub organization_id: Uuid, // herdado do CEDIS
    pub derived: DerivedEventFields,
    pub registered_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct ExpenseInsert {
    pub expense: NewExpense,
    pub organization_id: Uuid, // herdado do CEDIS
    pub status: String,
    pub registered_by: Uuid,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: UserInsert) -> Result<User, AppError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn list_sites(&self, scope: &Scope, page: Pagination) -> Result<Vec<Site>, AppError>;
    /// Todos os CEDIS visíveis com o nome do estado (JOIN), ordenados por nome.
    async fn list_sites_with_state(&self, scope: &Scope) -> Result<Vec<SiteWithState>, AppError>;
    async fn find_site(&self, id: Uuid) -> Result<Option<Site>, AppError>;
    async fn create_site(&self, site: &NewSite) -> Result<Site, AppError>;
    async fn list_states(&self) -> Result<Vec<State>, AppError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(
        &self,
        scope: &Scope,
        filter: &EventFilter,
        page: Pagination,
    ) -> Result<Vec<SecurityEvent>, AppError>;
    async fn create_event(&self, event: EventInsert) -> Result<SecurityEvent, AppError>;
    /// Todos os eventos visíveis, na forma mínima usada pelas estatísticas.
    async fn event_facts(&self, scope: &Scope) -> Result<Vec<EventFact>, AppError>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn list_expenses(
        &self,
        scope: &Scope,
        filter: &ExpenseFilter,
        page: Pagination,
    ) -> Result<Vec<Expense>, AppError>;
    async fn create_expense(&self, expense: ExpenseInsert) -> Result<Expense, AppError>;
    /// Todos os gastos visíveis, com nome do CEDIS e da categoria (se houver).
    async fn expense_facts(&self, scope: &Scope) -> Result<Vec<ExpenseFact>, AppError>;
    /// Categorias ativas por `sort_order`, depois nome.
    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>, AppError>;
}

#[async_trait]
pub trait ComplianceStore: Send + Sync {
    async fn list_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>, AppError>;
    async fn find_extinguisher(&self, site_id: Uuid) -> Result<Option<ExtinguisherRecord>, AppError>;
    async fn upsert_extinguisher(&self, record: &ExtinguisherUpsert) -> Result<ExtinguisherRecord, AppError>;

    async fn list_plans(&self) -> Result<Vec<EmergencyPlan>, AppError>;
    async fn find_plan(&self, site_id: Uuid) -> Result<Option<EmergencyPlan>, AppError>;
    async fn upsert_plan(&self, plan: &EmergencyPlanInput) -> Result<EmergencyPlan, AppError>;

    async fn list_certificates(&self) -> Result<Vec<InspectionCertificate>, AppError>;
    async fn certificates_for_site(&self, site_id: Uuid) -> Result<Vec<InspectionCertificate>, AppError>;
    async fn upsert_certificate(&self, certificate: &CertificateInput) -> Result<InspectionCertificate, AppError>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Snapshot consistente (uma transação). Gastos a partir de
    /// `window.month_start`; vencimentos de PIPC sem escopo.
    async fn fleet_snapshot(&self, scope: &Scope, window: KpiWindow) -> Result<FleetSnapshot, AppError>;
    /// Eventos e gastos visíveis a partir dos cortes (`None` = desde sempre).
    async fn activity(
        &self,
        scope: &Scope,
        events_since: Option<NaiveDateTime>,
        expenses_since: Option<NaiveDate>,
    ) -> Result<Activity, AppError>;
}
