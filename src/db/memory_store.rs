// src/db/memory_store.rs

// ---
// Store em memória para os testes dos serviços. Implementa todos os
// traits de `db::store` com as mesmas regras das consultas SQL
// (escopo, joins, upserts por chave). Os agrupamentos ficam nos models.
// ---

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::Scope},
    db::store::{
        ComplianceStore, DashboardStore, EventInsert, EventStore, ExpenseInsert, ExpenseStore,
        SiteStore, UserInsert, UserStore,
    },
    models::{
        auth::User,
        compliance::{
            CertificateInput, EmergencyPlan, EmergencyPlanInput, ExtinguisherRecord,
            ExtinguisherUpsert, InspectionCertificate,
        },
        dashboard::{Activity, FleetSnapshot, KpiWindow},
        event::{EventFact, SecurityEvent},
        expense::{Expense, ExpenseCategory, ExpenseFact},
        query::{EventFilter, ExpenseFilter, Pagination},
        site::{NewSite, Site, SiteWithState, State},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    states: Vec<State>,
    sites: Vec<Site>,
    events: Vec<SecurityEvent>,
    categories: Vec<ExpenseCategory>,
    expenses: Vec<Expense>,
    extinguishers: Vec<ExtinguisherRecord>,
    plans: Vec<EmergencyPlan>,
    certificates: Vec<InspectionCertificate>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- Sementes para os testes ---

    pub fn seed_state(&self, name: &str) -> State {
        let state = State {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: None,
            seismic_zone: false,
            coastal_zone: false,
        };
        self.lock().states.push(state.clone());
        state
    }

    pub fn seed_site(&self, site: Site) -> Site {
        self.lock().sites.push(site.clone());
        site
    }

    pub fn seed_event(&self, event: SecurityEvent) {
        self.lock().events.push(event);
    }

    pub fn seed_category(&self, category: ExpenseCategory) {
        self.lock().categories.push(category);
    }

    pub fn seed_expense(&self, expense: Expense) {
        self.lock().expenses.push(expense);
    }

    pub fn seed_user(&self, user: User) {
        self.lock().users.push(user);
    }

    pub fn extinguisher_count(&self) -> usize {
        self.lock().extinguishers.len()
    }

    pub fn certificate_count(&self) -> usize {
        self.lock().certificates.len()
    }
}

fn paginate<T>(records: Vec<T>, page: Pagination) -> Vec<T> {
    let page = page.normalized();
    records
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

fn site_exists(tables: &Tables, site_id: Uuid) -> Result<(), AppError> {
    if tables.sites.iter().any(|s| s.id == site_id) {
        Ok(())
    } else {
        Err(AppError::SiteNotFound)
    }
}

fn event_facts(tables: &Tables, scope: &Scope, since: Option<NaiveDateTime>) -> Vec<EventFact> {
    tables
        .events
        .iter()
        .filter(|e| scope.permits(e.organization_id, Some(e.site_id)))
        .filter(|e| since.is_none_or(|since| e.occurred_at >= since))
        .map(|e| EventFact {
            site_id: e.site_id,
            event_type: e.event_type.clone(),
            occurred_at: e.occurred_at,
        })
        .collect()
}

// JOIN com sites e LEFT JOIN com categorias, como na consulta SQL
fn expense_facts(tables: &Tables, scope: &Scope, since: Option<NaiveDate>) -> Vec<ExpenseFact> {
    tables
        .expenses
        .iter()
        .filter(|g| scope.permits(g.organization_id, Some(g.site_id)))
        .filter(|g| since.is_none_or(|since| g.spent_on >= since))
        .filter_map(|g| {
            let site = tables.sites.iter().find(|s| s.id == g.site_id)?;
            let category = g
                .category_id
                .and_then(|id| tables.categories.iter().find(|c| c.id == id))
                .map(|c| c.name.clone());
            Some(ExpenseFact {
                site_id: g.site_id,
                site_name: site.name.clone(),
                category,
                spent_on: g.spent_on,
                amount: g.amount,
            })
        })
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: UserInsert) -> Result<User, AppError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            organization_id: user.organization_id,
            site_ids: user.site_ids,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn list_sites(&self, scope: &Scope, page: Pagination) -> Result<Vec<Site>, AppError> {
        let mut sites = scope.retain(self.lock().sites.clone(), |s| (s.organization_id, Some(s.id)));
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(sites, page))
    }

    async fn list_sites_with_state(&self, scope: &Scope) -> Result<Vec<SiteWithState>, AppError> {
        let tables = self.lock();
        let mut sites: Vec<SiteWithState> = tables
            .sites
            .iter()
            .filter(|s| scope.permits_site(s))
            .filter_map(|site| {
                let state = tables.states.iter().find(|st| st.id == site.state_id)?;
                Some(SiteWithState { site: site.clone(), state_name: state.name.clone() })
            })
            .collect();
        sites.sort_by(|a, b| a.site.name.cmp(&b.site.name));
        Ok(sites)
    }

    async fn find_site(&self, id: Uuid) -> Result<Option<Site>, AppError> {
        Ok(self.lock().sites.iter().find(|s| s.id == id).cloned())
    }

    async fn create_site(&self, site: &NewSite) -> Result<Site, AppError> {
        let mut tables = self.lock();
        if tables.sites.iter().any(|s| s.code == site.code) {
            return Err(AppError::SiteCodeAlreadyExists);
        }

        let now = Utc::now();
        let created = Site {
            id: Uuid::new_v4(),
            code: site.code.clone(),
            name: site.name.clone(),
            state_id: site.state_id,
            municipality: site.municipality.clone(),
            address: site.address.clone(),
            postal_code: site.postal_code.clone(),
            surface_m2: site.surface_m2,
            headcount: site.headcount,
            manager: site.manager.clone(),
            email: site.email.clone(),
            phone: site.phone.clone(),
            latitude: site.latitude,
            longitude: site.longitude,
            organization_id: site.organization_id,
            is_active: true,
            notes: site.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.sites.push(created.clone());
        Ok(created)
    }

    async fn list_states(&self) -> Result<Vec<State>, AppError> {
        let mut states = self.lock().states.clone();
        states.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(states)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(
        &self,
        scope: &Scope,
        filter: &EventFilter,
        page: Pagination,
    ) -> Result<Vec<SecurityEvent>, AppError> {
        let mut events: Vec<SecurityEvent> = scope
            .retain(self.lock().events.clone(), |e| (e.organization_id, Some(e.site_id)))
            .into_iter()
            .filter(|e| filter.site_id.is_none_or(|id| e.site_id == id))
            .filter(|e| filter.event_type.as_ref().is_none_or(|t| &e.event_type == t))
            .filter(|e| filter.from.is_none_or(|from| e.occurred_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.occurred_at <= to))
            .collect();
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(paginate(events, page))
    }

    async fn create_event(&self, insert: EventInsert) -> Result<SecurityEvent, AppError> {
        let mut tables = self.lock();
        site_exists(&tables, insert.event.site_id)?;

        let EventInsert { event, organization_id, derived, registered_by } = insert;
        let now = Utc::now();
        let created = SecurityEvent {
            id: Uuid::new_v4(),
            occurred_at: event.occurred_at,
            site_id: event.site_id,
            organization_id,
            event_type: event.event_type,
            state_label: event.state_label,
            description: event.description,
            observations: event.observations,
            responsible: event.responsible,
            status: event.status,
            month_name: derived.month_name,
            weekday_name: derived.weekday_name,
            hour_of_day: derived.hour_of_day,
            registered_by: Some(registered_by),
            created_at: now,
            updated_at: now,
        };
        tables.events.push(created.clone());
        Ok(created)
    }

    async fn event_facts(&self, scope: &Scope) -> Result<Vec<EventFact>, AppError> {
        Ok(event_facts(&self.lock(), scope, None))
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list_expenses(
        &self,
        scope: &Scope,
        filter: &ExpenseFilter,
        page: Pagination,
    ) -> Result<Vec<Expense>, AppError> {
        let mut expenses: Vec<Expense> = scope
            .retain(self.lock().expenses.clone(), |g| (g.organization_id, Some(g.site_id)))
            .into_iter()
            .filter(|g| filter.site_id.is_none_or(|id| g.site_id == id))
            .filter(|g| filter.category_id.is_none_or(|id| g.category_id == Some(id)))
            .filter(|g| filter.from.is_none_or(|from| g.spent_on >= from))
            .filter(|g| filter.to.is_none_or(|to| g.spent_on <= to))
            .collect();
        expenses.sort_by(|a, b| b.spent_on.cmp(&a.spent_on));
        Ok(paginate(expenses, page))
    }

    async fn create_expense(&self, insert: ExpenseInsert) -> Result<Expense, AppError> {
        let mut tables = self.lock();
        site_exists(&tables, insert.expense.site_id)?;

        let ExpenseInsert { expense, organization_id, status, registered_by } = insert;
        let now = Utc::now();
        let created = Expense {
            id: Uuid::new_v4(),
            spent_on: expense.spent_on,
            site_id: expense.site_id,
            organization_id,
            category_id: expense.category_id,
            provider: expense.provider,
            description: expense.description,
            amount: expense.amount,
            payment_method: expense.payment_method,
            invoice_number: expense.invoice_number,
            status,
            notes: expense.notes,
            registered_by: Some(registered_by),
            created_at: now,
            updated_at: now,
        };
        tables.expenses.push(created.clone());
        Ok(created)
    }

    async fn expense_facts(&self, scope: &Scope) -> Result<Vec<ExpenseFact>, AppError> {
        Ok(expense_facts(&self.lock(), scope, None))
    }

    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>, AppError> {
        let mut categories: Vec<ExpenseCategory> = self
            .lock()
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }
}

#[async_trait]
impl ComplianceStore for MemoryStore {
    async fn list_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>, AppError> {
        Ok(self.lock().extinguishers.clone())
    }

    async fn find_extinguisher(&self, site_id: Uuid) -> Result<Option<ExtinguisherRecord>, AppError> {
        Ok(self.lock().extinguishers.iter().find(|e| e.site_id == site_id).cloned())
    }

    async fn upsert_extinguisher(&self, record: &ExtinguisherUpsert) -> Result<ExtinguisherRecord, AppError> {
        let mut tables = self.lock();
        let input = &record.input;
        site_exists(&tables, input.site_id)?;

        let now = Utc::now();
        if let Some(existing) = tables.extinguishers.iter_mut().find(|e| e.site_id == input.site_id) {
            existing.risk_classification = input.risk_classification.clone();
            existing.required_count = input.required_count;
            existing.pqs_count = input.pqs_count;
            existing.co2_count = input.co2_count;
            existing.total_count = record.total_count;
            existing.compliant = record.compliant;
            existing.recharge_date = input.recharge_date;
            existing.provider = input.provider.clone();
            existing.cost = input.cost;
            existing.notes = input.notes.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = ExtinguisherRecord {
            id: Uuid::new_v4(),
            site_id: input.site_id,
            risk_classification: input.risk_classification.clone(),
            required_count: input.required_count,
            pqs_count: input.pqs_count,
            co2_count: input.co2_count,
            total_count: record.total_count,
            compliant: record.compliant,
            recharge_date: input.recharge_date,
            provider: input.provider.clone(),
            cost: input.cost,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.extinguishers.push(created.clone());
        Ok(created)
    }

    async fn list_plans(&self) -> Result<Vec<EmergencyPlan>, AppError> {
        Ok(self.lock().plans.clone())
    }

    async fn find_plan(&self, site_id: Uuid) -> Result<Option<EmergencyPlan>, AppError> {
        Ok(self.lock().plans.iter().find(|p| p.site_id == site_id).cloned())
    }

    async fn upsert_plan(&self, plan: &EmergencyPlanInput) -> Result<EmergencyPlan, AppError> {
        let mut tables = self.lock();
        site_exists(&tables, plan.site_id)?;

        let now = Utc::now();
        if let Some(existing) = tables.plans.iter_mut().find(|p| p.site_id == plan.site_id) {
            existing.approved_on = plan.approved_on;
            existing.expires_on = plan.expires_on;
            existing.status = plan.status.clone();
            existing.provider = plan.provider.clone();
            existing.cost = plan.cost;
            existing.document_url = plan.document_url.clone();
            existing.notes = plan.notes.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = EmergencyPlan {
            id: Uuid::new_v4(),
            site_id: plan.site_id,
            approved_on: plan.approved_on,
            expires_on: plan.expires_on,
            status: plan.status.clone(),
            provider: plan.provider.clone(),
            cost: plan.cost,
            document_url: plan.document_url.clone(),
            notes: plan.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.plans.push(created.clone());
        Ok(created)
    }

    async fn list_certificates(&self) -> Result<Vec<InspectionCertificate>, AppError> {
        Ok(self.lock().certificates.clone())
    }

    async fn certificates_for_site(&self, site_id: Uuid) -> Result<Vec<InspectionCertificate>, AppError> {
        Ok(self
            .lock()
            .certificates
            .iter()
            .filter(|c| c.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn upsert_certificate(&self, certificate: &CertificateInput) -> Result<InspectionCertificate, AppError> {
        let mut tables = self.lock();
        site_exists(&tables, certificate.site_id)?;

        let now = Utc::now();
        if let Some(existing) = tables
            .certificates
            .iter_mut()
            .find(|c| c.site_id == certificate.site_id && c.discipline == certificate.discipline)
        {
            existing.status = certificate.status.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = InspectionCertificate {
            id: Uuid::new_v4(),
            site_id: certificate.site_id,
            discipline: certificate.discipline,
            has_certificate: certificate.has_certificate,
            status: certificate.status.clone(),
            issued_on: certificate.issued_on,
            expires_on: certificate.expires_on,
            provider: certificate.provider.clone(),
            cost: certificate.cost,
            document_url: certificate.document_url.clone(),
            notes: certificate.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.certificates.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn fleet_snapshot(&self, scope: &Scope, window: KpiWindow) -> Result<FleetSnapshot, AppError> {
        let tables = self.lock();

        Ok(FleetSnapshot {
            site_count: tables.sites.iter().filter(|s| scope.permits_site(s)).count() as i64,
            event_count: tables
                .events
                .iter()
                .filter(|e| scope.permits(e.organization_id, Some(e.site_id)))
                .count() as i64,
            expenses: expense_facts(&tables, scope, Some(window.month_start)),
            plan_expirations: tables
                .plans
                .iter()
                .filter_map(|p| p.expires_on)
                .filter(|d| *d >= window.today)
                .collect(),
        })
    }

    async fn activity(
        &self,
        scope: &Scope,
        events_since: Option<NaiveDateTime>,
        expenses_since: Option<NaiveDate>,
    ) -> Result<Activity, AppError> {
        let tables = self.lock();

        Ok(Activity {
            events: event_facts(&tables, scope, events_since),
            expenses: expense_facts(&tables, scope, expenses_since),
        })
    }
}

// --- Fábricas de registros para os testes ---

pub mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::{
        auth::{Identity, Role},
        event::{DerivedEventFields, SecurityEvent},
        expense::{Expense, DEFAULT_EXPENSE_STATUS},
        site::Site,
    };

    pub fn identity(role: Role, organization_id: Option<Uuid>, site_ids: Option<Vec<Uuid>>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
            organization_id,
            site_ids,
            active: true,
        }
    }

    pub fn site(state_id: Uuid, organization_id: Uuid, name: &str) -> Site {
        let now = Utc::now();
        Site {
            id: Uuid::new_v4(),
            code: format!("CEDIS-{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            state_id,
            municipality: "Mérida".into(),
            address: None,
            postal_code: None,
            surface_m2: None,
            headcount: 40,
            manager: None,
            email: None,
            phone: None,
            latitude: None,
            longitude: None,
            organization_id,
            is_active: true,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn event(site: &Site, occurred_at: NaiveDateTime, event_type: &str) -> SecurityEvent {
        let derived = DerivedEventFields::from_timestamp(occurred_at);
        let now = Utc::now();
        SecurityEvent {
            id: Uuid::new_v4(),
            occurred_at,
            site_id: site.id,
            organization_id: site.organization_id,
            event_type: event_type.to_string(),
            state_label: None,
            description: None,
            observations: None,
            responsible: None,
            status: None,
            month_name: derived.month_name,
            weekday_name: derived.weekday_name,
            hour_of_day: derived.hour_of_day,
            registered_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn expense(site: &Site, spent_on: NaiveDate, amount: Decimal, category_id: Option<Uuid>) -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            spent_on,
            site_id: site.id,
            organization_id: site.organization_id,
            category_id,
            provider: None,
            description: None,
            amount,
            payment_method: None,
            invoice_number: None,
            status: DEFAULT_EXPENSE_STATUS.to_string(),
            notes: None,
            registered_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}
