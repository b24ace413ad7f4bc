// src/services/dashboard_service.rs

// ---
// Motor de agregação do dashboard. O relógio entra como parâmetro
// (`now`/`today`), assim como a identidade do chamador.
// ---

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    common::{error::AppError, scope::Scope},
    db::{ComplianceStore, DashboardStore, SiteStore},
    models::{
        auth::Identity,
        compliance::{ComplianceSignals, EmergencyPlan, ExtinguisherRecord, DEFAULT_PLAN_STATUS},
        dashboard::{
            trend_start, year_start, CivilProtectionSnapshot, FleetKpi, KpiWindow, SiteHeader,
            SiteStatistics, SiteSummary, TrendSeries,
        },
        site::SiteMapEntry,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: Arc<dyn DashboardStore>,
    site_repo: Arc<dyn SiteStore>,
    compliance_repo: Arc<dyn ComplianceStore>,
}

impl DashboardService {
    pub fn new(
        dashboard_repo: Arc<dyn DashboardStore>,
        site_repo: Arc<dyn SiteStore>,
        compliance_repo: Arc<dyn ComplianceStore>,
    ) -> Self {
        Self { dashboard_repo, site_repo, compliance_repo }
    }

    // 1. Cards do topo
    pub async fn fleet_kpi(&self, identity: &Identity, today: NaiveDate) -> Result<FleetKpi, AppError> {
        let scope = Scope::for_identity(identity);
        let window = KpiWindow::for_day(today);
        let snapshot = self.dashboard_repo.fleet_snapshot(&scope, window).await?;
        Ok(FleetKpi::from_snapshot(&snapshot, window))
    }

    // 2. Mapa: score de 0-100 só com extintores e PIPC
    pub async fn map_snapshot(&self, identity: &Identity, today: NaiveDate) -> Result<Vec<SiteMapEntry>, AppError> {
        let scope = Scope::for_identity(identity);
        let sites = self.site_repo.list_sites_with_state(&scope).await?;

        let extinguishers = self.compliance_repo.list_extinguishers().await?;
        let plans = self.compliance_repo.list_plans().await?;
        let extinguishers: HashMap<Uuid, &ExtinguisherRecord> =
            extinguishers.iter().map(|e| (e.site_id, e)).collect();
        let plans: HashMap<Uuid, &EmergencyPlan> = plans.iter().map(|p| (p.site_id, p)).collect();

        let entries = sites
            .iter()
            .map(|entry| {
                let signals = ComplianceSignals::evaluate(
                    extinguishers.get(&entry.site.id).copied(),
                    plans.get(&entry.site.id).copied(),
                    &[],
                    today,
                );
                SiteMapEntry::new(entry, signals.map_score())
            })
            .collect();

        Ok(entries)
    }

    // 3. Tendências dos últimos 180 dias
    pub async fn trends(&self, identity: &Identity, now: NaiveDateTime) -> Result<TrendSeries, AppError> {
        let scope = Scope::for_identity(identity);
        let since = trend_start(now);
        let activity = self
            .dashboard_repo
            .activity(&scope, Some(since), Some(since.date()))
            .await?;
        Ok(TrendSeries::from_activity(&activity, since))
    }

    // 4. Resumo de um CEDIS
    pub async fn site_summary(
        &self,
        identity: &Identity,
        site_id: Uuid,
        today: NaiveDate,
    ) -> Result<SiteSummary, AppError> {
        let site = self
            .site_repo
            .find_site(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;
        Scope::for_identity(identity).ensure_site(&site)?;

        let first_of_year = year_start(today);
        let activity = self
            .dashboard_repo
            .activity(&Scope::for_site(site_id), None, Some(first_of_year))
            .await?;
        let statistics = SiteStatistics::from_activity(&activity, site_id, first_of_year);
        let extinguisher = self.compliance_repo.find_extinguisher(site_id).await?;
        let plan = self.compliance_repo.find_plan(site_id).await?;

        // Sem registro: "não cumpre" / "Pending"
        let civil_protection = CivilProtectionSnapshot {
            extinguishers_compliant: extinguisher.is_some_and(|e| e.compliant),
            plan_status: plan
                .as_ref()
                .map_or_else(|| DEFAULT_PLAN_STATUS.to_string(), |p| p.status.clone()),
            plan_expires_on: plan.and_then(|p| p.expires_on),
        };

        Ok(SiteSummary {
            site: SiteHeader {
                id: site.id,
                name: site.name,
                code: site.code,
                municipality: site.municipality,
                headcount: site.headcount,
            },
            statistics,
            civil_protection,
        })
    }
}
