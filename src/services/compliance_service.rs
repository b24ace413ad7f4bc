// src/services/compliance_service.rs

// ---
// Motor de compliance (Proteção Civil).
// Escritas: upserts por CEDIS, sempre dentro do escopo do chamador.
// Leituras: frota inteira, sem escopo (comportamento herdado; ver DESIGN.md).
// ---

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, scope::Scope},
    db::{ComplianceStore, SiteStore},
    models::{
        auth::Identity,
        compliance::{
            CertificateInput, ComplianceSignals, EmergencyPlan, EmergencyPlanInput,
            ExtinguisherInput, ExtinguisherRecord, InspectionCertificate, SiteCompliance,
        },
    },
};

#[derive(Clone)]
pub struct ComplianceService {
    compliance_repo: Arc<dyn ComplianceStore>,
    site_repo: Arc<dyn SiteStore>,
}

impl ComplianceService {
    pub fn new(compliance_repo: Arc<dyn ComplianceStore>, site_repo: Arc<dyn SiteStore>) -> Self {
        Self { compliance_repo, site_repo }
    }

    // CEDIS existe e está no escopo de quem escreve
    async fn ensure_writable_site(&self, identity: &Identity, site_id: Uuid) -> Result<(), AppError> {
        let site = self
            .site_repo
            .find_site(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;
        Scope::for_identity(identity).ensure_site(&site)
    }

    // =========================================================================
    //  EXTINTORES
    // =========================================================================

    pub async fn list_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>, AppError> {
        self.compliance_repo.list_extinguishers().await
    }

    pub async fn get_extinguisher(&self, site_id: Uuid) -> Result<ExtinguisherRecord, AppError> {
        self.compliance_repo
            .find_extinguisher(site_id)
            .await?
            .ok_or(AppError::ExtinguisherRecordNotFound)
    }

    /// Cria ou substitui o registro do CEDIS. `total` e `compliant` são
    /// recalculados a cada chamada.
    pub async fn upsert_extinguisher(
        &self,
        identity: &Identity,
        input: ExtinguisherInput,
    ) -> Result<ExtinguisherRecord, AppError> {
        input.validate()?;
        self.ensure_writable_site(identity, input.site_id).await?;

        let upsert = input.into_upsert();
        let record = self.compliance_repo.upsert_extinguisher(&upsert).await?;

        tracing::info!(
            site_id = %record.site_id,
            total = record.total_count,
            required = record.required_count,
            compliant = record.compliant,
            "🧯 Extintores atualizados"
        );
        Ok(record)
    }

    // =========================================================================
    //  PIPC
    // =========================================================================

    pub async fn list_plans(&self) -> Result<Vec<EmergencyPlan>, AppError> {
        self.compliance_repo.list_plans().await
    }

    pub async fn get_plan(&self, site_id: Uuid) -> Result<EmergencyPlan, AppError> {
        self.compliance_repo
            .find_plan(site_id)
            .await?
            .ok_or(AppError::EmergencyPlanNotFound)
    }

    pub async fn upsert_plan(
        &self,
        identity: &Identity,
        input: EmergencyPlanInput,
    ) -> Result<EmergencyPlan, AppError> {
        input.validate()?;
        self.ensure_writable_site(identity, input.site_id).await?;

        let plan = self.compliance_repo.upsert_plan(&input).await?;

        tracing::info!(
            site_id = %plan.site_id,
            expires_on = ?plan.expires_on,
            status = %plan.status,
            "📋 PIPC atualizado"
        );
        Ok(plan)
    }

    // =========================================================================
    //  DICTÁMENES
    // =========================================================================

    pub async fn certificates_for_site(&self, site_id: Uuid) -> Result<Vec<InspectionCertificate>, AppError> {
        self.compliance_repo.certificates_for_site(site_id).await
    }

    pub async fn upsert_certificate(
        &self,
        identity: &Identity,
        input: CertificateInput,
    ) -> Result<InspectionCertificate, AppError> {
        input.validate()?;
        self.ensure_writable_site(identity, input.site_id).await?;

        let certificate = self.compliance_repo.upsert_certificate(&input).await?;

        tracing::info!(
            site_id = %certificate.site_id,
            discipline = ?certificate.discipline,
            status = ?certificate.status,
            "📑 Dictamen atualizado"
        );
        Ok(certificate)
    }

    // =========================================================================
    //  SCORE
    // =========================================================================

    /// Score de um CEDIS (0-100).
    pub async fn site_compliance(&self, site_id: Uuid, today: NaiveDate) -> Result<SiteCompliance, AppError> {
        let site = self
            .site_repo
            .find_site(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;

        let extinguisher = self.compliance_repo.find_extinguisher(site_id).await?;
        let plan = self.compliance_repo.find_plan(site_id).await?;
        let certificates = self.compliance_repo.certificates_for_site(site_id).await?;
        let certificates: Vec<&InspectionCertificate> = certificates.iter().collect();

        let signals =
            ComplianceSignals::evaluate(extinguisher.as_ref(), plan.as_ref(), &certificates, today);
        Ok(SiteCompliance::new(site.id, site.name, signals))
    }

    /// Uma linha por CEDIS da frota. Não aplica o escopo do chamador.
    pub async fn fleet_summary(&self, identity: &Identity, today: NaiveDate) -> Result<Vec<SiteCompliance>, AppError> {
        tracing::debug!(user_id = %identity.user_id, "Resumo de compliance da frota");

        let sites = self.site_repo.list_sites_with_state(&Scope::unrestricted()).await?;
        let extinguishers = self.compliance_repo.list_extinguishers().await?;
        let plans = self.compliance_repo.list_plans().await?;
        let certificates = self.compliance_repo.list_certificates().await?;

        let extinguishers: HashMap<Uuid, &ExtinguisherRecord> =
            extinguishers.iter().map(|e| (e.site_id, e)).collect();
        let plans: HashMap<Uuid, &EmergencyPlan> = plans.iter().map(|p| (p.site_id, p)).collect();
        let mut certificates_by_site: HashMap<Uuid, Vec<&InspectionCertificate>> = HashMap::new();
        for certificate in &certificates {
            certificates_by_site.entry(certificate.site_id).or_default().push(certificate);
        }

        let summary = sites
            .into_iter()
            .map(|entry| {
                let site_id = entry.site.id;
                let signals = ComplianceSignals::evaluate(
                    extinguishers.get(&site_id).copied(),
                    plans.get(&site_id).copied(),
                    certificates_by_site.get(&site_id).map(Vec::as_slice).unwrap_or_default(),
                    today,
                );
                SiteCompliance::new(site_id, entry.site.name, signals)
            })
            .collect();

        Ok(summary)
    }
}
