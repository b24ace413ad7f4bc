// src/db/compliance_repo.rs

// ---
// Proteção Civil: extintores, PIPC e dictámenes.
// Todas as escritas são um único `INSERT ... ON CONFLICT ... RETURNING`,
// atômico por chave (o Postgres serializa conflitos na constraint UNIQUE).
// ---

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_write_error, error::AppError},
    db::store::ComplianceStore,
    models::compliance::{
        CertificateInput, EmergencyPlan, EmergencyPlanInput, ExtinguisherRecord,
        ExtinguisherUpsert, InspectionCertificate,
    },
};

#[derive(Clone)]
pub struct ComplianceRepository {
    pool: PgPool,
}

impl ComplianceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplianceStore for ComplianceRepository {
    // =========================================================================
    //  EXTINTORES
    // =========================================================================

    async fn list_extinguishers(&self) -> Result<Vec<ExtinguisherRecord>, AppError> {
        let records = sqlx::query_as::<_, ExtinguisherRecord>(
            "SELECT * FROM extinguisher_records ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn find_extinguisher(&self, site_id: Uuid) -> Result<Option<ExtinguisherRecord>, AppError> {
        let record = sqlx::query_as::<_, ExtinguisherRecord>(
            "SELECT * FROM extinguisher_records WHERE site_id = $1",
        )
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    // Total e compliant chegam já derivados; o par é gravado junto ou nada.
    async fn upsert_extinguisher(&self, record: &ExtinguisherUpsert) -> Result<ExtinguisherRecord, AppError> {
        let input = &record.input;

        let saved = sqlx::query_as::<_, ExtinguisherRecord>(
            r#"
            INSERT INTO extinguisher_records (
                site_id, risk_classification, required_count, pqs_count, co2_count,
                total_count, compliant, recharge_date, provider, cost, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (site_id) DO UPDATE SET
                risk_classification = EXCLUDED.risk_classification,
                required_count      = EXCLUDED.required_count,
                pqs_count           = EXCLUDED.pqs_count,
                co2_count           = EXCLUDED.co2_count,
                total_count         = EXCLUDED.total_count,
                compliant           = EXCLUDED.compliant,
                recharge_date       = EXCLUDED.recharge_date,
                provider            = EXCLUDED.provider,
                cost                = EXCLUDED.cost,
                notes               = EXCLUDED.notes,
                updated_at          = NOW()
            RETURNING *
            "#,
        )
        .bind(input.site_id)
        .bind(&input.risk_classification)
        .bind(input.required_count)
        .bind(input.pqs_count)
        .bind(input.co2_count)
        .bind(record.total_count)
        .bind(record.compliant)
        .bind(input.recharge_date)
        .bind(&input.provider)
        .bind(input.cost)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(saved)
    }

    // =========================================================================
    //  PIPC
    // =========================================================================

    async fn list_plans(&self) -> Result<Vec<EmergencyPlan>, AppError> {
        let plans = sqlx::query_as::<_, EmergencyPlan>(
            "SELECT * FROM emergency_plans ORDER BY expires_on ASC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    async fn find_plan(&self, site_id: Uuid) -> Result<Option<EmergencyPlan>, AppError> {
        let plan = sqlx::query_as::<_, EmergencyPlan>("SELECT * FROM emergency_plans WHERE site_id = $1")
            .bind(site_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    async fn upsert_plan(&self, plan: &EmergencyPlanInput) -> Result<EmergencyPlan, AppError> {
        let saved = sqlx::query_as::<_, EmergencyPlan>(
            r#"
            INSERT INTO emergency_plans (
                site_id, approved_on, expires_on, status, provider, cost, document_url, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (site_id) DO UPDATE SET
                approved_on  = EXCLUDED.approved_on,
                expires_on   = EXCLUDED.expires_on,
                status       = EXCLUDED.status,
                provider     = EXCLUDED.provider,
                cost         = EXCLUDED.cost,
                document_url = EXCLUDED.document_url,
                notes        = EXCLUDED.notes,
                updated_at   = NOW()
            RETURNING *
            "#,
        )
        .bind(plan.site_id)
        .bind(plan.approved_on)
        .bind(plan.expires_on)
        .bind(&plan.status)
        .bind(&plan.provider)
        .bind(plan.cost)
        .bind(&plan.document_url)
        .bind(&plan.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(saved)
    }

    // =========================================================================
    //  DICTÁMENES
    // =========================================================================

    async fn list_certificates(&self) -> Result<Vec<InspectionCertificate>, AppError> {
        let certificates = sqlx::query_as::<_, InspectionCertificate>(
            "SELECT * FROM inspection_certificates ORDER BY site_id, discipline",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(certificates)
    }

    async fn certificates_for_site(&self, site_id: Uuid) -> Result<Vec<InspectionCertificate>, AppError> {
        let certificates = sqlx::query_as::<_, InspectionCertificate>(
            "SELECT * FROM inspection_certificates WHERE site_id = $1 ORDER BY discipline",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(certificates)
    }

    // No conflito só o status muda; o resto fica como no primeiro INSERT.
    async fn upsert_certificate(&self, certificate: &CertificateInput) -> Result<InspectionCertificate, AppError> {
        let saved = sqlx::query_as::<_, InspectionCertificate>(
            r#"
            INSERT INTO inspection_certificates (
                site_id, discipline, has_certificate, status, issued_on, expires_on,
                provider, cost, document_url, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ON CONSTRAINT inspection_certificates_site_discipline_key DO UPDATE SET
                status     = EXCLUDED.status,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(certificate.site_id)
        .bind(certificate.discipline)
        .bind(certificate.has_certificate)
        .bind(&certificate.status)
        .bind(certificate.issued_on)
        .bind(certificate.expires_on)
        .bind(&certificate.provider)
        .bind(certificate.cost)
        .bind(&certificate.document_url)
        .bind(&certificate.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(saved)
    }
}
