// src/models/compliance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Único status que conta como dictamen ativo. Comparação literal.
pub const ACTIVE_CERTIFICATE_STATUS: &str = "Vigente";

pub const DEFAULT_PLAN_STATUS: &str = "Pending";

/// Pontos por sinal no score de compliance (4 sinais).
pub const POINTS_PER_SIGNAL: i32 = 25;

/// Pontos por sinal no score do mapa (2 sinais).
pub const MAP_POINTS_PER_SIGNAL: i32 = 50;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "certificate_discipline", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateDiscipline {
    Structural, // Estructural
    Electrical, // Eléctrico
}

// =============================================================================
//  EXTINTORES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtinguisherRecord {
    pub id: Uuid,
    pub site_id: Uuid,
    pub risk_classification: Option<String>,
    pub required_count: i32,
    pub pqs_count: i32,
    pub co2_count: i32,
    // Cache derivado: recalculado em toda escrita
    pub total_count: i32,
    pub compliant: bool,
    #[schema(value_type = Option<String>, format = Date)]
    pub recharge_date: Option<NaiveDate>,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_optional_cost(cost: &Option<Decimal>) -> Result<(), ValidationError> {
    if cost.is_some_and(|c| c.is_sign_negative()) {
        let mut err = ValidationError::new("range");
        err.message = Some("El costo no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_extinguisher_input(input: &ExtinguisherInput) -> Result<(), ValidationError> {
    validate_optional_cost(&input.cost)
}

// Teto por contagem; a soma pqs + co2 cabe folgada em `i32`.
pub const MAX_EXTINGUISHER_COUNT: i32 = 100_000;

// `total`/`compliant` enviados pelo cliente são ignorados (não existem aqui).
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_extinguisher_input"))]
pub struct ExtinguisherInput {
    pub site_id: Uuid,
    #[schema(example = "Alto")]
    pub risk_classification: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = MAX_EXTINGUISHER_COUNT, message = "Debe estar entre 0 y 100000."))]
    pub required_count: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = MAX_EXTINGUISHER_COUNT, message = "Debe estar entre 0 y 100000."))]
    pub pqs_count: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = MAX_EXTINGUISHER_COUNT, message = "Debe estar entre 0 y 100000."))]
    pub co2_count: i32,
    #[schema(value_type = Option<String>, format = Date)]
    pub recharge_date: Option<NaiveDate>,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

/// Linha pronta para o upsert: entrada + par derivado.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtinguisherUpsert {
    pub input: ExtinguisherInput,
    pub total_count: i32,
    pub compliant: bool,
}

impl ExtinguisherInput {
    /// `total = pqs + co2` e `compliant = total >= required`, sempre.
    pub fn into_upsert(self) -> ExtinguisherUpsert {
        let total_count = self.pqs_count.saturating_add(self.co2_count);
        let compliant = total_count >= self.required_count;

        ExtinguisherUpsert {
            input: self,
            total_count,
            compliant,
        }
    }
}

// =============================================================================
//  PIPC (Programa Interno de Protección Civil)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyPlan {
    pub id: Uuid,
    pub site_id: Uuid,
    #[schema(value_type = Option<String>, format = Date)]
    pub approved_on: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<NaiveDate>,
    #[schema(example = "Pending")]
    pub status: String,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub document_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmergencyPlan {
    /// Compliance do PIPC é derivada na leitura, nunca gravada.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.expires_on.is_some_and(|expires_on| expires_on >= today)
    }
}

/// Sem PIPC => não cumpre.
pub fn plan_is_current(plan: Option<&EmergencyPlan>, today: NaiveDate) -> bool {
    plan.is_some_and(|plan| plan.is_current(today))
}

fn default_plan_status() -> String {
    DEFAULT_PLAN_STATUS.to_string()
}

fn validate_plan_input(input: &EmergencyPlanInput) -> Result<(), ValidationError> {
    validate_optional_cost(&input.cost)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_plan_input"))]
pub struct EmergencyPlanInput {
    pub site_id: Uuid,
    #[schema(value_type = Option<String>, format = Date)]
    pub approved_on: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default = "default_plan_status")]
    #[validate(length(min = 1, max = 50))]
    pub status: String,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub document_url: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
//  DICTÁMENES (Estrutural / Elétrico)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionCertificate {
    pub id: Uuid,
    pub site_id: Uuid,
    pub discipline: CertificateDiscipline,
    pub has_certificate: bool,
    #[schema(example = "Vigente")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub issued_on: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<NaiveDate>,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub document_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionCertificate {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_CERTIFICATE_STATUS)
    }
}

fn validate_certificate_input(input: &CertificateInput) -> Result<(), ValidationError> {
    validate_optional_cost(&input.cost)
}

// No conflito (site, disciplina) só o `status` é sobrescrito.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_certificate_input"))]
pub struct CertificateInput {
    pub site_id: Uuid,
    pub discipline: CertificateDiscipline,
    #[serde(default)]
    pub has_certificate: bool,
    #[schema(example = "Vigente")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub issued_on: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<NaiveDate>,
    pub provider: Option<String>,
    pub cost: Option<Decimal>,
    pub document_url: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
//  SCORE
// =============================================================================

/// Os quatro sinais independentes de compliance de um CEDIS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSignals {
    pub extinguishers_compliant: bool,
    pub plan_current: bool,
    pub structural_certificate: bool,
    pub electrical_certificate: bool,
}

impl ComplianceSignals {
    pub fn evaluate(
        extinguisher: Option<&ExtinguisherRecord>,
        plan: Option<&EmergencyPlan>,
        certificates: &[&InspectionCertificate],
        today: NaiveDate,
    ) -> Self {
        let active = |discipline: CertificateDiscipline| {
            certificates
                .iter()
                .any(|c| c.discipline == discipline && c.is_active())
        };

        Self {
            extinguishers_compliant: extinguisher.is_some_and(|e| e.compliant),
            plan_current: plan_is_current(plan, today),
            structural_certificate: active(CertificateDiscipline::Structural),
            electrical_certificate: active(CertificateDiscipline::Electrical),
        }
    }

    /// 0, 25, 50, 75 ou 100.
    pub fn score(&self) -> i32 {
        [
            self.extinguishers_compliant,
            self.plan_current,
            self.structural_certificate,
            self.electrical_certificate,
        ]
        .into_iter()
        .filter(|signal| *signal)
        .count() as i32
            * POINTS_PER_SIGNAL
    }

    /// Score do mapa: só extintores e PIPC, 50 cada.
    pub fn map_score(&self) -> i32 {
        let mut score = 0;
        if self.extinguishers_compliant {
            score += MAP_POINTS_PER_SIGNAL;
        }
        if self.plan_current {
            score += MAP_POINTS_PER_SIGNAL;
        }
        score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteCompliance {
    pub site_id: Uuid,
    pub site_name: String,
    #[serde(flatten)]
    pub signals: ComplianceSignals,
    #[schema(example = 75)]
    pub compliance_score: i32,
}

impl SiteCompliance {
    pub fn new(site_id: Uuid, site_name: String, signals: ComplianceSignals) -> Self {
        Self {
            site_id,
            site_name,
            compliance_score: signals.score(),
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn extinguisher(compliant: bool) -> ExtinguisherRecord {
        ExtinguisherRecord {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            risk_classification: None,
            required_count: 1,
            pqs_count: 1,
            co2_count: 0,
            total_count: 1,
            compliant,
            recharge_date: None,
            provider: None,
            cost: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn plan(expires_on: Option<NaiveDate>) -> EmergencyPlan {
        EmergencyPlan {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            approved_on: None,
            expires_on,
            status: DEFAULT_PLAN_STATUS.to_string(),
            provider: None,
            cost: None,
            document_url: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn certificate(discipline: CertificateDiscipline, status: &str) -> InspectionCertificate {
        InspectionCertificate {
            id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            discipline,
            has_certificate: true,
            status: Some(status.to_string()),
            issued_on: None,
            expires_on: None,
            provider: None,
            cost: None,
            document_url: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(required: i32, pqs: i32, co2: i32) -> ExtinguisherInput {
        ExtinguisherInput {
            site_id: Uuid::nil(),
            risk_classification: None,
            required_count: required,
            pqs_count: pqs,
            co2_count: co2,
            recharge_date: None,
            provider: None,
            cost: None,
            notes: None,
        }
    }

    #[test]
    fn extinguisher_totals_are_derived() {
        let upsert = input(10, 6, 3).into_upsert();
        assert_eq!(upsert.total_count, 9);
        assert!(!upsert.compliant);

        let upsert = input(10, 7, 3).into_upsert();
        assert_eq!(upsert.total_count, 10);
        assert!(upsert.compliant);
    }

    #[test]
    fn derivation_holds_across_a_grid_of_counts() {
        for required in 0..6 {
            for pqs in 0..6 {
                for co2 in 0..6 {
                    let upsert = input(required, pqs, co2).into_upsert();
                    assert_eq!(upsert.total_count, pqs + co2);
                    assert_eq!(upsert.compliant, pqs + co2 >= required);
                }
            }
        }
    }

    #[test]
    fn counts_beyond_the_ceiling_fail_validation_instead_of_overflowing() {
        let payload = serde_json::json!({
            "siteId": Uuid::new_v4(),
            "requiredCount": 1,
            "pqsCount": i32::MAX,
            "co2Count": 1
        });
        let input = serde_json::from_value::<ExtinguisherInput>(payload).unwrap();

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("pqs_count"));
        assert!(!fields.contains_key("co2_count"));

        // Mesmo sem validar, a derivação não estoura
        let upsert = input.into_upsert();
        assert_eq!(upsert.total_count, i32::MAX);
        assert!(upsert.compliant);

        let at_ceiling = input_at_ceiling();
        assert!(at_ceiling.validate().is_ok());
        assert_eq!(at_ceiling.into_upsert().total_count, 2 * MAX_EXTINGUISHER_COUNT);
    }

    fn input_at_ceiling() -> ExtinguisherInput {
        input(MAX_EXTINGUISHER_COUNT, MAX_EXTINGUISHER_COUNT, MAX_EXTINGUISHER_COUNT)
    }

    #[test]
    fn client_supplied_derived_fields_are_ignored_on_deserialize() {
        let payload = serde_json::json!({
            "siteId": Uuid::new_v4(),
            "requiredCount": 10,
            "pqsCount": 6,
            "co2Count": 3,
            "totalCount": 99,
            "compliant": true
        });

        let upsert = serde_json::from_value::<ExtinguisherInput>(payload)
            .unwrap()
            .into_upsert();

        assert_eq!(upsert.total_count, 9);
        assert!(!upsert.compliant);
    }

    #[test]
    fn plan_currency_is_derived_from_expiration() {
        let yesterday = today() - Duration::days(1);
        let tomorrow = today() + Duration::days(1);

        assert!(!plan(Some(yesterday)).is_current(today()));
        assert!(plan(Some(tomorrow)).is_current(today()));
        assert!(plan(Some(today())).is_current(today()));
        assert!(!plan(None).is_current(today()));
        assert!(!plan_is_current(None, today()));
    }

    #[test]
    fn plan_status_defaults_to_pending() {
        let input: EmergencyPlanInput =
            serde_json::from_value(serde_json::json!({ "siteId": Uuid::new_v4() })).unwrap();
        assert_eq!(input.status, "Pending");
    }

    #[test]
    fn active_certificate_requires_the_literal_status() {
        assert!(certificate(CertificateDiscipline::Structural, "Vigente").is_active());
        assert!(!certificate(CertificateDiscipline::Structural, "vigente").is_active());
        assert!(!certificate(CertificateDiscipline::Structural, "Vencido").is_active());
        assert!(!certificate(CertificateDiscipline::Structural, "Active").is_active());
    }

    #[test]
    fn each_signal_adds_exactly_one_bucket() {
        let all = [false, true];
        for e in all {
            for p in all {
                for s in all {
                    for el in all {
                        let signals = ComplianceSignals {
                            extinguishers_compliant: e,
                            plan_current: p,
                            structural_certificate: s,
                            electrical_certificate: el,
                        };
                        let expected = [e, p, s, el].iter().filter(|b| **b).count() as i32 * 25;
                        assert_eq!(signals.score(), expected);
                        assert!([0, 25, 50, 75, 100].contains(&signals.score()));
                    }
                }
            }
        }
    }

    #[test]
    fn evaluate_combines_all_sources() {
        let ext = extinguisher(true);
        let current_plan = plan(Some(today() + Duration::days(10)));
        let structural = certificate(CertificateDiscipline::Structural, "Vigente");
        let electrical = certificate(CertificateDiscipline::Electrical, "Vencido");

        let signals = ComplianceSignals::evaluate(
            Some(&ext),
            Some(&current_plan),
            &[&structural, &electrical],
            today(),
        );

        assert!(signals.extinguishers_compliant);
        assert!(signals.plan_current);
        assert!(signals.structural_certificate);
        assert!(!signals.electrical_certificate);
        assert_eq!(signals.score(), 75);
        assert_eq!(signals.map_score(), 100);
    }

    #[test]
    fn missing_records_score_zero() {
        let signals = ComplianceSignals::evaluate(None, None, &[], today());
        assert_eq!(signals, ComplianceSignals::default());
        assert_eq!(signals.score(), 0);
        assert_eq!(signals.map_score(), 0);
    }

    #[test]
    fn site_compliance_serializes_flat() {
        let row = SiteCompliance::new(
            Uuid::nil(),
            "CEDIS Mérida".into(),
            ComplianceSignals { plan_current: true, ..Default::default() },
        );
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["complianceScore"], 25);
        assert_eq!(json["planCurrent"], true);
        assert_eq!(json["siteName"], "CEDIS Mérida");
    }
}
