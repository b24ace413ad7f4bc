// src/models/expense.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_EXPENSE_STATUS: &str = "Pendiente";

/// Quantos CEDIS aparecem no ranking de gastos.
pub const TOP_SITES_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: Uuid,
    #[schema(example = "Vigilancia")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "#1f77b4")]
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub spent_on: NaiveDate,
    pub site_id: Uuid,
    pub organization_id: Uuid,
    pub category_id: Option<Uuid>,
    pub provider: Option<String>,
    pub description: Option<String>,
    #[schema(example = "1500.50")]
    pub amount: Decimal,
    pub payment_method: Option<String>,
    pub invoice_number: Option<String>,
    #[schema(example = "Pendiente")]
    pub status: String,
    pub notes: Option<String>,
    pub registered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El monto no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub spent_on: NaiveDate,

    pub site_id: Uuid,
    pub category_id: Option<Uuid>,
    pub provider: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "1500.50")]
    pub amount: Decimal,

    pub payment_method: Option<String>,
    pub invoice_number: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

// --- Agregações ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteTotal {
    pub site: String,
    pub total: Decimal,
}

// Mês do calendário (1-12), anos colapsados
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthTotal {
    pub month: i32,
    pub total: Decimal,
}

// Série de tendência: (ano, mês)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStats {
    pub total: Decimal,
    pub by_category: Vec<CategoryTotal>,
    pub by_site: Vec<SiteTotal>,
    pub by_month: Vec<CalendarMonthTotal>,
}

/// O que as agregações leem de cada gasto (já filtrado pelo escopo).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpenseFact {
    pub site_id: Uuid,
    pub site_name: String,
    pub category: Option<String>,
    pub spent_on: NaiveDate,
    pub amount: Decimal,
}

impl ExpenseStats {
    /// Sem gastos, o total é zero. Gastos sem categoria entram no total
    /// mas não em `by_category`.
    pub fn from_facts(facts: &[ExpenseFact]) -> Self {
        let mut total = Decimal::ZERO;
        let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut by_site: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut by_month: BTreeMap<i32, Decimal> = BTreeMap::new();

        for fact in facts {
            total += fact.amount;
            if let Some(category) = fact.category.as_deref() {
                *by_category.entry(category).or_default() += fact.amount;
            }
            *by_site.entry(fact.site_name.as_str()).or_default() += fact.amount;
            *by_month.entry(fact.spent_on.month() as i32).or_default() += fact.amount;
        }

        // Maior soma primeiro; empate pelo nome
        let mut by_site: Vec<SiteTotal> = by_site
            .into_iter()
            .map(|(site, total)| SiteTotal { site: site.to_string(), total })
            .collect();
        by_site.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.site.cmp(&b.site)));
        by_site.truncate(TOP_SITES_LIMIT);

        Self {
            total,
            by_category: by_category
                .into_iter()
                .map(|(category, total)| CategoryTotal { category: category.to_string(), total })
                .collect(),
            by_site,
            by_month: by_month
                .into_iter()
                .map(|(month, total)| CalendarMonthTotal { month, total })
                .collect(),
        }
    }
}
