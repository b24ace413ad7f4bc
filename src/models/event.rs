// src/models/event.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: Uuid,
    #[schema(value_type = String, format = DateTime, example = "2026-03-14T22:15:00")]
    pub occurred_at: NaiveDateTime,
    pub site_id: Uuid,
    pub organization_id: Uuid,
    #[schema(example = "Robo")]
    pub event_type: String,
    pub state_label: Option<String>,
    pub description: Option<String>,
    pub observations: Option<String>,
    pub responsible: Option<String>,
    pub status: Option<String>,

    // Derivados de `occurred_at` na criação; nunca recalculados.
    #[schema(example = "March")]
    pub month_name: String,
    #[schema(example = "Saturday")]
    pub weekday_name: String,
    #[schema(example = "22:15")]
    pub hour_of_day: String,

    pub registered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSecurityEvent {
    #[schema(value_type = String, format = DateTime, example = "2026-03-14T22:15:00")]
    pub occurred_at: NaiveDateTime,

    pub site_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "El tipo de evento es obligatorio."))]
    #[schema(example = "Robo")]
    pub event_type: String,

    pub state_label: Option<String>,
    pub description: Option<String>,
    pub observations: Option<String>,
    pub responsible: Option<String>,
    pub status: Option<String>,
}

/// Campos temporais gravados junto com o evento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedEventFields {
    pub month_name: String,
    pub weekday_name: String,
    pub hour_of_day: String,
}

impl DerivedEventFields {
    pub fn from_timestamp(occurred_at: NaiveDateTime) -> Self {
        Self {
            month_name: occurred_at.format("%B").to_string(),
            weekday_name: occurred_at.format("%A").to_string(),
            hour_of_day: occurred_at.format("%H:%M").to_string(),
        }
    }
}

// --- Estatísticas ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}

// Mês do calendário (1-12), anos colapsados
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthCount {
    pub month: i32,
    pub count: i64,
}

// Série de tendência: (ano, mês)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total: i64,
    pub by_type: Vec<EventTypeCount>,
    pub by_month: Vec<CalendarMonthCount>,
}

/// O que as agregações leem de cada evento (já filtrado pelo escopo).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct EventFact {
    pub site_id: Uuid,
    pub event_type: String,
    pub occurred_at: NaiveDateTime,
}

impl EventStats {
    /// Tipos em ordem alfabética; meses 1-12 com os anos somados.
    pub fn from_facts(facts: &[EventFact]) -> Self {
        let mut by_type: BTreeMap<&str, i64> = BTreeMap::new();
        let mut by_month: BTreeMap<i32, i64> = BTreeMap::new();
        for fact in facts {
            *by_type.entry(fact.event_type.as_str()).or_default() += 1;
            *by_month.entry(fact.occurred_at.month() as i32).or_default() += 1;
        }

        Self {
            total: facts.len() as i64,
            by_type: by_type
                .into_iter()
                .map(|(event_type, count)| EventTypeCount {
                    event_type: event_type.to_string(),
                    count,
                })
                .collect(),
            by_month: by_month
                .into_iter()
                .map(|(month, count)| CalendarMonthCount { month, count })
                .collect(),
        }
    }
}
