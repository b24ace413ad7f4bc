// src/models/query.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 500;

// ?skip=0&limit=100
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_PAGE_LIMIT }
    }
}

impl Pagination {
    // Valores fora da faixa são corrigidos em vez de rejeitados.
    pub fn normalized(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    pub site_id: Option<Uuid>,
    pub event_type: Option<String>,
    #[param(value_type = Option<String>, format = DateTime)]
    pub from: Option<NaiveDateTime>,
    #[param(value_type = Option<String>, format = DateTime)]
    pub to: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseFilter {
    pub site_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}
