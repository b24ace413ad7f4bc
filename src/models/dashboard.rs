// src/models/dashboard.rs

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::event::{EventFact, MonthlyCount};
use crate::models::expense::{ExpenseFact, MonthlyTotal};

// 1. Cards do topo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetKpi {
    pub site_count: i64,
    pub event_count: i64,
    #[schema(example = "150.00")]
    pub current_month_expenses: Decimal, // 1º dia do mês até hoje
    pub upcoming_expirations: i64,       // PIPC vencendo nos próximos 30 dias
}

// 2. Gráficos de tendência (últimos 180 dias)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub events: Vec<MonthlyCount>,
    pub expenses: Vec<MonthlyTotal>,
}

// 3. Resumo de um CEDIS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub site: SiteHeader,
    pub statistics: SiteStatistics,
    pub civil_protection: CivilProtectionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteHeader {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub municipality: String,
    pub headcount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatistics {
    pub event_count: i64,         // desde sempre
    pub year_to_date_expenses: Decimal, // ano corrente
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CivilProtectionSnapshot {
    pub extinguishers_compliant: bool,
    #[schema(example = "Pending")]
    pub plan_status: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub plan_expires_on: Option<NaiveDate>,
}

pub const ALERT_HORIZON_DAYS: i64 = 30;
pub const TREND_LOOKBACK_DAYS: i64 = 180;

/// Janelas de tempo dos cards do topo, calculadas a partir de `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiWindow {
    pub month_start: NaiveDate,
    pub today: NaiveDate,
    pub alert_horizon: NaiveDate,
}

impl KpiWindow {
    pub fn for_day(today: NaiveDate) -> Self {
        Self {
            month_start: today.with_day(1).unwrap_or(today),
            today,
            alert_horizon: today + Duration::days(ALERT_HORIZON_DAYS),
        }
    }
}

// --- Fatos lidos do banco; as regras de janela ficam abaixo ---

/// Leitura única (uma transação) para os cards do topo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetSnapshot {
    pub site_count: i64,
    pub event_count: i64,
    /// Gastos visíveis a partir do 1º dia do mês.
    pub expenses: Vec<ExpenseFact>,
    /// Vencimentos de PIPC da frota inteira (sem escopo).
    pub plan_expirations: Vec<NaiveDate>,
}

/// Eventos e gastos visíveis a partir de um corte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    pub events: Vec<EventFact>,
    pub expenses: Vec<ExpenseFact>,
}

impl FleetKpi {
    pub fn from_snapshot(snapshot: &FleetSnapshot, window: KpiWindow) -> Self {
        let current_month_expenses = snapshot
            .expenses
            .iter()
            .filter(|g| g.spent_on >= window.month_start && g.spent_on <= window.today)
            .map(|g| g.amount)
            .sum();

        let upcoming_expirations = snapshot
            .plan_expirations
            .iter()
            .filter(|d| **d >= window.today && **d <= window.alert_horizon)
            .count() as i64;

        Self {
            site_count: snapshot.site_count,
            event_count: snapshot.event_count,
            current_month_expenses,
            upcoming_expirations,
        }
    }
}

impl TrendSeries {
    /// Baldes (ano, mês) em ordem crescente. Gastos usam só a data do corte.
    pub fn from_activity(activity: &Activity, since: NaiveDateTime) -> Self {
        let mut events: BTreeMap<(i32, i32), i64> = BTreeMap::new();
        for fact in activity.events.iter().filter(|e| e.occurred_at >= since) {
            let key = (fact.occurred_at.year(), fact.occurred_at.month() as i32);
            *events.entry(key).or_default() += 1;
        }

        let mut expenses: BTreeMap<(i32, i32), Decimal> = BTreeMap::new();
        for fact in activity.expenses.iter().filter(|g| g.spent_on >= since.date()) {
            let key = (fact.spent_on.year(), fact.spent_on.month() as i32);
            *expenses.entry(key).or_default() += fact.amount;
        }

        Self {
            events: events
                .into_iter()
                .map(|((year, month), count)| MonthlyCount { year, month, count })
                .collect(),
            expenses: expenses
                .into_iter()
                .map(|((year, month), total)| MonthlyTotal { year, month, total })
                .collect(),
        }
    }
}

impl SiteStatistics {
    /// Eventos de sempre; gastos a partir de `year_start`.
    pub fn from_activity(activity: &Activity, site_id: Uuid, year_start: NaiveDate) -> Self {
        Self {
            event_count: activity.events.iter().filter(|e| e.site_id == site_id).count() as i64,
            year_to_date_expenses: activity
                .expenses
                .iter()
                .filter(|g| g.site_id == site_id && g.spent_on >= year_start)
                .map(|g| g.amount)
                .sum(),
        }
    }
}

pub fn trend_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(TREND_LOOKBACK_DAYS)
}

pub fn year_start(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn kpi_window_spans_month_start_and_thirty_day_horizon() {
        let window = KpiWindow::for_day(day(2026, 2, 17));
        assert_eq!(window.month_start, day(2026, 2, 1));
        assert_eq!(window.alert_horizon, day(2026, 3, 19));

        let first = KpiWindow::for_day(day(2026, 10, 1));
        assert_eq!(first.month_start, first.today);
    }

    fn expense_on(site_id: Uuid, spent_on: NaiveDate, amount: Decimal) -> ExpenseFact {
        ExpenseFact {
            site_id,
            site_name: "Mérida".into(),
            category: None,
            spent_on,
            amount,
        }
    }

    fn event_at(site_id: Uuid, occurred_at: NaiveDateTime) -> EventFact {
        EventFact { site_id, event_type: "Robo".into(), occurred_at }
    }

    #[test]
    fn kpi_counts_the_month_to_date_and_the_alert_horizon_inclusively() {
        let today = day(2026, 10, 18);
        let site = Uuid::new_v4();
        let snapshot = FleetSnapshot {
            site_count: 3,
            event_count: 3,
            expenses: vec![
                expense_on(site, day(2026, 10, 1), Decimal::new(10000, 2)),
                expense_on(site, today, Decimal::new(5000, 2)),
                // Data futura dentro do mês: fora da janela
                expense_on(site, day(2026, 10, 19), Decimal::new(99900, 2)),
            ],
            plan_expirations: vec![
                today,
                today + Duration::days(30),
                today + Duration::days(31),
                today - Duration::days(1),
            ],
        };

        let kpi = FleetKpi::from_snapshot(&snapshot, KpiWindow::for_day(today));

        assert_eq!(kpi.site_count, 3);
        assert_eq!(kpi.event_count, 3);
        assert_eq!(kpi.current_month_expenses, Decimal::new(15000, 2));
        assert_eq!(kpi.upcoming_expirations, 2);
    }

    #[test]
    fn empty_snapshot_yields_zero_expenses() {
        let kpi = FleetKpi::from_snapshot(&FleetSnapshot::default(), KpiWindow::for_day(day(2026, 1, 1)));
        assert_eq!(kpi.current_month_expenses, Decimal::ZERO);
        assert_eq!(kpi.upcoming_expirations, 0);
    }

    #[test]
    fn trends_bucket_by_year_and_month_across_the_new_year() {
        let since = day(2025, 11, 15).and_hms_opt(12, 0, 0).unwrap();
        let site = Uuid::new_v4();
        let activity = Activity {
            events: vec![
                event_at(site, day(2026, 1, 3).and_hms_opt(1, 0, 0).unwrap()),
                event_at(site, day(2025, 12, 31).and_hms_opt(23, 0, 0).unwrap()),
                event_at(site, day(2025, 11, 15).and_hms_opt(11, 59, 0).unwrap()),
            ],
            expenses: vec![
                // Mesmo dia do corte, antes da hora: entra (só a data conta)
                expense_on(site, day(2025, 11, 15), Decimal::new(1010, 2)),
                expense_on(site, day(2025, 11, 20), Decimal::new(20, 2)),
                expense_on(site, day(2025, 11, 14), Decimal::new(500, 2)),
            ],
        };

        let trends = TrendSeries::from_activity(&activity, since);

        let keys: Vec<(i32, i32)> = trends.events.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(keys, vec![(2025, 12), (2026, 1)]);
        assert_eq!(
            trends.expenses,
            vec![MonthlyTotal { year: 2025, month: 11, total: Decimal::new(1030, 2) }]
        );
    }

    #[test]
    fn site_statistics_keep_all_events_and_this_year_expenses() {
        let (site, other) = (Uuid::new_v4(), Uuid::new_v4());
        let activity = Activity {
            events: vec![
                event_at(site, day(2023, 5, 1).and_hms_opt(0, 0, 0).unwrap()),
                event_at(other, day(2026, 5, 1).and_hms_opt(0, 0, 0).unwrap()),
            ],
            expenses: vec![
                expense_on(site, day(2025, 12, 31), Decimal::new(500, 2)),
                expense_on(site, day(2026, 1, 1), Decimal::new(700, 2)),
                expense_on(other, day(2026, 2, 1), Decimal::new(900, 2)),
            ],
        };

        let stats = SiteStatistics::from_activity(&activity, site, year_start(day(2026, 10, 18)));

        assert_eq!(stats.event_count, 1);
        assert_eq!(stats.year_to_date_expenses, Decimal::new(700, 2));
    }

    #[test]
    fn trend_and_year_boundaries() {
        let now = day(2026, 10, 18).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(trend_start(now).date(), day(2026, 4, 21));
        assert_eq!(year_start(day(2026, 10, 18)), day(2026, 1, 1));
    }
}
