// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::logout,

        // --- CEDIS ---
        handlers::sites::list_sites,
        handlers::sites::create_site,
        handlers::sites::get_site,
        handlers::sites::list_states,

        // --- Eventos ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::event_stats,

        // --- Gastos ---
        handlers::expenses::list_expenses,
        handlers::expenses::create_expense,
        handlers::expenses::expense_stats,
        handlers::expenses::list_categories,

        // --- Proteção Civil ---
        handlers::civil_protection::list_extinguishers,
        handlers::civil_protection::get_extinguisher,
        handlers::civil_protection::upsert_extinguisher,
        handlers::civil_protection::list_plans,
        handlers::civil_protection::get_plan,
        handlers::civil_protection::upsert_plan,
        handlers::civil_protection::certificates_for_site,
        handlers::civil_protection::upsert_certificate,
        handlers::civil_protection::fleet_compliance,
        handlers::civil_protection::site_compliance,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_map,
        handlers::dashboard::get_trends,
        handlers::dashboard::get_site_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::LogoutResponse,

            // --- CEDIS ---
            models::site::State,
            models::site::Site,
            models::site::NewSite,
            models::site::SiteMapEntry,

            // --- Eventos ---
            models::event::SecurityEvent,
            models::event::NewSecurityEvent,
            models::event::EventTypeCount,
            models::event::CalendarMonthCount,
            models::event::MonthlyCount,
            models::event::EventStats,

            // --- Gastos ---
            models::expense::ExpenseCategory,
            models::expense::Expense,
            models::expense::NewExpense,
            models::expense::CategoryTotal,
            models::expense::SiteTotal,
            models::expense::CalendarMonthTotal,
            models::expense::MonthlyTotal,
            models::expense::ExpenseStats,

            // --- Proteção Civil ---
            models::compliance::CertificateDiscipline,
            models::compliance::ExtinguisherRecord,
            models::compliance::ExtinguisherInput,
            models::compliance::EmergencyPlan,
            models::compliance::EmergencyPlanInput,
            models::compliance::InspectionCertificate,
            models::compliance::CertificateInput,
            models::compliance::ComplianceSignals,
            models::compliance::SiteCompliance,

            // --- Dashboard ---
            models::dashboard::FleetKpi,
            models::dashboard::TrendSeries,
            models::dashboard::SiteSummary,
            models::dashboard::SiteHeader,
            models::dashboard::SiteStatistics,
            models::dashboard::CivilProtectionSnapshot,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "CEDIS", description = "Cadastro de CEDIS e catálogo de estados"),
        (name = "Eventos", description = "Eventos de segurança"),
        (name = "Gastos", description = "Gastos por CEDIS"),
        (name = "Proteção Civil", description = "Extintores, PIPC, dictámenes e score de compliance"),
        (name = "Dashboard", description = "Indicadores, mapa e tendências")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
