pub mod auth;
pub use auth::AuthService;
pub mod site_service;
pub use site_service::SiteService;
pub mod event_service;
pub use event_service::EventService;
pub mod expense_service;
pub use expense_service::ExpenseService;
pub mod compliance_service;
pub use compliance_service::ComplianceService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
