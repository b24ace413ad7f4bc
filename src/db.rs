pub mod store;
pub use store::{ComplianceStore, DashboardStore, EventStore, ExpenseStore, SiteStore, UserStore};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod site_repo;
pub use site_repo::SiteRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
pub mod compliance_repo;
pub use compliance_repo::ComplianceRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

#[cfg(test)]
pub mod memory_store;
