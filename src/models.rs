pub mod auth;
pub mod compliance;
pub mod dashboard;
pub mod event;
pub mod expense;
pub mod query;
pub mod site;
