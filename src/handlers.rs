pub mod auth;
pub mod civil_protection;
pub mod dashboard;
pub mod events;
pub mod expenses;
pub mod sites;
