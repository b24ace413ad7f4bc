// src/services/expense_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{error::AppError, scope::Scope},
    db::{store::ExpenseInsert, ExpenseStore, SiteStore},
    models::{
        auth::Identity,
        expense::{Expense, ExpenseCategory, ExpenseStats, NewExpense, DEFAULT_EXPENSE_STATUS},
        query::{ExpenseFilter, Pagination},
    },
};

#[derive(Clone)]
pub struct ExpenseService {
    expense_repo: Arc<dyn ExpenseStore>,
    site_repo: Arc<dyn SiteStore>,
}

impl ExpenseService {
    pub fn new(expense_repo: Arc<dyn ExpenseStore>, site_repo: Arc<dyn SiteStore>) -> Self {
        Self { expense_repo, site_repo }
    }

    pub async fn list_expenses(
        &self,
        identity: &Identity,
        filter: &ExpenseFilter,
        page: Pagination,
    ) -> Result<Vec<Expense>, AppError> {
        let scope = Scope::for_identity(identity);
        self.expense_repo.list_expenses(&scope, filter, page).await
    }

    pub async fn create_expense(&self, identity: &Identity, payload: NewExpense) -> Result<Expense, AppError> {
        payload.validate()?;

        let site = self
            .site_repo
            .find_site(payload.site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;
        Scope::for_identity(identity).ensure_site(&site)?;

        let status = payload
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPENSE_STATUS.to_string());

        let expense = self
            .expense_repo
            .create_expense(ExpenseInsert {
                expense: payload,
                organization_id: site.organization_id,
                status,
                registered_by: identity.user_id,
            })
            .await?;

        tracing::info!(expense_id = %expense.id, amount = %expense.amount, "💸 Gasto registrado");
        Ok(expense)
    }

    pub async fn stats(&self, identity: &Identity) -> Result<ExpenseStats, AppError> {
        let scope = Scope::for_identity(identity);
        let facts = self.expense_repo.expense_facts(&scope).await?;
        Ok(ExpenseStats::from_facts(&facts))
    }

    pub async fn list_categories(&self) -> Result<Vec<ExpenseCategory>, AppError> {
        self.expense_repo.list_categories().await
    }
}
