// src/db/expense_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::map_write_error, error::AppError, scope::Scope},
    db::store::{ExpenseInsert, ExpenseStore},
    models::{
        expense::{Expense, ExpenseCategory, ExpenseFact},
        query::{ExpenseFilter, Pagination},
    },
};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// `g` é sempre o alias de `expenses`.
fn scoped(select: &str, scope: &Scope) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" WHERE TRUE");
    scope.push_sql(&mut qb, "g.organization_id", Some("g.site_id"));
    qb
}

// Gastos sem categoria vêm com `category` nulo (LEFT JOIN).
pub(crate) fn expense_facts_query(scope: &Scope, since: Option<NaiveDate>) -> QueryBuilder<'static, Postgres> {
    let mut qb = scoped(
        r#"
        SELECT g.site_id, s.name AS site_name, c.name AS category, g.spent_on, g.amount
        FROM expenses g
        JOIN sites s ON s.id = g.site_id
        LEFT JOIN expense_categories c ON c.id = g.category_id
        "#,
        scope,
    );
    if let Some(since) = since {
        qb.push(" AND g.spent_on >= ").push_bind(since);
    }
    qb
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
    async fn list_expenses(
        &self,
        scope: &Scope,
        filter: &ExpenseFilter,
        page: Pagination,
    ) -> Result<Vec<Expense>, AppError> {
        let page = page.normalized();
        let mut qb = scoped("SELECT g.* FROM expenses g", scope);

        if let Some(site_id) = filter.site_id {
            qb.push(" AND g.site_id = ").push_bind(site_id);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND g.category_id = ").push_bind(category_id);
        }
        if let Some(from) = filter.from {
            qb.push(" AND g.spent_on >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND g.spent_on <= ").push_bind(to);
        }

        qb.push(" ORDER BY g.spent_on DESC, g.created_at DESC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        let expenses = qb.build_query_as::<Expense>().fetch_all(&self.pool).await?;
        Ok(expenses)
    }

    async fn create_expense(&self, insert: ExpenseInsert) -> Result<Expense, AppError> {
        let ExpenseInsert { expense, organization_id, status, registered_by } = insert;

        let created = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                spent_on, site_id, organization_id, category_id, provider, description,
                amount, payment_method, invoice_number, status, notes, registered_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(expense.spent_on)
        .bind(expense.site_id)
        .bind(organization_id)
        .bind(expense.category_id)
        .bind(&expense.provider)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.payment_method)
        .bind(&expense.invoice_number)
        .bind(&status)
        .bind(&expense.notes)
        .bind(registered_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn expense_facts(&self, scope: &Scope) -> Result<Vec<ExpenseFact>, AppError> {
        let facts = expense_facts_query(scope, None)
            .build_query_as::<ExpenseFact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(facts)
    }

    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>, AppError> {
        let categories = sqlx::query_as::<_, ExpenseCategory>(
            "SELECT * FROM expense_categories WHERE is_active = TRUE ORDER BY sort_order ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}
