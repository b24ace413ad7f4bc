// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helper de escrita: traduz violações de constraint do Postgres
// em erros de domínio. Qualquer outra falha segue como DatabaseError.
// ---
pub(crate) fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                // Nomes padrão que o Postgres cria para os UNIQUE da migration
                Some("users_email_key") => AppError::EmailAlreadyExists,
                Some("sites_code_key") => AppError::SiteCodeAlreadyExists,
                Some(constraint) => AppError::UniqueConstraintViolation(constraint.to_string()),
                None => AppError::UniqueConstraintViolation("unknown".to_string()),
            };
        }

        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.ends_with("_site_id_fkey") {
                return AppError::SiteNotFound;
            }
            return AppError::ReferenceNotFound(constraint.to_string());
        }
    }
    e.into()
}
