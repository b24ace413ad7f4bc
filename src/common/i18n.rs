// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANGUAGE: &str = "es";

// (idioma, chave, mensagem)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("es", "VALIDATION_FAILED", "Uno o más campos son inválidos."),
    ("en", "VALIDATION_FAILED", "One or more fields are invalid."),
    ("es", "EMAIL_ALREADY_EXISTS", "Este email ya está registrado."),
    ("en", "EMAIL_ALREADY_EXISTS", "This email is already registered."),
    ("es", "SITE_CODE_ALREADY_EXISTS", "Ya existe un CEDIS con este código."),
    ("en", "SITE_CODE_ALREADY_EXISTS", "A site with this code already exists."),
    ("es", "UNIQUE_VIOLATION", "El registro ya existe."),
    ("en", "UNIQUE_VIOLATION", "The record already exists."),
    ("es", "INVALID_CREDENTIALS", "Email o contraseña incorrectos."),
    ("en", "INVALID_CREDENTIALS", "Invalid email or password."),
    ("es", "INVALID_TOKEN", "No se pudo validar las credenciales."),
    ("en", "INVALID_TOKEN", "Missing or invalid authentication token."),
    ("es", "INACTIVE_USER", "Usuario inactivo."),
    ("en", "INACTIVE_USER", "Inactive user."),
    ("es", "FORBIDDEN", "Sin permisos."),
    ("en", "FORBIDDEN", "You do not have access to this resource."),
    ("es", "SITE_NOT_FOUND", "CEDIS no encontrado."),
    ("en", "SITE_NOT_FOUND", "Site not found."),
    ("es", "EXTINGUISHER_NOT_FOUND", "No se encontraron extintores para este CEDIS."),
    ("en", "EXTINGUISHER_NOT_FOUND", "No extinguisher record for this site."),
    ("es", "EMERGENCY_PLAN_NOT_FOUND", "No se encontró PIPC para este CEDIS."),
    ("en", "EMERGENCY_PLAN_NOT_FOUND", "No emergency plan for this site."),
    ("es", "REFERENCE_NOT_FOUND", "Un registro referenciado no existe."),
    ("en", "REFERENCE_NOT_FOUND", "A referenced record does not exist."),
    ("es", "INTERNAL_ERROR", "Ocurrió un error inesperado."),
    ("en", "INTERNAL_ERROR", "An unexpected error occurred."),
];

/// Catálogo de mensagens de erro por idioma.
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for (lang, key, message) in MESSAGES {
            messages.entry(*lang).or_default().insert(*key, *message);
        }

        Self { messages: Arc::new(messages) }
    }

    // Idioma desconhecido cai no espanhol; chave desconhecida volta a própria chave.
    pub fn translate<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        let lookup = |lang: &str| self.messages.get(lang).and_then(|by_key| by_key.get(key)).copied();

        lookup(lang).or_else(|| lookup(DEFAULT_LANGUAGE)).unwrap_or(key)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_spanish() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "SITE_NOT_FOUND"), "CEDIS no encontrado.");
        assert_eq!(store.translate("en", "SITE_NOT_FOUND"), "Site not found.");
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let store = I18nStore::new();
        assert_eq!(store.translate("es", "SOMETHING_ELSE"), "SOMETHING_ELSE");
    }
}
