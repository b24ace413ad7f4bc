// src/models/site.rs

use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: Uuid,
    #[schema(example = "Quintana Roo")]
    pub name: String,
    #[schema(example = "QROO")]
    pub code: Option<String>,
    pub seismic_zone: bool,
    pub coastal_zone: bool,
}

// CEDIS (Centro de Distribuição)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: Uuid,
    #[schema(example = "CEDIS-CUN-01")]
    pub code: String,
    #[schema(example = "CEDIS Cancún")]
    pub name: String,
    pub state_id: Uuid,
    #[schema(example = "Benito Juárez")]
    pub municipality: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    #[schema(example = "12500.00")]
    pub surface_m2: Option<Decimal>,
    pub headcount: i32,
    pub manager: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "21.161908")]
    pub latitude: Option<Decimal>,
    #[schema(example = "-86.851528")]
    pub longitude: Option<Decimal>,
    pub organization_id: Uuid,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// CEDIS + nome do estado (JOIN), usado pelo mapa
#[derive(Debug, Clone, FromRow)]
pub struct SiteWithState {
    #[sqlx(flatten)]
    pub site: Site,
    pub state_name: String,
}

fn range_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

// Campos opcionais: validados no nível do struct.
fn validate_new_site(site: &NewSite) -> Result<(), ValidationError> {
    if site.surface_m2.is_some_and(|surface| surface.is_sign_negative()) {
        return Err(range_error("La superficie no puede ser negativa."));
    }
    if site
        .latitude
        .is_some_and(|lat| lat < Decimal::from(-90) || lat > Decimal::from(90))
    {
        return Err(range_error("La latitud debe estar entre -90 y 90."));
    }
    if site
        .longitude
        .is_some_and(|lon| lon < Decimal::from(-180) || lon > Decimal::from(180))
    {
        return Err(range_error("La longitud debe estar entre -180 y 180."));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_site"))]
pub struct NewSite {
    #[validate(length(min = 1, max = 50, message = "El código es obligatorio."))]
    #[schema(example = "CEDIS-CUN-01")]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "El nombre es obligatorio."))]
    #[schema(example = "CEDIS Cancún")]
    pub name: String,

    pub state_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "El municipio es obligatorio."))]
    pub municipality: String,

    pub address: Option<String>,
    pub postal_code: Option<String>,

    pub surface_m2: Option<Decimal>,

    #[serde(default)]
    #[validate(range(min = 0, message = "El personal no puede ser negativo."))]
    pub headcount: i32,

    pub manager: Option<String>,

    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub latitude: Option<Decimal>,

    pub longitude: Option<Decimal>,

    pub organization_id: Uuid,
    pub notes: Option<String>,
}

// Um ponto no mapa do dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteMapEntry {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub municipality: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(example = 50)]
    pub compliance_score: i32,
    pub headcount: i32,
}

impl SiteMapEntry {
    pub fn new(entry: &SiteWithState, compliance_score: i32) -> Self {
        // Coordenada só faz sentido em par: faltando uma, as duas saem nulas.
        let (latitude, longitude) = match (entry.site.latitude, entry.site.longitude) {
            (Some(lat), Some(lon)) => (lat.to_f64(), lon.to_f64()),
            _ => (None, None),
        };

        Self {
            id: entry.site.id,
            name: entry.site.name.clone(),
            state: entry.state_name.clone(),
            municipality: entry.site.municipality.clone(),
            latitude,
            longitude,
            compliance_score,
            headcount: entry.site.headcount,
        }
    }
}
