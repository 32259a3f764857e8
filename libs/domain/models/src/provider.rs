// [libs/domain/models/src/provider.rs]
// =================================================================
// APARATO: PROVIDER IDENTITY MODEL (V3.1)
// RESPONSABILIDAD: IDENTIDAD NORMALIZADA DE PROVEEDORES NPI
// ESTADO: NO-REGRESSIONS / AUDIT-READY
// =================================================================

use serde::{Deserialize, Serialize};

/// Clase de entidad del registro nacional ('1' = individuo, '2' = organización).
/// Identificadores no resueltos degradan a 'unknown' sin colapsar la señal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Individual,
    Organization,
    Unknown,
}

impl EntityType {
    /// Decodifica el código crudo del registro.
    pub fn from_registry_code(code: &str) -> Self {
        match code.trim() {
            "1" => EntityType::Individual,
            "2" => EntityType::Organization,
            _ => EntityType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Individual => "individual",
            EntityType::Organization => "organization",
            EntityType::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, EntityType::Unknown)
    }
}

/// Identidad mejor-conocida de un proveedor tras el enriquecimiento.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub npi: String,
    pub provider_name: String,
    pub entity_type: EntityType,
    pub taxonomy_code: String,
    pub state: String,
    /// Fecha de alta en el registro, en formato de origen.
    pub enumeration_date: Option<String>,
}

impl ProviderIdentity {
    /// Identidad de relleno para NPIs ausentes del registro. Nunca aborta
    /// el enriquecimiento.
    pub fn placeholder(npi: &str) -> Self {
        Self {
            npi: npi.to_string(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            taxonomy_code: String::new(),
            state: String::new(),
            enumeration_date: None,
        }
    }
}

/// Nombre de relleno (`"NPI <n>"`) usado mientras el registro no resuelva.
pub fn placeholder_name(npi: &str) -> String {
    format!("NPI {npi}")
}

/// Cierto si el nombre es un relleno que un valor conocido debe preferir.
pub fn is_placeholder_name(name: &str) -> bool {
    name.is_empty() || name.starts_with("NPI ")
}
