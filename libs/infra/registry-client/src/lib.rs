// [libs/infra/registry-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: REGISTRY FALLBACK UPLINK (V3.2 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CONSULTA POR NPI CONTRA EL REGISTRO NACIONAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. NEVER ON THE CRITICAL PATH: Este adaptador solo se invoca durante
 *    el enriquecimiento post-selección, sobre el conjunto pequeño de
 *    NPIs marcados ausentes del snapshot local.
 * 2. TOTAL DEGRADATION: Cualquier fallo (red, timeout, esquema) produce
 *    la identidad de relleno; el enriquecimiento jamás aborta.
 * 3. SINGLE-WRITER CACHE: El caché por NPI es un mapa en memoria con
 *    un único escritor (el lazo secuencial de enriquecimiento).
 * =================================================================
 */

use centinela_domain_models::{EntityType, ProviderIdentity};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Endpoint público del registro nacional de proveedores.
pub const REGISTRY_API_URL: &str = "https://npiregistry.cms.hhs.gov/api/";

/// Timeout por consulta individual.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum RegistryClientError {
    /// Fallo de construcción del cliente HTTP subyacente.
    #[error("[L3_REGISTRY_FAULT]: HTTP_CLIENT_CONSTRUCTION_REJECTED -> {0}")]
    ClientConstruction(#[from] reqwest::Error),
}

/// Sobre de respuesta del registro (solo los campos consumidos).
#[derive(Debug, Deserialize)]
struct RegistryEnvelope {
    #[serde(default)]
    results: Vec<RegistryResult>,
}

#[derive(Debug, Deserialize)]
struct RegistryResult {
    #[serde(default)]
    enumeration_type: String,
    #[serde(default)]
    basic: RegistryBasic,
    #[serde(default)]
    taxonomies: Vec<RegistryTaxonomy>,
    #[serde(default)]
    addresses: Vec<RegistryAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryBasic {
    #[serde(default)]
    organization_name: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    enumeration_date: String,
}

#[derive(Debug, Deserialize)]
struct RegistryTaxonomy {
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct RegistryAddress {
    #[serde(default)]
    state: String,
}

/// Cliente de respaldo con caché por NPI.
pub struct RegistryApiClient {
    http_client: reqwest::blocking::Client,
    base_url: String,
    lookup_cache: HashMap<String, ProviderIdentity>,
}

impl RegistryApiClient {
    /// Construye el cliente con timeout y User-Agent nominales.
    pub fn new() -> Result<Self, RegistryClientError> {
        Self::with_base_url(REGISTRY_API_URL)
    }

    /// Variante con endpoint inyectable (Proving Grounds).
    pub fn with_base_url(base_url: &str) -> Result<Self, RegistryClientError> {
        Ok(Self {
            http_client: reqwest::blocking::Client::builder()
                .user_agent("Centinela-Signal-Hunter/3.0")
                .timeout(LOOKUP_TIMEOUT)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string() + "/",
            lookup_cache: HashMap::new(),
        })
    }

    /// Resuelve la identidad de un NPI. Siempre retorna una identidad:
    /// la del registro si la consulta prospera, la de relleno si no.
    /// El resultado queda cacheado en ambos casos.
    pub fn lookup(&mut self, npi: &str) -> ProviderIdentity {
        if let Some(cached) = self.lookup_cache.get(npi) {
            return cached.clone();
        }
        let identity = match self.fetch_identity(npi) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!("📡 [REGISTRY_API]: NPI {} not present upstream.", npi);
                ProviderIdentity::placeholder(npi)
            }
            Err(network_error) => {
                warn!("📡 [REGISTRY_API]: lookup failed for NPI {} -> {}", npi, network_error);
                ProviderIdentity::placeholder(npi)
            }
        };
        self.lookup_cache.insert(npi.to_string(), identity.clone());
        identity
    }

    fn fetch_identity(&self, npi: &str) -> Result<Option<ProviderIdentity>, reqwest::Error> {
        let envelope: RegistryEnvelope = self
            .http_client
            .get(&self.base_url)
            .query(&[("version", "2.1"), ("number", npi)])
            .send()?
            .error_for_status()?
            .json()?;

        let Some(result) = envelope.results.into_iter().next() else {
            return Ok(None);
        };

        let entity_type = match result.enumeration_type.as_str() {
            "NPI-1" => EntityType::Individual,
            "NPI-2" => EntityType::Organization,
            _ => EntityType::Unknown,
        };

        let organization = result.basic.organization_name.trim();
        let provider_name = if !organization.is_empty() {
            organization.to_string()
        } else {
            format!("{} {}", result.basic.first_name.trim(), result.basic.last_name.trim())
                .trim()
                .to_string()
        };

        Ok(Some(ProviderIdentity {
            npi: npi.to_string(),
            provider_name: if provider_name.is_empty() {
                centinela_domain_models::placeholder_name(npi)
            } else {
                provider_name
            },
            entity_type,
            taxonomy_code: result
                .taxonomies
                .first()
                .map(|taxonomy| taxonomy.code.clone())
                .unwrap_or_default(),
            state: result
                .addresses
                .first()
                .map(|address| address.state.clone())
                .unwrap_or_default(),
            enumeration_date: {
                let raw = result.basic.enumeration_date.trim();
                if raw.is_empty() { None } else { Some(raw.to_string()) }
            },
        }))
    }

    /// Cardinalidad del caché (telemetría del lazo de enriquecimiento).
    pub fn cached_count(&self) -> usize {
        self.lookup_cache.len()
    }
}
