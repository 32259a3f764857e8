// [libs/domain/signals/src/enrich.rs]
/*!
 * =================================================================
 * APARATO: IDENTITY ENRICHMENT LOOP (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: RESOLUCIÓN DE IDENTIDAD POST-SELECCIÓN
 *
 * # Secuencia de resolución por NPI marcado:
 * registro local -> uplink HTTP opcional (cacheado) -> identidad de
 * relleno. Un fallo por registro jamás aborta el lazo: el proveedor
 * sale con relleno y la corrida continúa.
 * =================================================================
 */

use crate::merge::MergedProvider;
use centinela_domain_models::{is_placeholder_name, ProviderIdentity};
use centinela_infra_registry::RegistryApiClient;
use centinela_infra_store::RegistryTable;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Resuelve la identidad de un NPI contra el snapshot local, con el
/// uplink HTTP como respaldo opcional.
pub fn resolve_identity(
    npi: &str,
    registry: Option<&RegistryTable>,
    api_fallback: Option<&mut RegistryApiClient>,
) -> ProviderIdentity {
    if let Some(entry) = registry.and_then(|table| table.lookup(npi)) {
        let display_name = entry.display_name();
        return ProviderIdentity {
            npi: npi.to_string(),
            provider_name: if display_name.is_empty() {
                centinela_domain_models::placeholder_name(npi)
            } else {
                display_name
            },
            entity_type: entry.entity_type,
            taxonomy_code: entry.taxonomy_code.clone(),
            state: entry.state.clone(),
            enumeration_date: if entry.enumeration_date_raw.is_empty() {
                None
            } else {
                Some(entry.enumeration_date_raw.clone())
            },
        };
    }
    if let Some(client) = api_fallback {
        return client.lookup(npi);
    }
    ProviderIdentity::placeholder(npi)
}

/// Lazo secuencial de enriquecimiento (escritor único del caché del
/// uplink). Rellena la identidad faltante de cada proveedor fusionado y
/// retorna el mapa de identidades para el constructor del reporte.
pub fn enrich_providers(
    merged: &mut BTreeMap<String, MergedProvider>,
    registry: Option<&RegistryTable>,
    mut api_fallback: Option<&mut RegistryApiClient>,
) -> BTreeMap<String, ProviderIdentity> {
    let mut identities: BTreeMap<String, ProviderIdentity> = BTreeMap::new();
    let provider_count = merged.len();

    for (position, (npi, provider)) in merged.iter_mut().enumerate() {
        let identity = resolve_identity(npi, registry, api_fallback.as_deref_mut());

        if is_placeholder_name(&provider.provider_name)
            && !is_placeholder_name(&identity.provider_name)
        {
            provider.provider_name = identity.provider_name.clone();
        }
        if !provider.entity_type.is_known() && identity.entity_type.is_known() {
            provider.entity_type = identity.entity_type;
        }
        if provider.state.is_empty() && !identity.state.is_empty() {
            provider.state = identity.state.clone();
        }

        identities.insert(npi.clone(), identity);
        if (position + 1) % 50 == 0 {
            debug!("🧬 [ENRICH]: {} / {} providers enriched.", position + 1, provider_count);
        }
    }

    info!("🧬 [ENRICH]: identity resolved for {} flagged providers.", identities.len());
    identities
}
