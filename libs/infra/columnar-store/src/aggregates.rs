// [libs/infra/columnar-store/src/aggregates.rs]
/*!
 * =================================================================
 * APARATO: MATERIALIZED AGGREGATES ENGINE (V3.6 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: ROLLUPS COMPARTIDOS DE LOS 19 DETECTORES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. COMPUTE ONCE: Cada intermedio pesado (totales por proveedor, por
 *    mes, por código, hubs de servicio, ZIP home-health) se materializa
 *    exactamente una vez y se comparte; ningún detector vuelve a
 *    escanear las filas crudas.
 * 2. DETERMINISTIC ITERATION: Todos los rollups viven en mapas
 *    ordenados por NPI/código/mes; los detectores heredan el orden sin
 *    re-ordenar.
 * 3. REGISTRY AWARENESS: Los rollups que dependen del registro
 *    (workers por organización, estados de servicio, ZIP home-health)
 *    quedan vacíos cuando el registro está ausente.
 * =================================================================
 */

use crate::schema::{is_evaluation_management_code, is_home_health_code, ColumnStore};
use centinela_domain_models::{ClaimMonth, EntityType};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;
use tracing::info;

/// Rollup aditivo estándar: pagado, reclamos y beneficiarios.
///
/// Los beneficiarios son conteos únicos por fila de entrada; su suma es
/// una cota superior aceptada por la metodología de triaje.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BillingTotals {
    pub paid: f64,
    pub claims: u64,
    pub beneficiaries: u64,
}

impl BillingTotals {
    fn absorb(&mut self, paid: f64, claims: u64, beneficiaries: u64) {
        self.paid += paid;
        self.claims += claims;
        self.beneficiaries += beneficiaries;
    }
}

/// Rollup home-health por proveedor, con cardinalidades de códigos y meses.
#[derive(Debug, Clone, Default)]
pub struct HomeHealthRollup {
    pub totals: BillingTotals,
    pub distinct_codes: u64,
    pub billing_months: u64,
}

/// Totales de un proveedor facturador sobre un código HCPCS concreto.
#[derive(Debug, Clone)]
pub struct CodeProviderRow {
    pub npi: String,
    pub totals: BillingTotals,
}

/// Enlace ejecutante→facturador del rollup de hubs de servicio.
#[derive(Debug, Clone)]
pub struct HubLink {
    pub billing_npi: String,
    pub totals: BillingTotals,
}

/// Proveedor home-health agregado dentro de un ZIP del registro.
#[derive(Debug, Clone)]
pub struct ZipHomeHealthRow {
    pub npi: String,
    pub entity_type: EntityType,
    pub provider_name: String,
    pub state: String,
    pub totals: BillingTotals,
}

/// Agregados materializados una vez por corrida. Contrato de lectura de
/// todos los detectores del catálogo.
#[derive(Debug, Default)]
pub struct Aggregates {
    /// NPI facturador → totales de toda la ventana del snapshot.
    pub provider_totals: BTreeMap<String, BillingTotals>,
    /// NPI → mes → totales mensuales.
    pub provider_monthly: BTreeMap<String, BTreeMap<ClaimMonth, BillingTotals>>,
    /// NPI → código HCPCS → totales.
    pub provider_code_totals: BTreeMap<String, BTreeMap<String, BillingTotals>>,
    /// Inversión código HCPCS → proveedores (grupos de peers por código).
    pub code_provider_totals: BTreeMap<String, Vec<CodeProviderRow>>,
    /// Proyección E&M: NPI → totales restringidos al code set E&M.
    pub provider_em_totals: BTreeMap<String, BillingTotals>,
    /// Proyección home-health: NPI → rollup restringido al code set HH.
    pub provider_hh_totals: BTreeMap<String, HomeHealthRollup>,
    /// NPI facturador → (mes, estado del ejecutante) → totales.
    pub serv_state_monthly: BTreeMap<String, BTreeMap<(ClaimMonth, String), BillingTotals>>,
    /// Organización → mes → ejecutantes distintos.
    pub org_worker_monthly: BTreeMap<String, BTreeMap<ClaimMonth, u64>>,
    /// NPI ejecutante → enlaces hacia sus facturadores (auto-servicio excluido).
    pub servicing_hub_totals: BTreeMap<String, Vec<HubLink>>,
    /// ZIP del registro → proveedores home-health del ZIP.
    pub hh_zip_totals: BTreeMap<String, Vec<ZipHomeHealthRow>>,
}

impl Aggregates {
    /// Materializa todos los rollups en un único barrido del gasto.
    pub fn materialize(store: &ColumnStore) -> Self {
        let materialization_timer = Instant::now();
        let spending = &store.spending;
        let registry = store.registry.as_ref();

        let mut provider_totals: BTreeMap<String, BillingTotals> = BTreeMap::new();
        let mut provider_monthly: BTreeMap<String, BTreeMap<ClaimMonth, BillingTotals>> = BTreeMap::new();
        let mut provider_code_totals: BTreeMap<String, BTreeMap<String, BillingTotals>> = BTreeMap::new();
        let mut provider_em_totals: BTreeMap<String, BillingTotals> = BTreeMap::new();
        let mut hh_totals: BTreeMap<String, BillingTotals> = BTreeMap::new();
        let mut hh_code_sets: HashMap<String, HashSet<&str>> = HashMap::new();
        let mut hh_month_sets: HashMap<String, HashSet<ClaimMonth>> = HashMap::new();
        let mut serv_state_monthly: BTreeMap<String, BTreeMap<(ClaimMonth, String), BillingTotals>> = BTreeMap::new();
        let mut org_workers: HashMap<(String, ClaimMonth), HashSet<&str>> = HashMap::new();
        let mut hub_pairs: BTreeMap<(String, String), BillingTotals> = BTreeMap::new();

        for row_index in 0..spending.row_count() {
            let billing_npi = spending.billing_npi[row_index].as_str();
            let servicing_npi = spending.servicing_npi[row_index].as_str();
            let hcpcs_code = spending.hcpcs_code[row_index].as_str();
            let claim_month = spending.claim_month[row_index];
            let beneficiaries = spending.unique_beneficiaries[row_index];
            let claims = spending.total_claims[row_index];
            let paid = spending.total_paid[row_index];

            provider_totals
                .entry(billing_npi.to_string())
                .or_default()
                .absorb(paid, claims, beneficiaries);

            provider_monthly
                .entry(billing_npi.to_string())
                .or_default()
                .entry(claim_month)
                .or_default()
                .absorb(paid, claims, beneficiaries);

            if !hcpcs_code.is_empty() {
                provider_code_totals
                    .entry(billing_npi.to_string())
                    .or_default()
                    .entry(hcpcs_code.to_string())
                    .or_default()
                    .absorb(paid, claims, beneficiaries);
            }

            if is_evaluation_management_code(hcpcs_code) {
                provider_em_totals
                    .entry(billing_npi.to_string())
                    .or_default()
                    .absorb(paid, claims, beneficiaries);
            }

            if is_home_health_code(hcpcs_code) {
                hh_totals
                    .entry(billing_npi.to_string())
                    .or_default()
                    .absorb(paid, claims, beneficiaries);
                hh_code_sets
                    .entry(billing_npi.to_string())
                    .or_default()
                    .insert(hcpcs_code);
                hh_month_sets
                    .entry(billing_npi.to_string())
                    .or_default()
                    .insert(claim_month);
            }

            if !servicing_npi.is_empty() && servicing_npi != billing_npi {
                hub_pairs
                    .entry((servicing_npi.to_string(), billing_npi.to_string()))
                    .or_default()
                    .absorb(paid, claims, beneficiaries);
            }

            if let Some(registry_table) = registry {
                if !servicing_npi.is_empty() {
                    if let Some(servicing_entry) = registry_table.lookup(servicing_npi) {
                        let servicing_state = servicing_entry.state.trim();
                        if !servicing_state.is_empty() {
                            serv_state_monthly
                                .entry(billing_npi.to_string())
                                .or_default()
                                .entry((claim_month, servicing_state.to_string()))
                                .or_default()
                                .absorb(paid, claims, beneficiaries);
                        }
                    }
                    let is_organization = registry_table
                        .lookup(billing_npi)
                        .map(|entry| entry.entity_type == EntityType::Organization)
                        .unwrap_or(false);
                    if is_organization {
                        org_workers
                            .entry((billing_npi.to_string(), claim_month))
                            .or_default()
                            .insert(servicing_npi);
                    }
                }
            }
        }

        // Cristalización del rollup home-health con cardinalidades.
        let mut provider_hh_totals: BTreeMap<String, HomeHealthRollup> = BTreeMap::new();
        for (npi, totals) in hh_totals {
            let distinct_codes = hh_code_sets.get(&npi).map(|set| set.len() as u64).unwrap_or(0);
            let billing_months = hh_month_sets.get(&npi).map(|set| set.len() as u64).unwrap_or(0);
            provider_hh_totals.insert(
                npi,
                HomeHealthRollup {
                    totals,
                    distinct_codes,
                    billing_months,
                },
            );
        }

        // Inversión código → proveedores (el BTreeMap de origen garantiza
        // filas ordenadas por NPI dentro de cada código).
        let mut code_provider_totals: BTreeMap<String, Vec<CodeProviderRow>> = BTreeMap::new();
        for (npi, code_map) in &provider_code_totals {
            for (code, totals) in code_map {
                code_provider_totals
                    .entry(code.clone())
                    .or_default()
                    .push(CodeProviderRow {
                        npi: npi.clone(),
                        totals: *totals,
                    });
            }
        }

        // Hubs de servicio: enlaces agrupados por ejecutante.
        let mut servicing_hub_totals: BTreeMap<String, Vec<HubLink>> = BTreeMap::new();
        for ((servicing_npi, billing_npi), totals) in hub_pairs {
            servicing_hub_totals
                .entry(servicing_npi)
                .or_default()
                .push(HubLink {
                    billing_npi,
                    totals,
                });
        }

        // Rollup de organizaciones: ejecutantes distintos por mes.
        let mut org_worker_monthly: BTreeMap<String, BTreeMap<ClaimMonth, u64>> = BTreeMap::new();
        for ((org_npi, month), workers) in org_workers {
            org_worker_monthly
                .entry(org_npi)
                .or_default()
                .insert(month, workers.len() as u64);
        }

        // ZIP home-health: requiere el registro para resolver el ZIP.
        let mut hh_zip_totals: BTreeMap<String, Vec<ZipHomeHealthRow>> = BTreeMap::new();
        if let Some(registry_table) = registry {
            for (npi, rollup) in &provider_hh_totals {
                let Some(entry) = registry_table.lookup(npi) else { continue };
                let zip = entry.zip5().to_string();
                if zip.is_empty() {
                    continue;
                }
                hh_zip_totals.entry(zip).or_default().push(ZipHomeHealthRow {
                    npi: npi.clone(),
                    entity_type: entry.entity_type,
                    provider_name: entry.display_name(),
                    state: entry.state.clone(),
                    totals: rollup.totals,
                });
            }
        }

        let aggregates = Self {
            provider_totals,
            provider_monthly,
            provider_code_totals,
            code_provider_totals,
            provider_em_totals,
            provider_hh_totals,
            serv_state_monthly,
            org_worker_monthly,
            servicing_hub_totals,
            hh_zip_totals,
        };

        info!(
            "🧮 [AGGREGATES]: {} providers | {} codes | {} servicing hubs | {} hh zips | {:.1}s",
            aggregates.provider_totals.len(),
            aggregates.code_provider_totals.len(),
            aggregates.servicing_hub_totals.len(),
            aggregates.hh_zip_totals.len(),
            materialization_timer.elapsed().as_secs_f64(),
        );
        aggregates
    }

    /// Conteo exacto de NPIs facturadores distintos del snapshot.
    pub fn distinct_billing_providers(&self) -> u64 {
        self.provider_totals.len() as u64
    }
}
