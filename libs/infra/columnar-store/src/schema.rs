// [libs/infra/columnar-store/src/schema.rs]
/*!
 * =================================================================
 * APARATO: NORMALIZED TABLE SCHEMA (V3.3 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: TABLAS NORMALIZADAS Y CODE SETS FIJOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. OPAQUE IDENTIFIERS: Los NPI son cadenas opacas de extremo a
 *    extremo; los ceros a la izquierda y el centinela '0000000000'
 *    jamás se pierden en aritmética entera.
 * 2. STRUCT-OF-ARRAYS: La tabla de gasto es columnar (un vector por
 *    columna) para que la materialización de agregados recorra memoria
 *    contigua.
 * 3. DEGRADE, DON'T CRASH: Registro y censo son opcionales; su
 *    ausencia produce 'None', nunca un fallo.
 * =================================================================
 */

use centinela_domain_models::{ClaimMonth, EntityType};
use std::collections::{BTreeMap, HashMap};

/// Centinela de NPI no enlazable en la lista de exclusiones.
pub const UNLINKABLE_NPI: &str = "0000000000";

/// Códigos de evaluación y manejo (E&M) del catálogo fijo.
pub const EVALUATION_MANAGEMENT_CODES: [&str; 26] = [
    "99201", "99202", "99203", "99204", "99205", "99211", "99212", "99213", "99214", "99215",
    "99221", "99222", "99223", "99231", "99232", "99233", "99241", "99242", "99243", "99244",
    "99245", "99251", "99252", "99253", "99254", "99255",
];

/// Códigos de salud domiciliaria (home health) del catálogo fijo.
pub const HOME_HEALTH_CODES: [&str; 21] = [
    "G0151", "G0152", "G0153", "G0154", "G0155", "G0156", "G0157", "G0158", "G0159", "G0160",
    "G0161", "G0162", "G0299", "G0300", "S9122", "S9123", "S9124", "T1019", "T1020", "T1021",
    "T1022",
];

/// Pertenencia al subconjunto E&M.
pub fn is_evaluation_management_code(hcpcs_code: &str) -> bool {
    EVALUATION_MANAGEMENT_CODES.binary_search(&hcpcs_code).is_ok()
}

/// Pertenencia al subconjunto home health.
pub fn is_home_health_code(hcpcs_code: &str) -> bool {
    HOME_HEALTH_CODES.binary_search(&hcpcs_code).is_ok()
}

// -----------------------------------------------------------------
// GASTO (SPENDING) — Struct-of-Arrays
// -----------------------------------------------------------------

/// Una fila lógica de gasto ya normalizada, usada solo durante la ingesta.
#[derive(Debug, Clone)]
pub struct SpendingRow {
    pub billing_npi: String,
    pub servicing_npi: String,
    pub hcpcs_code: String,
    pub claim_month: ClaimMonth,
    pub unique_beneficiaries: u64,
    pub total_claims: u64,
    pub total_paid: f64,
}

/// Tabla columnar de gasto: una fila por
/// (proveedor facturador, proveedor ejecutante, código, mes).
#[derive(Debug, Default)]
pub struct SpendingTable {
    pub billing_npi: Vec<String>,
    pub servicing_npi: Vec<String>,
    pub hcpcs_code: Vec<String>,
    pub claim_month: Vec<ClaimMonth>,
    pub unique_beneficiaries: Vec<u64>,
    pub total_claims: Vec<u64>,
    pub total_paid: Vec<f64>,
}

impl SpendingTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            billing_npi: Vec::with_capacity(capacity),
            servicing_npi: Vec::with_capacity(capacity),
            hcpcs_code: Vec::with_capacity(capacity),
            claim_month: Vec::with_capacity(capacity),
            unique_beneficiaries: Vec::with_capacity(capacity),
            total_claims: Vec::with_capacity(capacity),
            total_paid: Vec::with_capacity(capacity),
        }
    }

    pub fn push_row(&mut self, row: SpendingRow) {
        self.billing_npi.push(row.billing_npi);
        self.servicing_npi.push(row.servicing_npi);
        self.hcpcs_code.push(row.hcpcs_code);
        self.claim_month.push(row.claim_month);
        self.unique_beneficiaries.push(row.unique_beneficiaries);
        self.total_claims.push(row.total_claims);
        self.total_paid.push(row.total_paid);
    }

    pub fn row_count(&self) -> usize {
        self.billing_npi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.billing_npi.is_empty()
    }
}

// -----------------------------------------------------------------
// EXCLUSIONES (LEIE)
// -----------------------------------------------------------------

/// Entrada de la lista federal de exclusiones.
#[derive(Debug, Clone)]
pub struct ExclusionEntry {
    pub npi: String,
    pub last_name: String,
    pub first_name: String,
    pub mid_name: String,
    pub bus_name: String,
    pub state: String,
    pub exclusion_type: String,
    /// `YYYYMMDD` crudo, preservado por procedencia.
    pub exclusion_date_raw: String,
    /// `YYYYMMDD`, vacío, `"0"` o `"00000000"` cuando no reinstalado.
    pub reinstatement_date_raw: String,
}

impl ExclusionEntry {
    /// Una exclusión está activa si la fecha de reinstalación está
    /// ausente o es centinela.
    pub fn is_active(&self) -> bool {
        matches!(self.reinstatement_date_raw.trim(), "" | "0" | "00000000")
    }

    /// El NPI enlaza con el gasto solo si no es vacío ni el centinela de ceros.
    pub fn has_linkable_npi(&self) -> bool {
        let trimmed = self.npi.trim();
        !trimmed.is_empty() && trimmed != UNLINKABLE_NPI
    }

    /// Nombre para evidencia: razón social, luego nombre y apellido.
    pub fn display_name(&self) -> String {
        let mut name_parts: Vec<&str> = Vec::with_capacity(3);
        for part in [&self.bus_name, &self.first_name, &self.last_name] {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                name_parts.push(trimmed);
            }
        }
        name_parts.join(" ")
    }

    pub fn entity_type(&self) -> EntityType {
        if self.bus_name.trim().is_empty() {
            EntityType::Individual
        } else {
            EntityType::Organization
        }
    }
}

/// Lista de exclusiones con índice de NPIs activos y enlazables.
#[derive(Debug, Default)]
pub struct ExclusionTable {
    entries: Vec<ExclusionEntry>,
    active_index: BTreeMap<String, usize>,
}

impl ExclusionTable {
    pub fn new(entries: Vec<ExclusionEntry>) -> Self {
        let mut active_index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.is_active() && entry.has_linkable_npi() {
                // El NPI es clave primaria dentro del subconjunto activo;
                // la primera aparición gana.
                active_index.entry(entry.npi.trim().to_string()).or_insert(position);
            }
        }
        Self { entries, active_index }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_index.len()
    }

    /// Exclusiones activas enlazables en orden ascendente de NPI.
    pub fn active_entries(&self) -> impl Iterator<Item = (&str, &ExclusionEntry)> {
        self.active_index
            .iter()
            .map(|(npi, position)| (npi.as_str(), &self.entries[*position]))
    }

    pub fn lookup_active(&self, npi: &str) -> Option<&ExclusionEntry> {
        self.active_index.get(npi).map(|position| &self.entries[*position])
    }
}

// -----------------------------------------------------------------
// REGISTRO NACIONAL (NPPES)
// -----------------------------------------------------------------

/// Fila normalizada del registro nacional de proveedores.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub npi: String,
    pub entity_type: EntityType,
    pub org_name: String,
    pub last_name: String,
    pub first_name: String,
    pub state: String,
    pub postal_code: String,
    pub taxonomy_code: String,
    /// Fecha de alta en formato de origen (procedencia).
    pub enumeration_date_raw: String,
    /// Mes de alta parseado, para agrupaciones por trimestre.
    pub enumeration_month: Option<ClaimMonth>,
    pub auth_official_last: String,
    pub auth_official_first: String,
}

impl RegistryEntry {
    /// Nombre para el reporte: razón social o "nombre apellido".
    pub fn display_name(&self) -> String {
        let org = self.org_name.trim();
        if !org.is_empty() {
            return org.to_string();
        }
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Llave normalizada del oficial autorizado: `(apellido, nombre)` en
    /// minúsculas. `None` si cualquiera de los dos campos está vacío.
    pub fn official_key(&self) -> Option<(String, String)> {
        let last = self.auth_official_last.trim().to_lowercase();
        let first = self.auth_official_first.trim().to_lowercase();
        if last.is_empty() || first.is_empty() {
            return None;
        }
        Some((last, first))
    }

    /// ZIP de cinco dígitos (el registro publica ZIP+4 sin guion).
    pub fn zip5(&self) -> &str {
        let trimmed = self.postal_code.trim();
        if trimmed.len() > 5 {
            &trimmed[..5]
        } else {
            trimmed
        }
    }
}

/// Registro nacional con índice por NPI.
#[derive(Debug, Default)]
pub struct RegistryTable {
    entries: Vec<RegistryEntry>,
    index_by_npi: HashMap<String, usize>,
}

impl RegistryTable {
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        let mut index_by_npi = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index_by_npi.entry(entry.npi.clone()).or_insert(position);
        }
        Self { entries, index_by_npi }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, npi: &str) -> Option<&RegistryEntry> {
        self.index_by_npi.get(npi).map(|position| &self.entries[*position])
    }

    /// Filas de organizaciones (entity_type '2'), en orden de carga.
    pub fn organizations(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.entity_type == EntityType::Organization)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}

// -----------------------------------------------------------------
// CENSO ZCTA (OPCIONAL)
// -----------------------------------------------------------------

/// Demografía de un ZCTA del censo (enriquecimiento opcional).
#[derive(Debug, Clone)]
pub struct CensusRow {
    pub zcta: String,
    pub total_population: u64,
    pub population_65_plus: u64,
    pub disability_count: u64,
    pub poverty_count: u64,
}

/// Tabla de censo indexada por ZCTA.
#[derive(Debug, Default)]
pub struct CensusTable {
    by_zcta: BTreeMap<String, CensusRow>,
}

impl CensusTable {
    pub fn new(rows: Vec<CensusRow>) -> Self {
        let mut by_zcta = BTreeMap::new();
        for row in rows {
            by_zcta.insert(row.zcta.clone(), row);
        }
        Self { by_zcta }
    }

    pub fn lookup(&self, zcta: &str) -> Option<&CensusRow> {
        self.by_zcta.get(zcta)
    }

    pub fn row_count(&self) -> usize {
        self.by_zcta.len()
    }
}

// -----------------------------------------------------------------
// CONTEXTO COLUMNAR COMPLETO
// -----------------------------------------------------------------

/// Contexto de ejecución columnar: las tres tablas normalizadas más el
/// censo opcional. Inmutable tras la carga.
#[derive(Debug)]
pub struct ColumnStore {
    pub spending: SpendingTable,
    pub exclusions: ExclusionTable,
    pub registry: Option<RegistryTable>,
    pub census: Option<CensusTable>,
    /// Rutas/identificadores de las fuentes efectivamente cargadas.
    pub data_sources: Vec<String>,
}

impl ColumnStore {
    pub fn registry_available(&self) -> bool {
        self.registry.is_some()
    }
}
