// [libs/infra/columnar-store/src/ingest.rs]
/*!
 * =================================================================
 * APARATO: DATASET INGESTION PIPELINE (V3.5 - SOBERANO)
 * CLASIFICACIÓN: ETL ENGINE (ESTRATO L3)
 * RESPONSABILIDAD: CARGA PARQUET/CSV Y NORMALIZACIÓN DE LAS TRES TABLAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. COLUMNAR FIRST: El gasto y el registro slim se leen con el par
 *    arrow/parquet y se normalizan vía kernels de cast, sin SQL
 *    intermedio.
 * 2. HYDRA-CRANK EFFICIENCY: La decodificación CSV corre por ráfagas
 *    paralelas Rayon dimensionadas por el techo de memoria.
 * 3. TOLERANT ROWS: Una fila malformada se descarta y se contabiliza;
 *    solo la ausencia del dataset requerido es fatal.
 * 4. PROVENANCE: Cada fuente efectivamente cargada queda registrada
 *    para la sección 'data_sources_used' del reporte.
 * =================================================================
 */

use crate::errors::StoreError;
use crate::memory::ingestion_chunk_capacity;
use crate::schema::{
    CensusRow, CensusTable, ColumnStore, ExclusionEntry, ExclusionTable, RegistryEntry,
    RegistryTable, SpendingRow, SpendingTable,
};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use centinela_domain_models::{ClaimMonth, EntityType};
use csv::ReaderBuilder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Opciones de ingesta derivadas de la línea de mando.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Techo de memoria en bytes; gobierna el tamaño de ráfaga.
    pub memory_limit_bytes: u64,
}

/// Carga las tres tablas normalizadas más el censo opcional.
///
/// # Errors:
/// - `MissingInput` si el gasto o las exclusiones no están en el
///   directorio de datos (clase fatal).
/// - Fallos físicos de IO/decodificación sobre un dataset requerido.
pub fn load_all(data_directory: &Path, options: &IngestOptions) -> Result<ColumnStore, StoreError> {
    let ingestion_timer = Instant::now();
    let chunk_capacity = ingestion_chunk_capacity(options.memory_limit_bytes);
    info!(
        "⚙️ [INGEST]: Initiating dataset crystallization (chunk={} rows).",
        chunk_capacity
    );

    let mut data_sources: Vec<String> = Vec::with_capacity(4);

    // --- FASE 1: GASTO MEDICAID (REQUERIDO) ---
    let (spending, spending_source) = load_spending(data_directory, chunk_capacity)?;
    data_sources.push(spending_source);

    // --- FASE 2: LISTA DE EXCLUSIONES LEIE (REQUERIDA) ---
    let (exclusions, exclusion_source) = load_exclusions(data_directory)?;
    data_sources.push(exclusion_source);

    // --- FASE 3: REGISTRO NACIONAL NPPES (OPCIONAL, DEGRADA) ---
    let registry = match load_registry(data_directory, chunk_capacity)? {
        Some((table, source)) => {
            data_sources.push(source);
            Some(table)
        }
        None => {
            warn!("📡 [DEGRADATION]: National registry absent — registry-dependent signals will return empty.");
            None
        }
    };

    // --- FASE 4: CENSO ZCTA (OPCIONAL, DEGRADA) ---
    let census = match load_census(data_directory)? {
        Some((table, source)) => {
            data_sources.push(source);
            Some(table)
        }
        None => None,
    };

    info!(
        "🏁 [INGEST]: {} spending rows | {} exclusion entries ({} active/linkable) | registry={} | census={} | {:.1}s",
        spending.row_count(),
        exclusions.entry_count(),
        exclusions.active_count(),
        registry.as_ref().map(|table| table.entry_count()).unwrap_or(0),
        census.as_ref().map(|table| table.row_count()).unwrap_or(0),
        ingestion_timer.elapsed().as_secs_f64(),
    );

    Ok(ColumnStore {
        spending,
        exclusions,
        registry,
        census,
        data_sources,
    })
}

// -----------------------------------------------------------------
// GASTO
// -----------------------------------------------------------------

fn load_spending(
    data_directory: &Path,
    chunk_capacity: usize,
) -> Result<(SpendingTable, String), StoreError> {
    let parquet_path = data_directory.join("medicaid_spending.parquet");
    if parquet_path.exists() {
        let table = load_spending_parquet(&parquet_path, chunk_capacity)?;
        return Ok((table, parquet_path.display().to_string()));
    }
    let csv_path = data_directory.join("medicaid_spending.csv");
    if csv_path.exists() {
        let table = load_spending_csv(&csv_path, chunk_capacity)?;
        return Ok((table, csv_path.display().to_string()));
    }
    Err(StoreError::MissingInput(format!(
        "spending dataset (medicaid_spending.parquet|csv) under {}",
        data_directory.display()
    )))
}

fn load_spending_parquet(path: &Path, chunk_capacity: usize) -> Result<SpendingTable, StoreError> {
    info!("📦 [SPENDING]: Reading columnar file {}", path.display());
    let file_handle = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file_handle)?
        .with_batch_size(chunk_capacity)
        .build()?;

    let mut table = SpendingTable::with_capacity(chunk_capacity);
    let mut discarded_rows: u64 = 0;
    let mut ingested_rows: u64 = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let billing = string_column(&batch, "BILLING_PROVIDER_NPI_NUM")?;
        let servicing = string_column(&batch, "SERVICING_PROVIDER_NPI_NUM")?;
        let hcpcs = string_column(&batch, "HCPCS_CODE")?;
        let month = string_column(&batch, "CLAIM_FROM_MONTH")?;
        let beneficiaries = u64_column(&batch, "TOTAL_UNIQUE_BENEFICIARIES")?;
        let claims = u64_column(&batch, "TOTAL_CLAIMS")?;
        let paid = f64_column(&batch, "TOTAL_PAID")?;

        for row_index in 0..batch.num_rows() {
            let billing_npi = optional_string(&billing, row_index);
            let claim_month = optional_string(&month, row_index).and_then(|raw| ClaimMonth::parse(&raw));
            match (billing_npi, claim_month) {
                (Some(billing_npi), Some(claim_month)) if !billing_npi.is_empty() => {
                    table.push_row(SpendingRow {
                        billing_npi,
                        servicing_npi: optional_string(&servicing, row_index).unwrap_or_default(),
                        hcpcs_code: optional_string(&hcpcs, row_index).unwrap_or_default(),
                        claim_month,
                        unique_beneficiaries: optional_u64(&beneficiaries, row_index),
                        total_claims: optional_u64(&claims, row_index),
                        total_paid: optional_f64(&paid, row_index).max(0.0),
                    });
                    ingested_rows += 1;
                }
                _ => discarded_rows += 1,
            }
        }
        if ingested_rows % 1_000_000 < batch.num_rows() as u64 {
            debug!("📦 [SPENDING]: {} rows crystallized...", ingested_rows);
        }
    }

    if discarded_rows > 0 {
        warn!("📦 [SPENDING]: {} malformed rows discarded.", discarded_rows);
    }
    Ok(table)
}

/// Fila CSV cruda del dataset de gasto (cabeceras del publicador).
#[derive(Debug, Deserialize)]
struct RawSpendingCsvRow {
    #[serde(rename = "BILLING_PROVIDER_NPI_NUM")]
    billing_npi: String,
    #[serde(rename = "SERVICING_PROVIDER_NPI_NUM", default)]
    servicing_npi: String,
    #[serde(rename = "HCPCS_CODE", default)]
    hcpcs_code: String,
    #[serde(rename = "CLAIM_FROM_MONTH")]
    claim_month: String,
    #[serde(rename = "TOTAL_UNIQUE_BENEFICIARIES", default)]
    unique_beneficiaries: Option<f64>,
    #[serde(rename = "TOTAL_CLAIMS", default)]
    total_claims: Option<f64>,
    #[serde(rename = "TOTAL_PAID", default)]
    total_paid: Option<f64>,
}

fn load_spending_csv(path: &Path, chunk_capacity: usize) -> Result<SpendingTable, StoreError> {
    info!("📦 [SPENDING]: Reading CSV fallback {}", path.display());
    let file_handle = File::open(path)?;
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(file_handle);
    let headers = csv_reader.headers()?.clone();

    let mut table = SpendingTable::with_capacity(chunk_capacity);
    let mut record_buffer: Vec<csv::StringRecord> = Vec::with_capacity(chunk_capacity);
    let mut discarded_rows: u64 = 0;
    let ingestion_timer = Instant::now();

    let drain_chunk = |buffer: &mut Vec<csv::StringRecord>,
                           table: &mut SpendingTable,
                           discarded: &mut u64| {
        // Decodificación paralela de la ráfaga; el orden de la ráfaga se
        // preserva para mantener la ingesta determinista.
        let decoded: Vec<Option<SpendingRow>> = buffer
            .par_iter()
            .map(|record| {
                let raw: RawSpendingCsvRow = record.deserialize(Some(&headers)).ok()?;
                normalize_spending_row(raw)
            })
            .collect();
        for row in decoded {
            match row {
                Some(row) => table.push_row(row),
                None => *discarded += 1,
            }
        }
        buffer.clear();
    };

    for record_result in csv_reader.records() {
        record_buffer.push(record_result?);
        if record_buffer.len() >= chunk_capacity {
            drain_chunk(&mut record_buffer, &mut table, &mut discarded_rows);
            let throughput = table.row_count() as f64 / ingestion_timer.elapsed().as_secs_f64();
            debug!(
                "📦 [SPENDING]: {} rows crystallized. Throughput: {:.0} rows/s.",
                table.row_count(),
                throughput
            );
        }
    }
    // Residuo final para garantizar cobertura total.
    if !record_buffer.is_empty() {
        drain_chunk(&mut record_buffer, &mut table, &mut discarded_rows);
    }

    if discarded_rows > 0 {
        warn!("📦 [SPENDING]: {} malformed rows discarded.", discarded_rows);
    }
    Ok(table)
}

fn normalize_spending_row(raw: RawSpendingCsvRow) -> Option<SpendingRow> {
    let billing_npi = raw.billing_npi.trim().to_string();
    if billing_npi.is_empty() {
        return None;
    }
    let claim_month = ClaimMonth::parse(&raw.claim_month)?;
    Some(SpendingRow {
        billing_npi,
        servicing_npi: raw.servicing_npi.trim().to_string(),
        hcpcs_code: raw.hcpcs_code.trim().to_string(),
        claim_month,
        unique_beneficiaries: raw.unique_beneficiaries.unwrap_or(0.0).max(0.0) as u64,
        total_claims: raw.total_claims.unwrap_or(0.0).max(0.0) as u64,
        total_paid: raw.total_paid.unwrap_or(0.0).max(0.0),
    })
}

// -----------------------------------------------------------------
// EXCLUSIONES LEIE
// -----------------------------------------------------------------

/// Fila cruda de la lista de exclusiones (columnas extra del publicador
/// se ignoran en la deserialización por cabecera).
#[derive(Debug, Deserialize)]
struct RawExclusionCsvRow {
    #[serde(rename = "NPI", default)]
    npi: String,
    #[serde(rename = "LASTNAME", default)]
    last_name: String,
    #[serde(rename = "FIRSTNAME", default)]
    first_name: String,
    #[serde(rename = "MIDNAME", default)]
    mid_name: String,
    #[serde(rename = "BUSNAME", default)]
    bus_name: String,
    #[serde(rename = "STATE", default)]
    state: String,
    #[serde(rename = "EXCLTYPE", default)]
    exclusion_type: String,
    #[serde(rename = "EXCLDATE", default)]
    exclusion_date: String,
    #[serde(rename = "REINDATE", default)]
    reinstatement_date: String,
}

fn load_exclusions(data_directory: &Path) -> Result<(ExclusionTable, String), StoreError> {
    let path = data_directory.join("LEIE.csv");
    if !path.exists() {
        return Err(StoreError::MissingInput(format!(
            "exclusion list (LEIE.csv) under {}",
            data_directory.display()
        )));
    }
    info!("📦 [EXCLUSIONS]: Reading {}", path.display());

    let file_handle = File::open(&path)?;
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file_handle);

    let mut entries: Vec<ExclusionEntry> = Vec::new();
    let mut discarded_rows: u64 = 0;
    for record_result in csv_reader.deserialize::<RawExclusionCsvRow>() {
        match record_result {
            Ok(raw) => entries.push(ExclusionEntry {
                npi: raw.npi.trim().to_string(),
                last_name: raw.last_name.trim().to_string(),
                first_name: raw.first_name.trim().to_string(),
                mid_name: raw.mid_name.trim().to_string(),
                bus_name: raw.bus_name.trim().to_string(),
                state: raw.state.trim().to_string(),
                exclusion_type: raw.exclusion_type.trim().to_string(),
                exclusion_date_raw: raw.exclusion_date.trim().to_string(),
                reinstatement_date_raw: raw.reinstatement_date.trim().to_string(),
            }),
            Err(_) => discarded_rows += 1,
        }
    }
    if discarded_rows > 0 {
        warn!("📦 [EXCLUSIONS]: {} malformed rows discarded.", discarded_rows);
    }
    Ok((ExclusionTable::new(entries), path.display().to_string()))
}

// -----------------------------------------------------------------
// REGISTRO NACIONAL NPPES
// -----------------------------------------------------------------

fn load_registry(
    data_directory: &Path,
    chunk_capacity: usize,
) -> Result<Option<(RegistryTable, String)>, StoreError> {
    // Opción 1: parquet slim (más rápido, más pequeño).
    for slim_candidate in [
        data_directory.join("nppes").join("nppes_slim.parquet"),
        data_directory.join("nppes_slim.parquet"),
    ] {
        if slim_candidate.exists() {
            info!("📦 [REGISTRY]: Using slim columnar file {}", slim_candidate.display());
            let table = load_registry_slim_parquet(&slim_candidate, chunk_capacity)?;
            return Ok(Some((table, slim_candidate.display().to_string())));
        }
    }

    // Opción 2: CSV ancho original del publicador.
    if let Some(wide_path) = find_wide_registry_csv(data_directory)? {
        info!("📦 [REGISTRY]: Using upstream wide CSV {}", wide_path.display());
        let table = load_registry_wide_csv(&wide_path)?;
        return Ok(Some((table, wide_path.display().to_string())));
    }

    Ok(None)
}

fn find_wide_registry_csv(data_directory: &Path) -> Result<Option<PathBuf>, StoreError> {
    if !data_directory.exists() {
        return Ok(None);
    }
    let mut candidates: Vec<PathBuf> = Vec::new();
    for dir_entry in std::fs::read_dir(data_directory)? {
        let path = dir_entry?.path();
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        if file_name.starts_with("npidata_pfile_") && file_name.ends_with(".csv") {
            candidates.push(path);
        }
    }
    // Orden lexicográfico para una elección determinista entre snapshots.
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn load_registry_slim_parquet(path: &Path, chunk_capacity: usize) -> Result<RegistryTable, StoreError> {
    let file_handle = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file_handle)?
        .with_batch_size(chunk_capacity)
        .build()?;

    let mut entries: Vec<RegistryEntry> = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let npi = string_column(&batch, "NPI")?;
        let entity_code = string_column(&batch, "entity_type_code")?;
        let org_name = string_column(&batch, "org_name")?;
        let last_name = string_column(&batch, "last_name")?;
        let first_name = string_column(&batch, "first_name")?;
        let state = string_column(&batch, "state")?;
        let postal_code = string_column(&batch, "postal_code")?;
        let taxonomy = string_column(&batch, "taxonomy_code")?;
        let enumeration = string_column(&batch, "enumeration_date")?;
        let official_last = string_column(&batch, "auth_official_last_name")?;
        let official_first = string_column(&batch, "auth_official_first_name")?;

        for row_index in 0..batch.num_rows() {
            let Some(npi_value) = optional_string(&npi, row_index) else {
                continue;
            };
            if npi_value.is_empty() {
                continue;
            }
            let enumeration_raw = optional_string(&enumeration, row_index).unwrap_or_default();
            entries.push(RegistryEntry {
                npi: npi_value,
                entity_type: EntityType::from_registry_code(
                    &optional_string(&entity_code, row_index).unwrap_or_default(),
                ),
                org_name: optional_string(&org_name, row_index).unwrap_or_default(),
                last_name: optional_string(&last_name, row_index).unwrap_or_default(),
                first_name: optional_string(&first_name, row_index).unwrap_or_default(),
                state: optional_string(&state, row_index).unwrap_or_default(),
                postal_code: optional_string(&postal_code, row_index).unwrap_or_default(),
                taxonomy_code: optional_string(&taxonomy, row_index).unwrap_or_default(),
                enumeration_month: parse_enumeration_month(&enumeration_raw),
                enumeration_date_raw: enumeration_raw,
                auth_official_last: optional_string(&official_last, row_index).unwrap_or_default(),
                auth_official_first: optional_string(&official_first, row_index).unwrap_or_default(),
            });
        }
    }
    Ok(RegistryTable::new(entries))
}

/// Fila cruda del CSV ancho del publicador (cabeceras fijas aguas arriba).
#[derive(Debug, Deserialize)]
struct RawWideRegistryRow {
    #[serde(rename = "NPI", default)]
    npi: String,
    #[serde(rename = "Entity Type Code", default)]
    entity_type_code: String,
    #[serde(rename = "Provider Organization Name (Legal Business Name)", default)]
    org_name: String,
    #[serde(rename = "Provider Last Name (Legal Name)", default)]
    last_name: String,
    #[serde(rename = "Provider First Name", default)]
    first_name: String,
    #[serde(rename = "Provider Business Practice Location Address State Name", default)]
    state: String,
    #[serde(rename = "Provider Business Practice Location Address Postal Code", default)]
    postal_code: String,
    #[serde(rename = "Healthcare Provider Taxonomy Code_1", default)]
    taxonomy_code: String,
    #[serde(rename = "Provider Enumeration Date", default)]
    enumeration_date: String,
    #[serde(rename = "Authorized Official Last Name", default)]
    auth_official_last: String,
    #[serde(rename = "Authorized Official First Name", default)]
    auth_official_first: String,
}

fn load_registry_wide_csv(path: &Path) -> Result<RegistryTable, StoreError> {
    let file_handle = File::open(path)?;
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file_handle);

    let mut entries: Vec<RegistryEntry> = Vec::new();
    let mut discarded_rows: u64 = 0;
    for record_result in csv_reader.deserialize::<RawWideRegistryRow>() {
        match record_result {
            Ok(raw) => {
                let npi = raw.npi.trim().to_string();
                if npi.is_empty() {
                    discarded_rows += 1;
                    continue;
                }
                let enumeration_raw = raw.enumeration_date.trim().to_string();
                entries.push(RegistryEntry {
                    npi,
                    entity_type: EntityType::from_registry_code(&raw.entity_type_code),
                    org_name: raw.org_name.trim().to_string(),
                    last_name: raw.last_name.trim().to_string(),
                    first_name: raw.first_name.trim().to_string(),
                    state: raw.state.trim().to_string(),
                    postal_code: raw.postal_code.trim().to_string(),
                    taxonomy_code: raw.taxonomy_code.trim().to_string(),
                    enumeration_month: parse_enumeration_month(&enumeration_raw),
                    enumeration_date_raw: enumeration_raw,
                    auth_official_last: raw.auth_official_last.trim().to_string(),
                    auth_official_first: raw.auth_official_first.trim().to_string(),
                });
            }
            Err(_) => discarded_rows += 1,
        }
    }
    if discarded_rows > 0 {
        warn!("📦 [REGISTRY]: {} malformed rows discarded.", discarded_rows);
    }
    Ok(RegistryTable::new(entries))
}

/// Decodifica la fecha de alta en cualquiera de los dos formatos del
/// publicador (`YYYY-MM-DD` slim, `MM/DD/YYYY` ancho).
fn parse_enumeration_month(raw: &str) -> Option<ClaimMonth> {
    let trimmed = raw.trim();
    if trimmed.contains('/') {
        let mut parts = trimmed.split('/');
        let month: u8 = parts.next()?.parse().ok()?;
        let _day = parts.next()?;
        let year: u16 = parts.next()?.parse().ok()?;
        return ClaimMonth::new(year, month);
    }
    ClaimMonth::parse(trimmed)
}

// -----------------------------------------------------------------
// CENSO ZCTA
// -----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawCensusCsvRow {
    zcta: String,
    #[serde(default)]
    total_population: u64,
    #[serde(default)]
    population_65_plus: u64,
    #[serde(default)]
    disability_count: u64,
    #[serde(default)]
    poverty_count: u64,
}

fn load_census(data_directory: &Path) -> Result<Option<(CensusTable, String)>, StoreError> {
    let path = data_directory.join("census_zcta.csv");
    if !path.exists() {
        return Ok(None);
    }
    info!("📦 [CENSUS]: Reading {}", path.display());
    let file_handle = File::open(&path)?;
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(file_handle);

    let mut rows: Vec<CensusRow> = Vec::new();
    for record_result in csv_reader.deserialize::<RawCensusCsvRow>() {
        let Ok(raw) = record_result else { continue };
        rows.push(CensusRow {
            zcta: raw.zcta.trim().to_string(),
            total_population: raw.total_population,
            population_65_plus: raw.population_65_plus,
            disability_count: raw.disability_count,
            poverty_count: raw.poverty_count,
        });
    }
    Ok(Some((CensusTable::new(rows), path.display().to_string())))
}

// -----------------------------------------------------------------
// KERNELS DE COLUMNA ARROW
// -----------------------------------------------------------------

fn named_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::Schema(format!("required column '{name}' absent")))
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray, StoreError> {
    let column = named_column(batch, name)?;
    let casted = cast(column.as_ref(), &DataType::Utf8)?;
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| StoreError::Schema(format!("column '{name}' not castable to Utf8")))
}

fn u64_column(batch: &RecordBatch, name: &str) -> Result<UInt64Array, StoreError> {
    let column = named_column(batch, name)?;
    let casted = cast(column.as_ref(), &DataType::UInt64)?;
    casted
        .as_any()
        .downcast_ref::<UInt64Array>()
        .cloned()
        .ok_or_else(|| StoreError::Schema(format!("column '{name}' not castable to UInt64")))
}

fn f64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array, StoreError> {
    let column = named_column(batch, name)?;
    let casted = cast(column.as_ref(), &DataType::Float64)?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| StoreError::Schema(format!("column '{name}' not castable to Float64")))
}

fn optional_string(array: &StringArray, row_index: usize) -> Option<String> {
    if array.is_null(row_index) {
        None
    } else {
        Some(array.value(row_index).trim().to_string())
    }
}

fn optional_u64(array: &UInt64Array, row_index: usize) -> u64 {
    if array.is_null(row_index) {
        0
    } else {
        array.value(row_index)
    }
}

fn optional_f64(array: &Float64Array, row_index: usize) -> f64 {
    if array.is_null(row_index) {
        0.0
    } else {
        array.value(row_index)
    }
}
