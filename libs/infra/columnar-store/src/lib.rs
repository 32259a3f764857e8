// [libs/infra/columnar-store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: COLUMNAR STORE ROOT (V3.0 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CONTEXTO DE EJECUCIÓN COLUMNAR DE SOLO LECTURA
 *
 * ## Visión Holística 2026
 * Tras la carga inicial, las tablas normalizadas y los agregados
 * materializados son inmutables durante toda la corrida. Los detectores
 * consumen exclusivamente los agregados; ninguna señal vuelve a escanear
 * las filas crudas de gasto.
 * =================================================================
 */

/// Catálogo semántico de fallos de ingesta y materialización.
pub mod errors;

/// Tablas normalizadas (gasto, exclusiones, registro, censo) y code sets.
pub mod schema;

/// Política del techo de memoria y dimensionado de ráfagas de ingesta.
pub mod memory;

/// Cargadores Parquet/CSV de los tres datasets y el censo opcional.
pub mod ingest;

/// Agregados materializados una vez por corrida (contrato de los detectores).
pub mod aggregates;

pub use crate::aggregates::{Aggregates, BillingTotals, CodeProviderRow, HomeHealthRollup, HubLink, ZipHomeHealthRow};
pub use crate::errors::StoreError;
pub use crate::ingest::{load_all, IngestOptions};
pub use crate::memory::{ingestion_chunk_capacity, parse_memory_limit};
pub use crate::schema::{
    is_evaluation_management_code, is_home_health_code, CensusRow, CensusTable, ColumnStore,
    ExclusionEntry, ExclusionTable, RegistryEntry, RegistryTable, SpendingTable,
};
