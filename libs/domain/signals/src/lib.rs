// [libs/domain/signals/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SIGNAL DOMAIN BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DEL CATÁLOGO FORENSE Y SUS RESOLUTORES
 *
 * ## Visión Holística 2026
 * Los detectores forman un DAG enraizado en los agregados compartidos:
 * cada uno es una función pura sobre el contexto columnar que produce
 * una lista plana de candidatos, sin referencias entre detectores. La
 * política inter-señal (escalación de severidad, suma de sobrepagos)
 * vive exclusivamente en el resolutor de fusión.
 * =================================================================
 */

use centinela_infra_store::{Aggregates, ColumnStore};
use thiserror::Error;

/// Anotador de relevancia bajo la False Claims Act.
pub mod annotate;

/// Registro ejecutable del catálogo, cancelación y aislamiento de fallos.
pub mod catalog;

/// Umbrales y topes ajustables de los 19 detectores.
pub mod config;

/// Los motores de detección, agrupados por familia analítica.
pub mod detectors;

/// Enriquecimiento de identidad contra el registro local y el uplink HTTP.
pub mod enrich;

/// Resolutor de fusión por NPI y escalación de severidad.
pub mod merge;

pub use crate::catalog::{run_catalog, CancellationFlag, CatalogRun, SkippedDetector};
pub use crate::config::DetectionConfig;
pub use crate::merge::{merge_candidates, MergedProvider};

/// Contexto de solo lectura compartido por todos los detectores.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'snapshot> {
    pub store: &'snapshot ColumnStore,
    pub aggregates: &'snapshot Aggregates,
}

/// Fallos locales a un detector. Se capturan en la frontera del catálogo:
/// el detector afectado no aporta filas y la corrida continúa.
#[derive(Error, Debug)]
pub enum SignalError {
    /// Violación de precondición interna del detector.
    #[error("[L2_SIGNAL_FAULT]: DETECTOR_PRECONDITION_VIOLATION -> {0}")]
    Precondition(String),

    /// Fallo de ensamblaje del mapa de evidencia JSON.
    #[error("[L2_SIGNAL_FAULT]: EVIDENCE_ASSEMBLY_COLLAPSED -> {0}")]
    Evidence(#[from] serde_json::Error),
}
