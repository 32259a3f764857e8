// [apps/signal-hunter/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SIGNAL HUNTER LIBRARY (V3.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN DEL PIPELINE Y EL CONSTRUCTOR DE REPORTE
 *
 * El binario es un orquestador puro y ligero: toda la lógica de corrida
 * reside aquí para permitir su auditoría en Proving Grounds.
 * =================================================================
 */

/// Orquestación de la corrida completa: carga, catálogo, fusión, reporte.
pub mod pipeline;

/// Ensamblado y escritura del reporte `fraud_signals.json`.
pub mod report;

pub use pipeline::{execute_run, parse_signal_selection, RunOptions};
pub use report::{build_report, write_report, ReportInputs, TOOL_VERSION};
