// [libs/domain/models/src/report.rs]
/*!
 * =================================================================
 * APARATO: FRAUD REPORT MODEL (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: ESQUEMA DEL REPORTE JSON DE EVIDENCIA FINAL
 *
 * # Invariantes de serialización:
 * - 'flagged_providers' está ordenado por sobrepago combinado DESC,
 *   empates por NPI ASC; ningún NPI aparece dos veces.
 * - 'total_estimated_overpayment_usd' es la suma de los combinados.
 * - Reconstruir el reporte sobre el mismo snapshot produce bytes
 *   idénticos módulo 'generated_at'.
 * =================================================================
 */

use crate::provider::EntityType;
use crate::signal::SignalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anotación de relevancia bajo la False Claims Act para un proveedor,
/// parametrizada por su señal dominante.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcaRelevance {
    pub violation_description: String,
    pub claim_type: String,
    pub statute_reference: String,
    pub estimated_government_loss: f64,
    pub suggested_investigation_steps: Vec<String>,
}

/// Entrada final del reporte para un proveedor marcado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedProvider {
    pub npi: String,
    pub provider_name: String,
    pub entity_type: EntityType,
    pub taxonomy_code: String,
    pub state: String,
    pub enumeration_date: Option<String>,
    pub total_paid_all_time: f64,
    pub total_claims_all_time: u64,
    pub total_unique_beneficiaries_all_time: u64,
    pub signals: Vec<SignalRecord>,
    pub combined_estimated_overpayment_usd: f64,
    pub fca_relevance: FcaRelevance,
}

/// Documento raíz del reporte `fraud_signals.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReport {
    /// UTC, RFC 3339.
    pub generated_at: String,
    pub tool_version: String,
    pub data_sources_used: Vec<String>,
    pub methodology_summary: String,
    pub total_providers_scanned: u64,
    pub total_providers_flagged: u64,
    pub total_estimated_overpayment_usd: f64,
    /// Conteo de proveedores marcados por cada detector que corrió
    /// (cero incluido, para distinguir "nada hallado" de "omitido").
    pub signal_counts: BTreeMap<String, u64>,
    /// Detectores deshabilitados, cancelados o degradados a vacío.
    pub detectors_skipped: Vec<String>,
    pub flagged_providers: Vec<FlaggedProvider>,
}
