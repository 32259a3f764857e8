// [libs/domain/signals/src/catalog.rs]
/*!
 * =================================================================
 * APARATO: DETECTOR CATALOG RUNNER (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ORCHESTRATION (ESTRATO L2)
 * RESPONSABILIDAD: EJECUCIÓN SECUENCIAL, CANCELACIÓN Y AISLAMIENTO
 *
 * # Política de fallos (taxonomía del motor):
 * - Detector deshabilitado, cancelado o degradado: no corre; queda en
 *   'skipped' con su razón para el reporte.
 * - Detector fallido: el error se registra con su contexto; aporta cero
 *   filas; la corrida continúa. Solo la configuración y la escritura
 *   del reporte son fatales, y viven fuera de este estrato.
 * =================================================================
 */

use crate::detectors;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{SignalCandidate, SignalKind, SIGNAL_CATALOG_ORDER};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Señales que requieren el registro nacional para ejecutar.
const REGISTRY_DEPENDENT_SIGNALS: [SignalKind; 6] = [
    SignalKind::ShellEntityNetwork,
    SignalKind::GeographicAnomaly,
    SignalKind::WorkforceImpossibility,
    SignalKind::BurstEnrollmentNetwork,
    SignalKind::CoordinatedBillingRamp,
    SignalKind::BeneficiaryDilution,
];

/// Bandera de cancelación de corrida completa, honrada en las fronteras
/// entre detectores y antes del ensamblado del reporte.
#[derive(Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Detector omitido y la razón registrada en el reporte.
#[derive(Debug, Clone)]
pub struct SkippedDetector {
    pub kind: SignalKind,
    pub reason: String,
}

/// Resultado de la pasada completa del catálogo.
#[derive(Debug, Default)]
pub struct CatalogRun {
    /// Candidatos de todos los detectores que corrieron, en orden de catálogo.
    pub candidates: Vec<SignalCandidate>,
    /// Detectores que ejecutaron (incluso con cero filas).
    pub executed: Vec<SignalKind>,
    /// Detectores que no aportaron filas por omisión, cancelación o fallo.
    pub skipped: Vec<SkippedDetector>,
}

/// Despacho nominal del catálogo (el índice + 1 es el ID de CLI).
fn dispatch(
    kind: SignalKind,
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    match kind {
        SignalKind::ExcludedProviderBilling => detectors::excluded::detect_excluded_providers(context, config),
        SignalKind::StatisticalBillingOutlier => detectors::statistical::detect_billing_outliers(context, config),
        SignalKind::BustOutScheme => detectors::temporal::detect_bust_out_schemes(context, config),
        SignalKind::ImpossibleServiceVolume => detectors::volume::detect_impossible_volume(context, config),
        SignalKind::HomeHealthAbuse => detectors::home_health::detect_home_health_abuse(context, config),
        SignalKind::ShellEntityNetwork => detectors::networks::detect_shell_networks(context, config),
        SignalKind::GeographicAnomaly => detectors::statistical::detect_geographic_anomalies(context, config),
        SignalKind::TemporalBillingAnomaly => detectors::temporal::detect_temporal_anomalies(context, config),
        SignalKind::ProcedureCodeConcentration => detectors::concentration::detect_procedure_concentration(context, config),
        SignalKind::WorkforceImpossibility => detectors::volume::detect_workforce_impossibility(context, config),
        SignalKind::BurstEnrollmentNetwork => detectors::networks::detect_burst_enrollment(context, config),
        SignalKind::CoordinatedBillingRamp => detectors::networks::detect_coordinated_ramp(context, config),
        SignalKind::PhantomServicingHub => detectors::servicing_hubs::detect_phantom_hub(context, config),
        SignalKind::BeneficiaryDilution => detectors::networks::detect_beneficiary_dilution(context, config),
        SignalKind::RepetitiveServiceAbuse => detectors::concentration::detect_repetitive_service(context, config),
        SignalKind::BillingMonoculture => detectors::concentration::detect_billing_monoculture(context, config),
        SignalKind::RampAndCollapse => detectors::temporal::detect_ramp_and_collapse(context, config),
        SignalKind::ReimbursementRateAnomaly => detectors::concentration::detect_rate_anomalies(context, config),
        SignalKind::PhantomServicingSpread => detectors::servicing_hubs::detect_phantom_spread(context, config),
    }
}

/// Ejecuta el catálogo habilitado en orden nominal, de forma secuencial.
/// 'on_detector' se invoca antes de cada detector (telemetría del operador).
pub fn run_catalog<ProgressCallback>(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
    enabled: &BTreeSet<SignalKind>,
    cancellation: &CancellationFlag,
    mut on_detector: ProgressCallback,
) -> CatalogRun
where
    ProgressCallback: FnMut(SignalKind),
{
    let mut run = CatalogRun::default();

    for kind in SIGNAL_CATALOG_ORDER {
        if !enabled.contains(&kind) {
            run.skipped.push(SkippedDetector {
                kind,
                reason: "disabled via --signals".to_string(),
            });
            continue;
        }
        if cancellation.is_cancelled() {
            warn!("🛑 [CATALOG]: run cancelled — detector {} not started.", kind.as_str());
            run.skipped.push(SkippedDetector {
                kind,
                reason: "run cancelled".to_string(),
            });
            continue;
        }
        if REGISTRY_DEPENDENT_SIGNALS.contains(&kind) && !context.store.registry_available() {
            warn!(
                "📡 [DEGRADATION]: detector {} requires the national registry — skipped.",
                kind.as_str()
            );
            run.skipped.push(SkippedDetector {
                kind,
                reason: "national registry unavailable (degraded)".to_string(),
            });
            continue;
        }

        on_detector(kind);
        match dispatch(kind, context, config) {
            Ok(candidates) => {
                info!(
                    "🎯 [CATALOG]: signal {} ({}) -> {} candidates.",
                    kind.catalog_id(),
                    kind.as_str(),
                    candidates.len()
                );
                run.executed.push(kind);
                run.candidates.extend(candidates);
            }
            Err(detector_error) => {
                error!(
                    "💥 [CATALOG]: signal {} ({}) collapsed -> {} — contributing zero rows.",
                    kind.catalog_id(),
                    kind.as_str(),
                    detector_error
                );
                run.skipped.push(SkippedDetector {
                    kind,
                    reason: format!("detector failed: {detector_error}"),
                });
            }
        }
    }

    run
}
