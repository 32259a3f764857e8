// [libs/domain/signals/src/detectors/mod.rs]
/*!
 * =================================================================
 * APARATO: DETECTOR ENGINE BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE LAS FAMILIAS ANALÍTICAS DEL CATÁLOGO
 *
 * Cada familia agrupa detectores que comparten el mismo agregado raíz:
 * exclusiones, estadística poblacional, series mensuales, volumen,
 * home health, redes de oficiales, hubs de servicio y perfiles de código.
 * =================================================================
 */

pub mod concentration;
pub mod excluded;
pub mod home_health;
pub mod networks;
pub mod servicing_hubs;
pub mod statistical;
pub mod temporal;
pub mod volume;

use centinela_domain_models::SignalCandidate;

/// Redondeo a décimas para ratios de evidencia.
pub(crate) fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Redondeo a milésimas para fracciones de concentración.
pub(crate) fn round_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Orden canónico de salida de un detector: monto de referencia DESC,
/// empates por NPI ASC, truncado al tope configurado.
pub(crate) fn rank_and_truncate(
    mut candidates: Vec<(f64, SignalCandidate)>,
    limit: usize,
) -> Vec<SignalCandidate> {
    candidates.sort_by(|left, right| {
        right
            .0
            .total_cmp(&left.0)
            .then_with(|| left.1.npi.cmp(&right.1.npi))
    });
    candidates.truncate(limit);
    candidates.into_iter().map(|(_, candidate)| candidate).collect()
}
