// [libs/core/stats-engine/src/guards.rs]
// =================================================================
// APARATO: DENOMINATOR SHIELD (V3.0)
// RESPONSABILIDAD: RATIOS BLINDADOS Y CENTINELAS DE UMBRAL
// ESTADO: NO-REGRESSIONS / AUDIT-READY
// =================================================================

/// Centinela retornado por un ratio con denominador degenerado. Falla
/// limpiamente cualquier umbral de cota superior del catálogo.
pub const RATIO_SENTINEL: f64 = 999_999.0;

/// Centinela de incremento porcentual cuando el mes base es cero.
pub const PERCENT_SENTINEL: f64 = 99_999.0;

/// División blindada: `numerator / denominator`, o [`RATIO_SENTINEL`]
/// cuando el denominador no es estrictamente positivo.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        RATIO_SENTINEL
    }
}

/// Incremento porcentual `(peak/first - 1) * 100`, con centinela para
/// bases degeneradas.
pub fn percent_increase(first_value: f64, peak_value: f64) -> f64 {
    if first_value > 0.0 {
        (peak_value / first_value - 1.0) * 100.0
    } else {
        PERCENT_SENTINEL
    }
}
