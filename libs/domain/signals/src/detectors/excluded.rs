// [libs/domain/signals/src/detectors/excluded.rs]
/*!
 * =================================================================
 * APARATO: EXCLUDED PROVIDER ENGINE (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: SEÑAL S1 — EXCLUIDOS QUE SIGUEN FACTURANDO
 *
 * # Predicado:
 * Join por NPI (hash de cadenas opacas) entre las exclusiones activas
 * enlazables y los totales de facturación. Todo pago a un excluido es
 * impropio: el sobrepago es el 100% de lo pagado.
 * =================================================================
 */

use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, Severity, SignalCandidate, SignalKind, SignalRecord,
};
use serde_json::json;
use tracing::info;

/// S1 — Proveedores excluidos con actividad de facturación. Severidad crítica.
pub fn detect_excluded_providers(
    context: &AnalysisContext<'_>,
    _config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    // Las exclusiones activas iteran en orden ascendente de NPI; el join
    // contra los agregados es una búsqueda directa por clave.
    for (npi, exclusion) in context.store.exclusions.active_entries() {
        let Some(totals) = aggregates.provider_totals.get(npi) else {
            continue;
        };
        if totals.paid <= 0.0 {
            continue;
        }
        let Some(monthly) = aggregates.provider_monthly.get(npi) else {
            continue;
        };
        let first_billing_month = monthly.keys().next().copied();
        let last_billing_month = monthly.keys().next_back().copied();
        let billing_months_count = monthly.len() as u64;

        let display_name = exclusion.display_name();
        let provider_name = if display_name.is_empty() {
            placeholder_name(npi)
        } else {
            display_name
        };

        let description = format!(
            "Provider {provider_name} (NPI: {npi}) appears on the OIG LEIE exclusion list \
             (type: {excl_type}, excluded: {excl_date}) but received {paid} in Medicaid payments \
             across {months} billing months (from {first} to {last}).",
            excl_type = exclusion.exclusion_type,
            excl_date = exclusion.exclusion_date_raw,
            paid = format_usd(totals.paid),
            months = billing_months_count,
            first = first_billing_month.map(|month| month.to_string()).unwrap_or_default(),
            last = last_billing_month.map(|month| month.to_string()).unwrap_or_default(),
        );

        let candidate = SignalCandidate {
            npi: npi.to_string(),
            provider_name,
            entity_type: exclusion.entity_type(),
            state: exclusion.state.clone(),
            total_paid: totals.paid,
            total_claims: totals.claims,
            total_beneficiaries: totals.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::ExcludedProviderBilling,
                severity: Severity::Critical,
                description,
                evidence: json!({
                    "oig_exclusion_type": exclusion.exclusion_type,
                    "oig_exclusion_date": exclusion.exclusion_date_raw,
                    "oig_exclusion_state": exclusion.state,
                    "total_paid_post_exclusion": round_cents(totals.paid),
                    "total_claims_post_exclusion": totals.claims,
                    "billing_months_count": billing_months_count,
                    "first_billing_month": first_billing_month,
                    "last_billing_month": last_billing_month,
                }),
                estimated_overpayment_usd: round_cents(totals.paid),
                overpayment_methodology: "100% of payments to excluded providers are improper \
                     under 42 CFR 1001.1901. Federal law prohibits any Medicaid payment to \
                     excluded individuals or entities."
                    .to_string(),
            },
        };
        ranked.push((totals.paid, candidate));
    }

    info!(
        "🚨 [S1_EXCLUDED]: {} excluded providers with billing activity.",
        ranked.len()
    );
    Ok(super::rank_and_truncate(ranked, usize::MAX))
}
