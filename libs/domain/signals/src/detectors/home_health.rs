// [libs/domain/signals/src/detectors/home_health.rs]
/*!
 * =================================================================
 * APARATO: HOME HEALTH ENGINE (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: SEÑAL S5 — ABUSO DE FACTURACIÓN HOME HEALTH
 *
 * # Contexto de evidencia:
 * Cuando el registro está presente, la evidencia incorpora el contexto
 * del ZIP del proveedor (densidad home-health del vecindario) y, si el
 * censo ZCTA está cargado, la población del ZIP. Ambos contextos se
 * omiten limpiamente cuando sus fuentes faltan.
 * =================================================================
 */

use super::round_tenths;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, EntityType, Severity, SignalCandidate, SignalKind,
    SignalRecord,
};
use serde_json::json;
use tracing::info;

/// S5 — Abuso home health: ratio reclamos/beneficiario por encima de 50
/// sobre el subconjunto de códigos home-health.
pub fn detect_home_health_abuse(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let registry = context.store.registry.as_ref();
    let census = context.store.census.as_ref();
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, rollup) in &aggregates.provider_hh_totals {
        let totals = rollup.totals;
        if totals.beneficiaries == 0 {
            continue;
        }
        let claims_per_beneficiary = totals.claims as f64 / totals.beneficiaries as f64;
        if claims_per_beneficiary <= config.hh_claims_per_beneficiary_threshold
            || totals.paid <= config.hh_min_paid
        {
            continue;
        }

        // Exceso sobre la norma de reclamos razonables por beneficiario.
        let reasonable_claims =
            totals.beneficiaries as f64 * config.hh_reasonable_claims_per_beneficiary;
        let excess_ratio = (totals.claims as f64 - reasonable_claims).max(0.0) / totals.claims as f64;
        let estimated_overpayment = totals.paid * excess_ratio;

        let mut evidence = json!({
            "total_home_health_claims": totals.claims,
            "total_home_health_beneficiaries": totals.beneficiaries,
            "claims_per_beneficiary": round_tenths(claims_per_beneficiary),
            "total_home_health_paid": round_cents(totals.paid),
            "distinct_hcpcs_codes_used": rollup.distinct_codes,
            "billing_months": rollup.billing_months,
            "threshold_claims_per_bene": config.hh_claims_per_beneficiary_threshold,
        });

        // Contexto de densidad del ZIP (requiere registro; censo opcional).
        if let Some(registry_table) = registry {
            if let Some(entry) = registry_table.lookup(npi) {
                let zip = entry.zip5().to_string();
                if let Some(zip_rows) = aggregates.hh_zip_totals.get(&zip) {
                    let zip_paid: f64 = zip_rows.iter().map(|row| row.totals.paid).sum();
                    evidence["zip_code"] = json!(zip);
                    evidence["hh_providers_in_zip"] = json!(zip_rows.len());
                    evidence["zip_home_health_paid"] = json!(round_cents(zip_paid));
                }
                if let Some(census_row) = census.and_then(|table| table.lookup(entry.zip5())) {
                    evidence["zip_population"] = json!(census_row.total_population);
                    evidence["zip_population_65_plus"] = json!(census_row.population_65_plus);
                }
            }
        }

        let description = format!(
            "Provider NPI {npi} billed {claims} home health claims for {benes} beneficiaries \
             (ratio 1:{ratio:.0}). Total: {paid} across {months} months using {codes} HCPCS codes.",
            claims = totals.claims,
            benes = totals.beneficiaries,
            ratio = claims_per_beneficiary,
            paid = format_usd(totals.paid),
            months = rollup.billing_months,
            codes = rollup.distinct_codes,
        );

        let candidate = SignalCandidate {
            npi: npi.clone(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: totals.paid,
            total_claims: totals.claims,
            total_beneficiaries: totals.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::HomeHealthAbuse,
                severity: Severity::High,
                description,
                evidence,
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Proportion of claims exceeding 10 claims/beneficiary \
                     applied to total payments. Home health >50/beneficiary is abusive."
                    .to_string(),
            },
        };
        ranked.push((totals.paid, candidate));
    }

    info!("🏠 [S5_HOME_HEALTH]: {} providers with abusive ratios.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.hh_limit))
}
