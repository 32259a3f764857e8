// [libs/domain/signals/src/detectors/statistical.rs]
/*!
 * =================================================================
 * APARATO: POPULATION STATISTICS ENGINES (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S2 (OUTLIER 3-SIGMA) Y S7 (PARES POR ESTADO)
 *
 * # Degeneración:
 * Una población de sigma cero no emite filas: el z-score no existe y el
 * umbral µ + k·sigma colapsa sobre la media. El blindaje vive en
 * PopulationSummary::z_score, no en cada predicado.
 * =================================================================
 */

use super::round_thousandths;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_core_stats::PopulationSummary;
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, EntityType, Severity, SignalCandidate, SignalKind,
    SignalRecord,
};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// S2 — Outlier estadístico de facturación sobre la población completa.
pub fn detect_billing_outliers(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;

    let paid_population: Vec<f64> = aggregates
        .provider_totals
        .values()
        .filter(|totals| totals.paid > 0.0)
        .map(|totals| totals.paid)
        .collect();

    let Some(summary) = PopulationSummary::from_values(paid_population) else {
        return Ok(Vec::new());
    };
    if summary.std_dev <= 0.0 {
        warn!("📈 [S2_OUTLIER]: degenerate population (sigma = 0) — no rows emitted.");
        return Ok(Vec::new());
    }

    let sigma_threshold = summary.sigma_threshold(config.outlier_z_threshold);
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, totals) in &aggregates.provider_totals {
        if totals.paid <= 0.0 {
            continue;
        }
        let Some(z_score) = summary.z_score(totals.paid) else {
            continue;
        };
        if z_score <= config.outlier_z_threshold {
            continue;
        }
        let estimated_overpayment = (totals.paid - sigma_threshold).max(0.0);

        let description = format!(
            "Provider NPI {npi} billed {paid} total — {z:.1} standard deviations above the mean \
             (mean={mean}, median={median}, sigma={sigma}). This is a significant statistical outlier.",
            paid = format_usd(totals.paid),
            z = z_score,
            mean = format_usd(summary.mean),
            median = format_usd(summary.median),
            sigma = format_usd(summary.std_dev),
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
                signal_type: SignalKind::StatisticalBillingOutlier,
                severity: Severity::High,
                description,
                evidence: json!({
                    "total_paid": round_cents(totals.paid),
                    "mean_paid_all_providers": round_cents(summary.mean),
                    "median_paid_all_providers": round_cents(summary.median),
                    "std_dev_paid": round_cents(summary.std_dev),
                    "iqr": round_cents(summary.interquartile_range()),
                    "z_score": round_cents(z_score),
                    "threshold_3sigma": round_cents(sigma_threshold),
                    "total_claims": totals.claims,
                    "total_unique_beneficiaries": totals.beneficiaries,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: format!(
                    "Amount exceeding 3-sigma threshold ({}). This is the statistically anomalous \
                     portion of billing.",
                    format_usd(sigma_threshold)
                ),
            },
        };
        ranked.push((totals.paid, candidate));
    }

    info!(
        "📈 [S2_OUTLIER]: {} providers above z > {:.1}.",
        ranked.len(),
        config.outlier_z_threshold
    );
    Ok(super::rank_and_truncate(ranked, config.outlier_limit))
}

/// S7 — Anomalía geográfica: facturación muy por encima de los pares del
/// mismo estado. Depende del registro (el catálogo la omite si falta).
pub fn detect_geographic_anomalies(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;

    // Partición por estado del registro (solo estados con población mínima).
    let mut state_members: BTreeMap<String, Vec<(&String, f64)>> = BTreeMap::new();
    for (npi, totals) in &aggregates.provider_totals {
        if totals.paid <= config.geo_min_provider_paid {
            continue;
        }
        let Some(entry) = registry.lookup(npi) else { continue };
        let state = entry.state.trim();
        if state.is_empty() {
            continue;
        }
        state_members
            .entry(state.to_string())
            .or_default()
            .push((npi, totals.paid));
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (state, members) in &state_members {
        if members.len() < config.geo_min_state_providers {
            continue;
        }
        let Some(summary) =
            PopulationSummary::from_values(members.iter().map(|(_, paid)| *paid).collect())
        else {
            continue;
        };
        if summary.std_dev <= 0.0 {
            continue;
        }
        let sigma_threshold = summary.sigma_threshold(config.geo_z_threshold);

        for (npi, paid) in members {
            let Some(z_score) = summary.z_score(*paid) else { continue };
            if z_score <= config.geo_z_threshold {
                continue;
            }
            let totals = aggregates.provider_totals[*npi];
            let Some(entry) = registry.lookup(npi) else { continue };
            let estimated_overpayment = (*paid - sigma_threshold).max(0.0);
            let severity = if estimated_overpayment < config.severity_escalation_floor {
                Severity::Medium
            } else {
                Severity::High
            };

            // Contexto de dispersión de estados de servicio para el
            // investigador (plausibilidad geográfica del perfil).
            let mut distinct_servicing_states: std::collections::BTreeSet<&str> =
                std::collections::BTreeSet::new();
            let mut home_state_paid = 0.0_f64;
            let mut servicing_paid_total = 0.0_f64;
            if let Some(state_months) = aggregates.serv_state_monthly.get(*npi) {
                for ((_, servicing_state), link_totals) in state_months {
                    distinct_servicing_states.insert(servicing_state.as_str());
                    servicing_paid_total += link_totals.paid;
                    if servicing_state == state {
                        home_state_paid += link_totals.paid;
                    }
                }
            }
            let out_of_state_share = if servicing_paid_total > 0.0 {
                Some(round_thousandths(1.0 - home_state_paid / servicing_paid_total))
            } else {
                None
            };

            let description = format!(
                "Provider NPI {npi} in {state} billed {paid_usd} — {z:.1} std dev above {state} \
                 state mean ({mean_usd}, n={population}). Billing intensity far exceeds geographic peers.",
                paid_usd = format_usd(*paid),
                z = z_score,
                mean_usd = format_usd(summary.mean),
                population = members.len(),
            );

            let candidate = SignalCandidate {
                npi: (*npi).clone(),
                provider_name: placeholder_name(npi),
                entity_type: entry.entity_type,
                state: state.clone(),
                total_paid: totals.paid,
                total_claims: totals.claims,
                total_beneficiaries: totals.beneficiaries,
                signal: SignalRecord {
                    signal_type: SignalKind::GeographicAnomaly,
                    severity,
                    description,
                    evidence: json!({
                        "state": state,
                        "taxonomy_code": entry.taxonomy_code,
                        "total_paid": round_cents(*paid),
                        "state_mean_paid": round_cents(summary.mean),
                        "state_median_paid": round_cents(summary.median),
                        "state_std_dev": round_cents(summary.std_dev),
                        "state_z_score": round_cents(z_score),
                        "providers_in_state": members.len(),
                        "threshold_4sigma": round_cents(sigma_threshold),
                        "distinct_servicing_states": distinct_servicing_states.len(),
                        "out_of_state_paid_share": out_of_state_share,
                    }),
                    estimated_overpayment_usd: round_cents(estimated_overpayment),
                    overpayment_methodology: format!(
                        "Amount above 4-sigma threshold for {state} ({}). Geographic peers used \
                         as baseline.",
                        format_usd(sigma_threshold)
                    ),
                },
            };
            ranked.push((totals.paid, candidate));
        }
    }

    info!(
        "🗺️ [S7_GEOGRAPHIC]: {} providers above state z > {:.1}.",
        ranked.len(),
        config.geo_z_threshold,
    );
    Ok(super::rank_and_truncate(ranked, config.geo_limit))
}
