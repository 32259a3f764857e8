// [libs/domain/signals/src/detectors/concentration.rs]
/*!
 * =================================================================
 * APARATO: CODE PROFILE ENGINES (V3.4 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S9, S15, S16 Y S18 (PERFILES POR CÓDIGO)
 *
 * # Grupos de peers:
 * S15 y S18 comparan contra la mediana de los pares que facturan el
 * mismo código HCPCS; un código con menos de diez pares elegibles no
 * produce comparaciones. El proveedor evaluado integra su propia
 * población de peers (estadística poblacional completa, sin muestreo).
 * =================================================================
 */

use super::{round_tenths, round_thousandths};
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_core_stats::median_of;
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, EntityType, Severity, SignalCandidate, SignalKind,
    SignalRecord,
};
use centinela_infra_store::is_evaluation_management_code;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// Código dominante por pago dentro del perfil de un proveedor
/// (el código lexicográficamente menor gana el empate).
fn dominant_code<'a>(
    code_map: &'a BTreeMap<String, centinela_infra_store::BillingTotals>,
) -> (&'a str, f64) {
    let mut dominant: (&str, f64) = ("", f64::MIN);
    for (code, totals) in code_map {
        if totals.paid > dominant.1 {
            dominant = (code.as_str(), totals.paid);
        }
    }
    dominant
}

/// S9 — Concentración de códigos: <= 3 códigos y > 90% del pago en uno.
pub fn detect_procedure_concentration(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, code_map) in &context.aggregates.provider_code_totals {
        if code_map.len() > config.concentration_max_codes {
            continue;
        }
        let total_paid: f64 = code_map.values().map(|totals| totals.paid).sum();
        let total_claims: u64 = code_map.values().map(|totals| totals.claims).sum();
        if total_paid <= config.concentration_min_paid {
            continue;
        }
        let (dominant, dominant_paid) = dominant_code(code_map);
        let concentration_ratio = dominant_paid / total_paid;
        if concentration_ratio <= config.concentration_ratio {
            continue;
        }

        let estimated_overpayment = 0.4 * total_paid;
        let description = format!(
            "Provider NPI {npi} bills {pct:.0}% of {paid} using HCPCS code {dominant} \
             ({codes} total codes). Such extreme concentration is atypical and suggests upcoding \
             or service fabrication.",
            pct = concentration_ratio * 100.0,
            paid = format_usd(total_paid),
            codes = code_map.len(),
        );

        let candidate = SignalCandidate {
            npi: npi.clone(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid,
            total_claims,
            total_beneficiaries: 0,
            signal: SignalRecord {
                signal_type: SignalKind::ProcedureCodeConcentration,
                severity: Severity::Medium,
                description,
                evidence: json!({
                    "dominant_hcpcs_code": dominant,
                    "concentration_ratio": round_thousandths(concentration_ratio),
                    "total_distinct_codes": code_map.len(),
                    "dominant_code_paid": round_cents(dominant_paid),
                    "total_paid": round_cents(total_paid),
                    "total_claims": total_claims,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 40% of total billing. Providers using 1-3 \
                     codes for >90% of billing likely have an atypical practice pattern."
                    .to_string(),
            },
        };
        ranked.push((total_paid, candidate));
    }

    info!("🧿 [S9_CONCENTRATION]: {} concentrated billing profiles.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.concentration_limit))
}

/// S16 — Monocultivo: un solo código cubre >= 95% del pago total, sin
/// importar cuántos códigos residuales existan.
pub fn detect_billing_monoculture(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, code_map) in &aggregates.provider_code_totals {
        let total_paid: f64 = code_map.values().map(|totals| totals.paid).sum();
        let total_claims: u64 = code_map.values().map(|totals| totals.claims).sum();
        if total_paid <= config.monoculture_min_paid || total_claims < config.monoculture_min_claims {
            continue;
        }
        let (dominant, dominant_paid) = dominant_code(code_map);
        let dominant_share = dominant_paid / total_paid;
        if dominant_share < config.monoculture_ratio {
            continue;
        }

        // Contexto E&M: fracción del perfil dentro del code set de
        // evaluación y manejo (proyección spending_em).
        let em_paid_share = aggregates
            .provider_em_totals
            .get(npi)
            .map(|em| round_thousandths(em.paid / total_paid))
            .unwrap_or(0.0);

        let estimated_overpayment = 0.3 * total_paid;
        let description = format!(
            "Provider NPI {npi} bills a single HCPCS code {dominant} for {pct:.0}% of {paid} \
             across {codes} codes — a billing monoculture atypical for any specialty.",
            pct = dominant_share * 100.0,
            paid = format_usd(total_paid),
            codes = code_map.len(),
        );

        let candidate = SignalCandidate {
            npi: npi.clone(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid,
            total_claims,
            total_beneficiaries: 0,
            signal: SignalRecord {
                signal_type: SignalKind::BillingMonoculture,
                severity: Severity::Medium,
                description,
                evidence: json!({
                    "dominant_hcpcs_code": dominant,
                    "dominant_code_share": round_thousandths(dominant_share),
                    "dominant_code_is_evaluation_management": is_evaluation_management_code(dominant),
                    "em_paid_share": em_paid_share,
                    "total_distinct_codes": code_map.len(),
                    "total_paid": round_cents(total_paid),
                    "total_claims": total_claims,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 30% of total billing. A single code at \
                     >=95% of paid indicates template billing rather than clinical practice."
                    .to_string(),
            },
        };
        ranked.push((total_paid, candidate));
    }

    info!("🌾 [S16_MONOCULTURE]: {} billing monocultures.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.monoculture_limit))
}

/// Peor hallazgo por proveedor dentro de una señal por-código.
struct WorstCodeFinding {
    overpayment: f64,
    evidence: serde_json::Value,
    description: String,
}

/// S15 — Abuso de servicio repetitivo: ratio reclamos/beneficiario de un
/// código muy por encima de la mediana de sus pares.
pub fn detect_repetitive_service(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let mut worst_per_provider: BTreeMap<&str, WorstCodeFinding> = BTreeMap::new();

    for (code, rows) in &aggregates.code_provider_totals {
        let peers: Vec<_> = rows
            .iter()
            .filter(|row| {
                row.totals.claims >= config.repetitive_peer_min_claims && row.totals.beneficiaries > 0
            })
            .collect();
        if peers.len() < config.repetitive_min_peers {
            continue;
        }
        let Some(peer_median) = median_of(
            peers
                .iter()
                .map(|row| row.totals.claims as f64 / row.totals.beneficiaries as f64)
                .collect(),
        ) else {
            continue;
        };
        let ratio_threshold =
            (config.repetitive_ratio_multiple * peer_median).max(config.repetitive_ratio_floor);

        for row in &peers {
            let ratio = row.totals.claims as f64 / row.totals.beneficiaries as f64;
            if ratio <= ratio_threshold || row.totals.paid <= config.repetitive_min_code_paid {
                continue;
            }
            let reasonable_claims = peer_median * row.totals.beneficiaries as f64;
            let excess_ratio =
                (row.totals.claims as f64 - reasonable_claims).max(0.0) / row.totals.claims as f64;
            let overpayment = row.totals.paid * excess_ratio;

            let keep = worst_per_provider
                .get(row.npi.as_str())
                .map(|current| overpayment > current.overpayment)
                .unwrap_or(true);
            if !keep {
                continue;
            }
            worst_per_provider.insert(
                row.npi.as_str(),
                WorstCodeFinding {
                    overpayment,
                    evidence: json!({
                        "hcpcs_code": code,
                        "claims_per_beneficiary": round_tenths(ratio),
                        "peer_median_claims_per_beneficiary": round_tenths(peer_median),
                        "peer_count": peers.len(),
                        "code_claims": row.totals.claims,
                        "code_beneficiaries": row.totals.beneficiaries,
                        "code_paid": round_cents(row.totals.paid),
                    }),
                    description: format!(
                        "Provider NPI {npi} bills HCPCS {code} at {ratio:.0} claims per \
                         beneficiary versus a peer median of {median:.0} — the same service \
                         repeated far beyond clinical plausibility.",
                        npi = row.npi,
                        ratio = ratio,
                        median = peer_median,
                    ),
                },
            );
        }
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (npi, finding) in worst_per_provider {
        let totals = aggregates.provider_totals[npi];
        let candidate = SignalCandidate {
            npi: npi.to_string(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: totals.paid,
            total_claims: totals.claims,
            total_beneficiaries: totals.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::RepetitiveServiceAbuse,
                severity: Severity::High,
                description: finding.description,
                evidence: finding.evidence,
                estimated_overpayment_usd: round_cents(finding.overpayment),
                overpayment_methodology: "Claims beyond the peer-median ratio for the code are \
                     treated as excess and their share of the code's payments as overpayment."
                    .to_string(),
            },
        };
        ranked.push((finding.overpayment, candidate));
    }

    info!("🔁 [S15_REPETITIVE]: {} repetitive-service profiles.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.repetitive_limit))
}

/// S18 — Anomalía de tarifa: pago por reclamo >= 5x la mediana de los
/// pares del mismo código.
pub fn detect_rate_anomalies(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let mut worst_per_provider: BTreeMap<&str, WorstCodeFinding> = BTreeMap::new();

    for (code, rows) in &aggregates.code_provider_totals {
        let peers: Vec<_> = rows
            .iter()
            .filter(|row| row.totals.claims >= config.rate_peer_min_claims)
            .collect();
        if peers.len() < config.rate_min_peers {
            continue;
        }
        let Some(median_rate) = median_of(
            peers
                .iter()
                .map(|row| row.totals.paid / row.totals.claims as f64)
                .collect(),
        ) else {
            continue;
        };
        if median_rate <= 0.0 {
            continue;
        }

        for row in &peers {
            let provider_rate = row.totals.paid / row.totals.claims as f64;
            if provider_rate < config.rate_multiple * median_rate
                || row.totals.paid <= config.rate_min_code_paid
            {
                continue;
            }
            let overpayment = (row.totals.paid - median_rate * row.totals.claims as f64).max(0.0);

            let keep = worst_per_provider
                .get(row.npi.as_str())
                .map(|current| overpayment > current.overpayment)
                .unwrap_or(true);
            if !keep {
                continue;
            }
            worst_per_provider.insert(
                row.npi.as_str(),
                WorstCodeFinding {
                    overpayment,
                    evidence: json!({
                        "hcpcs_code": code,
                        "provider_rate_per_claim": round_cents(provider_rate),
                        "peer_median_rate_per_claim": round_cents(median_rate),
                        "rate_multiple": round_tenths(provider_rate / median_rate),
                        "peer_count": peers.len(),
                        "code_paid": round_cents(row.totals.paid),
                        "code_claims": row.totals.claims,
                    }),
                    description: format!(
                        "Provider NPI {npi} is reimbursed {rate} per claim on HCPCS {code} versus \
                         a peer median of {median} — {multiple:.1}x the going rate for the code.",
                        npi = row.npi,
                        rate = format_usd(provider_rate),
                        median = format_usd(median_rate),
                        multiple = provider_rate / median_rate,
                    ),
                },
            );
        }
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (npi, finding) in worst_per_provider {
        let totals = aggregates.provider_totals[npi];
        let candidate = SignalCandidate {
            npi: npi.to_string(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: totals.paid,
            total_claims: totals.claims,
            total_beneficiaries: totals.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::ReimbursementRateAnomaly,
                severity: Severity::High,
                description: finding.description,
                evidence: finding.evidence,
                estimated_overpayment_usd: round_cents(finding.overpayment),
                overpayment_methodology: "Payments above the peer-median rate times the claim \
                     count are treated as the anomalous reimbursement excess."
                    .to_string(),
            },
        };
        ranked.push((finding.overpayment, candidate));
    }

    info!("💱 [S18_RATE]: {} reimbursement-rate anomalies.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.rate_limit))
}
