// [libs/domain/signals/src/detectors/temporal.rs]
/*!
 * =================================================================
 * APARATO: MONTHLY TIME-SERIES ENGINES (V3.4 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S3 (BUST-OUT), S8 (SPIKES) Y S17 (COLAPSO)
 *
 * # Ventanas:
 * Las tres señales recorren 'provider_monthly' ya ordenado por mes. El
 * promedio móvil de S8 usa un buffer de tres posiciones sobre los meses
 * presentes estrictamente anteriores al actual; un proveedor con menos
 * de tres meses previos no es elegible.
 * =================================================================
 */

use super::round_tenths;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_core_stats::percent_increase;
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, ClaimMonth, EntityType, Severity, SignalCandidate,
    SignalKind, SignalRecord,
};
use centinela_infra_store::BillingTotals;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// S3 — Escalada rápida (bust-out): alta reciente y pico >= 6x el primer mes.
pub fn detect_bust_out_schemes(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, monthly) in &context.aggregates.provider_monthly {
        let rows: Vec<(&ClaimMonth, &BillingTotals)> = monthly.iter().collect();
        let (first_month, first_totals) = rows[0];
        if *first_month < config.escalation_enrollment_floor {
            continue;
        }
        if first_totals.paid <= config.escalation_min_first_month_paid {
            continue;
        }
        if rows.len() < 2 {
            continue;
        }

        // Pico de los meses con rango 2..=7, por posición entre los meses
        // presentes (no por calendario).
        let window = &rows[1..rows.len().min(7)];
        let peak_paid = window
            .iter()
            .map(|(_, totals)| totals.paid)
            .fold(f64::MIN, f64::max);
        let peak_claims = window.iter().map(|(_, totals)| totals.claims).max().unwrap_or(0);

        if peak_paid < config.escalation_peak_multiple * first_totals.paid {
            continue;
        }

        let last_month = rows[rows.len() - 1].0;
        let pct_increase = percent_increase(first_totals.paid, peak_paid);
        let estimated_overpayment = 0.8 * peak_paid;

        let description = format!(
            "Provider NPI {npi} first billed in {first_month} and ramped from {first}/month to \
             {peak}/month ({pct:.0}% increase) within 6 months.",
            first = format_usd(first_totals.paid),
            peak = format_usd(peak_paid),
            pct = pct_increase,
        );

        let candidate = SignalCandidate {
            npi: npi.clone(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: peak_paid,
            total_claims: peak_claims,
            total_beneficiaries: 0,
            signal: SignalRecord {
                signal_type: SignalKind::BustOutScheme,
                severity: Severity::High,
                description,
                evidence: json!({
                    "first_billing_month": first_month,
                    "last_billing_month": last_month,
                    "first_month_paid": round_cents(first_totals.paid),
                    "first_month_claims": first_totals.claims,
                    "peak_monthly_paid": round_cents(peak_paid),
                    "peak_monthly_claims": peak_claims,
                    "pct_increase": round_tenths(pct_increase),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 80% of peak monthly billing. Bust-out \
                     schemes involve predominantly fraudulent claims during the ramp-up phase."
                    .to_string(),
            },
        };
        ranked.push((peak_paid, candidate));
    }

    info!("🚀 [S3_BUST_OUT]: {} rapid escalation schemes.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.escalation_limit))
}

/// Fila de spike intermedia de S8.
struct SpikeRow<'a> {
    npi: &'a str,
    month: ClaimMonth,
    paid: f64,
    claims: u64,
    trailing_average: f64,
    ratio: f64,
}

/// S8 — Anomalía temporal: meses que quintuplican su promedio móvil de
/// tres meses previos.
pub fn detect_temporal_anomalies(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut spikes: Vec<SpikeRow<'_>> = Vec::new();

    for (npi, monthly) in &context.aggregates.provider_monthly {
        let rows: Vec<(&ClaimMonth, &BillingTotals)> = monthly.iter().collect();
        // Buffer de 3 posiciones: el índice i exige exactamente tres meses
        // presentes antes de él.
        for current_index in 3..rows.len() {
            let trailing_average = (rows[current_index - 3].1.paid
                + rows[current_index - 2].1.paid
                + rows[current_index - 1].1.paid)
                / 3.0;
            let (month, totals) = rows[current_index];
            if trailing_average > config.temporal_min_trailing_avg
                && totals.paid > config.temporal_spike_multiple * trailing_average
                && totals.paid > config.temporal_min_spike_paid
            {
                spikes.push(SpikeRow {
                    npi,
                    month: *month,
                    paid: totals.paid,
                    claims: totals.claims,
                    trailing_average,
                    ratio: totals.paid / trailing_average,
                });
            }
        }
    }

    // Top-K de spikes individuales antes de agregar por NPI.
    spikes.sort_by(|left, right| {
        right
            .paid
            .total_cmp(&left.paid)
            .then_with(|| left.npi.cmp(right.npi))
            .then_with(|| left.month.cmp(&right.month))
    });
    spikes.truncate(config.temporal_spike_limit);

    struct ProviderSpikes {
        details: Vec<serde_json::Value>,
        spike_count: u64,
        total_spike_paid: f64,
        total_spike_claims: u64,
        max_ratio: f64,
    }

    let mut per_provider: BTreeMap<&str, ProviderSpikes> = BTreeMap::new();
    for spike in &spikes {
        let entry = per_provider.entry(spike.npi).or_insert_with(|| ProviderSpikes {
            details: Vec::new(),
            spike_count: 0,
            total_spike_paid: 0.0,
            total_spike_claims: 0,
            max_ratio: 0.0,
        });
        entry.spike_count += 1;
        entry.total_spike_paid += spike.paid;
        entry.total_spike_claims += spike.claims;
        entry.max_ratio = entry.max_ratio.max(spike.ratio);
        entry.details.push(json!({
            "month": spike.month,
            "paid": round_cents(spike.paid),
            "claims": spike.claims,
            "avg_prev_3_months": round_cents(spike.trailing_average),
            "spike_ratio": round_tenths(spike.ratio),
        }));
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (npi, data) in per_provider {
        let estimated_overpayment = 0.7 * data.total_spike_paid;
        let shown: Vec<serde_json::Value> =
            data.details.iter().take(config.temporal_spikes_shown).cloned().collect();

        let description = format!(
            "Provider NPI {npi} had {count} billing spikes exceeding 5x their 3-month moving \
             average. Peak spike: {ratio:.1}x baseline. Total spike billing: {paid}.",
            count = data.spike_count,
            ratio = data.max_ratio,
            paid = format_usd(data.total_spike_paid),
        );

        let candidate = SignalCandidate {
            npi: npi.to_string(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: data.total_spike_paid,
            total_claims: data.total_spike_claims,
            total_beneficiaries: 0,
            signal: SignalRecord {
                signal_type: SignalKind::TemporalBillingAnomaly,
                severity: Severity::High,
                description,
                evidence: json!({
                    "spike_count": data.spike_count,
                    "max_spike_ratio": round_tenths(data.max_ratio),
                    "total_spike_billing": round_cents(data.total_spike_paid),
                    "spike_details": shown,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 70% of total billing during spike months. \
                     Sudden billing increases >5x the moving average indicate potential billing \
                     fraud or upcoding."
                    .to_string(),
            },
        };
        ranked.push((data.total_spike_paid, candidate));
    }

    info!("⚡ [S8_TEMPORAL]: {} providers with billing spikes.", ranked.len());
    Ok(super::rank_and_truncate(ranked, usize::MAX))
}

/// S17 — Rampa y colapso: pico alto seguido de una caída >= 80% dentro
/// de los tres meses posteriores.
pub fn detect_ramp_and_collapse(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let aggregates = context.aggregates;
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (npi, monthly) in &aggregates.provider_monthly {
        let rows: Vec<(&ClaimMonth, &BillingTotals)> = monthly.iter().collect();
        if rows.len() < 2 {
            continue;
        }
        let first_paid = rows[0].1.paid;

        // Pico global (el más temprano en caso de empate).
        let mut peak_index = 0;
        for (index, (_, totals)) in rows.iter().enumerate() {
            if totals.paid > rows[peak_index].1.paid {
                peak_index = index;
            }
        }
        let (peak_month, peak_totals) = rows[peak_index];
        if peak_totals.paid < config.collapse_min_peak_paid {
            continue;
        }
        if first_paid > 0.0 && peak_totals.paid < config.collapse_ramp_multiple * first_paid {
            continue;
        }

        // Primer mes de colapso dentro de la ventana posterior al pico.
        let collapse = rows[peak_index + 1..].iter().find(|(month, totals)| {
            peak_month.months_until(**month) <= config.collapse_window_months
                && totals.paid <= config.collapse_drop_fraction * peak_totals.paid
        });
        let Some((collapse_month, collapse_totals)) = collapse else {
            continue;
        };

        let totals = aggregates.provider_totals[npi];
        let drop_pct = (1.0 - collapse_totals.paid / peak_totals.paid) * 100.0;
        let estimated_overpayment = 0.6 * peak_totals.paid;

        let description = format!(
            "Provider NPI {npi} ramped to a {peak} peak in {peak_month} and collapsed to \
             {collapse} by {collapse_month} ({drop:.0}% drop), the canonical bust-out exit pattern.",
            peak = format_usd(peak_totals.paid),
            collapse = format_usd(collapse_totals.paid),
            drop = drop_pct,
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
                signal_type: SignalKind::RampAndCollapse,
                severity: Severity::High,
                description,
                evidence: json!({
                    "first_billing_month": rows[0].0,
                    "first_month_paid": round_cents(first_paid),
                    "peak_month": peak_month,
                    "peak_monthly_paid": round_cents(peak_totals.paid),
                    "collapse_month": collapse_month,
                    "collapse_month_paid": round_cents(collapse_totals.paid),
                    "drop_pct": round_tenths(drop_pct),
                    "months_to_collapse": peak_month.months_until(**collapse_month),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 60% of the peak month. A ramp followed by \
                     an immediate collapse indicates billing extracted before detection."
                    .to_string(),
            },
        };
        ranked.push((peak_totals.paid, candidate));
    }

    info!("📉 [S17_COLLAPSE]: {} ramp-then-collapse patterns.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.collapse_limit))
}
