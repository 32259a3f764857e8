// [libs/domain/signals/src/detectors/volume.rs]
/*!
 * =================================================================
 * APARATO: SERVICE VOLUME ENGINES (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S4 (VOLUMEN IMPOSIBLE) Y S10 (PLANTILLA)
 *
 * # Blindaje:
 * Los meses sin beneficiarios quedan fuera del conjunto candidato de S4
 * (el ratio no existe); los meses sin ejecutantes distintos quedan fuera
 * de S10. Ningún denominador llega a cero.
 * =================================================================
 */

use super::round_tenths;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, ClaimMonth, EntityType, Severity, SignalCandidate,
    SignalKind, SignalRecord,
};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// Fila provider-mes marcada por S4.
struct VolumeMonth<'a> {
    npi: &'a str,
    month: ClaimMonth,
    claims: u64,
    beneficiaries: u64,
    paid: f64,
    claims_per_beneficiary: f64,
}

/// S4 — Volumen de servicio imposible: >500 reclamos por beneficiario-mes.
pub fn detect_impossible_volume(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut flagged_months: Vec<VolumeMonth<'_>> = Vec::new();

    for (npi, monthly) in &context.aggregates.provider_monthly {
        for (month, totals) in monthly {
            if totals.beneficiaries == 0 {
                continue;
            }
            let claims_per_beneficiary = totals.claims as f64 / totals.beneficiaries as f64;
            if claims_per_beneficiary > config.volume_claims_per_beneficiary_threshold
                && totals.paid > config.volume_min_month_paid
            {
                flagged_months.push(VolumeMonth {
                    npi,
                    month: *month,
                    claims: totals.claims,
                    beneficiaries: totals.beneficiaries,
                    paid: totals.paid,
                    claims_per_beneficiary,
                });
            }
        }
    }

    // Top-K de provider-meses por ratio antes de agregar por NPI.
    flagged_months.sort_by(|left, right| {
        right
            .claims_per_beneficiary
            .total_cmp(&left.claims_per_beneficiary)
            .then_with(|| left.npi.cmp(right.npi))
            .then_with(|| left.month.cmp(&right.month))
    });
    flagged_months.truncate(config.volume_provider_month_limit);

    struct ProviderVolume {
        months: Vec<serde_json::Value>,
        total_paid: f64,
        total_claims: u64,
        max_beneficiaries: u64,
        max_claims_per_beneficiary: f64,
    }

    let mut per_provider: BTreeMap<&str, ProviderVolume> = BTreeMap::new();
    for flagged in &flagged_months {
        let entry = per_provider.entry(flagged.npi).or_insert_with(|| ProviderVolume {
            months: Vec::new(),
            total_paid: 0.0,
            total_claims: 0,
            max_beneficiaries: 0,
            max_claims_per_beneficiary: 0.0,
        });
        entry.months.push(json!({
            "month": flagged.month,
            "claims": flagged.claims,
            "beneficiaries": flagged.beneficiaries,
            "claims_per_beneficiary": round_tenths(flagged.claims_per_beneficiary),
            "paid": round_cents(flagged.paid),
        }));
        entry.total_paid += flagged.paid;
        entry.total_claims += flagged.claims;
        entry.max_beneficiaries = entry.max_beneficiaries.max(flagged.beneficiaries);
        entry.max_claims_per_beneficiary =
            entry.max_claims_per_beneficiary.max(flagged.claims_per_beneficiary);
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (npi, data) in per_provider {
        let estimated_overpayment = 0.9 * data.total_paid;
        let shown: Vec<serde_json::Value> =
            data.months.iter().take(config.volume_flagged_months_shown).cloned().collect();

        let description = format!(
            "Provider NPI {npi} billed {ratio:.0} claims per beneficiary in at least one month. \
             No provider can deliver >500 services/patient/month. Total: {paid} across {months} \
             flagged months.",
            ratio = data.max_claims_per_beneficiary,
            paid = format_usd(data.total_paid),
            months = data.months.len(),
        );

        let candidate = SignalCandidate {
            npi: npi.to_string(),
            provider_name: placeholder_name(npi),
            entity_type: EntityType::Unknown,
            state: String::new(),
            total_paid: data.total_paid,
            total_claims: data.total_claims,
            total_beneficiaries: data.max_beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::ImpossibleServiceVolume,
                severity: Severity::High,
                description,
                evidence: json!({
                    "max_claims_per_beneficiary": round_tenths(data.max_claims_per_beneficiary),
                    "flagged_months_count": data.months.len(),
                    "flagged_months": shown,
                    "total_paid_flagged_months": round_cents(data.total_paid),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 90% of payments during flagged months. \
                     Claim volumes >500/beneficiary/month are physically impossible."
                    .to_string(),
            },
        };
        ranked.push((data.total_paid, candidate));
    }

    info!("🔥 [S4_VOLUME]: {} providers with impossible volume months.", ranked.len());
    Ok(super::rank_and_truncate(ranked, usize::MAX))
}

/// S10 — Imposibilidad de plantilla: organizaciones cuyo volumen mensual
/// implica más de seis reclamos por hora por ejecutante. Depende del registro.
pub fn detect_workforce_impossibility(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (org_npi, worker_months) in &aggregates.org_worker_monthly {
        let Some(monthly) = aggregates.provider_monthly.get(org_npi) else {
            continue;
        };

        struct FlaggedMonth {
            month: ClaimMonth,
            claims: u64,
            workers: u64,
            implied_rate: f64,
            paid: f64,
        }
        let mut flagged: Vec<FlaggedMonth> = Vec::new();

        for (month, workers) in worker_months {
            if *workers == 0 {
                continue;
            }
            let Some(totals) = monthly.get(month) else { continue };
            let implied_rate = totals.claims as f64
                / (*workers as f64 * config.workforce_working_hours_per_month);
            if implied_rate > config.workforce_claims_per_hour_threshold
                && totals.paid > config.workforce_min_month_paid
            {
                flagged.push(FlaggedMonth {
                    month: *month,
                    claims: totals.claims,
                    workers: *workers,
                    implied_rate,
                    paid: totals.paid,
                });
            }
        }
        if flagged.is_empty() {
            continue;
        }

        let Some(peak) = flagged
            .iter()
            .max_by(|left, right| left.implied_rate.total_cmp(&right.implied_rate))
        else {
            continue;
        };
        let flagged_paid: f64 = flagged.iter().map(|month| month.paid).sum();
        let estimated_overpayment = 0.75 * flagged_paid;

        let (provider_name, state) = registry
            .lookup(org_npi)
            .map(|entry| (entry.display_name(), entry.state.clone()))
            .unwrap_or_else(|| (placeholder_name(org_npi), String::new()));
        let totals = aggregates.provider_totals[org_npi];

        let description = format!(
            "Organization {provider_name} (NPI: {org_npi}) billed {claims} claims in {month} with \
             only {workers} distinct servicing providers — {rate:.1} claims/hour per worker, beyond \
             physical capacity.",
            claims = peak.claims,
            month = peak.month,
            workers = peak.workers,
            rate = peak.implied_rate,
        );

        let candidate = SignalCandidate {
            npi: org_npi.clone(),
            provider_name,
            entity_type: EntityType::Organization,
            state,
            total_paid: totals.paid,
            total_claims: totals.claims,
            total_beneficiaries: totals.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::WorkforceImpossibility,
                severity: Severity::High,
                description,
                evidence: json!({
                    "peak_month": peak.month,
                    "peak_claims_count": peak.claims,
                    "peak_distinct_workers": peak.workers,
                    "implied_claims_per_hour": round_tenths(peak.implied_rate),
                    "working_hours_per_month": config.workforce_working_hours_per_month,
                    "flagged_months_count": flagged.len(),
                    "total_paid_flagged_months": round_cents(flagged_paid),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 75% of payments during months whose claim \
                     volume exceeds the physical capacity of the billing organization's workforce."
                    .to_string(),
            },
        };
        ranked.push((flagged_paid, candidate));
    }

    info!("🏭 [S10_WORKFORCE]: {} organizations beyond workforce capacity.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.workforce_limit))
}
