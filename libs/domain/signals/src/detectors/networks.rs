// [libs/domain/signals/src/detectors/networks.rs]
/*!
 * =================================================================
 * APARATO: CONTROL NETWORK ENGINES (V3.5 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S6, S11, S12 Y S14 (REDES DEL REGISTRO)
 *
 * # Dependencia del registro:
 * Las cuatro señales agrupan filas de organizaciones del registro
 * nacional (oficial autorizado o cohorte de alta). El catálogo las
 * omite con aviso de degradación cuando el registro está ausente;
 * cada motor además verifica la disponibilidad en su entrada.
 * =================================================================
 */

use super::round_tenths;
use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{
    format_usd, round_cents, EntityType, Severity, SignalCandidate, SignalKind, SignalRecord,
};
use centinela_infra_store::{BillingTotals, RegistryTable};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Red de organizaciones bajo un mismo oficial autorizado.
struct OfficialNetwork {
    /// Nombre del oficial con la capitalización del registro ("FIRST LAST").
    display_name: String,
    member_npis: BTreeSet<String>,
    states: BTreeSet<String>,
}

/// Agrupa las organizaciones del registro por oficial autorizado
/// normalizado. Compartido por S6, S12 y S14.
fn official_networks(registry: &RegistryTable) -> BTreeMap<(String, String), OfficialNetwork> {
    let mut networks: BTreeMap<(String, String), OfficialNetwork> = BTreeMap::new();
    for entry in registry.organizations() {
        let Some(key) = entry.official_key() else { continue };
        let network = networks.entry(key).or_insert_with(|| OfficialNetwork {
            display_name: format!(
                "{} {}",
                entry.auth_official_first.trim(),
                entry.auth_official_last.trim()
            ),
            member_npis: BTreeSet::new(),
            states: BTreeSet::new(),
        });
        network.member_npis.insert(entry.npi.clone());
        let state = entry.state.trim();
        if !state.is_empty() {
            network.states.insert(state.to_string());
        }
    }
    networks
}

/// Suma los totales de facturación de los miembros presentes en el gasto.
/// Retorna los NPIs activos (ascendentes) y el rollup combinado.
fn combined_member_billing(
    aggregates: &centinela_infra_store::Aggregates,
    member_npis: impl Iterator<Item = impl AsRef<str>>,
) -> (Vec<String>, BillingTotals) {
    let mut active: Vec<String> = Vec::new();
    let mut combined = BillingTotals::default();
    for npi in member_npis {
        let npi = npi.as_ref();
        if let Some(totals) = aggregates.provider_totals.get(npi) {
            active.push(npi.to_string());
            combined.paid += totals.paid;
            combined.claims += totals.claims;
            combined.beneficiaries += totals.beneficiaries;
        }
    }
    (active, combined)
}

/// S6 — Red de entidades fantasma: un oficial autorizado controla >= 5 NPIs.
pub fn detect_shell_networks(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;

    // Oficiales con suficientes NPIs, por cardinalidad descendente.
    let networks = official_networks(registry);
    let mut qualifying: Vec<(&(String, String), &OfficialNetwork)> = networks
        .iter()
        .filter(|(_, network)| network.member_npis.len() >= config.network_min_npis)
        .collect();
    qualifying.sort_by(|left, right| {
        right
            .1
            .member_npis
            .len()
            .cmp(&left.1.member_npis.len())
            .then_with(|| left.0.cmp(right.0))
    });
    qualifying.truncate(config.network_official_limit);

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for (_, network) in qualifying.iter().take(config.network_limit) {
        // La consulta de facturación se acota a los primeros miembros
        // de la red (tope configurable).
        let (active_npis, combined) = combined_member_billing(
            aggregates,
            network.member_npis.iter().take(config.network_member_lookup_cap),
        );
        if active_npis.is_empty() || combined.paid < config.network_min_paid {
            continue;
        }

        let severity = if combined.paid < config.severity_escalation_floor {
            Severity::Medium
        } else {
            Severity::High
        };
        let estimated_overpayment = 0.3 * combined.paid;
        let representative_npi = active_npis[0].clone();
        let states: Vec<&String> = network.states.iter().take(10).collect();

        let description = format!(
            "Official {official} controls {count} NPIs across states: {state_list}. Combined \
             billing: {paid} across {active} active NPIs.",
            official = network.display_name,
            count = network.member_npis.len(),
            state_list = states
                .iter()
                .map(|state| state.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            paid = format_usd(combined.paid),
            active = active_npis.len(),
        );

        let candidate = SignalCandidate {
            npi: representative_npi,
            provider_name: format!("{} (network)", network.display_name),
            entity_type: EntityType::Organization,
            state: network.states.iter().next().cloned().unwrap_or_default(),
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::ShellEntityNetwork,
                severity,
                description,
                evidence: json!({
                    "authorized_official_name": network.display_name,
                    "total_npis_controlled": network.member_npis.len(),
                    "active_billing_npis": active_npis.len(),
                    "npi_list_sample": active_npis.iter().take(10).collect::<Vec<_>>(),
                    "states": states,
                    "network_total_paid": round_cents(combined.paid),
                    "network_total_claims": combined.claims,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 30% of total network billing. Shell \
                     networks distribute fraud across entities to avoid detection."
                    .to_string(),
            },
        };
        ranked.push((combined.paid, candidate));
    }

    info!("🕸️ [S6_SHELL]: {} shell networks with active billing.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.network_limit))
}

/// S11 — Cohorte de alta explosiva: >= 4 organizaciones con la misma
/// taxonomía y estado, registradas en el mismo trimestre calendario.
pub fn detect_burst_enrollment(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;

    // (taxonomía, estado, año, trimestre) → NPIs de la cohorte.
    let mut cohorts: BTreeMap<(String, String, u16, u8), BTreeSet<String>> = BTreeMap::new();
    for entry in registry.organizations() {
        let taxonomy = entry.taxonomy_code.trim();
        let state = entry.state.trim();
        let Some(enumeration_month) = entry.enumeration_month else { continue };
        if taxonomy.is_empty() || state.is_empty() {
            continue;
        }
        cohorts
            .entry((
                taxonomy.to_string(),
                state.to_string(),
                enumeration_month.year(),
                enumeration_month.quarter(),
            ))
            .or_default()
            .insert(entry.npi.clone());
    }

    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();
    for ((taxonomy, state, year, quarter), members) in &cohorts {
        if members.len() < config.burst_min_orgs {
            continue;
        }
        let (active_npis, combined) = combined_member_billing(aggregates, members.iter());
        if active_npis.is_empty() || combined.paid < config.burst_min_paid {
            continue;
        }

        // Representante: el miembro activo de mayor facturación.
        let representative_npi = active_npis
            .iter()
            .max_by(|left, right| {
                let left_paid = aggregates.provider_totals[*left].paid;
                let right_paid = aggregates.provider_totals[*right].paid;
                left_paid.total_cmp(&right_paid).then_with(|| right.cmp(left))
            })
            .cloned()
            .unwrap_or_else(|| active_npis[0].clone());

        let severity = if combined.paid < config.severity_escalation_floor {
            Severity::Medium
        } else {
            Severity::High
        };
        let estimated_overpayment = 0.25 * combined.paid;
        let quarter_label = format!("{year}-Q{quarter}");
        let representative_name = registry
            .lookup(&representative_npi)
            .map(|entry| entry.display_name())
            .unwrap_or_else(|| centinela_domain_models::placeholder_name(&representative_npi));

        let description = format!(
            "{count} organizations sharing taxonomy {taxonomy} in {state} enrolled within \
             {quarter_label} and billed {paid} combined — a coordinated enrollment burst.",
            count = members.len(),
            paid = format_usd(combined.paid),
        );

        let candidate = SignalCandidate {
            npi: representative_npi,
            provider_name: format!("{representative_name} (enrollment cohort)"),
            entity_type: EntityType::Organization,
            state: state.clone(),
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::BurstEnrollmentNetwork,
                severity,
                description,
                evidence: json!({
                    "taxonomy_code": taxonomy,
                    "state": state,
                    "enrollment_quarter": quarter_label,
                    "cohort_member_count": members.len(),
                    "member_npis_sample": members.iter().take(10).collect::<Vec<_>>(),
                    "active_billing_npis": active_npis.len(),
                    "network_total_paid": round_cents(combined.paid),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 25% of the cohort's combined billing. \
                     Same-quarter mass enrollment of same-specialty entities is a staging pattern \
                     for distributed fraudulent billing."
                    .to_string(),
            },
        };
        ranked.push((combined.paid, candidate));
    }

    info!("💥 [S11_BURST]: {} burst-enrollment cohorts.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.burst_limit))
}

/// S12 — Rampa coordinada: >= 3 NPIs bajo el mismo oficial cuyos picos de
/// facturación caen dentro de una misma ventana de tres meses.
pub fn detect_coordinated_ramp(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;
    let networks = official_networks(registry);
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (_, network) in &networks {
        if network.member_npis.len() < config.ramp_min_members {
            continue;
        }

        // Pico mensual de cada miembro con datos (mes más temprano en empate).
        let mut member_peaks: Vec<(&String, centinela_domain_models::ClaimMonth, f64)> = Vec::new();
        for npi in &network.member_npis {
            let Some(monthly) = aggregates.provider_monthly.get(npi) else { continue };
            let Some((peak_month, peak_totals)) = monthly
                .iter()
                .max_by(|left, right| {
                    left.1
                        .paid
                        .total_cmp(&right.1.paid)
                        .then_with(|| right.0.cmp(left.0))
                })
            else {
                continue;
            };
            member_peaks.push((npi, *peak_month, peak_totals.paid));
        }
        if member_peaks.len() < config.ramp_min_members {
            continue;
        }

        // Mejor ventana de 3 meses anclada en el pico de cada miembro.
        let mut best_window: Option<(centinela_domain_models::ClaimMonth, Vec<&String>, f64)> = None;
        for (_, window_start, _) in &member_peaks {
            let mut window_members: Vec<&String> = Vec::new();
            let mut window_paid = 0.0;
            for (npi, peak_month, peak_paid) in &member_peaks {
                let offset = window_start.months_until(*peak_month);
                if (0..config.ramp_window_months).contains(&offset) {
                    window_members.push(npi);
                    window_paid += peak_paid;
                }
            }
            if window_members.len() < config.ramp_min_members {
                continue;
            }
            let improves = match &best_window {
                None => true,
                Some((best_start, _, best_paid)) => {
                    window_paid > *best_paid
                        || (window_paid == *best_paid && window_start < best_start)
                }
            };
            if improves {
                window_members.sort();
                best_window = Some((*window_start, window_members, window_paid));
            }
        }
        let Some((window_start, window_members, combined_peak_paid)) = best_window else {
            continue;
        };
        if combined_peak_paid <= config.ramp_min_combined_peak_paid {
            continue;
        }

        let (active_npis, combined) =
            combined_member_billing(aggregates, window_members.iter().map(|npi| npi.as_str()));
        let representative_npi = active_npis
            .first()
            .cloned()
            .unwrap_or_else(|| window_members[0].clone());
        let window_end = window_start
            .successor()
            .successor();
        let estimated_overpayment = 0.5 * combined_peak_paid;

        let description = format!(
            "{count} entities under official {official} peaked their billing within the same \
             {window_start}..{window_end} window ({paid} combined peak billing) — a coordinated ramp.",
            count = window_members.len(),
            official = network.display_name,
            paid = format_usd(combined_peak_paid),
        );

        let candidate = SignalCandidate {
            npi: representative_npi,
            provider_name: format!("{} (network)", network.display_name),
            entity_type: EntityType::Organization,
            state: network.states.iter().next().cloned().unwrap_or_default(),
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::CoordinatedBillingRamp,
                severity: Severity::High,
                description,
                evidence: json!({
                    "authorized_official_name": network.display_name,
                    "window_start": window_start,
                    "window_end": window_end,
                    "members_peaking_in_window": window_members.len(),
                    "member_npis_sample": window_members.iter().take(10).collect::<Vec<_>>(),
                    "combined_peak_paid": round_cents(combined_peak_paid),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 50% of the combined peak-month billing of \
                     the members ramping inside the shared window."
                    .to_string(),
            },
        };
        ranked.push((combined_peak_paid, candidate));
    }

    info!("🧨 [S12_RAMP]: {} coordinated ramp networks.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.ramp_limit))
}

/// S14 — Dilución de beneficiarios: una red bajo el mismo oficial factura
/// un volumen de reclamos desproporcionado para su pool de beneficiarios.
pub fn detect_beneficiary_dilution(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let Some(registry) = context.store.registry.as_ref() else {
        return Ok(Vec::new());
    };
    let aggregates = context.aggregates;
    let networks = official_networks(registry);
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (_, network) in &networks {
        if network.member_npis.len() < config.dilution_min_members {
            continue;
        }
        let (active_npis, combined) = combined_member_billing(aggregates, network.member_npis.iter());
        if active_npis.len() < config.dilution_min_members {
            continue;
        }
        if combined.beneficiaries == 0 || combined.paid <= config.dilution_min_paid {
            continue;
        }
        let claims_per_beneficiary = combined.claims as f64 / combined.beneficiaries as f64;
        if claims_per_beneficiary <= config.dilution_claims_per_beneficiary_threshold {
            continue;
        }

        let reasonable_claims =
            combined.beneficiaries as f64 * config.hh_reasonable_claims_per_beneficiary;
        let excess_ratio =
            (combined.claims as f64 - reasonable_claims).max(0.0) / combined.claims as f64;
        let estimated_overpayment = combined.paid * excess_ratio;

        let description = format!(
            "Network under official {official} billed {claims} claims against only {benes} \
             beneficiaries across {members} entities (ratio 1:{ratio:.0}) for {paid}.",
            official = network.display_name,
            claims = combined.claims,
            benes = combined.beneficiaries,
            members = active_npis.len(),
            ratio = claims_per_beneficiary,
            paid = format_usd(combined.paid),
        );

        let candidate = SignalCandidate {
            npi: active_npis[0].clone(),
            provider_name: format!("{} (network)", network.display_name),
            entity_type: EntityType::Organization,
            state: network.states.iter().next().cloned().unwrap_or_default(),
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::BeneficiaryDilution,
                severity: Severity::High,
                description,
                evidence: json!({
                    "authorized_official_name": network.display_name,
                    "network_member_count": network.member_npis.len(),
                    "active_billing_npis": active_npis.len(),
                    "member_npis_sample": active_npis.iter().take(10).collect::<Vec<_>>(),
                    "network_claims": combined.claims,
                    "network_beneficiaries": combined.beneficiaries,
                    "claims_per_beneficiary": round_tenths(claims_per_beneficiary),
                    "network_total_paid": round_cents(combined.paid),
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Proportion of network claims exceeding 10 claims per \
                     beneficiary applied to the network's combined payments."
                    .to_string(),
            },
        };
        ranked.push((combined.paid, candidate));
    }

    info!("🫗 [S14_DILUTION]: {} diluted networks.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.dilution_limit))
}
