// [libs/domain/signals/src/detectors/servicing_hubs.rs]
/*!
 * =================================================================
 * APARATO: SERVICING HUB ENGINES (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN ENGINES (ESTRATO L2)
 * RESPONSABILIDAD: SEÑALES S13 (HUB FANTASMA) Y S19 (DISPERSIÓN)
 *
 * # Agregado raíz:
 * 'servicing_hub_totals' ya excluye el auto-servicio (ejecutante igual
 * al facturador); ambos motores solo recorren los enlaces cruzados.
 * El registro es opcional aquí: solo aporta identidad, nunca el predicado.
 * =================================================================
 */

use crate::{AnalysisContext, DetectionConfig, SignalError};
use centinela_domain_models::{
    format_usd, placeholder_name, round_cents, EntityType, Severity, SignalCandidate, SignalKind,
    SignalRecord,
};
use centinela_infra_store::BillingTotals;
use serde_json::json;
use tracing::info;

/// Identidad opcional del ejecutante desde el registro.
fn servicing_identity(
    context: &AnalysisContext<'_>,
    servicing_npi: &str,
) -> (String, EntityType, String) {
    context
        .store
        .registry
        .as_ref()
        .and_then(|registry| registry.lookup(servicing_npi))
        .map(|entry| (entry.display_name(), entry.entity_type, entry.state.clone()))
        .unwrap_or_else(|| (placeholder_name(servicing_npi), EntityType::Unknown, String::new()))
}

/// S13 — Hub de servicio fantasma: un ejecutante enlazado a >= 5
/// facturadores distintos con pago combinado relevante.
pub fn detect_phantom_hub(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (servicing_npi, links) in &context.aggregates.servicing_hub_totals {
        if links.len() < config.hub_min_billing_npis {
            continue;
        }
        let combined = sum_links(links);
        if combined.paid <= config.hub_min_paid {
            continue;
        }

        let (provider_name, entity_type, state) = servicing_identity(context, servicing_npi);
        let estimated_overpayment = 0.35 * combined.paid;

        let description = format!(
            "Servicing provider {provider_name} (NPI: {servicing_npi}) appears on claims from \
             {count} distinct billing entities totaling {paid} — a fan-out consistent with a \
             rented or phantom servicing identity.",
            count = links.len(),
            paid = format_usd(combined.paid),
        );

        let candidate = SignalCandidate {
            npi: servicing_npi.clone(),
            provider_name,
            entity_type,
            state,
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::PhantomServicingHub,
                severity: Severity::High,
                description,
                evidence: json!({
                    "servicing_npi": servicing_npi,
                    "linked_billing_npis": links.len(),
                    "billing_npi_sample": links
                        .iter()
                        .take(10)
                        .map(|link| link.billing_npi.as_str())
                        .collect::<Vec<_>>(),
                    "combined_paid": round_cents(combined.paid),
                    "combined_claims": combined.claims,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 35% of the combined billing routed through \
                     the hub. One individual cannot plausibly service that many billing entities."
                    .to_string(),
            },
        };
        ranked.push((combined.paid, candidate));
    }

    info!("🛰️ [S13_HUB]: {} phantom servicing hubs.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.hub_limit))
}

/// S19 — Dispersión de servicio fantasma: >= 6 facturadores que comparten
/// un ejecutante y, entre todos, casi ningún beneficiario.
pub fn detect_phantom_spread(
    context: &AnalysisContext<'_>,
    config: &DetectionConfig,
) -> Result<Vec<SignalCandidate>, SignalError> {
    let mut ranked: Vec<(f64, SignalCandidate)> = Vec::new();

    for (servicing_npi, links) in &context.aggregates.servicing_hub_totals {
        if links.len() < config.spread_min_billing_npis {
            continue;
        }
        let combined = sum_links(links);
        if combined.beneficiaries > config.spread_max_shared_beneficiaries
            || combined.paid <= config.spread_min_paid
        {
            continue;
        }

        let (provider_name, entity_type, state) = servicing_identity(context, servicing_npi);
        let estimated_overpayment = 0.9 * combined.paid;

        let description = format!(
            "Servicing provider {provider_name} (NPI: {servicing_npi}) is spread across {count} \
             billing entities that together report only {benes} unique beneficiaries for {paid} — \
             claims with essentially no patients behind them.",
            count = links.len(),
            benes = combined.beneficiaries,
            paid = format_usd(combined.paid),
        );

        let candidate = SignalCandidate {
            npi: servicing_npi.clone(),
            provider_name,
            entity_type,
            state,
            total_paid: combined.paid,
            total_claims: combined.claims,
            total_beneficiaries: combined.beneficiaries,
            signal: SignalRecord {
                signal_type: SignalKind::PhantomServicingSpread,
                severity: Severity::High,
                description,
                evidence: json!({
                    "servicing_npi": servicing_npi,
                    "linked_billing_npis": links.len(),
                    "shared_beneficiaries": combined.beneficiaries,
                    "billing_npi_sample": links
                        .iter()
                        .take(10)
                        .map(|link| link.billing_npi.as_str())
                        .collect::<Vec<_>>(),
                    "combined_paid": round_cents(combined.paid),
                    "combined_claims": combined.claims,
                }),
                estimated_overpayment_usd: round_cents(estimated_overpayment),
                overpayment_methodology: "Estimated at 90% of the combined billing. A servicing \
                     identity shared across many entities with near-zero beneficiaries indicates \
                     fabricated claims."
                    .to_string(),
            },
        };
        ranked.push((combined.paid, candidate));
    }

    info!("👻 [S19_SPREAD]: {} phantom servicing spreads.", ranked.len());
    Ok(super::rank_and_truncate(ranked, config.spread_limit))
}

fn sum_links(links: &[centinela_infra_store::HubLink]) -> BillingTotals {
    let mut combined = BillingTotals::default();
    for link in links {
        combined.paid += link.totals.paid;
        combined.claims += link.totals.claims;
        combined.beneficiaries += link.totals.beneficiaries;
    }
    combined
}
