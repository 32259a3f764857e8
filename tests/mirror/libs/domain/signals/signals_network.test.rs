// [tests/mirror/libs/domain/signals/signals_network.test.rs]
/**
 * =================================================================
 * APARATO: NETWORK & HUB SIGNALS CERTIFIER (V3.2 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: PROVING GROUNDS (ESTRATO L2-SIGNALS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE S6 Y S10-S19
 *
 * Cubre las señales dependientes del registro (redes de oficiales,
 * cohortes de alta, plantilla) y las de hubs de servicio, incluida la
 * degradación del catálogo cuando el registro está ausente.
 * =================================================================
 */

mod fixtures;

use centinela_domain_models::{Severity, SignalKind};
use centinela_domain_signals::detectors::{concentration, networks, servicing_hubs, temporal, volume};
use centinela_domain_signals::{run_catalog, AnalysisContext, CancellationFlag, DetectionConfig};
use centinela_infra_store::{Aggregates, ColumnStore};
use std::collections::BTreeSet;

fn context_of(store: &ColumnStore) -> (Aggregates, DetectionConfig) {
    (Aggregates::materialize(store), DetectionConfig::default())
}

/**
 * CERTIFICACIÓN S6 (escenario semilla 5): cinco organizaciones bajo
 * SMITH ROBERT con $1,050,000 combinados — severidad alta, 30% de sobrepago.
 */
#[test]
fn certify_shell_network_seed_scenario() {
    let store = fixtures::shell_network_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = networks::detect_shell_networks(&context, &config).unwrap();

    let smith: Vec<_> = results
        .iter()
        .filter(|candidate| {
            candidate.signal.evidence["authorized_official_name"] == "ROBERT SMITH"
        })
        .collect();
    assert_eq!(smith.len(), 1);
    let hit = smith[0];
    assert_eq!(hit.signal.evidence["total_npis_controlled"], 5);
    assert_eq!(hit.signal.evidence["network_total_paid"], 1_050_000.0);
    // >= $500k combinados: el prior ya es 'high'.
    assert_eq!(hit.signal.severity, Severity::High);
    assert_eq!(hit.signal.estimated_overpayment_usd, 315_000.0);
    assert_eq!(hit.npi, "6666666661");

    // Frontera: cuatro NPIs no forman red; una red bajo $10k tampoco.
    assert!(!results.iter().any(|candidate| {
        candidate.signal.evidence["authorized_official_name"] == "ALICE BROWN"
    }));
    assert!(!results.iter().any(|candidate| {
        candidate.signal.evidence["authorized_official_name"] == "PENNY POOR"
    }));
}

/**
 * CERTIFICACIÓN S10: 5,000 reclamos con dos ejecutantes = 15.6 reclamos/hora.
 */
#[test]
fn certify_workforce_impossibility() {
    let store = fixtures::workforce_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = volume::detect_workforce_impossibility(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "5555555555");
    assert_eq!(hit.provider_name, "MegaCorp Health");
    let implied = hit.signal.evidence["implied_claims_per_hour"].as_f64().unwrap();
    assert!(implied > 6.0);
    assert_eq!(hit.signal.evidence["peak_distinct_workers"], 2);
    assert_eq!(hit.signal.evidence["flagged_months_count"], 1);
    // 0.75 × 50,000.
    assert_eq!(hit.signal.estimated_overpayment_usd, 37_500.0);
}

/**
 * CERTIFICACIÓN S11: cuatro organizaciones, misma taxonomía+estado+trimestre.
 */
#[test]
fn certify_burst_enrollment_cohort() {
    let store = fixtures::burst_enrollment_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = networks::detect_burst_enrollment(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.signal.evidence["enrollment_quarter"], "2023-Q1");
    assert_eq!(hit.signal.evidence["cohort_member_count"], 4);
    assert_eq!(hit.signal.evidence["network_total_paid"], 660_000.0);
    // Combinado >= $500k: prior alto. Representante = mayor facturador.
    assert_eq!(hit.signal.severity, Severity::High);
    assert_eq!(hit.npi, "1010000001");
    assert_eq!(hit.signal.estimated_overpayment_usd, 165_000.0);
}

/**
 * CERTIFICACIÓN S12: tres entidades del mismo oficial con picos en 2023-06.
 */
#[test]
fn certify_coordinated_ramp_window() {
    let store = fixtures::coordinated_ramp_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = networks::detect_coordinated_ramp(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.signal.evidence["members_peaking_in_window"], 3);
    assert_eq!(hit.signal.evidence["combined_peak_paid"], 630_000.0);
    assert_eq!(hit.signal.estimated_overpayment_usd, 315_000.0);
    assert_eq!(hit.signal.signal_type.statute_reference(), "31 U.S.C. § 3729(a)(1)(C)");
}

/**
 * CERTIFICACIÓN S13: hub con cinco facturadores y $575,000 combinados.
 */
#[test]
fn certify_phantom_servicing_hub() {
    let store = fixtures::servicing_hub_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = servicing_hubs::detect_phantom_hub(&context, &config).unwrap();

    let hub: Vec<_> = results.iter().filter(|candidate| candidate.npi == "1290000000").collect();
    assert_eq!(hub.len(), 1);
    assert_eq!(hub[0].signal.evidence["linked_billing_npis"], 5);
    assert_eq!(hub[0].signal.evidence["combined_paid"], 575_000.0);
}

/**
 * CERTIFICACIÓN S14: red JONES MARY con 1,200 reclamos sobre 7 beneficiarios.
 */
#[test]
fn certify_beneficiary_dilution_network() {
    let store = fixtures::dilution_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = networks::detect_beneficiary_dilution(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.signal.evidence["authorized_official_name"], "MARY JONES");
    assert_eq!(hit.signal.evidence["network_claims"], 1_200);
    assert_eq!(hit.signal.evidence["network_beneficiaries"], 7);
    assert_eq!(hit.signal.signal_type.statute_reference(), "31 U.S.C. § 3729(a)(1)(G)");
    // 600,000 × (1,200 − 70)/1,200 = 565,000.
    assert_eq!(hit.signal.estimated_overpayment_usd, 565_000.0);
}

/**
 * CERTIFICACIÓN S15: 250 reclamos/beneficiario contra mediana de pares de 11.
 */
#[test]
fn certify_repetitive_service_abuse() {
    let store = fixtures::repetitive_service_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = concentration::detect_repetitive_service(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "1500000001");
    assert_eq!(hit.signal.evidence["hcpcs_code"], "T1019");
    assert_eq!(hit.signal.evidence["claims_per_beneficiary"], 250.0);
    assert_eq!(hit.signal.evidence["peer_median_claims_per_beneficiary"], 11.0);
    // 50,000 × (500 − 22)/500 = 47,800.
    assert_eq!(hit.signal.estimated_overpayment_usd, 47_800.0);
}

/**
 * CERTIFICACIÓN S16: 99215 al 98% del perfil, con contexto E&M.
 */
#[test]
fn certify_billing_monoculture() {
    let store = fixtures::monoculture_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = concentration::detect_billing_monoculture(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "1600000001");
    assert_eq!(hit.signal.evidence["dominant_hcpcs_code"], "99215");
    assert_eq!(hit.signal.evidence["dominant_code_is_evaluation_management"], true);
    assert_eq!(hit.signal.evidence["em_paid_share"], 1.0);
    assert_eq!(hit.signal.severity, Severity::Medium);
}

/**
 * CERTIFICACIÓN S17: pico de $120,000 y colapso a $500 al mes siguiente.
 */
#[test]
fn certify_ramp_and_collapse_pattern() {
    let store = fixtures::ramp_collapse_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = temporal::detect_ramp_and_collapse(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "1700000001");
    assert_eq!(hit.signal.evidence["peak_month"], "2023-06");
    assert_eq!(hit.signal.evidence["collapse_month"], "2023-07");
    // 0.6 × 120,000.
    assert_eq!(hit.signal.estimated_overpayment_usd, 72_000.0);
}

/**
 * CERTIFICACIÓN S18: $500/reclamo contra mediana de pares de $100/reclamo.
 */
#[test]
fn certify_reimbursement_rate_anomaly() {
    let store = fixtures::rate_anomaly_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = concentration::detect_rate_anomalies(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "1800000001");
    assert_eq!(hit.signal.evidence["provider_rate_per_claim"], 500.0);
    assert_eq!(hit.signal.evidence["peer_median_rate_per_claim"], 100.0);
    // 100,000 − 100 × 200 = 80,000.
    assert_eq!(hit.signal.estimated_overpayment_usd, 80_000.0);
}

/**
 * CERTIFICACIÓN S19: seis facturadores compartiendo tres beneficiarios.
 */
#[test]
fn certify_phantom_servicing_spread() {
    let store = fixtures::servicing_hub_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let results = servicing_hubs::detect_phantom_spread(&context, &config).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.npi, "1900000000");
    assert_eq!(hit.signal.evidence["linked_billing_npis"], 6);
    assert_eq!(hit.signal.evidence["shared_beneficiaries"], 3);
    // 0.9 × 240,000.
    assert_eq!(hit.signal.estimated_overpayment_usd, 216_000.0);
}

/**
 * CERTIFICACIÓN DE DEGRADACIÓN: sin registro, el catálogo omite las seis
 * señales dependientes y lo registra para el reporte.
 */
#[test]
fn certify_catalog_degrades_without_registry() {
    let store = fixtures::outlier_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let enabled: BTreeSet<SignalKind> =
        centinela_domain_models::SIGNAL_CATALOG_ORDER.into_iter().collect();

    let run = run_catalog(&context, &config, &enabled, &CancellationFlag::new(), |_| {});

    let degraded: Vec<&SignalKind> = run
        .skipped
        .iter()
        .filter(|skipped| skipped.reason.contains("registry"))
        .map(|skipped| &skipped.kind)
        .collect();
    assert_eq!(degraded.len(), 6);
    assert!(degraded.contains(&&SignalKind::ShellEntityNetwork));
    assert!(degraded.contains(&&SignalKind::GeographicAnomaly));
    assert!(degraded.contains(&&SignalKind::WorkforceImpossibility));
    // Los trece restantes sí ejecutan.
    assert_eq!(run.executed.len(), 13);
}

/**
 * CERTIFICACIÓN DE CANCELACIÓN: una bandera activa omite todo el catálogo.
 */
#[test]
fn certify_cancellation_at_detector_boundaries() {
    let store = fixtures::outlier_store();
    let (aggregates, config) = context_of(&store);
    let context = AnalysisContext { store: &store, aggregates: &aggregates };
    let enabled: BTreeSet<SignalKind> =
        centinela_domain_models::SIGNAL_CATALOG_ORDER.into_iter().collect();

    let cancellation = CancellationFlag::new();
    cancellation.cancel();
    let run = run_catalog(&context, &config, &enabled, &cancellation, |_| {});

    assert!(run.executed.is_empty());
    assert!(run.candidates.is_empty());
    assert_eq!(run.skipped.len(), 19);
}
