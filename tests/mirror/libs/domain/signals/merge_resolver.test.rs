// [tests/mirror/libs/domain/signals/merge_resolver.test.rs]
/**
 * =================================================================
 * APARATO: MERGE RESOLVER CERTIFIER (V3.3 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: PROVING GROUNDS (ESTRATO L2-SIGNALS)
 * RESPONSABILIDAD: LEYES DE FUSIÓN Y ESCALACIÓN DE SEVERIDAD
 *
 * # Leyes certificadas:
 * - Sobrepago combinado = suma exacta de las señales del proveedor.
 * - Con >= 2 señales ninguna queda en 'medium' tras la fusión.
 * - 'critical' jamás se degrada.
 * - La fusión es independiente del orden de llegada de los candidatos
 *   (mismas claves, mismos combinados, mismo multiconjunto de señales).
 * =================================================================
 */

mod fixtures;

use centinela_domain_models::{
    EntityType, Severity, SignalCandidate, SignalKind, SignalRecord,
};
use centinela_domain_signals::merge::{apply_severity_escalation, merge_candidates};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

fn candidate(
    npi: &str,
    provider_name: &str,
    state: &str,
    total_paid: f64,
    kind: SignalKind,
    severity: Severity,
    overpayment: f64,
) -> SignalCandidate {
    SignalCandidate {
        npi: npi.to_string(),
        provider_name: provider_name.to_string(),
        entity_type: if provider_name.starts_with("NPI ") {
            EntityType::Unknown
        } else {
            EntityType::Individual
        },
        state: state.to_string(),
        total_paid,
        total_claims: (total_paid / 100.0) as u64,
        total_beneficiaries: 10,
        signal: SignalRecord {
            signal_type: kind,
            severity,
            description: format!("synthetic signal for {npi}"),
            evidence: json!({ "synthetic": true }),
            estimated_overpayment_usd: overpayment,
            overpayment_methodology: "synthetic".to_string(),
        },
    }
}

/**
 * CERTIFICACIÓN: reglas de identidad y máximos escalares de la fusión.
 */
#[test]
fn certify_merge_identity_preference_and_scalar_max() {
    let merged = merge_candidates(vec![
        candidate("9700000001", "NPI 9700000001", "", 400_000.0, SignalKind::BustOutScheme, Severity::High, 320_000.0),
        candidate("9700000001", "Multi Signal", "CA", 601_000.0, SignalKind::StatisticalBillingOutlier, Severity::High, 150_000.0),
    ]);

    assert_eq!(merged.len(), 1);
    let provider = &merged["9700000001"];
    // Identidad conocida preferida sobre el relleno; escalares por máximo.
    assert_eq!(provider.provider_name, "Multi Signal");
    assert_eq!(provider.state, "CA");
    assert_eq!(provider.entity_type, EntityType::Individual);
    assert_eq!(provider.total_paid, 601_000.0);
    assert_eq!(provider.signals.len(), 2);
    assert_eq!(provider.combined_overpayment(), 470_000.0);
}

/**
 * CERTIFICACIÓN (escenario semilla 6): proveedor con S2+S3 — una sola
 * entrada, sobrepago sumado, 'medium' escala a 'high'.
 */
#[test]
fn certify_multi_signal_escalation() {
    let mut merged = merge_candidates(vec![
        candidate("9700000001", "NPI 9700000001", "", 400_000.0, SignalKind::BustOutScheme, Severity::High, 100_000.0),
        candidate("9700000001", "NPI 9700000001", "", 601_000.0, SignalKind::ProcedureCodeConcentration, Severity::Medium, 50_000.0),
    ]);
    apply_severity_escalation(&mut merged, 500_000.0);

    let provider = &merged["9700000001"];
    assert_eq!(provider.signals.len(), 2);
    assert!(provider
        .signals
        .iter()
        .all(|signal| signal.severity != Severity::Medium));
    assert_eq!(provider.combined_overpayment(), 150_000.0);
}

/**
 * CERTIFICACIÓN: el piso de sobrepago combinado escala un 'medium' aislado.
 */
#[test]
fn certify_combined_floor_escalates_single_medium() {
    let mut merged = merge_candidates(vec![candidate(
        "6666666661",
        "ROBERT SMITH (network)",
        "NJ",
        2_000_000.0,
        SignalKind::ShellEntityNetwork,
        Severity::Medium,
        600_000.0,
    )]);
    apply_severity_escalation(&mut merged, 500_000.0);
    assert_eq!(merged["6666666661"].signals[0].severity, Severity::High);

    // Bajo el piso y con una sola señal, 'medium' se conserva.
    let mut below_floor = merge_candidates(vec![candidate(
        "6666666662",
        "NPI 6666666662",
        "",
        100_000.0,
        SignalKind::ShellEntityNetwork,
        Severity::Medium,
        30_000.0,
    )]);
    apply_severity_escalation(&mut below_floor, 500_000.0);
    assert_eq!(below_floor["6666666662"].signals[0].severity, Severity::Medium);
}

/**
 * CERTIFICACIÓN: 'critical' es terminal — nunca se degrada ni se toca.
 */
#[test]
fn certify_critical_is_never_downgraded() {
    let mut merged = merge_candidates(vec![
        candidate("2222222222", "JOHN DOE", "NY", 37_000.0, SignalKind::ExcludedProviderBilling, Severity::Critical, 37_000.0),
        candidate("2222222222", "JOHN DOE", "NY", 37_000.0, SignalKind::BillingMonoculture, Severity::Medium, 11_100.0),
    ]);
    apply_severity_escalation(&mut merged, 500_000.0);

    let severities: Vec<Severity> = merged["2222222222"]
        .signals
        .iter()
        .map(|signal| signal.severity)
        .collect();
    assert_eq!(severities, vec![Severity::Critical, Severity::High]);
}

/// Estrategia de candidatos sintéticos sobre un pool pequeño de NPIs.
fn candidate_strategy() -> impl Strategy<Value = SignalCandidate> {
    (
        0u8..5,
        0u32..1_000_000,
        prop_oneof![
            Just(Severity::Critical),
            Just(Severity::High),
            Just(Severity::Medium)
        ],
        prop_oneof![
            Just(SignalKind::StatisticalBillingOutlier),
            Just(SignalKind::BustOutScheme),
            Just(SignalKind::BillingMonoculture),
            Just(SignalKind::ExcludedProviderBilling)
        ],
    )
        .prop_map(|(npi_index, overpayment_cents, severity, kind)| {
            let npi = format!("900000000{npi_index}");
            // Nombre determinista por NPI: la preferencia de identidad no
            // depende del orden de llegada.
            let provider_name = format!("Provider {npi_index}");
            candidate(
                &npi,
                &provider_name,
                "TX",
                overpayment_cents as f64,
                kind,
                severity,
                overpayment_cents as f64 / 100.0,
            )
        })
}

type MergeSummary = BTreeMap<String, (usize, Vec<&'static str>, i64, i64)>;

/// Proyección comparable de un mapa fusionado: cardinalidad de señales,
/// multiconjunto de tipos, combinado en centavos y pagado máximo.
fn summarize(merged: &BTreeMap<String, centinela_domain_signals::MergedProvider>) -> MergeSummary {
    merged
        .iter()
        .map(|(npi, provider)| {
            let mut kinds: Vec<&'static str> = provider
                .signals
                .iter()
                .map(|signal| signal.signal_type.as_str())
                .collect();
            kinds.sort_unstable();
            (
                npi.clone(),
                (
                    provider.signals.len(),
                    kinds,
                    (provider.combined_overpayment() * 100.0).round() as i64,
                    (provider.total_paid * 100.0).round() as i64,
                ),
            )
        })
        .collect()
}

proptest! {
    /**
     * LEY: la fusión es conmutativa y asociativa sobre las listas de
     * señales — cualquier permutación de los candidatos produce el
     * mismo resultado observable.
     */
    #[test]
    fn law_merge_is_order_independent(
        candidates in proptest::collection::vec(candidate_strategy(), 0..24),
        seed in any::<u64>(),
    ) {
        let mut shuffled = candidates.clone();
        // Permutación determinista de Fisher-Yates con un LCG sembrado.
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        for index in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let swap_index = (state >> 33) as usize % (index + 1);
            shuffled.swap(index, swap_index);
        }

        let mut direct = merge_candidates(candidates);
        let mut permuted = merge_candidates(shuffled);
        prop_assert_eq!(summarize(&direct), summarize(&permuted));

        // La escalación también es invariante ante la permutación.
        apply_severity_escalation(&mut direct, 500_000.0);
        apply_severity_escalation(&mut permuted, 500_000.0);
        for (npi, provider) in &direct {
            let mut left: Vec<u8> = provider.signals.iter().map(|signal| signal.severity.rank()).collect();
            let mut right: Vec<u8> = permuted[npi].signals.iter().map(|signal| signal.severity.rank()).collect();
            left.sort_unstable();
            right.sort_unstable();
            prop_assert_eq!(left, right);
        }
    }

    /**
     * LEY: tras la fusión + escalación, ningún proveedor multi-señal
     * conserva severidad 'medium'.
     */
    #[test]
    fn law_no_medium_survives_on_multi_signal_providers(
        candidates in proptest::collection::vec(candidate_strategy(), 0..24),
    ) {
        let mut merged = merge_candidates(candidates);
        apply_severity_escalation(&mut merged, 500_000.0);
        for provider in merged.values() {
            if provider.signals.len() >= 2 {
                prop_assert!(provider.signals.iter().all(|signal| signal.severity != Severity::Medium));
            }
        }
    }
}
