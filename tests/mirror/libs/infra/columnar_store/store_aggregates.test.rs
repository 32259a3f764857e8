// [tests/mirror/libs/infra/columnar_store/store_aggregates.test.rs]
/**
 * =================================================================
 * APARATO: AGGREGATES INTEGRITY CERTIFIER (V3.2 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: PROVING GROUNDS (ESTRATO L3-STORE)
 * RESPONSABILIDAD: VALIDACIÓN DE LOS ROLLUPS MATERIALIZADOS
 * =================================================================
 */

#[path = "../../domain/signals/fixtures.rs"]
mod fixtures;

use centinela_domain_models::ClaimMonth;
use centinela_infra_store::Aggregates;

/**
 * CERTIFICACIÓN: totales por proveedor, por mes y por código.
 */
#[test]
fn certify_provider_rollups() {
    let store = fixtures::build_store(
        vec![
            fixtures::spending_row("1111111111", "1111111111", "99213", "2023-01", 10, 50, 5_000.0),
            fixtures::spending_row("1111111111", "1111111111", "99213", "2023-02", 12, 55, 5_500.0),
            fixtures::spending_row("1111111111", "1111111111", "G0151", "2023-02", 3, 10, 1_500.0),
            fixtures::spending_row("2222222222", "2222222222", "99213", "2023-01", 20, 100, 10_000.0),
        ],
        Vec::new(),
        None,
        None,
    );
    let aggregates = Aggregates::materialize(&store);

    assert_eq!(aggregates.distinct_billing_providers(), 2);
    let totals = &aggregates.provider_totals["1111111111"];
    assert_eq!(totals.paid, 12_000.0);
    assert_eq!(totals.claims, 115);
    assert_eq!(totals.beneficiaries, 25);

    let february = ClaimMonth::parse("2023-02").unwrap();
    let monthly = &aggregates.provider_monthly["1111111111"][&february];
    assert_eq!(monthly.paid, 7_000.0);
    assert_eq!(monthly.claims, 65);

    let code_totals = &aggregates.provider_code_totals["1111111111"]["99213"];
    assert_eq!(code_totals.paid, 10_500.0);

    // Inversión código -> proveedores, ordenada por NPI.
    let peers = &aggregates.code_provider_totals["99213"];
    let peer_npis: Vec<&str> = peers.iter().map(|row| row.npi.as_str()).collect();
    assert_eq!(peer_npis, vec!["1111111111", "2222222222"]);
}

/**
 * CERTIFICACIÓN: proyecciones E&M y home-health restringidas a sus code sets.
 */
#[test]
fn certify_code_set_projections() {
    let store = fixtures::build_store(
        vec![
            fixtures::spending_row("1111111111", "1111111111", "99213", "2023-01", 10, 50, 5_000.0),
            fixtures::spending_row("1111111111", "1111111111", "T1019", "2023-01", 2, 80, 8_000.0),
            fixtures::spending_row("1111111111", "1111111111", "T1019", "2023-02", 2, 90, 9_000.0),
            fixtures::spending_row("1111111111", "1111111111", "G0151", "2023-02", 1, 30, 3_000.0),
            fixtures::spending_row("1111111111", "1111111111", "A0428", "2023-02", 5, 20, 2_000.0),
        ],
        Vec::new(),
        None,
        None,
    );
    let aggregates = Aggregates::materialize(&store);

    let em = &aggregates.provider_em_totals["1111111111"];
    assert_eq!(em.paid, 5_000.0);

    let hh = &aggregates.provider_hh_totals["1111111111"];
    assert_eq!(hh.totals.paid, 20_000.0);
    assert_eq!(hh.totals.claims, 200);
    assert_eq!(hh.distinct_codes, 2);
    assert_eq!(hh.billing_months, 2);
}

/**
 * CERTIFICACIÓN: los hubs de servicio excluyen el auto-servicio.
 */
#[test]
fn certify_servicing_hub_excludes_self_service() {
    let store = fixtures::build_store(
        vec![
            // Auto-servicio: jamás entra al rollup de hubs.
            fixtures::spending_row("1111111111", "1111111111", "99213", "2023-01", 10, 50, 5_000.0),
            fixtures::spending_row("1111111111", "1290000000", "99213", "2023-01", 10, 50, 5_000.0),
            fixtures::spending_row("2222222222", "1290000000", "99213", "2023-01", 8, 40, 4_000.0),
            // Ejecutante vacío: descartado.
            fixtures::spending_row("3333333333", "", "99213", "2023-01", 8, 40, 4_000.0),
        ],
        Vec::new(),
        None,
        None,
    );
    let aggregates = Aggregates::materialize(&store);

    assert!(!aggregates.servicing_hub_totals.contains_key("1111111111"));
    let links = &aggregates.servicing_hub_totals["1290000000"];
    assert_eq!(links.len(), 2);
    let linked: Vec<&str> = links.iter().map(|link| link.billing_npi.as_str()).collect();
    assert_eq!(linked, vec!["1111111111", "2222222222"]);
}

/**
 * CERTIFICACIÓN: los rollups dependientes del registro quedan vacíos sin él.
 */
#[test]
fn certify_registry_dependent_rollups_degrade() {
    let rows = vec![fixtures::spending_row(
        "5555555555", "5511111111", "99213", "2023-01", 10, 500, 5_000.0,
    )];
    let without_registry = fixtures::build_store(rows.clone(), Vec::new(), None, None);
    let aggregates = Aggregates::materialize(&without_registry);
    assert!(aggregates.org_worker_monthly.is_empty());
    assert!(aggregates.serv_state_monthly.is_empty());
    assert!(aggregates.hh_zip_totals.is_empty());

    let registry = vec![
        fixtures::registry_entry("5555555555", "2", "MegaCorp Health", "", "", "FL", "33101", "251S00000X", "2015-01-01", "", ""),
        fixtures::registry_entry("5511111111", "1", "", "Worker", "One", "FL", "33101", "207Q00000X", "2016-01-01", "", ""),
    ];
    let with_registry = fixtures::build_store(rows, Vec::new(), Some(registry), None);
    let aggregates = Aggregates::materialize(&with_registry);
    let january = ClaimMonth::parse("2023-01").unwrap();
    assert_eq!(aggregates.org_worker_monthly["5555555555"][&january], 1);
    assert_eq!(
        aggregates.serv_state_monthly["5555555555"][&(january, "FL".to_string())].paid,
        5_000.0
    );
}

/**
 * CERTIFICACIÓN: ZIP home-health agrupado desde el registro.
 */
#[test]
fn certify_home_health_zip_rollup() {
    let rows = vec![
        fixtures::spending_row("1400000001", "1400000001", "T1019", "2023-01", 1, 200, 50_000.0),
        fixtures::spending_row("1400000002", "1400000002", "T1019", "2023-01", 2, 220, 55_000.0),
    ];
    let registry = vec![
        fixtures::registry_entry("1400000001", "1", "", "Caregiver1", "Family", "MN", "555011234", "374700000X", "2018-01-01", "", ""),
        fixtures::registry_entry("1400000002", "1", "", "Caregiver2", "Family", "MN", "55501", "374700000X", "2018-02-01", "", ""),
    ];
    let store = fixtures::build_store(rows, Vec::new(), Some(registry), None);
    let aggregates = Aggregates::materialize(&store);

    // El ZIP+4 se recorta a cinco dígitos; ambos caen en 55501.
    let zip_rows = &aggregates.hh_zip_totals["55501"];
    assert_eq!(zip_rows.len(), 2);
    let zip_paid: f64 = zip_rows.iter().map(|row| row.totals.paid).sum();
    assert_eq!(zip_paid, 105_000.0);
}
