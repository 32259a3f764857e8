// [tests/mirror/libs/domain/signals/fixtures.rs]
#![allow(dead_code)]
/*!
 * =================================================================
 * APARATO: SYNTHETIC SNAPSHOT FORGE (V3.2 - TRINITY SHARED)
 * CLASIFICACIÓN: PROVING GROUNDS SUPPORT (ESTRATO L2)
 * RESPONSABILIDAD: CONSTRUCCIÓN DE SNAPSHOTS SINTÉTICOS POR ESCENARIO
 *
 * Cada escenario del catálogo recibe su propio snapshot mínimo: las
 * poblaciones estadísticas (S2/S7) son sensibles a cada fila presente,
 * de modo que mezclar escenarios en una sola tabla contaminaría los
 * umbrales sigma.
 * =================================================================
 */

use centinela_domain_models::{ClaimMonth, EntityType};
use centinela_infra_store::{
    CensusRow, CensusTable, ColumnStore, ExclusionEntry, ExclusionTable, RegistryEntry,
    RegistryTable, SpendingTable,
};
use centinela_infra_store::schema::SpendingRow;

/// Fila de gasto sintética (mes en formato `YYYY-MM`).
pub fn spending_row(
    billing_npi: &str,
    servicing_npi: &str,
    hcpcs_code: &str,
    claim_month: &str,
    unique_beneficiaries: u64,
    total_claims: u64,
    total_paid: f64,
) -> SpendingRow {
    SpendingRow {
        billing_npi: billing_npi.to_string(),
        servicing_npi: servicing_npi.to_string(),
        hcpcs_code: hcpcs_code.to_string(),
        claim_month: ClaimMonth::parse(claim_month).expect("fixture month"),
        unique_beneficiaries,
        total_claims,
        total_paid,
    }
}

/// Entrada de exclusión sintética.
pub fn exclusion_entry(
    npi: &str,
    last_name: &str,
    first_name: &str,
    bus_name: &str,
    state: &str,
    exclusion_type: &str,
    exclusion_date: &str,
    reinstatement_date: &str,
) -> ExclusionEntry {
    ExclusionEntry {
        npi: npi.to_string(),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        mid_name: String::new(),
        bus_name: bus_name.to_string(),
        state: state.to_string(),
        exclusion_type: exclusion_type.to_string(),
        exclusion_date_raw: exclusion_date.to_string(),
        reinstatement_date_raw: reinstatement_date.to_string(),
    }
}

/// Fila de registro sintética (fecha de alta `YYYY-MM-DD`, vacía = ausente).
#[allow(clippy::too_many_arguments)]
pub fn registry_entry(
    npi: &str,
    entity_code: &str,
    org_name: &str,
    last_name: &str,
    first_name: &str,
    state: &str,
    postal_code: &str,
    taxonomy_code: &str,
    enumeration_date: &str,
    official_last: &str,
    official_first: &str,
) -> RegistryEntry {
    RegistryEntry {
        npi: npi.to_string(),
        entity_type: EntityType::from_registry_code(entity_code),
        org_name: org_name.to_string(),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        state: state.to_string(),
        postal_code: postal_code.to_string(),
        taxonomy_code: taxonomy_code.to_string(),
        enumeration_month: ClaimMonth::parse(enumeration_date),
        enumeration_date_raw: enumeration_date.to_string(),
        auth_official_last: official_last.to_string(),
        auth_official_first: official_first.to_string(),
    }
}

/// Ensambla un contexto columnar completo desde filas sintéticas.
pub fn build_store(
    spending_rows: Vec<SpendingRow>,
    exclusions: Vec<ExclusionEntry>,
    registry: Option<Vec<RegistryEntry>>,
    census: Option<Vec<CensusRow>>,
) -> ColumnStore {
    let mut spending = SpendingTable::with_capacity(spending_rows.len());
    for row in spending_rows {
        spending.push_row(row);
    }
    ColumnStore {
        spending,
        exclusions: ExclusionTable::new(exclusions),
        registry: registry.map(RegistryTable::new),
        census: census.map(CensusTable::new),
        data_sources: vec!["synthetic://proving-grounds".to_string()],
    }
}

/// Escenario semilla 1: excluido que sigue facturando $37,000 en 2023,
/// junto a un reinstalado que NO debe marcarse.
pub fn excluded_provider_store() -> ColumnStore {
    let spending = vec![
        spending_row("1111111111", "1111111111", "99213", "2023-01", 15, 60, 6_000.0),
        spending_row("2222222222", "2222222222", "99213", "2023-01", 20, 100, 10_000.0),
        spending_row("2222222222", "2222222222", "99213", "2023-06", 25, 120, 12_000.0),
        spending_row("2222222222", "2222222222", "99213", "2023-12", 30, 150, 15_000.0),
        spending_row("2323232323", "2323232323", "99213", "2023-03", 10, 40, 9_000.0),
    ];
    let exclusions = vec![
        exclusion_entry("2222222222", "DOE", "JOHN", "", "NY", "1128a1", "20220101", ""),
        exclusion_entry("2323232323", "ROE", "JANE", "", "CA", "1128b4", "20200101", "20240115"),
        // NPI centinela de ceros: registrado pero jamás enlazable.
        exclusion_entry("0000000000", "GHOST", "", "", "", "1128a1", "20190101", ""),
    ];
    build_store(spending, exclusions, None, None)
}

/// Escenario semilla 2: un outlier de $1.1M contra veinte pares de ~$5k.
/// Con n = 21 el z poblacional máximo es sqrt(20) ≈ 4.47 > 3.
pub fn outlier_store() -> ColumnStore {
    let mut spending = vec![spending_row(
        "3333333333",
        "3333333333",
        "99213",
        "2023-01",
        100,
        500,
        1_100_000.0,
    )];
    for peer_index in 0..20u64 {
        let npi = format!("34000000{:02}", peer_index);
        spending.push(spending_row(
            &npi,
            &npi,
            "99213",
            "2023-01",
            10,
            50,
            4_800.0 + peer_index as f64 * 25.0,
        ));
    }
    build_store(spending, Vec::new(), None, None)
}

/// Población constante: sigma cero debe producir cero filas en S2.
pub fn degenerate_sigma_store() -> ColumnStore {
    let mut spending = Vec::new();
    for peer_index in 0..6u64 {
        let npi = format!("350000000{}", peer_index);
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", 10, 50, 5_000.0));
    }
    build_store(spending, Vec::new(), None, None)
}

/// Escenario semilla 3: alta en 2023-01 con $1,000 y pico de $400,000.
/// Incluye un caso frontera con primer mes de exactamente $100.
pub fn bust_out_store() -> ColumnStore {
    let spending = vec![
        spending_row("4444444444", "4444444444", "99213", "2023-01", 5, 20, 1_000.0),
        spending_row("4444444444", "4444444444", "99213", "2023-02", 10, 40, 50_000.0),
        spending_row("4444444444", "4444444444", "99213", "2023-03", 20, 90, 400_000.0),
        spending_row("4444444444", "4444444444", "99213", "2023-04", 15, 70, 150_000.0),
        // Frontera: $100 exactos el primer mes quedan excluidos.
        spending_row("4545454545", "4545454545", "99213", "2023-01", 2, 5, 100.0),
        spending_row("4545454545", "4545454545", "99213", "2023-02", 10, 50, 90_000.0),
        // Proveedor establecido (previo al piso de alta): jamás elegible.
        spending_row("1111111111", "1111111111", "99213", "2021-05", 10, 50, 5_000.0),
        spending_row("1111111111", "1111111111", "99213", "2023-02", 10, 50, 900_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// Escenario semilla 4: volumen imposible (>500 reclamos/beneficiario).
pub fn impossible_volume_store() -> ColumnStore {
    let spending = vec![
        // Ratio 50: no marcado.
        spending_row("5050505050", "5050505050", "99213", "2023-01", 100, 5_000, 500_000.0),
        // Ratio exactamente 500: frontera excluida.
        spending_row("5151515151", "5151515151", "99213", "2023-01", 10, 5_000, 400_000.0),
        // Ratio 556: marcado; sobrepago = 0.9 × 500,000.
        spending_row("5252525252", "5252525252", "99213", "2023-01", 9, 5_000, 500_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// S5: abuso home health con frontera de ratio 50 exacto.
pub fn home_health_store() -> ColumnStore {
    let spending = vec![
        // Ratio 80 > 50 con $60,000: marcado.
        spending_row("7777777777", "7777777777", "T1019", "2023-01", 5, 200, 30_000.0),
        spending_row("7777777777", "7777777777", "G0151", "2023-02", 5, 600, 30_000.0),
        // Ratio exactamente 50: frontera excluida.
        spending_row("7878787878", "7878787878", "T1019", "2023-01", 10, 500, 40_000.0),
        // Código no home-health: fuera de la proyección.
        spending_row("7979797979", "7979797979", "99213", "2023-01", 2, 400, 90_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// Escenario semilla 5: cinco organizaciones bajo SMITH ROBERT con
/// $1,050,000 combinados, más una red de cuatro (frontera excluida).
pub fn shell_network_store() -> ColumnStore {
    let mut spending = Vec::new();
    let mut registry = Vec::new();
    let shell_paid = [300_000.0, 250_000.0, 200_000.0, 180_000.0, 120_000.0];
    for (index, paid) in shell_paid.iter().enumerate() {
        let npi = format!("666666666{}", index + 1);
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", 40, 180, *paid));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Shell Corp {}", index + 1),
            "",
            "",
            "NJ",
            &format!("0700{}", index + 1),
            "261QM1200X",
            "2018-01-01",
            "SMITH",
            "ROBERT",
        ));
    }
    // Red de cuatro bajo BROWN ALICE: por debajo del mínimo de cinco NPIs.
    for index in 0..4 {
        let npi = format!("676767676{index}");
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", 10, 50, 90_000.0));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Quad Corp {index}"),
            "",
            "",
            "PA",
            "19101",
            "261QM1200X",
            "2019-01-01",
            "BROWN",
            "ALICE",
        ));
    }
    // Red de cinco bajo POOR PENNY con facturación combinada < $10,000.
    for index in 0..5 {
        let npi = format!("686868686{index}");
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", 1, 4, 1_500.0));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Penny Corp {index}"),
            "",
            "",
            "OH",
            "44101",
            "261QM1200X",
            "2019-06-01",
            "POOR",
            "PENNY",
        ));
    }
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S7: un proveedor de $2M contra veinticinco pares de ~$5k en CA.
pub fn geographic_store() -> ColumnStore {
    let mut spending = vec![spending_row(
        "8888888888",
        "8888888888",
        "99213",
        "2023-01",
        200,
        900,
        2_000_000.0,
    )];
    let mut registry = vec![registry_entry(
        "8888888888",
        "1",
        "",
        "Mega",
        "Biller",
        "CA",
        "90210",
        "207Q00000X",
        "2015-01-01",
        "",
        "",
    )];
    for peer_index in 0..25u64 {
        let npi = format!("88000000{:02}", peer_index);
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", 10, 50, 4_900.0 + peer_index as f64 * 10.0));
        registry.push(registry_entry(
            &npi,
            "1",
            "",
            "Peer",
            "Doc",
            "CA",
            "90211",
            "207Q00000X",
            "2015-01-01",
            "",
            "",
        ));
    }
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S8: tres meses de base ~$2,000 y un pico de $50,000, junto a un
/// proveedor con solo dos meses previos (frontera excluida).
pub fn temporal_spike_store() -> ColumnStore {
    let spending = vec![
        spending_row("9999999999", "9999999999", "99213", "2023-01", 10, 40, 2_000.0),
        spending_row("9999999999", "9999999999", "99213", "2023-02", 10, 40, 2_000.0),
        spending_row("9999999999", "9999999999", "99213", "2023-03", 10, 40, 2_000.0),
        spending_row("9999999999", "9999999999", "99213", "2023-04", 50, 400, 50_000.0),
        // Solo dos meses previos: no elegible aunque el salto sea enorme.
        spending_row("9898989898", "9898989898", "99213", "2023-01", 10, 40, 2_000.0),
        spending_row("9898989898", "9898989898", "99213", "2023-02", 10, 40, 2_000.0),
        spending_row("9898989898", "9898989898", "99213", "2023-03", 50, 400, 60_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// S9: dos códigos con 95% del pago en uno, sobre $60,000.
pub fn concentration_store() -> ColumnStore {
    let spending = vec![
        spending_row("1212121212", "1212121212", "99214", "2023-01", 20, 400, 57_000.0),
        spending_row("1212121212", "1212121212", "99213", "2023-02", 5, 20, 3_000.0),
        // Perfil diversificado: nunca marcado.
        spending_row("1313131313", "1313131313", "99213", "2023-01", 20, 100, 30_000.0),
        spending_row("1313131313", "1313131313", "99214", "2023-01", 20, 100, 30_000.0),
        spending_row("1313131313", "1313131313", "99215", "2023-01", 20, 100, 30_000.0),
        spending_row("1313131313", "1313131313", "G0151", "2023-01", 20, 100, 30_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// Escenario semilla 6: un proveedor que dispara S2 y S3 a la vez
/// (alta reciente con rampa brutal y outlier poblacional).
pub fn multi_signal_store() -> ColumnStore {
    let mut spending = vec![
        spending_row("9700000001", "9700000001", "99213", "2023-01", 5, 20, 1_000.0),
        spending_row("9700000001", "9700000001", "99213", "2023-02", 30, 150, 200_000.0),
        spending_row("9700000001", "9700000001", "99213", "2023-03", 60, 300, 400_000.0),
    ];
    for peer_index in 0..20u64 {
        let npi = format!("97000001{:02}", peer_index);
        spending.push(spending_row(&npi, &npi, "99213", "2021-06", 10, 50, 5_000.0));
    }
    build_store(spending, Vec::new(), None, None)
}

/// S10: organización con dos ejecutantes y volumen mensual imposible.
pub fn workforce_store() -> ColumnStore {
    let spending = vec![
        spending_row("5555555555", "5511111111", "99213", "2023-01", 200, 2_500, 25_000.0),
        spending_row("5555555555", "5522222222", "99213", "2023-01", 180, 2_500, 25_000.0),
        // Mes normal: muy por debajo del umbral de 6 reclamos/hora.
        spending_row("5555555555", "5511111111", "99213", "2023-02", 50, 300, 4_000.0),
    ];
    let registry = vec![
        registry_entry("5555555555", "2", "MegaCorp Health", "", "", "FL", "33101", "251S00000X", "2015-01-01", "", ""),
        registry_entry("5511111111", "1", "", "Worker", "One", "FL", "33101", "207Q00000X", "2016-01-01", "", ""),
        registry_entry("5522222222", "1", "", "Worker", "Two", "FL", "33102", "207Q00000X", "2016-01-01", "", ""),
    ];
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S11: cohorte de cuatro organizaciones misma taxonomía+estado+trimestre.
pub fn burst_enrollment_store() -> ColumnStore {
    let mut spending = Vec::new();
    let mut registry = Vec::new();
    let enrollment_dates = ["2023-01-15", "2023-02-01", "2023-02-15", "2023-03-01"];
    let cohort_paid = [200_000.0, 180_000.0, 150_000.0, 130_000.0];
    for index in 0..4 {
        let npi = format!("101000000{}", index + 1);
        spending.push(spending_row(&npi, &npi, "99213", "2023-04", 20, 100, cohort_paid[index]));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Burst Corp {}", index + 1),
            "",
            "",
            "OH",
            &format!("4410{index}"),
            "261QR0400X",
            enrollment_dates[index],
            "",
            "",
        ));
    }
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S12: tres organizaciones bajo el mismo oficial con picos en 2023-06.
pub fn coordinated_ramp_store() -> ColumnStore {
    let mut spending = Vec::new();
    let mut registry = Vec::new();
    for index in 0..3 {
        let npi = format!("121200000{}", index + 1);
        spending.push(spending_row(&npi, &npi, "99213", "2023-02", 10, 40, 8_000.0));
        spending.push(spending_row(
            &npi,
            &npi,
            "99213",
            "2023-06",
            50,
            220,
            [250_000.0, 200_000.0, 180_000.0][index],
        ));
        spending.push(spending_row(&npi, &npi, "99213", "2023-09", 10, 40, 6_000.0));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Ramp Corp {}", index + 1),
            "",
            "",
            "TX",
            "75001",
            "261QM1200X",
            "2022-06-01",
            "SMITH",
            "ROBERT",
        ));
    }
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S13/S19: hubs de servicio fantasma.
pub fn servicing_hub_store() -> ColumnStore {
    let mut spending = Vec::new();
    // Hub S13: cinco facturadores con beneficiarios normales.
    for index in 1..=5u64 {
        spending.push(spending_row(
            &format!("120000000{index}"),
            "1290000000",
            "99213",
            "2023-01",
            10,
            50,
            100_000.0 + index as f64 * 5_000.0,
        ));
    }
    // Dispersión S19: seis facturadores que comparten tres beneficiarios.
    let spread_beneficiaries = [1, 1, 1, 0, 0, 0];
    for index in 1..=6u64 {
        spending.push(spending_row(
            &format!("190000000{index}"),
            "1900000000",
            "99213",
            "2023-01",
            spread_beneficiaries[index as usize - 1],
            100,
            40_000.0,
        ));
    }
    build_store(spending, Vec::new(), None, None)
}

/// S14: tres organizaciones bajo JONES MARY con ratio de dilución absurdo.
pub fn dilution_store() -> ColumnStore {
    let mut spending = Vec::new();
    let mut registry = Vec::new();
    let dilution_rows = [(3u64, 500u64, 250_000.0), (2, 400, 200_000.0), (2, 300, 150_000.0)];
    for (index, (beneficiaries, claims, paid)) in dilution_rows.iter().enumerate() {
        let npi = format!("130000000{}", index + 1);
        spending.push(spending_row(&npi, &npi, "99213", "2023-01", *beneficiaries, *claims, *paid));
        registry.push(registry_entry(
            &npi,
            "2",
            &format!("Dilution Corp {}", index + 1),
            "",
            "",
            "GA",
            &format!("3030{index}"),
            "251E00000X",
            "2019-01-01",
            "JONES",
            "MARY",
        ));
    }
    build_store(spending, Vec::new(), Some(registry), None)
}

/// S15: un abusador de T1019 contra diez pares de ratio normal.
pub fn repetitive_service_store() -> ColumnStore {
    let mut spending = vec![
        spending_row("1500000001", "1500000001", "T1019", "2023-01", 1, 250, 25_000.0),
        spending_row("1500000001", "1500000001", "T1019", "2023-02", 1, 250, 25_000.0),
    ];
    for peer_index in 2..=11u64 {
        let npi = format!("15000000{:02}", peer_index);
        spending.push(spending_row(&npi, &npi, "T1019", "2023-01", 10, 110, 11_000.0));
        spending.push(spending_row(&npi, &npi, "T1019", "2023-02", 10, 110, 11_000.0));
    }
    build_store(spending, Vec::new(), None, None)
}

/// S16: monocultivo del 98% sobre 99215.
pub fn monoculture_store() -> ColumnStore {
    let spending = vec![
        spending_row("1600000001", "1600000001", "99215", "2023-01", 20, 490, 245_000.0),
        spending_row("1600000001", "1600000001", "99215", "2023-02", 10, 50, 25_000.0),
        spending_row("1600000001", "1600000001", "99213", "2023-01", 5, 10, 3_000.0),
    ];
    build_store(spending, Vec::new(), None, None)
}

/// S17: rampa hasta $120,000 y colapso inmediato a $500.
pub fn ramp_collapse_store() -> ColumnStore {
    let months = [
        ("2023-01", 5u64, 30u64, 3_000.0),
        ("2023-02", 10, 80, 8_000.0),
        ("2023-03", 20, 200, 20_000.0),
        ("2023-04", 40, 450, 45_000.0),
        ("2023-05", 60, 700, 70_000.0),
        ("2023-06", 80, 1_200, 120_000.0),
        ("2023-07", 2, 5, 500.0),
        ("2023-08", 1, 3, 300.0),
    ];
    let spending = months
        .iter()
        .map(|(month, beneficiaries, claims, paid)| {
            spending_row("1700000001", "1700000001", "99213", month, *beneficiaries, *claims, *paid)
        })
        .collect();
    build_store(spending, Vec::new(), None, None)
}

/// S18: tarifa de $500/reclamo contra diez pares de ~$100/reclamo.
pub fn rate_anomaly_store() -> ColumnStore {
    let mut spending = vec![
        spending_row("1800000001", "1800000001", "99214", "2023-01", 30, 100, 50_000.0),
        spending_row("1800000001", "1800000001", "99214", "2023-02", 30, 100, 50_000.0),
    ];
    for peer_index in 2..=11u64 {
        let npi = format!("18000000{:02}", peer_index);
        spending.push(spending_row(&npi, &npi, "99214", "2023-01", 20, 120, 12_000.0));
    }
    build_store(spending, Vec::new(), None, None)
}
