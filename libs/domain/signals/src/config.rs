// [libs/domain/signals/src/config.rs]
/*!
 * =================================================================
 * APARATO: DETECTION CONFIG (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: UMBRALES Y TOPES AJUSTABLES DEL CATÁLOGO
 *
 * # Política:
 * Los topes top-K son configuración pragmática, no propiedades de
 * corrección: acotan la salida sobre cientos de millones de filas sin
 * alterar la semántica de los predicados.
 * =================================================================
 */

use centinela_domain_models::ClaimMonth;

/// Configuración completa del catálogo con los valores de producción.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    // --- S2: OUTLIER ESTADÍSTICO ---
    pub outlier_z_threshold: f64,
    pub outlier_limit: usize,

    // --- S3: ESCALADA RÁPIDA (BUST-OUT) ---
    /// Solo proveedores cuyo primer mes de facturación es >= este piso.
    pub escalation_enrollment_floor: ClaimMonth,
    pub escalation_min_first_month_paid: f64,
    /// El pico de los meses 2..=7 debe ser >= este múltiplo del primer mes.
    pub escalation_peak_multiple: f64,
    pub escalation_limit: usize,

    // --- S4: VOLUMEN IMPOSIBLE ---
    pub volume_claims_per_beneficiary_threshold: f64,
    pub volume_min_month_paid: f64,
    pub volume_provider_month_limit: usize,
    pub volume_flagged_months_shown: usize,

    // --- S5: ABUSO HOME HEALTH ---
    pub hh_claims_per_beneficiary_threshold: f64,
    pub hh_min_paid: f64,
    /// Norma de reclamos razonables por beneficiario para el exceso.
    pub hh_reasonable_claims_per_beneficiary: f64,
    pub hh_limit: usize,

    // --- S6: RED DE ENTIDADES FANTASMA ---
    pub network_min_npis: usize,
    pub network_min_paid: f64,
    pub network_official_limit: usize,
    pub network_limit: usize,
    pub network_member_lookup_cap: usize,

    // --- S7: ANOMALÍA GEOGRÁFICA ---
    pub geo_min_provider_paid: f64,
    pub geo_min_state_providers: usize,
    pub geo_z_threshold: f64,
    pub geo_limit: usize,

    // --- S8: ANOMALÍA TEMPORAL ---
    pub temporal_spike_multiple: f64,
    pub temporal_min_trailing_avg: f64,
    pub temporal_min_spike_paid: f64,
    pub temporal_spike_limit: usize,
    pub temporal_spikes_shown: usize,

    // --- S9: CONCENTRACIÓN DE CÓDIGOS ---
    pub concentration_min_paid: f64,
    pub concentration_max_codes: usize,
    pub concentration_ratio: f64,
    pub concentration_limit: usize,

    // --- S10: IMPOSIBILIDAD DE PLANTILLA ---
    pub workforce_working_hours_per_month: f64,
    pub workforce_claims_per_hour_threshold: f64,
    pub workforce_min_month_paid: f64,
    pub workforce_limit: usize,

    // --- S11: COHORTE DE ALTA EXPLOSIVA ---
    pub burst_min_orgs: usize,
    pub burst_min_paid: f64,
    pub burst_limit: usize,

    // --- S12: RAMPA COORDINADA ---
    pub ramp_min_members: usize,
    pub ramp_window_months: i64,
    pub ramp_min_combined_peak_paid: f64,
    pub ramp_limit: usize,

    // --- S13: HUB DE SERVICIO FANTASMA ---
    pub hub_min_billing_npis: usize,
    pub hub_min_paid: f64,
    pub hub_limit: usize,

    // --- S14: DILUCIÓN DE BENEFICIARIOS ---
    pub dilution_min_members: usize,
    pub dilution_claims_per_beneficiary_threshold: f64,
    pub dilution_min_paid: f64,
    pub dilution_limit: usize,

    // --- S15: ABUSO DE SERVICIO REPETITIVO ---
    pub repetitive_min_peers: usize,
    pub repetitive_peer_min_claims: u64,
    pub repetitive_ratio_multiple: f64,
    pub repetitive_ratio_floor: f64,
    pub repetitive_min_code_paid: f64,
    pub repetitive_limit: usize,

    // --- S16: MONOCULTIVO DE FACTURACIÓN ---
    pub monoculture_min_paid: f64,
    pub monoculture_min_claims: u64,
    pub monoculture_ratio: f64,
    pub monoculture_limit: usize,

    // --- S17: RAMPA Y COLAPSO ---
    pub collapse_min_peak_paid: f64,
    pub collapse_ramp_multiple: f64,
    /// Fracción del pico bajo la cual un mes posterior cuenta como colapso.
    pub collapse_drop_fraction: f64,
    pub collapse_window_months: i64,
    pub collapse_limit: usize,

    // --- S18: ANOMALÍA DE TARIFA ---
    pub rate_min_peers: usize,
    pub rate_peer_min_claims: u64,
    pub rate_multiple: f64,
    pub rate_min_code_paid: f64,
    pub rate_limit: usize,

    // --- S19: DISPERSIÓN DE SERVICIO FANTASMA ---
    pub spread_min_billing_npis: usize,
    pub spread_max_shared_beneficiaries: u64,
    pub spread_min_paid: f64,
    pub spread_limit: usize,

    // --- POLÍTICA INTER-SEÑAL ---
    /// Sobrepago combinado a partir del cual 'medium' escala a 'high'.
    pub severity_escalation_floor: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            outlier_z_threshold: 3.0,
            outlier_limit: 200,

            escalation_enrollment_floor: ClaimMonth::new(2023, 1).expect("static month"),
            escalation_min_first_month_paid: 100.0,
            escalation_peak_multiple: 6.0,
            escalation_limit: 150,

            volume_claims_per_beneficiary_threshold: 500.0,
            volume_min_month_paid: 1_000.0,
            volume_provider_month_limit: 300,
            volume_flagged_months_shown: 6,

            hh_claims_per_beneficiary_threshold: 50.0,
            hh_min_paid: 5_000.0,
            hh_reasonable_claims_per_beneficiary: 10.0,
            hh_limit: 200,

            network_min_npis: 5,
            network_min_paid: 10_000.0,
            network_official_limit: 100,
            network_limit: 50,
            network_member_lookup_cap: 20,

            geo_min_provider_paid: 1_000.0,
            geo_min_state_providers: 20,
            geo_z_threshold: 4.0,
            geo_limit: 150,

            temporal_spike_multiple: 5.0,
            temporal_min_trailing_avg: 100.0,
            temporal_min_spike_paid: 10_000.0,
            temporal_spike_limit: 200,
            temporal_spikes_shown: 5,

            concentration_min_paid: 50_000.0,
            concentration_max_codes: 3,
            concentration_ratio: 0.90,
            concentration_limit: 150,

            workforce_working_hours_per_month: 160.0,
            workforce_claims_per_hour_threshold: 6.0,
            workforce_min_month_paid: 10_000.0,
            workforce_limit: 150,

            burst_min_orgs: 4,
            burst_min_paid: 50_000.0,
            burst_limit: 50,

            ramp_min_members: 3,
            ramp_window_months: 3,
            ramp_min_combined_peak_paid: 200_000.0,
            ramp_limit: 50,

            hub_min_billing_npis: 5,
            hub_min_paid: 50_000.0,
            hub_limit: 100,

            dilution_min_members: 3,
            dilution_claims_per_beneficiary_threshold: 40.0,
            dilution_min_paid: 100_000.0,
            dilution_limit: 50,

            repetitive_min_peers: 10,
            repetitive_peer_min_claims: 100,
            repetitive_ratio_multiple: 8.0,
            repetitive_ratio_floor: 30.0,
            repetitive_min_code_paid: 10_000.0,
            repetitive_limit: 150,

            monoculture_min_paid: 25_000.0,
            monoculture_min_claims: 100,
            monoculture_ratio: 0.95,
            monoculture_limit: 150,

            collapse_min_peak_paid: 50_000.0,
            collapse_ramp_multiple: 5.0,
            collapse_drop_fraction: 0.20,
            collapse_window_months: 3,
            collapse_limit: 100,

            rate_min_peers: 10,
            rate_peer_min_claims: 50,
            rate_multiple: 5.0,
            rate_min_code_paid: 25_000.0,
            rate_limit: 150,

            spread_min_billing_npis: 6,
            spread_max_shared_beneficiaries: 3,
            spread_min_paid: 50_000.0,
            spread_limit: 100,

            severity_escalation_floor: 500_000.0,
        }
    }
}
