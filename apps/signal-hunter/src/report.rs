// [apps/signal-hunter/src/report.rs]
/*!
 * =================================================================
 * APARATO: FRAUD REPORT BUILDER (V3.4 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: ENSAMBLADO Y ESCRITURA DEL REPORTE DE EVIDENCIA
 *
 * # Invariantes de ensamblado:
 * - 'flagged_providers' ordenado por sobrepago combinado DESC, NPI ASC.
 * - El sobrepago combinado de cada proveedor es la suma de sus señales.
 * - El total del reporte es la suma de los combinados.
 * - 'signal_counts' incluye con cero a todo detector que corrió, para
 *   distinguir "nada hallado" de "omitido".
 * =================================================================
 */

use centinela_domain_models::{
    round_cents, FlaggedProvider, FraudReport, ProviderIdentity, SignalKind,
};
use centinela_domain_signals::annotate::{build_fca_relevance, dominant_signal};
use centinela_domain_signals::{CatalogRun, DetectionConfig, MergedProvider};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Versión del motor, estampada en cada reporte.
pub const TOOL_VERSION: &str = "3.0.0";

/// Insumos del constructor del reporte, ya resueltos por el pipeline.
pub struct ReportInputs<'run> {
    pub merged: BTreeMap<String, MergedProvider>,
    pub identities: BTreeMap<String, ProviderIdentity>,
    pub catalog_run: &'run CatalogRun,
    pub total_providers_scanned: u64,
    pub data_sources_used: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Párrafo de metodología parametrizado por las señales que corrieron.
fn methodology_summary(executed: &[SignalKind], config: &DetectionConfig) -> String {
    let signal_clauses: Vec<String> = executed
        .iter()
        .map(|kind| format!("({}) {}", kind.catalog_id(), kind.as_str()))
        .collect();
    format!(
        "This tool cross-references CMS Medicaid provider spending data with the OIG LEIE \
         exclusion list and the NPPES NPI registry to detect fraud signals: {signals}. \
         Headline thresholds: statistical outliers above {outlier_z:.1} sigma; bust-out ramps of \
         {ramp:.0}x the first billing month; impossible volumes above {volume:.0} \
         claims/beneficiary/month; home-health ratios above {hh:.0}:1; shell networks of \
         {network}+ NPIs under one authorized official; geographic anomalies above {geo:.1} \
         sigma versus state peers; temporal spikes above {spike:.0}x the 3-month trailing \
         average; procedure concentration above {concentration:.0}% of paid. All statistics are \
         computed over the full eligible population with a memory-bounded columnar store. \
         Overpayment estimates are conservative, signal-specific triage figures, not legal \
         findings. Each flagged provider carries False Claims Act relevance with statute \
         references and provider-specific investigation steps.",
        signals = signal_clauses.join("; "),
        outlier_z = config.outlier_z_threshold,
        ramp = config.escalation_peak_multiple,
        volume = config.volume_claims_per_beneficiary_threshold,
        hh = config.hh_claims_per_beneficiary_threshold,
        network = config.network_min_npis,
        geo = config.geo_z_threshold,
        spike = config.temporal_spike_multiple,
        concentration = config.concentration_ratio * 100.0,
    )
}

/// Ensambla el documento raíz del reporte.
pub fn build_report(config: &DetectionConfig, inputs: ReportInputs<'_>) -> FraudReport {
    let ReportInputs {
        merged,
        identities,
        catalog_run,
        total_providers_scanned,
        data_sources_used,
        generated_at,
    } = inputs;

    let mut flagged_providers: Vec<FlaggedProvider> = Vec::with_capacity(merged.len());
    let mut total_overpayment = 0.0_f64;
    let mut signal_counts: BTreeMap<String, u64> = catalog_run
        .executed
        .iter()
        .map(|kind| (kind.as_str().to_string(), 0))
        .collect();

    for (npi, provider) in merged {
        let combined_overpayment = round_cents(provider.combined_overpayment());
        total_overpayment += combined_overpayment;

        for signal in &provider.signals {
            if let Some(count) = signal_counts.get_mut(signal.signal_type.as_str()) {
                *count += 1;
            }
        }

        let identity = identities
            .get(&npi)
            .cloned()
            .unwrap_or_else(|| ProviderIdentity::placeholder(&npi));

        let fca_relevance = dominant_signal(&provider.signals)
            .map(|dominant| {
                build_fca_relevance(
                    dominant.signal_type,
                    &provider.provider_name,
                    &npi,
                    &provider.state,
                    combined_overpayment,
                )
            })
            .unwrap_or_else(|| {
                build_fca_relevance(
                    SignalKind::StatisticalBillingOutlier,
                    &provider.provider_name,
                    &npi,
                    &provider.state,
                    combined_overpayment,
                )
            });

        flagged_providers.push(FlaggedProvider {
            npi: npi.clone(),
            provider_name: provider.provider_name,
            entity_type: provider.entity_type,
            taxonomy_code: identity.taxonomy_code,
            state: provider.state,
            enumeration_date: identity.enumeration_date,
            total_paid_all_time: round_cents(provider.total_paid),
            total_claims_all_time: provider.total_claims,
            total_unique_beneficiaries_all_time: provider.total_beneficiaries,
            signals: provider.signals,
            combined_estimated_overpayment_usd: combined_overpayment,
            fca_relevance,
        });
    }

    // Orden final del reporte: sobrepago combinado DESC, NPI ASC.
    flagged_providers.sort_by(|left, right| {
        right
            .combined_estimated_overpayment_usd
            .total_cmp(&left.combined_estimated_overpayment_usd)
            .then_with(|| left.npi.cmp(&right.npi))
    });

    let detectors_skipped: Vec<String> = catalog_run
        .skipped
        .iter()
        .map(|skipped| format!("{}: {}", skipped.kind.as_str(), skipped.reason))
        .collect();

    FraudReport {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        tool_version: TOOL_VERSION.to_string(),
        data_sources_used,
        methodology_summary: methodology_summary(&catalog_run.executed, config),
        total_providers_scanned,
        total_providers_flagged: flagged_providers.len() as u64,
        total_estimated_overpayment_usd: round_cents(total_overpayment),
        signal_counts,
        detectors_skipped,
        flagged_providers,
    }
}

/// Escribe el reporte en disco. Un fallo aquí es fatal para la corrida.
pub fn write_report(report: &FraudReport, output_path: &Path) -> anyhow::Result<()> {
    let serialized = serde_json::to_string_pretty(report)?;
    std::fs::write(output_path, serialized)?;
    info!("📄 [REPORT]: evidence written to {}", output_path.display());
    Ok(())
}
