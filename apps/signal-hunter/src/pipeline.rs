// [apps/signal-hunter/src/pipeline.rs]
/*!
 * =================================================================
 * APARATO: DETECTION RUN PIPELINE (V3.5 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: ORQUESTACIÓN DE LA CORRIDA BATCH COMPLETA
 *
 * # Secuencia de misión:
 * 1. Techo de memoria y pool de hilos (una sola vez, al arranque).
 * 2. Ingesta de las tres tablas + censo opcional (fatal si falta lo
 *    requerido).
 * 3. Materialización de agregados (una vez por corrida).
 * 4. Catálogo secuencial con cancelación Ctrl-C en fronteras.
 * 5. Fusión -> escalación de severidad -> enriquecimiento -> reporte.
 * Los fallos de detector son locales; solo la preparación y la
 * escritura del reporte terminan la corrida con código distinto de cero.
 * =================================================================
 */

use anyhow::Context;
use centinela_domain_models::{format_usd, group_thousands, SignalKind, SIGNAL_CATALOG_ORDER};
use centinela_domain_signals::{
    enrich::enrich_providers,
    merge::{apply_severity_escalation, merge_candidates},
    run_catalog, AnalysisContext, CancellationFlag, DetectionConfig,
};
use centinela_infra_registry::RegistryApiClient;
use centinela_infra_store::{load_all, parse_memory_limit, Aggregates, IngestOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::report::{build_report, write_report, ReportInputs};

/// Configuración de corrida derivada de la línea de mando.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_directory: PathBuf,
    pub memory_limit: String,
    pub output_path: PathBuf,
    /// `"all"` o lista separada por comas de IDs 1..=19.
    pub signal_selection: String,
    /// 0 = automático (núcleos disponibles, acotado).
    pub thread_count: usize,
    pub registry_api_fallback: bool,
}

/// Interpreta la directiva '--signals'.
pub fn parse_signal_selection(raw: &str) -> anyhow::Result<BTreeSet<SignalKind>> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(SIGNAL_CATALOG_ORDER.into_iter().collect());
    }
    let mut selection = BTreeSet::new();
    for token in trimmed.split(',') {
        let identifier: u8 = token
            .trim()
            .parse()
            .with_context(|| format!("unparseable signal id '{}'", token.trim()))?;
        let kind = SignalKind::from_catalog_id(identifier)
            .with_context(|| format!("signal id {identifier} outside catalog 1..=19"))?;
        selection.insert(kind);
    }
    if selection.is_empty() {
        anyhow::bail!("empty signal selection");
    }
    Ok(selection)
}

/// Ejecuta la corrida completa y escribe el reporte.
pub fn execute_run(options: &RunOptions) -> anyhow::Result<()> {
    let run_timer = Instant::now();
    info!("{}", "=".repeat(70));
    info!("🛡️ [CENTINELA]: Medicaid fraud signal detection engine v{}", crate::report::TOOL_VERSION);
    info!("{}", "=".repeat(70));

    // --- FASE 1: RECURSOS ---
    let memory_limit_bytes = parse_memory_limit(&options.memory_limit)
        .with_context(|| format!("invalid --memory-limit '{}'", options.memory_limit))?;
    let enabled_signals = parse_signal_selection(&options.signal_selection)?;

    let thread_count = if options.thread_count == 0 {
        num_cpus::get().min(8)
    } else {
        options.thread_count
    };
    if let Err(pool_error) = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build_global()
    {
        // El pool global solo se puede fijar una vez por proceso.
        warn!("⚙️ [POOL]: global thread pool already initialized -> {}", pool_error);
    }
    info!(
        "⚙️ [RESOURCES]: memory ceiling {} bytes | {} threads | {} signals enabled",
        group_thousands(memory_limit_bytes),
        thread_count,
        enabled_signals.len()
    );

    // --- FASE 2: CANCELACIÓN EN FRONTERAS DE DETECTOR ---
    let cancellation = CancellationFlag::new();
    {
        let cancellation_handle = cancellation.clone();
        if let Err(handler_error) = ctrlc::set_handler(move || {
            cancellation_handle.cancel();
        }) {
            warn!("🛑 [CANCEL]: Ctrl-C handler unavailable -> {}", handler_error);
        }
    }

    // --- FASE 3: INGESTA Y AGREGADOS ---
    let store = load_all(
        &options.data_directory,
        &IngestOptions {
            memory_limit_bytes,
        },
    )?;
    let aggregates = Aggregates::materialize(&store);
    let total_providers_scanned = aggregates.distinct_billing_providers();
    info!(
        "🔎 [SCAN]: {} distinct billing providers in snapshot.",
        group_thousands(total_providers_scanned)
    );

    // --- FASE 4: CATÁLOGO DE DETECTORES ---
    let detection_config = DetectionConfig::default();
    let context = AnalysisContext {
        store: &store,
        aggregates: &aggregates,
    };
    let progress_bar = ProgressBar::new(enabled_signals.len() as u64);
    progress_bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let catalog_run = run_catalog(
        &context,
        &detection_config,
        &enabled_signals,
        &cancellation,
        |kind| {
            progress_bar.set_message(kind.as_str().to_string());
            progress_bar.inc(1);
        },
    );
    progress_bar.finish_and_clear();

    // --- FASE 5: FUSIÓN, ESCALACIÓN Y ENRIQUECIMIENTO ---
    let mut merged = merge_candidates(catalog_run.candidates.clone());
    info!("🧩 [MERGE]: {} unique flagged providers.", merged.len());
    apply_severity_escalation(&mut merged, detection_config.severity_escalation_floor);

    let mut api_client = if options.registry_api_fallback {
        match RegistryApiClient::new() {
            Ok(client) => Some(client),
            Err(client_error) => {
                warn!("📡 [REGISTRY_API]: fallback disabled -> {}", client_error);
                None
            }
        }
    } else {
        None
    };
    let identities = enrich_providers(&mut merged, store.registry.as_ref(), api_client.as_mut());

    // --- FASE 6: REPORTE ---
    let report = build_report(
        &detection_config,
        ReportInputs {
            merged,
            identities,
            catalog_run: &catalog_run,
            total_providers_scanned,
            data_sources_used: store.data_sources.clone(),
            generated_at: chrono::Utc::now(),
        },
    );
    write_report(&report, &options.output_path)
        .with_context(|| format!("cannot write report to {}", options.output_path.display()))?;

    // --- FASE 7: RESUMEN DE MISIÓN ---
    let elapsed = run_timer.elapsed().as_secs_f64();
    info!("{}", "=".repeat(70));
    info!("🏁 [COMPLETE]: detection finished in {:.1}s ({:.1} min).", elapsed, elapsed / 60.0);
    info!("   Providers scanned:      {}", group_thousands(report.total_providers_scanned));
    info!("   Providers flagged:      {}", group_thousands(report.total_providers_flagged));
    info!(
        "   Estimated overpayment:  {}",
        format_usd(report.total_estimated_overpayment_usd)
    );
    info!("   Output file:            {}", options.output_path.display());
    for (signal_name, count) in &report.signal_counts {
        info!("   {:<35} {}", signal_name, count);
    }
    if !report.detectors_skipped.is_empty() {
        info!("   Skipped: {}", report.detectors_skipped.join(" | "));
    }
    info!("{}", "=".repeat(70));

    Ok(())
}
