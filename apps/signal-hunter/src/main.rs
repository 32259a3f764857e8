// [apps/signal-hunter/src/main.rs]
/**
 * =================================================================
 * APARATO: SIGNAL HUNTER SHELL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ARGUMENTOS Y DISPARO DEL PIPELINE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LIBRARY SYNERGY: El binario consume la lógica desde
 *    'centinela_hunter_lib', garantizando que sea un orquestador puro
 *    y ligero auditable en Proving Grounds.
 * 2. TRACING INITIALIZATION: Heimdall se enciende antes de cualquier
 *    fase para capturar la ingesta columnar completa.
 * 3. EXIT DISCIPLINE: Solo la preparación y la escritura del reporte
 *    retornan código distinto de cero; los fallos de detector se
 *    registran y la corrida continúa.
 * =================================================================
 */

use anyhow::Result;
use centinela_hunter_lib::pipeline::{execute_run, RunOptions};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Configuración de argumentos para la cacería de señales de fraude.
#[derive(Parser, Debug)]
#[command(
    author = "Raz Podesta <metaShark Tech>",
    version,
    about = "El Centinela: detección batch de señales de fraude sobre gasto Medicaid, exclusiones OIG y registro NPPES."
)]
struct CommandArguments {
    /// Directorio con los datasets de entrada (gasto, LEIE, NPPES, censo).
    #[arg(long, default_value = "data", value_name = "DIR")]
    data_dir: PathBuf,

    /// Techo de memoria del almacén columnar (p. ej. 2GB, 512MB).
    #[arg(long, default_value = "2GB")]
    memory_limit: String,

    /// Ruta del reporte JSON de evidencia.
    #[arg(long, default_value = "fraud_signals.json", value_name = "FILE")]
    output: PathBuf,

    /// 'all' o lista separada por comas de IDs de señal (1..=19).
    #[arg(long, default_value = "all")]
    signals: String,

    /// Hilos del pool de cómputo (0 = automático).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Habilita el respaldo HTTP contra el registro nacional durante el
    /// enriquecimiento (cacheado, con timeout; nunca en la ruta crítica).
    #[arg(long)]
    registry_api_fallback: bool,

    /// Aceptado por compatibilidad: el motor nunca usa GPU.
    #[arg(long)]
    no_gpu: bool,
}

fn main() -> Result<()> {
    // 1. INICIALIZACIÓN DEL SISTEMA NERVIOSO (LOGGING)
    centinela_shared_heimdall::init_tracing("centinela");

    // 2. PARSEO DE DIRECTIVAS DE MANDO
    let cli_configuration = CommandArguments::parse();
    if cli_configuration.no_gpu {
        info!("🖥️ [GPU]: --no-gpu accepted (the engine is CPU-only).");
    }

    // 3. EJECUCIÓN DE LA MISIÓN BATCH
    // Este paso bloquea hasta que el reporte quede cristalizado en disco.
    execute_run(&RunOptions {
        data_directory: cli_configuration.data_dir,
        memory_limit: cli_configuration.memory_limit,
        output_path: cli_configuration.output,
        signal_selection: cli_configuration.signals,
        thread_count: cli_configuration.threads,
        registry_api_fallback: cli_configuration.registry_api_fallback,
    })
}
