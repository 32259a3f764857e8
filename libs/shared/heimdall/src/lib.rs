// [libs/shared/heimdall/src/lib.rs]
/*!
 * =================================================================
 * APARATO: HEIMDALL NEURAL OBSERVER (V3.1 - FORENSIC EDITION)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: GESTIÓN DE TELEMETRÍA, TRAZADO Y CAPTURA DE PÁNICOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. BATCH AWARENESS: El sumidero JSON se activa en release para que el
 *    rastro de los barridos forenses nocturnos sea ingerible sin TTY.
 * 2. PHOENIX SHIELD: Hook de pánico con detección de estrato y volcado
 *    forense del payload antes de la defunción del proceso.
 * 3. SIGNAL HYGIENE: Silencia el ruido de infraestructura HTTP
 *    (hyper/reqwest) para priorizar la traza de los detectores.
 * 4. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 * =================================================================
 */

use std::panic;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Inicializa el sistema de trazas Heimdall con blindaje de pánicos.
///
/// # Comportamiento:
/// - Desarrollo: Logs compactos de alta legibilidad para el Analista.
/// - Producción: Estructura JSON plana para la ingesta de los barridos batch.
///
/// # Panics:
/// Aborta si otro suscriptor global ya ha sido inicializado en el runtime.
pub fn init_tracing(service_nominal_identifier: &str) {
    // 1. CONFIGURACIÓN DEL FILTRO DINÁMICO (Sovereign Filter)
    // Priorizamos los logs del dominio forense y silenciamos la infraestructura HTTP.
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},hyper=warn,reqwest=warn",
            service_nominal_identifier,
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    let is_production_strata = !cfg!(debug_assertions);

    // 2. CONSTRUCCIÓN DE LA ARQUITECTURA DE SUSCRIPCIÓN (Dual Mode)
    if is_production_strata {
        // MODO BATCH: Emisión de tramas JSON planas para el archivo de evidencia.
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    } else {
        // MODO DESARROLLO: Visualización de alta legibilidad para el Analista.
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    }

    // 3. PROTOCOLO PHOENIX SHIELD (Global Panic Hook)
    // Garantiza que cualquier colapso durante un detector o la ingesta columnar
    // quede registrado en la evidencia antes de la defunción del proceso.
    let service_id_snapshot = service_nominal_identifier.to_string();

    panic::set_hook(Box::new(move |panic_metadata| {
        let panic_location = panic_metadata
            .location()
            .map(|location| format!("{}:{}:{}", location.file(), location.line(), location.column()))
            .unwrap_or_else(|| "UNKNOWN_STRATA_COORDINATES".to_string());

        let panic_payload_message = panic_metadata
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_metadata.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("UNDEFINED_KERNEL_COLLAPSE_PAYLOAD");

        error!(
            target: "panic_monitor",
            service = %service_id_snapshot,
            estrato = %panic_location,
            "🔥 [CRITICAL_PANIC]: Thread terminated abruptly. Analysis: {}",
            panic_payload_message
        );
    }));

    info!(
        "👁️  [HEIMDALL_ONLINE]: Observability strata levelized for [{}]. Phoenix Shield ACTIVE.",
        service_nominal_identifier
    );
}
