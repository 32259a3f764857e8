// [libs/infra/columnar-store/src/memory.rs]
// =================================================================
// APARATO: MEMORY CEILING POLICY (V3.0)
// RESPONSABILIDAD: INTERPRETACIÓN DEL TECHO DE MEMORIA Y RÁFAGAS
// ESTADO: NO-REGRESSIONS / AUDIT-READY
// =================================================================

use crate::errors::StoreError;

/// Techo de memoria por defecto (2 GiB), alineado con hosts restringidos.
pub const DEFAULT_MEMORY_LIMIT_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Interpreta directivas estilo `"2GB"`, `"512MB"`, `"1.5GiB"` o bytes crudos.
pub fn parse_memory_limit(raw: &str) -> Result<u64, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::MemoryLimit(raw.to_string()));
    }

    let upper = trimmed.to_ascii_uppercase();
    let (digits, multiplier): (&str, u64) = if let Some(prefix) = upper.strip_suffix("GIB").or(upper.strip_suffix("GB")) {
        (prefix, 1024 * 1024 * 1024)
    } else if let Some(prefix) = upper.strip_suffix("MIB").or(upper.strip_suffix("MB")) {
        (prefix, 1024 * 1024)
    } else if let Some(prefix) = upper.strip_suffix("KIB").or(upper.strip_suffix("KB")) {
        (prefix, 1024)
    } else if let Some(prefix) = upper.strip_suffix('B') {
        (prefix, 1)
    } else {
        (upper.as_str(), 1)
    };

    let quantity: f64 = digits
        .trim()
        .parse()
        .map_err(|_| StoreError::MemoryLimit(raw.to_string()))?;
    if !(quantity > 0.0) {
        return Err(StoreError::MemoryLimit(raw.to_string()));
    }
    Ok((quantity * multiplier as f64) as u64)
}

/// Capacidad de la ráfaga de ingesta, escalonada por el techo configurado.
/// El mismo tamaño de ráfaga gobierna la decodificación paralela.
pub fn ingestion_chunk_capacity(memory_limit_bytes: u64) -> usize {
    const MIB: u64 = 1024 * 1024;
    if memory_limit_bytes >= 2048 * MIB {
        100_000
    } else if memory_limit_bytes >= 512 * MIB {
        50_000
    } else {
        10_000
    }
}
