// [libs/core/stats-engine/src/lib.rs]

#![deny(missing_docs)]

//! # APARATO: DESCRIPTIVE STATISTICS STRATUM ROOT (V3.1 - ZENITH)
//! CLASIFICACIÓN: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: ORQUESTACIÓN Y EXPOSICIÓN DEL MOTOR ESTADÍSTICO
//!
//! ## Visión Holística 2026
//! Autoridad única de la aritmética poblacional del motor forense. Los
//! detectores de anomalía (outliers 3-sigma, pares geográficos 4-sigma,
//! medianas de peers por código) consumen exclusivamente este estrato,
//! garantizando que una misma población produzca siempre los mismos
//! umbrales sin importar qué señal la evalúe.
//!
//! ## Características de Élite
//! 1. **Población completa:** Media y sigma poblacional sin muestreo.
//! 2. **Percentiles interpolados:** Semántica PERCENTILE_CONT continua.
//! 3. **Blindaje de denominadores:** Las divisiones degeneradas retornan
//!    centinelas que fallan limpiamente cualquier umbral superior.

/// Resúmenes poblacionales (media, sigma, mediana, IQR, z-scores).
pub mod descriptive;

/// Ratios blindados contra denominadores nulos y centinelas de umbral.
pub mod guards;

pub use crate::descriptive::{median_of, PopulationSummary};
pub use crate::guards::{guarded_ratio, percent_increase, PERCENT_SENTINEL, RATIO_SENTINEL};
