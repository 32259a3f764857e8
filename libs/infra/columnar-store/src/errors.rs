// [libs/infra/columnar-store/src/errors.rs]
/*!
 * =================================================================
 * APARATO: STORE ERROR CATALOG (V3.1 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE INGESTA
 *
 * # Taxonomía (política de propagación):
 * - Entradas requeridas ausentes y fallos de escritura son FATALES.
 * - Entradas opcionales ausentes degradan a 'None' aguas arriba y
 *   jamás transitan por este catálogo.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Dataset requerido (gasto o exclusiones) ausente del directorio de datos.
    #[error("[L3_STORE_INPUT_FAULT]: REQUIRED_DATASET_MISSING -> {0}")]
    MissingInput(String),

    /// Fallo físico de lectura sobre el sistema de archivos.
    #[error("[L3_STORE_IO_FAULT]: DATASET_READ_SEVERED -> {0}")]
    Io(#[from] std::io::Error),

    /// Fila o cabecera CSV malformada más allá de la tolerancia de ingesta.
    #[error("[L3_STORE_CSV_FAULT]: CSV_DECODE_REJECTED -> {0}")]
    Csv(#[from] csv::Error),

    /// Fallo del decodificador Parquet.
    #[error("[L3_STORE_PARQUET_FAULT]: PARQUET_DECODE_REJECTED -> {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Fallo del kernel de cast columnar Arrow.
    #[error("[L3_STORE_ARROW_FAULT]: COLUMNAR_CAST_REJECTED -> {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Columna requerida ausente o de tipo inconvertible.
    #[error("[L3_STORE_SCHEMA_FAULT]: COLUMN_CONTRACT_VIOLATION -> {0}")]
    Schema(String),

    /// Directiva '--memory-limit' imposible de interpretar.
    #[error("[L3_STORE_CONFIG_FAULT]: MEMORY_CEILING_UNPARSEABLE -> {0}")]
    MemoryLimit(String),
}
