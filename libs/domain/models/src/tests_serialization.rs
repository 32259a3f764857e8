// [libs/domain/models/src/tests_serialization.rs]
/**
 * =================================================================
 * APARATO: DOMAIN SERIALIZATION TEST (V3.2 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE PARIDAD JSON DEL CONTRATO DE SEÑALES
 *
 * # Mathematical Proof (Deterministic Wire Format):
 * serde_json sin 'preserve_order' respalda los objetos con BTreeMap,
 * de modo que las claves de la evidencia se serializan en orden
 * lexicográfico estable. Dos corridas sobre el mismo snapshot producen
 * exactamente los mismos bytes de reporte.
 * =================================================================
 */
