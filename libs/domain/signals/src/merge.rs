// [libs/domain/signals/src/merge.rs]
/*!
 * =================================================================
 * APARATO: MERGE & SEVERITY RESOLVER (V3.4 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: FUSIÓN POR NPI Y ESCALACIÓN INTER-SEÑAL
 *
 * # Reglas del resolutor:
 * 1. Primera aparición de un NPI: copia los campos tal cual.
 * 2. Apariciones siguientes: anexa señales; escalares por máximo;
 *    identidad conocida preferida sobre rellenos.
 * 3. Escalación post-fusión: con >= 2 señales, o con sobrepago
 *    combinado > piso configurado, 'medium' sube a 'high'.
 *    'critical' jamás se degrada.
 * 4. Sobrepago combinado = suma simple de las señales (multi-lente
 *    intencional, sin deduplicación).
 * =================================================================
 */

use centinela_domain_models::{
    is_placeholder_name, EntityType, Severity, SignalCandidate, SignalRecord,
};
use std::collections::BTreeMap;

/// Proveedor fusionado con su lista combinada de señales.
#[derive(Debug, Clone)]
pub struct MergedProvider {
    pub npi: String,
    pub provider_name: String,
    pub entity_type: EntityType,
    pub state: String,
    pub total_paid: f64,
    pub total_claims: u64,
    pub total_beneficiaries: u64,
    pub signals: Vec<SignalRecord>,
}

impl MergedProvider {
    /// Suma de los sobrepagos estimados de todas las señales.
    pub fn combined_overpayment(&self) -> f64 {
        self.signals
            .iter()
            .map(|signal| signal.estimated_overpayment_usd)
            .sum()
    }
}

/// Fusiona las listas de candidatos en un mapa NPI → proveedor.
pub fn merge_candidates(
    candidates: impl IntoIterator<Item = SignalCandidate>,
) -> BTreeMap<String, MergedProvider> {
    let mut merged: BTreeMap<String, MergedProvider> = BTreeMap::new();

    for candidate in candidates {
        match merged.get_mut(&candidate.npi) {
            None => {
                merged.insert(
                    candidate.npi.clone(),
                    MergedProvider {
                        npi: candidate.npi,
                        provider_name: candidate.provider_name,
                        entity_type: candidate.entity_type,
                        state: candidate.state,
                        total_paid: candidate.total_paid,
                        total_claims: candidate.total_claims,
                        total_beneficiaries: candidate.total_beneficiaries,
                        signals: vec![candidate.signal],
                    },
                );
            }
            Some(existing) => {
                existing.signals.push(candidate.signal);
                existing.total_paid = existing.total_paid.max(candidate.total_paid);
                existing.total_claims = existing.total_claims.max(candidate.total_claims);
                existing.total_beneficiaries =
                    existing.total_beneficiaries.max(candidate.total_beneficiaries);
                // Identidad conocida preferida sobre rellenos.
                if !is_placeholder_name(&candidate.provider_name)
                    && is_placeholder_name(&existing.provider_name)
                {
                    existing.provider_name = candidate.provider_name;
                }
                if existing.state.is_empty() && !candidate.state.is_empty() {
                    existing.state = candidate.state;
                }
                if !existing.entity_type.is_known() && candidate.entity_type.is_known() {
                    existing.entity_type = candidate.entity_type;
                }
            }
        }
    }

    merged
}

/// Pasada de escalación de severidad posterior a la fusión.
pub fn apply_severity_escalation(
    merged: &mut BTreeMap<String, MergedProvider>,
    escalation_floor: f64,
) {
    for provider in merged.values_mut() {
        let combined = provider.combined_overpayment();
        let multi_signal = provider.signals.len() >= 2;
        for signal in &mut provider.signals {
            if signal.severity == Severity::Medium
                && (multi_signal || combined > escalation_floor)
            {
                signal.severity = Severity::High;
            }
        }
    }
}
