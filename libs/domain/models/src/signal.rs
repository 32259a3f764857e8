// [libs/domain/models/src/signal.rs]
/*!
 * =================================================================
 * APARATO: SIGNAL DOMAIN MODEL (V3.4 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO DE CANDIDATOS EMITIDOS POR LOS DETECTORES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CATALOG AUTHORITY: Los 19 tipos de señal viven aquí como variantes
 *    nominales con su identificador de CLI, su cita estatutaria y su
 *    etiqueta de tipo de reclamo.
 * 2. SEVERITY LATTICE: El orden derivado (Critical < High < Medium)
 *    coincide con el rango de escalación; 'critical' nunca se degrada.
 * 3. WIRE PARITY: Los nombres serde reproducen el esquema JSON del
 *    reporte de evidencia bit a bit.
 * =================================================================
 */

use crate::provider::EntityType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severidad a priori de un detector. El resolutor de fusión puede
/// escalar 'medium' a 'high'; 'critical' es terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    /// Rango numérico para ordenamiento (0 = más severo).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
        }
    }
}

/// Catálogo nominal de las 19 señales de fraude del motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    ExcludedProviderBilling,
    StatisticalBillingOutlier,
    BustOutScheme,
    ImpossibleServiceVolume,
    HomeHealthAbuse,
    ShellEntityNetwork,
    GeographicAnomaly,
    TemporalBillingAnomaly,
    ProcedureCodeConcentration,
    WorkforceImpossibility,
    BurstEnrollmentNetwork,
    CoordinatedBillingRamp,
    PhantomServicingHub,
    BeneficiaryDilution,
    RepetitiveServiceAbuse,
    BillingMonoculture,
    RampAndCollapse,
    ReimbursementRateAnomaly,
    PhantomServicingSpread,
}

/// Orden canónico del catálogo. El índice + 1 es el identificador CLI.
pub const SIGNAL_CATALOG_ORDER: [SignalKind; 19] = [
    SignalKind::ExcludedProviderBilling,
    SignalKind::StatisticalBillingOutlier,
    SignalKind::BustOutScheme,
    SignalKind::ImpossibleServiceVolume,
    SignalKind::HomeHealthAbuse,
    SignalKind::ShellEntityNetwork,
    SignalKind::GeographicAnomaly,
    SignalKind::TemporalBillingAnomaly,
    SignalKind::ProcedureCodeConcentration,
    SignalKind::WorkforceImpossibility,
    SignalKind::BurstEnrollmentNetwork,
    SignalKind::CoordinatedBillingRamp,
    SignalKind::PhantomServicingHub,
    SignalKind::BeneficiaryDilution,
    SignalKind::RepetitiveServiceAbuse,
    SignalKind::BillingMonoculture,
    SignalKind::RampAndCollapse,
    SignalKind::ReimbursementRateAnomaly,
    SignalKind::PhantomServicingSpread,
];

impl SignalKind {
    /// Identificador entero expuesto por '--signals' (1..=19).
    pub fn catalog_id(self) -> u8 {
        SIGNAL_CATALOG_ORDER
            .iter()
            .position(|kind| *kind == self)
            .map(|index| index as u8 + 1)
            .unwrap_or(0)
    }

    pub fn from_catalog_id(identifier: u8) -> Option<Self> {
        if identifier == 0 {
            return None;
        }
        SIGNAL_CATALOG_ORDER.get(usize::from(identifier) - 1).copied()
    }

    /// Nombre de alambre (coincide con la forma serde snake_case).
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::ExcludedProviderBilling => "excluded_provider_billing",
            SignalKind::StatisticalBillingOutlier => "statistical_billing_outlier",
            SignalKind::BustOutScheme => "bust_out_scheme",
            SignalKind::ImpossibleServiceVolume => "impossible_service_volume",
            SignalKind::HomeHealthAbuse => "home_health_abuse",
            SignalKind::ShellEntityNetwork => "shell_entity_network",
            SignalKind::GeographicAnomaly => "geographic_anomaly",
            SignalKind::TemporalBillingAnomaly => "temporal_billing_anomaly",
            SignalKind::ProcedureCodeConcentration => "procedure_code_concentration",
            SignalKind::WorkforceImpossibility => "workforce_impossibility",
            SignalKind::BurstEnrollmentNetwork => "burst_enrollment_network",
            SignalKind::CoordinatedBillingRamp => "coordinated_billing_ramp",
            SignalKind::PhantomServicingHub => "phantom_servicing_hub",
            SignalKind::BeneficiaryDilution => "beneficiary_dilution",
            SignalKind::RepetitiveServiceAbuse => "repetitive_service_abuse",
            SignalKind::BillingMonoculture => "billing_monoculture",
            SignalKind::RampAndCollapse => "ramp_and_collapse",
            SignalKind::ReimbursementRateAnomaly => "reimbursement_rate_anomaly",
            SignalKind::PhantomServicingSpread => "phantom_servicing_spread",
        }
    }

    /// Cita del Código de los Estados Unidos asociada a la señal.
    pub fn statute_reference(self) -> &'static str {
        match self {
            SignalKind::WorkforceImpossibility => "31 U.S.C. § 3729(a)(1)(B)",
            SignalKind::ShellEntityNetwork
            | SignalKind::BurstEnrollmentNetwork
            | SignalKind::CoordinatedBillingRamp => "31 U.S.C. § 3729(a)(1)(C)",
            SignalKind::BeneficiaryDilution => "31 U.S.C. § 3729(a)(1)(G)",
            _ => "31 U.S.C. § 3729(a)(1)(A)",
        }
    }

    /// Etiqueta corta del tipo de reclamo falso para el anotador FCA.
    pub fn claim_type_label(self) -> &'static str {
        match self {
            SignalKind::ExcludedProviderBilling => {
                "Presenting false claims — excluded provider cannot legally bill federal healthcare programs"
            }
            SignalKind::StatisticalBillingOutlier => {
                "Potential overbilling — provider billing significantly exceeds peer group norms"
            }
            SignalKind::BustOutScheme => {
                "Potential bust-out scheme — newly enumerated provider with rapid billing escalation"
            }
            SignalKind::ImpossibleServiceVolume => {
                "Phantom billing — claim volume exceeds what any provider could physically deliver"
            }
            SignalKind::HomeHealthAbuse => {
                "Medically unnecessary services — home health claims far beyond per-beneficiary norms"
            }
            SignalKind::ShellEntityNetwork => {
                "Conspiracy — coordinated billing through multiple entities controlled by same individual"
            }
            SignalKind::GeographicAnomaly => {
                "Potential overbilling — billing intensity far above geographic peer providers"
            }
            SignalKind::TemporalBillingAnomaly => {
                "Potential overbilling — abrupt billing spikes inconsistent with the provider's own baseline"
            }
            SignalKind::ProcedureCodeConcentration => {
                "Potential upcoding — billing concentrated on a narrow set of procedure codes"
            }
            SignalKind::WorkforceImpossibility => {
                "False records — billing volume implies physically impossible claim fabrication"
            }
            SignalKind::BurstEnrollmentNetwork => {
                "Conspiracy — cluster of entities enrolled together to distribute fraudulent billing"
            }
            SignalKind::CoordinatedBillingRamp => {
                "Conspiracy — entities under common control ramping billing in the same window"
            }
            SignalKind::PhantomServicingHub => {
                "Phantom billing — one servicing provider fanned out across many billing entities"
            }
            SignalKind::BeneficiaryDilution => {
                "Reverse false claims — repeated billing on a tiny beneficiary pool across a network"
            }
            SignalKind::RepetitiveServiceAbuse => {
                "Medically unnecessary services — per-code repetition far beyond the peer median"
            }
            SignalKind::BillingMonoculture => {
                "Potential upcoding — a single procedure code dominates the entire billing profile"
            }
            SignalKind::RampAndCollapse => {
                "Potential bust-out scheme — billing peak followed by immediate collapse"
            }
            SignalKind::ReimbursementRateAnomaly => {
                "Potential overbilling — per-claim reimbursement far above the peer median for the code"
            }
            SignalKind::PhantomServicingSpread => {
                "Phantom billing — servicing provider spread across entities sharing almost no patients"
            }
        }
    }
}

/// Evidencia cristalizada de una señal sobre un proveedor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal_type: SignalKind,
    pub severity: Severity,
    /// Narrativa legible por el investigador, con montos ya formateados.
    pub description: String,
    /// Mapa de evidencia específico de la señal (objeto JSON, claves ordenadas).
    pub evidence: Value,
    pub estimated_overpayment_usd: f64,
    /// Metodología del estimado de sobrepago, para auditoría del triaje.
    pub overpayment_methodology: String,
}

/// Candidato emitido por un detector: identidad mejor-conocida + una señal.
///
/// Los campos de identidad son priors que el resolutor de fusión puede
/// reemplazar por datos del registro nacional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub npi: String,
    pub provider_name: String,
    pub entity_type: EntityType,
    pub state: String,
    pub total_paid: f64,
    pub total_claims: u64,
    pub total_beneficiaries: u64,
    pub signal: SignalRecord,
}
