// [libs/domain/signals/src/annotate.rs]
/*!
 * =================================================================
 * APARATO: FCA RELEVANCE ANNOTATOR (V3.3 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: ANOTACIÓN ESTATUTARIA Y PASOS DE INVESTIGACIÓN
 *
 * # Señal dominante:
 * La anotación se parametriza por la señal de menor índice de severidad
 * (critical < high < medium); los empates los resuelve el orden de la
 * lista fusionada. La estimación de pérdida es el sobrepago combinado
 * redondeado a centavos, un insumo de triaje y no un hallazgo legal.
 * =================================================================
 */

use centinela_domain_models::{round_cents, FcaRelevance, SignalKind, SignalRecord};

/// Señal dominante de una lista fusionada: menor rango de severidad,
/// empates por posición.
pub fn dominant_signal(signals: &[SignalRecord]) -> Option<&SignalRecord> {
    let mut dominant: Option<&SignalRecord> = None;
    for signal in signals {
        match dominant {
            None => dominant = Some(signal),
            Some(current) if signal.severity.rank() < current.severity.rank() => {
                dominant = Some(signal)
            }
            _ => {}
        }
    }
    dominant
}

/// Construye la anotación FCA de un proveedor a partir de su señal dominante.
pub fn build_fca_relevance(
    kind: SignalKind,
    provider_name: &str,
    npi: &str,
    state: &str,
    combined_overpayment: f64,
) -> FcaRelevance {
    let state_label = if state.trim().is_empty() { "unknown" } else { state };
    FcaRelevance {
        violation_description: violation_description(kind, provider_name, npi, state_label),
        claim_type: kind.claim_type_label().to_string(),
        statute_reference: kind.statute_reference().to_string(),
        estimated_government_loss: round_cents(combined_overpayment),
        suggested_investigation_steps: investigation_steps(kind, npi, state_label),
    }
}

fn violation_description(kind: SignalKind, name: &str, npi: &str, state: &str) -> String {
    match kind {
        SignalKind::ExcludedProviderBilling => format!(
            "Provider {name} (NPI: {npi}) in {state} submitted claims to Medicaid while on the \
             OIG LEIE exclusion list. Federal law prohibits payment to excluded \
             individuals/entities. This constitutes a knowing presentation of false claims for \
             payment."
        ),
        SignalKind::StatisticalBillingOutlier => format!(
            "Provider {name} (NPI: {npi}) in {state} billed Medicaid at levels >3 standard \
             deviations above the mean for their peer group, suggesting systematic upcoding or \
             billing for services not rendered."
        ),
        SignalKind::BustOutScheme => format!(
            "Provider {name} (NPI: {npi}) showed rapid billing ramp-up consistent with a \
             bust-out scheme: enrolled recently and escalated claims several-fold within 6 \
             months, a known pattern of fraudulent billing operations."
        ),
        SignalKind::ImpossibleServiceVolume => format!(
            "Provider {name} (NPI: {npi}) billed an impossibly high number of claims per \
             beneficiary per month, exceeding what any provider could physically deliver. This \
             indicates phantom billing."
        ),
        SignalKind::HomeHealthAbuse => format!(
            "Provider {name} (NPI: {npi}) showed patterns consistent with home health billing \
             abuse: extremely high claims-to-beneficiary ratio suggesting repeated billing \
             without medical necessity."
        ),
        SignalKind::ShellEntityNetwork => format!(
            "Authorized official associated with NPI {npi} ({name}) controls 5+ NPIs, suggesting \
             a potential shell entity network used to distribute fraudulent billing across \
             multiple entities to avoid detection."
        ),
        SignalKind::GeographicAnomaly => format!(
            "Provider {name} (NPI: {npi}) in {state} has billing volume inconsistent with their \
             geographic location. The billing intensity is far above peer providers in the same \
             state, suggesting potential billing fraud."
        ),
        SignalKind::TemporalBillingAnomaly => format!(
            "Provider {name} (NPI: {npi}) shows abnormal temporal billing patterns including \
             sudden spikes that deviate significantly from their own trailing baseline."
        ),
        SignalKind::ProcedureCodeConcentration => format!(
            "Provider {name} (NPI: {npi}) bills almost exclusively using a single HCPCS code or \
             a very narrow set of codes, which is atypical for their specialty and suggests \
             potential upcoding or service fabrication."
        ),
        SignalKind::WorkforceImpossibility => format!(
            "Organization {name} (NPI: {npi}) in {state} billed a monthly claim volume that its \
             distinct servicing workforce could not physically deliver, implying fabricated \
             records supporting false claims."
        ),
        SignalKind::BurstEnrollmentNetwork => format!(
            "Provider {name} (NPI: {npi}) belongs to a cluster of same-specialty entities in \
             {state} enrolled within one calendar quarter, a staging pattern for coordinated \
             fraudulent billing across fresh identities."
        ),
        SignalKind::CoordinatedBillingRamp => format!(
            "Entities under the official controlling NPI {npi} ({name}) ramped their billing to \
             peak inside the same 3-month window, indicating coordinated billing escalation \
             across commonly controlled entities."
        ),
        SignalKind::PhantomServicingHub => format!(
            "Servicing provider {name} (NPI: {npi}) appears on claims submitted by five or more \
             distinct billing entities, consistent with a rented or fabricated servicing \
             identity backing phantom claims."
        ),
        SignalKind::BeneficiaryDilution => format!(
            "The network around NPI {npi} ({name}) bills a claim volume grossly disproportionate \
             to its combined beneficiary pool, suggesting recycled patients and retained \
             overpayments across the network."
        ),
        SignalKind::RepetitiveServiceAbuse => format!(
            "Provider {name} (NPI: {npi}) repeats a single HCPCS service per beneficiary at a \
             rate far beyond the peer median for the same code, suggesting billing without \
             medical necessity."
        ),
        SignalKind::BillingMonoculture => format!(
            "Provider {name} (NPI: {npi}) derives nearly all Medicaid payments from one HCPCS \
             code, a monoculture profile consistent with template billing rather than clinical \
             practice."
        ),
        SignalKind::RampAndCollapse => format!(
            "Provider {name} (NPI: {npi}) ramped billing to a sharp peak and collapsed within \
             three months, the canonical bust-out exit: extract payments quickly, then abandon \
             the identity."
        ),
        SignalKind::ReimbursementRateAnomaly => format!(
            "Provider {name} (NPI: {npi}) is reimbursed per claim at a multiple of the peer \
             median for the same HCPCS code, suggesting manipulated claim composition or \
             systematic overbilling."
        ),
        SignalKind::PhantomServicingSpread => format!(
            "Servicing provider {name} (NPI: {npi}) is spread across six or more billing \
             entities sharing almost no beneficiaries, indicating claims fabricated around a \
             single servicing identity."
        ),
    }
}

fn investigation_steps(kind: SignalKind, npi: &str, state: &str) -> Vec<String> {
    match kind {
        SignalKind::ExcludedProviderBilling => vec![
            format!("Verify exclusion status of NPI {npi} on OIG LEIE database"),
            format!("Pull all claims submitted by NPI {npi} since exclusion date"),
            format!("Determine if provider in {state} disclosed exclusion status to billing entity"),
            "Interview Medicaid managed care organizations that processed claims".to_string(),
            "Calculate total federal share of improper payments".to_string(),
            "Refer to OIG for potential criminal prosecution under 42 USC 1320a-7b".to_string(),
        ],
        SignalKind::StatisticalBillingOutlier => vec![
            format!("Audit medical records for NPI {npi} for a sample of high-value claims"),
            "Compare billed services to medical necessity documentation".to_string(),
            format!("Review upcoding patterns for NPI {npi} by HCPCS code"),
            "Interview beneficiaries to confirm services were rendered".to_string(),
            "Conduct statistical analysis of billing patterns by procedure code".to_string(),
        ],
        SignalKind::BustOutScheme => vec![
            format!("Verify physical practice location for NPI {npi} in {state}"),
            format!("Check if NPI {npi} shares address with other high-billing entities"),
            "Review enrollment application for false statements".to_string(),
            "Examine beneficiary referral patterns for steering".to_string(),
            format!("Check if NPI {npi}'s license is valid and in good standing in {state}"),
            "Investigate ownership/control persons for prior fraud history".to_string(),
        ],
        SignalKind::ImpossibleServiceVolume => vec![
            format!("Audit all claims from NPI {npi} for the flagged time periods"),
            "Contact beneficiaries to verify services were actually received".to_string(),
            format!("Review scheduling records for NPI {npi} for physical impossibility"),
            "Check if services were rendered by qualified practitioners".to_string(),
            format!("Examine claim submission patterns for NPI {npi} (time of day, batching)"),
        ],
        SignalKind::HomeHealthAbuse => vec![
            format!("Audit home health records for NPI {npi}"),
            "Verify plans of care and physician orders exist".to_string(),
            "Confirm homebound status of beneficiaries".to_string(),
            format!("Review NPI {npi} for medically unnecessary visits"),
            "Interview beneficiaries about services received".to_string(),
            "Check for kickback arrangements with referring physicians".to_string(),
        ],
        SignalKind::ShellEntityNetwork => vec![
            format!("Map all NPIs controlled by the authorized official linked to {npi}"),
            "Check for shared addresses, phone numbers, and bank accounts".to_string(),
            "Review each entity's billing patterns for coordination".to_string(),
            "Investigate authorized official's background and associations".to_string(),
            format!("Check {state} Medicaid enrollment records for cross-references"),
            "Look for graduated billing patterns across the network".to_string(),
        ],
        SignalKind::GeographicAnomaly => vec![
            format!("Verify physical practice location for NPI {npi} in {state}"),
            format!("Check beneficiary addresses for NPI {npi} against provider location"),
            "Compare billing volume to same-specialty providers in the area".to_string(),
            "Investigate whether provider location is a residential address or commercial space"
                .to_string(),
            format!("Review NPI {npi}'s enrollment records for address discrepancies"),
        ],
        SignalKind::TemporalBillingAnomaly => vec![
            format!("Analyze claim submission dates for NPI {npi} for clustering patterns"),
            format!("Compare NPI {npi}'s monthly billing variance to peer providers"),
            "Review claims during spike periods for medical necessity".to_string(),
            "Check if billing spikes correlate with specific HCPCS codes".to_string(),
            "Investigate whether spikes correspond to staff changes or ownership transfers"
                .to_string(),
        ],
        SignalKind::ProcedureCodeConcentration => vec![
            format!("Review medical records for NPI {npi} to verify procedure diversity"),
            format!("Compare NPI {npi}'s HCPCS code distribution to same-specialty peers"),
            "Audit a sample of claims for the dominant procedure code".to_string(),
            "Check if the concentrated code is commonly associated with fraud".to_string(),
            format!("Investigate whether NPI {npi}'s patient mix justifies the code concentration"),
        ],
        SignalKind::WorkforceImpossibility => vec![
            format!("Request employment records showing licensed practitioners at NPI {npi}"),
            "Compare staffing levels to claims volume for physical feasibility".to_string(),
            "Review claims for patterns of identical procedures billed on same dates".to_string(),
            format!("Verify servicing providers listed by NPI {npi} actually worked there"),
            format!("Check {state} labor filings against the implied workforce size"),
        ],
        SignalKind::BurstEnrollmentNetwork => vec![
            format!("Map the enrollment cohort around NPI {npi} and its incorporation records"),
            "Check for shared registered agents, addresses, and bank accounts across the cohort"
                .to_string(),
            format!("Review {state} Medicaid enrollment applications filed in the same quarter"),
            "Compare billing onset timing across cohort members".to_string(),
            "Investigate beneficial ownership for a common controller".to_string(),
        ],
        SignalKind::CoordinatedBillingRamp => vec![
            format!("Map all entities under the official controlling NPI {npi}"),
            "Overlay the members' monthly billing curves to confirm the shared window".to_string(),
            "Check for overlapping beneficiaries across members during the window".to_string(),
            "Review claims filed during the peak window for medical necessity".to_string(),
            format!("Check {state} enrollment records for coordinated changes before the ramp"),
        ],
        SignalKind::PhantomServicingHub => vec![
            format!("Verify employment relationships between NPI {npi} and each billing entity"),
            format!("Interview the individual behind NPI {npi} about actual hours worked"),
            "Compare servicing dates across billing entities for physical impossibility"
                .to_string(),
            "Contact beneficiaries to confirm the servicing provider was present".to_string(),
            "Review whether the servicing identity was rented or stolen".to_string(),
        ],
        SignalKind::BeneficiaryDilution => vec![
            format!("Pull beneficiary rosters for the network around NPI {npi}"),
            "Identify beneficiaries billed repeatedly across network members".to_string(),
            "Interview recycled beneficiaries about services received".to_string(),
            "Quantify overpayments retained by the network after the dilution pattern emerged"
                .to_string(),
            format!("Check {state} records for obligations to refund identified overpayments"),
        ],
        SignalKind::RepetitiveServiceAbuse => vec![
            format!("Audit claims from NPI {npi} for the dominant repeated HCPCS code"),
            "Verify medical necessity documentation for the repeated service".to_string(),
            "Interview beneficiaries about actual service frequency".to_string(),
            "Compare the provider's frequency to clinical guidelines for the code".to_string(),
            format!("Review NPI {npi}'s ordering/referring relationships for steering"),
        ],
        SignalKind::BillingMonoculture => vec![
            format!("Review the clinical scope of practice registered for NPI {npi}"),
            "Audit a sample of claims for the dominant code against medical records".to_string(),
            "Check whether the dominant code is on high-risk fraud code lists".to_string(),
            format!("Compare NPI {npi}'s profile against same-taxonomy peers"),
            "Investigate whether claims were generated from a billing template".to_string(),
        ],
        SignalKind::RampAndCollapse => vec![
            format!("Determine whether NPI {npi} is still operating at its enrolled location"),
            "Trace payments received during the peak months".to_string(),
            "Review enrollment and ownership changes around the collapse".to_string(),
            "Check for successor entities billing the same beneficiaries".to_string(),
            format!("Coordinate with {state} Medicaid to suspend further payments"),
        ],
        SignalKind::ReimbursementRateAnomaly => vec![
            format!("Reconstruct per-claim reimbursement for NPI {npi} on the flagged code"),
            "Compare modifier usage against peers billing the same code".to_string(),
            "Audit claim composition for unbundling or units inflation".to_string(),
            "Verify the fee schedule applied to the provider's claims".to_string(),
            format!("Review NPI {npi}'s managed-care contracts for rate irregularities"),
        ],
        SignalKind::PhantomServicingSpread => vec![
            format!("Identify every billing entity using servicing NPI {npi}"),
            "Reconcile the combined beneficiary count against claimed service volume".to_string(),
            "Contact the listed beneficiaries to verify any service was received".to_string(),
            "Determine whether the servicing identity was compromised or complicit".to_string(),
            "Refer confirmed phantom claims for criminal investigation".to_string(),
        ],
    }
}
