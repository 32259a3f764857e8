// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE ENTIDADES DEL DOMINIO FORENSE
 * =================================================================
 */

pub mod money;
pub mod month;
pub mod provider;
pub mod report;
pub mod signal;

pub use money::{format_usd, group_thousands, round_cents};
pub use month::ClaimMonth;
pub use provider::{is_placeholder_name, placeholder_name, EntityType, ProviderIdentity};
pub use report::{FcaRelevance, FlaggedProvider, FraudReport};
pub use signal::{Severity, SignalCandidate, SignalKind, SignalRecord, SIGNAL_CATALOG_ORDER};
