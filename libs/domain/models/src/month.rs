// [libs/domain/models/src/month.rs]
/*!
 * =================================================================
 * APARATO: CLAIM MONTH SCALAR (V3.2 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN VALUE TYPE (ESTRATO L2)
 * RESPONSABILIDAD: ARITMÉTICA MONÓTONA DE MESES DE FACTURACIÓN
 *
 * # Mathematical Proof (Monotone Ordering):
 * El escalar interno es 'year * 12 + (month - 1)'. La comparación de
 * enteros preserva exactamente el orden cronológico, y la distancia
 * entre dos meses es una resta sin desbordamiento en el rango CMS
 * (1900-01 .. 2262-12).
 * =================================================================
 */

use serde::de::Error as DeserializeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mes de reclamo con granularidad de primer-día-de-mes.
///
/// Se transporta como `"YYYY-MM"` en JSON y acepta `"YYYY-MM-DD"` en
/// ingesta (el día se descarta: la granularidad del dataset es mensual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimMonth(u32);

impl ClaimMonth {
    /// Construye el escalar desde componentes calendáricos.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if !(1..=12).contains(&month) || year < 1900 {
            return None;
        }
        Some(Self(u32::from(year) * 12 + u32::from(month) - 1))
    }

    /// Decodifica `"YYYY-MM"` o `"YYYY-MM-DD"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() < 7 {
            return None;
        }
        let (year_part, rest) = trimmed.split_at(4);
        if !rest.starts_with('-') {
            return None;
        }
        let month_part = &rest[1..3.min(rest.len())];
        let year = year_part.parse::<u16>().ok()?;
        let month = month_part.parse::<u8>().ok()?;
        Self::new(year, month)
    }

    pub fn year(self) -> u16 {
        (self.0 / 12) as u16
    }

    pub fn month(self) -> u8 {
        (self.0 % 12 + 1) as u8
    }

    /// Trimestre calendárico (1..=4), para agrupaciones de alta de registro.
    pub fn quarter(self) -> u8 {
        (self.month() - 1) / 3 + 1
    }

    /// Distancia en meses (`other - self`), negativa si `other` es anterior.
    pub fn months_until(self, other: Self) -> i64 {
        i64::from(other.0) - i64::from(self.0)
    }

    /// Mes siguiente.
    pub fn successor(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ClaimMonth {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for ClaimMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClaimMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| DeserializeError::custom(format!("L2_MONTH_FAULT: unparseable claim month '{raw}'")))
    }
}
