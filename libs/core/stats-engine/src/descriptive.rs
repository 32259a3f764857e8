// [libs/core/stats-engine/src/descriptive.rs]
/*!
 * =================================================================
 * APARATO: POPULATION SUMMARY ENGINE (V3.2 - SOBERANO)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: MEDIA, SIGMA POBLACIONAL Y PERCENTILES INTERPOLADOS
 *
 * # Mathematical Proof (Population Moments):
 * Sobre la población completa de N proveedores elegibles:
 *   media  µ = (Σ x_i) / N
 *   sigma² = (Σ (x_i - µ)²) / N        (varianza poblacional, no muestral)
 * El percentil continuo q interpola linealmente sobre el rango ordenado
 * con rank = q·(N-1), reproduciendo la semántica PERCENTILE_CONT del
 * motor columnar de origen.
 * =================================================================
 */

/// Resumen descriptivo de una población completa de montos.
///
/// Se construye una sola vez por población elegible y se consulta desde
/// los detectores; el vector de entrada se ordena internamente.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSummary {
    /// Cardinalidad de la población.
    pub count: usize,
    /// Media poblacional µ.
    pub mean: f64,
    /// Desviación estándar poblacional sigma.
    pub std_dev: f64,
    /// Percentil 50 interpolado.
    pub median: f64,
    /// Percentil 25 interpolado.
    pub percentile_25: f64,
    /// Percentil 75 interpolado.
    pub percentile_75: f64,
}

impl PopulationSummary {
    /// Cristaliza el resumen de la población. Retorna `None` si está vacía.
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(|left, right| left.total_cmp(right));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values
            .iter()
            .map(|value| {
                let deviation = value - mean;
                deviation * deviation
            })
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            median: interpolated_percentile(&values, 0.50),
            percentile_25: interpolated_percentile(&values, 0.25),
            percentile_75: interpolated_percentile(&values, 0.75),
        })
    }

    /// Rango intercuartílico (p75 - p25).
    pub fn interquartile_range(&self) -> f64 {
        self.percentile_75 - self.percentile_25
    }

    /// Z-score poblacional. `None` cuando sigma es degenerada (población
    /// constante): el candidato falla limpiamente cualquier umbral.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.std_dev > 0.0 {
            Some((value - self.mean) / self.std_dev)
        } else {
            None
        }
    }

    /// Umbral de corte µ + k·sigma.
    pub fn sigma_threshold(&self, sigma_multiplier: f64) -> f64 {
        self.mean + sigma_multiplier * self.std_dev
    }
}

/// Mediana interpolada de un vector arbitrario (se ordena internamente).
/// `None` si la población está vacía.
pub fn median_of(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|left, right| left.total_cmp(right));
    Some(interpolated_percentile(&values, 0.50))
}

/// PERCENTILE_CONT sobre un rango YA ordenado ascendentemente.
fn interpolated_percentile(sorted_values: &[f64], quantile: f64) -> f64 {
    let last_index = sorted_values.len() - 1;
    let continuous_rank = quantile * last_index as f64;
    let lower_index = continuous_rank.floor() as usize;
    let upper_index = continuous_rank.ceil() as usize;
    if lower_index == upper_index {
        return sorted_values[lower_index];
    }
    let fraction = continuous_rank - lower_index as f64;
    sorted_values[lower_index] * (1.0 - fraction) + sorted_values[upper_index] * fraction
}
