// Guideline exceedance evaluation
use super::guideline::GuidelineTable;
use super::pollutant::{ConcentrationUnit, Pollutant, ReadingSet};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exceedance {
    pub pollutant: Pollutant,
    pub value: f64,
    pub limit: f64,
    pub unit: ConcentrationUnit,
    /// value / limit * 100
    pub percent_of_limit: f64,
    /// (value - limit) / limit * 100
    pub percent_over_limit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceedanceStatus {
    WithinLimits,
    Exceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedanceReport {
    pub status: ExceedanceStatus,
    /// Number of readings that were actually compared against a limit.
    pub evaluated: usize,
    pub exceedances: Vec<Exceedance>,
    /// Percent over limit keyed by pollutant
    pub percent_over: BTreeMap<Pollutant, f64>,
    pub worst: Option<Exceedance>,
}

impl ExceedanceReport {
    /// True when nothing could be compared, so "within limits" says nothing
    /// about the air.
    pub fn is_vacuous(&self) -> bool {
        self.evaluated == 0
    }
}

/// Huge readings can overflow the percentage; saturate so the report stays
/// numeric and the reading still ranks highest.
fn finite_percent(percent: f64) -> f64 {
    if percent.is_finite() { percent } else { f64::MAX }
}

/// Compare each reading with its guideline limit.
///
/// Readings with no limit entry, an unknown identifier or a unit that differs
/// from the limit's unit are skipped. The worst offender is the largest
/// `percent_over_limit`; on a tie the reading that came first in `readings`
/// wins.
pub fn evaluate(readings: &ReadingSet, limits: &GuidelineTable) -> ExceedanceReport {
    let mut evaluated = 0;
    let mut exceedances = Vec::new();

    for reading in readings.iter() {
        let Some(pollutant) = reading.pollutant() else {
            tracing::debug!("Skipping unknown pollutant {}", reading.pollutant_id);
            continue;
        };
        let Some(limit) = limits.get(pollutant) else {
            tracing::debug!("No guideline limit for {}", pollutant);
            continue;
        };
        if reading.unit != limit.unit {
            tracing::warn!(
                "Skipping {}: reading in {} but limit in {}",
                pollutant,
                reading.unit,
                limit.unit
            );
            continue;
        }

        evaluated += 1;
        if reading.concentration > limit.value {
            exceedances.push(Exceedance {
                pollutant,
                value: reading.concentration,
                limit: limit.value,
                unit: limit.unit,
                percent_of_limit: finite_percent(reading.concentration / limit.value * 100.0),
                percent_over_limit: finite_percent((reading.concentration - limit.value) / limit.value * 100.0),
            });
        }
    }

    let mut worst: Option<&Exceedance> = None;
    for e in &exceedances {
        if worst.is_none_or(|w| e.percent_over_limit > w.percent_over_limit) {
            worst = Some(e);
        }
    }
    let worst = worst.cloned();
    let percent_over = exceedances
        .iter()
        .map(|e| (e.pollutant, e.percent_over_limit))
        .collect();

    let status = if exceedances.is_empty() {
        ExceedanceStatus::WithinLimits
    } else {
        ExceedanceStatus::Exceeded
    };

    ExceedanceReport {
        status,
        evaluated,
        exceedances,
        percent_over,
        worst,
    }
}
