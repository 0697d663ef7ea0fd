// AQI categories and the classifier
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bounds (inclusive) of the first five bands. Anything above the
/// last bound is Hazardous.
pub const AQI_BREAKPOINTS: [u32; 5] = [50, 100, 150, 200, 300];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    NoData,
}

impl AqiCategory {
    /// The six numeric tiers in ascending severity.
    pub const TIERS: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
            AqiCategory::NoData => "No Data",
        }
    }

    /// Match a label or snake_case key, ignoring case.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::TIERS
            .into_iter()
            .chain(std::iter::once(AqiCategory::NoData))
            .find(|c| {
                c.label().eq_ignore_ascii_case(s)
                    || c.label().replace(' ', "_").eq_ignore_ascii_case(s)
            })
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An overall AQI value, or the marker for "unavailable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AqiValue {
    Index(u32),
    Unavailable,
}

impl AqiValue {
    /// Interpret free text such as "42", "42.7", "-" or "N/A".
    pub fn from_str_lossy(s: &str) -> Self {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Self::from(v);
        }
        match s.parse::<f64>() {
            Ok(v) => Self::from(v),
            Err(_) => AqiValue::Unavailable,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Self::from(v),
                None => n.as_f64().map(Self::from).unwrap_or(AqiValue::Unavailable),
            },
            serde_json::Value::String(s) => Self::from_str_lossy(s),
            _ => AqiValue::Unavailable,
        }
    }

    pub fn index(&self) -> Option<u32> {
        match self {
            AqiValue::Index(v) => Some(*v),
            AqiValue::Unavailable => None,
        }
    }
}

impl From<i64> for AqiValue {
    fn from(v: i64) -> Self {
        u32::try_from(v).map(AqiValue::Index).unwrap_or(AqiValue::Unavailable)
    }
}

impl From<f64> for AqiValue {
    fn from(v: f64) -> Self {
        if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
            AqiValue::Index(v.trunc() as u32)
        } else {
            AqiValue::Unavailable
        }
    }
}

/// Display colours for each category. Only the colours are configurable;
/// the band boundaries are fixed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub good: String,
    pub moderate: String,
    pub unhealthy_for_sensitive_groups: String,
    pub unhealthy: String,
    pub very_unhealthy: String,
    pub hazardous: String,
    pub no_data: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            good: "green".to_string(),
            moderate: "yellow".to_string(),
            unhealthy_for_sensitive_groups: "orange".to_string(),
            unhealthy: "red".to_string(),
            very_unhealthy: "purple".to_string(),
            hazardous: "maroon".to_string(),
            no_data: "gray".to_string(),
        }
    }
}

impl Palette {
    fn color(&self, category: AqiCategory) -> &str {
        match category {
            AqiCategory::Good => &self.good,
            AqiCategory::Moderate => &self.moderate,
            AqiCategory::UnhealthyForSensitiveGroups => &self.unhealthy_for_sensitive_groups,
            AqiCategory::Unhealthy => &self.unhealthy,
            AqiCategory::VeryUnhealthy => &self.very_unhealthy,
            AqiCategory::Hazardous => &self.hazardous,
            AqiCategory::NoData => &self.no_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub aqi: AqiValue,
    pub category: AqiCategory,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct AqiScale {
    palette: Palette,
}

impl AqiScale {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn category(&self, aqi: AqiValue) -> AqiCategory {
        let Some(v) = aqi.index() else {
            return AqiCategory::NoData;
        };

        AQI_BREAKPOINTS
            .iter()
            .zip(AqiCategory::TIERS)
            .find(|(upper, _)| v <= **upper)
            .map(|(_, category)| category)
            .unwrap_or(AqiCategory::Hazardous)
    }

    pub fn color(&self, category: AqiCategory) -> &str {
        self.palette.color(category)
    }

    pub fn classify(&self, aqi: AqiValue) -> Classification {
        let category = self.category(aqi);
        Classification {
            aqi,
            category,
            label: category.label().to_string(),
            color: self.color(category).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(v: i64) -> &'static str {
        AqiScale::default().category(AqiValue::from(v)).label()
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(label(0), "Good");
        assert_eq!(label(50), "Good");
        assert_eq!(label(51), "Moderate");
        assert_eq!(label(100), "Moderate");
        assert_eq!(label(101), "Unhealthy for Sensitive Groups");
        assert_eq!(label(150), "Unhealthy for Sensitive Groups");
        assert_eq!(label(151), "Unhealthy");
        assert_eq!(label(200), "Unhealthy");
        assert_eq!(label(201), "Very Unhealthy");
        assert_eq!(label(300), "Very Unhealthy");
        assert_eq!(label(301), "Hazardous");
        assert_eq!(label(999), "Hazardous");
    }

    #[test]
    fn test_bands_are_contiguous_and_ordered() {
        let scale = AqiScale::default();
        let mut previous = AqiCategory::Good;
        for v in 0..=600u32 {
            let category = scale.category(AqiValue::Index(v));
            assert_ne!(category, AqiCategory::NoData);
            assert!(category >= previous, "category went down at {}", v);
            previous = category;
        }
        assert_eq!(previous, AqiCategory::Hazardous);
    }

    #[test]
    fn test_invalid_input_is_no_data() {
        let scale = AqiScale::default();
        for raw in ["N/A", "-", "", "abc", "-5", "NaN", "inf"] {
            let c = scale.classify(AqiValue::from_str_lossy(raw));
            assert_eq!(c.category, AqiCategory::NoData, "input {:?}", raw);
            assert_eq!(c.label, "No Data");
            assert_eq!(c.color, "gray");
        }
        assert_eq!(scale.category(AqiValue::from(-5i64)), AqiCategory::NoData);
        assert_eq!(scale.category(AqiValue::from(f64::NAN)), AqiCategory::NoData);
    }

    #[test]
    fn test_lossy_parsing() {
        assert_eq!(AqiValue::from_str_lossy(" 42 "), AqiValue::Index(42));
        assert_eq!(AqiValue::from_str_lossy("150.9"), AqiValue::Index(150));
        assert_eq!(AqiValue::from_json(&serde_json::json!(151)), AqiValue::Index(151));
        assert_eq!(AqiValue::from_json(&serde_json::json!("57")), AqiValue::Index(57));
        assert_eq!(AqiValue::from_json(&serde_json::json!(null)), AqiValue::Unavailable);
        assert_eq!(AqiValue::from_json(&serde_json::json!([1])), AqiValue::Unavailable);
    }

    #[test]
    fn test_palette_override() {
        let scale = AqiScale::new(Palette {
            good: "#00e400".to_string(),
            ..Palette::default()
        });
        let c = scale.classify(AqiValue::Index(10));
        assert_eq!(c.color, "#00e400");
        assert_eq!(scale.classify(AqiValue::Index(400)).color, "maroon");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(AqiCategory::from_label("hazardous"), Some(AqiCategory::Hazardous));
        assert_eq!(
            AqiCategory::from_label("unhealthy_for_sensitive_groups"),
            Some(AqiCategory::UnhealthyForSensitiveGroups)
        );
        assert_eq!(AqiCategory::from_label("no data"), Some(AqiCategory::NoData));
        assert_eq!(AqiCategory::from_label("PM2.5"), None);
    }
}
