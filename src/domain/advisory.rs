// Precaution texts keyed by pollutant or AQI category
use super::aqi::AqiCategory;
use super::pollutant::Pollutant;
use std::collections::HashMap;

pub const GENERIC_PRECAUTION: &str = "Maintain general air-quality precautions.";

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory fallback must contain at least one non-empty sentence")]
    EmptyFallback,
}

#[derive(Debug, Clone)]
pub struct AdvisoryBook {
    by_pollutant: HashMap<Pollutant, Vec<String>>,
    by_category: HashMap<AqiCategory, Vec<String>>,
    fallback: Vec<String>,
}

fn texts(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

impl Default for AdvisoryBook {
    fn default() -> Self {
        let by_pollutant = HashMap::from([
            (
                Pollutant::Pm25,
                texts(&[
                    "Wear an N95 or P95 mask when outdoors.",
                    "Close windows and run a HEPA air purifier indoors.",
                    "Avoid strenuous outdoor exercise during high pollution hours.",
                ]),
            ),
            (
                Pollutant::Pm10,
                texts(&[
                    "Wear an N95 or P95 mask outdoors.",
                    "Avoid dusty areas and use air purifiers indoors.",
                    "Limit outdoor activities during peak traffic hours.",
                ]),
            ),
            (
                Pollutant::O3,
                texts(&[
                    "Avoid being outdoors during mid-day/afternoon.",
                    "Stay indoors if respiratory symptoms worsen.",
                    "Avoid gas-powered lawn equipment.",
                ]),
            ),
            (
                Pollutant::No2,
                texts(&[
                    "Avoid high-traffic roads and industrial zones.",
                    "Ensure good indoor ventilation without drawing outdoor air.",
                    "Use indoor plants to help absorb NO₂.",
                ]),
            ),
            (
                Pollutant::So2,
                texts(&[
                    "Avoid areas near construction or industrial emissions.",
                    "Ventilate your home well but avoid pulling polluted air inside.",
                    "Use air purifiers if sensitive to sulfur compounds.",
                ]),
            ),
            (
                Pollutant::Co,
                texts(&[
                    "Keep fuel-burning appliances well ventilated.",
                    "Avoid idling vehicles in enclosed spaces.",
                ]),
            ),
        ]);

        let by_category = HashMap::from([
            (AqiCategory::Good, texts(&["Air quality is satisfactory; enjoy outdoor activities."])),
            (
                AqiCategory::Moderate,
                texts(&["Unusually sensitive people should consider reducing prolonged outdoor exertion."]),
            ),
            (
                AqiCategory::UnhealthyForSensitiveGroups,
                texts(&[
                    "Children, older adults and people with heart or lung disease should reduce prolonged outdoor exertion.",
                    "Keep quick-relief medicine handy if you have asthma.",
                ]),
            ),
            (
                AqiCategory::Unhealthy,
                texts(&[
                    "Everyone should reduce prolonged or heavy outdoor exertion.",
                    "Wear a well-fitted N95 mask outdoors.",
                ]),
            ),
            (
                AqiCategory::VeryUnhealthy,
                texts(&[
                    "Avoid all outdoor physical activity.",
                    "Keep windows closed and run an air purifier.",
                ]),
            ),
            (
                AqiCategory::Hazardous,
                texts(&[
                    "Remain indoors and keep activity levels low.",
                    "Follow local health advisories and emergency instructions.",
                ]),
            ),
        ]);

        Self {
            by_pollutant,
            by_category,
            fallback: vec![GENERIC_PRECAUTION.to_string()],
        }
    }
}

impl AdvisoryBook {
    /// Replace the fallback list. Blank sentences are discarded; an empty
    /// result is rejected.
    pub fn with_fallback(mut self, fallback: Vec<String>) -> Result<Self, AdvisoryError> {
        let fallback: Vec<String> = fallback
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if fallback.is_empty() {
            return Err(AdvisoryError::EmptyFallback);
        }
        self.fallback = fallback;
        Ok(self)
    }

    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    pub fn for_pollutant(&self, pollutant_id: &str) -> &[String] {
        Pollutant::parse(pollutant_id)
            .and_then(|p| self.pollutant_entry(p))
            .unwrap_or(self.fallback.as_slice())
    }

    pub fn for_category(&self, category: AqiCategory) -> &[String] {
        self.by_category
            .get(&category)
            .filter(|lines| !lines.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(self.fallback.as_slice())
    }

    /// Resolve a key that may be either a pollutant identifier or a
    /// category label.
    pub fn lookup(&self, key: &str) -> &[String] {
        if let Some(lines) = Pollutant::parse(key).and_then(|p| self.pollutant_entry(p)) {
            return lines;
        }
        match AqiCategory::from_label(key) {
            Some(category) => self.for_category(category),
            None => &self.fallback,
        }
    }

    fn pollutant_entry(&self, pollutant: Pollutant) -> Option<&[String]> {
        self.by_pollutant
            .get(&pollutant)
            .filter(|lines| !lines.is_empty())
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pollutant_lookup() {
        let book = AdvisoryBook::default();
        let lines = book.for_pollutant("pm2.5");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Wear an N95 or P95 mask when outdoors.");
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let book = AdvisoryBook::default();
        for key in ["NH3", "", "benzene", "Extremely Bad"] {
            assert_eq!(book.lookup(key), [GENERIC_PRECAUTION.to_string()]);
        }
        assert_eq!(book.for_pollutant("NH3"), [GENERIC_PRECAUTION.to_string()]);
    }

    #[test]
    fn test_category_lookup() {
        let book = AdvisoryBook::default();
        assert!(book.lookup("Hazardous")[0].starts_with("Remain indoors"));
        // No Data has no dedicated texts
        assert_eq!(book.for_category(AqiCategory::NoData), book.fallback());
        for category in AqiCategory::TIERS {
            assert!(!book.for_category(category).is_empty());
        }
    }

    #[test]
    fn test_fallback_must_be_non_empty() {
        assert!(AdvisoryBook::default().with_fallback(vec!["  ".to_string()]).is_err());

        let book = AdvisoryBook::default()
            .with_fallback(vec!["Check local advisories.".to_string()])
            .unwrap();
        assert_eq!(book.lookup("xyz"), ["Check local advisories.".to_string()]);
    }
}
