// Classification tables shared by every request
use super::advisory::AdvisoryBook;
use super::aqi::AqiScale;
use super::guideline::GuidelineTable;

/// Read-only tables built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub scale: AqiScale,
    pub limits: GuidelineTable,
    pub advisories: AdvisoryBook,
}
