use serde::Serialize;

/// Accessibility or format marker attached to a single performance.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    AssistedHearing,
    AudioDescription,
    Relaxed,
    Asl,
    Tad,
    TouchBook,
    TouchTour,
    Preview,
    Pwyc,
    DailyDiscount,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShowRecord {
    pub title: String,
    pub url: String,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub id: usize, // 1-based position in the url list
    #[serde(rename = "perfsData")]
    pub performances: Vec<PerformanceRecord>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PerformanceRecord {
    pub id: usize, // 1-based, per show
    pub flags: Vec<Flag>,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Show-level fields pulled from a detail page before the performance table is read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShowFields {
    pub title: String,
    pub runtime_minutes: Option<i64>,
    pub venue: Option<String>,
    pub address: Option<String>,
}

impl ShowRecord {
    pub fn from_parts(
        fields: ShowFields,
        url: &str,
        index: usize,
        performances: Vec<PerformanceRecord>,
    ) -> Self {
        Self {
            title: fields.title,
            url: url.to_string(),
            venue: fields.venue,
            address: fields.address,
            id: index + 1,
            performances,
        }
    }
}
