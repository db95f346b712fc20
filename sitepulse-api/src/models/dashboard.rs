use serde::{Deserialize, Serialize};

/// Header of one metric column in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricHeader {
    pub name: String,
}

/// A single cell value. The backend reports every value as a string, the way
/// the GA4 Data API does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: String,
}

/// One row of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub dimension_values: Vec<MetricValue>,
    #[serde(default)]
    pub metric_values: Vec<MetricValue>,
}

/// Aggregated overview report (sessions, users, page views, bounce rate...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewReport {
    #[serde(default)]
    pub metric_headers: Vec<MetricHeader>,
    #[serde(default)]
    pub rows: Vec<ReportRow>,
}

impl OverviewReport {
    /// Look up a metric of the first row by header name.
    pub fn metric(&self, name: &str) -> Option<&str> {
        let index = self
            .metric_headers
            .iter()
            .position(|header| header.name == name)?;
        self.rows
            .first()
            .and_then(|row| row.metric_values.get(index))
            .map(|value| value.value.as_str())
    }
}

/// Realtime active-user counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeSnapshot {
    #[serde(default)]
    pub active_users: u64,
}

/// One traffic source row of the breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSource {
    pub source: String,
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub users: u64,
}

/// One entry of the top-pages list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPage {
    pub page_path: String,
    #[serde(default)]
    pub views: u64,
}

/// Read-only metrics bundle of `GET /dashboard/{website_id}`, replaced
/// wholesale on every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub overview: OverviewReport,
    #[serde(default)]
    pub realtime: RealtimeSnapshot,
    #[serde(default)]
    pub traffic_sources: Vec<TrafficSource>,
    #[serde(default)]
    pub top_pages: Vec<TopPage>,
}

/// Time-series report of `GET /analytics/{website_id}?range=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsReport {
    #[serde(default)]
    pub dimension_headers: Vec<MetricHeader>,
    #[serde(default)]
    pub metric_headers: Vec<MetricHeader>,
    #[serde(default)]
    pub rows: Vec<ReportRow>,
}
