use serde::{Deserialize, Serialize};

/// Stations and lines loaded into the network at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub lines: Vec<LineConfig>,
}

/// A line and its extra sections. Stations are referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    pub name: String,
    pub color: String,
    pub up_station: String,
    pub down_station: String,
    pub distance: i64,
    /// Added in order after the line is created
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub up_station: String,
    pub down_station: String,
    pub distance: i64,
}
