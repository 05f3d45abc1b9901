use serde::{Deserialize, Serialize};

use crate::{LineId, SectionError, Segment, Sections, Station};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: LineId,
    pub(crate) name: String,
    pub(crate) color: String,
    pub(crate) sections: Sections,
}

impl Line {
    /// A line always starts with one section between its two first stations.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        first_section: Segment,
    ) -> Result<Self, SectionError> {
        let mut sections = Sections::new();
        sections.add(first_section)?;
        Ok(Line {
            id,
            name: name.into(),
            color: color.into(),
            sections,
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn update(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
    }

    pub fn add_section(&mut self, section: Segment) -> Result<(), SectionError> {
        self.sections.add(section)
    }

    /// Remove the last section of the line, ending at `station`.
    ///
    /// A line keeps at least one section.
    pub fn remove_section(&mut self, station: &Station) -> Result<(), SectionError> {
        if self.sections.size() <= 1 {
            return Err(SectionError::SingleSection { line_id: self.id });
        }
        self.sections.remove_last_section(station)
    }

    pub fn stations(&self) -> Result<Vec<Station>, SectionError> {
        self.sections.stations()
    }

    pub fn has_station(&self, station_id: crate::StationId) -> bool {
        self.sections
            .iter()
            .any(|section| section.is_up_station(station_id) || section.is_down_station(station_id))
    }

    /// Detach every section of the line, returning them.
    pub fn detach_sections(&mut self) -> Vec<Segment> {
        let segment_ids: Vec<uuid::Uuid> = self
            .sections
            .iter()
            .map(|section| section.segment_id)
            .collect();
        self.sections.remove(&segment_ids)
    }
}
