use serde::{Deserialize, Serialize};

use crate::SectionError;

pub type StationId = u64;

pub type LineId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Station {
            id,
            name: name.into(),
        }
    }
}

/// A directed, weighted edge between two stations of a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub(crate) segment_id: uuid::Uuid,
    pub(crate) up_station: Station,
    pub(crate) down_station: Station,
    pub(crate) distance: u32,
}

impl Segment {
    pub fn new(up_station: Station, down_station: Station, distance: i64) -> Result<Self, SectionError> {
        if up_station.id == down_station.id {
            return Err(SectionError::SameStations {
                station_id: up_station.id,
            });
        }
        let distance = u32::try_from(distance)
            .ok()
            .filter(|distance| *distance > 0)
            .ok_or(SectionError::NonPositiveDistance { distance })?;

        Ok(Segment {
            segment_id: uuid::Uuid::new_v4(),
            up_station,
            down_station,
            distance,
        })
    }

    pub fn segment_id(&self) -> uuid::Uuid {
        self.segment_id
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub(crate) fn is_up_station(&self, station_id: StationId) -> bool {
        self.up_station.id == station_id
    }

    pub(crate) fn is_down_station(&self, station_id: StationId) -> bool {
        self.down_station.id == station_id
    }
}
