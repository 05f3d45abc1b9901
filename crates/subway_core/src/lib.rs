mod config;
mod line;
mod models;
mod sections;

pub use crate::config::*;
pub use crate::line::Line;
pub use crate::models::*;
pub use crate::sections::Sections;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a section could not be added to, or removed from, a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("Up station and down station are both station {station_id}")]
    SameStations { station_id: StationId },
    #[error("Distance {distance} must be a positive number")]
    NonPositiveDistance { distance: i64 },
    #[error("Stations {up_station_id} and {down_station_id} are both already on the line")]
    DuplicateEndpoints {
        up_station_id: StationId,
        down_station_id: StationId,
    },
    #[error("Neither station {up_station_id} nor station {down_station_id} is on the line")]
    DisconnectedEndpoints {
        up_station_id: StationId,
        down_station_id: StationId,
    },
    #[error("Distance {distance} must be shorter than the {existing_distance} of the section it splits")]
    DistanceTooLong { distance: u32, existing_distance: u32 },
    #[error("Section {up_station_id} -> {down_station_id} cannot be attached to the line")]
    InvalidPlacement {
        up_station_id: StationId,
        down_station_id: StationId,
    },
    #[error("Station {station_id} is not the last station of the line")]
    InvalidTailRemoval { station_id: StationId },
    #[error("Line {line_id} has a single section left")]
    SingleSection { line_id: LineId },
    #[error("The sections of the line do not form a single path")]
    IllegalState,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubwayError {
    #[error("Station {station_id} not found")]
    StationNotFound { station_id: StationId },
    #[error("Line {line_id} not found")]
    LineNotFound { line_id: LineId },
    #[error("Station {station_id} is used by line {line_id}")]
    StationInUse { station_id: StationId, line_id: LineId },
    #[error("Station {name:?} is not declared in the configuration")]
    UnknownStationName { name: String },
    #[error(transparent)]
    Section(#[from] SectionError),
}

/// Every station and line of the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubwayState {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    next_station_id: StationId,
    next_line_id: LineId,
}

impl Default for SubwayState {
    fn default() -> Self {
        SubwayState::new()
    }
}

impl SubwayState {
    pub fn new() -> Self {
        SubwayState {
            stations: BTreeMap::new(),
            lines: BTreeMap::new(),
            next_station_id: 1,
            next_line_id: 1,
        }
    }

    /// Build a network from its seed configuration.
    ///
    /// Stations are created in declaration order, then each line with its
    /// sections in order.
    pub fn from_config(config: NetworkConfig) -> Result<Self, SubwayError> {
        let mut state = SubwayState::new();
        let mut ids_by_name: HashMap<String, StationId> = HashMap::new();
        for name in config.stations {
            let station = state.create_station(name.clone());
            ids_by_name.insert(name, station.id);
        }

        let lookup = |name: &str| {
            ids_by_name
                .get(name)
                .copied()
                .ok_or_else(|| SubwayError::UnknownStationName { name: name.into() })
        };

        for line_config in config.lines {
            let line = state.create_line(
                line_config.name,
                line_config.color,
                lookup(&line_config.up_station)?,
                lookup(&line_config.down_station)?,
                line_config.distance,
            )?;
            let line_id = line.id;
            for section in line_config.sections {
                state.add_section(
                    line_id,
                    lookup(&section.up_station)?,
                    lookup(&section.down_station)?,
                    section.distance,
                )?;
            }
        }

        tracing::info!(
            "Loaded {} stations and {} lines",
            state.stations.len(),
            state.lines.len()
        );
        Ok(state)
    }

    pub fn create_station(&mut self, name: impl Into<String>) -> Station {
        let station = Station::new(self.next_station_id, name);
        self.next_station_id += 1;
        tracing::info!("Creating station {} ({})", station.id, station.name);
        self.stations.insert(station.id, station.clone());
        station
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn station(&self, station_id: StationId) -> Result<&Station, SubwayError> {
        self.stations
            .get(&station_id)
            .ok_or(SubwayError::StationNotFound { station_id })
    }

    /// Delete a station that no line goes through.
    pub fn delete_station(&mut self, station_id: StationId) -> Result<(), SubwayError> {
        tracing::info!("Deleting station {}", station_id);
        self.station(station_id)?;
        if let Some(line) = self.lines.values().find(|line| line.has_station(station_id)) {
            return Err(SubwayError::StationInUse {
                station_id,
                line_id: line.id,
            });
        }
        self.stations.remove(&station_id);
        Ok(())
    }

    pub fn create_line(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<&Line, SubwayError> {
        let first_section = Segment::new(
            self.station(up_station_id)?.clone(),
            self.station(down_station_id)?.clone(),
            distance,
        )?;
        let line = Line::new(self.next_line_id, name, color, first_section)?;
        self.next_line_id += 1;

        tracing::info!("Creating line {} ({})", line.id, line.name);
        let line_id = line.id;
        self.lines.insert(line_id, line);
        self.line(line_id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn line(&self, line_id: LineId) -> Result<&Line, SubwayError> {
        self.lines
            .get(&line_id)
            .ok_or(SubwayError::LineNotFound { line_id })
    }

    fn line_mut(&mut self, line_id: LineId) -> Result<&mut Line, SubwayError> {
        self.lines
            .get_mut(&line_id)
            .ok_or(SubwayError::LineNotFound { line_id })
    }

    pub fn update_line(
        &mut self,
        line_id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<&Line, SubwayError> {
        tracing::info!("Updating line {}", line_id);
        self.line_mut(line_id)?.update(name, color);
        self.line(line_id)
    }

    /// Delete a line together with all of its sections.
    pub fn delete_line(&mut self, line_id: LineId) -> Result<(), SubwayError> {
        let mut line = self
            .lines
            .remove(&line_id)
            .ok_or(SubwayError::LineNotFound { line_id })?;
        let detached = line.detach_sections();
        tracing::info!("Deleted line {} and its {} sections", line_id, detached.len());
        Ok(())
    }

    pub fn add_section(
        &mut self,
        line_id: LineId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<&Line, SubwayError> {
        tracing::info!(
            "Adding section {} -> {} ({}) to line {}",
            up_station_id,
            down_station_id,
            distance,
            line_id
        );
        let section = Segment::new(
            self.station(up_station_id)?.clone(),
            self.station(down_station_id)?.clone(),
            distance,
        )?;
        self.line_mut(line_id)?.add_section(section)?;
        self.line(line_id)
    }

    pub fn remove_section(
        &mut self,
        line_id: LineId,
        station_id: StationId,
    ) -> Result<&Line, SubwayError> {
        tracing::info!("Removing station {} from line {}", station_id, line_id);
        let station = self.station(station_id)?.clone();
        self.line_mut(line_id)?.remove_section(&station)?;
        self.line(line_id)
    }
}
