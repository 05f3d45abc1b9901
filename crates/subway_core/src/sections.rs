use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Segment, SectionError, Station, StationId};

/// The segments of one line.
///
/// Storage order is insertion order and says nothing about the order of the
/// stations: head extensions and splits append at the end. The station
/// sequence is always rebuilt by walking from the up-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sections {
    sections: Vec<Segment>,
}

impl Sections {
    pub fn new() -> Self {
        Sections::default()
    }

    pub fn size(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.sections.iter()
    }

    /// Insert a segment at the down end, at the up end, or by splitting the
    /// segment that shares its up-station.
    ///
    /// Nothing is modified when an error is returned.
    pub fn add(&mut self, new_section: Segment) -> Result<(), SectionError> {
        self.validate_new_section(&new_section)?;

        if self.sections.is_empty() {
            tracing::debug!("Adding first section {}", new_section.segment_id);
            self.sections.push(new_section);
            return Ok(());
        }

        if self.down_end_station()?.id == new_section.up_station.id {
            tracing::debug!("Extending line down to station {}", new_section.down_station.id);
            self.sections.push(new_section);
            return Ok(());
        }

        if self.up_end_station()?.id == new_section.down_station.id {
            tracing::debug!("Extending line up to station {}", new_section.up_station.id);
            self.sections.push(new_section);
            return Ok(());
        }

        if let Some(index) = self
            .sections
            .iter()
            .position(|section| section.is_up_station(new_section.up_station.id))
        {
            let existing = &mut self.sections[index];
            if new_section.distance >= existing.distance {
                return Err(SectionError::DistanceTooLong {
                    distance: new_section.distance,
                    existing_distance: existing.distance,
                });
            }
            tracing::debug!(
                "Splitting section {} at station {}",
                existing.segment_id,
                new_section.down_station.id
            );
            existing.up_station = new_section.down_station.clone();
            existing.distance -= new_section.distance;
            self.sections.push(new_section);
            return Ok(());
        }

        Err(SectionError::InvalidPlacement {
            up_station_id: new_section.up_station.id,
            down_station_id: new_section.down_station.id,
        })
    }

    /// Return the stations of the line, from the up-end to the down-end.
    pub fn stations(&self) -> Result<Vec<Station>, SectionError> {
        let up_end = self.up_end_station()?;
        let next_hops: HashMap<StationId, &Segment> = self
            .sections
            .iter()
            .map(|section| (section.up_station.id, section))
            .collect();

        let mut stations = Vec::with_capacity(self.sections.len() + 1);
        stations.push(up_end.clone());
        let mut current = up_end;
        while let Some(section) = next_hops.get(&current.id) {
            // A walk longer than the chain means the segments loop back.
            if stations.len() > self.sections.len() {
                return Err(SectionError::IllegalState);
            }
            current = &section.down_station;
            stations.push(current.clone());
        }

        if stations.len() != self.sections.len() + 1 {
            return Err(SectionError::IllegalState);
        }
        Ok(stations)
    }

    /// Remove the last stored segment, provided it ends at `station` and
    /// `station` is the down-end of the line.
    pub fn remove_last_section(&mut self, station: &Station) -> Result<(), SectionError> {
        let Some(last) = self.sections.last() else {
            return Err(SectionError::InvalidTailRemoval {
                station_id: station.id,
            });
        };
        if !last.is_down_station(station.id) || self.down_end_station()?.id != station.id {
            return Err(SectionError::InvalidTailRemoval {
                station_id: station.id,
            });
        }

        tracing::debug!("Removing last section ending at station {}", station.id);
        self.sections.pop();
        Ok(())
    }

    /// Detach the given segments, whatever their position. Returns the
    /// detached segments.
    pub fn remove(&mut self, segment_ids: &[uuid::Uuid]) -> Vec<Segment> {
        let (removed, kept): (Vec<Segment>, Vec<Segment>) = std::mem::take(&mut self.sections)
            .into_iter()
            .partition(|section| segment_ids.contains(&section.segment_id));
        self.sections = kept;
        removed
    }

    /// The unique station that is never a down-station.
    pub fn up_end_station(&self) -> Result<&Station, SectionError> {
        let down_stations: HashSet<StationId> = self
            .sections
            .iter()
            .map(|section| section.down_station.id)
            .collect();
        Self::single_end(
            self.sections
                .iter()
                .map(|section| &section.up_station)
                .filter(|station| !down_stations.contains(&station.id)),
        )
    }

    /// The unique station that is never an up-station.
    pub fn down_end_station(&self) -> Result<&Station, SectionError> {
        let up_stations: HashSet<StationId> = self
            .sections
            .iter()
            .map(|section| section.up_station.id)
            .collect();
        Self::single_end(
            self.sections
                .iter()
                .map(|section| &section.down_station)
                .filter(|station| !up_stations.contains(&station.id)),
        )
    }

    fn single_end<'a>(
        mut candidates: impl Iterator<Item = &'a Station>,
    ) -> Result<&'a Station, SectionError> {
        let end = candidates.next().ok_or(SectionError::IllegalState)?;
        if candidates.any(|station| station.id != end.id) {
            return Err(SectionError::IllegalState);
        }
        Ok(end)
    }

    fn station_ids(&self) -> HashSet<StationId> {
        self.sections
            .iter()
            .flat_map(|section| [section.up_station.id, section.down_station.id])
            .collect()
    }

    fn validate_new_section(&self, new_section: &Segment) -> Result<(), SectionError> {
        let station_ids = self.station_ids();
        let has_up = station_ids.contains(&new_section.up_station.id);
        let has_down = station_ids.contains(&new_section.down_station.id);

        if has_up && has_down {
            return Err(SectionError::DuplicateEndpoints {
                up_station_id: new_section.up_station.id,
                down_station_id: new_section.down_station.id,
            });
        }
        if !self.sections.is_empty() && !has_up && !has_down {
            return Err(SectionError::DisconnectedEndpoints {
                up_station_id: new_section.up_station.id,
                down_station_id: new_section.down_station.id,
            });
        }
        Ok(())
    }
}
