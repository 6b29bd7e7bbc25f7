use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::filter::{
    CarDataFilter, DriverFilter, Filter, IntervalFilter, LapFilter, LocationFilter, MeetingFilter,
    PitFilter, PositionFilter, RaceControlFilter, SessionFilter, StintFilter, TeamRadioFilter,
    WeatherFilter,
};

/// Ties a response record to its API resource and filter type. One
/// implementation per endpoint; the generic accessor on
/// [`OpenF1`](crate::OpenF1) is instantiated over these.
pub trait Endpoint: DeserializeOwned + Send + 'static {
    /// Path segment and cache-key resource name, e.g. `car_data`.
    const RESOURCE: &'static str;
    type Filter: Filter + Clone + Send + Sync + 'static;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarData {
    pub brake: u32,
    pub date: String,
    pub driver_number: u32,
    pub drs: u32,
    pub meeting_key: u32,
    pub n_gear: u32,
    pub rpm: u32,
    pub session_key: u32,
    pub speed: u32,
    pub throttle: u32,
}

impl Endpoint for CarData {
    const RESOURCE: &'static str = "car_data";
    type Filter = CarDataFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub broadcast_name: String,
    pub country_code: String,
    pub driver_number: u32,
    pub first_name: String,
    pub full_name: String,
    pub headshot_url: String,
    pub last_name: String,
    pub meeting_key: u32,
    pub name_acronym: String,
    pub session_key: u32,
    pub team_colour: String,
    pub team_name: String,
}

impl Endpoint for Driver {
    const RESOURCE: &'static str = "drivers";
    type Filter = DriverFilter;
}

/// A gap value from the `intervals` endpoint: seconds, or text such as
/// `+1 LAP` when the driver is lapped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gap {
    Seconds(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub date: String,
    pub driver_number: u32,
    pub gap_to_leader: Option<Gap>,
    pub interval: Option<Gap>,
    pub meeting_key: u32,
    pub session_key: u32,
}

impl Endpoint for Interval {
    const RESOURCE: &'static str = "intervals";
    type Filter = IntervalFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub date_start: String,
    pub driver_number: u32,
    pub duration_sector_1: Option<f64>,
    pub duration_sector_2: Option<f64>,
    pub duration_sector_3: Option<f64>,
    pub i1_speed: Option<u32>,
    pub i2_speed: Option<u32>,
    pub is_pit_out_lap: bool,
    pub lap_duration: Option<f64>,
    pub lap_number: u32,
    pub meeting_key: u32,
    pub segments_sector_1: Vec<u32>,
    pub segments_sector_2: Vec<u32>,
    pub segments_sector_3: Vec<u32>,
    pub session_key: u32,
    pub st_speed: Option<u32>,
}

impl Endpoint for Lap {
    const RESOURCE: &'static str = "laps";
    type Filter = LapFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub date: String,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub session_key: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Endpoint for Location {
    const RESOURCE: &'static str = "location";
    type Filter = LocationFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub circuit_key: u32,
    pub circuit_short_name: String,
    pub country_code: String,
    pub country_key: u32,
    pub country_name: String,
    pub date_start: String,
    pub gmt_offset: String,
    pub location: String,
    pub meeting_key: u32,
    pub meeting_name: String,
    pub meeting_official_name: String,
    pub year: u32,
}

impl Endpoint for Meeting {
    const RESOURCE: &'static str = "meetings";
    type Filter = MeetingFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    pub date: String,
    pub driver_number: u32,
    pub lap_number: u32,
    pub meeting_key: u32,
    pub pit_duration: f64,
    pub session_key: u32,
}

impl Endpoint for Pit {
    const RESOURCE: &'static str = "pit";
    type Filter = PitFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub date: String,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub position: u32,
    pub session_key: u32,
}

impl Endpoint for Position {
    const RESOURCE: &'static str = "position";
    type Filter = PositionFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceControl {
    pub category: String,
    pub date: String,
    pub driver_number: Option<u32>,
    pub flag: Option<String>,
    pub lap_number: Option<u32>,
    pub meeting_key: u32,
    pub message: String,
    pub scope: String,
    pub sector: Option<u32>,
    pub session_key: u32,
}

impl Endpoint for RaceControl {
    const RESOURCE: &'static str = "race_control";
    type Filter = RaceControlFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub circuit_key: u32,
    pub circuit_short_name: String,
    pub country_code: String,
    pub country_key: u32,
    pub country_name: String,
    pub date_end: String,
    pub date_start: String,
    pub gmt_offset: String,
    pub location: String,
    pub meeting_key: u32,
    pub session_key: u32,
    pub session_name: String,
    pub session_type: String,
    pub year: u32,
}

impl Endpoint for Session {
    const RESOURCE: &'static str = "sessions";
    type Filter = SessionFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    pub compound: String,
    pub driver_number: u32,
    pub lap_end: u32,
    pub lap_start: u32,
    pub meeting_key: u32,
    pub session_key: u32,
    pub stint_number: u32,
    pub tyre_age_at_start: u32,
}

impl Endpoint for Stint {
    const RESOURCE: &'static str = "stints";
    type Filter = StintFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRadio {
    pub date: String,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub recording_url: String,
    pub session_key: u32,
}

impl Endpoint for TeamRadio {
    const RESOURCE: &'static str = "team_radio";
    type Filter = TeamRadioFilter;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub air_temperature: f64,
    pub date: String,
    pub humidity: f64,
    pub meeting_key: u32,
    pub pressure: f64,
    pub rainfall: u32,
    pub session_key: u32,
    pub track_temperature: f64,
    pub wind_direction: u32,
    pub wind_speed: f64,
}

impl Endpoint for Weather {
    const RESOURCE: &'static str = "weather";
    type Filter = WeatherFilter;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gap_decodes_seconds_lap_text_and_null() {
        let json = r#"
            {
              "date": "2023-09-17T13:31:02.000000+00:00",
              "driver_number": 14,
              "gap_to_leader": 41.019,
              "interval": "+1 LAP",
              "meeting_key": 1219,
              "session_key": 9165
            }
        "#;

        let interval: Interval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.gap_to_leader, Some(Gap::Seconds(41.019)));
        assert_eq!(interval.interval, Some(Gap::Text("+1 LAP".to_owned())));

        let leader = r#"
            {
              "date": "2023-09-17T13:31:02.000000+00:00",
              "driver_number": 1,
              "gap_to_leader": null,
              "interval": null,
              "meeting_key": 1219,
              "session_key": 9165
            }
        "#;

        let interval: Interval = serde_json::from_str(leader).unwrap();
        assert_eq!(interval.gap_to_leader, None);
        assert_eq!(interval.interval, None);
    }

    #[test]
    fn lap_decodes_with_null_sector_times() {
        let json = r#"
            {
              "date_start": "2023-09-16T13:59:07.606000+00:00",
              "driver_number": 63,
              "duration_sector_1": null,
              "duration_sector_2": 35.173,
              "duration_sector_3": 28.155,
              "i1_speed": 307,
              "i2_speed": 277,
              "is_pit_out_lap": false,
              "lap_duration": null,
              "lap_number": 1,
              "meeting_key": 1219,
              "segments_sector_1": [2049, 2049, 2049],
              "segments_sector_2": [2049, 2048, 2048],
              "segments_sector_3": [2048, 2048, 2064],
              "session_key": 9161,
              "st_speed": 298
            }
        "#;

        let lap: Lap = serde_json::from_str(json).unwrap();
        assert_eq!(lap.duration_sector_1, None);
        assert_eq!(lap.duration_sector_2, Some(35.173));
        assert_eq!(lap.segments_sector_3, vec![2048, 2048, 2064]);
        assert!(!lap.is_pit_out_lap);
    }
}
