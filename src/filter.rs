use std::num::ParseIntError;
use std::str::FromStr;

/// String coercion for filter values as they appear in the query string.
pub trait ToParam {
    fn to_param(&self) -> String;
}

impl ToParam for u32 {
    fn to_param(&self) -> String {
        self.to_string()
    }
}

impl ToParam for f64 {
    fn to_param(&self) -> String {
        self.to_string()
    }
}

impl ToParam for String {
    fn to_param(&self) -> String {
        self.clone()
    }
}

impl ToParam for &str {
    fn to_param(&self) -> String {
        (*self).to_owned()
    }
}

/// A `session_key`/`meeting_key` filter value: a concrete key, or the API's
/// literal `latest` token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySelector {
    Latest,
    Key(u32),
}

impl ToParam for KeySelector {
    fn to_param(&self) -> String {
        match self {
            KeySelector::Latest => "latest".to_owned(),
            KeySelector::Key(key) => key.to_string(),
        }
    }
}

impl From<u32> for KeySelector {
    fn from(key: u32) -> Self {
        KeySelector::Key(key)
    }
}

impl FromStr for KeySelector {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            Ok(KeySelector::Latest)
        } else {
            s.parse().map(KeySelector::Key)
        }
    }
}

/// Comparison operators the API accepts as a suffix on a filter field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compare {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Compare {
    pub fn symbol(self) -> &'static str {
        match self {
            Compare::Gt => ">",
            Compare::Gte => ">=",
            Compare::Lt => "<",
            Compare::Lte => "<=",
        }
    }
}

/// One operator-suffixed filter such as `speed>=315` or `date<2023-09-16`,
/// encoded as a (`field{op}`, value) query pair — the API's convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub field: String,
    pub op: Compare,
    pub value: String,
}

impl Comparison {
    pub fn new(field: impl Into<String>, op: Compare, value: impl ToParam) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.to_param(),
        }
    }
}

/// Accumulates (name, value) query pairs, skipping unset fields.
#[derive(Default)]
pub struct Pairs(Vec<(String, String)>);

impl Pairs {
    pub fn field<V: ToParam>(&mut self, name: &str, value: &Option<V>) {
        if let Some(v) = value {
            self.0.push((name.to_owned(), v.to_param()));
        }
    }

    pub fn compare(&mut self, comparisons: &[Comparison]) {
        for c in comparisons {
            self.0
                .push((format!("{}{}", c.field, c.op.symbol()), c.value.clone()));
        }
    }

    pub fn finish(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Flattens a typed filter into query pairs, in declaration order. Unset
/// fields never appear; present values, including zero, are encoded in
/// their string form.
pub trait Filter {
    fn pairs(&self) -> Vec<(String, String)>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarDataFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for CarDataFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DriverFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for DriverFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for IntervalFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LapFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for LapFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("lap_number", &self.lap_number);
        p.compare(&self.compare);
        p.finish()
    }
}

/// Date-range narrowing (`date>=…`, `date<…`) goes through `compare`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub date: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for LocationFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("date", &self.date);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeetingFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub year: Option<u32>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub circuit_key: Option<u32>,
    pub circuit_short_name: Option<String>,
    pub meeting_name: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for MeetingFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("year", &self.year);
        p.field("country_name", &self.country_name);
        p.field("country_code", &self.country_code);
        p.field("circuit_key", &self.circuit_key);
        p.field("circuit_short_name", &self.circuit_short_name);
        p.field("meeting_name", &self.meeting_name);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PitFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub pit_duration: Option<f64>,
    pub compare: Vec<Comparison>,
}

impl Filter for PitFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("lap_number", &self.lap_number);
        p.field("pit_duration", &self.pit_duration);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub position: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for PositionFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("position", &self.position);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RaceControlFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub lap_number: Option<u32>,
    pub scope: Option<String>,
    pub sector: Option<u32>,
    pub date: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for RaceControlFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("category", &self.category);
        p.field("flag", &self.flag);
        p.field("lap_number", &self.lap_number);
        p.field("scope", &self.scope);
        p.field("sector", &self.sector);
        p.field("date", &self.date);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub year: Option<u32>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub circuit_key: Option<u32>,
    pub circuit_short_name: Option<String>,
    pub location: Option<String>,
    pub session_name: Option<String>,
    pub session_type: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for SessionFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("year", &self.year);
        p.field("country_name", &self.country_name);
        p.field("country_code", &self.country_code);
        p.field("circuit_key", &self.circuit_key);
        p.field("circuit_short_name", &self.circuit_short_name);
        p.field("location", &self.location);
        p.field("session_name", &self.session_name);
        p.field("session_type", &self.session_type);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StintFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub compound: Option<String>,
    pub lap_start: Option<u32>,
    pub lap_end: Option<u32>,
    pub stint_number: Option<u32>,
    pub tyre_age_at_start: Option<u32>,
    pub compare: Vec<Comparison>,
}

impl Filter for StintFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("compound", &self.compound);
        p.field("lap_start", &self.lap_start);
        p.field("lap_end", &self.lap_end);
        p.field("stint_number", &self.stint_number);
        p.field("tyre_age_at_start", &self.tyre_age_at_start);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamRadioFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub date: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for TeamRadioFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("date", &self.date);
        p.compare(&self.compare);
        p.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherFilter {
    pub session_key: Option<KeySelector>,
    pub meeting_key: Option<KeySelector>,
    pub driver_number: Option<u32>,
    pub air_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub rainfall: Option<u32>,
    pub track_temperature: Option<f64>,
    pub wind_direction: Option<u32>,
    pub wind_speed: Option<f64>,
    pub date: Option<String>,
    pub compare: Vec<Comparison>,
}

impl Filter for WeatherFilter {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut p = Pairs::default();
        p.field("session_key", &self.session_key);
        p.field("meeting_key", &self.meeting_key);
        p.field("driver_number", &self.driver_number);
        p.field("air_temperature", &self.air_temperature);
        p.field("humidity", &self.humidity);
        p.field("pressure", &self.pressure);
        p.field("rainfall", &self.rainfall);
        p.field("track_temperature", &self.track_temperature);
        p.field("wind_direction", &self.wind_direction);
        p.field("wind_speed", &self.wind_speed);
        p.field("date", &self.date);
        p.compare(&self.compare);
        p.finish()
    }
}
