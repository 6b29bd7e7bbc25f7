//! Typed Rust client for the [OpenF1](https://openf1.org) motorsport
//! telemetry API.
//!
//! One accessor per API resource, each pairing a deterministic cache key
//! with a fetch through a managed-query layer (staleness window, retry,
//! enablement). Caching policy lives behind the [`QueryRunner`] trait;
//! [`QueryClient`] is the built-in in-memory implementation.
//!
//! ```rust,no_run
//! use openf1::{KeySelector, LapFilter, OpenF1, QueryOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = OpenF1::new();
//!     let filter = LapFilter {
//!         session_key: Some(KeySelector::Latest),
//!         driver_number: Some(1),
//!         ..Default::default()
//!     };
//!     let laps = client.laps(&filter, &QueryOptions::default()).await;
//!     for lap in laps.data().into_iter().flatten() {
//!         println!("lap {}: {:?}", lap.lap_number, lap.lap_duration);
//!     }
//! }
//! ```

pub mod api_client;
pub mod client;
pub mod error;
pub mod filter;
pub mod query;
pub mod types;

pub use api_client::{ApiClient, API_BASE_URL};
pub use client::OpenF1;
pub use error::Error;
pub use filter::{
    CarDataFilter, Compare, Comparison, DriverFilter, Filter, IntervalFilter, KeySelector,
    LapFilter, LocationFilter, MeetingFilter, PitFilter, PositionFilter, RaceControlFilter,
    SessionFilter, StintFilter, TeamRadioFilter, ToParam, WeatherFilter,
};
pub use query::{
    FetchFuture, FetchThunk, QueryClient, QueryKey, QueryOptions, QueryResult, QueryRunner,
};
pub use types::{
    CarData, Driver, Endpoint, Gap, Interval, Lap, Location, Meeting, Pit, Position, RaceControl,
    Session, Stint, TeamRadio, Weather,
};
