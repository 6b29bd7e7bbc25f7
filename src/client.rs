use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::error::Error;
use crate::filter::{
    CarDataFilter, DriverFilter, IntervalFilter, LapFilter, LocationFilter, MeetingFilter,
    PitFilter, PositionFilter, RaceControlFilter, SessionFilter, StintFilter, TeamRadioFilter,
    WeatherFilter,
};
use crate::query::{FetchThunk, QueryClient, QueryKey, QueryOptions, QueryResult, QueryRunner};
use crate::types::{
    CarData, Driver, Endpoint, Interval, Lap, Location, Meeting, Pit, Position, RaceControl,
    Session, Stint, TeamRadio, Weather,
};

/// Entry point for the library: one accessor per OpenF1 resource, all
/// backed by the same generic fetch-through-cache path.
pub struct OpenF1 {
    api: ApiClient,
    runner: Arc<dyn QueryRunner>,
}

impl Default for OpenF1 {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenF1 {
    pub fn new() -> Self {
        Self::with_api_client(ApiClient::new())
    }

    pub fn with_api_client(api: ApiClient) -> Self {
        Self {
            api,
            runner: Arc::new(QueryClient::new()),
        }
    }

    /// Swaps the managed-query backend, e.g. for a runner with a different
    /// caching or refetch policy.
    pub fn with_runner(api: ApiClient, runner: Arc<dyn QueryRunner>) -> Self {
        Self { api, runner }
    }

    /// The one fetch path every accessor goes through: cache key from the
    /// filter, a thunk closed over this resource's path and parameters,
    /// execution delegated to the query runner, then a typed decode of the
    /// raw JSON it hands back.
    async fn resource<E: Endpoint>(
        &self,
        filter: &E::Filter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<E>> {
        let key = QueryKey::new(E::RESOURCE, filter);
        let api = self.api.clone();
        let filter = filter.clone();
        let thunk: FetchThunk = Box::new(move || {
            let api = api.clone();
            let filter = filter.clone();
            Box::pin(async move { api.fetch_value(E::RESOURCE, &filter).await })
        });

        match self.runner.run(key, thunk, options).await {
            QueryResult::Success(value) => match serde_json::from_value(value) {
                Ok(records) => QueryResult::Success(records),
                Err(e) => QueryResult::Error(Error::Json(e)),
            },
            QueryResult::Error(e) => QueryResult::Error(e),
            QueryResult::Pending => QueryResult::Pending,
        }
    }

    pub async fn car_data(
        &self,
        filter: &CarDataFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<CarData>> {
        self.resource::<CarData>(filter, options).await
    }

    pub async fn drivers(
        &self,
        filter: &DriverFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Driver>> {
        self.resource::<Driver>(filter, options).await
    }

    pub async fn intervals(
        &self,
        filter: &IntervalFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Interval>> {
        self.resource::<Interval>(filter, options).await
    }

    pub async fn laps(
        &self,
        filter: &LapFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Lap>> {
        self.resource::<Lap>(filter, options).await
    }

    pub async fn location(
        &self,
        filter: &LocationFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Location>> {
        self.resource::<Location>(filter, options).await
    }

    pub async fn meetings(
        &self,
        filter: &MeetingFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Meeting>> {
        self.resource::<Meeting>(filter, options).await
    }

    pub async fn pit(
        &self,
        filter: &PitFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Pit>> {
        self.resource::<Pit>(filter, options).await
    }

    pub async fn position(
        &self,
        filter: &PositionFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Position>> {
        self.resource::<Position>(filter, options).await
    }

    pub async fn race_control(
        &self,
        filter: &RaceControlFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<RaceControl>> {
        self.resource::<RaceControl>(filter, options).await
    }

    pub async fn sessions(
        &self,
        filter: &SessionFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Session>> {
        self.resource::<Session>(filter, options).await
    }

    pub async fn stints(
        &self,
        filter: &StintFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Stint>> {
        self.resource::<Stint>(filter, options).await
    }

    pub async fn team_radio(
        &self,
        filter: &TeamRadioFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<TeamRadio>> {
        self.resource::<TeamRadio>(filter, options).await
    }

    pub async fn weather(
        &self,
        filter: &WeatherFilter,
        options: &QueryOptions,
    ) -> QueryResult<Vec<Weather>> {
        self.resource::<Weather>(filter, options).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::KeySelector;
    use std::time::Duration;

    #[tokio::test]
    async fn accessors_decode_records_through_the_query_layer() {
        let mut server = mockito::Server::new_async().await;
        let client = OpenF1::with_api_client(ApiClient::with_base_url(server.url()));

        let json = r#"
            [
              {
                "broadcast_name": "M VERSTAPPEN",
                "country_code": "NED",
                "driver_number": 1,
                "first_name": "Max",
                "full_name": "Max VERSTAPPEN",
                "headshot_url": "https://example.com/max.png",
                "last_name": "Verstappen",
                "meeting_key": 1219,
                "name_acronym": "VER",
                "session_key": 9158,
                "team_colour": "3671C6",
                "team_name": "Red Bull Racing"
              }
            ]
        "#;

        let mock = server
            .mock("GET", "/drivers")
            .match_query(mockito::Matcher::Exact("session_key=latest".to_owned()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json)
            .create_async()
            .await;

        let filter = DriverFilter {
            session_key: Some(KeySelector::Latest),
            ..Default::default()
        };
        let result = client.drivers(&filter, &QueryOptions::default()).await;
        mock.assert_async().await;

        assert_eq!(
            result.ok().unwrap(),
            vec![Driver {
                broadcast_name: "M VERSTAPPEN".to_owned(),
                country_code: "NED".to_owned(),
                driver_number: 1,
                first_name: "Max".to_owned(),
                full_name: "Max VERSTAPPEN".to_owned(),
                headshot_url: "https://example.com/max.png".to_owned(),
                last_name: "Verstappen".to_owned(),
                meeting_key: 1219,
                name_acronym: "VER".to_owned(),
                session_key: 9158,
                team_colour: "3671C6".to_owned(),
                team_name: "Red Bull Racing".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn identical_calls_share_one_cache_entry() {
        let mut server = mockito::Server::new_async().await;
        let client = OpenF1::with_api_client(ApiClient::with_base_url(server.url()));

        let mock = server
            .mock("GET", "/laps")
            .match_query(mockito::Matcher::Exact("driver_number=44".to_owned()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let filter = LapFilter {
            driver_number: Some(44),
            ..Default::default()
        };
        let options = QueryOptions {
            stale_time: Duration::from_secs(60),
            retries: 0,
            ..Default::default()
        };

        let first = client.laps(&filter, &options).await;
        let second = client.laps(&filter, &options).await;
        mock.assert_async().await;

        assert!(first.is_success());
        assert!(second.is_success());
    }

    #[tokio::test]
    async fn api_errors_reach_the_caller_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let client = OpenF1::with_api_client(ApiClient::with_base_url(server.url()));

        let _mock = server
            .mock("GET", "/sessions")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "session not found"}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let options = QueryOptions {
            retries: 0,
            ..Default::default()
        };
        let result = client
            .sessions(&Default::default(), &options)
            .await;

        assert_eq!(result.error().unwrap().to_string(), "session not found");
    }
}
