use clap::Parser;

use openf1::{
    DriverFilter, KeySelector, LapFilter, MeetingFilter, OpenF1, QueryOptions, QueryResult,
    SessionFilter, WeatherFilter,
};

#[derive(Parser, Debug)]
pub enum Cmd {
    /// List race weekends, optionally narrowed to a season.
    Meetings {
        #[arg(long)]
        year: Option<u32>,
    },
    /// List sessions, optionally narrowed by year and country.
    Sessions {
        #[arg(long)]
        year: Option<u32>,
        #[arg(long)]
        country: Option<String>,
    },
    /// List the drivers entered in a session.
    Drivers {
        #[arg(long, default_value = "latest")]
        session: KeySelector,
    },
    /// Lap times for one driver in a session.
    Laps {
        #[arg(long, default_value = "latest")]
        session: KeySelector,
        #[arg(long)]
        driver: u32,
    },
    /// Weather samples for a session.
    Weather {
        #[arg(long, default_value = "latest")]
        session: KeySelector,
    },
}

fn unwrap_query<T>(result: QueryResult<T>) -> anyhow::Result<T> {
    match result {
        QueryResult::Success(data) => Ok(data),
        QueryResult::Error(e) => Err(e.into()),
        QueryResult::Pending => anyhow::bail!("query did not run"),
    }
}

impl Cmd {
    pub async fn run(self) -> anyhow::Result<()> {
        let client = OpenF1::new();
        let options = QueryOptions::default();

        match self {
            Cmd::Meetings { year } => {
                let filter = MeetingFilter {
                    year,
                    ..Default::default()
                };
                let meetings = unwrap_query(client.meetings(&filter, &options).await)?;
                println!("Year | Circuit | Meeting");
                for m in meetings {
                    println!(" {} | {} | {}", m.year, m.circuit_short_name, m.meeting_name);
                }
            }
            Cmd::Sessions { year, country } => {
                let filter = SessionFilter {
                    year,
                    country_name: country,
                    ..Default::default()
                };
                let sessions = unwrap_query(client.sessions(&filter, &options).await)?;
                println!("Key | Session | Location | Starts");
                for s in sessions {
                    println!(
                        " {} | {} | {} | {}",
                        s.session_key, s.session_name, s.location, s.date_start
                    );
                }
            }
            Cmd::Drivers { session } => {
                let filter = DriverFilter {
                    session_key: Some(session),
                    ..Default::default()
                };
                let drivers = unwrap_query(client.drivers(&filter, &options).await)?;
                println!("No. | Code | Driver | Team");
                for d in drivers {
                    println!(
                        " {} | {} | {} | {}",
                        d.driver_number, d.name_acronym, d.full_name, d.team_name
                    );
                }
            }
            Cmd::Laps { session, driver } => {
                let filter = LapFilter {
                    session_key: Some(session),
                    driver_number: Some(driver),
                    ..Default::default()
                };
                let laps = unwrap_query(client.laps(&filter, &options).await)?;
                println!("Lap | Time | Pit out");
                for lap in laps {
                    let time = lap
                        .lap_duration
                        .map(|d| format!("{d:.3}"))
                        .unwrap_or_else(|| "-".to_owned());
                    println!(" {} | {} | {}", lap.lap_number, time, lap.is_pit_out_lap);
                }
            }
            Cmd::Weather { session } => {
                let filter = WeatherFilter {
                    session_key: Some(session),
                    ..Default::default()
                };
                let samples = unwrap_query(client.weather(&filter, &options).await)?;
                println!("Time | Air | Track | Rain");
                for w in samples {
                    println!(
                        " {} | {} | {} | {}",
                        w.date, w.air_temperature, w.track_temperature, w.rainfall
                    );
                }
            }
        }

        Ok(())
    }
}
