use std::fmt;

use serde::{Deserialize, Serialize};

/// Flight status. `Unknown` until oracle consensus resolves it, then exactly
/// one terminal value forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlightStatus {
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl Default for FlightStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    /// Wire code used by oracles.
    pub fn code(self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    /// Any terminal status other than `OnTime` entitles insurees to a payout.
    pub fn is_late(self) -> bool {
        matches!(
            self,
            FlightStatus::LateAirline
                | FlightStatus::LateWeather
                | FlightStatus::LateTechnical
                | FlightStatus::LateOther
        )
    }

    pub fn is_terminal(self) -> bool {
        self != FlightStatus::Unknown
    }
}

impl TryFrom<u8> for FlightStatus {
    type Error = ();

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        FlightStatus::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(())
    }
}

impl From<FlightStatus> for u8 {
    fn from(s: FlightStatus) -> Self {
        s.code()
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightStatus::Unknown => "Unknown",
            FlightStatus::OnTime => "OnTime",
            FlightStatus::LateAirline => "LateAirline",
            FlightStatus::LateWeather => "LateWeather",
            FlightStatus::LateTechnical => "LateTechnical",
            FlightStatus::LateOther => "LateOther",
        };
        write!(f, "{}", s)
    }
}
