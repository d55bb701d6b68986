use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A geocoded search candidate, as returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
}

impl GeoLocation {
    /// "Name, Country", the form a city is remembered in.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

/// One weather condition descriptor (`weather[]` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: i32,
    /// Absent on the wire means absent here, not zero.
    #[serde(default)]
    pub sea_level: Option<i32>,
    #[serde(default)]
    pub grnd_level: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: i32,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    #[serde(rename = "type", default)]
    pub kind: Option<i32>,
    #[serde(default)]
    pub id: Option<i64>,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current-conditions snapshot for one location. Replaced wholesale on each fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: MainReadings,
    pub visibility: i32,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt: i64,
    pub sys: Sun,
    pub timezone: i32,
    pub id: i64,
    pub name: String,
    pub cod: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub sea_level: i32,
    pub grnd_level: i32,
    pub humidity: i32,
    pub temp_kf: f64,
}

/// Precipitation accumulated over the last 3 hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accumulation {
    #[serde(rename = "3h", default)]
    pub three_hour: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSys {
    /// Part of day: "d" or "n".
    pub pod: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastReadings,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    pub visibility: i32,
    /// Probability of precipitation, 0..=1.
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<Accumulation>,
    #[serde(default)]
    pub snow: Option<Accumulation>,
    pub sys: ForecastSys,
    pub dt_txt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub id: i64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
    pub population: i64,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

/// 3-hour step forecast document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub cod: String,
    pub message: i32,
    pub cnt: i32,
    pub list: Vec<ForecastItem>,
    pub city: CityInfo,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn lagos() -> GeoLocation {
        GeoLocation {
            name: "Lagos".to_string(),
            lat: 6.52,
            lon: 3.38,
            country: "NG".to_string(),
            state: Some("Lagos".to_string()),
            local_names: None,
        }
    }

    pub fn current(temp: f64, humidity: i32, wind_speed: f64) -> CurrentConditions {
        CurrentConditions {
            coord: Coord { lon: 3.38, lat: 6.52 },
            weather: vec![Condition {
                id: 803,
                main: "Clouds".to_string(),
                description: "broken clouds".to_string(),
                icon: "04d".to_string(),
            }],
            base: "stations".to_string(),
            main: MainReadings {
                temp,
                feels_like: temp,
                temp_min: temp - 1.0,
                temp_max: temp + 1.0,
                pressure: 1012,
                humidity,
                sea_level: None,
                grnd_level: None,
            },
            visibility: 10000,
            wind: Wind { speed: wind_speed, deg: 200, gust: None },
            clouds: Clouds { all: 75 },
            dt: 1_700_000_000,
            sys: Sun {
                kind: None,
                id: None,
                country: "NG".to_string(),
                sunrise: 1_699_940_000,
                sunset: 1_699_983_000,
            },
            timezone: 3600,
            id: 2332459,
            name: "Lagos".to_string(),
            cod: 200,
        }
    }

    pub fn item(dt: i64, temp: f64, pop: f64) -> ForecastItem {
        ForecastItem {
            dt,
            main: ForecastReadings {
                temp,
                feels_like: temp,
                temp_min: temp,
                temp_max: temp,
                pressure: 1010,
                sea_level: 1010,
                grnd_level: 1008,
                humidity: 70,
                temp_kf: 0.0,
            },
            weather: vec![],
            clouds: Clouds { all: 40 },
            wind: Wind { speed: 2.0, deg: 180, gust: Some(3.1) },
            visibility: 10000,
            pop,
            rain: None,
            snow: None,
            sys: ForecastSys { pod: "d".to_string() },
            dt_txt: String::new(),
        }
    }

    pub fn hourly(items: Vec<ForecastItem>, timezone: i32) -> HourlyForecast {
        HourlyForecast {
            cod: "200".to_string(),
            message: 0,
            cnt: items.len() as i32,
            list: items,
            city: CityInfo {
                id: 2332459,
                name: "Lagos".to_string(),
                coord: Coord { lon: 3.38, lat: 6.52 },
                country: "NG".to_string(),
                population: 15_000_000,
                timezone,
                sunrise: 1_699_940_000,
                sunset: 1_699_983_000,
            },
        }
    }
}
