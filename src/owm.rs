use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::weather::{self, RawForecastSlot, Report, WeatherSnapshot};

pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found")]
    NotFound,

    #[error("Failed to fetch forecast")]
    ForecastUnavailable,

    #[error("Failed to fetch weather data: {0}")]
    Unknown(String),
}

impl WeatherError {
    /// The single line shown in place of the weather card.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::NotFound => "City not found",
            WeatherError::ForecastUnavailable => "Failed to fetch forecast",
            WeatherError::Unknown(_) => "Failed to fetch weather data",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Unknown(err.to_string())
    }
}

pub trait WeatherApi: Send + Sync {
    /// Current conditions plus the daily forecast for `city`.
    fn fetch_weather(&self, city: &str) -> Result<Report, WeatherError>;
}

pub mod current {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct Current {
        pub name: String,
        pub main: Main,
        pub wind: Wind,
        pub weather: Vec<Weather>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: f64,
        pub humidity: u8,
    }

    #[derive(Deserialize, Debug)]
    pub struct Wind {
        pub speed: f64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Weather {
        pub icon: String,
        pub description: String,
    }

    impl TryFrom<Current> for WeatherSnapshot {
        type Error = WeatherError;

        fn try_from(current: Current) -> Result<Self, Self::Error> {
            let weather = current.weather.into_iter().next().ok_or_else(|| {
                WeatherError::Unknown("current conditions carry no weather entry".to_string())
            })?;
            Ok(WeatherSnapshot {
                city: current.name,
                temperature: current.main.temp,
                humidity: current.main.humidity,
                wind_speed: current.wind.speed,
                icon: weather.icon,
                description: weather.description,
            })
        }
    }
}

pub mod forecast {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct Forecast {
        pub list: Vec<Item>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Item {
        pub dt_txt: String,
        pub main: Main,
        pub weather: Vec<Weather>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: f64,
    }

    #[derive(Deserialize, Debug)]
    pub struct Weather {
        pub icon: String,
    }

    impl Forecast {
        /// Flattens the feed; slots without a weather entry get an empty icon.
        pub fn slots(self) -> Vec<RawForecastSlot> {
            self.list
                .into_iter()
                .map(|item| RawForecastSlot {
                    dt_txt: item.dt_txt,
                    icon: item
                        .weather
                        .into_iter()
                        .next()
                        .map(|w| w.icon)
                        .unwrap_or_default(),
                    temperature: item.main.temp,
                })
                .collect()
        }
    }
}

/// OpenWeatherMap client. Two GETs per lookup, no retries, transport default timeouts.
#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMap {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent("wxboard").build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn get(&self, endpoint: &str, city: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, "requesting");
        self.client
            .get(url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
    }

    pub fn current(&self, city: &str) -> Result<current::Current, WeatherError> {
        let resp = self.get("weather", city)?;
        if !resp.status().is_success() {
            info!(city, status = %resp.status(), "current conditions rejected");
            return Err(WeatherError::NotFound);
        }
        Ok(resp.json()?)
    }

    pub fn forecast(&self, city: &str) -> Result<forecast::Forecast, WeatherError> {
        let resp = self.get("forecast", city)?;
        if !resp.status().is_success() {
            info!(city, status = %resp.status(), "forecast rejected");
            return Err(WeatherError::ForecastUnavailable);
        }
        Ok(resp.json()?)
    }
}

impl WeatherApi for OpenWeatherMap {
    fn fetch_weather(&self, city: &str) -> Result<Report, WeatherError> {
        let snapshot = WeatherSnapshot::try_from(self.current(city)?)?;
        let forecast = weather::reduce_to_daily(&self.forecast(city)?.slots());
        Ok(Report { snapshot, forecast })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_current() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "main": {"temp": 15.4, "humidity": 70, "pressure": 1012},
            "wind": {"speed": 3.2, "deg": 240},
            "weather": [{"id": 500, "main": "Rain", "icon": "10d", "description": "light rain"}]
        })
    }

    fn london_forecast() -> serde_json::Value {
        let mut list = vec![];
        for day in 15..20 {
            for hour in (0..24).step_by(3) {
                list.push(serde_json::json!({
                    "dt": 0,
                    "dt_txt": format!("2024-01-{day} {hour:02}:00:00"),
                    "main": {"temp": 10.0 + hour as f64},
                    "weather": [{"icon": "04d"}]
                }));
            }
        }
        serde_json::json!({"cod": "200", "list": list})
    }

    async fn fetch(server: &MockServer, city: &'static str) -> Result<Report, WeatherError> {
        let base = server.uri();
        tokio::task::spawn_blocking(move || {
            OpenWeatherMap::new(&base, "secret")?.fetch_weather(city)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "London"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let report = fetch(&server, "London").await.unwrap();
        assert_eq!(report.snapshot.city, "London");
        assert_eq!(report.snapshot.rounded_temperature(), 15);
        assert_eq!(report.snapshot.humidity, 70);
        assert_eq!(report.snapshot.icon, "10d");
        assert_eq!(report.snapshot.description, "light rain");
        assert_eq!(report.forecast.len(), 5);
        assert!(report.forecast.iter().all(|e| e.temperature == 22.0));
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
            .expect(0)
            .mount(&server)
            .await;

        let err = fetch(&server, "Zzzzinvalidcity").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound));
        assert_eq!(err.user_message(), "City not found");
    }

    #[tokio::test]
    async fn test_forecast_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = fetch(&server, "London").await.unwrap_err();
        assert!(matches!(err, WeatherError::ForecastUnavailable));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "London"})),
            )
            .mount(&server)
            .await;

        let err = fetch(&server, "London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Unknown(_)));
        assert_eq!(err.user_message(), "Failed to fetch weather data");
    }

    #[test]
    fn test_empty_weather_array_is_rejected() {
        let current: current::Current = serde_json::from_value(serde_json::json!({
            "name": "Nowhere",
            "main": {"temp": 1.0, "humidity": 5},
            "wind": {"speed": 0.0},
            "weather": []
        }))
        .unwrap();
        assert!(matches!(
            WeatherSnapshot::try_from(current),
            Err(WeatherError::Unknown(_))
        ));
    }
}
