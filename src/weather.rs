use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::units;

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Overcast,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl Condition {
    /// Classifies an OpenWeatherMap icon code ("01d", "10n", ...) by its prefix.
    pub fn from_icon(icon: &str) -> Self {
        match icon.get(..2) {
            Some("01") => Condition::Clear,
            Some("02") => Condition::PartlyCloudy,
            Some("03") | Some("04") => Condition::Overcast,
            Some("09") | Some("10") => Condition::Rain,
            Some("11") => Condition::Thunderstorm,
            Some("13") => Condition::Snow,
            Some("50") => Condition::Mist,
            _ => Condition::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::PartlyCloudy => "⛅",
            Condition::Overcast | Condition::Unknown => "☁️",
            Condition::Rain => "🌧️",
            Condition::Thunderstorm => "⛈️",
            Condition::Snow => "❄️",
            Condition::Mist => "🌫️",
        }
    }

    /// Ambient overlay drawn behind the card, if any.
    pub fn overlay(&self) -> Option<&'static str> {
        match self {
            Condition::Rain => Some("rain"),
            Condition::Snow => Some("snow"),
            Condition::Clear => Some("sun"),
            _ => None,
        }
    }
}

/// Current conditions for one city at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent, 0-100.
    pub humidity: u8,
    /// Metres per second, as reported with metric units.
    pub wind_speed: f64,
    pub icon: String,
    pub description: String,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> Condition {
        Condition::from_icon(&self.icon)
    }

    pub fn rounded_temperature(&self) -> i64 {
        units::temperature::round(self.temperature)
    }

    pub fn wind_kph(&self) -> i64 {
        units::speed::ms2kph(self.wind_speed).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub icon: String,
    pub temperature: f64,
}

impl ForecastEntry {
    pub fn condition(&self) -> Condition {
        Condition::from_icon(&self.icon)
    }

    pub fn weekday(&self) -> String {
        self.timestamp.format("%a").to_string()
    }

    pub fn rounded_temperature(&self) -> i64 {
        units::temperature::round(self.temperature)
    }
}

/// One 3-hour slot as delivered by the forecast feed, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastSlot {
    pub dt_txt: String,
    pub icon: String,
    pub temperature: f64,
}

/// Result of one successful fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
}

/// Keeps the slots stamped exactly 12:00:00, in feed order. Days without a
/// noon slot are simply absent and unparseable stamps are skipped.
pub fn reduce_to_daily(slots: &[RawForecastSlot]) -> Vec<ForecastEntry> {
    slots
        .iter()
        .filter_map(|slot| match NaiveDateTime::parse_from_str(&slot.dt_txt, DT_FORMAT) {
            Ok(timestamp) => Some((timestamp, slot)),
            Err(err) => {
                debug!(dt_txt = %slot.dt_txt, %err, "skipping forecast slot");
                None
            }
        })
        .filter(|(timestamp, _)| is_noon(timestamp))
        .map(|(timestamp, slot)| ForecastEntry {
            timestamp,
            icon: slot.icon.clone(),
            temperature: slot.temperature,
        })
        .collect()
}

fn is_noon(timestamp: &NaiveDateTime) -> bool {
    timestamp.hour() == 12 && timestamp.minute() == 0 && timestamp.second() == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(dt_txt: &str) -> RawForecastSlot {
        RawForecastSlot {
            dt_txt: dt_txt.to_string(),
            icon: "01d".to_string(),
            temperature: 20.0,
        }
    }

    fn five_day_feed() -> Vec<RawForecastSlot> {
        let mut slots = vec![];
        for day in 15..20 {
            for hour in (0..24).step_by(3) {
                slots.push(slot(&format!("2024-01-{day} {hour:02}:00:00")));
            }
        }
        slots
    }

    #[test]
    fn test_reduce_keeps_one_noon_slot_per_day() {
        let daily = reduce_to_daily(&five_day_feed());
        assert_eq!(daily.len(), 5);
        for (i, entry) in daily.iter().enumerate() {
            assert_eq!(entry.timestamp.hour(), 12);
            assert_eq!(entry.timestamp.format("%d").to_string(), format!("{}", 15 + i));
        }
    }

    #[test]
    fn test_reduce_drops_days_without_noon() {
        let slots: Vec<_> = five_day_feed()
            .into_iter()
            .filter(|s| s.dt_txt != "2024-01-15 12:00:00")
            .collect();
        let daily = reduce_to_daily(&slots);
        assert_eq!(daily.len(), 4);
        assert_eq!(daily[0].weekday(), "Tue");
    }

    #[test]
    fn test_reduce_without_any_noon_slot() {
        let slots = vec![
            slot("2024-01-15 15:00:00"),
            slot("2024-01-15 18:00:00"),
            slot("garbage"),
        ];
        assert!(reduce_to_daily(&slots).is_empty());
        assert!(reduce_to_daily(&[]).is_empty());
    }

    #[test]
    fn test_condition_from_icon() {
        assert_eq!(Condition::from_icon("01d"), Condition::Clear);
        assert_eq!(Condition::from_icon("02n"), Condition::PartlyCloudy);
        assert_eq!(Condition::from_icon("04d"), Condition::Overcast);
        assert_eq!(Condition::from_icon("09d"), Condition::Rain);
        assert_eq!(Condition::from_icon("10n"), Condition::Rain);
        assert_eq!(Condition::from_icon("11d"), Condition::Thunderstorm);
        assert_eq!(Condition::from_icon("13d"), Condition::Snow);
        assert_eq!(Condition::from_icon("50d"), Condition::Mist);
        assert_eq!(Condition::from_icon(""), Condition::Unknown);
        assert_eq!(Condition::from_icon("7"), Condition::Unknown);
        assert_eq!(Condition::Rain.overlay(), Some("rain"));
        assert_eq!(Condition::Overcast.overlay(), None);
    }
}
