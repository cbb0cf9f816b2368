//! Wire formats for calendar dates and wall-clock times.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use time::{
    format_description::FormatItem, macros::format_description, Date, Month, Time, Weekday,
};

const HM: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const HMS: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
pub const YMD: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `YYYY-MM-DD` calendar dates.
pub mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
        let out = d.format(YMD).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        Date::parse(raw.trim(), YMD).map_err(|_| D::Error::custom(format!("invalid date {raw:?}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(d: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => super::serialize(d, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => Date::parse(raw.trim(), YMD)
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("invalid date {raw:?}"))),
                None => Ok(None),
            }
        }
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`; always writes `HH:MM`.
pub mod wall_time {
    use super::*;

    pub fn serialize<S: Serializer>(t: &Time, s: S) -> Result<S::Ok, S::Error> {
        let out = t.format(HM).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(d)?;
        parse_wall_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time {raw:?}")))
    }
}

pub fn parse_wall_time(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    Time::parse(raw, HMS)
        .or_else(|_| Time::parse(raw, HM))
        .ok()
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(raw: &str) -> Option<Date> {
    Date::parse(&format!("{}-01", raw.trim()), YMD).ok()
}

pub fn format_hm(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

pub fn weekday_es(w: Weekday) -> &'static str {
    match w {
        Weekday::Monday => "lunes",
        Weekday::Tuesday => "martes",
        Weekday::Wednesday => "miércoles",
        Weekday::Thursday => "jueves",
        Weekday::Friday => "viernes",
        Weekday::Saturday => "sábado",
        Weekday::Sunday => "domingo",
    }
}

pub fn month_es(m: Month) -> &'static str {
    match m {
        Month::January => "enero",
        Month::February => "febrero",
        Month::March => "marzo",
        Month::April => "abril",
        Month::May => "mayo",
        Month::June => "junio",
        Month::July => "julio",
        Month::August => "agosto",
        Month::September => "septiembre",
        Month::October => "octubre",
        Month::November => "noviembre",
        Month::December => "diciembre",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn wall_time_accepts_both_precisions() {
        assert_eq!(parse_wall_time("08:30"), Some(time!(08:30)));
        assert_eq!(parse_wall_time("23:05:59"), Some(time!(23:05:59)));
        assert_eq!(parse_wall_time("8h30"), None);
    }

    #[test]
    fn month_param_parses_to_first_day() {
        assert_eq!(parse_month("2024-06"), Some(date!(2024 - 06 - 01)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("junio"), None);
    }

    #[test]
    fn wall_time_serializes_without_seconds() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Slot {
            #[serde(with = "wall_time")]
            at: Time,
            #[serde(with = "iso_date")]
            on: Date,
        }
        let slot: Slot = serde_json::from_str(r#"{"at":"07:15:00","on":"2024-06-03"}"#).unwrap();
        assert_eq!(slot.at, time!(07:15));
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"at":"07:15","on":"2024-06-03"}"#);
    }
}
