use chrono::NaiveDate;
use dotenvy::dotenv;
use geomean_sweep::{DEFAULT_COMMODITY_LABEL, DEFAULT_OUTPUT_PATH};
use panelharga_api::api::{DEFAULT_COMMODITY_ID, PANELHARGA_BASE_API_URL};
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use std::{env, fmt};

const DEFAULT_PROVINCE_ID: i64 = 12;
const DEFAULT_START_DATE: (i32, u32, u32) = (2021, 4, 1);
const DEFAULT_END_DATE: (i32, u32, u32) = (2024, 4, 1);
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Bar,
    Log,
    Off,
}

impl FromStr for ProgressMode {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ProgressMode::Bar),
            "log" => Ok(ProgressMode::Log),
            "off" | "none" => Ok(ProgressMode::Off),
            _ => Err(CustomError::InvalidValue {
                key: "PANELHARGA_PROGRESS",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub province_id: i64,
    pub commodity_id: u32,
    pub commodity_label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output: PathBuf,
    pub timeout: Option<Duration>,
    pub progress: ProgressMode,
}

impl Config {
    pub fn new() -> Result<Config, Box<dyn Error>> {
        dotenv().ok();
        Ok(Config::from_lookup(|key| env::var(key).ok())?)
    }

    /// Builds a config from `lookup`; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, CustomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut base_url = get("PANELHARGA_BASE_URL")
            .unwrap_or_else(|| PANELHARGA_BASE_API_URL.to_string());
        base_url = base_url.trim().trim_end_matches('/').to_string();

        let province_id = parse_or(
            get("PANELHARGA_PROVINCE_ID"),
            "PANELHARGA_PROVINCE_ID",
            DEFAULT_PROVINCE_ID,
        )?;
        let commodity_id = parse_or(
            get("PANELHARGA_COMMODITY_ID"),
            "PANELHARGA_COMMODITY_ID",
            DEFAULT_COMMODITY_ID,
        )?;
        let commodity_label = get("PANELHARGA_COMMODITY_LABEL")
            .unwrap_or_else(|| DEFAULT_COMMODITY_LABEL.to_string());

        let start_date = parse_date(
            get("PANELHARGA_START_DATE"),
            "PANELHARGA_START_DATE",
            DEFAULT_START_DATE,
        )?;
        let end_date = parse_date(
            get("PANELHARGA_END_DATE"),
            "PANELHARGA_END_DATE",
            DEFAULT_END_DATE,
        )?;
        if start_date > end_date {
            return Err(CustomError::ReversedRange {
                start: start_date,
                end: end_date,
            });
        }

        let output = get("PANELHARGA_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

        let timeout_secs = parse_or(
            get("PANELHARGA_TIMEOUT_SECS"),
            "PANELHARGA_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?;
        let timeout = match timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let progress = match get("PANELHARGA_PROGRESS") {
            Some(value) => value.parse()?,
            None => ProgressMode::Bar,
        };

        Ok(Config {
            base_url,
            province_id,
            commodity_id,
            commodity_label,
            start_date,
            end_date,
            output: PathBuf::from(output),
            timeout,
            progress,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, CustomError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| CustomError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn parse_date(
    value: Option<String>,
    key: &'static str,
    (year, month, day): (i32, u32, u32),
) -> Result<NaiveDate, CustomError> {
    match value {
        Some(value) => NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map_err(|_| CustomError::InvalidValue { key, value }),
        None => NaiveDate::from_ymd_opt(year, month, day).ok_or(CustomError::InvalidValue {
            key,
            value: format!("{}-{}-{}", year, month, day),
        }),
    }
}

#[derive(Debug, PartialEq)]
pub enum CustomError {
    InvalidValue { key: &'static str, value: String },
    ReversedRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CustomError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
            CustomError::ReversedRange { start, end } => {
                write!(f, "Start date {} is after end date {}", start, end)
            }
        }
    }
}

impl Error for CustomError {}
