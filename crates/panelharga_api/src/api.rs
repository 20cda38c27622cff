use chrono::NaiveDate;
use harga_model::{DateToken, FetchStatus, PriceRecord, format_date};
use log::{debug, error, info};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::Duration;

pub const PANELHARGA_BASE_API_URL: &str = "https://panelharga.badanpangan.go.id";
pub const DEFAULT_COMMODITY_ID: u32 = 30;
pub const DEFAULT_LEVEL: u32 = 3;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Performs a GET and hands back the response body.
///
/// Any failure (connection, timeout, non-2xx status) is an `Err`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    headers: reqwest::header::HeaderMap,
}

impl ReqwestTransport {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Box<dyn Error>> {
        let mut reqwest_headers = reqwest::header::HeaderMap::new();
        reqwest_headers.insert(reqwest::header::USER_AGENT, USER_AGENT.parse()?);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestTransport {
            client: builder.build()?,
            headers: reqwest_headers,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let body = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

enum Lookup {
    NoData,
    NotFound,
    Found(Option<f64>),
}

/// Looks only at `data` and, entry by entry, at `province_id` until the first
/// match. Other entries' fields are never inspected.
fn find_geomean(json: &Value, province_id: i64) -> Result<Lookup, CustomError> {
    let entries = match json.get("data") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(Lookup::NoData),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(Lookup::NoData),
        Some(Value::String(s)) if s.is_empty() => return Ok(Lookup::NoData),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(CustomError::UnexpectedData),
    };

    for (index, entry) in entries.iter().enumerate() {
        if entry.is_null() {
            return Err(CustomError::NullEntry(index));
        }
        // numeric equality, so 12 and 12.0 both match
        if entry.get("province_id").and_then(Value::as_f64) == Some(province_id as f64) {
            return Ok(Lookup::Found(entry.get("geomean").and_then(Value::as_f64)));
        }
    }
    Ok(Lookup::NotFound)
}

pub struct PanelHargaAPI<T: Transport = ReqwestTransport> {
    base_url: String,
    level: u32,
    commodity_id: u32,
    transport: T,
}

impl<T: Transport> PanelHargaAPI<T> {
    pub fn new(transport: T) -> Self {
        PanelHargaAPI {
            base_url: PANELHARGA_BASE_API_URL.to_string(),
            level: DEFAULT_LEVEL,
            commodity_id: DEFAULT_COMMODITY_ID,
            transport,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_commodity_id(mut self, commodity_id: u32) -> Self {
        self.commodity_id = commodity_id;
        self
    }

    pub fn commodity_id(&self) -> u32 {
        self.commodity_id
    }

    pub fn url_for(&self, token: &DateToken, commodity_id: u32) -> String {
        format!(
            "{}/data/harga-provinsi/{}/{}/{}",
            self.base_url,
            token.url_segment(),
            self.level,
            commodity_id
        )
    }

    /// Geomean of the configured commodity for `province_id` on `date`.
    pub async fn get_geomean(&self, date: NaiveDate, province_id: i64) -> PriceRecord {
        self.get_geomean_for_commodity(date, province_id, self.commodity_id)
            .await
    }

    /// Never fails: every upstream problem becomes a record with no value,
    /// tagged with the reason, so a sweep always covers the full range.
    pub async fn get_geomean_for_commodity(
        &self,
        date: NaiveDate,
        province_id: i64,
        commodity_id: u32,
    ) -> PriceRecord {
        let token = format_date(date);
        let url = self.url_for(&token, commodity_id);

        debug!("get_geomean | url: {}", url);

        let lookup: Result<Lookup, Box<dyn Error>> = match self.fetch_json(&url).await {
            Ok(json) => find_geomean(&json, province_id).map_err(|e| e.into()),
            Err(e) => Err(e),
        };

        match lookup {
            Ok(Lookup::Found(geomean)) => PriceRecord::found(token, geomean),
            Ok(Lookup::NotFound) => {
                info!("No data found for province_id {} on {}", province_id, token);
                PriceRecord::absent(token, FetchStatus::NotFound)
            }
            Ok(Lookup::NoData) => {
                info!("No data available for {}", token);
                PriceRecord::absent(token, FetchStatus::NoData)
            }
            Err(e) => {
                error!("Error fetching data for {}: {}", token, e);
                PriceRecord::absent(token, FetchStatus::Failed)
            }
        }
    }

    /// An empty body reads as JSON `null`.
    async fn fetch_json(&self, url: &str) -> Result<Value, Box<dyn Error>> {
        let body = self.transport.get_text(url).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let json = serde_json::from_str(&body)
            .map_err(|e| CustomError::MalformedBody(e.to_string()))?;
        Ok(json)
    }
}

#[derive(Debug)]
pub enum CustomError {
    MalformedBody(String),
    UnexpectedData,
    NullEntry(usize),
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CustomError::MalformedBody(e) => write!(f, "Malformed body: {}", e),
            CustomError::UnexpectedData => write!(f, "Field 'data' is not a list"),
            CustomError::NullEntry(index) => write!(f, "Entry {} of 'data' is null", index),
        }
    }
}

impl Error for CustomError {}
