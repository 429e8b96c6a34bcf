use super::error::StoreError;
use super::records::{EventItem, Testimonial, parse_events, parse_testimonials};
use crate::engine::core::config::LandingConfig;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreTable {
    Testimonials,
    Events,
}

impl StoreTable {
    pub const ALL: [StoreTable; 2] = [StoreTable::Testimonials, StoreTable::Events];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Testimonials => "testimonials",
            Self::Events => "events",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.name() == name)
    }

    fn query(&self) -> &'static str {
        match self {
            Self::Testimonials => "select=*&order=sort_order.asc",
            Self::Events => "select=*&order=event_date.desc",
        }
    }
}

/// Decoded rows of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRows {
    Testimonials(Vec<Testimonial>),
    Events(Vec<EventItem>),
}

impl TableRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Testimonials(rows) => rows.len(),
            Self::Events(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn decode_rows(table: StoreTable, value: Value) -> Result<TableRows, StoreError> {
    match table {
        StoreTable::Testimonials => parse_testimonials(value).map(TableRows::Testimonials),
        StoreTable::Events => parse_events(value).map(TableRows::Events),
    }
}

pub fn decode_body(table: StoreTable, body: &str) -> Result<TableRows, StoreError> {
    decode_rows(table, serde_json::from_str(body)?)
}

/// REST endpoint of the hosted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    base_url: String,
    anon_key: String,
}

impl StoreEndpoint {
    pub fn from_config(config: &LandingConfig) -> Option<Self> {
        let (url, key) = config.store_credentials()?;
        Some(Self {
            base_url: url.to_string(),
            anon_key: key.to_string(),
        })
    }

    pub fn url(&self, table: StoreTable) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table.name(), table.query())
    }

    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("apikey", self.anon_key.clone()),
            ("Authorization", format!("Bearer {}", self.anon_key)),
            ("Accept", "application/json".to_string()),
        ]
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Network(format!("{value:?}"))
}

/// GET one table through the browser's `fetch`.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_table(endpoint: StoreEndpoint, table: StoreTable) -> Result<TableRows, StoreError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let window =
        web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(&endpoint.url(table), &init).map_err(js_error)?;
    for (name, value) in endpoint.headers() {
        request.headers().set(name, &value).map_err(js_error)?;
    }

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(StoreError::Status(response.status()));
    }

    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| StoreError::Shape("response body is not text".to_string()))?;

    decode_body(table, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> StoreEndpoint {
        let config = LandingConfig {
            store_url: Some("https://abc.store.example/".to_string()),
            store_anon_key: Some("anon-key".to_string()),
            ..LandingConfig::default()
        };
        StoreEndpoint::from_config(&config).unwrap()
    }

    #[test]
    fn urls_carry_table_ordering() {
        let endpoint = endpoint();
        assert_eq!(
            endpoint.url(StoreTable::Testimonials),
            "https://abc.store.example/rest/v1/testimonials?select=*&order=sort_order.asc"
        );
        assert_eq!(
            endpoint.url(StoreTable::Events),
            "https://abc.store.example/rest/v1/events?select=*&order=event_date.desc"
        );
    }

    #[test]
    fn requests_authenticate_with_the_anon_key() {
        let headers = endpoint().headers();
        assert!(headers.contains(&("apikey", "anon-key".to_string())));
        assert!(headers.contains(&("Authorization", "Bearer anon-key".to_string())));
    }

    #[test]
    fn table_names_round_trip() {
        assert_eq!(StoreTable::from_name("events"), Some(StoreTable::Events));
        assert_eq!(StoreTable::from_name("faq"), None);
    }

    #[test]
    fn invalid_body_is_a_decode_error() {
        let err = decode_body(StoreTable::Events, "<html>").unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
