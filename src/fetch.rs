use std::future::Future;
use std::time::Duration;

use tracing::debug;
use wreq::Client;

use crate::error::{self, FlightError};
use crate::model::{self, Flight};
use crate::query::SearchRequest;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub base_url: String,
    pub proxy: Option<String>,
    pub timeout: u64,
    pub token: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            proxy: None,
            timeout: 30,
            token: None,
        }
    }
}

pub trait FlightSource {
    fn cities(&self) -> impl Future<Output = Result<Vec<String>, FlightError>> + Send;

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Flight>, FlightError>> + Send;
}

pub async fn load_flights<S: FlightSource>(
    source: &S,
    request: Option<&SearchRequest>,
) -> Result<Vec<Flight>, FlightError> {
    match request {
        Some(request) => source.search(request).await,
        None => Ok(Vec::new()),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(options: &FetchOptions) -> Result<Self, FlightError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

        if let Some(ref proxy) = options.proxy {
            builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
        }

        let client = builder.build().map_err(error::from_http_error)?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token: options.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<String, FlightError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, ?params, "GET");

        let mut request = self.client.get(url.as_str()).query(params);
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(error::from_http_error)?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            401 => return Err(FlightError::Unauthorized),
            429 => return Err(FlightError::RateLimited),
            _ if status >= 400 => return Err(FlightError::HttpStatus(status)),
            _ => {}
        }

        response.text().await.map_err(error::from_http_error)
    }
}

impl FlightSource for ApiClient {
    async fn cities(&self) -> Result<Vec<String>, FlightError> {
        let body = self.get("/flights/search/cities", &[]).await?;
        model::parse_cities(&body)
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Flight>, FlightError> {
        let body = self.get(request.path(), &request.to_url_params()).await?;
        model::parse_flights(&body)
    }
}
