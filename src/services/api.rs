//! HTTP client for the analytics API

use crate::config::{Config, Endpoints};
use crate::model::{ElevationPayload, FetchRequest, FetchResponse, HtmlDocument, PlotType, ViewId};
use reqwest::{Client, RequestBuilder};
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the analytics API.
///
/// From the user's point of view they are all "network or parse failure";
/// the variants only make the log lines more useful.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cannot connect to {0}")]
    Connection(String),
    #[error("Request to {0} timed out")]
    Timeout(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute URL of the page backing `view`
    pub fn url_for(&self, view: ViewId) -> String {
        self.url(self.endpoints.path_for(view))
    }

    pub async fn execute(&self, request: &FetchRequest) -> Result<FetchResponse, ApiError> {
        match request {
            FetchRequest::ElevationOverview => self
                .elevation(None)
                .await
                .map(|p| FetchResponse::Elevation(Box::new(p))),
            FetchRequest::ElevationDistrict(district) => self
                .elevation(Some(district))
                .await
                .map(|p| FetchResponse::Elevation(Box::new(p))),
            FetchRequest::GeospatialPlot {
                plot_type,
                heatmap_date,
            } => self
                .geospatial_plot(*plot_type, heatmap_date.as_deref())
                .await
                .map(FetchResponse::Html),
            FetchRequest::Page(view) => self.page(*view).await.map(FetchResponse::Html),
        }
    }

    /// `GET` the elevation overview, or `POST` a district filter.
    ///
    /// The POST body is JSON because the endpoint reads `request.json`.
    pub async fn elevation(&self, district: Option<&str>) -> Result<ElevationPayload, ApiError> {
        let url = self.url(&self.endpoints.elevation);
        let builder = match district {
            None => self.client.get(&url),
            Some(d) => self
                .client
                .post(&url)
                .json(&serde_json::json!({ "district": d })),
        };
        let body = self.send(builder, &url).await?;
        serde_json::from_str(&sanitize_json(&body)).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// `POST` the geospatial plot form; the date is only sent for the heatmap
    pub async fn geospatial_plot(
        &self,
        plot_type: PlotType,
        heatmap_date: Option<&str>,
    ) -> Result<HtmlDocument, ApiError> {
        let url = self.url(&self.endpoints.geospatial_plot);
        let mut form = vec![("plot_type", plot_type.label())];
        if plot_type.needs_date() {
            if let Some(date) = heatmap_date {
                form.push(("heatmap_date", date));
            }
        }
        let body = self.send(self.client.post(&url).form(&form), &url).await?;
        Ok(HtmlDocument::new(body))
    }

    pub async fn page(&self, view: ViewId) -> Result<HtmlDocument, ApiError> {
        let url = self.url_for(view);
        let body = self.send(self.client.get(&url), &url).await?;
        Ok(HtmlDocument::new(body))
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(|e| classify(e, url))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| classify(e, url))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate(body.trim(), 200),
            });
        }
        Ok(body)
    }
}

fn classify(e: reqwest::Error, url: &str) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(url.to_string())
    } else if e.is_connect() {
        ApiError::Connection(url.to_string())
    } else {
        ApiError::Http(e)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Replace bare `NaN` / `Infinity` / `-Infinity` tokens with `null`.
///
/// Pandas-backed endpoints emit these for missing values, which strict JSON
/// parsers reject. Tokens inside string literals are left alone.
pub fn sanitize_json(body: &str) -> Cow<'_, str> {
    if !body.contains("NaN") && !body.contains("Infinity") {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let token = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|t| rest.starts_with(t));
        match token {
            Some(t) => {
                out.push_str("null");
                rest = &rest[t.len()..];
            }
            None => {
                if c == '"' {
                    in_string = true;
                }
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_views() {
        let config = Config {
            api_base_url: "http://localhost:5000/".to_string(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url_for(ViewId::RefreshRatePredictor),
            "http://localhost:5000/api/rainfall/refresh_rate/"
        );
        assert_eq!(
            client.url_for(ViewId::GeospatialAnalysis),
            "http://localhost:5000/api/geospatial_analysis/plot"
        );
    }

    #[test]
    fn test_sanitize_replaces_bare_tokens() {
        let body = r#"{"a": NaN, "b": [Infinity, -Infinity, 1], "c": "NaN stays"}"#;
        let clean = sanitize_json(body);
        assert_eq!(
            clean,
            r#"{"a": null, "b": [null, null, 1], "c": "NaN stays"}"#
        );
        let value: serde_json::Value = serde_json::from_str(&clean).unwrap();
        assert!(value["a"].is_null());
    }

    #[test]
    fn test_sanitize_respects_escaped_quotes() {
        let body = r#"{"html": "<b a=\"x\">NaN</b>", "v": NaN}"#;
        assert_eq!(
            sanitize_json(body),
            r#"{"html": "<b a=\"x\">NaN</b>", "v": null}"#
        );
    }

    #[test]
    fn test_sanitize_borrows_clean_input() {
        assert!(matches!(sanitize_json(r#"{"a": 1}"#), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("ééé", 2), "éé…");
        assert_eq!(truncate("ok", 5), "ok");
    }

    #[test]
    fn test_connection_refused_is_reported() {
        let config = Config {
            // Port 9 (discard) is essentially never listening on localhost
            api_base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            request_timeout_secs: 2,
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(client.execute(&FetchRequest::Page(ViewId::Population)));
        assert!(matches!(
            result,
            Err(ApiError::Connection(_)) | Err(ApiError::Timeout(_)) | Err(ApiError::Http(_))
        ));
    }
}
