//! figml Client
//!
//! Blocking client for the design API: fetches document trees and resolves
//! rendered image URLs for exported assets. Credentials come in through
//! [`ClientConfig`]; nothing is read from the environment here.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use figml_model::{normalize_node_id, ParseError, SourceResponse};
use serde::Deserialize;

/// Public API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.figma.com";

const TOKEN_HEADER: &str = "X-Figma-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`DesignClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub token: String,
    pub api_base: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// URL for a whole file, or for one node of it.
    pub fn file_url(&self, file_key: &str, node_id: Option<&str>) -> String {
        match node_id {
            Some(id) => format!(
                "{}/v1/files/{file_key}/nodes?ids={}",
                self.base(),
                urlencoding::encode(id)
            ),
            None => format!("{}/v1/files/{file_key}", self.base()),
        }
    }

    /// URL asking the API to render `ids` in `format`.
    pub fn images_url(&self, file_key: &str, ids: &[&str], format: ImageFormat) -> String {
        let ids = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/v1/images/{file_key}?ids={ids}&format={}",
            self.base(),
            format.as_str()
        )
    }
}

/// Render format for [`DesignClient::resolve_images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Client error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Design API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Design API error: {0}")]
    Api(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

/// Keep rendered URLs, dropping ids the API could not render.
fn collect_images(body: &str) -> Result<HashMap<String, String>, ClientError> {
    let response: ImagesResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Parse(e.into()))?;
    if let Some(err) = response.err {
        return Err(ClientError::Api(err));
    }
    Ok(response
        .images
        .into_iter()
        .filter_map(|(id, url)| url.map(|url| (id, url)))
        .collect())
}

/// Blocking design API client.
pub struct DesignClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl DesignClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("figml/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    /// Fetch a whole file, or one sub-tree when `node_id` is given.
    pub fn fetch(
        &self,
        file_key: &str,
        node_id: Option<&str>,
    ) -> Result<SourceResponse, ClientError> {
        let node_id = node_id.map(normalize_node_id);
        let url = self.config.file_url(file_key, node_id.as_deref());
        log::debug!("fetching {url}");

        let body = self.get_text(&url)?;
        Ok(figml_model::parse_response(&body)?)
    }

    /// Ask the API to render `ids` and return id → URL.
    pub fn resolve_images(
        &self,
        file_key: &str,
        ids: &[&str],
        format: ImageFormat,
    ) -> Result<HashMap<String, String>, ClientError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let url = self.config.images_url(file_key, ids, format);
        log::debug!("resolving {} {} image(s)", ids.len(), format.as_str());

        let body = self.get_text(&url)?;
        let images = collect_images(&body)?;
        if images.len() < ids.len() {
            log::warn!(
                "{} of {} image(s) could not be rendered",
                ids.len() - images.len(),
                ids.len()
            );
        }
        Ok(images)
    }

    /// Download `url` into `path`, creating parent directories.
    pub fn download(&self, url: &str, path: &Path) -> Result<(), ClientError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let bytes = response.bytes()?;

        let io_err = |source| ClientError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, &bytes).map_err(io_err)?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn get_text(&self, url: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.config.token)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
