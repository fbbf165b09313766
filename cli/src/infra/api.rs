//! Infrastructure implementation of the remote API ports.
//!
//! `DigitalOceanClient` speaks the v1 REST API over `ureq`. Every request is
//! a GET authenticated by `client_id` / `api_key` query parameters, and every
//! answer is an [`ApiResponse`] envelope.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{CollectionSource, DropletActions, StatusSource};
use crate::domain::config::ShellConfig;
use crate::domain::{
    ApiResponse, Droplet, DropletSpec, Image, JobStatus, Region, Size, SshKey, validate,
};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking v1 API client.
pub struct DigitalOceanClient {
    base_url: String,
    client_id: String,
    api_key: String,
    agent: ureq::Agent,
}

impl DigitalOceanClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when credentials are absent.
    pub fn from_config(config: &ShellConfig) -> Result<Self> {
        config.require_credentials()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dosh/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Self {
            base_url: config.api.url.clone(),
            client_id: config.api.client_id.clone(),
            api_key: config.api.api_key.clone(),
            agent,
        })
    }

    /// GET `path` and decode the envelope.
    ///
    /// Error text names the path only; credentials never appear in it.
    fn call(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let url = endpoint(&self.base_url, path);
        debug!(path, "api request");
        let mut req = self
            .agent
            .get(&url)
            .query("client_id", &self.client_id)
            .query("api_key", &self.api_key);
        for (name, value) in query {
            req = req.query(name, value);
        }

        let body = match req.call() {
            Ok(resp) => resp
                .into_string()
                .with_context(|| format!("reading response from {path}"))?,
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                // The API reports most failures as an ERROR envelope.
                if let Ok(envelope) = parse_envelope(&body) {
                    return Ok(envelope);
                }
                anyhow::bail!("API request {path} failed: HTTP {code}");
            }
            Err(ureq::Error::Transport(t)) => {
                anyhow::bail!(
                    "cannot reach the API ({}): {}",
                    self.base_url,
                    t.kind()
                );
            }
        };
        parse_envelope(&body).with_context(|| format!("parsing response from {path}"))
    }

    /// GET `path` and extract `field` through the validator.
    fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        field: &str,
    ) -> Result<T> {
        let response = self.call(path, query)?;
        Ok(validate(&response, field)?)
    }
}

/// Join the base URL and an endpoint path with exactly one slash.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Decode a response body into an envelope.
///
/// # Errors
///
/// Returns an error if the body is not a JSON object with a `status` field.
pub fn parse_envelope(body: &str) -> Result<ApiResponse> {
    serde_json::from_str(body).context("invalid API response")
}

impl CollectionSource for DigitalOceanClient {
    fn list_sizes(&self) -> Result<Vec<Size>> {
        self.fetch("/sizes/", &[], "sizes")
    }

    fn list_regions(&self) -> Result<Vec<Region>> {
        self.fetch("/regions/", &[], "regions")
    }

    fn list_snapshots(&self) -> Result<Vec<Image>> {
        self.fetch("/images/", &[("filter", "my_images".to_string())], "images")
    }

    fn list_droplets(&self) -> Result<Vec<Droplet>> {
        self.fetch("/droplets/", &[], "droplets")
    }

    fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.fetch("/ssh_keys/", &[], "ssh_keys")
    }
}

impl DropletActions for DigitalOceanClient {
    fn create_droplet(&self, spec: &DropletSpec) -> Result<ApiResponse> {
        self.call("/droplets/new", &create_query(spec))
    }

    fn destroy_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/droplets/{id}/destroy/"), &[])
    }

    fn snapshot_droplet(&self, id: u64, name: &str) -> Result<ApiResponse> {
        self.call(
            &format!("/droplets/{id}/snapshot/"),
            &[("name", name.to_string())],
        )
    }

    fn power_off_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/droplets/{id}/power_off/"), &[])
    }

    fn power_on_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/droplets/{id}/power_on/"), &[])
    }

    fn reboot_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/droplets/{id}/reboot/"), &[])
    }

    fn shutdown_droplet(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/droplets/{id}/shutdown/"), &[])
    }

    fn destroy_snapshot(&self, id: u64) -> Result<ApiResponse> {
        self.call(&format!("/images/{id}/destroy/"), &[])
    }
}

impl StatusSource for DigitalOceanClient {
    fn find_droplet(&self, id: u64) -> Result<Droplet> {
        self.fetch(&format!("/droplets/{id}"), &[], "droplet")
    }

    fn find_snapshot(&self, id: u64) -> Result<Image> {
        self.fetch(&format!("/images/{id}"), &[], "image")
    }

    fn find_event(&self, id: u64) -> Result<JobStatus> {
        self.fetch(&format!("/events/{id}"), &[], "event")
    }
}

/// Query parameters for `/droplets/new`.
#[must_use]
pub fn create_query(spec: &DropletSpec) -> Vec<(&'static str, String)> {
    vec![
        ("name", spec.name.clone()),
        ("size_id", spec.size_id.to_string()),
        ("image_id", spec.image_id.to_string()),
        ("region_id", spec.region_id.to_string()),
        ("ssh_key_ids", spec.joined_ssh_key_ids()),
        ("private_networking", spec.private_networking.to_string()),
        ("backups_enabled", spec.backups_enabled.to_string()),
    ]
}
