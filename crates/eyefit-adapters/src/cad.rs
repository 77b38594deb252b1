//! HTTPS client for the CAD variable-update API.

use std::time::Duration;

use anyhow::{Context, Result};
use eyefit_core::cad::{CadCredentials, CadError, CadTarget, LensParameters, SignedRequest};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://cad.onshape.com";

/// Blocking client that pushes lens parameters into a CAD document.
pub struct CadClient {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: CadCredentials,
}

impl CadClient {
    /// Creates a client for `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns an error if either key is empty or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, credentials: CadCredentials) -> Result<Self> {
        if credentials.access_key.is_empty() {
            return Err(CadError::Missing("access key").into());
        }
        if credentials.secret_key.is_empty() {
            return Err(CadError::Missing("secret key").into());
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Signs and sends one variable update.
    ///
    /// The request is sent once; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns [`CadError::Rejected`] (wrapped) if the service answers with
    /// anything other than 200, or an error if the request cannot be sent.
    pub fn push(&self, target: &CadTarget, params: &LensParameters) -> Result<()> {
        let request = SignedRequest::variable_update(
            &self.credentials,
            target,
            params,
            unix_millis(),
            &Uuid::new_v4().to_string(),
        )?;

        let mut url = format!("{}{}", self.base_url, request.path);
        if !request.query.is_empty() {
            url.push('?');
            url.push_str(&request.query);
        }
        debug!("POST {url}");

        let mut builder = self.http.post(&url).body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(CadError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        info!(
            "Updated variables in document {} (BridgeWid {} mm)",
            target.document_id,
            params.bridge_width_mm()
        );
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unix_millis() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
