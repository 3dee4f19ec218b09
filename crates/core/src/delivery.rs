//! Result delivery client.
//!
//! Sends one calculation's results back to the owning backend with a single `PUT`. Delivery is
//! at-most-once: a non-200 answer or a transport fault is returned to the caller as an error and
//! nothing is retried.

use crate::config::CalculatorConfig;
use crate::constants::{
    DELIVERY_ERROR_BODY_LIMIT, DELIVERY_PATH_PREFIX, DELIVERY_PATH_SUFFIX, DELIVERY_TIMEOUT_SECS,
};
use crate::request::{CalculationId, GroupResult};
use crate::{CaviError, CaviResult};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::time::Duration;

/// JSON body of the outbound callback.
#[derive(Debug, Serialize)]
pub struct DeliveryPayload<'a> {
    pub token: &'a str,
    pub groups_count: usize,
    pub results: &'a [GroupResult],
}

#[derive(Clone, Debug)]
pub struct ResultDeliveryClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl ResultDeliveryClient {
    /// Build a client for the configured backend with the fixed delivery timeout.
    pub fn new(cfg: &CalculatorConfig) -> CaviResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()
            .map_err(CaviError::HttpClient)?;

        Ok(Self {
            http,
            base_url: cfg.backend_url().clone(),
            token: cfg.backend_token().to_owned(),
        })
    }

    /// `{base}/api/cavi-calculations/{calculation_id}/async-result`, with the id encoded as a
    /// single path segment.
    pub fn result_url(&self, calculation_id: &CalculationId) -> CaviResult<Url> {
        let mut url = self.base_url.clone();
        let id = calculation_id.to_string();
        url.path_segments_mut()
            .map_err(|_| CaviError::InvalidConfig("backend URL cannot be used as a base".into()))?
            .pop_if_empty()
            .extend(DELIVERY_PATH_PREFIX)
            .push(&id)
            .push(DELIVERY_PATH_SUFFIX);
        Ok(url)
    }

    /// Deliver `results` for `calculation_id`.
    ///
    /// # Errors
    ///
    /// - [`CaviError::DeliveryTransport`] on connection, DNS or timeout failures.
    /// - [`CaviError::DeliveryRejected`] when the backend answers anything but 200.
    pub async fn deliver(
        &self,
        calculation_id: &CalculationId,
        results: &[GroupResult],
    ) -> CaviResult<()> {
        let url = self.result_url(calculation_id)?;
        let payload = DeliveryPayload {
            token: &self.token,
            groups_count: results.len(),
            results,
        };

        tracing::debug!(%url, groups_count = results.len(), "sending results");
        let response = self
            .http
            .put(url)
            .json(&payload)
            .send()
            .await
            .map_err(CaviError::DeliveryTransport)?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        truncate_at_char_boundary(&mut body, DELIVERY_ERROR_BODY_LIMIT);
        Err(CaviError::DeliveryRejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn truncate_at_char_boundary(text: &mut String, limit: usize) {
    if text.len() <= limit {
        return;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
