//! AI reorder-suggestion client.
//!
//! Talks to the generative text service through a schema-constrained
//! JSON contract: the request carries the product's stock picture, the
//! response must parse into a non-negative quantity plus a textual
//! rationale, anything else is rejected at this boundary. Responses are
//! cached so repeated clicks on the same product do not re-bill the
//! service.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ReorderConfig;

/// Cached suggestions per distinct input.
const CACHE_CAPACITY: u64 = 1_024;

/// How long a cached suggestion stays fresh.
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors that can occur when requesting a suggestion.
#[derive(Debug, Error)]
pub enum ReorderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response did not match the expected schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service suggested a quantity below zero.
    #[error("service suggested a negative quantity: {0}")]
    NegativeQuantity(i64),

    /// No suggestion endpoint is configured.
    #[error("reorder suggestions are not configured")]
    Disabled,
}

/// Input to the suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    pub product_name: String,
    pub current_stock: u32,
    pub stock_minimum: u32,
    pub average_sales_per_day: u32,
    pub days_to_restock: u32,
}

/// A validated suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSuggestion {
    /// Units to reorder; always ≥ 0.
    pub reorder_quantity: u32,
    /// The service's rationale for the quantity.
    pub reasoning: String,
}

/// Raw wire shape, before the quantity is range-checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    reorder_quantity: i64,
    reasoning: String,
}

/// Client for the reorder-suggestion service.
#[derive(Clone)]
pub struct ReorderClient {
    client: reqwest::Client,
    endpoint: Url,
    cache: moka::future::Cache<SuggestionInput, ReorderSuggestion>,
}

impl ReorderClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the API key is
    /// not a valid header value.
    pub fn new(config: &ReorderConfig) -> Result<Self, ReorderError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ReorderError::Parse(format!("invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            cache: moka::future::Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        })
    }

    /// Request a reorder quantity for the given stock picture.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError::Api`] for non-success responses,
    /// [`ReorderError::Parse`] when the body does not match the schema, and
    /// [`ReorderError::NegativeQuantity`] when the quantity is out of range.
    #[instrument(skip(self), fields(product = %input.product_name))]
    pub async fn suggest(&self, input: &SuggestionInput) -> Result<ReorderSuggestion, ReorderError> {
        if let Some(hit) = self.cache.get(input).await {
            tracing::debug!("suggestion served from cache");
            return Ok(hit);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReorderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawSuggestion = response
            .json()
            .await
            .map_err(|e| ReorderError::Parse(e.to_string()))?;

        let reorder_quantity = u32::try_from(raw.reorder_quantity)
            .map_err(|_| ReorderError::NegativeQuantity(raw.reorder_quantity))?;

        let suggestion = ReorderSuggestion {
            reorder_quantity,
            reasoning: raw.reasoning,
        };
        self.cache.insert(input.clone(), suggestion.clone()).await;
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_serializes_with_the_service_field_names() {
        let input = SuggestionInput {
            product_name: "Leche Entera".to_owned(),
            current_stock: 5,
            stock_minimum: 10,
            average_sales_per_day: 4,
            days_to_restock: 6,
        };
        let json = serde_json::to_value(&input).expect("serialize");
        assert_eq!(json["productName"], "Leche Entera");
        assert_eq!(json["stockMinimum"], 10);
        assert_eq!(json["daysToRestock"], 6);
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let raw: RawSuggestion =
            serde_json::from_str(r#"{"reorderQuantity":-3,"reasoning":"off"}"#).expect("parse");
        let converted = u32::try_from(raw.reorder_quantity);
        assert!(converted.is_err());
    }
}
