//! RIPEstat `network-info` client: which announced block covers an address.

use super::RouteLookup;
use crate::error::ImportError;
use crate::models::Ipv4;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug)]
struct NetworkInfoResponse {
    data: NetworkInfo,
}

#[derive(Deserialize, Debug)]
struct NetworkInfo {
    #[serde(default)]
    asns: Vec<String>,
    /// Empty or absent when the address is not announced.
    #[serde(default)]
    prefix: Option<String>,
}

pub struct RipeStatClient {
    client: reqwest::Client,
    url: String,
}

impl RipeStatClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Config(format!("HTTP client: {e}")))?;
        Ok(RipeStatClient {
            client,
            url: url.to_string(),
        })
    }
}

/// Pull the announced block out of a `network-info` body.
fn decode_network_info(body: &str) -> Result<Ipv4, String> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    let parsed: NetworkInfoResponse = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("unexpected response at '{}': {}", e.path(), e.inner()))?;
    let prefix = parsed
        .data
        .prefix
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| "address is not covered by an announced prefix".to_string())?;
    log::debug!("announced {prefix} by AS{}", parsed.data.asns.join(",AS"));
    Ipv4::new(&prefix).map_err(|e| format!("announced prefix '{prefix}': {e}"))
}

impl RouteLookup for RipeStatClient {
    async fn owning_block(&self, prefix: &Ipv4) -> Result<Ipv4, ImportError> {
        let failed = |message: String| ImportError::RouteLookup {
            prefix: prefix.to_string(),
            message,
        };
        let resource = prefix.lo().to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("resource", resource.as_str())])
            .send()
            .await
            .map_err(|e| failed(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| failed(format!("reading response: {e}")))?;
        if !status.is_success() {
            return Err(failed(format!("HTTP {}: {body}", status.as_u16())));
        }
        decode_network_info(&body).map_err(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_network_info() {
        let body = r#"{"status": "ok", "data": {"asns": ["2856"], "prefix": "81.2.64.0/18"}}"#;
        assert_eq!(
            decode_network_info(body).unwrap(),
            Ipv4::new("81.2.64.0/18").unwrap()
        );
    }

    #[test]
    fn test_unannounced_address_is_error() {
        let body = r#"{"status": "ok", "data": {"asns": [], "prefix": ""}}"#;
        let err = decode_network_info(body).unwrap_err();
        assert!(err.contains("not covered"), "{err}");
        let body = r#"{"status": "ok", "data": {"asns": []}}"#;
        assert!(decode_network_info(body).is_err());
    }

    #[test]
    fn test_garbage_body_names_path() {
        let err = decode_network_info(r#"{"data": {"prefix": 42}}"#).unwrap_err();
        assert!(err.contains("data.prefix"), "{err}");
    }
}
