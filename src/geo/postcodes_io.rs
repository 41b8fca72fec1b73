//! postcodes.io bulk lookup client.

use super::PostcodeLookup;
use crate::error::ImportError;
use crate::models::GeoResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Debug)]
struct BulkRequest<'a> {
    postcodes: &'a [String],
}

/// Response body of `POST /postcodes`.
#[derive(Deserialize, Debug)]
struct BulkResponse {
    result: Vec<BulkItem>,
}

#[derive(Deserialize, Debug)]
struct BulkItem {
    query: String,
    /// `null` when the postcode is unknown.
    result: Option<Location>,
}

#[derive(Deserialize, Debug)]
struct Location {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<BulkItem> for GeoResult {
    fn from(item: BulkItem) -> Self {
        match item.result {
            Some(Location {
                latitude: Some(latitude),
                longitude: Some(longitude),
            }) => GeoResult {
                postcode: item.query,
                latitude,
                longitude,
            },
            _ => GeoResult::unresolved(&item.query),
        }
    }
}

pub struct PostcodesIoClient {
    client: reqwest::Client,
    url: String,
}

impl PostcodesIoClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Config(format!("HTTP client: {e}")))?;
        Ok(PostcodesIoClient {
            client,
            url: url.to_string(),
        })
    }
}

/// Decode a bulk response body, naming the JSON path on failure.
fn decode_bulk(body: &str) -> Result<Vec<GeoResult>, ImportError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    let parsed: BulkResponse =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            log::error!("RESPONSE START:\n\n{body}\n\nRESPONSE END\n");
            ImportError::PostcodeDecode {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            }
        })?;
    Ok(parsed.result.into_iter().map(GeoResult::from).collect())
}

impl PostcodeLookup for PostcodesIoClient {
    async fn lookup(&self, postcodes: &[String]) -> Result<Vec<GeoResult>, ImportError> {
        log::debug!("POST {} with {} postcodes", self.url, postcodes.len());
        let response = self
            .client
            .post(&self.url)
            .json(&BulkRequest { postcodes })
            .send()
            .await
            .map_err(|source| ImportError::PostcodeConnect {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ImportError::PostcodeConnect {
                url: self.url.clone(),
                source,
            })?;
        if !status.is_success() {
            return Err(ImportError::PostcodeStatus {
                url: self.url.clone(),
                status: status.as_u16(),
                body,
            });
        }
        decode_bulk(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bulk_with_unknown_postcode() {
        let body = r#"{
            "status": 200,
            "result": [
                {"query": "LS11UR", "result": {"postcode": "LS1 1UR", "latitude": 53.796, "longitude": -1.5477}},
                {"query": "ZZ99ZZ", "result": null}
            ]
        }"#;
        let results = decode_bulk(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].postcode, "LS11UR");
        assert_eq!(results[0].latitude, 53.796);
        assert_eq!(results[0].longitude, -1.5477);
        assert!(results[1].latitude.is_nan());
        assert!(!results[1].is_resolved());
    }

    #[test]
    fn test_decode_bulk_names_bad_path() {
        let body = r#"{"status": 200, "result": [{"query": "LS11UR", "result": {"latitude": "north"}}]}"#;
        match decode_bulk(body) {
            Err(ImportError::PostcodeDecode { path, .. }) => {
                assert_eq!(path, "result[0].result.latitude");
            }
            other => panic!("expected PostcodeDecode, got {other:?}"),
        }
        assert!(matches!(
            decode_bulk("<html>busy</html>"),
            Err(ImportError::PostcodeDecode { .. })
        ));
    }
}
