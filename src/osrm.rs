//! OSRM HTTP adapter for road distance matrices.

use serde::Deserialize;
use tracing::warn;

use crate::haversine::HaversineMatrix;
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Road distances from an OSRM `table` service.
///
/// Falls back to great-circle distances when the request fails, so callers
/// always receive a full matrix.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    fallback: HaversineMatrix,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            fallback: HaversineMatrix::default(),
        })
    }

    pub fn table_url(&self, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    fn fetch(&self, locations: &[(f64, f64)]) -> Result<OsrmTableResponse, reqwest::Error> {
        self.client
            .get(self.table_url(locations))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        if locations.is_empty() {
            return Vec::new();
        }

        match self.fetch(locations) {
            Ok(body) => match body.into_km_matrix(locations.len()) {
                Some(matrix) => matrix,
                None => {
                    warn!(base_url = %self.config.base_url, "OSRM table incomplete, using haversine distances");
                    self.fallback.matrix_for(locations)
                }
            },
            Err(err) => {
                warn!(base_url = %self.config.base_url, error = %err, "OSRM request failed, using haversine distances");
                self.fallback.matrix_for(locations)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    /// Metres to kilometres. `None` if the table is missing, misshapen, or
    /// has unroutable (null) entries.
    fn into_km_matrix(self, expected: usize) -> Option<Vec<Vec<f64>>> {
        let rows = self.distances?;
        if rows.len() != expected {
            return None;
        }
        rows.into_iter()
            .map(|row| {
                if row.len() != expected {
                    return None;
                }
                row.into_iter()
                    .map(|value| value.map(|m| m / 1000.0))
                    .collect::<Option<Vec<f64>>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://osrm.local/".to_string(),
            ..OsrmConfig::default()
        })
        .unwrap();
        let url = client.table_url(&[(-17.8252, 31.0335), (-17.8, 31.1)]);
        assert_eq!(
            url,
            "http://osrm.local/table/v1/car/31.033500,-17.825200;31.100000,-17.800000?annotations=distance"
        );
    }

    #[test]
    fn test_response_converts_to_km() {
        let body: OsrmTableResponse =
            serde_json::from_str(r#"{"code":"Ok","distances":[[0,1500.0],[1620.5,0]]}"#).unwrap();
        let matrix = body.into_km_matrix(2).unwrap();
        assert_eq!(matrix, vec![vec![0.0, 1.5], vec![1.6205, 0.0]]);
    }

    #[test]
    fn test_response_with_null_entry_is_rejected() {
        let body: OsrmTableResponse =
            serde_json::from_str(r#"{"distances":[[0,null],[1.0,0]]}"#).unwrap();
        assert!(body.into_km_matrix(2).is_none());
    }

    #[test]
    fn test_response_with_wrong_shape_is_rejected() {
        let body: OsrmTableResponse = serde_json::from_str(r#"{"distances":[[0]]}"#).unwrap();
        assert!(body.into_km_matrix(2).is_none());
    }

    #[test]
    fn test_unreachable_server_falls_back_to_haversine() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..OsrmConfig::default()
        })
        .unwrap();
        let locations = vec![(-17.8252, 31.0335), (-17.8, 31.1)];
        let matrix = client.matrix_for(&locations);
        assert_eq!(matrix, HaversineMatrix::default().matrix_for(&locations));
    }
}
