//! Mapping provider adapter for the Google Directions web service.
//!
//! Translates the provider's JSON (`status`, `routes[].overview_polyline`,
//! `routes[].legs[]`) into a [`ProviderResponse`] carrying a
//! [`RouteGeometry`] whose markers are the first leg's start and the last
//! leg's end.

use async_trait::async_trait;
use chapchap_geography_models::GeoPoint;
use chapchap_route_models::{ProviderRequest, ProviderResponse, ProviderStatus, RouteGeometry};
use serde::Deserialize;

use crate::retry::{self, RetryPolicy};
use crate::{ClientError, MappingProvider, REQUEST_TIMEOUT, USER_AGENT};

/// Default Directions endpoint.
pub const DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Encoded polyline precision (5 decimal places).
const POLYLINE_FACTOR: f64 = 1e5;

#[derive(Debug, Deserialize)]
struct DirectionsBody {
    status: ProviderStatus,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    start_location: GeoPoint,
    end_location: GeoPoint,
}

impl DirectionsBody {
    fn into_response(self) -> ProviderResponse {
        let geometry = if self.status == ProviderStatus::Ok {
            self.routes.into_iter().next().and_then(route_geometry)
        } else {
            None
        };
        ProviderResponse {
            status: self.status,
            geometry,
        }
    }
}

fn route_geometry(route: DirectionsRoute) -> Option<RouteGeometry> {
    let polyline = decode_polyline(&route.overview_polyline.points)?;
    let origin = route.legs.first()?.start_location;
    let destination = route.legs.last()?.end_location;
    Some(RouteGeometry {
        polyline,
        markers: vec![origin, destination],
    })
}

/// Client for the Directions web service.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    policy: RetryPolicy,
}

impl DirectionsClient {
    /// Creates a client using `api_key` against [`DIRECTIONS_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: DIRECTIONS_ENDPOINT.to_string(),
            api_key: api_key.into(),
            policy: RetryPolicy::DEFAULT,
        })
    }

    /// Points the client at another endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl MappingProvider for DirectionsClient {
    async fn directions(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ClientError> {
        let mode = request.travel_mode.as_ref().to_ascii_lowercase();
        let avoid = [
            (request.avoid_highways, "highways"),
            (request.avoid_tolls, "tolls"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect::<Vec<_>>()
        .join("|");

        let mut query = vec![
            ("origin", request.origin.as_str()),
            ("destination", request.destination.as_str()),
            ("mode", mode.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if !avoid.is_empty() {
            query.push(("avoid", avoid.as_str()));
        }

        let body: DirectionsBody =
            retry::send_json(&self.policy, || self.client.get(&self.endpoint).query(&query))
                .await?;

        if body.status != ProviderStatus::Ok {
            log::warn!(
                "Directions {} -> {} returned {}",
                request.origin,
                request.destination,
                body.status
            );
        }
        Ok(body.into_response())
    }
}

/// Decodes an encoded polyline (precision 5).
///
/// Returns `None` if the input is truncated or contains bytes outside the
/// encoding alphabet.
#[must_use]
pub fn decode_polyline(encoded: &str) -> Option<Vec<GeoPoint>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        lng += next_delta(bytes, &mut index)?;
        #[allow(clippy::cast_precision_loss)]
        let point = GeoPoint::new(lat as f64 / POLYLINE_FACTOR, lng as f64 / POLYLINE_FACTOR);
        points.push(point);
    }

    Some(points)
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result = 0i64;
    let mut shift = 0;
    loop {
        let chunk = i64::from(*bytes.get(*index)?) - 63;
        *index += 1;
        if !(0..64).contains(&chunk) || shift > 60 {
            return None;
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Some(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;

    fn close(a: GeoPoint, lat: f64, lng: f64) -> bool {
        (a.lat - lat).abs() < 1e-9 && (a.lng - lng).abs() < 1e-9
    }

    #[test]
    fn decodes_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);
        assert!(close(points[0], 38.5, -120.2));
        assert!(close(points[1], 40.7, -120.95));
        assert!(close(points[2], 43.252, -126.453));
    }

    #[test]
    fn truncated_polyline_is_rejected() {
        assert_eq!(decode_polyline("_p~iF"), None);
        assert_eq!(decode_polyline(""), Some(Vec::new()));
    }

    #[test]
    fn failed_status_carries_no_geometry() {
        let body: DirectionsBody =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","routes":[]}"#).unwrap();
        let response = body.into_response();
        assert_eq!(response.status, ProviderStatus::ZeroResults);
        assert_eq!(response.geometry, None);
    }

    #[tokio::test]
    async fn directions_are_mapped_to_geometry() {
        let (url, _) = test_server::serve(vec![(
            200,
            r#"{"status":"OK","routes":[{"overview_polyline":{"points":"_p~iF~ps|U_ulLnnqC_mqNvxq`@"},"legs":[{"start_location":{"lat":38.5,"lng":-120.2},"end_location":{"lat":43.252,"lng":-126.453}}]}]}"#,
        )])
        .await;
        let client = DirectionsClient::new("test-key")
            .unwrap()
            .with_endpoint(url);

        let response = client
            .directions(&ProviderRequest {
                origin: "A".to_string(),
                destination: "B".to_string(),
                travel_mode: chapchap_route_models::TravelMode::Driving,
                avoid_highways: false,
                avoid_tolls: true,
            })
            .await
            .unwrap();

        assert_eq!(response.status, ProviderStatus::Ok);
        let geometry = response.geometry.unwrap();
        assert_eq!(geometry.polyline.len(), 3);
        assert_eq!(
            geometry.markers,
            vec![GeoPoint::new(38.5, -120.2), GeoPoint::new(43.252, -126.453)]
        );
    }
}
