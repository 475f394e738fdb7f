use serde::Deserialize;
use tracing::debug;
use wayfinder_routing::geopoint::GeoPoint;

use crate::capabilities::PlaceAutocomplete;
use crate::error::ProviderError;
use crate::location::PlacePrediction;

pub struct PlacesClientParams {
    pub api_key: String,
    pub base_url: String,
}

/// HTTP implementation of the place-autocomplete capability against a
/// Places-style REST API.
pub struct PlacesHttpClient {
    params: PlacesClientParams,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct PredictionsResponse {
    #[serde(default)]
    predictions: Vec<RawPrediction>,
}

#[derive(Deserialize)]
struct RawPrediction {
    place_id: String,
    description: String,
    #[serde(default)]
    secondary_text: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    lat: f64,
    lng: f64,
}

impl PlacesHttpClient {
    pub fn new(params: PlacesClientParams) -> PlacesHttpClient {
        PlacesHttpClient {
            params,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.params.base_url, path);
        debug!("PlacesHttpClient: GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("key", self.params.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

impl PlaceAutocomplete for PlacesHttpClient {
    async fn predict(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        let mut params = vec![("input", query)];
        if let Some(country) = country {
            params.push(("country", country));
        }

        let response: PredictionsResponse = self.get_json("autocomplete", &params).await?;

        Ok(response
            .predictions
            .into_iter()
            .map(|prediction| PlacePrediction {
                place_id: prediction.place_id,
                primary_text: prediction.description,
                secondary_text: prediction.secondary_text,
            })
            .collect())
    }

    async fn geocode(&self, place_id: &str) -> Result<GeoPoint, ProviderError> {
        let response: GeocodeResponse = self
            .get_json("geocode", &[("place_id", place_id)])
            .await?;

        Ok(GeoPoint::new(response.lat, response.lng))
    }
}
