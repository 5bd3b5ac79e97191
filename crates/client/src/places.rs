//! Place management endpoints.

use serde::Deserialize;

use crate::{ApiResult, Client};

/// A place (site) registered with the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Service for place management.
pub struct PlaceService<'a> {
    pub(crate) client: &'a Client,
}

impl PlaceService<'_> {
    /// Registers a new place.
    pub async fn add(&self, place: &Place) -> ApiResult<Place> {
        self.client
            .post_form("place/addPlace", place_form(place))
            .await
    }

    /// Updates a place.
    pub async fn update(&self, place: &Place) -> ApiResult<()> {
        self.client
            .post_form_discard("place/updatePlace", place_form(place))
            .await
    }

    /// Lists every place visible to the caller.
    pub async fn list(&self) -> ApiResult<Vec<Place>> {
        self.client.post_form("place/getPlaces", Vec::new()).await
    }

    /// Removes a place.
    pub async fn remove(&self, place: &Place) -> ApiResult<()> {
        self.client
            .post_form_discard("place/removePlace", place_form(place))
            .await
    }
}

fn place_form(place: &Place) -> Vec<(&'static str, String)> {
    vec![
        ("placeID", place.id.to_string()),
        ("name", place.name.clone()),
        ("address", place.address.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_uses_provider_keys() {
        let place = Place {
            id: 12,
            name: "HQ".to_string(),
            address: "12 Ly Thuong Kiet".to_string(),
        };
        assert_eq!(
            place_form(&place),
            vec![
                ("placeID", "12".to_string()),
                ("name", "HQ".to_string()),
                ("address", "12 Ly Thuong Kiet".to_string()),
            ]
        );
    }
}
