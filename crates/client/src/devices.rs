//! Device management endpoints.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{ApiResult, Client};

/// Online state of one device.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub device_id: String,
    pub is_online: bool,
}

/// A device as listed by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "deviceID", default)]
    pub device_id: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "placeID", default)]
    pub place_id: i64,
    #[serde(rename = "placeName", default)]
    pub place_name: String,
}

/// Service for device management.
pub struct DeviceService<'a> {
    pub(crate) client: &'a Client,
}

impl DeviceService<'_> {
    /// Reports whether each requested device is online.
    pub async fn connection_status(
        &self,
        device_ids: &[String],
    ) -> ApiResult<Vec<ConnectionStatus>> {
        let mut form = Vec::with_capacity(device_ids.len());
        for id in device_ids {
            form.push(("deviceIDs", id.clone()));
        }

        let statuses: HashMap<String, bool> = self
            .client
            .post_form("device/get-connection-status", form)
            .await?;

        Ok(statuses
            .into_iter()
            .map(|(device_id, is_online)| ConnectionStatus {
                device_id,
                is_online,
            })
            .collect())
    }

    /// Lists every device on the account.
    pub async fn list(&self) -> ApiResult<Vec<DeviceInfo>> {
        self.client
            .post_form("device/get-list-device", Vec::new())
            .await
    }

    /// Lists the devices installed at one place.
    pub async fn list_by_place(&self, place_id: i64) -> ApiResult<Vec<DeviceInfo>> {
        self.client
            .post_form(
                "device/get-list-device-by-place",
                vec![("placeID", place_id.to_string())],
            )
            .await
    }

    /// Renames a device.
    pub async fn update(&self, device_id: &str, device_name: &str) -> ApiResult<()> {
        self.client
            .post_form_discard(
                "device/updateDevice",
                vec![
                    ("deviceID", device_id.to_string()),
                    ("deviceName", device_name.to_string()),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_listing_decodes_provider_keys() {
        let body = r#"[{
            "deviceID": "d-1",
            "deviceName": "Lobby Gate",
            "address": "Floor 1",
            "placeID": 12,
            "placeName": "HQ"
        }]"#;

        let devices: Vec<DeviceInfo> = serde_json::from_str(body).unwrap();
        assert_eq!(devices[0].device_id, "d-1");
        assert_eq!(devices[0].place_id, 12);
    }
}
