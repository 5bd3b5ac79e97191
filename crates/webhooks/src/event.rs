//! Inbound event notifications.
//!
//! One webhook POST carries a single JSON object: a `data_type` tag, the
//! event header fields, and the fields of up to three optional groups
//! (device, person, place) flattened alongside them. A group is present
//! whenever at least one of its keys appears in the body; missing members
//! default to empty. Consumers must branch on group presence, not on
//! `data_type`, since the provider does not keep the two consistent.

use serde::Deserialize;

use crate::intid::IntId;

/// Change kind declared by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    Add,
    Delete,
    Update,
    /// Unrecognized wire value, carried verbatim.
    Other(String),
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "add" => ActionType::Add,
            "delete" => ActionType::Delete,
            "update" => ActionType::Update,
            _ => ActionType::Other(value),
        }
    }
}

impl ActionType {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::Add => "add",
            ActionType::Delete => "delete",
            ActionType::Update => "update",
            ActionType::Other(value) => value,
        }
    }
}

/// Payload category declared by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    CheckinPicture,
    Device,
    Log,
    Person,
    Place,
    /// Unrecognized wire value, carried verbatim.
    Other(String),
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "checkin_picture" => DataType::CheckinPicture,
            "device" => DataType::Device,
            "log" => DataType::Log,
            "person" => DataType::Person,
            "place" => DataType::Place,
            _ => DataType::Other(value),
        }
    }
}

impl DataType {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            DataType::CheckinPicture => "checkin_picture",
            DataType::Device => "device",
            DataType::Log => "log",
            DataType::Person => "person",
            DataType::Place => "place",
            DataType::Other(value) => value,
        }
    }
}

/// Person classification code.
///
/// `"0"`, `"1"` and `"2"` are the documented codes; any other value is
/// carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PersonType {
    Employee,
    Customer,
    Stranger,
    Other(String),
}

impl From<String> for PersonType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "0" => PersonType::Employee,
            "1" => PersonType::Customer,
            "2" => PersonType::Stranger,
            _ => PersonType::Other(value),
        }
    }
}

impl PersonType {
    /// Returns the wire code.
    pub fn code(&self) -> &str {
        match self {
            PersonType::Employee => "0",
            PersonType::Customer => "1",
            PersonType::Stranger => "2",
            PersonType::Other(value) => value,
        }
    }

    /// Human-readable label, used for metrics tagging.
    pub fn label(&self) -> String {
        match self {
            PersonType::Employee => "Employee".to_string(),
            PersonType::Customer => "Customer".to_string(),
            PersonType::Stranger => "Stranger".to_string(),
            PersonType::Other(value) => format!("unknown: {value}"),
        }
    }
}

/// Fields common to every event.
#[derive(Debug, Clone)]
pub struct EventHeader {
    pub action: ActionType,
    /// Opaque date string as the provider formats it.
    pub date: String,
    pub keycode: String,
    /// Hex digest declared by the sender; checked by
    /// [`SignatureVerifier`](crate::SignatureVerifier).
    pub signature: String,
    pub event_id: String,
    /// Capture time in epoch milliseconds; 0 when the device sent none.
    pub client_time_ms: u64,
}

/// Device group of an event.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub device_id: String,
    pub device_name: String,
}

/// Person group of an event.
#[derive(Debug, Clone)]
pub struct PersonInfo {
    pub detected_image_url: String,
    pub person_id: String,
    pub alias_id: String,
    pub person_name: String,
    pub person_type: PersonType,
}

/// Place group of an event.
#[derive(Debug, Clone)]
pub struct PlaceInfo {
    pub place_id: IntId,
    pub place_name: String,
}

/// One decoded webhook notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawEvent")]
pub struct Event {
    pub data_type: DataType,
    pub header: EventHeader,
    pub device: Option<DeviceInfo>,
    pub person: Option<PersonInfo>,
    pub place: Option<PlaceInfo>,
}

/// Wire mirror of [`Event`]. Every key is optional so any subset of groups
/// decodes; unknown keys are ignored.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    data_type: Option<String>,

    #[serde(default)]
    action_type: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    keycode: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    time: Option<u64>,

    #[serde(rename = "deviceID", default)]
    device_id: Option<String>,
    #[serde(rename = "deviceName", default)]
    device_name: Option<String>,

    #[serde(default)]
    detected_image_url: Option<String>,
    #[serde(rename = "personID", default)]
    person_id: Option<String>,
    #[serde(rename = "aliasID", default)]
    alias_id: Option<String>,
    #[serde(rename = "personName", default)]
    person_name: Option<String>,
    #[serde(rename = "personType", default)]
    person_type: Option<PersonType>,

    #[serde(rename = "placeID", default)]
    place_id: Option<IntId>,
    #[serde(rename = "placeName", default)]
    place_name: Option<String>,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let device = if raw.device_id.is_some() || raw.device_name.is_some() {
            Some(DeviceInfo {
                device_id: raw.device_id.unwrap_or_default(),
                device_name: raw.device_name.unwrap_or_default(),
            })
        } else {
            None
        };

        let person = if raw.detected_image_url.is_some()
            || raw.person_id.is_some()
            || raw.alias_id.is_some()
            || raw.person_name.is_some()
            || raw.person_type.is_some()
        {
            Some(PersonInfo {
                detected_image_url: raw.detected_image_url.unwrap_or_default(),
                person_id: raw.person_id.unwrap_or_default(),
                alias_id: raw.alias_id.unwrap_or_default(),
                person_name: raw.person_name.unwrap_or_default(),
                person_type: raw
                    .person_type
                    .unwrap_or_else(|| PersonType::Other(String::new())),
            })
        } else {
            None
        };

        let place = if raw.place_id.is_some() || raw.place_name.is_some() {
            Some(PlaceInfo {
                place_id: raw.place_id.unwrap_or_default(),
                place_name: raw.place_name.unwrap_or_default(),
            })
        } else {
            None
        };

        Event {
            data_type: raw
                .data_type
                .map(DataType::from)
                .unwrap_or_else(|| DataType::Other(String::new())),
            header: EventHeader {
                action: raw
                    .action_type
                    .map(ActionType::from)
                    .unwrap_or_else(|| ActionType::Other(String::new())),
                date: raw.date.unwrap_or_default(),
                keycode: raw.keycode.unwrap_or_default(),
                signature: raw.hash.unwrap_or_default(),
                event_id: raw.id.unwrap_or_default(),
                client_time_ms: raw.time.unwrap_or(0),
            },
            device,
            person,
            place,
        }
    }
}
