//! Person (employee/visitor) management endpoints.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{ApiResult, Client};

const UPLOAD_FILE_NAME: &str = "face.jpg";

/// A registered person.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "aliasID", default)]
    pub alias_id: String,
    #[serde(rename = "placeID", default)]
    pub place_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub person_type: i64,
}

/// Registration input: face image plus identity fields.
pub struct RegisterPersonRequest {
    pub name: String,
    pub alias_id: String,
    pub place_id: i64,
    pub title: String,
    /// Person classification code, e.g. `"0"` for employees.
    pub person_type: String,
    /// Face image bytes (JPEG).
    pub image: Vec<u8>,
}

/// Registration input with a hosted image instead of an upload.
pub struct RegisterPersonByUrlRequest {
    pub name: String,
    pub alias_id: String,
    pub place_id: i64,
    pub title: String,
    pub person_type: String,
    pub image_url: String,
}

/// Response from the registration endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPersonResponse {
    #[serde(flatten)]
    pub person: Person,
    #[serde(rename = "personID", default)]
    pub person_id: String,
    #[serde(default)]
    pub file: String,
}

/// Person fields updatable through [`PersonService::update`].
#[derive(Debug, Clone, Serialize)]
pub struct PersonUpdate {
    pub name: String,
    pub title: String,
}

/// Query for [`PersonService::list_by_place`].
#[derive(Debug, Clone)]
pub struct PersonListQuery {
    pub place_id: i64,
    /// Person classification code filter.
    pub person_type: String,
    pub page: i64,
    pub size: i64,
}

/// One row of a person listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonListItem {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "aliasID", default)]
    pub alias_id: String,
    #[serde(rename = "personID", default)]
    pub person_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub avatar: String,
}

/// A listing row qualified with the place it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonListItemWithPlace {
    #[serde(flatten)]
    pub item: PersonListItem,
    #[serde(rename = "placeID", default)]
    pub place_id: i64,
}

/// Requested avatar render size.
#[derive(Debug, Clone, Copy)]
pub struct AvatarSize {
    pub height: u32,
    pub width: u32,
}

impl AvatarSize {
    /// Appends the size to a request form.
    pub fn apply(&self, form: &mut Vec<(&'static str, String)>) {
        form.push(("height", self.height.to_string()));
        form.push(("width", self.width.to_string()));
    }
}

impl Default for AvatarSize {
    /// The provider's default render size.
    fn default() -> Self {
        Self {
            height: 736,
            width: 1280,
        }
    }
}

/// Service for person management.
pub struct PersonService<'a> {
    pub(crate) client: &'a Client,
}

impl PersonService<'_> {
    /// Registers a person with a face image.
    ///
    /// On [`ERR_DUPLICATED_IMAGE`](crate::ERR_DUPLICATED_IMAGE) the returned
    /// server error carries the person already registered under that face.
    pub async fn register(
        &self,
        request: RegisterPersonRequest,
    ) -> ApiResult<RegisterPersonResponse> {
        let form = Form::new()
            .text("name", request.name)
            .text("aliasID", request.alias_id)
            .text("placeID", request.place_id.to_string())
            .text("title", request.title)
            .text("type", request.person_type)
            .part(
                "file",
                Part::bytes(request.image).file_name(UPLOAD_FILE_NAME),
            );

        self.client.post_multipart("person/register", form).await
    }

    /// Registers a person from a hosted face image.
    pub async fn register_by_url(
        &self,
        request: RegisterPersonByUrlRequest,
    ) -> ApiResult<RegisterPersonResponse> {
        let form = Form::new()
            .text("name", request.name)
            .text("url", request.image_url)
            .text("aliasID", request.alias_id)
            .text("placeID", request.place_id.to_string())
            .text("title", request.title)
            .text("type", request.person_type);

        self.client
            .post_multipart("person/registerByUrl", form)
            .await
    }

    /// Replaces the face image of an existing person.
    pub async fn update_face_image(
        &self,
        alias_id: &str,
        place_id: i64,
        image: Vec<u8>,
    ) -> ApiResult<()> {
        let form = Form::new()
            .text("aliasID", alias_id.to_string())
            .text("placeID", place_id.to_string())
            .part("file", Part::bytes(image).file_name(UPLOAD_FILE_NAME));

        self.client
            .post_multipart_discard("person/updateByFaceImage", form)
            .await
    }

    /// Replaces the face image of an existing person from a hosted image.
    pub async fn update_face_url(
        &self,
        alias_id: &str,
        place_id: i64,
        image_url: &str,
    ) -> ApiResult<()> {
        let form = Form::new()
            .text("url", image_url.to_string())
            .text("aliasID", alias_id.to_string())
            .text("placeID", place_id.to_string());

        self.client
            .post_multipart_discard("person/updateByFaceUrl", form)
            .await
    }

    /// Removes a person from every place by alias id.
    pub async fn remove(&self, alias_id: &str) -> ApiResult<()> {
        self.client
            .post_form_discard("person/remove", vec![("aliasID", alias_id.to_string())])
            .await
    }

    /// Removes a person from one place.
    pub async fn remove_by_place(&self, alias_id: &str, place_id: i64) -> ApiResult<()> {
        self.client
            .post_form_discard(
                "person/removeByPlace",
                vec![
                    ("aliasID", alias_id.to_string()),
                    ("placeID", place_id.to_string()),
                ],
            )
            .await
    }

    /// Removes several persons across several places in one call.
    pub async fn remove_by_alias_ids(
        &self,
        alias_ids: &[String],
        place_ids: &[i64],
    ) -> ApiResult<()> {
        let place_ids = place_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        self.client
            .post_form_discard(
                "person/removePersonByListAliasID",
                vec![
                    ("aliasIDs", alias_ids.join(",")),
                    ("placeIDs", place_ids),
                ],
            )
            .await
    }

    /// Removes a person by provider-assigned id.
    pub async fn remove_by_id(&self, person_id: &str) -> ApiResult<()> {
        self.client
            .post_form_discard(
                "person/removePersonByID",
                vec![("personID", person_id.to_string())],
            )
            .await
    }

    /// Updates name and title; the provider takes the changes as a JSON
    /// object in the `updates` form field.
    pub async fn update(
        &self,
        alias_id: &str,
        place_id: i64,
        update: &PersonUpdate,
    ) -> ApiResult<()> {
        let updates = serde_json::to_string(update)?;

        self.client
            .post_form_discard(
                "person/update",
                vec![
                    ("aliasID", alias_id.to_string()),
                    ("placeID", place_id.to_string()),
                    ("updates", updates),
                ],
            )
            .await
    }

    /// Re-keys a person to a new alias id.
    pub async fn update_alias_id(&self, person_id: &str, alias_id: &str) -> ApiResult<()> {
        self.client
            .post_form_discard(
                "person/updateAliasID",
                vec![
                    // `persionID` is the provider's spelling, not ours.
                    ("persionID", person_id.to_string()),
                    ("aliasID", alias_id.to_string()),
                ],
            )
            .await
    }

    /// Pages through the persons registered at a place.
    pub async fn list_by_place(
        &self,
        query: &PersonListQuery,
    ) -> ApiResult<Vec<PersonListItem>> {
        self.client
            .post_form(
                "person/getListByPlace",
                vec![
                    ("placeID", query.place_id.to_string()),
                    ("type", query.person_type.clone()),
                    ("page", query.page.to_string()),
                    ("size", query.size.to_string()),
                ],
            )
            .await
    }

    /// Lists a person's registrations across every place.
    pub async fn list_by_alias_all_places(
        &self,
        alias_id: &str,
    ) -> ApiResult<Vec<PersonListItemWithPlace>> {
        self.client
            .post_form(
                "person/getListByAliasIDAllPlace",
                vec![("aliasID", alias_id.to_string())],
            )
            .await
    }

    /// Fetches user info rows for an alias id.
    pub async fn user_info_by_alias(
        &self,
        alias_id: &str,
    ) -> ApiResult<Vec<PersonListItemWithPlace>> {
        self.client
            .post_form(
                "person/getUserInfoByAliasID",
                vec![("aliasID", alias_id.to_string())],
            )
            .await
    }

    /// Asks a device to capture a face picture.
    pub async fn take_face_picture(&self, device_id: &str) -> ApiResult<()> {
        self.client
            .post_form_discard(
                "person/takeFacePicture",
                vec![("deviceID", device_id.to_string())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_is_a_json_object() {
        let update = PersonUpdate {
            name: "An Nguyen".to_string(),
            title: "Engineer".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"name":"An Nguyen","title":"Engineer"}"#
        );
    }

    #[test]
    fn register_response_flattens_person_fields() {
        let body = r#"{
            "name": "An",
            "aliasID": "a-1",
            "placeID": 3,
            "title": "Dev",
            "type": 0,
            "personID": "p-1",
            "file": "https://cdn.example.com/faces/p-1.jpg"
        }"#;

        let response: RegisterPersonResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.person.alias_id, "a-1");
        assert_eq!(response.person_id, "p-1");
    }

    #[test]
    fn listing_row_with_place_flattens() {
        let body = r#"[{"name": "An", "aliasID": "a-1", "personID": "p-1", "placeID": 7}]"#;

        let rows: Vec<PersonListItemWithPlace> = serde_json::from_str(body).unwrap();
        assert_eq!(rows[0].item.alias_id, "a-1");
        assert_eq!(rows[0].place_id, 7);
    }

    #[test]
    fn default_avatar_size_matches_provider() {
        let mut form = Vec::new();
        AvatarSize::default().apply(&mut form);
        assert_eq!(
            form,
            vec![
                ("height", "736".to_string()),
                ("width", "1280".to_string()),
            ]
        );
    }
}
