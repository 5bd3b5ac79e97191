//! Account profile endpoints.

use serde::Deserialize;

use crate::{ApiResult, Client};

/// The authenticated partner account.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Service for the account profile.
pub struct ProfileService<'a> {
    pub(crate) client: &'a Client,
}

impl ProfileService<'_> {
    /// Fetches the authenticated account's profile.
    pub async fn me(&self) -> ApiResult<Profile> {
        self.client
            .post_form("profile/getProfile", Vec::new())
            .await
    }
}
