use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video record as held by the metadata store.
///
/// The upload pipeline only reads this and requests updates to the locator
/// fields and `updated_at`; `user_id` is set at creation and never changed
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    /// Locator for the stored thumbnail asset, if one has been uploaded.
    pub thumbnail_url: Option<String>,
    /// Locator for the stored video asset, if one has been uploaded.
    pub video_url: Option<String>,
    /// Owner of the record; only this principal may mutate the locators.
    pub user_id: Uuid,
}

impl Video {
    /// Replace the thumbnail locator and touch the modification timestamp.
    pub fn set_thumbnail_url(&mut self, locator: String) {
        self.thumbnail_url = Some(locator);
        self.updated_at = Utc::now();
    }

    /// Replace the video locator and touch the modification timestamp.
    pub fn set_video_url(&mut self, locator: String) {
        self.video_url = Some(locator);
        self.updated_at = Utc::now();
    }
}
