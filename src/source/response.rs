//! Flickr `photos.search` wire format.
//!
//! Raw serde structs mirror the JSON exactly; [`decode_search_response`]
//! converts them into the domain [`PaginatedResult`] at the boundary.

use crate::model::{FetchError, PaginatedResult, Photo};
use serde::Deserialize;

/// Top-level response. Flickr tags every body with `stat`.
#[derive(Debug, Deserialize)]
#[serde(tag = "stat", rename_all = "lowercase")]
enum RawEnvelope {
    Ok { photos: RawPhotoPage },
    Fail { code: i64, message: String },
}

/// Page descriptor plus the photo records on this page.
#[derive(Debug, Deserialize)]
struct RawPhotoPage {
    page: u32,
    pages: u32,
    #[allow(dead_code)]
    perpage: u32,
    total: u64,
    #[serde(rename = "photo", default)]
    items: Vec<RawPhoto>,
}

/// One photo record. Only id, farm, server and secret feed the domain
/// type; the rest is accepted and dropped.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawPhoto {
    id: String,
    #[serde(default)]
    owner: String,
    secret: String,
    server: String,
    #[serde(default)]
    title: String,
    farm: u32,
    #[serde(default)]
    ispublic: u8,
    #[serde(default)]
    isfriend: u8,
    #[serde(default)]
    isfamily: u8,
}

impl RawPhoto {
    fn into_photo(self) -> Photo {
        Photo::from_flickr(self.farm, &self.server, &self.id, &self.secret)
    }
}

impl RawPhotoPage {
    fn into_result(self) -> PaginatedResult {
        PaginatedResult::new(
            self.items.into_iter().map(RawPhoto::into_photo).collect(),
            self.page,
            self.pages,
            self.total,
        )
    }
}

/// Decode a `photos.search` response body.
///
/// # Errors
///
/// - `FetchError::Provider` for a `"stat": "fail"` envelope
/// - `FetchError::Decode` for anything that is not a valid envelope
pub fn decode_search_response(body: &str) -> Result<PaginatedResult, FetchError> {
    match serde_json::from_str::<RawEnvelope>(body)? {
        RawEnvelope::Ok { photos } => Ok(photos.into_result()),
        RawEnvelope::Fail { code, message } => Err(FetchError::Provider { code, message }),
    }
}
