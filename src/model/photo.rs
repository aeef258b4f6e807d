//! Photo value type.

use std::fmt;

/// A single search hit.
///
/// `url` is never stored by the provider; it is derived from the photo's
/// farm, server, id and secret when the wire record is mapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Photo {
    /// Provider photo id.
    pub id: String,
    /// Direct image URL.
    pub url: String,
}

impl Photo {
    /// Photo with an already known URL.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Build a photo from the Flickr record fields.
    ///
    /// URL template: `https://farm{farm}.static.flickr.com/{server}/{id}_{secret}.jpg`
    pub fn from_flickr(farm: u32, server: &str, id: &str, secret: &str) -> Self {
        Self {
            id: id.to_string(),
            url: format!("https://farm{farm}.static.flickr.com/{server}/{id}_{secret}.jpg"),
        }
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.url)
    }
}
