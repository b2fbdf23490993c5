//! Background photo models and provider adapters.

use serde::{Deserialize, Serialize};

/// Canonical background photo shape, whatever provider produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPhoto {
    pub image_url: String,
    pub attribution_name: String,
    pub attribution_url: String,
}

/// Unsplash `photos/random` response (fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashPhoto {
    pub urls: UnsplashUrls,
    pub user: UnsplashUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashUrls {
    pub regular: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashUser {
    pub name: String,
    pub links: UnsplashUserLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashUserLinks {
    pub html: String,
}

/// Pexels `search` response (fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct PexelsSearch {
    #[serde(default)]
    pub photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PexelsPhoto {
    pub src: PexelsSrc,
    pub photographer: String,
    pub photographer_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PexelsSrc {
    #[serde(default)]
    pub landscape: Option<String>,
    pub large: String,
}

/// Provider responses, normalised through [`ProviderPhoto::into_background`].
#[derive(Debug, Clone)]
pub enum ProviderPhoto {
    Unsplash(UnsplashPhoto),
    Pexels(PexelsPhoto),
}

impl ProviderPhoto {
    pub fn into_background(self) -> BackgroundPhoto {
        match self {
            ProviderPhoto::Unsplash(photo) => BackgroundPhoto {
                image_url: photo.urls.regular,
                attribution_name: photo.user.name,
                attribution_url: photo.user.links.html,
            },
            ProviderPhoto::Pexels(photo) => BackgroundPhoto {
                image_url: photo.src.landscape.unwrap_or(photo.src.large),
                attribution_name: photo.photographer,
                attribution_url: photo.photographer_url,
            },
        }
    }
}
