//! Background photo chain: Unsplash, then Pexels, then a bundled image.

use rand::seq::SliceRandom;

use super::chain::{ContentSource, FallbackChain, GuaranteedChain, Resolved, SourceFuture, TerminalSource};
use super::http::UpstreamClient;
use crate::config::Config;
use crate::data::FALLBACK_IMAGES;
use crate::errors::AppError;
use crate::models::{BackgroundPhoto, PexelsSearch, ProviderPhoto, UnsplashPhoto};

pub const UNSPLASH_SOURCE: &str = "unsplash";
pub const PEXELS_SOURCE: &str = "pexels";
pub const LOCAL_IMAGES_SOURCE: &str = "local-images";

const PHOTO_QUERY: &str = "nature";

/// Unsplash random photo. The access key travels in the `Authorization`
/// header so request URLs stay free of secrets.
pub struct UnsplashSource {
    client: UpstreamClient,
    url: String,
    access_key: Option<String>,
}

impl UnsplashSource {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        Self {
            client,
            url: config.unsplash_url.clone(),
            access_key: config.unsplash_access_key.clone(),
        }
    }
}

impl ContentSource<(), BackgroundPhoto> for UnsplashSource {
    fn id(&self) -> &str {
        UNSPLASH_SOURCE
    }

    fn fetch<'a>(&'a self, _request: &'a ()) -> SourceFuture<'a, BackgroundPhoto> {
        Box::pin(async move {
            let key = self.access_key.as_deref().ok_or_else(|| {
                AppError::Config("TABSPIRE_UNSPLASH_ACCESS_KEY is not set".to_string())
            })?;

            let url = format!("{}?query={}&orientation=landscape", self.url, PHOTO_QUERY);
            let authorization = format!("Client-ID {}", key);
            let photo: UnsplashPhoto = self
                .client
                .get_json(&url, &[("authorization", authorization.as_str())])
                .await?;
            Ok(ProviderPhoto::Unsplash(photo).into_background())
        })
    }
}

/// Pexels search, taking one photo at random from the first page.
pub struct PexelsSource {
    client: UpstreamClient,
    url: String,
    api_key: Option<String>,
}

impl ContentSource<(), BackgroundPhoto> for PexelsSource {
    fn id(&self) -> &str {
        PEXELS_SOURCE
    }

    fn fetch<'a>(&'a self, _request: &'a ()) -> SourceFuture<'a, BackgroundPhoto> {
        Box::pin(async move {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Config("TABSPIRE_PEXELS_API_KEY is not set".to_string()))?;

            let url = format!(
                "{}?query={}&orientation=landscape&per_page=15",
                self.url, PHOTO_QUERY
            );
            let search: PexelsSearch = self.client.get_json(&url, &[("authorization", key)]).await?;

            let photo = search
                .photos
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or_else(|| AppError::Malformed(format!("No photos in response from {}", url)))?;
            Ok(ProviderPhoto::Pexels(photo).into_background())
        })
    }
}

/// Bundled images, attributed to the product itself.
pub struct LocalImagePool {
    product_name: String,
    product_url: String,
}

impl TerminalSource<(), BackgroundPhoto> for LocalImagePool {
    fn id(&self) -> &str {
        LOCAL_IMAGES_SOURCE
    }

    fn pick(&self, _request: &()) -> BackgroundPhoto {
        let image = FALLBACK_IMAGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_IMAGES[0]);
        BackgroundPhoto {
            image_url: image.to_string(),
            attribution_name: self.product_name.clone(),
            attribution_url: self.product_url.clone(),
        }
    }
}

pub struct PhotoFetcher {
    chain: GuaranteedChain<(), BackgroundPhoto>,
}

impl PhotoFetcher {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        let remote = FallbackChain::new("photo")
            .with_source(UnsplashSource::new(client.clone(), config))
            .with_source(PexelsSource {
                client,
                url: config.pexels_url.clone(),
                api_key: config.pexels_api_key.clone(),
            });

        let local = LocalImagePool {
            product_name: config.product_name.clone(),
            product_url: config.product_url.clone(),
        };

        Self {
            chain: GuaranteedChain::new(remote, local),
        }
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.chain.source_ids()
    }

    pub async fn fetch(&self) -> Resolved<BackgroundPhoto> {
        self.chain.resolve(&()).await
    }
}
