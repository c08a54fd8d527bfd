//! Photo-provider collaborator: random stock photos, filtered and
//! downloaded into a per-filter photo directory.
//!
//! [`fetch_photos`] is the full download pipeline: ask the provider for
//! random photos, diff the result against the store (idempotence rule),
//! download only the new ones, and append their metadata.

use super::RemoteError;
use crate::ledger::PhotosStore;
use crate::types::PhotoRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Photo orientation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Squarish => "squarish",
        }
    }
}

/// Which rendition of each photo to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PhotoSize {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl PhotoSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Full => "full",
            Self::Regular => "regular",
            Self::Small => "small",
            Self::Thumb => "thumb",
        }
    }
}

/// Filter parameters for a random-photo request.
#[derive(Debug, Clone)]
pub struct PhotoFilters {
    pub collections: Vec<String>,
    pub query: Option<String>,
    pub orientation: Option<Orientation>,
    pub size: PhotoSize,
    pub count: u32,
}

impl PhotoFilters {
    /// Photo directory name derived from the filters, so differently
    /// filtered pools never mix: `random-{size}-{orientation}-{query}-photos`.
    pub fn directory_name(&self) -> String {
        let orientation = self.orientation.map(Orientation::as_str).unwrap_or("any");
        let query = self.query.as_deref().unwrap_or("any");
        format!("random-{}-{}-{}-photos", self.size.as_str(), orientation, query)
    }
}

/// Seam for the photo-provider API.
pub trait PhotoProvider {
    /// Random photos matching the filters, as (id, metadata) pairs.
    fn random_photos(
        &self,
        filters: &PhotoFilters,
    ) -> Result<Vec<(String, PhotoRecord)>, RemoteError>;

    /// Raw bytes of one photo rendition.
    fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Deserialize)]
struct ApiPhoto {
    id: String,
    urls: HashMap<String, String>,
    user: ApiUser,
    links: ApiLinks,
}

#[derive(Deserialize)]
struct ApiUser {
    name: String,
}

#[derive(Deserialize)]
struct ApiLinks {
    html: String,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    errors: Vec<String>,
}

/// Blocking client for the Unsplash random-photo API.
pub struct UnsplashClient {
    http: reqwest::blocking::Client,
    url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(url: &str, access_key: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            url: url.to_string(),
            access_key: access_key.to_string(),
        }
    }
}

impl PhotoProvider for UnsplashClient {
    fn random_photos(
        &self,
        filters: &PhotoFilters,
    ) -> Result<Vec<(String, PhotoRecord)>, RemoteError> {
        let mut params: Vec<(&str, String)> = vec![
            ("client_id", self.access_key.clone()),
            ("count", filters.count.to_string()),
        ];
        if !filters.collections.is_empty() {
            params.push(("collections", filters.collections.join(",")));
        }
        if let Some(query) = &filters.query {
            params.push(("query", query.clone()));
        }
        if let Some(orientation) = filters.orientation {
            params.push(("orientation", orientation.as_str().to_string()));
        }

        let response = self
            .http
            .get(&self.url)
            .header("Accept-Version", "v1")
            .query(&params)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .unwrap_or_else(|| "unknown provider error".to_string());
            return Err(RemoteError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let size_key = filters.size.as_str();
        let photos: Vec<ApiPhoto> = response.json()?;
        photos
            .into_iter()
            .map(|photo| {
                let url = photo
                    .urls
                    .get(size_key)
                    .cloned()
                    .ok_or_else(|| RemoteError::MissingSize(size_key.to_string()))?;
                Ok((
                    photo.id,
                    PhotoRecord {
                        photographer: photo.user.name,
                        url,
                        link: photo.links.html,
                    },
                ))
            })
            .collect()
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Provider {
                status: status.as_u16(),
                message: format!("photo download failed for {url}"),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// What a fetch run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: usize,
    pub skipped: usize,
}

/// Fetch random photos into `root/<derived-directory>`: diff against the
/// store, download only the new ids, append their metadata.
pub fn fetch_photos(
    provider: &dyn PhotoProvider,
    root: &Path,
    filters: &PhotoFilters,
) -> Result<FetchReport, RemoteError> {
    let dir = root.join(filters.directory_name());
    let mut store = PhotosStore::open(&dir)?;

    info!("collecting photos");
    let found = provider.random_photos(filters)?;
    let total = found.len();
    let plan = store.plan_downloads(found);
    if plan.is_empty() {
        warn!("all photos already downloaded");
        return Ok(FetchReport {
            downloaded: 0,
            skipped: total,
        });
    }

    info!(count = plan.len(), dir = %dir.display(), "downloading photos");
    for (id, record) in &plan {
        let bytes = provider.download(&record.url)?;
        fs::write(store.image_path(id), bytes)?;
        store.insert(id.clone(), record.clone());
    }
    store.save()?;

    Ok(FetchReport {
        downloaded: plan.len(),
        skipped: total - plan.len(),
    })
}
