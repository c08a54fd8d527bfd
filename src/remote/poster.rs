//! Posting collaborator: media upload plus post creation against the
//! social API.
//!
//! Posting is a two-step protocol: upload the composed JPEG first, then
//! create the post referencing the returned media handle. Both steps use
//! the bearer token from the config; neither is retried.

use super::RemoteError;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Opaque media id returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(pub String);

/// Seam for the posting API.
pub trait Poster {
    /// Upload an image, returning the handle a post can reference.
    fn upload_media(&self, bytes: &[u8]) -> Result<MediaHandle, RemoteError>;

    /// Create a post carrying the caption and the uploaded image.
    /// Returns the created post's id.
    fn create_post(&self, caption: &str, media: &MediaHandle) -> Result<String, RemoteError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    media_id_string: String,
}

#[derive(Deserialize)]
struct PostResponse {
    data: PostData,
}

#[derive(Deserialize)]
struct PostData {
    id: String,
}

/// Blocking client for the Twitter upload and post endpoints.
pub struct HttpPoster {
    http: reqwest::blocking::Client,
    upload_url: String,
    post_url: String,
    token: String,
}

impl HttpPoster {
    pub fn new(upload_url: &str, post_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            upload_url: upload_url.to_string(),
            post_url: post_url.to_string(),
            token: token.to_string(),
        }
    }
}

impl Poster for HttpPoster {
    fn upload_media(&self, bytes: &[u8]) -> Result<MediaHandle, RemoteError> {
        info!(bytes = bytes.len(), "uploading media");
        let response = self
            .http
            .post(&self.upload_url)
            .bearer_auth(&self.token)
            .body(bytes.to_vec())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Provider {
                status: status.as_u16(),
                message: "media upload rejected".to_string(),
            });
        }
        let body: UploadResponse = response.json()?;
        Ok(MediaHandle(body.media_id_string))
    }

    fn create_post(&self, caption: &str, media: &MediaHandle) -> Result<String, RemoteError> {
        let payload = json!({
            "text": caption,
            "media": { "media_ids": [media.0] },
        });
        let response = self
            .http
            .post(&self.post_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Provider {
                status: status.as_u16(),
                message: "post creation rejected".to_string(),
            });
        }
        let body: PostResponse = response.json()?;
        info!(post_id = %body.data.id, "post created");
        Ok(body.data.id)
    }
}
