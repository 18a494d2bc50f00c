use refuapp_api::{Body, FormPart, Request, Unreachable};
use tracing::debug;
use url::Url;

use super::Session;
use crate::model::Photo;
use crate::normalize;
use crate::response::{PostImageError, PostImageResponse};

/// Multipart field the server reads the upload from.
const IMAGE_FIELD: &str = "image";

/// Photo uploads to `/images/`.
#[derive(Clone)]
pub struct ImageService {
    session: Session,
}

impl ImageService {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// `POST /images/`. On success carries the stored filename, ready
    /// to be used as a refuge's `image`.
    pub async fn upload(&self, photo: &Photo) -> Result<PostImageResponse, Unreachable> {
        let bytes = match photo.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "rejecting upload of undecodable photo");
                return Ok(PostImageResponse::Error {
                    error: PostImageError::ClientSentInvalidData {
                        message: format!("photo is not valid base64: {e}"),
                    },
                });
            }
        };

        debug!(len = bytes.len(), format = %photo.format, "uploading photo");
        let part = FormPart::File {
            name: IMAGE_FIELD.into(),
            file_name: photo.file_name(),
            content_type: photo.content_type(),
            bytes,
        };

        let reply = self
            .session
            .send(Request::post(
                self.session.endpoints.images(),
                Body::Multipart(vec![part]),
            ))
            .await?;
        Ok(normalize::post_image(reply))
    }

    /// Where an uploaded image is served from.
    pub fn url(&self, filename: &str) -> Url {
        self.session.endpoints.refuge_image(filename)
    }
}
