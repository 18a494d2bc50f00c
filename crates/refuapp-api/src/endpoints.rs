// URL construction for every registry endpoint.

use url::Url;

use crate::error::Error;

/// Builds endpoint URLs off an externally configured API base URL.
///
/// The base may carry a path prefix (e.g. `https://host/api`); every
/// endpoint is appended below it. Trailing slashes are significant on
/// the collection endpoints (`/refuges/`, `/images/`, `/login/`).
/// Path segments are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Fails for URLs that cannot carry a path (`mailto:`, `data:`...).
    pub fn new(base_url: &Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base: base_url.clone(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `GET`/`POST /refuges/`
    pub fn refuges(&self) -> Url {
        self.path(&["refuges", ""])
    }

    /// `GET`/`PUT`/`DELETE /refuges/{id}`
    pub fn refuge(&self, id: &str) -> Url {
        self.path(&["refuges", id])
    }

    /// `POST /images/`
    pub fn images(&self) -> Url {
        self.path(&["images", ""])
    }

    /// `POST /login/`
    pub fn login(&self) -> Url {
        self.path(&["login", ""])
    }

    /// Static image retrieval: `/static/images/refuges/{filename}`
    pub fn refuge_image(&self, filename: &str) -> Url {
        self.path(&["static", "images", "refuges", filename])
    }

    fn path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Cannot fail: `new` rejected cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
