use url::Url;

use crate::error::Result;

/// Just a wrapper around the API base URL and the bearer token
#[derive(Clone, Debug)]
pub struct Resource {
    base: Url,
    token: Option<String>,
}

impl Resource {
    /// `base` is the root of the API, e.g. `http://localhost:8080/api`
    pub fn new(base: Url, token: Option<String>) -> Self {
        // Url::join would drop the last segment of a base without a trailing slash
        let mut base = base;
        if base.path().ends_with('/') == false {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base, token }
    }

    pub fn base(&self) -> &Url { &self.base }
    pub fn token(&self) -> Option<&str> { self.token.as_deref() }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Build the URL of an endpoint, relative to the API base (e.g. `tasks/all`)
    pub fn combine(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base.join(endpoint.trim_start_matches('/'))?)
    }
}
