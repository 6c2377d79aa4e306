//! Admin preview-URL configuration.
//!
//! Maps a content-type uid and a document's slug/url to the client-facing
//! preview path, carrying the draft/published status and the shared preview
//! secret as query parameters. Content types without a preview route yield
//! no path.

use anyhow::Result;

use crate::util::env::{env_req, init_env};

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub client_url: String,
    pub secret: String,
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self> {
        init_env();
        Ok(Self {
            client_url: env_req("CLIENT_URL")?,
            secret: env_req("PREVIEW_SECRET")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewDocument<'a> {
    pub slug: &'a str,
    pub url: &'a str,
}

pub fn preview_pathname(
    uid: &str,
    document: PreviewDocument<'_>,
    status: &str,
    secret: &str,
) -> Option<String> {
    match uid {
        "api::dynamic-page.dynamic-page" => Some(format!(
            "/lp/{}?status={status}&secret={secret}",
            document.url
        )),
        "api::article.article" => Some(format!(
            "/blog/{}?status={status}&secret={secret}",
            document.slug
        )),
        _ => None,
    }
}

impl PreviewConfig {
    pub fn preview_url(
        &self,
        uid: &str,
        document: PreviewDocument<'_>,
        status: &str,
    ) -> Option<String> {
        preview_pathname(uid, document, status, &self.secret)
            .map(|path| format!("{}{}", self.client_url, path))
    }
}
