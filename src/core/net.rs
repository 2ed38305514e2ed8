// src/core/net.rs
// Blocking HTTP for the site specs. One client per site so cookie sessions stay apart.

use std::{thread, time::Duration};

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::{NetOptions, consts};
use crate::error::FetchError;

/// A fetched HTML page.
#[derive(Clone, Debug)]
pub struct Page {
    /// URL after redirects.
    pub url: String,
    pub body: String,
}

pub struct HttpClient {
    inner: Client,
    pause: Duration,
}

impl HttpClient {
    pub fn new(net: &NetOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(consts::ACCEPT_LANGUAGE));

        let inner = Client::builder()
            .user_agent(net.user_agent.as_str())
            .default_headers(headers)
            .timeout(net.timeout)
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { inner, pause: net.request_pause })
    }

    fn be_polite(&self) {
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
    }

    /// GET with status check. The body is left unread for streaming.
    pub fn open(&self, url: &str) -> Result<Response, FetchError> {
        let resp = self.inner.get(url).send().map_err(|source| http(url, source))?;
        check_status(url, resp)
    }

    /// GET an HTML page after the politeness pause.
    /// Anything that is not `text/html` is rejected.
    pub fn get_html(&self, url: &str) -> Result<Page, FetchError> {
        self.be_polite();
        let resp = self.open(url)?;

        let content_type = content_type(&resp);
        if !content_type.contains("text/html") {
            return Err(FetchError::UnexpectedContentType { url: s!(url), content_type });
        }

        let final_url = resp.url().to_string();
        let body = resp.text().map_err(|source| http(url, source))?;
        logd!("GET {url} → {final_url} ({} bytes)", body.len());
        Ok(Page { url: final_url, body })
    }

    /// GET a page body as text, no content-type check.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.open(url)?.text().map_err(|source| http(url, source))
    }

    /// POST an url-encoded form and return the response body.
    pub fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String, FetchError> {
        let resp = self.inner.post(url).form(form).send().map_err(|source| http(url, source))?;
        check_status(url, resp)?.text().map_err(|source| http(url, source))
    }

    /// Content type announced by a HEAD request (redirects followed), lowercased.
    pub fn head_content_type(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.inner.head(url).send().map_err(|source| http(url, source))?;
        let resp = check_status(url, resp)?;
        Ok(content_type(&resp))
    }
}

fn http(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Http { url: s!(url), source }
}

fn check_status(url: &str, resp: Response) -> Result<Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(FetchError::Status { url: s!(url), status: status.as_u16() })
    }
}

fn content_type(resp: &Response) -> String {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_default_options() {
        assert!(HttpClient::new(&NetOptions::default()).is_ok());
    }
}
