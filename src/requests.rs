use reqwest::{Client, ClientBuilder, Response};

use crate::{config::ScrapingConfig, scrape_error::ScrapeError};

/// The portal session. Cookies set by one page are sent with every later
/// request, which the Banner forms rely on.
pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new(config: &ScrapingConfig) -> anyhow::Result<Self> {
        let mut builder = ClientBuilder::new()
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    pub async fn fetch_url_body(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        read_success_body(url, response).await
    }

    pub async fn post_form_body(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<String, ScrapeError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        read_success_body(url, response).await
    }
}

fn transport(url: &str, source: reqwest::Error) -> ScrapeError {
    ScrapeError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn read_success_body(url: &str, response: Response) -> Result<String, ScrapeError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    response.text().await.map_err(|source| transport(url, source))
}
