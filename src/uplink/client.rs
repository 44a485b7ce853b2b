/// HTTPS client backed by reqwest
use log::warn;

use crate::uplink::{HttpError, HttpResponse, HttpsClient};

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build the client used for every uplink request
    ///
    /// Redirects are returned to the caller instead of being followed. With
    /// `insecure` set, server certificates are not validated at all.
    pub fn new(insecure: bool) -> Result<Self, String> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());

        if insecure {
            warn!("[HTTPS] Certificate validation DISABLED, any server certificate is accepted");
            builder = builder.danger_accept_invalid_certs(true); // INSECURE, see TLS_INSECURE
        }

        let client = builder
            .build()
            .map_err(|e| format!("HTTPS client builder error: {}", e))?;

        Ok(ReqwestClient { client })
    }
}

fn map_error(e: reqwest::Error) -> HttpError {
    if e.is_connect() || e.is_builder() {
        HttpError::Connect(e.to_string())
    } else {
        HttpError::Transport(e.to_string())
    }
}

impl HttpsClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self.client.get(url).send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
