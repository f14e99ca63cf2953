use crate::Transport;
use crate::protocol::{FORM_CONTENT_TYPE, frame_payload};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Posts each command to the game's request endpoint.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
    user_id: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, user_id: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            user_id: user_id.into(),
        })
    }
}

impl Transport for HttpTransport {
    fn exchange(&mut self, markup: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(frame_payload(&self.user_id, markup))
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}
