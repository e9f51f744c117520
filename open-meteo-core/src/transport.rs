//! One GET per call: URL building, status and content-type checks, JSON
//! decoding into a generic object.

use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{OpenMeteoError, Result},
    mapper::JsonObject,
    query::{Endpoint, QueryParams},
};

/// Where the HTTP session comes from.
#[derive(Debug)]
enum Session {
    /// Supplied by the caller, who stays responsible for it.
    Borrowed(Client),
    /// Built on first use and dropped by [`Transport::release`] or with the
    /// transport itself.
    Owned(OnceCell<Client>),
}

#[derive(Debug)]
pub(crate) struct Transport {
    config: ClientConfig,
    session: Session,
}

impl Transport {
    pub(crate) fn owned(config: ClientConfig) -> Self {
        Self {
            config,
            session: Session::Owned(OnceCell::new()),
        }
    }

    pub(crate) fn borrowed(config: ClientConfig, client: Client) -> Self {
        Self {
            config,
            session: Session::Borrowed(client),
        }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn owns_session(&self) -> bool {
        matches!(self.session, Session::Owned(_))
    }

    pub(crate) fn has_session(&self) -> bool {
        match &self.session {
            Session::Borrowed(_) => true,
            Session::Owned(cell) => cell.initialized(),
        }
    }

    /// Drop an owned session. Returns whether one was open.
    pub(crate) fn release(&mut self) -> bool {
        match &mut self.session {
            Session::Borrowed(_) => false,
            Session::Owned(cell) => cell.take().is_some(),
        }
    }

    async fn session(&self) -> Result<&Client> {
        match &self.session {
            Session::Borrowed(client) => Ok(client),
            Session::Owned(cell) => {
                cell.get_or_try_init(|| async {
                    debug!("Creating HTTP session");
                    Client::builder()
                        .user_agent(self.config.user_agent.as_str())
                        .timeout(self.config.request_timeout())
                        .build()
                        .map_err(|e| OpenMeteoError::Connection {
                            message: format!("Failed to create HTTP session: {e}"),
                            source: Some(e),
                        })
                })
                .await
            }
        }
    }

    /// Issue a single GET and return the decoded JSON object.
    pub(crate) async fn get(&self, endpoint: Endpoint, params: &QueryParams) -> Result<JsonObject> {
        let url = endpoint.url(&self.config, params)?;
        let session = self.session().await?;

        debug!(%url, "Sending request to Open-Meteo");

        let response = session
            .get(url.clone())
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.text().await.map_err(connection_error)?;

        debug!(%status, content_type = %content_type, bytes = body.len(), "Received response");

        if !status.is_success() {
            let err = api_error(status, &content_type, body);
            warn!(%url, error = %err, "Open-Meteo request failed");
            return Err(err);
        }

        if !is_json(&content_type) {
            return Err(OpenMeteoError::Api {
                status: Some(status.as_u16()),
                message: format!(
                    "Unexpected response from the Open-Meteo API (Content-Type: '{content_type}')"
                ),
                body,
            });
        }

        decode_object(status, body)
    }
}

fn is_json(content_type: &str) -> bool {
    content_type.contains("application/json")
}

fn connection_error(e: reqwest::Error) -> OpenMeteoError {
    let message = if e.is_timeout() {
        "Timeout occurred while connecting to the Open-Meteo API".to_string()
    } else {
        format!("Error occurred while communicating with the Open-Meteo API: {e}")
    };
    warn!(error = %e, "{message}");

    OpenMeteoError::Connection {
        message,
        source: Some(e),
    }
}

/// Error for a 4xx/5xx response. The API reports failures as
/// `{"error": true, "reason": "..."}`; the reason is surfaced when present.
fn api_error(status: StatusCode, content_type: &str, body: String) -> OpenMeteoError {
    let reason = if is_json(content_type) {
        serde_json::from_str::<Value>(&body).ok().and_then(|data| {
            match (data.get("error"), data.get("reason")) {
                (Some(Value::Bool(true)), Some(Value::String(reason))) => Some(reason.clone()),
                _ => None,
            }
        })
    } else {
        None
    };

    OpenMeteoError::Api {
        status: Some(status.as_u16()),
        message: reason.unwrap_or_else(|| format!("Request failed with status {status}")),
        body,
    }
}

fn decode_object(status: StatusCode, body: String) -> Result<JsonObject> {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(OpenMeteoError::Api {
            status: Some(status.as_u16()),
            message: "Expected a JSON object in the response".to_string(),
            body,
        }),
        Err(e) => Err(OpenMeteoError::Api {
            status: Some(status.as_u16()),
            message: format!("Malformed JSON in the response: {e}"),
            body,
        }),
    }
}
