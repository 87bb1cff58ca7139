//! JSON-over-HTTP gateway for both backend protocols.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use greenroute_core::config::{ClientConfig, TimeoutConfig};
use greenroute_core::error::{Result, RouteError};
use greenroute_core::gateway::wire::{
    Ack, AssignmentAuthRequest, AssignmentAuthResponse, ErrorBody, LegacyAuthRequest,
    LegacyAuthResponse, PickupStatusUpdate, RemoteProgress, StopResponse, StopStarted,
    TripStarted,
};
use greenroute_core::gateway::{AssignmentGateway, LegacyGateway};
use greenroute_core::ids::{AssignmentId, DriverId};
use greenroute_core::stop::{CompletionPayload, PhotoAttachment, PickupRecord};

const FALLBACK_PHOTO_MIME: &str = "image/jpeg";

/// Stateless HTTP client for the GreenRoute backend.
///
/// Every call is one attempt with its own timeout; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    timeouts: TimeoutConfig,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| RouteError::network(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeouts: config.timeouts.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_raw(
        &self,
        operation: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<String> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| map_transport_error(operation, timeout, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| map_transport_error(operation, timeout, err))?;

        if !status.is_success() {
            tracing::debug!(operation, status = status.as_u16(), "Request rejected");
            return Err(map_http_error(status, body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<T> {
        let body = self.send_raw(operation, request, timeout).await?;
        parse_body(operation, &body)
    }

    async fn photo_part(photo: &PhotoAttachment) -> Result<Part> {
        let bytes = tokio::fs::read(photo.path()).await.map_err(|err| {
            RouteError::validation(format!(
                "Cannot read photo '{}': {err}",
                photo.path().display()
            ))
        })?;

        let content_type = photo.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(photo.path())
                .first_raw()
                .unwrap_or(FALLBACK_PHOTO_MIME)
                .to_string()
        });

        Part::bytes(bytes)
            .file_name(photo.resolved_file_name())
            .mime_str(&content_type)
            .map_err(|err| RouteError::validation(format!("Invalid photo content type: {err}")))
    }
}

fn parse_body<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|err| {
        RouteError::malformed(format!("{operation}: {err}"))
    })
}

fn map_transport_error(operation: &str, timeout: Duration, err: reqwest::Error) -> RouteError {
    if err.is_timeout() {
        RouteError::timeout(operation, timeout.as_secs())
    } else {
        RouteError::network(format!("{operation} failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: String) -> RouteError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|wrapper| wrapper.error)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Request failed (status {})", status.as_u16())
            } else {
                body.clone()
            }
        });
    RouteError::rejected(status.as_u16(), message)
}

#[async_trait]
impl AssignmentGateway for HttpGateway {
    async fn authenticate(&self, request: &AssignmentAuthRequest) -> Result<AssignmentAuthResponse> {
        let builder = self
            .client
            .post(self.url("/driver/authenticate/v2"))
            .json(request);
        self.send("authenticate", builder, self.timeouts.authenticate())
            .await
    }

    async fn fetch_stop(&self, assignment: &AssignmentId, sequence: u32) -> Result<StopResponse> {
        let builder = self
            .client
            .get(self.url(&format!("/assignments/{assignment}/stops/{sequence}")));
        self.send("fetch stop", builder, self.timeouts.request()).await
    }

    async fn start_trip(&self, assignment: &AssignmentId) -> Result<TripStarted> {
        let builder = self
            .client
            .post(self.url(&format!("/assignments/{assignment}/start-trip")));
        self.send("start trip", builder, self.timeouts.request()).await
    }

    async fn end_trip(&self, assignment: &AssignmentId) -> Result<Ack> {
        let builder = self
            .client
            .post(self.url(&format!("/assignments/{assignment}/end-trip")));
        self.send("end trip", builder, self.timeouts.request()).await
    }

    async fn start_stop(&self, assignment: &AssignmentId, sequence: u32) -> Result<StopStarted> {
        let builder = self
            .client
            .post(self.url(&format!("/assignments/{assignment}/stops/{sequence}/start")));
        self.send("start stop", builder, self.timeouts.request()).await
    }

    async fn complete_stop(
        &self,
        assignment: &AssignmentId,
        sequence: u32,
        payload: &CompletionPayload,
    ) -> Result<Ack> {
        let mut form = Form::new();
        if let Some(weight) = payload.weight {
            form = form.text("weight", weight.to_string());
        }
        if let Some(notes) = payload.trimmed_notes() {
            form = form.text("notes", notes);
        }
        let timeout = match &payload.photo {
            Some(photo) => {
                form = form.part("photo", Self::photo_part(photo).await?);
                self.timeouts.photo_upload()
            }
            None => self.timeouts.request(),
        };

        let builder = self
            .client
            .post(self.url(&format!("/assignments/{assignment}/stops/{sequence}/complete")))
            .multipart(form);
        self.send("complete stop", builder, timeout).await
    }

    async fn progress(&self, assignment: &AssignmentId) -> Result<RemoteProgress> {
        let builder = self
            .client
            .get(self.url(&format!("/assignments/{assignment}/progress")));
        self.send("progress", builder, self.timeouts.authenticate())
            .await
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PickupList {
    Bare(Vec<PickupRecord>),
    Wrapped { pickups: Vec<PickupRecord> },
}

#[async_trait]
impl LegacyGateway for HttpGateway {
    async fn authenticate(&self, request: &LegacyAuthRequest) -> Result<LegacyAuthResponse> {
        let builder = self.client.post(self.url("/driver/authenticate")).json(request);
        self.send("authenticate", builder, self.timeouts.legacy_authenticate())
            .await
    }

    async fn fetch_pickup(&self, driver: &DriverId, index: usize) -> Result<PickupRecord> {
        let builder = self
            .client
            .get(self.url(&format!("/driver/{driver}/pickup/{index}")));
        self.send("fetch pickup", builder, self.timeouts.request())
            .await
    }

    async fn update_pickup_status(
        &self,
        driver: &DriverId,
        index: usize,
        update: &PickupStatusUpdate,
    ) -> Result<Ack> {
        let builder = self
            .client
            .post(self.url(&format!("/driver/{driver}/pickup/{index}/update")))
            .json(update);
        self.send("update pickup status", builder, self.timeouts.request())
            .await
    }

    async fn list_pickups(&self, driver: &DriverId) -> Result<Vec<PickupRecord>> {
        let builder = self.client.get(self.url(&format!("/driver/{driver}/pickups")));
        let body = self
            .send_raw("list pickups", builder, self.timeouts.request())
            .await?;
        let list: PickupList = serde_json::from_str(&body)
            .map_err(|err| RouteError::malformed(format!("list pickups: {err}")))?;
        Ok(match list {
            PickupList::Bare(pickups) | PickupList::Wrapped { pickups } => pickups,
        })
    }
}
