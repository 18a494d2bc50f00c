// Transport adapter: the only place that touches the network.
//
// `Transport` is the seam the rest of the workspace programs against.
// `HttpTransport` is the production implementation over `reqwest`;
// tests substitute scripted transports or point this one at wiremock.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use secrecy::ExposeSecret;
use tracing::{debug, trace, warn};

use crate::error::{Error, Unreachable};
use crate::request::{Body, FormPart, Reply, Request};

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (local development servers).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("refuapp/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder.build().map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

/// Sends one request and returns the raw reply.
///
/// `Err(Unreachable)` means no HTTP response was obtained. Every HTTP
/// response, whatever its status, is an `Ok(Reply)`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Reply, Unreachable>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn build(&self, request: Request) -> reqwest::RequestBuilder {
        let Request {
            method,
            url,
            body,
            bearer,
        } = request;

        let mut builder = self.http.request(method, url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(parts) => builder.multipart(build_form(parts)),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Reply, Unreachable> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let resp = self.build(request).send().await.map_err(|e| {
            warn!(error = %e, "request did not reach the server");
            Unreachable::from(e)
        })?;

        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(Unreachable::from)?;
        trace!(status, len = raw.len(), "response received");

        Reply::from_parts(status, &raw).reachable()
    }
}

fn build_form(parts: Vec<FormPart>) -> multipart::Form {
    parts
        .into_iter()
        .fold(multipart::Form::new(), |form, part| match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::Secret { name, value } => {
                form.text(name, value.expose_secret().to_owned())
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let untyped = || multipart::Part::stream(bytes.clone()).file_name(file_name.clone());
                // An unparsable MIME string falls back to the untyped part.
                let file = untyped().mime_str(&content_type).unwrap_or_else(|_| {
                    warn!(%content_type, "invalid content type for upload part");
                    untyped()
                });
                form.part(name, file)
            }
        })
}
