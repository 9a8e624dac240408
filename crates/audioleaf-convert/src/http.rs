//! Remote conversion over HTTP multipart.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use audioleaf_core::ConversionConfig;

use crate::error::{ConversionError, ConversionResult};
use crate::progress::ConversionProgress;
use crate::types::{ConversionKind, SourceFile};
use crate::ConversionBackend;

/// Backend posting the source to a conversion API.
///
/// The file goes in the multipart field `inputFile`; the key is sent in the
/// `Apikey` header. Server errors and network failures are transient,
/// every other non-success status is permanent.
pub struct HttpConversionBackend {
    client: Client,
    api_key: SecretString,
    pdf_to_word_endpoint: String,
    word_to_pdf_endpoint: String,
}

impl HttpConversionBackend {
    pub fn new(config: &ConversionConfig) -> ConversionResult<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| SecretString::new(key.expose_secret().clone()))
            .ok_or_else(|| ConversionError::Configuration("conversion API key is not set".into()))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConversionError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            pdf_to_word_endpoint: config.pdf_to_word_endpoint.clone(),
            word_to_pdf_endpoint: config.word_to_pdf_endpoint.clone(),
        })
    }

    pub fn endpoint(&self, kind: ConversionKind) -> &str {
        match kind {
            ConversionKind::PdfToWord => &self.pdf_to_word_endpoint,
            ConversionKind::WordToPdf => &self.word_to_pdf_endpoint,
        }
    }
}

#[async_trait]
impl ConversionBackend for HttpConversionBackend {
    async fn convert(
        &self,
        source: &SourceFile,
        kind: ConversionKind,
        progress: &ConversionProgress,
    ) -> ConversionResult<Vec<u8>> {
        let endpoint = self.endpoint(kind);
        let part = Part::bytes(source.bytes().to_vec()).file_name(source.name().to_string());
        let form = Form::new().part("inputFile", part);

        debug!(endpoint, file = source.name(), size = source.size(), "Posting conversion request");
        progress.report(10.0);

        let response = self
            .client
            .post(endpoint)
            .header("Apikey", self.api_key.expose_secret().as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ConversionError::Transient(format!("Network error: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ConversionError::Transient(format!("Server error: {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversionError::Permanent(format!(
                "Client error {status}: {body}"
            )));
        }
        progress.report(60.0);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConversionError::Transient(format!("Network error: {e}")))?;
        progress.report(90.0);

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "http"
    }
}
