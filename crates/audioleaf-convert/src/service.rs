//! Conversion service: validation, retry and an overall deadline.

use backon::Retryable;
use std::sync::Arc;
use tracing::{info, warn};

use audioleaf_core::ConversionConfig;

use crate::backoff::LinearBackoffBuilder;
use crate::error::{ConversionError, ConversionResult};
use crate::http::HttpConversionBackend;
use crate::progress::{ConversionProgress, ProgressCallback};
use crate::synthetic::SyntheticConversionBackend;
use crate::types::{output_file_name, ConversionKind, ConvertedFile, SourceFile};
use crate::validate::validate_source;
use crate::ConversionBackend;

/// Converts documents between PDF and Word.
///
/// A call is validated up front, then the backend is tried up to
/// `max_retries + 1` times with linear backoff. The whole call, backoff
/// included, is bounded by the configured timeout.
pub struct ConversionService {
    backend: Arc<dyn ConversionBackend>,
    config: ConversionConfig,
}

impl ConversionService {
    /// Service using the HTTP backend when an API key is configured and the
    /// synthetic backend otherwise.
    pub fn new(config: ConversionConfig) -> ConversionResult<Self> {
        let backend: Arc<dyn ConversionBackend> = if config.api_key.is_some() {
            Arc::new(HttpConversionBackend::new(&config)?)
        } else {
            Arc::new(SyntheticConversionBackend::new(config.synthetic_step()))
        };
        info!(backend = backend.name(), "Conversion service ready");
        Ok(Self { backend, config })
    }

    pub fn with_backend(backend: Arc<dyn ConversionBackend>, config: ConversionConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert `source` in the direction given by `kind`.
    ///
    /// `on_progress` sees strictly increasing percentages; 100 is only
    /// reported when the converted file is returned.
    pub async fn convert(
        &self,
        source: &SourceFile,
        kind: ConversionKind,
        on_progress: Option<ProgressCallback>,
    ) -> ConversionResult<ConvertedFile> {
        validate_source(source, kind, self.config.max_file_size_bytes)?;

        let progress = ConversionProgress::new(on_progress);
        let backend = &self.backend;
        let tracker = &progress;
        let attempt = move || async move { backend.convert(source, kind, tracker).await };

        let retried = attempt
            .retry(LinearBackoffBuilder::new(
                self.config.backoff_base(),
                self.config.max_retries,
            ))
            .when(ConversionError::is_retryable)
            .notify(|err, dur| {
                warn!(
                    backend = backend.name(),
                    file = source.name(),
                    "Conversion failed, retrying in {:?}: {}",
                    dur,
                    err
                );
            });

        let timeout = self.config.timeout();
        let bytes = tokio::time::timeout(timeout, retried)
            .await
            .map_err(|_| ConversionError::Timeout(timeout))??;

        progress.complete();
        let converted = ConvertedFile::new(output_file_name(source.name(), kind), kind, bytes);
        info!(
            backend = backend.name(),
            %kind,
            file = converted.file_name(),
            size = converted.byte_size(),
            "Conversion complete"
        );
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_choice_follows_api_key() {
        let service = ConversionService::new(ConversionConfig::default()).unwrap();
        assert_eq!(service.backend_name(), "synthetic");

        let config = ConversionConfig::default().with_api_key("k");
        let service = ConversionService::new(config).unwrap();
        assert_eq!(service.backend_name(), "http");
    }
}
