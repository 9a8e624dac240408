//! Integration tests for conversion retry, timeout and validation.

use async_trait::async_trait;
use audioleaf_convert::{
    ConversionBackend, ConversionError, ConversionKind, ConversionProgress, ConversionResult,
    ConversionService, ProgressCallback, SourceFile, MSG_EMPTY,
};
use audioleaf_core::ConversionConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_err;

#[derive(Debug, Clone, Copy)]
enum Step {
    Ok,
    Transient,
    Permanent,
    Stall,
}

/// Backend following a script of outcomes, one per attempt.
struct ScriptedBackend {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(steps: &[Step]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionBackend for ScriptedBackend {
    async fn convert(
        &self,
        _source: &SourceFile,
        _kind: ConversionKind,
        progress: &ConversionProgress,
    ) -> ConversionResult<Vec<u8>> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.script.lock().unwrap().pop_front().unwrap_or(Step::Ok);
        progress.report(30.0 * attempt as f32);

        match step {
            Step::Ok => Ok(b"converted".to_vec()),
            Step::Transient => Err(ConversionError::Transient("503".into())),
            Step::Permanent => Err(ConversionError::Permanent("400".into())),
            Step::Stall => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<f32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (Arc::new(move |p: f32| sink.lock().unwrap().push(p)), seen)
}

fn service(backend: &Arc<ScriptedBackend>) -> ConversionService {
    ConversionService::with_backend(backend.clone(), ConversionConfig::default())
}

fn word_file() -> SourceFile {
    SourceFile::new("lecture.docx", b"PK\x03\x04".to_vec())
}

#[tokio::test]
async fn test_empty_file_rejected_without_attempts() {
    let backend = ScriptedBackend::new(&[]);
    let (callback, seen) = recorder();

    let err = service(&backend)
        .convert(
            &SourceFile::new("empty.docx", Vec::new()),
            ConversionKind::WordToPdf,
            Some(callback),
        )
        .await
        .unwrap_err();

    assert!(matches!(&err, ConversionError::Validation(m) if m == MSG_EMPTY));
    assert_eq!(backend.calls(), 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let backend = ScriptedBackend::new(&[Step::Transient, Step::Transient, Step::Ok]);
    let (callback, seen) = recorder();

    let started = tokio::time::Instant::now();
    let converted = service(&backend)
        .convert(&word_file(), ConversionKind::WordToPdf, Some(callback))
        .await
        .unwrap();

    assert_eq!(backend.calls(), 3);
    // Linear backoff: 1 s before the second attempt, 2 s before the third.
    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert_eq!(converted.file_name(), "lecture.pdf");
    assert_eq!(converted.bytes(), b"converted");
    assert_eq!(*seen.lock().unwrap(), vec![30.0, 60.0, 90.0, 100.0]);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let backend = ScriptedBackend::new(&[Step::Transient; 5]);
    let (callback, seen) = recorder();

    let err = service(&backend)
        .convert(&word_file(), ConversionKind::WordToPdf, Some(callback))
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::Transient(_)));
    assert_eq!(backend.calls(), 3);
    assert!(seen.lock().unwrap().iter().all(|p| *p < 100.0));
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_is_not_retried() {
    let backend = ScriptedBackend::new(&[Step::Permanent, Step::Ok]);

    let err = service(&backend)
        .convert(
            &SourceFile::new("scan.pdf", b"%PDF".to_vec()),
            ConversionKind::PdfToWord,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ConversionError::Permanent(_)));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_whole_call_is_time_boxed() {
    let backend = ScriptedBackend::new(&[Step::Stall]);

    let err = assert_err!(
        service(&backend)
            .convert(&word_file(), ConversionKind::WordToPdf, None)
            .await
    );

    assert!(matches!(err, ConversionError::Timeout(d) if d == Duration::from_millis(30_000)));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_synthetic_backend_without_api_key() {
    let service = ConversionService::new(ConversionConfig::default()).unwrap();
    let (callback, seen) = recorder();

    let converted = service
        .convert(
            &SourceFile::new("scan.pdf", b"%PDF-1.4".to_vec()),
            ConversionKind::PdfToWord,
            Some(callback),
        )
        .await
        .unwrap();

    assert_eq!(converted.file_name(), "scan.docx");
    assert!(converted.location().starts_with("blob:audioleaf/"));
    assert_eq!(converted.byte_size(), converted.bytes().len() as u64);
    assert_eq!(seen.lock().unwrap().last().copied(), Some(100.0));
}
