use std::sync::Arc;
use std::time::Duration;

use inkview::acquire::{
    AcquireError, Acquirer, AcquisitionRequest, Fetcher, FileSource, Outcome, validate,
};
use inkview::config::Theme;
use inkview::host::{HostError, SpeechSynth};
use inkview::session::Session;

#[derive(Default)]
struct CountingSpeech {
    active: bool,
    cancels: usize,
}

impl SpeechSynth for CountingSpeech {
    fn speak(&mut self, _text: &str) -> Result<(), HostError> {
        self.active = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.active = false;
        self.cancels += 1;
    }

    fn is_speaking(&mut self) -> bool {
        self.active
    }
}

/// Answers only the raw GitHub URL; everything else is a 404.
struct RawOnly;

impl Fetcher for RawOnly {
    fn fetch(&self, url: &str) -> Result<String, AcquireError> {
        if url == "https://raw.githubusercontent.com/user/repo/main/README.md" {
            Ok("# Readme\n\nFrom the raw host.".to_string())
        } else {
            Err(AcquireError::HttpFailure {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

fn acquire(acquirer: &mut Acquirer, request: AcquisitionRequest) -> Outcome {
    acquirer.begin(request).unwrap().expect("job started");
    acquirer.wait(Duration::from_secs(5)).expect("job finished")
}

#[test]
fn test_local_file_to_session_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.markdown");
    std::fs::write(&path, include_str!("fixtures/sample.md")).unwrap();

    let mut acquirer = Acquirer::new(Arc::new(RawOnly));
    let Outcome::Loaded(document) = acquire(
        &mut acquirer,
        AcquisitionRequest::LocalFile(FileSource::from_path(&path)),
    ) else {
        panic!("expected a document");
    };
    assert_eq!(document.name, "guide.markdown");

    let mut session = Session::new(Theme::Light);
    let mut speech = CountingSpeech::default();
    session.load(document);
    assert!(session.rendered_html().unwrap().contains(r#"id="a-table""#));

    session.toggle_speech(&mut speech).unwrap();
    assert!(speech.active);

    session.clear(&mut speech);
    assert!(session.current().is_none());
    assert!(session.rendered_html().is_none());
    assert!(!speech.active);
    assert!(!session.is_speaking());
}

#[test]
fn test_text_file_is_rejected_before_reading() {
    let err = validate(AcquisitionRequest::LocalFile(FileSource::from_path(
        "/definitely/not/here/notes.txt",
    )))
    .unwrap_err();
    assert_eq!(
        err,
        AcquireError::InvalidFileType {
            name: "notes.txt".to_string()
        }
    );
}

#[test]
fn test_github_blob_url_is_fetched_from_raw_host() {
    let mut acquirer = Acquirer::new(Arc::new(RawOnly));
    let outcome = acquire(
        &mut acquirer,
        AcquisitionRequest::RemoteUrl(
            "  https://github.com/user/repo/blob/main/README.md ".to_string(),
        ),
    );
    let document = match outcome {
        Outcome::Loaded(document) => document,
        Outcome::Rejected(err) => panic!("expected a document, got {err}"),
    };
    assert_eq!(document.name, "README.md");
    assert!(document.content.contains("From the raw host."));
}

#[test]
fn test_404_leaves_loaded_document_untouched() {
    let mut acquirer = Acquirer::new(Arc::new(RawOnly));
    let mut session = Session::new(Theme::Dark);
    session.load(inkview::document::Document::new("kept.md", "# Kept"));
    let before = session.rendered_html().unwrap().to_string();

    let outcome = acquire(
        &mut acquirer,
        AcquisitionRequest::RemoteUrl("https://example.com/missing.md".to_string()),
    );
    let Outcome::Rejected(err) = outcome else {
        panic!("expected a rejection");
    };
    assert_eq!(err.status(), Some(404));
    assert!(err.notice().contains("cross-origin"));

    assert_eq!(session.current().unwrap().name, "kept.md");
    assert_eq!(session.rendered_html().unwrap(), before);
}
