//! End-to-end checks against an installed ExifTool.
//!
//! Run with `cargo test -p exifstay-session -- --ignored` on a machine with
//! `exiftool` on `PATH`.

use std::fs;
use std::path::{Path, PathBuf};

use exifstay_session::{
    KeywordOperation, MetadataClient, Session, SessionConfig, SessionError, TagValue,
    find_executable,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Smallest baseline JPEG the tool accepts: one 1x1 greyscale frame.
const TINY_JPEG: &[u8] = &[
    0xFF, 0xD8, // SOI
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x00, // APP0
    0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, // SOF0
    0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0x00, // SOS
    0xFF, 0xD9, // EOI
];

struct Images {
    dir: TempDir,
}

impl Images {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[fixture]
fn images() -> Images {
    let dir = TempDir::new().expect("create temp dir");
    for name in ["rose.jpg", "skyscraper.jpg"] {
        fs::write(dir.path().join(name), TINY_JPEG).expect("write image");
    }
    Images { dir }
}

fn with_client<T>(
    f: impl FnOnce(&mut MetadataClient<&mut Session>) -> Result<T, SessionError>,
) -> T {
    Session::scoped(SessionConfig::default(), |session| {
        let mut client = MetadataClient::new(session);
        f(&mut client)
    })
    .expect("exiftool session")
}

fn keywords(client: &mut MetadataClient<&mut Session>, file: &Path) -> Vec<String> {
    client
        .get_tag("IPTC:Keywords", file)
        .expect("read keywords")
        .map(|value| value.to_text_items())
        .unwrap_or_default()
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn locates_the_installed_tool() {
    assert!(find_executable("exiftool", None).is_some());
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn batch_read_returns_one_record_per_file(images: Images) {
    let files = [images.path("rose.jpg"), images.path("skyscraper.jpg")];

    let records = with_client(|client| client.get_metadata_batch(&files));

    assert_eq!(records.len(), 2);
    for (record, file) in records.iter().zip(&files) {
        assert_eq!(record.source_file(), Some(file.as_path()));
        assert_eq!(record.get("File:FileType"), Some(&TagValue::from("JPEG")));
    }
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn absent_tags_read_as_none(images: Images) {
    let value = with_client(|client| client.get_tag("XMP:Subject", images.path("rose.jpg")));

    assert_eq!(value, None);
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn caption_round_trips_non_ascii_text(images: Images) {
    let rose = images.path("rose.jpg");
    let caption = "Ein Röschen ganz allein";

    let (report, value) = with_client(|client| {
        let report = client.set_tags([("IPTC:Caption-Abstract", caption)], &rose)?;
        let value = client.get_tag("IPTC:Caption-Abstract", &rose)?;
        Ok((report, value))
    });

    assert!(report.text().contains("1 image files updated"));
    assert_eq!(value, Some(TagValue::from(caption)));
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn copies_tags_between_files(images: Images) {
    let rose = images.path("rose.jpg");
    let skyscraper = images.path("skyscraper.jpg");

    let subject = with_client(|client| {
        client.set_tags([("XMP:Subject", "Röschen")], &rose)?;
        client.copy_tags(&rose, &skyscraper)?;
        client.get_tag("XMP:Subject", &skyscraper)
    });

    assert_eq!(subject, Some(TagValue::from("Röschen")));
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn keyword_edits_compose(images: Images) {
    let rose = images.path("rose.jpg");

    let result = with_client(|client| {
        client.set_keywords(KeywordOperation::Replace, &["nature", "flower"], &rose)?;
        client.set_keywords(KeywordOperation::Remove, &["flower"], &rose)?;
        client.set_keywords(KeywordOperation::Add, &["added"], &rose)?;
        Ok(keywords(client, &rose))
    });

    assert_eq!(result, ["nature", "added"]);
}

#[rstest]
#[ignore = "requires exiftool on PATH"]
fn adding_a_keyword_twice_keeps_one_instance(images: Images) {
    let rose = images.path("rose.jpg");

    let result = with_client(|client| {
        client.set_keywords(KeywordOperation::Add, &["nature"], &rose)?;
        client.set_keywords(KeywordOperation::Remove, &["nature"], &rose)?;
        client.set_keywords(KeywordOperation::Add, &["nature"], &rose)?;
        client.set_keywords(KeywordOperation::Add, &["nature"], &rose)?;
        Ok(keywords(client, &rose))
    });

    assert_eq!(result, ["nature"]);
}
