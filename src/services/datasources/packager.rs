//! Builds multipart payloads for new data sources.
//!
//! A data source is either a remote URL or a local file. Files are checked
//! against an extension allow-list, sized in megabytes and opened for
//! streaming; their contents are never read into memory here.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{RagcyError, RagcyResult};
use crate::transport::MultipartPart;

/// File extensions the service accepts.
pub const ALLOWED_EXTENSIONS: [&str; 12] = [
    "json", "xls", "xlsx", "mkv", "mp4", "mp3", "wav", "pdf", "txt", "csv", "docx", "doc",
];

/// `type` field value for URL sources.
pub const URL_SOURCE_TYPE: &str = "url";

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Where a new data source comes from.
///
/// When both are set the URL wins. When neither is set there is nothing to
/// upload and the add operation is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSourceInput {
    /// Local file to upload.
    pub file_path: Option<PathBuf>,
    /// Remote URL to register.
    pub url: Option<String>,
}

impl DataSourceInput {
    /// A local file source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            url: None,
        }
    }

    /// A remote URL source.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            file_path: None,
            url: Some(url.into()),
        }
    }

    fn url_value(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    fn file_value(&self) -> Option<&Path> {
        self.file_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Returns true if neither a file nor a URL was given.
    pub fn is_empty(&self) -> bool {
        self.url_value().is_none() && self.file_value().is_none()
    }
}

/// An opened local file ready to be streamed.
#[derive(Debug)]
pub struct FileAttachment {
    /// Open file handle.
    pub file: tokio::fs::File,
    /// Length in bytes.
    pub length: u64,
    /// Content type derived from the extension.
    pub content_type: String,
}

/// Multipart form fields for a new data source.
#[derive(Debug)]
pub struct DataSourcePayload {
    /// Target corpus.
    pub corpus_id: String,
    /// The URL in URL mode, the file's base name in file mode.
    pub filename: String,
    /// `url`, or the lowercased file extension.
    pub source_type: String,
    /// File size in megabytes, file mode only. `None` for an empty file.
    pub size_mb: Option<f64>,
    /// The file to stream, file mode only.
    pub attachment: Option<FileAttachment>,
}

impl DataSourcePayload {
    /// Returns true for URL sources.
    pub fn is_url(&self) -> bool {
        self.attachment.is_none() && self.source_type == URL_SOURCE_TYPE
    }

    /// The `size` field as sent on the wire, e.g. `"2"` or `"0.5"`.
    pub fn size_field(&self) -> Option<String> {
        self.size_mb.map(|size| size.to_string())
    }

    /// Converts the payload into multipart parts, file part first.
    pub fn into_parts(self) -> Vec<MultipartPart> {
        let mut parts = Vec::with_capacity(5);
        let size = self.size_field();

        if let Some(attachment) = self.attachment {
            parts.push(MultipartPart::File {
                name: "file".to_string(),
                filename: self.filename.clone(),
                content_type: attachment.content_type,
                file: attachment.file,
                length: attachment.length,
            });
        }

        parts.push(MultipartPart::text("filename", self.filename));
        parts.push(MultipartPart::text("type", self.source_type));
        parts.push(MultipartPart::text("corpusId", self.corpus_id));

        if let Some(size) = size {
            parts.push(MultipartPart::text("size", size));
        }

        parts
    }
}

/// Validates data sources and assembles their payloads.
#[derive(Debug, Clone)]
pub struct DataSourcePackager {
    allowed_extensions: HashSet<String>,
}

impl Default for DataSourcePackager {
    fn default() -> Self {
        Self::with_allowed_extensions(ALLOWED_EXTENSIONS)
    }
}

impl DataSourcePackager {
    /// Creates a packager with the service's default allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a packager accepting only the given extensions.
    pub fn with_allowed_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the extension is accepted, ignoring case.
    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(&extension.to_lowercase())
    }

    /// Builds the payload for a data source.
    ///
    /// Returns `Ok(None)` when the input names no source. I/O errors from
    /// reading file metadata or opening the file are returned unchanged.
    pub async fn package(
        &self,
        corpus_id: &str,
        input: &DataSourceInput,
    ) -> RagcyResult<Option<DataSourcePayload>> {
        if let Some(url) = input.url_value() {
            return Ok(Some(DataSourcePayload {
                corpus_id: corpus_id.to_string(),
                filename: url.to_string(),
                source_type: URL_SOURCE_TYPE.to_string(),
                size_mb: None,
                attachment: None,
            }));
        }

        let Some(path) = input.file_value() else {
            return Ok(None);
        };

        let metadata = tokio::fs::metadata(path).await?;
        let length = metadata.len();
        let filename = base_name(path);
        let extension = extension_of(&filename);

        if !self.is_allowed(&extension) {
            debug!(%extension, "Rejected data source file type");
            return Err(RagcyError::UnsupportedFileType { extension });
        }

        let file = tokio::fs::File::open(path).await?;

        Ok(Some(DataSourcePayload {
            corpus_id: corpus_id.to_string(),
            filename,
            size_mb: (length > 0).then(|| length as f64 / BYTES_PER_MEGABYTE),
            attachment: Some(FileAttachment {
                file,
                length,
                content_type: content_type_for(&extension),
            }),
            source_type: extension,
        }))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned()
}

/// Text after the last `.`, lowercased. A name without a dot is its own
/// extension.
fn extension_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn content_type_for(extension: &str) -> String {
    match extension {
        "json" => mime::APPLICATION_JSON.to_string(),
        "pdf" => mime::APPLICATION_PDF.to_string(),
        "txt" => mime::TEXT_PLAIN.to_string(),
        "csv" => mime::TEXT_CSV.to_string(),
        "xls" => "application/vnd.ms-excel".to_string(),
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        "doc" => "application/msword".to_string(),
        "docx" => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string()
        }
        "mp3" => "audio/mpeg".to_string(),
        "wav" => "audio/wav".to_string(),
        "mp4" => "video/mp4".to_string(),
        "mkv" => "video/x-matroska".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UNSUPPORTED_FILE_TYPE_MESSAGE;
    use std::io::Write;
    use test_case::test_case;

    fn temp_file(name: &str, len: usize) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![b'x'; len]).unwrap();
        (dir, path)
    }

    fn text_fields(parts: &[MultipartPart]) -> Vec<(String, String)> {
        parts
            .iter()
            .filter_map(|p| match p {
                MultipartPart::Text { name, value } => Some((name.clone(), value.clone())),
                MultipartPart::File { .. } => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_source_is_noop() {
        let packager = DataSourcePackager::default();
        let payload = packager
            .package("c1", &DataSourceInput::default())
            .await
            .unwrap();
        assert!(payload.is_none());

        let empty = DataSourceInput {
            file_path: Some(PathBuf::new()),
            url: Some(String::new()),
        };
        assert!(empty.is_empty());
        assert!(packager.package("c1", &empty).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_url_mode() {
        let payload = DataSourcePackager::default()
            .package("c1", &DataSourceInput::url("https://example.com/doc"))
            .await
            .unwrap()
            .unwrap();

        assert!(payload.is_url());
        assert_eq!(payload.size_field(), None);

        let parts = payload.into_parts();
        assert_eq!(
            text_fields(&parts),
            vec![
                ("filename".to_string(), "https://example.com/doc".to_string()),
                ("type".to_string(), "url".to_string()),
                ("corpusId".to_string(), "c1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_url_takes_precedence_over_file() {
        let input = DataSourceInput {
            file_path: Some(PathBuf::from("/does/not/exist.pdf")),
            url: Some("https://example.com/doc".to_string()),
        };

        let payload = DataSourcePackager::default()
            .package("c1", &input)
            .await
            .unwrap()
            .unwrap();
        assert!(payload.is_url());
    }

    #[tokio::test]
    async fn test_file_mode_two_megabytes() {
        let (_dir, path) = temp_file("report.pdf", 2_097_152);

        let payload = DataSourcePackager::default()
            .package("c1", &DataSourceInput::file(&path))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload.filename, "report.pdf");
        assert_eq!(payload.source_type, "pdf");
        assert_eq!(payload.size_field().as_deref(), Some("2"));

        let parts = payload.into_parts();
        match &parts[0] {
            MultipartPart::File {
                name,
                filename,
                content_type,
                length,
                ..
            } => {
                assert_eq!(name, "file");
                assert_eq!(filename, "report.pdf");
                assert_eq!(content_type, "application/pdf");
                assert_eq!(*length, 2_097_152);
            }
            MultipartPart::Text { .. } => panic!("Expected file part first"),
        }
        assert_eq!(
            text_fields(&parts),
            vec![
                ("filename".to_string(), "report.pdf".to_string()),
                ("type".to_string(), "pdf".to_string()),
                ("corpusId".to_string(), "c1".to_string()),
                ("size".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_file_mode_size_is_not_rounded() {
        let (_dir, path) = temp_file("notes.txt", 524_288 + 1);

        let payload = DataSourcePackager::default()
            .package("c1", &DataSourceInput::file(&path))
            .await
            .unwrap()
            .unwrap();

        let expected = 524_289_f64 / (1024.0 * 1024.0);
        assert_eq!(payload.size_mb, Some(expected));
        assert_eq!(payload.size_field(), Some(expected.to_string()));
    }

    #[tokio::test]
    async fn test_empty_file_sends_no_size() {
        let (_dir, path) = temp_file("blank.txt", 0);

        let payload = DataSourcePackager::default()
            .package("c1", &DataSourceInput::file(&path))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload.size_mb, None);
        assert!(payload.attachment.is_some());

        let fields = text_fields(&payload.into_parts());
        assert!(fields.iter().all(|(name, _)| name != "size"));
        assert_eq!(fields.len(), 3);
    }

    #[test_case("data.JSON", "json" ; "uppercase json")]
    #[test_case("sheet.xls", "xls" ; "xls")]
    #[test_case("sheet.Xlsx", "xlsx" ; "mixed case xlsx")]
    #[test_case("movie.mkv", "mkv" ; "mkv")]
    #[test_case("clip.mp4", "mp4" ; "mp4")]
    #[test_case("song.mp3", "mp3" ; "mp3")]
    #[test_case("voice.wav", "wav" ; "wav")]
    #[test_case("archive.tar.pdf", "pdf" ; "last dot wins")]
    #[test_case("readme.txt", "txt" ; "txt")]
    #[test_case("table.csv", "csv" ; "csv")]
    #[test_case("letter.docx", "docx" ; "docx")]
    #[test_case("letter.DOC", "doc" ; "uppercase doc")]
    fn test_allowed_extensions(filename: &str, expected: &str) {
        let (_dir, path) = temp_file(filename, 16);
        let payload = tokio_test::block_on(
            DataSourcePackager::default().package("c1", &DataSourceInput::file(&path)),
        )
        .unwrap()
        .unwrap();

        assert_eq!(payload.source_type, expected);
        assert_eq!(payload.filename, filename);
    }

    #[test_case("setup.exe" ; "exe")]
    #[test_case("image.png" ; "png")]
    #[test_case("Makefile" ; "no extension")]
    #[test_case("archive.pdf.zip" ; "allowed type not last")]
    fn test_disallowed_extensions(filename: &str) {
        let (_dir, path) = temp_file(filename, 16);
        let err = tokio_test::block_on(
            DataSourcePackager::default().package("c1", &DataSourceInput::file(&path)),
        )
        .unwrap_err();

        assert!(matches!(err, RagcyError::UnsupportedFileType { .. }));
        assert_eq!(err.to_string(), UNSUPPORTED_FILE_TYPE_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");

        let err = DataSourcePackager::default()
            .package("c1", &DataSourceInput::file(missing))
            .await
            .unwrap_err();

        match err {
            RagcyError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_allow_list() {
        let (_dir, path) = temp_file("slides.PPTX", 8);
        let packager = DataSourcePackager::with_allowed_extensions([".pptx"]);

        assert!(packager.is_allowed("PPTX"));
        assert!(!packager.is_allowed("pdf"));

        let payload = packager
            .package("c1", &DataSourceInput::file(&path))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.source_type, "pptx");
        assert_eq!(
            payload.attachment.map(|a| a.content_type).as_deref(),
            Some("application/octet-stream")
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF"), "pdf");
        assert_eq!(extension_of("Makefile"), "makefile");
        assert_eq!(extension_of("trailing."), "");
    }
}
