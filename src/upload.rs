//! Upload validation and the raw document handed to the pipeline.
//!
//! Only plain-text uploads with a `.txt` extension are accepted. Validation happens before the
//! pipeline runs, so a rejected upload never reaches the annotation service.

use thiserror::Error;

/// The only media type accepted for uploads.
pub const ACCEPTED_MEDIA_TYPE: &str = "text/plain";
/// The only file extension accepted for uploads (compared case-insensitively).
pub const ACCEPTED_EXTENSION: &str = "txt";

/// Reasons an upload is rejected before analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No file, a transport failure, or a media type other than `text/plain`.
    #[error("Invalid file or upload error.")]
    InvalidFile,
    /// File name does not end in `.txt`.
    #[error("Invalid file extension. Only .txt files are allowed.")]
    InvalidExtension,
}

/// Immutable uploaded content plus the metadata declared by the client.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Uploaded bytes, loaded fully into memory.
    pub bytes: Vec<u8>,
    /// Media type declared by the uploader.
    pub media_type: String,
    /// Original file name as sent by the uploader.
    pub filename: String,
}

impl RawDocument {
    /// Validate upload metadata and wrap the bytes for analysis.
    pub fn new(
        bytes: Vec<u8>,
        media_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<Self, UploadError> {
        let (media_type, filename) = validate_upload(media_type, filename)?;
        Ok(Self {
            bytes,
            media_type: media_type.to_string(),
            filename: filename.to_string(),
        })
    }
}

/// Check the declared media type and file name of an upload.
pub fn validate_upload<'a>(
    media_type: Option<&'a str>,
    filename: Option<&'a str>,
) -> Result<(&'a str, &'a str), UploadError> {
    let media_type = media_type.ok_or(UploadError::InvalidFile)?;
    if !media_type_essence(media_type).eq_ignore_ascii_case(ACCEPTED_MEDIA_TYPE) {
        return Err(UploadError::InvalidFile);
    }
    let filename = filename
        .filter(|name| !name.trim().is_empty())
        .ok_or(UploadError::InvalidFile)?;
    validate_extension(filename)?;
    Ok((media_type, filename))
}

/// Require a `.txt` extension, ignoring case.
///
/// The extension is whatever follows the last `.` of the base name, so a file named `.txt`
/// counts as a text file.
pub fn validate_extension(filename: &str) -> Result<(), UploadError> {
    let basename = filename
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let extension = basename
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or_default();
    if extension.eq_ignore_ascii_case(ACCEPTED_EXTENSION) {
        Ok(())
    } else {
        Err(UploadError::InvalidExtension)
    }
}

/// Strip parameters such as `; charset=utf-8` from a media type.
fn media_type_essence(media_type: &str) -> &str {
    media_type.split(';').next().unwrap_or_default().trim()
}
