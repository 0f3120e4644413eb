use chrono::{DateTime, Utc};
use mime::Mime;

use super::domain::{ApplicationDocument, DocumentType, UploadedFile};
use crate::workflows::forms::templates::{CERTIFICATE_KEY, EDUCATION_QUALIFICATIONS_FIELD};
use crate::workflows::forms::{FormData, FormValue, WORK_EXPERIENCE_FIELD};

/// Rejected supporting file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("file '{file_name}' must be a PDF, JPEG or PNG document")]
    UnsupportedType { file_name: String },
    #[error("file '{file_name}' has no storage key")]
    MissingStorageKey { file_name: String },
    #[error("file '{file_name}' is {size} bytes; the limit is {limit} bytes")]
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },
}

/// Django's default in-memory upload ceiling, 2.5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2_621_440;

/// Reject files larger than `limit` bytes.
pub fn check_document_size(file_name: &str, size: u64, limit: u64) -> Result<(), DocumentError> {
    if size > limit {
        return Err(DocumentError::TooLarge {
            file_name: file_name.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

/// Media type guessed from the file extension, restricted to PDF and JPEG/PNG images.
pub fn accepted_document_type(file_name: &str) -> Result<Mime, DocumentError> {
    let accepted = [mime::APPLICATION_PDF, mime::IMAGE_JPEG, mime::IMAGE_PNG];
    match mime_guess::from_path(file_name).first() {
        Some(guessed) if accepted.contains(&guessed) => Ok(guessed),
        _ => Err(DocumentError::UnsupportedType {
            file_name: file_name.to_string(),
        }),
    }
}

pub(crate) fn document_from(
    document_type: DocumentType,
    file_name: &str,
    storage_key: &str,
    size: u64,
    max_upload_bytes: u64,
    uploaded_at: DateTime<Utc>,
) -> Result<ApplicationDocument, DocumentError> {
    accepted_document_type(file_name)?;
    check_document_size(file_name, size, max_upload_bytes)?;
    if storage_key.trim().is_empty() {
        return Err(DocumentError::MissingStorageKey {
            file_name: file_name.to_string(),
        });
    }

    Ok(ApplicationDocument {
        document_type,
        file_name: file_name.to_string(),
        storage_key: storage_key.to_string(),
        size,
        uploaded_at,
    })
}

/// Turn uploads referenced from certificate subfields into documents.
///
/// Each matched entry's `certificate` is rewritten to the upload's storage key. Certificate values
/// that name no upload are left untouched, as are array items that are not objects.
pub fn link_certificates(
    form_data: &mut FormData,
    uploads: &[UploadedFile],
    max_upload_bytes: u64,
    uploaded_at: DateTime<Utc>,
) -> Result<Vec<ApplicationDocument>, DocumentError> {
    let mut documents = Vec::new();
    if uploads.is_empty() {
        return Ok(documents);
    }

    let sections = [
        (EDUCATION_QUALIFICATIONS_FIELD, DocumentType::EducationCertificate),
        (WORK_EXPERIENCE_FIELD, DocumentType::WorkExperienceCertificate),
    ];

    for (field, document_type) in sections {
        let Some(value) = form_data.get_mut(field) else {
            continue;
        };

        for entry in value.entries_mut() {
            let upload = match entry.get(CERTIFICATE_KEY).and_then(FormValue::as_text) {
                Some(key) => uploads.iter().find(|upload| upload.key == key),
                None => None,
            };
            let Some(upload) = upload else { continue };

            documents.push(document_from(
                document_type,
                &upload.file_name,
                &upload.storage_key,
                upload.size,
                max_upload_bytes,
                uploaded_at,
            )?);
            entry.insert(
                CERTIFICATE_KEY.to_string(),
                FormValue::text(upload.storage_key.clone()),
            );
        }
    }

    Ok(documents)
}
