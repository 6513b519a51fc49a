//! Uploaded document loading

use crate::chunking::Document;
use crate::sources::{SourceError, UploadedFile};

/// Extract raw text from uploaded files
///
/// Plain-text formats only (`.txt`, `.md`); anything else fails with
/// [`SourceError::UnsupportedInput`]. A file whose trimmed text is empty
/// fails with [`SourceError::EmptyDocument`] so the chunker never sees a
/// blank document. Fails fast on the first bad file.
pub fn load_documents(uploaded_files: &[UploadedFile]) -> Result<Vec<Document>, SourceError> {
    let mut documents = Vec::with_capacity(uploaded_files.len());

    for file in uploaded_files {
        tracing::info!(name = %file.name, "loading document");

        let lowered = file.name.to_lowercase();
        if !(lowered.ends_with(".txt") || lowered.ends_with(".md")) {
            return Err(SourceError::UnsupportedInput {
                source_name: file.name.clone(),
            });
        }

        let text =
            String::from_utf8(file.data.clone()).map_err(|_| SourceError::Decode {
                source_name: file.name.clone(),
            })?;

        if text.trim().is_empty() {
            return Err(SourceError::EmptyDocument {
                source_name: file.name.clone(),
            });
        }

        documents.push(Document::new(&file.name, &text));
    }

    tracing::info!(count = documents.len(), "documents loaded");

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_txt_and_md() {
        let files = vec![
            UploadedFile::new("notes.txt", b"plain notes".to_vec()),
            UploadedFile::new("README.md", b"# heading\nbody".to_vec()),
        ];

        let documents = load_documents(&files).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].source, "notes.txt");
        assert_eq!(documents[1].text, "# heading\nbody");
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let files = vec![UploadedFile::new("NOTES.TXT", b"content".to_vec())];
        assert!(load_documents(&files).is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let files = vec![UploadedFile::new("report.pdf", b"%PDF-1.4".to_vec())];
        assert!(matches!(
            load_documents(&files),
            Err(SourceError::UnsupportedInput { source_name }) if source_name == "report.pdf"
        ));
    }

    #[test]
    fn test_whitespace_only_file_rejected() {
        let files = vec![UploadedFile::new("blank.txt", b"  \n\t ".to_vec())];
        assert!(matches!(
            load_documents(&files),
            Err(SourceError::EmptyDocument { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let files = vec![UploadedFile::new("binary.txt", vec![0xff, 0xfe, 0x00])];
        assert!(matches!(
            load_documents(&files),
            Err(SourceError::Decode { .. })
        ));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(load_documents(&[]).unwrap().is_empty());
    }
}
