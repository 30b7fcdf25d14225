use anyhow::Result;
use meal_import::import_config::ImportConfig;
use meal_import::import_errors::ImportError;
use meal_import::importer::read_document;
use std::io::Write;
use tempfile::Builder;

fn import_error(err: &anyhow::Error) -> Option<&ImportError> {
    err.downcast_ref::<ImportError>()
}

#[test]
fn test_reads_markdown_file() -> Result<()> {
    let mut file = Builder::new().suffix(".md").tempfile()?;
    write!(file, "# Owsianka\n\n## Składniki\n- 50g płatki owsiane\n")?;

    let content = read_document(file.path(), &ImportConfig::default())?;
    assert!(content.starts_with("# Owsianka"));
    Ok(())
}

#[test]
fn test_extension_is_case_insensitive() -> Result<()> {
    let mut file = Builder::new().suffix(".MARKDOWN").tempfile()?;
    write!(file, "# Tosty")?;

    assert_eq!(read_document(file.path(), &ImportConfig::default())?, "# Tosty");
    Ok(())
}

#[test]
fn test_rejects_other_extensions() -> Result<()> {
    let file = Builder::new().suffix(".pdf").tempfile()?;

    let err = read_document(file.path(), &ImportConfig::default()).unwrap_err();
    assert!(matches!(import_error(&err), Some(ImportError::UnsupportedFile(_))));
    Ok(())
}

#[test]
fn test_rejects_oversized_document() -> Result<()> {
    let mut file = Builder::new().suffix(".txt").tempfile()?;
    write!(file, "{}", "# Zupa\n".repeat(100))?;
    let config = ImportConfig {
        max_document_size: 64,
        ..ImportConfig::default()
    };

    let err = read_document(file.path(), &config).unwrap_err();
    match import_error(&err) {
        Some(ImportError::DocumentTooLarge { max_bytes, .. }) => assert_eq!(*max_bytes, 64),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brak.md");

    let err = read_document(&path, &ImportConfig::default()).unwrap_err();
    assert!(import_error(&err).is_none());
    assert!(format!("{err:#}").contains("brak.md"));
}
