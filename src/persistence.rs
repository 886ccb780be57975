// File: src/persistence.rs
use crate::core::dictionary::{Dictionary, DictionaryData};
use crate::errors::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes a dictionary bundle. The bundle only lands at `path` once it is
/// fully written.
pub fn save_to_disk(data: &DictionaryData, path: &Path) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, data)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    Ok(())
}

/// Reads a bundle and runs full validation before anything can use it.
pub fn load_from_disk(path: &Path) -> Result<Dictionary> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data: DictionaryData = bincode::deserialize_from(reader)?;
    Dictionary::from_data(data)
}

/// Picks the format by extension: `.json` is a hand-written dictionary,
/// anything else is a bundle.
pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let content = fs::read_to_string(path)?;
            Dictionary::from_data(DictionaryData::from_json_str(&content)?)
        }
        _ => load_from_disk(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TranslatorError;

    #[test]
    fn test_bundle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundles").join("austrian.bin");

        let data = DictionaryData::builtin();
        save_to_disk(&data, &path).unwrap();
        let loaded = load_from_disk(&path).unwrap();
        assert_eq!(loaded.word_count(), Dictionary::builtin().unwrap().word_count());
        assert_eq!(loaded.phrases()[0].source, data.phrases[0].0);
    }

    #[test]
    fn test_bundle_is_validated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");
        let data = DictionaryData {
            phrases: vec![],
            words: vec![
                ("nicht".to_string(), "net".to_string()),
                ("NICHT".to_string(), "ned".to_string()),
            ],
        };
        save_to_disk(&data, &path).unwrap();
        let err = load_from_disk(&path).unwrap_err();
        assert!(err.is_malformed_entry());
    }

    #[test]
    fn test_json_dictionary_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"phrases": [], "words": [["servus", "servas"]]}"#).unwrap();
        let dict = load_dictionary(&path).unwrap();
        assert_eq!(dict.lookup_word("Servus"), Some("servas"));
    }

    #[test]
    fn test_exported_dictionary_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("custom.json");
        fs::write(
            &source,
            r#"{"phrases": [["bis bald", "servas"]], "words": [["tomate", "paradeiser"]]}"#,
        )
        .unwrap();
        let dict = load_dictionary(&source).unwrap();

        let bundle = dir.path().join("custom.bin");
        save_to_disk(&dict.to_data(), &bundle).unwrap();
        let reloaded = load_dictionary(&bundle).unwrap();
        assert_eq!(reloaded.to_data(), dict.to_data());
        assert_eq!(reloaded.lookup_word("Tomate"), Some("paradeiser"));
    }

    #[test]
    fn test_missing_bundle_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_disk(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, TranslatorError::Storage(_)));
    }
}
