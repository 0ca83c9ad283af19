use crate::core::index::PictogramIndex;
use crate::error::SnapshotError;
use log::info;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes a built index to disk as compact binary. The corpus is static
/// per session, so a snapshot lets a relaunch skip the flatten/intern work
/// for large corpora.
///
/// The write goes through a named temp file in the target directory and is
/// persisted atomically; a crash mid-write never leaves a torn snapshot.
pub fn save_index(index: &PictogramIndex, path: &Path) -> Result<(), SnapshotError> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let writer = BufWriter::new(&temp_file);
    bincode::serialize_into(writer, index)?;

    temp_file.persist(path).map_err(|e| SnapshotError::Io(e.error))?;
    info!("index snapshot written to {}", path.display());
    Ok(())
}

/// Loads an index snapshot previously written by [`save_index`].
pub fn load_index(path: &Path) -> Result<PictogramIndex, SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let index = bincode::deserialize_from(reader)?;
    info!("index snapshot loaded from {}", path.display());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::SearchBackend;
    use crate::core::types::{KeywordEntry, Pictogram};
    use crate::corpus::Corpus;

    fn index() -> PictogramIndex {
        let corpus = Corpus::from_records(vec![Pictogram {
            id: 100,
            keywords: vec![KeywordEntry {
                text: "manger".to_string(),
                word_type: None,
                plural: Some("mangent".to_string()),
            }],
            categories: Vec::new(),
            tags: vec!["nourriture".to_string()],
        }])
        .unwrap();
        PictogramIndex::build(corpus)
    }

    #[test]
    fn reloaded_snapshot_answers_like_the_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        let original = index();
        save_index(&original, &path).unwrap();
        let reloaded = load_index(&path).unwrap();

        assert_eq!(reloaded.corpus().len(), original.corpus().len());
        assert_eq!(reloaded.search("manger"), original.search("manger"));
        assert_eq!(reloaded.search("mang"), original.search("mang"));
    }

    #[test]
    fn loading_a_missing_snapshot_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_index(&dir.path().join("absent.bin"));
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }
}
