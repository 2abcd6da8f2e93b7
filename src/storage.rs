//! Crawl snapshot persistence
//!
//! A completed index is persisted as a single opaque bincode blob. The only
//! contract is round-tripping: a loaded snapshot answers every engine query
//! exactly like the index that was saved.

use crate::index::Index;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File name of the crawl snapshot inside the data directory
pub const SNAPSHOT_FILE: &str = "crawl.dat";

const SNAPSHOT_PREFIX: &str = "crawl";
const SNAPSHOT_EXT: &str = ".dat";

/// Serialise the index to `path`, creating parent directories as needed.
pub fn save_index(index: &Index, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let data = bincode::serialize(index).context("Failed to serialise index")?;
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load an index snapshot from `path`.
pub fn load_index(path: &Path) -> Result<Index> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    bincode::deserialize(&data)
        .with_context(|| format!("Failed to decode snapshot {}", path.display()))
}

/// Delete every crawl snapshot in `dir`; create the directory when missing.
pub fn clean_data_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        return Ok(());
    }

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_EXT) {
            fs::remove_file(entry.path())
                .with_context(|| format!("Failed to delete {}", entry.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::FetchedPage;
    use crate::urls::NormalUrl;

    fn sample_index() -> Index {
        let page = FetchedPage::from_html(
            NormalUrl::parse("http://s.test/a.html").unwrap(),
            r#"<title>A</title><p>alpha beta alpha</p><a href="./b.html">b</a>"#.to_string(),
        );
        let leaf = FetchedPage::from_html(
            NormalUrl::parse("http://s.test/b.html").unwrap(),
            "<title>B</title><p>beta</p>".to_string(),
        );
        Index::build("http://s.test/a.html", vec![page, leaf])
    }

    #[test]
    fn snapshot_round_trip_preserves_observable_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);

        let index = sample_index();
        save_index(&index, &path).unwrap();
        let loaded = load_index(&path).unwrap();

        let a = NormalUrl::parse("http://s.test/a.html").unwrap();
        assert_eq!(loaded.total_docs(), index.total_docs());
        assert_eq!(loaded.total_words(), index.total_words());
        assert_eq!(loaded.seed_url(), index.seed_url());
        assert_eq!(loaded.idf("alpha"), index.idf("alpha"));
        assert_eq!(loaded.tf(&a, "alpha"), index.tf(&a, "alpha"));
        assert_eq!(loaded.tf_idf(&a, "beta"), index.tf_idf(&a, "beta"));
        assert_eq!(loaded.page_rank(&a), index.page_rank(&a));
        assert_eq!(loaded.incoming_links(&a), index.incoming_links(&a));
        assert_eq!(loaded.outgoing_links(&a), index.outgoing_links(&a));
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join(SNAPSHOT_FILE);
        save_index(&sample_index(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn clean_removes_snapshots_and_spares_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("crawl.dat"), b"old").unwrap();
        std::fs::write(dir.path().join("crawl-2.dat"), b"older").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        clean_data_dir(dir.path()).unwrap();

        assert!(!dir.path().join("crawl.dat").exists());
        assert!(!dir.path().join("crawl-2.dat").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn clean_creates_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh");
        clean_data_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn loading_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(&path, b"not a snapshot").unwrap();
        assert!(load_index(&path).is_err());
    }
}
