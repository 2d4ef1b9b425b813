use std::fs;
use std::path::{Path, PathBuf};

use crate::core::analyzer::AnalyzedSegment;
use crate::error::{Error, Result};

const REPORTS_DIR: &str = "reports";
const REPORT_PREFIX: &str = "report_";
const REPORT_SUFFIX: &str = ".md";
const MAX_SLUG_LEN: usize = 64;

/// File-backed store for analyzed segments: one ever-growing JSON array,
/// append and full-scan read only. Append is read-extend-rewrite and not
/// atomic; the tool is single-user by design.
#[derive(Debug, Clone)]
pub struct ReviewStore {
    path: PathBuf,
}

impl ReviewStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, segments: &[AnalyzedSegment]) -> Result<()> {
        let mut all = self.load_all()?;
        all.extend_from_slice(segments);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory(parent)?;
        }

        let json = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, json).map_err(|e| {
            Error::storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    pub fn load_all(&self) -> Result<Vec<AnalyzedSegment>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::storage(format!("failed to read {}: {e}", self.path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::storage(format!(
                "store file {} is not valid review data: {e}",
                self.path.display()
            ))
        })
    }

    /// Full scan filtered by product, compared case-insensitively.
    pub fn load_for_product(&self, product: &str) -> Result<Vec<AnalyzedSegment>> {
        let wanted = product.trim().to_lowercase();
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|segment| segment.product_name.to_lowercase() == wanted)
            .collect())
    }

    /// Sorted unique product names, for the dashboard selector.
    pub fn product_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for segment in self.load_all()? {
            if !names.contains(&segment.product_name) {
                names.push(segment.product_name);
            }
        }
        names.sort();
        Ok(names)
    }
}

pub fn save_report(product: &str, content: &str) -> Result<PathBuf> {
    ensure_directory(Path::new(REPORTS_DIR))?;
    let path = report_path(product)?;
    fs::write(&path, content)
        .map_err(|e| Error::storage(format!("failed to write {}: {e}", path.display())))?;
    Ok(path)
}

pub fn report_path(product: &str) -> Result<PathBuf> {
    let slug = product_slug(product)?;
    Ok(Path::new(REPORTS_DIR).join(format!("{REPORT_PREFIX}{slug}{REPORT_SUFFIX}")))
}

/// Reduce a product name to a filesystem-safe slug.
fn product_slug(product: &str) -> Result<String> {
    let slug: String = product
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        return Err(Error::invalid_input("product name cannot be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(Error::invalid_input("product name is unexpectedly long"));
    }

    Ok(slug)
}

fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| Error::storage(format!("failed to create {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        if permissions.mode() & 0o777 != 0o700 {
            permissions.set_mode(0o700);
            fs::set_permissions(path, permissions)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sentiment::Sentiment;
    use chrono::Utc;

    fn segment(product: &str, text: &str) -> AnalyzedSegment {
        AnalyzedSegment {
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            video_title: "Review".to_string(),
            start_time: 1.0,
            end_time: 4.0,
            text: text.to_string(),
            sentiment: Sentiment::Positive,
            keywords: vec!["battery".to_string()],
            good_aspect: vec!["battery".to_string()],
            bad_aspect: Vec::new(),
            product_name: product.to_string(),
            analyzed_at: Utc::now(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> ReviewStore {
        ReviewStore::new(dir.path().join("reviews/segments.json"))
    }

    #[test]
    fn round_trips_appended_segments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let original = segment("Widget", "battery is great");
        store.append(std::slice::from_ref(&original)).expect("append");

        let loaded = store.load_all().expect("load");
        assert_eq!(loaded, vec![original]);
    }

    #[test]
    fn append_accumulates_across_calls() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.append(&[segment("Widget", "one")]).expect("append");
        store.append(&[segment("Gadget", "two")]).expect("append");

        let loaded = store.load_all().expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text, "one");
        assert_eq!(loaded[1].text, "two");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(store_in(&dir).load_all().expect("load").is_empty());
    }

    #[test]
    fn product_filter_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .append(&[segment("widget", "match"), segment("Gadget", "other")])
            .expect("append");

        let filtered = store.load_for_product("Widget").expect("filter");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].text, "match");
    }

    #[test]
    fn product_names_are_sorted_and_unique() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .append(&[
                segment("Widget", "a"),
                segment("Gadget", "b"),
                segment("Widget", "c"),
            ])
            .expect("append");

        assert_eq!(store.product_names().expect("names"), vec!["Gadget", "Widget"]);
    }

    #[test]
    fn corrupt_store_surfaces_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("segments.json");
        fs::write(&path, "not json").expect("write");

        let store = ReviewStore::new(path);
        assert!(matches!(store.load_all(), Err(Error::Storage { .. })));
    }

    #[test]
    fn slugs_product_names_for_report_paths() {
        let path = report_path("My Widget 2.0").expect("path");
        assert_eq!(path, Path::new("reports").join("report_my-widget-2-0.md"));
        assert!(report_path("   ").is_err());
    }
}
