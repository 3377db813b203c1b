//! Post manifest - the ordered list of post metadata records

mod timeline;

pub use timeline::{timeline, DayGroup, YearGroup};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Stable post identifier, unique within a manifest
pub type PostId = u64;

/// A single post record from the manifest.
///
/// Posts are immutable once loaded; the body text lives behind the
/// `file` locator and is fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique, stable identifier
    pub id: PostId,

    /// Post title
    pub title: String,

    /// Publication date as an ISO-parseable string
    pub date: String,

    /// Short summary shown in lists
    #[serde(default)]
    pub summary: String,

    /// Opaque locator for the full markdown body
    pub file: String,
}

impl Post {
    /// Parse the publication date, accepting `YYYY-MM-DD` or RFC 3339.
    /// Returns `None` for unparseable dates; callers sort those last.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            return Some(date);
        }
        chrono::DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

/// The manifest: all post metadata, fetched once per session and held
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Manifest {
    posts: Vec<Post>,
}

impl Manifest {
    /// Parse a manifest from its JSON payload
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        let posts: Vec<Post> = serde_json::from_str(text).map_err(ViewerError::manifest)?;
        Ok(Self { posts })
    }

    /// Build a manifest from already-parsed posts
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// All posts in manifest order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post by id
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Number of posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the manifest holds no posts
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts sorted newest-first. Undated posts sort after dated ones,
    /// keeping their manifest order among themselves.
    pub fn by_recency(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().collect();
        posts.sort_by(|a, b| match (b.parsed_date(), a.parsed_date()) {
            (Some(db), Some(da)) => db.cmp(&da),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => std::cmp::Ordering::Equal,
        });
        posts
    }

    /// Quick metadata search over title, summary and date, without
    /// fetching any content. Matches are returned newest-first.
    ///
    /// This mirrors the lightweight search overlay; full-content search
    /// is the indexer's job.
    pub fn search_metadata(&self, query: &str) -> Vec<&Post> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.by_recency()
            .into_iter()
            .filter(|post| {
                let haystack =
                    format!("{} {} {}", post.title, post.summary, post.date).to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::post;
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let json = r#"[
            {"id": 1, "title": "First", "date": "2024-05-01", "summary": "intro", "file": "posts/first.md"},
            {"id": 2, "title": "Second", "date": "2024-06-10", "file": "posts/second.md"}
        ]"#;
        let manifest = Manifest::from_json(json).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get(2).unwrap().title, "Second");
        assert_eq!(manifest.get(2).unwrap().summary, "");
        assert!(manifest.get(3).is_none());
    }

    #[test]
    fn test_parse_manifest_invalid_json() {
        let err = Manifest::from_json("not json").unwrap_err();
        assert!(matches!(err, ViewerError::ManifestUnavailable { .. }));
    }

    #[test]
    fn test_parsed_date_formats() {
        let plain = post(1, "a", "2024-05-01", "a.md");
        assert_eq!(
            plain.parsed_date(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );

        let rfc = post(2, "b", "2024-05-01T09:30:00+09:00", "b.md");
        assert_eq!(rfc.parsed_date(), NaiveDate::from_ymd_opt(2024, 5, 1));

        let bad = post(3, "c", "someday", "c.md");
        assert_eq!(bad.parsed_date(), None);
    }

    #[test]
    fn test_by_recency_newest_first() {
        let manifest = Manifest::from_posts(vec![
            post(1, "old", "2023-01-15", "old.md"),
            post(2, "new", "2024-06-10", "new.md"),
            post(3, "undated", "n/a", "undated.md"),
            post(4, "mid", "2023-11-02", "mid.md"),
        ]);
        let ids: Vec<PostId> = manifest.by_recency().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_search_metadata() {
        let manifest = Manifest::from_posts(vec![
            post(1, "Docker in production", "2024-01-01", "a.md"),
            post(2, "Rust notes", "2024-02-01", "b.md"),
        ]);

        let hits = manifest.search_metadata("docker");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // date fragments match too
        let hits = manifest.search_metadata("2024-02");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        assert!(manifest.search_metadata("   ").is_empty());
    }
}
