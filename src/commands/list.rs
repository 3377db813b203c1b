//! List posts from the manifest

use anyhow::Result;

use crate::manifest::Manifest;
use crate::storage::HeartStore;
use crate::Viewer;

/// Print the post list, optionally newest-first
pub async fn run(viewer: &Viewer, recent: bool) -> Result<()> {
    let payload = viewer.source().fetch_manifest().await?;
    let manifest = Manifest::from_json(&payload)?;
    let hearts = HeartStore::new(viewer.storage());

    println!("{} ({} posts):", viewer.config.title, manifest.len());

    let posts: Vec<_> = if recent {
        manifest.by_recency()
    } else {
        manifest.posts().iter().collect()
    };

    for post in posts {
        let heart = if hearts.is_liked(post.id) { "♥" } else { " " };
        println!("  {} #{:<3} {} - {}", heart, post.id, post.date, post.title);
        if !post.summary.is_empty() {
            println!("        {}", post.summary);
        }
    }

    Ok(())
}
