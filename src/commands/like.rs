//! Toggle a post's heart state

use anyhow::Result;

use crate::manifest::{Manifest, PostId};
use crate::storage::HeartStore;
use crate::Viewer;

/// Toggle the heart on a post and report the new state
pub async fn run(viewer: &Viewer, id: PostId) -> Result<()> {
    let payload = viewer.source().fetch_manifest().await?;
    let manifest = Manifest::from_json(&payload)?;
    let post = manifest
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("no post with id {}", id))?;

    let hearts = HeartStore::new(viewer.storage());
    let liked = hearts.toggle(id);

    if liked {
        println!("♥ Liked: {}", post.title);
    } else {
        println!("  Unliked: {}", post.title);
    }
    Ok(())
}
