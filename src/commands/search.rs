//! Search posts by title and content

use anyhow::Result;

use crate::manifest::Manifest;
use crate::Viewer;

/// Run a search query and print the matching posts.
///
/// `metadata_only` skips content fetching and matches title, summary
/// and date only (the quick-search behavior).
pub async fn run(viewer: &Viewer, query: &str, metadata_only: bool) -> Result<()> {
    if metadata_only {
        let payload = viewer.source().fetch_manifest().await?;
        let manifest = Manifest::from_json(&payload)?;
        let hits = manifest.search_metadata(query);
        print_hits(query, hits.iter().map(|p| (p.id, p.date.as_str(), p.title.as_str())));
        return Ok(());
    }

    let session = viewer.session().await?;
    session.controller.init().await;
    session.controller.apply_query(query).await;

    let manifest = session.controller.manifest();
    let hits: Vec<_> = session
        .controller
        .filtered_ids()
        .into_iter()
        .filter_map(|id| manifest.get(id))
        .collect();
    print_hits(query, hits.iter().map(|p| (p.id, p.date.as_str(), p.title.as_str())));

    match session.controller.active() {
        Some(id) => println!("Active post: #{}", id),
        None => println!("No post selected."),
    }
    Ok(())
}

fn print_hits<'a>(query: &str, hits: impl Iterator<Item = (u64, &'a str, &'a str)>) {
    let mut count = 0;
    for (id, date, title) in hits {
        println!("  #{:<3} {} - {}", id, date, title);
        count += 1;
    }
    if count == 0 {
        println!("No posts match {:?}.", query);
    }
}
