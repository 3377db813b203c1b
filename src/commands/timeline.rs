//! Print the post timeline grouped by year and date

use anyhow::Result;

use crate::manifest::{timeline, Manifest};
use crate::Viewer;

/// Print the year / date timeline of all posts
pub async fn run(viewer: &Viewer) -> Result<()> {
    let payload = viewer.source().fetch_manifest().await?;
    let manifest = Manifest::from_json(&payload)?;

    let years = timeline(manifest.posts());
    if years.is_empty() {
        println!("No dated posts yet.");
        return Ok(());
    }

    for year in years {
        println!("{}", year.year);
        for day in year.days {
            let mut titles = day.posts.iter().map(|p| p.title.as_str());
            println!(
                "  {} {}  {}",
                day.month_label,
                day.day_label,
                titles.next().unwrap_or("")
            );
            for title in titles {
                println!("          {}", title);
            }
        }
    }

    Ok(())
}
