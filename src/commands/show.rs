//! Show a single rendered post

use anyhow::Result;
use std::path::Path;

use crate::controller::SelectionOrigin;
use crate::manifest::PostId;
use crate::render::Display;
use crate::Viewer;

/// Load a post (the manifest's first one when no id is given), render
/// it, and print or save the HTML document
pub async fn run(viewer: &Viewer, id: Option<PostId>, output: Option<&Path>) -> Result<()> {
    let session = viewer.session().await?;

    session.controller.init().await;
    if let Some(id) = id {
        session
            .controller
            .select_post(id, SelectionOrigin::User)
            .await;
        if session.controller.active() != Some(id) {
            anyhow::bail!("no post with id {}", id);
        }
    }

    match session.renderer.display() {
        Display::Document(html) => match output {
            Some(path) => {
                std::fs::write(path, &html)?;
                println!("Saved to {:?}", path);
            }
            None => println!("{}", html),
        },
        Display::Error(message) => anyhow::bail!("{}", message),
        Display::Empty | Display::Blank => anyhow::bail!("nothing to show"),
    }

    Ok(())
}
