use crate::cli::{InputArgs, RenderArgs, SelectArgs};
use crate::overlay::svg::OverlayStyle;
use crate::route::types::{HoldId, ImageSize};
use crate::session::{image_size_from_file, AnalysisSession};
use anyhow::Result;
use serde_json::json;
use std::fs;
use tracing::{info, warn};

fn load_session(input: &InputArgs) -> Result<AnalysisSession> {
    let image = match &input.image {
        Some(path) => Some(image_size_from_file(path)?),
        None => ImageSize::from_optional(input.width, input.height),
    };
    if image.is_none() {
        warn!("Image size unknown; normalized coordinates will be ignored");
    }
    AnalysisSession::from_files(&input.holds, &input.coach, image)
}

pub fn render(args: &RenderArgs, style: &OverlayStyle) -> Result<()> {
    let session = load_session(&args.input)?;
    let rendered = session.render(style);
    info!(
        "Resolved {} steps, {} drawn",
        rendered.steps.len(),
        rendered.nodes.len()
    );

    let output = if args.json {
        serde_json::to_string_pretty(&json!({
            "steps": rendered.steps,
            "nodes": rendered.nodes,
            "summary": rendered.summary,
            "holds": session.normalized_holds(),
        }))?
    } else {
        rendered.svg
    };

    match &args.out {
        Some(path) => {
            fs::write(path, output)?;
            info!("Wrote overlay to {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

pub fn select(args: &SelectArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let id = HoldId::from(args.hold_id.as_str());
    let info = session
        .select(&id)
        .ok_or_else(|| anyhow::anyhow!("No hold with id {}", args.hold_id))?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
