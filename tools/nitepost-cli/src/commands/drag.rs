//! Move, rotate or restack an element of a post.

use std::path::PathBuf;

use nitepost_drag_engine::{drag_script, DownOutcome, PointerEvent};
use nitepost_post_model::ElementId;
use nitepost_render_engine::PreviewRenderer;

use super::{read_post, write_post};

pub fn run(
    path: PathBuf,
    element: String,
    to: Vec<(f64, f64)>,
    script: Option<PathBuf>,
    rotate: Option<f64>,
    z: Option<i32>,
) -> anyhow::Result<()> {
    let element: ElementId = element.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut content = read_post(&path)?;
    // The logo has a fixed slot; only its stacking order can change.
    if element != ElementId::Logo && content.position_of(element).is_none() {
        return Err(anyhow::anyhow!("Post has no element {element}"));
    }

    if let Some(degrees) = rotate {
        content.set_rotation(element, degrees)?;
        println!("Rotated {element} to {:.1} deg", content.rotation_of(element));
    }
    if z.is_some() {
        content.set_z_index(element, z)?;
        println!("Set {element} stacking order to {}", content.z_index_of(element));
    }

    let mut preview = PreviewRenderer::new(content);
    let frame = preview.frame_rect(0.0, 0.0);
    let events = match script {
        Some(script_path) => {
            let json = std::fs::read_to_string(&script_path).map_err(|e| {
                anyhow::anyhow!("Failed to read script {}: {e}", script_path.display())
            })?;
            serde_json::from_str::<Vec<PointerEvent>>(&json)?
        }
        None if to.is_empty() => Vec::new(),
        None => drag_script(element, &frame, &to),
    };

    let mut updates = 0usize;
    for event in &events {
        match *event {
            PointerEvent::Down { element: target, .. } => match preview.begin_drag(target, frame) {
                DownOutcome::Started => {}
                DownOutcome::Busy(owner) => {
                    tracing::warn!(%target, %owner, "Pointer down ignored, another drag is active")
                }
                DownOutcome::NotDraggable => {
                    tracing::warn!(%target, "Pointer down ignored, element is not draggable")
                }
            },
            PointerEvent::Move { client_x, client_y } => {
                if preview.drag_to(client_x, client_y).is_some() {
                    updates += 1;
                }
            }
            PointerEvent::Up => {
                preview.end_drag();
            }
        }
    }
    if !events.is_empty() {
        tracing::debug!(events = events.len(), updates, "Replayed pointer script");
    }

    let content = preview.into_content();
    write_post(&path, &content)?;

    if let Some(position) = content.position_of(element) {
        println!(
            "{} at ({:.1}%, {:.1}%) after {updates} update(s)",
            element.label(),
            position.x,
            position.y
        );
    }
    Ok(())
}
