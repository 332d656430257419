//! Create a new post document.

use std::path::PathBuf;

use nitepost_post_model::{Background, BackgroundStyle, PostContent, PostFormat, DEFAULT_IMAGE_OPACITY};

use super::write_post;

pub fn run(
    path: PathBuf,
    format: String,
    headline: Option<String>,
    background: String,
    image: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let format: PostFormat = format.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let style: BackgroundStyle = background.parse().map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut content = PostContent::new(format);
    if let Some(text) = headline {
        content.set_headline_text(text);
    }
    content.set_background(match (style, image) {
        (BackgroundStyle::CustomImage, Some(image)) => {
            Background::custom_image(image, DEFAULT_IMAGE_OPACITY)
        }
        (BackgroundStyle::CustomImage, None) => {
            println!("Note: custom-image without --image renders a flat background.");
            Background::gradient(style)
        }
        (_, Some(_)) => {
            return Err(anyhow::anyhow!(
                "--image only applies to the custom-image background"
            ))
        }
        (style, None) => Background::gradient(style),
    });

    write_post(&path, &content)?;

    let canvas = format.canvas();
    println!("Created post at {}", path.display());
    println!("  Format: {format} ({}x{})", canvas.width, canvas.height);
    println!("  Background: {}", content.background.style.as_str());
    println!("  Sections: {}", content.sections().len());

    Ok(())
}
