// src/tasks/sprite.rs

use tracing::{error, info};

use crate::errors::Result;
use crate::sprite::{SpriteJob, build_sprite};
use crate::tasks::TaskContext;

pub fn sprite_job(ctx: &TaskContext) -> SpriteJob {
    let cfg = ctx.config();
    let source = cfg.source();
    let sprite = &cfg.runner().sprite;

    SpriteJob {
        images_dir: ctx.resolve([&source.images]),
        source_glob: sprite.source.clone(),
        css_dir: ctx.resolve([&source.css]),
        sprite_path: ctx.resolve([&source.css, &sprite.sprite]),
        partial_path: ctx.resolve([&source.css, &sprite.partial]),
        padding: sprite.padding,
        class_prefix: sprite.class_prefix.clone(),
        now: ctx.build_stamp(),
    }
}

/// `sprite`: pack the icons. Packing problems are logged, never returned.
pub async fn run_sprite(ctx: &TaskContext) -> Result<()> {
    let job = sprite_job(ctx);
    let fs = ctx.fs_arc();

    let outcome = tokio::task::spawn_blocking(move || build_sprite(fs.as_ref(), &job))
        .await
        .map_err(anyhow::Error::new)?;

    match outcome {
        Ok(output) => info!(
            icons = output.icons,
            width = output.width,
            height = output.height,
            "sprite built"
        ),
        Err(err) => error!(error = %err, "sprite generation failed"),
    }
    Ok(())
}
