// src/tasks/generator.rs

//! Pass-through tasks onto the pattern-library generator.

use crate::errors::{LabrunError, Result};
use crate::tasks::TaskContext;

/// `generate`: full build honouring `cleanPublic`.
pub async fn generate(ctx: &TaskContext) -> Result<()> {
    ctx.generator().build(ctx.config().clean_public()).await
}

pub async fn patterns_only(ctx: &TaskContext) -> Result<()> {
    ctx.generator().patterns_only(ctx.config().clean_public()).await
}

pub async fn version(ctx: &TaskContext) -> Result<()> {
    ctx.generator().version().await
}

pub async fn help(ctx: &TaskContext) -> Result<()> {
    ctx.generator().help().await
}

pub async fn list_starterkits(ctx: &TaskContext) -> Result<()> {
    ctx.generator().list_starterkits().await
}

pub async fn load_starterkit(ctx: &TaskContext) -> Result<()> {
    let args = ctx.args();
    let kit = args.kit.as_deref().ok_or_else(|| {
        LabrunError::ConfigError("patternlab:loadstarterkit requires --kit <name>".to_string())
    })?;
    ctx.generator().load_starterkit(kit, args.clean).await
}

pub async fn install_plugin(ctx: &TaskContext) -> Result<()> {
    let plugin = ctx.args().plugin.as_deref().ok_or_else(|| {
        LabrunError::ConfigError("patternlab:installplugin requires --plugin <name>".to_string())
    })?;
    ctx.generator().install_plugin(plugin).await
}
