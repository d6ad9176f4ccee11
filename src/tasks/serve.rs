// src/tasks/serve.rs

use tracing::info;

use crate::errors::Result;
use crate::server::{LiveReloadServer, ServerOptions};
use crate::tasks::TaskContext;

/// `patternlab:connect`: start the live-reload server. Completes once the
/// server is listening; the accept loop keeps running in the background.
pub async fn connect(ctx: &TaskContext) -> Result<()> {
    let cfg = ctx.config();
    let server_cfg = &cfg.runner().server;

    let opts = ServerOptions {
        host: server_cfg.host.clone(),
        port: server_cfg.port,
        root: ctx.resolve([&cfg.public().root]),
        snippet_blacklist: server_cfg.snippet_blacklist.clone(),
    };

    let server = LiveReloadServer::bind(opts, ctx.reload_hub().clone()).await?;
    let addr = server.local_addr();
    ctx.set_server_addr(addr);
    server.spawn();

    info!(url = %format!("http://{addr}/"), "live-reload server listening");
    Ok(())
}

/// `reload`: full page reload on every client.
pub async fn reload(ctx: &TaskContext) -> Result<()> {
    ctx.reload_hub().reload();
    Ok(())
}

/// `reload-css`: re-fetch all stylesheets without reloading the page.
pub async fn reload_css(ctx: &TaskContext) -> Result<()> {
    ctx.reload_hub().reload_css(Vec::new());
    Ok(())
}
