use hk_transport_mcp::{infra, tools};

use infra::config::Config;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    infra::logging::init();

    let cfg = Config::from_env();
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        deprecate_rest = cfg.deprecate_rest,
        "BOOT hk-transport-mcp"
    );

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.mode == "stdio" {
        infra::runtime::mcp_transport::serve_stdio(
            tools::transport::tool_router::factory_from_env,
        )
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    // HTTP server
    let app = if cfg.deprecate_rest {
        infra::http_app::build_app_default()
    } else {
        let registry = tools::registry::build_registry_from_env();
        infra::http_app::build_app_with_deprecated_api(registry)
    };

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
