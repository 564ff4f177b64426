use clap::Parser;
use giftchoice_config::ConfigManager;
use giftchoice_observability::{LogManager, LogSettings};
use giftchoice_server::{run_server, AppState};

#[derive(Parser, Debug, Clone)]
#[command(name = "giftchoice-server")]
#[command(about = "GiftChoice chat assistant HTTP server")]
#[command(version)]
struct Cli {
    /// Server host (overrides config)
    #[arg(long, env = "GIFTCHOICE_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Storefront API base URL (overrides config)
    #[arg(long, env = "GIFTCHOICE_API_URL")]
    api_base_url: Option<String>,

    /// Log level or filter directive (overrides config)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Config file path (default: ~/.giftchoice/config.json)
    #[arg(long, env = "GIFTCHOICE_CONFIG")]
    config: Option<String>,

    /// Skip the catalog fetch at startup
    #[arg(long, default_value = "false")]
    no_fetch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config_manager = match &cli.config {
        Some(path) => {
            let config_path = giftchoice_config::expand_tilde(path)
                .unwrap_or_else(|| std::path::PathBuf::from(path));
            ConfigManager::load(&config_path).await
        }
        None => ConfigManager::load_default().await,
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let mut config = config_manager.snapshot().await;

    // CLI 参数覆盖配置文件
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.api_base_url {
        config.catalog.api_base_url = url;
    }
    ConfigManager::validate(&config)?;

    // 初始化日志
    let mut log_settings = LogSettings::from(&config.logging);
    if let Some(level) = cli.log_level {
        log_settings = log_settings.with_level(level);
    }
    let _log_manager = LogManager::init(log_settings)?;

    tracing::info!("Config loaded from {:?}", config_manager.path());
    tracing::info!("  Catalog API: {}", config.catalog.api_base_url);
    tracing::debug!("  CORS: {}", config.server.cors);

    let state = AppState::from_config(&config)?;

    // 首次拉取商品，不阻塞启动
    if config.catalog.fetch_on_start && !cli.no_fetch {
        state.catalog.spawn_initial_fetch(state.source.clone());
    }
    state.sessions.spawn_cleanup();

    run_server(state, &config.server.host, config.server.port, config.server.cors).await
}
