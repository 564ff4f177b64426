use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use giftchoice_catalog::{CatalogStore, HttpProductSource};
use giftchoice_config::{Config, ConfigManager};
use giftchoice_core::{BotMessage, BotReply, MessageId, StoreContact};
use giftchoice_responder::{Navigation, Responder};
use giftchoice_session::ChatSession;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "giftchoice")]
#[command(about = "GiftChoice chat assistant from the terminal")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Config file path (default: ~/.giftchoice/config.json)
    #[arg(long, env = "GIFTCHOICE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动交互式聊天
    Chat {
        /// 不拉取商品目录
        #[arg(long, default_value = "false")]
        offline: bool,
    },
    /// 提问一次并打印回复
    Ask {
        /// 问题内容
        text: String,
        /// 通过运行中的服务器分类，而不是本地处理
        #[arg(long)]
        server_url: Option<String>,
        /// 不拉取商品目录
        #[arg(long, default_value = "false")]
        offline: bool,
    },
    /// 配置管理命令
    Config(ConfigArgs),
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// 获取配置值
    Get {
        /// 配置键 (如: server.port, catalog.api_base_url)
        key: String,
    },
    /// 设置配置值
    Set {
        /// 配置键 (如: server.port, catalog.api_base_url)
        key: String,
        /// 配置值
        value: String,
    },
    /// 初始化默认配置
    Init {
        /// 强制覆盖已有配置
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// 显示当前配置
    Show,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// 聊天中输入的一行
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Quit,
    Empty,
    Action(MessageId),
    Suggestion(&'a str),
    Utterance(&'a str),
    Invalid(&'a str),
}

fn parse_chat_input(line: &str) -> ChatInput<'_> {
    let input = line.trim();
    if input.is_empty() {
        return ChatInput::Empty;
    }
    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        return ChatInput::Quit;
    }
    if let Some(rest) = input.strip_prefix("/action") {
        return match rest.trim().parse() {
            Ok(id) => ChatInput::Action(id),
            Err(_) => ChatInput::Invalid(input),
        };
    }
    if let Some(rest) = input.strip_prefix("/suggest") {
        let label = rest.trim();
        return if label.is_empty() {
            ChatInput::Invalid(input)
        } else {
            ChatInput::Suggestion(label)
        };
    }
    ChatInput::Utterance(input)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 展开配置文件路径
    let config_path = match &cli.config {
        Some(path) => giftchoice_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path)),
        None => ConfigManager::default_config_path()?,
    };

    if cli.debug {
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
        eprintln!("{}", format!("[DEBUG] Config path: {:?}", config_path).dimmed());
    }

    match cli.command {
        Commands::Chat { offline } => run_interactive_chat(&config_path, offline, cli.debug).await,
        Commands::Ask {
            text,
            server_url,
            offline,
        } => match server_url {
            Some(url) => ask_server(&url, &text, cli.debug).await,
            None => ask_local(&config_path, &text, offline, cli.debug).await,
        },
        Commands::Config(args) => handle_config(args, &config_path).await,
    }
}

async fn load_config(config_path: &Path) -> anyhow::Result<Config> {
    let manager = ConfigManager::load(config_path).await?;
    Ok(manager.snapshot().await)
}

/// 拉取一次商品目录；失败时提示并以空目录继续
async fn load_catalog(config: &Config, offline: bool, debug: bool) -> CatalogStore {
    let store = CatalogStore::new();
    if offline {
        return store;
    }

    let source = match HttpProductSource::new(
        config.catalog.api_base_url.clone(),
        Duration::from_secs(config.catalog.timeout_seconds),
    ) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", format!("⚠️  Catalog unavailable: {}", e).dimmed());
            return store;
        }
    };

    let start = Instant::now();
    match store.refresh(&source).await {
        Ok(count) => {
            if debug {
                eprintln!(
                    "{}",
                    format!("[DEBUG] Loaded {} products in {:?}", count, start.elapsed()).dimmed()
                );
            }
        }
        Err(e) => {
            eprintln!("{}", format!("⚠️  Catalog unavailable, continuing without products: {}", e).dimmed());
        }
    }
    store
}

fn print_bot_message(message: &BotMessage) {
    println!("{} {}", "Assistant:".green().bold(), format!("#{}", message.id).dimmed());
    print_reply_body(&message.text, message.action.map(|a| a.button_label()), &message.suggestions, Some(message.id));
}

fn print_reply(reply: &BotReply) {
    println!("{}", "Assistant:".green().bold());
    print_reply_body(&reply.text, reply.action.map(|a| a.button_label()), &reply.suggestions, None);
}

fn print_reply_body(
    text: &str,
    button: Option<&str>,
    suggestions: &[giftchoice_core::Suggestion],
    message_id: Option<MessageId>,
) {
    println!("{}", text);
    if let Some(button) = button {
        match message_id {
            Some(id) => println!("  {}", format!("[{}]  /action {}", button, id).yellow()),
            None => println!("  {}", format!("[{}]", button).yellow()),
        }
    }
    if !suggestions.is_empty() {
        let labels: Vec<&str> = suggestions.iter().map(|s| s.label()).collect();
        println!("  {}", labels.join(" | ").blue());
    }
}

fn print_navigation(navigation: &Navigation) {
    match navigation {
        Navigation::Route { path } => println!("{}", format!("➡️  Open {}", path).cyan()),
        Navigation::External { url } => println!("{}", format!("🔗 {}", url).cyan()),
        // 回复已追加到会话，由调用方打印
        Navigation::Reply { .. } => {}
    }
}

async fn ask_local(config_path: &Path, text: &str, offline: bool, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config_path).await?;
    let catalog = load_catalog(&config, offline, debug).await;

    let responder = Responder::new(StoreContact::from(&config.contact));
    print_reply(&responder.respond(text, &catalog.snapshot()));
    Ok(())
}

async fn ask_server(server_url: &str, text: &str, debug: bool) -> anyhow::Result<()> {
    let url = format!("{}/api/classify", server_url.trim_end_matches('/'));
    if debug {
        eprintln!("{}", format!("[DEBUG] POST {}", url).dimmed());
    }

    let client = reqwest::Client::new();
    let start = Instant::now();
    let response = client.post(&url).json(&ClassifyRequest { text }).send().await?;

    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Response: {} in {:?}", response.status(), start.elapsed()).dimmed()
        );
    }

    if response.status().is_success() {
        let reply: BotReply = response.json().await?;
        print_reply(&reply);
    } else {
        println!("{}", format!("❌ Error: {}", response.status()).red());
        let body = response.text().await?;
        if debug {
            eprintln!("{}", format!("[DEBUG] Error body: {}", body).dimmed());
        }
    }
    Ok(())
}

async fn run_interactive_chat(config_path: &Path, offline: bool, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config_path).await?;
    let catalog = load_catalog(&config, offline, debug).await;
    let contact = StoreContact::from(&config.contact);
    let responder = Responder::new(contact.clone());
    let mut session = ChatSession::new();

    println!("{}", "🎁 GiftChoice Assistant".cyan().bold());
    println!("{}", format!("Session ID: {}", session.id).dimmed());
    println!(
        "{}",
        "Type 'exit' to leave, '/action <id>' to press a button, '/suggest <label>' for a suggestion".dimmed()
    );
    println!();

    if let Some(greeting) = session.last_message() {
        print_bot_message(greeting);
    }

    loop {
        println!();
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        match parse_chat_input(&line) {
            ChatInput::Quit => {
                println!("{}", "👋 Goodbye!".cyan());
                break;
            }
            ChatInput::Empty => continue,
            ChatInput::Invalid(input) => {
                println!("{}", format!("❌ Could not understand command: {}", input).red());
            }
            ChatInput::Action(id) => match session.activate_action(id, &contact) {
                Ok(navigation) => {
                    print_navigation(&navigation);
                    if let Navigation::Reply { .. } = navigation {
                        if let Some(message) = session.last_message() {
                            print_bot_message(message);
                        }
                    }
                }
                Err(e) => println!("{}", format!("❌ {}", e).red()),
            },
            ChatInput::Suggestion(label) => match label.parse() {
                Ok(suggestion) => {
                    print_navigation(&giftchoice_responder::dispatch_suggestion(suggestion, &contact));
                }
                Err(e) => println!("{}", format!("❌ {}", e).red()),
            },
            ChatInput::Utterance(text) => {
                if let Some(exchange) = session.submit(&responder, text, &catalog.snapshot()) {
                    print_bot_message(&exchange.reply);
                }
            }
        }
    }

    Ok(())
}

async fn handle_config(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Get { key } => {
            let config = load_config(config_path).await?;

            match config.get_value(&key) {
                Some(value) => {
                    println!("{}", format!("{} = {}", key, value).green());
                }
                None => {
                    println!("{}", format!("❌ Key not found: {}", key).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(config_path).await?;

            if let Err(e) = manager.update(|config| config.set_value(&key, &value)).await {
                eprintln!("{}", format!("❌ Failed to set value: {}", e).red());
                std::process::exit(1);
            }
            println!("{}", format!("✅ Set {} = {}", key, value).green());
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!("{}", format!("⚠️  Config already exists at {:?}", config_path).yellow());
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }

            let manager = ConfigManager::new(Config::default(), config_path.to_path_buf());
            manager.save().await?;

            println!("{}", format!("✅ Config initialized at {:?}", config_path).green());
            println!("{}", "You can edit this file to customize your settings".dimmed());
        }
        ConfigCommands::Show => {
            let config = load_config(config_path).await?;

            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
