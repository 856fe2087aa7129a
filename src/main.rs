use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use research_graph::config::{
    find_config_file, load_settings, write_default_config, LoggingSettings, Settings, Transport,
};
use research_graph::graphs::{ArticleSearchGraph, ChatbotGraph, QueryExtractor, DEFAULT_USER_QUERY};
use research_graph::llm::{build_chat_model, ChatMessage};
use research_graph::mcp::{JsonPlaceholderClient, McpServer, ToolRegistry};
use research_graph::sources::{ArxivSource, Source};
use research_graph::tools::{SearchPapersInput, SearchPapersTool};
use research_graph::utils::HttpClient;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Research Graph - LLM workflows for finding papers on arXiv
#[derive(Parser, Debug)]
#[command(name = "research-graph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LLM workflows for finding papers on arXiv, with MCP tool servers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Which MCP tool server to run
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum McpServerKind {
    /// JSONPlaceholder users (get_all_users, get_user_by_id)
    Users,
    /// arXiv paper search (search_papers)
    Papers,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the article search workflow on a free-text request
    #[command(alias = "s")]
    Search {
        /// What you are looking for, in any language
        query: Option<String>,

        /// Maximum number of papers
        #[arg(long, short)]
        max_results: Option<usize>,
    },

    /// Search arXiv directly, without query extraction
    Papers {
        /// arXiv keywords
        query: String,

        /// Maximum number of papers
        #[arg(long, short, default_value_t = 3)]
        max_results: usize,

        /// Search the last year instead of the last 180 days
        #[arg(long)]
        all_time: bool,

        /// Start of the submission window (RFC 3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// End of the submission window (RFC 3339)
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },

    /// Send one message to the chatbot workflow
    Chat {
        /// Message text
        message: String,

        /// Answer with the fixed greeting instead of calling a model
        #[arg(long)]
        fixed: bool,
    },

    /// Start an MCP tool server
    Mcp {
        /// Tool server to run
        #[arg(long, value_enum, default_value_t = McpServerKind::Users)]
        server: McpServerKind,

        /// Transport (defaults to the configured one)
        #[arg(long, value_enum)]
        transport: Option<Transport>,

        /// Host address for HTTP transports
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP transports
        #[arg(long)]
        port: Option<u16>,
    },

    /// Serve the web endpoint
    Web {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(default_value = research_graph::config::CONFIG_FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the effective configuration (credentials omitted)
    Show,
}

fn init_tracing(cli: &Cli, logging: &LoggingSettings) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("research_graph={}", level)));

    // stdout carries MCP stdio traffic and command output
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.as_deref() == Some("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn arxiv_source(settings: &Settings, client: &HttpClient) -> Arc<dyn Source> {
    Arc::new(ArxivSource::new(client.clone(), &settings.search))
}

fn print_output<T: Serialize>(format: OutputFormat, value: &T, plain: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Plain => plain(value),
    }
    Ok(())
}

fn print_documents(documents: &[research_graph::Document]) {
    for (i, doc) in documents.iter().enumerate() {
        let meta = &doc.metadata;
        println!("{}. {} [{}]", i + 1, meta.title, meta.entry_id);
        if let Some(published) = meta.published {
            println!("   Published: {}", published.format("%Y-%m-%d"));
        }
        if !meta.authors.is_empty() {
            println!("   Authors: {}", meta.authors.join(", "));
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut settings = load_settings(config_path.as_deref())?;

    init_tracing(&cli, &settings.logging);
    if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "Using config file");
    }

    let client = HttpClient::new(&settings.http).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Search { query, max_results } => {
            let model = build_chat_model(&settings.llm, client.clone())?;
            let search = SearchPapersTool::from_settings(arxiv_source(&settings, &client), &settings.search);
            let graph = ArticleSearchGraph::new(QueryExtractor::new(model), search)
                .max_results(max_results.unwrap_or(settings.search.max_results));

            let query = query.unwrap_or_else(|| DEFAULT_USER_QUERY.to_string());
            let state = graph.invoke(&query).await?;

            print_output(cli.output, &state, |state| {
                if let Some(q) = state.search_query() {
                    println!("Keywords: {} (latest: {})\n", q.keywords, q.latest);
                }
                print_documents(state.papers());
            })?;
        }

        Commands::Papers {
            query,
            max_results,
            all_time,
            start,
            end,
        } => {
            let search = SearchPapersTool::from_settings(arxiv_source(&settings, &client), &settings.search);
            let input = SearchPapersInput::new(query)
                .max_results(max_results)
                .is_latest(!all_time)
                .window(start, end);

            let documents = search.invoke_concurrent(&input).await?;
            print_output(cli.output, &documents, |docs| print_documents(docs))?;
        }

        Commands::Chat { message, fixed } => {
            let graph = if fixed {
                ChatbotGraph::fixed()
            } else {
                ChatbotGraph::with_model(build_chat_model(&settings.llm, client.clone())?)
            };

            let messages = graph.invoke(vec![ChatMessage::user(message)]).await?;
            let reply = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            print_output(cli.output, &messages, |_| println!("{}", reply))?;
        }

        Commands::Mcp {
            server,
            transport,
            host,
            port,
        } => {
            if let Some(transport) = transport {
                settings.mcp.transport = transport;
            }
            if let Some(host) = host {
                settings.mcp.host = host;
            }
            if let Some(port) = port {
                settings.mcp.port = port;
            }

            let tools = match server {
                McpServerKind::Users => ToolRegistry::jsonplaceholder(JsonPlaceholderClient::new(
                    client.clone(),
                    settings.mcp.base_url.clone(),
                )),
                McpServerKind::Papers => ToolRegistry::papers(SearchPapersTool::from_settings(
                    arxiv_source(&settings, &client),
                    &settings.search,
                )),
            };

            McpServer::new(tools, settings.mcp.clone())
                .map_err(|e| anyhow::anyhow!("Failed to build MCP server: {}", e))?
                .serve()
                .await
                .map_err(|e| anyhow::anyhow!("MCP server error: {}", e))?;
        }

        Commands::Web { host, port } => {
            if let Some(host) = host {
                settings.web.host = host;
            }
            if let Some(port) = port {
                settings.web.port = port;
            }
            research_graph::web::serve(&settings.web)
                .await
                .context("Web server error")?;
        }

        Commands::Config { action } => match action {
            ConfigCommands::Init { path, force } => {
                write_default_config(&path, force)?;
                if !cli.quiet {
                    println!("Wrote default configuration to {}", path.display());
                }
            }
            ConfigCommands::Show => {
                settings.llm.openai_api_key = None;
                println!("{}", toml::to_string_pretty(&settings)?);
            }
        },
    }

    Ok(())
}
