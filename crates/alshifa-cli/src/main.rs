//! Al-Shifa CLI - clinic agents from the terminal and over HTTP

mod server;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alshifa_core::Error;
use alshifa_core::agents::ClinicAgents;
use alshifa_core::api::{self, HealthReport, StockStatus};
use alshifa_core::config::Config;
use alshifa_core::domain::knowledge::KnowledgeGraphStore;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "alshifa")]
#[command(author, version, about = "Al-Shifa dental clinic agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Knowledge graph snapshot to load instead of the configured one
    #[arg(long, global = true)]
    graph: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask an agent a question
    Ask {
        /// Agent endpoint (appointment, case, inventory, finance, specialist)
        agent: String,
        /// Natural-language query
        query: String,
        /// Patient id for history lookups and case tracking
        #[arg(long)]
        patient_id: Option<String>,
        /// Inventory item id used when the query names no item
        #[arg(long)]
        item_id: Option<String>,
        /// Caller role for finance questions
        #[arg(long)]
        role: Option<String>,
        /// Session id (generated when omitted)
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Show the inventory dashboard
    Inventory {
        /// Caller role (defaults to agents.finance_role)
        #[arg(long)]
        role: Option<String>,
    },

    /// Show the finance dashboard
    Finance {
        /// Caller role (defaults to agents.finance_role)
        #[arg(long)]
        role: Option<String>,
    },

    /// Inspect the knowledge graph
    Graph {
        #[command(subcommand)]
        action: GraphAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,

    /// Start the HTTP API
    Serve {
        /// Address to bind, overriding server.bind_addr
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
enum GraphAction {
    /// Print the whole graph as JSON
    Dump,
    /// Show node counts per graph
    Stats,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Print the effective configuration as TOML
    Show,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alshifa=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.downcast_ref::<Error>().and_then(Error::suggestion) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Ask {
            agent,
            query,
            patient_id,
            item_id,
            role,
            session_id,
        } => {
            let agents = build_agents(cli.graph.as_deref())?;
            let body = ask_body(query, patient_id, item_id, role, session_id);
            cmd_ask(&agents, &agent, body, cli.format)
        }

        Commands::Inventory { role } => {
            let agents = build_agents(cli.graph.as_deref())?;
            let role = role.as_deref().unwrap_or(agents.finance_role());
            cmd_inventory(&agents, role, cli.format, cli.quiet)
        }

        Commands::Finance { role } => {
            let agents = build_agents(cli.graph.as_deref())?;
            let role = role.as_deref().unwrap_or(agents.finance_role());
            cmd_finance(&agents, role, cli.format, cli.quiet)
        }

        Commands::Graph { action } => cmd_graph(action, cli.graph.as_deref(), cli.format),

        Commands::Config { action } => cmd_config(action, cli.quiet),

        Commands::Doctor => cmd_doctor(cli.graph.as_deref(), cli.format, cli.quiet),

        Commands::Serve { bind } => {
            let mut config = Config::load()?;
            if let Some(bind) = bind {
                config.set("server.bind_addr", &bind)?;
            }
            let agents = Arc::new(agents_from(load_store(cli.graph.as_deref(), &config)?, &config));
            server::serve(agents, &config.server).await
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

/// Load the graph from the CLI flag, then the config, then the built-in fixture
fn load_store(graph: Option<&Path>, config: &Config) -> anyhow::Result<KnowledgeGraphStore> {
    match graph.or(config.graph.fixture_path.as_deref()) {
        Some(path) => Ok(KnowledgeGraphStore::load(path)?),
        None => {
            debug!("Using built-in clinic fixture");
            Ok(KnowledgeGraphStore::clinic_fixture())
        }
    }
}

fn agents_from(store: KnowledgeGraphStore, config: &Config) -> ClinicAgents {
    ClinicAgents::new(Arc::new(store), &config.agents)
}

fn build_agents(graph: Option<&Path>) -> anyhow::Result<ClinicAgents> {
    let config = Config::load()?;
    Ok(agents_from(load_store(graph, &config)?, &config))
}

/// JSON request body shared by every agent; agents ignore fields they don't use
fn ask_body(
    query: String,
    patient_id: Option<String>,
    item_id: Option<String>,
    role: Option<String>,
    session_id: Option<String>,
) -> Value {
    let mut body = Map::new();
    body.insert("user_query".to_string(), Value::String(query));
    body.insert(
        "session_id".to_string(),
        Value::String(session_id.unwrap_or_else(|| Uuid::new_v4().to_string())),
    );
    for (key, value) in [("patient_id", patient_id), ("item_id", item_id), ("role", role)] {
        if let Some(value) = value {
            body.insert(key.to_string(), Value::String(value));
        }
    }
    Value::Object(body)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Command Implementations
// ============================================================================

fn cmd_ask(
    agents: &ClinicAgents,
    agent: &str,
    body: Value,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let response = api::dispatch(agents, agent, body)?;
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Text => {
            let text = response
                .get("response_text")
                .or_else(|| response.get("analysis"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            println!("{}", text);
        }
    }
    Ok(())
}

fn cmd_inventory(
    agents: &ClinicAgents,
    role: &str,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let rows = api::inventory_overview(agents, role)?;
    if format == OutputFormat::Json {
        return print_json(&rows);
    }

    if !quiet {
        println!("Inventory:");
    }
    for row in rows {
        let marker = match row.status {
            StockStatus::Good => "",
            StockStatus::Low => " [low]",
            StockStatus::Critical => " [critical]",
        };
        println!(
            "  {} - {}: {} units (reorder at {}, {}){}",
            row.id, row.name, row.stock, row.reorder_level, row.supplier, marker
        );
    }
    Ok(())
}

fn cmd_finance(
    agents: &ClinicAgents,
    role: &str,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let summary = api::finance_summary(agents, role)?;
    if format == OutputFormat::Json {
        return print_json(&summary);
    }

    println!("Revenue collected: Rs. {}", summary.total_revenue);
    println!("Outstanding:       Rs. {}", summary.total_pending);
    if !quiet {
        println!("\nInvoices:");
        for inv in &summary.invoices {
            println!(
                "  {} {} - {}: Rs. {} ({}, {})",
                inv.date, inv.id, inv.patient_name, inv.amount, inv.procedure, inv.status
            );
        }
    }
    Ok(())
}

fn cmd_graph(action: GraphAction, graph: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = load_store(graph, &config)?;
    match action {
        GraphAction::Dump => println!("{}", store.to_json_pretty()?),
        GraphAction::Stats => {
            let stats = store.stats();
            if format == OutputFormat::Json {
                return print_json(&stats);
            }
            println!("Patients:        {}", stats.patients);
            println!("Case patients:   {}", stats.case_patients);
            println!("Inventory items: {}", stats.inventory_items);
            println!("Invoices:        {}", stats.invoices);
            println!("Lab orders:      {}", stats.lab_orders);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn cmd_doctor(graph: Option<&Path>, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("[!!] Configuration: Error - {}", e);
            return Err(e);
        }
    };

    let agents = agents_from(load_store(graph, &config)?, &config);
    let report = HealthReport::collect(&agents);
    info!(healthy = report.is_healthy(), "Health check complete");

    if format == OutputFormat::Json {
        return print_json(&json!({
            "healthy": report.is_healthy(),
            "report": report,
        }));
    }

    if !quiet {
        println!("Al-Shifa Health Check");
        println!("=====================");
        println!();
        println!("[OK] Configuration: Valid");
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }
        println!(
            "[OK] Knowledge graph: {} patients, {} cases, {} items, {} invoices",
            report.graph.patients,
            report.graph.case_patients,
            report.graph.inventory_items,
            report.graph.invoices
        );
        if report.stock_drift == 0 {
            println!("[OK] Inventory: stock matches batch quantities");
        } else {
            println!(
                "[!!] Inventory: {} item(s) with stock/batch drift",
                report.stock_drift
            );
        }
        println!("[OK] Agents: {}", report.agents.join(", "));
        println!();
        if report.is_healthy() {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod main_tests;
