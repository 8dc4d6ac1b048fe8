use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use compressor_tracker::config::{
    config_dir, load_config, Config, Overrides, CONFIG_FILE, CONFIG_TEMPLATE,
};
use compressor_tracker::error::{Result, TrackerError};
use compressor_tracker::fetch::{load_clients, ClientFetcher, ClientSource, LoadedClients};
use compressor_tracker::view::{
    client_table, directions_url, filter_clients, marker_table, MapView,
};
use compressor_tracker::{normalize_clients_payload, ClientRecord};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(version, about = "Compressor activity tracker: client accounts as a list or map markers", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Client API endpoint, a path on the configured base URL or a full URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// API key for the map provider
    #[arg(long, global = true, env = "TRACKER_MAPS_API_KEY", hide_env_values = true)]
    maps_api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config directory with a template config.toml
    Init,

    /// Show client accounts as a table
    List {
        /// Filter by name, compressor model, or billing address
        #[arg(short, long)]
        search: Option<String>,

        /// Print normalized records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show map center, zoom and the clients that can be placed on the map
    Map {
        /// Client id to show details and directions for
        #[arg(short, long)]
        select: Option<String>,
    },

    /// Print a driving directions link for a client
    Directions {
        /// Client id
        client: String,
    },

    /// Normalize a raw API payload from a file (or stdin) and print it as JSON
    Normalize {
        /// Payload file (default: read stdin)
        file: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let overrides = Overrides {
        endpoint: cli.endpoint,
        timeout_ms: cli.timeout_ms,
        maps_api_key: cli.maps_api_key,
    };
    let config = || -> Result<Config> {
        let mut config = load_config(&cfg_dir)?;
        config.apply(overrides);
        Ok(config)
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::List { search, json } => cmd_list(&config()?, search.as_deref(), json),
        Commands::Map { select } => cmd_map(&config()?, select.as_deref()),
        Commands::Directions { client } => cmd_directions(&config()?, &client),
        Commands::Normalize { file } => cmd_normalize(file.as_deref()),
        Commands::Config => cmd_config(&cfg_dir, &config()?),
    }
}

/// Initialize config directory with the template config.toml
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(TrackerError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;

    println!("Initialized tracker config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your client API:  $EDITOR {}/{}",
        cfg_dir.display(),
        CONFIG_FILE
    );
    println!("  2. List accounts:                tracker list");

    Ok(())
}

/// Fetch clients, telling the user when the built-in data is shown instead
fn fetch_clients(config: &Config) -> LoadedClients {
    let loaded = load_clients(&ClientFetcher::from_settings(&config.api));
    if let ClientSource::Fallback { reason } = &loaded.source {
        eprintln!("Could not load live client data ({reason}).");
        eprintln!("Showing built-in sample accounts instead.");
    }
    loaded
}

/// Later records win when ids repeat
fn find_client<'a>(clients: &'a [ClientRecord], id: &str) -> Result<&'a ClientRecord> {
    clients
        .iter()
        .rfind(|c| c.id == id)
        .ok_or_else(|| TrackerError::ClientNotFound(id.to_string()))
}

/// List clients as a table
fn cmd_list(config: &Config, search: Option<&str>, json: bool) -> Result<()> {
    let loaded = fetch_clients(config);
    let query = search.unwrap_or_default();
    let filtered = filter_clients(&loaded.clients, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    if filtered.is_empty() {
        if query.is_empty() {
            println!("No client accounts.");
        } else {
            println!("No client accounts match '{query}'.");
        }
        return Ok(());
    }

    println!("{}", client_table(&filtered));
    println!("{} account(s)", filtered.len());

    Ok(())
}

/// Show map data and, optionally, one selected client
fn cmd_map(config: &Config, select: Option<&str>) -> Result<()> {
    let loaded = fetch_clients(config);
    let view = MapView::new(&loaded.clients, config.map.zoom);

    if config.map.api_key.is_none() {
        println!("No map API key configured. Set TRACKER_MAPS_API_KEY or map.api_key to enable the map widget.");
        println!();
    }

    println!(
        "Center: {:.4}, {:.4}  (zoom {})",
        view.center.lat, view.center.lng, view.zoom
    );

    if view.markers.is_empty() {
        println!("No clients have a valid location.");
    } else {
        println!("{}", marker_table(&view.markers));
        println!("{} marker(s)", view.markers.len());
    }

    if let Some(id) = select {
        let client = find_client(&loaded.clients, id)?;
        let url =
            directions_url(client).ok_or_else(|| TrackerError::NotMappable(id.to_string()))?;

        println!();
        println!("{}", client.name);
        println!("{}", client.compressor_model);
        println!("Phone: {}", client.phone.as_deref().unwrap_or("—"));
        println!("Email: {}", client.email.as_deref().unwrap_or("—"));
        println!("Directions: {url}");
    }

    Ok(())
}

/// Print the directions link for a client
fn cmd_directions(config: &Config, id: &str) -> Result<()> {
    let loaded = fetch_clients(config);
    let client = find_client(&loaded.clients, id)?;
    let url = directions_url(client).ok_or_else(|| TrackerError::NotMappable(id.to_string()))?;
    println!("{url}");
    Ok(())
}

/// Normalize a payload without going through the network
fn cmd_normalize(file: Option<&Path>) -> Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let payload: serde_json::Value =
        serde_json::from_str(&content).map_err(TrackerError::InvalidJson)?;
    let clients = normalize_clients_payload(&payload)?;
    println!("{}", serde_json::to_string_pretty(&clients)?);

    Ok(())
}

/// Show effective configuration
fn cmd_config(cfg_dir: &Path, config: &Config) -> Result<()> {
    let config_path = cfg_dir.join(CONFIG_FILE);

    println!("Tracker Configuration");
    println!("{}", "-".repeat(50));
    if config_path.exists() {
        println!("Config file:      {}", config_path.display());
    } else {
        println!(
            "Config file:      {} (not found, using defaults)",
            config_path.display()
        );
    }
    println!("Client endpoint:  {}", config.api.url());
    println!("Timeout:          {} ms", config.api.timeout_ms);
    println!("Map zoom:         {}", config.map.zoom);
    println!(
        "Map API key:      {}",
        if config.map.api_key.is_some() { "set" } else { "not set" }
    );

    Ok(())
}
