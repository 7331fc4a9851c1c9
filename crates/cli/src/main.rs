//! `wigle` CLI entry-point.
//!
//! Available sub-commands:
//! - `describe`         — print the node or credential schema as JSON.
//! - `test-credentials` — check an API key against the WiGLE profile endpoint.
//! - `search`           — run the node over input items and print the output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{ExecutorConfig, NodeDefinition, NodeExecutor};
use nodes::{CredentialTester, DecryptedCredential, ExecutionContext, Item};
use wigle::{ClientConfig, WigleNode, API_KEY_FIELD, CREDENTIAL_TYPE, DEFAULT_BASE_URL, NODE_TYPE};

#[derive(Parser)]
#[command(name = "wigle", about = "Search the WiGLE wireless-network database", version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// WiGLE "encoded for use" API token.
    #[arg(long, env = "WIGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API root URL.
    #[arg(long, env = "WIGLE_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "WIGLE_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    fn credential(&self) -> Result<DecryptedCredential> {
        let Some(key) = &self.api_key else {
            bail!("an API key is required (--api-key or WIGLE_API_KEY)");
        };
        Ok(DecryptedCredential::new(CREDENTIAL_TYPE).with_field(API_KEY_FIELD, key.clone()))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the node's parameter schema.
    Describe {
        /// Print the credential schema instead.
        #[arg(long)]
        credentials: bool,
    },
    /// Verify the API key.
    TestCredentials,
    /// Search networks, once per input item.
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// SSID pattern; `%` and `_` are wildcards.
    #[arg(long, default_value = "")]
    ssid: String,
    /// BSSID (MAC) of the access point.
    #[arg(long, default_value = "")]
    bssid: String,

    /// Centre latitude; enables the geo filter together with --lon.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Radius around the centre, in km.
    #[arg(long, default_value_t = 0.1)]
    radius: f64,

    #[arg(long)]
    road: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    results_per_page: Option<u32>,
    /// Output field that receives the results.
    #[arg(long)]
    results_field: Option<String>,

    /// JSON file with an array of input items (objects); default is one empty item.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Emit an error item for failed searches instead of stopping.
    #[arg(long)]
    continue_on_fail: bool,
}

impl SearchArgs {
    /// Node parameters, using the wire names the node declares.
    fn parameters(&self) -> Value {
        let mut params = Map::new();
        params.insert("operation".into(), json!("search_network"));
        params.insert("query_ssid".into(), json!(self.ssid));
        params.insert("query_bssid".into(), json!(self.bssid));

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            params.insert("filter_geo".into(), json!(true));
            params.insert("query_lat".into(), json!(lat));
            params.insert("query_lon".into(), json!(lon));
            params.insert("query_radius".into(), json!(self.radius));
        }

        let location = [
            ("query_road", &self.road),
            ("query_city", &self.city),
            ("query_region", &self.region),
            ("query_postalcode", &self.postal_code),
            ("query_country", &self.country),
        ];
        if location.iter().any(|(_, v)| v.is_some()) {
            params.insert("filter_location".into(), json!(true));
            for (name, value) in location {
                if let Some(value) = value {
                    params.insert(name.into(), json!(value));
                }
            }
        }

        let mut options = Map::new();
        if let Some(n) = self.results_per_page {
            options.insert("results_per_page".into(), json!(n));
        }
        if let Some(field) = &self.results_field {
            options.insert("results_field".into(), json!(field));
        }
        params.insert("options".into(), Value::Object(options));

        Value::Object(params)
    }

    fn items(&self) -> Result<Vec<Item>> {
        let Some(path) = &self.input else {
            return Ok(vec![Item::default()]);
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read input file {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;

        match value {
            Value::Array(values) => Ok(values.into_iter().map(Item::from_value).collect()),
            other => Ok(vec![Item::from_value(other)]),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let node = Arc::new(WigleNode::with_config(cli.connection.client_config()));

    match cli.command {
        Command::Describe { credentials } => {
            let schema = if credentials {
                serde_json::to_string_pretty(&wigle::credential_description())?
            } else {
                serde_json::to_string_pretty(&wigle::node_description())?
            };
            println!("{schema}");
        }
        Command::TestCredentials => {
            let credential = cli.connection.credential()?;
            info!("Testing credentials against {}", cli.connection.api_url);

            let result = node.test_credential(&credential).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_ok() {
                std::process::exit(1);
            }
        }
        Command::Search(args) => {
            let ctx = ExecutionContext::new().with_credential(cli.connection.credential()?);
            let items = args.items()?;

            let mut executor = NodeExecutor::new(
                Default::default(),
                ExecutorConfig {
                    continue_on_fail: args.continue_on_fail,
                },
            );
            executor.register(node);

            let definition = NodeDefinition::new("wigle", NODE_TYPE, args.parameters());
            let result = executor
                .run(&definition, items, &ctx)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            info!(
                "Execution {} finished with {} items",
                result.execution_id,
                result.items.len()
            );
            println!("{}", serde_json::to_string_pretty(&result.items)?);
        }
    }

    Ok(())
}
