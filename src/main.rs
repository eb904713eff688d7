use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kube::ResourceExt;
use nango_operator::controller::{self, conditions, OperatorConfig};
use nango_operator::crd::NangoIntegration;
use nango_operator::nango::DEFAULT_BASE_URL;
use nango_operator::Error;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the operator
    Run(RunArgs),
    /// Show version information
    Version,
    /// List managed integrations and their status
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Namespace to watch (all namespaces when unset)
    #[arg(long, env = "WATCH_NAMESPACE")]
    namespace: Option<String>,

    /// Nango API base URL for integrations that do not set nango_base_url
    #[arg(long, env = "NANGO_DEFAULT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    default_base_url: String,

    /// Address for the health and metrics endpoints
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: SocketAddr,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Namespace to list (all namespaces when unset)
    #[arg(long, env = "WATCH_NAMESPACE")]
    namespace: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("Nango Operator v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Info(info_args) => run_info(info_args).await,
        Commands::Run(run_args) => run_operator(run_args).await,
    }
}

async fn run_info(args: InfoArgs) -> Result<(), Error> {
    let client = kube::Client::try_default()
        .await
        .map_err(Error::KubeError)?;

    let api: kube::Api<NangoIntegration> = match &args.namespace {
        Some(ns) => kube::Api::namespaced(client, ns),
        None => kube::Api::all(client),
    };
    let integrations = api
        .list(&Default::default())
        .await
        .map_err(Error::KubeError)?;

    println!("Managed Nango integrations: {}", integrations.items.len());
    for integration in &integrations.items {
        let (phase, ready) = integration
            .status
            .as_ref()
            .map(|s| {
                (
                    s.status.map(|p| p.as_str()).unwrap_or("Pending"),
                    conditions::condition_status(&s.conditions, conditions::CONDITION_TYPE_READY),
                )
            })
            .unwrap_or(("Pending", conditions::CONDITION_STATUS_UNKNOWN));

        println!(
            "  {}/{}  unique_key={}  provider={}  status={}  ready={}",
            integration.namespace().unwrap_or_default(),
            integration.name_any(),
            integration.spec.unique_key,
            integration.spec.provider,
            phase,
            ready
        );
    }
    Ok(())
}

async fn run_operator(args: RunArgs) -> Result<(), Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let (json_layer, text_layer) = if args.log_json {
        (Some(fmt::layer().json().with_target(true)), None)
    } else {
        (None, Some(fmt::layer().with_target(true)))
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer);

    // Only enable OTEL if an endpoint is provided
    match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(endpoint) => {
            let otel_layer = nango_operator::telemetry::init_telemetry(&registry, &endpoint)?;
            registry.with(otel_layer).init();
            info!("OpenTelemetry tracing initialized");
        }
        Err(_) => {
            registry.init();
            info!("OpenTelemetry tracing disabled (OTEL_EXPORTER_OTLP_ENDPOINT not set)");
        }
    }

    info!("Starting Nango Operator v{}", env!("CARGO_PKG_VERSION"));

    let client = kube::Client::try_default()
        .await
        .map_err(Error::KubeError)?;

    info!("Connected to Kubernetes cluster");

    let config = OperatorConfig {
        watch_namespace: args.namespace,
        default_base_url: args.default_base_url,
    };
    info!(
        namespace = config.watch_namespace.as_deref().unwrap_or("<all>"),
        default_base_url = %config.default_base_url,
        "Operator configuration loaded"
    );

    let state = Arc::new(controller::ControllerState::new(client, config));

    #[cfg(feature = "rest-api")]
    {
        let addr = args.http_addr;
        tokio::spawn(async move {
            if let Err(e) = nango_operator::rest_api::run_server(addr).await {
                tracing::error!("HTTP server error: {:?}", e);
            }
        });
    }

    let result = controller::run_controller(state).await;

    // Flush any remaining traces
    nango_operator::telemetry::shutdown_telemetry();

    result
}
