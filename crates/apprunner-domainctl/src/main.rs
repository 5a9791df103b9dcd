// # apprunner-domainctl
//
// Thin command line layer over `apprunner-domain-core`. All lifecycle logic
// (identifier codec, lookup, polling) lives in the library; this binary:
//
// 1. Reads configuration from flags and environment variables
// 2. Initializes logging and the runtime
// 3. Runs one lifecycle operation and prints the resulting state
//
// ## Configuration
//
// - `AWS_REGION` / `--region`: Region of the App Runner service
// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`: Credentials
// - `APPRUNNER_ENDPOINT` / `--endpoint`: Endpoint override
// - `APPRUNNER_LOG_LEVEL` / `--log-level`: trace, debug, info, warn, error
// - `APPRUNNER_CREATE_TIMEOUT_SECS`, `APPRUNNER_DELETE_TIMEOUT_SECS`: Poller deadlines
//
// ## Example
//
// ```bash
// export AWS_REGION=us-east-1
// export AWS_ACCESS_KEY_ID=...
// export AWS_SECRET_ACCESS_KEY=...
//
// apprunner-domainctl create example.com arn:aws:apprunner:us-east-1:123456789012:service/web/abc
// apprunner-domainctl read 'example.com,arn:aws:apprunner:us-east-1:123456789012:service/web/abc'
// ```
//
// The resulting attribute object is printed to stdout as JSON, or `null`
// when the association doesn't exist (anymore).

use anyhow::Result;
use apprunner_domain_aws::AppRunnerClient;
use apprunner_domain_core::{
    CredentialsConfig, CustomDomainAssociationResource, ProviderConfig, ResourceData, WaiterConfig,
};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    /// The operation succeeded
    Success = 0,
    /// Invalid flags, environment or planned attributes
    ConfigError = 1,
    /// The operation failed
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "apprunner-domainctl")]
#[command(about = "Manage App Runner custom domain associations", long_about = None)]
struct Cli {
    /// AWS region of the App Runner service
    #[arg(long, env = "AWS_REGION")]
    region: String,

    /// Endpoint override (defaults to the regional App Runner endpoint)
    #[arg(long, env = "APPRUNNER_ENDPOINT")]
    endpoint: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "APPRUNNER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: String,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// AWS session token (temporary credentials)
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    /// How long create waits for certificate validation to start
    #[arg(long, env = "APPRUNNER_CREATE_TIMEOUT_SECS", default_value = "300")]
    create_timeout_secs: u64,

    /// How long delete waits for the association to disappear
    #[arg(long, env = "APPRUNNER_DELETE_TIMEOUT_SECS", default_value = "300")]
    delete_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Associate a custom domain with a service and wait for it to settle
    Create {
        /// Custom domain name
        domain_name: String,

        /// ARN of the App Runner service
        service_arn: String,

        /// Don't associate the www. subdomain
        #[arg(long)]
        no_www_subdomain: bool,
    },

    /// Show the current state of an association
    Read {
        /// Association ID (domain_name,service_arn)
        id: String,
    },

    /// Disassociate a custom domain and wait until it is gone
    Delete {
        /// Association ID (domain_name,service_arn)
        id: String,
    },

    /// Import an existing association by ID
    Import {
        /// Association ID (domain_name,service_arn)
        id: String,
    },
}

impl Cli {
    /// Build the library configuration from flags and environment
    fn provider_config(&self) -> ProviderConfig {
        let mut credentials =
            CredentialsConfig::new(self.access_key_id.clone(), self.secret_access_key.clone());
        if let Some(ref token) = self.session_token
            && !token.is_empty()
        {
            credentials = credentials.with_session_token(token.clone());
        }

        let waiter = WaiterConfig {
            create_timeout_secs: self.create_timeout_secs,
            delete_timeout_secs: self.delete_timeout_secs,
            ..WaiterConfig::default()
        };

        let config = ProviderConfig::new(self.region.clone(), credentials).with_waiter(waiter);

        match self.endpoint {
            Some(ref endpoint) if !endpoint.is_empty() => config.with_endpoint(endpoint.clone()),
            _ => config,
        }
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "APPRUNNER_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                CtlExitCode::ConfigError.into()
            } else {
                CtlExitCode::Success.into()
            };
        }
    };

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr; stdout carries the resulting state
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let config = cli.provider_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    if let Commands::Create {
        ref domain_name,
        ref service_arn,
        ..
    } = cli.command
        && let Err(e) = ResourceData::new(domain_name.clone(), service_arn.clone()).validate_plan()
    {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(cli.command, config).await {
            Ok(attributes) => {
                println!("{}", attributes);
                CtlExitCode::Success
            }
            Err(e) => {
                error!("{}", e);
                CtlExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run one lifecycle operation until it finishes or Ctrl-C is pressed
async fn run(command: Commands, config: ProviderConfig) -> Result<Value> {
    let client = AppRunnerClient::from_config(&config)?;
    info!("Using App Runner endpoint {}", client.endpoint());

    let (resource, mut events) =
        CustomDomainAssociationResource::new(Box::new(client), config.waiter.clone())?;

    let event_logger = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!("Lifecycle event: {:?}", event);
        }
    });

    let operation = execute(&resource, command);

    let result = tokio::select! {
        result = operation => result,
        _ = tokio::signal::ctrl_c() => {
            Err(anyhow::anyhow!("Interrupted; the remote operation may still be in progress"))
        }
    };

    // Closes the event channel
    drop(resource);
    let _ = event_logger.await;

    result
}

async fn execute(resource: &CustomDomainAssociationResource, command: Commands) -> Result<Value> {
    let data = match command {
        Commands::Create {
            domain_name,
            service_arn,
            no_www_subdomain,
        } => {
            let mut data =
                ResourceData::new(domain_name, service_arn).with_enable_www_subdomain(!no_www_subdomain);
            resource.create(&mut data).await?;
            Some(data)
        }
        Commands::Read { id } => {
            let mut data = ResourceData::from_id(id);
            resource.read(&mut data).await?;
            Some(data)
        }
        Commands::Delete { id } => {
            resource.delete(&ResourceData::from_id(id)).await?;
            None
        }
        Commands::Import { id } => Some(resource.import(&id).await?),
    };

    // A read that found nothing leaves no identifier
    Ok(match data {
        Some(data) if data.id().is_some() => data.to_attributes(),
        _ => Value::Null,
    })
}
