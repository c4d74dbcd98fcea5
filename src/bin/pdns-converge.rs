use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdns_converge::{
    ApiConfig, Mode, Outcome, PowerDnsClient, RrsetReconciler, ZoneReconciler,
    config::{DEFAULT_API_URL, DEFAULT_SERVER_ID, DEFAULT_TIMEOUT_SECS},
    model::{DEFAULT_TTL, DesiredState, RrType, RrsetSpec, ZoneKind, ZoneSpec},
};
use serde_json::json;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// PowerDNS API URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    /// PowerDNS API key
    #[arg(long, value_name = "KEY", env = "PDNS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,
    /// PowerDNS server ID
    #[arg(long, value_name = "ID", default_value = DEFAULT_SERVER_ID, global = true)]
    server_id: String,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,
    /// Report what would change without changing anything
    #[arg(long, global = true)]
    check: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure a zone exists with the given attributes, or is absent
    Zone(ZoneArgs),
    /// Ensure an RRset in an existing zone matches, or is absent
    Rrset(RrsetArgs),
}

#[derive(Args, Debug)]
#[command(rename_all = "kebab-case")]
struct ZoneArgs {
    /// Zone name (e.g. example.com.)
    #[arg(long, value_name = "FQDN")]
    name: String,
    /// Native, Master or Slave
    #[arg(long, value_name = "KIND", default_value = "Master")]
    kind: ZoneKind,
    /// Master IP address for Slave zones (repeat for multiple values)
    #[arg(long = "master", value_name = "IP")]
    masters: Vec<String>,
    /// Whether the zone is DNSSEC signed
    #[arg(long, value_name = "BOOL", default_value_t = false, action = clap::ArgAction::Set)]
    dnssec: bool,
    /// Whether the zone is rectified on API changes
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    api_rectify: bool,
    /// present or absent
    #[arg(long, value_name = "STATE", default_value = "present")]
    state: DesiredState,
}

#[derive(Args, Debug)]
#[command(rename_all = "kebab-case")]
struct RrsetArgs {
    /// RRset owner name (e.g. www.example.com.)
    #[arg(long, value_name = "FQDN")]
    name: String,
    /// Record type (A, AAAA, MX, ...)
    #[arg(long = "type", value_name = "TYPE")]
    rtype: RrType,
    /// TTL in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TTL)]
    ttl: u32,
    /// Record content (repeat for multiple values)
    #[arg(long = "record", value_name = "CONTENT", required_if_eq("state", "present"))]
    records: Vec<String>,
    /// Containing zone
    #[arg(long, value_name = "FQDN")]
    zone: String,
    /// present or absent
    #[arg(long, value_name = "STATE", default_value = "present")]
    state: DesiredState,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => {
            println!("{}", json!(outcome));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            println!("{}", json!({ "failed": true, "msg": format!("{err:#}") }));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config = build_api_config(&cli)?;
    let client = PowerDnsClient::new(&config).context("failed to build PowerDNS client")?;
    let mode = Mode::from_check_flag(cli.check);

    let outcome = match cli.command {
        Command::Zone(args) => {
            let spec = ZoneSpec::new(args.name)
                .with_kind(args.kind)
                .with_masters(args.masters)
                .with_dnssec(args.dnssec)
                .with_api_rectify(args.api_rectify)
                .with_state(args.state);
            ZoneReconciler::new(client)
                .reconcile(&spec, mode)
                .await
                .with_context(|| format!("failed to reconcile zone '{}'", spec.name))?
        }
        Command::Rrset(args) => {
            let spec = RrsetSpec::new(args.name, args.rtype, args.zone)
                .with_ttl(args.ttl)
                .with_records(args.records)
                .with_state(args.state);
            RrsetReconciler::new(client)
                .reconcile(&spec, mode)
                .await
                .with_context(|| {
                    format!("failed to reconcile {} rrset '{}'", spec.rtype, spec.name)
                })?
        }
    };

    info!(changed = outcome.changed, check = mode.is_check(), "done");
    Ok(outcome)
}

// Global args cannot be required in clap, so the key is checked here.
fn build_api_config(cli: &Cli) -> Result<ApiConfig> {
    let api_key = cli
        .api_key
        .as_deref()
        .context("an API key is required (--api-key or PDNS_API_KEY)")?;
    Ok(ApiConfig::new(api_key)
        .with_base_url(&cli.api_url)
        .with_server_id(&cli.server_id)
        .with_verify_tls(!cli.insecure)
        .with_timeout(Duration::from_secs(cli.timeout)))
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn api_key_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pdns-converge",
            "zone",
            "--name",
            "example.com.",
            "--api-key",
            "secret",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("secret"));

        let cli = Cli::try_parse_from([
            "pdns-converge",
            "rrset",
            "--zone",
            "example.com.",
            "--name",
            "www.example.com.",
            "--type",
            "A",
            "--record",
            "192.0.2.1",
            "--api-key",
            "secret",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("secret"));
        assert!(build_api_config(&cli).is_ok());
    }

    #[test]
    fn present_rrset_requires_a_record() {
        let err = Cli::try_parse_from([
            "pdns-converge",
            "--api-key",
            "secret",
            "rrset",
            "--zone",
            "example.com.",
            "--name",
            "www.example.com.",
            "--type",
            "A",
            "--state",
            "present",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        assert!(
            Cli::try_parse_from([
                "pdns-converge",
                "--api-key",
                "secret",
                "rrset",
                "--zone",
                "example.com.",
                "--name",
                "www.example.com.",
                "--type",
                "A",
                "--state",
                "absent",
            ])
            .is_ok()
        );
    }
}
