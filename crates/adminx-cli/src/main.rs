//! `adminx` command line

use adminx_access::{visible_nav, Capability, Role};
use adminx_core::{
    demo, Console, ConsoleConfig, GeminiClient, GenerationError, LatencyProfile, OverlapPolicy, PromptKind,
    ResourceId, ResourceKind, Session, SimulatedStore, Stores, TextGenerator,
};
use anyhow::Context;
use async_trait::async_trait;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Stand-in used when no API key is configured
struct Offline;

#[async_trait]
impl TextGenerator for Offline {
    async fn generate(&self, _kind: PromptKind, _input: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Failed("assistant offline (no API key)".into()))
    }
}

fn cli() -> Command {
    Command::new("adminx")
        .version(adminx_core::VERSION)
        .about("AdminX console: roles, navigation and optimistic mutation simulation")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, overrides RUST_LOG (e.g. debug, adminx_core=trace)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("roles").about("Show the role hierarchy and capability sets").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("nav")
                .about("Show the sidebar entries visible to a role")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .required(true)
                        .value_parser(value_parser!(Role))
                        .help("viewer, editor, admin or owner"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Toggle a demo service through the optimistic protocol")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .default_value("admin")
                        .value_parser(value_parser!(Role))
                        .help("Role of the signed-in user"),
                )
                .arg(
                    Arg::new("service")
                        .long("service")
                        .default_value("1")
                        .help("Id of the service to toggle"),
                )
                .arg(
                    Arg::new("fail")
                        .long("fail")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Number of store calls to fail after loading"),
                )
                .arg(
                    Arg::new("toggles")
                        .long("toggles")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Number of sequential toggles"),
                )
                .arg(
                    Arg::new("last-call-wins")
                        .long("last-call-wins")
                        .action(ArgAction::SetTrue)
                        .help("Allow overlapping toggles"),
                )
                .arg(
                    Arg::new("instant")
                        .long("instant")
                        .action(ArgAction::SetTrue)
                        .help("Disable simulated store latency"),
                )
                .arg(
                    Arg::new("summarize")
                        .long("summarize")
                        .help("Also summarize this lead with the text assistant"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("check-config").about("Validate the configuration and print it with defaults filled in"))
}

fn init_tracing(matches: &ArgMatches) {
    let filter = matches
        .get_one::<String>("log-level")
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if matches.get_flag("json-logs") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ConsoleConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => ConsoleConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(ConsoleConfig::default()),
    }
}

#[derive(Serialize)]
struct RoleRow {
    role: Role,
    rank: u8,
    capabilities: Vec<Capability>,
}

fn roles(args: &ArgMatches) -> anyhow::Result<()> {
    let rows: Vec<RoleRow> = Role::ALL
        .iter()
        .map(|&role| RoleRow {
            role,
            rank: role.rank(),
            capabilities: Capability::ALL.into_iter().filter(|c| c.allows(role)).collect(),
        })
        .collect();

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{:<8} {:>4}  capabilities", "role", "rank");
    for row in rows {
        let caps: Vec<String> = row.capabilities.iter().map(ToString::to_string).collect();
        let caps = if caps.is_empty() { "-".to_string() } else { caps.join(", ") };
        println!("{:<8} {:>4}  {caps}", row.role, row.rank);
    }
    Ok(())
}

fn nav(args: &ArgMatches) -> anyhow::Result<()> {
    let role = args.get_one::<Role>("role").copied().context("--role is required")?;
    let items = visible_nav(role);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    for item in items {
        let note = match item.section.gate() {
            Some(cap) if !cap.allows(role) => "  (page denies this role)",
            _ => "",
        };
        println!("{:<10} {}{note}", item.label, item.href);
    }
    Ok(())
}

#[derive(Serialize)]
struct SimulationReport {
    role: Role,
    service: String,
    before: bool,
    after: bool,
    outcomes: Vec<String>,
    notices: Vec<adminx_core::Notice>,
    history: Vec<adminx_core::MutationTrail>,
    stats: adminx_core::DashboardStats,
    summary: Option<String>,
}

async fn simulate(args: &ArgMatches, mut config: ConsoleConfig) -> anyhow::Result<ExitCode> {
    let role = args.get_one::<Role>("role").copied().unwrap_or(Role::Admin);
    let service = ResourceId::new(args.get_one::<String>("service").map_or("1", String::as_str));
    let fail = args.get_one::<usize>("fail").copied().unwrap_or(0);
    let toggles = args.get_one::<usize>("toggles").copied().unwrap_or(1);
    if args.get_flag("instant") {
        config.latency = LatencyProfile::zero();
    }
    if args.get_flag("last-call-wins") {
        config.mutation.overlap = OverlapPolicy::LastCallWins;
    }

    let generator: Arc<dyn TextGenerator> = match GeminiClient::from_config(&config.generation) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "text assistant disabled");
            Arc::new(Offline)
        }
    };

    let services = Arc::new(SimulatedStore::new(config.latency).with_rows(demo::services()));
    let stores = Stores {
        services: services.clone(),
        ..Stores::simulated(config.latency)
    };
    let console = Console::new(Session::start(demo::current_user(role)), stores, generator, config);

    console.load_all().await.context("loading demo data")?;
    let before = console
        .services("")
        .into_iter()
        .find(|s| s.id == service)
        .map(|s| s.enabled)
        .with_context(|| format!("no service with id {service}"))?;

    services.fail_next(fail);
    let mut outcomes = Vec::with_capacity(toggles);
    let mut ok = true;
    for _ in 0..toggles {
        match console.toggle_service(&service).await {
            Ok(value) => outcomes.push(format!("enabled -> {value}")),
            Err(e) => {
                ok = false;
                outcomes.push(format!("{e} [{}]", serde_json::to_string(&e.surface())?));
            }
        }
    }

    let summary = match args.get_one::<String>("summarize") {
        Some(lead) => match console.summarize_lead(&ResourceId::new(lead.as_str())).await {
            Ok(text) => Some(text),
            Err(e) => {
                ok = false;
                Some(format!("error: {e}"))
            }
        },
        None => None,
    };

    let after = console
        .services("")
        .into_iter()
        .find(|s| s.id == service)
        .is_some_and(|s| s.enabled);

    let report = SimulationReport {
        role,
        service: service.to_string(),
        before,
        after,
        outcomes,
        notices: console.notices().active(),
        history: console.history(ResourceKind::Service),
        stats: console.stats(),
        summary,
    };
    let receipt = console.logout();
    tracing::debug!(session = %receipt.session_id, "simulation finished");

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Role: {}", report.role);
        println!("Service {}: enabled {} -> {}", report.service, report.before, report.after);
        for (i, outcome) in report.outcomes.iter().enumerate() {
            println!("  toggle #{}: {outcome}", i + 1);
        }
        for trail in &report.history {
            let phases: Vec<String> = trail.phases.iter().map(|p| format!("{p:?}")).collect();
            println!("  ticket {}: {}", trail.ticket, phases.join(" -> "));
        }
        for notice in &report.notices {
            println!("  [{:?}] {}", notice.level, notice.message);
        }
        if let Some(summary) = &report.summary {
            println!("Lead summary:\n{summary}");
        }
        println!(
            "Active services: {}  Live posts: {}  Open leads: {}  Revenue: ${:.2}",
            report.stats.active_services, report.stats.live_posts, report.stats.open_leads, report.stats.revenue
        );
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn check_config(config: &ConsoleConfig) -> anyhow::Result<()> {
    config.validate()?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(&matches);
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("roles", args)) => roles(args)?,
        Some(("nav", args)) => nav(args)?,
        Some(("simulate", args)) => return simulate(args, config).await,
        Some(("check-config", _)) => check_config(&config)?,
        _ => {
            cli().print_help()?;
            println!();
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn role_argument_is_parsed() {
        let matches = cli().try_get_matches_from(["adminx", "nav", "--role", "Editor"]).unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<Role>("role"), Some(&Role::Editor));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(cli().try_get_matches_from(["adminx", "nav", "--role", "root"]).is_err());
    }

    #[tokio::test]
    async fn offline_generator_fails() {
        assert!(Offline.generate(PromptKind::Rewrite, "x").await.is_err());
    }
}
