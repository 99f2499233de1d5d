use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::EnsembleConfig;
use ensemble_core::{
    AssignmentMap, CATALOG, NotificationFilter, QUICK_ASSIGNMENTS, RoleCategory, RoomSession,
    TEMPLATES, WatchConfig,
};
use ensemble_hub::{Capabilities, EventSource, HubClient, PollingSource};

#[derive(Parser)]
#[command(name = "ensemble")]
#[command(version)]
#[command(about = "Ensemble — role & task routing for agent collaboration rooms")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List roles in the catalog
    Roles {
        /// Restrict to one category (Development, Analysis, ...)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one role in full
    Role {
        /// Role key, e.g. SENIOR_DEVELOPER
        key: String,
    },

    /// List task templates and their placeholders
    Templates,

    /// Render a task template
    Render {
        /// Template key, e.g. BUG_FIX
        key: String,

        /// Template variables as name=value (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Fail if any placeholder is left unresolved
        #[arg(long)]
        strict: bool,
    },

    /// List quick assignments
    Quick,

    /// Match a quick assignment against role assignments
    Match {
        /// Quick assignment key, e.g. EMERGENCY_BUG_FIX
        key: String,

        /// Role assignments as agent=ROLE_KEY (repeatable, in room order)
        #[arg(long = "assign", value_name = "AGENT=ROLE")]
        assignments: Vec<String>,
    },

    /// Join a room and run the notification session until Ctrl-C
    Join {
        /// Room name
        room: String,
    },

    /// Initialize config directory and default config
    Init,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    ensemble_core::validate_tables().context("Shipped role/template tables are inconsistent")?;

    match cli.command {
        Commands::Roles { category } => cmd_roles(category.as_deref()),
        Commands::Role { key } => cmd_role(&key),
        Commands::Templates => cmd_templates(),
        Commands::Render { key, vars, strict } => cmd_render(&key, &vars, strict),
        Commands::Quick => cmd_quick(),
        Commands::Match { key, assignments } => cmd_match(&key, &assignments),
        Commands::Join { room } => cmd_join(&cli.config, &room).await,
        Commands::Init => cmd_init(),
        Commands::Config => cmd_config(&cli.config),
    }
}

fn cmd_roles(category: Option<&str>) -> Result<()> {
    let categories: Vec<RoleCategory> = match category {
        Some(raw) => {
            let c = RoleCategory::from_string(raw)
                .ok_or_else(|| anyhow!("Unknown category: {raw}"))?;
            vec![c]
        }
        None => RoleCategory::ALL.to_vec(),
    };

    for category in categories {
        let roles = CATALOG.roles_in_category(category);
        if roles.is_empty() {
            continue;
        }
        println!("{category}:");
        for (key, role) in roles {
            println!("  {key:<22} {} [{}]", role.name, role.priority);
        }
    }
    Ok(())
}

fn cmd_role(key: &str) -> Result<()> {
    let role = CATALOG
        .get(key)
        .ok_or_else(|| anyhow!("Unknown role: {key}"))?;
    println!("{} ({})", role.name, role.category);
    println!("Priority: {}", role.priority);
    println!("{}\n", role.description);
    println!("Capabilities: {}", role.capabilities.join(", "));
    println!("Default tasks:");
    for task in role.default_tasks {
        println!("  - {task}");
    }
    Ok(())
}

fn cmd_templates() -> Result<()> {
    for (key, template) in TEMPLATES.iter() {
        let placeholders = TEMPLATES
            .placeholders(key)
            .map(|p| p.into_iter().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        println!(
            "{key:<24} [{}] ~{}h  vars: {}",
            template.priority,
            template.estimated_hours,
            if placeholders.is_empty() { "-" } else { placeholders.as_str() }
        );
    }
    Ok(())
}

fn cmd_render(key: &str, raw_vars: &[String], strict: bool) -> Result<()> {
    let mut vars = HashMap::new();
    for raw in raw_vars {
        let (name, value) = parse_pair(raw)?;
        vars.insert(name, value);
    }

    let rendered = if strict {
        TEMPLATES.render_strict(key, &vars)?
    } else {
        TEMPLATES.render(key, &vars)?
    };

    println!("{}", rendered.title);
    println!("Priority: {}", rendered.priority);
    if let Some(role) = &rendered.assigned_role {
        println!("Default role: {role}");
    }
    println!("Estimated hours: {}", rendered.estimated_hours);
    println!("\n{}\n", rendered.description);
    println!("Checklist:");
    for step in &rendered.checklist {
        println!("  [ ] {step}");
    }
    Ok(())
}

fn cmd_quick() -> Result<()> {
    for (key, assignment) in QUICK_ASSIGNMENTS.iter() {
        println!(
            "{key:<22} [{}] {} (roles: {})",
            assignment.priority,
            assignment.title,
            assignment.suggested_roles.join(", ")
        );
    }
    Ok(())
}

fn cmd_match(key: &str, raw_assignments: &[String]) -> Result<()> {
    let mut map = AssignmentMap::new();
    for raw in raw_assignments {
        let (agent, role) = parse_pair(raw)?;
        map.assign(&CATALOG, agent.clone(), agent, &role)?;
    }

    let m = QUICK_ASSIGNMENTS.match_assignment(&CATALOG, key, &map)?;
    println!("{} [{}]", m.assignment.title, m.assignment.priority);
    println!("Template: {}", m.assignment.template);
    if m.candidates.is_empty() {
        println!("No suitable agents in the room — assign manually.");
    } else {
        println!("Candidates:");
        for agent in &m.candidates {
            println!("  - {agent}");
        }
    }
    Ok(())
}

async fn cmd_join(config_path: &Option<PathBuf>, room: &str) -> Result<()> {
    let config = EnsembleConfig::load(config_path.as_deref())?;

    let mut watch = WatchConfig::new(&config.agent.name);
    for keyword in &config.watch.keywords {
        if let Err(e) = watch.watch(keyword.clone()) {
            warn!("Skipping watch keyword: {e}");
        }
    }

    let client = HubClient::new(&config.hub.url)?;
    let joined = client
        .join_room(
            room,
            &config.agent.name,
            Capabilities {
                role: Some("ai-agent".to_string()),
                ..Default::default()
            },
        )
        .await?;
    println!(
        "Joined '{}' as {} ({} agents present)",
        joined.room, joined.agent_name, joined.current_agents
    );

    let session = RoomSession::new(room, watch, config.history.capacity);
    let (tx, rx) = mpsc::channel(256);
    let cancel = CancellationToken::new();

    let source = PollingSource::new(
        client.clone(),
        room,
        Duration::from_secs(config.hub.poll_interval_secs),
    );
    let source_cancel = source.cancellation_token();
    source.start(tx).await?;

    let session_task = tokio::spawn(session.run(rx, cancel.clone()));

    signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    info!("Shutting down session for room '{room}'");
    source_cancel.cancel();
    cancel.cancel();

    let session = session_task.await.context("Session task panicked")?;
    for message in session.history().recent(5) {
        println!(
            "[{}] {}: {}",
            message.timestamp.format("%H:%M:%S"),
            message.sender_name,
            message.content
        );
    }
    let unread = session
        .notifications(NotificationFilter {
            unread_only: true,
            ..Default::default()
        })
        .len();
    println!(
        "Left '{}': {} messages seen, {} unread notifications",
        room,
        session.history().len(),
        unread
    );

    client.leave_room(&joined.agent_id).await?;
    Ok(())
}

fn cmd_init() -> Result<()> {
    let dir = config::config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;

    let path = dir.join("config.toml");
    if path.exists() {
        warn!("Config already exists at {}", path.display());
    } else {
        let default_config = toml::to_string_pretty(&EnsembleConfig::default())?;
        std::fs::write(&path, default_config)?;
        info!("Created default config at {}", path.display());
    }

    println!("Ensemble initialized at {}", dir.display());
    println!("Edit {} to set your hub URL and watch keywords.", path.display());
    Ok(())
}

fn cmd_config(config_path: &Option<PathBuf>) -> Result<()> {
    let config = EnsembleConfig::load(config_path.as_deref())?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Parse a `left=right` pair from the command line
fn parse_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((left, right)) if !left.is_empty() => Ok((left.to_string(), right.to_string())),
        _ => bail!("Expected NAME=VALUE, got: {raw}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("feature_name=login").unwrap(),
            ("feature_name".to_string(), "login".to_string())
        );
        assert_eq!(
            parse_pair("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_pair("no-equals").is_err());
        assert!(parse_pair("=value").is_err());
    }
}
