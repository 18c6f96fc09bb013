use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use civic_cli::utils::*;
use civic_ledger::{
    CreatePetition, CreateTemplate, CreateVotingEvent, DeployContract, EventKind, EventStatus,
    Role, TemplateKind, TemplateUpdate,
};
use clap::Parser;
use log::info;
use reqwest::Client;
use serde_json::Value;
use tokio::runtime::Builder;
use uuid::Uuid;

#[derive(Clone, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, env = "CIVIC_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Session token. `session` expects the issuer token here instead.
    #[arg(short, long, env = "CIVIC_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Clone)]
pub enum Commands {
    /// Mint a session for a user (requires the issuer token)
    Session {
        #[arg(long)]
        user_id: String,
    },
    CreateVoting {
        #[arg(long, help = "Read CreateVotingEvent arguments from a JSON file")]
        from_file: Option<PathBuf>,

        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, value_delimiter = ',', help = "Comma separated ballot options")]
        options: Vec<String>,

        #[arg(long, value_parser = parse_time, default_value = "now", help = "RFC 3339 or offset like +1h")]
        start: DateTime<Utc>,

        #[arg(long, value_parser = parse_time, default_value = "+7d")]
        end: DateTime<Utc>,
    },
    Vote {
        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,

        #[arg(long, help = "Option text or zero-based index")]
        option: String,

        /// Match a numeric --option as option text instead of an index
        #[arg(long)]
        by_value: bool,
    },
    CreatePetition {
        #[arg(long, help = "Read CreatePetition arguments from a JSON file")]
        from_file: Option<PathBuf>,

        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        target: Option<i64>,

        #[arg(long, value_parser = parse_time, default_value = "now")]
        start: DateTime<Utc>,

        #[arg(long, value_parser = parse_time, default_value = "+30d")]
        end: DateTime<Utc>,
    },
    Sign {
        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,

        #[arg(long)]
        comment: Option<String>,
    },
    Finalize {
        #[arg(long, value_parser = parse_event_kind, help = "voting | petition")]
        kind: EventKind,

        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,

        #[arg(long)]
        results_reference: String,
    },
    /// List active events of one kind
    Events {
        #[arg(long, value_parser = parse_event_kind)]
        kind: EventKind,
    },
    /// Show one event with its tally or progress
    Show {
        #[arg(long, value_parser = parse_event_kind)]
        kind: EventKind,

        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,
    },
    LedgerStatus {},
    // === Admin ===
    AdminEvents {},
    Participants {
        #[arg(long, value_parser = parse_event_kind)]
        kind: EventKind,

        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,
    },
    Transactions {},
    GrantRole {
        #[arg(long, value_parser = parse_role, help = "admin | voter | petitioner")]
        role: Role,

        #[arg(long, value_delimiter = ',', required = true, help = "Comma separated user ids")]
        users: Vec<String>,
    },
    RevokeRole {
        #[arg(long, value_parser = parse_role)]
        role: Role,

        #[arg(long, value_delimiter = ',', required = true)]
        users: Vec<String>,
    },
    ChangeStatus {
        #[arg(long, value_parser = parse_event_kind)]
        kind: EventKind,

        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,

        #[arg(long, value_parser = parse_status, help = "active | cancelled")]
        status: EventStatus,
    },
    DeleteEvent {
        #[arg(long, value_parser = parse_event_kind)]
        kind: EventKind,

        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,
    },
    // === Templates ===
    CreateTemplate {
        #[arg(long)]
        name: String,

        #[arg(long = "type", value_parser = parse_template_kind, help = "voting | petition | survey")]
        kind: TemplateKind,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, help = "JSON file holding the template config object")]
        config_file: Option<PathBuf>,
    },
    ListTemplates {},
    UpdateTemplate {
        #[arg(long, value_parser = parse_uuid)]
        id: Uuid,

        #[arg(long, help = "Read the TemplateUpdate fields from a JSON file")]
        from_file: Option<PathBuf>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    DeployContract {
        #[arg(long, value_parser = parse_uuid)]
        template_id: Uuid,

        #[arg(long)]
        network_id: String,

        #[arg(long, help = "JSON file holding the contract parameters")]
        params_file: Option<PathBuf>,
    },
    ListDeployments {},
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn event_path(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Voting => "/voting",
        EventKind::Petition => "/petition",
    }
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(false)
        .try_init();

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let cli = Cli::parse();
    let client = Client::new();

    let tx_sender = RequestSender {
        client: &client,
        base_url: &cli.base_url,
        token: cli.token.as_deref(),
    };
    if tx_sender.token.is_none() && !matches!(cli.command, Commands::LedgerStatus {}) {
        return Err(anyhow!("Missing --token (or CIVIC_TOKEN)"));
    }

    runtime.block_on(async {
        match cli.command.clone() {
            Commands::Session { user_id } => {
                info!("IssueSession...");
                let resp = send_issue_session(&tx_sender, &user_id).await?;
                print_json(&resp)?;
            }
            Commands::CreateVoting {
                from_file,
                title,
                description,
                options,
                start,
                end,
            } => {
                info!("CreateVotingEvent...");
                let args = match from_file {
                    Some(path) => read_json_args::<CreateVotingEvent>(&path)?,
                    None => CreateVotingEvent {
                        title: title.unwrap_or_default(),
                        description,
                        options,
                        start_time: start,
                        end_time: end,
                    },
                };
                let resp = send_create_voting_event(&tx_sender, &args).await?;
                info!("Created voting event {}", resp["event"]["id"]);
                print_json(&resp)?;
            }
            Commands::Vote {
                id,
                option,
                by_value,
            } => {
                info!("CastVote...");
                let choice = vote_choice(&option, by_value).map_err(|e| anyhow!(e))?;
                let resp = send_cast_vote(&tx_sender, id, &choice).await?;
                info!("Ledger hash: {}", resp["vote"]["blockchain_hash"]);
                print_json(&resp)?;
            }
            Commands::CreatePetition {
                from_file,
                title,
                description,
                target,
                start,
                end,
            } => {
                info!("CreatePetition...");
                let args = match from_file {
                    Some(path) => read_json_args::<CreatePetition>(&path)?,
                    None => CreatePetition {
                        title: title.unwrap_or_default(),
                        description,
                        start_time: start,
                        end_time: end,
                        target_signatures: target,
                    },
                };
                let resp = send_create_petition(&tx_sender, &args).await?;
                info!("Created petition {}", resp["petition"]["id"]);
                print_json(&resp)?;
            }
            Commands::Sign { id, comment } => {
                info!("SignPetition...");
                let resp = send_sign_petition(&tx_sender, id, comment.as_deref()).await?;
                info!("Ledger hash: {}", resp["signature"]["blockchain_hash"]);
                print_json(&resp)?;
            }
            Commands::Finalize {
                kind,
                id,
                results_reference,
            } => {
                info!("Finalize {}...", kind);
                let resp = send_finalize(&tx_sender, kind, id, &results_reference).await?;
                print_json(&resp)?;
            }
            Commands::Events { kind } => {
                print_json(&tx_sender.get(event_path(kind)).await?)?;
            }
            Commands::Show { kind, id } => {
                let path = format!("{}/{}", event_path(kind), id);
                print_json(&tx_sender.get(&path).await?)?;
            }
            Commands::LedgerStatus {} => {
                print_json(&tx_sender.get("/ledger/status").await?)?;
            }
            Commands::AdminEvents {} => {
                print_json(&send_admin_query(&tx_sender, "events").await?)?;
            }
            Commands::Participants { kind, id } => {
                print_json(&send_participants_query(&tx_sender, kind, id).await?)?;
            }
            Commands::Transactions {} => {
                print_json(&send_admin_query(&tx_sender, "transactions").await?)?;
            }
            Commands::GrantRole { role, users } => {
                info!("GrantRole...");
                for resp in send_update_roles(&tx_sender, Some(users), None, role).await? {
                    info!("Granted {} to {} user(s)", role, resp["changed"]);
                }
            }
            Commands::RevokeRole { role, users } => {
                info!("RevokeRole...");
                for resp in send_update_roles(&tx_sender, None, Some(users), role).await? {
                    info!("Revoked {} from {} user(s)", role, resp["changed"]);
                }
            }
            Commands::ChangeStatus { kind, id, status } => {
                info!("ChangeStatus...");
                send_change_status(&tx_sender, kind, id, status).await?;
                info!("{} {} is now {}", kind, id, status);
            }
            Commands::DeleteEvent { kind, id } => {
                info!("DeleteEvent...");
                send_delete_event(&tx_sender, kind, id).await?;
                info!("{} {} deleted", kind, id);
            }
            Commands::CreateTemplate {
                name,
                kind,
                description,
                config_file,
            } => {
                info!("CreateTemplate...");
                let args = CreateTemplate {
                    name,
                    kind,
                    description,
                    config: config_file
                        .map(|path| read_json_args::<Value>(&path))
                        .transpose()?,
                };
                let resp = send_create_template(&tx_sender, &args).await?;
                info!("Created template {}", resp["template"]["id"]);
                print_json(&resp)?;
            }
            Commands::ListTemplates {} => {
                print_json(&tx_sender.get("/templates").await?)?;
            }
            Commands::UpdateTemplate {
                id,
                from_file,
                name,
                description,
                active,
            } => {
                info!("UpdateTemplate...");
                let updates = match from_file {
                    Some(path) => read_json_args::<TemplateUpdate>(&path)?,
                    None => TemplateUpdate {
                        name,
                        description,
                        is_active: active,
                        ..TemplateUpdate::default()
                    },
                };
                if updates.is_empty() {
                    return Err(anyhow!("Nothing to update"));
                }
                print_json(&send_update_template(&tx_sender, id, &updates).await?)?;
            }
            Commands::DeployContract {
                template_id,
                network_id,
                params_file,
            } => {
                info!("DeployContract...");
                let args = DeployContract {
                    network_id,
                    contract_params: params_file
                        .map(|path| read_json_args::<Value>(&path))
                        .transpose()?,
                };
                let resp = send_deploy_contract(&tx_sender, template_id, &args).await?;
                info!(
                    "Deployed at {} (block {})",
                    resp["deployment"]["contract_address"], resp["deployment"]["block_number"]
                );
                print_json(&resp)?;
            }
            Commands::ListDeployments {} => {
                print_json(&tx_sender.get("/templates/deployments").await?)?;
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
