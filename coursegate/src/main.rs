use clap::Parser;
use coursegate::app_state::AppState;
use coursegate::http::setup_http_server;
use coursegate::init_telemetry;
use coursegate::services::AuthorizationService;
use coursegate_core::authorization::{CourseId, Role};
use tracing::info;

#[derive(Parser)]
#[command(name = "coursegate")]
#[command(about = "Course authorization service")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the API server (default)
    Run,
    /// Evaluate a single request and print the decision
    Check {
        #[arg(long)]
        user: String,
        /// view, create, edit or delete
        #[arg(long)]
        action: String,
        #[arg(long)]
        course: Option<CourseId>,
    },
    /// List the effective capabilities of a user
    Capabilities {
        #[arg(long)]
        user: String,
    },
    /// Grant a capability to a user and save the policy
    Grant {
        #[arg(long)]
        user: String,
        #[arg(long)]
        capability: String,
    },
    /// Revoke a directly granted capability and save the policy
    Revoke {
        #[arg(long)]
        user: String,
        #[arg(long)]
        capability: String,
    },
    /// Change the role and org assignment of a user and save the policy
    SetRole {
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        business: Option<u64>,
        #[arg(long)]
        branch: Option<u64>,
    },
    /// List the capability catalog and custom roles
    Policy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Run);
    if let Commands::Run = command {
        return run().await;
    }

    let settings = AppState::new_for_config_only()?;
    if let Commands::Config = command {
        println!("{:#?}", &settings);
        return Ok(());
    }

    // Management commands always work on the persisted policy
    let service = AuthorizationService::new(&settings.authorization.config_dir).await?;

    match command {
        Commands::Check {
            user,
            action,
            course,
        } => {
            let decision = service.check_course_access_str(&user, &action, course).await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Capabilities { user } => {
            for capability in service.effective_capabilities(&user).await? {
                println!("{}", capability);
            }
        }
        Commands::Grant { user, capability } => {
            service.grant_capability(&user, &capability).await?;
            println!("Granted {} to {}", capability, user);
        }
        Commands::Revoke { user, capability } => {
            if service.revoke_capability(&user, &capability).await? {
                println!("Revoked {} from {}", capability, user);
            } else {
                println!("{} had no direct grant of {}", user, capability);
            }
        }
        Commands::SetRole {
            user,
            role,
            business,
            branch,
        } => {
            service.set_user_role(&user, role, business, branch).await?;
            println!("{} is now {}", user, role);
        }
        Commands::Policy => {
            println!("Capabilities:");
            for (name, description) in service.list_capabilities().await {
                println!("  {:<20} {}", name, description);
            }
            println!("Custom roles:");
            for (name, role) in service.list_custom_roles().await {
                let capabilities: Vec<&str> =
                    role.capabilities.iter().map(|c| c.as_str()).collect();
                println!("  {:<20} [{}] {}", name, capabilities.join(", "), role.description);
            }
        }
        Commands::Config | Commands::Run => {}
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let app_state = AppState::new().await?;
    init_telemetry::init_telemetry_and_tracing(app_state.settings.debug)?;

    let handle = setup_http_server(app_state.clone(), &app_state.settings.api.bind_address).await?;
    handle.await??;

    info!("All tasks are done");
    Ok(())
}
