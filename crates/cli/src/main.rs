use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{RecommendRequest, Workspace};
use config::RoomieConfig;
use roomie_store::{DistributionId, DistributionState, Gender, UserId};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "roomie")]
#[command(about = "Roommate grouping and profile recommendations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./roomie.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file (overrides config and ROOMIE_SNAPSHOT)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty snapshot
    Init(InitArgs),

    /// Create a distribution in PREPARING state
    #[command(name = "new-distribution")]
    NewDistribution(NewDistributionArgs),

    /// Create a user
    #[command(name = "new-user")]
    NewUser(NewUserArgs),

    /// Enroll users into a distribution
    Join(JoinArgs),

    /// Withdraw users from a distribution
    Leave(JoinArgs),

    /// Register members that must share a room
    Preform(PreformArgs),

    /// Subscribe a user to another user
    Subscribe(EdgeArgs),

    /// Remove a subscription
    Unsubscribe(EdgeArgs),

    /// Mark a profile as seen by a user
    View(EdgeArgs),

    /// Move a distribution to the next state
    Advance(AdvanceArgs),

    /// Preview rooms for one cohort without saving anything
    Group(GroupArgs),

    /// Close enrollment and persist rooms for every cohort
    Close(DistributionArgs),

    /// Pick the next profiles for a viewer
    Recommend(RecommendArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Overwrite an existing snapshot
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct NewDistributionArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args)]
struct NewUserArgs {
    /// male|female
    #[arg(long)]
    gender: Gender,
}

#[derive(Args)]
struct JoinArgs {
    #[arg(long)]
    distribution: DistributionId,

    /// User ids (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    users: Vec<UserId>,
}

#[derive(Args)]
struct PreformArgs {
    #[arg(long)]
    distribution: DistributionId,

    /// Member ids (comma-separated, 2..=4)
    #[arg(long, value_delimiter = ',', required = true)]
    members: Vec<UserId>,
}

#[derive(Args)]
struct EdgeArgs {
    #[arg(long)]
    user: UserId,

    #[arg(long)]
    target: UserId,
}

#[derive(Args)]
struct AdvanceArgs {
    #[arg(long)]
    distribution: DistributionId,

    /// answering|gathering|closed
    #[arg(long)]
    state: DistributionState,
}

#[derive(Args)]
struct GroupArgs {
    #[arg(long)]
    distribution: DistributionId,

    /// male|female
    #[arg(long)]
    gender: Gender,
}

#[derive(Args)]
struct DistributionArgs {
    #[arg(long)]
    distribution: DistributionId,
}

#[derive(Args)]
struct RecommendArgs {
    #[arg(long)]
    distribution: DistributionId,

    #[arg(long)]
    viewer: UserId,

    /// How many ids to return (default from config)
    #[arg(long)]
    amount: Option<usize>,

    /// Seed for the viewed-pool sample (overrides config and ROOMIE_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Do not add the returned ids to the viewer's seen set
    #[arg(long)]
    no_record: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = RoomieConfig::load(cli.config.as_deref())?;
    let ws = Workspace::new(config, cli.snapshot);
    log::debug!("Using snapshot {}", ws.snapshot.display());
    let pretty = cli.pretty;

    match cli.command {
        Commands::Init(args) => commands::print_json(&commands::run_init(&ws, args.force)?, pretty)?,
        Commands::NewDistribution(args) => {
            commands::print_json(&commands::run_new_distribution(&ws, &args.name)?, pretty)?
        }
        Commands::NewUser(args) => {
            commands::print_json(&commands::run_new_user(&ws, args.gender)?, pretty)?
        }
        Commands::Join(args) => commands::print_json(
            &commands::run_join(&ws, args.distribution, &args.users)?,
            pretty,
        )?,
        Commands::Leave(args) => commands::print_json(
            &commands::run_leave(&ws, args.distribution, &args.users)?,
            pretty,
        )?,
        Commands::Preform(args) => commands::print_json(
            &commands::run_preform(&ws, args.distribution, &args.members)?,
            pretty,
        )?,
        Commands::Subscribe(args) => commands::print_json(
            &commands::run_subscribe(&ws, args.user, args.target, true)?,
            pretty,
        )?,
        Commands::Unsubscribe(args) => commands::print_json(
            &commands::run_subscribe(&ws, args.user, args.target, false)?,
            pretty,
        )?,
        Commands::View(args) => {
            commands::print_json(&commands::run_view(&ws, args.user, args.target)?, pretty)?
        }
        Commands::Advance(args) => commands::print_json(
            &commands::run_advance(&ws, args.distribution, args.state)?,
            pretty,
        )?,
        Commands::Group(args) => commands::print_json(
            &commands::run_group(&ws, args.distribution, args.gender)?,
            pretty,
        )?,
        Commands::Close(args) => {
            commands::print_json(&commands::run_close(&ws, args.distribution)?, pretty)?
        }
        Commands::Recommend(args) => {
            let request = RecommendRequest {
                distribution_id: args.distribution,
                viewer_id: args.viewer,
                amount: args.amount,
                seed: args.seed,
                no_record: args.no_record,
            };
            commands::print_json(&commands::run_recommend(&ws, request)?, pretty)?
        }
    }

    Ok(())
}
