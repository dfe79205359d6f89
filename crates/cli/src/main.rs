// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use capymon_cli::commands::battle::{self, Next};
use capymon_cli::commands::{arena, faucet, init, inspect, pending, play, player};
use capymon_cli::context;
use capymon_cli::prompt::PromptChooser;
use capymon_client::chooser::{FixedMove, RandomMove};
use capymon_client::telemetry::{init_telemetry, render_metrics};
use capymon_client::kiosk::KioskMatch;
use capymon_client::{ClientConfig, CoordinatorContext};
use capymon_core::MatchKind;

#[derive(Parser)]
#[command(name = "capymon")]
#[command(about = "Capymon arena client: create arenas and fight matches on Sui", long_about = None)]
struct Cli {
    /// JSON config file. CAPYMON_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print collected metrics (Prometheus text format) before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Choose {
    /// Ask on the terminal every turn
    Prompt,
    /// Pick uniformly among the available moves
    Random,
    /// Always play --move
    Fixed,
}

#[derive(Args, Clone, Copy, Debug)]
struct Strategy {
    /// How moves are picked
    #[arg(long, value_enum, default_value_t = Choose::Prompt)]
    choose: Choose,

    /// Move value used with --choose fixed
    #[arg(long = "move", default_value_t = 0)]
    move_value: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Get gas if needed, then create a kiosk and install the game in it
    Init,
    /// Register a new player in your kiosk
    NewPlayer {
        /// Defaults to the kiosk the account owns
        #[arg(long, requires = "cap")]
        kiosk: Option<String>,

        /// Kiosk owner cap
        #[arg(long, requires = "kiosk")]
        cap: Option<String>,

        /// Water, Fire, Air or Earth (or its index)
        #[arg(long = "type", short)]
        type_name: String,
    },
    /// Create a new arena
    CreateArena {
        /// Player-vs-player arena instead of a bot arena
        #[arg(long)]
        pvp: bool,

        /// Start playing right away
        #[arg(long)]
        play: bool,

        #[command(flatten)]
        strategy: Strategy,
    },
    /// Take the second seat of a PvP arena
    Join {
        arena: String,

        /// Start playing right away
        #[arg(long)]
        play: bool,

        #[command(flatten)]
        strategy: Strategy,
    },
    /// Play an arena until it ends. Resumes a pending reveal if there is one.
    Play {
        arena: String,

        #[arg(long)]
        pvp: bool,

        #[command(flatten)]
        strategy: Strategy,
    },
    /// Find a kiosk battle through matchmaking and play it
    Battle {
        /// Withdraw a search that has not found an opponent yet
        #[arg(long)]
        cancel: bool,

        #[command(flatten)]
        strategy: Strategy,
    },
    /// Show the current state of an arena
    Inspect {
        arena: String,

        #[arg(long)]
        pvp: bool,
    },
    /// List commitments that still have to be revealed
    Pending,
    /// Request test funds from the faucet
    Faucet {
        /// Defaults to the configured address
        address: Option<String>,
    },
}

fn kind(pvp: bool) -> MatchKind {
    if pvp {
        MatchKind::Pvp
    } else {
        MatchKind::Pvb
    }
}

async fn play_arena(config: ClientConfig, arena_id: &str, kind: MatchKind, strategy: Strategy) -> anyhow::Result<()> {
    let ledger = context::connect(&config)?;
    let store = context::open_store(&config)?;
    let ctx = CoordinatorContext::new(ledger, store, config);
    match strategy.choose {
        Choose::Prompt => play::run(ctx, arena_id, kind, PromptChooser).await?,
        Choose::Random => play::run(ctx, arena_id, kind, RandomMove).await?,
        Choose::Fixed => play::run(ctx, arena_id, kind, FixedMove(strategy.move_value)).await?,
    };
    Ok(())
}

async fn play_battle(config: ClientConfig, seat: KioskMatch, strategy: Strategy) -> anyhow::Result<()> {
    let ledger = context::connect(&config)?;
    let store = context::open_store(&config)?;
    let ctx = CoordinatorContext::new(ledger, store, config);
    match strategy.choose {
        Choose::Prompt => play::run_kiosk(ctx, seat, PromptChooser).await?,
        Choose::Random => play::run_kiosk(ctx, seat, RandomMove).await?,
        Choose::Fixed => play::run_kiosk(ctx, seat, FixedMove(strategy.move_value)).await?,
    };
    Ok(())
}

async fn dispatch(command: Commands, mut config: ClientConfig) -> anyhow::Result<()> {
    match command {
        Commands::Init => init::run(&context::connect(&config)?, &config.package_id).await,
        Commands::NewPlayer { kiosk, cap, type_name } => {
            let ledger = context::connect(&config)?;
            player::run(&ledger, &config.package_id, kiosk, cap, &type_name).await
        }
        Commands::Battle { cancel, strategy } => {
            let ledger = context::connect(&config)?;
            match battle::run(&ledger, &config.package_id, &config.game_id, cancel).await? {
                Next::Play(seat) => play_battle(config, seat, strategy).await,
                Next::Done => Ok(()),
            }
        }
        Commands::CreateArena { pvp, play, strategy } => {
            let ledger = context::connect(&config)?;
            let created = arena::create(&ledger, &config.package_id, kind(pvp)).await?;
            if play {
                play_arena(config, &created.arena.object_id, kind(pvp), strategy).await?;
            }
            Ok(())
        }
        Commands::Join { arena: arena_id, play, strategy } => {
            let ledger = context::connect(&config)?;
            arena::join(&ledger, &config.package_id, &arena_id).await?;
            if play {
                play_arena(config, &arena_id, MatchKind::Pvp, strategy).await?;
            }
            Ok(())
        }
        Commands::Play { arena: arena_id, pvp, strategy } => play_arena(config, &arena_id, kind(pvp), strategy).await,
        Commands::Inspect { arena: arena_id, pvp } => {
            let ledger = context::connect(&config)?;
            inspect::run(&ledger, &arena_id, kind(pvp), config.type_table, &config.address).await
        }
        Commands::Pending => pending::run(&context::open_store(&config)?),
        Commands::Faucet { address } => {
            let address = address.unwrap_or_else(|| config.address.clone());
            if config.address.is_empty() {
                config.address = address.clone();
            }
            faucet::run(&context::connect(&config)?, &address).await
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_telemetry();

    let cli = Cli::parse();
    let print_metrics = cli.metrics;
    let config = context::load_config(cli.config.as_deref())?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(dispatch(cli.command, config));
    // A prompt abandoned with Ctrl-C is still parked on stdin; do not wait for it.
    runtime.shutdown_timeout(Duration::from_millis(100));

    if print_metrics {
        println!("{}", render_metrics());
    }
    result
}
