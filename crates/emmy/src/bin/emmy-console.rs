//! Emmy console - dispatch commands typed on stdin against the sample grammar.

use clap::Parser;
use emmy::{
    ConsolePlatformAdapter, ConsoleSender, CoreSettings, Dispatcher, GameProfile, LogFormat,
    Permissible, PlatformAdapter, PlayerSender, demo_grammar, init_tracing, is_valid_username,
    offline_profile_cache,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

/// Command-line arguments for the console.
#[derive(Parser, Debug)]
#[command(name = "emmy-console")]
#[command(about = "Dispatch commands from stdin against the EmmyLib sample grammar")]
#[command(version)]
struct Args {
    /// Settings file, taking precedence over every other source
    #[arg(short, long, env = "EMMY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    json: bool,

    /// Run commands as this offline player instead of the console
    #[arg(long)]
    player: Option<String>,

    /// Permission node granted to --player (repeatable)
    #[arg(long = "grant", requires = "player")]
    grants: Vec<String>,

    /// Run these commands and exit instead of reading stdin
    #[arg(short, long = "command")]
    commands: Vec<String>,
}

fn executor(args: &Args) -> Result<Arc<dyn Permissible>, Box<dyn std::error::Error + Send + Sync>> {
    let Some(name) = &args.player else {
        return Ok(Arc::new(ConsoleSender));
    };
    if !is_valid_username(name) {
        return Err(format!("'{}' is not a valid player name", name).into());
    }
    let player = args
        .grants
        .iter()
        .fold(PlayerSender::new(GameProfile::offline(name.as_str())), |player, node| {
            player.grant(node.as_str())
        });
    Ok(Arc::new(player))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    init_tracing(if args.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    })?;

    let settings = CoreSettings::load_with(args.settings.as_deref())?;
    let profiles = offline_profile_cache(&settings);
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(demo_grammar(profiles.clone())?),
        &settings,
    ));
    let console = ConsolePlatformAdapter::new(dispatcher.clone()).with_executor(executor(&args)?);
    info!(
        platform = console.platform(),
        executor = console.executor().name(),
        "Console ready"
    );

    if args.commands.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        let dispatched = console.run(stdin, tokio::io::stdout()).await?;
        info!(dispatched, "Input closed");
    } else {
        for command in &args.commands {
            let outcome = console.submit(command, console.executor().clone()).await;
            println!("{}", console.render_result(&outcome));
        }
    }

    dispatcher.close();
    let stats = profiles.stats();
    info!(
        hits = stats.hits(),
        misses = stats.misses(),
        resolutions = stats.resolutions(),
        "Shutting down"
    );
    Ok(())
}
