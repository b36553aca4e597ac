//! Sample server grammar used by the console binary.

use emmy_cache::ProfileCache;
use emmy_command::argument::{choice, duration_range, integer_range, player, string, word};
use emmy_command::{
    CommandOutput, DispatchContext, GrammarTree, GrammarTreeBuilder, Permission, argument, literal,
};
use emmy_core::{GameProfile, long_duration};
use emmy_error::{GrammarError, HandlerError};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::info;

const MINUTE: Duration = Duration::from_secs(60);
const YEAR: Duration = Duration::from_secs(31_556_952);

fn target<'c>(ctx: &'c DispatchContext, name: &str) -> Result<&'c GameProfile, HandlerError> {
    ctx.profile(name)
        .ok_or_else(|| HandlerError::new(format!("No player given for '{}'", name)))
}

/// The executor's own profile, for commands that act on the sender.
fn executor_profile(ctx: &DispatchContext) -> Result<&GameProfile, HandlerError> {
    ctx.executor()
        .profile()
        .ok_or_else(|| HandlerError::new("Only players can target themselves"))
}

fn teleport(ctx: &DispatchContext) -> Result<CommandOutput, HandlerError> {
    let first = target(ctx, "player")?;
    let (from, to) = match ctx.profile("destination") {
        Some(destination) => (first, destination),
        None => (executor_profile(ctx)?, first),
    };
    Ok(CommandOutput::success_with(format!(
        "Teleported {} to {}",
        from.name(),
        to.name()
    )))
}

fn ban(ctx: &DispatchContext) -> Result<CommandOutput, HandlerError> {
    let profile = target(ctx, "target")?;
    let message = match ctx.duration("length") {
        Some(length) => format!("Banned {} for {}", profile.name(), long_duration(length)),
        None => format!("Banned {} permanently", profile.name()),
    };
    info!(target_id = %profile.id(), banned_by = ctx.executor().name(), "Ban issued");
    Ok(CommandOutput::success_with(message))
}

fn gamemode(ctx: &DispatchContext) -> Result<CommandOutput, HandlerError> {
    let mode = ctx.string("mode").unwrap_or_default();
    let profile = match ctx.profile("target") {
        Some(profile) => profile,
        None => executor_profile(ctx)?,
    };
    Ok(CommandOutput::success_with(format!(
        "Set {}'s game mode to {}",
        profile.name(),
        mode
    )))
}

fn heal(ctx: &DispatchContext) -> Result<CommandOutput, HandlerError> {
    let profile = match ctx.profile("target") {
        Some(profile) => profile,
        None => executor_profile(ctx)?,
    };
    Ok(CommandOutput::success_with(format!("Healed {}", profile.name())))
}

/// Build the sample grammar, resolving player arguments through `profiles`.
///
/// Commands:
///
/// - `tp <player:player> [destination:player]`
/// - `say <message:string>`
/// - `give <amount:integer(1..=64)>`
/// - `gamemode <mode:choice> [target:player]`
/// - `heal [target:player]`
/// - `ban <target:player> [length:duration]`, requiring `emmy.ban`
/// - `help [command:word]`
///
/// # Errors
///
/// Returns error if two registrations conflict.
pub fn demo_grammar(profiles: Arc<ProfileCache>) -> Result<GrammarTree, GrammarError> {
    let usage: Arc<OnceLock<Vec<String>>> = Arc::new(OnceLock::new());
    let mut builder = GrammarTreeBuilder::new();

    builder.register(
        literal("tp").requires(Permission::has("emmy.teleport")).then(
            argument("player", player(profiles.clone()))
                .executes(teleport)
                .then(argument("destination", player(profiles.clone())).executes(teleport)),
        ),
    )?;

    builder.register(literal("say").then(argument("message", string()).executes(|ctx| {
        Ok(CommandOutput::success_with(format!(
            "[{}] {}",
            ctx.executor().name(),
            ctx.string("message").unwrap_or_default()
        )))
    })))?;

    builder.register(
        literal("give").then(argument("amount", integer_range(1, 64)).executes(|ctx| {
            let amount = ctx.required("amount")?.as_integer().unwrap_or(1);
            Ok(CommandOutput::success_with(format!(
                "Gave {} {} item(s)",
                ctx.executor().name(),
                amount
            )))
        })),
    )?;

    builder.register(
        literal("gamemode").requires(Permission::has("emmy.gamemode")).then(
            argument("mode", choice(["survival", "creative", "adventure", "spectator"]))
                .executes(gamemode)
                .then(argument("target", player(profiles.clone())).executes(gamemode)),
        ),
    )?;

    builder.register(
        literal("heal")
            .requires(Permission::has("emmy.heal"))
            .executes(heal)
            .then(
                argument("target", player(profiles.clone()))
                    .requires(Permission::has("emmy.heal.others"))
                    .executes(heal),
            ),
    )?;

    builder.register(
        literal("ban").requires(Permission::has("emmy.ban")).then(
            argument("target", player(profiles))
                .executes(ban)
                .then(argument("length", duration_range(MINUTE, YEAR)).executes(ban)),
        ),
    )?;

    let lines = usage.clone();
    let help = move |ctx: &DispatchContext| {
        let lines = lines.get().map(Vec::as_slice).unwrap_or_default();
        let selected: Vec<&str> = match ctx.string("command") {
            Some(command) => lines
                .iter()
                .map(String::as_str)
                .filter(|line| line.split(' ').next() == Some(command))
                .collect(),
            None => lines.iter().map(String::as_str).collect(),
        };
        if selected.is_empty() {
            return Err(HandlerError::new("No matching commands"));
        }
        Ok(CommandOutput::success_with(selected.join("\n")))
    };
    builder.register(
        literal("help")
            .executes(help.clone())
            .then(argument("command", word()).executes(help)),
    )?;

    let tree = builder.freeze();
    let lines = tree.usage(&[])?;
    info!(commands = tree.commands().len(), usages = lines.len(), "Sample grammar built");
    let _ = usage.set(lines);
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline_profile_cache;
    use emmy_command::Dispatcher;
    use emmy_core::{ConsoleSender, CoreSettings, Permissible, PlayerSender};
    use emmy_error::{DispatchErrorKind, ResultKind};

    fn dispatcher() -> Dispatcher {
        let settings = CoreSettings::default();
        let tree = demo_grammar(offline_profile_cache(&settings)).unwrap();
        Dispatcher::new(Arc::new(tree), &settings)
    }

    fn steve(grants: &[&str]) -> Arc<dyn Permissible> {
        let player = grants
            .iter()
            .fold(PlayerSender::new(GameProfile::offline("Steve")), |player, node| {
                player.grant(*node)
            });
        Arc::new(player)
    }

    #[tokio::test]
    async fn test_teleport_self_and_others() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.execute("tp Alex", steve(&["emmy.teleport"])).await;
        assert_eq!(outcome.message().as_deref(), Some("Teleported Steve to Alex"));

        let outcome = dispatcher.execute("tp Alex Notch", Arc::new(ConsoleSender)).await;
        assert_eq!(outcome.message().as_deref(), Some("Teleported Alex to Notch"));
    }

    #[tokio::test]
    async fn test_console_cannot_heal_itself() {
        let outcome = dispatcher().execute("heal", Arc::new(ConsoleSender)).await;
        assert_eq!(outcome.result_kind(), ResultKind::Failure);
        assert!(matches!(
            outcome.error().map(|err| err.kind()),
            Some(DispatchErrorKind::Handler(_))
        ));
    }

    #[tokio::test]
    async fn test_heal_others_needs_extra_permission() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.execute("heal", steve(&["emmy.heal"])).await;
        assert_eq!(outcome.message().as_deref(), Some("Healed Steve"));

        let outcome = dispatcher.execute("heal Alex", steve(&["emmy.heal"])).await;
        assert!(matches!(
            outcome.error().map(|err| err.kind()),
            Some(DispatchErrorKind::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_ban_lengths() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.execute("ban Griefer 1d2h", Arc::new(ConsoleSender)).await;
        assert_eq!(
            outcome.message().as_deref(),
            Some("Banned Griefer for 1 day, 2 hours")
        );

        let outcome = dispatcher.execute("ban Griefer", Arc::new(ConsoleSender)).await;
        assert_eq!(outcome.message().as_deref(), Some("Banned Griefer permanently"));

        let outcome = dispatcher.execute("ban Griefer 30s", Arc::new(ConsoleSender)).await;
        assert_eq!(outcome.result_kind(), ResultKind::InvalidSyntax);
    }

    #[tokio::test]
    async fn test_help_lists_usage() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.execute("help give", Arc::new(ConsoleSender)).await;
        assert_eq!(outcome.message().as_deref(), Some("give <amount:integer>"));

        let outcome = dispatcher.execute("help", Arc::new(ConsoleSender)).await;
        let message = outcome.message().unwrap_or_default();
        assert!(message.lines().any(|line| line == "tp <player:player> <destination:player>"));
        assert!(message.lines().any(|line| line == "help"));
    }
}
