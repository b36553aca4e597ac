//! End-to-end dispatch tests over a small server grammar.

use emmy_cache::{FnResolver, IdentityCacheConfig, ProfileCache};
use emmy_command::argument::{choice, duration_range, integer_range, player, string};
use emmy_command::{
    CommandOutput, DispatchOutcome, DispatchQueue, Dispatcher, GrammarTreeBuilder, Permission,
    argument, literal, render_plain,
};
use emmy_core::{ConsoleSender, CoreSettings, GameProfile, Permissible, PlayerName, PlayerSender};
use emmy_error::{
    DispatchErrorKind, GrammarErrorKind, ParseErrorKind, ResolutionError, ResolutionErrorKind,
    ResultKind,
};
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Server {
    dispatcher: Arc<Dispatcher>,
    lookups: Arc<Mutex<Vec<String>>>,
    executions: Arc<AtomicUsize>,
}

fn server() -> Server {
    let lookups = Arc::new(Mutex::new(Vec::new()));
    let executions = Arc::new(AtomicUsize::new(0));

    let seen = lookups.clone();
    let cache = Arc::new(ProfileCache::new(
        IdentityCacheConfig::default(),
        FnResolver::new(move |name: PlayerName| {
            seen.lock().push(name.to_string());
            async move {
                if name.as_str() == "Ghost" {
                    Err(ResolutionError::new(ResolutionErrorKind::NotFound(name.into())))
                } else {
                    Ok(GameProfile::offline(name))
                }
            }
        }),
    ));

    let mut builder = GrammarTreeBuilder::new();
    builder
        .register(
            literal("tp").then(argument("from", player(cache.clone())).then(
                argument("to", player(cache.clone())).executes(|ctx| {
                    let from = ctx.profile("from").map(|p| p.name().clone()).unwrap_or_default();
                    let to = ctx.profile("to").map(|p| p.name().clone()).unwrap_or_default();
                    Ok(CommandOutput::success_with(format!("{} -> {}", from, to)))
                }),
            )),
        )
        .unwrap();
    builder
        .register(literal("say").then(argument("message", string()).executes(|ctx| {
            Ok(CommandOutput::success_with(format!(
                "{} tokens: {}",
                ctx.tokens().len(),
                ctx.string("message").unwrap_or_default()
            )))
        })))
        .unwrap();

    let counter = executions.clone();
    builder
        .register(
            literal("ban")
                .requires(Permission::has("emmy.ban"))
                .then(
                    argument("target", player(cache.clone())).then(
                        argument("length", duration_range(Duration::from_secs(60), Duration::from_secs(86_400)))
                            .executes(move |ctx| {
                                counter.fetch_add(1, Ordering::SeqCst);
                                let length = ctx.duration("length").unwrap_or_default();
                                Ok(CommandOutput::success_with(format!("banned for {}s", length.as_secs())))
                            }),
                    ),
                ),
        )
        .unwrap();
    builder
        .register(
            literal("give").then(argument("amount", integer_range(1, 64)).executes(|ctx| {
                Ok(CommandOutput::success_with(format!("gave {}", ctx.integer("amount").unwrap_or_default())))
            })),
        )
        .unwrap();
    builder
        .register(literal("gamemode").then(
            argument("mode", choice(["survival", "creative"])).executes(|ctx| {
                Ok(CommandOutput::success_with(ctx.string("mode").unwrap_or_default().to_string()))
            }),
        ))
        .unwrap();

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default()));
    Server {
        dispatcher,
        lookups,
        executions,
    }
}

fn console() -> Arc<dyn Permissible> {
    Arc::new(ConsoleSender)
}

fn guest() -> Arc<dyn Permissible> {
    Arc::new(PlayerSender::new(GameProfile::offline("Guest")))
}

fn error_kind(outcome: &DispatchOutcome) -> &DispatchErrorKind {
    outcome.error().expect("dispatch should have failed").kind()
}

#[tokio::test]
async fn test_players_resolved_in_path_order() {
    let server = server();
    let outcome = server.dispatcher.execute("tp PlayerA PlayerB", console()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message().as_deref(), Some("PlayerA -> PlayerB"));
    assert_eq!(*server.lookups.lock(), vec!["PlayerA", "PlayerB"]);
}

#[tokio::test]
async fn test_repeat_lookups_hit_the_cache() {
    let server = server();
    server.dispatcher.execute("tp PlayerA PlayerB", console()).await;
    server.dispatcher.execute("tp PlayerB PlayerA", console()).await;

    assert_eq!(server.lookups.lock().len(), 2);
}

#[tokio::test]
async fn test_player_lookup_ignores_case() {
    let server = server();
    server.dispatcher.execute("tp steve PlayerA", console()).await;
    let outcome = server.dispatcher.execute("tp Steve PlayerA", console()).await;

    assert_eq!(outcome.message().as_deref(), Some("steve -> PlayerA"));
    assert_eq!(*server.lookups.lock(), vec!["steve", "PlayerA"]);
}

#[tokio::test]
async fn test_quoted_message_is_one_token() {
    let server = server();
    let outcome = server.dispatcher.execute(r#"say "hello world""#, console()).await;
    assert_eq!(outcome.message().as_deref(), Some("2 tokens: hello world"));
}

#[tokio::test]
async fn test_denied_executor_never_runs_handler() {
    let server = server();
    let outcome = server.dispatcher.execute("ban Griefer 2h", guest()).await;

    match error_kind(&outcome) {
        DispatchErrorKind::PermissionDenied(denied) => assert_eq!(denied.node, "ban"),
        other => panic!("expected permission denied, got {:?}", other),
    }
    assert_eq!(outcome.result_kind(), ResultKind::Failure);
    assert_eq!(server.executions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_granted_executor_runs_handler() {
    let server = server();
    let moderator: Arc<dyn Permissible> =
        Arc::new(PlayerSender::new(GameProfile::offline("Mod")).grant("emmy.*"));
    let outcome = server.dispatcher.execute("ban Griefer 2h", moderator).await;

    assert_eq!(outcome.message().as_deref(), Some("banned for 7200s"));
    assert_eq!(server.executions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_duration_bounds() {
    let server = server();
    let outcome = server.dispatcher.execute("ban Griefer 1d", console()).await;
    match error_kind(&outcome) {
        DispatchErrorKind::Argument(err) => assert_eq!(err.argument, "length"),
        other => panic!("expected argument error, got {:?}", other),
    }
    assert_eq!(server.executions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_out_of_range_integer() {
    let server = server();
    let outcome = server.dispatcher.execute("give 100", console()).await;

    assert_eq!(outcome.result_kind(), ResultKind::InvalidSyntax);
    assert_eq!(
        render_plain(&outcome),
        "Invalid command: Invalid value for 'amount': Value 100 is outside the range 1..=64"
    );
    assert_eq!(outcome.error().and_then(|err| err.span()).map(|span| span.start), Some(5));
}

#[tokio::test]
async fn test_unknown_choice() {
    let server = server();
    let outcome = server.dispatcher.execute("gamemode CREATIVE", console()).await;
    assert_eq!(outcome.message().as_deref(), Some("creative"));

    let outcome = server.dispatcher.execute("gamemode hardcore", console()).await;
    assert!(matches!(error_kind(&outcome), DispatchErrorKind::Argument(_)));
}

#[tokio::test]
async fn test_resolver_failure_is_the_source() {
    let server = server();
    let outcome = server.dispatcher.execute("tp Ghost PlayerA", console()).await;

    let DispatchErrorKind::Argument(err) = error_kind(&outcome) else {
        panic!("expected argument error");
    };
    assert_eq!(err.argument, "from");
    let source = err.source().expect("resolver failure should be the source");
    assert!(source.to_string().contains("No record found for 'Ghost'"));
    assert_eq!(*server.lookups.lock(), vec!["Ghost"]);
}

#[tokio::test]
async fn test_text_glued_to_closing_quote_is_rejected() {
    let server = server();
    let outcome = server.dispatcher.execute(r#"say "hello"world"#, console()).await;

    assert_eq!(outcome.result_kind(), ResultKind::InvalidSyntax);
    match error_kind(&outcome) {
        DispatchErrorKind::Parse(err) => {
            assert_eq!(err.kind, ParseErrorKind::ExpectedWhitespace(11))
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_command() {
    let server = server();
    let outcome = server.dispatcher.execute("fly", console()).await;
    match error_kind(&outcome) {
        DispatchErrorKind::Parse(err) => {
            assert_eq!(err.kind, ParseErrorKind::UnknownCommand("fly".to_string()))
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut builder = GrammarTreeBuilder::new();
    builder
        .register(literal("heal").executes(|_| Ok(CommandOutput::success())))
        .unwrap();
    let err = builder
        .register(literal("heal").executes(|_| Ok(CommandOutput::success())))
        .unwrap_err();
    assert!(matches!(err.kind, GrammarErrorKind::DuplicateCommand(_)));

    let tree = builder.freeze();
    assert_eq!(tree.resolve(&["heal"]).map(|node| node.name()).ok(), Some("heal"));
    assert!(tree.resolve(&["hea"]).is_err());
}

#[tokio::test]
async fn test_merged_subcommand_keeps_earlier_permissions() {
    let mut builder = GrammarTreeBuilder::new();
    builder
        .register(
            literal("admin")
                .requires(Permission::has("a"))
                .then(literal("x").executes(|_| Ok(CommandOutput::success_with("x")))),
        )
        .unwrap();
    builder
        .register(
            literal("admin")
                .requires(Permission::has("b"))
                .then(literal("y").executes(|_| Ok(CommandOutput::success_with("y")))),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default());
    let holder: Arc<dyn Permissible> =
        Arc::new(PlayerSender::new(GameProfile::offline("Holder")).grant("a"));

    let outcome = dispatcher.execute("admin x", holder.clone()).await;
    assert_eq!(outcome.message().as_deref(), Some("x"));
    let outcome = dispatcher.execute("admin y", holder).await;
    assert_eq!(outcome.message().as_deref(), Some("y"));

    let outcome = dispatcher.execute("admin x", guest()).await;
    assert!(matches!(error_kind(&outcome), DispatchErrorKind::PermissionDenied(_)));
}

#[tokio::test]
async fn test_queue_runs_in_submission_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut builder = GrammarTreeBuilder::new();
    let seen = order.clone();
    builder
        .register(literal("mark").then(argument("label", string()).executes(move |ctx| {
            seen.lock().push(ctx.string("label").unwrap_or_default().to_string());
            Ok(CommandOutput::success())
        })))
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default()));
    let queue = DispatchQueue::spawn(dispatcher);

    let mut pending = Vec::new();
    for label in ["a", "b", "c", "d"] {
        let outcome = queue
            .enqueue(format!("mark {}", label), console(), Default::default())
            .await
            .unwrap();
        pending.push(outcome);
    }
    for outcome in pending {
        assert!(outcome.await.unwrap().is_success());
    }
    assert_eq!(*order.lock(), vec!["a", "b", "c", "d"]);

    queue.shutdown().await;
    let outcome = queue.submit("mark e", console()).await;
    assert!(matches!(error_kind(&outcome), DispatchErrorKind::Closed));
}
