//! Console adapter tests against the sample grammar.

use emmy::{
    ConsolePlatformAdapter, CoreSettings, Dispatcher, GameProfile, Permissible, PlatformAdapter,
    PlayerSender, ResultKind, demo_grammar, offline_profile_cache,
};
use std::sync::Arc;

fn console(settings: &CoreSettings) -> ConsolePlatformAdapter {
    let tree = demo_grammar(offline_profile_cache(settings)).unwrap();
    ConsolePlatformAdapter::new(Arc::new(Dispatcher::new(Arc::new(tree), settings)))
}

async fn run(console: &ConsolePlatformAdapter, input: &str) -> (usize, String) {
    let mut output = Vec::new();
    let dispatched = console.run(input.as_bytes(), &mut output).await.unwrap();
    (dispatched, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_session_renders_each_result() {
    let console = console(&CoreSettings::default());
    let (dispatched, output) = run(
        &console,
        "/tp Alex Notch\n\n  say \"hello there\"  \ngive 0\nfly\n",
    )
    .await;

    assert_eq!(dispatched, 4);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Teleported Alex to Notch",
            "[CONSOLE] hello there",
            "Invalid command: Invalid value for 'amount': Value 0 is outside the range 1..=64",
            "Invalid command: Unknown command 'fly' at position 0",
        ]
    );
}

#[tokio::test]
async fn test_player_without_permission() {
    let player: Arc<dyn Permissible> = Arc::new(PlayerSender::new(GameProfile::offline("Steve")));
    let console = console(&CoreSettings::default()).with_executor(player);

    let (_, output) = run(&console, "ban Griefer\nsay hi\n").await;
    assert_eq!(
        output,
        "Error: You do not have permission to use 'ban'\n[Steve] hi\n"
    );
}

#[tokio::test]
async fn test_submit_reports_result_kind() {
    let console = console(&CoreSettings::default());
    assert_eq!(console.platform(), "console");

    let outcome = console.submit("gamemode creative", console.executor().clone()).await;
    assert_eq!(outcome.result_kind(), ResultKind::Failure);
    assert_eq!(
        console.render_result(&outcome),
        "Error: Only players can target themselves"
    );

    let outcome = console.submit("gamemode CREATIVE Alex", console.executor().clone()).await;
    assert_eq!(outcome.message().as_deref(), Some("Set Alex's game mode to creative"));
}

#[tokio::test]
async fn test_trailing_words_need_setting() {
    let strict = console(&CoreSettings::default());
    let (_, output) = run(&strict, "heal Alex now\n").await;
    assert_eq!(
        output,
        "Invalid command: Unexpected token 'now' after 'heal <target:player>' at position 10\n"
    );

    let lenient = console(&CoreSettings::default().with_allow_unregistered_arguments(true));
    let (_, output) = run(&lenient, "heal Alex now\n").await;
    assert_eq!(output, "Healed Alex\n");
}
