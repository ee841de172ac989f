use application::StorySessionController;
use domain::{SessionStatus, StoryId, HISTORY_CAPACITY};
use domain::generation::FALLBACK_FAILURE_MESSAGE;
use infrastructure::story_files::DirectorySaver;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use tests::{MemorySaver, RecordingClipboard, Reply, ScriptedGenerator};

struct Harness {
    controller: StorySessionController<ScriptedGenerator>,
    generator: ScriptedGenerator,
    clipboard: RecordingClipboard,
    saver: MemorySaver,
}

fn harness(replies: Vec<Reply>) -> Harness {
    let generator = ScriptedGenerator::with_replies(replies);
    let clipboard = RecordingClipboard::default();
    let saver = MemorySaver::default();
    let controller = StorySessionController::new(
        generator.clone(),
        Box::new(clipboard.clone()),
        Box::new(saver.clone()),
    );
    Harness {
        controller,
        generator,
        clipboard,
        saver,
    }
}

#[tokio::test]
async fn test_dragon_library_example() {
    let mut h = harness(vec![Reply::Story("Once upon a time...".into())]);

    let status = h.controller.request_generation("a dragon and a library").await;

    assert_eq!(status, SessionStatus::Ready);
    let story = h.controller.state().current_story().unwrap();
    assert_eq!(story.prompt().as_str(), "a dragon and a library");
    assert_eq!(story.content(), "Once upon a time...");
    let first = h.controller.history().latest().unwrap();
    assert_eq!(first, story);
    assert!(h.controller.state().error_message().is_none());
}

#[tokio::test]
async fn test_blank_prompts_change_nothing() {
    let mut h = harness(vec![]);
    h.controller.request_generation("seed").await;
    let before_len = h.controller.history().len();
    let before_story = h.controller.state().current_story().cloned();

    for blank in ["", "   ", "\n\t  \n"] {
        let status = h.controller.request_generation(blank).await;
        assert_eq!(status, SessionStatus::Ready);
    }

    assert_eq!(h.controller.history().len(), before_len);
    assert_eq!(h.controller.state().current_story().cloned(), before_story);
    assert_eq!(h.generator.prompts(), vec!["seed".to_string()]);
}

#[tokio::test]
async fn test_prompt_sent_to_generator_is_trimmed() {
    let mut h = harness(vec![]);
    h.controller.request_generation("   a quiet moon  \n").await;
    assert_eq!(h.generator.prompts(), vec!["a quiet moon".to_string()]);
    assert_eq!(
        h.controller.state().current_story().unwrap().prompt().as_str(),
        "a quiet moon"
    );
}

#[tokio::test]
async fn test_eleven_generations_keep_last_ten_newest_first() {
    let mut h = harness(vec![]);
    let prompts: Vec<String> = (1..=11).map(|n| format!("prompt {n}")).collect();

    for prompt in &prompts {
        assert_eq!(h.controller.request_generation(prompt).await, SessionStatus::Ready);
        assert!(h.controller.history().len() <= HISTORY_CAPACITY);
    }

    let stored: Vec<String> = h
        .controller
        .history()
        .iter()
        .map(|story| story.prompt().as_str().to_string())
        .collect();
    let expected: Vec<String> = prompts.iter().skip(1).rev().cloned().collect();
    assert_eq!(stored.len(), HISTORY_CAPACITY);
    assert_eq!(stored, expected);
    assert!(!stored.contains(&"prompt 1".to_string()));
}

#[tokio::test]
async fn test_ids_are_unique_across_rapid_generations() {
    let mut h = harness(vec![]);
    for n in 0..10 {
        h.controller.request_generation(&format!("idea {n}")).await;
    }
    let ids: HashSet<StoryId> = h.controller.history().iter().map(|s| s.id()).collect();
    assert_eq!(ids.len(), 10);

    let ordered: Vec<u64> = h.controller.history().iter().map(|s| s.id().as_millis()).collect();
    assert!(ordered.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn test_failure_surfaces_message_and_keeps_history() {
    let mut h = harness(vec![
        Reply::Story("first".into()),
        Reply::Fail(Some("Ollama API error (503): overloaded".into())),
    ]);
    h.controller.request_generation("one").await;
    assert_eq!(h.controller.history().len(), 1);

    let status = h.controller.request_generation("two").await;

    assert_eq!(status, SessionStatus::Failed);
    assert!(h.controller.state().current_story().is_none());
    assert_eq!(
        h.controller.state().error_message(),
        Some("Ollama API error (503): overloaded")
    );
    assert_eq!(h.controller.history().len(), 1);
}

#[tokio::test]
async fn test_failure_without_message_uses_fallback() {
    let mut h = harness(vec![Reply::Fail(None)]);
    h.controller.request_generation("anything").await;
    assert_eq!(h.controller.state().error_message(), Some(FALLBACK_FAILURE_MESSAGE));
}

#[tokio::test]
async fn test_failed_session_recovers_on_next_request() {
    let mut h = harness(vec![Reply::Fail(Some("offline".into())), Reply::Story("back".into())]);
    assert_eq!(h.controller.request_generation("a").await, SessionStatus::Failed);
    assert_eq!(h.controller.request_generation("b").await, SessionStatus::Ready);
    assert!(h.controller.state().error_message().is_none());
    assert_eq!(h.controller.state().current_story().unwrap().content(), "back");
}

#[tokio::test]
async fn test_hung_generator_times_out() {
    let generator = ScriptedGenerator::with_replies(vec![Reply::Hang]);
    let mut controller = StorySessionController::new(
        generator,
        Box::new(RecordingClipboard::default()),
        Box::new(MemorySaver::default()),
    )
    .with_timeout(Duration::from_millis(50));

    let status = controller.request_generation("slow").await;

    assert_eq!(status, SessionStatus::Failed);
    assert_eq!(
        controller.state().error_message(),
        Some("Story generation timed out after 50 ms")
    );
    assert!(controller.history().is_empty());
}

#[tokio::test]
async fn test_select_from_history_keeps_order() {
    let mut h = harness(vec![]);
    for prompt in ["alpha", "beta", "gamma"] {
        h.controller.request_generation(prompt).await;
    }
    let order_before: Vec<StoryId> = h.controller.history().iter().map(|s| s.id()).collect();
    let oldest = h.controller.history().iter().last().unwrap().clone();

    assert!(h.controller.select_from_history(oldest.id()));

    assert_eq!(h.controller.state().current_story(), Some(&oldest));
    assert_eq!(h.controller.state().status(), SessionStatus::Ready);
    let order_after: Vec<StoryId> = h.controller.history().iter().map(|s| s.id()).collect();
    assert_eq!(order_before, order_after);
}

#[tokio::test]
async fn test_select_unknown_id_is_noop() {
    let mut h = harness(vec![]);
    h.controller.request_generation("alpha").await;
    let current = h.controller.state().current_story().cloned();
    assert!(!h.controller.select_from_history(StoryId::from_millis(1)));
    assert_eq!(h.controller.state().current_story().cloned(), current);
}

#[tokio::test]
async fn test_copy_and_download_need_a_story() {
    let mut h = harness(vec![Reply::Fail(None)]);
    assert!(!h.controller.copy_current_story().unwrap());
    assert!(h.controller.download_current_story().unwrap().is_none());

    h.controller.request_generation("doomed").await;
    assert!(!h.controller.copy_current_story().unwrap());
    assert!(h.controller.download_current_story().unwrap().is_none());

    assert!(h.clipboard.copied().is_empty());
    assert!(h.saver.files().is_empty());
}

#[tokio::test]
async fn test_copy_and_download_current_story() {
    let mut h = harness(vec![Reply::Story("The owl kept the keys.".into())]);
    h.controller.request_generation("an owl").await;
    let story = h.controller.state().current_story().unwrap().clone();

    assert!(h.controller.copy_current_story().unwrap());
    let path = h.controller.download_current_story().unwrap().unwrap();

    assert_eq!(h.clipboard.copied(), vec!["The owl kept the keys.".to_string()]);
    assert_eq!(
        h.saver.files(),
        vec![(format!("story-{}.txt", story.id()), "The owl kept the keys.".to_string())]
    );
    assert!(path.ends_with(format!("story-{}.txt", story.id())));
    assert_eq!(h.controller.state().status(), SessionStatus::Ready);
}

#[tokio::test]
async fn test_download_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let mut controller = StorySessionController::new(
        ScriptedGenerator::with_replies(vec![Reply::Story("Moonlight.".into())]),
        Box::new(RecordingClipboard::default()),
        Box::new(DirectorySaver::new(temp_dir.path())),
    );
    controller.request_generation("moon").await;

    let first = controller.download_current_story().unwrap().unwrap();
    let second = controller.download_current_story().unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "Moonlight.");
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "Moonlight.");
}

#[tokio::test]
async fn test_two_phase_generation_ignores_double_submit() {
    let mut h = harness(vec![Reply::Story("only once".into())]);

    let ticket = h.controller.begin_generation("first").unwrap();
    assert_eq!(h.controller.state().status(), SessionStatus::Generating);
    assert!(h.controller.begin_generation("second").is_none());

    let outcome = h.controller.run_ticket(&ticket).await;
    assert!(h.controller.complete_generation(ticket, outcome));

    assert_eq!(h.generator.prompts(), vec!["first".to_string()]);
    assert_eq!(h.controller.history().len(), 1);
    assert_eq!(h.controller.state().current_story().unwrap().content(), "only once");
}
