//! Behavior of the design session façade.

mod common;

use std::sync::Arc;
use std::time::Duration;

use studio_core::{
    Background, CanvasFormat, Document, DocumentError, Element, ElementId, ElementKind,
    ElementPatch, Placement, Platform,
};
use studio_session::{
    CloseMode, DesignSession, SaveStatus, SessionConfig, SessionError, SyncConfig,
};

use common::{wait_for_status, RecordingStore, ScriptedCompliance, StubRenderer};

fn test_config(store: &RecordingStore, renderer: &StubRenderer) -> SessionConfig {
    let sync = SyncConfig::new(Platform::Meta, CanvasFormat::Square)
        .with_save_debounce(Duration::from_millis(1000))
        .with_check_debounce(Duration::from_secs(600));
    SessionConfig::new(
        Arc::new(store.clone()),
        Arc::new(ScriptedCompliance::new()),
        Arc::new(renderer.clone()),
        sync,
    )
}

fn open_session(store: &RecordingStore, renderer: &StubRenderer) -> DesignSession {
    DesignSession::open(test_config(store, renderer), Document::new(1080, 1080))
}

fn text_at(content: &str, x: f32, y: f32, width: f32, height: f32) -> Element {
    Element::new(ElementKind::text(content)).with_placement(Placement::at(x, y, width, height))
}

#[tokio::test(start_paused = true)]
async fn test_blank_document_edit_undo_and_stale_removal() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    assert_eq!(session.document().version, 1);
    assert!(session.document().is_empty());

    let id = session
        .add_element(text_at("Hi", 10.0, 10.0, 50.0, 20.0))
        .expect("add");
    assert_eq!(session.document().version, 2);
    assert_eq!(session.document().element_count(), 1);
    assert!(session.document().contains(id));

    let restored = session.undo().expect("undo").clone();
    assert_eq!(restored.version, 1);
    assert!(restored.is_empty());

    let result = session.remove_element(ElementId::new());
    assert!(matches!(
        result,
        Err(SessionError::Document(DocumentError::NotFound(_)))
    ));
    assert_eq!(session.document().version, 1, "failed edits change nothing");
}

#[tokio::test(start_paused = true)]
async fn test_edit_after_undo_discards_redo_branch() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());

    session
        .add_element(text_at("a", 0.0, 0.0, 10.0, 10.0))
        .expect("add a");
    session
        .add_element(text_at("b", 20.0, 0.0, 10.0, 10.0))
        .expect("add b");
    session.undo().expect("undo");
    assert!(session.can_redo());

    session
        .add_element(text_at("c", 40.0, 0.0, 10.0, 10.0))
        .expect("add c");
    assert!(!session.can_redo());
    assert!(session.redo().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_opacity_patch_is_clamped_not_rejected() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    let id = session
        .add_element(text_at("dim", 0.0, 0.0, 10.0, 10.0))
        .expect("add");

    session
        .update_element(id, &ElementPatch::opacity(1.5))
        .expect("clamp high");
    let opacity = session.document().element(id).expect("el").placement.opacity;
    assert!((opacity - 1.0).abs() < f32::EPSILON);

    session
        .update_element(id, &ElementPatch::opacity(-0.2))
        .expect("clamp low");
    let opacity = session.document().element(id).expect("el").placement.opacity;
    assert!(opacity.abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_removing_selected_element_clears_selection_atomically() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    let id = session
        .add_element(text_at("pick me", 0.0, 0.0, 10.0, 10.0))
        .expect("add");

    session.select(&[id]).expect("select");
    assert_eq!(session.selection(), &[id]);

    session.remove_element(id).expect("remove");
    assert!(
        session.selection().is_empty(),
        "selection must never reference a removed element"
    );
}

#[tokio::test(start_paused = true)]
async fn test_selecting_unknown_element_is_rejected() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    let result = session.select(&[ElementId::new()]);
    assert!(matches!(
        result,
        Err(SessionError::Document(DocumentError::NotFound(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_undo_after_selection_drops_vanished_elements() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    let id = session
        .add_element(text_at("ephemeral", 0.0, 0.0, 10.0, 10.0))
        .expect("add");
    session.select(&[id]).expect("select");

    session.undo().expect("undo removes the element");
    assert!(session.selection().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_export_renders_the_committed_document() {
    let store = RecordingStore::new();
    let renderer = StubRenderer::new();
    let mut session = open_session(&store, &renderer);
    session
        .add_element(text_at("export me", 0.0, 0.0, 10.0, 10.0))
        .expect("add");

    let bytes = session.export_as("png").await.expect("export");
    assert!(!bytes.is_empty());
    assert_eq!(
        renderer.rendered_versions(),
        vec![session.document().version],
        "export must see the committed revision"
    );
}

#[tokio::test(start_paused = true)]
async fn test_export_rejects_unsupported_format() {
    let store = RecordingStore::new();
    let session = open_session(&store, &StubRenderer::new());
    let result = session.export_as("gif").await;
    assert!(matches!(result, Err(SessionError::UnsupportedFormat(_))));
}

#[tokio::test(start_paused = true)]
async fn test_set_background_is_one_history_entry() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    session
        .set_background(Background::Color("#222222".to_string()))
        .expect("background");
    assert_eq!(session.document().version, 2);
    session.undo().expect("undo");
    assert_eq!(
        session.document().background,
        Background::Color("#ffffff".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_close_flush_writes_pending_revision() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    session
        .add_element(text_at("almost lost", 0.0, 0.0, 10.0, 10.0))
        .expect("add");

    session.close(CloseMode::Flush).await.expect("close");
    assert!(session.is_closed());
    assert_eq!(store.put_count(), 1, "pending work is flushed, not dropped");

    let result = session.add_element(text_at("late", 0.0, 0.0, 10.0, 10.0));
    assert!(matches!(result, Err(SessionError::Closed)));
}

#[tokio::test(start_paused = true)]
async fn test_close_discard_abandons_pending_revision() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    session
        .add_element(text_at("discarded", 0.0, 0.0, 10.0, 10.0))
        .expect("add");

    session.close(CloseMode::Discard).await.expect("close");
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.put_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_flush_fails_while_save_in_flight() {
    let store = RecordingStore::new().with_latency(Duration::from_millis(300));
    let mut session = open_session(&store, &StubRenderer::new());
    let mut status = session.status_watch();

    session
        .add_element(text_at("inflight", 0.0, 0.0, 10.0, 10.0))
        .expect("add");
    wait_for_status(&mut status, SaveStatus::Saving).await;

    let result = session.close(CloseMode::Flush).await;
    assert!(matches!(result, Err(SessionError::PendingSave)));
    assert!(!session.is_closed());

    session.close(CloseMode::Discard).await.expect("discard");
    assert!(session.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_undo_during_in_flight_save_wins_the_followup() {
    let store = RecordingStore::new().with_latency(Duration::from_millis(300));
    let mut session = open_session(&store, &StubRenderer::new());
    let mut status = session.status_watch();

    session
        .add_element(text_at("transient", 0.0, 0.0, 10.0, 10.0))
        .expect("add");
    wait_for_status(&mut status, SaveStatus::Saving).await;

    // Undo while the put is in flight; the cursor moves now and stays put
    session.undo().expect("undo");
    assert_eq!(session.document().version, 1);

    wait_for_status(&mut status, SaveStatus::Saved).await;
    let puts = store.puts();
    assert_eq!(puts.len(), 2);
    assert!(
        puts[1].1.is_empty(),
        "the follow-up save carries the restored state"
    );
    assert_eq!(
        session.document().version,
        1,
        "a resolving save never moves the history cursor"
    );
}

#[tokio::test(start_paused = true)]
async fn test_save_status_transitions_through_lifecycle() {
    let store = RecordingStore::new();
    let mut session = open_session(&store, &StubRenderer::new());
    let mut status = session.status_watch();

    // Opening a new document schedules its first save
    assert_eq!(session.save_status(), SaveStatus::Unsaved);
    session
        .add_element(text_at("x", 0.0, 0.0, 10.0, 10.0))
        .expect("add");
    assert_eq!(session.save_status(), SaveStatus::Unsaved);

    wait_for_status(&mut status, SaveStatus::Saved).await;
    assert!(!session.is_dirty());
}
