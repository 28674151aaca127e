//! Editor session: ties the editor to the persistence coordinator and owns
//! the per-page state (viewport rectangle, autosave scheduling) that the
//! host environment would otherwise keep as globals.

use crate::document::{Document, DrawingSummary};
use crate::editor::Editor;
use crate::storage::{
    LoadOutcome, LocalCache, PersistenceCoordinator, RemoteStore, SaveOutcome, StorageResult,
};
use crate::tools::Tool;
use kurbo::{Point, Rect};

/// One editing session over one document.
///
/// Pointer coordinates arrive in client space and are resolved against the
/// cached viewport rectangle. Every committed mutation (re)schedules the
/// debounced autosave; the host drives it by polling [`Session::autosave_tick`]
/// from its event loop and calls [`Session::teardown`] on page exit.
pub struct Session<R: RemoteStore, C: LocalCache> {
    pub editor: Editor,
    persistence: PersistenceCoordinator<R, C>,
    viewport: Rect,
    observed_revision: u64,
}

impl<R: RemoteStore, C: LocalCache> Session<R, C> {
    /// Create a session over an empty document.
    pub fn new(remote: R, cache: C) -> Self {
        Self::with_coordinator(Editor::new(), PersistenceCoordinator::new(remote, cache))
    }

    /// Create a session from parts (tests tune the coordinator's debounce).
    pub fn with_coordinator(editor: Editor, persistence: PersistenceCoordinator<R, C>) -> Self {
        let observed_revision = editor.revision();
        Self {
            editor,
            persistence,
            viewport: Rect::ZERO,
            observed_revision,
        }
    }

    pub fn persistence(&self) -> &PersistenceCoordinator<R, C> {
        &self.persistence
    }

    /// Cache the viewport rectangle used to resolve client coordinates.
    pub fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    fn to_canvas(&self, client: Point) -> Point {
        Point::new(client.x - self.viewport.x0, client.y - self.viewport.y0)
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.editor.set_tool(tool);
    }

    pub fn pointer_down(&mut self, client: Point) -> bool {
        let redraw = self.editor.pointer_down(self.to_canvas(client));
        self.note_edits();
        redraw
    }

    pub fn pointer_move(&mut self, client: Point) -> bool {
        // Preview frames never commit, so there is nothing to schedule.
        self.editor.pointer_move(self.to_canvas(client))
    }

    pub fn pointer_up(&mut self, client: Point) -> bool {
        let redraw = self.editor.pointer_up(self.to_canvas(client));
        self.note_edits();
        redraw
    }

    pub fn commit_text(&mut self, input: &str) -> bool {
        let committed = self.editor.commit_text(input);
        self.note_edits();
        committed
    }

    pub fn cancel_text(&mut self) {
        self.editor.cancel_text();
    }

    pub fn delete_selected(&mut self) -> bool {
        let deleted = self.editor.delete_selected();
        self.note_edits();
        deleted
    }

    pub fn clear_canvas(&mut self) {
        self.editor.clear_canvas();
        self.note_edits();
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Poll the debounced autosave; performs the save when due.
    pub async fn autosave_tick(&mut self) -> Option<StorageResult<SaveOutcome>> {
        if !self.persistence.autosave_due() {
            return None;
        }
        Some(self.save_now().await)
    }

    /// Save immediately, adopting the canonical id on first save.
    pub async fn save_now(&mut self) -> StorageResult<SaveOutcome> {
        let record = self.editor.document.to_record();
        let outcome = self.persistence.save(record).await?;
        self.editor.document.drawing_id = Some(outcome.id().to_string());
        Ok(outcome)
    }

    /// Load a drawing and adopt it as the session document. History resets
    /// to the loaded state.
    pub async fn load(&mut self, id: &str) -> StorageResult<LoadOutcome> {
        let outcome = self.persistence.load(id).await?;
        self.editor
            .replace_document(Document::from_record(outcome.record().clone()));
        self.observed_revision = self.editor.revision();
        Ok(outcome)
    }

    /// Delete a drawing from both persistence tiers.
    pub async fn delete_drawing(&self, id: &str) -> StorageResult<()> {
        self.persistence.delete(id).await
    }

    /// List locally known drawings.
    pub async fn list_drawings(&self) -> StorageResult<Vec<DrawingSummary>> {
        self.persistence.list().await
    }

    /// Page exit: cancel the pending debounce so it cannot fire after
    /// teardown, and force one immediate save if there is anything to keep.
    pub async fn teardown(&mut self) -> Option<StorageResult<SaveOutcome>> {
        self.persistence.cancel_autosave();
        if self.editor.document.store.is_empty() {
            return None;
        }
        Some(self.save_now().await)
    }

    /// Schedule an autosave if the editor committed anything since the last
    /// check.
    fn note_edits(&mut self) {
        let revision = self.editor.revision();
        if revision != self.observed_revision {
            self.observed_revision = revision;
            self.persistence.schedule_autosave();
        }
    }
}
