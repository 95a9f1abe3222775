use egui::Pos2;

use crate::command::Command;
use crate::error::{SessionError, SessionResult};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::import::{Outcome, Resolution};
use crate::page::{Background, Orientation, Page};
use crate::quiz::{QuizProgress, QuizTracker};
use crate::selection::Selection;
use crate::smart_tape;
use crate::state::GestureState;
use crate::stroke::MutableStroke;
use crate::tape::{TapeGeometry, TapeId, TapeTransform};
use crate::tools::{self, Effects, GestureContext, SelectionEffect, ToolKind, ToolSettings};

/// The owner of the active page and everything the user is doing to it.
///
/// `CanvasSession` is the single writer of page state. Pointer events are
/// routed to the handler of the active tool, which answers with a new gesture
/// state plus [`Effects`]. The session applies those effects and decides when a
/// change is *committed*:
///
/// - a committed change prunes the selection, recomputes quiz progress and
///   emits [`EditorEvent::PageCommitted`] so the app can persist it;
/// - a live change (tape sizing, tape drag, eraser sweep) mutates the page
///   immediately and is committed once when the gesture ends.
///
/// Tool changes requested mid-gesture are deferred until the gesture ends.
///
/// # Example
///
/// ```rust
/// use egui::pos2;
/// use tapenote::{CanvasSession, Page, ToolKind, ToolSettings};
///
/// let mut session = CanvasSession::new(Page::new("Biology"), ToolSettings::default());
/// session.set_tool(ToolKind::Tape);
/// session.pointer_down(pos2(100.0, 100.0));
/// session.pointer_move(pos2(250.0, 100.0));
/// session.pointer_up();
///
/// assert_eq!(session.page().tapes()[0].width, 150.0);
/// ```
#[derive(Debug)]
pub struct CanvasSession {
    page: Page,
    selection: Selection,
    gesture: GestureState,
    /// Tool that started the in-flight gesture.
    gesture_tool: ToolKind,
    tool: ToolKind,
    pending_tool: Option<ToolKind>,
    settings: ToolSettings,
    quiz: QuizTracker,
    /// Name of the last live change not yet committed.
    uncommitted: Option<&'static str>,
    last_background_sequence: Option<u64>,
    event_bus: EventBus,
}

impl CanvasSession {
    pub fn new(page: Page, settings: ToolSettings) -> Self {
        Self {
            page,
            selection: Selection::new(),
            gesture: GestureState::Idle,
            gesture_tool: ToolKind::default(),
            tool: ToolKind::default(),
            pending_tool: None,
            settings,
            quiz: QuizTracker::new(),
            uncommitted: None,
            last_background_sequence: None,
            event_bus: EventBus::new(),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// A tool change waiting for the current gesture to end.
    pub fn pending_tool(&self) -> Option<ToolKind> {
        self.pending_tool
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn quiz(&self) -> &QuizTracker {
        &self.quiz
    }

    pub fn quiz_progress(&self) -> QuizProgress {
        QuizProgress::of(&self.page)
    }

    pub fn in_progress_stroke(&self) -> Option<&MutableStroke> {
        self.gesture.stroke()
    }

    pub fn lasso_path(&self) -> Option<&[Pos2]> {
        self.gesture.lasso_path()
    }

    /// Swap in another page and hand back the outgoing one.
    ///
    /// Any in-flight gesture is finished first so its live changes land on the
    /// page they were made on. Selection and quiz do not carry over.
    pub fn replace_page(&mut self, page: Page) -> Page {
        if !self.gesture.is_idle() {
            self.pointer_up();
        }
        self.end_quiz();
        self.set_selection(Selection::new());
        self.last_background_sequence = None;
        let outgoing = std::mem::replace(&mut self.page, page);
        log::info!("Switched page {} -> {}", outgoing.id, self.page.id);
        outgoing
    }

    /// Apply and commit one patch. Returns false if nothing changed.
    pub fn apply_page_update(&mut self, command: Command) -> bool {
        let changed = command.execute(&mut self.page);
        if changed {
            self.commit(command.name());
        } else {
            log::debug!("{} changed nothing", command.name());
        }
        changed
    }

    fn apply_live(&mut self, command: Command) -> bool {
        let changed = command.execute(&mut self.page);
        if changed {
            self.uncommitted = Some(command.name());
        }
        changed
    }

    fn flush_live(&mut self) {
        if let Some(name) = self.uncommitted.take() {
            self.commit(name);
        }
    }

    fn commit(&mut self, name: &'static str) {
        if self.selection.prune(&self.page) {
            self.emit_selection();
        }
        self.observe_quiz();
        log::info!("Committed {name} on page {}", self.page.id);
        self.event_bus.emit(EditorEvent::PageCommitted {
            page_id: self.page.id.clone(),
            command: name,
        });
    }

    fn observe_quiz(&mut self) {
        if !self.quiz.is_active() {
            return;
        }
        let before = self.quiz.progress();
        let completed = self.quiz.observe(&self.page);
        let after = self.quiz.progress();
        if after != before {
            self.event_bus.emit(EditorEvent::QuizProgressed(after));
        }
        if completed {
            log::info!("Quiz complete: {} of {} revealed", after.current, after.total);
            self.event_bus.emit(EditorEvent::QuizCompleted {
                page_id: self.page.id.clone(),
                total: after.total,
            });
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection != selection {
            self.selection = selection;
            self.emit_selection();
        }
    }

    fn emit_selection(&self) {
        self.event_bus.emit(EditorEvent::SelectionChanged {
            selected: self.selection.ids(),
        });
    }

    fn transition_to(&mut self, next: GestureState) -> SessionResult<()> {
        if !self.gesture.can_transition_to(&next) {
            return Err(SessionError::InvalidTransition {
                from: self.gesture.name(),
                to: next.name(),
            });
        }
        let old = self.gesture.name();
        self.gesture = next;
        let new = self.gesture.name();
        if old != new {
            log::debug!("Gesture {old} -> {new}");
            self.event_bus.emit(EditorEvent::GestureChanged { old, new });
        }
        Ok(())
    }

    /// Select a tool. Takes effect now when idle, otherwise when the current
    /// gesture ends.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.gesture.is_idle() {
            self.switch_tool(tool);
        } else {
            log::debug!("Deferring tool change to {} until {} ends", tool.name(), self.gesture.name());
            self.pending_tool = Some(tool);
        }
    }

    fn switch_tool(&mut self, tool: ToolKind) {
        let old = self.tool;
        if old == tool {
            return;
        }
        self.tool = tool;
        log::debug!("Tool {} -> {}", old.name(), tool.name());
        self.event_bus.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring pointer down during {}", self.gesture.name());
            return;
        }

        let handler = tools::handler_for(self.tool);
        let ctx = GestureContext {
            page: &self.page,
            settings: &self.settings,
        };
        let (next, effects) = handler.pointer_down(pos, &ctx);

        if let Err(e) = self.transition_to(next) {
            log::error!("{} pointer down: {e}", handler.name());
            return;
        }
        self.gesture_tool = self.tool;
        let live = !self.gesture.is_idle();
        self.apply_effects(effects, live);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        if self.gesture.is_idle() {
            return;
        }
        let handler = tools::handler_for(self.gesture_tool);
        let ctx = GestureContext {
            page: &self.page,
            settings: &self.settings,
        };
        let effects = handler.pointer_move(&mut self.gesture, pos, &ctx);
        self.apply_effects(effects, true);
    }

    pub fn pointer_up(&mut self) {
        if self.gesture.is_idle() {
            return;
        }
        let handler = tools::handler_for(self.gesture_tool);
        let finished = std::mem::take(&mut self.gesture);
        let old = finished.name();
        let ctx = GestureContext {
            page: &self.page,
            settings: &self.settings,
        };
        let effects = handler.pointer_up(finished, &ctx);

        log::debug!("Gesture {old} -> idle");
        self.event_bus.emit(EditorEvent::GestureChanged { old, new: "idle" });

        self.flush_live();
        self.apply_effects(effects, false);

        if let Some(tool) = self.pending_tool.take() {
            self.switch_tool(tool);
        }
    }

    fn apply_effects(&mut self, effects: Effects, live: bool) {
        for command in effects.commands {
            if live {
                self.apply_live(command);
            } else {
                self.apply_page_update(command);
            }
        }
        match effects.selection {
            Some(SelectionEffect::Clear) => self.set_selection(Selection::new()),
            Some(SelectionEffect::Replace(ids)) => {
                let mut selection = Selection::new();
                selection.replace(ids);
                self.selection = selection;
                self.emit_selection();
            }
            None => {}
        }
    }

    /// Topmost strip under `pos`.
    pub fn tape_at(&self, pos: Pos2) -> Option<TapeId> {
        self.page.tape_at(pos).map(|t| t.id.clone())
    }

    pub fn tape_geometry(&self, id: &TapeId) -> Option<TapeGeometry> {
        self.page.tape_geometry(id)
    }

    /// Click on a strip: toggles selection with the select tool, reveal otherwise.
    pub fn click_tape(&mut self, id: &TapeId) -> bool {
        if !self.page.has_tape(id) {
            return false;
        }
        if self.tool == ToolKind::Select {
            self.selection.toggle(id.clone());
            self.emit_selection();
            true
        } else {
            self.apply_page_update(Command::ToggleReveal(id.clone()))
        }
    }

    /// Click at a point: forwards to the topmost strip there, if any.
    pub fn click(&mut self, pos: Pos2) -> bool {
        match self.tape_at(pos) {
            Some(id) => self.click_tape(&id),
            None => false,
        }
    }

    fn movable_tape(&self, id: &TapeId) -> SessionResult<()> {
        if self.tool != ToolKind::Select {
            return Err(SessionError::WrongTool(self.tool));
        }
        match self.page.tape(id) {
            None => Err(SessionError::UnknownTape(id.clone())),
            Some(tape) if tape.is_locked => Err(SessionError::Locked(id.clone())),
            Some(_) => Ok(()),
        }
    }

    /// Live position update while a strip is dragged.
    pub fn drag_tape(&mut self, id: &TapeId, position: Pos2) -> SessionResult<()> {
        self.movable_tape(id)?;
        self.apply_live(Command::MoveTape {
            id: id.clone(),
            position,
        });
        Ok(())
    }

    /// Final position of a drag; commits it.
    pub fn end_tape_drag(&mut self, id: &TapeId, position: Pos2) -> SessionResult<()> {
        self.movable_tape(id)?;
        self.apply_live(Command::MoveTape {
            id: id.clone(),
            position,
        });
        self.flush_live();
        Ok(())
    }

    /// Live update while a transform handle is dragged.
    pub fn preview_transform(&mut self, id: &TapeId, transform: TapeTransform) -> SessionResult<()> {
        self.movable_tape(id)?;
        self.apply_live(Command::TransformTape {
            id: id.clone(),
            transform,
        });
        Ok(())
    }

    /// Commit the result of a transform-handle gesture.
    pub fn transform_tape(&mut self, id: &TapeId, transform: TapeTransform) -> SessionResult<()> {
        self.movable_tape(id)?;
        self.flush_live();
        self.apply_page_update(Command::TransformTape {
            id: id.clone(),
            transform,
        });
        Ok(())
    }

    pub fn toggle_lock(&mut self, id: &TapeId) -> bool {
        self.apply_page_update(Command::ToggleLock(id.clone()))
    }

    /// Removes every selected strip. Returns how many were on the page.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let ids = self.selection.ids();
        let present = ids.iter().filter(|id| self.page.has_tape(id)).count();
        self.apply_page_update(Command::RemoveTapes(ids));
        self.set_selection(Selection::new());
        present
    }

    pub fn set_all_revealed(&mut self, revealed: bool) -> bool {
        self.apply_page_update(Command::SetAllRevealed(revealed))
    }

    /// Appends one strip per keyword and returns their ids.
    pub fn place_keyword_tapes<S: AsRef<str>>(&mut self, keywords: &[S]) -> Vec<TapeId> {
        let tapes = smart_tape::tapes_for_keywords(keywords);
        let ids: Vec<TapeId> = tapes.iter().map(|t| t.id.clone()).collect();
        if !tapes.is_empty() {
            log::info!("Smart tape placed {} strips", tapes.len());
            self.apply_page_update(Command::AddTapes(tapes));
        }
        ids
    }

    pub fn undo(&mut self) -> bool {
        self.apply_page_update(Command::UndoStroke)
    }

    pub fn clear_page(&mut self) -> bool {
        self.apply_page_update(Command::ClearPage)
    }

    pub fn set_background(&mut self, background: Background) -> bool {
        if self.page.background == background {
            return false;
        }
        self.apply_page_update(Command::SetBackground(background))
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        let orientation = self.page.orientation.toggled();
        self.apply_page_update(Command::SetOrientation(orientation));
        orientation
    }

    pub fn rename(&mut self, title: impl Into<String>) -> bool {
        self.apply_page_update(Command::Rename(title.into()))
    }

    /// Hide every strip and start counting reveals. Refuses a page without tape.
    pub fn start_quiz(&mut self) -> bool {
        if self.page.tapes().is_empty() {
            log::debug!("Not starting a quiz on a page without tape");
            return false;
        }
        self.quiz.end();
        self.apply_page_update(Command::SetAllRevealed(false));
        if !self.quiz.start(&self.page) {
            return false;
        }
        self.event_bus.emit(EditorEvent::QuizStarted {
            page_id: self.page.id.clone(),
            total: self.quiz.started_with(),
        });
        true
    }

    pub fn end_quiz(&mut self) {
        if self.quiz.is_active() {
            self.quiz.end();
            self.event_bus.emit(EditorEvent::QuizEnded {
                page_id: self.page.id.clone(),
            });
        }
    }

    /// Apply a finished import or keyword request as one page update.
    ///
    /// Returns false when the resolution was stale, failed or changed nothing.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> bool {
        let Resolution {
            page_id,
            sequence,
            outcome,
        } = resolution;

        if page_id != self.page.id {
            log::debug!("Discarding request #{sequence} for inactive page {page_id}");
            return false;
        }

        match outcome {
            Outcome::Background { result, title } => {
                if self.last_background_sequence.is_some_and(|last| sequence < last) {
                    log::debug!("Discarding stale background #{sequence}");
                    return false;
                }
                match result {
                    Ok(image) => {
                        self.last_background_sequence = Some(sequence);
                        self.apply_page_update(Command::SetBackgroundImage(Some(image)));
                        if let Some(title) = title {
                            self.rename(title);
                        }
                        true
                    }
                    Err(e) => {
                        log::warn!("Import #{sequence} failed: {e}");
                        self.event_bus.emit(EditorEvent::ImportFailed {
                            page_id,
                            message: e.to_string(),
                        });
                        false
                    }
                }
            }
            Outcome::Keywords(keywords) => !self.place_keyword_tapes(&keywords).is_empty(),
        }
    }
}
