//! End-to-end cycle as the event loop drives it: key handling mutates the
//! model, render observers mark the scheduler, the engine plans a frame.

use core_actions::{InputState, handle_key};
use core_events::{KeyCode, KeyEvent};
use core_model::TextEditorModel;
use core_render::writer::Command;
use core_render::{
    Decision, Margins, RenderDelta, RenderEngine, SharedScheduler, attach_render_observers,
};
use pretty_assertions::assert_eq;

struct Harness {
    model: TextEditorModel,
    input: InputState,
    scheduler: SharedScheduler,
    engine: RenderEngine,
}

impl Harness {
    fn new(text: &str) -> Self {
        let mut model = TextEditorModel::new(text);
        let scheduler = SharedScheduler::default();
        attach_render_observers(&mut model, &scheduler);
        Self {
            model,
            input: InputState::new(),
            scheduler,
            engine: RenderEngine::new(Margins { left: 1, top: 1 }),
        }
    }

    /// Mirrors one loop iteration: returns the decision that would be rendered.
    fn key(&mut self, key: KeyEvent) -> Option<Decision> {
        let result = handle_key(&key, &mut self.model, &mut self.input);
        if result.selection_changed {
            self.scheduler.borrow_mut().mark(RenderDelta::Selection);
        }
        self.scheduler.borrow_mut().consume()
    }
}

#[test]
fn arrow_key_yields_cursor_only_move() {
    let mut h = Harness::new("abc\ndef");
    let d = h.key(KeyEvent::plain(KeyCode::Down)).expect("decision");
    assert_eq!(d.effective, RenderDelta::CursorOnly);
    let w = h.engine.plan(&h.model, d, 80, 24);
    assert_eq!(w.commands(), &[Command::MoveTo(1, 2), Command::ShowCursor]);
}

#[test]
fn typing_repaints_full_frame() {
    let mut h = Harness::new("ac");
    h.key(KeyEvent::plain(KeyCode::Right));
    let d = h.key(KeyEvent::plain(KeyCode::Char('b'))).expect("decision");
    assert_eq!(d, Decision::full());
    let w = h.engine.plan(&h.model, d, 80, 24);
    assert!(w.commands().contains(&Command::Print("abc".into())));
    assert_eq!(
        &w.commands()[w.commands().len() - 2..],
        &[Command::MoveTo(3, 1), Command::ShowCursor]
    );
}

#[test]
fn shift_selection_paints_highlight_then_plain_arrow_clears_it() {
    let mut h = Harness::new("abcd");
    h.key(KeyEvent::shifted(KeyCode::Right));
    let d = h.key(KeyEvent::shifted(KeyCode::Right)).expect("decision");
    assert_eq!(d.semantic, RenderDelta::Selection);
    let w = h.engine.plan(&h.model, d, 80, 24);
    assert!(w.commands().contains(&Command::PrintSelected("ab".into())));
    assert!(w.commands().contains(&Command::Print("cd".into())));

    let d = h.key(KeyEvent::plain(KeyCode::Right)).expect("decision");
    assert_eq!(d.semantic, RenderDelta::Selection);
    let w = h.engine.plan(&h.model, d, 80, 24);
    assert!(
        !w.commands()
            .iter()
            .any(|c| matches!(c, Command::PrintSelected(_)))
    );
}

#[test]
fn vertical_move_at_top_renders_nothing() {
    let mut h = Harness::new("abc");
    assert_eq!(h.key(KeyEvent::plain(KeyCode::Up)), None);
}
