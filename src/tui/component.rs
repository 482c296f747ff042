use ratatui::Frame;
use ratatui::layout::Rect;

/// A renderable piece of the interface.
///
/// Components receive data via struct fields ("props") and may borrow
/// persistent presentation state (`&'a mut XState`) from `TuiState`.
/// `render` takes `&mut self` so a component can update that state while
/// drawing: list lengths, measured heights, scroll offsets.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
