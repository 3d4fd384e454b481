use crossterm::event::KeyEvent;
use crossterm::event::MouseEvent;
use pmmap_core::TopicId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AppEvent {
    /// Raw keyboard input from the terminal.
    KeyEvent(KeyEvent),

    /// Raw mouse input from the terminal.
    MouseEvent(MouseEvent),

    /// Frame timer while an animation runs.
    Tick,

    /// Redraw without any state change (resize, focus).
    Redraw,

    /// A grid node was activated.
    ActivateTopic(TopicId),

    /// Close control or overlay activated.
    ClosePanel,

    /// Leave the event loop.
    ExitRequest,
}
