/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    // Application
    Quit,
    ToggleHelp,
    DismissError,

    // Focus
    FocusNext,

    // Cursor movement in the focused pane
    CursorUp(usize),
    CursorDown(usize),
    PageUp,
    PageDown,
    CursorTop,
    CursorBottom,

    // Diagnostics pane: jump to the selected diagnostic.
    // Log pane: toggle the chunk under the cursor.
    Activate,

    // Log viewer actions
    ToggleChunk,
    NextDiagnostic,
    PrevDiagnostic,
    CopyChunk,

    // Render request
    Render,
}
