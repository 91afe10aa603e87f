mod diagnostic_tree;
mod help_overlay;
mod status_bar;

pub use diagnostic_tree::{DiagnosticTreePane, truncate_to_width};
pub use help_overlay::HelpOverlay;
pub use status_bar::{StatusBar, viewer_hints};
