pub mod controls;
pub mod countdown_overlay;
pub mod debug_panel;
pub mod preview_pane;
pub mod replay_pane;
pub mod timer_label;

pub use controls::{ControlAction, Controls};
pub use countdown_overlay::CountdownOverlay;
pub use debug_panel::DebugPanel;
pub use preview_pane::PreviewPane;
pub use replay_pane::{ReplayPane, ReplayPlayer};
pub use timer_label::TimerLabel;
