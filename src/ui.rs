//! UI state mirrored by the host scene
//!
//! Panels are optional: a panel the scene doesn't wire up stays `None` and
//! toggling it is a no-op.

use serde::{Deserialize, Serialize};

pub const START_MESSAGE: &str = "Tap and drag a ball to throw it into the basket!";
pub const KEEP_SHOOTING_MESSAGE: &str = "Keep shooting!";
pub const WIN_MESSAGE: &str = "Amazing! Download to play the full game!";
pub const LOSE_MESSAGE: &str = "So close! Download to try again!";

/// Which optional UI elements the scene provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiLayout {
    pub win_panel: bool,
    pub lose_panel: bool,
    pub download_button: bool,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            win_panel: true,
            lose_panel: true,
            download_button: true,
        }
    }
}

/// Active-state of each element plus the text lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// `None` when the scene has no such panel
    pub win_panel: Option<bool>,
    pub lose_panel: Option<bool>,
    pub download_button: Option<bool>,
    /// Instruction / feedback line
    pub message: String,
    /// `Score: s/n | Time: t`
    pub hud: String,
}

impl UiState {
    /// Initial UI: end panels and download button hidden
    pub fn new(layout: UiLayout) -> Self {
        let hidden = |present: bool| present.then_some(false);
        Self {
            win_panel: hidden(layout.win_panel),
            lose_panel: hidden(layout.lose_panel),
            download_button: hidden(layout.download_button),
            message: START_MESSAGE.to_string(),
            hud: String::new(),
        }
    }

    pub fn layout(&self) -> UiLayout {
        UiLayout {
            win_panel: self.win_panel.is_some(),
            lose_panel: self.lose_panel.is_some(),
            download_button: self.download_button.is_some(),
        }
    }

    pub fn show_win_panel(&mut self) -> bool {
        set_active(&mut self.win_panel)
    }

    pub fn show_lose_panel(&mut self) -> bool {
        set_active(&mut self.lose_panel)
    }

    pub fn show_download_button(&mut self) -> bool {
        set_active(&mut self.download_button)
    }

    pub fn is_active(slot: Option<bool>) -> bool {
        slot == Some(true)
    }
}

/// Activate an optional element; false if the scene lacks it
fn set_active(slot: &mut Option<bool>) -> bool {
    match slot {
        Some(active) => {
            *active = true;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_start_hidden() {
        let ui = UiState::new(UiLayout::default());
        assert_eq!(ui.win_panel, Some(false));
        assert_eq!(ui.lose_panel, Some(false));
        assert_eq!(ui.download_button, Some(false));
        assert_eq!(ui.message, START_MESSAGE);
    }

    #[test]
    fn test_missing_panel_is_skipped() {
        let mut ui = UiState::new(UiLayout {
            win_panel: false,
            ..Default::default()
        });
        assert!(!ui.show_win_panel());
        assert_eq!(ui.win_panel, None);
        assert!(ui.show_lose_panel());
        assert!(UiState::is_active(ui.lose_panel));
    }
}
