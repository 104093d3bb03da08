use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl ViewType {
    pub const ALL: [ViewType; 6] = [
        ViewType::Front,
        ViewType::Back,
        ViewType::Left,
        ViewType::Right,
        ViewType::Top,
        ViewType::Bottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Front => "Front",
            ViewType::Back => "Back",
            ViewType::Left => "Left",
            ViewType::Right => "Right",
            ViewType::Top => "Top",
            ViewType::Bottom => "Bottom",
        }
    }

    /// Lowercase form used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ViewType::Front => "front",
            ViewType::Back => "back",
            ViewType::Left => "left",
            ViewType::Right => "right",
            ViewType::Top => "top",
            ViewType::Bottom => "bottom",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub label: ViewType,
    pub prompt_text: &'static str,
}
