use serde::{Deserialize, Serialize};

use super::Game;

/// Operating systems a store entry runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
}

impl Platforms {
    /// Emoji per supported OS, or "—" when none is reported
    pub fn icons(&self) -> String {
        let mut icons = String::new();
        if self.windows {
            icons.push_str("🖥️");
        }
        if self.mac {
            icons.push_str("🍎");
        }
        if self.linux {
            icons.push_str("🐧");
        }
        if icons.is_empty() {
            icons.push('—');
        }
        icons
    }
}

/// One row of a plain store search, with the listing extras a price quote does not need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub game: Game,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,

    #[serde(default)]
    pub platforms: Platforms,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_support: Option<String>,
}

impl SearchHit {
    pub fn with_metascore(mut self, metascore: impl Into<String>) -> Self {
        self.metascore = Some(metascore.into());
        self
    }

    pub fn with_platforms(mut self, platforms: Platforms) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_controller_support(mut self, support: impl Into<String>) -> Self {
        self.controller_support = Some(support.into());
        self
    }
}

impl From<Game> for SearchHit {
    fn from(game: Game) -> Self {
        Self {
            game,
            metascore: None,
            platforms: Platforms::default(),
            controller_support: None,
        }
    }
}
