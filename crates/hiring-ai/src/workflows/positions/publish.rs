use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Job boards a finalized position can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Orbio,
    #[serde(rename = "infojobs")]
    InfoJobs,
    #[serde(rename = "linkedin")]
    LinkedIn,
}

impl Platform {
    pub const fn ordered() -> [Self; 3] {
        [Self::Orbio, Self::InfoJobs, Self::LinkedIn]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Orbio => "orbio",
            Self::InfoJobs => "infojobs",
            Self::LinkedIn => "linkedin",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Orbio => "Orbio",
            Self::InfoJobs => "InfoJobs",
            Self::LinkedIn => "LinkedIn",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|platform| platform.key().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown platform '{value}'"))
    }
}

/// Platforms selected for publication. The pinned platform can never be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSelector {
    pinned: Platform,
    selected: BTreeSet<Platform>,
}

impl Default for PublishSelector {
    fn default() -> Self {
        Self::new(Platform::Orbio)
    }
}

impl PublishSelector {
    pub fn new(pinned: Platform) -> Self {
        Self {
            pinned,
            selected: BTreeSet::from([pinned]),
        }
    }

    pub fn pinned(&self) -> Platform {
        self.pinned
    }

    /// Flips membership and returns whether the platform is selected afterwards.
    pub fn toggle(&mut self, platform: Platform) -> bool {
        if platform == self.pinned {
            return true;
        }
        if !self.selected.remove(&platform) {
            self.selected.insert(platform);
        }
        self.selected.contains(&platform)
    }

    pub fn is_selected(&self, platform: Platform) -> bool {
        self.selected.contains(&platform)
    }

    pub fn selected(&self) -> &BTreeSet<Platform> {
        &self.selected
    }

    pub fn is_valid(&self) -> bool {
        !self.selected.is_empty()
    }
}
