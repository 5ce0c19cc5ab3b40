use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collaborator::CollaboratorError;

/// Which view the sidebar shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SidebarTab {
    #[default]
    Explorer,
    Search,
    SourceControl,
    Remote,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 4] = [
        SidebarTab::Explorer,
        SidebarTab::Search,
        SidebarTab::SourceControl,
        SidebarTab::Remote,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Explorer => "Explorer",
            Self::Search => "Search",
            Self::SourceControl => "Source Control",
            Self::Remote => "Remote",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Search => "search",
            Self::SourceControl => "sourceControl",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for SidebarTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SidebarTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sidebar tab: {s}"))
    }
}

/// Panel state persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    /// `None` until a width has been committed once.
    pub sidebar_width: Option<f64>,
    pub sidebar_tab: SidebarTab,
}

/// Storage for [`PanelState`]. Read at mount, written on every committed
/// width or tab change.
#[async_trait::async_trait]
pub trait UiStateStore: Send + Sync {
    async fn load(&self) -> Result<PanelState, CollaboratorError>;

    async fn save_width(&self, width: f64) -> Result<(), CollaboratorError>;

    async fn save_tab(&self, tab: SidebarTab) -> Result<(), CollaboratorError>;
}

#[async_trait::async_trait]
impl<T: UiStateStore + ?Sized> UiStateStore for Arc<T> {
    async fn load(&self) -> Result<PanelState, CollaboratorError> {
        (**self).load().await
    }

    async fn save_width(&self, width: f64) -> Result<(), CollaboratorError> {
        (**self).save_width(width).await
    }

    async fn save_tab(&self, tab: SidebarTab) -> Result<(), CollaboratorError> {
        (**self).save_tab(tab).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_serialize_camel_case() {
        let json = serde_json::to_string(&SidebarTab::SourceControl).unwrap();
        assert_eq!(json, "\"sourceControl\"");
        let tab: SidebarTab = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(tab, SidebarTab::Remote);
    }

    #[test]
    fn tab_parse_matches_display() {
        for tab in SidebarTab::ALL {
            assert_eq!(tab.to_string().parse::<SidebarTab>(), Ok(tab));
        }
        assert!("sidebar".parse::<SidebarTab>().is_err());
    }

    #[test]
    fn default_state_is_explorer_without_width() {
        let state = PanelState::default();
        assert_eq!(state.sidebar_tab, SidebarTab::Explorer);
        assert_eq!(state.sidebar_width, None);
    }
}
