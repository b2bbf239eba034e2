//! Hub widget layout

use serde::{Deserialize, Serialize};
use tierwise_resolver::ResolvedConfiguration;

use super::ViewError;
use crate::config::keys;

/// Widgets to render, in order, and widgets the viewer has hidden
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubLayout {
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
}

impl HubLayout {
    pub fn from_resolved(config: &ResolvedConfiguration) -> Result<Self, ViewError> {
        let widgets = config
            .list(keys::WIDGETS)
            .ok_or(ViewError::Missing(keys::WIDGETS))?;

        let (visible, hidden): (Vec<_>, Vec<_>) = widgets.iter().partition(|w| w.visible);
        Ok(Self {
            visible: visible.into_iter().map(|w| w.id.to_string()).collect(),
            hidden: hidden.into_iter().map(|w| w.id.to_string()).collect(),
        })
    }
}
