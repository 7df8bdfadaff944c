use bevy::prelude::*;

/// `Editing` pauses the driver so cells can be drawn, `Running` lets the
/// fixed timestep advance generations.
#[derive(States, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimState {
    #[default]
    Loading,
    Editing,
    Running,
}

impl SimState {
    /// The state the start/stop key switches to, `None` while loading.
    pub fn toggled(self) -> Option<Self> {
        match self {
            Self::Loading => None,
            Self::Editing => Some(Self::Running),
            Self::Running => Some(Self::Editing),
        }
    }
}
