/// Lifecycle of the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Unloaded,
    Paused,
    Playing,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Unloaded
    }
}

impl PlaybackState {
    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::Unloaded)
    }
}
