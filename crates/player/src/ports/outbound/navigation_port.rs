//! Navigation Port - leaving the game view

/// Port for moving the hosting shell between screens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Show the lobby (room creation and joining)
    fn return_to_lobby(&self);
}
