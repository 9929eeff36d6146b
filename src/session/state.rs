use serde::Serialize;

/// Lifecycle of one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Connected, no `start` seen yet
    #[default]
    AwaitingStart,
    /// `start` received
    Active,
    /// `stop` received or connection gone; further frames are no-ops
    Terminated,
}

