use crate::IconState;

/// Display-sink operations requested by [`crate::update`]. They must be executed on the
/// thread that owns the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetTooltip { text: String },
    SetIcon { state: IconState },
    HideIcon,
}
