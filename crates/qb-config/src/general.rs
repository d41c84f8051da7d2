//! General application configuration.

use qb_core::enums::LayoutType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Layout the question page opens with.
    #[serde(default)]
    pub default_layout: LayoutType,

    /// Fixed number of grid columns. `0` fits columns to the terminal width.
    #[serde(default)]
    pub grid_columns: u16,
}
