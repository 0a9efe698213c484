use serde::{Deserialize, Serialize};

/// Colors handed out, in order, to models without an explicit `color_hex`.
pub const DEFAULT_COLOR_PALETTE: [&str; 10] = [
    "#4CAF50", "#2196F3", "#FF9800", "#9C27B0", "#F44336", "#00BCD4", "#FFEB3B", "#795548",
    "#607D8B", "#E91E63",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub color_hex: String,
    pub display_name: String,
}

/// Read-only color source used during configuration construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// Returns `None` for an empty color list.
    pub fn new(colors: impl IntoIterator<Item = String>) -> Option<Self> {
        let colors: Vec<String> = colors.into_iter().collect();
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    /// Color for the `idx`-th uncolored model; wraps around the palette.
    pub fn color_for(&self, idx: usize) -> &str {
        &self.colors[idx % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLOR_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}
