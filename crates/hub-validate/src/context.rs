use chrono::NaiveDate;
use hub_model::{ColorPalette, LocalDataDirs, LocationReference};

/// Read-only collaborators injected into validation.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Reference date for the frozen-anchor rule.
    pub today: NaiveDate,
    pub locations: LocationReference,
    pub palette: ColorPalette,
    pub local_dirs: LocalDataDirs,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            locations: LocationReference::default(),
            palette: ColorPalette::default(),
            local_dirs: LocalDataDirs::default(),
        }
    }

    pub fn with_locations(mut self, locations: LocationReference) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_local_dirs(mut self, local_dirs: LocalDataDirs) -> Self {
        self.local_dirs = local_dirs;
        self
    }
}
