//! Type-safe enumerations for configuration values that arrive as strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric type of the target-data observation column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationFormat {
    /// Observations are stored as 64-bit floats.
    #[default]
    Float,
    /// Observations are whole counts stored as 64-bit integers.
    Int,
}

impl ObservationFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationFormat::Float => "float",
            ObservationFormat::Int => "int",
        }
    }
}

impl fmt::Display for ObservationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "float" | "double" => Ok(ObservationFormat::Float),
            "int" | "integer" => Ok(ObservationFormat::Int),
            _ => Err(format!("Unknown observation format: {s}")),
        }
    }
}

/// On-disk format of the target-data file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFileFormat {
    #[default]
    Csv,
    /// Recognised but not readable yet; ingest rejects it.
    Parquet,
}

impl DataFileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFileFormat::Csv => "csv",
            DataFileFormat::Parquet => "parquet",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for DataFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(DataFileFormat::Csv),
            "parquet" => Ok(DataFileFormat::Parquet),
            _ => Err(format!("Unknown data file format: {s}")),
        }
    }
}
