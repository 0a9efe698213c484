//! Forecast hub data transformations.
//!
//! - **period**: resolve static and dynamic periods to date ranges
//! - **pivot**: long-to-wide quantile reshaping and its inverse
//! - **locations**: reconcile location names across sources
//! - **partition**: slice normalised frames by period
//! - **metadata**: the descriptive bundle for the front end

pub mod error;
pub mod frame_utils;
pub mod locations;
pub mod metadata;
pub mod partition;
pub mod period;
pub mod pivot;

pub use error::{Result, TransformError};
pub use locations::reconcile_locations;
pub use metadata::{DynamicPeriodInfo, MetadataBundle, SeasonInfo, summarize};
pub use partition::{ModelOutputSlice, PartitionedData, PeriodPartition, partition_by_period};
pub use period::{AnchorDates, resolve_period};
pub use pivot::{PivotOutcome, melt_quantiles, pivot_quantiles};
