//! Resolving forecast periods to concrete date ranges.

use chrono::{Days, NaiveDate};
use polars::prelude::DataFrame;
use tracing::debug;

use hub_model::{AnchorMode, DateRange, ForecastPeriod, columns};

use crate::error::{Result, TransformError};
use crate::frame_utils::max_date;

/// Freshest dates available to anchor dynamic periods on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorDates {
    pub latest_target_date: Option<NaiveDate>,
    pub latest_reference_date: Option<NaiveDate>,
}

impl AnchorDates {
    pub fn new(latest_target_date: Option<NaiveDate>, latest_reference_date: Option<NaiveDate>) -> Self {
        Self {
            latest_target_date,
            latest_reference_date,
        }
    }

    /// `max(date)` of the target frame and `max(reference_date)` of the
    /// model frame.
    pub fn from_frames(target_data: &DataFrame, model_output: &DataFrame) -> Result<Self> {
        let anchors = Self {
            latest_target_date: max_date(target_data, columns::DATE)?,
            latest_reference_date: max_date(model_output, columns::REFERENCE_DATE)?,
        };
        debug!(
            latest_target_date = ?anchors.latest_target_date,
            latest_reference_date = ?anchors.latest_reference_date,
            "computed anchor dates"
        );
        Ok(anchors)
    }

    pub fn for_mode(&self, mode: AnchorMode) -> Option<NaiveDate> {
        match mode {
            AnchorMode::TargetData => self.latest_target_date,
            AnchorMode::ModelOutput => self.latest_reference_date,
        }
    }
}

/// Concrete inclusive date range of a period.
///
/// Dynamic periods end on their anchor date and start
/// `range_calculation * time_unit` days from it. The range is not clamped
/// to any static period.
pub fn resolve_period(period: &ForecastPeriod, anchors: &AnchorDates, time_unit: u32) -> Result<DateRange> {
    let dynamic = match period {
        ForecastPeriod::Static(period) => {
            return Ok(DateRange::new(period.start_date, period.end_date));
        }
        ForecastPeriod::Dynamic(dynamic) => dynamic,
    };

    let anchor = &dynamic.time_anchor;
    let end = anchors
        .for_mode(anchor.anchor_mode)
        .ok_or_else(|| TransformError::UnresolvedAnchor {
            period_id: dynamic.period_id.clone(),
            anchor_mode: anchor.anchor_mode,
        })?;

    let offset_days = anchor.range_calculation.saturating_mul(i64::from(time_unit));
    let magnitude = Days::new(offset_days.unsigned_abs());
    let start = if offset_days < 0 {
        end.checked_sub_days(magnitude)
    } else {
        end.checked_add_days(magnitude)
    }
    .ok_or_else(|| TransformError::PeriodOutOfRange {
        period_id: dynamic.period_id.clone(),
        anchor: end,
        offset_days,
    })?;

    Ok(DateRange::new(start, end))
}
