//! Synthetic capture times spread evenly over a one-hour window.
//!
//! The first image of a batch carries the start time and the last one
//! carries exactly one hour later. Everything in between is linearly
//! interpolated with integer nanosecond arithmetic so both endpoints are
//! exact regardless of batch size.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{Result, StampError};

/// Format used for the burned-in stamp, e.g. `14 Feb 2024, 10:24:59`.
pub const STAMP_FORMAT: &str = "%d %b %Y, %H:%M:%S";

const SPAN_NANOS: i64 = 3_600 * 1_000_000_000;

fn divisor(total: usize) -> i64 {
    total.saturating_sub(1).max(1) as i64
}

/// Gap between consecutive timestamps in a batch of `total` images.
pub fn interval(total: usize) -> TimeDelta {
    TimeDelta::nanoseconds(SPAN_NANOS / divisor(total))
}

/// Last representable moment of the window opened at `start`.
///
/// Fails for starts within an hour of `NaiveDateTime::MAX`.
pub fn window_end(start: NaiveDateTime) -> Result<NaiveDateTime> {
    start
        .checked_add_signed(TimeDelta::nanoseconds(SPAN_NANOS))
        .ok_or(StampError::TimestampOutOfRange { start })
}

/// Timestamp assigned to the image at `index` in a batch of `total`.
///
/// Depends only on `(start, index, total)`, never on pixel data.
pub fn timestamp_for(start: NaiveDateTime, index: usize, total: usize) -> Result<NaiveDateTime> {
    let offset = (i128::from(SPAN_NANOS) * index as i128) / i128::from(divisor(total));
    i64::try_from(offset)
        .ok()
        .and_then(|nanos| start.checked_add_signed(TimeDelta::nanoseconds(nanos)))
        .ok_or(StampError::TimestampOutOfRange { start })
}

/// Full timestamp schedule for a batch.
pub fn timestamps(start: NaiveDateTime, total: usize) -> Result<Vec<NaiveDateTime>> {
    (0..total).map(|i| timestamp_for(start, i, total)).collect()
}

/// Render a timestamp as stamp text. Sub-second precision is dropped.
pub fn format_stamp(ts: NaiveDateTime) -> String {
    ts.format(STAMP_FORMAT).to_string()
}
