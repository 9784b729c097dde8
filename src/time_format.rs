//! Server timestamps arrive as naive UTC (`2026-01-06 07:13:29`) and are
//! shown in the viewer's local time at minute precision (`2026-01-06 15:13`).

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{PrimitiveDateTime, UtcOffset};
use tracing::debug;

const SERVER_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DISPLAY_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, thiserror::Error)]
pub enum TimeFormatError {
    #[error("invalid timestamp {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: time::error::Parse,
    },

    #[error("timestamp {0:?} is out of range for the local offset")]
    OutOfRange(String),

    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}

/// Convert a UTC server timestamp to local display time.
pub fn format_local_time(utc: &str) -> Result<String, TimeFormatError> {
    format_time_with_offset(utc, local_offset())
}

/// Convert a UTC server timestamp to display time at a fixed offset.
pub fn format_time_with_offset(utc: &str, offset: UtcOffset) -> Result<String, TimeFormatError> {
    let parsed =
        PrimitiveDateTime::parse(utc, SERVER_TIME_FORMAT).map_err(|source| TimeFormatError::Parse {
            input: utc.to_string(),
            source,
        })?;
    let local = parsed
        .assume_utc()
        .checked_to_offset(offset)
        .ok_or_else(|| TimeFormatError::OutOfRange(utc.to_string()))?;
    Ok(local.format(DISPLAY_TIME_FORMAT)?)
}

/// The process's local UTC offset, or UTC when the platform won't tell us.
pub fn local_offset() -> UtcOffset {
    match UtcOffset::current_local_offset() {
        Ok(offset) => offset,
        Err(err) => {
            debug!(%err, "local offset unavailable, using UTC");
            UtcOffset::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn test_converts_to_offset_and_drops_seconds() {
        assert_eq!(
            format_time_with_offset("2026-01-06 07:13:29", offset!(+8)).unwrap(),
            "2026-01-06 15:13"
        );
        assert_eq!(
            format_time_with_offset("2026-01-06 07:13:59", UtcOffset::UTC).unwrap(),
            "2026-01-06 07:13"
        );
    }

    #[test]
    fn test_crosses_day_and_year_boundaries() {
        assert_eq!(
            format_time_with_offset("2026-01-01 02:05:00", offset!(-5)).unwrap(),
            "2025-12-31 21:05"
        );
        assert_eq!(
            format_time_with_offset("2025-12-31 20:30:00", offset!(+5:30)).unwrap(),
            "2026-01-01 02:00"
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in [
            "",
            "yesterday",
            "2026-01-06",
            "2026-01-06T07:13:29Z",
            "2026-13-06 07:13:29",
            "2026-01-06 07:13",
        ] {
            let err = format_time_with_offset(input, UtcOffset::UTC).unwrap_err();
            assert!(
                matches!(err, TimeFormatError::Parse { .. }),
                "{input:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_local_time_has_display_shape() {
        let formatted = format_local_time("2026-01-06 07:13:29").unwrap();
        assert_eq!(formatted.len(), "2026-01-06 07:13".len());
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[13..14], ":");
    }
}
