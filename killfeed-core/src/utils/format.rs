use itertools::Itertools;
use rust_decimal::{Decimal, RoundingStrategy};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const KILL_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]-[month]-[year] [hour]:[minute]");

/// `DD-MM-YYYY HH:mm` in UTC, independent of the host locale and timezone.
pub fn format_kill_time(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.to_offset(UtcOffset::UTC).format(KILL_TIME_FORMAT)
}

/// Round half away from zero and group the integer with `,` every three digits.
pub fn format_isk(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits: Vec<char> = rounded.abs().trunc().to_string().chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}
