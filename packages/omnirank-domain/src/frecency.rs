//! Time-decayed visit scoring for history entries.
//!
//! Each visit contributes `exp(lambda * age)` where `lambda = -ln(2) / half_life`, so a visit
//! exactly one half-life old is worth half of a visit made now. The sum is doubled, which lets
//! a single very recent visit outrank a handful of stale ones.

use time::OffsetDateTime;

use crate::item::RawItem;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Scores `item` from `visits` as seen at `now`.
///
/// A half-life of zero or less (or NaN) disables decay and returns the raw visit count.
/// Visits stamped after `now` are treated as happening at `now`.
pub fn score(
	item: &RawItem,
	half_life_days: f64,
	visits: &[OffsetDateTime],
	now: OffsetDateTime,
) -> f64 {
	if !(half_life_days > 0.0) {
		return item.visit_count.unwrap_or(0) as f64;
	}

	let lambda = decay_constant(half_life_days);
	let total: f64 = visits
		.iter()
		.map(|visit| {
			let age_ms = ((now - *visit).as_seconds_f64() * 1_000.0).max(0.0);

			(lambda * age_ms).exp()
		})
		.sum();

	2.0 * total
}

/// Scores `item` from its own `visit_timestamps`, when the adapter already attached them.
pub fn score_attached(item: &RawItem, half_life_days: f64, now: OffsetDateTime) -> f64 {
	score(item, half_life_days, item.visit_timestamps.as_deref().unwrap_or_default(), now)
}

fn decay_constant(half_life_days: f64) -> f64 {
	-std::f64::consts::LN_2 / (half_life_days * MILLIS_PER_DAY)
}
