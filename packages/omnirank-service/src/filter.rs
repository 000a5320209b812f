//! Fuzzy filter bridge.
//!
//! The matcher only produces scores. Turning those scores into candidate visibility is the
//! bridge's job, so every source shares one policy:
//! - an empty query shows everything and focuses nothing,
//! - an unmatched or below-threshold candidate is hidden,
//! - with autoselect on, the first best-scoring candidate is focused.

use std::sync::Arc;

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use serde::Serialize;

use omnirank_domain::{OptionState, merge};

/// One text a candidate can be matched by, with a multiplier applied to its score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchKey {
	pub text: String,
	pub weight: f64,
}
impl MatchKey {
	pub fn new(text: impl Into<String>, weight: f64) -> Self {
		Self { text: text.into(), weight }
	}

	pub fn plain(text: impl Into<String>) -> Self {
		Self::new(text, 1.0)
	}
}

pub trait FuzzyMatch
where
	Self: Send + Sync,
{
	/// Best weighted score of `query` against `keys`, or `None` if no key matches.
	fn score(&self, query: &str, keys: &[MatchKey]) -> Option<f64>;
}

pub struct SkimFuzzy {
	matcher: SkimMatcherV2,
}
impl Default for SkimFuzzy {
	fn default() -> Self {
		Self { matcher: SkimMatcherV2::default().smart_case() }
	}
}
impl FuzzyMatch for SkimFuzzy {
	fn score(&self, query: &str, keys: &[MatchKey]) -> Option<f64> {
		keys.iter()
			.filter(|key| !key.text.is_empty())
			.filter_map(|key| {
				self.matcher.fuzzy_match(&key.text, query).map(|score| score as f64 * key.weight)
			})
			.max_by(|left, right| left.total_cmp(right))
	}
}

#[derive(Clone)]
pub struct FilterBridge {
	matcher: Arc<dyn FuzzyMatch>,
	min_score: f64,
}
impl FilterBridge {
	pub fn new(matcher: Arc<dyn FuzzyMatch>, min_score: i64) -> Self {
		Self { matcher, min_score: min_score as f64 }
	}

	pub fn skim(min_score: i64) -> Self {
		Self::new(Arc::new(SkimFuzzy::default()), min_score)
	}

	/// Scores each key set against `query`. An empty query scores nothing.
	pub fn score_all<'a, I>(&self, query: &str, key_sets: I) -> Vec<Option<f64>>
	where
		I: IntoIterator<Item = &'a [MatchKey]>,
	{
		if query.is_empty() {
			return key_sets.into_iter().map(|_| None).collect();
		}

		key_sets.into_iter().map(|keys| self.matcher.score(query, keys)).collect()
	}

	/// Converts scores from [`Self::score_all`] into visibility states.
	pub fn states(
		&self,
		query: &str,
		scores: &[Option<f64>],
		autoselect: bool,
	) -> Vec<OptionState> {
		if query.is_empty() {
			return vec![OptionState::Normal; scores.len()];
		}

		let mut states: Vec<OptionState> = scores
			.iter()
			.map(|score| match score {
				Some(score) if *score >= self.min_score => OptionState::Normal,
				_ => OptionState::Hidden,
			})
			.collect();

		if autoselect {
			let best = scores
				.iter()
				.enumerate()
				.filter(|(idx, _)| states[*idx].is_visible())
				.filter_map(|(idx, score)| score.map(|score| (idx, score)))
				.min_by(|left, right| {
					merge::cmp_f64_desc(left.1, right.1).then_with(|| left.0.cmp(&right.0))
				});

			if let Some((idx, _)) = best {
				states[idx] = OptionState::Focused;
			}
		}

		states
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Fixed;
	impl FuzzyMatch for Fixed {
		fn score(&self, _: &str, keys: &[MatchKey]) -> Option<f64> {
			keys.first().and_then(|key| key.text.parse().ok())
		}
	}

	fn keys(raw: &[&str]) -> Vec<Vec<MatchKey>> {
		raw.iter().map(|text| vec![MatchKey::plain(*text)]).collect()
	}

	#[test]
	fn empty_query_shows_everything_unfocused() {
		let bridge = FilterBridge::new(Arc::new(Fixed), 0);
		let sets = keys(&["1", "x"]);
		let scores = bridge.score_all("", sets.iter().map(Vec::as_slice));

		assert_eq!(scores, vec![None, None]);
		assert_eq!(bridge.states("", &scores, true), vec![OptionState::Normal; 2]);
	}

	#[test]
	fn first_best_match_is_focused_and_weak_matches_hidden() {
		let bridge = FilterBridge::new(Arc::new(Fixed), 5);
		let sets = keys(&["7", "9", "x", "3", "9"]);
		let scores = bridge.score_all("q", sets.iter().map(Vec::as_slice));
		let states = bridge.states("q", &scores, true);

		assert_eq!(
			states,
			vec![
				OptionState::Normal,
				OptionState::Focused,
				OptionState::Hidden,
				OptionState::Hidden,
				OptionState::Normal,
			]
		);
		assert!(!bridge.states("q", &scores, false).contains(&OptionState::Focused));
	}

	#[test]
	fn skim_takes_the_best_weighted_key() {
		let fuzzy = SkimFuzzy::default();
		let plain = fuzzy.score("gh", &[MatchKey::plain("github")]).expect("Key matches.");
		let weighted = fuzzy
			.score("gh", &[MatchKey::plain("nothing"), MatchKey::new("github", 2.0)])
			.expect("Weighted key matches.");

		assert_eq!(weighted, plain * 2.0);
		assert!(fuzzy.score("zzz", &[MatchKey::plain("github")]).is_none());
	}
}
