use std::{cmp::Ordering, collections::HashSet};

use serde::Serialize;

use omnirank_config::DuplicatePolicy;
use omnirank_domain::{
	OptionState, Origin, ScoredCandidate, merge,
	sessions::SessionEntry,
	tabs::{ContainerRecord, TabEntry},
};

use crate::{Error, FilterBridge, MatchKey, Result};

/// The entity a candidate stands for.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CandidatePayload {
	Page(ScoredCandidate),
	Tab(TabEntry),
	Session(SessionEntry),
	Container(ContainerRecord),
	Keyword { name: String, description: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candidate {
	/// Dedupe key. Also the stable identity used to find a candidate again after a refresh.
	pub key: String,
	/// Text inserted when the candidate is selected.
	pub value: String,
	pub match_keys: Vec<MatchKey>,
	pub state: OptionState,
	pub match_score: Option<f64>,
	pub payload: CandidatePayload,
}
impl Candidate {
	pub fn new(
		key: impl Into<String>,
		value: impl Into<String>,
		match_keys: Vec<MatchKey>,
		payload: CandidatePayload,
	) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
			match_keys,
			state: OptionState::Normal,
			match_score: None,
			payload,
		}
	}

	/// A history, bookmark, top-site or search shortcut entry keyed by its URL.
	///
	/// Search shortcuts insert their name rather than their template.
	pub fn page(page: ScoredCandidate) -> Self {
		let value = match page.origin {
			Some(Origin::Search) => page.title.clone(),
			_ => page.url.clone(),
		};
		let match_keys = vec![MatchKey::plain(&page.title), MatchKey::plain(&page.url)];

		Self::new(page.url.clone(), value, match_keys, CandidatePayload::Page(page))
	}
}

/// The current candidate list of one completion source.
#[derive(Clone, Debug)]
pub struct CandidateRegistry {
	source_name: &'static str,
	on_duplicate: DuplicatePolicy,
	candidates: Vec<Candidate>,
}
impl CandidateRegistry {
	pub fn new(source_name: &'static str, on_duplicate: DuplicatePolicy) -> Self {
		Self { source_name, on_duplicate, candidates: Vec::new() }
	}

	/// Replaces every candidate. States and scores of the new list start out reset.
	///
	/// With [`DuplicatePolicy::Reject`] a repeated key fails the whole call and leaves the
	/// registry untouched. With [`DuplicatePolicy::Dedupe`] the first candidate per key is kept.
	pub fn replace_all(&mut self, candidates: Vec<Candidate>) -> Result<()> {
		let mut seen = HashSet::with_capacity(candidates.len());
		let mut out = Vec::with_capacity(candidates.len());

		for mut candidate in candidates {
			if !seen.insert(candidate.key.clone()) {
				match self.on_duplicate {
					DuplicatePolicy::Reject => {
						return Err(Error::DuplicateCandidate {
							source_name: self.source_name.to_string(),
							key: candidate.key,
						});
					},
					DuplicatePolicy::Dedupe => {
						tracing::warn!(
							source = self.source_name,
							key = %candidate.key,
							"Dropping duplicate candidate."
						);

						continue;
					},
				}
			}

			candidate.state = OptionState::Normal;
			candidate.match_score = None;

			out.push(candidate);
		}

		self.candidates = out;

		Ok(())
	}

	pub fn apply_query(&mut self, query: &str, bridge: &FilterBridge, autoselect: bool) {
		let key_sets = self.candidates.iter().map(|candidate| candidate.match_keys.as_slice());
		let scores = bridge.score_all(query, key_sets);
		let states = bridge.states(query, &scores, autoselect);

		for ((candidate, score), state) in self.candidates.iter_mut().zip(scores).zip(states) {
			candidate.match_score = score;
			candidate.state = state;
		}
	}

	/// Shows every candidate unscored, for lists the backend already matched.
	pub fn show_all(&mut self) {
		for candidate in &mut self.candidates {
			candidate.match_score = None;
			candidate.state = OptionState::Normal;
		}
	}

	pub fn clear(&mut self) {
		self.candidates.clear();
	}

	pub fn candidates(&self) -> &[Candidate] {
		&self.candidates
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// Visible candidates in render order: best match first, insertion order otherwise.
	pub fn options(&self) -> Vec<&Candidate> {
		let mut out: Vec<&Candidate> =
			self.candidates.iter().filter(|candidate| candidate.state.is_visible()).collect();

		out.sort_by(|left, right| match (left.match_score, right.match_score) {
			(Some(a), Some(b)) => merge::cmp_f64_desc(a, b),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		});

		out
	}

	/// Key and render position of the focused candidate.
	pub fn focused(&self) -> Option<(String, usize)> {
		self.options()
			.into_iter()
			.enumerate()
			.find(|(_, candidate)| candidate.state == OptionState::Focused)
			.map(|(position, candidate)| (candidate.key.clone(), position))
	}

	/// Focuses the visible candidate with `key`. Returns false, changing nothing, if none exists.
	pub fn focus(&mut self, key: &str) -> bool {
		let exists = self
			.candidates
			.iter()
			.any(|candidate| candidate.key == key && candidate.state.is_visible());

		if !exists {
			return false;
		}

		for candidate in &mut self.candidates {
			if candidate.key == key {
				candidate.state = OptionState::Focused;
			} else if candidate.state == OptionState::Focused {
				candidate.state = OptionState::Normal;
			}
		}

		true
	}

	/// Focuses whatever now renders at `position`, or the last option if the list got shorter.
	pub fn focus_at(&mut self, position: usize) -> bool {
		let options = self.options();
		let Some(candidate) = options.get(position).or(options.last()) else {
			return false;
		};
		let key = candidate.key.clone();

		self.focus(&key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(key: &str) -> Candidate {
		Candidate::new(
			key,
			key,
			vec![MatchKey::plain(key)],
			CandidatePayload::Keyword { name: key.to_string(), description: String::new() },
		)
	}

	#[test]
	fn reject_policy_leaves_previous_list_in_place() {
		let mut registry = CandidateRegistry::new("test", DuplicatePolicy::Reject);

		registry.replace_all(vec![candidate("a")]).expect("Unique keys are accepted.");

		let err = registry
			.replace_all(vec![candidate("b"), candidate("b")])
			.expect_err("Expected duplicate candidate error.");

		assert!(matches!(err, Error::DuplicateCandidate { ref key, .. } if key == "b"));
		assert_eq!(registry.candidates()[0].key, "a");
	}

	#[test]
	fn dedupe_policy_keeps_first_occurrence() {
		let mut registry = CandidateRegistry::new("test", DuplicatePolicy::Dedupe);
		let mut second = candidate("a");

		second.value = "second".to_string();

		registry
			.replace_all(vec![candidate("a"), candidate("b"), second])
			.expect("Dedupe never fails.");

		assert_eq!(registry.len(), 2);
		assert_eq!(registry.candidates()[0].value, "a");
	}

	#[test]
	fn focus_at_clamps_to_the_last_option() {
		let mut registry = CandidateRegistry::new("test", DuplicatePolicy::Dedupe);

		registry.replace_all(vec![candidate("a"), candidate("b")]).expect("Unique keys.");

		assert!(registry.focus_at(5));
		assert_eq!(registry.focused(), Some(("b".to_string(), 1)));
		assert!(!registry.focus("missing"));
		assert_eq!(registry.focused(), Some(("b".to_string(), 1)));
	}
}
