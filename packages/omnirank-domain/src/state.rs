use serde::Serialize;

/// Visibility of a whole completion section.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
	#[default]
	Hidden,
	Normal,
}

/// Visibility of one candidate inside a section.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
	#[default]
	Normal,
	Hidden,
	Focused,
}
impl OptionState {
	pub fn is_visible(self) -> bool {
		!matches!(self, Self::Hidden)
	}
}
