//! Commands that open a completion section, and the shape of their arguments.

use std::collections::HashSet;

use serde::Serialize;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
	History,
	Bookmarks,
	TabAll,
	Sessions,
	Containers,
	Sanitise,
}
impl SourceKind {
	pub const ALL: [Self; 6] = [
		Self::History,
		Self::Bookmarks,
		Self::TabAll,
		Self::Sessions,
		Self::Containers,
		Self::Sanitise,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::History => "history",
			Self::Bookmarks => "bookmarks",
			Self::TabAll => "tab_all",
			Self::Sessions => "sessions",
			Self::Containers => "containers",
			Self::Sanitise => "sanitise",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArgumentShape {
	/// Exactly one argument; nothing is offered once a second one starts.
	Single,
	/// Space separated arguments, completed one token at a time.
	Repeated { distinct: bool },
	/// The whole remainder of the input is one free-text query.
	FreeText,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSchema {
	pub name: &'static str,
	pub source: SourceKind,
	pub arguments: ArgumentShape,
	pub excludes_current_window: bool,
}
impl CommandSchema {
	pub const fn new(name: &'static str, source: SourceKind, arguments: ArgumentShape) -> Self {
		Self { name, source, arguments, excludes_current_window: false }
	}
}

/// The full command table, validated once at startup.
#[derive(Clone, Debug)]
pub struct CommandTable {
	commands: Vec<CommandSchema>,
}
impl CommandTable {
	pub fn new(commands: Vec<CommandSchema>) -> Result<Self> {
		let mut seen = HashSet::new();

		for command in &commands {
			if command.name.is_empty() {
				return Err(Error::CommandTable {
					message: "command names must be non-empty.".to_string(),
				});
			}
			if command.name.chars().any(char::is_whitespace) {
				return Err(Error::CommandTable {
					message: format!("command {:?} must not contain whitespace.", command.name),
				});
			}
			if !seen.insert(command.name) {
				return Err(Error::CommandTable {
					message: format!("command {:?} is declared more than once.", command.name),
				});
			}
			if command.excludes_current_window && command.source != SourceKind::TabAll {
				return Err(Error::CommandTable {
					message: format!(
						"command {:?} can only exclude the current window for tab sources.",
						command.name
					),
				});
			}
		}

		Ok(Self { commands })
	}

	pub fn standard() -> Result<Self> {
		use ArgumentShape::*;
		use SourceKind::*;

		Self::new(vec![
			CommandSchema::new("open", History, FreeText),
			CommandSchema::new("tabopen", History, FreeText),
			CommandSchema::new("winopen", History, FreeText),
			CommandSchema::new("bmarks", Bookmarks, FreeText),
			CommandSchema::new("taball", TabAll, FreeText),
			CommandSchema {
				excludes_current_window: true,
				..CommandSchema::new("tabgrab", TabAll, FreeText)
			},
			CommandSchema::new("undo", Sessions, FreeText),
			CommandSchema::new("recontain", Containers, Single),
			CommandSchema::new("containerclose", Containers, Single),
			CommandSchema::new("containerdelete", Containers, Single),
			CommandSchema::new("containerupdate", Containers, Single),
			CommandSchema::new("sanitise", Sanitise, Repeated { distinct: true }),
		])
	}

	pub fn for_source(&self, source: SourceKind) -> impl Iterator<Item = &CommandSchema> {
		self.commands.iter().filter(move |command| command.source == source)
	}

	pub fn get(&self, name: &str) -> Option<&CommandSchema> {
		self.commands.iter().find(|command| command.name == name)
	}
}

/// Input split into its leading command and the remaining argument text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParsedInput<'a> {
	pub command: &'a str,
	pub argument: &'a str,
}

/// Splits `input` on its first whitespace run. Leading whitespace is ignored.
pub fn split_command(input: &str) -> ParsedInput<'_> {
	let trimmed = input.trim_start();

	match trimmed.find(char::is_whitespace) {
		Some(idx) => ParsedInput {
			command: &trimmed[..idx],
			argument: trimmed[idx..].trim_start(),
		},
		None => ParsedInput { command: trimmed, argument: "" },
	}
}

/// Argument text split into already-completed tokens and the token being typed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepeatedArgument<'a> {
	/// Everything up to and including the last space, kept verbatim.
	pub prefix: &'a str,
	pub completed: Vec<&'a str>,
	pub current: &'a str,
}

pub fn split_repeated(argument: &str) -> RepeatedArgument<'_> {
	match argument.rfind(' ') {
		Some(idx) => {
			let prefix = &argument[..=idx];

			RepeatedArgument {
				prefix,
				completed: prefix.split(' ').filter(|token| !token.is_empty()).collect(),
				current: &argument[idx + 1..],
			}
		},
		None => RepeatedArgument { prefix: "", completed: Vec::new(), current: argument },
	}
}

/// Whether a single-argument command has moved past its first argument.
pub fn has_extra_arguments(argument: &str) -> bool {
	argument.split(' ').count() > 1
}
