//! Inbound command decoding.
//!
//! A frame is a JSON object with a `cmd` tag and a handful of named fields:
//!
//! ```json
//! {"cmd": "suggest-clue", "clue": "ocean", "matchCount": 3}
//! ```
//!
//! Field values may be strings or numbers; numbers are read through their
//! textual form so `"3"` and `3` decode alike.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use susnames_core::error::DomainError;
use thiserror::Error;

use super::player::Role;

/// Tag for [`Command::StartGame`].
pub const START_GAME: &str = "start-game";
/// Tag for [`Command::SuggestClue`].
pub const SUGGEST_CLUE: &str = "suggest-clue";
/// Tag for [`Command::VoteCard`].
pub const VOTE_CARD: &str = "vote-card";
/// Tag for [`Command::UnvoteCard`].
pub const UNVOTE_CARD: &str = "unvote-card";
/// Tag for [`Command::EndClueGuessing`].
pub const END_CLUE_GUESSING: &str = "end-clue-guessing";
/// Tag for [`Command::ChangeName`].
pub const CHANGE_NAME: &str = "change-name";
/// Tag for [`Command::ClaimRole`].
pub const CLAIM_ROLE: &str = "claim-role";

/// Undecoded inbound command: a tag plus its named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    /// Command tag.
    pub cmd: String,
    /// Remaining fields of the frame.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl RawCommand {
    /// Builds a raw command from string fields.
    pub fn new<'a>(cmd: &str, fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            cmd: cmd.to_owned(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_owned(), serde_json::Value::String(v.to_owned())))
                .collect(),
        }
    }

    /// Parses a JSON frame.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the frame is not an object with a
    /// string `cmd`.
    pub fn from_json(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn required(&self, name: &'static str) -> Result<String, CommandError> {
        self.field(name).ok_or_else(|| CommandError::MissingField {
            cmd: self.cmd.clone(),
            field: name,
        })
    }

    fn parsed<T: std::str::FromStr>(&self, name: &'static str) -> Result<T, CommandError> {
        let value = self.required(name)?;
        value.trim().parse().map_err(|_| CommandError::InvalidField {
            cmd: self.cmd.clone(),
            field: name,
            value,
        })
    }
}

/// Failures decoding an inbound command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The tag is not one the room understands.
    #[error("unknown command: {0}")]
    UnknownTag(String),

    /// A required field is absent.
    #[error("{cmd}: missing field {field}")]
    MissingField {
        /// Command tag.
        cmd: String,
        /// Missing field.
        field: &'static str,
    },

    /// A field is present but unusable.
    #[error("{cmd}: invalid {field} {value:?}")]
    InvalidField {
        /// Command tag.
        cmd: String,
        /// Offending field.
        field: &'static str,
        /// Raw value.
        value: String,
    },
}

impl From<CommandError> for DomainError {
    fn from(err: CommandError) -> Self {
        DomainError::Validation(err.to_string())
    }
}

/// A decoded room command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deal a new grid and assign roles.
    StartGame,
    /// Spymaster gives a clue and opens a voting round.
    SuggestClue {
        /// The clue word.
        clue: String,
        /// How many cards the clue is meant to match.
        match_count: u32,
    },
    /// Vote for the card at `index`.
    VoteCard {
        /// Grid position.
        index: usize,
    },
    /// Withdraw a vote from the card at `index`.
    UnvoteCard {
        /// Grid position.
        index: usize,
    },
    /// Vote to end the clue round early.
    EndClueGuessing,
    /// Rename; an empty name asks for a generated one.
    ChangeName {
        /// Requested name.
        name: String,
    },
    /// Ask for a role at the next game start.
    ClaimRole {
        /// Requested role.
        role: Role,
    },
}

impl TryFrom<&RawCommand> for Command {
    type Error = CommandError;

    fn try_from(raw: &RawCommand) -> Result<Self, Self::Error> {
        match raw.cmd.as_str() {
            START_GAME => Ok(Command::StartGame),
            SUGGEST_CLUE => Ok(Command::SuggestClue {
                clue: raw.required("clue")?,
                match_count: raw.parsed("matchCount")?,
            }),
            VOTE_CARD => Ok(Command::VoteCard {
                index: raw.parsed("index")?,
            }),
            UNVOTE_CARD => Ok(Command::UnvoteCard {
                index: raw.parsed("index")?,
            }),
            END_CLUE_GUESSING => Ok(Command::EndClueGuessing),
            CHANGE_NAME => Ok(Command::ChangeName {
                name: raw.field("name").unwrap_or_default(),
            }),
            CLAIM_ROLE => {
                let value = raw.required("role")?;
                let role = match value.trim() {
                    "spectator" => Role::Spectator,
                    "spymaster" => Role::Spymaster,
                    "spy" => Role::Spy,
                    _ => {
                        return Err(CommandError::InvalidField {
                            cmd: raw.cmd.clone(),
                            field: "role",
                            value,
                        });
                    }
                };
                Ok(Command::ClaimRole { role })
            }
            other => Err(CommandError::UnknownTag(other.to_owned())),
        }
    }
}
