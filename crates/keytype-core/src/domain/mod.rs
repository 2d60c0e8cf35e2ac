//! Domain entities for keytype.
//!
//! This module contains pure rules with no infrastructure dependencies.  Its
//! only entity is the closed set of named [`command::Command`]s that a host
//! can request in addition to free text.

/// Named commands (`BACK`, `RETURN`, `TAB`).
pub mod command;
