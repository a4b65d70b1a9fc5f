// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural errors raised while defining or starting a run.
//!
//! Failures inside specs are not errors at this level; they are recorded
//! as [`crate::results::Failure`]s and counted.

use std::fmt;

use thiserror::Error;

use crate::runner::RunnerState;

/// What kind of node a definition call was building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Suite,
    Spec,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Suite => f.write_str("suite"),
            NodeKind::Spec => f.write_str("spec"),
        }
    }
}

/// Misuse of the definition API. Fatal, returned at the offending call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("{kind} description must not be blank")]
    EmptyDescription { kind: NodeKind },

    #[error("cannot define {kind} {description:?} once the runner has started")]
    RunnerNotIdle { kind: NodeKind, description: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    #[error("runner already started (state: {state:?})")]
    AlreadyStarted { state: RunnerState },
}
