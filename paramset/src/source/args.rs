//! Argument-list tokenizer.
//!
//! Arguments are consumed by a three-state machine:
//!
//! 1. `Positional`: one argument per registered positional parameter, in
//!    index order. A terminal positional parameter switches straight to
//!    `Remainder`.
//! 2. `Named`: each argument is `-name`, `--name`, `-name=value` or
//!    `--name=value`; a name whose setter needs a value and has no `=`
//!    takes the next argument. The terminal-parameter string switches to
//!    `Remainder` and is itself dropped.
//! 3. `Remainder`: everything left is kept verbatim.

use super::Assignment;
use crate::location::{ArgSource, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Positional,
    Named,
    Remainder,
}

/// One thing found in the argument list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ArgEvent {
    /// A value for the positional parameter at `index`.
    Positional {
        index: usize,
        value: String,
        location: Location,
    },
    /// A named parameter with or without a value.
    Named(Assignment),
    /// Too few arguments for the positional parameters; nothing else was
    /// consumed.
    MissingPositional {
        count: usize,
        first_missing: usize,
        location: Option<Location>,
    },
    /// A named-parameter argument without a leading dash.
    MissingDash { token: String, location: Location },
}

/// The tokenizer's output.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Tokenized {
    pub(crate) events: Vec<ArgEvent>,
    pub(crate) remainder: Vec<String>,
    pub(crate) remainder_start: Option<Location>,
}

/// Splits an argument list into events and a remainder.
pub(crate) struct ArgTokenizer<'a, F> {
    pub(crate) kind: ArgSource,
    /// The terminal flag of each positional parameter, in index order.
    pub(crate) positional: &'a [bool],
    pub(crate) terminal_param: &'a str,
    /// Whether the named parameter takes the next argument as its value.
    pub(crate) needs_value: F,
}

impl<F: Fn(&str) -> bool> ArgTokenizer<'_, F> {
    pub(crate) fn tokenize(&self, args: &[String]) -> Tokenized {
        let mut out = Tokenized::default();
        let loc = |i: usize| Location::argument(self.kind, i + 1, &args[i]);

        if args.len() < self.positional.len() {
            out.events.push(ArgEvent::MissingPositional {
                count: self.positional.len() - args.len(),
                first_missing: args.len(),
                location: args.len().checked_sub(1).map(loc),
            });
            return out;
        }

        let mut state = if self.positional.is_empty() {
            State::Named
        } else {
            State::Positional
        };
        let mut i = 0;

        while i < args.len() {
            let token = &args[i];
            match state {
                State::Positional => {
                    out.events.push(ArgEvent::Positional {
                        index: i,
                        value: token.clone(),
                        location: loc(i),
                    });
                    if self.positional[i] {
                        state = State::Remainder;
                    } else if i + 1 == self.positional.len() {
                        state = State::Named;
                    }
                    i += 1;
                }
                State::Named => {
                    if token == self.terminal_param {
                        state = State::Remainder;
                        i += 1;
                        continue;
                    }

                    let location = loc(i);
                    i += 1;

                    let Some(stripped) = token
                        .strip_prefix("--")
                        .or_else(|| token.strip_prefix('-'))
                    else {
                        out.events.push(ArgEvent::MissingDash {
                            token: token.clone(),
                            location,
                        });
                        continue;
                    };

                    let (name, value) = match stripped.split_once('=') {
                        Some((name, value)) => (name, Some(value.to_string())),
                        None if (self.needs_value)(stripped) && i < args.len() => {
                            i += 1;
                            (stripped, Some(args[i - 1].clone()))
                        }
                        None => (stripped, None),
                    };

                    out.events.push(ArgEvent::Named(Assignment {
                        name: name.to_string(),
                        value,
                        location,
                    }));
                }
                State::Remainder => {
                    if out.remainder_start.is_none() {
                        out.remainder_start = Some(loc(i));
                    }
                    out.remainder.push(token.clone());
                    i += 1;
                }
            }
        }

        out
    }
}
