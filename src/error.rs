// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

use thiserror::Error;

/// The text that introduced the option an error refers to. It is shown in
/// front of the option name in the error message.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Prefix {
    /// A short option, or a long option in long-only mode (`-`).
    Dash,
    /// A long option (`--`).
    DoubleDash,
    /// A long option given as the argument of `-W` (`-W `).
    W,
}

impl Prefix {
    /// The prefix as it appears in error text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Dash => "-",
            Prefix::DoubleDash => "--",
            Prefix::W => "-W ",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn possibilities(prefix: &Prefix, candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|name| format!(" '{}{}'", prefix, name))
        .collect()
}

/// The error type.
///
/// Every variant describes a problem with the command line the user typed,
/// and the text of each matches the message GNU `getopt_long(3)` would print.
/// None of them are fatal: the [Scanner](crate::Scanner) has already moved
/// past the offending text so the caller may keep scanning.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// A long option abbreviation matched more than one long option.
    #[error(
        "option '{prefix}{option}' is ambiguous; possibilities:{}",
        possibilities(.prefix, .candidates)
    )]
    AmbiguousOption {
        /// The text the user typed (including any `=value`).
        option: String,
        /// Names of the long options that matched, in table order.
        candidates: Vec<String>,
        /// How the option was introduced.
        prefix: Prefix,
    },

    /// The option is not known.
    #[error("unrecognized option '{prefix}{option}'")]
    UnrecognizedOption {
        /// The offending option character or long option text.
        option: String,
        /// How the option was introduced.
        prefix: Prefix,
    },

    /// A long option that takes no argument was given one with `=`.
    #[error("option '{prefix}{option}' doesn't allow an argument")]
    ArgumentNotAllowed {
        /// The full name of the matched long option.
        option: String,
        /// How the option was introduced.
        prefix: Prefix,
    },

    /// An option that needs an argument was the last thing on the command line.
    #[error("option '{prefix}{option}' requires an argument")]
    ArgumentRequired {
        /// The option character or full long option name.
        option: String,
        /// How the option was introduced.
        prefix: Prefix,
    },
}

impl Error {
    /// The option text the error refers to (without its prefix).
    pub fn option(&self) -> &str {
        match self {
            Error::AmbiguousOption { option, .. }
            | Error::UnrecognizedOption { option, .. }
            | Error::ArgumentNotAllowed { option, .. }
            | Error::ArgumentRequired { option, .. } => option,
        }
    }

    /// How the option the error refers to was introduced.
    pub fn prefix(&self) -> Prefix {
        match self {
            Error::AmbiguousOption { prefix, .. }
            | Error::UnrecognizedOption { prefix, .. }
            | Error::ArgumentNotAllowed { prefix, .. }
            | Error::ArgumentRequired { prefix, .. } => *prefix,
        }
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    use regex::Regex;

    #[test]
    fn test_prefix_display() {
        assert_eq!(Prefix::Dash.to_string(), "-");
        assert_eq!(Prefix::DoubleDash.to_string(), "--");
        assert_eq!(Prefix::W.to_string(), "-W ");
    }

    #[test]
    fn test_error_display() {
        #[derive(Debug)]
        struct TestData<'a> {
            error: Error,
            display: &'a str,
        }

        let tests = &[
            TestData {
                error: Error::AmbiguousOption {
                    option: "on".into(),
                    candidates: vec!["one".into(), "one-one".into(), "onto".into()],
                    prefix: Prefix::DoubleDash,
                },
                display: "option '--on' is ambiguous; possibilities: '--one' '--one-one' '--onto'",
            },
            TestData {
                error: Error::AmbiguousOption {
                    option: "ve".into(),
                    candidates: vec!["veni".into(), "vedi".into()],
                    prefix: Prefix::W,
                },
                display: "option '-W ve' is ambiguous; possibilities: '-W veni' '-W vedi'",
            },
            TestData {
                error: Error::UnrecognizedOption {
                    option: "c".into(),
                    prefix: Prefix::Dash,
                },
                display: "unrecognized option '-c'",
            },
            TestData {
                error: Error::UnrecognizedOption {
                    option: "dingo=x".into(),
                    prefix: Prefix::DoubleDash,
                },
                display: "unrecognized option '--dingo=x'",
            },
            TestData {
                error: Error::ArgumentNotAllowed {
                    option: "sample".into(),
                    prefix: Prefix::DoubleDash,
                },
                display: "option '--sample' doesn't allow an argument",
            },
            TestData {
                error: Error::ArgumentRequired {
                    option: "a".into(),
                    prefix: Prefix::Dash,
                },
                display: "option '-a' requires an argument",
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let value = d.error.to_string();

            let msg = format!("test[{}]: {:?}, value: {:?}", i, d, value);

            assert_eq!(value, d.display, "{}", msg);
        }
    }

    #[test]
    fn test_error_accessors() {
        let err = Error::ArgumentRequired {
            option: "bravo".into(),
            prefix: Prefix::W,
        };

        assert_eq!(err.option(), "bravo");
        assert_eq!(err.prefix(), Prefix::W);

        let re = Regex::new(r"^option '-W bravo' requires an argument$").unwrap();
        assert!(re.is_match(&err.to_string()));
    }
}
