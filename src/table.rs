// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::cell::Cell;
use std::collections::HashMap;
use std::env;
use std::fmt;

/// Name of the environment variable that, when set, stops the argument
/// vector from being permuted (unless the short option specification asks
/// for [Ordering::ReturnInOrder]).
pub const POSIXLY_CORRECT: &str = "POSIXLY_CORRECT";

const IN_ORDER_PREFIX: char = '-';
const POSIX_PREFIX: char = '+';
const ARG_SUFFIX: char = ':';
const W_LONG_SUFFIX: char = ';';
const W_LONG_OPT: char = 'W';

/// Used to specify whether an option is a "stand-alone" flag option
/// (needs no value), or whether it requires or accepts an option argument.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Need {
    /// Option is stand-alone (no argument required).
    Nothing,
    /// Option needs an argument.
    Argument,
    /// Option accepts an argument, but only when it is attached to the
    /// option (`-xVALUE` or `--name=VALUE`).
    Optional,
}

impl Default for Need {
    fn default() -> Self {
        Need::Nothing
    }
}

/// How arguments that are not options are dealt with.
///
/// `--` always ends option scanning, whatever the ordering.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Ordering {
    /// Stop scanning at the first non-option (POSIX behaviour).
    RequireOrder,
    /// Move non-options to the end of the argument vector as scanning
    /// proceeds so every option is seen (GNU default).
    Permute,
    /// Report every non-option as though it were the argument of an option
    /// with code `1`, in the order it appears.
    ReturnInOrder,
}

impl Default for Ordering {
    fn default() -> Self {
        Ordering::Permute
    }
}

/// Describes a long option, as `struct option` does for `getopt_long(3)`.
///
/// If a `flag` is set, finding the option stores `value` in it and the
/// scanner reports [OptKind::Flag](crate::OptKind::Flag); otherwise `value`
/// is reported directly with [OptKind::Long](crate::OptKind::Long). Using the
/// equivalent short option character as the value is common.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct LongOption<'a> {
    /// The option name, without the leading dashes.
    pub name: &'a str,
    /// Whether the option takes an argument.
    pub needs: Need,
    /// Set to `value` when the option is found.
    pub flag: Option<&'a Cell<char>>,
    /// Value to report, or to store in `flag`.
    pub value: char,
}

impl<'a> LongOption<'a> {
    /// Create a new long option that takes no argument.
    pub fn new(name: &'a str, value: char) -> Self {
        LongOption {
            name,
            needs: Need::Nothing,
            flag: None,
            value,
        }
    }

    /// Specify the requirement for the option.
    pub fn needs(self, needs: Need) -> Self {
        LongOption { needs, ..self }
    }

    /// Specify a cell that receives `value` when the option is found.
    pub fn flag(self, flag: &'a Cell<char>) -> Self {
        LongOption {
            flag: Some(flag),
            ..self
        }
    }

    /// Options that share an argument requirement, a flag and a value
    /// cannot be told apart by the caller, so an abbreviation matching
    /// several of them is not ambiguous.
    pub(crate) fn same_effect(&self, other: &LongOption) -> bool {
        let same_flag = match (self.flag, other.flag) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };

        self.needs == other.needs && same_flag && self.value == other.value
    }
}

impl<'a> fmt::Debug for LongOption<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LongOption")
            .field("name", &self.name)
            .field("needs", &self.needs)
            .field("flag", &self.flag.map(|c| c as *const Cell<char>))
            .field("value", &self.value)
            .finish()
    }
}

/// The short options a program accepts, parsed from a `getopt(3)` style
/// specification such as `"ab:c::W;"`.
///
/// A table never changes once built, so one table can be shared by any
/// number of [Scanner](crate::Scanner)s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionTable {
    entries: HashMap<char, Need>,
    ordering: Ordering,
    w_long: bool,
}

impl OptionTable {
    /// Parse a short option specification.
    ///
    /// The specification is a list of option characters. A character
    /// followed by `:` needs an argument and one followed by `::` accepts an
    /// optional argument. `W;` makes `-W name` behave like `--name`.
    ///
    /// The first character selects the [Ordering]: `-` for
    /// [Ordering::ReturnInOrder] and `+` for [Ordering::RequireOrder].
    /// Without either, [Ordering::RequireOrder] is used if the
    /// [POSIXLY_CORRECT] environment variable is set and
    /// [Ordering::Permute] otherwise. A `:` after that is accepted for
    /// compatibility but has no effect: errors are always returned to the
    /// caller rather than printed.
    pub fn parse(spec: &str) -> Self {
        let posixly_correct = env::var_os(POSIXLY_CORRECT).is_some();

        Self::parse_with_posix(spec, posixly_correct)
    }

    /// As [OptionTable::parse()], but the caller says whether
    /// `POSIXLY_CORRECT` behaviour is wanted instead of the environment
    /// being consulted.
    pub fn parse_with_posix(spec: &str, posixly_correct: bool) -> Self {
        let mut chars = spec.chars().peekable();

        let ordering = match chars.peek() {
            Some(&IN_ORDER_PREFIX) => {
                chars.next();
                Ordering::ReturnInOrder
            }
            Some(&POSIX_PREFIX) => {
                chars.next();
                Ordering::RequireOrder
            }
            _ if posixly_correct => Ordering::RequireOrder,
            _ => Ordering::Permute,
        };

        let mut entries = HashMap::new();
        let mut w_long = false;

        while let Some(c) = chars.next() {
            // A colon with no option character before it, including the
            // leading ':' that asks getopt(3) not to print errors.
            if c == ARG_SUFFIX {
                continue;
            }

            if c == W_LONG_OPT && chars.next_if_eq(&W_LONG_SUFFIX).is_some() {
                w_long = true;
                entries.insert(c, Need::Nothing);
                continue;
            }

            let needs = if chars.next_if_eq(&ARG_SUFFIX).is_none() {
                Need::Nothing
            } else if chars.next_if_eq(&ARG_SUFFIX).is_none() {
                Need::Argument
            } else {
                Need::Optional
            };

            entries.insert(c, needs);
        }

        OptionTable {
            entries,
            ordering,
            w_long,
        }
    }

    /// Determine if the specified option character has been registered.
    pub fn has(&self, option: char) -> bool {
        self.entries.contains_key(&option)
    }

    /// Returns the requirement for the specified option character.
    pub fn needs(&self, option: char) -> Option<Need> {
        self.entries.get(&option).copied()
    }

    /// How non-option arguments are handled.
    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    /// Set if the specification contained `W;`.
    pub fn w_long(&self) -> bool {
        self.w_long
    }

    /// Returns the number of registered option characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Set if no option characters are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need() {
        assert_eq!(Need::default(), Need::Nothing);
    }

    #[test]
    fn test_ordering_prefix() {
        #[derive(Debug)]
        struct TestData<'a> {
            spec: &'a str,
            posixly_correct: bool,
            ordering: Ordering,
        }

        let tests = &[
            TestData {
                spec: "",
                posixly_correct: false,
                ordering: Ordering::Permute,
            },
            TestData {
                spec: "-",
                posixly_correct: false,
                ordering: Ordering::ReturnInOrder,
            },
            TestData {
                spec: "+",
                posixly_correct: false,
                ordering: Ordering::RequireOrder,
            },
            //------------------------------
            TestData {
                spec: "",
                posixly_correct: true,
                ordering: Ordering::RequireOrder,
            },
            TestData {
                // Explicit prefix beats the environment.
                spec: "-",
                posixly_correct: true,
                ordering: Ordering::ReturnInOrder,
            },
            TestData {
                spec: "+",
                posixly_correct: true,
                ordering: Ordering::RequireOrder,
            },
            //------------------------------
            TestData {
                spec: "ab:",
                posixly_correct: false,
                ordering: Ordering::Permute,
            },
            TestData {
                spec: "+ab:",
                posixly_correct: false,
                ordering: Ordering::RequireOrder,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let table = OptionTable::parse_with_posix(d.spec, d.posixly_correct);

            assert_eq!(table.ordering(), d.ordering, "{}", msg);
            assert!(!table.w_long(), "{}", msg);

            if d.spec.len() <= 1 {
                assert!(table.is_empty(), "{}", msg);
            }
        }
    }

    #[test]
    fn test_leading_colon() {
        for spec in &[":", "-:", "+:"] {
            let msg = format!("spec: {:?}", spec);

            let table = OptionTable::parse_with_posix(spec, false);

            assert!(table.is_empty(), "{}", msg);
            assert!(!table.w_long(), "{}", msg);
        }

        // Only the first colon is swallowed.
        let table = OptionTable::parse_with_posix("::a", false);
        assert!(!table.has(':'));
        assert_eq!(table.needs('a'), Some(Need::Nothing));
    }

    #[test]
    fn test_option_needs() {
        let table = OptionTable::parse_with_posix("ab:c::d", false);

        assert_eq!(table.len(), 4);
        assert_eq!(table.needs('a'), Some(Need::Nothing));
        assert_eq!(table.needs('b'), Some(Need::Argument));
        assert_eq!(table.needs('c'), Some(Need::Optional));
        assert_eq!(table.needs('d'), Some(Need::Nothing));
        assert_eq!(table.needs('e'), None);
        assert!(!table.has(':'));

        // Extra colons are ignored.
        let table = OptionTable::parse_with_posix("a:::b", false);
        assert_eq!(table.len(), 2);
        assert_eq!(table.needs('a'), Some(Need::Optional));
        assert_eq!(table.needs('b'), Some(Need::Nothing));

        let table = OptionTable::parse_with_posix("人:", false);
        assert_eq!(table.needs('人'), Some(Need::Argument));
    }

    #[test]
    fn test_w_extension() {
        #[derive(Debug)]
        struct TestData<'a> {
            spec: &'a str,
            w_long: bool,
            entries: Vec<(char, Need)>,
        }

        let tests = &[
            TestData {
                spec: "W;",
                w_long: true,
                entries: vec![('W', Need::Nothing)],
            },
            TestData {
                spec: ";W",
                w_long: false,
                entries: vec![(';', Need::Nothing), ('W', Need::Nothing)],
            },
            TestData {
                spec: "w;",
                w_long: false,
                entries: vec![('w', Need::Nothing), (';', Need::Nothing)],
            },
            TestData {
                spec: "W;:",
                w_long: true,
                entries: vec![('W', Need::Nothing)],
            },
            TestData {
                spec: "W:",
                w_long: false,
                entries: vec![('W', Need::Argument)],
            },
            TestData {
                spec: "W::",
                w_long: false,
                entries: vec![('W', Need::Optional)],
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let table = OptionTable::parse_with_posix(d.spec, false);

            assert_eq!(table.w_long(), d.w_long, "{}", msg);
            assert_eq!(table.len(), d.entries.len(), "{}", msg);

            for (option, needs) in &d.entries {
                assert_eq!(table.needs(*option), Some(*needs), "{}", msg);
            }
        }
    }

    #[test]
    fn test_parse_is_repeatable() {
        let spec = "+:ab:c::W;x";

        let t1 = OptionTable::parse_with_posix(spec, false);
        let t2 = OptionTable::parse_with_posix(spec, false);

        assert_eq!(t1, t2);
    }

    #[test]
    fn test_long_option() {
        let flag = Cell::new('\0');
        let other = Cell::new('\0');

        let opt = LongOption::new("verbose", 'v');
        assert_eq!(opt.name, "verbose");
        assert_eq!(opt.needs, Need::Nothing);
        assert!(opt.flag.is_none());
        assert_eq!(opt.value, 'v');

        let opt = LongOption::new("file", 'f').needs(Need::Argument);
        assert_eq!(opt.needs, Need::Argument);

        let a = LongOption::new("brief", 'b').flag(&flag);
        let b = LongOption::new("briefer", 'b').flag(&flag);
        let c = LongOption::new("brieflet", 'b').flag(&other);
        let d = LongOption::new("briefest", 'x').flag(&flag);
        let e = LongOption::new("briefing", 'b').flag(&flag).needs(Need::Optional);

        assert!(a.same_effect(&b));
        assert!(!a.same_effect(&c));
        assert!(!a.same_effect(&d));
        assert!(!a.same_effect(&e));
        assert!(!a.same_effect(&LongOption::new("brief", 'b')));
    }
}
