// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;
use std::iter::FusedIterator;
use std::mem;

use log::{debug, trace};

use crate::error::{Error, Prefix, Result};
use crate::table::{LongOption, Need, OptionTable, Ordering};

const OPT_PREFIX: char = '-';
const W_LONG_OPT: char = 'W';
const LONG_ARG_SEPARATOR: char = '=';

/// Special argument that is silently consumed and used to denote the end of
/// all options; all arguments that follow are considered to be positional
/// arguments (even if they start with `-`!)
///
/// See: `getopt(3)`.
const END_OF_OPTIONS: &str = "--";
const LONG_OPT_PREFIX: &str = END_OF_OPTIONS;

/// Value [Opt::code()] returns for a non-option reported in
/// [Ordering::ReturnInOrder] mode.
pub const NON_OPTION_CODE: char = '\u{1}';

/// Value [Opt::code()] returns for a long option that stored its value in
/// a flag.
pub const FLAG_CODE: char = '\u{0}';

/// What was found on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OptKind {
    /// A short option character.
    Short(char),
    /// A long option without a flag. `value` is the [LongOption] value and
    /// `index` its position in the long option list.
    Long {
        /// The matched option's value.
        value: char,
        /// Index of the matched option.
        index: usize,
    },
    /// A long option whose flag has been set to its value.
    Flag {
        /// Index of the matched option.
        index: usize,
    },
    /// A non-option, reported only in [Ordering::ReturnInOrder] mode. The
    /// argument itself is in [Opt::arg].
    NonOption,
}

/// An option found by the [Scanner].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Opt {
    /// What kind of option was found.
    pub kind: OptKind,
    /// The option argument, if any.
    ///
    /// # Notes
    ///
    /// - This is equivalent to `getopt(3)`'s `optarg` value.
    /// - This will be [None] for flag options and for options with an
    ///   optional argument that was not given.
    pub arg: Option<String>,
}

impl Opt {
    /// The value `getopt_long(3)` would return for this option: the option
    /// character, the long option value, [FLAG_CODE] if a flag was set or
    /// [NON_OPTION_CODE] for a non-option.
    pub fn code(&self) -> char {
        match self.kind {
            OptKind::Short(c) => c,
            OptKind::Long { value, .. } => value,
            OptKind::Flag { .. } => FLAG_CODE,
            OptKind::NonOption => NON_OPTION_CODE,
        }
    }

    /// Index of the matched long option (`getopt_long(3)`'s `longindex`).
    pub fn long_index(&self) -> Option<usize> {
        match self.kind {
            OptKind::Long { index, .. } | OptKind::Flag { index } => Some(index),
            _ => None,
        }
    }
}

/// Settings used to control the scanners behaviour.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialOrd, Default, PartialEq)]
pub struct Settings {
    /// Allow a single dash to introduce a long option, as
    /// `getopt_long_only(3)` does.
    long_only: bool,

    /// Allow an option with an optional argument to take the next argument
    /// when the argument vector is not being permuted.
    optional_lookahead: bool,
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Treat `-name` like `--name`.
    ///
    /// An argument such as `-f` where `f` is a short option is always the
    /// short option. Other arguments are first tried as a long option
    /// (`-fu` is an abbreviation of `--fubar` if that exists) and only
    /// treated as a group of short options if no long option matches and
    /// the first character is a short option.
    pub fn long_only(self) -> Self {
        Settings {
            long_only: true,
            ..self
        }
    }

    /// By default an option with an optional argument (`x::`) only takes an
    /// argument that is attached to it (`-xVALUE`), as GNU `getopt(3)`
    /// does.
    ///
    /// When this setting is enabled and the argument vector is not being
    /// permuted ([Ordering::RequireOrder] or [Ordering::ReturnInOrder]),
    /// the following argument is taken as the option argument as long as it
    /// does not start with a dash, as some BSD implementations do.
    ///
    /// # Example
    ///
    /// For the specification `"+x::"` and the command line `prog -x foo`:
    ///
    /// - With the default, `-x` has no argument and `foo` is the first
    ///   operand.
    /// - With this setting, `-x` has the argument `foo`.
    pub fn optional_lookahead(self) -> Self {
        Settings {
            optional_lookahead: true,
            ..self
        }
    }

    /// Set if a single dash can introduce a long option.
    pub fn is_long_only(&self) -> bool {
        self.long_only
    }

    /// Set if optional arguments may be taken from the next argument.
    pub fn is_optional_lookahead(&self) -> bool {
        self.optional_lookahead
    }
}

/// Get a list of all command-line arguments specified to the program.
///
/// The first element is the program name, which the [Scanner] skips.
pub fn get_args() -> Vec<String> {
    env::args().collect()
}

/// Outcome of looking up a long option name.
#[derive(Debug)]
enum Lookup {
    Found(usize),
    Missing,
    Ambiguous(Vec<String>),
}

/// Scans an argument vector for options, one option per call.
///
/// The scanner owns the argument vector for the duration of the scan. In
/// [Ordering::Permute] mode the vector is reordered as scanning proceeds so
/// that, once [Scanner::getopt()] returns `Ok(None)`, every non-option sits
/// at the end of the vector from [Scanner::optind()] onwards (see
/// [Scanner::remaining()]).
///
/// Element `0` of the vector is the program name and is never scanned.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    args: Vec<String>,
    table: &'a OptionTable,
    long_options: &'a [LongOption<'a>],
    settings: Settings,

    // Index of the next element of args to scan (getopt(3)'s optind).
    optind: usize,
    // Unscanned text of the current option element.
    place: String,

    // First non-option skipped, and the first option after that run of
    // non-options (unset until an option follows the run).
    nonopt_start: Option<usize>,
    nonopt_end: Option<usize>,

    reset: bool,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Create a scanner for the argument vector using the short options in
    /// `table`.
    pub fn new(args: Vec<String>, table: &'a OptionTable) -> Self {
        Scanner {
            args,
            table,
            long_options: &[],
            settings: Settings::default(),
            optind: 1,
            place: String::new(),
            nonopt_start: None,
            nonopt_end: None,
            reset: true,
            done: false,
        }
    }

    /// Specify the long options to recognise.
    pub fn long_options(self, long_options: &'a [LongOption<'a>]) -> Self {
        Scanner {
            long_options,
            ..self
        }
    }

    /// Specify any settings for the scanner.
    pub fn settings(self, settings: Settings) -> Self {
        Scanner { settings, ..self }
    }

    /// Treat `-name` like `--name`.
    ///
    /// # Note
    ///
    /// This is an alternative to calling the `settings()` method.
    pub fn long_only(self) -> Self {
        Scanner {
            settings: self.settings.long_only(),
            ..self
        }
    }

    /// Index of the next argument to be scanned.
    ///
    /// Once [Scanner::getopt()] has returned `Ok(None)`, this is the index
    /// of the first argument that is not an option.
    pub fn optind(&self) -> usize {
        self.optind
    }

    /// The arguments from [Scanner::optind()] onwards.
    pub fn remaining(&self) -> &[String] {
        self.args.get(self.optind..).unwrap_or(&[])
    }

    /// The (possibly permuted) argument vector.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Return the (possibly permuted) argument vector.
    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Restart scanning at argument `index`.
    ///
    /// Any partly scanned option group is abandoned and the record of
    /// skipped non-options is discarded. Rewinding to `1` scans the
    /// (already permuted) vector again from the start.
    pub fn rewind(&mut self, index: usize) {
        self.optind = index;
        self.place.clear();
        self.reset = true;
        self.done = false;
    }

    /// Scan for the next option.
    ///
    /// # Return value
    ///
    /// - `Ok(Some(opt))` - an option (or, in [Ordering::ReturnInOrder]
    ///   mode, a non-option) was found.
    /// - `Ok(None)` - there are no more options;
    ///   [Scanner::remaining()] holds the non-option arguments. Every
    ///   later call returns `Ok(None)` too, until [Scanner::rewind()].
    /// - `Err(err)` - the command line has an error. The scanner has moved
    ///   past the offending text, so scanning can continue.
    pub fn getopt(&mut self) -> Result<Option<Opt>> {
        if self.done {
            return Ok(None);
        }

        if self.reset {
            self.nonopt_start = None;
            self.nonopt_end = None;
        }

        if self.reset || self.place.is_empty() {
            self.reset = false;

            loop {
                if self.optind >= self.args.len() {
                    self.finish();
                    return Ok(None);
                }

                let element = &self.args[self.optind];

                if !self.is_non_option(element) {
                    break;
                }

                match self.table.ordering() {
                    Ordering::ReturnInOrder => {
                        let arg = element.clone();
                        self.optind += 1;

                        trace!("non-option {:?} returned in order", arg);

                        return Ok(Some(Opt {
                            kind: OptKind::NonOption,
                            arg: Some(arg),
                        }));
                    }
                    Ordering::RequireOrder => {
                        trace!("stopping at non-option {:?}", element);
                        self.done = true;
                        return Ok(None);
                    }
                    Ordering::Permute => self.skip_non_option(),
                }
            }

            // An option follows the skipped non-options.
            if self.nonopt_start.is_some() && self.nonopt_end.is_none() {
                self.nonopt_end = Some(self.optind);
            }

            if self.args[self.optind] == END_OF_OPTIONS {
                self.optind += 1;
                self.finish();
                return Ok(None);
            }

            let element = self.args[self.optind].clone();

            if !self.long_options.is_empty() {
                if let Some(token) = element.strip_prefix(LONG_OPT_PREFIX) {
                    self.place = token.into();

                    // Never falls back to short options, so never Ok(None).
                    return self.long_option(Prefix::DoubleDash, false);
                }

                let rest = &element[OPT_PREFIX.len_utf8()..];

                if self.settings.long_only && !rest.is_empty() && !self.is_short_option(rest) {
                    let short_fallback = rest.chars().next().map_or(false, |c| self.table.has(c));

                    self.place = rest.into();

                    if let Some(opt) = self.long_option(Prefix::Dash, short_fallback)? {
                        return Ok(Some(opt));
                    }
                }
            }

            // A lone dash only gets here if it is a registered option.
            self.place = if element.len() == OPT_PREFIX.len_utf8() {
                element
            } else {
                element[OPT_PREFIX.len_utf8()..].into()
            };
        }

        self.short_option()
    }

    /// Handle the next character of the current option element.
    fn short_option(&mut self) -> Result<Option<Opt>> {
        // The place cursor is never empty here.
        let option = self.place.remove(0);

        // Move to the next element once this one is used up.
        if self.place.is_empty() {
            self.optind += 1;
        }

        let needs = match self.table.needs(option) {
            Some(needs) => needs,
            None => {
                return Err(failed(Error::UnrecognizedOption {
                    option: option.to_string(),
                    prefix: Prefix::Dash,
                }))
            }
        };

        if option == W_LONG_OPT && self.table.w_long() && !self.long_options.is_empty() {
            if self.place.is_empty() {
                match self.args.get(self.optind) {
                    Some(next) => self.place = next.clone(),
                    None => {
                        return Err(failed(Error::ArgumentRequired {
                            option: option.to_string(),
                            prefix: Prefix::Dash,
                        }))
                    }
                }
            }

            // Never falls back to short options, so never Ok(None).
            return self.long_option(Prefix::W, false);
        }

        let arg = match needs {
            Need::Nothing => None,
            Need::Argument => {
                if !self.place.is_empty() {
                    self.optind += 1;
                    Some(mem::take(&mut self.place))
                } else if let Some(next) = self.args.get(self.optind) {
                    let arg = next.clone();
                    self.optind += 1;
                    Some(arg)
                } else {
                    return Err(failed(Error::ArgumentRequired {
                        option: option.to_string(),
                        prefix: Prefix::Dash,
                    }));
                }
            }
            Need::Optional => {
                if !self.place.is_empty() {
                    self.optind += 1;
                    Some(mem::take(&mut self.place))
                } else if self.settings.optional_lookahead
                    && self.table.ordering() != Ordering::Permute
                {
                    match self.args.get(self.optind) {
                        Some(next) if !next.starts_with(OPT_PREFIX) => {
                            let arg = next.clone();
                            self.optind += 1;
                            Some(arg)
                        }
                        _ => None,
                    }
                } else {
                    None
                }
            }
        };

        trace!("option {:?}, arg {:?}", option, arg);

        Ok(Some(Opt {
            kind: OptKind::Short(option),
            arg,
        }))
    }

    /// Handle the place cursor as a long option. The option text is the
    /// element at `optind` (or, for `-W`, the argument of `-W`).
    ///
    /// Returns `Ok(None)` if `short_fallback` is set and no long option
    /// matches; nothing is consumed in that case.
    fn long_option(&mut self, prefix: Prefix, short_fallback: bool) -> Result<Option<Opt>> {
        let token = mem::take(&mut self.place);

        let (name, inline_arg) = match token.split_once(LONG_ARG_SEPARATOR) {
            Some((name, arg)) => (name, Some(arg)),
            None => (token.as_str(), None),
        };

        let index = match self.lookup(name, short_fallback) {
            Lookup::Found(index) => index,
            Lookup::Missing if short_fallback => {
                trace!("{:?} is not a long option", token);
                self.place = token;
                return Ok(None);
            }
            Lookup::Missing => {
                self.optind += 1;
                return Err(failed(Error::UnrecognizedOption {
                    option: token,
                    prefix,
                }));
            }
            Lookup::Ambiguous(candidates) => {
                self.optind += 1;
                return Err(failed(Error::AmbiguousOption {
                    option: token,
                    candidates,
                    prefix,
                }));
            }
        };

        self.optind += 1;

        let found = self.long_options[index];

        let arg = match (found.needs, inline_arg) {
            (Need::Nothing, Some(_)) => {
                return Err(failed(Error::ArgumentNotAllowed {
                    option: found.name.into(),
                    prefix,
                }))
            }
            (_, Some(arg)) => Some(arg.to_string()),
            (Need::Argument, None) => match self.args.get(self.optind) {
                Some(next) => {
                    let arg = next.clone();
                    self.optind += 1;
                    Some(arg)
                }
                None => {
                    return Err(failed(Error::ArgumentRequired {
                        option: found.name.into(),
                        prefix,
                    }))
                }
            },
            (_, None) => None,
        };

        let kind = match found.flag {
            Some(flag) => {
                flag.set(found.value);
                OptKind::Flag { index }
            }
            None => OptKind::Long {
                value: found.value,
                index,
            },
        };

        trace!("long option {:?} (index {}), arg {:?}", found.name, index, arg);

        Ok(Some(Opt { kind, arg }))
    }

    /// Find the long option `name` refers to, either exactly or as an
    /// unambiguous abbreviation.
    fn lookup(&self, name: &str, short_fallback: bool) -> Lookup {
        if let Some(index) = self.long_options.iter().position(|o| o.name == name) {
            return Lookup::Found(index);
        }

        // A single character is left for the short option.
        if short_fallback && name.chars().count() == 1 {
            return Lookup::Missing;
        }

        let mut matches: Vec<usize> = Vec::new();

        for (index, candidate) in self.long_options.iter().enumerate() {
            if !candidate.name.starts_with(name) {
                continue;
            }

            let duplicate = matches
                .iter()
                .any(|&i| self.long_options[i].same_effect(candidate));

            if !duplicate {
                matches.push(index);
            }
        }

        match matches.as_slice() {
            [] => Lookup::Missing,
            [index] => Lookup::Found(*index),
            _ => Lookup::Ambiguous(
                matches
                    .iter()
                    .map(|&i| self.long_options[i].name.to_string())
                    .collect(),
            ),
        }
    }

    fn is_non_option(&self, element: &str) -> bool {
        !element.starts_with(OPT_PREFIX) || (element.len() == 1 && !self.table.has(OPT_PREFIX))
    }

    /// Set if `s` is exactly one registered short option character.
    fn is_short_option(&self, s: &str) -> bool {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => self.table.has(c),
            _ => false,
        }
    }

    /// Skip the non-option at `optind`, adding it to the run of non-options
    /// already skipped.
    fn skip_non_option(&mut self) {
        match (self.nonopt_start, self.nonopt_end) {
            (None, _) => self.nonopt_start = Some(self.optind),
            (Some(start), Some(end)) => {
                // Options have been processed since the run was skipped:
                // move them in front of it so the run can grow.
                self.exchange(start, end);
                self.nonopt_start = Some(self.optind - (end - start));
                self.nonopt_end = None;
            }
            (Some(_), None) => (),
        }

        trace!("skipping non-option {:?}", self.args[self.optind]);

        self.optind += 1;
    }

    /// End of scanning: move any skipped non-options after the options and
    /// point `optind` at the first of them.
    fn finish(&mut self) {
        self.place.clear();

        match (self.nonopt_start, self.nonopt_end) {
            (Some(start), Some(end)) => {
                self.exchange(start, end);
                self.optind -= end - start;
            }
            (Some(start), None) => self.optind = start,
            (None, _) => (),
        }

        self.nonopt_start = None;
        self.nonopt_end = None;
        self.done = true;

        debug!("end of options, {} argument(s) remain", self.remaining().len());
    }

    /// Exchange the block of non-options `[start, end)` with the block of
    /// options `[end, optind)`, keeping the order within each block.
    fn exchange(&mut self, start: usize, end: usize) {
        trace!(
            "moving options {:?} before non-options {:?}",
            &self.args[end..self.optind],
            &self.args[start..end]
        );

        self.args[start..self.optind].rotate_left(end - start);
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Opt>;

    /// Calls [Scanner::getopt()], continuing past errors, until there are
    /// no more options.
    fn next(&mut self) -> Option<Self::Item> {
        self.getopt().transpose()
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

fn failed(err: Error) -> Error {
    debug!("{}", err);
    err
}
