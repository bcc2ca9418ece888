// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! GNU-compatible command-line option scanning.
//!
//! This crate scans an argument vector for options exactly the way GNU
//! `getopt(3)`, `getopt_long(3)` and `getopt_long_only(3)` do, returning
//! one option per call. It does not generate help text, validate values
//! or convert them: option arguments are returned as strings.
//!
//! If you want lots of extra features, you should consider the excellent
//! [`clap`](https://crates.io/crates/clap) crate instead.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Examples](#examples)
//! * [Details](#details)
//! * [Differences from getopt(3)](#differences-from-getopt3)
//!
//! ---
//!
//! # Overview
//!
//! - An [OptionTable] describes the short options, built from a `getopt(3)`
//!   specification string such as `"ab:c::"`.
//! - A list of [LongOption]s describes the long options (optional).
//! - A [Scanner] owns the argument vector and returns the next option each
//!   time [Scanner::getopt()] is called. It is also an [Iterator].
//!
//! # Quickstart
//!
//! ```rust
//! use gnopt::{OptionTable, Result, Scanner};
//!
//! fn main() -> Result<()> {
//!     let args: Vec<String> = ["prog", "-a", "f1", "f2", "f3"]
//!         .iter()
//!         .map(|s| s.to_string())
//!         .collect();
//!
//!     // Support "-a <value>".
//!     let table = OptionTable::parse("a:");
//!
//!     let mut scanner = Scanner::new(args, &table);
//!
//!     while let Some(opt) = scanner.getopt()? {
//!         assert_eq!(opt.code(), 'a');
//!         assert_eq!(opt.arg.as_deref(), Some("f1"));
//!     }
//!
//!     assert_eq!(scanner.remaining(), ["f2", "f3"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Examples
//!
//! Long options, with a flag and an abbreviation:
//!
//! ```rust
//! use std::cell::Cell;
//!
//! use gnopt::{LongOption, Need, OptKind, OptionTable, Scanner};
//!
//! let verbose = Cell::new('\0');
//!
//! let long_options = [
//!     LongOption::new("verbose", 'v').flag(&verbose),
//!     LongOption::new("file", 'f').needs(Need::Argument),
//! ];
//!
//! let args: Vec<String> = ["prog", "--verb", "--file=out.txt", "input"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let table = OptionTable::parse("vf:");
//!
//! let mut scanner = Scanner::new(args, &table).long_options(&long_options);
//!
//! let opt = scanner.getopt().unwrap().unwrap();
//! assert_eq!(opt.kind, OptKind::Flag { index: 0 });
//! assert_eq!(verbose.get(), 'v');
//!
//! let opt = scanner.getopt().unwrap().unwrap();
//! assert_eq!(opt.code(), 'f');
//! assert_eq!(opt.arg.as_deref(), Some("out.txt"));
//!
//! assert_eq!(scanner.getopt(), Ok(None));
//! assert_eq!(scanner.remaining(), ["input"]);
//! ```
//!
//! Errors are values: scanning can carry on after one.
//!
//! ```rust
//! use gnopt::{OptionTable, Scanner};
//!
//! let args: Vec<String> = ["prog", "-acb"].iter().map(|s| s.to_string()).collect();
//!
//! let table = OptionTable::parse("");
//!
//! let errors: Vec<String> = Scanner::new(args, &table)
//!     .filter_map(|r| r.err())
//!     .map(|e| e.to_string())
//!     .collect();
//!
//! assert_eq!(
//!     errors,
//!     [
//!         "unrecognized option '-a'",
//!         "unrecognized option '-c'",
//!         "unrecognized option '-b'",
//!     ]
//! );
//! ```
//!
//! For further examples, try out the programs in the `demos/` directory:
//!
//! ```bash
//! $ cargo run --example short-options -- -v -o out.txt -O2 file1 file2
//! $ cargo run --example long-options -- --verb --output=out.txt -W level=3 file1
//! $ RUST_LOG=trace cargo run --example in-order -- one -v two -- -v three
//! ```
//!
//! # Details
//!
//! ## Short options
//!
//! The specification is a list of option characters. A character followed
//! by `:` needs an argument, which is the rest of the argument it appears in
//! (`-ofile`) or else the next argument (`-o file`, even if that starts with
//! a dash). A character followed by `::` accepts an optional argument, which
//! must be attached (`-O2`). Options can be grouped (`-vO2`).
//!
//! ## Long options
//!
//! Long options start with `--`. They may be abbreviated as long as the
//! abbreviation is unique or is an exact match for some option. An argument
//! follows `=` (`--file=name`), or for options that need an argument, can
//! be the next argument (`--file name`).
//!
//! If the specification includes `W;`, `-W name` is the same as `--name`.
//!
//! ## Ordering
//!
//! By default, arguments that are not options are moved to the end of the
//! argument vector as scanning proceeds, so that options and non-options
//! can be mixed. See [Ordering] for the alternatives, selected by starting
//! the specification with `+` or `-`. The [POSIXLY_CORRECT] environment
//! variable also disables the permutation.
//!
//! The special argument `--` ends option scanning in every mode.
//!
//! # Differences from getopt(3)
//!
//! - There is no global state: everything is held by the [Scanner].
//! - Errors are never printed. They are returned as [Error] values whose
//!   text matches the message GNU `getopt` would print. A leading `:` in the
//!   specification is accepted but has no effect.
//! - Instead of `optarg`, `optopt` and `longindex`, each call returns an
//!   [Opt] describing what was found.
//! - A long option flag is set through a [Cell](std::cell::Cell) and the
//!   option is reported as [OptKind::Flag], rather than as a `0` return
//!   value.
//! - Instead of assigning `optind`, call [Scanner::rewind()].

mod error;
mod scanner;
mod table;

pub use error::{Error, Prefix, Result};

pub use scanner::{
    get_args, Opt, OptKind, Scanner, Settings, FLAG_CODE, NON_OPTION_CODE,
};

pub use table::{LongOption, Need, OptionTable, Ordering, POSIXLY_CORRECT};
