// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to handle options and positional arguments in the
/// order they are given (like `echo(1)` with options).
use gnopt::{get_args, OptKind, OptionTable, Result, Scanner};

fn main() -> Result<()> {
    env_logger::init();

    // A leading '-' reports positional arguments in order rather than
    // moving them to the end.
    let table = OptionTable::parse("-v");

    let mut verbose = false;

    let mut scanner = Scanner::new(get_args(), &table);

    for result in &mut scanner {
        let opt = result?;

        match opt.kind {
            OptKind::NonOption => {
                let value = opt.arg.unwrap_or_default();

                if verbose {
                    println!("INFO: positional argument: {:?}", value);
                } else {
                    println!("{}", value);
                }
            }
            OptKind::Short('v') => verbose = !verbose,
            _ => (),
        }
    }

    // Everything after "--".
    for value in scanner.remaining() {
        println!("{}", value);
    }

    Ok(())
}
