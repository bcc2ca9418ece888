// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing long options, flags and `-W`, reporting every error
/// rather than stopping at the first one.
use std::cell::Cell;
use std::process::exit;

use gnopt::{get_args, LongOption, Need, OptKind, OptionTable, Scanner};

fn main() {
    env_logger::init();

    let brief = Cell::new('\0');

    let long_options = [
        // Both set the same flag, to different values.
        LongOption::new("brief", 'b').flag(&brief),
        LongOption::new("verbose", 'v').flag(&brief),
        LongOption::new("output", 'o').needs(Need::Argument),
        LongOption::new("level", 'l').needs(Need::Optional),
        LongOption::new("help", 'h'),
    ];

    let table = OptionTable::parse("ho:W;");

    let mut scanner = Scanner::new(get_args(), &table).long_options(&long_options);

    let mut errors = 0;

    for result in &mut scanner {
        let opt = match result {
            Ok(opt) => opt,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                errors += 1;
                continue;
            }
        };

        match opt.kind {
            OptKind::Flag { index } => {
                println!("INFO: --{} set flag to {:?}", long_options[index].name, brief.get())
            }
            OptKind::Long { index, .. } => {
                println!("INFO: --{} (arg: {:?})", long_options[index].name, opt.arg)
            }
            _ => println!("INFO: -{} (arg: {:?})", opt.code(), opt.arg),
        }
    }

    println!("INFO: files: {:?}", scanner.remaining());

    if errors > 0 {
        exit(1);
    }
}
