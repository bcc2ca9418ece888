// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing how to handle short options, including options
/// that need an argument and options with an optional argument.
use gnopt::{get_args, OptionTable, Result, Scanner};

/// The settings this program builds from its command line.
#[derive(Clone, Debug, Default)]
struct Config {
    // "-v" may be given more than once.
    verbose: usize,
    output: Option<String>,
    level: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config = Config::default();

    // Support "-v", "-o <value>" and "-O[value]".
    let table = OptionTable::parse("vo:O::");

    let mut scanner = Scanner::new(get_args(), &table);

    // Stop at the first error.
    while let Some(opt) = scanner.getopt()? {
        println!("INFO: option: {:?}", opt);

        match opt.code() {
            'v' => config.verbose += 1,
            'o' => config.output = opt.arg,
            'O' => config.level = opt.arg.or_else(|| Some("1".into())),
            _ => (),
        };
    }

    println!("INFO: config: {:?}", config);
    println!("INFO: files: {:?}", scanner.remaining());

    Ok(())
}
