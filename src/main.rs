// Copyright 2024 The JsonCompare Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use json_compare::{
    compare_json_with, CompareError, ComparisonOptions, ComparisonSettings, NullComparison,
    PathMatching, PropertyNameMatching, ValueComparison,
};

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        eprintln!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        eprintln!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INTERNAL_ERROR: i32 = 1;
    const INVALID_ARGUMENT: i32 = 2;
    const PARSING_ERROR: i32 = 3;
    const DIFFERENCES_FOUND: i32 = 4;
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON file on the left side of the comparison
    left: PathBuf,

    /// JSON file on the right side of the comparison
    right: PathBuf,

    /// Path to ignore, e.g. `$.id` or `items.price`; may be repeated
    #[clap(short, long = "ignore")]
    ignore: Vec<String>,

    /// Stop after this many differences
    #[clap(short, long)]
    max_differences: Option<usize>,

    /// Compare numbers as decimals and strings as dates or UUIDs when possible
    #[clap(long)]
    semantic: bool,

    /// Treat a null field as equal to a missing one
    #[clap(long)]
    semantic_nulls: bool,

    /// Pair object properties regardless of case
    #[clap(long)]
    ignore_property_case: bool,

    /// Match ignore paths case-sensitively
    #[clap(long)]
    case_sensitive_paths: bool,

    /// Settings file with options and ignore paths
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,

    /// Log what the comparison is doing to stderr
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags given on the command line take precedence over the settings file.
    fn apply(&self, mut options: ComparisonOptions) -> ComparisonOptions {
        if self.semantic {
            options = options.value_comparison(ValueComparison::Semantic);
        }
        if self.semantic_nulls {
            options = options.null_comparison(NullComparison::Semantic);
        }
        if self.ignore_property_case {
            options = options.property_name_matching(PropertyNameMatching::IgnoreCase);
        }
        if self.case_sensitive_paths {
            options = options.path_matching(PathMatching::Ordinal);
        }
        if let Some(max) = self.max_differences {
            options = options.max_differences(max);
        }

        options
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "json_compare=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            handle_error!(
                Code::INVALID_ARGUMENT,
                "Error reading {}: {}",
                path.display(),
                err
            );
        }
    }
}

#[doc(hidden)]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => match ComparisonSettings::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
            }
        },
        None => ComparisonSettings::default(),
    };

    let options = cli.apply(settings.options().clone());
    let settings = cli
        .ignore
        .iter()
        .fold(settings.with_options(options), |settings, path| {
            settings.with_ignore_path(path)
        });

    let ignore_paths = match settings.ignore_paths() {
        Ok(ignore_paths) => ignore_paths,
        Err(err) => {
            handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
        }
    };
    debug!(options = ?settings.options(), "resolved comparison settings");

    let left = read_input(&cli.left);
    let right = read_input(&cli.right);

    let result = match compare_json_with(&left, &right, settings.options(), &ignore_paths) {
        Ok(result) => result,
        Err(err @ CompareError::Parse { .. }) => {
            handle_error!(Code::PARSING_ERROR, "Error: {}", err);
        }
        Err(err) => {
            handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
            }
        }
    } else {
        println!("{}", result.to_report_string());
    }

    if result.has_differences() {
        std::process::exit(Code::DIFFERENCES_FOUND);
    }
    std::process::exit(Code::SUCCESS);
}
