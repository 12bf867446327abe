/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};

const ARGS_CONFIG_FILE: &str = "config-file";
const ARGS_URI: &str = "uri";
const ARGS_DURATION: &str = "duration";
const ARGS_THREADS: &str = "threads";
const ARGS_VERBOSE: &str = "verbose";

#[derive(Debug)]
pub struct ProcArgs {
    pub config_file: Option<PathBuf>,
    pub uri: Option<String>,
    pub duration: Duration,
    pub threads: NonZeroUsize,
    pub verbose_level: u8,
}

impl Default for ProcArgs {
    fn default() -> Self {
        ProcArgs {
            config_file: None,
            uri: None,
            duration: Duration::from_secs(30),
            threads: NonZeroUsize::MIN.saturating_add(3),
            verbose_level: 0,
        }
    }
}

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Config file in yaml format")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .short('c')
                .long(ARGS_CONFIG_FILE),
        )
        .arg(
            Arg::new(ARGS_URI)
                .help("Collector uri, overrides the one in config file")
                .num_args(1)
                .value_name("URI")
                .value_hint(ValueHint::Url)
                .long(ARGS_URI),
        )
        .arg(
            Arg::new(ARGS_DURATION)
                .help("How many seconds to run")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .short('d')
                .long(ARGS_DURATION),
        )
        .arg(
            Arg::new(ARGS_THREADS)
                .help("Number of worker threads")
                .num_args(1)
                .value_name("COUNT")
                .value_parser(value_parser!(NonZeroUsize))
                .short('t')
                .long(ARGS_THREADS),
        )
        .arg(
            Arg::new(ARGS_VERBOSE)
                .help("Show verbose output")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .long(ARGS_VERBOSE),
        )
}

impl ProcArgs {
    fn parse_clap(args: &ArgMatches) -> Self {
        let mut proc_args = ProcArgs::default();
        if let Some(file) = args.get_one::<PathBuf>(ARGS_CONFIG_FILE) {
            proc_args.config_file = Some(file.to_path_buf());
        }
        if let Some(uri) = args.get_one::<String>(ARGS_URI) {
            proc_args.uri = Some(uri.to_string());
        }
        if let Some(secs) = args.get_one::<u64>(ARGS_DURATION) {
            proc_args.duration = Duration::from_secs(*secs);
        }
        if let Some(threads) = args.get_one::<NonZeroUsize>(ARGS_THREADS) {
            proc_args.threads = *threads;
        }
        if let Some(verbose_level) = args.get_one::<u8>(ARGS_VERBOSE) {
            proc_args.verbose_level = *verbose_level;
        }
        proc_args
    }
}

pub fn parse_clap() -> ProcArgs {
    let args = build_cli_args().get_matches();
    ProcArgs::parse_clap(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> ProcArgs {
        let args = build_cli_args().try_get_matches_from(argv).unwrap();
        ProcArgs::parse_clap(&args)
    }

    #[test]
    fn verify_cli() {
        build_cli_args().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&["spectator-demo"]);
        assert!(args.config_file.is_none());
        assert!(args.uri.is_none());
        assert_eq!(args.duration, Duration::from_secs(30));
        assert_eq!(args.threads.get(), 4);
        assert_eq!(args.verbose_level, 0);
    }

    #[test]
    fn all_set() {
        let args = parse(&[
            "spectator-demo",
            "-c",
            "demo.yaml",
            "--uri",
            "http://collector:7101/api/v4/publish",
            "-d",
            "10",
            "-t",
            "2",
            "-vv",
        ]);
        assert_eq!(args.config_file, Some(PathBuf::from("demo.yaml")));
        assert_eq!(
            args.uri.as_deref(),
            Some("http://collector:7101/api/v4/publish")
        );
        assert_eq!(args.duration, Duration::from_secs(10));
        assert_eq!(args.threads.get(), 2);
        assert_eq!(args.verbose_level, 2);
    }
}
