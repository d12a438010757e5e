use crate::handlers::parse_header;
use clap::{arg, command};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("trawler")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("trawler")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a target within its scope and hunt for secrets, endpoints, \
                interesting files, errors and information disclosures.",
                )
                // Target and scope
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The target to crawl. A missing scheme defaults to http"),
                )
                .arg(
                    arg!(-i --"intensive")
                        .required(false)
                        .help("Crawl every subdomain of the target's root domain")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"ignore" <SUBSTRINGS>)
                        .required(false)
                        .help("Comma separated substrings; matching URLs are never crawled")
                        .conflicts_with("ignore-file"),
                )
                .arg(
                    arg!(--"ignore-file" <PATH>)
                        .required(false)
                        .help("Newline delimited file of substrings to exclude from the crawl")
                        .conflicts_with("ignore"),
                )
                .arg(
                    arg!(-D --"max-depth" <DEPTH>)
                        .required(false)
                        .help("Maximum link depth from the target, the target being 1 (0 = unlimited)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                // Transport
                .arg(
                    arg!(-c --"concurrency" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async workers in the worker pool")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-d --"delay" <SECONDS>)
                        .required(false)
                        .help("Delay each worker takes between requests, in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0"),
                )
                .arg(
                    arg!(--"proxy" <URL>)
                        .required(false)
                        .help("Send every request through this proxy"),
                )
                .arg(
                    arg!(-A --"user-agent" <AGENT>)
                        .required(false)
                        .help("Use a fixed User-Agent")
                        .conflicts_with("rua"),
                )
                .arg(
                    arg!(--"rua")
                        .required(false)
                        .help("Use a random browser User-Agent on every request")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("user-agent"),
                )
                .arg(
                    arg!(-H --"header" <HEADER>)
                        .required(false)
                        .help("Extra request header as 'Name: value'. Can be repeated")
                        .value_parser(parse_header)
                        .action(clap::ArgAction::Append),
                )
                // Detection
                .arg(
                    arg!(-s --"secrets")
                        .required(false)
                        .help("Hunt for secrets in response bodies")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-e --"endpoints")
                        .required(false)
                        .help("Report URLs carrying juicy query parameters")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"endpoints-file" <PATH>)
                        .required(false)
                        .help("Newline delimited file of extra parameter names to flag (implies -e)"),
                )
                .arg(
                    arg!(-E --"errors")
                        .required(false)
                        .help("Hunt for error messages and stack traces")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-I --"info")
                        .required(false)
                        .help("Hunt for information disclosures")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-x --"ext" <LEVEL>)
                        .required(false)
                        .help(
                            "Report interesting file types. 1 = key material only ... \
                        7 = everything",
                        )
                        .value_parser(clap::value_parser!(u8).range(1..=7)),
                )
                .arg(
                    arg!(--"ignore-ext" <EXTENSIONS>)
                        .required(false)
                        .help("Comma separated extensions whose bodies skip secret and error hunting"),
                )
                // Output
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print one JSON object per scanned response")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"debug")
                        .required(false)
                        .help("Log per-URL failures and other diagnostics to stderr")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

/// Path arguments accept `~`.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
