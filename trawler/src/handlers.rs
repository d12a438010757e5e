use crate::commands::expand_path;
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{Level, warn};
use trawler_core::crawl::{
    PageReport, ReportCallback, ScanOptions, ScanResults, UrlCallback, execute_scan,
};
use trawler_core::detect::DetectionOptions;
use trawler_scanner::{CancelFlag, CrawlMode, FetchSettings, IgnoreSet};

pub fn print_banner() {
    eprintln!(
        "{}",
        r#"
 _                         _
| |_ _ __ __ ___      _| | ___ _ __
| __| '__/ _` \ \ /\ / / |/ _ \ '__|
| |_| | | (_| |\ V  V /| |  __/ |
 \__|_|  \__,_| \_/\_/ |_|\___|_|
"#
        .bright_cyan()
        .bold()
    );
    eprintln!(
        "{} {}\n",
        "  recon crawler".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

/// Logs go to stderr so stdout stays a clean URL or JSON stream.
pub fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

// Helper functions for crawl handler

/// Read a newline delimited file, skipping blank lines.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Build the ignore set from `--ignore` or `--ignore-file`. The file wins
/// when both are somehow present.
pub fn load_ignore_list(inline: Option<&str>, file: Option<&Path>) -> Result<IgnoreSet> {
    if let Some(path) = file {
        return Ok(IgnoreSet::from_entries(load_lines(path)?));
    }
    Ok(inline.map(IgnoreSet::parse_inline).unwrap_or_default())
}

/// Parameter names from `--endpoints-file`, lowercased.
pub fn load_parameter_file(path: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for line in load_lines(path)? {
        let name = line.to_ascii_lowercase();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Parse a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Comma separated extensions, lowercased and without leading dots.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Map the `crawl` arguments onto the options the scan consumes.
pub fn build_scan_options(sub_matches: &ArgMatches) -> Result<ScanOptions> {
    let target = sub_matches
        .get_one::<String>("url")
        .context("--url is required")?
        .clone();

    let ignore_file = sub_matches
        .get_one::<String>("ignore-file")
        .map(|p| expand_path(p));
    let ignore = load_ignore_list(
        sub_matches.get_one::<String>("ignore").map(String::as_str),
        ignore_file.as_deref(),
    )?;

    let custom_parameters = match sub_matches.get_one::<String>("endpoints-file") {
        Some(path) => load_parameter_file(&expand_path(path))?,
        None => Vec::new(),
    };

    let detection = DetectionOptions {
        secrets: sub_matches.get_flag("secrets"),
        endpoints: sub_matches.get_flag("endpoints") || !custom_parameters.is_empty(),
        file_type_level: sub_matches.get_one::<u8>("ext").copied(),
        errors: sub_matches.get_flag("errors"),
        infos: sub_matches.get_flag("info"),
        ignore_extensions: sub_matches
            .get_one::<String>("ignore-ext")
            .map(|raw| parse_extension_list(raw))
            .unwrap_or_default(),
        custom_parameters,
    };

    let fetch = FetchSettings {
        timeout_secs: *sub_matches.get_one::<u64>("timeout").unwrap_or(&10),
        delay: Duration::from_secs(*sub_matches.get_one::<u64>("delay").unwrap_or(&0)),
        proxy: sub_matches.get_one::<String>("proxy").cloned(),
        user_agent: sub_matches.get_one::<String>("user-agent").cloned(),
        random_user_agent: sub_matches.get_flag("rua"),
        headers: sub_matches
            .get_many::<(String, String)>("header")
            .map(|headers| headers.cloned().collect())
            .unwrap_or_default(),
    };

    let mode = if sub_matches.get_flag("intensive") {
        CrawlMode::Intensive
    } else {
        CrawlMode::Normal
    };

    Ok(ScanOptions {
        target,
        mode,
        concurrency: *sub_matches.get_one::<usize>("concurrency").unwrap_or(&20),
        max_depth: *sub_matches.get_one::<usize>("max-depth").unwrap_or(&0),
        fetch,
        ignore,
        detection,
        report_every_response: sub_matches.get_flag("json"),
    })
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn section(out: &mut String, title: &str, count: usize) {
    out.push_str(&format!(
        "\n{} {}\n",
        title.bright_white().bold(),
        format!("({})", count).dimmed()
    ));
}

/// Grouped end-of-run summary for plain output.
pub fn render_summary(results: &ScanResults) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} URLs dispatched, {} pages scanned, {} failed\n",
        "✓".green().bold(),
        results.urls.len(),
        results.pages_scanned,
        results.failures
    ));

    if !results.secrets.is_empty() {
        section(&mut out, "SECRETS", results.secrets.len());
        for secret in &results.secrets {
            out.push_str(&format!(
                "  {} {} in {}\n      {}\n",
                "!".red().bold(),
                secret.name.red(),
                secret.url,
                secret.matched.bright_white()
            ));
        }
    }

    if !results.endpoints.is_empty() {
        section(&mut out, "ENDPOINTS", results.endpoints.len());
        for endpoint in &results.endpoints {
            out.push_str(&format!("  {} {}\n", "→".blue(), endpoint.url));
            for parameter in &endpoint.parameters {
                if parameter.attacks.is_empty() {
                    out.push_str(&format!("      {}\n", parameter.name));
                } else {
                    out.push_str(&format!(
                        "      {} {}\n",
                        parameter.name.yellow(),
                        format!("[{}]", parameter.attacks.join(", ")).dimmed()
                    ));
                }
            }
        }
    }

    if !results.file_types.is_empty() {
        section(&mut out, "FILE TYPES", results.file_types.len());
        for file in &results.file_types {
            out.push_str(&format!(
                "  {} {} {}\n",
                format!("[{}]", file.level).cyan(),
                file.category.label().cyan(),
                file.url
            ));
        }
    }

    if !results.errors.is_empty() {
        section(&mut out, "ERRORS", results.errors.len());
        for error in &results.errors {
            out.push_str(&format!(
                "  {} {} in {}\n      {}\n",
                "⚠".yellow(),
                error.name.yellow(),
                error.url,
                error.matched
            ));
        }
    }

    if !results.infos.is_empty() {
        section(&mut out, "INFOS", results.infos.len());
        for info in &results.infos {
            out.push_str(&format!(
                "  {} {} in {}\n      {}\n",
                "•".blue(),
                info.name,
                info.url,
                info.matched
            ));
        }
    }

    if results.cancelled {
        out.push_str(&format!(
            "\n{} Interrupted; results above are partial\n",
            "⚠".yellow().bold()
        ));
    }

    out
}

fn json_report_callback() -> ReportCallback {
    Arc::new(|report: PageReport| match report.to_json_line() {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Skipping JSON output for {}: {}", report.url, e),
    })
}

fn plain_url_callback(spinner: ProgressBar) -> UrlCallback {
    let count = Arc::new(AtomicUsize::new(0));
    Arc::new(move |url: &str| {
        let seen = count.fetch_add(1, Ordering::Relaxed) + 1;
        spinner.suspend(|| println!("{}", url));
        spinner.set_message(format!("Crawling... {} URLs dispatched", seen));
    })
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool, cancel: CancelFlag) {
    init_tracing(sub_matches.get_flag("debug"));

    let options = match build_scan_options(sub_matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };
    let json = options.report_every_response;

    if !json && !quiet {
        print_divider();
        println!("{} {}", "Target:".bright_white().bold(), options.target);
        println!(
            "{} {}",
            "Scope:".bright_white().bold(),
            match options.mode {
                CrawlMode::Normal => "same host",
                CrawlMode::Intensive => "root domain (intensive)",
            }
        );
        println!("{} {}", "Workers:".bright_white().bold(), options.concurrency);
        if options.max_depth > 0 {
            println!("{} {}", "Max depth:".bright_white().bold(), options.max_depth);
        }
        if !options.ignore.is_empty() {
            println!(
                "{} {}",
                "Ignoring:".bright_white().bold(),
                options.ignore.entries().join(", ")
            );
        }
        print_divider();
    }

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        pb
    };

    let (url_callback, report_callback) = if json {
        (None, Some(json_report_callback()))
    } else {
        (Some(plain_url_callback(spinner.clone())), None)
    };

    let results = match execute_scan(options, cancel, url_callback, report_callback).await {
        Ok(results) => results,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ Scan failed: {}", e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    if !json {
        println!();
        print!("{}", render_summary(&results));
    }
}
