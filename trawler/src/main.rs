use colored::Colorize;
use trawler::commands::command_argument_builder;
use trawler::handlers::{handle_crawl, print_banner};
use trawler_scanner::CancelFlag;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => {
            // Ctrl-C stops dispatching; in-flight requests drain.
            let cancel = CancelFlag::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("\n{} Interrupted, finishing in-flight requests...", "⚠".yellow().bold());
                    on_interrupt.cancel();
                }
            });

            handle_crawl(primary_command, quiet, cancel).await;
        }
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
