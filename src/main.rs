use clap::{Parser, Subcommand};
use monorel::commands;
use monorel::core::error::{print_error, AlignError};

/// Align a fleet of repositories onto one monolithic release version
#[derive(Parser)]
#[command(name = "monorel")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Align every repository in a set to one shared version
  Align {
    /// Repository set to process (default: first configured set)
    set: Option<String>,
    /// Show what would happen without modifying any repository
    #[arg(long)]
    dry_run: bool,
    /// Worker pool size for the apply and publish phases
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show configured sets and current repository versions
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Align {
      set,
      dry_run,
      jobs,
      json,
    } => commands::align::run_align(set.as_deref(), dry_run, jobs, json),
    Commands::Status { json } => commands::status::run_status(json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: AlignError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
