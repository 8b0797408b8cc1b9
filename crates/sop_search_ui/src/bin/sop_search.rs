//! sop-search: terminal front end for the SOP Assistant.
//! Reads config, sends a question to the `/search` endpoint and prints the
//! answer with its source cards. `--interactive` keeps the page open for
//! repeated searches.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use sop_search_client::{config, Client, Config, Domain};
use sop_search_ui::{render, PageState, SearchController, SearchPage};
use tokio::runtime::Runtime;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Html,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sop-search", version, about = "Ask the SOP Assistant a question")]
struct Cli {
    /// Question to ask; the first line of stdin is used when omitted.
    question: Option<String>,

    /// Corpus to search (`sop`, `support`, ...). Defaults to the config value.
    #[arg(short, long)]
    domain: Option<String>,

    /// Config file (defaults to ~/.sop-assistant/config.yaml).
    #[arg(long, env = "SOP_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Ask configured example question N (1-based) instead of QUESTION.
    #[arg(long, value_name = "N", conflicts_with = "question")]
    suggest: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Keep reading questions and commands from stdin.
    #[arg(short, long)]
    interactive: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = config::load_or_default(cli.config.as_deref()).context("failed to load config")?;
    let domain = cli
        .domain
        .as_deref()
        .map(Domain::from)
        .unwrap_or_else(|| cfg.default_domain());
    let client =
        Client::new(cfg.base_url(), cfg.timeout()).context("failed to build search client")?;
    tracing::info!(endpoint = client.endpoint(), %domain, "search client ready");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    let mut controller = SearchController::new(&domain);

    if cli.interactive {
        interactive(&rt, &mut controller, &client, &cfg, cli.output)?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(n) = cli.suggest {
        let query = suggestion(&cfg, n)?;
        rt.block_on(controller.search_suggestion(query, &client));
    } else {
        let question = match cli.question {
            Some(q) => q,
            None => read_question()?,
        };
        controller.set_query(&question);
        rt.block_on(controller.perform_search(&client));
    }

    let page = controller.page();
    if page.state() == PageState::Error && cli.output == Output::Text {
        eprint!("{}", render::render_terminal(page));
    } else {
        print_page(&mut io::stdout().lock(), page, cli.output)?;
    }

    Ok(if page.state() == PageState::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// First line of stdin, untrimmed; validation happens in the controller.
fn read_question() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read question from stdin")?;
    Ok(line)
}

fn suggestion(cfg: &Config, n: usize) -> anyhow::Result<&str> {
    match n.checked_sub(1).and_then(|i| cfg.search.suggestions.get(i)) {
        Some(s) => Ok(s.as_str()),
        None => bail!(
            "no suggestion {n} (config has {})",
            cfg.search.suggestions.len()
        ),
    }
}

fn print_page(out: &mut impl Write, page: &SearchPage, output: Output) -> anyhow::Result<()> {
    match output {
        Output::Text => out.write_all(render::render_terminal(page).as_bytes())?,
        Output::Html => out.write_all(page.results_html().as_bytes())?,
        Output::Json => {
            serde_json::to_writer_pretty(&mut *out, page)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Query(&'a str),
    Domain(&'a str),
    New,
    Suggestions,
    Suggest(&'a str),
    Help,
    Quit,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Command::Query(line);
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "domain" => Command::Domain(arg),
            "new" => Command::New,
            "suggestions" => Command::Suggestions,
            "suggest" => Command::Suggest(arg),
            "quit" | "q" => Command::Quit,
            _ => Command::Help,
        }
    }
}

const HELP: &str = "\
Type a question and press Enter to search.
  :domain NAME   switch corpus (sop, support, ...)
  :new           clear results and start a new search
  :suggestions   list example questions
  :suggest N     ask example question N
  :quit          exit";

/// Submit the current input, showing the loading text while waiting.
fn submit(rt: &Runtime, controller: &mut SearchController, client: &Client) {
    let Some(pending) = controller.begin_search() else {
        return;
    };
    eprintln!("{}", controller.page().loading.text);
    let result = rt.block_on(client.search(&pending.request));
    controller.complete_search(pending.token, result);
}

fn interactive(
    rt: &Runtime,
    controller: &mut SearchController,
    client: &Client,
    cfg: &Config,
    output: Output,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Searching {} (:help for commands)",
        controller.page().domain
    )?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::New => {
                controller.reset_search();
                writeln!(out, "Ready for a new search.")?;
            }
            Command::Domain(name) if name.is_empty() => {
                writeln!(out, "Domain: {}", controller.page().domain)?;
            }
            Command::Domain(name) => {
                controller.set_domain(&Domain::from(name));
                writeln!(out, "Domain: {}", controller.page().domain)?;
            }
            Command::Suggestions => {
                for (i, s) in cfg.search.suggestions.iter().enumerate() {
                    writeln!(out, "  {}. {s}", i + 1)?;
                }
            }
            Command::Suggest(arg) => {
                let picked = arg
                    .parse::<usize>()
                    .map_err(anyhow::Error::from)
                    .and_then(|n| suggestion(cfg, n));
                match picked {
                    Ok(query) => {
                        controller.set_query(query);
                        submit(rt, controller, client);
                        print_page(&mut out, controller.page(), output)?;
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Query(text) => {
                controller.set_query(text);
                submit(rt, controller, client);
                print_page(&mut out, controller.page(), output)?;
            }
        }
    }
    Ok(())
}
