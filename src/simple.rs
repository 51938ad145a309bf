use anyhow::{bail, Result};
use colored::*;
use std::io::{self, BufRead, Write};

use crate::i18n::I18n;
use crate::present;
use crate::view::{Outcome, ResultView, ViewState};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    More,
    Search(String),
    Clear,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Command::Quit;
    }
    match line.strip_prefix('/') {
        Some(rest) if rest.trim().is_empty() => Command::Clear,
        Some(rest) => Command::Search(rest.trim().to_string()),
        // A bare word is a search too; only an empty line pages.
        None if line.is_empty() => Command::More,
        None => Command::Search(line.to_string()),
    }
}

/// Line-oriented browser for terminals without raw mode.
pub fn run(view: &ResultView, i18n: &I18n) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_with(view, i18n, &mut input, &mut out)
}

pub fn run_with<R: BufRead, W: Write>(
    view: &ResultView,
    i18n: &I18n,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut state = ViewState::new();
    view.load_next_page(&mut state);
    print_view(&state, 0, i18n, out)?;
    writeln!(out, "{}", i18n.t("simple_hint").dimmed())?;

    loop {
        write!(out, "{}", i18n.t("simple_prompt"))?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::More => {
                let before = state.rows().len();
                match view.load_next_page(&mut state) {
                    Outcome::Appended(_) | Outcome::Failed => {
                        print_view(&state, before, i18n, out)?
                    }
                    _ => writeln!(out, "{}", i18n.t("end_of_list").dimmed())?,
                }
            }
            Command::Search(query) => {
                view.run_search(&mut state, &query);
                print_view(&state, 0, i18n, out)?;
            }
            Command::Clear => {
                view.clear_search(&mut state);
                print_view(&state, 0, i18n, out)?;
            }
        }
    }
    Ok(())
}

/// One-shot search for the `lookup` subcommand. A blank query is an error.
pub fn lookup<W: Write>(view: &ResultView, i18n: &I18n, query: &str, out: &mut W) -> Result<()> {
    let mut state = ViewState::new();
    if view.run_search(&mut state, query) == Outcome::Skipped {
        bail!(i18n.t("error_blank_query"));
    }
    for line in present::table_lines(state.rows()) {
        writeln!(out, "{}", line)?;
    }
    if let Some(notice) = state.notice() {
        writeln!(out, "{}", present::notice_text(notice, i18n).yellow())?;
    }
    writeln!(out, "{}", present::status_text(state.status(), i18n).green())?;
    Ok(())
}

/// Print rows from `from` onward, then the notice and status line.
fn print_view<W: Write>(state: &ViewState, from: usize, i18n: &I18n, out: &mut W) -> Result<()> {
    if from == 0 {
        writeln!(
            out,
            "{}",
            format!("{} / {}", i18n.t("column_term"), i18n.t("column_translation")).cyan().bold()
        )?;
    }
    for line in present::table_lines(&state.rows()[from.min(state.rows().len())..]) {
        writeln!(out, "{}", line)?;
    }
    if let Some(notice) = state.notice() {
        writeln!(out, "{}", present::notice_text(notice, i18n).yellow())?;
    }
    writeln!(out, "{}", present::status_text(state.status(), i18n).green())?;
    Ok(())
}
