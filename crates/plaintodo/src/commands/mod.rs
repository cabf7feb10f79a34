use std::io::Write;

use anyhow::Result;
use plaintodo_app::{LineStore, Listing, MutationEngine, ReportService};
use plaintodo_core::{Diff, ListId};

use crate::{Command, OutputFormat};

pub fn run<S: LineStore, W: Write>(
    command: Command,
    engine: &MutationEngine<S>,
    reports: &ReportService<S>,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Ls { tag, done, format } => {
            let list = if done { ListId::Completed } else { ListId::Pending };
            let listing = reports.listing(list, tag.as_deref())?;
            match format {
                OutputFormat::Table => render_listing(&listing, out)?,
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&listing.lines)?)?;
                }
            }
        }
        Command::All { tag } => {
            for listing in reports.listing_all(tag.as_deref())? {
                writeln!(out, "{}", heading(listing.list))?;
                render_listing(&listing, out)?;
            }
        }
        Command::Add { text } => {
            let diff = engine.append(ListId::Pending, &text.join(" "))?;
            render_change(&diff, out)?;
        }
        Command::Del { range } => {
            let diff = engine.delete_range(ListId::Pending, &range)?;
            render_change(&diff, out)?;
        }
        Command::Change { range, text } => {
            let diff = engine.replace_range(ListId::Pending, &range, &text.join(" "))?;
            render_change(&diff, out)?;
        }
        Command::Done { range } => {
            let diff = engine.mark_done(&range)?;
            render_change(&diff, out)?;
        }
        Command::Undone { range } => {
            let diff = engine.mark_undone(&range)?;
            render_change(&diff, out)?;
        }
        Command::Revert => {
            if engine.revert()? {
                writeln!(out, "Reverted to snapshot")?;
            } else {
                writeln!(out, "Nothing to revert")?;
            }
        }
        Command::Diff => {
            write!(out, "{}", engine.diff(ListId::Pending)?)?;
        }
        Command::Report { format } => {
            let report = reports.report()?;
            match format {
                OutputFormat::Table => write!(out, "{}", report.table())?,
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                }
            }
        }
        Command::Expand { partial } => {
            writeln!(out, "{}", reports.expand_tag(&partial)?)?;
        }
    }
    Ok(())
}

const fn heading(list: ListId) -> &'static str {
    match list {
        ListId::Pending => "todo",
        ListId::Completed => "done",
    }
}

fn render_listing<W: Write>(listing: &Listing, out: &mut W) -> Result<()> {
    for line in &listing.lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn render_change<W: Write>(diff: &Diff, out: &mut W) -> Result<()> {
    if diff.is_empty() {
        writeln!(out, "No changes")?;
    } else {
        write!(out, "{diff}")?;
    }
    Ok(())
}
