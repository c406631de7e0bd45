use std::io::{self, Write};

use leadgen_core::{CampaignSnapshot, JobLead, LogEntry};

/// Prints log entries as they appear, remembering how many it has shown.
#[derive(Debug, Default)]
pub(crate) struct LogPrinter {
    printed: usize,
}

impl LogPrinter {
    pub(crate) fn on_change(&mut self, view: &CampaignSnapshot, out: &mut impl Write) -> io::Result<()> {
        // A relaunch or reset starts a fresh log.
        if view.logs.len() < self.printed {
            self.printed = 0;
        }
        for entry in &view.logs[self.printed..] {
            writeln!(out, "{}", format_entry(entry))?;
        }
        self.printed = view.logs.len();
        out.flush()
    }
}

pub(crate) fn format_entry(entry: &LogEntry) -> String {
    format!("[{}] {:<6} {}", entry.timestamp, entry.category, entry.message)
}

pub(crate) fn render_summary(view: &CampaignSnapshot, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Status: {} | Found Jobs ({})", view.status_label, view.lead_count)?;
    if view.leads.is_empty() {
        return Ok(());
    }
    let widths = column_widths(&view.leads);
    writeln!(
        out,
        "{:<w0$}  {:<w1$}  {:<w2$}  URL",
        "TITLE",
        "COMPANY",
        "LOCATION",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    )?;
    for lead in &view.leads {
        writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:<w2$}  {}",
            lead.title,
            lead.company,
            lead.location,
            lead.url,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )?;
    }
    Ok(())
}

fn column_widths(leads: &[JobLead]) -> [usize; 3] {
    leads.iter().fold(
        ["TITLE".len(), "COMPANY".len(), "LOCATION".len()],
        |[title, company, location], lead| {
            [
                title.max(lead.title.chars().count()),
                company.max(lead.company.chars().count()),
                location.max(lead.location.chars().count()),
            ]
        },
    )
}
