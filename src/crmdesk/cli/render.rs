use chrono::{DateTime, Utc};
use colored::Colorize;
use crmdesk::error::CrmError;
use crmdesk::filter::Page;
use crmdesk::model::{Draft, Record};
use crmdesk::notify::{Notice, NoticeLevel, Notifier};
use crmdesk::validation::FieldErrors;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 24;
const DETAILS_WIDTH: usize = 36;
const STATUS_WIDTH: usize = 12;
const TIME_WIDTH: usize = 14;

/// Prints notices as they are reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        print_notice(&notice);
    }
}

pub(super) fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{}", notice.content.dimmed()),
        NoticeLevel::Success => println!("{}", notice.content.green()),
        NoticeLevel::Warning => println!("{}", notice.content.yellow()),
        NoticeLevel::Error => println!("{}", notice.content.red()),
    }
}

pub fn print_error(error: &CrmError) {
    if let Some(output) = render_error(error) {
        eprint!("{output}");
    }
}

/// What the terminal shows for a failed command. Backend failures were
/// already announced by the notifier and their details only go to the log,
/// so they add nothing here.
pub(super) fn render_error(error: &CrmError) -> Option<String> {
    match error {
        CrmError::LoadFailure(_) | CrmError::MutationFailure(_) => None,
        CrmError::ValidationFailure(errors) => Some(render_field_errors(errors)),
        other => Some(format!("Error: {other}\n")),
    }
}

pub(super) fn render_field_errors(errors: &FieldErrors) -> String {
    let mut output = String::new();
    for (field, message) in errors.iter() {
        output.push_str(&format!("{}: {}\n", field.bold(), message.red()));
    }
    output
}

pub(super) fn print_page<R: Record>(page: &Page<R>) {
    print!("{}", render_page(page, Utc::now()));
}

/// Table of one page plus the `a-b of n` summary line.
pub(super) fn render_page<R: Record>(page: &Page<R>, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    if page.items.is_empty() {
        output.push_str(&format!("No {} found.\n", R::NOUN_PLURAL));
    } else {
        let id_width = page
            .items
            .iter()
            .map(|r| r.id().as_str().width())
            .max()
            .unwrap_or(0)
            .max(2);

        output.push_str(&format!(
            "{}  {}  {}  {}  {}\n",
            pad_to_width("ID", id_width).dimmed(),
            pad_to_width("NAME", NAME_WIDTH).dimmed(),
            pad_to_width("DETAILS", DETAILS_WIDTH).dimmed(),
            pad_to_width("STATUS", STATUS_WIDTH).dimmed(),
            format!("{:>width$}", "CREATED", width = TIME_WIDTH).dimmed(),
        ));

        for record in &page.items {
            let details = record
                .search_fields()
                .into_iter()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" · ");
            output.push_str(&format!(
                "{}  {}  {}  {}  {}\n",
                pad_to_width(record.id().as_str(), id_width).yellow(),
                pad_to_width(record.label(), NAME_WIDTH).bold(),
                pad_to_width(&details, DETAILS_WIDTH),
                pad_to_width(&record.status().to_string(), STATUS_WIDTH).cyan(),
                format_time_ago(record.created_at(), now).dimmed(),
            ));
        }
    }

    let mut summary = page.summary(R::NOUN_PLURAL);
    if page.page_count() > 1 {
        summary.push_str(&format!(" (page {}/{})", page.number, page.page_count()));
    }
    output.push_str(&format!("{}\n", summary.dimmed()));
    output
}

pub(super) fn print_record<R: Record>(record: &R) {
    print!("{}", render_record(record, Utc::now()));
}

/// One `field  value` line per editable field, framed by the id and age.
/// Unset optional fields show as blank.
pub(super) fn render_record<R: Record>(record: &R, now: DateTime<Utc>) -> String {
    let draft = record.to_draft();
    let fields = <R::Draft as Draft>::FIELDS;
    let width = fields
        .iter()
        .map(|f| f.width())
        .chain(["created".width()])
        .max()
        .unwrap_or(0);

    let mut output = format!(
        "{}  {}\n",
        pad_to_width("id", width).dimmed(),
        record.id().as_str().yellow()
    );
    for field in fields {
        let value = draft.field(field).unwrap_or_default();
        let line = format!("{}  {}", pad_to_width(field, width).dimmed(), value);
        output.push_str(line.trim_end());
        output.push('\n');
    }
    let age = now
        .signed_duration_since(record.created_at())
        .to_std()
        .unwrap_or_default();
    output.push_str(&format!(
        "{}  {}\n",
        pad_to_width("created", width).dimmed(),
        Formatter::new().convert(age).dimmed()
    ));
    output
}

pub(super) fn render_fields(fields: &[&str]) -> String {
    fields.iter().map(|f| format!("{f}\n")).collect()
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let used = truncated.width();
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(used)))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
