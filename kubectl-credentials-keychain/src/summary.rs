use console::style;
use tabular::{row, Table};

use kubecreds::{
    loader::backup_path,
    report::{Action, Report},
};

fn good(action: Action) -> bool {
    matches!(
        action,
        Action::Stored
            | Action::Replaced
            | Action::AlreadyStored
            | Action::Delegated
            | Action::Restored
    )
}

/// Print what a run did to stderr, one row per user and context.
pub fn print(report: &Report) {
    let path = report.path.display();

    if report.entries.is_empty() {
        eprintln!("Nothing to do in {path}");
        return;
    }

    let mut table = Table::new("{:<}  {:<}  {:<}  {:<}");
    table.add_row(row!("USER", "CONTEXT", "SERVER", "RESULT"));
    for entry in &report.entries {
        table.add_row(row!(
            &entry.user,
            entry.context.as_deref().unwrap_or("-"),
            entry.server.as_deref().unwrap_or("-"),
            entry.action
        ));
    }

    let rendered = table.to_string();
    let mut lines = rendered.lines();
    if let Some(header) = lines.next() {
        eprintln!("{}", style(header).bold());
    }
    for (line, entry) in lines.zip(&report.entries) {
        if good(entry.action) {
            eprintln!("{}", style(line).green());
        } else {
            eprintln!("{}", style(line).yellow());
        }
    }

    if report.written {
        eprintln!(
            "\nUpdated {path} (previous version in {})",
            backup_path(&report.path).display()
        );
    } else {
        eprintln!("\nNo changes written to {path}");
    }
}
