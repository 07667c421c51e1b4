use super::command::{open_query, ShellCommand};
use crate::session::{QuerySession, SessionEvent};
use crate::view::{Alignment, SortDirection};
use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

const DISPLAY_LIMIT: usize = 20;
const MAX_CELL_CHARS: usize = 50;

pub struct InteractiveRepl {
    session: QuerySession,
}

impl InteractiveRepl {
    pub fn new(session: QuerySession) -> Self {
        Self { session }
    }

    pub async fn run(mut self) -> Result<()> {
        self.print_welcome();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.print_prompt()?;
            let Some(input) = lines.next_line().await? else {
                break;
            };

            match ShellCommand::parse(&input) {
                ShellCommand::Quit => break,
                ShellCommand::Empty => {}
                ShellCommand::Help => self.print_help(),
                ShellCommand::Submit(query) => self.run_query(query).await,
                ShellCommand::Open(path) => {
                    let query = open_query(&path);
                    println!("{}: {}", "Running".dimmed(), query.green());
                    self.run_query(query).await;
                }
                ShellCommand::Rerun(index) => match self.session.history().get(index) {
                    Some(query) => {
                        let query = query.to_string();
                        println!("{}: {}", "Running".dimmed(), query.green());
                        self.run_query(query).await;
                    }
                    None => eprintln!("{}: No history entry {}", "Error".red(), index),
                },
                ShellCommand::History => self.print_history(),
                ShellCommand::Filter(text) => {
                    self.session.set_filter(&text);
                    self.display_view();
                }
                ShellCommand::ClearFilter => {
                    self.session.clear();
                    self.display_view();
                }
                ShellCommand::Sort { column, direction } => self.sort(&column, direction),
                ShellCommand::ClearSort => {
                    self.session.clear_sort();
                    self.display_view();
                }
                ShellCommand::Unknown(cmd) => {
                    eprintln!("{}: Unknown command '{}'", "Error".red(), cmd);
                    println!("Type {} for help", "\\?".yellow());
                }
            }
        }

        self.session.shutdown().await;
        println!("\n{}", "Goodbye!".green());
        Ok(())
    }

    async fn run_query(&mut self, query: String) {
        if let Err(e) = self.session.submit(query) {
            eprintln!("{}: {}", "Error executing query".red(), e);
            return;
        }

        match self.session.pump().await {
            Some(SessionEvent::QueryCompleted { .. }) => self.display_view(),
            Some(SessionEvent::QueryFailed { message, .. }) => {
                eprintln!("{}: {}", "Error executing query".red(), message);
            }
            _ => {}
        }
    }

    fn sort(&mut self, column: &str, direction: SortDirection) {
        let columns = self.session.current_columns();
        let index = column.parse::<usize>().ok().or_else(|| {
            columns
                .iter()
                .position(|name| name.eq_ignore_ascii_case(column))
        });

        match index {
            Some(index) if self.session.set_sort(index, direction) => self.display_view(),
            _ => eprintln!("{}: Unknown column '{}'", "Error".red(), column),
        }
    }

    fn display_view(&self) {
        println!();

        let columns = self.session.current_columns();
        if columns.is_empty() {
            println!("{}", "No results found.".yellow());
            return;
        }

        let estimator = self.session.estimator();
        let widths: Vec<usize> = (0..columns.len())
            .map(|i| {
                self.session
                    .current_widths()
                    .get(i)
                    .map(|w| estimator.to_chars(w))
                    .unwrap_or(0)
                    .min(MAX_CELL_CHARS)
            })
            .collect();

        let mut header = String::new();
        for (name, width) in columns.iter().zip(&widths) {
            header.push_str(&format!("{:<width$} ", truncate(name, *width), width = *width));
        }
        println!("{}", header.bold());

        let mut separator = String::new();
        for width in &widths {
            separator.push_str(&"─".repeat(*width));
            separator.push(' ');
        }
        println!("{}", separator.dimmed());

        let view = self.session.view();
        for position in 0..view.visible_rows().min(DISPLAY_LIMIT) {
            let (Some(source), Some(row)) = (
                view.source_index(position),
                self.session.visible_row(position),
            ) else {
                continue;
            };

            let mut row_str = String::new();
            for (column, (value, width)) in row.iter().zip(&widths).enumerate() {
                let text = truncate(&value.render(), *width);
                let hint = self.session.cell_hint(source, column);
                let cell = match hint {
                    Some(hint) if hint.alignment == Alignment::Right => {
                        format!("{:>width$}", text, width = *width)
                    }
                    _ => format!("{:<width$}", text, width = *width),
                };
                if hint.is_some_and(|hint| hint.negative) {
                    row_str.push_str(&cell.red().to_string());
                } else {
                    row_str.push_str(&cell);
                }
                row_str.push(' ');
            }
            println!("{}", row_str);
        }

        if view.visible_rows() > DISPLAY_LIMIT {
            println!(
                "\n{}",
                format!("... and {} more rows", view.visible_rows() - DISPLAY_LIMIT).dimmed()
            );
        }

        println!("\n{}", view.status_line().dimmed());
    }

    fn print_history(&self) {
        println!("\n{}", "=== History ===".cyan().bold());
        for (index, query) in self.session.history().iter().enumerate() {
            println!("{:>3}  {}", index.to_string().yellow(), query);
        }
        println!("\nRun again with: {} {}", "\\r".green(), "<n>".yellow());
    }

    fn print_welcome(&self) {
        println!("{}", "╔═══════════════════════════════════════╗".blue());
        println!("{}", "║        parqsql interactive query      ║".blue());
        println!("{}", "╚═══════════════════════════════════════╝".blue());
        println!();
        println!(
            "Type {} for help, {} to quit",
            "\\?".yellow(),
            "\\q".yellow()
        );
        println!();
    }

    fn print_prompt(&self) -> Result<()> {
        print!("{} ", "sql>".green().bold());
        io::stdout().flush()?;
        Ok(())
    }

    fn print_help(&self) {
        println!("\n{}", "=== Commands ===".cyan().bold());
        println!("  • {} - Run a query", "<sql>".green());
        println!("  • {} - Preview a Parquet file or directory", "\\open <path>".green());
        println!("  • {} - Filter visible rows (regex or text)", "\\f <text>".green());
        println!("  • {} - Clear the filter", "\\c".green());
        println!("  • {} - Sort by column name or index", "\\s <col> [asc|desc]".green());
        println!("  • {} - Clear the sort", "\\u".green());
        println!("  • {} - Show query history", "\\h".green());
        println!("  • {} - Re-run history entry", "\\r <n>".green());
        println!("  • {} - Show this help", "\\?, help".green());
        println!("  • {} - Exit", "\\q, exit, quit".green());
        println!();
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}
