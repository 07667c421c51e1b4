use crate::view::SortDirection;
use std::path::Path;

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Submit(String),
    Filter(String),
    ClearFilter,
    Sort {
        column: String,
        direction: SortDirection,
    },
    ClearSort,
    History,
    Rerun(usize),
    Open(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('\\') {
            return match line {
                "exit" | "quit" => Self::Quit,
                "help" | "?" => Self::Help,
                _ => Self::Submit(line.to_string()),
            };
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "\\q" => Self::Quit,
            "\\?" => Self::Help,
            "\\f" => Self::Filter(rest.to_string()),
            "\\c" => Self::ClearFilter,
            "\\u" => Self::ClearSort,
            "\\h" => Self::History,
            "\\s" => Self::parse_sort(rest).unwrap_or_else(|| Self::Unknown(line.to_string())),
            "\\r" => rest
                .parse()
                .map(Self::Rerun)
                .unwrap_or_else(|_| Self::Unknown(line.to_string())),
            "\\open" if !rest.is_empty() => Self::Open(rest.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }

    fn parse_sort(rest: &str) -> Option<Self> {
        let mut parts = rest.split_whitespace();
        let column = parts.next()?.to_string();
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Ascending,
            Some("desc") => SortDirection::Descending,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::Sort { column, direction })
    }
}

/// Query that previews a Parquet file, or every Parquet file in a directory
pub fn open_query(path: &str) -> String {
    let target = if Path::new(path).is_dir() {
        format!("{}/*.parquet", path.trim_end_matches('/'))
    } else {
        path.to_string()
    };
    format!("SELECT * FROM '{}' LIMIT 100", target.replace('\'', "''"))
}
