//! Plain-text reports printed by the subcommands

use std::fmt;

/// A titled block of aligned `key: value` rows.
///
/// ```
/// use ten_thousand::cli::output::Report;
///
/// let report = Report::new("Evaluation").row("Games", 1000);
/// assert!(report.to_string().contains("Games:"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    rows: Vec<(String, String)>,
}

impl Report {
    const RULE: usize = 60;
    const KEY_WIDTH: usize = 24;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.rows.push((key.into(), value.to_string()));
        self
    }

    /// Add a row only when `value` is present.
    pub fn row_opt<T: fmt::Display>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.row(key, value),
            None => self,
        }
    }

    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(Self::RULE);
        writeln!(f, "\n{rule}\n{}\n{rule}", self.title)?;
        for (key, value) in &self.rows {
            writeln!(f, "  {:<width$} {value}", format!("{key}:"), width = Self::KEY_WIDTH)?;
        }
        Ok(())
    }
}

/// Group digits in threes: `1234567` becomes `1,234,567`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let groups: Vec<String> = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|group| group.iter().map(|&b| char::from(b)).collect())
        .collect();
    groups.join(",")
}
