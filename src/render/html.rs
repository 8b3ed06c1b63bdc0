//! Small HTML building blocks shared by every report.
//!
//! All text handed to these helpers is escaped; generators never splice raw
//! command output into markup themselves.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FLOAT_PREFIX: Regex =
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap();
}

/// Escape the five HTML-significant characters
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Leading numeric value of a cell, read the way JavaScript's `parseFloat` does.
///
/// Only ASCII digits count, and a signed `Infinity` is a number.
pub fn parse_float_prefix(cell: &str) -> Option<f64> {
    FLOAT_PREFIX
        .find(cell.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Ordering used for table columns, both here and in the page script.
///
/// Two numeric cells compare by value. Two non-numeric cells compare their
/// lowercased UTF-16 code units, falling back to the raw code units on ties,
/// which is what `<` on JavaScript strings does. In a mixed pair the numeric
/// cell sorts first, which keeps the order total.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_float_prefix(a), parse_float_prefix(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .to_lowercase()
            .encode_utf16()
            .cmp(b.to_lowercase().encode_utf16())
            .then_with(|| a.encode_utf16().cmp(b.encode_utf16())),
    }
}

pub fn heading(level: u8, text: &str) -> String {
    let level = level.clamp(1, 6);
    format!("<h{level}>{}</h{level}>\n", escape(text))
}

pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>\n", escape(text))
}

/// Highlighted paragraph for warnings and disclaimers
pub fn notice(text: &str) -> String {
    format!("<p class=\"notice\">{}</p>\n", escape(text))
}

pub fn pre_block(text: &str) -> String {
    format!("<pre>{}</pre>\n", escape(text))
}

/// `<pre>` of `text`, or a placeholder paragraph when there is nothing to show
pub fn pre_or_placeholder(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        paragraph(placeholder)
    } else {
        pre_block(text.trim_end())
    }
}

pub fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::from("<ul>\n");
    for item in items {
        out.push_str(&format!("<li>{}</li>\n", escape(item.as_ref())));
    }
    out.push_str("</ul>\n");
    out
}

#[derive(Debug, Clone)]
struct Row {
    cells: Vec<String>,
    class: Option<&'static str>,
}

/// Sortable HTML table with an always-present `tbody`.
///
/// An empty table renders one placeholder row spanning every column.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
    empty_message: String,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            empty_message: "No data available.".to_string(),
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(cells, None);
    }

    /// Add a row rendered with the `flagged` highlight
    pub fn add_flagged_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(cells, Some("flagged"));
    }

    fn push<I, S>(&mut self, cells: I, class: Option<&'static str>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len().max(cells.len()), String::new());
        self.rows.push(Row { cells, class });
    }

    /// Stable sort of the body rows on one column using [`compare_cells`].
    ///
    /// Cells are trimmed first, as the page script does with `textContent`.
    pub fn sort_by_column(&mut self, column: usize) {
        self.rows.sort_by(|a, b| {
            let left = a.cells.get(column).map(|c| c.trim()).unwrap_or("");
            let right = b.cells.get(column).map(|c| c.trim()).unwrap_or("");
            compare_cells(left, right)
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<table>\n<thead><tr>");
        for header in &self.headers {
            out.push_str(&format!("<th onclick=\"sortTable(this)\">{}</th>", escape(header)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");

        if self.rows.is_empty() {
            out.push_str(&format!(
                "<tr><td colspan=\"{}\">{}</td></tr>\n",
                self.headers.len().max(1),
                escape(&self.empty_message)
            ));
        }

        for row in &self.rows {
            match row.class {
                Some(class) => out.push_str(&format!("<tr class=\"{}\">", class)),
                None => out.push_str("<tr>"),
            }
            for cell in &row.cells {
                out.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</tbody>\n</table>\n");
        out
    }
}
