/// Box-drawn table with one width per column, sized to fit its content.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

const MAX_COLUMN_WIDTH: usize = 60;

impl TableFormatter {
    pub fn new(headers: &[&'static str], rows: &[Vec<String>]) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            widths,
        }
    }

    pub fn print_table(&self, rows: &[Vec<String>]) {
        print!("{}", self.render(rows));
    }

    pub fn render(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::new();
        out.push_str(&self.border('┌', '┬', '┐'));
        let headers: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        out.push_str(&self.row(&headers));
        out.push_str(&self.border('├', '┼', '┤'));
        for row in rows {
            out.push_str(&self.row(row));
        }
        out.push_str(&self.border('└', '┴', '┘'));
        out
    }

    fn row(&self, cells: &[String]) -> String {
        let body: Vec<String> = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, width)| truncate(cells.get(i).map(String::as_str).unwrap_or(""), *width))
            .collect();
        format!("│ {} │\n", body.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_short_values() {
        assert_eq!(truncate("dev", 5), "dev  ");
    }

    #[test]
    fn test_truncate_long_values() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_render_sizes_columns_to_content() {
        let rows = vec![vec!["*".to_string(), "production".to_string()]];
        let table = TableFormatter::new(&["Current", "Name"], &rows);
        let rendered = table.render(&rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "│ Current │ Name       │");
        assert_eq!(lines[3], "│ *       │ production │");
        assert_eq!(lines[0], "┌─────────┬────────────┐");
    }
}
