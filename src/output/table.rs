//! Plain-text table rendering for terminal output

/// Renders rows under a header as a boxed text table
///
/// Column widths fit the widest cell (counted in chars). Short rows are padded with
/// empty cells.
///
/// ```text
/// +-----+--------+
/// | URL | Status |
/// +-----+--------+
/// | /a  | 200    |
/// +-----+--------+
/// ```
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');

    for row in rows {
        out.push_str(&format_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }

    if !rows.is_empty() {
        out.push_str(&separator);
        out.push('\n');
    }

    out
}

fn format_row<'a>(widths: &[usize], mut cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}
