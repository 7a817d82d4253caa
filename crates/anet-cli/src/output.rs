use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// Left-aligned columns separated by two spaces, with a dashed rule under the
/// header. Cells beyond the header count are dropped.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| width_of(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(width_of(cell));
        }
    }

    let mut out = pad_line(headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// `label: value` lines with the labels padded to a common width.
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (key, value) in fields {
        println!("{:width$}  {}", format!("{key}:"), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let rows = vec![
            vec!["State".to_string(), "state".to_string()],
            vec!["Engagement Date".to_string(), "engagementDate".to_string()],
        ];
        let out = render_table(&["Filter", "Query key"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Filter           Query key");
        assert_eq!(lines[1], "---------------  --------------");
        assert_eq!(lines[2], "State            state");
        assert_eq!(lines[3], "Engagement Date  engagementDate");
    }

    #[test]
    fn table_without_rows_has_header_and_rule() {
        let out = render_table(&["Allowed domain"], &[]);
        assert_eq!(out, "Allowed domain\n--------------\n");
    }
}
