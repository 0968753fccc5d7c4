//! Fixed-width text tables for startup logs.

/// Fits `value` into exactly `width` characters.
///
/// Longer values are cut and end in `...`; shorter ones are right-padded.
pub(crate) fn fit(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len <= width {
        format!("{value}{}", " ".repeat(width - len))
    } else if width <= 3 {
        value.chars().take(width).collect()
    } else {
        let mut out: String = value.chars().take(width - 3).collect();
        out.push_str("...");
        out
    }
}

/// One line of cells separated by a space, newline-terminated.
pub(crate) fn row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| fit(cell, *width))
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

/// Column titles followed by a dashed rule.
pub(crate) fn header(titles: &[&str], widths: &[usize]) -> String {
    let mut out = row(titles, widths);
    let rule = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule));
    out.push('\n');
    out
}
