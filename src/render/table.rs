use std::borrow::Cow;

const BORDER_CHARS: &[char] = &['─', '┌', '┐', '├', '┤', '└', '┘', '│', '┬', '┴', '┼'];
const VERTICAL: char = '│';

fn is_border_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| BORDER_CHARS.contains(&c))
}

fn is_top_border(line: &str) -> bool {
    match (line.find('┌'), line.rfind('┐')) {
        (Some(left), Some(right)) => left < right,
        _ => false,
    }
}

/// Cells between the outer vertical bars, trimmed, with pipes escaped.
fn row_cells(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.trim().split(VERTICAL).collect();
    let inner = if parts.len() >= 2 {
        &parts[1..parts.len() - 1]
    } else {
        &parts[..0]
    };
    inner
        .iter()
        .map(|cell| cell.trim().replace('|', "\\|"))
        .collect()
}

#[derive(Default)]
struct Block {
    raw: Vec<String>,
    rows: Vec<String>,
}

impl Block {
    /// Table lines, or the untouched source lines if no data row was seen.
    fn finish(self) -> Vec<String> {
        if self.rows.is_empty() {
            self.raw
        } else {
            self.rows
        }
    }
}

/// Rewrite Unicode box-drawing tables as pipe tables.
///
/// A block opens on a border-only line holding `┌ … ┐`, keeps every border
/// and `│` data row, and closes on the first other line. Text outside blocks
/// is returned unchanged; input with no top border is returned as-is.
pub fn normalize_box_tables(text: &str) -> Cow<'_, str> {
    if !text.contains('┌') || !text.lines().any(|l| is_border_line(l) && is_top_border(l)) {
        return Cow::Borrowed(text);
    }

    let mut out: Vec<String> = Vec::new();
    let mut block: Option<Block> = None;

    for line in text.split('\n') {
        if let Some(current) = block.as_mut() {
            if is_border_line(line) {
                current.raw.push(line.to_string());
                continue;
            }
            if line.trim_start().starts_with(VERTICAL) {
                let cells = row_cells(line);
                let first = current.rows.is_empty();
                current.raw.push(line.to_string());
                current.rows.push(format!("| {} |", cells.join(" | ")));
                if first {
                    let dashes = vec!["---"; cells.len()];
                    current.rows.push(format!("| {} |", dashes.join(" | ")));
                }
                continue;
            }
            if let Some(done) = block.take() {
                let converted = !done.rows.is_empty();
                out.extend(done.finish());
                if converted && !line.trim().is_empty() {
                    out.push(String::new());
                }
            }
            out.push(line.to_string());
            continue;
        }

        if is_border_line(line) && is_top_border(line) {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push(String::new());
            }
            block = Some(Block {
                raw: vec![line.to_string()],
                rows: Vec::new(),
            });
        } else {
            out.push(line.to_string());
        }
    }

    if let Some(done) = block.take() {
        out.extend(done.finish());
    }

    Cow::Owned(out.join("\n"))
}
