//! Help-text handling for commands.
//!
//! A command's help text is cleaned of source indentation and then split
//! into a one-line summary and a long description.

const TAB_WIDTH: usize = 8;

/// Normalize an indented help block.
///
/// Tabs expand to 8 columns, the first line loses its leading whitespace,
/// the remaining lines lose their common indentation, and leading or
/// trailing blank lines are dropped.
pub fn clean_doc(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let line = if idx == 0 {
            line.trim_start()
        } else {
            strip_indent(line, margin)
        };
        // whitespace-only lines end up empty
        cleaned.push(line.trim_end().to_string());
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

/// Number of leading whitespace characters.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop up to `width` leading whitespace characters.
fn strip_indent(line: &str, width: usize) -> &str {
    let cut = line
        .char_indices()
        .take(width)
        .find(|(_, c)| !c.is_whitespace())
        .or_else(|| line.char_indices().nth(width))
        .map_or(line.len(), |(idx, _)| idx);
    &line[cut..]
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Split help text into `(description, documentation)`.
///
/// - one line: the line is the description, documentation is empty;
/// - blank second line: first line, then everything after the blank;
/// - otherwise: `Command <name>` and the whole text as documentation.
///
/// Missing or empty help text falls back to the command name.
pub fn split_help(name: &str, help: Option<&str>) -> (String, String) {
    let text = help
        .map(clean_doc)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| name.to_string());
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() == 1 {
        (text, String::new())
    } else if lines[1].is_empty() {
        (lines[0].to_string(), lines[2..].join("\n"))
    } else {
        (format!("Command {name}"), text)
    }
}
