//! Line-oriented condenser for Python-like source text.
//!
//! The scan never tokenizes: every decision is made from one physical line
//! plus a small [`ScanState`] carried across lines. Each line runs through
//! an ordered table of stages; the first stage that claims the line decides
//! whether it is emitted, rewritten or dropped.

use std::borrow::Cow;
use tracing::trace;

/// Replaces every import statement in the file.
pub const IMPORTS_PLACEHOLDER: &str = "# Imports omitted for brevity...";
/// Emitted after an `except` line, at the `except` indentation.
pub const CODE_PLACEHOLDER: &str = "# Code omitted for brevity...";
/// Emitted after [`CODE_PLACEHOLDER`], one space deeper than the `except` line.
pub const PASS_PLACEHOLDER: &str = "pass";

const TRIPLE_QUOTE: &str = "\"\"\"";
const LOGGER_PREFIX: &str = "logger.";

/// Cross-line context for one call to [`condense`].
#[derive(Debug, Default)]
struct ScanState<'a> {
    output: Vec<Cow<'a, str>>,
    /// Indentation of the `except` line whose body is being skipped.
    skip_block_indent: Option<usize>,
    imports_emitted: bool,
    in_multiline_import: bool,
    definition_pending: bool,
    in_docstring: bool,
    in_definition_docstring: bool,
    in_logging_call: bool,
    paren_balance: i64,
}

/// Outcome of offering a line to a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// The stage did not claim the line; try the next one.
    Next,
    /// The line has been fully handled (emitted, rewritten or dropped).
    Done,
}

type StageFn = for<'a> fn(&mut ScanState<'a>, &'a str) -> Flow;

struct Stage {
    name: &'static str,
    run: StageFn,
}

/// Priority order matters: a line claimed by an earlier stage is never
/// seen by the later ones.
const PIPELINE: [Stage; 6] = [
    Stage { name: "imports", run: imports },
    Stage { name: "docstring", run: docstring },
    Stage { name: "skip_block", run: skip_block },
    Stage { name: "except", run: except_clause },
    Stage { name: "logging", run: logging_call },
    Stage { name: "comments", run: comments },
];

/// Condense `text`, or return it untouched when `enabled` is false or the
/// text is blank.
///
/// Malformed input never fails; it just produces best-effort output.
pub fn condense(text: &str, enabled: bool) -> String {
    if !enabled || text.trim().is_empty() {
        return text.to_string();
    }

    let mut state = ScanState::default();

    for (line_no, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        for stage in &PIPELINE {
            if (stage.run)(&mut state, line) == Flow::Done {
                trace!(line = line_no + 1, stage = stage.name, "line claimed");
                break;
            }
        }
    }

    state.output.join("\n")
}

/// Collapse every import into a single placeholder, including the
/// continuation lines of a parenthesized import.
fn imports<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    // Docstring prose like "from the caller" is not an import.
    if state.in_docstring {
        return Flow::Next;
    }

    // Continuation names such as `import_module)` must still close the import.
    if state.in_multiline_import {
        if line.contains(')') {
            state.in_multiline_import = false;
        }
        return Flow::Done;
    }

    let trimmed = line.trim();
    if trimmed.starts_with("from") || trimmed.starts_with("import") {
        if !state.imports_emitted {
            state.output.push(Cow::Borrowed(IMPORTS_PLACEHOLDER));
            state.imports_emitted = true;
        }
        if line.contains('(') && !line.contains(')') {
            state.in_multiline_import = true;
        }
        return Flow::Done;
    }

    Flow::Next
}

/// Drop the triple-quoted string that directly follows a `def`/`class`.
///
/// Triple-quoted strings seen while no definition is pending are left
/// alone, interior lines included.
fn docstring<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    let quotes = line.matches(TRIPLE_QUOTE).count();

    if state.in_docstring && state.in_definition_docstring {
        if quotes % 2 == 1 {
            state.in_docstring = false;
            state.in_definition_docstring = false;
            state.definition_pending = false;
        }
        return Flow::Done;
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("def ") || trimmed.starts_with("class ") {
        state.definition_pending = true;
        if quotes % 2 == 0 {
            return Flow::Next;
        }
        // Docstring opens on the signature line: keep the signature only.
        let signature = line
            .find(TRIPLE_QUOTE)
            .map_or(line, |idx| line[..idx].trim_end());
        if !signature.trim().is_empty() {
            state.output.push(Cow::Borrowed(signature));
        }
        state.in_docstring = true;
        state.in_definition_docstring = true;
        return Flow::Done;
    }

    if !state.definition_pending || quotes == 0 {
        return Flow::Next;
    }

    if quotes % 2 == 1 {
        state.in_docstring = true;
        state.in_definition_docstring = true;
    } else {
        // Opened and closed on this line.
        state.definition_pending = false;
    }
    Flow::Done
}

/// Swallow the body of an `except` clause being collapsed.
fn skip_block<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    let Some(block_indent) = state.skip_block_indent else {
        return Flow::Next;
    };

    if indentation(line) > block_indent {
        return Flow::Done;
    }

    state.skip_block_indent = None;
    Flow::Next
}

/// Keep the `except` line, replace its body with placeholders and start
/// skipping.
fn except_clause<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    if !line.trim_start().starts_with("except ") {
        return Flow::Next;
    }

    let indent = indentation(line);
    state.output.push(Cow::Borrowed(line));
    state
        .output
        .push(Cow::Owned(format!("{}{}", " ".repeat(indent), CODE_PLACEHOLDER)));
    state
        .output
        .push(Cow::Owned(format!("{}{}", " ".repeat(indent + 1), PASS_PLACEHOLDER)));
    state.skip_block_indent = Some(indent);
    Flow::Done
}

/// Drop `logger.*` statements, following balanced parentheses across lines.
fn logging_call<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    if state.in_logging_call {
        state.paren_balance += paren_delta(line);
        if state.paren_balance <= 0 {
            state.in_logging_call = false;
            state.paren_balance = 0;
        }
        return Flow::Done;
    }

    if !line.trim_start().starts_with(LOGGER_PREFIX) {
        return Flow::Next;
    }

    state.paren_balance = paren_delta(line);
    if state.paren_balance > 0 {
        state.in_logging_call = true;
    } else {
        state.paren_balance = 0;
    }
    Flow::Done
}

/// Strip a trailing `#` comment, or drop a comment-only line.
///
/// A quote anywhere before the `#` means it may sit inside a string
/// literal, so the line is kept as is.
fn comments<'a>(state: &mut ScanState<'a>, line: &'a str) -> Flow {
    let kept = match line.find('#') {
        Some(idx) if !line[..idx].contains(['"', '\'']) => line[..idx].trim_end(),
        _ => line,
    };

    if !kept.is_empty() {
        state.output.push(Cow::Borrowed(kept));
    }
    Flow::Done
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn paren_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '(' => acc + 1,
        ')' => acc - 1,
        _ => acc,
    })
}
