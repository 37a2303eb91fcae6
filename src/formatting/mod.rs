//! Re-indenting VBA source so indentation reflects block nesting
//!
//! The formatter walks the lines of a module once, keeping a nesting level
//! and a stack of open block kinds. Closers adjust the level before their
//! own line is emitted and openers after it, which is what puts an `End If`
//! in the same column as its `If` and the body one level below. Nothing
//! here can fail: unbalanced code is absorbed by clamping the level at zero
//! and by no-op pops, and the output is a best-effort layout.

use tracing::debug;

use crate::scanning::{classify, Category};

/// Four spaces, the indent VBE users expect.
pub const DEFAULT_INDENT: &str = "    ";

/// Kind of block currently open, tracked on the formatter's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    /// Any ordinary block: If, For, Do, With, Sub, Function, Property, Type.
    Generic,
    /// A Select Case block that has not yet seen its first Case label.
    Select,
    /// A Select Case block after its first Case label. The Select entry is
    /// relabelled in place; Case arms never push or pop.
    InCase,
}

/// Reformat a whole source unit. Total over any input text; the indent
/// unit is fixed for the duration of the call.
pub fn format(source: &str, indent: &str) -> String {
    let mut output = Formatter::new(indent);

    for line in source.lines() {
        output.take_line(line);
    }

    let lines = output.finish();
    debug!("emitted {} lines", lines.len());

    lines.join("\n")
}

struct Formatter<'i> {
    indent: &'i str,
    level: usize,
    stack: Vec<BlockKind>,
    lines: Vec<String>,
}

impl<'i> Formatter<'i> {
    fn new(indent: &'i str) -> Formatter<'i> {
        Formatter {
            indent,
            level: 0,
            stack: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn take_line(&mut self, raw: &str) {
        let line = classify(raw);

        if line
            .trimmed
            .is_empty()
        {
            self.append_blank();
            return;
        }

        self.dedent_before(line.category);
        self.emit(line.trimmed);
        self.indent_after(line.category, line.single_line);
    }

    /// Blank lines never touch the level or the stack, and a run of them
    /// collapses to a single blank. One at the very start is dropped.
    fn append_blank(&mut self) {
        match self
            .lines
            .last()
        {
            Some(last) if !last.is_empty() => self
                .lines
                .push(String::new()),
            _ => {}
        }
    }

    /// Level adjustments that apply to the closing line itself, before it
    /// is emitted.
    fn dedent_before(&mut self, category: Category) {
        match category {
            Category::EndSelect => {
                // The last Case arm's level and the block's own level
                // close together.
                self.level = self
                    .level
                    .saturating_sub(2);
                self.stack
                    .pop();
            }
            Category::CaseLabel => {
                // Only a second or later arm has a previous arm to close.
                if self
                    .stack
                    .last()
                    == Some(&BlockKind::InCase)
                {
                    self.level = self
                        .level
                        .saturating_sub(1);
                }
            }
            Category::MidBlock => {
                self.level = self
                    .level
                    .saturating_sub(1);
            }
            Category::Dedent => {
                self.level = self
                    .level
                    .saturating_sub(1);
                self.stack
                    .pop();
            }
            _ => {}
        }
    }

    fn emit(&mut self, trimmed: &str) {
        let mut line = self
            .indent
            .repeat(self.level);
        line.push_str(trimmed);
        self.lines
            .push(line);
    }

    /// Level adjustments that apply to the lines following an opener.
    fn indent_after(&mut self, category: Category, single_line: bool) {
        match category {
            Category::SelectCase => {
                self.level += 1;
                self.stack
                    .push(BlockKind::Select);
            }
            Category::CaseLabel => {
                self.level += 1;
                // The first Case arm converts the Select entry in place;
                // later arms reuse it.
                if let Some(top) = self
                    .stack
                    .last_mut()
                {
                    if *top == BlockKind::Select {
                        *top = BlockKind::InCase;
                    }
                }
            }
            Category::Indent if !single_line => {
                self.level += 1;
                self.stack
                    .push(BlockKind::Generic);
            }
            Category::MidBlock => {
                self.level += 1;
            }
            _ => {}
        }
    }

    /// Second, defensive pass over the emitted lines: no blank at position
    /// zero, no two adjacent blanks, no blank at the end. Emission already
    /// collapses runs; this pass guarantees the invariant regardless. The
    /// trailing blank must go because output lines are joined with plain
    /// newlines: a kept trailing blank would become a trailing newline that
    /// the next line split drops, and the formatted text would no longer be
    /// a fixpoint.
    fn finish(self) -> Vec<String> {
        let mut finished: Vec<String> = Vec::with_capacity(
            self.lines
                .len(),
        );

        for line in self.lines {
            if line.is_empty()
                && finished
                    .last()
                    .map_or(true, |last| last.is_empty())
            {
                continue;
            }
            finished.push(line);
        }

        if finished
            .last()
            .map_or(false, |last| last.is_empty())
        {
            finished.pop();
        }

        finished
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn closer_aligns_with_opener() {
        let result = format("If x Then\ny = 1\nEnd If", DEFAULT_INDENT);
        assert_eq!(result, "If x Then\n    y = 1\nEnd If");
    }

    #[test]
    fn nested_blocks() {
        let result = format(
            "Sub Run()\nFor i = 1 To 3\nDo\nx = x + 1\nLoop\nNext\nEnd Sub",
            DEFAULT_INDENT,
        );
        assert_eq!(
            result,
            "Sub Run()\n    For i = 1 To 3\n        Do\n            x = x + 1\n        Loop\n    Next\nEnd Sub"
        );
    }

    #[test]
    fn mid_block_returns_to_opener_level() {
        let result = format("If x Then\na = 1\nElse\na = 2\nEnd If", DEFAULT_INDENT);
        assert_eq!(result, "If x Then\n    a = 1\nElse\n    a = 2\nEnd If");
    }

    #[test]
    fn select_case_doubles() {
        let result = format(
            "Select Case x\nCase 1\ny = 1\nCase Else\ny = 2\nEnd Select",
            DEFAULT_INDENT,
        );
        assert_eq!(
            result,
            "Select Case x\n    Case 1\n        y = 1\n    Case Else\n        y = 2\nEnd Select"
        );
    }

    #[test]
    fn consecutive_case_labels_share_the_entry() {
        // Two arms with no statements between them still line up.
        let result = format(
            "Select Case x\nCase 1\nCase 2\ny = 2\nEnd Select",
            DEFAULT_INDENT,
        );
        assert_eq!(
            result,
            "Select Case x\n    Case 1\n    Case 2\n        y = 2\nEnd Select"
        );
    }

    #[test]
    fn case_before_any_select_is_clamped() {
        // Malformed input: no Select Case open. The label indents its body
        // but the level never goes negative.
        let result = format("Case 1\ny = 1\nEnd Select", DEFAULT_INDENT);
        assert_eq!(result, "Case 1\n    y = 1\nEnd Select");
    }

    #[test]
    fn unmatched_closers_are_absorbed() {
        let result = format("End If\nEnd If\nx = 1", DEFAULT_INDENT);
        assert_eq!(result, "End If\nEnd If\nx = 1");
    }

    #[test]
    fn single_line_if_opens_no_block() {
        let result = format("If x > 0 Then y = 1\nz = 2", DEFAULT_INDENT);
        assert_eq!(result, "If x > 0 Then y = 1\nz = 2");
    }

    #[test]
    fn blank_runs_collapse() {
        let result = format("\n\n\nSub A()\n\n\n\nx = 1\nEnd Sub", DEFAULT_INDENT);
        assert_eq!(result, "Sub A()\n\n    x = 1\nEnd Sub");
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let result = format("End Sub\n\n\n", DEFAULT_INDENT);
        assert_eq!(result, "End Sub");
    }

    #[test]
    fn output_with_trailing_blanks_is_a_fixpoint() {
        // A trailing blank kept in the output would turn into a trailing
        // newline that the next pass's line split swallows.
        let once = format(
            "\n\nSelect Case q\nCase 1\nCase 2\nr = 2\nEnd Select\n\n\n",
            DEFAULT_INDENT,
        );
        assert!(!once.ends_with('\n'));

        let twice = format(&once, DEFAULT_INDENT);
        assert_eq!(twice, once);
    }

    #[test]
    fn empty_indent_unit_is_flat_but_valid() {
        let result = format("If x Then\ny = 1\nEnd If", "");
        assert_eq!(result, "If x Then\ny = 1\nEnd If");
    }

    #[test]
    fn indent_unit_is_configurable() {
        let result = format("If x Then\ny = 1\nEnd If", "\t");
        assert_eq!(result, "If x Then\n\ty = 1\nEnd If");
    }

    #[test]
    fn blank_lines_do_not_touch_state() {
        let result = format("If x Then\n\ny = 1\n\nEnd If", DEFAULT_INDENT);
        assert_eq!(result, "If x Then\n\n    y = 1\n\nEnd If");
    }
}
