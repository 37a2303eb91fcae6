//! Lexical classification of VBA source lines
//!
//! Indentation decisions are made against a "judgement" form of each line:
//! string literals and comments removed, a trailing line-continuation marker
//! stripped, trimmed, and lowercased. Keyword matching only ever looks at
//! that form; rendering always re-emits the original trimmed text.

/// Block-structure role of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Opens a block: If, For, Do, With, Sub, Function, Property, Type.
    Indent,
    /// Closes a block: End If, Next, Loop, End Sub, and friends.
    Dedent,
    /// Divides a block without changing its depth: Else, ElseIf.
    MidBlock,
    /// Opens a Select Case block.
    SelectCase,
    /// A Case arm label inside a Select Case block.
    CaseLabel,
    /// Closes a Select Case block.
    EndSelect,
    /// Anything else; passes through at the current level.
    Plain,
}

/// One classified source line. Borrows from the input; nothing here
/// survives past the formatting pass that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'i> {
    /// Original content with surrounding whitespace removed. Interior
    /// spacing and casing are never touched.
    pub trimmed: &'i str,
    pub category: Category,
    /// True for an If that carries its body inline after Then, and which
    /// therefore does not open a block.
    pub single_line: bool,
}

const INDENT_KEYWORDS: &[&str] = &[
    "if",
    "for",
    "do",
    "with",
    "sub",
    "public sub",
    "private sub",
    "function",
    "public function",
    "private function",
    "property",
    "public property",
    "private property",
    "select case",
    "type",
];

const DEDENT_KEYWORDS: &[&str] = &[
    "end if",
    "next",
    "loop",
    "end with",
    "end sub",
    "end function",
    "end property",
    "end select",
    "end type",
];

const MID_BLOCK_KEYWORDS: &[&str] = &["else", "elseif", "else if"];

/// Classify one raw source line.
pub fn classify(raw: &str) -> Classified<'_> {
    let trimmed = raw.trim();
    let judgement = judgement_line(trimmed);

    let mut words = judgement.split_whitespace();
    let first = words
        .next()
        .unwrap_or("");
    let first2 = words
        .next()
        .map(|second| format!("{} {}", first, second));
    let first2 = first2
        .as_deref()
        .unwrap_or("");

    let category = categorize(first, first2);
    let single_line = category == Category::Indent && is_single_line_if(first, &judgement);

    Classified {
        trimmed,
        category,
        single_line,
    }
}

/// Strip string literals and comments from a line, leaving only the text
/// that participates in keyword matching. A double quote toggles string
/// state (the quote itself is dropped); a single quote outside a string
/// truncates the rest of the line; an unterminated string just ends the
/// scan. The result is trimmed and lowercased, with a trailing `_`
/// continuation marker removed first.
fn judgement_line(trimmed: &str) -> String {
    let mut clean = String::with_capacity(trimmed.len());
    let mut in_string = false;

    for c in trimmed.chars() {
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if c == '\'' && !in_string {
            break;
        }
        if !in_string {
            clean.push(c);
        }
    }

    let clean = clean.trim();
    let clean = clean
        .strip_suffix('_')
        .map(str::trim_end)
        .unwrap_or(clean);

    clean.to_ascii_lowercase()
}

/// Match the two-word form first, then the single-word form; exact whole
/// tokens only, so `Select Case` never collides with an identifier that
/// merely starts with "select".
fn listed(table: &[&str], first: &str, first2: &str) -> bool {
    table.contains(&first2) || table.contains(&first)
}

fn categorize(first: &str, first2: &str) -> Category {
    if first2 == "select case" {
        Category::SelectCase
    } else if first2 == "end select" {
        Category::EndSelect
    } else if first == "case" {
        Category::CaseLabel
    } else if listed(MID_BLOCK_KEYWORDS, first, first2) {
        Category::MidBlock
    } else if listed(DEDENT_KEYWORDS, first, first2) {
        Category::Dedent
    } else if listed(INDENT_KEYWORDS, first, first2) {
        Category::Indent
    } else {
        Category::Plain
    }
}

/// An If whose judgement text has something after Then is a single-line If
/// and opens no block. The search is a plain substring find, matching the
/// original editor behaviour.
fn is_single_line_if(first: &str, judgement: &str) -> bool {
    if first != "if" {
        return false;
    }
    match judgement.find("then") {
        Some(position) => {
            let rest = judgement[position + 4..].trim();
            !rest.is_empty() && !rest.starts_with('\'')
        }
        None => false,
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn judgement_strips_strings_and_comments() {
        assert_eq!(judgement_line("x = 1 ' set x"), "x = 1");
        assert_eq!(
            judgement_line("Dim s As String = \"if something\""),
            "dim s as string ="
        );
        assert_eq!(judgement_line("msg = \"don't stop\""), "msg =");
        assert_eq!(judgement_line("' whole line comment"), "");
        assert_eq!(judgement_line("s = \"unterminated"), "s =");
    }

    #[test]
    fn judgement_strips_continuation_marker() {
        assert_eq!(judgement_line("If a And _"), "if a and");
        assert_eq!(judgement_line("Call f(a, _"), "call f(a,");
    }

    #[test]
    fn keywords_are_case_insensitive() {
        for line in ["IF x THEN", "If x Then", "if x then"] {
            assert_eq!(
                classify(line)
                    .category,
                Category::Indent
            );
        }
        assert_eq!(classify("END IF").category, Category::Dedent);
        assert_eq!(classify("ElseIf y Then").category, Category::MidBlock);
    }

    #[test]
    fn two_word_keywords_win_over_one_word() {
        assert_eq!(classify("Select Case x").category, Category::SelectCase);
        assert_eq!(classify("End Select").category, Category::EndSelect);
        assert_eq!(classify("End If").category, Category::Dedent);
        assert_eq!(classify("Public Sub Run()").category, Category::Indent);
        assert_eq!(classify("Else If y Then").category, Category::MidBlock);
    }

    #[test]
    fn case_labels() {
        assert_eq!(classify("Case 1").category, Category::CaseLabel);
        assert_eq!(classify("Case Else").category, Category::CaseLabel);
        assert_eq!(classify("Case Is > 5").category, Category::CaseLabel);
    }

    #[test]
    fn quoted_keywords_do_not_classify() {
        assert_eq!(
            classify("Dim s As String = \"if something\"")
                .category,
            Category::Plain
        );
        assert_eq!(classify("s = \"End If\"").category, Category::Plain);
    }

    #[test]
    fn comment_marker_inside_string_is_inert() {
        // The apostrophe sits inside the literal, so the assignment after
        // it must still be visible to the scan.
        assert_eq!(
            judgement_line("a = \"it's\" & b ' tail"),
            "a =  & b"
        );
    }

    #[test]
    fn single_line_if_detected() {
        let line = classify("If x > 0 Then y = 1");
        assert_eq!(line.category, Category::Indent);
        assert!(line.single_line);
    }

    #[test]
    fn block_if_is_not_single_line() {
        let line = classify("If x > 0 Then");
        assert_eq!(line.category, Category::Indent);
        assert!(!line.single_line);

        // Comment after Then does not make it single-line.
        let line = classify("If x > 0 Then ' check");
        assert!(!line.single_line);
    }

    #[test]
    fn plain_lines() {
        assert_eq!(classify("x = x + 1").category, Category::Plain);
        assert_eq!(classify("").category, Category::Plain);
        assert_eq!(classify("Call DoSomething").category, Category::Plain);
    }
}
