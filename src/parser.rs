//! Parser for textual descendant lists.
//!
//! A descendant list is a sequence of person entries, each a prefix followed
//! by detail text. Leading whitespace is significant (it disambiguates which
//! person a spouse belongs to), trailing whitespace is not, and lines of
//! only whitespace are ignored.
//!
//! The prefix is either a generation number, optionally followed by a dot
//! (`1.` is the root ancestor, `2.` their children and so on), or a spouse
//! marker (`sp` or `+`) attaching a new family to the nearest open person at
//! equal or lesser indentation. A line with no recognised prefix continues
//! the previous entry's text.
//!
//! Within an entry the name runs up to the first detail delimiter: an
//! opening parenthesis, or one of the event abbreviations `b.` `m.` `d.`
//! `b:` `m:` `d:` at a word boundary. Semicolons split the detail text into
//! separate lines (escape as `\;` for a literal semicolon); outer matching
//! parentheses around the whole detail are stripped.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::chart::{DescendantChart, Family, Person};

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(\d+|sp|\+)(?:\.)?\s*(.+)$").unwrap());

/// A structural error in a descendant list. Always fatal: no partial chart
/// is ever returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed entry")]
    MalformedEntry { line: usize },
    #[error("line {line}: malformed generation number")]
    MalformedGeneration { line: usize },
    #[error("line {line}: spouse encountered before first person")]
    SpouseBeforeRoot { line: usize },
    #[error("line {line}: first person must have generation number 1")]
    RootGeneration { line: usize },
    #[error("line {line}: expected person with generation number {expected}, got {got}")]
    GenerationSequence { line: usize, expected: u32, got: u32 },
    #[error("line {line}: invalid person indent")]
    InvalidIndent { line: usize },
    #[error("line {line}: invalid person generation number")]
    InvalidGeneration { line: usize },
    #[error("no person entries found in input")]
    EmptyChart,
}

#[derive(Debug)]
struct Entry {
    line: usize,
    indent: usize,
    generation: u32,
    is_spouse: bool,
    text: String,
}

#[derive(Debug, Default)]
struct PersonBuild {
    id: i32,
    details: Vec<String>,
    families: Vec<FamilyBuild>,
}

#[derive(Debug, Default)]
struct FamilyBuild {
    spouse: Option<usize>,
    children: Vec<usize>,
}

/// Parse a descendant list into a chart.
///
/// Identifiers are assigned in entry order, starting at 1; people in a
/// family group keep the order their lines appear in the input.
pub fn parse_descendant_chart(input: &str) -> Result<DescendantChart, ParseError> {
    let entries = scan_entries(input)?;
    build_chart(&entries)
}

/// First pass: split the input into entries, absorbing continuation lines.
fn scan_entries(input: &str) -> Result<Vec<Entry>, ParseError> {
    let mut entries: Vec<Entry> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = ENTRY_RE.captures(line) else {
            // no prefix: the line continues the current entry
            let Some(current) = entries.last_mut() else {
                return Err(ParseError::MalformedEntry { line: lineno });
            };
            current.text.push(' ');
            current.text.push_str(line.trim());
            continue;
        };

        let prefix = caps.get(2).map_or("", |m| m.as_str());
        let (generation, is_spouse) = if prefix == "sp" || prefix == "+" {
            (0, true)
        } else {
            let generation = prefix
                .parse::<u32>()
                .map_err(|_| ParseError::MalformedGeneration { line: lineno })?;
            (generation, false)
        };

        entries.push(Entry {
            line: lineno,
            indent: caps.get(1).map_or(0, |m| m.as_str().len()),
            generation,
            is_spouse,
            text: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
        });
    }

    Ok(entries)
}

/// Second pass: walk the entries with a stack of open person entries, one
/// per active depth, attaching spouses and children as they appear.
fn build_chart(entries: &[Entry]) -> Result<DescendantChart, ParseError> {
    struct Open {
        person: usize,
        indent: usize,
        generation: u32,
    }

    let mut people: Vec<PersonBuild> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| PersonBuild {
            id: i as i32 + 1,
            details: parse_details(&entry.text),
            families: Vec::new(),
        })
        .collect();

    let mut stack: Vec<Open> = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        if stack.is_empty() {
            if entry.is_spouse {
                return Err(ParseError::SpouseBeforeRoot { line: entry.line });
            }
            if entry.generation != 1 {
                return Err(ParseError::RootGeneration { line: entry.line });
            }
            stack.push(Open {
                person: idx,
                indent: entry.indent,
                generation: entry.generation,
            });
            continue;
        }

        if entry.is_spouse {
            while entry.indent < stack.last().expect("non-empty stack").indent {
                stack.pop();
                if stack.is_empty() {
                    return Err(ParseError::InvalidIndent { line: entry.line });
                }
            }
            let top = stack.last().expect("non-empty stack").person;
            people[top].families.push(FamilyBuild {
                spouse: Some(idx),
                children: Vec::new(),
            });
        } else {
            while entry.generation <= stack.last().expect("non-empty stack").generation {
                stack.pop();
                if stack.is_empty() {
                    return Err(ParseError::InvalidGeneration { line: entry.line });
                }
            }
            let top = stack.last().expect("non-empty stack");
            if entry.generation != top.generation + 1 {
                return Err(ParseError::GenerationSequence {
                    line: entry.line,
                    expected: top.generation + 1,
                    got: entry.generation,
                });
            }
            let top = top.person;
            if people[top].families.is_empty() {
                people[top].families.push(FamilyBuild::default());
            }
            let last = people[top].families.len() - 1;
            people[top].families[last].children.push(idx);

            stack.push(Open {
                person: idx,
                indent: entry.indent,
                generation: entry.generation,
            });
        }
    }

    if people.is_empty() {
        return Err(ParseError::EmptyChart);
    }

    Ok(DescendantChart::new(assemble_person(&mut people, 0)))
}

/// Convert the index-linked build records into the owned person tree.
/// Spouses and children always carry larger indices than their referrer, so
/// taking each record exactly once is safe.
fn assemble_person(people: &mut [PersonBuild], idx: usize) -> Person {
    let build = std::mem::take(&mut people[idx]);
    let mut families = Vec::with_capacity(build.families.len());
    for family in build.families {
        let spouse = family.spouse.map(|s| assemble_person(people, s));
        let mut children = Vec::with_capacity(family.children.len());
        for child in family.children {
            children.push(assemble_person(people, child));
        }
        families.push(Family {
            spouse,
            details: Vec::new(),
            children,
        });
    }
    Person {
        id: build.id,
        headings: Vec::new(),
        details: build.details,
        families,
    }
}

fn is_detail_start(s: &str) -> bool {
    s.starts_with('(')
        || ["b.", "m.", "d.", "b:", "m:", "d:"]
            .iter()
            .any(|token| s.starts_with(token))
}

/// Split an entry's text into the name followed by detail lines.
fn parse_details(text: &str) -> Vec<String> {
    let text = text.trim();
    if is_detail_start(text) {
        return clean_lines("", text);
    }

    let mut pos = 0usize;
    while let Some(space) = text[pos..].find(' ') {
        pos += space + 1;
        if is_detail_start(&text[pos..]) {
            return clean_lines(&text[..pos - 1], &text[pos..]);
        }
    }

    clean_lines(text, "")
}

fn clean_lines(name: &str, detail: &str) -> Vec<String> {
    let mut name = name;
    let mut detail = detail.to_string();

    if !name.is_empty() && detail.is_empty() {
        // no delimiter token was found; a parenthesis anywhere in the text
        // still separates name from detail
        match name.find('(') {
            Some(open) => {
                detail = name[open..].to_string();
                name = &name[..open];
            }
            None => return vec![name.trim().to_string()],
        }
    }

    if let Some(interior) = strip_outer_parens(&detail).map(str::to_string) {
        detail = interior;
    }

    let lines = split_detail_lines(&detail);

    let name = name.trim();
    if name.is_empty() {
        return lines;
    }

    let mut out = Vec::with_capacity(lines.len() + 1);
    out.push(name.to_string());
    out.extend(lines);
    out
}

/// Strip the outer parenthesis pair when it encloses the entire detail text.
/// An unmatched opening parenthesis, or text continuing past the matching
/// close, leaves the fragment untouched.
fn strip_outer_parens(detail: &str) -> Option<&str> {
    let interior = detail.strip_prefix('(')?;
    let mut depth = 1usize;
    for (i, ch) in interior.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if i == interior.len() - 1 {
                        return Some(&interior[..i]);
                    }
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

/// Split detail text on unescaped semicolons, trimming each resulting line.
fn split_detail_lines(detail: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = detail.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&';') {
            current.push(';');
            chars.next();
        } else if ch == ';' {
            lines.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    lines.push(current.trim().to_string());
    lines
}
