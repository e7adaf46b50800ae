//! Glob matching over normalized, `/`-separated paths.
//!
//! Supported operators:
//! - `**` as a whole segment matches zero or more segments
//! - `*` matches any run of characters inside one segment
//! - `?` matches one character inside one segment
//! - `[...]` matches one character from a set, with `a-z` ranges and a
//!   leading `!` or `^` for negation
//! - `{a,b}` tries each comma separated alternative (nesting allowed)
//!
//! The whole candidate must be described by the pattern. An unterminated `[`
//! or `{` is matched as a literal character instead of failing.
//!
//! A pattern is compiled once into a small automaton and run over the
//! candidate one character at a time, tracking every live state together.
//! Matching is linear in the candidate for a given pattern, whatever the
//! number of `**` segments or brace groups.

/// Returns true when `candidate` is fully described by `pattern`.
///
/// Compiles `pattern` on every call; keep a [`GlobMatcher`] when the same
/// pattern is tested repeatedly.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    GlobMatcher::new(pattern).is_match(candidate)
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatcher {
    program: Vec<Inst>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Inst {
    Char(char),
    /// Any character except `/`.
    AnyChar,
    /// Any character, `/` included.
    AnyPathChar,
    Class {
        negated: bool,
        ranges: Vec<(char, char)>,
    },
    Split(usize, usize),
    Jump(usize),
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Literal(char),
    AnyChar,
    Star,
    Globstar,
    Class {
        negated: bool,
        ranges: Vec<(char, char)>,
    },
    Alternation(Vec<Vec<Node>>),
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut compiler = Compiler::default();
        compiler.sequence(&parse(&chars));
        compiler.emit(Inst::Match);
        Self {
            program: compiler.program,
        }
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        let mut current = StateSet::with_capacity(self.program.len());
        let mut next = StateSet::with_capacity(self.program.len());
        self.follow(&mut current, 0);

        for ch in candidate.chars() {
            if current.states.is_empty() {
                return false;
            }
            next.clear();
            for &pc in &current.states {
                let accepted = match &self.program[pc] {
                    Inst::Char(expected) => *expected == ch,
                    Inst::AnyChar => ch != '/',
                    Inst::AnyPathChar => true,
                    Inst::Class { negated, ranges } => {
                        let hit = ranges.iter().any(|(lo, hi)| *lo <= ch && ch <= *hi);
                        ch != '/' && hit != *negated
                    }
                    Inst::Split(..) | Inst::Jump(_) | Inst::Match => false,
                };
                if accepted {
                    self.follow(&mut next, pc + 1);
                }
            }
            std::mem::swap(&mut current, &mut next);
        }

        current
            .states
            .iter()
            .any(|&pc| self.program[pc] == Inst::Match)
    }

    /// Adds `pc` and every state reachable from it without consuming input.
    fn follow(&self, set: &mut StateSet, pc: usize) {
        let mut pending = vec![pc];
        while let Some(pc) = pending.pop() {
            if !set.insert(pc) {
                continue;
            }
            match self.program[pc] {
                Inst::Jump(to) => pending.push(to),
                Inst::Split(first, second) => {
                    pending.push(second);
                    pending.push(first);
                }
                _ => {}
            }
        }
    }
}

struct StateSet {
    states: Vec<usize>,
    seen: Vec<bool>,
}

impl StateSet {
    fn with_capacity(size: usize) -> Self {
        Self {
            states: Vec::with_capacity(size),
            seen: vec![false; size],
        }
    }

    fn insert(&mut self, pc: usize) -> bool {
        if self.seen[pc] {
            return false;
        }
        self.seen[pc] = true;
        self.states.push(pc);
        true
    }

    fn clear(&mut self) {
        for &pc in &self.states {
            self.seen[pc] = false;
        }
        self.states.clear();
    }
}

#[derive(Default)]
struct Compiler {
    program: Vec<Inst>,
}

impl Compiler {
    fn emit(&mut self, inst: Inst) -> usize {
        self.program.push(inst);
        self.program.len() - 1
    }

    fn next(&self) -> usize {
        self.program.len()
    }

    fn sequence(&mut self, nodes: &[Node]) {
        let mut i = 0;
        while i < nodes.len() {
            let slash_follows = |at: usize| nodes.get(at) == Some(&Node::Literal('/'));
            match &nodes[i] {
                // `x/**` at the end also matches `x` itself.
                Node::Literal('/')
                    if nodes.get(i + 1) == Some(&Node::Globstar) && !slash_follows(i + 2) =>
                {
                    self.trailing_globstar();
                    i += 2;
                    continue;
                }
                Node::Globstar if slash_follows(i + 1) => {
                    self.leading_dirs();
                    i += 2;
                    continue;
                }
                Node::Globstar => self.repeat(Inst::AnyPathChar),
                Node::Star => self.repeat(Inst::AnyChar),
                Node::Literal(ch) => {
                    self.emit(Inst::Char(*ch));
                }
                Node::AnyChar => {
                    self.emit(Inst::AnyChar);
                }
                Node::Class { negated, ranges } => {
                    self.emit(Inst::Class {
                        negated: *negated,
                        ranges: ranges.clone(),
                    });
                }
                Node::Alternation(alternatives) => self.alternation(alternatives),
            }
            i += 1;
        }
    }

    /// Zero or more of `inst`.
    fn repeat(&mut self, inst: Inst) {
        let split = self.emit(Inst::Split(0, 0));
        let body = self.emit(inst);
        self.emit(Inst::Jump(split));
        let end = self.next();
        self.program[split] = Inst::Split(body, end);
    }

    /// `**/`: zero or more whole segments, each followed by `/`.
    fn leading_dirs(&mut self) {
        let outer = self.emit(Inst::Split(0, 0));
        let inner = self.emit(Inst::Split(0, 0));
        let any = self.emit(Inst::AnyChar);
        self.emit(Inst::Jump(inner));
        let slash = self.emit(Inst::Char('/'));
        self.emit(Inst::Jump(outer));
        let end = self.next();
        self.program[outer] = Inst::Split(inner, end);
        self.program[inner] = Inst::Split(any, slash);
    }

    /// `/**` with nothing after it: optionally `/` and then anything.
    fn trailing_globstar(&mut self) {
        let optional = self.emit(Inst::Split(0, 0));
        let slash = self.emit(Inst::Char('/'));
        self.repeat(Inst::AnyPathChar);
        let end = self.next();
        self.program[optional] = Inst::Split(slash, end);
    }

    fn alternation(&mut self, alternatives: &[Vec<Node>]) {
        let mut exits = Vec::with_capacity(alternatives.len());
        let last = alternatives.len().saturating_sub(1);
        for (position, alternative) in alternatives.iter().enumerate() {
            if position == last {
                self.sequence(alternative);
                break;
            }
            let split = self.emit(Inst::Split(0, 0));
            let start = self.next();
            self.sequence(alternative);
            exits.push(self.emit(Inst::Jump(0)));
            let next = self.next();
            self.program[split] = Inst::Split(start, next);
        }
        let end = self.next();
        for exit in exits {
            self.program[exit] = Inst::Jump(end);
        }
    }
}

fn parse(chars: &[char]) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                let start = i;
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                let whole_segment = i - start >= 2
                    && (start == 0 || chars[start - 1] == '/')
                    && (i == chars.len() || chars[i] == '/');
                nodes.push(if whole_segment {
                    Node::Globstar
                } else {
                    Node::Star
                });
            }
            '?' => {
                nodes.push(Node::AnyChar);
                i += 1;
            }
            '[' => match class_end(chars, i) {
                Some(end) => {
                    nodes.push(parse_class(&chars[i + 1..end]));
                    i = end + 1;
                }
                None => {
                    nodes.push(Node::Literal('['));
                    i += 1;
                }
            },
            '{' => match brace_end(chars, i) {
                Some(end) => {
                    let alternatives = split_alternatives(&chars[i + 1..end])
                        .into_iter()
                        .map(parse)
                        .collect();
                    nodes.push(Node::Alternation(alternatives));
                    i = end + 1;
                }
                None => {
                    nodes.push(Node::Literal('{'));
                    i += 1;
                }
            },
            ch => {
                nodes.push(Node::Literal(ch));
                i += 1;
            }
        }
    }

    nodes
}

/// Index of the `]` closing the class opened at `start`, if any. A `]` right
/// after the opening bracket (or its negation marker) is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            ']' => return Some(i),
            '/' => return None,
            _ => i += 1,
        }
    }
    None
}

fn parse_class(body: &[char]) -> Node {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) | Some(('^', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut ranges = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let lo = body[i];
        if i + 2 < body.len() && body[i + 1] == '-' {
            let hi = body[i + 2];
            ranges.push(if lo <= hi { (lo, hi) } else { (hi, lo) });
            i += 3;
        } else {
            ranges.push((lo, lo));
            i += 1;
        }
    }

    Node::Class { negated, ranges }
}

fn brace_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end + 1;
                    continue;
                }
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits a brace body on top-level commas.
fn split_alternatives(body: &[char]) -> Vec<&[char]> {
    let mut alternatives = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < body.len() {
        match body[i] {
            '[' => {
                if let Some(end) = class_end(body, i) {
                    i = end + 1;
                    continue;
                }
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    alternatives.push(&body[start..]);

    alternatives
}
