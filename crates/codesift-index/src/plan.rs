//! Trigram query planning from regular expressions
//!
//! A pattern is parsed into `regex-syntax` HIR and reduced to a boolean query
//! over trigrams. Small sets of exact strings are tracked through literals,
//! classes, concatenations and alternations; once a set grows too large or a
//! construct cannot be described by exact strings, the known part is folded
//! into the query and tracking starts over. Anything that cannot constrain
//! the candidates becomes [`TrigramQuery::All`], so a plan never excludes a
//! file that could match.

use std::collections::BTreeSet;

use regex_syntax::hir::{Class, Hir, HirKind};
use regex_syntax::ParserBuilder;

/// Largest set of exact strings tracked for one sub-expression
const MAX_EXACT_SET: usize = 16;

/// Largest character class expanded into exact strings
const MAX_CLASS_SIZE: usize = 8;

/// Boolean query over file trigrams
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrigramQuery {
    /// Every file is a candidate
    All,
    /// No file can match
    None,
    /// Files containing this trigram
    Trigram([u8; 3]),
    /// Files matching every sub-query
    And(Vec<TrigramQuery>),
    /// Files matching any sub-query
    Or(Vec<TrigramQuery>),
}

impl TrigramQuery {
    /// Plan a query for `pattern`
    ///
    /// The pattern is parsed the same way `regex::bytes::Regex` parses it.
    pub fn from_pattern(pattern: &str) -> Result<Self, regex_syntax::Error> {
        let hir = ParserBuilder::new().utf8(false).build().parse(pattern)?;
        Ok(Self::from_hir(&hir))
    }

    pub fn from_hir(hir: &Hir) -> Self {
        analyze(hir).into_query()
    }

    pub fn and(self, other: TrigramQuery) -> TrigramQuery {
        match (self, other) {
            (TrigramQuery::None, _) | (_, TrigramQuery::None) => TrigramQuery::None,
            (TrigramQuery::All, q) | (q, TrigramQuery::All) => q,
            (TrigramQuery::And(mut a), TrigramQuery::And(b)) => {
                a.extend(b);
                TrigramQuery::And(a)
            }
            (TrigramQuery::And(mut a), q) | (q, TrigramQuery::And(mut a)) => {
                a.push(q);
                TrigramQuery::And(a)
            }
            (a, b) => TrigramQuery::And(vec![a, b]),
        }
    }

    pub fn or(self, other: TrigramQuery) -> TrigramQuery {
        match (self, other) {
            (TrigramQuery::All, _) | (_, TrigramQuery::All) => TrigramQuery::All,
            (TrigramQuery::None, q) | (q, TrigramQuery::None) => q,
            (TrigramQuery::Or(mut a), TrigramQuery::Or(b)) => {
                a.extend(b);
                TrigramQuery::Or(a)
            }
            (TrigramQuery::Or(mut a), q) | (q, TrigramQuery::Or(mut a)) => {
                a.push(q);
                TrigramQuery::Or(a)
            }
            (a, b) => TrigramQuery::Or(vec![a, b]),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TrigramQuery::All)
    }
}

impl std::fmt::Display for TrigramQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |f: &mut std::fmt::Formatter<'_>, qs: &[TrigramQuery], op: &str| {
            write!(f, "(")?;
            for (i, q) in qs.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", q)?;
            }
            write!(f, ")")
        };
        match self {
            TrigramQuery::All => write!(f, "+"),
            TrigramQuery::None => write!(f, "-"),
            TrigramQuery::Trigram(t) => write!(f, "{:?}", String::from_utf8_lossy(t)),
            TrigramQuery::And(qs) => join(f, qs, "&"),
            TrigramQuery::Or(qs) => join(f, qs, "|"),
        }
    }
}

type ExactSet = BTreeSet<Vec<u8>>;

/// What is known about the strings a sub-expression matches
struct Info {
    /// Complete set of matched strings, when small enough to list
    exact: Option<ExactSet>,
    /// Query every match satisfies; only used when `exact` is unknown
    query: TrigramQuery,
}

impl Info {
    fn exact(set: ExactSet) -> Self {
        Self {
            exact: Some(set),
            query: TrigramQuery::All,
        }
    }

    fn empty_string() -> Self {
        Self::exact(BTreeSet::from([Vec::new()]))
    }

    fn anything() -> Self {
        Self {
            exact: None,
            query: TrigramQuery::All,
        }
    }

    fn into_query(self) -> TrigramQuery {
        match self.exact {
            Some(set) => exact_query(&set),
            None => self.query,
        }
    }
}

fn analyze(hir: &Hir) -> Info {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => Info::empty_string(),
        HirKind::Literal(lit) => Info::exact(BTreeSet::from([lit.0.to_vec()])),
        HirKind::Class(class) => analyze_class(class),
        HirKind::Capture(cap) => analyze(&cap.sub),
        HirKind::Repetition(rep) => {
            if rep.min == 0 {
                return Info::anything();
            }
            let sub = analyze(&rep.sub);
            if rep.min == 1 && rep.max == Some(1) {
                return sub;
            }
            Info {
                exact: None,
                query: sub.into_query(),
            }
        }
        HirKind::Concat(subs) => analyze_concat(subs),
        HirKind::Alternation(subs) => analyze_alternation(subs),
    }
}

fn analyze_class(class: &Class) -> Info {
    let mut set = ExactSet::new();
    match class {
        Class::Unicode(cls) => {
            for range in cls.ranges() {
                for c in range.start()..=range.end() {
                    if set.len() == MAX_CLASS_SIZE {
                        return Info::anything();
                    }
                    let mut buf = [0u8; 4];
                    set.insert(c.encode_utf8(&mut buf).as_bytes().to_vec());
                }
            }
        }
        Class::Bytes(cls) => {
            for range in cls.ranges() {
                for b in range.start()..=range.end() {
                    if set.len() == MAX_CLASS_SIZE {
                        return Info::anything();
                    }
                    set.insert(vec![b]);
                }
            }
        }
    }
    Info::exact(set)
}

fn analyze_concat(subs: &[Hir]) -> Info {
    let mut query = TrigramQuery::All;
    let mut pending = BTreeSet::from([Vec::new()]);
    let mut complete = true;

    for sub in subs {
        let info = analyze(sub);
        match info.exact {
            Some(next) if pending.len() * next.len() <= MAX_EXACT_SET => {
                pending = cross(&pending, &next);
            }
            Some(next) => {
                query = query.and(exact_query(&pending));
                pending = next;
                complete = false;
            }
            None => {
                query = query.and(exact_query(&pending)).and(info.query);
                pending = BTreeSet::from([Vec::new()]);
                complete = false;
            }
        }
    }

    if complete {
        Info::exact(pending)
    } else {
        Info {
            exact: None,
            query: query.and(exact_query(&pending)),
        }
    }
}

fn analyze_alternation(subs: &[Hir]) -> Info {
    let infos: Vec<Info> = subs.iter().map(analyze).collect();

    if infos.iter().all(|i| i.exact.is_some()) {
        let union: ExactSet = infos
            .iter()
            .filter_map(|i| i.exact.as_ref())
            .flatten()
            .cloned()
            .collect();
        if union.len() <= MAX_EXACT_SET {
            return Info::exact(union);
        }
    }

    let query = infos
        .into_iter()
        .fold(TrigramQuery::None, |acc, info| acc.or(info.into_query()));
    Info {
        exact: None,
        query,
    }
}

fn cross(left: &ExactSet, right: &ExactSet) -> ExactSet {
    let mut out = ExactSet::new();
    for l in left {
        for r in right {
            let mut s = l.clone();
            s.extend_from_slice(r);
            out.insert(s);
        }
    }
    out
}

/// Query satisfied by any file containing one of the strings in `set`
fn exact_query(set: &ExactSet) -> TrigramQuery {
    set.iter().fold(TrigramQuery::None, |acc, s| {
        if s.len() < 3 {
            return TrigramQuery::All;
        }
        let conj = s
            .windows(3)
            .map(|w| TrigramQuery::Trigram([w[0], w[1], w[2]]))
            .fold(TrigramQuery::All, TrigramQuery::and);
        acc.or(conj)
    })
}
