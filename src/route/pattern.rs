use std::collections::HashMap;

use crate::error::{SlideError, SlideResult};

pub type RouteParams = HashMap<String, String>;

/// Name under which the remainder matched by a trailing `*` is captured.
pub const SPLAT_PARAM: &str = "*";

const STATIC_SEGMENT_SCORE: i32 = 10;
const DYNAMIC_SEGMENT_SCORE: i32 = 3;
const EMPTY_SEGMENT_SCORE: i32 = 1;
const INDEX_ROUTE_SCORE: i32 = 2;
const SPLAT_PENALTY: i32 = -2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed route path such as `/users/:id` or `/docs/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    splat: bool,
    index: bool,
    score: i32,
}

impl RoutePattern {
    /// An empty pattern declares an index route: it matches `/` only and has no
    /// path text of its own.
    pub fn parse(raw: &str) -> SlideResult<Self> {
        let trimmed = raw.trim();
        let index = trimmed.is_empty();
        let normalized = normalize(trimmed);

        let mut segments = Vec::new();
        let mut splat = false;
        let parts: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        for (i, part) in parts.iter().enumerate() {
            if *part == "*" {
                if i + 1 != parts.len() {
                    return Err(SlideError::invalid_argument(format!(
                        "`*` must be the last segment of route pattern {raw:?}"
                    )));
                }
                splat = true;
            } else if part.contains('*') {
                return Err(SlideError::invalid_argument(format!(
                    "`*` must be a whole segment in route pattern {raw:?}"
                )));
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(SlideError::invalid_argument(format!(
                        "unnamed parameter in route pattern {raw:?}"
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Static(part.to_string()));
            }
        }

        let score = compute_score(&normalized, index);
        Ok(Self {
            raw: trimmed.to_string(),
            segments,
            splat,
            index,
            score,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_index(&self) -> bool {
        self.index
    }

    /// Rank used to pick between several matching patterns; higher wins.
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() < self.segments.len() {
            return None;
        }
        if !self.splat && parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Static(text) => {
                    if !text.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }

        if self.splat {
            let rest = parts[self.segments.len()..].join("/");
            params.insert(SPLAT_PARAM.to_string(), rest);
        }
        Some(params)
    }
}

fn normalize(raw: &str) -> String {
    let body = raw.trim_matches('/');
    format!("/{body}")
}

fn compute_score(normalized: &str, index: bool) -> i32 {
    let raw_segments: Vec<&str> = normalized.split('/').collect();
    let mut score = raw_segments.len() as i32;
    if raw_segments.contains(&"*") {
        score += SPLAT_PENALTY;
    }
    if index {
        score += INDEX_ROUTE_SCORE;
    }

    raw_segments
        .iter()
        .filter(|segment| **segment != "*")
        .fold(score, |score, segment| {
            if segment.starts_with(':') {
                score + DYNAMIC_SEGMENT_SCORE
            } else if segment.is_empty() {
                score + EMPTY_SEGMENT_SCORE
            } else {
                score + STATIC_SEGMENT_SCORE
            }
        })
}
