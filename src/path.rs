//! Derivation path parsing and formatting.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indexes at or above this value select hardened derivation.
pub const HARDENED_KEY_LIMIT: u32 = 0x8000_0000;

/// An ordered sequence of derivation steps plus an optional directive to
/// strip private material from the final node.
///
/// Steps are stored with the hardened bit already folded in. Paths are
/// non-commutative: `0/1` and `1/0` address different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivationPath {
    steps: Vec<u32>,
    strip_private: bool,
}

impl DerivationPath {
    pub fn new(steps: Vec<u32>) -> Self {
        DerivationPath { steps, strip_private: false }
    }

    /// The empty path, addressing the starting node itself.
    pub fn master() -> Self {
        DerivationPath::default()
    }

    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    /// True when the final node should have its private material cleared
    /// after derivation (an `M` start or `.pub` suffix).
    pub fn strips_private(&self) -> bool {
        self.strip_private
    }

    pub fn with_strip_private(mut self) -> Self {
        self.strip_private = true;
        self
    }

    /// Check if a step selects hardened derivation.
    pub fn is_hardened(step: u32) -> bool {
        step >= HARDENED_KEY_LIMIT
    }

    /// Fold the hardened bit into an index below the hardened limit.
    pub fn hardened(index: u32) -> u32 {
        index | HARDENED_KEY_LIMIT
    }

    pub fn depth(&self) -> u8 {
        self.steps.len() as u8
    }

    /// Extend with one more step.
    pub fn child(&self, step: u32) -> DerivationPath {
        let mut steps = self.steps.clone();
        steps.push(step);
        DerivationPath { steps, strip_private: self.strip_private }
    }

    /// Drop the final step, or `None` for the empty path.
    pub fn parent(&self) -> Option<DerivationPath> {
        if self.steps.is_empty() {
            None
        } else {
            let mut steps = self.steps.clone();
            steps.pop();
            Some(DerivationPath { steps, strip_private: self.strip_private })
        }
    }
}

fn parse_segment(segment: &str) -> Result<u32> {
    if segment.is_empty() {
        return Err(Error::InvalidPath("empty path segment".to_string()));
    }

    let (rest, marker_hardened) = match segment.strip_suffix('\'').or_else(|| segment.strip_suffix('h')) {
        Some(rest) => (rest, true),
        None => (segment, false),
    };
    let (digits, sign_hardened) = match rest.strip_prefix('-') {
        Some(digits) => (digits, true),
        None => (rest, false),
    };

    let index: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidPath(format!("invalid path segment: {}", segment)))?;

    if marker_hardened || sign_hardened {
        if index >= HARDENED_KEY_LIMIT {
            return Err(Error::InvalidPath(format!(
                "hardened index out of range: {}",
                segment
            )));
        }
        Ok(DerivationPath::hardened(index))
    } else {
        // A value with the top bit already set is taken as-is.
        Ok(index)
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (body, mut strip_private) = match s.strip_suffix(".pub") {
            Some(body) => (body, true),
            None => (s, false),
        };

        let mut segments = body.split('/').peekable();
        match segments.peek() {
            Some(&"m") => {
                segments.next();
            }
            Some(&"M") => {
                strip_private = true;
                segments.next();
            }
            Some(_) => {}
            None => return Err(Error::InvalidPath("empty path".to_string())),
        }

        let mut steps = Vec::new();
        for segment in segments {
            steps.push(parse_segment(segment)?);
        }
        if steps.is_empty() && body.is_empty() {
            return Err(Error::InvalidPath("empty path".to_string()));
        }

        Ok(DerivationPath { steps, strip_private })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.strip_private { "M" } else { "m" })?;
        for &step in &self.steps {
            if DerivationPath::is_hardened(step) {
                write!(f, "/{}'", step - HARDENED_KEY_LIMIT)?;
            } else {
                write!(f, "/{}", step)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_paths() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.steps().is_empty());
        assert!(!path.strips_private());
        assert_eq!(path.to_string(), "m");

        let public: DerivationPath = "M".parse().unwrap();
        assert!(public.steps().is_empty());
        assert!(public.strips_private());
    }

    #[test]
    fn test_plain_and_prefixed_paths() {
        let bare: DerivationPath = "0/1/2".parse().unwrap();
        assert_eq!(bare.steps(), &[0, 1, 2]);

        let prefixed: DerivationPath = "m/0/1/2".parse().unwrap();
        assert_eq!(prefixed, bare);
    }

    #[test]
    fn test_hardened_markers() {
        let path: DerivationPath = "1'/-5/2/1".parse().unwrap();
        assert_eq!(
            path.steps(),
            &[
                DerivationPath::hardened(1),
                DerivationPath::hardened(5),
                2,
                1
            ]
        );

        let with_h: DerivationPath = "m/44h/0'/0h".parse().unwrap();
        assert_eq!(
            with_h.steps(),
            &[
                DerivationPath::hardened(44),
                DerivationPath::hardened(0),
                DerivationPath::hardened(0)
            ]
        );

        // A value already carrying the top bit is hardened as-is.
        let raw: DerivationPath = "2147483648".parse().unwrap();
        assert_eq!(raw.steps(), &[HARDENED_KEY_LIMIT]);
        assert!(DerivationPath::is_hardened(raw.steps()[0]));
    }

    #[test]
    fn test_strip_private_directives() {
        let suffixed: DerivationPath = "0/0/458.pub".parse().unwrap();
        assert_eq!(suffixed.steps(), &[0, 0, 458]);
        assert!(suffixed.strips_private());

        let upper: DerivationPath = "M/0/0/458".parse().unwrap();
        assert_eq!(upper, suffixed);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<DerivationPath>().is_err());
        assert!("m//0".parse::<DerivationPath>().is_err());
        assert!("m/abc".parse::<DerivationPath>().is_err());
        assert!("m/12x".parse::<DerivationPath>().is_err());
        // Hardening an index that already has the top bit set overflows.
        assert!("m/2147483648'".parse::<DerivationPath>().is_err());
        assert!(matches!(
            "m/oops".parse::<DerivationPath>(),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["m/44'/0'/0'/0/5", "m/0", "M/1'/2"] {
            let path: DerivationPath = text.parse().unwrap();
            assert_eq!(path.to_string(), text);
            assert_eq!(path.to_string().parse::<DerivationPath>().unwrap(), path);
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let path: DerivationPath = "M/44'/0/1".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        let back: DerivationPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_child_and_parent() {
        let path: DerivationPath = "m/1/2".parse().unwrap();
        assert_eq!(path.child(3).to_string(), "m/1/2/3");
        assert_eq!(path.parent().unwrap().to_string(), "m/1");
        assert_eq!(path.depth(), 2);
        assert!(DerivationPath::master().parent().is_none());
    }
}
