//! Find-and-normalize-or-append edit rules.
//!
//! An [`EditRule`] makes sure that a single directive line (for example
//! `i2c-dev` or `dtparam=i2c_arm=on`) is present and active in a
//! newline-delimited configuration file.
//!
//! # Algorithm
//!
//! ```text
//! content ──► uncomment every line matching `normalize`
//!         ──► directive present on its own line?
//!               yes ──► done
//!               no  ──► append "<directive>\n" as the final line
//! ```
//!
//! The rule is a pure `&str -> String` function, so idempotence can be checked
//! without touching the file system: `apply(apply(c)) == apply(c)`.
//!
//! # Duplicates
//!
//! Directive lines that already appear verbatim more than once are left as
//! they are.  Every commented-out occurrence is uncommented, so a file with
//! `#i2c-dev` on two lines ends up with `i2c-dev` on both.

use std::fmt;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Error type for building an [`EditRule`].
#[derive(Debug, Error)]
pub enum RuleError {
    /// The directive is empty, spans several lines, or is itself a comment.
    #[error("directive must be a single non-comment line, got {0:?}")]
    InvalidDirective(String),

    /// The normalize pattern is not a valid regular expression.
    #[error("invalid normalize pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The normalize pattern has no capture group to keep.
    #[error("normalize pattern {0:?} must capture the directive in group 1")]
    MissingCapture(String),

    /// The normalize pattern rewrites the active directive line, or rewrites
    /// a commented directive into something other than the directive.
    #[error("normalize pattern {0:?} does not turn a disabled directive into the directive itself")]
    NonIdempotentPattern(String),
}

/// Result of applying an edit rule to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The content was rewritten.
    Changed,
    /// The content already satisfied the rule.
    Unchanged,
}

impl EditOutcome {
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed => f.write_str("changed"),
            Self::Unchanged => f.write_str("unchanged"),
        }
    }
}

/// Ensures one directive line is present and uncommented.
#[derive(Debug, Clone)]
pub struct EditRule {
    directive: String,
    /// Matches disabled variants of the directive; group 1 is kept.
    normalize: Regex,
    /// Matches the directive alone on a line.
    present: Regex,
}

impl EditRule {
    /// Builds the standard rule for `directive`: any line made of `#`, then
    /// optional non-word noise, then exactly the directive is uncommented.
    ///
    /// ```rust
    /// use home_core::EditRule;
    ///
    /// let rule = EditRule::uncomment("i2c-dev").unwrap();
    /// assert_eq!(rule.apply("# i2c-dev\n"), "i2c-dev\n");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidDirective`] for an empty, multi-line, or
    /// `#`-prefixed directive.
    pub fn uncomment(directive: &str) -> Result<Self, RuleError> {
        validate_directive(directive)?;
        // `[^\w\n]` rather than `\W` keeps every match inside a single line.
        let pattern = format!(r"^#[^\w\n]*({})$", regex::escape(directive));
        Self::with_pattern(directive, &pattern)
    }

    /// Builds a rule with a caller-supplied normalize pattern.
    ///
    /// The pattern is compiled in multi-line mode, so `^` and `$` anchor at
    /// line boundaries.  Capture group 1 replaces each whole match.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidDirective`], [`RuleError::InvalidPattern`]
    /// if the regex does not compile, [`RuleError::MissingCapture`] if it
    /// has no capture group, or [`RuleError::NonIdempotentPattern`] if it
    /// would rewrite the directive line itself or uncomment `#<directive>`
    /// into anything else.
    pub fn with_pattern(directive: &str, pattern: &str) -> Result<Self, RuleError> {
        validate_directive(directive)?;

        let normalize = RegexBuilder::new(pattern).multi_line(true).build()?;
        // captures_len() counts the implicit whole-match group 0.
        if normalize.captures_len() < 2 {
            return Err(RuleError::MissingCapture(pattern.to_string()));
        }

        // The active line must be a fixed point, and `#<directive>` may only
        // become the directive.
        let commented = format!("#{directive}");
        let from_commented = normalize.replace_all(&commented, "${1}");
        if normalize.replace_all(directive, "${1}") != directive
            || (from_commented != commented && from_commented != directive)
        {
            return Err(RuleError::NonIdempotentPattern(pattern.to_string()));
        }

        let present = RegexBuilder::new(&format!("^{}$", regex::escape(directive)))
            .multi_line(true)
            .build()?;

        Ok(Self {
            directive: directive.to_string(),
            normalize,
            present,
        })
    }

    /// The line that must be present.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Source text of the normalize pattern.
    pub fn pattern(&self) -> &str {
        self.normalize.as_str()
    }

    /// Returns `true` when `content` already has the directive on its own line.
    pub fn is_satisfied(&self, content: &str) -> bool {
        self.present.is_match(content)
    }

    /// Applies the rule to `content` and returns the new text.
    ///
    /// When the directive has to be appended, a separating newline is only
    /// inserted if the existing content is non-empty and lacks a trailing
    /// newline, so `"spi-dev\n"` becomes `"spi-dev\ni2c-dev\n"`.
    pub fn apply(&self, content: &str) -> String {
        let mut edited = self.normalize.replace_all(content, "${1}").into_owned();

        if !self.is_satisfied(&edited) {
            if !edited.is_empty() && !edited.ends_with('\n') {
                edited.push('\n');
            }
            edited.push_str(&self.directive);
            edited.push('\n');
        }

        edited
    }

    /// Applies the rule and reports whether the text changed.
    pub fn evaluate(&self, content: &str) -> (String, EditOutcome) {
        let edited = self.apply(content);
        let outcome = if edited == content {
            EditOutcome::Unchanged
        } else {
            EditOutcome::Changed
        };
        (edited, outcome)
    }
}

fn validate_directive(directive: &str) -> Result<(), RuleError> {
    let invalid = directive.trim().is_empty()
        || directive.contains(['\n', '\r'])
        || directive.starts_with('#');
    if invalid {
        return Err(RuleError::InvalidDirective(directive.to_string()));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
