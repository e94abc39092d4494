//! Variable interpolation
//!
//! Substitutes `{{key}}` placeholders in definition strings. The Go-template spelling
//! `{{ .key }}` is accepted too, so existing definition files keep working.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;

/// Variable name to replacement value
pub type Variables = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    #[error("unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },

    #[error("malformed placeholder {{{{{key}}}}} at byte {offset}")]
    InvalidKey { offset: usize, key: String },

    #[error("unknown variable '{0}'")]
    UnknownKey(String),
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// What to do with a placeholder whose variable is not in the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Fail with [`InterpolationError::UnknownKey`]
    Reject,
    /// Replace with the empty string
    Drop,
    /// Leave the placeholder untouched. Malformed placeholders and stray `{{` are kept too,
    /// so text that is itself a Go template (`{{.URL}}`, `{{if .FirstName}}`) survives.
    Keep,
}

/// Substitutes placeholders from a borrowed variable map.
///
/// Strict by default: a placeholder naming a variable that is not in the map is an error.
/// A lenient interpolator replaces unknown placeholders with the empty string instead.
/// Malformed placeholders are an error in both of those modes. A preserving interpolator
/// only replaces the variables it knows and leaves everything else as written.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    vars: &'a Variables,
    unknown: UnknownKeys,
}

impl<'a> Interpolator<'a> {
    pub fn new(vars: &'a Variables) -> Self {
        Self {
            vars,
            unknown: UnknownKeys::Reject,
        }
    }

    pub fn lenient(self) -> Self {
        self.with_unknown(UnknownKeys::Drop)
    }

    /// Same variables, leaving unknown placeholders in place. Used for message and page
    /// bodies, which the server renders again at send time with its own fields.
    pub fn preserving(self) -> Self {
        self.with_unknown(UnknownKeys::Keep)
    }

    pub fn with_unknown(self, unknown: UnknownKeys) -> Self {
        Self { unknown, ..self }
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown
    }

    pub fn is_strict(&self) -> bool {
        self.unknown == UnknownKeys::Reject
    }

    /// Render `text`, returning a new string
    pub fn render(&self, text: &str) -> Result<String, InterpolationError> {
        if !text.contains("{{") {
            return Ok(text.to_string());
        }

        let keep = self.unknown == UnknownKeys::Keep;
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in placeholder_re().captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !keep {
                check_literal(text, last, whole.start())?;
            }
            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
            let key = raw.strip_prefix('.').unwrap_or(raw);
            if !is_valid_key(key) {
                if keep {
                    out.push_str(whole.as_str());
                    continue;
                }
                return Err(InterpolationError::InvalidKey {
                    offset: whole.start(),
                    key: raw.to_string(),
                });
            }

            match (self.vars.get(key), self.unknown) {
                (Some(value), _) => out.push_str(value),
                (None, UnknownKeys::Reject) => {
                    return Err(InterpolationError::UnknownKey(key.to_string()))
                }
                (None, UnknownKeys::Drop) => {}
                (None, UnknownKeys::Keep) => out.push_str(whole.as_str()),
            }
        }

        if !keep {
            check_literal(text, last, text.len())?;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Render a field in place
    pub fn apply(&self, field: &mut String) -> Result<(), InterpolationError> {
        if field.contains("{{") {
            *field = self.render(field)?;
        }
        Ok(())
    }
}

/// Literal text between placeholders must not open another one
fn check_literal(text: &str, start: usize, end: usize) -> Result<(), InterpolationError> {
    match text[start..end].find("{{") {
        Some(pos) => Err(InterpolationError::Unterminated { offset: start + pos }),
        None => Ok(()),
    }
}

/// Strict one-shot interpolation of a single string
pub fn interpolate(text: &str, vars: &Variables) -> Result<String, InterpolationError> {
    Interpolator::new(vars).render(text)
}

/// A value whose string fields can be interpolated
pub trait Interpolate {
    fn interpolate(&mut self, interpolator: &Interpolator<'_>) -> Result<(), InterpolationError>;
}

/// A resource whose variables have been substituted exactly once.
///
/// Only the loader produces this type, so a resolved value can not be substituted a second
/// time: interpolating it again is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T>(T);

impl<T: Interpolate> Resolved<T> {
    pub(crate) fn resolve(
        mut value: T,
        interpolator: &Interpolator<'_>,
    ) -> Result<Self, InterpolationError> {
        value.interpolate(interpolator)?;
        Ok(Self(value))
    }
}

impl<T> Resolved<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Resolved<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Resolved<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: Interpolate> Interpolate for Resolved<T> {
    fn interpolate(&mut self, _: &Interpolator<'_>) -> Result<(), InterpolationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_plain_and_dotted_keys() {
        let v = vars(&[("client", "Acme"), ("env", "prod")]);
        assert_eq!(interpolate("{{client}} / {{ .env }}", &v).unwrap(), "Acme / prod");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let v = Variables::new();
        assert_eq!(interpolate("plain } text {", &v).unwrap(), "plain } text {");
    }

    #[test]
    fn unknown_key_is_an_error_in_strict_mode() {
        let v = Variables::new();
        assert_eq!(
            interpolate("hi {{who}}", &v),
            Err(InterpolationError::UnknownKey("who".to_string()))
        );
    }

    #[test]
    fn lenient_mode_drops_unknown_keys() {
        let v = Variables::new();
        let i = Interpolator::new(&v).lenient();
        assert_eq!(i.render("hi {{who}}!").unwrap(), "hi !");
    }

    #[test]
    fn unterminated_placeholder_is_reported() {
        let v = vars(&[("a", "1")]);
        assert_eq!(
            interpolate("{{a}} and {{b", &v),
            Err(InterpolationError::Unterminated { offset: 10 })
        );
    }

    #[test]
    fn nested_braces_are_malformed() {
        let v = vars(&[("b", "1")]);
        assert!(matches!(
            interpolate("{{a {{b}}", &v),
            Err(InterpolationError::InvalidKey { offset: 0, .. })
        ));
        assert!(matches!(
            interpolate("{{}}", &v),
            Err(InterpolationError::InvalidKey { .. })
        ));
    }

    #[test]
    fn values_are_not_rescanned() {
        let v = vars(&[("a", "{{b}}")]);
        assert_eq!(interpolate("{{a}}", &v).unwrap(), "{{b}}");
    }

    struct Note(String);

    impl Interpolate for Note {
        fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
            i.apply(&mut self.0)
        }
    }

    #[test]
    fn resolved_values_ignore_later_interpolation() {
        let first = vars(&[("x", "{{x}}-again")]);
        let second = vars(&[("x", "changed")]);

        let mut resolved = Resolved::resolve(Note("{{x}}".into()), &Interpolator::new(&first)).unwrap();
        assert_eq!(resolved.0 .0, "{{x}}-again");

        resolved.interpolate(&Interpolator::new(&second)).unwrap();
        assert_eq!(resolved.0 .0, "{{x}}-again");
    }

    #[test]
    fn preserving_mode_keeps_go_template_actions() {
        let v = vars(&[("client", "Acme")]);
        let body = r#"{{if .FirstName}}Hi {{.FirstName}},{{else}}Hi,{{end}} {{client}} <a href="{{.URL}}">x</a>{{.Tracker}}"#;
        let rendered = Interpolator::new(&v).preserving().render(body).unwrap();
        assert_eq!(
            rendered,
            r#"{{if .FirstName}}Hi {{.FirstName}},{{else}}Hi,{{end}} Acme <a href="{{.URL}}">x</a>{{.Tracker}}"#
        );
    }

    #[test]
    fn preserving_mode_tolerates_stray_braces() {
        let v = vars(&[("a", "1")]);
        let i = Interpolator::new(&v).preserving();
        assert_eq!(i.render("{{a}} and {{b").unwrap(), "1 and {{b");
        assert!(!i.is_strict());
        assert_eq!(i.unknown_keys(), UnknownKeys::Keep);
    }
}
