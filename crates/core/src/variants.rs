//! Name variant generation
//!
//! Callers rarely spell a member name the way the target type declares it:
//! form fields arrive as `"name:en"` or `"call a method"`, config keys as
//! kebab-case, Rust members as snake_case. This module produces the ordered
//! candidate spellings that member lookup tries against a class table.
//!
//! All transforms are pure functions of their input. The lookup path uses
//! [`expand`], which yields exactly `[lowerCamel, UpperCamel, snake_case]`
//! of the whitespace-normalized input, in that order. [`Variants::assembled`]
//! additionally appends kebab-case for callers that want a full rendering
//! list.

use regex::Regex;

/// Replacement side of a pattern substitution.
///
/// A single replacement yields one output per input value; a list of
/// replacements expands to one output per replacement.
#[derive(Debug, Clone, Copy)]
pub enum Replacement<'a> {
    One(&'a str),
    Many(&'a [&'a str]),
}

/// An ordered set of seed strings with bulk transforms applied to each.
#[derive(Debug, Clone, Default)]
pub struct Variants {
    values: Vec<String>,
}

impl Variants {
    /// Create a variant set from a single seed value.
    pub fn of(value: &str) -> Self {
        Self {
            values: vec![value.to_string()],
        }
    }

    /// Create a variant set from multiple seed values, preserving order.
    pub fn of_all<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The untransformed seed values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Apply each transform to each value, value-major.
    ///
    /// For values `[a, b]` and transforms `[f, g]` the output is
    /// `[f(a), g(a), f(b), g(b)]`.
    pub fn with(&self, transforms: &[fn(&str) -> String]) -> Vec<String> {
        let mut output = Vec::with_capacity(self.values.len() * transforms.len());
        for value in &self.values {
            for transform in transforms {
                output.push(transform(value));
            }
        }
        output
    }

    /// Lowercase/uppercase pairing of each value.
    pub fn with_upper_lower_case(&self) -> Vec<String> {
        self.with(&[|v| v.to_lowercase(), |v| v.to_uppercase()])
    }

    /// First-letter lowered/raised pairing of each value.
    pub fn with_upper_lower_case_first(&self) -> Vec<String> {
        self.with(&[lower_first, upper_first])
    }

    /// Regex substitution over each value.
    ///
    /// Patterns are applied value-major. [`Replacement::Many`] expands to one
    /// output per replacement; `$1`-style capture references are supported.
    ///
    /// # Errors
    /// Returns the regex compile error if a pattern is invalid.
    pub fn with_pattern(
        &self,
        patterns: &[(&str, Replacement<'_>)],
    ) -> Result<Vec<String>, regex::Error> {
        let mut output = Vec::new();
        for value in &self.values {
            for (pattern, replacement) in patterns {
                let re = Regex::new(pattern)?;
                match replacement {
                    Replacement::One(rep) => {
                        output.push(re.replace_all(value, *rep).into_owned());
                    }
                    Replacement::Many(reps) => {
                        for rep in *reps {
                            output.push(re.replace_all(value, *rep).into_owned());
                        }
                    }
                }
            }
        }
        Ok(output)
    }

    /// Camel and snake spellings of each whitespace-normalized value.
    ///
    /// Per value, in this fixed order: lowerCamelCase, UpperCamelCase,
    /// snake_case. This is the candidate order member lookup relies on.
    pub fn camel_snake_case(&self) -> Vec<String> {
        let mut output = Vec::with_capacity(self.values.len() * 3);
        for value in &self.values {
            let value = normalize(value);
            output.push(lower_camel(&value));
            output.push(upper_camel(&value));
            output.push(snake(&value));
        }
        output
    }

    /// [`Self::camel_snake_case`] plus kebab-case of each value.
    pub fn assembled(&self) -> Vec<String> {
        let mut output = self.camel_snake_case();
        for value in &self.values {
            output.push(kebab(&normalize(value)));
        }
        output
    }
}

/// Candidate spellings for a member name, in lookup order.
///
/// Equivalent to `Variants::of(name).camel_snake_case()`. The result is
/// never empty; an input that is empty after normalization yields empty
/// strings under each transform.
pub fn expand(name: &str) -> Vec<String> {
    Variants::of(name).camel_snake_case()
}

/// Trim and collapse internal whitespace runs to a single underscore.
pub fn normalize(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut in_gap = false;
    for ch in value.trim().chars() {
        if ch.is_whitespace() {
            in_gap = true;
        } else {
            if in_gap {
                output.push('_');
                in_gap = false;
            }
            output.push(ch);
        }
    }
    output
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// UpperCamelCase: capitalize the first character of each `_`/`-`/space
/// separated segment, dropping the separators. Characters inside a segment
/// keep their case.
pub fn upper_camel(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut at_boundary = true;
    for ch in value.chars() {
        if matches!(ch, '_' | '-' | ' ') {
            at_boundary = true;
        } else if at_boundary {
            output.extend(ch.to_uppercase());
            at_boundary = false;
        } else {
            output.push(ch);
        }
    }
    output
}

/// lowerCamelCase: [`upper_camel`] with the first character lowered.
pub fn lower_camel(value: &str) -> String {
    lower_first(&upper_camel(value))
}

/// snake_case: separators become underscores and camel humps become
/// underscore boundaries; everything is lowercased.
pub fn snake(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut output = String::with_capacity(value.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if matches!(ch, '_' | '-' | ' ') {
            if !output.ends_with('_') && !output.is_empty() {
                output.push('_');
            }
            continue;
        }
        if ch.is_uppercase() && !output.is_empty() && !output.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                output.push('_');
            }
        }
        output.extend(ch.to_lowercase());
    }
    output
}

/// kebab-case: [`snake`] with dashes for underscores.
pub fn kebab(value: &str) -> String {
    snake(value).replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_order() {
        assert_eq!(
            expand("call a method"),
            vec!["callAMethod", "CallAMethod", "call_a_method"]
        );
    }

    #[test]
    fn test_expand_camel_input() {
        assert_eq!(expand("fooBar"), vec!["fooBar", "FooBar", "foo_bar"]);
        assert_eq!(expand("FooBar"), vec!["fooBar", "FooBar", "foo_bar"]);
    }

    #[test]
    fn test_expand_snake_input() {
        assert_eq!(expand("foo_bar"), vec!["fooBar", "FooBar", "foo_bar"]);
    }

    #[test]
    fn test_expand_never_empty() {
        let candidates = expand("");
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.is_empty()));

        let candidates = expand("   ");
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  call  a\tmethod "), "call_a_method");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn test_snake_acronym_boundary() {
        assert_eq!(snake("HTTPServer"), "http_server");
        assert_eq!(snake("parseXML2Doc"), "parse_xml2_doc");
    }

    #[test]
    fn test_kebab() {
        assert_eq!(kebab("call_a_method"), "call-a-method");
        assert_eq!(kebab("fooBar"), "foo-bar");
    }

    #[test]
    fn test_with_upper_lower_case() {
        assert_eq!(
            Variants::of_all(["foo", "bar"]).with_upper_lower_case(),
            vec!["foo", "FOO", "bar", "BAR"]
        );
        assert_eq!(
            Variants::of_all(["fOo", "bAr"]).with_upper_lower_case(),
            vec!["foo", "FOO", "bar", "BAR"]
        );
    }

    #[test]
    fn test_with_upper_lower_case_first() {
        assert_eq!(
            Variants::of_all(["foo", "bar"]).with_upper_lower_case_first(),
            vec!["foo", "Foo", "bar", "Bar"]
        );
    }

    #[test]
    fn test_with_pattern_list_expansion() {
        let patterns = [(r"(\d{4})(\d+)", Replacement::Many(&["$1/$2", "$1-$2"]))];
        assert_eq!(
            Variants::of("016945236589").with_pattern(&patterns).unwrap(),
            vec!["0169/45236589", "0169-45236589"]
        );
    }

    #[test]
    fn test_with_pattern_invalid_regex() {
        let patterns = [("(unclosed", Replacement::One("x"))];
        assert!(Variants::of("value").with_pattern(&patterns).is_err());
    }

    #[test]
    fn test_assembled_appends_kebab() {
        assert_eq!(
            Variants::of("call a method").assembled(),
            vec!["callAMethod", "CallAMethod", "call_a_method", "call-a-method"]
        );
    }
}
