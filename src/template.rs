//! `${path.to.value}` placeholder substitution.
//!
//! Lookup only: a placeholder names a dotted path into a JSON scope and is
//! replaced by the value found there. There are no expressions, filters or
//! defaults. Resolution never fails; a path that does not resolve becomes an
//! empty string and is reported in `Resolved::missing`.

use serde_json::Value;
use tracing::debug;

/// Result of resolving one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    /// Placeholder paths that had no value in the scope, in template order.
    pub missing: Vec<String>,
}

impl Resolved {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve every placeholder in `template` against `scope`.
pub fn resolve(template: &str, scope: &Value) -> Resolved {
    let mut out = Resolved {
        text: String::with_capacity(template.len()),
        missing: Vec::new(),
    };
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.text.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            // Unterminated placeholder: keep it verbatim.
            out.text.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let path = after[..end].trim();
        match lookup(scope, path) {
            Some(value) => render_into(&mut out.text, value),
            None => {
                debug!("Template field missing: {}", path);
                out.missing.push(path.to_string());
            }
        }
        rest = &after[end + 1..];
    }

    out.text.push_str(rest);
    out
}

/// Resolve and keep only the text.
pub fn render(template: &str, scope: &Value) -> String {
    resolve(template, scope).text
}

/// Walk a dotted path through objects (by key) and arrays (by index).
pub fn lookup<'a>(scope: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(scope, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render_into(buf: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => buf.push_str(s),
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => buf.push_str(&n.to_string()),
        other => buf.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_args_path() {
        let scope = json!({"args": {"x": "v"}});
        let resolved = resolve("${args.x}", &scope);
        assert_eq!(resolved.text, "v");
        assert!(resolved.is_complete());
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let scope = json!({"args": {"x": "v"}});
        assert_eq!(render("${args.x}", &scope), render("${args.x}", &scope));
    }

    #[test]
    fn test_missing_path_is_empty_and_reported() {
        let scope = json!({"args": {"x": "v"}});
        let resolved = resolve("a=${args.y};b=${response.status}", &scope);
        assert_eq!(resolved.text, "a=;b=");
        assert_eq!(resolved.missing, vec!["args.y", "response.status"]);
    }

    #[test]
    fn test_nested_and_array_paths() {
        let scope = json!({
            "response": {
                "license": {"owner": {"name": "Ada"}},
                "versions": ["3.1.0", "3.0.2"]
            }
        });
        assert_eq!(
            render("${response.license.owner.name} on ${response.versions.0}", &scope),
            "Ada on 3.1.0"
        );
        assert_eq!(render("${response.versions.9}", &scope), "");
    }

    #[test]
    fn test_scalar_rendering() {
        let scope = json!({"n": 42, "f": 1.5, "t": true, "z": null, "o": {"k": 1}});
        assert_eq!(render("${n}|${f}|${t}|${z}|${o}", &scope), "42|1.5|true||{\"k\":1}");
    }

    #[test]
    fn test_text_without_placeholders_passes_through() {
        let scope = json!({});
        assert_eq!(render("License status: ok. $5 fee", &scope), "License status: ok. $5 fee");
    }

    #[test]
    fn test_unterminated_placeholder_kept_literally() {
        let scope = json!({"args": {"x": "v"}});
        assert_eq!(render("${args.x} and ${args.x", &scope), "v and ${args.x");
    }

    #[test]
    fn test_whitespace_inside_braces_is_trimmed() {
        let scope = json!({"args": {"x": "v"}});
        assert_eq!(render("${ args.x }", &scope), "v");
    }

    #[test]
    fn test_empty_placeholder_is_missing() {
        let resolved = resolve("[${}]", &json!({}));
        assert_eq!(resolved.text, "[]");
        assert_eq!(resolved.missing, vec![""]);
    }

    #[test]
    fn test_lookup_through_scalar_fails() {
        let scope = json!({"a": "text"});
        assert!(lookup(&scope, "a.b").is_none());
        assert_eq!(lookup(&scope, "a"), Some(&json!("text")));
    }
}
