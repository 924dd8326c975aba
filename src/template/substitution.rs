//! Placeholder substitution engine for templates

use super::scanner::tokens;
use super::types::{RenderContext, RenderedEmail, Template};

/// Render a template's subject and body with the given values.
///
/// Subject and body are substituted independently against the same values.
/// The template itself is left untouched.
pub fn render(template: &Template, values: &RenderContext) -> RenderedEmail {
    RenderedEmail {
        subject: substitute(&template.subject, values),
        body: substitute(&template.body, values),
    }
}

/// Replace every `{{name}}` token whose name has a value.
///
/// Tokens without a value are copied through verbatim. Substituted values
/// are inserted literally and never scanned again, so a value containing
/// `{{other}}` stays as written.
pub fn substitute(text: &str, values: &RenderContext) -> String {
    if values.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for token in tokens(text) {
        if let Some(value) = values.get(token.name) {
            result.push_str(&text[last..token.span.start]);
            result.push_str(value);
            last = token.span.end;
        }
    }

    result.push_str(&text[last..]);
    result
}

/// Placeholders of `template` that `values` has no entry for.
pub fn unresolved_placeholders(template: &Template, values: &RenderContext) -> Vec<String> {
    template
        .placeholders()
        .into_iter()
        .filter(|name| !values.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> RenderContext {
        pairs.iter().copied().collect()
    }

    fn sample() -> Template {
        Template::new(
            "reply",
            "Reply",
            "Re: {{topic}}",
            "Hello {{name}}, about {{topic}}.",
        )
    }

    #[test]
    fn test_render_all_values() {
        let rendered = render(&sample(), &ctx(&[("topic", "Invoice"), ("name", "Sam")]));
        assert_eq!(rendered.subject, "Re: Invoice");
        assert_eq!(rendered.body, "Hello Sam, about Invoice.");
    }

    #[test]
    fn test_render_missing_value_passes_through() {
        let rendered = render(&sample(), &ctx(&[("name", "Sam")]));
        assert_eq!(rendered.subject, "Re: {{topic}}");
        assert_eq!(rendered.body, "Hello Sam, about {{topic}}.");
    }

    #[test]
    fn test_render_ignores_unknown_values() {
        let with_extra = render(&sample(), &ctx(&[("name", "Sam"), ("unused", "x")]));
        let without = render(&sample(), &ctx(&[("name", "Sam")]));
        assert_eq!(with_extra, without);
    }

    #[test]
    fn test_render_does_not_mutate_template() {
        let template = sample();
        let before = template.clone();
        let _ = render(&template, &ctx(&[("topic", "Invoice")]));
        assert_eq!(template, before);
    }

    #[test]
    fn test_substitute_every_occurrence() {
        assert_eq!(
            substitute("{{x}}-{{x}}-{{x}}", &ctx(&[("x", "1")])),
            "1-1-1"
        );
    }

    #[test]
    fn test_substitute_is_not_recursive() {
        let values = ctx(&[("a", "{{b}}"), ("b", "B")]);
        assert_eq!(substitute("{{a}} {{b}}", &values), "{{b}} B");
    }

    #[test]
    fn test_substitute_value_containing_own_token() {
        let values = ctx(&[("name", "{{name}}{{name}}")]);
        assert_eq!(substitute("<{{name}}>", &values), "<{{name}}{{name}}>");
    }

    #[test]
    fn test_substitute_empty_value() {
        assert_eq!(substitute("a{{x}}b", &ctx(&[("x", "")])), "ab");
    }

    #[test]
    fn test_substitute_leaves_malformed_tokens() {
        let values = ctx(&[("name", "Sam")]);
        assert_eq!(
            substitute("{{ name }} {name} {{name}", &values),
            "{{ name }} {name} {{name}"
        );
    }

    #[test]
    fn test_substitute_inside_extra_braces() {
        assert_eq!(substitute("{{{x}}}", &ctx(&[("x", "1")])), "{1}");
    }

    #[test]
    fn test_substitute_multibyte_values() {
        let values = ctx(&[("company", "株式会社テスト")]);
        assert_eq!(substitute("{{company}}御中", &values), "株式会社テスト御中");
    }

    #[test]
    fn test_unresolved_placeholders() {
        assert_eq!(
            unresolved_placeholders(&sample(), &ctx(&[("name", "Sam")])),
            vec!["topic"]
        );

        let complete = ctx(&[("name", "Sam"), ("topic", "x")]);
        assert!(unresolved_placeholders(&sample(), &complete).is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let values = ctx(&[("topic", "Invoice")]);
        assert_eq!(render(&sample(), &values), render(&sample(), &values));
    }
}
