use class_scanner::{occurrences_from_content, ExtractorKind};

fn inline_values(content: &str) -> Vec<String> {
    occurrences_from_content(content, "test.rs", ExtractorKind::InlineClass)
        .into_iter()
        .map(|occurrence| occurrence.value)
        .collect()
}

#[test]
fn test_content_without_triggers_yields_nothing() {
    let content = r#"
        fn main() {
            let label = format!("temp {}", value);
            println!("{}", label);
        }
    "#;
    assert!(inline_values(content).is_empty());
}

#[test]
fn test_inline_colon_binding() {
    assert_eq!(inline_values("class:foo-bar"), vec!["foo-bar"]);
}

#[test]
fn test_tuple_binding_excludes_predicate() {
    let content = r#"view! { <div class=("btn-primary", is_active)></div> }"#;
    assert_eq!(inline_values(content), vec!["btn-primary"]);
}

#[test]
fn test_quoted_attribute_splits_into_tokens() {
    assert_eq!(inline_values(r#"class:"a b c""#), vec!["a", "b", "c"]);
}

#[test]
fn test_independent_occurrences_all_collected() {
    let content = r#"
        <div class:foo=pred>
            <span class="bar"></span>
        </div>
    "#;
    assert_eq!(inline_values(content), vec!["foo", "bar"]);
}

#[test]
fn test_extraction_is_idempotent() {
    let content = r#"
        view! {
            <div class="temperature text-3xl" class:text-neutral-200=move || temperature().is_none()>
                <span class=("hidden", is_hidden)>{value}</span>
            </div>
        }
    "#;

    let first = occurrences_from_content(content, "view.rs", ExtractorKind::InlineClass);
    let second = occurrences_from_content(content, "view.rs", ExtractorKind::InlineClass);

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_leptos_view_markup() {
    // Both declaration styles from real component markup
    let content = r#"
        view! {
            <div class="mx-auto flex flex-col justify-center">
                <div class="temperature text-3xl" class:text-neutral-200=move || temperature().is_none()>
                    {formatted}
                </div>
            </div>
        }
    "#;

    let values = inline_values(content);
    assert!(values.contains(&"mx-auto".to_string()));
    assert!(values.contains(&"flex-col".to_string()));
    assert!(values.contains(&"text-3xl".to_string()));
    assert!(values.contains(&"text-neutral-200".to_string()));
    // Predicate body is not a candidate
    assert!(!values.contains(&"move".to_string()));
}

#[test]
fn test_default_rule_reads_quoted_literals() {
    let content = r#"<body><div class="grid grid-cols-3">static</div></body>"#;
    let values: Vec<String> =
        occurrences_from_content(content, "index.html", ExtractorKind::Default)
            .into_iter()
            .map(|occurrence| occurrence.value)
            .collect();

    assert_eq!(values, vec!["grid", "grid-cols-3"]);
}

#[test]
fn test_locations_are_line_and_column() {
    let content = "first\nclass:foo\n  class:bar";
    let occurrences = occurrences_from_content(content, "app.rs", ExtractorKind::InlineClass);

    assert_eq!(occurrences.len(), 2);
    assert_eq!((occurrences[0].line, occurrences[0].column), (2, 6));
    assert_eq!((occurrences[1].line, occurrences[1].column), (3, 8));
}

#[test]
fn test_arbitrary_input_never_fails() {
    // Totality: junk, partial triggers, and multibyte text all yield a
    // (possibly empty) list rather than a panic
    let long = "class:a ".repeat(1000);
    let inputs = [
        "",
        "class",
        "class:",
        "class=(",
        "class=(\"",
        "\u{0}\u{1}class:x\u{2}",
        "🦀 class:crab-style 🦀",
        long.as_str(),
    ];

    for input in inputs {
        let _ = occurrences_from_content(input, "fuzz", ExtractorKind::InlineClass);
        let _ = occurrences_from_content(input, "fuzz", ExtractorKind::Default);
    }
}

#[test]
fn test_consecutive_spaces_produce_no_empty_tokens() {
    let values = inline_values(r#"class:"a   b ""#);
    assert_eq!(values, vec!["a", "b"]);
    assert!(values.iter().all(|v| !v.is_empty()));
}
