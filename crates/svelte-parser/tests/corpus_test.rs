//! Corpus tests over realistic component sources: valid components parse
//! without errors, broken ones report errors, nothing panics.

use svelte_parser::{parse, walk, Attribute, CssNode, Node, ParseErrorKind, Visit};

const VALID: &[(&str, &str)] = &[
    (
        "Counter.svelte",
        r#"<script lang="ts">
    let count = $state(0);
    const double = $derived(count * 2);
</script>

<button class="btn btn-primary" onclick={() => count++}>
    Count: {count} ({double})
</button>

<style>
    .btn { padding: 0.5rem 1rem; }
    .btn-primary:hover { background: rebeccapurple; }
</style>
"#,
    ),
    (
        "Blocks.svelte",
        r#"{#if user.loggedIn}
    <p class="welcome">Hi {user.name}</p>
{:else if user.pending}
    <p class="pending">...</p>
{:else}
    <button on:click|once={login}>Log in</button>
{/if}

{#each items as { id, label = 'x' }, i (id)}
    <li class:odd={i % 2} class="item">{label}</li>
{:else}
    <li class="empty">Nothing</li>
{/each}

{#await promise then value}
    <span>{value}</span>
{:catch error}
    <span class="error">{error.message}</span>
{/await}

{#key id}<div transition:fade|local></div>{/key}
"#,
    ),
    (
        "Snippets.svelte",
        r#"{#snippet row(item)}
    <tr class="row"><td>{item.name}</td></tr>
{/snippet}

<table>
    {#each rows as item}
        {@render row(item)}
    {/each}
</table>
{@html marked(`# ${title}`)}
"#,
    ),
    (
        "Special.svelte",
        r#"<svelte:head><title>{title}</title></svelte:head>
<svelte:window bind:innerWidth={width} />
<svelte:element this={tag} class="dynamic {extra}" {...rest} />
<Card.Root class="card" let:item>
    <img src={item.src} alt="">
    <br>
</Card.Root>
<!-- <div class="commented-out"></div> -->
<div {@attach tooltip(content)} style:color={color}></div>
"#,
    ),
    (
        "Styles.svelte",
        r#"<div class="grid"></div>

<style global>
    @import url("theme.css");

    :global(.prose) h1 { font-size: 2rem; }

    .grid > :is(.cell, .tile):not(.hidden) {
        display: grid;
        background: url(data:image/png;base64,AAAA);
    }

    @media (min-width: 640px) {
        .sm\:grid { display: grid; }
    }

    @keyframes pulse {
        from { opacity: 0; }
        50% { opacity: 0.5; }
        to { opacity: 1; }
    }

    a[href$=".pdf"]::after { content: "}"; }

    .card {
        & .title { font-weight: bold; }
    }
</style>
"#,
    ),
];

const INVALID: &[(&str, &str)] = &[
    ("unclosed element", "<div><span>text</span>"),
    ("mismatched close", "<div></span>"),
    ("stray close", "<p></p></div>"),
    ("unclosed block", "{#if ok}<p></p>"),
    ("wrong block close", "{#each xs as x}{/if}"),
    ("stray continuation", "{:else}"),
    ("unclosed expression", "<p>{value</p>"),
    ("two styles", "<style>.a{}</style><style>.b{}</style>"),
    ("bad selector", "<style>.a !! .b { color: red }</style>"),
    ("unclosed css block", "<style>.a { color: red </style>"),
];

#[test]
fn test_valid_corpus_parses_cleanly() {
    for (name, source) in VALID {
        let result = parse(source);
        assert!(
            result.errors.is_empty(),
            "{} should parse without errors, got: {:?}",
            name,
            result.errors
        );
        assert!(
            !result.document.fragment.nodes.is_empty(),
            "{} should produce template nodes",
            name
        );
    }
}

#[test]
fn test_invalid_corpus_reports_errors() {
    for (name, source) in INVALID {
        let result = parse(source);
        assert!(!result.errors.is_empty(), "{} should report an error", name);
    }
}

#[test]
fn test_truncated_sources_do_not_panic() {
    for (_, source) in VALID {
        for (end, _) in source.char_indices() {
            let _ = parse(&source[..end]);
        }
    }
}

#[test]
fn test_edge_cases() {
    let edge_cases = [
        "",
        "   ",
        "<div>",
        "{#if",
        "<!-- comment",
        "{expression",
        "<div attr=",
        "<div attr=\"",
        "<style>",
        "<style>.a {",
        "<style>@media {",
        "<style>:is(</style>",
        "<a / >",
        "a < b > c",
    ];
    for source in edge_cases {
        let _ = parse(source);
    }
}

#[test]
fn test_error_messages() {
    let result = parse("<section>");
    insta::assert_snapshot!(result.errors[0].to_string(), @"unclosed tag: <section>");

    let result = parse("{#each xs as x}{/if}");
    insta::assert_snapshot!(result.errors[0].to_string(), @"mismatched block close: expected {/each}, found {/if}");
}

#[test]
fn test_stylesheet_positions_point_into_component() {
    let source = VALID[4].1;
    let result = parse(source);
    let style = result.document.style.expect("style");
    assert!(style.global);
    for node in &style.stylesheet.children {
        let span = match node {
            CssNode::Rule(rule) => rule.span,
            CssNode::Atrule(atrule) => atrule.span,
            CssNode::Declaration(decl) => decl.span,
        };
        let text = span.slice(source);
        assert!(
            text.ends_with('}') || text.ends_with(';'),
            "span should cover a whole item: {:?}",
            text
        );
    }
}

#[derive(Default)]
struct ClassAttributes(Vec<String>);

impl Visit for ClassAttributes {
    fn enter(&mut self, node: Node<'_>) {
        if let Node::Element(element) = node {
            for attribute in &element.attributes {
                if let Attribute::Normal(attr) = attribute {
                    if attr.name == "class" {
                        for text in attr.value.text_parts() {
                            self.0.push(text.value.clone());
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_walk_reaches_nested_blocks() {
    let result = parse(VALID[1].1);
    let mut visitor = ClassAttributes::default();
    walk(&result.document, &mut visitor);
    assert_eq!(visitor.0, vec!["welcome", "pending", "item", "empty", "error"]);
}

#[test]
fn test_duplicate_style_kind() {
    let result = parse(INVALID[7].1);
    assert_eq!(result.errors[0].kind, ParseErrorKind::DuplicateStyle);
}
