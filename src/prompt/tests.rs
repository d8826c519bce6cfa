use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::constants::{
    AREAS_NOT_SPECIFIED, NO_RECENT_PUBLICATIONS, PUBLICATIONS_NOT_AVAILABLE,
};
use crate::profile::{Publication, ResearcherProfile};

fn profile() -> ResearcherProfile {
    ResearcherProfile::new("Grace Hopper", "Yale")
        .with_areas(["compilers", "systems"])
        .with_publication("FLOW-MATIC", "CACM", 2021)
        .with_publication("COBOL", "JACM", 2019)
}

fn user_only_source(user_asset: &str, body: &str) -> Arc<dyn TemplateSource> {
    Arc::new(
        StaticTemplateSource::new()
            .with("local-system-prompt.txt", "SYSTEM")
            .with(user_asset, body),
    )
}

struct CountingSource {
    inner: StaticTemplateSource,
    reads: AtomicUsize,
}

impl TemplateSource for CountingSource {
    fn read(&self, name: &str) -> TemplateResult<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(name)
    }
}

#[test]
fn test_policy_asset_matrix() {
    let cases = [
        (
            StrictnessTier::Strict,
            ScoringScheme::Original,
            "local-system-prompt.txt",
            "local-user-prompt.txt",
        ),
        (
            StrictnessTier::Strict,
            ScoringScheme::DecisionTree,
            "local-decision-tree-system-prompt.txt",
            "local-decision-tree-user-prompt.txt",
        ),
        (
            StrictnessTier::Basic,
            ScoringScheme::Original,
            "basic-system-prompt.txt",
            "basic-user-prompt.txt",
        ),
        (
            StrictnessTier::Basic,
            ScoringScheme::DecisionTree,
            "decision-tree-system-prompt.txt",
            "decision-tree-user-prompt.txt",
        ),
    ];

    for (strictness, scheme, system, user) in cases {
        let policy = PromptPolicy::new(strictness, scheme);
        assert_eq!(policy.system_asset(), system);
        assert_eq!(policy.user_asset(), user);
    }
}

#[test]
fn test_scoring_scheme_serde() {
    let scheme: ScoringScheme = serde_json::from_str("\"decision_tree\"").unwrap();
    assert_eq!(scheme, ScoringScheme::DecisionTree);
    assert_eq!(
        serde_json::to_string(&ScoringScheme::Original).unwrap(),
        "\"original\""
    );
    assert!(serde_json::from_str::<ScoringScheme>("\"fancy\"").is_err());
}

#[test]
fn test_strictness_from_flag() {
    assert_eq!(StrictnessTier::from_strict_flag(true), StrictnessTier::Strict);
    assert_eq!(StrictnessTier::from_strict_flag(false), StrictnessTier::Basic);
}

#[test]
fn test_render_publications_filters_recent() {
    let rendered = render_publications(&profile().publications);
    assert_eq!(rendered, "FLOW-MATIC (CACM, 2021)");
}

#[test]
fn test_render_publications_caps_at_twenty_in_order() {
    let pubs: Vec<Publication> = (0..30)
        .map(|i| Publication {
            title: format!("P{i}"),
            year: 2022,
            venue: "V".into(),
        })
        .collect();

    let rendered = render_publications(&pubs);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "P0 (V, 2022)");
    assert_eq!(lines[19], "P19 (V, 2022)");
}

#[test]
fn test_render_publications_placeholders() {
    let old = ResearcherProfile::new("A", "B").with_publication("Old", "V", 2018);
    assert_eq!(render_publications(&old.publications), NO_RECENT_PUBLICATIONS);
    assert_eq!(render_publications(&[]), PUBLICATIONS_NOT_AVAILABLE);
}

#[test]
fn test_render_areas() {
    assert_eq!(render_areas(&profile().areas), "compilers, systems");
    assert_eq!(render_areas(&[]), AREAS_NOT_SPECIFIED);
}

#[test]
fn test_placeholder_table_replaces_every_occurrence() {
    let table = PlaceholderTable::new().with("professor.name", "Ada");
    assert_eq!(
        table.render("{{professor.name}} and {{professor.name}}"),
        "Ada and Ada"
    );
}

#[test]
fn test_placeholder_table_leaves_unknown_markers() {
    let table = PlaceholderTable::new().with("publications", "none");
    assert_eq!(
        table.render("{{unknown}} {{publications}} {{unterminated"),
        "{{unknown}} none {{unterminated"
    );
    assert_eq!(table.render("{{ {{publications}}"), "{{ none");
}

#[test]
fn test_placeholder_values_are_not_rescanned() {
    let table = PlaceholderTable::new()
        .with("professor.name", "{{researchDirection}}")
        .with("researchDirection", "robotics");
    assert_eq!(
        table.render("{{professor.name}} / {{researchDirection}}"),
        "{{researchDirection}} / robotics"
    );
}

#[test]
fn test_build_joins_system_and_user() {
    let source = user_only_source(
        "local-user-prompt.txt",
        "{{professor.name}} @ {{professor.affiliation}} [{{professor.areas}}]\n{{publications}}\n-> {{researchDirection}}",
    );
    let builder = PromptBuilder::new(source);

    let prompt = builder.build(
        &profile(),
        "program synthesis",
        StrictnessTier::Strict,
        ScoringScheme::Original,
    );

    assert_eq!(
        prompt,
        "SYSTEM\n\nGrace Hopper @ Yale [compilers, systems]\nFLOW-MATIC (CACM, 2021)\n-> program synthesis"
    );
}

#[test]
fn test_build_falls_back_per_scheme() {
    let builder = PromptBuilder::new(Arc::new(StaticTemplateSource::new()));

    let flat = builder.build(&profile(), "x", StrictnessTier::Basic, ScoringScheme::Original);
    assert!(flat.starts_with(fallback_template(ScoringScheme::Original, TemplateRole::System)));
    assert!(flat.contains("Professor: Grace Hopper"));
    assert!(!flat.contains("{{"));

    let tree = builder.build(
        &profile(),
        "x",
        StrictnessTier::Basic,
        ScoringScheme::DecisionTree,
    );
    assert!(tree.contains("Q1"));
    assert!(tree.contains("Institution: Yale"));
    assert!(!tree.contains("{{"));
}

#[test]
fn test_store_reads_each_asset_once() {
    let source = Arc::new(CountingSource {
        inner: StaticTemplateSource::new().with("a.txt", "A"),
        reads: AtomicUsize::new(0),
    });
    let store = TemplateStore::new(source.clone());

    assert_eq!(&*store.get("a.txt", "fallback"), "A");
    assert_eq!(&*store.get("a.txt", "fallback"), "A");
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    assert_eq!(store.cached_count(), 1);

    store.invalidate_all();
    assert_eq!(&*store.get("a.txt", "fallback"), "A");
    assert_eq!(source.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_store_does_not_cache_fallbacks() {
    let source = Arc::new(CountingSource {
        inner: StaticTemplateSource::new(),
        reads: AtomicUsize::new(0),
    });
    let store = TemplateStore::new(source.clone());

    assert_eq!(&*store.get("missing.txt", "fallback"), "fallback");
    assert_eq!(&*store.get("missing.txt", "fallback"), "fallback");
    assert_eq!(source.reads.load(Ordering::SeqCst), 2);
    assert_eq!(store.cached_count(), 0);
}

#[test]
fn test_asset_added_after_fallback_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let builder = PromptBuilder::from_dir(dir.path());

    let before = builder.build(&profile(), "x", StrictnessTier::Basic, ScoringScheme::Original);
    assert!(before.starts_with(fallback_template(ScoringScheme::Original, TemplateRole::System)));

    std::fs::write(dir.path().join("basic-system-prompt.txt"), "SYS").unwrap();
    std::fs::write(dir.path().join("basic-user-prompt.txt"), "{{professor.name}}").unwrap();

    let after = builder.build(&profile(), "x", StrictnessTier::Basic, ScoringScheme::Original);
    assert_eq!(after, "SYS\n\nGrace Hopper");
}

#[test]
fn test_dir_source_reads_and_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("basic-user-prompt.txt"), "hello {{professor.name}}").unwrap();

    let source = DirTemplateSource::new(dir.path());
    assert_eq!(
        source.read("basic-user-prompt.txt").unwrap(),
        "hello {{professor.name}}"
    );
    assert!(matches!(
        source.read("nope.txt"),
        Err(TemplateError::Missing { name }) if name == "nope.txt"
    ));
}

#[test]
fn test_builder_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("basic-system-prompt.txt"), "SYS").unwrap();
    std::fs::write(dir.path().join("basic-user-prompt.txt"), "{{professor.name}}").unwrap();

    let builder = PromptBuilder::from_dir(dir.path());
    let prompt = builder.build(&profile(), "x", StrictnessTier::Basic, ScoringScheme::Original);
    assert_eq!(prompt, "SYS\n\nGrace Hopper");
}

#[test]
fn test_shipped_prompt_assets_carry_all_placeholders() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts");
    let source = DirTemplateSource::new(&dir);

    for strictness in [StrictnessTier::Strict, StrictnessTier::Basic] {
        for scheme in [ScoringScheme::Original, ScoringScheme::DecisionTree] {
            let policy = PromptPolicy::new(strictness, scheme);
            source.read(policy.system_asset()).unwrap();
            let user = source.read(policy.user_asset()).unwrap();
            for key in [
                "{{professor.name}}",
                "{{professor.affiliation}}",
                "{{professor.areas}}",
                "{{publications}}",
                "{{researchDirection}}",
            ] {
                assert!(user.contains(key), "{} lacks {key}", policy.user_asset());
            }
        }
    }
}
