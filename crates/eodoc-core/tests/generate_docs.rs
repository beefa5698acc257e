//! End-to-end documentation runs over temporary artifact trees.

use std::fs;
use std::path::Path;

use eodoc_core::{DocEngine, DocsConfig, EodocError, RunReport};
use tempfile::{tempdir, TempDir};

const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<program name="main"><objects/></program>
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn program(name: &str) -> String {
    format!(
        r#"<program author="eo-parser" version="0.58.6"><objects><o name="{name}" line="1" pos="0"/></objects></program>"#
    )
}

/// Build an input tree from `(relative path, content)` pairs and run the engine.
fn run(files: &[(&str, &str)]) -> (TempDir, RunReport) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    fs::create_dir_all(&input).unwrap();
    for (rel, content) in files {
        write(&input, rel, content);
    }
    let config = DocsConfig::new(&input, dir.path().join("docs"));
    let report = DocEngine::from_config(config)
        .expect("engine")
        .run()
        .expect("run");
    (dir, report)
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join("docs").join(rel))
        .unwrap_or_else(|e| panic!("read {rel}: {e}"))
}

#[test]
fn same_package_artifacts_produce_expected_layout() {
    let (dir, report) = run(&[
        ("foo/bar/test1.xmir", MINIMAL),
        ("foo/bar/test2.xmir", MINIMAL),
    ]);
    let docs = dir.path().join("docs");

    for rel in [
        "foo/bar/test1.html",
        "foo/bar/test2.html",
        "package_foo.bar.html",
        "packages.html",
        "styles.css",
        "summary.xml",
    ] {
        assert!(docs.join(rel).is_file(), "missing {rel}");
    }
    assert_eq!(report.artifacts, 2);
    assert_eq!(report.packages, 1);
    assert_eq!(report.aggregate_pages, 2);
    assert_eq!(report.summary, docs.join("summary.xml"));
}

#[test]
fn summary_carries_metadata_and_entities() {
    let (dir, _) = run(&[("app.xmir", program("app").as_str())]);
    let xml = read(&dir, "summary.xml");

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<author>eo-parser</author>"));
    assert!(xml.contains("<version>0.58.6</version>"));
    assert!(xml.contains("name=\"app\""));
}

#[test]
fn distinct_packages_get_distinct_summary_entries() {
    let (dir, report) = run(&[
        ("com/example/app.xmir", program("app").as_str()),
        ("org/test/util.xmir", program("util").as_str()),
    ]);
    let xml = read(&dir, "summary.xml");

    assert_eq!(report.packages, 2);
    assert_eq!(xml.matches("<package name=").count(), 2);
    let com = xml.find("<package name=\"com.example\">").unwrap();
    let org = xml.find("<package name=\"org.test\">").unwrap();
    assert!(com < org);
    assert!(xml[com..org].contains("name=\"app\""));
    assert!(xml[org..].contains("name=\"util\""));
}

#[test]
fn package_page_holds_only_its_own_fragments() {
    let (dir, _) = run(&[
        ("a/one.xmir", program("one").as_str()),
        ("a/two.xmir", program("two").as_str()),
        ("b/three.xmir", program("three").as_str()),
    ]);
    let a = read(&dir, "package_a.html");
    assert!(a.contains("<code>one</code>"));
    assert!(a.contains("<code>two</code>"));
    assert!(!a.contains("<code>three</code>"));

    let b = read(&dir, "package_b.html");
    assert!(b.contains("<code>three</code>"));
    assert!(!b.contains("<code>one</code>"));
}

#[test]
fn global_page_concatenates_in_discovery_order() {
    let (dir, _) = run(&[
        ("b/z.xmir", program("zeta").as_str()),
        ("a/y.xmir", program("ypsilon").as_str()),
        ("c.xmir", program("gamma").as_str()),
    ]);
    let all = read(&dir, "packages.html");
    let y = all.find("<code>ypsilon</code>").unwrap();
    let z = all.find("<code>zeta</code>").unwrap();
    let c = all.find("<code>gamma</code>").unwrap();
    assert!(y < z && z < c, "expected a/y, b/z, c order");
}

#[test]
fn single_root_artifact_still_gets_global_page() {
    let (dir, report) = run(&[("solo.xmir", MINIMAL)]);
    let docs = dir.path().join("docs");

    assert!(docs.join("solo.html").is_file());
    assert!(docs.join("packages.html").is_file());
    assert_eq!(report.aggregate_pages, 1);
    let names: Vec<String> = fs::read_dir(&docs)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!names.iter().any(|n| n.starts_with("package_")));
    assert!(read(&dir, "summary.xml").contains("<package name=\"\">"));
}

#[test]
fn every_page_links_the_stylesheet() {
    let (dir, _) = run(&[("x/y/deep.xmir", MINIMAL), ("top.xmir", MINIMAL)]);
    assert!(read(&dir, "x/y/deep.html").contains("href=\"../../styles.css\""));
    assert!(read(&dir, "top.html").contains("href=\"styles.css\""));
    assert!(read(&dir, "package_x.y.html").contains("href=\"styles.css\""));
    assert!(read(&dir, "packages.html").contains("href=\"styles.css\""));
}

#[test]
fn summary_escapes_markup_in_values() {
    let (dir, _) = run(&[(
        "p/esc.xmir",
        r#"<program author="a &amp; b"><o name="x&lt;y&gt;" base="&amp;z"/><sheet>s&lt;1&gt;</sheet></program>"#,
    )]);
    let xml = read(&dir, "summary.xml");
    assert!(xml.contains("<author>a &amp; b</author>"));
    assert!(xml.contains("name=\"x&lt;y&gt;\""));
    assert!(xml.contains("base=\"&amp;z\""));
    assert!(xml.contains("<sheet>s&lt;1&gt;</sheet>"));
    assert!(!xml.contains("x<y>"));
}

#[test]
fn sheets_keep_order_and_duplicates() {
    let (dir, _) = run(&[(
        "s.xmir",
        "<program><sheets><sheet>a</sheet><sheet>b</sheet><sheet>a</sheet></sheets></program>",
    )]);
    let xml = read(&dir, "summary.xml");
    let a1 = xml.find("<sheet>a</sheet>").unwrap();
    let b = xml.find("<sheet>b</sheet>").unwrap();
    let a2 = xml.rfind("<sheet>a</sheet>").unwrap();
    assert!(a1 < b && b < a2);
}

#[test]
fn malformed_facts_do_not_abort_the_run() {
    let (dir, report) = run(&[(
        "broken.xmir",
        r#"<program><o name="x" line="oops"/><sheet>unterminated"#,
    )]);
    assert_eq!(report.artifacts, 1);
    assert_eq!(report.extract_issues, 2);
    let xml = read(&dir, "summary.xml");
    assert!(xml.contains("<o name=\"x\"/>"));
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    write(&input, "a/b.xmir", program("b").as_str());
    write(&input, "c.xmir", program("c").as_str());
    let config = DocsConfig::new(&input, dir.path().join("docs"));

    let engine = DocEngine::from_config(config).unwrap();
    let docs = dir.path().join("docs");
    let outputs = ["a/b.html", "c.html", "package_a.html", "packages.html", "summary.xml"];
    let snapshot = || -> Vec<Vec<u8>> {
        outputs
            .iter()
            .map(|rel| fs::read(docs.join(rel)).unwrap())
            .collect()
    };

    engine.run().unwrap();
    let before = snapshot();
    engine.run().unwrap();
    let after = snapshot();
    assert_eq!(before, after);
}

#[test]
fn artifact_without_document_element_fails_the_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    write(&input, "ok.xmir", MINIMAL);
    write(&input, "pkg/garbage.xmir", "not xmir at all");

    let config = DocsConfig::new(&input, dir.path().join("docs"));
    match DocEngine::from_config(config).unwrap().run() {
        Err(EodocError::Transform { artifact, .. }) => assert_eq!(artifact, "pkg/garbage.xmir"),
        other => panic!("expected Transform error, got {other:?}"),
    }
}

#[test]
fn unreadable_input_root_is_fatal() {
    let dir = tempdir().unwrap();
    let config = DocsConfig::new(dir.path().join("missing"), dir.path().join("docs"));
    assert!(matches!(
        DocEngine::from_config(config).unwrap().run(),
        Err(EodocError::Discovery { .. })
    ));
}

#[test]
fn custom_transform_definition_is_used() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    write(&input, "p/q.xmir", MINIMAL);
    let template = dir.path().join("fragment.html");
    fs::write(&template, "<article data-path=\"{{path}}\">{{name}}</article>").unwrap();

    let config = DocsConfig::new(&input, dir.path().join("docs")).with_transform(&template);
    DocEngine::from_config(config).unwrap().run().unwrap();

    let page = fs::read_to_string(dir.path().join("docs/p/q.html")).unwrap();
    assert!(page.contains("<article data-path=\"p/q.xmir\">main</article>"));
}

#[test]
fn empty_input_tree_still_writes_global_outputs() {
    let (dir, report) = run(&[]);
    assert_eq!(report.artifacts, 0);
    assert!(dir.path().join("docs/packages.html").is_file());
    assert!(dir.path().join("docs/styles.css").is_file());
    assert!(read(&dir, "summary.xml").contains("<eodoc/>"));
}

#[test]
fn multi_part_extension_keeps_base_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    write(&input, "p/app.eo.xml", MINIMAL);
    let config = DocsConfig::new(&input, dir.path().join("docs")).with_extension("eo.xml");
    DocEngine::from_config(config).unwrap().run().unwrap();

    assert!(dir.path().join("docs/p/app.html").is_file());
    assert!(!dir.path().join("docs/p/app.eo.html").exists());
}

fn collision(files: &[(&str, &str)]) -> (TempDir, EodocError) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("eo");
    for (rel, content) in files {
        write(&input, rel, content);
    }
    let config = DocsConfig::new(&input, dir.path().join("docs"));
    let err = DocEngine::from_config(config).unwrap().run().unwrap_err();
    (dir, err)
}

#[test]
fn root_artifact_named_packages_is_rejected() {
    let (dir, err) = collision(&[("packages.xmir", MINIMAL), ("q/other.xmir", MINIMAL)]);
    match err {
        EodocError::PageCollision { artifact, page } => {
            assert_eq!(artifact, "packages.xmir");
            assert_eq!(page, "packages.html");
        }
        other => panic!("expected PageCollision, got {other:?}"),
    }
    assert!(!dir.path().join("docs").exists());
}

#[test]
fn root_artifact_named_like_package_page_is_rejected() {
    let (dir, err) = collision(&[("package_foo.xmir", MINIMAL), ("foo/x.xmir", MINIMAL)]);
    match err {
        EodocError::PageCollision { artifact, page } => {
            assert_eq!(artifact, "package_foo.xmir");
            assert_eq!(page, "package_foo.html");
        }
        other => panic!("expected PageCollision, got {other:?}"),
    }
    assert!(!dir.path().join("docs").exists());
}
