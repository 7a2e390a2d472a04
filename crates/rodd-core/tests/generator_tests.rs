//! End-to-end generation: loading, resolution, fan-out and emission

use pretty_assertions::assert_eq;
use rodd_core::emit::target_path;
use rodd_core::{
    Component, EmissionSink, Error, ExceptionList, Generator, RecordOutcome, ResourceRecord,
    Result, RunContext, TerraformValidator,
};
use rodd_fs::NormalizedPath;
use rodd_test_utils::CatalogFixture;
use serde_yaml::{Mapping, Value};

fn map(yaml: &str) -> Mapping {
    serde_yaml::from_str(yaml).unwrap()
}

fn instance(yaml: &str) -> ResourceRecord {
    serde_yaml::from_str(yaml).unwrap()
}

/// Collects finalized records instead of writing them.
#[derive(Default)]
struct RecordingSink {
    records: Vec<ResourceRecord>,
    fail_for: Option<String>,
}

impl EmissionSink for RecordingSink {
    fn emit(
        &mut self,
        record: &ResourceRecord,
        destination: &NormalizedPath,
        _overwrite: bool,
    ) -> Result<NormalizedPath> {
        let path = target_path(destination, record)?;
        let name = record.get("resource_name").and_then(Value::as_str);
        if name.is_some() && name == self.fail_for.as_deref() {
            return Err(Error::invalid_field("resource_name", "sink rejected record"));
        }
        self.records.push(record.clone());
        Ok(path)
    }
}

fn generator(fixture: &CatalogFixture, context: RunContext) -> Generator {
    Generator::new(
        context,
        NormalizedPath::new(fixture.catalog_root()),
        NormalizedPath::new(fixture.templates_dir()),
    )
}

#[test]
fn test_substitution_uses_all_definition_tiers() {
    let fixture = CatalogFixture::new();
    fixture.record(
        "monitors",
        "system",
        "cpu",
        r#"
name: CPU on ${env}
query: "avg:system.cpu{env:${env},team:${team}} > ${critical}"
tags: ["env:${env}", "region:${region}"]
thresholds: {critical: "${critical}"}
definition_defaults: {critical: 90, team: infra}
"#,
    );

    let mut generator = generator(
        &fixture,
        RunContext::new(map("env: prod\n"), ExceptionList::default()),
    );
    generator.add_component(
        Component::new("monitors", "monitors.tf.jinja").with_definitions(map("region: eu\n")),
    );
    generator
        .add("monitors", &instance("source: system.cpu\ndefinitions: {team: sre}\n"))
        .unwrap();

    let mut sink = RecordingSink::default();
    let report = generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    assert_eq!(report.emitted_count(), 1);
    let record = &sink.records[0];
    assert_eq!(record.get("name"), Some(&Value::from("CPU on prod")));
    assert_eq!(
        record.get("query"),
        Some(&Value::from("avg:system.cpu{env:prod,team:sre} > 90"))
    );
    assert_eq!(
        record.get("tags"),
        Some(&Value::Sequence(vec![
            Value::from("env:prod"),
            Value::from("region:eu"),
        ]))
    );
    assert_eq!(record.get("thresholds"), Some(&Value::Mapping(map("critical: \"90\"\n"))));
    assert_eq!(record.get("resource_name"), Some(&Value::from("cpu_on_prod")));
    assert_eq!(
        record.definitions(),
        map("env: prod\nregion: eu\nteam: sre\ncritical: 90\n")
    );
}

#[test]
fn test_record_without_placeholders_is_unchanged_apart_from_naming() {
    let fixture = CatalogFixture::new();
    fixture.record(
        "monitors",
        "system",
        "disk",
        "name: Disk\nquery: disk > 90\ntags: [a, b]\n",
    );
    let mut generator = generator(&fixture, RunContext::new(map("env: prod\n"), ExceptionList::default()));
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: system\n")).unwrap();

    let mut sink = RecordingSink::default();
    generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    let record = &sink.records[0];
    assert_eq!(record.get("query"), Some(&Value::from("disk > 90")));
    assert_eq!(
        record.get("tags"),
        Some(&Value::Sequence(vec![Value::from("a"), Value::from("b")]))
    );
}

#[test]
fn test_namespaced_record_fans_out() {
    let fixture = CatalogFixture::new();
    fixture.record(
        "monitors",
        "kubernetes",
        "pods",
        "name: Pods in ${namespace}\nnamespaced: true\ntags: [\"ns:${namespace}\"]\n",
    );
    fixture.record("monitors", "kubernetes", "nodes", "name: Nodes\n");

    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator
        .add(
            "monitors",
            &instance("source: kubernetes\ndefinitions: {namespace: [default, kube-system]}\n"),
        )
        .unwrap();

    let mut sink = RecordingSink::default();
    let report = generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    let names: Vec<&str> = sink
        .records
        .iter()
        .filter_map(|r| r.get("resource_name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["nodes", "pods_in_default", "pods_in_kube_system"]);
    assert_eq!(report.emitted_count(), 3);

    assert_eq!(
        sink.records[1].get("tags"),
        Some(&Value::Sequence(vec![Value::from("ns:default")]))
    );
    assert_eq!(
        sink.records[2].get("tags"),
        Some(&Value::Sequence(vec![Value::from("ns:kube-system")]))
    );
}

#[test]
fn test_partial_failure_skips_only_the_bad_record() {
    let fixture = CatalogFixture::new();
    fixture.record("monitors", "mixed", "a_first", "name: First\n");
    fixture.record("monitors", "mixed", "b_second", "name: [not, text]\n");
    fixture.record("monitors", "mixed", "c_third", "name: Third\n");

    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: mixed\n")).unwrap();

    let mut sink = RecordingSink::default();
    let report = generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    let emitted: Vec<&str> = report.emitted().map(|p| p.as_str()).collect();
    assert_eq!(emitted, vec!["out/first.tf", "out/third.tf"]);

    let skipped: Vec<(&str, &str)> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, "monitors.mixed.b_second");
    assert!(skipped[0].1.contains("name"));
}

#[test]
fn test_sink_failure_is_a_skip() {
    let fixture = CatalogFixture::new();
    fixture.record("monitors", "mixed", "a", "name: Keep\n");
    fixture.record("monitors", "mixed", "b", "name: Reject\n");

    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: mixed\n")).unwrap();

    let mut sink = RecordingSink {
        fail_for: Some("reject".into()),
        ..Default::default()
    };
    let report = generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    assert_eq!(report.emitted_count(), 1);
    assert_eq!(
        report.outcomes[1],
        RecordOutcome::Skipped {
            resource_id: "monitors.mixed.b".into(),
            reason: "Invalid field 'resource_name': sink rejected record".into(),
        }
    );
}

#[test]
fn test_direct_records_are_generated_first() {
    let fixture = CatalogFixture::new();
    fixture.record("monitors", "aws", "elb", "name: ELB\n");

    let mut generator = generator(&fixture, RunContext::new(map("env: prod\n"), ExceptionList::default()));
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: aws\n")).unwrap();
    generator
        .add("monitors", &instance("title: Ad-hoc ${env} check\n"))
        .unwrap();

    let mut sink = RecordingSink::default();
    let report = generator.generate_with(&mut sink, &NormalizedPath::new("out"), false);

    let ids: Vec<&str> = report.outcomes.iter().map(RecordOutcome::resource_id).collect();
    assert_eq!(ids, vec!["monitors#0", "monitors.aws.elb"]);
    assert_eq!(
        sink.records[0].get("resource_name"),
        Some(&Value::from("ad_hoc_prod_check"))
    );
}

#[test]
fn test_unknown_component_is_an_error() {
    let fixture = CatalogFixture::new();
    let mut generator = generator(&fixture, RunContext::default());
    let err = generator
        .add("timeboards", &instance("source: aws\n"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownComponent { item_type } if item_type == "timeboards"));
}

#[test]
fn test_generate_renders_files_with_escaped_quotes() {
    let fixture = CatalogFixture::new();
    fixture.monitor_template();
    fixture.record(
        "monitors",
        "system",
        "cpu",
        r#"
name: CPU % Usage!!
query: avg:system.cpu.user{*} > 90
message: 'say "hi" to ${team}'
tags: ["team:sre"]
"#,
    );

    let mut generator = generator(&fixture, RunContext::new(map("team: sre\n"), ExceptionList::default()));
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: system\n")).unwrap();

    let report = generator.generate(&NormalizedPath::new(fixture.destination()), false);

    assert_eq!(report.skipped_count(), 0);
    assert_eq!(fixture.output_files(), vec!["cpu_usage.tf"]);
    insta::assert_snapshot!(fixture.read_output("cpu_usage.tf"), @r###"
    resource "datadog_monitor" "cpu_usage" {
      name    = "CPU % Usage!!"
      query   = "avg:system.cpu.user{*} > 90"
      message = "say \"hi\" to sre"
      tags    = ["team:sre"]
    }
    "###);
}

#[test]
fn test_existing_files_are_kept_without_overwrite() {
    let fixture = CatalogFixture::new();
    fixture.monitor_template();
    fixture.record("monitors", "system", "cpu", "name: CPU\nquery: q\ntags: []\n");
    std::fs::write(fixture.destination().join("cpu.tf"), "hand edited\n").unwrap();

    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: system\n")).unwrap();
    let destination = NormalizedPath::new(fixture.destination());

    let report = generator.generate(&destination, false);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(fixture.read_output("cpu.tf"), "hand edited\n");

    let report = generator.generate(&destination, true);
    assert_eq!(report.emitted_count(), 1);
    assert!(fixture.read_output("cpu.tf").starts_with("resource \"datadog_monitor\" \"cpu\""));
}

#[test]
fn test_missing_template_skips_component_records() {
    let fixture = CatalogFixture::new();
    fixture.record("monitors", "aws", "elb", "name: ELB\n");
    fixture.record("monitors", "aws", "rds", "name: RDS\n");

    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(Component::new("monitors", "missing.tf.jinja"));
    generator.add("monitors", &instance("source: aws\n")).unwrap();

    let report = generator.generate(&NormalizedPath::new(fixture.destination()), false);

    assert_eq!(report.emitted_count(), 0);
    let skipped: Vec<&str> = report.skipped().map(|(id, _)| id).collect();
    assert_eq!(skipped, vec!["monitors.aws.elb", "monitors.aws.rds"]);
    assert!(fixture.output_files().is_empty());
}

#[test]
fn test_validator_failure_is_only_a_warning() {
    let fixture = CatalogFixture::new();
    fixture.monitor_template();
    fixture.record("monitors", "aws", "elb", "name: ELB\nquery: q\ntags: []\n");

    let mut generator = generator(&fixture, RunContext::default())
        .with_validator(TerraformValidator::new("/nonexistent/terraform"));
    generator.add_component(Component::new("monitors", "monitors.tf.jinja"));
    generator.add("monitors", &instance("source: aws\n")).unwrap();

    let report = generator.generate(&NormalizedPath::new(fixture.destination()), false);

    assert_eq!(report.emitted_count(), 1);
    assert_eq!(report.validation, None);
    assert_eq!(report.warnings.len(), 1);
    fixture.assert_output_exists("elb.tf");
}

#[test]
fn test_show_finalizes_without_writing() {
    let fixture = CatalogFixture::new();
    fixture.record(
        "monitors",
        "kubernetes",
        "pods",
        "name: Pods ${namespace}\nnamespaced: true\n",
    );
    let mut generator = generator(&fixture, RunContext::default());
    generator.add_component(
        Component::new("monitors", "monitors.tf.jinja")
            .with_definitions(map("namespace: [a, b]\n")),
    );
    generator.add("monitors", &instance("source: kubernetes\n")).unwrap();

    let records = generator.show("monitors.kubernetes.pods").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("resource_name"), Some(&Value::from("pods_b")));
    assert!(fixture.output_files().is_empty());

    assert!(matches!(
        generator.show("monitors.kubernetes.nope"),
        Err(Error::ResourceNotFound { .. })
    ));
}
