//! Tests for layered config resolution.

use crate::config::{ConfigResolver, FieldValue, LayerKind};
use crate::context::{BUILD_DESCRIPTOR, CONFIG_FILE_NAME, FixedPaths};
use crate::error::HydrantError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary home directory plus a workflow directory with one task.
struct Fixture {
    _temp: TempDir,
    paths: FixedPaths,
    workflow: PathBuf,
    task: PathBuf,
}

impl Fixture {
    fn new(user_cfg: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(temp.path().join("home"));
        fs::create_dir_all(&paths.user_dir).unwrap();
        fs::write(paths.user_config(), user_cfg).unwrap();

        let workflow = temp.path().join("flows").join("wf");
        let task = workflow.join("task_1");
        fs::create_dir_all(&task).unwrap();
        fs::write(task.join(BUILD_DESCRIPTOR), "FROM scratch\n").unwrap();

        Self {
            _temp: temp,
            paths,
            workflow,
            task,
        }
    }

    fn write_cfg(&self, dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    fn resolver(&self) -> ConfigResolver<'_> {
        ConfigResolver::new(&self.paths)
    }
}

fn scalar(s: &str) -> Option<FieldValue> {
    Some(FieldValue::Scalar(s.to_string()))
}

fn list(items: &[&str]) -> Option<FieldValue> {
    Some(FieldValue::List(items.iter().map(|s| s.to_string()).collect()))
}

#[test]
fn test_user_config_only() {
    let fx = Fixture::new("[All]\nCromwell = /opt/cromwell.jar\n[Docker]\nNamespace = acme\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();

    assert_eq!(config.all.cromwell, scalar("/opt/cromwell.jar"));
    assert_eq!(config.all.logfile, None);
    assert_eq!(config.docker.namespace, scalar("acme"));
    assert_eq!(config.docker.registry, None);
    assert_eq!(config.tasks, None);
}

#[test]
fn test_task_layer_overrides_field_by_field() {
    let fx = Fixture::new("[Docker]\nNamespace = acme\n");
    fx.write_cfg(&fx.task, "[Docker]\nTag = 1.2.3\n");

    let config = fx.resolver().load(&fx.task, None).unwrap();

    assert_eq!(config.docker.registry, None);
    assert_eq!(config.docker.namespace, scalar("acme"));
    assert_eq!(config.docker.tag, scalar("1.2.3"));
}

#[test]
fn test_overlay_precedence_all_layers() {
    let fx = Fixture::new("[Docker]\nRegistry = user.io\nNamespace = user\nTag = u\n");
    fx.write_cfg(&fx.workflow, "[Docker]\nNamespace = flow\nTag = w\n");
    fx.write_cfg(&fx.task, "[Docker]\nTag = t\n");
    let explicit = fx.workflow.join("cli.cfg");
    fs::write(&explicit, "[Docker]\nRegistry = cli.io\n").unwrap();

    let config = fx.resolver().load(&fx.task, Some(&explicit)).unwrap();

    assert_eq!(config.docker.registry, scalar("cli.io"));
    assert_eq!(config.docker.namespace, scalar("flow"));
    assert_eq!(config.docker.tag, scalar("t"));
}

#[test]
fn test_later_empty_value_resolves_to_absence() {
    let fx = Fixture::new("[Docker]\nRegistry = user.io\n");
    fx.write_cfg(&fx.workflow, "[Docker]\nRegistry =\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.docker.registry, None);
}

#[test]
fn test_workflow_dir_has_no_task_layer() {
    let fx = Fixture::new("[Docker]\n");
    let layers = fx.resolver().layers(&fx.workflow, None).unwrap();
    let kinds: Vec<_> = layers.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LayerKind::User, LayerKind::Workflow]);
    assert_eq!(layers[1].path, fx.workflow.join(CONFIG_FILE_NAME));
}

#[test]
fn test_task_dir_uses_parent_workflow_layer() {
    let fx = Fixture::new("[Docker]\n");
    let layers = fx.resolver().layers(&fx.task, None).unwrap();
    let kinds: Vec<_> = layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![LayerKind::User, LayerKind::Workflow, LayerKind::Task]
    );
    assert_eq!(layers[1].path, fx.workflow.join(CONFIG_FILE_NAME));
    assert_eq!(layers[2].path, fx.task.join(CONFIG_FILE_NAME));
}

#[test]
fn test_comma_values_become_lists() {
    let fx = Fixture::new("[FireCloud]\nWorkspaces = ws1, ws2,ws3\nSynopsis = short\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();

    assert_eq!(config.firecloud.workspaces, list(&["ws1", "ws2", "ws3"]));
    assert_eq!(config.firecloud.synopsis, scalar("short"));
    assert_eq!(config.firecloud.method_namespace, None);
}

#[test]
fn test_unknown_keys_ignored() {
    let fx = Fixture::new("[Docker]\nNamespace = acme\nColour = blue\n[Extra]\nKey = v\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.docker.namespace, scalar("acme"));
}

#[test]
fn test_missing_sections_are_absent() {
    let fx = Fixture::new("");
    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config, Default::default());
}

#[test]
fn test_task_sections_discovered_in_order() {
    let fx = Fixture::new(
        "[Docker]\nNamespace = acme\n[Task align]\nTag = 2\n[Task  call_variants ]\nSrc = ~/src/cv\n",
    );

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    let tasks = config.tasks.as_ref().unwrap();

    let names: Vec<_> = tasks.keys().cloned().collect();
    assert_eq!(names, vec!["align", "call_variants"]);
    assert_eq!(tasks["align"].docker.tag, scalar("2"));
    assert_eq!(tasks["call_variants"].src, scalar("~/src/cv"));
}

#[test]
fn test_task_sections_union_across_layers() {
    let fx = Fixture::new("[Task X]\nNamespace = acme\n");
    let explicit = fx.workflow.join("cli.cfg");
    fs::write(&explicit, "[Task X]\nTag = 9\n[Task Y]\nTag = 1\n").unwrap();

    let config = fx.resolver().load(&fx.workflow, Some(&explicit)).unwrap();
    let tasks = config.tasks.unwrap();

    assert_eq!(tasks["X"].docker.namespace, scalar("acme"));
    assert_eq!(tasks["X"].docker.tag, scalar("9"));
    assert_eq!(tasks["Y"].docker.tag, scalar("1"));
    assert_eq!(tasks.len(), 2);
}

#[test]
fn test_colliding_task_headers_merge_last_wins() {
    let fx = Fixture::new("[Task X]\nTag = 1\nSrc = a\n[Task  X ]\nTag = 2\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    let tasks = config.tasks.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks["X"].docker.tag, scalar("2"));
    assert_eq!(tasks["X"].src, scalar("a"));
}

#[test]
fn test_task_section_without_name_is_error() {
    let fx = Fixture::new("[Task  ]\nTag = 1\n");
    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    assert!(matches!(err, HydrantError::ConfigParseError { .. }));
}

#[test]
fn test_interpolation_within_section() {
    let fx = Fixture::new(
        "[All]\nBase = /opt/tools\nCromwell = %(Base)s/cromwell.jar\nLogfile = 100%% sure\n",
    );

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.all.cromwell, scalar("/opt/tools/cromwell.jar"));
    assert_eq!(config.all.logfile, scalar("100% sure"));
}

#[test]
fn test_interpolation_sees_later_layers() {
    let fx = Fixture::new("[All]\nBase = /opt\nWDLtool = %(Base)s/wdltool.jar\n");
    fx.write_cfg(&fx.workflow, "[All]\nBase = /srv\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.all.wdltool, scalar("/srv/wdltool.jar"));
}

#[test]
fn test_default_section_supplies_fallbacks() {
    let fx = Fixture::new("[DEFAULT]\nTag = 1\n[Docker]\nNamespace = acme\n[Task a]\nSrc = x\n");

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.docker.tag, scalar("1"));
    assert_eq!(config.tasks.unwrap()["a"].docker.tag, scalar("1"));
}

#[test]
fn test_bad_interpolation_is_parse_error() {
    let fx = Fixture::new("[All]\nCromwell = %(Missing)s/c.jar\n");
    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    assert!(matches!(err, HydrantError::ConfigParseError { .. }));
    assert!(err.to_string().contains("Missing"));

    let fx = Fixture::new("[All]\nCromwell = 50% done\n");
    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    assert!(matches!(err, HydrantError::ConfigParseError { .. }));
}

#[test]
fn test_recursive_interpolation_is_bounded() {
    let fx = Fixture::new("[All]\nLogfile = %(Logfile)s\n");
    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    assert!(err.to_string().contains("nests deeper"));
}

#[test]
fn test_missing_user_config() {
    let fx = Fixture::new("");
    fs::remove_file(fx.paths.user_config()).unwrap();

    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    assert!(matches!(err, HydrantError::ConfigNotFound { .. }));
}

#[test]
fn test_missing_explicit_config() {
    let fx = Fixture::new("");
    let err = fx
        .resolver()
        .load(&fx.workflow, Some(&fx.workflow.join("nope.cfg")))
        .unwrap_err();
    assert!(matches!(err, HydrantError::ExplicitFileNotFound { .. }));
}

#[test]
fn test_malformed_layer_is_parse_error() {
    let fx = Fixture::new("[Docker]\n");
    fx.write_cfg(&fx.workflow, "Namespace = acme\n");

    let err = fx.resolver().load(&fx.workflow, None).unwrap_err();
    match err {
        HydrantError::ConfigParseError { path, .. } => {
            assert_eq!(path, fx.workflow.join(CONFIG_FILE_NAME));
        }
        other => panic!("expected ConfigParseError, got {:?}", other),
    }
}

#[test]
fn test_default_user_config_loads() {
    let fx = Fixture::new(crate::context::DEFAULT_USER_CONFIG);

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert!(config.all.cromwell.is_some());
    assert!(config.all.wdltool.is_some());
    assert_eq!(config.all.logfile, None);
    assert_eq!(config.docker, Default::default());
    assert_eq!(config.firecloud, Default::default());
}

#[test]
fn test_every_schema_field_is_projected() {
    use crate::config::{AllSection, DockerSection, FireCloudSection, TaskSection};

    let mut cfg = String::new();
    for (section, fields) in [
        (AllSection::NAME.to_string(), AllSection::FIELDS),
        (FireCloudSection::NAME.to_string(), FireCloudSection::FIELDS),
        (DockerSection::NAME.to_string(), DockerSection::FIELDS),
        (format!("{}align", TaskSection::NAME_PREFIX), TaskSection::FIELDS),
    ] {
        cfg.push_str(&format!("[{}]\n", section));
        for field in fields {
            cfg.push_str(&format!("{} = v\n", field));
        }
    }
    let fx = Fixture::new(&cfg);

    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    let all = [&config.all.logfile, &config.all.cromwell, &config.all.wdltool];
    let firecloud = [
        &config.firecloud.method_namespace,
        &config.firecloud.workspaces,
        &config.firecloud.synopsis,
        &config.firecloud.documentation,
        &config.firecloud.snapshot_comment,
    ];
    let docker = [
        &config.docker.registry,
        &config.docker.namespace,
        &config.docker.tag,
    ];
    let task = &config.tasks.as_ref().unwrap()["align"];
    let task_fields = [
        &task.src,
        &task.docker.registry,
        &task.docker.namespace,
        &task.docker.tag,
    ];
    assert_eq!(all.len(), AllSection::FIELDS.len());
    assert_eq!(firecloud.len(), FireCloudSection::FIELDS.len());
    assert_eq!(docker.len(), DockerSection::FIELDS.len());
    assert_eq!(task_fields.len(), TaskSection::FIELDS.len());
    for value in all.iter().chain(&firecloud).chain(&docker).chain(&task_fields) {
        assert_eq!(**value, scalar("v"));
    }
}

#[test]
fn test_multi_paragraph_documentation_survives_layering() {
    let fx = Fixture::new("[FireCloud]\nDocumentation = para one\n\n    para two\n");
    let config = fx.resolver().load(&fx.workflow, None).unwrap();
    assert_eq!(config.firecloud.documentation, scalar("para one\n\npara two"));
}
