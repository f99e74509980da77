//! End-to-end tests for the `schemaforge` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
models:
  Post:
    module: blog
    fields:
      title: { type: string }
      body: { type: text, modifiers: { nullable: true } }
    relations:
      tags: { type: belongsToMany, model: Tag }
    sidebar: { title: Articles }
  Tag:
    module: blog
    fields:
      name: { type: string }
"#;

fn schemaforge(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("schemaforge").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1");
    cmd
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("schema.yaml"), SCHEMA).unwrap();
    temp
}

fn migrations(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join("Modules/Blog/Database/Migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    schemaforge(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    schemaforge(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_writes_module_tree() {
    let temp = workspace();

    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Post.php"));

    let root = temp.path().join("app");
    assert!(root.join("Modules/Blog/Models/Post.php").is_file());
    assert!(root.join("Modules/Blog/Models/Tag.php").is_file());
    assert!(root.join("Modules/Blog/Data/post.php").is_file());
    assert!(root.join("Modules/Blog/Config/sidebar_menu.php").is_file());

    let names = migrations(&root);
    assert_eq!(names.len(), 3, "{names:?}");
    assert!(names[0].ends_with("_create_posts_table.php"));
    assert!(names[1].ends_with("_create_post_tag_table.php"));
    assert!(names[2].ends_with("_create_tags_table.php"));

    let model = fs::read_to_string(root.join("Modules/Blog/Models/Post.php")).unwrap();
    assert!(model.contains("class Post"));
    assert!(model.contains("public function tags()"));
}

#[test]
fn test_second_run_skips_existing_files() {
    let temp = workspace();
    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app"])
        .assert()
        .success();

    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 file(s) written"));

    assert_eq!(migrations(&temp.path().join("app")).len(), 3);
}

#[test]
fn test_no_menus_leaves_menu_files_alone() {
    let temp = workspace();
    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app", "--no-menus"])
        .assert()
        .success();

    let config = temp.path().join("app/Modules/Blog/Config");
    assert!(!config.join("sidebar_menu.php").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = workspace();

    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would write"));

    assert!(!temp.path().join("app").exists());
}

#[test]
fn test_model_filter() {
    let temp = workspace();
    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app", "--model", "Tag"])
        .assert()
        .success();

    let models = temp.path().join("app/Modules/Blog/Models");
    assert!(models.join("Tag.php").is_file());
    assert!(!models.join("Post.php").exists());
}

#[test]
fn test_json_report() {
    let temp = workspace();
    let assert = schemaforge(temp.path())
        .args([
            "generate",
            "schema.yaml",
            "--root",
            "app",
            "--output-format",
            "json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(report.get("run_id").is_some());
    assert_eq!(report["models"], 2);
    assert_eq!(report["failures"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().unwrap();
    schemaforge(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schemaforge"));
}

#[test]
fn test_config_get_reads_environment() {
    let temp = TempDir::new().unwrap();
    schemaforge(temp.path())
        .env("SCHEMAFORGE_GENERATION__OUTPUT_ROOT", "src/app")
        .args(["config", "get", "generation.output_root"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generation.output_root = src/app"));
}

#[test]
fn test_init_local_writes_config() {
    let temp = TempDir::new().unwrap();
    schemaforge(temp.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join(".schemaforge.toml")).unwrap();
    assert!(written.contains("[generation]"));
    assert!(written.contains("output_root"));
}

#[test]
fn test_local_config_sets_output_root() {
    let temp = workspace();
    fs::write(
        temp.path().join(".schemaforge.toml"),
        "[generation]\noutput_root = \"site\"\n",
    )
    .unwrap();

    schemaforge(temp.path())
        .args(["generate", "schema.yaml"])
        .assert()
        .success();

    assert!(temp.path().join("site/Modules/Blog/Models/Post.php").is_file());
}

#[test]
fn test_skipped_files_are_listed_only_when_verbose() {
    let temp = workspace();
    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app"])
        .assert()
        .success();

    schemaforge(temp.path())
        .args(["generate", "schema.yaml", "--root", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists").not())
        .stdout(predicate::str::contains("-v lists them"));

    schemaforge(temp.path())
        .args(["-v", "generate", "schema.yaml", "--root", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"))
        .stdout(predicate::str::contains("already exists"));
}
