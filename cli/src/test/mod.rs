#![allow(clippy::unwrap_used)]

use predicates::prelude::{
    predicate::str::{contains, is_empty},
    PredicateBooleanExt,
};

mod plant_operations;
pub mod test_context;

use test_context::TestContext;

#[test]
fn test_profile_arg() {
    // --profile-path wins over SPROUT_PROFILE
    let ctx = TestContext::new();

    let assert = ctx
        .command()
        .env("SPROUT_PROFILE", "wrong_profile")
        .args(["--profile-path", ctx.profile_name.as_str()])
        .arg("config")
        .assert();

    assert
        .success()
        .stdout(
            contains(format!(r#""profile_name": "{}""#, ctx.profile_name))
                .and(contains(r#""profile_exists": true"#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_profile_env() {
    let ctx = TestContext::new();

    let assert = ctx.command().arg("config").assert();

    assert
        .success()
        .stdout(
            contains(format!(r#""profile_name": "{}""#, ctx.profile_name))
                .and(contains(r#""api_url": "http://127.0.0.1:9""#))
                .and(contains(r#""db_path""#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_api_url_arg_overrides_profile() {
    let ctx = TestContext::new();

    ctx.command()
        .args(["--api-url", "https://plants.example.com/api/", "config"])
        .assert()
        .success()
        .stdout(contains(r#""api_url": "https://plants.example.com/api""#));
}

#[test]
fn test_init_writes_profile() {
    let ctx = TestContext::new();

    ctx.command()
        .args(["--profile-path", "fresh", "init"])
        .assert()
        .success()
        .stdout(contains("Profile created"));

    ctx.command()
        .args(["--profile-path", "fresh", "config"])
        .assert()
        .success()
        .stdout(contains(r#""profile_exists": true"#));
}
