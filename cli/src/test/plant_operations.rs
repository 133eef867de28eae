#![allow(clippy::unwrap_used)]

use predicates::prelude::*;
use serde_json::json;

use super::test_context::TestContext;

fn seeded() -> TestContext {
    let ctx = TestContext::new();
    ctx.seed_plants(json!([
        { "id": 1, "name": "Fern", "wateringFrequency": 3, "nextWatering": 2 },
        { "id": 2, "name": "Cactus", "wateringFrequency": 14, "nextWatering": 10 }
    ]));
    ctx
}

#[test]
fn test_plant_list_falls_back_to_cache() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tFern\t2\t3").and(predicate::str::contains(
            "2\tCactus\t10\t14",
        )));
}

#[test]
fn test_plant_list_due_within() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "list", "--due-within", "5", "--output", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""name": "Fern""#)
                .and(predicate::str::contains("Cactus").not()),
        );
}

#[test]
fn test_plant_list_empty_cache() {
    let ctx = TestContext::new();

    ctx.command()
        .args(["plant", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plants found"));
}

#[test]
fn test_plant_next_updates_cache() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "next", "1", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fern needs water on"));

    let plants = ctx.cached_plants();
    let fern = plants.iter().find(|p| p.id == 1).unwrap();
    assert_eq!(fern.next_watering, Some(5));

    let cactus = plants.iter().find(|p| p.id == 2).unwrap();
    assert_eq!(cactus.next_watering, Some(10));
}

#[test]
fn test_plant_next_rejects_past_date() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "next", "1", "2000-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is in the past"));

    assert_eq!(ctx.cached_plants()[0].next_watering, Some(2));
}

#[test]
fn test_plant_frequency_updates_cache() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "frequency", "2", "21"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cactus will be watered every 21 days"));

    let plants = ctx.cached_plants();
    let cactus = plants.iter().find(|p| p.id == 2).unwrap();
    assert_eq!(cactus.watering_frequency, Some(21));
}

#[test]
fn test_plant_frequency_rejects_zero() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "frequency", "2", "0"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_plant_fails() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "next", "42", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plant not found: 42"));
}

#[test]
fn test_plant_add_needs_backend() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "add", "Monstera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Remote API error"));

    assert_eq!(ctx.cached_plants().len(), 2);
}

#[test]
fn test_plant_add_requires_name_or_profile() {
    let ctx = seeded();

    ctx.command()
        .args(["plant", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plant"));
}
