//! CLI integration tests for the speedtrap binary

mod common;

use assert_cmd::Command;
use common::Workspace;
use predicates::prelude::*;
use speedtrap::registry::Registry;
use std::fs;

const ENTRY: &str = "NB72826,2024-01-01T10:00:00\nABC123,2024-01-01T10:00:00\nXYZ999,2024-01-01T10:00:00\n";
const EXIT: &str = "NB72826,2024-01-01T10:02:00\nABC123,2024-01-01T10:05:00\n";

fn contains_text(text: &str) -> predicates::str::ContainsPredicate {
    predicate::str::contains(text)
}

#[test]
fn test_help_command() {
    Command::cargo_bin("speedtrap")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains_text("Usage:"))
        .stdout(contains_text("check"))
        .stdout(contains_text("menu"))
        .stdout(contains_text("ticket"));
}

#[test]
fn test_version_command() {
    Command::cargo_bin("speedtrap")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains_text("speedtrap 0.1.0"));
}

#[test]
fn test_missing_subcommand() {
    Command::cargo_bin("speedtrap")
        .unwrap()
        .assert()
        .failure()
        .stderr(contains_text("Usage:"));
}

#[test]
fn test_check_lists_speeders() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(contains_text("NB72826"))
        .stdout(contains_text(": 150.000 at 2024-01-01T10:02:00"))
        .stdout(contains_text("ABC123").not())
        .stdout(contains_text("XYZ999").not())
        .stdout(contains_text("among 2 vehicle(s)"));
}

#[test]
fn test_check_with_speed_limit_override() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["--speed-limit", "200", "check"])
        .assert()
        .success()
        .stdout(contains_text("No speed violations found."));
}

#[test]
fn test_check_with_missing_logs_still_succeeds() {
    let ws = Workspace::new(ENTRY, EXIT);
    fs::remove_file(&ws.entry_log).unwrap();
    fs::remove_file(&ws.exit_log).unwrap();

    ws.cmd()
        .arg("check")
        .assert()
        .success()
        .stderr(contains_text("File not found"))
        .stdout(contains_text("No speed violations found."));
}

#[test]
fn test_check_reports_skipped_lines() {
    let ws = Workspace::new(ENTRY, "NB72826,yesterday\nABC123,2024-01-01T10:01:00\n");
    ws.cmd()
        .arg("check")
        .assert()
        .success()
        .stderr(contains_text("Could not parse record"))
        .stdout(contains_text("ABC123"));
}

#[test]
fn test_invalid_speed_limit_rejected() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["--speed-limit", "0", "check"])
        .assert()
        .failure()
        .stderr(contains_text("Invalid configuration"));
}

#[test]
fn test_list_seeds_demo_vehicles() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains_text("Vehicle: BMW 320,2001,70000,15000.00,NB72826"))
        .stdout(contains_text("Toyota RAV4"))
        .stdout(contains_text("Volvo XC60"));
}

#[test]
fn test_find_by_make() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["find", "toyota rav4"])
        .assert()
        .success()
        .stdout(contains_text("ZH85499"));

    ws.cmd()
        .args(["find", "Lada"])
        .assert()
        .success()
        .stdout(contains_text("No vehicle found"));
}

#[test]
fn test_add_car_persists_registry() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args([
            "add",
            "car",
            "--make",
            "Saab 900",
            "--year",
            "1990",
            "--mileage",
            "120000",
            "--price",
            "2500",
            "--registration",
            "abc123",
            "--doors",
            "3",
        ])
        .assert()
        .success()
        .stdout(contains_text("Registered"));

    let registry = Registry::load(&ws.registry).unwrap();
    assert_eq!(registry.len(), 4);
    assert!(registry.get("ABC123").is_some());
}

#[test]
fn test_add_truck_rejects_bad_drive() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args([
            "add",
            "truck",
            "--make",
            "Ford",
            "--year",
            "2015",
            "--mileage",
            "1",
            "--price",
            "1",
            "--registration",
            "TR1",
            "--drive",
            "3",
        ])
        .assert()
        .failure();
}

#[test]
fn test_add_duplicate_registration_fails() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args([
            "add",
            "suv",
            "--make",
            "Volvo XC90",
            "--year",
            "2018",
            "--mileage",
            "1",
            "--price",
            "1",
            "--registration",
            "DA49644",
            "--passengers",
            "7",
        ])
        .assert()
        .failure()
        .stderr(contains_text("already registered"));
}

#[test]
fn test_ticket_issued_to_registered_speeder() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["ticket", "nb72826"])
        .assert()
        .success()
        .stdout(contains_text("Speed ticket associated with"))
        .stdout(contains_text("2024-01-01T10:02:00, 150, 60"));

    let registry = Registry::load(&ws.registry).unwrap();
    let ticket = registry.get("NB72826").unwrap().ticket.as_ref().unwrap();
    assert_eq!(ticket.speed, 150.0);
}

#[test]
fn test_ticket_for_law_abiding_vehicle() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["ticket", "ABC123"])
        .assert()
        .success()
        .stdout(contains_text("No speed ticket found"));
}

#[test]
fn test_corrupt_registry_is_reported() {
    let ws = Workspace::new(ENTRY, EXIT);
    fs::write(&ws.registry, "not json at all").unwrap();
    ws.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(contains_text("Vehicle registry is unreadable"));
}

#[test]
fn test_verbose_flag() {
    let ws = Workspace::new(ENTRY, EXIT);
    ws.cmd()
        .args(["--verbose", "check"])
        .assert()
        .success()
        .stderr(contains_text("Verbose mode enabled"));
}
