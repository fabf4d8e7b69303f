//! Dashboard queries over a seeded store.

mod common;

use chrono::Duration;
use common::{reference_now, OrderBuilder, TestHarness};
use orderflow::model::{ChecklistKind, PipelineStage, StepOutcome};
use orderflow::urgency::DueDateClass;

fn seeded_harness() -> TestHarness {
    let harness = TestHarness::new();
    let orders = [
        OrderBuilder::new("JOB-001").status("ยืนยันคำสั่งซื้อแล้ว").due_in_days(-2),
        OrderBuilder::new("JOB-002").status("รอออกแบบ").due_in_days(1),
        OrderBuilder::new("JOB-003").status("กำลังผลิต").due_in_days(0),
        OrderBuilder::new("JOB-004").status("กำลังผลิต").due_in_days(5),
        OrderBuilder::new("JOB-005").status("กำลังผลิต").due_in_days(-1),
        OrderBuilder::new("JOB-006").status("ส่งออกจากโรงงาน"),
        OrderBuilder::new("JOB-007").status("จัดส่งสำเร็จ").due_in_days(-10),
        OrderBuilder::new("JOB-008").status("ข้อมูลเก่า"),
    ];
    for order in orders {
        harness.insert(order.build());
    }
    harness
}

#[test]
fn test_snapshot_counts_every_order_once() {
    let harness = seeded_harness();
    let snapshot = harness.facade.snapshot(reference_now(), &harness.orders());

    assert_eq!(snapshot.total, 8);
    assert_eq!(snapshot.count(PipelineStage::OrderConfirmed), 2);
    assert_eq!(snapshot.count(PipelineStage::PreProduction), 1);
    assert_eq!(snapshot.count(PipelineStage::InProduction), 3);
    assert_eq!(snapshot.count(PipelineStage::InTransit), 1);
    assert_eq!(snapshot.count(PipelineStage::Delivered), 1);

    let sum: f64 = snapshot.stages.iter().map(|s| s.percentage).sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert_eq!(snapshot.percentage(PipelineStage::InProduction), 0.375);
}

#[test]
fn test_snapshot_of_nothing() {
    let harness = TestHarness::new();
    let snapshot = harness.facade.snapshot(reference_now(), &[]);
    assert_eq!(snapshot.total, 0);
    assert!(snapshot
        .stages
        .iter()
        .all(|s| s.count == 0 && s.percentage == 0.0 && s.urgent == 0));
}

#[test]
fn test_urgent_list_for_triage() {
    let harness = seeded_harness();
    let urgent = harness.facade.urgent(reference_now(), &harness.orders());

    let ids: Vec<&str> = urgent.iter().map(|u| u.order.id.as_str()).collect();
    assert_eq!(ids, vec!["JOB-005", "JOB-003", "JOB-002"]);
    assert_eq!(urgent[0].urgency, DueDateClass::Overdue { days: 1 });
    assert_eq!(urgent[1].urgency, DueDateClass::Today);
    assert_eq!(urgent[2].urgency, DueDateClass::Tomorrow);
    assert_eq!(urgent[2].stage, PipelineStage::PreProduction);
}

#[test]
fn test_today_later_yesterday() {
    let harness = TestHarness::new();
    let now = reference_now();
    let orders = vec![
        OrderBuilder::new("today").status("กำลังผลิต").due(now).build(),
        OrderBuilder::new("later")
            .status("กำลังผลิต")
            .due(now + Duration::days(5))
            .build(),
        OrderBuilder::new("yesterday")
            .status("กำลังผลิต")
            .due(now - Duration::days(1))
            .build(),
    ];

    let urgent = harness.facade.urgent(now, &orders);
    let ids: Vec<&str> = urgent.iter().map(|u| u.order.id.as_str()).collect();
    assert_eq!(ids, vec!["yesterday", "today"]);
}

#[test]
fn test_stepper_follows_service_updates() {
    let harness = TestHarness::new();
    harness.insert(OrderBuilder::new("JOB-100").status("กำลังผลิต").build());
    harness.service.start_workflow("JOB-100").unwrap();
    harness
        .service
        .advance_step("JOB-100", ChecklistKind::Qc, "artwork_check", StepOutcome::Passed)
        .unwrap();

    let view = harness.facade.stepper(&harness.order("JOB-100"));
    assert_eq!(view.stage, PipelineStage::InProduction);
    assert_eq!(view.stage_index, 2);
    assert_eq!(
        view.stages.iter().filter(|m| m.reached).count(),
        3,
        "stages up to and including production are reached"
    );
    assert_eq!(view.checklists[0].kind, ChecklistKind::Qc);
    assert_eq!(view.checklists[0].current_index, 1);

    harness
        .service
        .advance_step("JOB-100", ChecklistKind::Shipping, "packing", StepOutcome::Passed)
        .unwrap();
    let view = harness.facade.stepper(&harness.order("JOB-100"));
    assert_eq!(view.stage, PipelineStage::InTransit);
}

#[test]
fn test_unrecognized_statuses_report() {
    let harness = seeded_harness();
    let report = harness.facade.unrecognized_statuses(&harness.orders());
    assert_eq!(report, vec![("ข้อมูลเก่า".to_string(), 1)]);
}

#[test]
fn test_snapshot_serializes_for_dashboards() {
    let harness = seeded_harness();
    let snapshot = harness.facade.snapshot(reference_now(), &harness.orders());
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["total"], 8);
    assert_eq!(json["stages"][2]["stage"], "in_production");
    assert_eq!(json["stages"][2]["count"], 3);
    assert_eq!(json["stages"][2]["urgent"], 2);
}
