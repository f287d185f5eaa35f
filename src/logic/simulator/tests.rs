use crate::logic::config::CoreConfig;
use crate::logic::error::CoreError;
use crate::logic::simulator::fleet::FleetSimulator;
use crate::logic::simulator::machine::InitialCondition;

fn fleet(seed: u64) -> FleetSimulator {
    FleetSimulator::with_seed(&CoreConfig::default(), seed)
}

#[test]
fn test_fleet_initial_condition_mix() {
    let fleet = fleet(17);
    let summaries = fleet.list_machines();
    assert_eq!(summaries.len(), 5);

    let ids: Vec<&str> = summaries.iter().map(|s| s.machine_id.as_str()).collect();
    assert_eq!(ids, ["M001", "M002", "M003", "M004", "M005"]);

    // Three healthy, one approaching the threshold, one requiring maintenance
    for summary in &summaries[..3] {
        assert!(summary.tool_wear < 50, "{} wear {}", summary.machine_id, summary.tool_wear);
    }
    assert!((165..185).contains(&summaries[3].tool_wear));
    assert!((180..=220).contains(&summaries[4].tool_wear));
}

#[test]
fn test_condition_mix_pads_with_healthy() {
    let config = CoreConfig {
        num_machines: 8,
        ..CoreConfig::default()
    };
    let fleet = FleetSimulator::with_seed(&config, 23);
    let summaries = fleet.list_machines();
    assert_eq!(summaries.len(), 8);
    for summary in &summaries[5..] {
        assert!(summary.tool_wear < 50);
    }
}

#[test]
fn test_generate_all_one_reading_per_machine_in_order() {
    let fleet = fleet(29);
    let readings = fleet.generate_all();
    assert_eq!(readings.len(), 5);
    for (i, reading) in readings.iter().enumerate() {
        assert_eq!(reading.machine_id, format!("M{:03}", i + 1));
        assert_eq!(reading.cycles, 1);
    }
}

#[test]
fn test_generate_one_known_and_unknown() {
    let fleet = fleet(31);
    let reading = fleet.generate_one("M002").unwrap();
    assert_eq!(reading.machine_id, "M002");

    let err = fleet.generate_one("M999").unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert!(err.to_string().contains("M999"));
}

#[test]
fn test_perform_maintenance_resets_wear() {
    let fleet = fleet(37);
    let before = fleet.list_machines()[4].tool_wear;
    assert!(before >= 180);

    assert!(fleet.perform_maintenance("M005"));
    let after = fleet.list_machines()[4].tool_wear;
    assert!(after < 20);

    // Unknown id is a negative result, not an error
    assert!(!fleet.perform_maintenance("M999"));
}

#[test]
fn test_maintained_machine_degrades_again() {
    let fleet = fleet(41);
    fleet.perform_maintenance("M005");

    let wear_after_reset = fleet.list_machines()[4].tool_wear;
    for _ in 0..50 {
        fleet.generate_all();
    }
    let wear_later = fleet.list_machines()[4].tool_wear;
    assert!(wear_later >= wear_after_reset);
}

#[test]
fn test_condition_enum_serializes_lowercase() {
    let json = serde_json::to_value(InitialCondition::Maintenance).unwrap();
    assert_eq!(json, "maintenance");
}
