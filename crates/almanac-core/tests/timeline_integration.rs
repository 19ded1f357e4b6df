//! Integration tests for the timeline and the calendars working together.
//!
//! These go through the public API only: a configuration is parsed, the
//! reckoning engine is built from it, and a timeline is driven with
//! deterministic dice.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use almanac_core::config::AlmanacConfig;
use almanac_core::{CampaignSave, ReckoningEngine, Timeline};
use almanac_types::{Climate, Event, Season};
use almanac_weather::{RngDice, ScriptedDice};

fn reckoning_from(yaml: &str) -> Arc<ReckoningEngine> {
    let config = AlmanacConfig::parse(yaml).expect("config parses");
    Arc::new(ReckoningEngine::from_config(&config.reckoning).expect("calendars are valid"))
}

#[test]
fn forecast_from_a_short_date() {
    let reckoning = reckoning_from("{}");
    let start = reckoning.parse_date("14.3.1394", "human", ".").unwrap();
    let mut timeline = Timeline::new(Arc::clone(&reckoning), RngDice::seeded(5), Climate::Temperate, 1500);

    for offset in 0..48 {
        let hour = timeline.get(start + offset).unwrap().clone();
        let date = reckoning.epoch_to_date(hour.time_from_epoch, "human").unwrap();
        assert_eq!(u32::try_from(offset % 24).unwrap(), date.hour);
        assert!((0..360).contains(&hour.weather.wind_direction));
        if hour.weather.precipitation_duration == 0 {
            assert!(hour.weather.precipitation_state.is_empty());
        }
    }
}

#[test]
fn season_changes_are_picked_up_mid_window() {
    let reckoning = reckoning_from("{}");
    // Spring starts at hour 840 in the kitsune calendar.
    let mut timeline = Timeline::new(Arc::clone(&reckoning), ScriptedDice::constant(50), Climate::Cold, 500);
    timeline.get(840).unwrap();
    assert_eq!(timeline.peek(839).unwrap().generator_state.season, Season::Winter);
    assert_eq!(timeline.peek(840).unwrap().generator_state.season, Season::Spring);
    assert_eq!(timeline.peek(912).unwrap().generator_state.season, Season::Spring);
}

#[test]
fn custom_season_calendar_drives_the_weather() {
    let yaml = r"
reckoning:
  season_calendar: quick
  calendars:
    quick:
      months:
        - { name: Summer, days: 1 }
        - { name: Winter, days: 1 }
      era_start_hours: [0]
    human:
      months:
        - { name: Only, days: 10 }
      era_start_hours: [0]
";
    let reckoning = reckoning_from(yaml);
    let mut timeline = Timeline::new(reckoning, RngDice::seeded(1), Climate::Temperate, 1500).with_margin(30);
    timeline.get(30).unwrap();
    assert_eq!(timeline.peek(10).unwrap().generator_state.season, Season::Summer);
    assert_eq!(timeline.peek(30).unwrap().generator_state.season, Season::Winter);
    assert_eq!(timeline.peek(50).unwrap().generator_state.season, Season::Summer);
}

#[test]
fn campaign_save_restores_events_and_weather() {
    let reckoning = reckoning_from("{}");
    let mut timeline = Timeline::new(Arc::clone(&reckoning), RngDice::seeded(77), Climate::Tropical, 40);
    let festival = Event::new("Port Amal", "Festival of Lights", 300, 12);
    timeline.add(&festival).unwrap();

    let save = CampaignSave {
        save_name: "amal".to_owned(),
        current_time: 300,
        calendar_used: "human".to_owned(),
        calendar: timeline.to_save(),
    };
    let json = save.to_json().unwrap();
    let loaded = CampaignSave::from_json(&json).unwrap();

    let mut restored = Timeline::from_save(loaded.calendar, reckoning, RngDice::seeded(0), 72).unwrap();
    assert_eq!(restored.climate(), Climate::Tropical);
    assert_eq!(restored.events_between(0, 1000), vec![festival.clone()]);
    let original = timeline.peek(305).unwrap().clone();
    assert_eq!(restored.get(305).unwrap(), &original);

    restored.remove(&festival).unwrap();
    assert!(restored.events_between(0, 1000).is_empty());
}

#[test]
fn moving_an_event_is_remove_then_add() {
    let reckoning = reckoning_from("{}");
    let mut timeline = Timeline::new(reckoning, RngDice::seeded(3), Climate::Desert, 3000);
    let mut caravan = Event::new("Dune Sea", "Caravan arrives", 100, 3);
    timeline.add(&caravan).unwrap();

    timeline.remove(&caravan).unwrap();
    caravan.start_time_epoch = 400;
    timeline.add(&caravan).unwrap();

    assert!(!timeline.peek(101).unwrap().has_event(caravan.id));
    assert!(timeline.peek(401).unwrap().has_event(caravan.id));
    let listed = timeline.events_between(0, 1000);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|e| e.start_time_epoch), Some(400));
}
