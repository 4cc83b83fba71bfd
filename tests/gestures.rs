//! Native gesture parameter clamping.

mod common;

use spark_node::gesture::{self, GestureConfig, GestureDirection};

fn pan_fingers(fingers: i32) -> i32 {
    match gesture::gesture_config(gesture::create_pan_gesture(fingers, GestureDirection::ALL, 5.0)) {
        Ok(GestureConfig::Pan { fingers, .. }) => fingers,
        other => panic!("unexpected {other:?}"),
    }
}

fn pan_direction(raw: u32) -> GestureDirection {
    match gesture::gesture_config(gesture::create_pan_gesture(1, GestureDirection(raw), 5.0)) {
        Ok(GestureConfig::Pan { direction, .. }) => direction,
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn pan_fingers_outside_range_fall_back_to_one() {
    common::setup();
    assert_eq!(pan_fingers(11), 1);
    assert_eq!(pan_fingers(-1), 1);
    assert_eq!(pan_fingers(0), 1);
    assert_eq!(pan_fingers(5), 5);
}

#[test]
fn pan_direction_must_be_a_named_value() {
    common::setup();
    assert_eq!(pan_direction(9), GestureDirection::NONE);
    assert_eq!(pan_direction(16), GestureDirection::NONE);
    for named in [0, 1, 2, 3, 4, 8, 12, 15] {
        assert_eq!(pan_direction(named), GestureDirection(named));
    }
}
