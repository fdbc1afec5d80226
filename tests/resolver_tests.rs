use stop_reschedule::resolver::{ShiftRequest, resolve_stop_schedule};

#[test]
fn test_full_pipeline() {
    let json = include_str!("fixtures/shift_request.json");
    let request: ShiftRequest = serde_json::from_str(json).expect("Failed to parse request");

    let bundle = resolve_stop_schedule(&request)
        .expect("Resolution failed")
        .expect("Stop pair should resolve");

    // Two outbound stops apart: offset 2 * 2 = 4 minutes
    assert_eq!(bundle.weekday_schedule["07"], "09 29 49");
    assert_eq!(bundle.weekday_schedule["08"], "14 44");
    // 23:57 + 4 leaves the hour, so hour 23 disappears
    assert!(!bundle.weekday_schedule.contains_key("23"));

    // Weekend coefficient 0.5 scales the offset to round(4 * 1.5) = 6
    assert_eq!(bundle.weekend_schedule["08"], "36");
    assert_eq!(bundle.weekend_schedule["10"], "06");
}

#[test]
fn test_full_pipeline_direction_mismatch() {
    let json = include_str!("fixtures/shift_request.json");
    let mut request: ShiftRequest = serde_json::from_str(json).expect("Failed to parse request");
    request.new_stop_id = "4902".to_string();

    let result = resolve_stop_schedule(&request).expect("Resolution failed");
    assert!(result.is_none());
}
