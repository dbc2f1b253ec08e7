//! Linear interpolation of tracked parameters between tweenpoints

use tracing::{debug, warn};

use crate::keyframes::Tweenpoints;
use crate::keys::Parameter;
use crate::record::PhotoRecord;

/// Position of `current` between `start` and `end` by elapsed whole seconds.
///
/// Zero when the tweenpoints share a timestamp, so frames shot within the same
/// second take the start tweenpoint's values.
pub fn tween_ratio(start: &PhotoRecord, current: &PhotoRecord, end: &PhotoRecord) -> f64 {
    let span = end.seconds_since(start);
    if span == 0 {
        return 0.0;
    }
    current.seconds_since(start) as f64 / span as f64
}

/// Interpolated value for one parameter.
///
/// A nonzero value already on the record is kept as an offset and the
/// interpolated value is added to it. Running the same tween twice therefore
/// adds the interpolation twice.
pub fn tweened_value(start: Option<f64>, end: Option<f64>, current: Option<f64>, ratio: f64) -> f64 {
    let start = start.unwrap_or(0.0);
    let end = end.unwrap_or(0.0);
    let interpolated = start + (end - start) * ratio;

    match current {
        Some(existing) if existing != 0.0 => existing + interpolated,
        _ => interpolated,
    }
}

/// Fill in every record that is not a tweenpoint from its enclosing pair.
///
/// Returns the number of records written. Temperature and tint absent on
/// both tweenpoints and on the record itself stay absent, since writing them
/// would also force a custom white balance.
pub fn tween(tweenpoints: &Tweenpoints, records: &mut [PhotoRecord]) -> usize {
    let mut tweened = 0;

    for index in 0..records.len() {
        if tweenpoints.contains(index) {
            continue;
        }

        let Some((start, end)) = tweenpoints.enclosing(index) else {
            warn!(index, "record lies outside every tweenpoint span, leaving it as is");
            continue;
        };

        let ratio = tween_ratio(&records[start], &records[index], &records[end]);
        let start_values = Parameter::ALL.map(|p| records[start].get(p));
        let end_values = Parameter::ALL.map(|p| records[end].get(p));

        let current = &mut records[index];
        debug!(record = %current.label(), start, end, ratio, "tweening");

        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            let existing = current.get(parameter);
            let untouched = start_values[i].is_none() && end_values[i].is_none() && existing.is_none();
            if untouched && parameter.forces_custom_white_balance() {
                continue;
            }

            let value = tweened_value(start_values[i], end_values[i], existing, ratio);
            current.set(parameter, value);
        }
        tweened += 1;
    }

    tweened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Setting;
    use crate::test_support::record;

    #[test]
    fn test_three_frame_scenario() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Exposure, 0.0)]),
            record(300, "1/250", "8", &[]),
            record(600, "1/250", "8", &[(Parameter::Exposure, 2.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        assert_eq!(tp.indices(), &[0, 2]);

        assert_eq!(tween(&tp, &mut records), 1);
        assert_eq!(records[1].get(Parameter::Exposure), Some(1.0));
    }

    #[test]
    fn test_ratio_follows_capture_time_not_position() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Contrast, 0.0)]),
            record(100, "1/250", "8", &[]),
            record(150, "1/250", "8", &[]),
            record(400, "1/250", "8", &[(Parameter::Contrast, 40.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        tween(&tp, &mut records);

        assert_eq!(records[1].get(Parameter::Contrast), Some(10.0));
        assert_eq!(records[2].get(Parameter::Contrast), Some(15.0));
    }

    #[test]
    fn test_missing_boundary_value_counts_as_zero() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Shadows, 50.0)]),
            record(10, "1/250", "8", &[]),
            record(20, "1/250", "8", &[(Parameter::Highlights, -20.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        tween(&tp, &mut records);

        assert_eq!(records[1].get(Parameter::Shadows), Some(25.0));
        assert_eq!(records[1].get(Parameter::Highlights), Some(-10.0));
        // Untouched everywhere: written as zero, except the white balance pair
        assert_eq!(records[1].get(Parameter::Clarity), Some(0.0));
        assert_eq!(records[1].get(Parameter::Vibrance), Some(0.0));
        assert_eq!(records[1].get(Parameter::Temperature), None);
        assert_eq!(records[1].get(Parameter::Tint), None);
        assert_eq!(records[1].text(Setting::WhiteBalance), None);
    }

    #[test]
    fn test_multiple_spans() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Exposure, 1.0)]),
            record(10, "1/250", "8", &[]),
            record(20, "1/250", "8", &[(Parameter::Exposure, -1.0)]),
            record(30, "1/250", "8", &[]),
            record(40, "1/250", "8", &[(Parameter::Exposure, 0.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        tween(&tp, &mut records);

        assert_eq!(records[1].get(Parameter::Exposure), Some(0.0));
        assert_eq!(records[3].get(Parameter::Exposure), Some(-0.5));
    }

    #[test]
    fn test_temperature_tween_sets_custom_white_balance() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Temperature, 5000.0)]),
            record(50, "1/250", "8", &[]),
            record(100, "1/250", "8", &[(Parameter::Temperature, 6000.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        tween(&tp, &mut records);

        assert_eq!(records[1].get(Parameter::Temperature), Some(5500.0));
        assert_eq!(records[1].text(Setting::WhiteBalance), Some("Custom"));
    }

    #[test]
    fn test_zero_elapsed_span_uses_start_values() {
        let start = record(0, "1/250", "8", &[(Parameter::Exposure, 1.0)]);
        let end = record(0, "1/250", "8", &[(Parameter::Exposure, 3.0)]);
        let current = record(0, "1/250", "8", &[]);
        assert_eq!(tween_ratio(&start, &current, &end), 0.0);

        let mut records = vec![start, current, end];
        let tp = Tweenpoints::new(vec![0, 2]);
        tween(&tp, &mut records);
        assert_eq!(records[1].get(Parameter::Exposure), Some(1.0));
    }

    #[test]
    fn test_existing_nonzero_value_is_offset() {
        assert_eq!(tweened_value(Some(0.0), Some(2.0), Some(0.25), 0.5), 1.25);
        assert_eq!(tweened_value(Some(0.0), Some(2.0), Some(0.0), 0.5), 1.0);
        assert_eq!(tweened_value(None, None, None, 0.5), 0.0);
    }

    #[test]
    fn test_repeated_tween_is_not_idempotent() {
        let mut records = vec![
            record(0, "1/250", "8", &[(Parameter::Exposure, 0.0)]),
            record(300, "1/250", "8", &[]),
            record(600, "1/250", "8", &[(Parameter::Exposure, 2.0)]),
        ];
        let tp = Tweenpoints::select(&records);

        tween(&tp, &mut records);
        assert_eq!(records[1].get(Parameter::Exposure), Some(1.0));

        // The first result is now treated as a photographer's offset
        tween(&tp, &mut records);
        assert_eq!(records[1].get(Parameter::Exposure), Some(2.0));
    }

    #[test]
    fn test_single_record_is_left_alone() {
        let mut records = vec![record(0, "1/250", "8", &[(Parameter::Exposure, 0.7)])];
        let tp = Tweenpoints::select(&records);
        assert_eq!(tween(&tp, &mut records), 0);
        assert_eq!(records[0].get(Parameter::Exposure), Some(0.7));
    }
}
