use super::*;

fn bounds(pairs: &[(f64, f64)]) -> Vec<LineBounds> {
    pairs
        .iter()
        .map(|&(start, end)| LineBounds { start, end })
        .collect()
}

/// Build a run with `lines` lines, line `i` starting at `i * period`.
///
/// Channel `k` on each line is sampled `0.05 * k` seconds after the line
/// starts and reads `f(channel, timestamp)`.
fn synthetic_run(
    lines: usize,
    period: f64,
    channels: &[Channel],
    f: impl Fn(Channel, f64) -> f64,
) -> RawRun {
    let mut run = RawRun::new();
    for i in 0..lines {
        let base = i as f64 * period;
        let samples: Vec<(Channel, RawChannelSample)> = channels
            .iter()
            .enumerate()
            .map(|(k, &channel)| {
                let t = base + 0.05 * k as f64;
                (channel, RawChannelSample::new(t, f(channel, t)))
            })
            .collect();
        let marker = if i == 1 {
            StateMarker::StartOscillation
        } else {
            StateMarker::Blank
        };
        run.push_line(&samples, marker);
    }
    run
}

const BASIC: [Channel; 4] = [
    Channel::TempA,
    Channel::TempB,
    Channel::LowVoltage,
    Channel::HighVoltage,
];

#[test]
fn test_time_base_is_line_boundary_midpoint() {
    let grid = TimeBase::from_bounds(&bounds(&[(0.0, 0.4), (1.0, 1.4), (2.0, 2.6)])).unwrap();
    assert_eq!(grid.len(), 2);
    assert!((grid.as_slice()[0] - 0.7).abs() < 1e-12);
    assert!((grid.as_slice()[1] - 1.7).abs() < 1e-12);
}

#[test]
fn test_time_base_needs_two_lines() {
    assert!(matches!(
        TimeBase::from_bounds(&bounds(&[(0.0, 0.4)])),
        Err(ResampleError::TooShort { lines: 1 })
    ));
    assert!(matches!(
        TimeBase::from_bounds(&[]),
        Err(ResampleError::TooShort { lines: 0 })
    ));
}

#[test]
fn test_time_base_rejects_non_increasing() {
    let err = TimeBase::from_bounds(&bounds(&[(0.0, 0.4), (1.0, 1.4), (1.0, 1.4), (0.5, 0.6)]))
        .unwrap_err();
    assert!(matches!(
        err,
        ResampleError::NonMonotonicTimeBase { index: 2, .. }
    ));
}

#[test]
fn test_linear_channel_is_reproduced() {
    let samples = [
        RawChannelSample::new(0.0, 1.0),
        RawChannelSample::new(1.0, 3.0),
        RawChannelSample::new(3.0, 7.0),
    ];
    let values = resample(Channel::TempA, &samples, &[0.5, 2.0]).unwrap();
    assert_eq!(values, vec![2.0, 5.0]);
}

#[test]
fn test_equal_timestamps_fail_interpolation() {
    let samples = [
        RawChannelSample::new(0.0, 1.0),
        RawChannelSample::new(1.0, 3.0),
        RawChannelSample::new(1.0, 4.0),
    ];
    let err = resample(Channel::LowVoltage, &samples, &[0.5, 1.0]).unwrap_err();
    match err {
        ResampleError::Interpolation {
            channel,
            index,
            timestamp,
        } => {
            assert_eq!(channel, Channel::LowVoltage);
            assert_eq!(index, 1);
            assert_eq!(timestamp, 1.0);
        }
        other => panic!("expected Interpolation, got {other:?}"),
    }
}

#[test]
fn test_grid_length_must_match() {
    let samples = [RawChannelSample::new(0.0, 1.0), RawChannelSample::new(1.0, 2.0)];
    assert!(matches!(
        resample(Channel::TempB, &samples, &[0.2, 0.4]),
        Err(ResampleError::ChannelLengthMismatch {
            expected: 1,
            actual: 2,
            ..
        })
    ));
}

#[test]
fn test_average_pair() {
    let avg = average_pair("x", vec![1.0, 2.0], Some(vec![3.0, 6.0])).unwrap();
    assert_eq!(avg, vec![2.0, 4.0]);
    assert_eq!(average_pair("x", vec![1.0], None).unwrap(), vec![1.0]);
    assert!(matches!(
        average_pair("x", vec![1.0], Some(vec![1.0, 2.0])),
        Err(ResampleError::ChannelLengthMismatch { .. })
    ));
}

#[test]
fn test_resample_run_has_one_point_fewer() {
    let run = synthetic_run(10, 1.0, &BASIC, |_, t| t);
    let series = resample_run(run, 1.0).unwrap();

    assert_eq!(series.len(), 9);
    assert_eq!(series.avg_temp.len(), 9);
    assert_eq!(series.delta_t.len(), 9);
    assert_eq!(series.v_low.len(), 9);
    assert_eq!(series.v_high.len(), 9);
    assert_eq!(series.markers.len(), 9);
    assert_eq!(series.markers[1], StateMarker::StartOscillation);
    for pair in series.time.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn test_resample_run_linear_ground_truth() {
    // temp_a = 100 + 2t, temp_b = 90 + t, voltages in volts
    let run = synthetic_run(6, 1.0, &BASIC, |channel, t| match channel {
        Channel::TempA => 100.0 + 2.0 * t,
        Channel::TempB => 90.0 + t,
        Channel::LowVoltage => 1e-6 * t,
        _ => -2e-6 * t,
    });
    let series = resample_run(run, 1e6).unwrap();

    for p in series.points() {
        let a = 100.0 + 2.0 * p.t;
        let b = 90.0 + p.t;
        assert!((p.avg_t - (a + b) / 2.0).abs() < 1e-9);
        assert!((p.d_t - (a - b)).abs() < 1e-9);
        assert!((p.v_low - p.t).abs() < 1e-6);
        assert!((p.v_high + 2.0 * p.t).abs() < 1e-6);
    }
}

#[test]
fn test_redundant_channels_are_averaged() {
    let channels = [
        Channel::TempA,
        Channel::TempB,
        Channel::TempA2,
        Channel::TempB2,
        Channel::LowVoltage,
        Channel::HighVoltage,
        Channel::LowVoltage2,
        Channel::HighVoltage2,
    ];
    let run = synthetic_run(4, 1.0, &channels, |channel, _| match channel {
        Channel::TempA => 50.0,
        Channel::TempA2 => 52.0,
        Channel::TempB => 40.0,
        Channel::TempB2 => 44.0,
        Channel::LowVoltage | Channel::LowVoltage2 => 1.0,
        Channel::HighVoltage => 2.0,
        Channel::HighVoltage2 => 4.0,
    });
    let series = resample_run(run, 1.0).unwrap();

    for p in series.points() {
        assert!((p.avg_t - 46.5).abs() < 1e-12);
        assert!((p.d_t - 9.0).abs() < 1e-12);
        assert!((p.v_low - 1.0).abs() < 1e-12);
        assert!((p.v_high - 3.0).abs() < 1e-12);
    }
}

#[test]
fn test_missing_required_channel() {
    let run = synthetic_run(3, 1.0, &[Channel::TempA, Channel::TempB], |_, t| t);
    assert!(matches!(
        resample_run(run, 1.0),
        Err(ResampleError::MissingChannel(Channel::LowVoltage))
    ));
}

#[test]
fn test_single_line_run_is_too_short() {
    let run = synthetic_run(1, 1.0, &BASIC, |_, t| t);
    assert!(matches!(
        resample_run(run, 1.0),
        Err(ResampleError::TooShort { lines: 1 })
    ));
}
