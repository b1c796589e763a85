use super::style::YAxis;
use crate::error::RenderError;

/// Smallest p-value printed with its digits; anything below is shown as a bound.
pub const P_DISPLAY_THRESHOLD: f64 = 0.0001;

/// `p = 0.0028`, or `p < 0.0001` below the display threshold.
pub fn format_p_value(p: f64) -> String {
    if p < P_DISPLAY_THRESHOLD {
        format!("p < {P_DISPLAY_THRESHOLD}")
    } else {
        format!("p = {p:.4}")
    }
}

/// Upper limit on the number of y-axis ticks.
pub const MAX_TICKS: usize = 100;

/// Resolve the y-axis bounds for data spanning `[data_min, data_max]`.
///
/// Without a fixed lower bound the axis starts at zero, or below the smallest
/// observation by the headroom fraction of the data span when it is negative.
/// Without a fixed upper bound it ends at `data_max × headroom`, or at zero
/// when every value is negative. Fixed bounds must contain the data.
pub fn y_range(axis: &YAxis, (data_min, data_max): (f64, f64)) -> Result<(f64, f64), RenderError> {
    let pad = (axis.headroom - 1.0).max(0.0) * (data_max - data_min).abs();
    let min = axis
        .min
        .unwrap_or(if data_min < 0.0 { data_min - pad } else { 0.0 });
    let max = axis
        .max
        .unwrap_or(if data_max > 0.0 { data_max * axis.headroom } else { 0.0 });

    if !(max > min) || !max.is_finite() || !min.is_finite() {
        return Err(RenderError::AxisCollapse { min, max });
    }
    if data_min < min || data_max > max {
        return Err(RenderError::AxisExcludesData {
            min,
            max,
            data_min,
            data_max,
        });
    }
    Ok((min, max))
}

/// Tick values within `[min, max]`.
pub fn y_ticks(axis: &YAxis, (min, max): (f64, f64)) -> Result<Vec<f64>, RenderError> {
    let step = axis
        .tick_step
        .filter(|s| *s > 0.0)
        .unwrap_or_else(|| nice_step((max - min) / 5.0));
    let start = axis.tick_start.unwrap_or_else(|| (min / step).ceil() * step);

    // Tick indices k with start + k·step inside [min, max].
    let eps = 1e-9;
    let first = ((min - start) / step - eps).ceil().max(0.0);
    let last = ((max - start) / step + eps).floor();
    let count = last - first + 1.0;
    if !count.is_finite() || count > MAX_TICKS as f64 {
        return Err(RenderError::TooManyTicks {
            step,
            start,
            count,
            limit: MAX_TICKS,
        });
    }
    if count <= 0.0 {
        return Ok(Vec::new());
    }

    Ok((0..count as usize)
        .map(|k| start + (first + k as f64) * step)
        .collect())
}

/// Round a raw step up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Decimal places needed to print every tick of a given step.
pub fn tick_precision(step: f64) -> usize {
    if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_value_formatting() {
        assert_eq!(format_p_value(0.0028), "p = 0.0028");
        assert_eq!(format_p_value(0.00003), "p < 0.0001");
        assert_eq!(format_p_value(0.0001), "p = 0.0001");
        assert_eq!(format_p_value(0.73216), "p = 0.7322");
    }

    #[test]
    fn range_uses_headroom_or_fixed_max() {
        let axis = YAxis::default();
        let (lo, hi) = y_range(&axis, (20.0, 100.0)).unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 115.0).abs() < 1e-9);

        let fixed = YAxis {
            max: Some(85.0),
            ..YAxis::default()
        };
        assert_eq!(y_range(&fixed, (5.0, 60.0)).unwrap(), (0.0, 85.0));
    }

    #[test]
    fn equal_values_collapse_the_axis() {
        let axis = YAxis::default();
        assert!(matches!(y_range(&axis, (0.0, 0.0)), Err(RenderError::AxisCollapse { .. })));

        let above = YAxis {
            min: Some(0.1),
            max: Some(0.05),
            ..YAxis::default()
        };
        assert!(matches!(y_range(&above, (0.01, 0.02)), Err(RenderError::AxisCollapse { .. })));
    }

    #[test]
    fn negative_values_extend_the_axis_below_zero() {
        let axis = YAxis::default();

        let (lo, hi) = y_range(&axis, (-4.0, -1.0)).unwrap();
        assert!((lo - (-4.0 - 0.15 * 3.0)).abs() < 1e-9);
        assert_eq!(hi, 0.0);

        let (lo, hi) = y_range(&axis, (-1.0, 4.0)).unwrap();
        assert!(lo < -1.0);
        assert!((hi - 4.6).abs() < 1e-9);
    }

    #[test]
    fn fixed_bounds_must_contain_the_data() {
        let above = YAxis {
            min: Some(0.1),
            ..YAxis::default()
        };
        assert!(matches!(
            y_range(&above, (0.05, 0.8)),
            Err(RenderError::AxisExcludesData { .. })
        ));
        assert!(y_range(&above, (0.22, 0.8)).is_ok());

        let below = YAxis {
            max: Some(85.0),
            ..YAxis::default()
        };
        assert!(matches!(
            y_range(&below, (0.0, 90.0)),
            Err(RenderError::AxisExcludesData { .. })
        ));
    }

    #[test]
    fn explicit_ticks() {
        let axis = YAxis {
            min: Some(0.1),
            tick_step: Some(0.3),
            tick_start: Some(0.1),
            ..YAxis::default()
        };
        let ticks = y_ticks(&axis, (0.1, 0.8)).unwrap();
        assert_eq!(ticks.len(), 3);
        assert!((ticks[2] - 0.7).abs() < 1e-9);

        let release = YAxis {
            max: Some(85.0),
            tick_step: Some(20.0),
            ..YAxis::default()
        };
        assert_eq!(y_ticks(&release, (0.0, 85.0)).unwrap(), vec![0.0, 20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn ticks_starting_below_the_axis_skip_ahead() {
        let axis = YAxis {
            tick_step: Some(10.0),
            tick_start: Some(-1.0e6),
            ..YAxis::default()
        };
        assert_eq!(y_ticks(&axis, (0.0, 25.0)).unwrap(), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn tiny_tick_step_is_rejected() {
        let axis = YAxis {
            tick_step: Some(1e-9),
            ..YAxis::default()
        };
        assert!(matches!(
            y_ticks(&axis, (0.0, 85.0)),
            Err(RenderError::TooManyTicks { limit: MAX_TICKS, .. })
        ));
    }

    #[test]
    fn automatic_ticks_use_nice_steps() {
        let ticks = y_ticks(&YAxis::default(), (0.0, 460.0)).unwrap();
        assert_eq!(ticks, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
        assert!((nice_step(0.13) - 0.2).abs() < 1e-12);
        assert_eq!(tick_precision(0.2), 1);
        assert_eq!(tick_precision(0.05), 2);
        assert_eq!(tick_precision(20.0), 0);
    }
}
