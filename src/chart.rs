use crate::types::Summary;

/// One point of the mid-case price path.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub price: f64,
}

/// Straight-line path from the current price to the mid-case target over
/// `years` years: `years + 1` points labelled "Now", "+1y", ... "+Ny".
/// The last point is the target price itself, not the interpolated value.
pub fn price_series(summary: &Summary, years: u32) -> Vec<ChartPoint> {
    let start = summary.current_price;
    let target = summary.target_price_mid;

    (0..=years)
        .map(|i| {
            let label = if i == 0 { "Now".to_string() } else { format!("+{i}y") };
            let price = if i == years {
                target
            } else {
                start + (target - start) * f64::from(i) / f64::from(years)
            };
            ChartPoint { label, price }
        })
        .collect()
}

/// `(x, y)` pairs for a ratatui dataset, x being the year offset.
pub fn plot_data(points: &[ChartPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect()
}

/// Y-axis bounds with a little headroom, never a zero-height range.
pub fn price_bounds(points: &[ChartPoint]) -> [f64; 2] {
    let min = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(max.abs() * 0.01).max(0.01);
    [min - pad, max + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(current: f64, target: f64) -> Summary {
        Summary {
            ticker: "NOW".to_string(),
            name: "ServiceNow".to_string(),
            current_price: current,
            target_price_mid: target,
            total_return_mid: target / current - 1.0,
            annualized_mid: 0.0,
        }
    }

    #[test]
    fn four_year_path_interpolates_linearly() {
        let points = price_series(&summary(100.0, 150.0), 4);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(labels, ["Now", "+1y", "+2y", "+3y", "+4y"]);
        assert_eq!(prices, [100.0, 112.5, 125.0, 137.5, 150.0]);
    }

    #[test]
    fn last_point_is_pinned_to_target() {
        let s = summary(101.37, 233.91);
        for years in 3..=10 {
            let points = price_series(&s, years);
            assert_eq!(points.len(), years as usize + 1);
            assert_eq!(points[0].price, 101.37);
            assert_eq!(points.last().unwrap().price, 233.91);
        }
    }

    #[test]
    fn zero_horizon_is_just_the_target() {
        let points = price_series(&summary(100.0, 150.0), 0);
        assert_eq!(points, vec![ChartPoint { label: "Now".to_string(), price: 150.0 }]);
    }

    #[test]
    fn bounds_pad_flat_series() {
        let points = price_series(&summary(50.0, 50.0), 3);
        let [lo, hi] = price_bounds(&points);
        assert!(lo < 50.0 && hi > 50.0);
        assert_eq!(price_bounds(&[]), [0.0, 1.0]);
    }

    #[test]
    fn plot_data_uses_year_offsets() {
        let data = plot_data(&price_series(&summary(100.0, 150.0), 4));
        assert_eq!(data[2], (2.0, 125.0));
    }
}
