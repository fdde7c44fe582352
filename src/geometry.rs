use crate::ir::{Point, Section};

/// Concatenates the start, bend and end points of every section, in order.
pub fn flatten_sections(sections: &[Section]) -> Vec<Point> {
    let mut points = Vec::new();
    for section in sections {
        points.extend(section.start_point);
        points.extend(section.bend_points.iter().copied());
        points.extend(section.end_point);
    }
    points
}

/// `points` attribute value for a `<polyline>`.
pub fn polyline_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", fmt_num(point.x), fmt_num(point.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `d` attribute value for a curved `<path>`.
///
/// After the initial move-to the points are walked in strides of three. The
/// command for each stride depends on how many points remain from its start:
/// one gives a line-to, two a quadratic curve, three or more a cubic curve.
pub fn spline_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut parts = vec![format!("M{}", pair(first))];
    let mut i = 1;
    while i < points.len() {
        match points.len() - i {
            1 => parts.push(format!("L{}", pair(&points[i]))),
            2 => {
                parts.push(format!("Q{}", pair(&points[i])));
                parts.push(pair(&points[i + 1]));
            }
            _ => {
                parts.push(format!("C{}", pair(&points[i])));
                parts.push(pair(&points[i + 1]));
                parts.push(pair(&points[i + 2]));
            }
        }
        i += 3;
    }
    parts.join(" ")
}

fn pair(point: &Point) -> String {
    format!("{} {}", fmt_num(point.x), fmt_num(point.y))
}

/// Shortest round-trip formatting in JavaScript's `Number#toString` form:
/// integral values print without a fraction, magnitudes below `1e-6` or from
/// `1e21` up switch to exponent notation (`1e-7`, `1.5e+21`).
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        // folds -0 into 0
        return "0".to_string();
    }
    if !value.is_finite() {
        return match value {
            v if v.is_nan() => "NaN".to_string(),
            v if v > 0.0 => "Infinity".to_string(),
            _ => "-Infinity".to_string(),
        };
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}
