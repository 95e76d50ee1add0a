use std::f64::consts::{PI, TAU};

/// Parse an angle given either as decimal degrees ("55.51") or as
/// colon separated sexagesimal degrees ("55:30:36", "-12:30").
/// A trailing hemisphere letter (N/S/E/W) is honoured.
pub fn parse_degrees(text: &str) -> Option<f64> {
    let text = text.trim();
    let (body, sign) = match text.chars().last()? {
        'N' | 'n' | 'E' | 'e' => (&text[..text.len() - 1], 1.),
        'S' | 's' | 'W' | 'w' => (&text[..text.len() - 1], -1.),
        _ => (text, 1.),
    };

    let mut parts = body.split(':');
    let first = parts.next()?.trim();
    let negative = first.starts_with('-');
    let mut value = first.parse::<f64>().ok()?.abs();
    let mut unit = 1.;
    for part in parts {
        unit /= 60.;
        value += part.trim().parse::<f64>().ok()? * unit;
    }
    if negative {
        value = -value;
    }
    Some(sign * value)
}

/// normalize arbitrary angles to [0, 2π):
pub fn normalize_positive(angle: f64) -> f64 {
    let angle = angle % TAU;
    if angle < 0. {
        return angle + TAU;
    }
    angle
}

/// Normalize a longitude to the half open interval (-π, π],
/// the convention for all longitudes returned by the engine.
pub fn normalize_longitude(angle: f64) -> f64 {
    let mut angle = angle;
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing() {
        assert_eq!(parse_degrees("55:30:36"), Some(55.51));
        assert_eq!(parse_degrees("55:30:36S"), Some(-55.51));
        assert_eq!(parse_degrees("-12.5"), Some(-12.5));
        assert_eq!(parse_degrees("-0:30"), Some(-0.5));
        assert_eq!(parse_degrees("12W"), Some(-12.));
        assert_eq!(parse_degrees("east"), None);
    }

    #[test]
    fn normalization() {
        assert!((normalize_longitude(3. * PI) - PI).abs() < 1e-12);
        assert!((normalize_longitude(-PI) - PI).abs() < 1e-12);
        assert!((normalize_longitude(-3.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((normalize_positive(-0.5 * PI) - 1.5 * PI).abs() < 1e-12);
    }
}
