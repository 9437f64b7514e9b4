use crate::track::TrackPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.;

/// Great-circle distance in km between two (latitude, longitude) pairs.
pub fn haversine_km(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let d_lat = (p2.0 - p1.0).to_radians();
    let d_lon = (p2.1 - p1.1).to_radians();
    let lat1 = p1.0.to_radians();
    let lat2 = p2.0.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::atan2(f64::sqrt(a), f64::sqrt(1. - a));

    EARTH_RADIUS_KM * c
}

pub fn path_length_km(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(pair[0].lat_lon(), pair[1].lat_lon()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: (f64, f64) = (48.8566, 2.3522);
    const LONDON: (f64, f64) = (51.5074, -0.1278);

    #[test]
    fn paris_to_london() {
        let d = haversine_km(PARIS, LONDON);
        assert!((d - 343.5).abs() < 0.5, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km(PARIS, PARIS), 0.);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km((0., 0.), (1., 0.));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        assert!((haversine_km(PARIS, LONDON) - haversine_km(LONDON, PARIS)).abs() < 1e-9);
    }

    #[test]
    fn path_length_sums_legs() {
        let points = [
            TrackPoint::new(0., 0.),
            TrackPoint::new(1., 0.),
            TrackPoint::new(2., 0.),
        ];
        let d = path_length_km(&points);
        assert!((d - 2. * haversine_km((0., 0.), (1., 0.))).abs() < 1e-9);
        assert_eq!(path_length_km(&points[..1]), 0.);
    }
}
