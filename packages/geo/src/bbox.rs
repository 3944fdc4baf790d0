//! Bounding boxes used to pre-filter datasets before per-point spatial
//! filtering.

use safe_route_geo_models::{BoundingBox, GeoPoint};

/// Rough meters-per-degree figure used to turn a search radius into a
/// degree margin.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Returns the smallest box containing every point, or `None` for an
/// empty input.
#[must_use]
pub fn enclosing<'a, I>(points: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    points.into_iter().fold(None, |acc, p| {
        Some(acc.map_or_else(
            || BoundingBox::new(p.lng, p.lat, p.lng, p.lat),
            |b: BoundingBox| {
                BoundingBox::new(
                    b.west.min(p.lng),
                    b.south.min(p.lat),
                    b.east.max(p.lng),
                    b.north.max(p.lat),
                )
            },
        ))
    })
}

/// Converts a search radius into a latitude margin in degrees.
#[must_use]
pub fn margin_degrees(radius_m: f64) -> f64 {
    radius_m / METERS_PER_DEGREE
}

/// Returns the box enclosing `points` grown so that every location within
/// `radius_m` meters of any point lies inside it, or `None` for an empty
/// input.
///
/// The longitude margin is widened by `1 / cos(lat)` at the latitude
/// farthest from the equator, so pre-filtering with this box never drops
/// a record a radius query would have kept.
#[must_use]
pub fn covering<'a, I>(points: I, radius_m: f64) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let bbox = enclosing(points)?;
    let lat_margin = margin_degrees(radius_m);
    let widest_lat = bbox.south.abs().max(bbox.north.abs()).min(89.0);
    let lng_margin = lat_margin / widest_lat.to_radians().cos();

    Some(bbox.expanded(lat_margin, lng_margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{EARTH_RADIUS_M, distance_meters};

    #[test]
    fn enclosing_covers_all_points() {
        let points = [
            GeoPoint::new(25.03, 121.56),
            GeoPoint::new(25.05, 121.52),
            GeoPoint::new(25.01, 121.58),
        ];
        let bbox = enclosing(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(121.52, 25.01, 121.58, 25.05));
        assert!(points.iter().all(|p| bbox.contains(*p)));
    }

    #[test]
    fn enclosing_nothing_is_none() {
        assert!(enclosing(std::iter::empty::<&GeoPoint>()).is_none());
    }

    #[test]
    fn covering_keeps_points_a_radius_away_in_every_direction() {
        let route = [GeoPoint::new(25.03, 121.56), GeoPoint::new(25.04, 121.57)];
        let bbox = covering(&route, 200.0).unwrap();

        // 200 m due east of the eastern end, and due north of the northern end.
        let lng_step = (200.0 / EARTH_RADIUS_M).to_degrees() / 25.04_f64.to_radians().cos();
        let east = GeoPoint::new(25.04, 121.57 + lng_step);
        let north = GeoPoint::new(25.04 + (200.0 / EARTH_RADIUS_M).to_degrees(), 121.57);
        assert!((distance_meters(route[1], east) - 200.0).abs() < 0.5);
        assert!(bbox.contains(east));
        assert!(bbox.contains(north));
        assert!(!bbox.contains(GeoPoint::new(25.03, 121.56 - 0.01)));
    }
}
