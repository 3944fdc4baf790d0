//! TWD97 TM2 (121°E zone) transverse-Mercator projection.
//!
//! Taipei's police station and streetlight datasets publish positions as
//! TWD97 grid coordinates. The inverse conversion uses the footpoint
//! latitude series from the meridional arc followed by the usual
//! higher-order latitude/longitude corrections (Snyder, *Map Projections:
//! A Working Manual*, eqs. 8-18 to 8-25). The parameters below are fixed
//! so conversions reproduce exactly what the upstream datasets assume.
//!
//! No input is rejected: grid coordinates far outside the zone still
//! produce a (meaningless) geographic point.

use safe_route_geo_models::{GeoPoint, ProjectedPoint};

/// GRS80 semi-major axis, in meters.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// GRS80 semi-minor axis, in meters.
pub const SEMI_MINOR_AXIS: f64 = 6_356_752.314_245;

/// Central meridian of the TM2 zone, in degrees east.
pub const CENTRAL_MERIDIAN_DEG: f64 = 121.0;

/// Scale factor on the central meridian.
pub const SCALE_FACTOR: f64 = 0.9999;

/// False easting added to every grid x, in meters. There is no false
/// northing.
pub const FALSE_EASTING: f64 = 250_000.0;

/// First eccentricity of the reference ellipsoid.
fn first_eccentricity() -> f64 {
    (1.0 - SEMI_MINOR_AXIS.powi(2) / SEMI_MAJOR_AXIS.powi(2)).sqrt()
}

/// Converts a TWD97 TM2 grid coordinate to WGS84 latitude/longitude.
#[must_use]
pub fn to_geographic(point: ProjectedPoint) -> GeoPoint {
    let a = SEMI_MAJOR_AXIS;
    let e = first_eccentricity();
    let e_sq = e.powi(2);
    // Second eccentricity squared.
    let ep_sq = e_sq / (1.0 - e_sq);

    let x = point.x - FALSE_EASTING;
    let m = point.y / SCALE_FACTOR;
    let mu = m / (a * (1.0 - e_sq / 4.0 - 3.0 * e.powi(4) / 64.0 - 5.0 * e.powi(6) / 256.0));

    let root = (1.0 - e_sq).sqrt();
    let e1 = (1.0 - root) / (1.0 + root);

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();

    let c1 = ep_sq * cos_phi1.powi(2);
    let t1 = tan_phi1.powi(2);
    let w = 1.0 - e_sq * sin_phi1.powi(2);
    // Radii of curvature in the prime vertical and the meridian.
    let n1 = a / w.sqrt();
    let r1 = a * (1.0 - e_sq) / w.powf(1.5);
    let d = x / (n1 * SCALE_FACTOR);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep_sq) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep_sq
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lng = CENTRAL_MERIDIAN_DEG.to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep_sq + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    GeoPoint::new(lat.to_degrees(), lng.to_degrees())
}

/// Converts a WGS84 point to TWD97 TM2 grid coordinates.
///
/// The forward counterpart of [`to_geographic`]. Nothing upstream needs
/// it at query time; it exists so grid fixtures can be produced from
/// known landmarks.
#[must_use]
pub fn to_projected(point: GeoPoint) -> ProjectedPoint {
    let a = SEMI_MAJOR_AXIS;
    let e_sq = first_eccentricity().powi(2);
    let ep_sq = e_sq / (1.0 - e_sq);

    let phi = point.lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = a / (1.0 - e_sq * sin_phi.powi(2)).sqrt();
    let t = tan_phi.powi(2);
    let c = ep_sq * cos_phi.powi(2);
    let big_a = (point.lng - CENTRAL_MERIDIAN_DEG).to_radians() * cos_phi;
    let m = meridional_arc(phi, e_sq);

    let x = SCALE_FACTOR
        * n
        * (big_a
            + (1.0 - t + c) * big_a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep_sq) * big_a.powi(5) / 120.0);

    let y = SCALE_FACTOR
        * (m + n
            * tan_phi
            * (big_a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * big_a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep_sq) * big_a.powi(6)
                    / 720.0));

    ProjectedPoint::new(x + FALSE_EASTING, y)
}

/// Length of the meridian arc from the equator to latitude `phi`
/// (radians).
fn meridional_arc(phi: f64, e_sq: f64) -> f64 {
    let e4 = e_sq * e_sq;
    let e6 = e4 * e_sq;

    SEMI_MAJOR_AXIS
        * ((1.0 - e_sq / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e_sq / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
