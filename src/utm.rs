//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Series expansions after Snyder, "Map Projections: A Working Manual"
//! (USGS 1987), pp. 61-64. Accurate to well below a millimetre inside a zone.

use crate::error::{LocalizeError, Result};
use crate::num::Number;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

mod consts {
    use crate::num::Number;

    /// Scale factor on the central meridian.
    pub const K0: Number = 0.9996;
    /// Squared first eccentricity of WGS84.
    pub const E: Number = 0.00669438;
    /// Equatorial radius of WGS84 in metres.
    pub const R: Number = 6_378_137.0;

    pub const FALSE_EASTING: Number = 500_000.0;
    pub const FALSE_NORTHING: Number = 10_000_000.0;

    pub const MIN_EASTING: Number = 100_000.0;
    pub const MAX_EASTING: Number = 1_000_000.0;
    pub const MAX_NORTHING: Number = 10_000_000.0;

    pub const MIN_LATITUDE: Number = -80.0;
    pub const MAX_LATITUDE: Number = 84.0;

    pub const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWXX";
}

use consts::*;

/// A planar position inside one UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoordinate {
    pub easting: Number,
    pub northing: Number,
    pub zone_number: u8,
    pub zone_letter: char,
}

/// Geodetic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: Number,
    pub longitude: Number,
}

/// Derived ellipsoid terms shared by both directions.
struct Ellipsoid {
    e_p2: Number,
    m1: Number,
    m2: Number,
    m3: Number,
    m4: Number,
    p2: Number,
    p3: Number,
    p4: Number,
    p5: Number,
}

impl Ellipsoid {
    fn wgs84() -> Self {
        let e2 = E * E;
        let e3 = e2 * E;
        let e_p2 = E / (1.0 - E);

        let sqrt_e = (1.0 - E).sqrt();
        let n = (1.0 - sqrt_e) / (1.0 + sqrt_e);
        let (n2, n3, n4, n5) = (n * n, n.powi(3), n.powi(4), n.powi(5));

        Self {
            e_p2,
            m1: 1.0 - E / 4.0 - 3.0 * e2 / 64.0 - 5.0 * e3 / 256.0,
            m2: 3.0 * E / 8.0 + 3.0 * e2 / 32.0 + 45.0 * e3 / 1024.0,
            m3: 15.0 * e2 / 256.0 + 45.0 * e3 / 1024.0,
            m4: 35.0 * e3 / 3072.0,
            p2: 3.0 / 2.0 * n - 27.0 / 32.0 * n3 + 269.0 / 512.0 * n5,
            p3: 21.0 / 16.0 * n2 - 55.0 / 32.0 * n4,
            p4: 151.0 / 96.0 * n3 - 417.0 / 128.0 * n5,
            p5: 1097.0 / 512.0 * n4,
        }
    }
}

/// `Some(true)` for northern bands, `Some(false)` for southern, `None` if not a band.
pub fn is_northern(zone_letter: char) -> Option<bool> {
    let letter = zone_letter.to_ascii_uppercase();
    if !('C'..='X').contains(&letter) || letter == 'I' || letter == 'O' {
        return None;
    }
    Some(letter >= 'N')
}

#[inline]
pub fn central_longitude(zone_number: u8) -> Number {
    (zone_number as Number - 1.0) * 6.0 - 180.0 + 3.0
}

/// Latitude band letter, or `None` outside the UTM latitude range.
pub fn latitude_to_zone_letter(latitude: Number) -> Option<char> {
    if (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        let index = ((latitude + 80.0) as usize) >> 3;
        Some(BAND_LETTERS[index] as char)
    } else {
        None
    }
}

/// Zone number for a position, including the Norway and Svalbard exceptions.
pub fn zone_number(latitude: Number, longitude: Number) -> u8 {
    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        return 32;
    }
    if (72.0..=84.0).contains(&latitude) && longitude >= 0.0 {
        if longitude < 9.0 {
            return 31;
        } else if longitude < 21.0 {
            return 33;
        } else if longitude < 33.0 {
            return 35;
        } else if longitude < 42.0 {
            return 37;
        }
    }
    // longitude 180 belongs to zone 60
    if longitude >= 180.0 {
        return 60;
    }
    (((longitude + 180.0) / 6.0) as u8) + 1
}

/// Wraps an angle in radians to [-π, π).
#[inline]
fn mod_angle(value: Number) -> Number {
    (value + PI).rem_euclid(2.0 * PI) - PI
}

/// Inverse projection: planar UTM to latitude/longitude.
pub fn to_lat_lon(coord: &UtmCoordinate) -> Result<LatLon> {
    if !(MIN_EASTING..MAX_EASTING).contains(&coord.easting) {
        return Err(LocalizeError::ProjectionOutOfRange(format!(
            "easting {} outside [{}, {})",
            coord.easting, MIN_EASTING, MAX_EASTING
        )));
    }
    if !(0.0..=MAX_NORTHING).contains(&coord.northing) {
        return Err(LocalizeError::ProjectionOutOfRange(format!(
            "northing {} outside [0, {}]",
            coord.northing, MAX_NORTHING
        )));
    }
    if !(1..=60).contains(&coord.zone_number) {
        return Err(LocalizeError::ProjectionOutOfRange(format!(
            "zone number {} outside [1, 60]",
            coord.zone_number
        )));
    }
    let northern = is_northern(coord.zone_letter).ok_or_else(|| {
        LocalizeError::ProjectionOutOfRange(format!(
            "zone letter {:?} is not a latitude band",
            coord.zone_letter
        ))
    })?;

    let ell = Ellipsoid::wgs84();

    let x = coord.easting - FALSE_EASTING;
    let mut y = coord.northing;
    if !northern {
        y -= FALSE_NORTHING;
    }

    // footpoint latitude
    let m = y / K0;
    let mu = m / (R * ell.m1);
    let p_rad = mu
        + ell.p2 * (2.0 * mu).sin()
        + ell.p3 * (4.0 * mu).sin()
        + ell.p4 * (6.0 * mu).sin()
        + ell.p5 * (8.0 * mu).sin();

    let (p_sin, p_cos) = p_rad.sin_cos();
    let p_sin2 = p_sin * p_sin;
    let p_tan = p_sin / p_cos;
    let p_tan2 = p_tan * p_tan;
    let p_tan4 = p_tan2 * p_tan2;

    let ep_sin = 1.0 - E * p_sin2;
    let n = R / ep_sin.sqrt();
    let r = (1.0 - E) / ep_sin;

    let c = ell.e_p2 * p_cos * p_cos;
    let c2 = c * c;

    let d = x / (n * K0);
    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let latitude = p_rad
        - (p_tan / r)
            * (d2 / 2.0 - d4 / 24.0 * (5.0 + 3.0 * p_tan2 + 10.0 * c - 4.0 * c2 - 9.0 * ell.e_p2)
                + d6 / 720.0
                    * (61.0 + 90.0 * p_tan2 + 298.0 * c + 45.0 * p_tan4
                        - 252.0 * ell.e_p2
                        - 3.0 * c2));

    let longitude = (d - d3 / 6.0 * (1.0 + 2.0 * p_tan2 + c)
        + d5 / 120.0 * (5.0 - 2.0 * c + 28.0 * p_tan2 - 3.0 * c2 + 8.0 * ell.e_p2 + 24.0 * p_tan4))
        / p_cos;
    let longitude = mod_angle(longitude + central_longitude(coord.zone_number).to_radians());

    Ok(LatLon {
        latitude: latitude.to_degrees(),
        longitude: longitude.to_degrees(),
    })
}

/// Forward projection: latitude/longitude to planar UTM.
///
/// `force_zone` projects into a given zone instead of the natural one.
pub fn from_lat_lon(position: &LatLon, force_zone: Option<u8>) -> Result<UtmCoordinate> {
    let LatLon {
        latitude,
        longitude,
    } = *position;
    let zone_letter = latitude_to_zone_letter(latitude).ok_or_else(|| {
        LocalizeError::ProjectionOutOfRange(format!(
            "latitude {} outside [{}, {}]",
            latitude, MIN_LATITUDE, MAX_LATITUDE
        ))
    })?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(LocalizeError::ProjectionOutOfRange(format!(
            "longitude {} outside [-180, 180]",
            longitude
        )));
    }
    let zone_number = match force_zone {
        Some(zone) if (1..=60).contains(&zone) => zone,
        Some(zone) => {
            return Err(LocalizeError::ProjectionOutOfRange(format!(
                "zone number {} outside [1, 60]",
                zone
            )))
        }
        None => zone_number(latitude, longitude),
    };

    let ell = Ellipsoid::wgs84();

    let lat_rad = latitude.to_radians();
    let (lat_sin, lat_cos) = lat_rad.sin_cos();
    let lat_tan = lat_sin / lat_cos;
    let lat_tan2 = lat_tan * lat_tan;
    let lat_tan4 = lat_tan2 * lat_tan2;

    let lon_rad = longitude.to_radians();
    let central_lon_rad = central_longitude(zone_number).to_radians();

    let n = R / (1.0 - E * lat_sin * lat_sin).sqrt();
    let c = ell.e_p2 * lat_cos * lat_cos;

    let a = lat_cos * mod_angle(lon_rad - central_lon_rad);
    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let m = R
        * (ell.m1 * lat_rad - ell.m2 * (2.0 * lat_rad).sin() + ell.m3 * (4.0 * lat_rad).sin()
            - ell.m4 * (6.0 * lat_rad).sin());

    let easting = K0
        * n
        * (a + a3 / 6.0 * (1.0 - lat_tan2 + c)
            + a5 / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * ell.e_p2))
        + FALSE_EASTING;

    let mut northing = K0
        * (m + n
            * lat_tan
            * (a2 / 2.0
                + a4 / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                + a6 / 720.0 * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * ell.e_p2)));
    if latitude < 0.0 {
        northing += FALSE_NORTHING;
    }

    Ok(UtmCoordinate {
        easting,
        northing,
        zone_number,
        zone_letter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn utm(easting: Number, northing: Number, zone_number: u8, zone_letter: char) -> UtmCoordinate {
        UtmCoordinate {
            easting,
            northing,
            zone_number,
            zone_letter,
        }
    }

    #[test]
    fn central_meridian_keeps_longitude() {
        let position = to_lat_lon(&utm(500_000.0, 3_700_040.0, 16, 'S')).unwrap();
        assert_abs_diff_eq!(position.longitude, -87.0, epsilon = 1e-9);
        assert_abs_diff_eq!(position.latitude, 33.439_755, epsilon = 1e-6);
    }

    #[test]
    fn known_point_atlanta() {
        // Georgia Tech campus, zone 16S
        let position = LatLon {
            latitude: 33.7756,
            longitude: -84.3963,
        };
        let coord = from_lat_lon(&position, None).unwrap();
        assert_eq!(coord.zone_number, 16);
        assert_eq!(coord.zone_letter, 'S');
        assert_abs_diff_eq!(coord.easting, 741_108.40, epsilon = 0.05);
        assert_abs_diff_eq!(coord.northing, 3_740_322.31, epsilon = 0.05);
    }

    #[test]
    fn inverse_then_forward_round_trip() {
        let samples = [
            utm(500_000.0, 3_700_000.0, 16, 'S'),
            utm(741_124.5, 3_739_466.2, 16, 'S'),
            utm(256_000.0, 5_400_000.0, 33, 'U'),
            utm(600_000.0, 6_200_000.0, 56, 'H'),
            utm(430_000.0, 150_000.0, 31, 'N'),
        ];
        for coord in samples.iter() {
            let position = to_lat_lon(coord).unwrap();
            let back = from_lat_lon(&position, Some(coord.zone_number)).unwrap();
            assert_abs_diff_eq!(back.easting, coord.easting, epsilon = 2e-3);
            assert_abs_diff_eq!(back.northing, coord.northing, epsilon = 2e-3);
        }
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let position = to_lat_lon(&utm(600_000.0, 6_200_000.0, 56, 'H')).unwrap();
        assert!(position.latitude < 0.0);
        let back = from_lat_lon(&position, None).unwrap();
        assert_eq!(back.zone_letter, 'H');
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            to_lat_lon(&utm(50_000.0, 3_700_000.0, 16, 'S')),
            Err(LocalizeError::ProjectionOutOfRange(_))
        ));
        assert!(matches!(
            to_lat_lon(&utm(500_000.0, -1.0, 16, 'S')),
            Err(LocalizeError::ProjectionOutOfRange(_))
        ));
        assert!(matches!(
            to_lat_lon(&utm(500_000.0, 3_700_000.0, 61, 'S')),
            Err(LocalizeError::ProjectionOutOfRange(_))
        ));
        assert!(matches!(
            to_lat_lon(&utm(500_000.0, 3_700_000.0, 16, 'O')),
            Err(LocalizeError::ProjectionOutOfRange(_))
        ));
        assert!(matches!(
            from_lat_lon(
                &LatLon {
                    latitude: 85.0,
                    longitude: 0.0
                },
                None
            ),
            Err(LocalizeError::ProjectionOutOfRange(_))
        ));
    }

    #[test]
    fn zone_exceptions() {
        assert_eq!(zone_number(60.0, 5.0), 32);
        assert_eq!(zone_number(75.0, 10.0), 33);
        assert_eq!(zone_number(33.7, -84.4), 16);
        assert_eq!(zone_number(0.0, 180.0), 60);
        assert_eq!(zone_number(0.0, 179.9), 60);
        assert_eq!(zone_number(0.0, -180.0), 1);
        assert_eq!(latitude_to_zone_letter(84.0), Some('X'));
        assert_eq!(latitude_to_zone_letter(-81.0), None);
    }
}
