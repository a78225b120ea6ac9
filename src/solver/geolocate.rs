use super::base::Estimator;
use super::transform::MetricOffset;
use crate::error::Result;
use crate::map::VehiclePosition;
use crate::utm::{self, LatLon, UtmCoordinate};

use log::info;

/// Places the sign at the vehicle's surveyed position plus the planar offset,
/// then projects it back to latitude/longitude.
pub struct Geolocator<'a> {
    pub vehicle: &'a VehiclePosition,
    pub offset: &'a MetricOffset,

    /// Offset components used as (east, north).
    pub planar_axes: (usize, usize),
    pub zone_number: u8,
    pub zone_letter: char,
}

impl<'a> Estimator<(UtmCoordinate, LatLon)> for Geolocator<'a> {
    fn estimate(self) -> Result<(UtmCoordinate, LatLon)> {
        let sign = self.vehicle.planar() + self.offset.planar(self.planar_axes);
        let coord = UtmCoordinate {
            easting: sign.x,
            northing: sign.y,
            zone_number: self.zone_number,
            zone_letter: self.zone_letter,
        };
        let position = utm::to_lat_lon(&coord)?;

        info!(
            "vehicle UTM{}{}: ({:.6}, {:.6})",
            self.zone_number, self.zone_letter, self.vehicle.x, self.vehicle.y
        );
        info!(
            "sign UTM{}{}: ({:.6}, {:.6})",
            self.zone_number, self.zone_letter, coord.easting, coord.northing
        );
        info!(
            "sign lat-lon: ({:.6}, {:.6})",
            position.latitude, position.longitude
        );

        Ok((coord, position))
    }
}
