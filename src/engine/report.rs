//! Plain English descriptions of conversion issues.
//!
//! The issue bits are shared by all coordinate systems, so some of them
//! (hemisphere, origin latitude, central meridian, string, ellipsoid code)
//! mean different things for different systems.

use super::{Direction, Engine, State};
use crate::status::{Issue, ReturnCode, Status};
use crate::system::CoordinateType;

impl Engine {
    /// One sentence per issue in the conversion status of the slot,
    /// joined by `separator`. Empty if the slot converted cleanly.
    pub fn conversion_status_string(
        &self,
        state: State,
        direction: Direction,
        separator: &str,
    ) -> Result<String, ReturnCode> {
        self.ready()?;
        let slot = self.slot(state, direction);
        Ok(status_string(slot.status, slot.kind(), separator))
    }
}

/// Describe every issue of `status`, as raised by the system `kind`
pub fn status_string(status: Status, kind: CoordinateType, separator: &str) -> String {
    status
        .iter()
        .map(|issue| issue_description(issue, kind))
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn issue_description(issue: Issue, kind: CoordinateType) -> &'static str {
    use CoordinateType as C;
    match issue {
        Issue::Hemisphere => match kind {
            C::AlbersEqualAreaConic | C::LambertConformalConic2 => {
                "Standard parallels cannot be in opposite hemispheres at equal distances from the equator"
            }
            C::ObliqueMercator => "The points cannot be in opposite hemispheres",
            _ => "Invalid hemisphere",
        },
        Issue::OriginLatitude => match kind {
            C::PolarStereographic => "Latitude of true scale out of range",
            C::Neys => "Origin latitude must be within 89°59'58\" of the equator",
            _ => "Origin latitude out of range",
        },
        Issue::CentralMeridian => match kind {
            C::LocalCartesian => "Orientation out of range",
            C::PolarStereographic => "Longitude down from pole out of range",
            _ => "Central meridian out of range",
        },
        Issue::String => match kind {
            C::Mgrs => "Invalid MGRS string",
            C::Georef => "Invalid GEOREF string",
            C::Bng => "Invalid BNG string",
            _ => "Invalid coordinate string",
        },
        Issue::EllipsoidCode => match kind {
            C::Bng => "The British National Grid requires the Airy ellipsoid",
            C::Nzmg => "The New Zealand Map Grid requires the International 1924 ellipsoid",
            _ => "The ellipsoid of the datum is unknown",
        },
        Issue::StandardParallel => match kind {
            C::Neys => "Standard parallel must be 71 or 74 degrees",
            _ => "Standard parallel out of range",
        },
        Issue::Easting => "Easting out of range",
        Issue::Northing => "Northing out of range",
        Issue::Radius => "Point is beyond the edge of the projection",
        Issue::ScaleFactor => "Scale factor out of range",
        Issue::LongitudeWarning => "Longitude is far from the central meridian: distortion will be significant",
        Issue::OriginLongitude => "Origin longitude out of range",
        Issue::DatumWarning => "Point is outside the area of validity of the datum",
        Issue::FirstStandardParallel => "First standard parallel out of range",
        Issue::SecondStandardParallel => "Second standard parallel out of range",
        Issue::EqualStandardParallels => "Standard parallels cannot both be at the equator",
        Issue::Zone => "Zone out of range",
        Issue::ZoneOverride => "Zone override is too far from the natural zone of the point",
        Issue::StringLongitudeMinutes => "Longitude minutes of the string out of range",
        Issue::StringLatitudeMinutes => "Latitude minutes of the string out of range",
        Issue::Projection => "Point cannot be projected",
        Issue::Latitude1 => "Latitude of the first point out of range",
        Issue::Longitude1 => "Longitude of the first point out of range",
        Issue::Latitude2 => "Latitude of the second point out of range",
        Issue::Longitude2 => "Longitude of the second point out of range",
        Issue::EqualLatitudes => "The two points cannot have equal latitudes",
        Issue::InvalidArea => "Point is outside the area covered by the grid",
        Issue::Latitude => "Latitude out of range",
        Issue::Longitude => "Longitude out of range",
        Issue::SemiMajorAxis => "Semimajor axis must be greater than zero",
        Issue::InverseFlattening => "Inverse flattening must be between 250 and 350",
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wording_depends_on_the_system() {
        let hemisphere = |kind| issue_description(Issue::Hemisphere, kind);
        assert!(hemisphere(CoordinateType::AlbersEqualAreaConic).starts_with("Standard parallels"));
        assert_eq!(hemisphere(CoordinateType::LambertConformalConic2), hemisphere(CoordinateType::AlbersEqualAreaConic));
        assert!(hemisphere(CoordinateType::ObliqueMercator).contains("points"));
        assert_eq!(hemisphere(CoordinateType::Utm), "Invalid hemisphere");
        assert_eq!(hemisphere(CoordinateType::Mgrs), "Invalid hemisphere");

        // Every issue has a description
        for issue in Issue::ALL {
            assert!(!issue_description(issue, CoordinateType::Mercator).is_empty());
        }
    }

    #[test]
    fn joined() {
        let status = Status::from(Issue::Easting) | Issue::Northing;
        let text = status_string(status, CoordinateType::Mercator, "; ");
        assert_eq!(text, "Easting out of range; Northing out of range");
        assert_eq!(status_string(Status::NONE, CoordinateType::Utm, "; "), "");
    }
}
