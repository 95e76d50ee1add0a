//! Direct conversions between systems related by an exact algebraic map.
//! Going through geodetic coordinates would lose precision (and, for the
//! grid reference strings, the cell), so when both slots share a datum,
//! these take over.

use super::convert::DatumEllipsoid;
use crate::projection::bng::Bng;
use crate::projection::loccart::LocalCartesian;
use crate::projection::mgrs::Mgrs;
use crate::status::{Issue, Status};
use crate::system::*;

/// One side of a direct conversion
pub(super) struct Leg<'a> {
    pub parameters: &'a Parameters,
    pub ellipsoid: &'a DatumEllipsoid,
}

/// The side whose parameters or coordinates the conversion failed on
pub(super) enum Failure {
    Input(Status),
    Output(Status),
}

pub(super) type Direct = Result<(Coordinates, Status), Failure>;

pub(super) struct Shortcut {
    pub from: CoordinateType,
    pub to: CoordinateType,
    applies: fn(&Parameters, &Parameters) -> bool,
    pub convert: fn(&Coordinates, &Leg, &Leg, Precision) -> Direct,
}

#[rustfmt::skip]
static SHORTCUTS: [Shortcut; 8] = [
    Shortcut { from: CoordinateType::Geocentric, to: CoordinateType::LocalCartesian, applies: always, convert: geocentric_to_local },
    Shortcut { from: CoordinateType::LocalCartesian, to: CoordinateType::Geocentric, applies: always, convert: local_to_geocentric },
    Shortcut { from: CoordinateType::Mgrs, to: CoordinateType::Utm, applies: natural_zone, convert: mgrs_to_utm },
    Shortcut { from: CoordinateType::Utm, to: CoordinateType::Mgrs, applies: natural_zone, convert: utm_to_mgrs },
    Shortcut { from: CoordinateType::Mgrs, to: CoordinateType::Ups, applies: always, convert: mgrs_to_ups },
    Shortcut { from: CoordinateType::Ups, to: CoordinateType::Mgrs, applies: always, convert: ups_to_mgrs },
    Shortcut { from: CoordinateType::TransverseMercator, to: CoordinateType::Bng, applies: national_grid, convert: tm_to_bng },
    Shortcut { from: CoordinateType::Bng, to: CoordinateType::TransverseMercator, applies: national_grid, convert: bng_to_tm },
];

/// The direct conversion from `input` to `output`, if there is one
pub(super) fn find(input: &Parameters, output: &Parameters) -> Option<&'static Shortcut> {
    SHORTCUTS
        .iter()
        .find(|s| s.from == input.kind() && s.to == output.kind() && (s.applies)(input, output))
}

// ----- Applicability -----------------------------------------------------------------

fn always(_: &Parameters, _: &Parameters) -> bool {
    true
}

// MGRS letters the natural UTM zone: an overridden zone needs the detour
fn natural_zone(input: &Parameters, output: &Parameters) -> bool {
    ![input, output]
        .iter()
        .any(|p| matches!(p, Parameters::Utm(utm) if utm.override_zone))
}

// The transverse Mercator side must be exactly the National Grid projection
fn national_grid(input: &Parameters, output: &Parameters) -> bool {
    let grid = Bng::grid_parameters();
    [input, output]
        .iter()
        .any(|p| matches!(p, Parameters::TransverseMercator(tm) if *tm == grid))
}

// ----- Conversions -------------------------------------------------------------------

// The registry only pairs matching variants, so this is unreachable in practice
fn mismatch() -> Failure {
    Failure::Input(Status::from(Issue::Projection))
}

fn geocentric_to_local(coordinates: &Coordinates, _: &Leg, to: &Leg, _: Precision) -> Direct {
    let (Coordinates::Geocentric(xyz), Parameters::LocalCartesian(p)) = (coordinates, to.parameters) else {
        return Err(mismatch());
    };
    let local = LocalCartesian::new(p, &to.ellipsoid.ellps).map_err(Failure::Output)?;
    Ok((Coordinates::LocalCartesian(local.from_geocentric(xyz)), Status::NONE))
}

fn local_to_geocentric(coordinates: &Coordinates, from: &Leg, _: &Leg, _: Precision) -> Direct {
    let (Coordinates::LocalCartesian(xyz), Parameters::LocalCartesian(p)) = (coordinates, from.parameters) else {
        return Err(mismatch());
    };
    let local = LocalCartesian::new(p, &from.ellipsoid.ellps).map_err(Failure::Input)?;
    Ok((Coordinates::Geocentric(local.to_geocentric(xyz)), Status::NONE))
}

fn mgrs(leg: &Leg) -> Result<Mgrs, Status> {
    Mgrs::new(&leg.ellipsoid.ellps, &leg.ellipsoid.code)
}

fn mgrs_to_utm(coordinates: &Coordinates, from: &Leg, _: &Leg, _: Precision) -> Direct {
    let Coordinates::Mgrs(text) = coordinates else {
        return Err(mismatch());
    };
    let (utm, warnings) = mgrs(from).and_then(|m| m.to_utm(text)).map_err(Failure::Input)?;
    Ok((Coordinates::Utm(utm), warnings))
}

fn utm_to_mgrs(coordinates: &Coordinates, _: &Leg, to: &Leg, precision: Precision) -> Direct {
    let Coordinates::Utm(utm) = coordinates else {
        return Err(mismatch());
    };
    let (text, warnings) = mgrs(to).and_then(|m| m.from_utm(utm, precision)).map_err(Failure::Output)?;
    Ok((Coordinates::Mgrs(text), warnings))
}

fn mgrs_to_ups(coordinates: &Coordinates, from: &Leg, _: &Leg, _: Precision) -> Direct {
    let Coordinates::Mgrs(text) = coordinates else {
        return Err(mismatch());
    };
    let (ups, warnings) = mgrs(from).and_then(|m| m.to_ups(text)).map_err(Failure::Input)?;
    Ok((Coordinates::Ups(ups), warnings))
}

fn ups_to_mgrs(coordinates: &Coordinates, _: &Leg, to: &Leg, precision: Precision) -> Direct {
    let Coordinates::Ups(ups) = coordinates else {
        return Err(mismatch());
    };
    let (text, warnings) = mgrs(to).and_then(|m| m.from_ups(ups, precision)).map_err(Failure::Output)?;
    Ok((Coordinates::Mgrs(text), warnings))
}

fn tm_to_bng(coordinates: &Coordinates, _: &Leg, to: &Leg, precision: Precision) -> Direct {
    let Coordinates::TransverseMercator(xy) = coordinates else {
        return Err(mismatch());
    };
    let bng = Bng::new(&to.ellipsoid.code).map_err(Failure::Output)?;
    let (text, warnings) = bng.from_tm(*xy, precision).map_err(Failure::Output)?;
    Ok((Coordinates::Bng(text), warnings))
}

fn bng_to_tm(coordinates: &Coordinates, from: &Leg, _: &Leg, _: Precision) -> Direct {
    let Coordinates::Bng(text) = coordinates else {
        return Err(mismatch());
    };
    let (xy, warnings) = Bng::new(&from.ellipsoid.code)
        .and_then(|bng| bng.to_tm(text))
        .map_err(Failure::Input)?;
    Ok((Coordinates::TransverseMercator(xy), warnings))
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry() {
        let p = |kind| Parameters::default_for(kind);
        use CoordinateType as C;

        for shortcut in &SHORTCUTS {
            let reverse = SHORTCUTS.iter().any(|s| s.from == shortcut.to && s.to == shortcut.from);
            assert!(reverse, "{} -> {}", shortcut.from, shortcut.to);
        }

        assert!(find(&p(C::Geocentric), &p(C::LocalCartesian)).is_some());
        assert!(find(&p(C::Mgrs), &p(C::Utm)).is_some());
        assert!(find(&p(C::Ups), &p(C::Mgrs)).is_some());
        assert!(find(&p(C::Geodetic), &p(C::Utm)).is_none());
        assert!(find(&p(C::Utm), &p(C::Ups)).is_none());

        let overridden = Parameters::Utm(UtmParameters {
            zone: 33,
            override_zone: true,
        });
        assert!(find(&p(C::Mgrs), &overridden).is_none());
        assert!(find(&overridden, &p(C::Mgrs)).is_none());

        // Only the exact National Grid projection qualifies
        assert!(find(&p(C::TransverseMercator), &p(C::Bng)).is_none());
        let grid = Parameters::TransverseMercator(Bng::grid_parameters());
        assert!(find(&grid, &p(C::Bng)).is_some());
        assert!(find(&p(C::Bng), &grid).is_some());
    }
}
