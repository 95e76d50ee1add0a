//! gtx: Convert coordinates between any two of the systems known to geotrans.
//!
//! The coordinates of a single point are taken from the trailing arguments.
//! Geodetic coordinates are given as latitude, longitude and (optionally)
//! height, angles in degrees.
use anyhow::{bail, Context};
use clap::Parser;
use geotrans::math::angular;
use geotrans::prelude::*;
use log::{debug, warn};

const STATE: State = State::Interactive;

/// GTX: The geotrans coordinate converter. Converts between geodetic,
/// geocentric and local cartesian coordinates, MGRS, GEOREF, BNG, UTM,
/// UPS, and 25 map projections, shifting datums on the way if needed.
#[derive(Parser, Debug)]
#[clap(name = "gtx")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Input coordinate system, by its two letter code
    #[clap(long, default_value = "GD")]
    from: String,

    /// Output coordinate system, by its two letter code
    #[clap(long, default_value = "GD")]
    to: String,

    /// Input datum code
    #[clap(long, default_value = "WGE")]
    from_datum: String,

    /// Output datum code
    #[clap(long, default_value = "WGE")]
    to_datum: String,

    /// Input system parameter, as key=value. Angles in degrees
    #[clap(long = "from-param", value_name = "KEY=VALUE")]
    from_params: Vec<String>,

    /// Output system parameter, as key=value. Angles in degrees
    #[clap(long = "to-param", value_name = "KEY=VALUE")]
    to_params: Vec<String>,

    /// Precision of string output: 0 (100 km / 1°) to 5 (1 m / 0.1")
    #[clap(short, long, default_value_t = 5)]
    precision: u8,

    /// Number of decimals for geodetic output
    #[clap(short = 'd', long, default_value_t = 9)]
    decimals: usize,

    /// List the known `systems`, `datums` or `ellipsoids`, then exit
    #[clap(long, value_name = "WHAT")]
    list: Option<String>,

    /// Echo input to output
    #[clap(short, long)]
    echo: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// The coordinates of the point to convert
    #[clap(allow_negative_numbers = true)]
    args: Vec<String>,
}

fn main() -> Result<(), anyhow::Error> {
    let options = Cli::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();
    debug!("{:#?}", options);

    let mut engine = Engine::new();
    let files = DataFiles::user_default().or(DataFiles::from_env());
    engine.reload(&files)?;

    if let Some(what) = &options.list {
        return list(&engine, what);
    }

    let from = configure(
        &mut engine,
        Direction::Input,
        &options.from,
        &options.from_datum,
        &options.from_params,
    )?;
    configure(
        &mut engine,
        Direction::Output,
        &options.to,
        &options.to_datum,
        &options.to_params,
    )?;
    engine.set_precision(Precision::from(options.precision));

    if engine.valid_conversion(STATE)? == Validity::Red {
        warn!("The two coordinate systems do not overlap");
    }

    if options.args.is_empty() {
        bail!("No coordinates given");
    }
    let line = options.args.join(" ");
    convert(&mut engine, from, &line, &options)
}

// Set up one side of the conversion
fn configure(
    engine: &mut Engine,
    direction: Direction,
    system: &str,
    datum: &str,
    settings: &[String],
) -> Result<CoordinateType, anyhow::Error> {
    let kind = CoordinateType::from_code(system)
        .with_context(|| format!("Unknown coordinate system '{system}'"))?;
    engine.set_coordinate_system(STATE, direction, kind)?;

    let index = engine
        .datum_index(datum)
        .with_context(|| format!("Unknown datum '{datum}'"))?;
    engine.set_datum(STATE, direction, index)?;

    let mut parameters = engine.parameters(STATE, direction)?;
    for setting in settings {
        let Some((key, value)) = setting.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{setting}'");
        };
        parameters.set(key.trim(), value)?;
    }
    engine.set_parameters(STATE, direction, parameters)?;
    debug!("{direction:?}: {kind} on {datum} {parameters:?}");
    Ok(kind)
}

fn convert(engine: &mut Engine, from: CoordinateType, line: &str, options: &Cli) -> Result<(), anyhow::Error> {
    let coordinates = parse(from, line)?;
    engine.set_coordinates(STATE, Direction::Input, coordinates)?;
    let outcome = engine.convert(STATE);

    for direction in [Direction::Input, Direction::Output] {
        let issues = engine.conversion_status_string(STATE, direction, "; ")?;
        if !issues.is_empty() {
            eprintln!("{direction:?}: {issues}");
        }
    }
    if let Err(code) = outcome {
        bail!("{code}");
    }

    let output = engine.coordinates(STATE, Direction::Output)?;
    let text = format(&output, options.decimals);
    if options.echo {
        println!("{line} -> {text}");
    } else {
        println!("{text}");
    }

    let errors = engine.conversion_errors(STATE)?;
    debug!("ce90: {}, le90: {}, se90: {}", errors.ce90, errors.le90, errors.se90);
    Ok(())
}

fn parse(kind: CoordinateType, line: &str) -> Result<Coordinates, anyhow::Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let token = |i: usize| {
        tokens
            .get(i)
            .copied()
            .with_context(|| format!("{kind}: missing value #{}", i + 1))
    };
    let number = |i: usize| -> Result<f64, anyhow::Error> {
        let t = token(i)?;
        t.parse::<f64>().with_context(|| format!("Bad number '{t}'"))
    };
    let angle = |i: usize| -> Result<f64, anyhow::Error> {
        let t = token(i)?;
        angular::parse_degrees(t).with_context(|| format!("Bad angle '{t}'"))
    };
    let hemisphere = |i: usize| -> Result<Hemisphere, anyhow::Error> {
        let t = token(i)?;
        t.chars()
            .next()
            .and_then(Hemisphere::from_letter)
            .with_context(|| format!("Bad hemisphere '{t}'"))
    };
    let cartesian = || -> Result<CartesianCoordinates, anyhow::Error> {
        Ok(CartesianCoordinates {
            x: number(0)?,
            y: number(1)?,
            z: number(2)?,
        })
    };

    use CoordinateType as C;
    let coordinates = match kind {
        C::Geodetic => {
            let height = if tokens.len() > 2 { number(2)? } else { 0. };
            Coordinates::Geodetic(GeodeticCoordinates::degrees(angle(1)?, angle(0)?, height))
        }
        C::Georef => Coordinates::Georef(tokens.concat()),
        C::Mgrs => Coordinates::Mgrs(tokens.concat()),
        C::Bng => Coordinates::Bng(tokens.join(" ")),
        C::Geocentric => Coordinates::Geocentric(cartesian()?),
        C::LocalCartesian => Coordinates::LocalCartesian(cartesian()?),
        C::Utm => {
            let zone = token(2)?;
            Coordinates::Utm(UtmCoordinates {
                easting: number(0)?,
                northing: number(1)?,
                zone: zone.parse().with_context(|| format!("Bad zone '{zone}'"))?,
                hemisphere: hemisphere(3)?,
            })
        }
        C::Ups => Coordinates::Ups(UpsCoordinates {
            easting: number(0)?,
            northing: number(1)?,
            hemisphere: hemisphere(2)?,
        }),
        kind => Coordinates::map(kind, number(0)?, number(1)?)
            .with_context(|| format!("{kind} takes no easting/northing"))?,
    };
    Ok(coordinates)
}

fn format(coordinates: &Coordinates, decimals: usize) -> String {
    match coordinates {
        Coordinates::Geodetic(g) => format!(
            "{:.*} {:.*} {:.3}",
            decimals,
            g.latitude.to_degrees(),
            decimals,
            g.longitude.to_degrees(),
            g.height
        ),
        Coordinates::Georef(text) | Coordinates::Mgrs(text) | Coordinates::Bng(text) => text.clone(),
        Coordinates::Geocentric(c) | Coordinates::LocalCartesian(c) => {
            format!("{:.3} {:.3} {:.3}", c.x, c.y, c.z)
        }
        Coordinates::Utm(u) => format!(
            "{:.3} {:.3} {} {}",
            u.easting,
            u.northing,
            u.zone,
            u.hemisphere.letter()
        ),
        Coordinates::Ups(u) => format!("{:.3} {:.3} {}", u.easting, u.northing, u.hemisphere.letter()),
        other => other
            .as_map()
            .map(|m| format!("{:.3} {:.3}", m.easting, m.northing))
            .unwrap_or_default(),
    }
}

fn list(engine: &Engine, what: &str) -> Result<(), anyhow::Error> {
    match what {
        "systems" => {
            for kind in CoordinateType::ALL {
                println!("{}  {}", kind.code(), kind.name());
            }
        }
        "datums" => {
            for (i, datum) in engine.datums().iter().enumerate() {
                let user = if datum.user_defined { "*" } else { "" };
                println!("{:3}  {:<6} {:<3} {}{user}", i + 1, datum.code, datum.ellipsoid_code, datum.name);
            }
        }
        "ellipsoids" => {
            for (i, entry) in engine.ellipsoids().iter().enumerate() {
                let user = if entry.user_defined { "*" } else { "" };
                println!(
                    "{:3}  {:<3} {:>12.3} {:>14.9}  {}{user}",
                    i + 1,
                    entry.code,
                    entry.a,
                    entry.inverse_flattening,
                    entry.name
                );
            }
        }
        _ => bail!("Cannot list '{what}': expected systems, datums or ellipsoids"),
    }
    Ok(())
}
