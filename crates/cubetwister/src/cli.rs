use std::path::PathBuf;

use cubemath::approx_cmp::snap;
use cubeprefs::CubeAttributes;
use cubeview::{AnimationHandle, Animator, CubeView, WaitMode};
use eyre::{Context, Result};
use itertools::Itertools;
use pocketcube::{Location, Part, SharedCube, Twist};
use serde::Serialize;

/// Pocket Cube twister
///
/// Applies moves to a Pocket Cube, animating each twist, then prints the
/// final transform of every part as JSON.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// Preferences file (YAML). Missing fields keep their defaults.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Explosion factor, overriding the preferences file.
    #[arg(short, long, value_name = "F")]
    pub explode: Option<f32>,
    /// Seconds per quarter turn, overriding the preferences file.
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<f32>,
    /// Skip to the end of each animation instead of playing it.
    #[arg(long)]
    pub sync: bool,
    /// Number of random twists to apply before the moves.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub scramble: usize,

    /// Moves such as `R U' F2` (faces `RUFLDB`, rotations `xyz`).
    pub moves: Vec<String>,
}

/// Final state of one part.
#[derive(Serialize, Debug, Clone, PartialEq)]
struct PartOutput {
    part: Part,
    location: Location,
    location_name: &'static str,
    orientation: u8,
    /// World transform, as rows.
    transform: [[f32; 4]; 4],
}

/// Final state of the cube.
#[derive(Serialize, Debug, Clone, PartialEq)]
struct Output {
    moves: String,
    solved: bool,
    parts: Vec<PartOutput>,
}

pub(crate) fn exec(args: Args) -> Result<()> {
    let attrs = load_attributes(&args)?;

    let mut twists = vec![];
    let mut rng = rand::rng();
    twists.extend(std::iter::repeat_with(|| Twist::random(&mut rng)).take(args.scramble));
    let moves = pocketcube::parse_moves(&args.moves.join(" ")).context("error parsing moves")?;
    twists.extend(moves);

    let cube = SharedCube::default();
    let view = match args.sync {
        true => CubeView::new(cube, attrs, Animator::synchronous()),
        false => CubeView::with_animator_thread(cube, attrs),
    };

    // Twist animations play one after another, so waiting for the last one
    // waits for all of them.
    let mut last = AnimationHandle::finished();
    for &twist in &twists {
        log::info!("Twisting {twist}");
        last = view
            .twist(twist, WaitMode::NonBlocking)
            .wrap_err_with(|| format!("error applying {twist}"))?;
    }
    view.animator().wait(&last);

    let output = Output {
        moves: twists.iter().join(" "),
        ..output_for(&view)
    };
    write_json_output(&output)
}

fn load_attributes(args: &Args) -> Result<CubeAttributes> {
    let mut attrs = match &args.config {
        Some(path) => CubeAttributes::try_load(Some(path.as_path()))
            .wrap_err_with(|| format!("error loading preferences from {}", path.display()))?,
        None => CubeAttributes::load(None),
    };
    if let Some(explosion_factor) = args.explode {
        attrs.explosion_factor = explosion_factor;
    }
    if let Some(twist_duration) = args.duration {
        attrs.twist_duration = twist_duration;
    }
    attrs.validate().context("invalid preferences")?;
    Ok(attrs)
}

fn output_for(view: &CubeView) -> Output {
    let transforms = view.part_transforms();
    let cube = view.cube().lock();
    let parts = Part::iter()
        .map(|part| {
            let location = cube.part_location(part);
            PartOutput {
                part,
                location,
                location_name: location.name(),
                orientation: cube.part_orientation(part).code(),
                transform: transforms[part.to_usize()].rows().map(|row| row.map(snap)),
            }
        })
        .collect();
    Output {
        moves: String::new(),
        solved: cube.is_solved(),
        parts,
    }
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "cubetwister",
            "--explode",
            "0.5",
            "--duration",
            "0.1",
            "--sync",
            "R",
            "U'",
            "F2",
        ])
        .unwrap();
        assert_eq!(args.explode, Some(0.5));
        assert_eq!(args.duration, Some(0.1));
        assert!(args.sync);
        assert_eq!(args.scramble, 0);
        assert_eq!(args.moves, ["R", "U'", "F2"]);

        let attrs = load_attributes(&args).unwrap();
        assert_eq!(attrs.explosion_factor, 0.5);
        assert_eq!(attrs.twist_duration, 0.1);

        let bad = Args::try_parse_from(["cubetwister", "--explode=-1", "R"]).unwrap();
        assert!(load_attributes(&bad).is_err());
    }

    #[test]
    fn test_output() {
        let view = CubeView::new(
            SharedCube::default(),
            CubeAttributes {
                alpha: 0.0,
                beta: 0.0,
                ..Default::default()
            },
            Animator::synchronous(),
        );
        let output = output_for(&view);
        assert!(output.solved);
        assert_eq!(output.parts.len(), pocketcube::PART_COUNT);
        assert_eq!(output.parts[0].location_name, "urf");
        assert_eq!(output.parts[8].transform[3], [0.0, 0.0, 0.0, 1.0]);

        for twist in pocketcube::parse_moves("R U").unwrap() {
            view.twist(twist, WaitMode::Blocking).unwrap();
        }
        let output = output_for(&view);
        assert!(!output.solved);
        let moved = output
            .parts
            .iter()
            .filter(|p| p.location != Location(p.part.0))
            .count();
        assert!(moved > 0);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["parts"].as_array().map(Vec::len), Some(9));
    }
}
