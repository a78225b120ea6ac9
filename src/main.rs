use signloc::io::{load_sequence, timestamps, SequencePaths};
use signloc::{LocalizeSettings, SignLocalizer};

use anyhow::{bail, Context, Result};
use log::*;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "signloc", about = "Localize a traffic sign from a monocular SLAM run")]
enum Opt {
    /// Estimate the sign's UTM and latitude/longitude position.
    Localize {
        /// Folder holding ObjectMap.txt, KeyFrameTrajectory.txt, sign_annotations.json and coords.csv.
        #[structopt(long, parse(from_os_str))]
        sequence_folder: PathBuf,
        /// Override the object map file.
        #[structopt(long, parse(from_os_str))]
        object_map: Option<PathBuf>,
        /// Override the keyframe trajectory file.
        #[structopt(long, parse(from_os_str))]
        trajectory: Option<PathBuf>,
        /// Override the annotation file.
        #[structopt(long, parse(from_os_str))]
        annotations: Option<PathBuf>,
        /// Override the vehicle coordinate file.
        #[structopt(long, parse(from_os_str))]
        vehicle_coords: Option<PathBuf>,
        /// The file where settings are specified, in the format of `signloc::LocalizeSettings`.
        ///
        /// Defaults are used when omitted.
        #[structopt(short, long, parse(from_os_str))]
        settings: Option<PathBuf>,
        /// Field delimiter of the vehicle coordinate file.
        #[structopt(long, default_value = ",")]
        coords_delimiter: char,
        /// Print the result as JSON.
        #[structopt(long)]
        json: bool,
    },
    /// Write the `timestamp filename` list for a folder of images.
    Timestamps {
        #[structopt(parse(from_os_str))]
        image_folder: PathBuf,
        #[structopt(parse(from_os_str))]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    match Opt::from_args() {
        Opt::Localize {
            sequence_folder,
            object_map,
            trajectory,
            annotations,
            vehicle_coords,
            settings,
            coords_delimiter,
            json,
        } => {
            let settings = match settings {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading settings {}", path.display()))?;
                    info!("loaded settings from {}", path.display());
                    LocalizeSettings::from_json(&text)?
                }
                None => {
                    info!("used default settings");
                    LocalizeSettings::default()
                }
            };
            if !coords_delimiter.is_ascii() {
                bail!("coordinate delimiter {:?} is not ASCII", coords_delimiter);
            }

            let mut paths = SequencePaths::in_folder(&sequence_folder);
            if let Some(path) = object_map {
                paths.object_map = path;
            }
            if let Some(path) = trajectory {
                paths.trajectory = path;
            }
            if let Some(path) = annotations {
                paths.annotations = path;
            }
            if let Some(path) = vehicle_coords {
                paths.vehicle_coords = path;
            }

            let data = load_sequence(&paths, coords_delimiter as u8)
                .with_context(|| format!("loading sequence {}", sequence_folder.display()))?;
            let fix = SignLocalizer::new(settings)?.localize(&data)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&fix)?);
            } else {
                println!(
                    "{} UTM{}{} ({:.3}, {:.3}) lat-lon ({:.7}, {:.7})",
                    fix.image,
                    fix.utm.zone_number,
                    fix.utm.zone_letter,
                    fix.utm.easting,
                    fix.utm.northing,
                    fix.position.latitude,
                    fix.position.longitude
                );
            }
        }
        Opt::Timestamps {
            image_folder,
            output,
        } => {
            let count = timestamps::create_timestamps_file(&image_folder, &output)
                .with_context(|| format!("listing {}", image_folder.display()))?;
            info!("wrote {} timestamps to {}", count, output.display());
        }
    }
    Ok(())
}
