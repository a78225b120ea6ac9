mod annotations;
mod coords;
mod orbslam;
pub mod timestamps;

pub use annotations::read_annotations;
pub use coords::read_vehicle_coords;
pub use orbslam::{read_object_map, read_trajectory};

use crate::error::Result;
use crate::map::FrameStore;
use crate::pipeline::SequenceData;

use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Input files of one recorded sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePaths {
    pub object_map: PathBuf,
    pub trajectory: PathBuf,
    pub annotations: PathBuf,
    pub vehicle_coords: PathBuf,
}

impl SequencePaths {
    /// The conventional file names inside a sequence folder.
    pub fn in_folder(folder: &Path) -> Self {
        Self {
            object_map: folder.join("ObjectMap.txt"),
            trajectory: folder.join("KeyFrameTrajectory.txt"),
            annotations: folder.join("sign_annotations.json"),
            vehicle_coords: folder.join("coords.csv"),
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Loads every input of a run up front.
pub fn load_sequence(paths: &SequencePaths, coords_delimiter: u8) -> Result<SequenceData> {
    info!("object map: {}", paths.object_map.display());
    info!("trajectory: {}", paths.trajectory.display());
    info!("annotations: {}", paths.annotations.display());
    info!("vehicle coordinates: {}", paths.vehicle_coords.display());

    let observations = read_object_map(open(&paths.object_map)?)?;
    let trajectory = read_trajectory(open(&paths.trajectory)?)?;
    let store = FrameStore::new(trajectory, observations)?;
    let annotations = read_annotations(open(&paths.annotations)?)?;
    let vehicles = read_vehicle_coords(open(&paths.vehicle_coords)?, coords_delimiter)?;

    Ok(SequenceData {
        store,
        annotations,
        vehicles,
    })
}
