//! Readers for the text files written by the SLAM run.
//!
//! * object map: `ts image x1 y1 z1 x2 y2 z2 ...`, one row per observation
//! * keyframe trajectory: `ts t1 t2 t3 R1 .. R9`, rotation row-major

use crate::error::{LocalizeError, Result};
use crate::map::{CameraPose, ObjectObservation, TrajectoryRow};
use crate::num::{Number, PointSlot};

use itertools::Itertools;
use log::debug;
use std::io::BufRead;

const OBJECT_MAP: &str = "object map";
const TRAJECTORY: &str = "keyframe trajectory";

fn parse_number(source: &str, line: usize, token: &str) -> Result<Number> {
    token
        .parse::<Number>()
        .map_err(|_| LocalizeError::malformed(source, line, format!("{:?} is not a number", token)))
}

/// Non-empty lines, numbered from 1.
fn rows<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)).map_err(LocalizeError::from))
        .filter(|row| match row {
            Ok((_, l)) => !l.trim().is_empty(),
            Err(_) => true,
        })
}

/// Reads the object map. Slots past the end of a short row and `nan`
/// components are missing values.
pub fn read_object_map<R: BufRead>(reader: R) -> Result<Vec<ObjectObservation>> {
    let mut observations = vec![];
    for row in rows(reader) {
        let (line, text) = row?;
        let mut tokens = text.split_whitespace();
        let (timestamp, image) = match (tokens.next(), tokens.next()) {
            (Some(ts), Some(image)) => (parse_number(OBJECT_MAP, line, ts)?, image.to_owned()),
            _ => {
                return Err(LocalizeError::malformed(
                    OBJECT_MAP,
                    line,
                    "expected a timestamp and an image name",
                ))
            }
        };

        let mut slots = vec![];
        for chunk in &tokens.chunks(3) {
            let mut slot: PointSlot = [None; 3];
            for (component, token) in slot.iter_mut().zip(chunk) {
                let value = parse_number(OBJECT_MAP, line, token)?;
                *component = Some(value).filter(|v| v.is_finite());
            }
            slots.push(slot);
        }
        debug!("object map line {}: {} at {} with {} slots", line, image, timestamp, slots.len());

        observations.push(ObjectObservation {
            timestamp,
            image,
            slots,
        });
    }

    if observations.is_empty() {
        return Err(LocalizeError::malformed(
            OBJECT_MAP,
            0,
            "empty object map; re-run the sequence",
        ));
    }
    Ok(observations)
}

pub fn read_trajectory<R: BufRead>(reader: R) -> Result<Vec<TrajectoryRow>> {
    let mut trajectory = vec![];
    for row in rows(reader) {
        let (line, text) = row?;
        let values = text
            .split_whitespace()
            .map(|token| parse_number(TRAJECTORY, line, token))
            .collect::<Result<Vec<_>>>()?;
        if values.len() != 13 {
            return Err(LocalizeError::malformed(
                TRAJECTORY,
                line,
                format!("expected 13 columns, found {}", values.len()),
            ));
        }

        let mut translation = [0.0; 3];
        translation.copy_from_slice(&values[1..4]);
        let mut rotation = [0.0; 9];
        rotation.copy_from_slice(&values[4..13]);

        trajectory.push(TrajectoryRow {
            timestamp: values[0],
            pose: CameraPose::from_row_major(translation, rotation),
        });
    }

    if trajectory.is_empty() {
        return Err(LocalizeError::malformed(
            TRAJECTORY,
            0,
            "empty keyframe trajectory; re-run the sequence",
        ));
    }
    Ok(trajectory)
}
