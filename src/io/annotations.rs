use crate::error::{LocalizeError, Result};
use crate::map::{Annotations, BoundingBox};

use itertools::Itertools;
use serde::Deserialize;
use std::io::Read;

const SOURCE: &str = "annotations";

#[derive(Deserialize)]
struct AnnotationFile {
    output: AnnotationOutput,
}

#[derive(Deserialize)]
struct AnnotationOutput {
    frames: Vec<AnnotatedFrame>,
}

#[derive(Deserialize)]
struct AnnotatedFrame {
    frame_number: String,
    /// `"<sign id>,<x>,<y>,<width>,<height>"`
    #[serde(rename = "RoIs")]
    rois: String,
}

fn parse_rois(frame: &AnnotatedFrame, index: usize) -> Result<BoundingBox> {
    let fields = frame
        .rois
        .split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<i32>().map_err(|_| {
                LocalizeError::malformed(
                    SOURCE,
                    index + 1,
                    format!("RoIs field {:?} of {} is not an integer", field, frame.frame_number),
                )
            })
        })
        .take(5)
        .collect::<Result<Vec<_>>>()?;

    match fields.as_slice() {
        &[sign_id, x, y, width, height] => Ok(BoundingBox {
            frame: frame.frame_number.clone(),
            sign_id,
            x,
            y,
            width,
            height,
        }),
        _ => Err(LocalizeError::malformed(
            SOURCE,
            index + 1,
            format!("RoIs of {} has {} of 5 fields", frame.frame_number, fields.len()),
        )),
    }
}

/// Reads `{"output": {"frames": [{"frame_number", "RoIs"}, ..]}}`.
///
/// Line numbers in errors count frames, not text lines.
pub fn read_annotations<R: Read>(reader: R) -> Result<Annotations> {
    let file: AnnotationFile = serde_json::from_reader(reader)
        .map_err(|e| LocalizeError::malformed(SOURCE, e.line(), e.to_string()))?;
    let boxes = file
        .output
        .frames
        .iter()
        .enumerate()
        .map(|(i, frame)| parse_rois(frame, i))
        .collect::<Result<Vec<_>>>()?;
    log::debug!(
        "annotated frames: {}",
        boxes.iter().map(|b| b.frame.as_str()).join(", ")
    );
    Ok(Annotations::new(boxes))
}
