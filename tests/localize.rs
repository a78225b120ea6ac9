use approx::assert_abs_diff_eq;
use signloc::io::{load_sequence, SequencePaths};
use signloc::map::{
    Annotations, BoundingBox, CameraPose, FrameStore, ObjectObservation, TrajectoryRow,
    VehiclePosition, VehicleTrack,
};
use signloc::num::{Matrix3, Vector3};
use signloc::settings::{Aggregation, KeyframePolicy, LocalizeSettings};
use signloc::utm;
use signloc::{LocalizeError, SequenceData, SignLocalizer};
use std::fs;

fn vehicle(image: &str, x: f64, y: f64) -> VehiclePosition {
    VehiclePosition {
        image: image.to_owned(),
        latitude: 0.0,
        longitude: 0.0,
        x,
        y,
    }
}

/// kf1 and kf2 are 10 m apart on the ground and 2 units apart in the map;
/// the sign is observed from kf3, which is at the same place as kf1.
fn scenario() -> SequenceData {
    let identity = |t: Vector3| CameraPose::new(Matrix3::identity(), t);
    let store = FrameStore::new(
        vec![
            TrajectoryRow {
                timestamp: 1.0,
                pose: identity(Vector3::zeros()),
            },
            TrajectoryRow {
                timestamp: 1.1,
                pose: identity(Vector3::new(0.0, 0.0, 2.0)),
            },
            TrajectoryRow {
                timestamp: 1.2,
                pose: identity(Vector3::new(0.0, 0.0, 2.0)),
            },
        ],
        vec![
            ObjectObservation {
                timestamp: 1.0,
                image: "kf1.jpg".to_owned(),
                slots: vec![],
            },
            ObjectObservation {
                timestamp: 1.1,
                image: "kf2.jpg".to_owned(),
                slots: vec![],
            },
            ObjectObservation {
                timestamp: 1.2,
                image: "kf3.jpg".to_owned(),
                slots: vec![
                    [Some(-1.0), Some(0.5), Some(9.0)],
                    [Some(1.0), Some(-0.5), Some(11.0)],
                    [Some(0.0), None, None],
                ],
            },
        ],
    )
    .unwrap();

    SequenceData {
        store,
        annotations: Annotations::new(vec![BoundingBox {
            frame: "kf3.jpg".to_owned(),
            sign_id: 7,
            x: 640,
            y: 300,
            width: 48,
            height: 52,
        }]),
        vehicles: VehicleTrack::new(vec![
            vehicle("kf1.jpg", 500_000.0, 3_700_000.0),
            vehicle("kf2.jpg", 500_010.0, 3_700_000.0),
            vehicle("kf3.jpg", 500_000.0, 3_700_000.0),
        ]),
    }
}

#[test]
fn end_to_end() {
    let fix = SignLocalizer::new(LocalizeSettings::default())
        .unwrap()
        .localize(&scenario())
        .unwrap();

    assert_eq!(fix.image, "kf3.jpg");
    assert_abs_diff_eq!(fix.scale.baseline_metric, 10.0);
    assert_abs_diff_eq!(fix.scale.baseline_slam, 2.0);
    assert_abs_diff_eq!(fix.scale.scale, 5.0);

    assert_abs_diff_eq!(fix.object_point.coords, Vector3::new(0.0, 0.0, 10.0));
    assert_abs_diff_eq!(fix.offset.0, Vector3::new(0.0, 0.0, 40.0), epsilon = 1e-12);

    assert_abs_diff_eq!(fix.utm.easting, 500_000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(fix.utm.northing, 3_700_040.0, epsilon = 1e-9);
    assert_eq!((fix.utm.zone_number, fix.utm.zone_letter), (16, 'S'));

    assert_abs_diff_eq!(fix.position.longitude, -87.0, epsilon = 1e-9);
    assert_abs_diff_eq!(fix.position.latitude, 33.439_755, epsilon = 1e-6);

    let back = utm::from_lat_lon(&fix.position, Some(16)).unwrap();
    assert_abs_diff_eq!(back.easting, fix.utm.easting, epsilon = 1e-3);
    assert_abs_diff_eq!(back.northing, fix.utm.northing, epsilon = 1e-3);

    assert_eq!(fix.bounding_box.unwrap().sign_id, 7);
}

#[test]
fn median_and_most_points() {
    let settings = LocalizeSettings {
        aggregation: Aggregation::Median,
        keyframe_policy: KeyframePolicy::MostPoints,
        ..LocalizeSettings::default()
    };
    let fix = SignLocalizer::new(settings)
        .unwrap()
        .localize(&scenario())
        .unwrap();
    assert_eq!(fix.image, "kf3.jpg");
    assert_abs_diff_eq!(fix.object_point.coords, Vector3::new(0.0, 0.0, 10.0));
}

#[test]
fn skewed_pose_aborts_the_run() {
    let mut data = scenario();
    let skewed = CameraPose::new(
        Matrix3::new(1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, 2.0),
    );
    let mut trajectory: Vec<TrajectoryRow> = data
        .store
        .keyframes()
        .iter()
        .map(|k| TrajectoryRow {
            timestamp: k.timestamp,
            pose: k.pose,
        })
        .collect();
    trajectory[2].pose = skewed;
    data.store = FrameStore::new(trajectory, data.store.observations().to_vec()).unwrap();

    let result = SignLocalizer::new(LocalizeSettings::default())
        .unwrap()
        .localize(&data);
    assert!(matches!(
        result,
        Err(LocalizeError::NonOrthonormalRotation { .. })
    ));
}

#[test]
fn loads_sequence_folder() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path();
    fs::write(
        folder.join("ObjectMap.txt"),
        "1.000000 kf1.jpg\n1.100000 kf2.jpg\n1.200000 kf3.jpg -1 0.5 9 1 -0.5 11 0\n",
    )
    .unwrap();
    fs::write(
        folder.join("KeyFrameTrajectory.txt"),
        "1.000000 0 0 0 1 0 0 0 1 0 0 0 1\n\
         1.100000 0 0 2 1 0 0 0 1 0 0 0 1\n\
         1.200000 0 0 2 1 0 0 0 1 0 0 0 1\n",
    )
    .unwrap();
    fs::write(
        folder.join("sign_annotations.json"),
        r#"{"output": {"frames": [{"frame_number": "kf3.jpg", "RoIs": "7,640,300,48,52"}]}}"#,
    )
    .unwrap();
    fs::write(
        folder.join("coords.csv"),
        "image_name,lat,lon,x,y\n\
         kf1.jpg,33.4,-87.0,500000.0,3700000.0\n\
         kf2.jpg,33.4,-87.0,500010.0,3700000.0\n\
         kf3.jpg,33.4,-87.0,500000.0,3700000.0\n",
    )
    .unwrap();

    let data = load_sequence(&SequencePaths::in_folder(folder), b',').unwrap();
    let fix = SignLocalizer::new(LocalizeSettings::default())
        .unwrap()
        .localize(&data)
        .unwrap();
    assert_abs_diff_eq!(fix.utm.northing, 3_700_040.0, epsilon = 1e-9);
    assert_abs_diff_eq!(fix.position.longitude, -87.0, epsilon = 1e-9);
}

#[test]
fn empty_object_map_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path();
    fs::write(folder.join("ObjectMap.txt"), "").unwrap();
    let result = load_sequence(&SequencePaths::in_folder(folder), b',');
    assert!(matches!(
        result,
        Err(LocalizeError::MalformedInput { .. })
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_sequence(&SequencePaths::in_folder(dir.path()), b',');
    assert!(matches!(result, Err(LocalizeError::Io(_))));
}
