pub type Number = f64;

pub type Point3 = nalgebra::Point3<Number>;

pub type Vector2 = nalgebra::Vector2<Number>;
pub type Vector3 = nalgebra::Vector3<Number>;

pub type Matrix3 = nalgebra::Matrix3<Number>;

/// A 3D map point slot as recorded by the SLAM run; any component may be missing.
pub type PointSlot = [Option<Number>; 3];
