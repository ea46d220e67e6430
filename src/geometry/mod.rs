mod point_cloud;

pub use point_cloud::{random_cloud, read_points_json};
