pub mod compensation;
pub mod rotation_matrix;

pub use compensation::compensate_heading;
pub use rotation_matrix::{
    InclinationMatrix, Orientation, RotationMatrix, rotation_matrix_from_vectors,
};
