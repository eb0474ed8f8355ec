pub mod cleanup;
pub mod intersection;
pub mod offset;
pub mod solid;
pub mod tolerance;
pub mod validate;
