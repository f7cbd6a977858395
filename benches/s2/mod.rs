pub mod advance;
pub mod from_face_ij;
pub mod from_point;
pub mod to_face_ij;
pub mod to_token;
