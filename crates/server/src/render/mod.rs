pub mod landing;

pub use landing::{group_skills, render_landing, LandingData};
