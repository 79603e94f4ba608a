pub mod services;

pub use services::{archive_recipe_image, presign_image, HttpImageSource, ImageSource};
