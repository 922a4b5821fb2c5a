//! Data models for the Animal Spotter service.
//!
//! - `Animal`: a single sighting record from `GET /animals/{name}`
//! - `AnimalImage`: a decoded picture fetched from an animal's `imageURL`

pub mod animal;
pub mod image;

pub use animal::Animal;
pub use self::image::AnimalImage;
