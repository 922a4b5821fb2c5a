use image::{DynamicImage, ImageFormat};

/// A picture decoded from the raw bytes at an animal's image URL.
#[derive(Debug, Clone)]
pub struct AnimalImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

impl AnimalImage {
    /// Sniff the format from the leading bytes and decode.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self { image, format })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn into_inner(self) -> DynamicImage {
        self.image
    }
}
