//! 2D textures decoded from image files.

use std::path::Path;

use glow::{HasContext, PixelUnpackData};
use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::error::{ResourceError, TextureError};

/// An uploaded RGBA texture with mipmaps.
pub struct Texture {
    texture: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decode the image at `path` and upload it.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or the texture object
    /// cannot be created.
    pub unsafe fn load(gl: &glow::Context, path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = gl_pixels(image);
        debug!(
            "decoded {} ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );
        unsafe { Self::from_rgba(gl, &pixels) }
    }

    /// Upload already decoded pixels, first row at the bottom.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is too large or the texture object
    /// cannot be created.
    pub unsafe fn from_rgba(gl: &glow::Context, pixels: &RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = pixels.dimensions();
        let too_large = || TextureError::TooLarge { width, height };
        let w = i32::try_from(width).map_err(|_| too_large())?;
        let h = i32::try_from(height).map_err(|_| too_large())?;

        let texture = unsafe { gl.create_texture() }.map_err(ResourceError::of("texture"))?;
        // GL enum values are small enough that the casts never wrap.
        #[expect(clippy::cast_possible_wrap)]
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                w,
                h,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels.as_raw())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(Self {
            texture,
            width,
            height,
        })
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bind to texture unit `unit` (`GL_TEXTURE0 + unit`).
    ///
    /// # Safety
    ///
    /// Requires the context the texture was created with to be current.
    pub unsafe fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }

    /// Release the texture object.
    ///
    /// # Safety
    ///
    /// Must be called once, with the context the texture was created with.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { gl.delete_texture(self.texture) };
    }
}

/// Convert to tightly packed RGBA8 with rows flipped to GL's bottom-up order.
fn gl_pixels(image: DynamicImage) -> RgbaImage {
    image.flipv().into_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn gl_pixels_flips_rows() {
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));

        let pixels = gl_pixels(DynamicImage::ImageRgb8(img));

        assert_eq!(*pixels.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*pixels.get_pixel(0, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn gl_pixels_are_tightly_packed_rgba() {
        let img = DynamicImage::new_rgb8(3, 5);
        let pixels = gl_pixels(img);
        assert_eq!(pixels.as_raw().len(), 3 * 5 * 4);
    }

    #[test]
    fn bundled_textures_decode() {
        for name in ["container.png", "awesomeface.png"] {
            let path = crate::config::texture_path(name);
            let image = image::open(&path).map_err(|e| format!("{}: {e}", path.display()));
            assert!(image.is_ok(), "{image:?}");
        }
    }
}
