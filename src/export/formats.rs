//! Export format presets
//!
//! An [`ExportFormat`] names a file type together with its encoding
//! parameters. Each file type only supports a subset of color modes and bit
//! depths; [`ExportFormat::normalize`] pulls a preset back into that subset
//! whenever it is edited.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use image::codecs::bmp::BmpEncoder;
use image::codecs::hdr::HdrEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::tga::TgaEncoder;
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::FormatId;

/// Output file type
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    Bmp,
    #[default]
    Png,
    Jpeg,
    Jpeg2000,
    Targa,
    TargaRaw,
    Hdr,
    Tiff,
    Webp,
}

impl FileFormat {
    /// Canonical extension (with dot) appended to re-encoded images
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Bmp => ".bmp",
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Jpeg2000 => ".jp2",
            Self::Targa | Self::TargaRaw => ".tga",
            Self::Hdr => ".hdr",
            Self::Tiff => ".tiff",
            Self::Webp => ".webp",
        }
    }

    /// Color modes the file type can store
    #[must_use]
    pub const fn color_modes(self) -> &'static [ColorMode] {
        match self {
            Self::Bmp | Self::Jpeg | Self::Hdr => &[ColorMode::Bw, ColorMode::Rgb],
            _ => &[ColorMode::Bw, ColorMode::Rgb, ColorMode::Rgba],
        }
    }

    /// Bit depths the file type can store
    #[must_use]
    pub const fn color_depths(self) -> &'static [ColorDepth] {
        match self {
            Self::Png | Self::Tiff => &[ColorDepth::Eight, ColorDepth::Sixteen],
            Self::Jpeg2000 => &[ColorDepth::Eight, ColorDepth::Twelve, ColorDepth::Sixteen],
            Self::Hdr => &[ColorDepth::ThirtyTwo],
            _ => &[ColorDepth::Eight],
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bmp => "BMP",
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Jpeg2000 => "JPEG 2000",
            Self::Targa => "Targa",
            Self::TargaRaw => "Targa RAW",
            Self::Hdr => "Radiance HDR",
            Self::Tiff => "TIFF",
            Self::Webp => "WebP",
        };
        f.write_str(name)
    }
}

/// Channels written to the file
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorMode {
    Bw,
    Rgb,
    #[default]
    Rgba,
}

/// Bits per channel
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorDepth {
    #[value(name = "8")]
    #[serde(rename = "8")]
    Eight,
    #[value(name = "10")]
    #[serde(rename = "10")]
    Ten,
    #[value(name = "12")]
    #[serde(rename = "12")]
    Twelve,
    #[default]
    #[value(name = "16")]
    #[serde(rename = "16")]
    Sixteen,
    #[value(name = "32")]
    #[serde(rename = "32")]
    ThirtyTwo,
}

impl ColorDepth {
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Ten => 10,
            Self::Twelve => 12,
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }
}

/// TIFF compression scheme
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TiffCodec {
    #[default]
    None,
    Deflate,
    Lzw,
    PackBits,
}

/// JPEG 2000 container
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jpeg2kCodec {
    #[default]
    Jp2,
    J2k,
}

/// A named encoding preset
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportFormat {
    pub id: FormatId,
    pub name: String,
    pub file_format: FileFormat,
    pub color_mode: ColorMode,
    pub color_depth: ColorDepth,
    /// PNG compression, 0-100 percent
    pub compression: u8,
    /// Lossy quality, 0-100 percent
    pub quality: u8,
    pub tiff_codec: TiffCodec,
    pub jpeg2k_codec: Jpeg2kCodec,
    pub use_jpeg2k_cinema_preset: bool,
    pub use_jpeg2k_cinema_48: bool,
    pub use_jpeg2k_ycc: bool,
}

impl ExportFormat {
    /// Create a PNG preset with default settings
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FormatId::new(),
            name: name.into(),
            file_format: FileFormat::Png,
            color_mode: ColorMode::Rgba,
            color_depth: ColorDepth::Sixteen,
            compression: 0,
            quality: 50,
            tiff_codec: TiffCodec::None,
            jpeg2k_codec: Jpeg2kCodec::Jp2,
            use_jpeg2k_cinema_preset: false,
            use_jpeg2k_cinema_48: false,
            use_jpeg2k_ycc: false,
        }
    }

    /// Pull color mode, depth and percentages into the range the file type
    /// supports
    ///
    /// The TIFF encoder only writes uncompressed files, so the TIFF codec is
    /// pinned to [`TiffCodec::None`].
    pub fn normalize(&mut self) {
        self.tiff_codec = TiffCodec::None;

        let modes = self.file_format.color_modes();
        if !modes.contains(&self.color_mode) {
            self.color_mode = ColorMode::Rgb;
        }

        let depths = self.file_format.color_depths();
        if !depths.contains(&self.color_depth) {
            // closest supported depth that is not below the requested one
            self.color_depth = depths
                .iter()
                .copied()
                .find(|d| *d >= self.color_depth)
                .unwrap_or(depths[depths.len() - 1]);
        }

        self.compression = self.compression.min(100);
        self.quality = self.quality.min(100);
    }

    /// Output file name for an image stem
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.file_format.extension())
    }

    /// Encode `image` with this preset and write it to `path`
    ///
    /// # Errors
    ///
    /// Returns `ExportError::UnsupportedFormat` for file types without an
    /// encoder, `ExportError::Image` when encoding fails and `ExportError::Io`
    /// when the file cannot be created.
    pub fn encode(&self, image: &DynamicImage, path: &Path) -> Result<(), ExportError> {
        if self.file_format == FileFormat::Jpeg2000 {
            return Err(ExportError::UnsupportedFormat(self.file_format.to_string()));
        }

        let prepared = self.prepare(image);
        let mut writer = BufWriter::new(File::create(path)?);

        match self.file_format {
            FileFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut writer,
                    png_compression(self.compression),
                    FilterType::Adaptive,
                );
                prepared.write_with_encoder(encoder)?;
            }
            FileFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut writer, self.quality.max(1));
                prepared.write_with_encoder(encoder)?;
            }
            FileFormat::Bmp => {
                let encoder = BmpEncoder::new(&mut writer);
                prepared.write_with_encoder(encoder)?;
            }
            FileFormat::Targa => {
                prepared.write_with_encoder(TgaEncoder::new(&mut writer))?;
            }
            FileFormat::TargaRaw => {
                prepared.write_with_encoder(TgaEncoder::new(&mut writer).disable_rle())?;
            }
            FileFormat::Tiff => {
                prepared.write_with_encoder(TiffEncoder::new(&mut writer))?;
            }
            FileFormat::Hdr => {
                prepared.write_with_encoder(HdrEncoder::new(&mut writer))?;
            }
            FileFormat::Webp => {
                prepared.write_with_encoder(WebPEncoder::new_lossless(&mut writer))?;
            }
            FileFormat::Jpeg2000 => {
                return Err(ExportError::UnsupportedFormat(self.file_format.to_string()));
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Convert pixels into the layout the encoder expects
    fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let wide = self.color_depth >= ColorDepth::Sixteen;
        match (self.file_format, self.color_mode) {
            (FileFormat::Hdr, _) => DynamicImage::ImageRgb32F(image.to_rgb32f()),
            (FileFormat::Png | FileFormat::Tiff, ColorMode::Bw) if wide => {
                DynamicImage::ImageLuma16(image.to_luma16())
            }
            (FileFormat::Png | FileFormat::Tiff, ColorMode::Rgb) if wide => {
                DynamicImage::ImageRgb16(image.to_rgb16())
            }
            (FileFormat::Png | FileFormat::Tiff, ColorMode::Rgba) if wide => {
                DynamicImage::ImageRgba16(image.to_rgba16())
            }
            (FileFormat::Webp, ColorMode::Bw) => {
                DynamicImage::ImageRgb8(DynamicImage::ImageLuma8(image.to_luma8()).to_rgb8())
            }
            (_, ColorMode::Bw) => DynamicImage::ImageLuma8(image.to_luma8()),
            (_, ColorMode::Rgb) => DynamicImage::ImageRgb8(image.to_rgb8()),
            (_, ColorMode::Rgba) => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }
}

fn png_compression(percent: u8) -> CompressionType {
    match percent {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}
