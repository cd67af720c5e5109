//! Integration tests for the filmic crates.
//!
//! This crate contains end-to-end scenarios that exercise mask, wavelet
//! reconstruction and tone mapping together, plus the preset format a host
//! would store parameters in.
//!
//! The scene generators are public so scenarios can be reproduced outside
//! the test harness.

use filmic_core::RgbaImage;
use filmic_ops::FilmicParams;
use serde::{Deserialize, Serialize};

/// Named parameter set, as a host would save it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name.
    pub name: String,
    /// Parameters; missing fields take their defaults.
    #[serde(default)]
    pub params: FilmicParams,
}

impl Preset {
    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Parses YAML.
    pub fn from_yaml(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}

/// Neutral pixel whose Euclidean norm is `norm`.
pub fn neutral(norm: f32) -> [f32; 4] {
    let c = norm / 3f32.sqrt();
    [c, c, c, 1.0]
}

/// Flat background of Euclidean norm `background` with a centered square
/// of side `block` at norm `highlight`.
pub fn clipped_block(size: u32, block: u32, background: f32, highlight: f32) -> RgbaImage {
    let mut img = RgbaImage::filled(size, size, neutral(background));
    let start = (size - block) / 2;
    for y in start..start + block {
        for x in start..start + block {
            img.set_pixel(x, y, neutral(highlight));
        }
    }
    img
}

/// Euclidean norm of the RGB part of a pixel.
pub fn rgb_norm(px: [f32; 4]) -> f32 {
    (px[0] * px[0] + px[1] * px[1] + px[2] * px[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use filmic_color::{NormMethod, WorkingProfile};
    use filmic_core::Roi;
    use filmic_ops::autotune::{RegionStats, autotune};
    use filmic_ops::mask::ClipMask;
    use filmic_ops::tonemap::tone_map;
    use filmic_ops::wavelets::{RgbDomain, reconstruct_highlights, wavelet_scales};
    use filmic_ops::{ColorScience, CurveOrder, FilmicData, ProcessOptions, process};

    const SIZE: u32 = 48;
    const BLOCK: u32 = 5;

    /// 48x48 tile of a 256x256 image: four wavelet scales.
    fn tile() -> Roi {
        Roi::tile(SIZE, SIZE, 1.0, 256, 256)
    }

    fn block_pixels() -> impl Iterator<Item = (u32, u32)> {
        let start = (SIZE - BLOCK) / 2;
        (start..start + BLOCK).flat_map(move |y| (start..start + BLOCK).map(move |x| (x, y)))
    }

    /// Default parameters, grey pixel in, display grey out.
    #[test]
    fn test_grey_node_end_to_end() {
        let data = FilmicData::commit(&FilmicParams::default());
        let input = RgbaImage::filled(16, 16, [0.1845, 0.1845, 0.1845, 1.0]);
        let out = process(&data, &input, &Roi::new(16, 16), None, &ProcessOptions::default()).unwrap();

        let norm = filmic_color::power_norm({
            let px = out.pixel(7, 7);
            [px[0], px[1], px[2]]
        });
        assert_relative_eq!(norm, 0.1845, max_relative = 5e-4);
    }

    #[test]
    fn test_grey_node_with_profile() {
        let data = FilmicData::commit(&FilmicParams {
            preserve_color: NormMethod::Luminance,
            ..Default::default()
        });
        let profile = WorkingProfile::rec2020();
        let input = RgbaImage::filled(8, 8, [0.1845, 0.1845, 0.1845, 1.0]);
        let out = process(&data, &input, &Roi::new(8, 8), Some(&profile), &ProcessOptions::default()).unwrap();
        for &v in &out.pixel(3, 3)[..3] {
            assert!((v - 0.1845).abs() < 5e-4);
        }
    }

    #[test]
    fn test_highlight_reconstruction_converges() {
        let data = FilmicData::commit(&FilmicParams::default());
        let img = clipped_block(SIZE, BLOCK, 0.5, 10.0);
        let roi = tile();
        assert_eq!(wavelet_scales(&roi), 4);

        let mask = ClipMask::compute(&img, data.reconstruct_threshold, data.reconstruct_feather).unwrap();
        assert!(mask.needs_reconstruction());

        let rec = reconstruct_highlights::<RgbDomain>(
            &img,
            &mask.mask,
            &data.reconstruct_weights,
            wavelet_scales(&roi),
            None,
        )
        .unwrap();

        for (x, y) in block_pixels() {
            let n = rgb_norm(rec.pixel(x, y));
            assert!(n.is_finite());
            assert!(n < 10.0, "({x}, {y}) norm {n}");
            assert!(n > 0.5);
        }
        // background far from the block is untouched
        assert_relative_eq!(rgb_norm(rec.pixel(0, 0)), 0.5, max_relative = 1e-3);

        let out = tone_map(&data, None, &rec).unwrap();
        for (x, y) in block_pixels() {
            let px = out.pixel(x, y);
            assert!(px[..3].iter().all(|v| v.is_finite() && *v <= 1.0 && *v >= 0.0));
        }
    }

    #[test]
    fn test_high_quality_pass_end_to_end() {
        let params = FilmicParams {
            high_quality_reconstruction: true,
            ..Default::default()
        };
        let data = FilmicData::commit(&params);
        let img = clipped_block(SIZE, BLOCK, 0.5, 10.0);
        let out = process(&data, &img, &tile(), None, &ProcessOptions::default()).unwrap();

        assert!(out.data().iter().all(|v| v.is_finite()));
        for (x, y) in block_pixels() {
            assert!(out.pixel(x, y)[..3].iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_every_kernel_renders_clipped_scene() {
        let img = clipped_block(SIZE, BLOCK, 0.5, 10.0);
        for method in [NormMethod::None, NormMethod::MaxRgb, NormMethod::Luminance, NormMethod::PowerNorm] {
            for version in [ColorScience::V1, ColorScience::V2] {
                let data = FilmicData::commit(&FilmicParams {
                    preserve_color: method,
                    version,
                    ..Default::default()
                });
                let out = process(&data, &img, &tile(), None, &ProcessOptions::default()).unwrap();
                assert!(
                    out.data().iter().all(|v| v.is_finite()),
                    "{method} {version:?} produced non-finite output"
                );
            }
        }
    }

    #[test]
    fn test_autotune_then_render() {
        let img = clipped_block(SIZE, BLOCK, 0.05, 4.0);
        let mut params = FilmicParams::default();
        autotune(&mut params, &RegionStats::from_image(&img), None);
        assert!(params.white_point_source > 0.0);
        assert!(params.black_point_source < 0.0);

        let data = FilmicData::commit(&params);
        let out = process(&data, &img, &tile(), None, &ProcessOptions::default()).unwrap();
        assert!(out.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_preset_yaml_round_trip() {
        let preset = Preset {
            name: "soft highlights".into(),
            params: FilmicParams {
                highlights: CurveOrder::Poly3,
                preserve_color: NormMethod::MaxRgb,
                version: ColorScience::V1,
                white_point_source: 5.2,
                ..Default::default()
            },
        };
        let yaml = preset.to_yaml().unwrap();
        assert!(yaml.contains("max_rgb"));
        assert_eq!(Preset::from_yaml(&yaml).unwrap(), preset);
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let yaml = "name: punchy\nparams:\n  contrast: 1.6\n  preserve_color: luminance\n";
        let preset = Preset::from_yaml(yaml).unwrap();
        assert_eq!(preset.params.contrast, 1.6);
        assert_eq!(preset.params.preserve_color, NormMethod::Luminance);
        assert_eq!(preset.params.latitude, FilmicParams::default().latitude);

        let bare = Preset::from_yaml("name: empty\n").unwrap();
        assert_eq!(bare.params, FilmicParams::default());
    }

    #[test]
    fn test_bad_preset_is_an_error() {
        assert!(Preset::from_yaml("name: x\nparams:\n  preserve_color: rainbow\n").is_err());
    }
}
