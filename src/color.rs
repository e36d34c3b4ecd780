use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Hues start at 30° so the first colour stays clear of pure red.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 30.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Drivetrain → Color32
// ---------------------------------------------------------------------------

pub const RWD_COLOR: Color32 = Color32::from_rgb(255, 0, 0);
pub const AWD_COLOR: Color32 = Color32::from_rgb(0, 100, 255);
pub const FWD_COLOR: Color32 = Color32::from_rgb(0, 255, 0);

fn fixed_color(drivetrain: &str) -> Option<Color32> {
    match drivetrain {
        "RWD" => Some(RWD_COLOR),
        "AWD" => Some(AWD_COLOR),
        "FWD" => Some(FWD_COLOR),
        _ => None,
    }
}

/// Maps drivetrains to marker colours. RWD/AWD/FWD have fixed colours;
/// anything else found in the data gets a generated one.
#[derive(Debug, Clone)]
pub struct DrivetrainColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl DrivetrainColors {
    pub fn new(drivetrains: &BTreeSet<String>) -> Self {
        let unknown: Vec<&String> = drivetrains
            .iter()
            .filter(|d| fixed_color(d).is_none())
            .collect();
        let generated = generate_palette(unknown.len());

        let mut mapping: BTreeMap<String, Color32> = drivetrains
            .iter()
            .filter_map(|d| fixed_color(d).map(|c| (d.clone(), c)))
            .collect();
        mapping.extend(unknown.into_iter().cloned().zip(generated));

        DrivetrainColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a drivetrain.
    pub fn color_for(&self, drivetrain: &str) -> Color32 {
        fixed_color(drivetrain)
            .or_else(|| self.mapping.get(drivetrain).copied())
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_and_distinctness() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn known_drivetrains_keep_fixed_colours() {
        let set: BTreeSet<String> = ["AWD", "RWD", "4WD"].iter().map(|s| s.to_string()).collect();
        let colors = DrivetrainColors::new(&set);
        assert_eq!(colors.color_for("RWD"), RWD_COLOR);
        assert_eq!(colors.color_for("AWD"), AWD_COLOR);
        assert_eq!(colors.color_for("FWD"), FWD_COLOR);
        let four = colors.color_for("4WD");
        assert_ne!(four, Color32::GRAY);
        assert_ne!(four, RWD_COLOR);
        assert_eq!(colors.color_for("6WD"), Color32::GRAY);
    }
}
