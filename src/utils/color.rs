use crate::report::RiskLevel;
use crate::upload::ProcessingStatus;
use eframe::egui::Color32;

pub const PURPLE: &str = "#A159E1";
pub const RED: &str = "#DC2626";
pub const ORANGE: &str = "#EA580C";
pub const GREEN: &str = "#16A34A";
pub const BLUE: &str = "#3B82F6";
pub const YELLOW: &str = "#EAB308";
pub const GRAY: &str = "#9CA3AF";

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

pub fn palette(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}

pub fn risk_color(level: &RiskLevel) -> Color32 {
    palette(match level {
        RiskLevel::High => RED,
        RiskLevel::Medium => ORANGE,
        RiskLevel::Low => GREEN,
        RiskLevel::Unrecognized(_) => GRAY,
    })
}

pub fn status_color(status: ProcessingStatus) -> Color32 {
    palette(match status {
        ProcessingStatus::Pending => BLUE,
        ProcessingStatus::Completed => GREEN,
        ProcessingStatus::Error => RED,
        ProcessingStatus::Cancelled => GRAY,
        _ => YELLOW,
    })
}
