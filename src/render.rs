use serde::{Deserialize, Serialize};

use crate::shots::ShotEvent;

pub const FULL_EMPHASIS: f64 = 1.0;
pub const REDUCED_EMPHASIS: f64 = 0.5;
pub const GOAL_DRAW_ORDER: u8 = 2;
pub const NO_GOAL_DRAW_ORDER: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    Goal,
    NoGoal,
}

/// Everything a drawing surface needs to place one shot marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRenderDescriptor {
    pub x: f64,
    pub y: f64,
    pub marker_size: f64,
    pub color_class: ColorClass,
    pub emphasis: f64,
    pub draw_order: u8,
}

/// The two shot-map presentations share one pipeline and differ only here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapVariant {
    /// Plain map: big markers, penalties kept, counts only.
    #[default]
    Plain,
    /// Dashboard: smaller markers, no penalties, full stat block.
    Annotated,
}

impl MapVariant {
    pub fn scale_factor(self) -> f64 {
        match self {
            MapVariant::Plain => 1000.0,
            MapVariant::Annotated => 300.0,
        }
    }

    pub fn excludes_penalties(self) -> bool {
        matches!(self, MapVariant::Annotated)
    }

    /// Whether the xG-per-shot and distance lines are part of the stat block.
    pub fn shows_extended_stats(self) -> bool {
        matches!(self, MapVariant::Annotated)
    }

    pub fn toggle(self) -> Self {
        match self {
            MapVariant::Plain => MapVariant::Annotated,
            MapVariant::Annotated => MapVariant::Plain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapVariant::Plain => "Plain",
            MapVariant::Annotated => "Annotated",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" | "basic" => Some(MapVariant::Plain),
            "annotated" | "dashboard" => Some(MapVariant::Annotated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub scale_factor: f64,
    pub reduced_emphasis: f64,
}

impl RenderConfig {
    pub fn for_variant(variant: MapVariant) -> Self {
        Self {
            scale_factor: variant.scale_factor(),
            reduced_emphasis: REDUCED_EMPHASIS,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::for_variant(MapVariant::default())
    }
}

pub fn describe_shot(shot: &ShotEvent, cfg: &RenderConfig) -> ShotRenderDescriptor {
    let (color_class, emphasis, draw_order) = if shot.is_goal() {
        (ColorClass::Goal, FULL_EMPHASIS, GOAL_DRAW_ORDER)
    } else {
        (ColorClass::NoGoal, cfg.reduced_emphasis, NO_GOAL_DRAW_ORDER)
    };
    ShotRenderDescriptor {
        x: shot.location.x,
        y: shot.location.y,
        marker_size: cfg.scale_factor * shot.expected_goals,
        color_class,
        emphasis,
        draw_order,
    }
}

pub fn describe_shots(rows: &[&ShotEvent], cfg: &RenderConfig) -> Vec<ShotRenderDescriptor> {
    rows.iter().map(|shot| describe_shot(shot, cfg)).collect()
}

/// Indices into `descriptors` in painting order: lower draw order first,
/// source order kept within a layer.
pub fn paint_order(descriptors: &[ShotRenderDescriptor]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..descriptors.len()).collect();
    idx.sort_by_key(|&i| descriptors[i].draw_order);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shots::PitchPoint;

    fn shot(outcome: &str, xg: f64) -> ShotEvent {
        ShotEvent {
            team: "Spain".to_string(),
            player: "Yamal".to_string(),
            location: PitchPoint::new(100.0, 40.0),
            shot_type: "Open Play".to_string(),
            shot_outcome: outcome.to_string(),
            expected_goals: xg,
        }
    }

    #[test]
    fn paint_order_puts_goals_last_and_is_stable() {
        let cfg = RenderConfig::default();
        let shots = [
            shot("Goal", 0.2),
            shot("Saved", 0.1),
            shot("Goal", 0.3),
            shot("Off T", 0.05),
        ];
        let refs: Vec<&ShotEvent> = shots.iter().collect();
        let descs = describe_shots(&refs, &cfg);
        assert_eq!(paint_order(&descs), vec![1, 3, 0, 2]);
    }

    #[test]
    fn variant_parse_and_toggle() {
        assert_eq!(MapVariant::parse(" Annotated "), Some(MapVariant::Annotated));
        assert_eq!(MapVariant::parse("plain"), Some(MapVariant::Plain));
        assert_eq!(MapVariant::parse("pie"), None);
        assert_eq!(MapVariant::Plain.toggle(), MapVariant::Annotated);
        assert!(MapVariant::Annotated.excludes_penalties());
        assert!(!MapVariant::Plain.excludes_penalties());
    }
}
