//! Declarative drawing model.
//!
//! A [`Scene`] is rebuilt from scratch on every tick. Hosts either paint it directly or
//! tween from the previously painted scene towards it (matching commands by key).
//! Scenes serialize (for logging and snapshots) but are never read back.

#[cfg(feature = "serde")]
use serde::Serialize;

/// CSS-style color string (`#rrggbb`, `#rgb`, or any named color the host understands).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Color(pub &'static str);

impl Color {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Parse `#rrggbb` or `#rgb` into channels.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some((r, g, b))
            }
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some((out[0], out[1], out[2]))
            }
            _ => None,
        }
    }
}

pub mod palette {
    use super::Color;

    pub const POINT: Color = Color("blue");
    pub const FIT: Color = Color("red");
    pub const RESIDUAL: Color = Color("orange");
    pub const AXIS: Color = Color("#555555");
    pub const LABEL: Color = Color("#333333");

    pub const NEURON: Color = Color("#69b3a2");
    pub const LINK: Color = Color("#999");
    pub const ACTIVE: Color = Color("orange");
    pub const GRADIENT: Color = Color("#ff4444");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Shape {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        size_px: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    /// Dash segment length; `None` for a solid stroke.
    pub dash: Option<f64>,
    pub opacity: f64,
}

impl Style {
    pub const fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            dash: None,
            opacity: 1.0,
        }
    }

    pub const fn stroked(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            dash: None,
            opacity: 1.0,
        }
    }

    pub const fn dashed(mut self, dash: f64) -> Self {
        self.dash = Some(dash);
        self
    }

    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DrawCommand {
    /// Stable identity across scenes, used to pair shapes when tweening.
    pub key: String,
    pub shape: Shape,
    pub style: Style,
    /// How long the host should take to move from the previous version of this shape.
    pub transition_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, shape: Shape, style: Style, transition_ms: u32) {
        self.commands.push(DrawCommand {
            key: key.into(),
            shape,
            style,
            transition_ms,
        });
    }

    pub fn get(&self, key: &str) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.key == key)
    }

    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.commands.iter().filter(move |c| c.key.starts_with(prefix))
    }

    /// Longest transition any command asks for.
    pub fn max_transition_ms(&self) -> u32 {
        self.commands
            .iter()
            .map(|c| c.transition_ms)
            .max()
            .unwrap_or(0)
    }

    /// Interpolate from `self` towards `target`, `elapsed_ms` after `target` was presented.
    ///
    /// Each target command progresses on its own `transition_ms`. Commands with no
    /// counterpart in `self` (or whose shape kind changed) appear at their target state;
    /// commands missing from `target` are dropped.
    pub fn tween(&self, target: &Scene, elapsed_ms: f64) -> Scene {
        let commands = target
            .commands
            .iter()
            .map(|to| {
                let t = if to.transition_ms == 0 {
                    1.0
                } else {
                    (elapsed_ms / to.transition_ms as f64).clamp(0.0, 1.0)
                };
                match self.get(&to.key) {
                    Some(from) if t < 1.0 => match lerp_shape(&from.shape, &to.shape, t) {
                        Some(shape) => DrawCommand {
                            key: to.key.clone(),
                            shape,
                            style: lerp_style(&from.style, &to.style, t),
                            transition_ms: to.transition_ms,
                        },
                        None => to.clone(),
                    },
                    _ => to.clone(),
                }
            })
            .collect();

        Scene {
            width: target.width,
            height: target.height,
            commands,
        }
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_shape(from: &Shape, to: &Shape, t: f64) -> Option<Shape> {
    match (from, to) {
        (
            Shape::Circle { cx, cy, r },
            Shape::Circle {
                cx: cx2,
                cy: cy2,
                r: r2,
            },
        ) => Some(Shape::Circle {
            cx: lerp(*cx, *cx2, t),
            cy: lerp(*cy, *cy2, t),
            r: lerp(*r, *r2, t),
        }),
        (
            Shape::Line { x1, y1, x2, y2 },
            Shape::Line {
                x1: a1,
                y1: b1,
                x2: a2,
                y2: b2,
            },
        ) => Some(Shape::Line {
            x1: lerp(*x1, *a1, t),
            y1: lerp(*y1, *b1, t),
            x2: lerp(*x2, *a2, t),
            y2: lerp(*y2, *b2, t),
        }),
        (Shape::Polyline { points: p0 }, Shape::Polyline { points: p1 }) if p0.len() == p1.len() => {
            Some(Shape::Polyline {
                points: p0
                    .iter()
                    .zip(p1)
                    .map(|(a, b)| (lerp(a.0, b.0, t), lerp(a.1, b.1, t)))
                    .collect(),
            })
        }
        (Shape::Text { .. }, Shape::Text { .. }) => Some(to.clone()),
        _ => None,
    }
}

fn lerp_style(from: &Style, to: &Style, t: f64) -> Style {
    Style {
        fill: lerp_color(from.fill, to.fill, t),
        stroke: lerp_color(from.stroke, to.stroke, t),
        stroke_width: lerp(from.stroke_width, to.stroke_width, t),
        dash: to.dash,
        opacity: lerp(from.opacity, to.opacity, t),
    }
}

// Colors snap at the halfway point; per-channel blending would need owned strings.
fn lerp_color(from: Option<Color>, to: Option<Color>, t: f64) -> Option<Color> {
    if t < 0.5 && from.is_some() {
        from
    } else {
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_scene(y: f64, ms: u32) -> Scene {
        let mut s = Scene::new(100.0, 100.0);
        s.push(
            "fit",
            Shape::Line {
                x1: 0.0,
                y1: y,
                x2: 100.0,
                y2: y,
            },
            Style::stroked(palette::FIT, 2.0),
            ms,
        );
        s
    }

    #[test]
    fn tween_interpolates_by_key() {
        let a = line_scene(0.0, 200);
        let b = line_scene(100.0, 200);

        let mid = a.tween(&b, 100.0);
        match &mid.get("fit").map(|c| &c.shape) {
            Some(Shape::Line { y1, y2, .. }) => {
                assert_eq!(*y1, 50.0);
                assert_eq!(*y2, 50.0);
            }
            other => panic!("unexpected shape {other:?}"),
        }

        assert_eq!(a.tween(&b, 0.0).get("fit"), a.get("fit"));
        assert_eq!(a.tween(&b, 500.0), b);
    }

    #[test]
    fn tween_without_transition_snaps() {
        let a = line_scene(0.0, 0);
        let b = line_scene(100.0, 0);
        assert_eq!(a.tween(&b, 0.0), b);
    }

    #[test]
    fn new_keys_appear_at_target() {
        let a = Scene::new(10.0, 10.0);
        let b = line_scene(5.0, 200);
        assert_eq!(a.tween(&b, 10.0), b);
    }

    #[test]
    fn color_parsing() {
        assert_eq!(Color("#69b3a2").rgb(), Some((0x69, 0xb3, 0xa2)));
        assert_eq!(Color("#999").rgb(), Some((0x99, 0x99, 0x99)));
        assert_eq!(Color("orange").rgb(), None);
    }

    #[test]
    fn max_transition() {
        let mut s = line_scene(0.0, 200);
        s.push(
            "p",
            Shape::Circle {
                cx: 1.0,
                cy: 1.0,
                r: 1.0,
            },
            Style::filled(palette::POINT),
            500,
        );
        assert_eq!(s.max_transition_ms(), 500);
        assert_eq!(Scene::default().max_transition_ms(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scene_serializes() {
        let json = line_scene(3.0, 200).to_json().unwrap();
        assert!(json.contains("\"key\":\"fit\""));
        assert!(json.contains("\"red\""));
    }
}
