//! Native window showing a drawing.
//!
//! The drawing is copied into an owned [`Scene`] in canvas pixels and painted
//! with egui each frame, scaled to fit the window. Nothing is written to disk.

use crate::domain::drawing::Drawing;
use crate::ports::Viewer;
use anyhow::{anyhow, Result};
use eframe::egui::{
    self, vec2, Align2, Color32, Context, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2,
};

const EDGE_COLOR: Color32 = Color32::from_rgb(85, 85, 85);
const OUTLINE_COLOR: Color32 = Color32::from_rgb(51, 51, 51);
const FALLBACK_FILL: Color32 = Color32::from_rgb(211, 211, 211);
const ARROW_HEAD: f32 = 9.0;

/// Opens the drawing in a window titled with the drawing's title and blocks
/// until it is closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowViewer;

impl Viewer for WindowViewer {
    fn show(&self, drawing: &Drawing) -> Result<()> {
        let scene = Scene::from_drawing(drawing);
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(scene.title.clone())
                .with_inner_size([scene.size.x, scene.size.y]),
            ..Default::default()
        };

        tracing::info!(title = %scene.title, nodes = scene.nodes.len(), "opening window");
        eframe::run_native(
            "callview",
            options,
            Box::new(move |_cc| Ok(Box::new(CallGraphApp { scene }))),
        )
        .map_err(|e| anyhow!("Failed to open a window: {}", e))
    }
}

/// Owned copy of a drawing, positioned in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub title_pos: Pos2,
    pub size: Vec2,
    pub radius: f32,
    pub font_size: f32,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub label: String,
    pub detail: String,
    pub centre: Pos2,
    pub fill: Color32,
}

impl Scene {
    pub fn from_drawing(drawing: &Drawing) -> Self {
        let c = drawing.canvas;
        let nodes = drawing
            .placed_nodes()
            .into_iter()
            .map(|placed| {
                let p = drawing.project(placed.position);
                let fill = parse_color(placed.color).unwrap_or_else(|| {
                    tracing::debug!(color = placed.color, "unknown colour, using light gray");
                    FALLBACK_FILL
                });
                SceneNode {
                    label: placed.node.name.clone(),
                    detail: placed.node.describe(),
                    centre: Pos2::new(p.x as f32, p.y as f32),
                    fill,
                }
            })
            .collect();

        Self {
            title: drawing.title.clone(),
            title_pos: Pos2::new((c.width / 2.0) as f32, c.margin as f32),
            size: vec2(c.width as f32, c.height as f32),
            radius: c.node_radius as f32,
            font_size: c.font_size as f32,
            nodes,
            edges: drawing.edge_indices(),
        }
    }

    /// Uniform scale that fits the whole canvas inside `area`.
    pub fn fit(&self, area: Rect) -> f32 {
        (area.width() / self.size.x)
            .min(area.height() / self.size.y)
            .max(f32::EPSILON)
    }

    pub fn to_screen(&self, area: Rect, scale: f32, p: Pos2) -> Pos2 {
        area.center() + (p.to_vec2() - self.size / 2.0) * scale
    }

    pub fn to_canvas(&self, area: Rect, scale: f32, p: Pos2) -> Pos2 {
        (self.size / 2.0 + (p - area.center()) / scale).to_pos2()
    }

    /// Node whose circle contains `p` (canvas pixels), nearest first.
    pub fn node_at(&self, p: Pos2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (i, node.centre.distance(p)))
            .filter(|(_, d)| *d <= self.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Edge clipped to the two node circles. `None` for self-loops.
    pub fn edge_segment(&self, from: usize, to: usize) -> Option<(Pos2, Pos2)> {
        if from == to {
            return None;
        }
        let a = self.nodes.get(from)?.centre;
        let b = self.nodes.get(to)?.centre;
        let len = a.distance(b);
        if len <= 2.0 * self.radius {
            return Some((a, b));
        }
        let step = (b - a) / len * self.radius;
        Some((a + step, b - step))
    }
}

struct CallGraphApp {
    scene: Scene,
}

impl eframe::App for CallGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::WHITE))
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                let painter = ui.painter_at(rect);
                paint_scene(&painter, &self.scene, rect, response.hover_pos());
            });
    }
}

fn paint_scene(painter: &Painter, scene: &Scene, rect: Rect, pointer: Option<Pos2>) {
    let scale = scene.fit(rect);
    let screen = |p: Pos2| scene.to_screen(rect, scale, p);
    let radius = scene.radius * scale;
    let stroke = Stroke::new(1.2, EDGE_COLOR);

    for &(from, to) in &scene.edges {
        match scene.edge_segment(from, to) {
            Some((a, b)) => {
                let (a, b) = (screen(a), screen(b));
                painter.line_segment([a, b], stroke);
                paint_arrow_head(painter, a, b);
            }
            None => {
                if let Some(node) = scene.nodes.get(from) {
                    let centre = screen(node.centre);
                    painter.circle_stroke(centre - vec2(0.0, radius * 1.3), radius * 0.6, stroke);
                }
            }
        }
    }

    let label_font = FontId::proportional((scene.font_size * scale).max(6.0));
    for node in &scene.nodes {
        let centre = screen(node.centre);
        painter.circle(centre, radius, node.fill, Stroke::new(1.0, OUTLINE_COLOR));
        painter.text(
            centre,
            Align2::CENTER_CENTER,
            &node.label,
            label_font.clone(),
            Color32::BLACK,
        );
    }

    painter.text(
        screen(scene.title_pos),
        Align2::CENTER_BOTTOM,
        &scene.title,
        FontId::proportional((scene.font_size * 1.6 * scale).max(8.0)),
        Color32::BLACK,
    );

    let hovered = pointer.and_then(|p| scene.node_at(scene.to_canvas(rect, scale, p)));
    if let Some(index) = hovered {
        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            &scene.nodes[index].detail,
            FontId::proportional(13.0),
            Color32::from_gray(30),
        );
    }
}

fn paint_arrow_head(painter: &Painter, from: Pos2, to: Pos2) {
    let dir = (to - from).normalized();
    let back = to - dir * ARROW_HEAD;
    let side = dir.rot90() * (ARROW_HEAD * 0.45);
    painter.add(Shape::convex_polygon(
        vec![to, back + side, back - side],
        EDGE_COLOR,
        Stroke::NONE,
    ));
}

/// `#rgb`, `#rrggbb`, or one of the common named colours.
pub fn parse_color(name: &str) -> Option<Color32> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgb = match name.as_str() {
        "skyblue" => (135, 206, 235),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lightgreen" => (144, 238, 144),
        "blue" => (0, 0, 255),
        "lightblue" => (173, 216, 230),
        "steelblue" => (70, 130, 180),
        "orange" => (255, 165, 0),
        "yellow" => (255, 255, 0),
        "gold" => (255, 215, 0),
        "pink" => (255, 192, 203),
        "salmon" => (250, 128, 114),
        "tomato" => (255, 99, 71),
        "purple" => (128, 0, 128),
        "violet" => (238, 130, 238),
        "wheat" => (245, 222, 179),
        "khaki" => (240, 230, 140),
        _ => return None,
    };
    Some(Color32::from_rgb(rgb.0, rgb.1, rgb.2))
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color32::from_rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Color32::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}
