// SPDX-License-Identifier: MIT OR Apache-2.0
//! The diagram canvas: drawing and mouse interaction.
//!
//! Storage nodes are drawn as a pair of horizontal lines, function nodes as
//! circles, input/output nodes as rectangles; edges are straight arrows
//! shortened at the target to make room for the arrowhead. Label children
//! synthesized by the dynamic-children transform are drawn centered on their
//! node or at their placement fraction along their edge, and double-click
//! opens an in-place editor for their text.

use crate::state::EditorState;
use crate::tools::{self, EdgeDraft, NodeKind, Tool};
use dfd_editor_model::{process_tree, tags, Element, Point, Size, TreeMode};
use egui::{Align2, Color32, FontId, Key, PointerButton, Pos2, Rect, Sense, Stroke, Vec2};

const GRID_SPACING: f32 = 20.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 4.0;
const EDGE_HIT_DISTANCE: f32 = 6.0;
const LABEL_FONT_SIZE: f32 = 12.0;

const GRID_COLOR: Color32 = Color32::from_gray(45);
const NODE_COLOR: Color32 = Color32::from_gray(220);
const SELECTED_COLOR: Color32 = Color32::from_rgb(0x4f, 0xa3, 0xff);
const DRAFT_COLOR: Color32 = Color32::from_gray(140);

/// What a primary-button drag is currently doing.
#[derive(Debug, Clone, Default)]
enum DragMode {
    #[default]
    Idle,
    Pan,
    MoveNode(String),
}

/// An in-place text edit of a node or edge label, started by double-click.
#[derive(Debug)]
struct LabelEdit {
    id: String,
    text: String,
}

/// Canvas widget state surviving between frames.
#[derive(Debug, Default)]
pub struct DiagramCanvas {
    pan: Vec2,
    drag: DragMode,
    editing: Option<LabelEdit>,
}

impl DiagramCanvas {
    /// Render the canvas and handle its input.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut EditorState,
        tool: &mut Tool,
        edge_draft: &mut EdgeDraft,
    ) {
        let canvas = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(canvas, Sense::click_and_drag());
        let painter = ui.painter_at(canvas);

        self.handle_input(ui, &response, canvas, state, tool, edge_draft);

        self.draw_grid(&painter, canvas);
        self.draw_edges(&painter, canvas, state);
        self.draw_nodes(&painter, canvas, state);
        self.draw_edge_draft(&painter, canvas, state, *tool, edge_draft, response.hover_pos());
        self.draw_tool_hint(&painter, canvas, *tool, edge_draft);
        self.edit_overlay(ui, canvas, state);
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        canvas: Rect,
        state: &mut EditorState,
        tool: &mut Tool,
        edge_draft: &mut EdgeDraft,
    ) {
        // Secondary/middle drag always pans.
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if response.drag_started_by(PointerButton::Primary) {
            self.drag = match (*tool, response.interact_pointer_pos()) {
                (Tool::Select, Some(pos)) => match self.hit_node(state, canvas, pos) {
                    Some(id) => DragMode::MoveNode(id),
                    None => DragMode::Pan,
                },
                _ => DragMode::Pan,
            };
        }
        if response.dragged_by(PointerButton::Primary) {
            let delta = response.drag_delta();
            let mut moved = false;
            match &self.drag {
                DragMode::MoveNode(id) => {
                    if let Some(position) = state
                        .document
                        .find_mut(id)
                        .and_then(|element| element.position.as_mut())
                    {
                        position.x += f64::from(delta.x);
                        position.y += f64::from(delta.y);
                        moved = delta != Vec2::ZERO;
                    }
                }
                DragMode::Pan => self.pan += delta,
                DragMode::Idle => {}
            }
            if moved {
                state.mark_dirty();
            }
        }
        if response.drag_stopped() {
            self.drag = DragMode::Idle;
        }

        if response.double_clicked() && *tool == Tool::Select {
            if let Some(pos) = response.interact_pointer_pos() {
                self.start_label_edit(state, canvas, pos);
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.handle_click(ui, canvas, pos, state, tool, edge_draft);
            }
        }
    }

    fn handle_click(
        &mut self,
        ui: &egui::Ui,
        canvas: Rect,
        pos: Pos2,
        state: &mut EditorState,
        tool: &mut Tool,
        edge_draft: &mut EdgeDraft,
    ) {
        match *tool {
            Tool::Select => {
                let hit = self.element_at(state, canvas, pos);
                let additive = ui.input(|i| i.modifiers.shift);
                match hit {
                    Some(id) => {
                        if additive && state.selection.contains(&id) {
                            state.selection.remove(&id);
                        } else {
                            if !additive {
                                state.selection.clear();
                            }
                            state.selection.insert(id);
                        }
                    }
                    None => state.selection.clear(),
                }
            }
            Tool::AddNode(kind) => {
                // Nodes are only created on the empty background, never on
                // top of an existing node or edge.
                if self.element_at(state, canvas, pos).is_none() {
                    let mut node = tools::make_node(kind, self.to_diagram(canvas, pos));
                    process_tree(&mut node, TreeMode::Expand, &state.registry);
                    let id = node.id.clone();
                    match state.document.add_child(node) {
                        Ok(()) => {
                            state.selection.clear();
                            state.selection.insert(id);
                            state.mark_dirty();
                            *tool = Tool::Select;
                        }
                        Err(error) => tracing::warn!(%error, "Could not add node"),
                    }
                }
            }
            Tool::AddEdge => {
                let Some(id) = self.hit_node(state, canvas, pos) else {
                    return;
                };
                if let Some((source, target)) = edge_draft.click(&id) {
                    let mut edge = tools::make_edge(&source, &target);
                    process_tree(&mut edge, TreeMode::Expand, &state.registry);
                    match state.document.add_child(edge) {
                        Ok(()) => {
                            state.mark_dirty();
                            *tool = Tool::Select;
                        }
                        Err(error) => tracing::warn!(%error, "Could not add edge"),
                    }
                }
            }
        }
    }

    fn origin(&self, canvas: Rect) -> Vec2 {
        canvas.min.to_vec2() + self.pan
    }

    fn to_screen(&self, canvas: Rect, point: Point) -> Pos2 {
        Pos2::new(point.x as f32, point.y as f32) + self.origin(canvas)
    }

    fn to_diagram(&self, canvas: Rect, pos: Pos2) -> Point {
        let local = pos - self.origin(canvas);
        Point {
            x: f64::from(local.x),
            y: f64::from(local.y),
        }
    }

    fn node_screen_rect(&self, canvas: Rect, element: &Element) -> Rect {
        let position = element.position.unwrap_or_default();
        let size = element.size.unwrap_or_else(|| fallback_size(&element.type_tag));
        Rect::from_min_size(
            self.to_screen(canvas, position),
            egui::vec2(size.width as f32, size.height as f32),
        )
    }

    fn hit_node(&self, state: &EditorState, canvas: Rect, pos: Pos2) -> Option<String> {
        // Later children draw on top, so hit-test in reverse order.
        state
            .document
            .root()
            .children
            .iter()
            .rev()
            .filter(|child| NodeKind::from_tag(&child.type_tag).is_some())
            .find(|child| self.node_screen_rect(canvas, child).contains(pos))
            .map(|child| child.id.clone())
    }

    fn hit_edge(&self, state: &EditorState, canvas: Rect, pos: Pos2) -> Option<String> {
        state
            .document
            .root()
            .children
            .iter()
            .rev()
            .filter(|child| child.source_id.is_some())
            .find_map(|edge| {
                let (from, to) = self.edge_endpoints(state, canvas, edge)?;
                (distance_to_segment(pos, from, to) <= EDGE_HIT_DISTANCE)
                    .then(|| edge.id.clone())
            })
    }

    /// The topmost node or edge at a screen position.
    fn element_at(&self, state: &EditorState, canvas: Rect, pos: Pos2) -> Option<String> {
        self.hit_node(state, canvas, pos)
            .or_else(|| self.hit_edge(state, canvas, pos))
    }

    fn start_label_edit(&mut self, state: &EditorState, canvas: Rect, pos: Pos2) {
        let Some(id) = self.element_at(state, canvas, pos) else {
            return;
        };
        let text = state
            .document
            .find(&id)
            .and_then(|element| {
                element
                    .label_child()
                    .and_then(|label| label.text.clone())
                    .or_else(|| element.text.clone())
            })
            .unwrap_or_default();
        self.editing = Some(LabelEdit { id, text });
    }

    /// Text editor floating over the element being renamed. Enter or a click
    /// elsewhere commits, Escape abandons.
    fn edit_overlay(&mut self, ui: &mut egui::Ui, canvas: Rect, state: &mut EditorState) {
        let Some(mut edit) = self.editing.take() else {
            return;
        };
        let Some(element) = state.document.find(&edit.id) else {
            return;
        };
        let rect = if element.source_id.is_some() {
            let Some((from, to)) = self.edge_endpoints(state, canvas, element) else {
                return;
            };
            Rect::from_center_size(from.lerp(to, 0.5), egui::vec2(120.0, 20.0))
        } else {
            let node_rect = self.node_screen_rect(canvas, element);
            Rect::from_center_size(node_rect.center(), egui::vec2(node_rect.width().max(100.0), 20.0))
        };

        let response = ui.put(rect, egui::TextEdit::singleline(&mut edit.text));
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            return;
        }
        if response.lost_focus() {
            if tools::set_label_text(&mut state.document, &edit.id, &edit.text) {
                state.mark_dirty();
            }
            return;
        }
        response.request_focus();
        self.editing = Some(edit);
    }

    fn edge_endpoints(
        &self,
        state: &EditorState,
        canvas: Rect,
        edge: &Element,
    ) -> Option<(Pos2, Pos2)> {
        let source = state.document.find(edge.source_id.as_deref()?)?;
        let target = state.document.find(edge.target_id.as_deref()?)?;
        let source_rect = self.node_screen_rect(canvas, source);
        let target_rect = self.node_screen_rect(canvas, target);
        Some((
            boundary_point(source_rect, target_rect.center()),
            boundary_point(target_rect, source_rect.center()),
        ))
    }

    fn draw_grid(&self, painter: &egui::Painter, canvas: Rect) {
        let stroke = Stroke::new(1.0, GRID_COLOR);

        let mut x = canvas.left() + self.pan.x.rem_euclid(GRID_SPACING);
        while x < canvas.right() {
            painter.line_segment(
                [Pos2::new(x, canvas.top()), Pos2::new(x, canvas.bottom())],
                stroke,
            );
            x += GRID_SPACING;
        }

        let mut y = canvas.top() + self.pan.y.rem_euclid(GRID_SPACING);
        while y < canvas.bottom() {
            painter.line_segment(
                [Pos2::new(canvas.left(), y), Pos2::new(canvas.right(), y)],
                stroke,
            );
            y += GRID_SPACING;
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, canvas: Rect, state: &EditorState) {
        for child in &state.document.root().children {
            if NodeKind::from_tag(&child.type_tag).is_none() {
                continue;
            }
            let rect = self.node_screen_rect(canvas, child);
            let selected = state.selection.contains(&child.id);
            let color = if selected { SELECTED_COLOR } else { NODE_COLOR };
            let stroke = Stroke::new(if selected { 2.0 } else { 1.0 }, color);

            match child.type_tag.as_str() {
                tags::STORAGE => {
                    // Click target between the two lines.
                    painter.rect_filled(rect, 0.0, Color32::from_white_alpha(2));
                    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
                    painter.line_segment([rect.left_bottom(), rect.right_bottom()], stroke);
                }
                tags::FUNCTION => {
                    let radius = rect.width().min(rect.height()) / 2.0;
                    painter.circle(rect.center(), radius, Color32::TRANSPARENT, stroke);
                }
                tags::INPUT_OUTPUT => {
                    painter.rect_stroke(rect, 0.0, stroke);
                }
                _ => {}
            }

            if let Some(text) = node_label_text(child) {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(LABEL_FONT_SIZE),
                    color,
                );
            }
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, canvas: Rect, state: &EditorState) {
        for child in &state.document.root().children {
            if child.source_id.is_none() {
                continue;
            }
            let Some((from, to)) = self.edge_endpoints(state, canvas, child) else {
                continue;
            };
            if (to - from).length() < 1.0 {
                continue;
            }
            let selected = state.selection.contains(&child.id);
            let color = if selected { SELECTED_COLOR } else { NODE_COLOR };
            let stroke = Stroke::new(if selected { 2.0 } else { 1.0 }, color);

            // Shorten the line so it doesn't overlap the arrowhead.
            let direction = (to - from).normalized();
            let base = to - direction * ARROW_LENGTH;
            painter.line_segment([from, base], stroke);
            let normal = Vec2::new(-direction.y, direction.x);
            painter.add(egui::Shape::convex_polygon(
                vec![
                    to,
                    base + normal * ARROW_HALF_WIDTH,
                    base - normal * ARROW_HALF_WIDTH,
                ],
                color,
                Stroke::NONE,
            ));

            if let Some(label) = child.label_child() {
                let text = label.text.as_deref().unwrap_or_default();
                if !text.is_empty() {
                    let fraction = label
                        .edge_placement
                        .map_or(0.5, |placement| placement.position as f32);
                    let at = from.lerp(to, fraction);
                    painter.text(
                        at - Vec2::new(0.0, 8.0),
                        Align2::CENTER_CENTER,
                        text,
                        FontId::proportional(LABEL_FONT_SIZE),
                        color,
                    );
                }
            }
        }
    }

    fn draw_edge_draft(
        &self,
        painter: &egui::Painter,
        canvas: Rect,
        state: &EditorState,
        tool: Tool,
        edge_draft: &EdgeDraft,
        hover: Option<Pos2>,
    ) {
        if tool != Tool::AddEdge {
            return;
        }
        let Some(source_id) = edge_draft.source() else {
            return;
        };
        let Some(source) = state.document.find(source_id) else {
            return;
        };
        let source_rect = self.node_screen_rect(canvas, source);
        painter.rect_stroke(source_rect.expand(3.0), 2.0, Stroke::new(1.0, DRAFT_COLOR));
        if let Some(pos) = hover {
            painter.line_segment(
                [boundary_point(source_rect, pos), pos],
                Stroke::new(1.0, DRAFT_COLOR),
            );
        }
    }

    fn draw_tool_hint(
        &self,
        painter: &egui::Painter,
        canvas: Rect,
        tool: Tool,
        edge_draft: &EdgeDraft,
    ) {
        let hint = match tool {
            Tool::Select => return,
            Tool::AddNode(kind) => format!("{}: click the canvas to place it", kind.display_name()),
            Tool::AddEdge if edge_draft.source().is_some() => {
                "Edge: click the target node".to_string()
            }
            Tool::AddEdge => "Edge: click the source node".to_string(),
        };
        painter.text(
            canvas.left_bottom() + Vec2::new(8.0, -8.0),
            Align2::LEFT_BOTTOM,
            hint,
            FontId::proportional(LABEL_FONT_SIZE),
            DRAFT_COLOR,
        );
    }
}

/// Text shown for a node: its derived label child when expanded, otherwise
/// the node's own text.
fn node_label_text(element: &Element) -> Option<&str> {
    element
        .label_child()
        .and_then(|label| label.text.as_deref())
        .or(element.text.as_deref())
        .filter(|text| !text.is_empty())
}

/// Size used for nodes that were saved without one.
fn fallback_size(tag: &str) -> Size {
    NodeKind::from_tag(tag).map_or(
        Size {
            width: 60.0,
            height: 30.0,
        },
        NodeKind::default_size,
    )
}

/// Point where the segment from the rect center toward `toward` exits the
/// rect.
fn boundary_point(rect: Rect, toward: Pos2) -> Pos2 {
    let center = rect.center();
    let d = toward - center;
    let half = rect.size() / 2.0;
    let tx = if d.x.abs() < f32::EPSILON {
        f32::INFINITY
    } else {
        half.x / d.x.abs()
    };
    let ty = if d.y.abs() < f32::EPSILON {
        f32::INFINITY
    } else {
        half.y / d.y.abs()
    };
    let t = tx.min(ty).min(1.0);
    center + d * t
}

/// Distance from a point to a line segment.
fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}
