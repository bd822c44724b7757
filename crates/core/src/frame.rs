//! Renderer-facing snapshots of one displayed level.

use serde::Serialize;

use crate::color::{ColorFn, ColorToken};
use crate::human::human_value;
use crate::label::LabelCuller;
use crate::layout::LayoutEngine;
use crate::model::{NodeId, Tree};
use crate::treemap::Rect;
use crate::zoom::TransitionHandle;

/// Vertical shift from a tile's center to its label baseline.
pub const LABEL_BASELINE_SHIFT: f64 = 4.0;

/// Maps the zoom node's absolute rectangle onto the display area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub domain: Rect,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn project(&self, r: &Rect) -> Rect {
        let sx = if self.domain.w > 0.0 { self.width / self.domain.w } else { 0.0 };
        let sy = if self.domain.h > 0.0 { self.height / self.domain.h } else { 0.0 };
        Rect {
            x: (r.x - self.domain.x) * sx,
            y: (r.y - self.domain.y) * sy,
            w: r.w * sx,
            h: r.h * sy,
        }
    }

    pub fn lerp(&self, to: &Viewport, t: f64) -> Viewport {
        Viewport {
            domain: self.domain.lerp(&to.domain, t),
            width: self.width + (to.width - self.width) * t,
            height: self.height + (to.height - self.height) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Has children; clicking zooms in.
    Group,
    /// A leaf; clicking may drill down to its table row.
    Terminal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    pub id: NodeId,
    pub rect: Rect,
    pub screen: Rect,
    pub color: ColorToken,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub id: NodeId,
    pub name: String,
    pub value: f64,
    pub value_text: String,
    pub kind: TileKind,
    pub rect: Rect,
    pub screen: Rect,
    pub color: ColorToken,
    /// Grandchildren of the zoom node for groups, the tile itself otherwise.
    pub cells: Vec<Cell>,
    pub label: Label,
    /// External table row for terminal tiles.
    pub row: Option<usize>,
}

fn anchor(screen: &Rect) -> (f64, f64) {
    (
        screen.x + screen.w / 2.0,
        screen.y + screen.h / 2.0 + LABEL_BASELINE_SHIFT,
    )
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub node: NodeId,
    pub breadcrumb: String,
    /// Where the breadcrumb leads; `None` at the root.
    pub parent: Option<NodeId>,
    pub viewport: Viewport,
    pub tiles: Vec<Tile>,
}

impl Frame {
    pub fn build(
        tree: &Tree,
        engine: &LayoutEngine,
        node: NodeId,
        color: &ColorFn,
        culler: &LabelCuller,
    ) -> Frame {
        let bounds = engine.bounds_of(tree, node);
        let layout = engine.layout(tree, node, bounds);
        let viewport = Viewport {
            domain: bounds,
            width: engine.bounds().w,
            height: engine.bounds().h,
        };

        let tiles = layout
            .children_of(node)
            .map(|id| {
                let n = tree.node(id);
                let rect = layout.rect(id).unwrap_or_default();
                let screen = viewport.project(&rect);
                let value = n.value().unwrap_or(f64::NAN);
                let fill = color(value);
                let (kind, cells) = if n.is_leaf() {
                    let cell = Cell {
                        id,
                        rect,
                        screen,
                        color: fill.clone(),
                    };
                    (TileKind::Terminal, vec![cell])
                } else {
                    let cells = layout
                        .children_of(id)
                        .map(|c| {
                            let r = layout.rect(c).unwrap_or_default();
                            Cell {
                                id: c,
                                rect: r,
                                screen: viewport.project(&r),
                                color: fill.clone(),
                            }
                        })
                        .collect();
                    (TileKind::Group, cells)
                };
                let (x, y) = anchor(&screen);
                Tile {
                    id,
                    name: n.name.clone(),
                    value,
                    value_text: human_value(value),
                    kind,
                    rect,
                    screen,
                    color: fill,
                    cells,
                    label: Label {
                        text: n.name.clone(),
                        x,
                        y,
                        visible: culler.visible(&n.name, &screen),
                    },
                    row: n.index(),
                }
            })
            .collect();

        Frame {
            node,
            breadcrumb: tree.path_name(node),
            parent: tree.parent(node),
            viewport,
            tiles,
        }
    }

    /// The same tiles seen through another viewport. Label visibility is
    /// kept as it was.
    pub fn reproject(&self, viewport: &Viewport) -> Frame {
        let mut out = self.clone();
        out.viewport = *viewport;
        for tile in &mut out.tiles {
            tile.screen = viewport.project(&tile.rect);
            (tile.label.x, tile.label.y) = anchor(&tile.screen);
            for cell in &mut tile.cells {
                cell.screen = viewport.project(&cell.rect);
            }
        }
        out
    }

    pub fn tile(&self, id: NodeId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Tile under a point in display coordinates.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tiles
            .iter()
            .find(|t| x >= t.screen.x && x < t.screen.right() && y >= t.screen.y && y < t.screen.bottom())
    }
}

/// Two-phase level change handed to the renderer.
///
/// Both frames describe the end state: `exiting` is the old level projected
/// through the new viewport, to be faded out and discarded; `entering` is the
/// new level, to be faded in. Interpolate geometry with
/// [`Transition::viewport_at`] and call `handle.finish()` when done.
#[derive(Debug)]
pub struct Transition {
    pub exiting: Frame,
    pub entering: Frame,
    pub from: Viewport,
    pub to: Viewport,
    pub handle: TransitionHandle,
}

impl Transition {
    pub fn viewport_at(&self, t: f64) -> Viewport {
        self.from.lerp(&self.to, t.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_domain_to_display() {
        let v = Viewport {
            domain: Rect::new(100.0, 50.0, 200.0, 100.0),
            width: 1000.0,
            height: 500.0,
        };
        let r = v.project(&Rect::new(150.0, 75.0, 50.0, 25.0));
        assert_eq!(r, Rect::new(250.0, 125.0, 250.0, 125.0));
        assert_eq!(v.project(&v.domain), Rect::new(0.0, 0.0, 1000.0, 500.0));
    }

    #[test]
    fn viewport_lerp_endpoints() {
        let a = Viewport {
            domain: Rect::new(0.0, 0.0, 100.0, 100.0),
            width: 100.0,
            height: 100.0,
        };
        let b = Viewport {
            domain: Rect::new(50.0, 50.0, 50.0, 50.0),
            ..a
        };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).domain, Rect::new(25.0, 25.0, 75.0, 75.0));
    }

    #[test]
    fn degenerate_domain_does_not_divide_by_zero() {
        let v = Viewport {
            domain: Rect::new(0.0, 0.0, 0.0, 0.0),
            width: 10.0,
            height: 10.0,
        };
        let r = v.project(&Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(r.w.is_finite() && r.h.is_finite());
    }
}
