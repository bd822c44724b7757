use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const UNIT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Map a rectangle expressed in this rectangle's unit space to absolute
    /// coordinates.
    pub fn scale_local(&self, local: Rect) -> Rect {
        Rect {
            x: self.x + local.x * self.w,
            y: self.y + local.y * self.h,
            w: local.w * self.w,
            h: local.h * self.h,
        }
    }

    pub fn contains_rect(&self, other: &Rect, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }

    /// Area shared with `other`; zero for touching edges.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    pub fn lerp(&self, to: &Rect, t: f64) -> Rect {
        Rect {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            w: self.w + (to.w - self.w) * t,
            h: self.h + (to.h - self.h) * t,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TreemapItem {
    pub id: NodeId,
    pub weight: f64,
    pub rect: Rect,
}

/// Squarified tiling (Bruls, Huizing, van Wijk) as formulated by d3 v3.
///
/// Items come back sorted by ascending weight with ties in input order. The
/// largest items are placed first, each run of items becoming a strip along
/// the shorter side of the space left over. `ratio` biases the target aspect
/// (1.0 aims for squares). Coordinates are not rounded.
pub fn squarify(weights: &[(NodeId, f64)], area: Rect, ratio: f64) -> Vec<TreemapItem> {
    let mut items: Vec<TreemapItem> = weights
        .iter()
        .map(|&(id, w)| TreemapItem {
            id,
            weight: if w.is_finite() { w } else { 0.0 },
            rect: Rect::default(),
        })
        .collect();
    if items.is_empty() {
        return items;
    }
    items.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));

    let total: f64 = items.iter().map(|i| i.weight).sum();
    let k = area.area() / total;
    let k = if k.is_finite() && k > 0.0 { k } else { 0.0 };
    let areas: Vec<f64> = items
        .iter()
        .map(|i| {
            let a = i.weight * k;
            if a > 0.0 {
                a
            } else {
                0.0
            }
        })
        .collect();

    let mut rect = area;
    let mut remaining: Vec<usize> = (0..items.len()).collect();
    let mut row: Vec<usize> = Vec::new();
    let mut row_area = 0.0;
    let mut best = f64::INFINITY;
    let mut u = rect.w.min(rect.h);

    while let Some(&next) = remaining.last() {
        row.push(next);
        row_area += areas[next];
        let score = worst(&row, row_area, u, ratio, &areas);
        if score <= best || row.len() == 1 {
            remaining.pop();
            best = score;
        } else {
            if let Some(back) = row.pop() {
                row_area -= areas[back];
            }
            position(&row, row_area, u, &mut rect, false, &areas, &mut items);
            u = rect.w.min(rect.h);
            row.clear();
            row_area = 0.0;
            best = f64::INFINITY;
        }
    }
    if !row.is_empty() {
        position(&row, row_area, u, &mut rect, true, &areas, &mut items);
    }
    items
}

/// Worst aspect ratio in a row laid along a side of length `u`.
fn worst(row: &[usize], row_area: f64, u: f64, ratio: f64, areas: &[f64]) -> f64 {
    let mut rmin = f64::INFINITY;
    let mut rmax = 0.0_f64;
    for &i in row {
        let r = areas[i];
        if r == 0.0 {
            continue;
        }
        rmin = rmin.min(r);
        rmax = rmax.max(r);
    }
    let s = row_area * row_area;
    let u = u * u;
    if s > 0.0 {
        ((u * rmax * ratio) / s).max(s / (u * rmin * ratio))
    } else {
        f64::INFINITY
    }
}

fn position(
    row: &[usize],
    row_area: f64,
    u: f64,
    rect: &mut Rect,
    flush: bool,
    areas: &[f64],
    items: &mut [TreemapItem],
) {
    let mut x = rect.x;
    let mut y = rect.y;
    let mut v = if u != 0.0 { row_area / u } else { 0.0 };

    if u == rect.w {
        // strip across the top of the free space
        if flush || v > rect.h {
            v = rect.h;
        }
        for &i in row {
            let r = &mut items[i].rect;
            r.x = x;
            r.y = y;
            r.h = v;
            r.w = (rect.x + rect.w - x).min(if v != 0.0 { areas[i] / v } else { 0.0 });
            x += r.w;
        }
        if let Some(&last) = row.last() {
            items[last].rect.w += rect.x + rect.w - x;
        }
        rect.y += v;
        rect.h -= v;
    } else {
        // strip down the left of the free space
        if flush || v > rect.w {
            v = rect.w;
        }
        for &i in row {
            let r = &mut items[i].rect;
            r.x = x;
            r.y = y;
            r.w = v;
            r.h = (rect.y + rect.h - y).min(if v != 0.0 { areas[i] / v } else { 0.0 });
            y += r.h;
        }
        if let Some(&last) = row.last() {
            items[last].rect.h += rect.y + rect.h - y;
        }
        rect.x += v;
        rect.w -= v;
    }
}
