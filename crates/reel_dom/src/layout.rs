//! Layout geometry
//!
//! Geometry is derived from a Taffy pass over the `body` subtree. A pass
//! runs lazily the first time geometry is queried after the tree or a style
//! changed. Bounds are absolute and unscrolled; [`Document::client_rect`]
//! applies ancestor scroll offsets on top.

use taffy::prelude::*;

use crate::error::Result;
use crate::tree::{Document, ElementId};

/// Axis-aligned rectangle in document space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Translate by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether this rectangle lies entirely within `other`
    pub fn is_within(&self, other: &ElementBounds) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }

    /// Overlapping region of two rectangles, `None` when they do not touch
    pub fn intersection(&self, other: &ElementBounds) -> Option<ElementBounds> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(ElementBounds::new(left, top, right - left, bottom - top))
    }
}

impl Document {
    /// Recompute layout if anything changed since the last pass
    pub fn ensure_layout(&self) -> Result<()> {
        if !self.layout_dirty.get() {
            return Ok(());
        }

        let body = self.body();
        let body_node = self.data(body)?.layout_node;

        let mut taffy = self.taffy.borrow_mut();
        taffy.compute_layout(body_node, Size::MAX_CONTENT)?;

        let mut bounds = self.bounds.borrow_mut();
        bounds.clear();

        let mut stack = vec![(body, 0.0_f32, 0.0_f32)];
        while let Some((id, parent_x, parent_y)) = stack.pop() {
            let data = self.data(id)?;
            let layout = taffy.layout(data.layout_node)?;
            let x = parent_x + layout.location.x;
            let y = parent_y + layout.location.y;

            bounds.insert(
                id,
                ElementBounds::new(x, y, layout.size.width, layout.size.height),
            );
            stack.extend(data.children.iter().map(|&child| (child, x, y)));
        }

        self.layout_dirty.set(false);
        tracing::trace!("layout pass computed {} element bounds", bounds.len());
        Ok(())
    }

    /// Absolute unscrolled bounds of an element
    ///
    /// Elements outside the `body` subtree report empty bounds.
    pub fn bounds(&self, id: ElementId) -> Result<ElementBounds> {
        self.data(id)?;
        self.ensure_layout()?;
        Ok(self.bounds.borrow().get(id).copied().unwrap_or_default())
    }

    pub fn offset_left(&self, id: ElementId) -> Result<f32> {
        Ok(self.bounds(id)?.x)
    }

    pub fn offset_top(&self, id: ElementId) -> Result<f32> {
        Ok(self.bounds(id)?.y)
    }

    pub fn offset_width(&self, id: ElementId) -> Result<f32> {
        Ok(self.bounds(id)?.width)
    }

    pub fn offset_height(&self, id: ElementId) -> Result<f32> {
        Ok(self.bounds(id)?.height)
    }

    /// Resolved left padding in pixels
    pub fn padding_left(&self, id: ElementId) -> Result<f32> {
        let padding = self.data(id)?.style.padding.left;
        self.resolve_padding(id, padding)
    }

    /// Resolved right padding in pixels
    pub fn padding_right(&self, id: ElementId) -> Result<f32> {
        let padding = self.data(id)?.style.padding.right;
        self.resolve_padding(id, padding)
    }

    /// Resolved bottom padding in pixels
    pub fn padding_bottom(&self, id: ElementId) -> Result<f32> {
        let padding = self.data(id)?.style.padding.bottom;
        self.resolve_padding(id, padding)
    }

    // Percent padding resolves against the parent's width, as in CSS
    fn resolve_padding(&self, id: ElementId, padding: LengthPercentage) -> Result<f32> {
        match padding {
            LengthPercentage::Length(px) => Ok(px),
            LengthPercentage::Percent(fraction) => {
                let parent_width = match self.parent(id) {
                    Some(parent) => self.offset_width(parent)?,
                    None => 0.0,
                };
                Ok(parent_width * fraction)
            }
        }
    }

    /// Width of the element's content including overflow
    pub fn scroll_width(&self, id: ElementId) -> Result<f32> {
        let own = self.bounds(id)?;
        let mut extent = own.width;
        let mut furthest_child: Option<f32> = None;

        for &child in self.children(id) {
            let child_bounds = self.bounds(child)?;
            let right = child_bounds.right() - own.x;
            furthest_child = Some(furthest_child.map_or(right, |r| r.max(right)));
        }

        if let Some(right) = furthest_child {
            extent = extent.max(right + self.padding_right(id)?);
        }
        Ok(extent)
    }

    /// Height of the element's content including overflow
    pub fn scroll_height(&self, id: ElementId) -> Result<f32> {
        let own = self.bounds(id)?;
        let mut extent = own.height;

        for &child in self.children(id) {
            let child_bounds = self.bounds(child)?;
            extent = extent.max(child_bounds.bottom() - own.y + self.padding_bottom(id)?);
        }
        Ok(extent)
    }

    /// Bounds after subtracting the scroll offsets of every ancestor
    pub fn client_rect(&self, id: ElementId) -> Result<ElementBounds> {
        let bounds = self.bounds(id)?;
        let (dx, dy) = self
            .ancestors(id)
            .into_iter()
            .map(|ancestor| self.scroll_offset(ancestor))
            .fold((0.0, 0.0), |(ax, ay), (sx, sy)| (ax + sx, ay + sy));

        Ok(bounds.offset(-dx, -dy))
    }
}
