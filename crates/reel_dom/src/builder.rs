//! Fluent element builder
//!
//! ```ignore
//! use reel_dom::prelude::*;
//!
//! let carousel = el("div")
//!     .class("carousel")
//!     .data("looped", "")
//!     .child(
//!         el("ul")
//!             .class("carousel__container")
//!             .flex_row()
//!             .w(320.0)
//!             .overflow_x_scroll()
//!             .children((0..5).map(|_| el("li").w(320.0).h(200.0).flex_shrink_0())),
//!     )
//!     .build(host.dom_mut())?;
//! ```

use taffy::prelude::*;
use taffy::Overflow;

use crate::error::Result;
use crate::tree::{Document, ElementId};

/// Start building an element with the given tag
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(tag)
}

/// Describes an element subtree before it is inserted into a [`Document`]
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: Option<String>,
    style: Style,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            text: None,
            style: Style::default(),
            children: Vec::new(),
        }
    }

    // =========================================================================
    // Markup
    // =========================================================================

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.classes.push(class_name.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set a `data-*` attribute, `data("looped", "")` -> `data-looped=""`
    pub fn data(self, name: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{name}"), value)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    // =========================================================================
    // Box style
    // =========================================================================

    pub fn flex_row(mut self) -> Self {
        self.style.display = Display::Flex;
        self.style.flex_direction = FlexDirection::Row;
        self
    }

    pub fn flex_col(mut self) -> Self {
        self.style.display = Display::Flex;
        self.style.flex_direction = FlexDirection::Column;
        self
    }

    /// Remove from layout (`display: none`)
    pub fn hidden(mut self) -> Self {
        self.style.display = Display::None;
        self
    }

    /// Set width in pixels
    pub fn w(mut self, px: f32) -> Self {
        self.style.size.width = Dimension::Length(px);
        self
    }

    /// Set height in pixels
    pub fn h(mut self, px: f32) -> Self {
        self.style.size.height = Dimension::Length(px);
        self
    }

    /// Set padding on all sides in pixels
    pub fn p(mut self, px: f32) -> Self {
        let val = LengthPercentage::Length(px);
        self.style.padding = Rect {
            left: val,
            right: val,
            top: val,
            bottom: val,
        };
        self
    }

    /// Set left padding in pixels
    pub fn pl(mut self, px: f32) -> Self {
        self.style.padding.left = LengthPercentage::Length(px);
        self
    }

    /// Set right padding in pixels
    pub fn pr(mut self, px: f32) -> Self {
        self.style.padding.right = LengthPercentage::Length(px);
        self
    }

    /// Set column gap in pixels
    pub fn gap_x(mut self, px: f32) -> Self {
        self.style.gap.width = LengthPercentage::Length(px);
        self
    }

    pub fn flex_shrink_0(mut self) -> Self {
        self.style.flex_shrink = 0.0;
        self
    }

    /// Make the element a horizontal scroll container
    pub fn overflow_x_scroll(mut self) -> Self {
        self.style.overflow.x = Overflow::Scroll;
        self.style.overflow.y = Overflow::Hidden;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Create the subtree in `doc`, returning the detached root
    pub fn build(self, doc: &mut Document) -> Result<ElementId> {
        let id = doc.create_element(self.tag)?;

        for (name, value) in &self.attributes {
            doc.set_attr(id, name, value)?;
        }
        for class_name in &self.classes {
            doc.add_class(id, class_name)?;
        }
        if let Some(text) = self.text {
            doc.set_text(id, text)?;
        }
        doc.set_style(id, self.style)?;

        for child in self.children {
            let child_id = child.build(doc)?;
            doc.append_child(id, child_id)?;
        }

        Ok(id)
    }

    /// Build and append under `parent`
    pub fn mount(self, doc: &mut Document, parent: ElementId) -> Result<ElementId> {
        let id = self.build(doc)?;
        doc.append_child(parent, id)?;
        Ok(id)
    }
}
