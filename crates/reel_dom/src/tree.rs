//! Element tree management
//!
//! The [`Document`] owns every element in a slotmap and mirrors the
//! hierarchy into a Taffy tree so geometry can be queried at any time.
//! Attributes keep insertion order, class lists keep token order.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use smallvec::SmallVec;
use taffy::prelude::*;

use crate::error::{DomError, Result};

new_key_type! {
    /// Handle to an element owned by a [`Document`]
    pub struct ElementId;
}

/// Data stored for each element
#[derive(Debug)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) classes: SmallVec<[String; 4]>,
    pub(crate) text: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) style: Style,
    pub(crate) layout_node: NodeId,
}

/// A tree of elements with attributes, classes, text and box styles
pub struct Document {
    pub(crate) elements: SlotMap<ElementId, ElementData>,
    body: ElementId,
    pub(crate) taffy: RefCell<TaffyTree<()>>,
    /// Absolute (unscrolled) bounds computed from the last layout pass
    pub(crate) bounds: RefCell<SecondaryMap<ElementId, crate::layout::ElementBounds>>,
    pub(crate) layout_dirty: Cell<bool>,
    /// Scroll offsets of scroll containers, (x, y)
    pub(crate) scroll_offsets: SecondaryMap<ElementId, (f32, f32)>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements.len())
            .field("body", &self.body)
            .field("layout_dirty", &self.layout_dirty.get())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only an empty `body` element
    pub fn new() -> Self {
        let mut taffy = TaffyTree::new();
        let mut elements = SlotMap::with_key();
        // new_leaf never fails; its Result matches new_with_children
        let layout_node = taffy
            .new_leaf(Style::default())
            .expect("empty layout tree rejected a leaf");
        let body = elements.insert(ElementData::new("body", layout_node));

        Self {
            elements,
            body,
            taffy: RefCell::new(taffy),
            bounds: RefCell::new(SecondaryMap::new()),
            layout_dirty: Cell::new(true),
            scroll_offsets: SecondaryMap::new(),
        }
    }

    /// The document root
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> Result<ElementId> {
        let layout_node = self.taffy.get_mut().new_leaf(Style::default())?;
        let id = self
            .elements
            .insert(ElementData::new(tag.into().to_ascii_lowercase(), layout_node));
        Ok(id)
    }

    /// Check whether an id refers to a live element
    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Number of live elements, including `body`
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document holds nothing but `body`
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub(crate) fn data(&self, id: ElementId) -> Result<&ElementData> {
        self.elements.get(id).ok_or(DomError::UnknownElement(id))
    }

    pub(crate) fn data_mut(&mut self, id: ElementId) -> Result<&mut ElementData> {
        self.elements.get_mut(id).ok_or(DomError::UnknownElement(id))
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.data(parent)?;
        self.data(child)?;
        if parent == child || self.contains(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }

        self.detach(child)?;

        let parent_node = self.data(parent)?.layout_node;
        let child_node = self.data(child)?.layout_node;
        self.taffy.get_mut().add_child(parent_node, child_node)?;

        self.data_mut(parent)?.children.push(child);
        self.data_mut(child)?.parent = Some(parent);
        self.layout_dirty.set(true);
        Ok(())
    }

    /// Remove `child` from its parent; the element stays alive
    pub fn detach(&mut self, child: ElementId) -> Result<()> {
        let Some(parent) = self.data(child)?.parent else {
            return Ok(());
        };

        let parent_node = self.data(parent)?.layout_node;
        let child_node = self.data(child)?.layout_node;
        self.taffy.get_mut().remove_child(parent_node, child_node)?;

        self.data_mut(parent)?.children.retain(|&c| c != child);
        self.data_mut(child)?.parent = None;
        self.layout_dirty.set(true);
        Ok(())
    }

    /// Children of an element in order
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of an element
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id)?.parent
    }

    /// All ancestors of an element (from immediate parent to body)
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;

        while let Some(parent) = self.parent(current) {
            result.push(parent);
            current = parent;
        }

        result
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    pub fn first_element_child(&self, id: ElementId) -> Option<ElementId> {
        self.children(id).first().copied()
    }

    pub fn last_element_child(&self, id: ElementId) -> Option<ElementId> {
        self.children(id).last().copied()
    }

    /// Position of an element among its parent's children
    pub fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_element_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_element_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// All descendants of `root` in document order, excluding `root`
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }

        out
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn tag_name(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|data| data.tag.as_str())
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, id: ElementId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute; setting `class` also replaces the class list
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let data = self.data_mut(id)?;
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        }
        data.attributes.insert(name, value.to_string());
        Ok(())
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let data = self.data_mut(id)?;
        if name == "class" {
            data.classes.clear();
        }
        data.attributes.shift_remove(&name);
        Ok(())
    }

    /// Toggle a boolean attribute
    ///
    /// With `force` set the attribute is added (`Some(true)`) or removed
    /// (`Some(false)`) unconditionally. Returns whether the attribute is
    /// present afterwards.
    pub fn toggle_attr(&mut self, id: ElementId, name: &str, force: Option<bool>) -> Result<bool> {
        let present = self.data(id)?.attributes.contains_key(&name.to_ascii_lowercase());
        let wanted = force.unwrap_or(!present);

        if wanted && !present {
            self.set_attr(id, name, "")?;
        } else if !wanted && present {
            self.remove_attr(id, name)?;
        }

        Ok(wanted)
    }

    /// Read a `data-*` attribute by its camelCase dataset key
    pub fn dataset(&self, id: ElementId, key: &str) -> Option<&str> {
        self.attr(id, &dataset_key_to_attr_name(key))
    }

    pub fn set_dataset(&mut self, id: ElementId, key: &str, value: &str) -> Result<()> {
        self.set_attr(id, &dataset_key_to_attr_name(key), value)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.elements
            .get(id)
            .map(|data| data.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, id: ElementId, class_name: &str) -> bool {
        self.classes(id).iter().any(|c| c == class_name)
    }

    pub fn add_class(&mut self, id: ElementId, class_name: &str) -> Result<()> {
        if class_name.is_empty() || self.has_class(id, class_name) {
            self.data(id)?;
            return Ok(());
        }
        let data = self.data_mut(id)?;
        data.classes.push(class_name.to_string());
        sync_class_attr(data);
        Ok(())
    }

    pub fn remove_class(&mut self, id: ElementId, class_name: &str) -> Result<()> {
        let data = self.data_mut(id)?;
        let before = data.classes.len();
        data.classes.retain(|c| c != class_name);
        if data.classes.len() != before {
            sync_class_attr(data);
        }
        Ok(())
    }

    /// Toggle a class, returning whether it is present afterwards
    pub fn toggle_class(
        &mut self,
        id: ElementId,
        class_name: &str,
        force: Option<bool>,
    ) -> Result<bool> {
        let wanted = force.unwrap_or(!self.has_class(id, class_name));
        if wanted {
            self.add_class(id, class_name)?;
        } else {
            self.remove_class(id, class_name)?;
        }
        Ok(wanted)
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|data| data.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> Result<()> {
        self.data_mut(id)?.text = text.into();
        Ok(())
    }

    // =========================================================================
    // Style
    // =========================================================================

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.elements.get(id).map(|data| &data.style)
    }

    /// Replace an element's box style
    pub fn set_style(&mut self, id: ElementId, style: Style) -> Result<()> {
        let node = self.data(id)?.layout_node;
        self.taffy.get_mut().set_style(node, style.clone())?;
        self.data_mut(id)?.style = style;
        self.layout_dirty.set(true);
        Ok(())
    }
}

impl ElementData {
    fn new(tag: impl Into<String>, layout_node: NodeId) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            classes: SmallVec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            style: Style::default(),
            layout_node,
        }
    }
}

fn sync_class_attr(data: &mut ElementData) {
    let joined = data.classes.join(" ");
    data.attributes.insert("class".to_string(), joined);
}

/// `autoplayDelay` -> `data-autoplay-delay`
fn dataset_key_to_attr_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    name.push_str("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_children(count: usize) -> (Document, ElementId, Vec<ElementId>) {
        let mut doc = Document::new();
        let parent = doc.create_element("div").unwrap();
        doc.append_child(doc.body(), parent).unwrap();
        let children = (0..count)
            .map(|_| {
                let child = doc.create_element("div").unwrap();
                doc.append_child(parent, child).unwrap();
                child
            })
            .collect();
        (doc, parent, children)
    }

    #[test]
    fn test_siblings() {
        let (doc, parent, children) = doc_with_children(3);

        assert_eq!(doc.first_element_child(parent), Some(children[0]));
        assert_eq!(doc.last_element_child(parent), Some(children[2]));
        assert_eq!(doc.next_element_sibling(children[0]), Some(children[1]));
        assert_eq!(doc.next_element_sibling(children[2]), None);
        assert_eq!(doc.previous_element_sibling(children[0]), None);
        assert_eq!(doc.previous_element_sibling(children[2]), Some(children[1]));
        assert_eq!(doc.index_in_parent(children[1]), Some(1));
    }

    #[test]
    fn test_append_reparents() {
        let (mut doc, parent, children) = doc_with_children(2);
        let other = doc.create_element("section").unwrap();
        doc.append_child(doc.body(), other).unwrap();

        doc.append_child(other, children[0]).unwrap();

        assert_eq!(doc.children(parent), &[children[1]]);
        assert_eq!(doc.parent(children[0]), Some(other));
    }

    #[test]
    fn test_append_rejects_cycle() {
        let (mut doc, parent, children) = doc_with_children(1);
        let err = doc.append_child(children[0], parent).unwrap_err();
        assert!(matches!(err, DomError::Hierarchy { .. }));
    }

    #[test]
    fn test_toggle_attr_force() {
        let (mut doc, _, children) = doc_with_children(1);
        let el = children[0];

        assert!(doc.toggle_attr(el, "disabled", Some(true)).unwrap());
        assert!(doc.has_attr(el, "disabled"));
        assert!(doc.toggle_attr(el, "disabled", Some(true)).unwrap());
        assert!(!doc.toggle_attr(el, "disabled", Some(false)).unwrap());
        assert!(!doc.has_attr(el, "disabled"));
        assert!(doc.toggle_attr(el, "disabled", None).unwrap());
    }

    #[test]
    fn test_dataset_key_mapping() {
        let (mut doc, _, children) = doc_with_children(1);
        doc.set_attr(children[0], "data-autoplay-delay", "200").unwrap();

        assert_eq!(doc.dataset(children[0], "autoplayDelay"), Some("200"));
        assert_eq!(dataset_key_to_attr_name("looped"), "data-looped");

        doc.set_dataset(children[0], "slideIndex", "3").unwrap();
        assert_eq!(doc.attr(children[0], "data-slide-index"), Some("3"));
        assert_eq!(doc.dataset(children[0], "slideIndex"), Some("3"));
    }

    #[test]
    fn test_class_list_syncs_attribute() {
        let (mut doc, _, children) = doc_with_children(1);
        let el = children[0];

        doc.add_class(el, "pagination__dot").unwrap();
        doc.add_class(el, "pagination__dot_active").unwrap();
        doc.add_class(el, "pagination__dot").unwrap();
        assert_eq!(
            doc.attr(el, "class"),
            Some("pagination__dot pagination__dot_active")
        );

        doc.remove_class(el, "pagination__dot_active").unwrap();
        assert_eq!(doc.attr(el, "class"), Some("pagination__dot"));

        doc.set_attr(el, "class", "a  b").unwrap();
        assert_eq!(doc.classes(el), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_descendants_document_order() {
        let (mut doc, parent, children) = doc_with_children(2);
        let nested = doc.create_element("span").unwrap();
        doc.append_child(children[0], nested).unwrap();

        assert_eq!(
            doc.descendants(parent),
            vec![children[0], nested, children[1]]
        );
    }

    #[test]
    fn test_unknown_element() {
        let mut doc = Document::new();
        let stale = doc.create_element("div").unwrap();
        doc.elements.remove(stale);

        assert!(matches!(
            doc.set_text(stale, "x"),
            Err(DomError::UnknownElement(_))
        ));
        assert_eq!(doc.children(stale), &[] as &[ElementId]);
    }
}
