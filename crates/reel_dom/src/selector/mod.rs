//! Structural element queries
//!
//! Selectors are matched right to left: the subject compound is checked
//! against the candidate, then each combinator walks up the tree. Matching
//! considers the whole document, results are limited to descendants of the
//! query root (the same scoping rule as `Element.querySelector`).
//!
//! ```ignore
//! let scroller = doc.query_selector(root, ".carousel__container")?;
//! let controls = doc.query_selector_all(root, ".pagination-button_back")?;
//! ```

mod parser;

pub use parser::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};

use crate::error::Result;
use crate::tree::{Document, ElementId};

impl Document {
    /// First descendant of `root` in document order matching `selector`
    pub fn query_selector(&self, root: ElementId, selector: &str) -> Result<Option<ElementId>> {
        let list = SelectorList::parse(selector)?;
        self.data(root)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .find(|&id| self.matches_list(id, &list)))
    }

    /// All descendants of `root` in document order matching `selector`
    pub fn query_selector_all(&self, root: ElementId, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        self.data(root)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|&id| self.matches_list(id, &list))
            .collect())
    }

    /// Whether an element matches selector text
    pub fn matches(&self, id: ElementId, selector: &str) -> Result<bool> {
        let list = SelectorList::parse(selector)?;
        self.data(id)?;
        Ok(self.matches_list(id, &list))
    }

    /// Whether an element matches a parsed selector list
    pub fn matches_list(&self, id: ElementId, list: &SelectorList) -> bool {
        list.selectors
            .iter()
            .any(|selector| self.matches_complex(id, selector))
    }

    fn matches_complex(&self, id: ElementId, selector: &ComplexSelector) -> bool {
        if !self.matches_compound(id, selector.subject()) {
            return false;
        }

        let mut steps: Vec<(Combinator, &CompoundSelector)> = Vec::with_capacity(selector.tail.len());
        let mut left = &selector.head;
        for (combinator, compound) in &selector.tail {
            steps.push((*combinator, left));
            left = compound;
        }
        // steps[i] = (combinator to the right of compound, compound); walk them right to left
        self.matches_steps(id, &steps)
    }

    fn matches_steps(&self, id: ElementId, steps: &[(Combinator, &CompoundSelector)]) -> bool {
        let Some(((combinator, compound), rest)) = steps.split_last() else {
            return true;
        };

        match combinator {
            Combinator::Child => self
                .parent(id)
                .is_some_and(|parent| {
                    self.matches_compound(parent, compound) && self.matches_steps(parent, rest)
                }),
            Combinator::Descendant => self.ancestors(id).into_iter().any(|ancestor| {
                self.matches_compound(ancestor, compound) && self.matches_steps(ancestor, rest)
            }),
        }
    }

    fn matches_compound(&self, id: ElementId, compound: &CompoundSelector) -> bool {
        if let Some(tag) = &compound.tag {
            if self.tag_name(id) != Some(tag.as_str()) {
                return false;
            }
        }

        compound.parts.iter().all(|part| match part {
            SimpleSelector::Id(expected) => self.attr(id, "id") == Some(expected.as_str()),
            SimpleSelector::Class(class_name) => self.has_class(id, class_name),
            SimpleSelector::Attribute { name, value } => match value {
                Some(expected) => self.attr(id, name) == Some(expected.as_str()),
                None => self.has_attr(id, name),
            },
        })
    }
}
